//! Infrastructure - external dependencies and their adapters.

pub mod config;
pub mod ports;
pub mod sqlite_store;
