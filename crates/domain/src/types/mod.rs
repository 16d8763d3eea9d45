//! Shared vocabulary types used by both the domain and the wire protocol.

mod role;
pub use role::Role;
