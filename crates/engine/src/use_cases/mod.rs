//! Use cases - User story orchestration.
//!
//! Each module contains use cases for a specific domain area.

pub mod label;
pub mod room;
pub mod session;
pub mod visibility;

pub use label::LabelUseCases;
pub use room::RoomUseCases;
pub use session::SessionUseCases;
