extern crate self as tabletop_domain;

pub mod entities;
pub mod error;
pub mod ids;
pub mod types;
pub mod value_objects;

pub use entities::{Label, LabelSelection, Location, OwnedObject, PlayerRoom, Room, User};

pub use error::DomainError;

// Re-export ID types
pub use ids::{LabelId, LocationId, PlayerRoomId, RoomId, SessionId, UserId};

pub use types::Role;

pub use value_objects::{
    InviteCode, LabelCategory, LabelName, LocationName, RoomName, UserName, UserOptions,
};
