//! Domain entities - Core business objects with identity

mod label;
mod location;
mod player_room;
mod room;
mod user;

pub use label::{Label, LabelSelection, OwnedObject};
pub use location::Location;
pub use player_room::PlayerRoom;
pub use room::Room;
pub use user::User;
