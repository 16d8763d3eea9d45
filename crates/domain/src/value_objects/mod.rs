//! Value objects - validated, immutable building blocks for entities

mod invite_code;
mod names;
mod user_options;

pub use invite_code::InviteCode;
pub use names::{LabelCategory, LabelName, LocationName, RoomName, UserName};
pub use user_options::UserOptions;
