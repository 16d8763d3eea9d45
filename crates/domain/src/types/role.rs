//! Membership roles within a room.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Role of a user in a room.
///
/// Ownership of a room is tracked separately (see `Room::creator`); the role
/// only describes the authorization tier of a membership row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Regular participant
    #[default]
    Player,
    /// Game master - elevated privileges within the room
    Dm,
}

impl Role {
    /// Check if this role is DM
    pub fn is_dm(&self) -> bool {
        matches!(self, Role::Dm)
    }

    /// Check if this role is Player
    pub fn is_player(&self) -> bool {
        matches!(self, Role::Player)
    }

    /// Stable storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Player => "PLAYER",
            Role::Dm => "DM",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PLAYER" => Ok(Role::Player),
            "DM" => Ok(Role::Dm),
            other => Err(DomainError::parse(format!("Unknown role: {}", other))),
        }
    }
}
