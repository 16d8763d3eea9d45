//! Validated name newtypes for domain entities
//!
//! These newtypes ensure that names are valid by construction:
//! - Non-empty
//! - Within length limits
//! - Trimmed of leading/trailing whitespace

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;

/// Maximum length for user, room and location names
const MAX_NAME_LENGTH: usize = 200;

/// Maximum length for label names and categories
const MAX_LABEL_LENGTH: usize = 100;

macro_rules! define_name {
    ($(#[$meta:meta])* $name:ident, $label:literal, $max:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Create a new validated value.
            ///
            /// # Errors
            ///
            /// Returns `DomainError::Validation` if the value is empty after
            /// trimming or exceeds the length limit.
            pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
                let value = value.into();
                let trimmed = value.trim();
                if trimmed.is_empty() {
                    return Err(DomainError::validation(concat!($label, " cannot be empty")));
                }
                if trimmed.chars().count() > $max {
                    return Err(DomainError::validation(format!(
                        "{} cannot exceed {} characters",
                        $label, $max
                    )));
                }
                Ok(Self(trimmed.to_string()))
            }

            /// Returns the value as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = DomainError;

            fn try_from(s: String) -> Result<Self, Self::Error> {
                Self::new(s)
            }
        }

        impl From<$name> for String {
            fn from(name: $name) -> String {
                name.0
            }
        }
    };
}

define_name!(
    /// A user's display and login name. Unique case-insensitively.
    UserName,
    "User name",
    MAX_NAME_LENGTH
);

define_name!(
    /// A room name, unique per creator.
    RoomName,
    "Room name",
    MAX_NAME_LENGTH
);

define_name!(
    /// A location (scene) name within a room.
    LocationName,
    "Location name",
    MAX_NAME_LENGTH
);

define_name!(
    /// The text shown for a label.
    LabelName,
    "Label name",
    MAX_LABEL_LENGTH
);

define_name!(
    /// Optional grouping for labels.
    LabelCategory,
    "Label category",
    MAX_LABEL_LENGTH
);

impl UserName {
    /// Key used for case-insensitive lookups.
    pub fn lookup_key(&self) -> String {
        self.0.to_lowercase()
    }

    /// Case-insensitive comparison against a raw name.
    pub fn matches(&self, other: &str) -> bool {
        self.0.to_lowercase() == other.trim().to_lowercase()
    }
}
