//! Room invitation codes.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;

const MAX_CODE_LENGTH: usize = 64;

/// An invitation code. Codes are opaque and compared exactly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct InviteCode(String);

impl InviteCode {
    pub fn new(code: impl Into<String>) -> Result<Self, DomainError> {
        let code = code.into();
        if code.is_empty() || code.chars().any(char::is_whitespace) {
            return Err(DomainError::validation(
                "Invite code must be non-empty and contain no whitespace",
            ));
        }
        if code.len() > MAX_CODE_LENGTH {
            return Err(DomainError::validation(format!(
                "Invite code cannot exceed {} characters",
                MAX_CODE_LENGTH
            )));
        }
        Ok(Self(code))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InviteCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for InviteCode {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<InviteCode> for String {
    fn from(code: InviteCode) -> String {
        code.0
    }
}
