//! User entity

use serde::{Deserialize, Serialize};

use crate::{UserId, UserName, UserOptions};

/// A registered user.
///
/// The credential hash is opaque to this crate; hashing and verification
/// happen in the authentication layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    name: UserName,
    #[serde(skip)]
    credential_hash: Option<String>,
    #[serde(default)]
    default_options: UserOptions,
}

impl User {
    pub fn new(name: UserName) -> Self {
        Self {
            id: UserId::new(),
            name,
            credential_hash: None,
            default_options: UserOptions::default(),
        }
    }

    pub fn with_id(mut self, id: UserId) -> Self {
        self.id = id;
        self
    }

    pub fn with_credential_hash(mut self, hash: impl Into<String>) -> Self {
        self.credential_hash = Some(hash.into());
        self
    }

    pub fn with_default_options(mut self, options: UserOptions) -> Self {
        self.default_options = options;
        self
    }

    #[inline]
    pub fn id(&self) -> UserId {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &UserName {
        &self.name
    }

    #[inline]
    pub fn credential_hash(&self) -> Option<&str> {
        self.credential_hash.as_deref()
    }

    pub fn default_options(&self) -> &UserOptions {
        &self.default_options
    }
}
