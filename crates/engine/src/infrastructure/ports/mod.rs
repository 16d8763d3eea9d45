//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Everything else is concrete types.
//! Ports exist for:
//! - Database access (SQLite today, anything relational tomorrow)
//! - Randomness (for testing invite code generation)

mod error;
mod repos;
mod testing;

// =============================================================================
// Repository Ports
// =============================================================================
pub use repos::{LabelRepo, MembershipRepo, RoomRepo, UserRepo};

// =============================================================================
// Test-Only Mock Repositories (only available during test builds)
// =============================================================================
#[cfg(test)]
pub use repos::{MockLabelRepo, MockMembershipRepo, MockRoomRepo, MockUserRepo};

#[cfg(test)]
pub use testing::MockRandomPort;

// =============================================================================
// Testing Ports
// =============================================================================
pub use testing::{RandomPort, SystemRandom};

// =============================================================================
// Error Types
// =============================================================================
pub use error::{RepoError, SessionError};
