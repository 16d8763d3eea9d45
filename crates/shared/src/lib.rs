//! Tabletop Protocol - Shared types for the engine and browser clients
//!
//! This crate contains the types exchanged with clients:
//! - Socket event messages (`ClientMessage`, `ServerMessage`)
//! - HTTP request/response DTOs
//!
//! # Design Principles
//!
//! 1. **Minimal dependencies** - Only serde, serde_json and uuid
//! 2. **No business logic** - Pure data types and serialization
//! 3. **No domain IDs** - use raw `uuid::Uuid` in DTOs

pub mod messages;
pub mod responses;

pub use messages::{
    ClientMessage, LabelData, LabelRef, LabelVisibilityData, MemberData, ServerMessage,
};
pub use responses::{
    ClaimInviteRequest, CreateRoomRequest, InviteCodeResponse, JoinResponse,
};
