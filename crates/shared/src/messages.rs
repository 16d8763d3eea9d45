//! Socket message types exchanged with game clients
//!
//! Every frame is `{"event": "<Dotted.Name>", "data": <payload>}`. The dotted
//! names are part of the client contract and must not change.
//!
//! ## Versioning Policy
//!
//! - New variants can be added at the end (forward compatible)
//! - Renaming an event is a breaking change

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// Payloads
// =============================================================================

/// Full representation of a label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelData {
    pub id: Uuid,
    /// Owner's user name
    #[serde(alias = "user")]
    pub owner: String,
    #[serde(default)]
    pub category: Option<String>,
    pub name: String,
    pub visible: bool,
}

/// Reference to a label by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelRef {
    pub id: Uuid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelVisibilityData {
    pub id: Uuid,
    pub visible: bool,
}

/// A newly admitted room member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberData {
    pub user_id: Uuid,
    pub name: String,
    pub location: Uuid,
}

// =============================================================================
// Client Messages (browser → engine)
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ClientMessage {
    #[serde(rename = "Label.Add")]
    LabelAdd(LabelData),
    #[serde(rename = "Label.Delete")]
    LabelDelete(LabelRef),
    #[serde(rename = "Label.Visibility.Set")]
    LabelVisibilitySet(LabelVisibilityData),
    #[serde(rename = "Labels.Filter.Add")]
    LabelFilterAdd(Uuid),
    #[serde(rename = "Labels.Filter.Remove")]
    LabelFilterRemove(Uuid),
    /// Heartbeat ping
    #[serde(rename = "Ping")]
    Heartbeat,
}

impl ClientMessage {
    pub fn event_name(&self) -> &'static str {
        match self {
            ClientMessage::LabelAdd(_) => "Label.Add",
            ClientMessage::LabelDelete(_) => "Label.Delete",
            ClientMessage::LabelVisibilitySet(_) => "Label.Visibility.Set",
            ClientMessage::LabelFilterAdd(_) => "Labels.Filter.Add",
            ClientMessage::LabelFilterRemove(_) => "Labels.Filter.Remove",
            ClientMessage::Heartbeat => "Ping",
        }
    }
}

// =============================================================================
// Server Messages (engine → browser)
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ServerMessage {
    /// A label the recipient may now see (created, or made visible)
    #[serde(rename = "Label.Add")]
    LabelAdd(LabelData),
    /// A label the recipient must forget (deleted, or hidden from them)
    #[serde(rename = "Label.Delete")]
    LabelDelete { owner: String, id: Uuid },
    /// Raw visibility change; only ever sent to the label's owner
    #[serde(rename = "Label.Visibility.Set")]
    LabelVisibilitySet {
        owner: String,
        id: Uuid,
        visible: bool,
    },
    #[serde(rename = "Labels.Filter.Add")]
    LabelFilterAdd(Uuid),
    #[serde(rename = "Labels.Filter.Remove")]
    LabelFilterRemove(Uuid),
    #[serde(rename = "Room.Member.Added")]
    RoomMemberAdded(MemberData),
    #[serde(rename = "Pong")]
    Pong,
    /// Malformed frame; never used for authorization failures
    #[serde(rename = "Error")]
    Error { code: String, message: String },
}

impl ServerMessage {
    pub fn event_name(&self) -> &'static str {
        match self {
            ServerMessage::LabelAdd(_) => "Label.Add",
            ServerMessage::LabelDelete { .. } => "Label.Delete",
            ServerMessage::LabelVisibilitySet { .. } => "Label.Visibility.Set",
            ServerMessage::LabelFilterAdd(_) => "Labels.Filter.Add",
            ServerMessage::LabelFilterRemove(_) => "Labels.Filter.Remove",
            ServerMessage::RoomMemberAdded(_) => "Room.Member.Added",
            ServerMessage::Pong => "Pong",
            ServerMessage::Error { .. } => "Error",
        }
    }
}
