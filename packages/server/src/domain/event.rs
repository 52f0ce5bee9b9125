//! Events the server pushes to connections.
//!
//! These are protocol-agnostic; the wire representation lives in
//! `infrastructure::dto::websocket`.

use serde_json::Value;

use super::{
    entity::{DirectMessage, SpotMessage, UserCard},
    value_object::{ConversationId, SpotId, Timestamp, UserId},
};

/// Outbound event
#[derive(Debug, Clone, PartialEq)]
pub enum OutboundEvent {
    /// `chatMessage`
    SpotMessage(SpotMessage),
    /// `userCountUpdate`
    SpotOccupancy { spot_id: SpotId, user_count: usize },
    /// `directMessage`
    DirectMessage(DirectMessage),
    /// `directUserCountUpdate`
    DirectOccupancy {
        conversation_id: ConversationId,
        user_count: usize,
    },
    /// `directChatInvite`
    DirectChatInvite(DirectChatInvite),
    /// `directMessageNotification`
    DirectMessageNotification(DirectMessageNotification),
    /// `directError`
    DirectError { message: String },
    /// `error`
    Error { message: String },
}

/// Tells a user that someone opened a conversation with them
#[derive(Debug, Clone, PartialEq)]
pub struct DirectChatInvite {
    pub conversation_id: ConversationId,
    pub from_user: UserCard,
    /// The invited user as the inviter sees them
    pub to_user: UserCard,
    pub created_at: Timestamp,
    /// Opaque client metadata, echoed back unchanged
    pub metadata: Value,
}

/// Out-of-room notice that a direct message was sent
#[derive(Debug, Clone, PartialEq)]
pub struct DirectMessageNotification {
    pub conversation_id: ConversationId,
    pub from_user: UserCard,
    pub body: String,
    pub sent_at: Timestamp,
    pub to_user_id: Option<UserId>,
    /// Set on the copy sent to the sender's own other connections
    pub is_self: bool,
}
