//! Domain entities.

use std::collections::BTreeSet;

use super::value_object::{
    ConnectionId, ConversationId, MessageBody, Nickname, SpotId, Timestamp, UserId,
};

/// Spot room a connection currently occupies
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveSpot {
    pub id: SpotId,
    pub name: String,
}

/// Per-connection state.
///
/// Owned exclusively by the connection's handler task. Use cases receive it
/// by `&mut` for the duration of one client event; nothing else holds it.
#[derive(Debug, Clone)]
pub struct ConnectionState {
    id: ConnectionId,
    nickname: Nickname,
    user_id: Option<UserId>,
    profile_image: Option<String>,
    spot: Option<ActiveSpot>,
    conversations: BTreeSet<ConversationId>,
    connected_at: Timestamp,
}

impl ConnectionState {
    pub fn new(id: ConnectionId, nickname: Nickname, connected_at: Timestamp) -> Self {
        Self {
            id,
            nickname,
            user_id: None,
            profile_image: None,
            spot: None,
            conversations: BTreeSet::new(),
            connected_at,
        }
    }

    pub fn id(&self) -> &ConnectionId {
        &self.id
    }

    pub fn nickname(&self) -> &Nickname {
        &self.nickname
    }

    pub fn user_id(&self) -> Option<&UserId> {
        self.user_id.as_ref()
    }

    pub fn profile_image(&self) -> Option<&str> {
        self.profile_image.as_deref()
    }

    pub fn spot(&self) -> Option<&ActiveSpot> {
        self.spot.as_ref()
    }

    pub fn conversations(&self) -> &BTreeSet<ConversationId> {
        &self.conversations
    }

    pub fn is_in_conversation(&self, conversation_id: &ConversationId) -> bool {
        self.conversations.contains(conversation_id)
    }

    pub fn connected_at(&self) -> Timestamp {
        self.connected_at
    }

    pub(crate) fn set_nickname(&mut self, nickname: Nickname) {
        self.nickname = nickname;
    }

    pub(crate) fn set_user_id(&mut self, user_id: UserId) {
        self.user_id = Some(user_id);
    }

    pub(crate) fn set_profile_image(&mut self, profile_image: Option<String>) {
        self.profile_image = profile_image;
    }

    pub(crate) fn enter_spot(&mut self, spot: ActiveSpot) {
        self.spot = Some(spot);
    }

    pub(crate) fn take_spot(&mut self) -> Option<ActiveSpot> {
        self.spot.take()
    }

    pub(crate) fn track_conversation(&mut self, conversation_id: ConversationId) -> bool {
        self.conversations.insert(conversation_id)
    }

    pub(crate) fn untrack_conversation(&mut self, conversation_id: &ConversationId) -> bool {
        self.conversations.remove(conversation_id)
    }

    pub(crate) fn take_conversations(&mut self) -> BTreeSet<ConversationId> {
        std::mem::take(&mut self.conversations)
    }

    /// Sender details for messages originating from this connection.
    pub fn as_sender(&self) -> Sender {
        Sender {
            user_id: self.user_id.clone(),
            nickname: self.nickname.as_str().to_string(),
            profile_image: self.profile_image.clone(),
        }
    }
}

/// One side of a direct conversation as described by the joining client
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParticipantProfile {
    pub user_id: Option<UserId>,
    pub nickname: Option<String>,
    pub profile_image: Option<String>,
    pub major: Option<String>,
    pub hobby: Option<String>,
}

/// Public profile summary attached to invites and notifications
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserCard {
    pub id: UserId,
    pub nickname: String,
    pub profile_image: Option<String>,
    pub major: Option<String>,
    pub hobby: Option<String>,
}

/// Author of a user message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sender {
    pub user_id: Option<UserId>,
    pub nickname: String,
    pub profile_image: Option<String>,
}

/// Whether a message narrates room lifecycle or was written by a user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageKind {
    System,
    User(Sender),
}

/// Message delivered to a spot room
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpotMessage {
    pub spot_id: SpotId,
    pub kind: MessageKind,
    pub body: String,
    pub sent_at: Timestamp,
}

impl SpotMessage {
    pub fn system(spot_id: SpotId, body: String, sent_at: Timestamp) -> Self {
        Self {
            spot_id,
            kind: MessageKind::System,
            body,
            sent_at,
        }
    }

    pub fn user(spot_id: SpotId, sender: Sender, body: MessageBody, sent_at: Timestamp) -> Self {
        Self {
            spot_id,
            kind: MessageKind::User(sender),
            body: body.into_string(),
            sent_at,
        }
    }
}

/// Message delivered to a direct conversation room
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectMessage {
    pub conversation_id: ConversationId,
    pub kind: MessageKind,
    pub body: String,
    pub sent_at: Timestamp,
    /// Only used for the out-of-room notification path
    pub recipient_id: Option<UserId>,
}

impl DirectMessage {
    pub fn system(conversation_id: ConversationId, body: String, sent_at: Timestamp) -> Self {
        Self {
            conversation_id,
            kind: MessageKind::System,
            body,
            sent_at,
            recipient_id: None,
        }
    }
}
