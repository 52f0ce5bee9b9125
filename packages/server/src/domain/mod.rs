//! Domain layer: value objects, entities, outbound events and the
//! interfaces the use cases depend on.

pub mod entity;
pub mod error;
pub mod event;
pub mod message_pusher;
pub mod presence;
pub mod room;
pub mod value_object;

pub use entity::{
    ActiveSpot, ConnectionState, DirectMessage, MessageKind, ParticipantProfile, Sender,
    SpotMessage, UserCard,
};
pub use error::{MessagePushError, ValueObjectError};
pub use event::{DirectChatInvite, DirectMessageNotification, OutboundEvent};
pub use message_pusher::{MessagePusher, PusherChannel};
#[cfg(test)]
pub use message_pusher::MockMessagePusher;
pub use presence::PresenceRegistry;
pub use room::{OccupancyRenderer, RoomMultiplexer};
pub use value_object::{
    ConnectionId, ConnectionIdFactory, ConversationId, DEFAULT_NICKNAME, MessageBody, Nickname,
    RoomKey, SpotId, Timestamp, UserId,
};
