//! Conversion logic between DTOs, domain types and use case commands.

use hiroba_shared::time::{format_time_of_day, timestamp_to_rfc3339};
use serde_json::Value;

use crate::{
    domain::{
        ConversationId, MessageKind, OutboundEvent, ParticipantProfile, SpotId, UserCard, UserId,
        ValueObjectError,
    },
    infrastructure::dto::{http, websocket as dto},
    usecase::{
        JoinDirectChatCommand, JoinSpotChatCommand, PresenceSummary, SendDirectMessageCommand,
        SetNicknameCommand, SpotOccupancy,
    },
};

/// Parse an optional client-supplied identifier; blank values count as absent.
fn optional_id<T>(raw: Option<String>) -> Option<T>
where
    T: TryFrom<String, Error = ValueObjectError>,
{
    raw.and_then(|value| T::try_from(value).ok())
}

// ========================================
// Inbound DTO → UseCase Command
// ========================================

impl From<dto::SetNicknamePayload> for SetNicknameCommand {
    fn from(payload: dto::SetNicknamePayload) -> Self {
        match payload {
            dto::SetNicknamePayload::Legacy(nickname) => Self {
                nickname: Some(nickname),
                ..Default::default()
            },
            dto::SetNicknamePayload::Detailed(details) => Self {
                nickname: details.nickname,
                user_id: optional_id(details.user_id),
                profile_image: details.profile_image,
            },
        }
    }
}

impl TryFrom<dto::JoinSpotChatPayload> for JoinSpotChatCommand {
    type Error = ValueObjectError;

    fn try_from(payload: dto::JoinSpotChatPayload) -> Result<Self, Self::Error> {
        Ok(Self {
            spot_id: SpotId::new(payload.spot_id)?,
            spot_name: payload.spot_name,
        })
    }
}

impl From<dto::JoinDirectChatPayload> for JoinDirectChatCommand {
    fn from(payload: dto::JoinDirectChatPayload) -> Self {
        let participants = payload.participants;
        Self {
            conversation_id: optional_id(payload.conversation_id),
            from: ParticipantProfile {
                user_id: optional_id(participants.from_user_id),
                nickname: participants.from_nickname,
                profile_image: participants.from_profile_image,
                major: participants.from_major,
                hobby: participants.from_hobby,
            },
            to_user_id: optional_id(participants.to_user_id),
            to_nickname: participants.to_nickname,
            to_profile_image: participants.to_profile_image,
            notify_partner: payload.notify_partner,
            metadata: payload.metadata.unwrap_or(Value::Null),
        }
    }
}

impl TryFrom<dto::LeaveDirectChatPayload> for ConversationId {
    type Error = ValueObjectError;

    fn try_from(payload: dto::LeaveDirectChatPayload) -> Result<Self, Self::Error> {
        ConversationId::new(payload.conversation_id.unwrap_or_default())
    }
}

impl From<dto::SendDirectMessagePayload> for SendDirectMessageCommand {
    fn from(payload: dto::SendDirectMessagePayload) -> Self {
        Self {
            conversation_id: optional_id(payload.conversation_id),
            message: payload.message,
            sender_id: optional_id(payload.sender_id),
            sender_nickname: payload.sender_nickname,
            sender_profile_image: payload.sender_profile_image,
            recipient_id: optional_id(payload.recipient_id),
        }
    }
}

// ========================================
// Domain Event → Outbound DTO
// ========================================

impl From<&UserCard> for dto::UserCardDto {
    fn from(card: &UserCard) -> Self {
        Self {
            id: card.id.as_str().to_string(),
            nickname: card.nickname.clone(),
            profile_image: card.profile_image.clone(),
            major: card.major.clone(),
            hobby: card.hobby.clone(),
        }
    }
}

fn message_type(kind: &MessageKind) -> dto::MessageType {
    match kind {
        MessageKind::System => dto::MessageType::System,
        MessageKind::User(_) => dto::MessageType::User,
    }
}

fn user_id_string(user_id: Option<&UserId>) -> Option<String> {
    user_id.map(|id| id.as_str().to_string())
}

impl From<&OutboundEvent> for dto::ServerEventDto {
    fn from(event: &OutboundEvent) -> Self {
        match event {
            OutboundEvent::SpotMessage(message) => {
                let sender = match &message.kind {
                    MessageKind::User(sender) => Some(sender),
                    MessageKind::System => None,
                };
                Self::ChatMessage(dto::SpotChatMessageDto {
                    r#type: message_type(&message.kind),
                    spot_id: message.spot_id.as_str().to_string(),
                    message: message.body.clone(),
                    time: format_time_of_day(message.sent_at.value()),
                    timestamp: message.sent_at.value(),
                    user: sender.map(|s| s.nickname.clone()),
                    user_id: sender.and_then(|s| user_id_string(s.user_id.as_ref())),
                    profile_image: sender.and_then(|s| s.profile_image.clone()),
                })
            }
            OutboundEvent::SpotOccupancy {
                spot_id,
                user_count,
            } => Self::UserCountUpdate(dto::SpotUserCountDto {
                spot_id: spot_id.as_str().to_string(),
                user_count: *user_count,
            }),
            OutboundEvent::DirectMessage(message) => {
                let sender = match &message.kind {
                    MessageKind::User(sender) => Some(sender),
                    MessageKind::System => None,
                };
                Self::DirectMessage(dto::DirectMessageDto {
                    r#type: message_type(&message.kind),
                    conversation_id: message.conversation_id.as_str().to_string(),
                    message: message.body.clone(),
                    time: format_time_of_day(message.sent_at.value()),
                    timestamp: message.sent_at.value(),
                    sender_id: sender.and_then(|s| user_id_string(s.user_id.as_ref())),
                    sender_nickname: sender.map(|s| s.nickname.clone()),
                    sender_profile_image: sender.and_then(|s| s.profile_image.clone()),
                    recipient_id: user_id_string(message.recipient_id.as_ref()),
                })
            }
            OutboundEvent::DirectOccupancy {
                conversation_id,
                user_count,
            } => Self::DirectUserCountUpdate(dto::DirectUserCountDto {
                conversation_id: conversation_id.as_str().to_string(),
                user_count: *user_count,
            }),
            OutboundEvent::DirectChatInvite(invite) => {
                Self::DirectChatInvite(dto::DirectChatInviteDto {
                    conversation_id: invite.conversation_id.as_str().to_string(),
                    from_user: (&invite.from_user).into(),
                    to_user_id: invite.to_user.id.as_str().to_string(),
                    to_user: (&invite.to_user).into(),
                    created_at: timestamp_to_rfc3339(invite.created_at.value()),
                    metadata: invite.metadata.clone(),
                })
            }
            OutboundEvent::DirectMessageNotification(notification) => {
                Self::DirectMessageNotification(dto::DirectMessageNotificationDto {
                    conversation_id: notification.conversation_id.as_str().to_string(),
                    from_user: (&notification.from_user).into(),
                    message: notification.body.clone(),
                    time: format_time_of_day(notification.sent_at.value()),
                    to_user_id: user_id_string(notification.to_user_id.as_ref()),
                    is_self: notification.is_self,
                })
            }
            OutboundEvent::DirectError { message } => Self::DirectError(dto::ErrorDto {
                message: message.clone(),
            }),
            OutboundEvent::Error { message } => Self::Error(dto::ErrorDto {
                message: message.clone(),
            }),
        }
    }
}

// ========================================
// UseCase Result → HTTP DTO
// ========================================

impl From<SpotOccupancy> for http::SpotSummaryDto {
    fn from(spot: SpotOccupancy) -> Self {
        Self {
            spot_id: spot.spot_id.into_string(),
            user_count: spot.user_count,
        }
    }
}

impl From<PresenceSummary> for http::PresenceDto {
    fn from(summary: PresenceSummary) -> Self {
        Self {
            online: summary.is_online(),
            connection_count: summary.connection_count,
            user_id: summary.user_id.into_string(),
        }
    }
}
