//! WebSocket message DTOs.
//!
//! Every text frame is an envelope `{"event": "<name>", "data": <payload>}`
//! in both directions. Payload fields are camelCase.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::domain::OutboundEvent;

// ========================================
// Inbound (client → server)
// ========================================

/// Event sent by a client
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ClientEvent {
    SetNickname(SetNicknamePayload),
    JoinSpotChat(JoinSpotChatPayload),
    LeaveSpotChat,
    ChatMessage(String),
    JoinDirectChat(JoinDirectChatPayload),
    LeaveDirectChat(LeaveDirectChatPayload),
    SendDirectMessage(SendDirectMessagePayload),
}

/// `setNickname` accepts either a bare string (legacy clients) or an object
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SetNicknamePayload {
    Legacy(String),
    Detailed(NicknameDetails),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NicknameDetails {
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default, deserialize_with = "optional_string_or_number")]
    pub user_id: Option<String>,
    /// Absent keeps the current image, `null` clears it
    #[serde(default, deserialize_with = "present_or_null")]
    pub profile_image: Option<Option<String>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinSpotChatPayload {
    #[serde(deserialize_with = "string_or_number")]
    pub spot_id: String,
    #[serde(default)]
    pub spot_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantsPayload {
    #[serde(default, deserialize_with = "optional_string_or_number")]
    pub from_user_id: Option<String>,
    #[serde(default)]
    pub from_nickname: Option<String>,
    #[serde(default)]
    pub from_profile_image: Option<String>,
    #[serde(default)]
    pub from_major: Option<String>,
    #[serde(default)]
    pub from_hobby: Option<String>,
    #[serde(default, deserialize_with = "optional_string_or_number")]
    pub to_user_id: Option<String>,
    #[serde(default)]
    pub to_nickname: Option<String>,
    #[serde(default)]
    pub to_profile_image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinDirectChatPayload {
    #[serde(default, deserialize_with = "optional_string_or_number")]
    pub conversation_id: Option<String>,
    #[serde(default)]
    pub participants: ParticipantsPayload,
    #[serde(default)]
    pub notify_partner: bool,
    #[serde(default)]
    pub metadata: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveDirectChatPayload {
    #[serde(default, deserialize_with = "optional_string_or_number")]
    pub conversation_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendDirectMessagePayload {
    /// Derived from `senderId` and `recipientId` when absent
    #[serde(default, deserialize_with = "optional_string_or_number")]
    pub conversation_id: Option<String>,
    #[serde(default)]
    pub message: String,
    #[serde(default, deserialize_with = "optional_string_or_number")]
    pub sender_id: Option<String>,
    #[serde(default)]
    pub sender_nickname: Option<String>,
    #[serde(default, deserialize_with = "optional_string_or_number")]
    pub recipient_id: Option<String>,
    #[serde(default)]
    pub sender_profile_image: Option<String>,
}

/// Map ids sent as JSON numbers (database keys) to their string form
#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Integer(i64),
}

impl From<StringOrNumber> for String {
    fn from(value: StringOrNumber) -> Self {
        match value {
            StringOrNumber::String(s) => s,
            StringOrNumber::Integer(n) => n.to_string(),
        }
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    StringOrNumber::deserialize(deserializer).map(String::from)
}

fn optional_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<StringOrNumber>::deserialize(deserializer)?.map(String::from))
}

/// Distinguish an explicit `null` (`Some(None)`) from an absent field (`None`)
fn present_or_null<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

/// Parse one inbound text frame
pub fn decode_client_event(text: &str) -> Result<ClientEvent, serde_json::Error> {
    serde_json::from_str(text)
}

// ========================================
// Outbound (server → client)
// ========================================

/// Message type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    System,
    User,
}

/// Event sent to a client
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ServerEventDto {
    ChatMessage(SpotChatMessageDto),
    UserCountUpdate(SpotUserCountDto),
    DirectMessage(DirectMessageDto),
    DirectUserCountUpdate(DirectUserCountDto),
    DirectChatInvite(DirectChatInviteDto),
    DirectMessageNotification(DirectMessageNotificationDto),
    DirectError(ErrorDto),
    Error(ErrorDto),
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpotChatMessageDto {
    pub r#type: MessageType,
    pub spot_id: String,
    pub message: String,
    /// `HH:MM`
    pub time: String,
    /// Unix milliseconds
    pub timestamp: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpotUserCountDto {
    pub spot_id: String,
    pub user_count: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectMessageDto {
    pub r#type: MessageType,
    pub conversation_id: String,
    pub message: String,
    pub time: String,
    pub timestamp: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_nickname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_profile_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectUserCountDto {
    pub conversation_id: String,
    pub user_count: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCardDto {
    pub id: String,
    pub nickname: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub major: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hobby: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectChatInviteDto {
    pub conversation_id: String,
    pub from_user: UserCardDto,
    pub to_user_id: String,
    pub to_user: UserCardDto,
    /// RFC 3339
    pub created_at: String,
    pub metadata: Value,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectMessageNotificationDto {
    pub conversation_id: String,
    pub from_user: UserCardDto,
    pub message: String,
    pub time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_user_id: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_self: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorDto {
    pub message: String,
}

/// Encode a domain event as one outbound text frame
pub fn encode_event(event: &OutboundEvent) -> Result<String, serde_json::Error> {
    serde_json::to_string(&ServerEventDto::from(event))
}
