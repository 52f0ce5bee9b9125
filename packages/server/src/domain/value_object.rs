//! Value objects.
//!
//! Identifiers arrive from clients as free-form strings; each one is trimmed
//! and rejected when empty so the rest of the crate never has to re-check.

use std::fmt;

use uuid::Uuid;

use super::error::ValueObjectError;

/// Nickname given to connections that never sent `setNickname`.
pub const DEFAULT_NICKNAME: &str = "Anonymous";

macro_rules! string_identifier {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(String);

        impl $name {
            /// Create a new identifier, trimming surrounding whitespace.
            pub fn new(value: impl Into<String>) -> Result<Self, ValueObjectError> {
                let value = value.into();
                let trimmed = value.trim();
                if trimmed.is_empty() {
                    return Err(ValueObjectError::Empty($label));
                }
                Ok(Self(trimmed.to_string()))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_string(self) -> String {
                self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValueObjectError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = ValueObjectError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_identifier!(
    /// Identifier of one open WebSocket connection
    ConnectionId,
    "connection id"
);

string_identifier!(
    /// Identity of a user as supplied by the trusted identity collaborator
    UserId,
    "user id"
);

string_identifier!(
    /// Location identifier used as a spot chat room key
    SpotId,
    "spot id"
);

string_identifier!(
    /// Identifier of a two-party direct conversation
    ConversationId,
    "conversation id"
);

string_identifier!(
    /// Display name of a connection
    Nickname,
    "nickname"
);

/// Generates fresh connection identifiers.
pub struct ConnectionIdFactory;

impl ConnectionIdFactory {
    pub fn generate() -> ConnectionId {
        ConnectionId(Uuid::new_v4().to_string())
    }
}

impl Nickname {
    /// Use `raw` when it is a usable nickname, otherwise fall back to `default`.
    pub fn or_default(raw: Option<&str>, default: &Nickname) -> Nickname {
        raw.and_then(|value| Nickname::new(value).ok())
            .unwrap_or_else(|| default.clone())
    }
}

impl Default for Nickname {
    fn default() -> Self {
        Self(DEFAULT_NICKNAME.to_string())
    }
}

impl ConversationId {
    /// Derive the conversation identifier for a pair of users.
    ///
    /// The pair is sorted lexicographically so both parties compute the same
    /// identifier independently.
    pub fn between(a: &UserId, b: &UserId) -> ConversationId {
        let (first, second) = if a <= b { (a, b) } else { (b, a) };
        ConversationId(format!("{}-{}", first.as_str(), second.as_str()))
    }

    /// Resolve the conversation identifier for a join request.
    ///
    /// An explicit identifier wins; otherwise it is derived from both
    /// participants. Returns `None` when neither is available.
    pub fn resolve(
        explicit: Option<&ConversationId>,
        from: Option<&UserId>,
        to: Option<&UserId>,
    ) -> Option<ConversationId> {
        match (explicit, from, to) {
            (Some(id), _, _) => Some(id.clone()),
            (None, Some(from), Some(to)) => Some(ConversationId::between(from, to)),
            _ => None,
        }
    }
}

/// Text body of a user message, trimmed and guaranteed non-empty
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageBody(String);

impl MessageBody {
    pub fn new(value: impl AsRef<str>) -> Result<Self, ValueObjectError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ValueObjectError::Empty("message"));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Unix timestamp in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(millis: i64) -> Self {
        Self(millis)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

/// Key of a room in the multiplexer.
///
/// Spot and direct rooms share one multiplexer, so the kind is part of the key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RoomKey {
    Spot(SpotId),
    Direct(ConversationId),
}

impl fmt::Display for RoomKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoomKey::Spot(id) => write!(f, "spot:{}", id),
            RoomKey::Direct(id) => write!(f, "direct:{}", id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str) -> UserId {
        UserId::new(id).unwrap()
    }

    #[test]
    fn test_identifier_is_trimmed() {
        // テスト項目: 識別子の前後の空白が除去される
        // given (前提条件):
        let raw = "  spot-42 ";

        // when (操作):
        let spot_id = SpotId::new(raw).unwrap();

        // then (期待する結果):
        assert_eq!(spot_id.as_str(), "spot-42");
    }

    #[test]
    fn test_empty_identifier_is_rejected() {
        // テスト項目: 空白のみの識別子はエラーになる
        // given (前提条件):
        let raw = "   ";

        // when (操作):
        let result = UserId::new(raw);

        // then (期待する結果):
        assert_eq!(result, Err(ValueObjectError::Empty("user id")));
    }

    #[test]
    fn test_conversation_id_is_symmetric() {
        // テスト項目: 参加者の順序に関係なく同じ会話 ID が導出される
        // given (前提条件):
        let alice = user("alice");
        let bob = user("bob");

        // when (操作):
        let forward = ConversationId::between(&alice, &bob);
        let backward = ConversationId::between(&bob, &alice);

        // then (期待する結果):
        assert_eq!(forward, backward);
        assert_eq!(forward.as_str(), "alice-bob");
    }

    #[test]
    fn test_conversation_id_sorts_lexicographically() {
        // テスト項目: 辞書順で小さい ID が先頭になる
        // given (前提条件):
        let zed = user("zed");
        let amy = user("amy");

        // when (操作):
        let id = ConversationId::between(&zed, &amy);

        // then (期待する結果):
        assert_eq!(id.as_str(), "amy-zed");
    }

    #[test]
    fn test_resolve_prefers_explicit_id() {
        // テスト項目: 明示的な会話 ID が参加者からの導出より優先される
        // given (前提条件):
        let explicit = ConversationId::new("room-7").unwrap();

        // when (操作):
        let resolved =
            ConversationId::resolve(Some(&explicit), Some(&user("alice")), Some(&user("bob")));

        // then (期待する結果):
        assert_eq!(resolved, Some(explicit));
    }

    #[test]
    fn test_resolve_without_partner_fails() {
        // テスト項目: 会話 ID も相手も無い場合は解決できない
        // given (前提条件):
        let alice = user("alice");

        // when (操作):
        let resolved = ConversationId::resolve(None, Some(&alice), None);

        // then (期待する結果):
        assert_eq!(resolved, None);
    }

    #[test]
    fn test_message_body_rejects_whitespace() {
        // テスト項目: 空白のみのメッセージは作成できない
        // given (前提条件):

        // when (操作):
        let result = MessageBody::new(" \n\t ");

        // then (期待する結果):
        assert!(result.is_err());
        assert_eq!(MessageBody::new("  hi ").unwrap().as_str(), "hi");
    }

    #[test]
    fn test_nickname_falls_back_to_default() {
        // テスト項目: 使えないニックネームはデフォルトに置き換えられる
        // given (前提条件):
        let default = Nickname::default();

        // when (操作):
        let blank = Nickname::or_default(Some("  "), &default);
        let missing = Nickname::or_default(None, &default);
        let given = Nickname::or_default(Some("Kai"), &default);

        // then (期待する結果):
        assert_eq!(blank.as_str(), DEFAULT_NICKNAME);
        assert_eq!(missing.as_str(), DEFAULT_NICKNAME);
        assert_eq!(given.as_str(), "Kai");
    }

    #[test]
    fn test_room_key_display_includes_kind() {
        // テスト項目: ルームキーの表示に種別が含まれる
        // given (前提条件):
        let spot = RoomKey::Spot(SpotId::new("lib").unwrap());
        let direct = RoomKey::Direct(ConversationId::new("alice-bob").unwrap());

        // when (操作):
        let spot_str = spot.to_string();
        let direct_str = direct.to_string();

        // then (期待する結果):
        assert_eq!(spot_str, "spot:lib");
        assert_eq!(direct_str, "direct:alice-bob");
    }
}
