//! UseCase: ダイレクトチャット
//!
//! 二者間の会話ルーム。会話 ID は明示的に指定されるか、参加者のユーザー ID
//! を辞書順に並べて導出されます。ルーム外にいる相手には
//! NotificationFanout 経由で招待と新着通知を届けます。
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - join / leave / send / disconnect と、ルーム内外に届くイベント
//!
//! ### どのような状況を想定しているか
//! - 正常系：会話 ID の導出、招待、メッセージ送信と通知
//! - 異常系：会話 ID を解決できない、未参加の会話への送信
//! - エッジケース：再参加、自分宛てのメッセージ、複数端末の同期

use std::sync::Arc;

use hiroba_shared::time::Clock;
use serde_json::Value;

use crate::domain::{
    ConnectionState, ConversationId, DirectChatInvite, DirectMessage, DirectMessageNotification,
    MessageBody, MessageKind, OutboundEvent, ParticipantProfile, PresenceRegistry, RoomKey,
    RoomMultiplexer, Sender, Timestamp, UserCard, UserId,
};

use super::{error::DirectChatError, notification_fanout::NotificationFanout, set_nickname::bind_identity};

/// `joinDirectChat` の入力
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JoinDirectChatCommand {
    pub conversation_id: Option<ConversationId>,
    pub from: ParticipantProfile,
    pub to_user_id: Option<UserId>,
    pub to_nickname: Option<String>,
    pub to_profile_image: Option<String>,
    pub notify_partner: bool,
    pub metadata: Value,
}

/// `sendDirectMessage` の入力
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SendDirectMessageCommand {
    pub conversation_id: Option<ConversationId>,
    pub message: String,
    pub sender_id: Option<UserId>,
    pub sender_nickname: Option<String>,
    pub sender_profile_image: Option<String>,
    pub recipient_id: Option<UserId>,
}

/// ダイレクトチャットのユースケース
pub struct DirectChatUseCase {
    rooms: Arc<dyn RoomMultiplexer>,
    presence: Arc<dyn PresenceRegistry>,
    fanout: Arc<NotificationFanout>,
    clock: Arc<dyn Clock>,
}

impl DirectChatUseCase {
    pub fn new(
        rooms: Arc<dyn RoomMultiplexer>,
        presence: Arc<dyn PresenceRegistry>,
        fanout: Arc<NotificationFanout>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            rooms,
            presence,
            fanout,
            clock,
        }
    }

    /// Join a direct conversation room.
    ///
    /// Returns the resolved conversation id.
    pub async fn join(
        &self,
        connection: &mut ConnectionState,
        command: JoinDirectChatCommand,
    ) -> Result<ConversationId, DirectChatError> {
        let from_user_id = command
            .from
            .user_id
            .clone()
            .or_else(|| connection.user_id().cloned());
        let conversation_id = ConversationId::resolve(
            command.conversation_id.as_ref(),
            from_user_id.as_ref(),
            command.to_user_id.as_ref(),
        )
        .ok_or(DirectChatError::InvalidConversation)?;

        if let Some(user_id) = command.from.user_id.clone() {
            bind_identity(self.presence.as_ref(), connection, user_id).await;
        }

        let room = RoomKey::Direct(conversation_id.clone());
        let newly_joined = connection.track_conversation(conversation_id.clone());
        let occupancy = self.rooms.join(&room, connection.id()).await;

        if newly_joined {
            let display_name = display_name(command.from.nickname.as_deref(), connection);
            let joined = DirectMessage::system(
                conversation_id.clone(),
                format!("{} joined the chat", display_name),
                self.now(),
            );
            self.rooms
                .broadcast(&room, &OutboundEvent::DirectMessage(joined), None)
                .await;
            tracing::info!(
                "Connection '{}' joined conversation '{}' ({} present)",
                connection.id(),
                conversation_id,
                occupancy
            );
        }
        self.rooms
            .broadcast_occupancy(&room, &occupancy_of(conversation_id.clone()))
            .await;

        if command.notify_partner {
            self.invite_partner(connection, &conversation_id, from_user_id, &command)
                .await;
        }

        Ok(conversation_id)
    }

    /// Leave a direct conversation room.
    ///
    /// Returns `false` when the connection was not tracking the conversation.
    pub async fn leave(&self, connection: &mut ConnectionState, conversation_id: &ConversationId) -> bool {
        if !connection.untrack_conversation(conversation_id) {
            tracing::debug!(
                "Connection '{}' is not in conversation '{}'",
                connection.id(),
                conversation_id
            );
            return false;
        }

        self.vacate(
            connection,
            conversation_id,
            format!("{} left the chat", connection.nickname()),
        )
        .await;
        true
    }

    /// Send a user message to a joined conversation and notify both parties'
    /// other connections.
    ///
    /// Whitespace-only bodies are dropped silently. Returns the number of
    /// room members the message reached.
    pub async fn send(
        &self,
        connection: &ConnectionState,
        command: SendDirectMessageCommand,
    ) -> Result<usize, DirectChatError> {
        let sender_id = command
            .sender_id
            .clone()
            .or_else(|| connection.user_id().cloned());
        let conversation_id = ConversationId::resolve(
            command.conversation_id.as_ref(),
            sender_id.as_ref(),
            command.recipient_id.as_ref(),
        )
        .ok_or(DirectChatError::InvalidConversation)?;

        let room = RoomKey::Direct(conversation_id.clone());
        if !connection.is_in_conversation(&conversation_id)
            || !self.rooms.is_member(&room, connection.id()).await
        {
            return Err(DirectChatError::NotInRoom);
        }

        let Ok(body) = MessageBody::new(&command.message) else {
            tracing::debug!("Empty direct message from '{}' dropped", connection.id());
            return Ok(0);
        };

        let sent_at = self.now();
        let nickname = display_name(command.sender_nickname.as_deref(), connection);
        let profile_image = command
            .sender_profile_image
            .clone()
            .or_else(|| connection.profile_image().map(str::to_string));

        let message = DirectMessage {
            conversation_id: conversation_id.clone(),
            kind: MessageKind::User(Sender {
                user_id: sender_id.clone(),
                nickname: nickname.clone(),
                profile_image: profile_image.clone(),
            }),
            body: body.as_str().to_string(),
            sent_at,
            recipient_id: command.recipient_id.clone(),
        };
        let delivered = self
            .rooms
            .broadcast(&room, &OutboundEvent::DirectMessage(message), None)
            .await;

        let Some(sender_id) = sender_id else {
            tracing::debug!(
                "Direct message from anonymous connection '{}', notifications skipped",
                connection.id()
            );
            return Ok(delivered);
        };

        let notification = DirectMessageNotification {
            conversation_id,
            from_user: UserCard {
                id: sender_id.clone(),
                nickname,
                profile_image,
                major: None,
                hobby: None,
            },
            body: body.into_string(),
            sent_at,
            to_user_id: command.recipient_id.clone(),
            is_self: false,
        };

        if let Some(recipient_id) = command.recipient_id.as_ref().filter(|id| **id != sender_id) {
            self.fanout
                .notify(
                    recipient_id,
                    &OutboundEvent::DirectMessageNotification(notification.clone()),
                    Some(connection.id()),
                )
                .await;
        }

        let self_sync = DirectMessageNotification {
            is_self: true,
            ..notification
        };
        self.fanout
            .notify(
                &sender_id,
                &OutboundEvent::DirectMessageNotification(self_sync),
                Some(connection.id()),
            )
            .await;

        Ok(delivered)
    }

    /// Leave every conversation the connection tracks.
    ///
    /// Returns the number of conversations left.
    pub async fn disconnect(&self, connection: &mut ConnectionState) -> usize {
        let conversations = connection.take_conversations();
        let body = format!("{} disconnected", connection.nickname());
        for conversation_id in &conversations {
            self.vacate(connection, conversation_id, body.clone()).await;
        }
        conversations.len()
    }

    async fn vacate(&self, connection: &ConnectionState, conversation_id: &ConversationId, body: String) {
        let room = RoomKey::Direct(conversation_id.clone());

        let left = DirectMessage::system(conversation_id.clone(), body, self.now());
        self.rooms
            .broadcast(&room, &OutboundEvent::DirectMessage(left), Some(connection.id()))
            .await;

        let remaining = self.rooms.leave(&room, connection.id()).await;
        self.rooms
            .broadcast_occupancy(&room, &occupancy_of(conversation_id.clone()))
            .await;

        tracing::info!(
            "Connection '{}' left conversation '{}' ({} remaining)",
            connection.id(),
            conversation_id,
            remaining
        );
    }

    async fn invite_partner(
        &self,
        connection: &ConnectionState,
        conversation_id: &ConversationId,
        from_user_id: Option<UserId>,
        command: &JoinDirectChatCommand,
    ) {
        let (Some(from_user_id), Some(to_user_id)) = (from_user_id, command.to_user_id.clone()) else {
            tracing::warn!(
                "Invite for conversation '{}' skipped: both participants are required",
                conversation_id
            );
            return;
        };
        if from_user_id == to_user_id {
            return;
        }

        let from_user = UserCard {
            id: from_user_id,
            nickname: display_name(command.from.nickname.as_deref(), connection),
            profile_image: command
                .from
                .profile_image
                .clone()
                .or_else(|| connection.profile_image().map(str::to_string)),
            major: command.from.major.clone(),
            hobby: command.from.hobby.clone(),
        };
        let to_user = UserCard {
            id: to_user_id.clone(),
            nickname: command
                .to_nickname
                .as_deref()
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .unwrap_or(to_user_id.as_str())
                .to_string(),
            profile_image: command.to_profile_image.clone(),
            major: None,
            hobby: None,
        };
        let invite = DirectChatInvite {
            conversation_id: conversation_id.clone(),
            from_user,
            to_user,
            created_at: self.now(),
            metadata: command.metadata.clone(),
        };

        let delivered = self
            .fanout
            .notify(
                &to_user_id,
                &OutboundEvent::DirectChatInvite(invite),
                Some(connection.id()),
            )
            .await;
        tracing::info!(
            "Invite for conversation '{}' sent to user '{}' ({} connection(s))",
            conversation_id,
            to_user_id,
            delivered
        );
    }

    fn now(&self) -> Timestamp {
        Timestamp::new(self.clock.now_millis())
    }
}

/// Client-supplied display name when usable, otherwise the connection's nickname.
fn display_name(supplied: Option<&str>, connection: &ConnectionState) -> String {
    supplied
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or(connection.nickname().as_str())
        .to_string()
}

fn occupancy_of(conversation_id: ConversationId) -> impl Fn(usize) -> OutboundEvent + Send + Sync {
    move |user_count| OutboundEvent::DirectOccupancy {
        conversation_id: conversation_id.clone(),
        user_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecase::test_support::{Harness, TestClient};
    use serde_json::json;

    fn user(id: &str) -> UserId {
        UserId::new(id).unwrap()
    }

    fn conversation(id: &str) -> ConversationId {
        ConversationId::new(id).unwrap()
    }

    fn join_between(from: &str, to: &str, notify_partner: bool) -> JoinDirectChatCommand {
        JoinDirectChatCommand {
            from: ParticipantProfile {
                user_id: Some(user(from)),
                nickname: Some(from.to_uppercase()),
                major: Some("Physics".to_string()),
                ..Default::default()
            },
            to_user_id: Some(user(to)),
            notify_partner,
            metadata: json!({"source": "map"}),
            ..Default::default()
        }
    }

    fn message(conversation_id: &str, body: &str, sender: &str, recipient: &str) -> SendDirectMessageCommand {
        SendDirectMessageCommand {
            conversation_id: Some(conversation(conversation_id)),
            message: body.to_string(),
            sender_id: Some(user(sender)),
            sender_nickname: Some(sender.to_uppercase()),
            sender_profile_image: None,
            recipient_id: Some(user(recipient)),
        }
    }

    async fn join_and_drain(usecase: &DirectChatUseCase, client: &mut TestClient, command: JoinDirectChatCommand) {
        usecase.join(&mut client.state, command).await.unwrap();
        client.drain();
    }

    #[tokio::test]
    async fn test_join_derives_sorted_conversation_id() {
        // テスト項目: 会話 ID が参加者の辞書順で導出される
        // given (前提条件):
        let harness = Harness::new();
        let usecase = harness.direct_chat();
        let mut zed = harness.connect("c1", "Zed").await;

        // when (操作):
        let conversation_id = usecase
            .join(&mut zed.state, join_between("zed", "amy", false))
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(conversation_id.as_str(), "amy-zed");
        assert!(zed.state.is_in_conversation(&conversation_id));
        let frames = zed.drain();
        assert_eq!(frames[0]["event"], "directMessage");
        assert_eq!(frames[0]["data"]["type"], "system");
        assert_eq!(frames[0]["data"]["message"], "ZED joined the chat");
        assert_eq!(frames[1]["event"], "directUserCountUpdate");
        assert_eq!(frames[1]["data"]["conversationId"], "amy-zed");
        assert_eq!(frames[1]["data"]["userCount"], 1);
    }

    #[tokio::test]
    async fn test_join_binds_presence_identity() {
        // テスト項目: fromUserId を指定した参加で接続がユーザーに紐付けられる
        // given (前提条件):
        let harness = Harness::new();
        let usecase = harness.direct_chat();
        let mut client = harness.connect("c1", "Alice").await;

        // when (操作):
        usecase
            .join(&mut client.state, join_between("alice", "bob", false))
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(client.state.user_id(), Some(&user("alice")));
        assert!(
            harness
                .presence
                .connections_for(&user("alice"))
                .await
                .contains(client.state.id())
        );
    }

    #[tokio::test]
    async fn test_join_without_participants_is_invalid() {
        // テスト項目: 会話 ID も相手も無い参加は InvalidConversation になる
        // given (前提条件):
        let harness = Harness::new();
        let usecase = harness.direct_chat();
        let mut client = harness.connect("c1", "Alice").await;

        // when (操作):
        let result = usecase
            .join(&mut client.state, JoinDirectChatCommand::default())
            .await;

        // then (期待する結果):
        assert_eq!(result, Err(DirectChatError::InvalidConversation));
        assert!(client.state.conversations().is_empty());
        assert!(client.drain().is_empty());
    }

    #[tokio::test]
    async fn test_join_with_notify_partner_invites_partner() {
        // テスト項目: notifyPartner 付きの参加で相手の全接続に招待が届く
        // given (前提条件):
        let harness = Harness::new();
        let usecase = harness.direct_chat();
        let mut alice = harness.connect_as("c1", "Alice", "alice").await;
        let mut bob_phone = harness.connect_as("c2", "Bob", "bob").await;
        let mut bob_laptop = harness.connect_as("c3", "Bob", "bob").await;

        // when (操作):
        usecase
            .join(&mut alice.state, join_between("alice", "bob", true))
            .await
            .unwrap();

        // then (期待する結果):
        for bob in [&mut bob_phone, &mut bob_laptop] {
            let frames = bob.drain();
            assert_eq!(frames.len(), 1);
            assert_eq!(frames[0]["event"], "directChatInvite");
            let invite = &frames[0]["data"];
            assert_eq!(invite["conversationId"], "alice-bob");
            assert_eq!(invite["fromUser"]["id"], "alice");
            assert_eq!(invite["fromUser"]["nickname"], "ALICE");
            assert_eq!(invite["fromUser"]["major"], "Physics");
            assert_eq!(invite["toUserId"], "bob");
            assert_eq!(invite["toUser"], json!({"id": "bob", "nickname": "bob"}));
            assert_eq!(invite["createdAt"], "2023-11-14T22:13:20+00:00");
            assert_eq!(invite["metadata"]["source"], "map");
        }
        assert_eq!(alice.drain_names(), vec!["directMessage", "directUserCountUpdate"]);
    }

    #[tokio::test]
    async fn test_invite_carries_partner_card() {
        // テスト項目: 招待には参加者が指定した相手の表示名と画像が載る
        // given (前提条件):
        let harness = Harness::new();
        let usecase = harness.direct_chat();
        let mut alice = harness.connect_as("c1", "Alice", "alice").await;
        let mut bob = harness.connect_as("c2", "Bob", "bob").await;
        let command = JoinDirectChatCommand {
            to_nickname: Some("Bobby".to_string()),
            to_profile_image: Some("https://img/bob.png".to_string()),
            ..join_between("alice", "bob", true)
        };

        // when (操作):
        usecase.join(&mut alice.state, command).await.unwrap();

        // then (期待する結果):
        let frames = bob.drain();
        assert_eq!(frames.len(), 1);
        assert_eq!(
            frames[0]["data"]["toUser"],
            json!({"id": "bob", "nickname": "Bobby", "profileImage": "https://img/bob.png"})
        );
    }

    #[tokio::test]
    async fn test_invite_to_self_is_not_sent() {
        // テスト項目: 自分自身との会話では招待を送らない
        // given (前提条件):
        let harness = Harness::new();
        let usecase = harness.direct_chat();
        let mut alice = harness.connect_as("c1", "Alice", "alice").await;
        let mut alice_other = harness.connect_as("c2", "Alice", "alice").await;

        // when (操作):
        usecase
            .join(&mut alice.state, join_between("alice", "alice", true))
            .await
            .unwrap();

        // then (期待する結果):
        assert!(alice_other.drain().is_empty());
    }

    #[tokio::test]
    async fn test_rejoin_skips_joined_message_but_still_invites() {
        // テスト項目: 再参加では joined メッセージを繰り返さず、招待は再送される
        // given (前提条件):
        let harness = Harness::new();
        let usecase = harness.direct_chat();
        let mut alice = harness.connect_as("c1", "Alice", "alice").await;
        let mut bob = harness.connect_as("c2", "Bob", "bob").await;
        join_and_drain(&usecase, &mut alice, join_between("alice", "bob", false)).await;

        // when (操作):
        usecase
            .join(&mut alice.state, join_between("alice", "bob", true))
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(alice.drain_names(), vec!["directUserCountUpdate"]);
        assert_eq!(bob.drain_names(), vec!["directChatInvite"]);
    }

    #[tokio::test]
    async fn test_send_reaches_room_and_notifies_recipient() {
        // テスト項目: メッセージはルーム全員に届き、相手の接続に通知が届く
        // given (前提条件):
        let harness = Harness::new();
        let usecase = harness.direct_chat();
        let mut alice = harness.connect_as("c1", "Alice", "alice").await;
        let mut bob_in_room = harness.connect_as("c2", "Bob", "bob").await;
        let mut bob_on_map = harness.connect_as("c3", "Bob", "bob").await;
        join_and_drain(&usecase, &mut alice, join_between("alice", "bob", false)).await;
        join_and_drain(&usecase, &mut bob_in_room, join_between("bob", "alice", false)).await;
        alice.drain();

        // when (操作):
        let delivered = usecase
            .send(&alice.state, message("alice-bob", " hi bob ", "alice", "bob"))
            .await;

        // then (期待する結果):
        assert_eq!(delivered, Ok(2));
        let room_frame = &alice.drain()[0];
        assert_eq!(room_frame["event"], "directMessage");
        assert_eq!(room_frame["data"]["type"], "user");
        assert_eq!(room_frame["data"]["message"], "hi bob");
        assert_eq!(room_frame["data"]["senderId"], "alice");
        assert_eq!(room_frame["data"]["recipientId"], "bob");

        assert_eq!(
            bob_in_room.drain_names(),
            vec!["directMessage", "directMessageNotification"]
        );
        let notice = &bob_on_map.drain()[0];
        assert_eq!(notice["event"], "directMessageNotification");
        assert_eq!(notice["data"]["fromUser"]["id"], "alice");
        assert_eq!(notice["data"]["message"], "hi bob");
        assert_eq!(notice["data"]["toUserId"], "bob");
        assert!(notice["data"].get("isSelf").is_none());
    }

    #[tokio::test]
    async fn test_send_without_conversation_id_derives_it() {
        // テスト項目: 会話 ID を省略した送信は送信者と受信者から導出したルームに届く
        // given (前提条件):
        let harness = Harness::new();
        let usecase = harness.direct_chat();
        let mut alice = harness.connect_as("c1", "Alice", "alice").await;
        let mut bob = harness.connect_as("c2", "Bob", "bob").await;
        join_and_drain(&usecase, &mut alice, join_between("alice", "bob", false)).await;
        join_and_drain(&usecase, &mut bob, join_between("bob", "alice", false)).await;
        alice.drain();

        // when (操作):
        let command = SendDirectMessageCommand {
            conversation_id: None,
            ..message("alice-bob", "no id needed", "alice", "bob")
        };
        let delivered = usecase.send(&alice.state, command).await;

        // then (期待する結果):
        assert_eq!(delivered, Ok(2));
        let frames = bob.drain();
        assert_eq!(frames[0]["event"], "directMessage");
        assert_eq!(frames[0]["data"]["conversationId"], "alice-bob");
        assert_eq!(frames[0]["data"]["message"], "no id needed");
    }

    #[tokio::test]
    async fn test_send_after_room_membership_is_gone_is_not_in_room() {
        // テスト項目: 接続が会話を追跡していてもルームのメンバーでなければ NotInRoom になる
        // given (前提条件):
        let harness = Harness::new();
        let usecase = harness.direct_chat();
        let mut alice = harness.connect_as("c1", "Alice", "alice").await;
        join_and_drain(&usecase, &mut alice, join_between("alice", "bob", false)).await;
        let room = RoomKey::Direct(conversation("alice-bob"));
        harness.rooms.leave(&room, alice.state.id()).await;

        // when (操作):
        let result = usecase
            .send(&alice.state, message("alice-bob", "hello?", "alice", "bob"))
            .await;

        // then (期待する結果):
        assert_eq!(result, Err(DirectChatError::NotInRoom));
        assert!(alice.state.is_in_conversation(&conversation("alice-bob")));
        assert!(alice.drain().is_empty());
    }

    #[tokio::test]
    async fn test_send_syncs_senders_other_connections() {
        // テスト項目: 送信者の他の接続には isSelf 付きの通知が届き、送信元には届かない
        // given (前提条件):
        let harness = Harness::new();
        let usecase = harness.direct_chat();
        let mut alice_tab = harness.connect_as("c1", "Alice", "alice").await;
        let mut alice_phone = harness.connect_as("c2", "Alice", "alice").await;
        join_and_drain(&usecase, &mut alice_phone, join_between("alice", "bob", false)).await;
        alice_tab.drain();

        // when (操作):
        usecase
            .send(&alice_phone.state, message("alice-bob", "hello", "alice", "bob"))
            .await
            .unwrap();

        // then (期待する結果):
        let frames = alice_tab.drain();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0]["event"], "directMessageNotification");
        assert_eq!(frames[0]["data"]["isSelf"], true);
        assert_eq!(alice_phone.drain_names(), vec!["directMessage"]);
    }

    #[tokio::test]
    async fn test_send_to_self_skips_recipient_notification() {
        // テスト項目: 送信者と受信者が同じ場合、通知は isSelf の1件のみ
        // given (前提条件):
        let harness = Harness::new();
        let usecase = harness.direct_chat();
        let mut alice = harness.connect_as("c1", "Alice", "alice").await;
        let mut alice_other = harness.connect_as("c2", "Alice", "alice").await;
        join_and_drain(&usecase, &mut alice, join_between("alice", "alice", false)).await;
        alice_other.drain();

        // when (操作):
        usecase
            .send(&alice.state, message("alice-alice", "memo", "alice", "alice"))
            .await
            .unwrap();

        // then (期待する結果):
        let frames = alice_other.drain();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0]["data"]["isSelf"], true);
    }

    #[tokio::test]
    async fn test_send_outside_room_is_not_in_room() {
        // テスト項目: 参加していない会話への送信は NotInRoom になる
        // given (前提条件):
        let harness = Harness::new();
        let usecase = harness.direct_chat();
        let alice = harness.connect_as("c1", "Alice", "alice").await;
        let mut bob = harness.connect_as("c2", "Bob", "bob").await;

        // when (操作):
        let result = usecase
            .send(&alice.state, message("alice-bob", "hello", "alice", "bob"))
            .await;

        // then (期待する結果):
        assert_eq!(result, Err(DirectChatError::NotInRoom));
        assert!(bob.drain().is_empty());
    }

    #[tokio::test]
    async fn test_send_empty_message_is_dropped() {
        // テスト項目: 空白のみのメッセージは通知も含めて破棄される
        // given (前提条件):
        let harness = Harness::new();
        let usecase = harness.direct_chat();
        let mut alice = harness.connect_as("c1", "Alice", "alice").await;
        let mut bob = harness.connect_as("c2", "Bob", "bob").await;
        join_and_drain(&usecase, &mut alice, join_between("alice", "bob", false)).await;

        // when (操作):
        let result = usecase
            .send(&alice.state, message("alice-bob", "  ", "alice", "bob"))
            .await;

        // then (期待する結果):
        assert_eq!(result, Ok(0));
        assert!(alice.drain().is_empty());
        assert!(bob.drain().is_empty());
    }

    #[tokio::test]
    async fn test_leave_notifies_remaining_member() {
        // テスト項目: 退出すると残るメンバーに left メッセージと人数更新が届く
        // given (前提条件):
        let harness = Harness::new();
        let usecase = harness.direct_chat();
        let mut alice = harness.connect_as("c1", "Alice", "alice").await;
        let mut bob = harness.connect_as("c2", "Bob", "bob").await;
        join_and_drain(&usecase, &mut alice, join_between("alice", "bob", false)).await;
        join_and_drain(&usecase, &mut bob, join_between("bob", "alice", false)).await;
        alice.drain();

        // when (操作):
        let left = usecase.leave(&mut bob.state, &conversation("alice-bob")).await;

        // then (期待する結果):
        assert!(left);
        let frames = alice.drain();
        assert_eq!(frames[0]["data"]["message"], "Bob left the chat");
        assert_eq!(frames[1]["event"], "directUserCountUpdate");
        assert_eq!(frames[1]["data"]["userCount"], 1);
        assert!(bob.drain().is_empty());
        assert!(!bob.state.is_in_conversation(&conversation("alice-bob")));
    }

    #[tokio::test]
    async fn test_leave_untracked_conversation_is_noop() {
        // テスト項目: 参加していない会話からの退出は何もしない
        // given (前提条件):
        let harness = Harness::new();
        let usecase = harness.direct_chat();
        let mut alice = harness.connect_as("c1", "Alice", "alice").await;

        // when (操作):
        let left = usecase.leave(&mut alice.state, &conversation("alice-bob")).await;

        // then (期待する結果):
        assert!(!left);
        assert!(alice.drain().is_empty());
    }

    #[tokio::test]
    async fn test_disconnect_leaves_every_conversation() {
        // テスト項目: 切断時に全ての会話へ disconnected メッセージが届き、ルームから外れる
        // given (前提条件):
        let harness = Harness::new();
        let usecase = harness.direct_chat();
        let mut alice = harness.connect_as("c1", "Alice", "alice").await;
        let mut bob = harness.connect_as("c2", "Bob", "bob").await;
        let mut carol = harness.connect_as("c3", "Carol", "carol").await;
        join_and_drain(&usecase, &mut alice, join_between("alice", "bob", false)).await;
        join_and_drain(&usecase, &mut alice, join_between("alice", "carol", false)).await;
        join_and_drain(&usecase, &mut bob, join_between("bob", "alice", false)).await;
        join_and_drain(&usecase, &mut carol, join_between("carol", "alice", false)).await;

        // when (操作):
        let left = usecase.disconnect(&mut alice.state).await;

        // then (期待する結果):
        assert_eq!(left, 2);
        assert!(alice.state.conversations().is_empty());
        for other in [&mut bob, &mut carol] {
            let frames = other.drain();
            assert_eq!(frames[0]["data"]["message"], "Alice disconnected");
            assert_eq!(frames[1]["data"]["userCount"], 1);
        }
        let room = RoomKey::Direct(conversation("alice-bob"));
        assert!(!harness.rooms.is_member(&room, alice.state.id()).await);
    }
}
