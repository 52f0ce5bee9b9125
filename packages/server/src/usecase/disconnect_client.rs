//! UseCase: 切断処理
//!
//! 接続が参加していた全てのルームと Presence の登録を巻き戻します。
//!
//! 順序:
//! 1. スポットからの退出（left メッセージと人数更新）
//! 2. 全てのダイレクトチャットからの退出（disconnected メッセージと人数更新）
//! 3. PresenceRegistry からの登録解除
//! 4. MessagePusher からの送信チャンネルの削除
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectClientUseCase::execute() メソッド
//! - 切断後にどのルーム・レジストリにも接続が残らないこと
//!
//! ### どのような状況を想定しているか
//! - 正常系：スポットと複数の会話に参加中の切断、3人のスポットからの切断
//! - エッジケース：何にも参加していない接続の切断、同じユーザーの他の接続

use std::sync::Arc;

use hiroba_shared::time::timestamp_to_rfc3339;

use crate::domain::{ConnectionState, ConversationId, MessagePusher, PresenceRegistry, SpotId, UserId};

use super::{direct_chat::DirectChatUseCase, spot_chat::SpotChatUseCase};

/// 切断処理で巻き戻した内容
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisconnectReport {
    pub left_spot: Option<SpotId>,
    pub left_conversations: Vec<ConversationId>,
    pub user_id: Option<UserId>,
}

/// 切断のユースケース
pub struct DisconnectClientUseCase {
    spot_chat: Arc<SpotChatUseCase>,
    direct_chat: Arc<DirectChatUseCase>,
    presence: Arc<dyn PresenceRegistry>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl DisconnectClientUseCase {
    pub fn new(
        spot_chat: Arc<SpotChatUseCase>,
        direct_chat: Arc<DirectChatUseCase>,
        presence: Arc<dyn PresenceRegistry>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            spot_chat,
            direct_chat,
            presence,
            message_pusher,
        }
    }

    /// 接続の全ての登録を解除する
    ///
    /// # Arguments
    ///
    /// * `connection` - 切断された接続の状態（所有権ごと受け取る）
    pub async fn execute(&self, mut connection: ConnectionState) -> DisconnectReport {
        let left_spot = self.spot_chat.leave(&mut connection).await;

        let left_conversations: Vec<ConversationId> =
            connection.conversations().iter().cloned().collect();
        self.direct_chat.disconnect(&mut connection).await;

        let user_id = self.presence.unregister(connection.id()).await;
        self.message_pusher
            .unregister_connection(connection.id())
            .await;

        tracing::info!(
            "Connection '{}' detached (user: {}, spot: {}, conversations: {}, connected since {})",
            connection.id(),
            user_id.as_ref().map(UserId::as_str).unwrap_or("-"),
            left_spot.as_ref().map(SpotId::as_str).unwrap_or("-"),
            left_conversations.len(),
            timestamp_to_rfc3339(connection.connected_at().value())
        );

        DisconnectReport {
            left_spot,
            left_conversations,
            user_id,
        }
    }
}
