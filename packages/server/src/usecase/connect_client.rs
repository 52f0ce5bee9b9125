//! UseCase: 接続処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectClientUseCase::execute() メソッド
//! - 新しい接続に ID とデフォルトのニックネームが割り当てられること
//! - MessagePusher に送信チャンネルが登録されること
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規接続
//! - エッジケース：同時に複数の接続（ID が重複しない）

use std::sync::Arc;

use hiroba_shared::time::Clock;

use crate::domain::{
    ConnectionIdFactory, ConnectionState, MessagePusher, Nickname, PusherChannel, Timestamp,
};

/// 接続のユースケース
pub struct ConnectClientUseCase {
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
    default_nickname: Nickname,
}

impl ConnectClientUseCase {
    pub fn new(
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
        default_nickname: Nickname,
    ) -> Self {
        Self {
            message_pusher,
            clock,
            default_nickname,
        }
    }

    /// 接続を登録し、接続の状態を作成する
    ///
    /// # Arguments
    ///
    /// * `sender` - 接続へのメッセージ送信用チャンネル
    ///
    /// # Returns
    ///
    /// ハンドラタスクが所有する `ConnectionState`
    pub async fn execute(&self, sender: PusherChannel) -> ConnectionState {
        let connection_id = ConnectionIdFactory::generate();
        let connected_at = Timestamp::new(self.clock.now_millis());

        self.message_pusher
            .register_connection(connection_id.clone(), sender)
            .await;

        tracing::info!("Connection '{}' attached", connection_id);

        ConnectionState::new(connection_id, self.default_nickname.clone(), connected_at)
    }
}
