//! MessagePusher trait 定義
//!
//! 接続へのイベント送信のインターフェース。
//! 具体的な実装（WebSocket）は Infrastructure 層が提供します。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{ConnectionId, MessagePushError, OutboundEvent};

/// Outbound channel of one connection (already-encoded frames)
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// Delivers events to individual connections.
///
/// Delivery is fire-and-forget: a connection that went away between lookup
/// and send is skipped, never retried.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// 接続の送信チャンネルを登録
    async fn register_connection(&self, connection_id: ConnectionId, sender: PusherChannel);

    /// 接続の送信チャンネルを登録解除
    async fn unregister_connection(&self, connection_id: &ConnectionId);

    /// 単一の接続にイベントを送信
    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        event: &OutboundEvent,
    ) -> Result<(), MessagePushError>;

    /// 複数の接続にイベントを送信し、届いた接続数を返す
    ///
    /// Missing or closed targets are skipped; only encoding failures are errors.
    async fn broadcast(
        &self,
        targets: Vec<ConnectionId>,
        event: &OutboundEvent,
    ) -> Result<usize, MessagePushError>;
}
