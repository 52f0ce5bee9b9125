//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - 接続ごとの `UnboundedSender` を管理
//! - イベントを JSON にエンコードして送信（push_to, broadcast）
//!
//! ## 設計ノート
//!
//! WebSocket の生成は UI 層（`ui/handler/websocket.rs`）で行われます。
//! この実装は生成された `UnboundedSender` を受け取り、送信だけを担当します。
//! 送信チャンネルは unbounded なので、ブロードキャスト中に待機することはありません。

use async_trait::async_trait;
use dashmap::DashMap;

use crate::{
    domain::{ConnectionId, MessagePushError, MessagePusher, OutboundEvent, PusherChannel},
    infrastructure::dto::websocket::encode_event,
};

/// WebSocket を使った MessagePusher 実装
///
/// ## 使用例
///
/// ```ignore
/// let pusher = WebSocketMessagePusher::new();
/// pusher.register_connection(connection_id.clone(), tx).await;
/// pusher.push_to(&connection_id, &event).await?;
/// ```
#[derive(Default)]
pub struct WebSocketMessagePusher {
    /// 接続中のコネクションと対応する WebSocket sender のマップ
    connections: DashMap<ConnectionId, PusherChannel>,
}

impl WebSocketMessagePusher {
    pub fn new() -> Self {
        Self::default()
    }

    /// 登録中の接続数
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    fn send_encoded(&self, connection_id: &ConnectionId, frame: String) -> Result<(), MessagePushError> {
        let sender = self
            .connections
            .get(connection_id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| MessagePushError::ConnectionNotFound(connection_id.to_string()))?;

        sender
            .send(frame)
            .map_err(|e| MessagePushError::PushFailed(e.to_string()))
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_connection(&self, connection_id: ConnectionId, sender: PusherChannel) {
        tracing::debug!("Connection '{}' registered to MessagePusher", connection_id);
        self.connections.insert(connection_id, sender);
    }

    async fn unregister_connection(&self, connection_id: &ConnectionId) {
        self.connections.remove(connection_id);
        tracing::debug!("Connection '{}' unregistered from MessagePusher", connection_id);
    }

    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        event: &OutboundEvent,
    ) -> Result<(), MessagePushError> {
        let frame = encode_event(event).map_err(|e| MessagePushError::EncodeFailed(e.to_string()))?;
        self.send_encoded(connection_id, frame)?;
        tracing::debug!("Pushed event to connection '{}'", connection_id);
        Ok(())
    }

    async fn broadcast(
        &self,
        targets: Vec<ConnectionId>,
        event: &OutboundEvent,
    ) -> Result<usize, MessagePushError> {
        if targets.is_empty() {
            return Ok(0);
        }

        let frame = encode_event(event).map_err(|e| MessagePushError::EncodeFailed(e.to_string()))?;

        let mut delivered = 0;
        for target in targets {
            // ブロードキャストでは一部の送信失敗を許容
            match self.send_encoded(&target, frame.clone()) {
                Ok(()) => delivered += 1,
                Err(MessagePushError::ConnectionNotFound(_)) => {
                    tracing::debug!("Connection '{}' gone during broadcast, skipping", target);
                }
                Err(e) => {
                    tracing::warn!("Failed to push to connection '{}': {}", target, e);
                }
            }
        }

        Ok(delivered)
    }
}
