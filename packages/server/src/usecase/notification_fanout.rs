//! UseCase: ユーザー単位の通知ファンアウト
//!
//! ユーザー ID が持つ全ての接続にイベントを届けます（発信元の接続は除外可能）。
//! 接続が一つも無いユーザーへの通知は破棄されます。オフライン配信用の
//! キューはありません。

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher, OutboundEvent, PresenceRegistry, UserId};

/// 通知ファンアウト
pub struct NotificationFanout {
    presence: Arc<dyn PresenceRegistry>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl NotificationFanout {
    pub fn new(presence: Arc<dyn PresenceRegistry>, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            presence,
            message_pusher,
        }
    }

    /// Deliver `event` to every live connection of `user_id` except `exclude`.
    ///
    /// Returns the number of connections reached.
    pub async fn notify(
        &self,
        user_id: &UserId,
        event: &OutboundEvent,
        exclude: Option<&ConnectionId>,
    ) -> usize {
        let mut targets: Vec<ConnectionId> = self
            .presence
            .connections_for(user_id)
            .await
            .into_iter()
            .filter(|connection_id| Some(connection_id) != exclude)
            .collect();

        if targets.is_empty() {
            tracing::debug!("No live connections for user '{}', notification dropped", user_id);
            return 0;
        }
        targets.sort();

        match self.message_pusher.broadcast(targets, event).await {
            Ok(delivered) => {
                tracing::debug!("Notified user '{}' on {} connection(s)", user_id, delivered);
                delivered
            }
            Err(e) => {
                tracing::warn!("Failed to notify user '{}': {}", user_id, e);
                0
            }
        }
    }
}
