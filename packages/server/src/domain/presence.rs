//! PresenceRegistry trait 定義
//!
//! ユーザー ID から接続中のコネクション集合へのマッピング。
//! 通知のファンアウトはすべてこのインターフェースを経由します。

use std::collections::HashSet;

use async_trait::async_trait;

use super::{ConnectionId, UserId};

/// Maps a user identity to the set of its live connections.
///
/// Invariant: a user key exists iff at least one connection is registered
/// under it. Entries are deleted, never left empty.
#[async_trait]
pub trait PresenceRegistry: Send + Sync {
    /// Bind `connection_id` to `user_id`.
    ///
    /// Idempotent. A connection already bound to another identity is
    /// unbound from it first.
    async fn register(&self, user_id: UserId, connection_id: ConnectionId);

    /// Remove the connection from whichever identity holds it.
    ///
    /// Returns the identity it was bound to; unknown connections are a no-op.
    async fn unregister(&self, connection_id: &ConnectionId) -> Option<UserId>;

    /// Live connections of `user_id` (empty when unknown).
    async fn connections_for(&self, user_id: &UserId) -> HashSet<ConnectionId>;
}
