//! InMemory PresenceRegistry 実装
//!
//! `DashMap` をキー単位でシャーディングされたインメモリストアとして使用します。
//! 無関係なユーザーの登録・解除が同じロックで直列化されることはありません。
//!
//! 逆引き（接続 → ユーザー）を持つことで、`unregister` は接続 ID だけで完結します。

use std::collections::HashSet;

use async_trait::async_trait;
use dashmap::{DashMap, mapref::entry::Entry};

use crate::domain::{ConnectionId, PresenceRegistry, UserId};

/// インメモリ PresenceRegistry 実装
#[derive(Default)]
pub struct InMemoryPresenceRegistry {
    /// user_id -> 接続集合（空集合は保持しない）
    connections_by_user: DashMap<UserId, HashSet<ConnectionId>>,
    /// connection_id -> user_id
    user_by_connection: DashMap<ConnectionId, UserId>,
}

impl InMemoryPresenceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn detach(&self, user_id: &UserId, connection_id: &ConnectionId) {
        if let Entry::Occupied(mut entry) = self.connections_by_user.entry(user_id.clone()) {
            entry.get_mut().remove(connection_id);
            if entry.get().is_empty() {
                entry.remove();
                tracing::debug!("User '{}' has no live connections left", user_id);
            }
        }
    }
}

#[async_trait]
impl PresenceRegistry for InMemoryPresenceRegistry {
    async fn register(&self, user_id: UserId, connection_id: ConnectionId) {
        if let Some(previous) = self
            .user_by_connection
            .insert(connection_id.clone(), user_id.clone())
            && previous != user_id
        {
            self.detach(&previous, &connection_id);
            tracing::info!(
                "Connection '{}' rebound from user '{}' to '{}'",
                connection_id,
                previous,
                user_id
            );
        }

        self.connections_by_user
            .entry(user_id)
            .or_default()
            .insert(connection_id);
    }

    async fn unregister(&self, connection_id: &ConnectionId) -> Option<UserId> {
        let (_, user_id) = self.user_by_connection.remove(connection_id)?;
        self.detach(&user_id, connection_id);
        Some(user_id)
    }

    async fn connections_for(&self, user_id: &UserId) -> HashSet<ConnectionId> {
        self.connections_by_user
            .get(user_id)
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }
}
