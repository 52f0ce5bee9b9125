//! InMemory RoomMultiplexer 実装
//!
//! ルームキー → メンバー集合を `DashMap` で保持し、ルームごとに
//! `tokio::sync::Mutex` を持ちます。
//!
//! - メンバー変更と配信は同じルームのロック内で行うため、同一ルーム内の
//!   イベントは受理順（FIFO）で各メンバーに届きます。
//! - 別のルーム同士は互いにブロックしません。
//! - 最後のメンバーが抜けたルームは `closed` にしてテーブルから取り除きます。
//!   閉じたルームのハンドルを掴んでいた join は新しいルームを作り直します。

use std::{collections::HashSet, sync::Arc};

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::Mutex;

use crate::domain::{ConnectionId, MessagePusher, OccupancyRenderer, OutboundEvent, RoomKey, RoomMultiplexer};

#[derive(Debug, Default)]
struct RoomMembers {
    members: HashSet<ConnectionId>,
    closed: bool,
}

type RoomHandle = Arc<Mutex<RoomMembers>>;

/// インメモリ RoomMultiplexer 実装
pub struct InMemoryRoomMultiplexer {
    rooms: DashMap<RoomKey, RoomHandle>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl InMemoryRoomMultiplexer {
    pub fn new(message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            rooms: DashMap::new(),
            message_pusher,
        }
    }

    fn handle(&self, room: &RoomKey) -> Option<RoomHandle> {
        self.rooms.get(room).map(|entry| entry.value().clone())
    }

    async fn deliver(&self, room: &RoomKey, targets: Vec<ConnectionId>, event: &OutboundEvent) -> usize {
        match self.message_pusher.broadcast(targets, event).await {
            Ok(delivered) => {
                tracing::debug!("Delivered event to {} member(s) of '{}'", delivered, room);
                delivered
            }
            Err(e) => {
                tracing::warn!("Failed to broadcast to '{}': {}", room, e);
                0
            }
        }
    }
}

#[async_trait]
impl RoomMultiplexer for InMemoryRoomMultiplexer {
    async fn join(&self, room: &RoomKey, connection_id: &ConnectionId) -> usize {
        loop {
            let handle = self.rooms.entry(room.clone()).or_default().clone();
            let mut state = handle.lock().await;
            if state.closed {
                continue;
            }
            state.members.insert(connection_id.clone());
            return state.members.len();
        }
    }

    async fn leave(&self, room: &RoomKey, connection_id: &ConnectionId) -> usize {
        let Some(handle) = self.handle(room) else {
            return 0;
        };

        let mut state = handle.lock().await;
        state.members.remove(connection_id);
        let remaining = state.members.len();
        if remaining == 0 && !state.closed {
            state.closed = true;
            self.rooms
                .remove_if(room, |_, current| Arc::ptr_eq(current, &handle));
            tracing::debug!("Room '{}' is empty and was closed", room);
        }
        remaining
    }

    async fn occupancy(&self, room: &RoomKey) -> usize {
        match self.handle(room) {
            Some(handle) => handle.lock().await.members.len(),
            None => 0,
        }
    }

    async fn is_member(&self, room: &RoomKey, connection_id: &ConnectionId) -> bool {
        match self.handle(room) {
            Some(handle) => handle.lock().await.members.contains(connection_id),
            None => false,
        }
    }

    async fn broadcast(
        &self,
        room: &RoomKey,
        event: &OutboundEvent,
        exclude: Option<&ConnectionId>,
    ) -> usize {
        let Some(handle) = self.handle(room) else {
            tracing::debug!("Broadcast to unknown room '{}' dropped", room);
            return 0;
        };

        let state = handle.lock().await;
        let targets: Vec<ConnectionId> = state
            .members
            .iter()
            .filter(|member| Some(*member) != exclude)
            .cloned()
            .collect();
        self.deliver(room, targets, event).await
    }

    async fn broadcast_occupancy(&self, room: &RoomKey, render: &OccupancyRenderer) -> usize {
        let Some(handle) = self.handle(room) else {
            return 0;
        };

        let state = handle.lock().await;
        let event = render(state.members.len());
        let targets: Vec<ConnectionId> = state.members.iter().cloned().collect();
        self.deliver(room, targets, &event).await
    }

    async fn rooms(&self) -> Vec<(RoomKey, usize)> {
        let handles: Vec<(RoomKey, RoomHandle)> = self
            .rooms
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();

        let mut rooms = Vec::with_capacity(handles.len());
        for (key, handle) in handles {
            let count = handle.lock().await.members.len();
            if count > 0 {
                rooms.push((key, count));
            }
        }
        rooms.sort_by(|a, b| a.0.cmp(&b.0));
        rooms
    }
}
