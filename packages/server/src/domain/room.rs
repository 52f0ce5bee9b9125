//! RoomMultiplexer trait 定義
//!
//! 名前付きルームへの参加・退出・ブロードキャストの汎用プリミティブ。
//! スポットチャットとダイレクトチャットの両方がこの上に構築されます。

use async_trait::async_trait;

use super::{ConnectionId, OutboundEvent, RoomKey};

/// Builds an occupancy event from the live member count.
pub type OccupancyRenderer = dyn Fn(usize) -> OutboundEvent + Send + Sync;

/// Join/leave/broadcast over named rooms.
///
/// Knows nothing about spot or direct semantics. Deliveries to one room are
/// ordered in the order the room accepted them; there is no ordering across
/// rooms.
#[async_trait]
pub trait RoomMultiplexer: Send + Sync {
    /// Add a member; returns the occupancy after the join.
    async fn join(&self, room: &RoomKey, connection_id: &ConnectionId) -> usize;

    /// Remove a member; returns the occupancy after the leave.
    async fn leave(&self, room: &RoomKey, connection_id: &ConnectionId) -> usize;

    /// Current member count (0 for unknown rooms).
    async fn occupancy(&self, room: &RoomKey) -> usize;

    async fn is_member(&self, room: &RoomKey, connection_id: &ConnectionId) -> bool;

    /// Deliver `event` to every member except `exclude`; returns deliveries.
    async fn broadcast(
        &self,
        room: &RoomKey,
        event: &OutboundEvent,
        exclude: Option<&ConnectionId>,
    ) -> usize;

    /// Deliver an occupancy event rendered from the member count observed
    /// under the room's lock, so the count cannot be stale.
    async fn broadcast_occupancy(&self, room: &RoomKey, render: &OccupancyRenderer) -> usize;

    /// Non-empty rooms with their occupancy, sorted by key.
    async fn rooms(&self) -> Vec<(RoomKey, usize)>;
}
