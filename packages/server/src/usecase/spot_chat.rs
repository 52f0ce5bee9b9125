//! UseCase: スポットチャット
//!
//! 場所ごとの一時的なチャットルーム。接続は同時に一つのスポットにしか
//! 所属できず、別のスポットへの参加は「退出 → 参加」として処理されます。
//!
//! 退出時の順序:
//! 1. 残るメンバーへ system「left」メッセージ
//! 2. マルチプレクサからの退出
//! 3. 退出後の人数で userCountUpdate
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - join / leave / send と、発行されるイベントの順序
//!
//! ### どのような状況を想定しているか
//! - 正常系：参加、メッセージ送信、退出
//! - 異常系：スポット未参加でのメッセージ送信
//! - エッジケース：別スポットへの移動、同じスポットへの再参加、空メッセージ

use std::sync::Arc;

use hiroba_shared::time::Clock;

use crate::domain::{
    ActiveSpot, ConnectionState, MessageBody, OutboundEvent, RoomKey, RoomMultiplexer, SpotId,
    SpotMessage, Timestamp,
};

use super::error::SpotChatError;

/// `joinSpotChat` の入力
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinSpotChatCommand {
    pub spot_id: SpotId,
    pub spot_name: Option<String>,
}

/// スポットチャットのユースケース
pub struct SpotChatUseCase {
    rooms: Arc<dyn RoomMultiplexer>,
    clock: Arc<dyn Clock>,
}

impl SpotChatUseCase {
    pub fn new(rooms: Arc<dyn RoomMultiplexer>, clock: Arc<dyn Clock>) -> Self {
        Self { rooms, clock }
    }

    /// Enter a spot room, leaving the current one first.
    ///
    /// Returns the occupancy of the joined spot.
    pub async fn join(&self, connection: &mut ConnectionState, command: JoinSpotChatCommand) -> usize {
        let room = RoomKey::Spot(command.spot_id.clone());

        if connection.spot().is_some_and(|spot| spot.id == command.spot_id) {
            tracing::debug!(
                "Connection '{}' is already in spot '{}'",
                connection.id(),
                command.spot_id
            );
            self.rooms
                .broadcast_occupancy(&room, &occupancy_of(command.spot_id.clone()))
                .await;
            return self.rooms.occupancy(&room).await;
        }

        self.leave(connection).await;

        let spot_name = command
            .spot_name
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| command.spot_id.to_string());

        let occupancy = self.rooms.join(&room, connection.id()).await;
        connection.enter_spot(ActiveSpot {
            id: command.spot_id.clone(),
            name: spot_name.clone(),
        });

        let joined = SpotMessage::system(
            command.spot_id.clone(),
            format!("{} joined {}", connection.nickname(), spot_name),
            self.now(),
        );
        self.rooms
            .broadcast(&room, &OutboundEvent::SpotMessage(joined), None)
            .await;
        self.rooms
            .broadcast_occupancy(&room, &occupancy_of(command.spot_id.clone()))
            .await;

        tracing::info!(
            "Connection '{}' joined spot '{}' ({} present)",
            connection.id(),
            command.spot_id,
            occupancy
        );

        occupancy
    }

    /// Leave the current spot, if any.
    ///
    /// Returns the spot that was left.
    pub async fn leave(&self, connection: &mut ConnectionState) -> Option<SpotId> {
        let spot = connection.take_spot()?;
        let room = RoomKey::Spot(spot.id.clone());

        let left = SpotMessage::system(
            spot.id.clone(),
            format!("{} left {}", connection.nickname(), spot.name),
            self.now(),
        );
        self.rooms
            .broadcast(&room, &OutboundEvent::SpotMessage(left), Some(connection.id()))
            .await;

        let remaining = self.rooms.leave(&room, connection.id()).await;
        self.rooms
            .broadcast_occupancy(&room, &occupancy_of(spot.id.clone()))
            .await;

        tracing::info!(
            "Connection '{}' left spot '{}' ({} remaining)",
            connection.id(),
            spot.id,
            remaining
        );

        Some(spot.id)
    }

    /// Send a user message to the current spot.
    ///
    /// Whitespace-only bodies are dropped silently. Returns the number of
    /// members the message reached.
    pub async fn send(&self, connection: &ConnectionState, body: &str) -> Result<usize, SpotChatError> {
        let spot = connection.spot().ok_or(SpotChatError::NotInRoom)?;

        let Ok(body) = MessageBody::new(body) else {
            tracing::debug!("Empty spot message from '{}' dropped", connection.id());
            return Ok(0);
        };

        let message = SpotMessage::user(spot.id.clone(), connection.as_sender(), body, self.now());
        let delivered = self
            .rooms
            .broadcast(
                &RoomKey::Spot(spot.id.clone()),
                &OutboundEvent::SpotMessage(message),
                None,
            )
            .await;

        Ok(delivered)
    }

    fn now(&self) -> Timestamp {
        Timestamp::new(self.clock.now_millis())
    }
}

fn occupancy_of(spot_id: SpotId) -> impl Fn(usize) -> OutboundEvent + Send + Sync {
    move |user_count| OutboundEvent::SpotOccupancy {
        spot_id: spot_id.clone(),
        user_count,
    }
}
