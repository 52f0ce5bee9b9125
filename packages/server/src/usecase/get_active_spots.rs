//! UseCase: アクティブなスポットの一覧

use std::sync::Arc;

use crate::domain::{RoomKey, RoomMultiplexer, SpotId};

/// スポットと現在の参加人数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpotOccupancy {
    pub spot_id: SpotId,
    pub user_count: usize,
}

/// スポット一覧取得のユースケース
pub struct GetActiveSpotsUseCase {
    rooms: Arc<dyn RoomMultiplexer>,
}

impl GetActiveSpotsUseCase {
    pub fn new(rooms: Arc<dyn RoomMultiplexer>) -> Self {
        Self { rooms }
    }

    /// 参加者のいるスポットを ID 順に返す（ダイレクトチャットは含まない）
    pub async fn execute(&self) -> Vec<SpotOccupancy> {
        self.rooms
            .rooms()
            .await
            .into_iter()
            .filter_map(|(room, user_count)| match room {
                RoomKey::Spot(spot_id) => Some(SpotOccupancy {
                    spot_id,
                    user_count,
                }),
                RoomKey::Direct(_) => None,
            })
            .collect()
    }
}
