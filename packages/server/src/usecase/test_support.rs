//! Shared fixtures for use case tests: real in-memory backends wired to
//! channels the tests can drain.

use std::sync::Arc;

use hiroba_shared::time::{Clock, FixedClock};
use serde_json::Value;
use tokio::sync::mpsc;

use crate::{
    domain::{ConnectionId, ConnectionState, MessagePusher, Nickname, PresenceRegistry, Timestamp, UserId},
    infrastructure::{
        message_pusher::WebSocketMessagePusher, presence::InMemoryPresenceRegistry,
        room::InMemoryRoomMultiplexer,
    },
};

use super::{DirectChatUseCase, NotificationFanout, SpotChatUseCase};

/// 2023-11-14 22:13:20 UTC
pub(crate) const NOW: i64 = 1_700_000_000_000;

pub(crate) struct Harness {
    pub pusher: Arc<WebSocketMessagePusher>,
    pub presence: Arc<InMemoryPresenceRegistry>,
    pub rooms: Arc<InMemoryRoomMultiplexer>,
    pub fanout: Arc<NotificationFanout>,
    pub clock: Arc<dyn Clock>,
}

impl Harness {
    pub fn new() -> Self {
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let presence = Arc::new(InMemoryPresenceRegistry::new());
        let rooms = Arc::new(InMemoryRoomMultiplexer::new(pusher.clone()));
        let fanout = Arc::new(NotificationFanout::new(presence.clone(), pusher.clone()));
        Self {
            pusher,
            presence,
            rooms,
            fanout,
            clock: Arc::new(FixedClock::new(NOW)),
        }
    }

    pub fn spot_chat(&self) -> SpotChatUseCase {
        SpotChatUseCase::new(self.rooms.clone(), self.clock.clone())
    }

    pub fn direct_chat(&self) -> DirectChatUseCase {
        DirectChatUseCase::new(
            self.rooms.clone(),
            self.presence.clone(),
            self.fanout.clone(),
            self.clock.clone(),
        )
    }

    /// Open an anonymous connection
    pub async fn connect(&self, id: &str, nickname: &str) -> TestClient {
        let connection_id = ConnectionId::new(id).unwrap();
        let (tx, rx) = mpsc::unbounded_channel();
        self.pusher.register_connection(connection_id.clone(), tx).await;
        let state = ConnectionState::new(
            connection_id,
            Nickname::new(nickname).unwrap(),
            Timestamp::new(NOW),
        );
        TestClient { state, rx }
    }

    /// Open a connection already bound to `user_id`
    pub async fn connect_as(&self, id: &str, nickname: &str, user_id: &str) -> TestClient {
        let mut client = self.connect(id, nickname).await;
        let user_id = UserId::new(user_id).unwrap();
        self.presence
            .register(user_id.clone(), client.state.id().clone())
            .await;
        client.state.set_user_id(user_id);
        client
    }
}

pub(crate) struct TestClient {
    pub state: ConnectionState,
    pub rx: mpsc::UnboundedReceiver<String>,
}

impl TestClient {
    /// Everything pushed to this connection so far, decoded
    pub fn drain(&mut self) -> Vec<Value> {
        let mut frames = Vec::new();
        while let Ok(frame) = self.rx.try_recv() {
            frames.push(serde_json::from_str(&frame).unwrap());
        }
        frames
    }

    /// Names of the events pushed so far, in order
    pub fn drain_names(&mut self) -> Vec<String> {
        self.drain()
            .into_iter()
            .map(|frame| frame["event"].as_str().unwrap_or_default().to_string())
            .collect()
    }
}
