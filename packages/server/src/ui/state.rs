//! Shared application state.

use std::sync::Arc;

use hiroba_shared::time::Clock;

use crate::{
    domain::{MessagePusher, Nickname},
    infrastructure::{
        message_pusher::WebSocketMessagePusher, presence::InMemoryPresenceRegistry,
        room::InMemoryRoomMultiplexer,
    },
    usecase::{
        ConnectClientUseCase, DirectChatUseCase, DisconnectClientUseCase, GetActiveSpotsUseCase,
        GetPresenceUseCase, NotificationFanout, SetNicknameUseCase, SpotChatUseCase,
    },
};

/// Shared application state
pub struct AppState {
    /// ConnectClientUseCase（接続のユースケース）
    pub connect_client_usecase: Arc<ConnectClientUseCase>,
    /// SetNicknameUseCase（ニックネーム登録のユースケース）
    pub set_nickname_usecase: Arc<SetNicknameUseCase>,
    /// SpotChatUseCase（スポットチャットのユースケース）
    pub spot_chat_usecase: Arc<SpotChatUseCase>,
    /// DirectChatUseCase（ダイレクトチャットのユースケース）
    pub direct_chat_usecase: Arc<DirectChatUseCase>,
    /// DisconnectClientUseCase（切断のユースケース）
    pub disconnect_client_usecase: Arc<DisconnectClientUseCase>,
    /// GetActiveSpotsUseCase（スポット一覧取得のユースケース）
    pub get_active_spots_usecase: Arc<GetActiveSpotsUseCase>,
    /// GetPresenceUseCase（オンライン状態取得のユースケース）
    pub get_presence_usecase: Arc<GetPresenceUseCase>,
    /// MessagePusher（発信元の接続へのエラー返信に使用）
    pub message_pusher: Arc<dyn MessagePusher>,
}

impl AppState {
    /// Wire every use case against the in-memory backends.
    pub fn in_memory(default_nickname: Nickname, clock: Arc<dyn Clock>) -> Self {
        // Initialize dependencies in order:
        // 1. MessagePusher
        // 2. Registries
        // 3. UseCases

        // 1. Create MessagePusher (WebSocket implementation)
        let message_pusher = Arc::new(WebSocketMessagePusher::new());

        // 2. Create PresenceRegistry and RoomMultiplexer (in-memory, sharded)
        let presence = Arc::new(InMemoryPresenceRegistry::new());
        let rooms = Arc::new(InMemoryRoomMultiplexer::new(message_pusher.clone()));

        // 3. Create UseCases
        let fanout = Arc::new(NotificationFanout::new(
            presence.clone(),
            message_pusher.clone(),
        ));
        let spot_chat_usecase = Arc::new(SpotChatUseCase::new(rooms.clone(), clock.clone()));
        let direct_chat_usecase = Arc::new(DirectChatUseCase::new(
            rooms.clone(),
            presence.clone(),
            fanout,
            clock.clone(),
        ));

        Self {
            connect_client_usecase: Arc::new(ConnectClientUseCase::new(
                message_pusher.clone(),
                clock,
                default_nickname.clone(),
            )),
            set_nickname_usecase: Arc::new(SetNicknameUseCase::new(
                presence.clone(),
                default_nickname,
            )),
            disconnect_client_usecase: Arc::new(DisconnectClientUseCase::new(
                spot_chat_usecase.clone(),
                direct_chat_usecase.clone(),
                presence.clone(),
                message_pusher.clone(),
            )),
            spot_chat_usecase,
            direct_chat_usecase,
            get_active_spots_usecase: Arc::new(GetActiveSpotsUseCase::new(rooms)),
            get_presence_usecase: Arc::new(GetPresenceUseCase::new(presence)),
            message_pusher,
        }
    }
}
