//! UseCase 層
//!
//! クライアントイベントごとのビジネスロジック。ドメイン層の trait にのみ依存し、
//! 具体的な実装（DashMap, WebSocket）には依存しません。

pub mod connect_client;
pub mod direct_chat;
pub mod disconnect_client;
pub mod error;
pub mod get_active_spots;
pub mod get_presence;
pub mod notification_fanout;
pub mod set_nickname;
pub mod spot_chat;

#[cfg(test)]
pub(crate) mod test_support;

pub use connect_client::ConnectClientUseCase;
pub use direct_chat::{DirectChatUseCase, JoinDirectChatCommand, SendDirectMessageCommand};
pub use disconnect_client::{DisconnectClientUseCase, DisconnectReport};
pub use error::{DirectChatError, SpotChatError};
pub use get_active_spots::{GetActiveSpotsUseCase, SpotOccupancy};
pub use get_presence::{GetPresenceUseCase, PresenceSummary};
pub use notification_fanout::NotificationFanout;
pub use set_nickname::{SetNicknameCommand, SetNicknameUseCase};
pub use spot_chat::{JoinSpotChatCommand, SpotChatUseCase};
