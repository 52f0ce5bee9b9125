//! UseCase: ユーザーのオンライン状態の取得

use std::sync::Arc;

use crate::domain::{PresenceRegistry, UserId};

/// ユーザーの接続状況
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresenceSummary {
    pub user_id: UserId,
    pub connection_count: usize,
}

impl PresenceSummary {
    pub fn is_online(&self) -> bool {
        self.connection_count > 0
    }
}

/// オンライン状態取得のユースケース
pub struct GetPresenceUseCase {
    presence: Arc<dyn PresenceRegistry>,
}

impl GetPresenceUseCase {
    pub fn new(presence: Arc<dyn PresenceRegistry>) -> Self {
        Self { presence }
    }

    pub async fn execute(&self, user_id: &UserId) -> PresenceSummary {
        let connection_count = self.presence.connections_for(user_id).await.len();
        PresenceSummary {
            user_id: user_id.clone(),
            connection_count,
        }
    }
}
