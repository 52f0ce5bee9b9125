//! UseCase: ニックネームとユーザー ID の登録
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SetNicknameUseCase::execute() メソッド
//! - ニックネームの設定（空ならデフォルト）
//! - userId が指定された場合の PresenceRegistry への登録と再登録
//!
//! ### どのような状況を想定しているか
//! - 正常系：匿名接続 → 認証済みユーザーへの切り替え
//! - エッジケース：旧形式（ニックネームのみ）、空のニックネーム
//! - プロフィール画像：省略時は維持、null 指定で削除

use std::sync::Arc;

use crate::domain::{ConnectionState, Nickname, PresenceRegistry, UserId};

/// `setNickname` の入力
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetNicknameCommand {
    pub nickname: Option<String>,
    pub user_id: Option<UserId>,
    /// `None` keeps the current image; `Some(None)` clears it
    pub profile_image: Option<Option<String>>,
}

/// ニックネーム登録のユースケース
pub struct SetNicknameUseCase {
    presence: Arc<dyn PresenceRegistry>,
    default_nickname: Nickname,
}

impl SetNicknameUseCase {
    pub fn new(presence: Arc<dyn PresenceRegistry>, default_nickname: Nickname) -> Self {
        Self {
            presence,
            default_nickname,
        }
    }

    pub async fn execute(&self, connection: &mut ConnectionState, command: SetNicknameCommand) {
        let nickname = Nickname::or_default(command.nickname.as_deref(), &self.default_nickname);
        tracing::info!(
            "Connection '{}' is now known as '{}'",
            connection.id(),
            nickname
        );
        connection.set_nickname(nickname);
        if let Some(profile_image) = command.profile_image {
            connection.set_profile_image(profile_image.filter(|url| !url.trim().is_empty()));
        }

        if let Some(user_id) = command.user_id {
            bind_identity(self.presence.as_ref(), connection, user_id).await;
        }
    }
}

/// Bind the connection to `user_id` in the presence registry.
///
/// The registry drops any previous binding of the connection, so switching
/// from an anonymous identity to an authenticated one leaves nothing stale.
pub(crate) async fn bind_identity(
    presence: &dyn PresenceRegistry,
    connection: &mut ConnectionState,
    user_id: UserId,
) {
    if connection.user_id() == Some(&user_id) {
        return;
    }

    presence
        .register(user_id.clone(), connection.id().clone())
        .await;
    tracing::info!("Connection '{}' bound to user '{}'", connection.id(), user_id);
    connection.set_user_id(user_id);
}
