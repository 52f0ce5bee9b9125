//! UseCase 層のエラー定義
//!
//! どのエラーも発生元の接続にだけ返され、接続を切断することはありません。

use thiserror::Error;

/// Spot chat errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpotChatError {
    /// `chatMessage` sent without an active spot
    #[error("join a spot chat before sending messages")]
    NotInRoom,
}

/// Direct conversation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectChatError {
    /// Neither an explicit conversation id nor both participants were given
    #[error("conversation could not be resolved from the participants")]
    InvalidConversation,

    /// Message sent to a conversation this connection has not joined
    #[error("join the conversation before sending messages")]
    NotInRoom,
}
