//! Infrastructure layer: concrete implementations of the domain interfaces.

pub mod dto;
pub mod message_pusher;
pub mod presence;
pub mod room;
