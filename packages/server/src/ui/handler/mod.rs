//! Request handlers.

mod http;
mod websocket;

pub use http::{get_presence, get_spots, health_check};
pub use websocket::websocket_handler;
