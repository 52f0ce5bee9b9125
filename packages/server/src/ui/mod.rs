//! Axum server: router, WebSocket and HTTP handlers, shared state.

mod handler;
mod server;
mod signal;
pub mod state;

pub use server::Server;
pub use state::AppState;
