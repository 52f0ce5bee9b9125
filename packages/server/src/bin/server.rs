//! hiroba presence and messaging server.
//!
//! Serves spot chat rooms and direct conversations over a WebSocket at `/ws`.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin hiroba-server
//! cargo run --bin hiroba-server -- --host 0.0.0.0 --port 3000
//! HIROBA_DEFAULT_NICKNAME=Guest cargo run --bin hiroba-server
//! ```

use std::sync::Arc;

use clap::Parser;
use hiroba_server::{
    config::{Args, ServerConfig},
    ui::{AppState, Server},
};
use hiroba_shared::{logger::setup_logger, time::SystemClock};

#[tokio::main]
async fn main() {
    let config = ServerConfig::from(Args::parse());

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &config.log_level);

    // Initialize dependencies in order:
    // 1. Clock
    // 2. AppState (MessagePusher, registries, UseCases)
    // 3. Server
    let clock = Arc::new(SystemClock);
    let state = AppState::in_memory(config.default_nickname.clone(), clock);
    let server = Server::new(state);

    if let Err(e) = server.run(config.host, config.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
