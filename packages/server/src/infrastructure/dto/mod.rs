//! Data Transfer Objects (DTOs) for the presence and messaging server.
//!
//! DTOs are organized by protocol:
//! - `websocket`: WebSocket event envelopes
//! - `http`: HTTP API response DTOs
//!
//! `conversion` maps them to and from domain types and use case commands.

pub mod conversion;
pub mod http;
pub mod websocket;
