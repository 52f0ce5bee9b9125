//! Real-time presence and messaging server.
//!
//! Hosts location-scoped spot chat rooms and pairwise direct conversations
//! over WebSocket, with per-user notification fan-out to every open
//! connection a user owns.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub mod config;
