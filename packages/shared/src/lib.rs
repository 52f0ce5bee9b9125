//! Utilities shared between the hiroba packages.

pub mod logger;
pub mod time;
