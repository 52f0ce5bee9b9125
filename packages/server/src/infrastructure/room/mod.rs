//! Room multiplexer implementations.

pub mod inmemory;

pub use inmemory::InMemoryRoomMultiplexer;
