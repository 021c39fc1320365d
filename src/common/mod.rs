//! Common types used throughout the stream emulator.
//!
//! This module provides the word, stream identifier, packet map and signal
//! record types shared by drivers, receivers, buffers and the trace player,
//! together with the configuration error type.

/// Words, stream identifiers, packet maps and signal records.
pub mod data;

/// Construction-time error types.
pub mod error;

pub use data::{
    trim_empty_packets, Beat, CompletedPackets, CurrentPackets, SignalRecord, SignalSample,
    StreamId, Word,
};
pub use error::ConfigError;
