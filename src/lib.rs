//! AXI4-Stream Handshake Emulation Library.
//!
//! This crate implements a cycle-level emulator for point-to-point,
//! multi-stream valid/ready links modeled on AXI4-Stream. It provides bus
//! functional models for both ends of a link, an elastic buffer that
//! decouples mismatched handshake timing, and a deterministic trace player.
//!
//! # Architecture
//!
//! * **Bus model**: channels with optional id/dest/user/last/strb/keep
//!   fields, and buses holding current and next signal values.
//! * **Scheduler**: every component is a synchronous process evaluated once
//!   per clock edge with register-transfer semantics, followed by a
//!   combinational settle phase.
//! * **Stream engine**: master driver, slave receiver, passive recorder,
//!   elastic buffer and trace player.
//!
//! # Modules
//!
//! * `bus`: Channel shapes, bus signals and the netlist.
//! * `common`: Shared data types and error handling.
//! * `config`: Scenario configuration loading and parsing.
//! * `sim`: Scheduler, process trait, scenario generation and loaders.
//! * `stats`: Handshake statistics collection.
//! * `stream`: Stream engine components.

/// Channel shapes, bus signal values and the netlist that owns them.
///
/// Optional bus fields are modeled as `Option` values that exist iff the
/// channel enables them; writes to absent fields are dropped.
pub mod bus;

/// Shared types and error handling.
///
/// Provides words, stream identifiers, packet maps, the raw signal record
/// and the construction-time error type.
pub mod common;

/// Configuration system for scenario runs.
///
/// Loads and parses TOML files describing the channel, the generated
/// traffic, the receiver's ready behavior and the optional elastic buffer.
pub mod config;

/// Simulation harness: scheduler, process trait, traffic generation and
/// file loaders.
pub mod sim;

/// Handshake statistics collection and reporting.
///
/// Tracks transfers, stalls, starvation and idle cycles per bus.
pub mod stats;

/// Stream engine components.
///
/// Master driver, slave receiver, passive recorder, elastic buffer and
/// trace player.
pub mod stream;
