//! Simulation harness.
//!
//! The clocked-process trait, the cycle scheduler, scenario generators for
//! random traffic and loaders for configuration and recorded traces.

/// Configuration and trace file loading.
pub mod loader;

/// Random traffic and trace generation.
pub mod scenario;

/// Cycle scheduler.
pub mod simulator;

/// Clocked process trait.
pub mod traits;

pub use simulator::Simulator;
pub use traits::Process;
