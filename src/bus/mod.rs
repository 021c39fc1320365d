//! Stream bus model.
//!
//! Channels describe the shape of a link, buses hold its signal values with
//! register-transfer semantics, and the netlist owns every bus of a design.

/// Channel shape and width validation.
pub mod channel;

/// Netlist holding buses and reset lines.
pub mod netlist;

/// Signal values and masked writers.
pub mod signals;

pub use channel::StreamChannel;
pub use netlist::{BusId, Netlist, ResetId};
pub use signals::{BusSignals, SignalWriter, StreamBus};
