//! Clocked Process Interface.
//!
//! Every component of a stream design (drivers, receivers, buffers, trace
//! players) is a synchronous process. The simulator calls `posedge` on all
//! of them for each rising clock edge, commits the registered values, and
//! then calls `settle` so combinational outputs can follow the new values.

use crate::bus::Netlist;

/// A synchronous process evaluated once per clock edge.
pub trait Process {
    /// Returns the name of the process.
    ///
    /// Used for logging.
    fn name(&self) -> &str;

    /// Evaluates one rising clock edge.
    ///
    /// Implementations read the current values (`StreamBus::now`) and write
    /// registered values through `StreamBus::drive`; nothing written here is
    /// visible to other processes until the edge completes.
    fn posedge(&mut self, net: &mut Netlist);

    /// Drives combinational outputs from the values visible this cycle.
    ///
    /// Called after every edge, in process order. Default implementation
    /// does nothing, which is correct for purely registered processes.
    fn settle(&self, _net: &mut Netlist) {}
}
