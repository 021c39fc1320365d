//! Netlist.
//!
//! The netlist owns every stream bus and reset line of a simulated design.
//! Processes never hold references to buses; they keep the [`BusId`] and
//! [`ResetId`] handles they were built with and look the signals up on each
//! edge.

use super::channel::StreamChannel;
use super::signals::StreamBus;

/// Handle to a bus in a [`Netlist`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BusId(usize);

/// Handle to a reset line in a [`Netlist`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ResetId(usize);

/// Container for the buses and reset lines of a design.
#[derive(Debug, Default)]
pub struct Netlist {
    buses: Vec<StreamBus>,
    resets: Vec<bool>,
}

impl Netlist {
    /// Creates an empty netlist.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a bus with `channel`'s shape, holding its reset values.
    pub fn add_bus(&mut self, channel: StreamChannel) -> BusId {
        tracing::debug!(
            bus = self.buses.len(),
            bus_width = channel.bus_width(),
            id_width = ?channel.id_width(),
            dest_width = ?channel.dest_width(),
            last = channel.has_last(),
            "registered stream bus"
        );
        self.buses.push(StreamBus::new(channel));
        BusId(self.buses.len() - 1)
    }

    /// Adds a reset line at the given level.
    pub fn add_reset(&mut self, level: bool) -> ResetId {
        self.resets.push(level);
        ResetId(self.resets.len() - 1)
    }

    /// # Panics
    ///
    /// Panics if `id` belongs to a different netlist.
    pub fn bus(&self, id: BusId) -> &StreamBus {
        &self.buses[id.0]
    }

    /// # Panics
    ///
    /// Panics if `id` belongs to a different netlist.
    pub fn bus_mut(&mut self, id: BusId) -> &mut StreamBus {
        &mut self.buses[id.0]
    }

    /// Current level of a reset line.
    pub fn reset(&self, id: ResetId) -> bool {
        self.resets[id.0]
    }

    /// Sets a reset line; the level is sampled by processes on the next edge.
    pub fn set_reset(&mut self, id: ResetId, level: bool) {
        self.resets[id.0] = level;
    }

    /// Number of buses.
    pub fn bus_count(&self) -> usize {
        self.buses.len()
    }

    pub(crate) fn buses(&self) -> &[StreamBus] {
        &self.buses
    }

    pub(crate) fn buses_mut(&mut self) -> &mut [StreamBus] {
        &mut self.buses
    }
}
