//! Passive stream recorder.
//!
//! Watches a bus without driving anything and collects every transfer into
//! per-stream packets. Useful for observing the internal links of a design
//! where both ends are already driven.

use super::assembler::PacketAssembler;
use crate::bus::{BusId, Netlist};
use crate::common::{CompletedPackets, CurrentPackets};
use crate::sim::Process;

pub struct StreamRecorder {
    bus: BusId,
    packets: PacketAssembler,
}

impl StreamRecorder {
    pub fn new(bus: BusId) -> Self {
        Self {
            bus,
            packets: PacketAssembler::default(),
        }
    }

    /// Snapshot of the packets still waiting for their last word.
    pub fn packets_in_progress(&self) -> CurrentPackets {
        self.packets.current().clone()
    }

    /// Snapshot of the completed packets.
    pub fn recorded_data(&self) -> CompletedPackets {
        self.packets.completed().clone()
    }

    pub fn clear(&mut self) {
        self.packets.clear();
    }
}

impl Process for StreamRecorder {
    fn name(&self) -> &str {
        "StreamRecorder"
    }

    fn posedge(&mut self, net: &mut Netlist) {
        self.packets.observe(net.bus(self.bus).now());
    }
}
