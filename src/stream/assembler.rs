//! Packet assembly shared by the receiving components.

use crate::bus::BusSignals;
use crate::common::{CompletedPackets, CurrentPackets};

/// Demultiplexes transferred words into per-stream packets.
///
/// Each stream has at most one packet in progress; a word transferred with
/// last set moves it to the stream's completed list.
#[derive(Clone, Debug, Default)]
pub(crate) struct PacketAssembler {
    completed: CompletedPackets,
    current: CurrentPackets,
}

impl PacketAssembler {
    /// Records the word on `bus` if it transfers this cycle.
    pub(crate) fn observe(&mut self, bus: &BusSignals) {
        if !bus.transfer() {
            return;
        }
        let stream = bus.stream();
        self.current.entry(stream).or_default().push(bus.data);

        if bus.last_or_false() {
            if let Some(packet) = self.current.remove(&stream) {
                self.completed.entry(stream).or_default().push(packet);
            }
        }
    }

    pub(crate) fn completed(&self) -> &CompletedPackets {
        &self.completed
    }

    pub(crate) fn current(&self) -> &CurrentPackets {
        &self.current
    }

    pub(crate) fn clear(&mut self) {
        self.completed.clear();
        self.current.clear();
    }
}
