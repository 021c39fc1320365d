//! Stream Master Driver.
//!
//! A bus functional model of the producing end of a stream channel. Packets
//! are queued per stream, keyed by `(id, dest)`. Each cycle the driver may
//! advance, it picks one of the streams that has data uniformly at random
//! and presents the next word of that stream's head packet. Interleaving
//! streams this way exercises the demultiplexing of whatever sits
//! downstream. Word order within a stream is always preserved.

use crate::bus::{BusId, Netlist, ResetId};
use crate::common::{StreamId, Word};
use crate::sim::Process;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;
use std::collections::{BTreeMap, BTreeSet, VecDeque};

/// One queued packet.
#[derive(Clone, Debug)]
struct Packet {
    words: VecDeque<Word>,
    /// Whether the final real word asserts last.
    terminate: bool,
}

/// Producer-side bus functional model.
pub struct MasterDriver {
    bus: BusId,
    reset: Option<ResetId>,
    streams: BTreeMap<StreamId, VecDeque<Packet>>,
    truncated: BTreeSet<StreamId>,
    rng: Xoshiro256StarStar,
}

impl MasterDriver {
    /// Creates a driver for `bus`, arbitrating with a generator seeded by
    /// `seed`.
    pub fn new(bus: BusId, seed: u64) -> Self {
        Self {
            bus,
            reset: None,
            streams: BTreeMap::new(),
            truncated: BTreeSet::new(),
            rng: Xoshiro256StarStar::seed_from_u64(seed),
        }
    }

    /// Attaches a synchronous, active-high reset line.
    pub fn with_reset(mut self, reset: ResetId) -> Self {
        self.reset = Some(reset);
        self
    }

    /// Queues packets on `stream`.
    ///
    /// Each inner sequence is one packet. Words convert from `u128` (data) or
    /// `Option<u128>` (`None` is a bubble). If `incomplete_last_packet` is set,
    /// the final packet of this call never asserts last.
    pub fn add_data<P, W>(
        &mut self,
        stream: StreamId,
        packets: impl IntoIterator<Item = P>,
        incomplete_last_packet: bool,
    ) where
        P: IntoIterator<Item = W>,
        W: Into<Word>,
    {
        let mut new_packets: VecDeque<Packet> = packets
            .into_iter()
            .map(|p| Packet {
                words: p.into_iter().map(Into::into).collect(),
                terminate: true,
            })
            .collect();

        if incomplete_last_packet {
            if let Some(packet) = new_packets.back_mut() {
                packet.terminate = false;
            }
        }

        tracing::debug!(
            stream.id = stream.id,
            stream.dest = stream.dest,
            packets = new_packets.len(),
            incomplete_last_packet,
            "queued packets"
        );
        self.streams.entry(stream).or_default().extend(new_packets);
    }

    /// Queues packets on several streams at once.
    pub fn add_multi_stream_data<P, W>(
        &mut self,
        data: impl IntoIterator<Item = (StreamId, Vec<P>)>,
    ) where
        P: IntoIterator<Item = W>,
        W: Into<Word>,
    {
        for (stream, packets) in data {
            self.add_data(stream, packets, false);
        }
    }

    /// Number of words (including bubbles) still queued.
    pub fn pending_words(&self) -> usize {
        self.streams
            .values()
            .flat_map(|packets| packets.iter())
            .map(|p| p.words.len())
            .sum()
    }

    /// Returns `true` when nothing is left to present.
    pub fn is_idle(&self) -> bool {
        self.pending_words() == 0
    }

    /// Streams driven so far whose id or dest did not fit the channel and
    /// went out truncated to the field widths.
    pub fn truncated_streams(&self) -> Vec<StreamId> {
        self.truncated.iter().copied().collect()
    }

    /// Drops exhausted packets, then streams with no packets left.
    fn prune(&mut self) {
        for packets in self.streams.values_mut() {
            while packets.front().is_some_and(|p| p.words.is_empty()) {
                packets.pop_front();
            }
        }
        self.streams.retain(|_, packets| !packets.is_empty());
    }

    /// Picks a stream with a non-empty head packet uniformly at random.
    fn arbitrate(&mut self) -> Option<StreamId> {
        let ready: Vec<StreamId> = self.streams.keys().copied().collect();
        if ready.is_empty() {
            return None;
        }
        Some(ready[self.rng.gen_range(0..ready.len())])
    }
}

impl Process for MasterDriver {
    fn name(&self) -> &str {
        "MasterDriver"
    }

    fn posedge(&mut self, net: &mut Netlist) {
        if self.reset.is_some_and(|r| net.reset(r)) {
            if !self.streams.is_empty() {
                tracing::debug!(discarded = self.pending_words(), "driver reset");
            }
            self.streams.clear();
            net.bus_mut(self.bus).drive().valid(false).last(false);
            return;
        }

        self.prune();

        let now = net.bus(self.bus).now();
        if now.valid && !now.ready {
            return;
        }

        let Some(stream) = self.arbitrate() else {
            net.bus_mut(self.bus).drive().valid(false);
            return;
        };

        let Some(packets) = self.streams.get_mut(&stream) else {
            return;
        };
        let Some(packet) = packets.front_mut() else {
            return;
        };
        let Some(word) = packet.words.pop_front() else {
            return;
        };
        let last = packet.terminate && packet.words.iter().all(Word::is_bubble);

        if !net.bus(self.bus).channel().stream_fits(&stream) && self.truncated.insert(stream) {
            tracing::warn!(
                stream.id = stream.id,
                stream.dest = stream.dest,
                "stream does not fit the channel's id/dest widths and is truncated"
            );
        }

        let bus = net.bus_mut(self.bus);
        let mut w = bus.drive();
        w.id(stream.id).dest(stream.dest);
        match word {
            Word::Data(value) => {
                w.data(value).valid(true).last(last);
            }
            Word::Bubble => {
                w.valid(false).last(last);
            }
        }

        self.prune();
    }
}
