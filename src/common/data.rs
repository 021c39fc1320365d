//! Stream Data Types.
//!
//! This module defines the values that travel over a stream channel and the
//! collections the emulator uses to hold them: words (real or bubble),
//! stream identifiers, per-stream packet maps, and the raw per-cycle signal
//! record kept by a receiver.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};

/// A single entry of a packet handed to a driver.
///
/// `Bubble` does not transfer anything: it holds valid low for exactly one
/// cycle and is never re-presented.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Word {
    /// A data value to be transferred.
    Data(u128),
    /// A no-transfer cycle.
    Bubble,
}

impl Word {
    /// Returns `true` for a bubble.
    pub fn is_bubble(&self) -> bool {
        matches!(self, Word::Bubble)
    }

    /// Returns the data value, or `None` for a bubble.
    pub fn value(&self) -> Option<u128> {
        match self {
            Word::Data(v) => Some(*v),
            Word::Bubble => None,
        }
    }
}

impl From<u128> for Word {
    fn from(v: u128) -> Self {
        Word::Data(v)
    }
}

impl From<Option<u128>> for Word {
    fn from(v: Option<u128>) -> Self {
        match v {
            Some(v) => Word::Data(v),
            None => Word::Bubble,
        }
    }
}

/// Identifier of a stream: the `(id, dest)` pair carried with each word.
///
/// Channels without an id or dest field implicitly use 0 for it, so all
/// traffic on a bare channel belongs to stream `(0, 0)`.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct StreamId {
    /// Stream identifier (`TID`).
    pub id: u64,
    /// Routing destination (`TDEST`).
    pub dest: u64,
}

impl StreamId {
    /// Creates a stream identifier.
    pub fn new(id: u64, dest: u64) -> Self {
        Self { id, dest }
    }
}

impl From<(u64, u64)> for StreamId {
    fn from((id, dest): (u64, u64)) -> Self {
        Self { id, dest }
    }
}

/// One transferred word together with its framing fields.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Beat {
    /// Data value.
    pub data: u128,
    /// Last indicator (false when the channel has none).
    pub last: bool,
    /// Stream identifier (0 when the channel has none).
    pub id: u64,
    /// Routing destination (0 when the channel has none).
    pub dest: u64,
}

/// Completed packets per stream, in arrival order.
pub type CompletedPackets = BTreeMap<StreamId, Vec<Vec<u128>>>;

/// The single in-progress packet per stream.
pub type CurrentPackets = BTreeMap<StreamId, Vec<u128>>;

/// Removes empty packets, then any stream left without packets.
///
/// Empty packets never produce a transfer, so they never appear on the
/// receiving side; use this on the sent data before comparing.
pub fn trim_empty_packets(packets: &CompletedPackets) -> CompletedPackets {
    packets
        .iter()
        .filter_map(|(stream, list)| {
            let kept: Vec<Vec<u128>> = list.iter().filter(|p| !p.is_empty()).cloned().collect();
            if kept.is_empty() {
                None
            } else {
                Some((*stream, kept))
            }
        })
        .collect()
}

/// One cycle of a [`SignalRecord`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SignalSample {
    /// Data, or `None` if valid was low.
    pub data: Option<u128>,
    /// Stream identifier on the bus.
    pub id: u64,
    /// Routing destination on the bus.
    pub dest: u64,
    /// Last indicator on the bus.
    pub last: bool,
}

/// Raw per-cycle record of a stream bus.
///
/// Stored as four equal-length columns so it can be fed straight into a
/// [`TracePlayer`](crate::stream::TracePlayer). A `None` in `data` marks a
/// cycle where the consumer was ready but nothing was valid.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalRecord {
    /// Data column.
    pub data: Vec<Option<u128>>,
    /// Stream identifier column.
    pub id: Vec<u64>,
    /// Destination column.
    pub dest: Vec<u64>,
    /// Last column.
    pub last: Vec<bool>,
}

impl SignalRecord {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one cycle.
    pub fn push(&mut self, sample: SignalSample) {
        self.data.push(sample.data);
        self.id.push(sample.id);
        self.dest.push(sample.dest);
        self.last.push(sample.last);
    }

    /// Number of recorded cycles (length of the data column).
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Drops every recorded cycle.
    pub fn clear(&mut self) {
        self.data.clear();
        self.id.clear();
        self.dest.clear();
        self.last.clear();
    }

    /// Iterates over the recorded cycles.
    ///
    /// Columns shorter than the data column read as 0 / false.
    pub fn samples(&self) -> impl Iterator<Item = SignalSample> + '_ {
        self.data.iter().enumerate().map(move |(n, data)| SignalSample {
            data: *data,
            id: self.id.get(n).copied().unwrap_or(0),
            dest: self.dest.get(n).copied().unwrap_or(0),
            last: self.last.get(n).copied().unwrap_or(false),
        })
    }

    /// Number of cycles on which something was transferred.
    pub fn transfers(&self) -> usize {
        self.data.iter().filter(|d| d.is_some()).count()
    }

    /// Rebuilds completed packets from the record.
    ///
    /// Bubble cycles are skipped, a set last closes the current packet of
    /// that stream, and empty packets are trimmed. A trailing packet without
    /// a last is included as well, so on a channel carrying last this equals
    /// the receiver's completed packets plus its current packets.
    pub fn packetise(&self) -> CompletedPackets {
        let mut streams: BTreeMap<StreamId, VecDeque<Vec<u128>>> = BTreeMap::new();

        for sample in self.samples() {
            let Some(value) = sample.data else {
                continue;
            };
            let stream = streams
                .entry(StreamId::new(sample.id, sample.dest))
                .or_insert_with(|| VecDeque::from([Vec::new()]));
            if let Some(packet) = stream.back_mut() {
                packet.push(value);
            }
            if sample.last {
                stream.push_back(Vec::new());
            }
        }

        let packets: CompletedPackets = streams
            .into_iter()
            .map(|(stream, list)| (stream, list.into_iter().collect()))
            .collect();
        trim_empty_packets(&packets)
    }
}
