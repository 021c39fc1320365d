//! Trace Playback.
//!
//! Replays a precomputed [`SignalRecord`] onto a stream bus, once, cycle by
//! cycle. Unlike [`MasterDriver`](super::MasterDriver) there is no
//! arbitration and no randomness: the whole trace is preloaded into
//! fixed-size tables and walked by a single index register, so the block
//! stays expressible as plain hardware (a ROM and a counter).

use crate::bus::{BusId, Netlist, StreamChannel};
use crate::common::{ConfigError, SignalRecord};
use crate::sim::Process;
use serde::Serialize;

/// Preloaded playback tables, one entry per cycle of the trace.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TraceRom {
    pub data: Box<[u128]>,
    pub valid: Box<[bool]>,
    pub id: Box<[u64]>,
    pub dest: Box<[u64]>,
    pub last: Box<[bool]>,
}

impl TraceRom {
    /// Number of entries.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the tables hold no entries.
    ///
    /// An empty trace is stored as one invalid entry, so every ROM built by
    /// [`TracePlayer::new`] is non-empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Deterministic replay of a fixed-length trace.
pub struct TracePlayer {
    bus: BusId,
    rom: TraceRom,
    index: usize,
    valid: bool,
}

impl TracePlayer {
    /// Builds a player for `bus` from `record`.
    ///
    /// Only the columns of fields the channel carries are used; each of
    /// those must be as long as the data column. An empty record plays as a
    /// single invalid cycle. With `incomplete_last_packet`, the last of the
    /// final non-bubble entry is cleared.
    ///
    /// # Errors
    ///
    /// [`ConfigError::TraceLengthMismatch`] naming the first offending
    /// column.
    pub fn new(
        net: &Netlist,
        bus: BusId,
        record: &SignalRecord,
        incomplete_last_packet: bool,
    ) -> Result<Self, ConfigError> {
        let rom = build_rom(net.bus(bus).channel(), record, incomplete_last_packet)?;
        tracing::debug!(entries = rom.len(), "trace player loaded");
        Ok(Self {
            bus,
            rom,
            index: 0,
            valid: false,
        })
    }

    /// The preloaded tables.
    pub fn rom(&self) -> &TraceRom {
        &self.rom
    }

    /// Returns `true` once every entry has been presented and accepted.
    pub fn finished(&self) -> bool {
        self.index >= self.rom.len() && !self.valid
    }
}

fn build_rom(
    channel: &StreamChannel,
    record: &SignalRecord,
    incomplete_last_packet: bool,
) -> Result<TraceRom, ConfigError> {
    let n = record.data.len();
    let columns = [
        ("id", channel.id_width().is_some(), record.id.len()),
        ("dest", channel.dest_width().is_some(), record.dest.len()),
        ("last", channel.has_last(), record.last.len()),
    ];
    for (field, enabled, found) in columns {
        if enabled && found != n {
            return Err(ConfigError::TraceLengthMismatch {
                field,
                expected: n,
                found,
            });
        }
    }

    if n == 0 {
        return Ok(TraceRom {
            data: Box::new([0]),
            valid: Box::new([false]),
            id: Box::new([0]),
            dest: Box::new([0]),
            last: Box::new([false]),
        });
    }

    let column = |values: &[u64], enabled: bool| -> Box<[u64]> {
        if enabled {
            values.into()
        } else {
            vec![0; n].into_boxed_slice()
        }
    };

    let mut last: Vec<bool> = if channel.has_last() {
        record.last.clone()
    } else {
        vec![false; n]
    };
    if incomplete_last_packet {
        let final_word = record.data.iter().rposition(Option::is_some).unwrap_or(0);
        last[final_word] = false;
    }

    Ok(TraceRom {
        data: record.data.iter().map(|d| d.unwrap_or(0)).collect(),
        valid: record.data.iter().map(Option::is_some).collect(),
        id: column(&record.id, channel.id_width().is_some()),
        dest: column(&record.dest, channel.dest_width().is_some()),
        last: last.into_boxed_slice(),
    })
}

impl Process for TracePlayer {
    fn name(&self) -> &str {
        "TracePlayer"
    }

    fn posedge(&mut self, net: &mut Netlist) {
        let ready = net.bus(self.bus).now().ready;
        if self.valid && !ready {
            return;
        }

        let bus = net.bus_mut(self.bus);
        let mut w = bus.drive();
        if self.index < self.rom.len() {
            let i = self.index;
            w.data(self.rom.data[i])
                .valid(self.rom.valid[i])
                .id(self.rom.id[i])
                .dest(self.rom.dest[i])
                .last(self.rom.last[i]);
            self.valid = self.rom.valid[i];
            self.index += 1;
        } else if self.valid {
            w.valid(false);
            self.valid = false;
        }
    }
}
