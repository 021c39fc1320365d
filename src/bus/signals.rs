//! Stream Bus Signals.
//!
//! A [`StreamBus`] holds two copies of a channel's signal values: `now`,
//! which every process reads during a clock edge, and `next`, which
//! registered processes write. Committing the bus publishes `next` as the
//! new `now`, so every update made on one edge becomes visible together.
//! Combinational drivers write `now` directly during the settle phase.

use super::channel::{width_mask, StreamChannel};
use crate::common::{Beat, SignalSample, StreamId};

/// Values of every signal on a stream bus.
///
/// Optional fields are `Some` iff the channel carries them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BusSignals {
    pub valid: bool,
    pub ready: bool,
    pub data: u128,
    pub last: Option<bool>,
    pub id: Option<u64>,
    pub dest: Option<u64>,
    pub user: Option<u64>,
    pub strb: Option<u64>,
    pub keep: Option<u64>,
}

impl BusSignals {
    /// Reset values for `channel`.
    pub fn for_channel(channel: &StreamChannel) -> Self {
        Self {
            valid: channel.valid_init_level(),
            ready: channel.ready_init_level(),
            data: 0,
            last: channel.has_last().then_some(false),
            id: channel.id_width().map(|_| 0),
            dest: channel.dest_width().map(|_| 0),
            user: channel.user_width().map(|_| 0),
            strb: channel.has_strb().then_some(0),
            keep: channel.has_keep().then_some(0),
        }
    }

    /// Returns `true` if a transfer happens on the coming edge.
    #[inline(always)]
    pub fn transfer(&self) -> bool {
        self.valid && self.ready
    }

    /// Stream the current word belongs to; absent fields read as 0.
    pub fn stream(&self) -> StreamId {
        StreamId::new(self.id.unwrap_or(0), self.dest.unwrap_or(0))
    }

    /// Last indicator; absent reads as false.
    pub fn last_or_false(&self) -> bool {
        self.last.unwrap_or(false)
    }

    /// Data and framing as a beat.
    pub fn beat(&self) -> Beat {
        Beat {
            data: self.data,
            last: self.last_or_false(),
            id: self.id.unwrap_or(0),
            dest: self.dest.unwrap_or(0),
        }
    }

    /// The bus as seen by a recorder for one ready cycle.
    pub fn sample(&self) -> SignalSample {
        SignalSample {
            data: self.valid.then_some(self.data),
            id: self.id.unwrap_or(0),
            dest: self.dest.unwrap_or(0),
            last: self.last_or_false(),
        }
    }
}

/// One stream channel and its current and next signal values.
#[derive(Clone, Debug)]
pub struct StreamBus {
    channel: StreamChannel,
    now: BusSignals,
    next: BusSignals,
}

impl StreamBus {
    /// Creates a bus holding the channel's reset values.
    pub fn new(channel: StreamChannel) -> Self {
        let now = BusSignals::for_channel(&channel);
        Self {
            next: now.clone(),
            now,
            channel,
        }
    }

    /// Shape of this bus.
    pub fn channel(&self) -> &StreamChannel {
        &self.channel
    }

    /// Values visible this cycle.
    pub fn now(&self) -> &BusSignals {
        &self.now
    }

    /// Values that will become visible after the coming edge.
    pub fn next(&self) -> &BusSignals {
        &self.next
    }

    /// Starts an edge: signals not driven this edge keep their value.
    pub fn begin_cycle(&mut self) {
        self.next.clone_from(&self.now);
    }

    /// Publishes the registered values.
    pub fn commit(&mut self) {
        std::mem::swap(&mut self.now, &mut self.next);
    }

    /// Writer for registered (edge-triggered) updates.
    pub fn drive(&mut self) -> SignalWriter<'_> {
        SignalWriter {
            channel: &self.channel,
            signals: &mut self.next,
        }
    }

    /// Writer for combinational updates, visible immediately.
    pub fn drive_comb(&mut self) -> SignalWriter<'_> {
        SignalWriter {
            channel: &self.channel,
            signals: &mut self.now,
        }
    }
}

/// Masked write access to one copy of a bus's signals.
///
/// Values are truncated to the channel's field widths, and writes to a
/// field the channel does not carry are silently dropped.
pub struct SignalWriter<'a> {
    channel: &'a StreamChannel,
    signals: &'a mut BusSignals,
}

impl SignalWriter<'_> {
    pub fn valid(&mut self, level: bool) -> &mut Self {
        self.signals.valid = level;
        self
    }

    pub fn ready(&mut self, level: bool) -> &mut Self {
        self.signals.ready = level;
        self
    }

    pub fn data(&mut self, value: u128) -> &mut Self {
        self.signals.data = value & self.channel.data_mask();
        self
    }

    pub fn last(&mut self, level: bool) -> &mut Self {
        if let Some(last) = self.signals.last.as_mut() {
            *last = level;
        }
        self
    }

    pub fn id(&mut self, value: u64) -> &mut Self {
        if let (Some(id), Some(width)) = (self.signals.id.as_mut(), self.channel.id_width()) {
            *id = value & width_mask(width);
        }
        self
    }

    pub fn dest(&mut self, value: u64) -> &mut Self {
        if let (Some(dest), Some(width)) = (self.signals.dest.as_mut(), self.channel.dest_width())
        {
            *dest = value & width_mask(width);
        }
        self
    }

    pub fn user(&mut self, value: u64) -> &mut Self {
        if let (Some(user), Some(width)) = (self.signals.user.as_mut(), self.channel.user_width())
        {
            *user = value & width_mask(width);
        }
        self
    }

    /// Drives data, last, id and dest from a beat.
    pub fn beat(&mut self, beat: &Beat) -> &mut Self {
        self.data(beat.data).last(beat.last).id(beat.id).dest(beat.dest)
    }
}
