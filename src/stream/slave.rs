//! Stream Slave Receiver.
//!
//! A bus functional model of the consuming end of a stream channel. It
//! drives ready according to a [`ReadyPolicy`], sorts transferred words into
//! per-stream packets by `(id, dest)`, and keeps a raw record of the bus on
//! every cycle it was ready so a test can see exactly which cycles carried
//! nothing.

use super::assembler::PacketAssembler;
use crate::bus::{BusId, Netlist};
use crate::common::{CompletedPackets, ConfigError, CurrentPackets, SignalRecord};
use crate::sim::Process;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;

/// How the receiver drives ready.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ReadyPolicy {
    /// Ready high on every cycle.
    Always,
    /// Ready high with the given probability, drawn independently per cycle.
    Bernoulli(f64),
    /// Never drive ready; sniff a bus whose ready is driven elsewhere.
    Passive,
}

impl ReadyPolicy {
    /// Policy from an optional probability: `None` is passive, `1.0` is
    /// always.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidProbability`] unless `0 <= p <= 1`.
    pub fn from_probability(p: Option<f64>) -> Result<Self, ConfigError> {
        match p {
            None => Ok(ReadyPolicy::Passive),
            Some(p) if !(0.0..=1.0).contains(&p) => Err(ConfigError::InvalidProbability(p)),
            Some(p) if p == 1.0 => Ok(ReadyPolicy::Always),
            Some(p) => Ok(ReadyPolicy::Bernoulli(p)),
        }
    }
}

/// Consumer-side bus functional model.
pub struct SlaveReceiver {
    bus: BusId,
    policy: ReadyPolicy,
    rng: Xoshiro256StarStar,
    packets: PacketAssembler,
    record: SignalRecord,
}

impl SlaveReceiver {
    /// Creates a receiver on `bus`; `seed` feeds the Bernoulli ready draws.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidProbability`] for a Bernoulli policy outside
    /// `[0, 1]`.
    pub fn new(bus: BusId, policy: ReadyPolicy, seed: u64) -> Result<Self, ConfigError> {
        if let ReadyPolicy::Bernoulli(p) = policy {
            if !(0.0..=1.0).contains(&p) {
                return Err(ConfigError::InvalidProbability(p));
            }
        }
        Ok(Self {
            bus,
            policy,
            rng: Xoshiro256StarStar::seed_from_u64(seed),
            packets: PacketAssembler::default(),
            record: SignalRecord::new(),
        })
    }

    pub fn policy(&self) -> ReadyPolicy {
        self.policy
    }

    /// Snapshot of the completed packets per stream.
    pub fn completed_packets(&self) -> CompletedPackets {
        self.packets.completed().clone()
    }

    /// Snapshot of the packet in progress on each stream.
    pub fn current_packets(&self) -> CurrentPackets {
        self.packets.current().clone()
    }

    /// Snapshot of the raw signal record.
    pub fn signal_record(&self) -> SignalRecord {
        self.record.clone()
    }

    /// Clears completed packets, packets in progress and the signal record.
    pub fn reset(&mut self) {
        self.packets.clear();
        self.record.clear();
    }
}

impl Process for SlaveReceiver {
    fn name(&self) -> &str {
        "SlaveReceiver"
    }

    fn posedge(&mut self, net: &mut Netlist) {
        let ready = match self.policy {
            ReadyPolicy::Always => Some(true),
            ReadyPolicy::Bernoulli(p) => Some(p > self.rng.gen::<f64>()),
            ReadyPolicy::Passive => None,
        };

        let now = net.bus(self.bus).now();
        if now.ready {
            self.record.push(now.sample());
        }
        self.packets.observe(now);

        if let Some(level) = ready {
            net.bus_mut(self.bus).drive().ready(level);
        }
    }
}
