//! Cycle Scheduler.
//!
//! The simulator owns a [`Netlist`] and advances it one clock edge at a
//! time with register-transfer semantics:
//!
//! 1. every bus copies its current values into its next values;
//! 2. every process's `posedge` runs against the current values;
//! 3. every bus commits, publishing the next values together;
//! 4. every process's `settle` drives combinational outputs.
//!
//! Processes are borrowed only for the duration of a step, so data can be
//! added to a driver or read from a receiver between cycles but never
//! while one is being evaluated.

use super::traits::Process;
use crate::bus::Netlist;
use crate::stats::SimStats;

/// Clocked simulation of a stream design.
pub struct Simulator {
    net: Netlist,
    settled: bool,
    /// Per-bus handshake statistics.
    pub stats: SimStats,
}

impl Simulator {
    /// Creates a simulator for `net`.
    pub fn new(net: Netlist) -> Self {
        let stats = SimStats::new(net.bus_count());
        Self {
            net,
            settled: false,
            stats,
        }
    }

    pub fn netlist(&self) -> &Netlist {
        &self.net
    }

    /// Mutable netlist access for stimulus applied between cycles.
    pub fn netlist_mut(&mut self) -> &mut Netlist {
        &mut self.net
    }

    /// Number of edges simulated so far.
    pub fn cycle(&self) -> u64 {
        self.stats.cycles
    }

    /// Runs only the combinational phase.
    ///
    /// Happens automatically before the first edge; call it again after
    /// changing signals by hand between cycles.
    pub fn settle(&mut self, procs: &mut [&mut dyn Process]) {
        for p in procs.iter() {
            p.settle(&mut self.net);
        }
        self.settled = true;
    }

    /// Simulates one rising clock edge.
    pub fn step(&mut self, procs: &mut [&mut dyn Process]) {
        if !self.settled {
            self.settle(procs);
        }

        for bus in self.net.buses_mut() {
            bus.begin_cycle();
        }
        self.stats.sample(self.net.buses());

        for p in procs.iter_mut() {
            #[cfg(feature = "always-trace")]
            tracing::trace!(cycle = self.stats.cycles, process = p.name(), "posedge");
            p.posedge(&mut self.net);
        }

        for bus in self.net.buses_mut() {
            bus.commit();
        }

        for p in procs.iter() {
            p.settle(&mut self.net);
        }

        #[cfg(feature = "always-trace")]
        tracing::trace!(cycle = self.stats.cycles, "edge complete");
    }

    /// Simulates `cycles` edges.
    pub fn run(&mut self, procs: &mut [&mut dyn Process], cycles: u64) {
        for _ in 0..cycles {
            self.step(procs);
        }
    }

    /// Steps until `done` holds for the netlist or `max_cycles` edges have
    /// been simulated in this call. Returns whether `done` was reached.
    pub fn run_until<F>(
        &mut self,
        procs: &mut [&mut dyn Process],
        max_cycles: u64,
        mut done: F,
    ) -> bool
    where
        F: FnMut(&Netlist) -> bool,
    {
        for _ in 0..max_cycles {
            self.step(procs);
            if done(&self.net) {
                return true;
            }
        }
        tracing::warn!(max_cycles, "run_until gave up");
        false
    }
}
