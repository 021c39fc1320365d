//! Simulation statistics collection and reporting.
//!
//! Tracks handshake activity per bus: how many cycles transferred a word,
//! how many stalled on backpressure, and how many were idle.

use crate::bus::StreamBus;
use std::time::Instant;

/// Handshake counters for one bus.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BusStats {
    /// Cycles with valid and ready both high.
    pub transfers: u64,
    /// Transfers with last high.
    pub packets: u64,
    /// Cycles with valid high and ready low.
    pub stalls: u64,
    /// Cycles with ready high and valid low.
    pub starved: u64,
    /// Cycles with neither valid nor ready.
    pub idle: u64,
}

impl BusStats {
    fn sample(&mut self, bus: &StreamBus) {
        let s = bus.now();
        match (s.valid, s.ready) {
            (true, true) => {
                self.transfers += 1;
                if s.last_or_false() {
                    self.packets += 1;
                }
            }
            (true, false) => self.stalls += 1,
            (false, true) => self.starved += 1,
            (false, false) => self.idle += 1,
        }
    }
}

/// Simulation statistics structure tracking all buses.
pub struct SimStats {
    start_time: Instant,
    pub cycles: u64,
    pub buses: Vec<BusStats>,
}

impl SimStats {
    /// Creates zeroed counters for `bus_count` buses.
    pub fn new(bus_count: usize) -> Self {
        Self {
            start_time: Instant::now(),
            cycles: 0,
            buses: vec![BusStats::default(); bus_count],
        }
    }

    /// Counts one edge; `buses` holds the values sampled by that edge.
    pub(crate) fn sample(&mut self, buses: &[StreamBus]) {
        self.cycles += 1;
        if self.buses.len() < buses.len() {
            self.buses.resize(buses.len(), BusStats::default());
        }
        for (stats, bus) in self.buses.iter_mut().zip(buses) {
            stats.sample(bus);
        }
    }

    /// Prints a formatted summary of all bus statistics.
    pub fn print(&self) {
        let seconds = self.start_time.elapsed().as_secs_f64();
        let cyc = if self.cycles == 0 { 1 } else { self.cycles };
        let khz = if seconds > 0.0 {
            (self.cycles as f64 / seconds) / 1000.0
        } else {
            0.0
        };

        println!("\n==========================================================");
        println!("STREAM SIMULATION STATISTICS");
        println!("==========================================================");
        println!("host_seconds             {:.4} s", seconds);
        println!("sim_cycles               {}", self.cycles);
        println!("sim_freq                 {:.2} kHz", khz);

        for (n, bus) in self.buses.iter().enumerate() {
            let pct = |v: u64| (v as f64 / cyc as f64) * 100.0;
            println!("----------------------------------------------------------");
            println!("BUS {}", n);
            println!(
                "  transfers              {} ({:.2}%)",
                bus.transfers,
                pct(bus.transfers)
            );
            println!("  packets                {}", bus.packets);
            println!(
                "  stalls                 {} ({:.2}%)",
                bus.stalls,
                pct(bus.stalls)
            );
            println!(
                "  starved                {} ({:.2}%)",
                bus.starved,
                pct(bus.starved)
            );
            println!("  idle                   {} ({:.2}%)", bus.idle, pct(bus.idle));
        }
        println!("==========================================================");
    }
}
