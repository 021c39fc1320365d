//! Bus signal, netlist and scheduler tests.

use axis_emulator::bus::{BusId, BusSignals, Netlist, StreamBus, StreamChannel};
use axis_emulator::common::{Beat, StreamId};
use axis_emulator::sim::{Process, Simulator};

/// Tests that reset values follow the channel shape.
#[test]
fn test_reset_values() {
    let ch = StreamChannel::new(4)
        .unwrap()
        .with_dest(2)
        .unwrap()
        .valid_init(true)
        .with_strb();
    let s = BusSignals::for_channel(&ch);

    assert!(s.valid);
    assert!(!s.ready);
    assert_eq!(s.last, Some(false));
    assert_eq!(s.id, None);
    assert_eq!(s.dest, Some(0));
    assert_eq!(s.strb, Some(0));
    assert_eq!(s.keep, None);
    assert_eq!(s.user, None);
}

/// Tests that writes are masked to the field widths.
#[test]
fn test_writer_masks_values() {
    let ch = StreamChannel::new(1)
        .unwrap()
        .with_id(3)
        .unwrap()
        .with_user(1)
        .unwrap();
    let mut bus = StreamBus::new(ch);
    bus.drive_comb().data(0x1234).id(0xF).user(0x3).valid(true);

    let s = bus.now();
    assert_eq!(s.data, 0x34);
    assert_eq!(s.id, Some(0x7));
    assert_eq!(s.user, Some(0x1));
    assert!(s.valid);
}

/// Tests that writes to absent fields are dropped.
#[test]
fn test_writer_ignores_absent_fields() {
    let mut bus = StreamBus::new(StreamChannel::new(4).unwrap().without_last());
    bus.drive_comb().last(true).id(3).dest(4).user(5);

    let s = bus.now();
    assert_eq!(s.last, None);
    assert_eq!(s.id, None);
    assert_eq!(s.dest, None);
    assert_eq!(s.user, None);
    assert_eq!(s.stream(), StreamId::default());
    assert!(!s.last_or_false());
}

/// Tests that registered writes only appear after commit.
#[test]
fn test_registered_write_visible_after_commit() {
    let mut bus = StreamBus::new(StreamChannel::new(4).unwrap());
    bus.begin_cycle();
    bus.drive().valid(true).data(9);

    assert!(!bus.now().valid);
    assert!(bus.next().valid);

    bus.commit();
    assert!(bus.now().valid);
    assert_eq!(bus.now().data, 9);

    // Undriven signals hold across the next edge.
    bus.begin_cycle();
    bus.commit();
    assert!(bus.now().valid);
    assert_eq!(bus.now().data, 9);
}

/// Tests driving a whole beat at once.
#[test]
fn test_writer_beat() {
    let ch = StreamChannel::new(2)
        .unwrap()
        .with_id(4)
        .unwrap()
        .with_dest(4)
        .unwrap();
    let mut bus = StreamBus::new(ch);
    let beat = Beat {
        data: 0xBEEF,
        last: true,
        id: 0x12,
        dest: 0x3,
    };
    bus.drive_comb().beat(&beat);

    assert_eq!(
        bus.now().beat(),
        Beat {
            data: 0xBEEF,
            last: true,
            id: 0x2,
            dest: 0x3,
        }
    );
}

/// Tests netlist handles and reset lines.
#[test]
fn test_netlist_handles() {
    let mut net = Netlist::new();
    let a = net.add_bus(StreamChannel::new(1).unwrap());
    let b = net.add_bus(StreamChannel::new(8).unwrap());
    let rst = net.add_reset(true);

    assert_ne!(a, b);
    assert_eq!(net.bus_count(), 2);
    assert_eq!(net.bus(b).channel().bus_width(), 8);
    assert!(net.reset(rst));
    net.set_reset(rst, false);
    assert!(!net.reset(rst));
}

/// Registered toggle used to check edge ordering.
struct Toggle {
    bus: BusId,
}

impl Process for Toggle {
    fn name(&self) -> &str {
        "Toggle"
    }

    fn posedge(&mut self, net: &mut Netlist) {
        let valid = net.bus(self.bus).now().valid;
        net.bus_mut(self.bus).drive().valid(!valid);
    }
}

/// Registered process copying valid from one bus to another.
struct Follower {
    from: BusId,
    to: BusId,
}

impl Process for Follower {
    fn name(&self) -> &str {
        "Follower"
    }

    fn posedge(&mut self, net: &mut Netlist) {
        let valid = net.bus(self.from).now().valid;
        net.bus_mut(self.to).drive().valid(valid);
    }
}

/// Tests that every process sees the values from before the edge.
#[test]
fn test_posedge_reads_previous_values() {
    let mut net = Netlist::new();
    let a = net.add_bus(StreamChannel::new(1).unwrap());
    let b = net.add_bus(StreamChannel::new(1).unwrap());
    let mut sim = Simulator::new(net);
    let mut toggle = Toggle { bus: a };
    let mut follower = Follower { from: a, to: b };

    let mut seen = Vec::new();
    for _ in 0..4 {
        // Follower first: order must not matter.
        sim.step(&mut [&mut follower, &mut toggle]);
        let net = sim.netlist();
        seen.push((net.bus(a).now().valid, net.bus(b).now().valid));
    }

    assert_eq!(
        seen,
        vec![(true, false), (false, true), (true, false), (false, true)]
    );
    assert_eq!(sim.cycle(), 4);
}

/// Tests that the statistics classify every cycle.
#[test]
fn test_stats_classification() {
    let mut net = Netlist::new();
    let a = net.add_bus(StreamChannel::new(1).unwrap());
    let mut sim = Simulator::new(net);
    let mut toggle = Toggle { bus: a };

    sim.run(&mut [&mut toggle], 6);
    let stats = &sim.stats.buses[0];
    assert_eq!(stats.transfers, 0);
    assert_eq!(stats.stalls + stats.idle, 6);
    assert_eq!(stats.stalls, 3);
}

/// Tests that run_until stops on the predicate or gives up.
#[test]
fn test_run_until() {
    let mut net = Netlist::new();
    let a = net.add_bus(StreamChannel::new(1).unwrap());
    let b = net.add_bus(StreamChannel::new(1).unwrap());
    let mut sim = Simulator::new(net);
    let mut toggle = Toggle { bus: a };
    let mut follower = Follower { from: a, to: b };

    let reached = sim.run_until(&mut [&mut toggle, &mut follower], 10, |net| {
        net.bus(b).now().valid
    });
    assert!(reached);
    assert_eq!(sim.cycle(), 2);

    let reached = sim.run_until(&mut [&mut toggle], 5, |net| net.bus(b).now().ready);
    assert!(!reached);
    assert_eq!(sim.cycle(), 7);
}
