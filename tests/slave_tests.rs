//! Slave receiver and stream recorder tests.

use axis_emulator::bus::{Netlist, StreamChannel};
use axis_emulator::common::{ConfigError, StreamId};
use axis_emulator::sim::Simulator;
use axis_emulator::stream::{MasterDriver, ReadyPolicy, SlaveReceiver, StreamRecorder};

fn channel() -> StreamChannel {
    StreamChannel::new(2)
        .unwrap()
        .with_id(3)
        .unwrap()
        .with_dest(3)
        .unwrap()
}

/// Tests probability validation.
#[test]
fn test_ready_policy_from_probability() {
    assert_eq!(ReadyPolicy::from_probability(None), Ok(ReadyPolicy::Passive));
    assert_eq!(
        ReadyPolicy::from_probability(Some(1.0)),
        Ok(ReadyPolicy::Always)
    );
    assert_eq!(
        ReadyPolicy::from_probability(Some(0.25)),
        Ok(ReadyPolicy::Bernoulli(0.25))
    );
    assert_eq!(
        ReadyPolicy::from_probability(Some(1.5)),
        Err(ConfigError::InvalidProbability(1.5))
    );
    assert!(ReadyPolicy::from_probability(Some(-0.1)).is_err());

    let mut net = Netlist::new();
    let bus = net.add_bus(channel());
    assert!(SlaveReceiver::new(bus, ReadyPolicy::Bernoulli(2.0), 0).is_err());
}

/// Tests that an idle bus records bubbles and no packets.
#[test]
fn test_idle_bus_records_bubbles() {
    let mut net = Netlist::new();
    let bus = net.add_bus(channel());
    let mut receiver = SlaveReceiver::new(bus, ReadyPolicy::Always, 0).unwrap();
    let mut sim = Simulator::new(net);

    sim.run(&mut [&mut receiver], 5);

    assert!(receiver.completed_packets().is_empty());
    assert!(receiver.current_packets().is_empty());
    // Ready rises on the first edge, so four ready cycles were sampled.
    let record = receiver.signal_record();
    assert_eq!(record.len(), 4);
    assert!(record.data.iter().all(Option::is_none));
}

/// Tests that the record holds one entry per ready cycle.
#[test]
fn test_signal_record_tracks_ready_cycles() {
    let mut net = Netlist::new();
    let bus = net.add_bus(channel());
    let mut driver = MasterDriver::new(bus, 1);
    let mut receiver = SlaveReceiver::new(bus, ReadyPolicy::Bernoulli(0.5), 2).unwrap();
    let mut sim = Simulator::new(net);
    driver.add_data(StreamId::new(1, 2), [vec![1u128, 2, 3], vec![4, 5]], false);

    let mut ready_cycles = 0;
    for _ in 0..100 {
        if sim.netlist().bus(bus).now().ready {
            ready_cycles += 1;
        }
        sim.step(&mut [&mut driver, &mut receiver]);
    }

    let record = receiver.signal_record();
    assert_eq!(record.len(), ready_cycles);
    assert_eq!(record.transfers(), 5);
    assert_eq!(record.packetise(), receiver.completed_packets());
}

/// Tests that snapshots are independent of the receiver.
#[test]
fn test_snapshots_are_copies() {
    let mut net = Netlist::new();
    let bus = net.add_bus(channel());
    let mut driver = MasterDriver::new(bus, 1);
    let mut receiver = SlaveReceiver::new(bus, ReadyPolicy::Always, 2).unwrap();
    let mut sim = Simulator::new(net);
    driver.add_data(StreamId::default(), [vec![1u128, 2], vec![3]], true);
    sim.run(&mut [&mut driver, &mut receiver], 8);

    let mut completed = receiver.completed_packets();
    completed.clear();
    let mut current = receiver.current_packets();
    current.clear();
    let mut record = receiver.signal_record();
    record.clear();

    assert_eq!(
        receiver.completed_packets()[&StreamId::default()],
        vec![vec![1, 2]]
    );
    assert_eq!(receiver.current_packets()[&StreamId::default()], vec![3]);
    assert!(!receiver.signal_record().is_empty());
}

/// Tests that reset clears everything collected so far.
#[test]
fn test_receiver_reset() {
    let mut net = Netlist::new();
    let bus = net.add_bus(channel());
    let mut driver = MasterDriver::new(bus, 1);
    let mut receiver = SlaveReceiver::new(bus, ReadyPolicy::Always, 2).unwrap();
    let mut sim = Simulator::new(net);
    driver.add_data(StreamId::default(), [vec![1u128, 2], vec![3]], true);
    sim.run(&mut [&mut driver, &mut receiver], 8);

    receiver.reset();
    assert!(receiver.completed_packets().is_empty());
    assert!(receiver.current_packets().is_empty());
    assert!(receiver.signal_record().is_empty());
    assert_eq!(receiver.policy(), ReadyPolicy::Always);
}

/// Tests that a passive receiver never drives ready.
#[test]
fn test_passive_receiver_alone_blocks() {
    let mut net = Netlist::new();
    let bus = net.add_bus(channel());
    let mut driver = MasterDriver::new(bus, 1);
    let mut sniffer = SlaveReceiver::new(bus, ReadyPolicy::Passive, 2).unwrap();
    let mut sim = Simulator::new(net);
    driver.add_data(StreamId::default(), [vec![1u128]], false);
    sim.run(&mut [&mut driver, &mut sniffer], 10);

    assert!(!sim.netlist().bus(bus).now().ready);
    assert!(sim.netlist().bus(bus).now().valid);
    assert!(sniffer.completed_packets().is_empty());
    assert!(sniffer.signal_record().is_empty());
}

/// Tests that passive observers see what the active receiver sees.
#[test]
fn test_passive_observers_match_receiver() {
    let mut net = Netlist::new();
    let bus = net.add_bus(channel());
    let mut driver = MasterDriver::new(bus, 4);
    let mut receiver = SlaveReceiver::new(bus, ReadyPolicy::Bernoulli(0.4), 5).unwrap();
    let mut sniffer = SlaveReceiver::new(bus, ReadyPolicy::Passive, 6).unwrap();
    let mut recorder = StreamRecorder::new(bus);
    let mut sim = Simulator::new(net);

    driver.add_data(StreamId::new(0, 1), [vec![1u128, 2, 3], vec![4]], false);
    driver.add_data(StreamId::new(7, 7), [vec![9u128; 5]], true);
    sim.run(
        &mut [&mut driver, &mut sniffer, &mut receiver, &mut recorder],
        200,
    );

    let expected = receiver.completed_packets();
    assert_eq!(expected[&StreamId::new(0, 1)], vec![vec![1, 2, 3], vec![4]]);
    assert_eq!(sniffer.completed_packets(), expected);
    assert_eq!(sniffer.signal_record(), receiver.signal_record());
    assert_eq!(recorder.recorded_data(), expected);
    assert_eq!(
        recorder.packets_in_progress()[&StreamId::new(7, 7)],
        vec![9; 5]
    );

    recorder.clear();
    assert!(recorder.recorded_data().is_empty());
    assert!(recorder.packets_in_progress().is_empty());
}

/// Tests that a receiver on a channel without id or dest sees one stream.
#[test]
fn test_receiver_without_id_dest() {
    let mut net = Netlist::new();
    let bus = net.add_bus(StreamChannel::new(4).unwrap());
    let mut driver = MasterDriver::new(bus, 4);
    let mut receiver = SlaveReceiver::new(bus, ReadyPolicy::Always, 5).unwrap();
    let mut sim = Simulator::new(net);
    driver.add_data(StreamId::new(0, 0), [vec![1u128], vec![2]], false);
    sim.run(&mut [&mut driver, &mut receiver], 8);

    let completed = receiver.completed_packets();
    assert_eq!(completed.keys().copied().collect::<Vec<_>>(), vec![StreamId::default()]);
    assert_eq!(completed[&StreamId::default()], vec![vec![1], vec![2]]);
}
