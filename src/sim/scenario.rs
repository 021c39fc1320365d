//! Random Traffic Generation.
//!
//! Builds reproducible random workloads for drivers and trace players, and
//! the packet sets a receiver is expected to end up with.

use crate::bus::StreamChannel;
use crate::common::{
    trim_empty_packets, CompletedPackets, CurrentPackets, SignalRecord, SignalSample, StreamId,
    Word,
};
use crate::config::TrafficConfig;
use rand::Rng;
use std::collections::{BTreeMap, BTreeSet, VecDeque};

/// Packets (with bubbles) per stream, as handed to a driver.
pub type Traffic = BTreeMap<StreamId, Vec<Vec<Word>>>;

/// Picks up to `count` distinct stream identifiers that fit the channel.
///
/// Channels without id or dest only offer 0 for that field, so fewer
/// streams than requested may be returned.
pub fn unique_streams<R: Rng>(
    rng: &mut R,
    channel: &StreamChannel,
    count: usize,
) -> Vec<StreamId> {
    let id_max = field_max(channel.id_width());
    let dest_max = field_max(channel.dest_width());
    let available = (id_max.saturating_add(1)).saturating_mul(dest_max.saturating_add(1));
    let count = count.min(usize::try_from(available).unwrap_or(usize::MAX));

    let mut streams = BTreeSet::new();
    while streams.len() < count {
        streams.insert(StreamId::new(
            rng.gen_range(0..=id_max),
            rng.gen_range(0..=dest_max),
        ));
    }
    streams.into_iter().collect()
}

fn field_max(width: Option<u32>) -> u64 {
    match width {
        None => 0,
        Some(w) if w >= 64 => u64::MAX,
        Some(w) => (1u64 << w) - 1,
    }
}

/// Generates random packets for each of up to `cfg.streams` streams.
///
/// Packet lengths are uniform in `0..=max_packet_length`, so empty packets
/// occur; each word is a bubble with `cfg.bubble_probability`.
pub fn random_traffic<R: Rng>(
    rng: &mut R,
    channel: &StreamChannel,
    cfg: &TrafficConfig,
) -> Traffic {
    let mask = channel.data_mask();
    unique_streams(rng, channel, cfg.streams)
        .into_iter()
        .map(|stream| {
            let packets = (0..cfg.packets_per_stream)
                .map(|_| {
                    let len = rng.gen_range(0..=cfg.max_packet_length);
                    (0..len)
                        .map(|_| {
                            if rng.gen_bool(cfg.bubble_probability.clamp(0.0, 1.0)) {
                                Word::Bubble
                            } else {
                                Word::Data(rng.gen_range(0..=mask))
                            }
                        })
                        .collect()
                })
                .collect();
            (stream, packets)
        })
        .collect()
}

/// Packets a receiver should see for `traffic`: bubbles removed, empty
/// packets and streams trimmed.
pub fn expected_packets(traffic: &Traffic) -> CompletedPackets {
    let stripped: CompletedPackets = traffic
        .iter()
        .map(|(stream, packets)| {
            let packets = packets
                .iter()
                .map(|p| p.iter().filter_map(Word::value).collect())
                .collect();
            (*stream, packets)
        })
        .collect();
    trim_empty_packets(&stripped)
}

/// Merges completed and in-progress packets into one map, the in-progress
/// packet (if any) appended last on its stream.
pub fn received_packets(
    completed: &CompletedPackets,
    current: &CurrentPackets,
) -> CompletedPackets {
    let mut merged = completed.clone();
    for (stream, packet) in current {
        merged.entry(*stream).or_default().push(packet.clone());
    }
    trim_empty_packets(&merged)
}

/// Concatenates every packet of each stream, for channels without last.
pub fn flatten_streams(packets: &CompletedPackets) -> CurrentPackets {
    packets
        .iter()
        .map(|(stream, list)| (*stream, list.concat()))
        .filter(|(_, words)| !words.is_empty())
        .collect()
}

/// Builds a random interleaved trace of complete packets.
///
/// Each cycle takes the next word of a randomly chosen stream, setting last
/// on the final word of each packet. With `bubble_probability` a cycle is a
/// bubble instead, carrying a random stream and last value that must be
/// ignored downstream. Returns the trace and the packets it encodes.
pub fn random_signal_record<R: Rng>(
    rng: &mut R,
    channel: &StreamChannel,
    cfg: &TrafficConfig,
) -> (SignalRecord, CompletedPackets) {
    let traffic = random_traffic(
        rng,
        channel,
        &TrafficConfig {
            bubble_probability: 0.0,
            ..cfg.clone()
        },
    );
    let expected = expected_packets(&traffic);

    let mut pending: BTreeMap<StreamId, VecDeque<VecDeque<u128>>> = expected
        .iter()
        .map(|(stream, packets)| {
            (
                *stream,
                packets.iter().map(|p| p.iter().copied().collect()).collect(),
            )
        })
        .collect();

    let mut record = SignalRecord::new();
    while !pending.is_empty() {
        let keys: Vec<StreamId> = pending.keys().copied().collect();
        let stream = keys[rng.gen_range(0..keys.len())];

        if rng.gen_bool(cfg.bubble_probability.clamp(0.0, 1.0)) {
            record.push(SignalSample {
                data: None,
                id: stream.id,
                dest: stream.dest,
                last: rng.gen(),
            });
            continue;
        }

        let Some(packets) = pending.get_mut(&stream) else {
            continue;
        };
        let Some(packet) = packets.front_mut() else {
            continue;
        };
        let value = packet.pop_front();
        let last = packet.is_empty();
        record.push(SignalSample {
            data: value,
            id: stream.id,
            dest: stream.dest,
            last,
        });
        if last {
            packets.pop_front();
        }
        if packets.is_empty() {
            pending.remove(&stream);
        }
    }

    (record, expected)
}
