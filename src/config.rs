use crate::bus::StreamChannel;
use serde::Deserialize;

const DEFAULT_CYCLES: u64 = 100_000;
const DEFAULT_SEED: u64 = 0x5EED_0001;

const DEFAULT_STREAMS: usize = 4;
const DEFAULT_PACKETS: usize = 8;
const DEFAULT_PACKET_LENGTH: usize = 16;

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub channel: StreamChannel,
    #[serde(default)]
    pub traffic: TrafficConfig,
    #[serde(default)]
    pub receiver: ReceiverConfig,
    #[serde(default)]
    pub buffer: BufferConfig,
}

#[derive(Debug, Deserialize)]
pub struct GeneralConfig {
    #[serde(default = "default_cycles")]
    pub max_cycles: u64,
    #[serde(default = "default_seed")]
    pub seed: u64,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            max_cycles: default_cycles(),
            seed: default_seed(),
        }
    }
}

fn default_cycles() -> u64 {
    DEFAULT_CYCLES
}

fn default_seed() -> u64 {
    DEFAULT_SEED
}

/// Shape of the random traffic handed to the driver.
#[derive(Debug, Deserialize, Clone)]
pub struct TrafficConfig {
    #[serde(default = "default_streams")]
    pub streams: usize,

    #[serde(default = "default_packets")]
    pub packets_per_stream: usize,

    #[serde(default = "default_packet_length")]
    pub max_packet_length: usize,

    /// Probability that any generated word is a bubble.
    #[serde(default)]
    pub bubble_probability: f64,

    /// Withhold last on the final packet of every stream.
    #[serde(default)]
    pub incomplete_last_packet: bool,
}

impl Default for TrafficConfig {
    fn default() -> Self {
        Self {
            streams: default_streams(),
            packets_per_stream: default_packets(),
            max_packet_length: default_packet_length(),
            bubble_probability: 0.0,
            incomplete_last_packet: false,
        }
    }
}

fn default_streams() -> usize {
    DEFAULT_STREAMS
}

fn default_packets() -> usize {
    DEFAULT_PACKETS
}

fn default_packet_length() -> usize {
    DEFAULT_PACKET_LENGTH
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReceiverConfig {
    #[serde(default = "default_probability")]
    pub ready_probability: f64,
}

impl Default for ReceiverConfig {
    fn default() -> Self {
        Self {
            ready_probability: default_probability(),
        }
    }
}

fn default_probability() -> f64 {
    1.0
}

/// Optional elastic buffer between the driver and the receiver.
#[derive(Debug, Deserialize, Clone)]
pub struct BufferConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default)]
    pub passive_sink_mode: bool,

    /// Ready probability of the agent driving input ready in passive mode.
    #[serde(default = "default_probability")]
    pub input_ready_probability: f64,

    /// Output channel; defaults to the input channel.
    #[serde(default)]
    pub output_channel: Option<StreamChannel>,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            passive_sink_mode: false,
            input_ready_probability: default_probability(),
            output_channel: None,
        }
    }
}
