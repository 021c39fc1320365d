//! Stream Emulator CLI.
//!
//! Runs one stream scenario end to end and checks that every packet sent
//! arrives intact.
//!
//! # Usage
//!
//! The emulator can run in two modes:
//! 1. **Random Mode**: A master driver sends random multi-stream traffic
//!    generated from the configuration.
//! 2. **Replay Mode**: A trace player replays a signal record previously
//!    written with `--record`.
//!
//! In both modes the traffic optionally passes through an elastic buffer
//! before reaching a slave receiver.

use anyhow::{Context, Result};
use clap::Parser;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;
use std::process;

use axis_emulator::bus::Netlist;
use axis_emulator::common::CompletedPackets;
use axis_emulator::config::Config;
use axis_emulator::sim::{loader, scenario, Process, Simulator};
use axis_emulator::stream::{
    ElasticBuffer, MasterDriver, ReadyPolicy, SinkMode, SlaveReceiver, TracePlayer,
};

/// Command-line arguments for the stream emulator.
#[derive(Parser, Debug)]
#[command(author, version, about = "AXI4-Stream Handshake Emulator")]
struct Args {
    #[arg(short, long, default_value = "configs/default.toml")]
    config: String,

    /// Replay this signal record instead of generating random traffic.
    #[arg(long)]
    replay: Option<String>,

    /// Write the receiver's signal record to this file.
    #[arg(long)]
    record: Option<String>,

    /// Write the trace player's ROM tables to this file (replay mode only).
    #[arg(long)]
    dump_rom: Option<String>,

    #[arg(long)]
    cycles: Option<u64>,

    #[arg(long)]
    seed: Option<u64>,
}

/// Where the traffic comes from.
enum Source {
    Driver(MasterDriver),
    Player(TracePlayer),
}

impl Source {
    fn done(&self) -> bool {
        match self {
            Source::Driver(d) => d.is_idle(),
            Source::Player(p) => p.finished(),
        }
    }

    fn process(&mut self) -> &mut dyn Process {
        match self {
            Source::Driver(d) => d,
            Source::Player(p) => p,
        }
    }
}

fn init_tracing() {
    let default_level = if cfg!(feature = "always-trace") {
        "trace"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();
}

fn print_config(config: &Config) {
    let ch = &config.channel;
    println!("Global Configuration");
    println!("--------------------");
    println!("General:");
    println!("  Max Cycles:         {}", config.general.max_cycles);
    println!("  Seed:               {:#x}", config.general.seed);
    println!("Channel:");
    println!("  Bus Width:          {} bytes", ch.bus_width());
    println!("  TID Width:          {:?}", ch.id_width());
    println!("  TDEST Width:        {:?}", ch.dest_width());
    println!("  TLAST:              {}", ch.has_last());
    println!("Traffic:");
    println!("  Streams:            {}", config.traffic.streams);
    println!("  Packets/Stream:     {}", config.traffic.packets_per_stream);
    println!("  Max Packet Length:  {}", config.traffic.max_packet_length);
    println!("  Bubble Probability: {}", config.traffic.bubble_probability);
    println!("Receiver:");
    println!("  Ready Probability:  {}", config.receiver.ready_probability);
    println!("Buffer:");
    println!(
        "  Elastic Buffer:     {}",
        if !config.buffer.enabled {
            "Disabled"
        } else if config.buffer.passive_sink_mode {
            "Passive"
        } else {
            "Active"
        }
    );
    println!("--------------------");
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let mut config = loader::load_config(&args.config)?;
    if let Some(cycles) = args.cycles {
        config.general.max_cycles = cycles;
    }
    if let Some(seed) = args.seed {
        config.general.seed = seed;
    }
    print_config(&config);

    let seed = config.general.seed;
    let mut net = Netlist::new();
    let input = net.add_bus(config.channel.clone());
    let output = if config.buffer.enabled {
        let out_channel = config
            .buffer
            .output_channel
            .clone()
            .unwrap_or_else(|| config.channel.clone());
        net.add_bus(out_channel)
    } else {
        input
    };
    let has_last = net.bus(output).channel().has_last() && config.channel.has_last();

    let (mut source, expected): (Source, CompletedPackets) = if let Some(path) = &args.replay {
        println!("[*] Replay Mode");
        println!("    Trace: {}", path);
        let record = loader::load_record(path)?;
        let player = TracePlayer::new(&net, input, &record, false)
            .with_context(|| format!("Failed to load trace {}", path))?;
        if let Some(rom_path) = &args.dump_rom {
            loader::save_json(rom_path, player.rom())?;
        }
        (Source::Player(player), record.packetise())
    } else {
        println!("[*] Random Mode");
        let mut rng = Xoshiro256StarStar::seed_from_u64(seed);
        let traffic = scenario::random_traffic(&mut rng, &config.channel, &config.traffic);
        let mut driver = MasterDriver::new(input, seed.wrapping_add(1));
        for (stream, packets) in &traffic {
            driver.add_data(
                *stream,
                packets.iter().cloned(),
                config.traffic.incomplete_last_packet,
            );
        }
        (Source::Driver(driver), scenario::expected_packets(&traffic))
    };

    let mut buffer = if config.buffer.enabled {
        let mode = if config.buffer.passive_sink_mode {
            SinkMode::Passive
        } else {
            SinkMode::Active
        };
        Some(ElasticBuffer::new(&net, input, output, mode)?)
    } else {
        None
    };

    let mut input_agent = if config.buffer.enabled && config.buffer.passive_sink_mode {
        let policy = ReadyPolicy::from_probability(Some(config.buffer.input_ready_probability))?;
        Some(SlaveReceiver::new(input, policy, seed.wrapping_add(2))?)
    } else {
        None
    };

    let policy = ReadyPolicy::from_probability(Some(config.receiver.ready_probability))?;
    let mut sink = SlaveReceiver::new(output, policy, seed.wrapping_add(3))?;

    let mut sim = Simulator::new(net);
    let mut drained = false;
    while sim.cycle() < config.general.max_cycles {
        {
            let mut procs: Vec<&mut dyn Process> = vec![source.process()];
            if let Some(agent) = input_agent.as_mut() {
                procs.push(agent);
            }
            if let Some(buffer) = buffer.as_mut() {
                procs.push(buffer);
            }
            procs.push(&mut sink);
            sim.step(&mut procs);
        }

        let net = sim.netlist();
        let buffer_empty = buffer.as_ref().map_or(true, |b| b.occupancy() == 0);
        if source.done()
            && buffer_empty
            && !net.bus(input).now().valid
            && !net.bus(output).now().valid
        {
            drained = true;
            break;
        }
    }

    sim.stats.print();

    if let Some(path) = &args.record {
        loader::save_json(path, &sink.signal_record())?;
    }

    if !drained {
        eprintln!(
            "\n[!] Traffic did not drain within {} cycles",
            config.general.max_cycles
        );
        process::exit(1);
    }

    let matched = if has_last {
        scenario::received_packets(&sink.completed_packets(), &sink.current_packets()) == expected
    } else {
        sink.current_packets() == scenario::flatten_streams(&expected)
    };

    if matched {
        let words: usize = expected.values().flatten().map(Vec::len).sum();
        println!("\n[*] All {} words received intact", words);
        Ok(())
    } else {
        eprintln!("\n[!] Received packets differ from the packets sent");
        process::exit(1);
    }
}
