//! Elastic Stream Buffer.
//!
//! An unbounded FIFO between two stream buses with independent handshake
//! timing. When the consumer keeps up, the output is wired straight to the
//! input and the buffer adds no latency. Once the consumer falls behind,
//! words are queued and the output is driven from a bypass register holding
//! the oldest queued word, until the queue drains again.
//!
//! # States
//!
//! * `Passthrough`: output mirrors input combinationally.
//! * `Buffered`: output presents the bypass register with valid high.
//! * `AwaitingInput`: the output side took a word the input side has not
//!   yet handed over (only possible when input ready is driven by someone
//!   else). Output valid is held low until that input transfer happens.

use crate::bus::{BusId, Netlist};
use crate::common::{Beat, ConfigError};
use crate::sim::Process;
use std::collections::VecDeque;

/// Who drives ready on the input bus.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SinkMode {
    /// The buffer asserts input ready every cycle.
    #[default]
    Active,
    /// The buffer never touches input ready and copies whatever transfers.
    Passive,
}

/// Output-side state of the buffer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BufferState {
    #[default]
    Passthrough,
    Buffered,
    AwaitingInput,
}

/// Unbounded elastic buffer between two stream buses.
pub struct ElasticBuffer {
    input: BusId,
    output: BusId,
    mode: SinkMode,
    state: BufferState,
    queue: VecDeque<Beat>,
    bypass: Beat,
}

impl ElasticBuffer {
    /// Creates a buffer from `input` to `output`.
    ///
    /// The output's id and dest must be present and at least as wide as the
    /// input's whenever the input carries them. A missing id or dest on the
    /// input is driven as 0 on the output.
    ///
    /// # Errors
    ///
    /// [`ConfigError::MissingOutputField`] or
    /// [`ConfigError::NarrowerOutputField`] if the output cannot carry the
    /// input's id or dest.
    pub fn new(
        net: &Netlist,
        input: BusId,
        output: BusId,
        mode: SinkMode,
    ) -> Result<Self, ConfigError> {
        let in_ch = net.bus(input).channel();
        let out_ch = net.bus(output).channel();
        check_promotion("id", in_ch.id_width(), out_ch.id_width())?;
        check_promotion("dest", in_ch.dest_width(), out_ch.dest_width())?;

        tracing::debug!(?mode, "elastic buffer created");
        Ok(Self {
            input,
            output,
            mode,
            state: BufferState::Passthrough,
            queue: VecDeque::new(),
            bypass: Beat::default(),
        })
    }

    pub fn state(&self) -> BufferState {
        self.state
    }

    pub fn mode(&self) -> SinkMode {
        self.mode
    }

    /// Number of queued words, not counting the bypass register.
    pub fn occupancy(&self) -> usize {
        self.queue.len()
    }
}

fn check_promotion(
    field: &'static str,
    input: Option<u32>,
    output: Option<u32>,
) -> Result<(), ConfigError> {
    match (input, output) {
        (Some(_), None) => Err(ConfigError::MissingOutputField { field }),
        (Some(input), Some(output)) if input > output => Err(ConfigError::NarrowerOutputField {
            field,
            input,
            output,
        }),
        _ => Ok(()),
    }
}

impl Process for ElasticBuffer {
    fn name(&self) -> &str {
        "ElasticBuffer"
    }

    fn posedge(&mut self, net: &mut Netlist) {
        let input = net.bus(self.input).now();
        let transact_in = input.transfer();
        let captured = input.beat();
        let transact_out = net.bus(self.output).now().transfer();

        let prev = self.state;
        let mut next = self.state;

        if self.queue.is_empty() {
            match self.state {
                BufferState::Passthrough => {
                    if transact_in && !transact_out {
                        self.queue.push_back(captured);
                    } else if transact_out && !transact_in {
                        next = BufferState::AwaitingInput;
                    }
                }
                BufferState::Buffered => {
                    if transact_in {
                        self.queue.push_back(captured);
                    } else if transact_out {
                        next = BufferState::Passthrough;
                    }
                }
                BufferState::AwaitingInput => {
                    if transact_in {
                        next = BufferState::Passthrough;
                    }
                }
            }
        } else if transact_in {
            self.queue.push_back(captured);
        }

        if transact_out || self.state != BufferState::Buffered {
            if let Some(beat) = self.queue.pop_front() {
                self.bypass = beat;
                next = BufferState::Buffered;
            }
        }

        if next != prev {
            tracing::trace!(from = ?prev, to = ?next, occupancy = self.queue.len(), "buffer state");
        }
        self.state = next;

        if self.mode == SinkMode::Active {
            net.bus_mut(self.input).drive().ready(true);
        }
    }

    fn settle(&self, net: &mut Netlist) {
        let input = net.bus(self.input).now().clone();
        let bus = net.bus_mut(self.output);
        let mut w = bus.drive_comb();

        match self.state {
            BufferState::Buffered => {
                w.valid(true).beat(&self.bypass);
            }
            BufferState::AwaitingInput => {
                w.valid(false).beat(&input.beat());
            }
            BufferState::Passthrough => {
                w.valid(input.valid).beat(&input.beat());
            }
        }
    }
}
