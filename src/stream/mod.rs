//! Stream engine components.
//!
//! Bus functional models for both ends of a stream channel, a passive
//! recorder, an elastic buffer and a deterministic trace player. Each is a
//! [`Process`](crate::sim::Process) driven by the
//! [`Simulator`](crate::sim::Simulator).

mod assembler;

/// Unbounded elastic buffer.
pub mod buffer;

/// Producer-side bus functional model.
pub mod master;

/// Deterministic trace replay.
pub mod playback;

/// Passive transfer recorder.
pub mod recorder;

/// Consumer-side bus functional model.
pub mod slave;

pub use buffer::{BufferState, ElasticBuffer, SinkMode};
pub use master::MasterDriver;
pub use playback::{TracePlayer, TraceRom};
pub use recorder::StreamRecorder;
pub use slave::{ReadyPolicy, SlaveReceiver};
