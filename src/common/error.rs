//! Configuration Errors.
//!
//! Every failure in the emulator happens while a design is being put
//! together: channels with unusable widths, elastic buffers whose two ends
//! cannot be reconciled, traces whose columns disagree in length. Once a
//! component has been constructed, simulating it never fails.

use thiserror::Error;

/// Construction-time error raised while wiring up a stream design.
///
/// None of these are recoverable; the offending component is simply not
/// built.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    /// Data bus width outside the supported 1..=16 bytes.
    #[error("bus width of {0} bytes is not supported (must be 1 to 16)")]
    InvalidBusWidth(usize),

    /// Sideband field width outside 1..=64 bits.
    #[error("{field} width of {width} bits is not supported (must be 1 to 64)")]
    InvalidFieldWidth {
        /// Name of the field (`id`, `dest` or `user`).
        field: &'static str,
        /// Requested width in bits.
        width: u32,
    },

    /// The input side of a buffer carries a field the output side lacks.
    #[error("there is a {field} on the input and so there must be a {field} on the output")]
    MissingOutputField {
        /// Name of the field (`id` or `dest`).
        field: &'static str,
    },

    /// The output side of a buffer is narrower than the input side.
    #[error("{field} on the output ({output} bits) must be as wide or wider than on the input ({input} bits)")]
    NarrowerOutputField {
        /// Name of the field (`id` or `dest`).
        field: &'static str,
        /// Input width in bits.
        input: u32,
        /// Output width in bits.
        output: u32,
    },

    /// A trace column has a different length from the data column.
    #[error("the length of the {field} trace ({found}) must equal the length of the data trace ({expected})")]
    TraceLengthMismatch {
        /// Name of the column.
        field: &'static str,
        /// Length of the data column.
        expected: usize,
        /// Length of the offending column.
        found: usize,
    },

    /// Ready probability outside `[0, 1]`.
    #[error("ready probability {0} is outside [0, 1]")]
    InvalidProbability(f64),

    /// Two channels expected to be identical differ.
    #[error("the following mismatches were detected on the stream channels: {}", .0.join(", "))]
    ChannelMismatch(Vec<&'static str>),
}
