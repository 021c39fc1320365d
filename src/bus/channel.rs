//! Stream Channel Description.
//!
//! A channel describes which signals exist on one point-to-point stream
//! link and how wide they are. It carries no values; see
//! [`BusSignals`](super::BusSignals) for those.

use crate::common::{ConfigError, StreamId};
use serde::{Deserialize, Serialize};

const MAX_BUS_WIDTH: usize = 16;
const MAX_FIELD_WIDTH: u32 = 64;

/// Shape of a stream channel.
///
/// `bus_width` is in bytes; the optional sideband widths are in bits. A
/// sideband field exists on the bus iff its width is `Some`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamChannel {
    #[serde(default = "default_bus_width")]
    bus_width: usize,
    #[serde(default)]
    id_width: Option<u32>,
    #[serde(default)]
    dest_width: Option<u32>,
    #[serde(default)]
    user_width: Option<u32>,
    #[serde(default = "default_true")]
    has_last: bool,
    #[serde(default)]
    has_strb: bool,
    #[serde(default)]
    has_keep: bool,
    #[serde(default)]
    valid_init: bool,
    #[serde(default)]
    ready_init: bool,
}

fn default_bus_width() -> usize {
    4
}

fn default_true() -> bool {
    true
}

impl Default for StreamChannel {
    /// A 4-byte channel with last and nothing else.
    fn default() -> Self {
        Self {
            bus_width: default_bus_width(),
            id_width: None,
            dest_width: None,
            user_width: None,
            has_last: true,
            has_strb: false,
            has_keep: false,
            valid_init: false,
            ready_init: false,
        }
    }
}

impl StreamChannel {
    /// Creates a channel with a data bus of `bus_width` bytes and a last
    /// signal, but no id, dest, user, strb or keep.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidBusWidth`] unless `1 <= bus_width <= 16`.
    pub fn new(bus_width: usize) -> Result<Self, ConfigError> {
        let channel = Self {
            bus_width,
            ..Self::default()
        };
        channel.validate()?;
        Ok(channel)
    }

    /// Enables the id field with `width` bits.
    pub fn with_id(mut self, width: u32) -> Result<Self, ConfigError> {
        self.id_width = Some(width);
        self.validate()?;
        Ok(self)
    }

    /// Enables the dest field with `width` bits.
    pub fn with_dest(mut self, width: u32) -> Result<Self, ConfigError> {
        self.dest_width = Some(width);
        self.validate()?;
        Ok(self)
    }

    /// Enables the user sideband field with `width` bits.
    pub fn with_user(mut self, width: u32) -> Result<Self, ConfigError> {
        self.user_width = Some(width);
        self.validate()?;
        Ok(self)
    }

    /// Removes the last signal.
    pub fn without_last(mut self) -> Self {
        self.has_last = false;
        self
    }

    /// Adds the strb byte qualifier.
    pub fn with_strb(mut self) -> Self {
        self.has_strb = true;
        self
    }

    /// Adds the keep byte qualifier.
    pub fn with_keep(mut self) -> Self {
        self.has_keep = true;
        self
    }

    /// Sets the reset value of valid.
    pub fn valid_init(mut self, level: bool) -> Self {
        self.valid_init = level;
        self
    }

    /// Sets the reset value of ready.
    pub fn ready_init(mut self, level: bool) -> Self {
        self.ready_init = level;
        self
    }

    /// Checks the widths; used after deserializing a channel from a config.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bus_width == 0 || self.bus_width > MAX_BUS_WIDTH {
            return Err(ConfigError::InvalidBusWidth(self.bus_width));
        }
        for (field, width) in [
            ("id", self.id_width),
            ("dest", self.dest_width),
            ("user", self.user_width),
        ] {
            if let Some(width) = width {
                if width == 0 || width > MAX_FIELD_WIDTH {
                    return Err(ConfigError::InvalidFieldWidth { field, width });
                }
            }
        }
        Ok(())
    }

    /// Data bus width in bytes.
    pub fn bus_width(&self) -> usize {
        self.bus_width
    }

    /// Width of the id field in bits, if present.
    pub fn id_width(&self) -> Option<u32> {
        self.id_width
    }

    /// Width of the dest field in bits, if present.
    pub fn dest_width(&self) -> Option<u32> {
        self.dest_width
    }

    /// Width of the user field in bits, if present.
    pub fn user_width(&self) -> Option<u32> {
        self.user_width
    }

    pub fn has_last(&self) -> bool {
        self.has_last
    }

    pub fn has_strb(&self) -> bool {
        self.has_strb
    }

    pub fn has_keep(&self) -> bool {
        self.has_keep
    }

    pub fn valid_init_level(&self) -> bool {
        self.valid_init
    }

    pub fn ready_init_level(&self) -> bool {
        self.ready_init
    }

    /// Mask covering the data bus.
    pub fn data_mask(&self) -> u128 {
        let bits = self.bus_width as u32 * 8;
        if bits >= u128::BITS {
            u128::MAX
        } else {
            (1u128 << bits) - 1
        }
    }

    /// Returns `true` if `stream`'s id and dest fit the channel's fields.
    ///
    /// Absent fields only carry 0.
    pub fn stream_fits(&self, stream: &StreamId) -> bool {
        let fits = |value: u64, width: Option<u32>| match width {
            None => value == 0,
            Some(w) => (value & !width_mask(w)) == 0,
        };
        fits(stream.id, self.id_width) && fits(stream.dest, self.dest_width)
    }

    /// Checks that `other` has exactly the same shape.
    ///
    /// # Errors
    ///
    /// [`ConfigError::ChannelMismatch`] listing every differing attribute in
    /// sorted order.
    pub fn check_identical(&self, other: &StreamChannel) -> Result<(), ConfigError> {
        let mut mismatches = Vec::new();
        if self.bus_width != other.bus_width {
            mismatches.push("bus_width");
        }
        if self.id_width != other.id_width {
            mismatches.push("id_width");
        }
        if self.dest_width != other.dest_width {
            mismatches.push("dest_width");
        }
        if self.user_width != other.user_width {
            mismatches.push("user_width");
        }
        if self.valid_init != other.valid_init {
            mismatches.push("valid_init");
        }
        if self.ready_init != other.ready_init {
            mismatches.push("ready_init");
        }
        if self.has_last != other.has_last {
            mismatches.push("has_last");
        }
        if self.has_strb != other.has_strb {
            mismatches.push("has_strb");
        }
        if self.has_keep != other.has_keep {
            mismatches.push("has_keep");
        }
        mismatches.sort_unstable();

        if mismatches.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::ChannelMismatch(mismatches))
        }
    }
}

/// Mask with the low `bits` bits set.
pub(crate) fn width_mask(bits: u32) -> u64 {
    if bits >= 64 {
        u64::MAX
    } else {
        (1u64 << bits) - 1
    }
}
