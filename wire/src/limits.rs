//! Configurable limits for bounded decoding.

use crate::params::MAX_PACKET_SIZE;

/// Limits enforced by [`crate::decode_with_limits`].
///
/// Dropped options (unknown or out of bounds) do not count towards
/// `max_options`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Limits {
    /// Maximum message size in bytes.
    pub max_message_bytes: usize,

    /// Maximum number of decoded options.
    pub max_options: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_message_bytes: MAX_PACKET_SIZE,
            max_options: 64,
        }
    }
}

impl Limits {
    /// Creates limits suitable for testing with smaller values.
    #[must_use]
    pub const fn for_testing() -> Self {
        Self {
            max_message_bytes: 256,
            max_options: 8,
        }
    }

    /// Creates limits with no restrictions.
    #[must_use]
    pub const fn unlimited() -> Self {
        Self {
            max_message_bytes: usize::MAX,
            max_options: usize::MAX,
        }
    }
}
