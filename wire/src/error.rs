//! Error types for wire format operations.

use std::fmt;

use crate::option::OptionId;

/// Result type for wire format operations.
pub type WireResult<T> = Result<T, DecodeError>;

/// Structural errors that abort decoding of a message.
///
/// Content-policy problems (unknown option IDs, option values outside their
/// length bounds) are not errors; those options are dropped during decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DecodeError {
    /// Buffer is too small to contain the fixed 4-byte header.
    ShortPacket { actual: usize },

    /// Version bits in byte 0 are not the supported version.
    InvalidVersion { found: u8 },

    /// Token length nibble is larger than 8.
    InvalidTokenLen { len: u8 },

    /// Token, option extension or option value runs past the buffer end.
    Truncated { needed: usize, available: usize },

    /// An option header uses the reserved nibble value 15.
    InvalidOptionMarker { header: u8 },

    /// Limits exceeded.
    LimitsExceeded {
        kind: LimitKind,
        limit: usize,
        actual: usize,
    },
}

/// Specific decode limits that can be exceeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitKind {
    MessageBytes,
    OptionCount,
}

/// Errors that can occur during encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// Token does not fit the 4-bit length field (max 8 bytes).
    InvalidTokenLen { len: usize },
    /// Option value is longer than the extended length field can express.
    OptionTooLong { id: OptionId, len: usize },
    /// Caller-provided output buffer is too small.
    BufferTooSmall { needed: usize, available: usize },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShortPacket { actual } => {
                write!(f, "short packet: {actual} bytes, need at least 4")
            }
            Self::InvalidVersion { found } => write!(f, "invalid version: {found}"),
            Self::InvalidTokenLen { len } => write!(f, "invalid token length: {len}"),
            Self::Truncated { needed, available } => {
                write!(f, "truncated: need {needed} bytes, have {available}")
            }
            Self::InvalidOptionMarker { header } => {
                write!(
                    f,
                    "unexpected extended option marker in header 0x{header:02X}"
                )
            }
            Self::LimitsExceeded {
                kind,
                limit,
                actual,
            } => {
                write!(f, "{kind} limit exceeded: {actual} > {limit}")
            }
        }
    }
}

impl fmt::Display for LimitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::MessageBytes => "message bytes",
            Self::OptionCount => "option count",
        };
        write!(f, "{name}")
    }
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTokenLen { len } => {
                write!(f, "invalid token length: {len} bytes, max 8")
            }
            Self::OptionTooLong { id, len } => {
                write!(f, "option {id} is too long: {len} bytes")
            }
            Self::BufferTooSmall { needed, available } => {
                write!(f, "buffer too small: need {needed}, have {available}")
            }
        }
    }
}

impl std::error::Error for DecodeError {}

impl std::error::Error for EncodeError {}
