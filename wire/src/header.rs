//! Fixed header fields: version, message type and code.

use std::fmt;

/// Protocol version carried in the top two bits of byte 0.
pub const VERSION: u8 = 1;

/// Size of the fixed header in bytes (version/type/TKL, code, message ID).
pub const HEADER_SIZE: usize = 4;

/// Maximum token length in bytes.
pub const MAX_TOKEN_LEN: usize = 8;

/// Byte separating the options from the payload.
pub const PAYLOAD_MARKER: u8 = 0xFF;

/// Message type (2 bits on the wire).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum MessageType {
    /// Requires an acknowledgement.
    #[default]
    Confirmable = 0,
    /// Does not require an acknowledgement.
    NonConfirmable = 1,
    /// Acknowledges a confirmable message.
    Acknowledgement = 2,
    /// Permanent negative acknowledgement.
    Reset = 3,
}

impl MessageType {
    /// Builds a type from the low two bits of `bits`.
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0x3 {
            0 => Self::Confirmable,
            1 => Self::NonConfirmable,
            2 => Self::Acknowledgement,
            _ => Self::Reset,
        }
    }

    /// Returns the 2-bit wire value.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self as u8
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Confirmable => "Confirmable",
            Self::NonConfirmable => "NonConfirmable",
            Self::Acknowledgement => "Acknowledgement",
            Self::Reset => "Reset",
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Request method or response status (one byte, `class.detail`).
///
/// Any byte is a valid code on the wire; the associated constants name the
/// codes this crate knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Code(pub u8);

impl Code {
    pub const EMPTY: Self = Self(0);

    // Requests
    pub const GET: Self = Self(1);
    pub const POST: Self = Self(2);
    pub const PUT: Self = Self(3);
    pub const DELETE: Self = Self(4);

    // 2.xx
    pub const CREATED: Self = Self::new(2, 1);
    pub const DELETED: Self = Self::new(2, 2);
    pub const VALID: Self = Self::new(2, 3);
    pub const CHANGED: Self = Self::new(2, 4);
    pub const CONTENT: Self = Self::new(2, 5);
    pub const CONTINUE: Self = Self::new(2, 31);

    // 4.xx
    pub const BAD_REQUEST: Self = Self::new(4, 0);
    pub const UNAUTHORIZED: Self = Self::new(4, 1);
    pub const BAD_OPTION: Self = Self::new(4, 2);
    pub const FORBIDDEN: Self = Self::new(4, 3);
    pub const NOT_FOUND: Self = Self::new(4, 4);
    pub const METHOD_NOT_ALLOWED: Self = Self::new(4, 5);
    pub const NOT_ACCEPTABLE: Self = Self::new(4, 6);
    pub const REQUEST_ENTITY_INCOMPLETE: Self = Self::new(4, 8);
    pub const CONFLICT: Self = Self::new(4, 9);
    pub const PRECONDITION_FAILED: Self = Self::new(4, 12);
    pub const REQUEST_ENTITY_TOO_LARGE: Self = Self::new(4, 13);
    pub const UNSUPPORTED_CONTENT_FORMAT: Self = Self::new(4, 15);

    // 5.xx
    pub const INTERNAL_SERVER_ERROR: Self = Self::new(5, 0);
    pub const NOT_IMPLEMENTED: Self = Self::new(5, 1);
    pub const BAD_GATEWAY: Self = Self::new(5, 2);
    pub const SERVICE_UNAVAILABLE: Self = Self::new(5, 3);
    pub const GATEWAY_TIMEOUT: Self = Self::new(5, 4);
    pub const PROXYING_NOT_SUPPORTED: Self = Self::new(5, 5);

    /// Builds a code from its class (3 bits) and detail (5 bits).
    #[must_use]
    pub const fn new(class: u8, detail: u8) -> Self {
        Self(((class & 0x7) << 5) | (detail & 0x1F))
    }

    #[must_use]
    pub const fn class(self) -> u8 {
        self.0 >> 5
    }

    #[must_use]
    pub const fn detail(self) -> u8 {
        self.0 & 0x1F
    }

    /// Returns `true` for the empty code (0.00).
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` for request codes (class 0, detail 1..=31).
    #[must_use]
    pub const fn is_request(self) -> bool {
        self.class() == 0 && self.detail() != 0
    }

    /// Returns `true` for response codes (classes 2 to 5).
    #[must_use]
    pub const fn is_response(self) -> bool {
        matches!(self.class(), 2..=5)
    }

    /// Returns the name of a known code.
    #[must_use]
    pub const fn name(self) -> Option<&'static str> {
        let name = match self {
            Self::EMPTY => "Empty",
            Self::GET => "GET",
            Self::POST => "POST",
            Self::PUT => "PUT",
            Self::DELETE => "DELETE",
            Self::CREATED => "Created",
            Self::DELETED => "Deleted",
            Self::VALID => "Valid",
            Self::CHANGED => "Changed",
            Self::CONTENT => "Content",
            Self::CONTINUE => "Continue",
            Self::BAD_REQUEST => "BadRequest",
            Self::UNAUTHORIZED => "Unauthorized",
            Self::BAD_OPTION => "BadOption",
            Self::FORBIDDEN => "Forbidden",
            Self::NOT_FOUND => "NotFound",
            Self::METHOD_NOT_ALLOWED => "MethodNotAllowed",
            Self::NOT_ACCEPTABLE => "NotAcceptable",
            Self::REQUEST_ENTITY_INCOMPLETE => "RequestEntityIncomplete",
            Self::CONFLICT => "Conflict",
            Self::PRECONDITION_FAILED => "PreconditionFailed",
            Self::REQUEST_ENTITY_TOO_LARGE => "RequestEntityTooLarge",
            Self::UNSUPPORTED_CONTENT_FORMAT => "UnsupportedContentFormat",
            Self::INTERNAL_SERVER_ERROR => "InternalServerError",
            Self::NOT_IMPLEMENTED => "NotImplemented",
            Self::BAD_GATEWAY => "BadGateway",
            Self::SERVICE_UNAVAILABLE => "ServiceUnavailable",
            Self::GATEWAY_TIMEOUT => "GatewayTimeout",
            Self::PROXYING_NOT_SUPPORTED => "ProxyingNotSupported",
            _ => return None,
        };
        Some(name)
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "{}.{:02}", self.class(), self.detail()),
        }
    }
}

impl From<u8> for Code {
    fn from(raw: u8) -> Self {
        Self(raw)
    }
}
