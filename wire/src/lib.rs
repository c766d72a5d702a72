//! Wire format codec for constrained-protocol messages.
//!
//! This crate converts between [`Message`] values and their binary wire
//! form: a 4-byte fixed header, a token, delta-encoded options and an
//! optional payload behind a `0xFF` marker.
//!
//! # Design Principles
//!
//! - **Bit-exact format** - Option deltas and lengths use the 4-bit nibble
//!   encoding with 1- and 2-byte extensions; nibble 15 is reserved.
//! - **Forward compatible** - Unknown options and options with out-of-range
//!   lengths are dropped while decoding, never reported as errors.
//! - **Typed option values** - [`OptionValue`] is a closed union, so an option
//!   value always has an encodable representation.
//!
//! # Example
//!
//! ```
//! use wire::{decode, encode, Code, MediaType, Message, MessageType, OptionId};
//!
//! let mut msg = Message::new(MessageType::Confirmable, Code::GET, 0x1234)
//!     .with_token(vec![0x01, 0x02]);
//! msg.set_path_string("/sensors/temp");
//! msg.add_option(OptionId::ACCEPT, MediaType::APP_JSON);
//!
//! let bytes = encode(&mut msg).unwrap();
//! let decoded = decode(&bytes).unwrap();
//! assert_eq!(decoded, msg);
//! assert_eq!(decoded.path_string(), "sensors/temp");
//! ```

mod block;
mod error;
mod header;
mod limits;
mod message;
mod option;
mod packet;
mod params;

pub use block::BlockValue;
pub use error::{DecodeError, EncodeError, LimitKind, WireResult};
pub use header::{Code, MessageType, HEADER_SIZE, MAX_TOKEN_LEN, PAYLOAD_MARKER, VERSION};
pub use limits::Limits;
pub use message::{Message, MessageOption};
pub use option::{MediaType, OptionDef, OptionFormat, OptionId, OptionValue};
pub use packet::{decode, decode_with_limits, encode, encode_into, MAX_EXTENDED_VALUE};
pub use params::{TransmissionParams, DEFAULT_PORT, MAX_PACKET_SIZE, SECURE_PORT};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_api_exports() {
        // Verify all expected items are exported
        let _ = VERSION;
        let _ = HEADER_SIZE;
        let _ = PAYLOAD_MARKER;
        let _ = MAX_TOKEN_LEN;
        let _ = Limits::default();
        let _ = TransmissionParams::default();
        let _ = BlockValue::decode(0);
        let _ = OptionId::URI_PATH.def();

        // Error types
        let _: WireResult<()> = Ok(());
    }

    #[test]
    fn payload_marker_value() {
        assert_eq!(PAYLOAD_MARKER, 0xFF);
    }

    #[test]
    fn message_with_block_option() {
        let mut msg = Message::new(MessageType::Confirmable, Code::GET, 3);
        msg.set_option(OptionId::BLOCK2, BlockValue::new(2, false, 6));
        let bytes = encode(&mut msg).unwrap();
        let decoded = decode(&bytes).unwrap();
        let raw = decoded.option(OptionId::BLOCK2).and_then(OptionValue::as_uint);
        assert_eq!(raw.map(BlockValue::decode), Some(BlockValue::new(2, false, 6)));
    }
}
