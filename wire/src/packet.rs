//! Message encoding and decoding.
//!
//! ```text
//!  0                   1                   2                   3
//!  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |Ver| T |  TKL  |      Code     |          Message ID           |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |   Token (if any, TKL bytes) ...
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |   Options (if any) ...
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |1 1 1 1 1 1 1 1|    Payload (if any) ...
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! ```
//!
//! Each option is a header byte holding the delta and length nibbles, then
//! 0-2 extension bytes for the delta, 0-2 for the length, then the value.

use crate::error::{DecodeError, EncodeError, LimitKind, WireResult};
use crate::header::{Code, MessageType, HEADER_SIZE, MAX_TOKEN_LEN, PAYLOAD_MARKER, VERSION};
use crate::limits::Limits;
use crate::message::{Message, MessageOption};
use crate::option::{OptionId, OptionValue};

/// Nibble value announcing one extension byte.
const EXT_BYTE: u8 = 13;
/// Nibble value announcing two extension bytes.
const EXT_WORD: u8 = 14;
/// Reserved nibble value.
const EXT_RESERVED: u8 = 15;

const EXT_BYTE_ADDEND: usize = 13;
const EXT_WORD_ADDEND: usize = 269;

/// Largest delta or length the extended encoding can represent.
pub const MAX_EXTENDED_VALUE: usize = 0xFFFF + EXT_WORD_ADDEND;

/// Encodes a message into a new buffer.
///
/// The options are stably sorted by ID in place first; that reordering is
/// visible to the caller afterwards.
pub fn encode(msg: &mut Message) -> Result<Vec<u8>, EncodeError> {
    msg.sort_options();
    validate(msg)?;
    let mut out = Vec::with_capacity(encoded_len_sorted(msg));
    write_message(msg, &mut out);
    Ok(out)
}

/// Encodes a message into the provided output buffer.
///
/// Sorts the options like [`encode`]. Returns the number of bytes written.
pub fn encode_into(msg: &mut Message, out: &mut [u8]) -> Result<usize, EncodeError> {
    msg.sort_options();
    validate(msg)?;
    let needed = encoded_len_sorted(msg);
    if out.len() < needed {
        return Err(EncodeError::BufferTooSmall {
            needed,
            available: out.len(),
        });
    }
    let mut buf = Vec::with_capacity(needed);
    write_message(msg, &mut buf);
    out[..needed].copy_from_slice(&buf);
    Ok(needed)
}

impl Message {
    /// Returns the number of bytes [`encode`] will produce for this message.
    ///
    /// Does not reorder the options.
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        let mut sorted: Vec<&MessageOption> = self.options().iter().collect();
        sorted.sort_by_key(|opt| opt.id);
        HEADER_SIZE + self.token.len() + options_len(sorted.into_iter()) + payload_len(self)
    }
}

fn validate(msg: &Message) -> Result<(), EncodeError> {
    if msg.token.len() > MAX_TOKEN_LEN {
        return Err(EncodeError::InvalidTokenLen {
            len: msg.token.len(),
        });
    }
    for opt in msg.options() {
        let len = opt.value.encoded_len();
        if len > MAX_EXTENDED_VALUE {
            return Err(EncodeError::OptionTooLong { id: opt.id, len });
        }
    }
    Ok(())
}

fn encoded_len_sorted(msg: &Message) -> usize {
    HEADER_SIZE + msg.token.len() + options_len(msg.options().iter()) + payload_len(msg)
}

fn options_len<'a>(options: impl Iterator<Item = &'a MessageOption>) -> usize {
    let mut prev = 0usize;
    let mut total = 0usize;
    for opt in options {
        let id = usize::from(opt.id.0);
        let len = opt.value.encoded_len();
        total += 1 + extension_len(id - prev) + extension_len(len) + len;
        prev = id;
    }
    total
}

fn payload_len(msg: &Message) -> usize {
    if msg.payload.is_empty() {
        0
    } else {
        1 + msg.payload.len()
    }
}

/// Writes a sorted, validated message.
fn write_message(msg: &Message, out: &mut Vec<u8>) {
    // Token length fits the nibble after `validate`.
    let tkl = msg.token.len() as u8 & 0x0F;
    out.push((VERSION << 6) | (msg.message_type.bits() << 4) | tkl);
    out.push(msg.code.0);
    out.extend_from_slice(&msg.message_id.to_be_bytes());
    out.extend_from_slice(&msg.token);

    let mut prev = 0usize;
    for opt in msg.options() {
        let id = usize::from(opt.id.0);
        write_option_header(id - prev, opt.value.encoded_len(), out);
        opt.value.write_to(out);
        prev = id;
    }

    if !msg.payload.is_empty() {
        out.push(PAYLOAD_MARKER);
        out.extend_from_slice(&msg.payload);
    }
}

/// Splits a delta or length into its nibble and extension value.
pub(crate) const fn extend(value: usize) -> (u8, usize) {
    if value >= EXT_WORD_ADDEND {
        (EXT_WORD, value - EXT_WORD_ADDEND)
    } else if value >= EXT_BYTE_ADDEND {
        (EXT_BYTE, value - EXT_BYTE_ADDEND)
    } else {
        (value as u8, 0)
    }
}

const fn extension_len(value: usize) -> usize {
    if value >= EXT_WORD_ADDEND {
        2
    } else if value >= EXT_BYTE_ADDEND {
        1
    } else {
        0
    }
}

fn write_option_header(delta: usize, length: usize, out: &mut Vec<u8>) {
    let (delta_nibble, delta_ext) = extend(delta);
    let (length_nibble, length_ext) = extend(length);
    out.push((delta_nibble << 4) | length_nibble);
    write_extension(delta_nibble, delta_ext, out);
    write_extension(length_nibble, length_ext, out);
}

fn write_extension(nibble: u8, ext: usize, out: &mut Vec<u8>) {
    match nibble {
        EXT_BYTE => out.push(ext as u8),
        EXT_WORD => out.extend_from_slice(&(ext as u16).to_be_bytes()),
        _ => {}
    }
}

/// Decodes a message from a complete buffer.
pub fn decode(buf: &[u8]) -> WireResult<Message> {
    decode_with_limits(buf, &Limits::unlimited())
}

/// Decodes a message from a complete buffer, enforcing `limits`.
pub fn decode_with_limits(buf: &[u8], limits: &Limits) -> WireResult<Message> {
    if buf.len() < HEADER_SIZE {
        return Err(DecodeError::ShortPacket { actual: buf.len() });
    }
    if buf.len() > limits.max_message_bytes {
        return Err(DecodeError::LimitsExceeded {
            kind: LimitKind::MessageBytes,
            limit: limits.max_message_bytes,
            actual: buf.len(),
        });
    }

    let version = buf[0] >> 6;
    if version != VERSION {
        return Err(DecodeError::InvalidVersion { found: version });
    }
    let token_len = buf[0] & 0x0F;
    if usize::from(token_len) > MAX_TOKEN_LEN {
        return Err(DecodeError::InvalidTokenLen { len: token_len });
    }

    let mut msg = Message::new(
        MessageType::from_bits(buf[0] >> 4),
        Code(buf[1]),
        u16::from_be_bytes([buf[2], buf[3]]),
    );

    let token_end = HEADER_SIZE + usize::from(token_len);
    if buf.len() < token_end {
        return Err(DecodeError::Truncated {
            needed: token_end,
            available: buf.len(),
        });
    }
    msg.token = buf[HEADER_SIZE..token_end].to_vec();

    let mut cursor = Cursor {
        buf,
        pos: token_end,
    };
    let mut prev = 0usize;
    let mut option_count = 0usize;

    while let Some(header) = cursor.peek() {
        if header == PAYLOAD_MARKER {
            cursor.pos += 1;
            break;
        }

        let delta_nibble = header >> 4;
        let length_nibble = header & 0x0F;
        if delta_nibble == EXT_RESERVED || length_nibble == EXT_RESERVED {
            return Err(DecodeError::InvalidOptionMarker { header });
        }
        cursor.pos += 1;

        let delta = cursor.read_extended(delta_nibble)?;
        let length = cursor.read_extended(length_nibble)?;
        let raw = cursor.take(length)?;

        let number = prev + delta;
        prev = number;

        let parsed = u8::try_from(number)
            .ok()
            .map(OptionId)
            .and_then(|id| OptionValue::parse(id, raw).map(|value| (id, value)));
        let Some((id, value)) = parsed else {
            tracing::trace!(option = number, len = length, "dropping unrecognized option");
            continue;
        };

        option_count += 1;
        if option_count > limits.max_options {
            return Err(DecodeError::LimitsExceeded {
                kind: LimitKind::OptionCount,
                limit: limits.max_options,
                actual: option_count,
            });
        }
        msg.push_decoded(MessageOption { id, value });
    }

    msg.payload = buf[cursor.pos..].to_vec();
    Ok(msg)
}

struct Cursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn peek(&self) -> Option<u8> {
        self.buf.get(self.pos).copied()
    }

    fn take(&mut self, len: usize) -> WireResult<&'a [u8]> {
        let end = self.pos + len;
        if end > self.buf.len() {
            return Err(DecodeError::Truncated {
                needed: end,
                available: self.buf.len(),
            });
        }
        let bytes = &self.buf[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    /// Resolves a delta or length nibble, consuming its extension bytes.
    fn read_extended(&mut self, nibble: u8) -> WireResult<usize> {
        match nibble {
            EXT_BYTE => {
                let ext = self.take(1)?;
                Ok(usize::from(ext[0]) + EXT_BYTE_ADDEND)
            }
            EXT_WORD => {
                let ext = self.take(2)?;
                Ok(usize::from(u16::from_be_bytes([ext[0], ext[1]])) + EXT_WORD_ADDEND)
            }
            _ => Ok(usize::from(nibble)),
        }
    }
}
