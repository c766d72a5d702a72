//! Option identifiers, the static definition table, and option values.

use std::fmt;

/// Identifies an option in a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct OptionId(pub u8);

impl OptionId {
    pub const IF_MATCH: Self = Self(1);
    pub const URI_HOST: Self = Self(3);
    pub const ETAG: Self = Self(4);
    pub const IF_NONE_MATCH: Self = Self(5);
    pub const OBSERVE: Self = Self(6);
    pub const URI_PORT: Self = Self(7);
    pub const LOCATION_PATH: Self = Self(8);
    pub const URI_PATH: Self = Self(11);
    pub const CONTENT_FORMAT: Self = Self(12);
    pub const MAX_AGE: Self = Self(14);
    pub const URI_QUERY: Self = Self(15);
    pub const ACCEPT: Self = Self(17);
    pub const LOCATION_QUERY: Self = Self(20);
    pub const BLOCK2: Self = Self(23);
    pub const BLOCK1: Self = Self(27);
    pub const SIZE2: Self = Self(28);
    pub const PROXY_URI: Self = Self(35);
    pub const PROXY_SCHEME: Self = Self(39);
    pub const SIZE1: Self = Self(60);

    /// Returns the static definition for this option, if known.
    #[must_use]
    pub fn def(self) -> Option<&'static OptionDef> {
        OPTION_DEFS[usize::from(self.0)].as_ref()
    }

    /// Returns `true` if a receiver must understand this option.
    #[must_use]
    pub const fn is_critical(self) -> bool {
        self.0 & 0x01 != 0
    }

    /// Returns `true` if a proxy must not forward this option unless it understands it.
    #[must_use]
    pub const fn is_unsafe(self) -> bool {
        self.0 & 0x02 != 0
    }

    /// Returns `true` if this option is not part of the cache key.
    #[must_use]
    pub const fn is_no_cache_key(self) -> bool {
        self.0 & 0x1E == 0x1C
    }

    /// Returns `true` if uint values of this option carry a media type.
    #[must_use]
    pub const fn carries_media_type(self) -> bool {
        self.0 == Self::CONTENT_FORMAT.0 || self.0 == Self::ACCEPT.0
    }
}

impl fmt::Display for OptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.def() {
            Some(def) => f.write_str(def.name),
            None => write!(f, "Unknown({})", self.0),
        }
    }
}

impl From<u8> for OptionId {
    fn from(raw: u8) -> Self {
        Self(raw)
    }
}

/// Definitions of every known option, indexed by option number.
static OPTION_DEFS: [Option<OptionDef>; 256] = build_option_defs();

const fn build_option_defs() -> [Option<OptionDef>; 256] {
    use OptionFormat::{Empty, Opaque, String, UInt};
    let mut defs = [None; 256];
    defs[1] = Some(OptionDef::new("If-Match", Opaque, 0, 8, true));
    defs[3] = Some(OptionDef::new("Uri-Host", String, 1, 255, false));
    defs[4] = Some(OptionDef::new("ETag", Opaque, 1, 8, true));
    defs[5] = Some(OptionDef::new("If-None-Match", Empty, 0, 0, false));
    defs[6] = Some(OptionDef::new("Observe", UInt, 0, 3, false));
    defs[7] = Some(OptionDef::new("Uri-Port", UInt, 0, 2, false));
    defs[8] = Some(OptionDef::new("Location-Path", String, 0, 255, true));
    defs[11] = Some(OptionDef::new("Uri-Path", String, 0, 255, true));
    defs[12] = Some(OptionDef::new("Content-Format", UInt, 0, 2, false));
    defs[14] = Some(OptionDef::new("Max-Age", UInt, 0, 4, false));
    defs[15] = Some(OptionDef::new("Uri-Query", String, 0, 255, true));
    defs[17] = Some(OptionDef::new("Accept", UInt, 0, 2, false));
    defs[20] = Some(OptionDef::new("Location-Query", String, 0, 255, true));
    defs[23] = Some(OptionDef::new("Block2", UInt, 0, 3, false));
    defs[27] = Some(OptionDef::new("Block1", UInt, 0, 3, false));
    defs[28] = Some(OptionDef::new("Size2", UInt, 0, 4, false));
    defs[35] = Some(OptionDef::new("Proxy-Uri", String, 1, 1034, false));
    defs[39] = Some(OptionDef::new("Proxy-Scheme", String, 1, 255, false));
    defs[60] = Some(OptionDef::new("Size1", UInt, 0, 4, false));
    defs
}

/// Value format of an option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionFormat {
    /// Zero-length value.
    Empty,
    /// Raw bytes.
    Opaque,
    /// Big-endian unsigned integer, minimal length.
    UInt,
    /// UTF-8 text.
    String,
}

/// Static definition of a known option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionDef {
    pub name: &'static str,
    pub format: OptionFormat,
    /// Minimum value length in bytes.
    pub min_len: usize,
    /// Maximum value length in bytes.
    pub max_len: usize,
    /// Whether the option may appear more than once.
    pub repeatable: bool,
}

impl OptionDef {
    const fn new(
        name: &'static str,
        format: OptionFormat,
        min_len: usize,
        max_len: usize,
        repeatable: bool,
    ) -> Self {
        Self {
            name,
            format,
            min_len,
            max_len,
            repeatable,
        }
    }

    /// Returns `true` if a value of `len` bytes is within bounds.
    #[must_use]
    pub const fn accepts_len(&self, len: usize) -> bool {
        len >= self.min_len && len <= self.max_len
    }
}

/// Content format of a payload, carried by Content-Format and Accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct MediaType(pub u16);

impl MediaType {
    /// `text/plain;charset=utf-8`
    pub const TEXT_PLAIN: Self = Self(0);
    /// `application/link-format`
    pub const APP_LINK_FORMAT: Self = Self(40);
    /// `application/xml`
    pub const APP_XML: Self = Self(41);
    /// `application/octet-stream`
    pub const APP_OCTETS: Self = Self(42);
    /// `application/exi`
    pub const APP_EXI: Self = Self(47);
    /// `application/json`
    pub const APP_JSON: Self = Self(50);

    /// Returns the MIME name of a known media type.
    #[must_use]
    pub const fn mime(self) -> Option<&'static str> {
        let mime = match self {
            Self::TEXT_PLAIN => "text/plain;charset=utf-8",
            Self::APP_LINK_FORMAT => "application/link-format",
            Self::APP_XML => "application/xml",
            Self::APP_OCTETS => "application/octet-stream",
            Self::APP_EXI => "application/exi",
            Self::APP_JSON => "application/json",
            _ => return None,
        };
        Some(mime)
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.mime() {
            Some(mime) => f.write_str(mime),
            None => write!(f, "media type {}", self.0),
        }
    }
}

/// Value of a single option.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum OptionValue {
    Empty,
    Opaque(Vec<u8>),
    #[cfg_attr(feature = "serde", serde(rename = "uint"))]
    UInt(u32),
    Text(String),
    /// A uint tagged as a content format.
    Media(MediaType),
}

impl OptionValue {
    /// Returns the text of a `Text` value.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Returns the bytes of an `Opaque` value.
    #[must_use]
    pub fn as_opaque(&self) -> Option<&[u8]> {
        match self {
            Self::Opaque(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Returns the integer of a `UInt` or `Media` value.
    #[must_use]
    pub const fn as_uint(&self) -> Option<u32> {
        match self {
            Self::UInt(value) => Some(*value),
            Self::Media(media) => Some(media.0 as u32),
            _ => None,
        }
    }

    /// Returns the media type of a `Media` value.
    #[must_use]
    pub const fn as_media(&self) -> Option<MediaType> {
        match self {
            Self::Media(media) => Some(*media),
            _ => None,
        }
    }

    /// Length of the encoded value in bytes.
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        match self {
            Self::Empty => 0,
            Self::Opaque(bytes) => bytes.len(),
            Self::Text(text) => text.len(),
            Self::UInt(value) => uint_len(*value),
            Self::Media(media) => uint_len(u32::from(media.0)),
        }
    }

    /// Appends the encoded value to `out`.
    pub(crate) fn write_to(&self, out: &mut Vec<u8>) {
        match self {
            Self::Empty => {}
            Self::Opaque(bytes) => out.extend_from_slice(bytes),
            Self::Text(text) => out.extend_from_slice(text.as_bytes()),
            Self::UInt(value) => write_uint(*value, out),
            Self::Media(media) => write_uint(u32::from(media.0), out),
        }
    }

    /// Decodes a raw value according to `id`'s definition.
    ///
    /// Returns `None` for unknown IDs and for lengths outside the bounds.
    pub(crate) fn parse(id: OptionId, raw: &[u8]) -> Option<Self> {
        let def = id.def()?;
        if !def.accepts_len(raw.len()) {
            return None;
        }
        let value = match def.format {
            OptionFormat::Empty => Self::Empty,
            OptionFormat::Opaque => Self::Opaque(raw.to_vec()),
            OptionFormat::String => Self::Text(String::from_utf8_lossy(raw).into_owned()),
            OptionFormat::UInt => {
                let value = read_uint(raw);
                if id.carries_media_type() {
                    // Content-Format and Accept are bounded to 2 bytes.
                    Self::Media(MediaType(value as u16))
                } else {
                    Self::UInt(value)
                }
            }
        };
        Some(value)
    }

    /// Converts the value to the variant decoding produces for `id`, when
    /// both carry the same bytes on the wire.
    ///
    /// A uint on Content-Format or Accept becomes `Media`, a `Media` on any
    /// other uint option becomes `UInt`, text on an opaque option becomes
    /// bytes, and UTF-8 bytes on a string option become text. Anything else
    /// is returned unchanged.
    #[must_use]
    pub fn for_option(self, id: OptionId) -> Self {
        let Some(def) = id.def() else {
            return self;
        };
        match (def.format, self) {
            (OptionFormat::UInt, Self::UInt(value)) if id.carries_media_type() => {
                u16::try_from(value).map_or(Self::UInt(value), |raw| Self::Media(MediaType(raw)))
            }
            (OptionFormat::UInt, Self::Media(media)) if !id.carries_media_type() => {
                Self::UInt(u32::from(media.0))
            }
            (OptionFormat::Opaque, Self::Text(text)) => Self::Opaque(text.into_bytes()),
            (OptionFormat::String, Self::Opaque(bytes)) => match String::from_utf8(bytes) {
                Ok(text) => Self::Text(text),
                Err(err) => Self::Opaque(err.into_bytes()),
            },
            (_, value) => value,
        }
    }
}

impl From<&str> for OptionValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<String> for OptionValue {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&[u8]> for OptionValue {
    fn from(bytes: &[u8]) -> Self {
        Self::Opaque(bytes.to_vec())
    }
}

impl From<Vec<u8>> for OptionValue {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Opaque(bytes)
    }
}

impl From<u32> for OptionValue {
    fn from(value: u32) -> Self {
        Self::UInt(value)
    }
}

impl From<u16> for OptionValue {
    fn from(value: u16) -> Self {
        Self::UInt(u32::from(value))
    }
}

impl From<u8> for OptionValue {
    fn from(value: u8) -> Self {
        Self::UInt(u32::from(value))
    }
}

impl From<MediaType> for OptionValue {
    fn from(media: MediaType) -> Self {
        Self::Media(media)
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("(empty)"),
            Self::Opaque(bytes) => {
                f.write_str("0x")?;
                for byte in bytes {
                    write!(f, "{byte:02x}")?;
                }
                Ok(())
            }
            Self::UInt(value) => write!(f, "{value}"),
            Self::Text(text) => write!(f, "{text:?}"),
            Self::Media(media) => write!(f, "{media}"),
        }
    }
}

const fn uint_len(value: u32) -> usize {
    (u32::BITS - value.leading_zeros()).div_ceil(8) as usize
}

fn write_uint(value: u32, out: &mut Vec<u8>) {
    let bytes = value.to_be_bytes();
    out.extend_from_slice(&bytes[bytes.len() - uint_len(value)..]);
}

fn read_uint(raw: &[u8]) -> u32 {
    raw.iter()
        .fold(0u32, |acc, &byte| (acc << 8) | u32::from(byte))
}
