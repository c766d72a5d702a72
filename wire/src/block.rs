//! Block1/Block2 option values.

/// Unpacked value of a Block1 or Block2 option.
///
/// Packed as `num << 4 | more << 3 | szx`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockValue {
    /// Block number.
    pub num: u32,
    /// Whether more blocks follow.
    pub more: bool,
    /// Size exponent; the block size is `2^(szx + 4)`.
    pub szx: u8,
}

impl BlockValue {
    #[must_use]
    pub const fn new(num: u32, more: bool, szx: u8) -> Self {
        Self { num, more, szx }
    }

    /// Packs the three fields into an option integer.
    #[must_use]
    pub const fn encode(self) -> u32 {
        (self.num << 4) | ((self.more as u32) << 3) | (self.szx as u32 & 0x7)
    }

    /// Unpacks an option integer.
    #[must_use]
    pub const fn decode(value: u32) -> Self {
        Self {
            num: value >> 4,
            more: (value >> 3) & 1 == 1,
            szx: (value & 0x7) as u8,
        }
    }

    /// Block size in bytes.
    ///
    /// Only the low three bits of `szx` count, as in [`BlockValue::encode`].
    #[must_use]
    pub const fn size(self) -> usize {
        1 << ((self.szx & 0x7) as u32 + 4)
    }
}

impl From<BlockValue> for crate::OptionValue {
    fn from(block: BlockValue) -> Self {
        Self::UInt(block.encode())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_packs_fields() {
        assert_eq!(BlockValue::new(0, false, 0).encode(), 0);
        assert_eq!(BlockValue::new(1, true, 2).encode(), 0b1_1_010);
        assert_eq!(BlockValue::new(5, false, 6).encode(), (5 << 4) | 6);
    }

    #[test]
    fn decode_is_inverse() {
        let block = BlockValue::new(0xABC, true, 5);
        assert_eq!(BlockValue::decode(block.encode()), block);
        assert_eq!(BlockValue::decode(0x1E), BlockValue::new(1, true, 6));
    }

    #[test]
    fn size_from_exponent() {
        assert_eq!(BlockValue::new(0, false, 0).size(), 16);
        assert_eq!(BlockValue::new(0, false, 6).size(), 1024);
    }

    #[test]
    fn size_ignores_high_exponent_bits() {
        let block = BlockValue::new(0, false, 200);
        assert_eq!(block.size(), 16);
        assert_eq!(BlockValue::decode(block.encode()).size(), block.size());
        assert_eq!(BlockValue::new(0, false, u8::MAX).size(), 2048);
    }
}
