use std::fmt;

use crate::scalar::{ReadScalar, ValueType};

/// A 16-bit glyph identifier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GlyphId(u16);

impl GlyphId {
    pub const fn new(raw: u16) -> Self {
        GlyphId(raw)
    }

    pub const fn to_u16(self) -> u16 {
        self.0
    }
}

impl fmt::Display for GlyphId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl ReadScalar for GlyphId {
    const RAW_BYTE_LEN: usize = 2;
    const VALUE_TYPE: ValueType = ValueType::GlyphId;

    #[inline]
    fn read_be(data: &[u8]) -> Option<Self> {
        u16::read_be(data).map(Self)
    }
}
