//! The scalar decoding trait and implementations for primitive integers.

use std::fmt::Display;

/// The closed set of labels attached to values in a parsed tree.
///
/// Most labels correspond one-to-one to a scalar type; the rest describe
/// aggregate or specially rendered values (byte runs, arrays, flag sets, and
/// the CFF variable-width number encoding).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ValueType {
    #[default]
    None,
    Int8,
    UInt8,
    Int16,
    UInt16,
    UInt24,
    Int32,
    UInt32,
    F2Dot14,
    Fixed,
    Tag,
    GlyphId,
    LongDateTime,
    Offset16,
    Offset32,
    Bytes,
    Array,
    BitFlags,
    String,
    CffNumber,
    OffsetSize,
    Masks,
    Platform,
}

impl ValueType {
    /// The label as shown in the type column.
    pub fn name(self) -> &'static str {
        match self {
            ValueType::None => "",
            ValueType::Int8 => "Int8",
            ValueType::UInt8 => "UInt8",
            ValueType::Int16 => "Int16",
            ValueType::UInt16 => "UInt16",
            ValueType::UInt24 => "UInt24",
            ValueType::Int32 => "Int32",
            ValueType::UInt32 => "UInt32",
            ValueType::F2Dot14 => "F2DOT14",
            ValueType::Fixed => "Fixed",
            ValueType::Tag => "Tag",
            ValueType::GlyphId => "GlyphId",
            ValueType::LongDateTime => "LongDateTime",
            ValueType::Offset16 => "Offset16",
            ValueType::Offset32 => "Offset32",
            ValueType::Bytes => "Bytes",
            ValueType::Array => "Array",
            ValueType::BitFlags => "BitFlags",
            ValueType::String => "String",
            ValueType::CffNumber => "CFF Number",
            ValueType::OffsetSize => "OffsetSize",
            ValueType::Masks => "Masks",
            ValueType::Platform => "Platform",
        }
    }
}

impl Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A fixed-width value that can be decoded from big-endian bytes.
///
/// The `Display` bound provides the rendering that ends up in the value
/// column of the tree.
pub trait ReadScalar: Display + Sized {
    /// The number of bytes this type occupies in the input.
    const RAW_BYTE_LEN: usize;

    /// The label attached to leaves of this type.
    const VALUE_TYPE: ValueType;

    /// Decode from big-endian bytes.
    ///
    /// Returns `None` if `data` holds fewer than [`RAW_BYTE_LEN`] bytes.
    ///
    /// [`RAW_BYTE_LEN`]: Self::RAW_BYTE_LEN
    fn read_be(data: &[u8]) -> Option<Self>;
}

macro_rules! int_scalar {
    ($ty:ty, $label:ident) => {
        impl ReadScalar for $ty {
            const RAW_BYTE_LEN: usize = std::mem::size_of::<$ty>();
            const VALUE_TYPE: ValueType = ValueType::$label;

            #[inline]
            fn read_be(data: &[u8]) -> Option<Self> {
                data.get(..Self::RAW_BYTE_LEN)
                    .map(|bytes| <$ty>::from_be_bytes(bytes.try_into().unwrap()))
            }
        }
    };
}

int_scalar!(u8, UInt8);
int_scalar!(i8, Int8);
int_scalar!(u16, UInt16);
int_scalar!(i16, Int16);
int_scalar!(u32, UInt32);
int_scalar!(i32, Int32);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_are_big_endian() {
        assert_eq!(u16::read_be(&[0x12, 0x34]), Some(0x1234));
        assert_eq!(i16::read_be(&[0xFF, 0xFE]), Some(-2));
        assert_eq!(u32::read_be(&[0, 1, 0, 0]), Some(0x10000));
        assert_eq!(i8::read_be(&[0x80]), Some(-128));
    }

    #[test]
    fn short_input() {
        assert_eq!(u32::read_be(&[0, 1]), None);
        assert_eq!(u8::read_be(&[]), None);
    }
}
