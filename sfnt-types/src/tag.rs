//! A 4-byte table identifier.

use std::fmt;

use crate::scalar::{ReadScalar, ValueType};

/// An OpenType tag: four bytes, nominally printable ASCII.
///
/// Parsing accepts arbitrary bytes, since malformed fonts contain arbitrary
/// tags; non-ASCII bytes are replaced with `-` when displayed.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag([u8; 4]);

impl Tag {
    /// Create a tag from a byte string literal.
    pub const fn new(src: &[u8; 4]) -> Self {
        Tag(*src)
    }

    /// Create a tag from raw big-endian bytes.
    pub const fn from_be_bytes(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }

    /// The raw byte array representing this tag.
    pub const fn into_bytes(self) -> [u8; 4] {
        self.0
    }
}

impl PartialEq<[u8; 4]> for Tag {
    fn eq(&self, other: &[u8; 4]) -> bool {
        &self.0 == other
    }
}

impl PartialEq<&[u8; 4]> for Tag {
    fn eq(&self, other: &&[u8; 4]) -> bool {
        &self.0 == *other
    }
}

impl PartialEq<&str> for Tag {
    fn eq(&self, other: &&str) -> bool {
        self.0 == other.as_bytes()
    }
}

impl AsRef<[u8]> for Tag {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0 {
            let c = if byte.is_ascii() && !byte.is_ascii_control() {
                byte as char
            } else {
                '-'
            };
            write!(f, "{c}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tag({self})")
    }
}

impl ReadScalar for Tag {
    const RAW_BYTE_LEN: usize = 4;
    const VALUE_TYPE: ValueType = ValueType::Tag;

    #[inline]
    fn read_be(data: &[u8]) -> Option<Self> {
        data.get(..4).map(|b| Tag([b[0], b[1], b[2], b[3]]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        assert_eq!(Tag::new(b"glyf").to_string(), "glyf");
        assert_eq!(Tag::new(b"OS/2").to_string(), "OS/2");
        assert_eq!(Tag::from_be_bytes([0x00, 0x61, 0xFF, 0x62]).to_string(), "-a-b");
    }

    #[test]
    fn comparisons() {
        let tag = Tag::read_be(b"CFF ").unwrap();
        assert_eq!(tag, b"CFF ");
        assert_eq!(tag, "CFF ");
    }
}
