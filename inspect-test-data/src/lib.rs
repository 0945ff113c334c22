//! Test data shared between the font inspection crates.

pub mod bebuffer;

use bebuffer::BeBuffer;

pub const TT_MAGIC: u32 = 0x00010000;
pub const OTTO_MAGIC: u32 = 0x4F54544F;
pub const TTC_MAGIC: u32 = 0x74746366;

/// Builds a single-face sfnt file from table bodies.
///
/// Offsets, lengths and the derived search fields are computed; checksums
/// are left at zero (the inspector displays them but never verifies).
pub struct SfntBuilder {
    magic: u32,
    tables: Vec<([u8; 4], Vec<u8>)>,
}

impl SfntBuilder {
    pub fn new(magic: u32) -> Self {
        SfntBuilder {
            magic,
            tables: Vec::new(),
        }
    }

    #[must_use]
    pub fn table(mut self, tag: &[u8; 4], body: impl Into<Vec<u8>>) -> Self {
        self.tables.push((*tag, body.into()));
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let num_tables = self.tables.len() as u16;
        let (search_range, entry_selector, range_shift) = match num_tables.checked_ilog2() {
            Some(log) => {
                let search_range = 16u16 * (1 << log as u16);
                (search_range, log as u16, num_tables * 16 - search_range)
            }
            None => (0, 0, 0),
        };

        let mut header = BeBuffer::new()
            .push(self.magic)
            .push(num_tables)
            .push(search_range)
            .push(entry_selector)
            .push(range_shift);

        let mut offset = 12 + 16 * self.tables.len() as u32;
        let mut bodies = Vec::new();
        for (tag, body) in &self.tables {
            header = header
                .push(*tag)
                .push(0u32) // checksum
                .push(offset)
                .push(body.len() as u32);
            bodies.extend_from_slice(body);
            let padded = (body.len() as u32 + 3) & !3;
            bodies.resize(bodies.len() + (padded - body.len() as u32) as usize, 0);
            offset += padded;
        }

        let mut file = header.into_vec();
        file.extend_from_slice(&bodies);
        file
    }
}

/// A `maxp` version 0.5 body with the given glyph count.
pub fn maxp_v05(num_glyphs: u16) -> Vec<u8> {
    BeBuffer::new()
        .push(0x00005000u32) // version 0.5
        .push(num_glyphs)
        .into_vec()
}

/// The smallest interesting font: one `maxp` table with zero glyphs.
pub fn minimal_ttf() -> Vec<u8> {
    SfntBuilder::new(TT_MAGIC).table(b"maxp", maxp_v05(0)).build()
}

/// A version 1.0 `head` body with the given index-to-location format.
pub fn head_body(index_to_loc_format: i16) -> Vec<u8> {
    BeBuffer::new()
        .push(1u16) // major version
        .push(0u16) // minor version
        .push(0x00010000u32) // font revision
        .push(0u32) // checksum adjustment
        .push(0x5F0F3CF5u32) // magic number
        .push(0b11u16) // flags
        .push(1000u16) // units per em
        .push(0u64) // created
        .push(0u64) // modified
        .push(-10i16) // x min
        .push(-20i16) // y min
        .push(100i16) // x max
        .push(200i16) // y max
        .push(0u16) // mac style
        .push(8u16) // lowest rec ppem
        .push(2i16) // font direction hint
        .push(index_to_loc_format)
        .push(0i16) // glyph data format
        .into_vec()
}

/// A two-face font collection where both faces share one `maxp` table.
pub fn two_face_ttc() -> Vec<u8> {
    // Layout: ttc header (20), face header 0 (28), face header 1 (28),
    // then the shared maxp body.
    let face0 = 20u32;
    let face1 = face0 + 28;
    let maxp_offset = face1 + 28;

    let face_header = |maxp_offset: u32| {
        BeBuffer::new()
            .push(TT_MAGIC)
            .push(1u16) // numTables
            .push(16u16) // search range
            .push(0u16) // entry selector
            .push(0u16) // range shift
            .push(*b"maxp")
            .push(0u32) // checksum
            .push(maxp_offset)
            .push(6u32) // length
    };

    let mut file = BeBuffer::new()
        .push(TTC_MAGIC)
        .push(1u16) // major version
        .push(0u16) // minor version
        .push(2u32) // numFonts
        .push(face0)
        .push(face1)
        .into_vec();
    file.extend_from_slice(face_header(maxp_offset).as_slice());
    file.extend_from_slice(face_header(maxp_offset).as_slice());
    file.extend_from_slice(&maxp_v05(2));
    file
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_ttf_layout() {
        let font = minimal_ttf();
        assert_eq!(font.len(), 12 + 16 + 6 + 2);
        assert_eq!(&font[..4], &[0x00, 0x01, 0x00, 0x00]);
        assert_eq!(&font[12..16], b"maxp");
        // The table body starts right after the directory.
        assert_eq!(u32::from_be_bytes(font[20..24].try_into().unwrap()), 28);
    }
}
