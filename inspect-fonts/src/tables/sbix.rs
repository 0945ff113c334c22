//! The [Standard Bitmap Graphics (sbix)](https://docs.microsoft.com/en-us/typography/opentype/spec/sbix) table.

use std::fmt;

use sfnt_types::{Offset32, Tag};

use crate::error::ReadError;
use crate::parser::Parser;
use crate::tables::flags_scalar;

struct SbixFlags(u16);
flags_scalar!(SbixFlags, u16);

impl fmt::Display for SbixFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016b}", self.0)?;
        if self.0 & 0x0002 != 0 {
            write!(f, "\nBit 1: Draw outlines")?;
        }
        Ok(())
    }
}

pub(crate) fn parse(p: &mut Parser, number_of_glyphs: u16) -> Result<(), ReadError> {
    let table_start = p.offset();

    let version = p.read::<u16>("Version")?;
    if version != 1 {
        return Err(ReadError::InvalidVersion);
    }

    p.read::<SbixFlags>("Flags")?;
    let num_strikes = p.read::<u32>("Number of bitmap strikes")?;

    let mut offsets = Vec::new();
    p.read_array_with("Offsets", num_strikes as usize, |p, n| {
        offsets.push(p.read_indexed::<Offset32>("Offset", n)?.to_usize());
        Ok(())
    })?;
    offsets.sort_unstable();
    offsets.dedup();

    for strike_offset in offsets {
        let strike_start = table_start + strike_offset;
        p.jump_to(strike_start)?;
        p.begin_group("Strike");

        p.read::<u16>("PPEM")?;
        p.read::<u16>("PPI")?;

        let mut glyph_offsets = Vec::new();
        p.read_array_with("Offsets", number_of_glyphs as usize + 1, |p, n| {
            glyph_offsets.push(p.read_indexed::<Offset32>("Offset", n)?.to_usize());
            Ok(())
        })?;
        glyph_offsets.sort_unstable();
        glyph_offsets.dedup();

        // The final offset marks the end of the last glyph's data.
        for pair in glyph_offsets.windows(2) {
            let data_size = pair[1] - pair[0];
            p.jump_to(strike_start + pair[0])?;
            p.begin_group("Glyph data");
            p.read::<i16>("Horizontal offset")?;
            p.read::<i16>("Vertical offset")?;
            p.read::<Tag>("Type")?;
            let payload = data_size
                .checked_sub(8)
                .ok_or(ReadError::MalformedData("invalid glyph data size"))?;
            p.read_bytes(payload, "Data")?;
            p.end_group();
        }

        p.end_group();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use inspect_test_data::bebuffer::BeBuffer;

    use crate::font_data::FontData;
    use crate::parser::Parser;

    #[test]
    fn one_strike_one_glyph() {
        let body = BeBuffer::new()
            .push(1u16) // version
            .push(0u16) // flags
            .push(1u32) // one strike
            .push(12u32) // strike offset
            // Strike at 12: ppem, ppi, two glyph offsets (one glyph).
            .extend([32u16, 72])
            .extend([12u32, 22]) // glyph data at strike+12, 10 bytes
            // Glyph data: offsets, png tag, 2 payload bytes.
            .extend([0i16, 0])
            .push(*b"png ")
            .extend([0xAAu8, 0xBB])
            .into_vec();
        let mut p = Parser::new(FontData::new(&body));
        super::parse(&mut p, 1).unwrap();
        assert_eq!(p.offset(), body.len());
        let (tree, _) = p.finish();
        let strike = tree.child_at(tree.root_id(), 4).unwrap();
        assert_eq!(tree.title(strike), "Strike");
        let glyph = tree.child_at(strike, 3).unwrap();
        assert_eq!(tree.title(glyph), "Glyph data");
        assert_eq!(tree.children_count(glyph), 4);
    }
}
