//! The [Index to Location (loca)](https://docs.microsoft.com/en-us/typography/opentype/spec/loca) table.

use sfnt_types::{Offset16, Offset32};

use crate::error::ReadError;
use crate::font_data::Cursor;
use crate::parser::Parser;

pub(crate) fn parse(
    p: &mut Parser,
    number_of_glyphs: u16,
    index_to_loc_format: u16,
) -> Result<(), ReadError> {
    for i in 0..=u32::from(number_of_glyphs) {
        if index_to_loc_format == 0 {
            p.read_indexed::<Offset16>("Offset", i)?;
        } else {
            p.read_indexed::<Offset32>("Offset", i)?;
        }
    }
    Ok(())
}

/// Collect the glyph data offsets ahead of time for `glyf`.
///
/// Short-format offsets are stored halved; the returned values are actual
/// byte offsets into the glyph data table.
pub(crate) fn collect_offsets(
    mut cursor: Cursor,
    number_of_glyphs: u16,
    index_to_loc_format: u16,
) -> Result<Vec<u32>, ReadError> {
    let mut offsets = Vec::with_capacity(number_of_glyphs as usize + 1);
    for _ in 0..=number_of_glyphs {
        let offset = if index_to_loc_format == 0 {
            u32::from(cursor.read::<u16>()?) * 2
        } else {
            cursor.read::<u32>()?
        };
        offsets.push(offset);
    }
    Ok(offsets)
}

#[cfg(test)]
mod tests {
    use inspect_test_data::bebuffer::BeBuffer;

    use crate::font_data::{Cursor, FontData};
    use crate::parser::Parser;

    #[test]
    fn short_format_offsets_are_doubled() {
        let body = BeBuffer::new().extend([0u16, 10, 25]).into_vec();
        let data = FontData::new(&body);
        let offsets = super::collect_offsets(Cursor::new(data), 2, 0).unwrap();
        assert_eq!(offsets, [0, 20, 50]);

        let mut p = Parser::new(data);
        super::parse(&mut p, 2, 0).unwrap();
        assert_eq!(p.offset(), 6);
    }

    #[test]
    fn long_format_offsets_are_raw() {
        let body = BeBuffer::new().extend([0u32, 0x10000]).into_vec();
        let offsets = super::collect_offsets(Cursor::new(FontData::new(&body)), 1, 1).unwrap();
        assert_eq!(offsets, [0, 0x10000]);
    }
}
