//! The [Anchor Point (ankr)](https://developer.apple.com/fonts/TrueType-Reference-Manual/RM06/Chap6ankr.html) table.

use sfnt_types::NullableOffset32;

use crate::error::ReadError;
use crate::parser::Parser;
use crate::tables::aat;

pub(crate) fn parse(p: &mut Parser, number_of_glyphs: u16) -> Result<(), ReadError> {
    let table_start = p.offset();

    p.read::<u16>("Version")?;
    p.read::<u16>("Unused")?;
    let lookup_offset = p.read::<NullableOffset32>("Offset to lookup table")?;
    let glyph_data_offset = p.read::<NullableOffset32>("Offset to glyph data table")?;

    let Some(lookup_offset) = lookup_offset.non_null() else {
        return Err(ReadError::MalformedData("invalid lookup table offset"));
    };

    p.advance_to(table_start + lookup_offset)?;
    let offsets = aat::parse_lookup(p, number_of_glyphs)?;

    let Some(glyph_data_offset) = glyph_data_offset.non_null() else {
        return Ok(());
    };

    p.read_array_with("Glyphs Data", offsets.len(), |p, n| {
        p.advance_to(table_start + glyph_data_offset + offsets[n as usize])?;
        p.begin_group_nth(n);
        let number_of_points = p.read::<u32>("Number of points")?;
        p.read_array_with("Points", number_of_points as usize, |p, n| {
            p.begin_group_nth(n);
            p.read::<i16>("X")?;
            p.read::<i16>("Y")?;
            p.end_group();
            Ok(())
        })?;
        p.end_group();
        Ok(())
    })
}
