//! The [Tracking (trak)](https://developer.apple.com/fonts/TrueType-Reference-Manual/RM06/Chap6trak.html) table.

use sfnt_types::{Fixed, NullableOffset16, Offset16, Offset32};

use crate::error::ReadError;
use crate::parser::{NamesMap, Parser};

fn parse_track_data(p: &mut Parser, names: &NamesMap, table_start: usize) -> Result<(), ReadError> {
    let number_of_tracks = p.read::<u16>("Number of tracks")?;
    let number_of_sizes = p.read::<u16>("Number of point sizes")?;
    p.read::<Offset32>("Offset to size subtable")?;

    let mut offsets = Vec::new();
    p.read_array_with("Tracks", number_of_tracks as usize, |p, n| {
        p.begin_group_nth(n);
        p.read::<Fixed>("Value")?;
        let name = p.read_name_id("Name ID", names)?;
        offsets.push(p.read::<Offset16>("Offset to per-size tracking values")?.to_usize());
        p.end_group_valued(name.unwrap_or_default());
        Ok(())
    })?;
    p.read_array::<Fixed>("Point Sizes", number_of_sizes as usize)?;

    offsets.sort_unstable();
    offsets.dedup();

    p.read_array_with("Tracks Values", offsets.len(), |p, n| {
        p.advance_to(table_start + offsets[n as usize])?;
        p.read_array::<i16>(format!("Track {n}"), number_of_sizes as usize)
    })
}

pub(crate) fn parse(p: &mut Parser, names: &NamesMap) -> Result<(), ReadError> {
    let table_start = p.offset();

    p.read::<Fixed>("Version")?;
    p.read::<u16>("Format")?;
    let horizontal = p.read::<NullableOffset16>("Offset to horizontal Track Data")?;
    let vertical = p.read::<NullableOffset16>("Offset to vertical Track Data")?;
    p.read::<u16>("Reserved")?;

    if horizontal.non_null().is_some() {
        p.begin_group("Horizontal Track Data");
        parse_track_data(p, names, table_start)?;
        p.end_group();
    }
    if vertical.non_null().is_some() {
        p.begin_group("Vertical Track Data");
        parse_track_data(p, names, table_start)?;
        p.end_group();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use inspect_test_data::bebuffer::BeBuffer;

    use crate::font_data::FontData;
    use crate::parser::{NamesMap, Parser};

    #[test]
    fn horizontal_track_data() {
        let body = BeBuffer::new()
            .push(0x00010000u32) // version
            .push(0u16) // format
            .push(12u16) // horizontal offset
            .push(0u16) // no vertical data
            .push(0u16) // reserved
            // Track data at 12: one track, two sizes.
            .extend([1u16, 2])
            .push(28u32) // size subtable offset
            // Track record: value 0.0, name id 256, values at 36.
            .push(0u32)
            .push(256u16)
            .push(36u16)
            // Point sizes at 28.
            .extend([0x000C0000u32, 0x00180000])
            // Per-size tracking values at 36.
            .extend([-10i16, -5])
            .into_vec();
        let mut p = Parser::new(FontData::new(&body));
        super::parse(&mut p, &NamesMap::default()).unwrap();
        assert_eq!(p.offset(), body.len());
        let (tree, _) = p.finish();
        let track_data = tree.child_at(tree.root_id(), 5).unwrap();
        assert_eq!(tree.title(track_data), "Horizontal Track Data");
        assert_eq!(tree.children_count(track_data), 6);
    }
}
