//! The [Glyph Definition (GDEF)](https://docs.microsoft.com/en-us/typography/opentype/spec/gdef) table.

use sfnt_types::{NullableOffset16, NullableOffset32, Offset16, Offset32};

use crate::error::ReadError;
use crate::parser::Parser;
use crate::tables::{layout, variations};

#[derive(Clone, Copy, PartialEq)]
enum SubtableKind {
    GlyphClassDef,
    AttachmentPointList,
    MarkAttachClassDef,
    MarkGlyphSetsDef,
    VarStore,
}

pub(crate) fn parse(p: &mut Parser) -> Result<(), ReadError> {
    let start = p.offset();

    let major_version = p.read::<u16>("Major version")?;
    let minor_version = p.read::<u16>("Minor version")?;
    let glyph_class_def =
        p.read::<NullableOffset16>("Offset to class definition table")?;
    let attachment_point_list =
        p.read::<NullableOffset16>("Offset to attachment point list table")?;
    p.read::<NullableOffset16>("Offset to ligature caret list table")?;
    let mark_attach_class_def =
        p.read::<NullableOffset16>("Offset to class definition table for mark attachment type")?;

    let mut mark_glyph_sets_def = None;
    let mut var_store = None;
    if major_version == 1 && minor_version == 2 {
        mark_glyph_sets_def = p
            .read::<NullableOffset16>("Offset to the table of mark glyph set definitions")?
            .non_null();
    } else if major_version == 1 && minor_version == 3 {
        mark_glyph_sets_def = p
            .read::<NullableOffset16>("Offset to the table of mark glyph set definitions")?
            .non_null();
        var_store = p
            .read::<NullableOffset32>("Offset to the Item Variation Store table")?
            .non_null();
    }

    // All subtable offsets are from the beginning of the GDEF header.
    let mut offsets: Vec<(SubtableKind, usize)> = Vec::new();
    let mut add = |kind, offset: Option<usize>| {
        if let Some(offset) = offset {
            offsets.push((kind, offset));
        }
    };
    add(SubtableKind::GlyphClassDef, glyph_class_def.non_null());
    add(
        SubtableKind::AttachmentPointList,
        attachment_point_list.non_null(),
    );
    add(
        SubtableKind::MarkAttachClassDef,
        mark_attach_class_def.non_null(),
    );
    add(SubtableKind::MarkGlyphSetsDef, mark_glyph_sets_def);
    add(SubtableKind::VarStore, var_store);
    offsets.sort_by_key(|&(_, offset)| offset);

    for (kind, offset) in offsets {
        p.advance_to(start + offset)?;
        match kind {
            SubtableKind::GlyphClassDef => {
                p.begin_group("Class Definition Table");
                layout::parse_class_definition(p)?;
                p.end_group();
            }
            SubtableKind::AttachmentPointList => {
                parse_attachment_point_list(p, start + offset)?;
            }
            SubtableKind::MarkAttachClassDef => {
                p.begin_group("Mark Attachment Class Definition Table");
                layout::parse_class_definition(p)?;
                p.end_group();
            }
            SubtableKind::MarkGlyphSetsDef => {
                parse_mark_glyph_sets(p)?;
            }
            SubtableKind::VarStore => {
                p.begin_group("Item Variation Store Table");
                variations::parse_item_variation_store(p)?;
                p.end_group();
            }
        }
    }
    Ok(())
}

fn parse_attachment_point_list(p: &mut Parser, list_start: usize) -> Result<(), ReadError> {
    p.begin_group("Attachment Point List Table");
    let coverage_offset = p.read::<Offset16>("Offset to Coverage table")?;
    let count = p.read::<u16>("Number of glyphs with attachment points")?;

    let mut offsets = Vec::new();
    if count > 0 {
        p.read_array_with("Offsets to Attach Point tables", count as usize, |p, n| {
            offsets.push(p.read_indexed::<Offset16>("Offset", n)?.to_usize());
            Ok(())
        })?;
    }

    p.advance_to(list_start + coverage_offset.to_usize())?;
    p.begin_group("Coverage Table");
    layout::parse_coverage(p)?;
    p.end_group();

    if !offsets.is_empty() {
        offsets.sort_unstable();
        offsets.dedup();

        p.begin_group("Attach Point Tables");
        for (i, offset) in offsets.into_iter().enumerate() {
            p.advance_to(list_start + offset)?;
            p.begin_group_indexed("Attach Point", i as u32);
            let count = p.read::<u16>("Number of attachment points")?;
            for _ in 0..count {
                p.read::<u16>("Contour point index")?;
            }
            p.end_group();
        }
        p.end_group();
    }

    p.end_group();
    Ok(())
}

fn parse_mark_glyph_sets(p: &mut Parser) -> Result<(), ReadError> {
    p.begin_group("Mark Glyph Sets Table");
    let table_start = p.offset();
    p.read::<u16>("Format")?;
    let count = p.read::<u16>("Number of mark glyph sets")?;

    if count != 0 {
        // The offset array routinely holds duplicates.
        let mut offsets = Vec::new();
        p.read_array_with(
            "Offsets to Mark Glyph Set Coverage Tables",
            count as usize,
            |p, n| {
                offsets.push(p.read_nth::<Offset32>(n)?.to_usize());
                Ok(())
            },
        )?;
        offsets.sort_unstable();
        offsets.dedup();

        for offset in offsets {
            p.advance_to(table_start + offset)?;
            p.begin_group("Coverage Table");
            layout::parse_coverage(p)?;
            p.end_group();
        }
    }
    p.end_group();
    Ok(())
}

#[cfg(test)]
mod tests {
    use inspect_test_data::bebuffer::BeBuffer;

    use crate::font_data::FontData;
    use crate::parser::Parser;

    #[test]
    fn version_1_0_with_class_def() {
        let body = BeBuffer::new()
            .extend([1u16, 0]) // version 1.0
            .push(12u16) // glyph class def offset
            .extend([0u16, 0, 0]) // other offsets null
            // Class definition at 12, format 1.
            .extend([1u16, 10, 2, 1, 1])
            .into_vec();
        let mut p = Parser::new(FontData::new(&body));
        super::parse(&mut p).unwrap();
        assert_eq!(p.offset(), body.len());
        let (tree, _) = p.finish();
        let class_def = tree.child_at(tree.root_id(), 6).unwrap();
        assert_eq!(tree.title(class_def), "Class Definition Table");
    }

    #[test]
    fn null_offsets_mean_nothing_to_parse() {
        let body = BeBuffer::new()
            .extend([1u16, 0])
            .extend([0u16, 0, 0, 0])
            .into_vec();
        let mut p = Parser::new(FontData::new(&body));
        super::parse(&mut p).unwrap();
        assert_eq!(p.offset(), 12);
    }
}
