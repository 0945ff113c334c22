//! The [Scalable Vector Graphics (SVG)](https://docs.microsoft.com/en-us/typography/opentype/spec/svg) table.

use sfnt_types::Offset32;

use crate::error::ReadError;
use crate::parser::Parser;

// The first two bytes of a gzip stream.
const GZIP_MAGIC: u16 = 0x1F8B;

pub(crate) fn parse(p: &mut Parser) -> Result<(), ReadError> {
    let table_start = p.offset();

    p.read::<u16>("Version")?;
    let list_offset = p.read::<Offset32>("Offset to the SVG Document List")?;
    p.read::<u32>("Reserved")?;

    p.advance_to(table_start + list_offset.to_usize())?;
    p.begin_group("SVG Document List");
    let count = p.read::<u16>("Number of records")?;
    let mut ranges: Vec<(usize, usize)> = Vec::new();
    for i in 0..u32::from(count) {
        p.begin_group_indexed("Record", i);
        p.read::<u16>("First glyph ID")?;
        p.read::<u16>("Last glyph ID")?;
        let offset = p.read::<Offset32>("Offset to an SVG Document")?;
        let size = p.read::<u32>("SVG Document length")?;
        p.end_group();

        let doc_start = table_start + list_offset.to_usize() + offset.to_usize();
        ranges.push((doc_start, size as usize));
    }
    p.end_group();

    // Documents are routinely shared between records.
    ranges.sort_by_key(|&(start, _)| start);
    ranges.dedup_by_key(|&mut (start, _)| start);

    for (start, size) in ranges {
        p.advance_to(start)?;
        if p.peek::<u16>()? == GZIP_MAGIC {
            // Compressed documents are kept as raw bytes.
            p.read_bytes(size, "SVGZ")?;
        } else {
            // OpenType requires UTF-8 here.
            p.read_utf8_string("SVG", size)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use inspect_test_data::bebuffer::BeBuffer;

    use crate::font_data::FontData;
    use crate::parser::Parser;

    #[test]
    fn plain_and_gzip_documents() {
        let svg = b"<svg/>";
        let body = BeBuffer::new()
            .push(0u16) // version
            .push(10u32) // list offset
            .push(0u32) // reserved
            // Document list at 10: two records.
            .push(2u16)
            .extend([0u16, 0])
            .push(26u32) // doc offset (relative to the list)
            .push(svg.len() as u32)
            .extend([1u16, 1])
            .push(32u32)
            .push(4u32)
            // Plain document at 36.
            .extend(svg.iter().copied())
            // Gzip document at 42.
            .extend([0x1Fu8, 0x8B, 0x08, 0x00])
            .into_vec();
        let mut p = Parser::new(FontData::new(&body));
        super::parse(&mut p).unwrap();
        assert_eq!(p.offset(), body.len());
        let (tree, _) = p.finish();
        let root = tree.root_id();
        let count = tree.children_count(root);
        let plain = tree.child_at(root, count - 2).unwrap();
        assert_eq!(tree.title(plain), "SVG");
        assert_eq!(tree.value(plain), "<svg/>");
        let gz = tree.child_at(root, count - 1).unwrap();
        assert_eq!(tree.title(gz), "SVGZ");
    }
}
