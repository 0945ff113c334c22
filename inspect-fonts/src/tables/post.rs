//! The [PostScript (post)](https://docs.microsoft.com/en-us/typography/opentype/spec/post) table.

use sfnt_types::Fixed;

use crate::error::ReadError;
use crate::parser::Parser;

// Indices below this refer to the standard Macintosh glyph names.
const FIRST_CUSTOM_INDEX: u16 = 258;

pub(crate) fn parse(p: &mut Parser) -> Result<(), ReadError> {
    let version = p.read::<Fixed>("Version")?;
    p.read::<Fixed>("Italic angle")?;
    p.read::<i16>("Underline position")?;
    p.read::<i16>("Underline thickness")?;
    p.read::<u32>("Is fixed pitch")?;
    p.read::<u32>("Min memory when font is downloaded")?;
    p.read::<u32>("Max memory when font is downloaded")?;
    p.read::<u32>("Min memory when font is downloaded as a Type 1")?;
    p.read::<u32>("Max memory when font is downloaded as a Type 1")?;

    if version != Fixed::from_bits(0x00020000) {
        return Ok(());
    }

    let num_glyphs = p.read::<u16>("Number of glyphs")?;
    if num_glyphs == 0 {
        return Ok(());
    }

    let mut names_count = 0u32;
    p.begin_group("Glyph name indexes");
    for _ in 0..num_glyphs {
        let index = p.read::<u16>("Index")?;
        if index >= FIRST_CUSTOM_INDEX {
            names_count = names_count.max(u32::from(index - FIRST_CUSTOM_INDEX) + 1);
        }
    }
    p.end_group();

    for _ in 0..names_count {
        p.read_pascal_string("Name")?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use inspect_test_data::bebuffer::BeBuffer;

    use crate::font_data::FontData;
    use crate::parser::Parser;

    fn post_header(version: u32) -> BeBuffer {
        BeBuffer::new()
            .push(version)
            .push(0u32) // italic angle
            .extend([-75i16, 50])
            .extend([0u32; 5])
    }

    #[test]
    fn version_3_has_no_names() {
        let body = post_header(0x00030000).into_vec();
        let mut p = Parser::new(FontData::new(&body));
        super::parse(&mut p).unwrap();
        assert_eq!(p.offset(), 32);
    }

    #[test]
    fn version_2_names_are_bounded_by_indices() {
        // Three glyphs: one standard name, two custom names.
        let body = post_header(0x00020000)
            .push(3u16)
            .extend([0u16, 259, 258])
            .push(1u8)
            .push(b'A')
            .push(2u8)
            .extend([b'B', b'C'])
            .into_vec();
        let mut p = Parser::new(FontData::new(&body));
        super::parse(&mut p).unwrap();
        assert_eq!(p.offset(), body.len());
        let (tree, _) = p.finish();
        let root = tree.root_id();
        // 10 header fields + index array + two name groups.
        assert_eq!(tree.children_count(root), 13);
        let first = tree.child_at(root, 11).unwrap();
        assert_eq!(tree.title(first), "Name");
        assert_eq!(tree.value(first), "A");
        assert_eq!(tree.value(tree.child_at(root, 12).unwrap()), "BC");
    }
}
