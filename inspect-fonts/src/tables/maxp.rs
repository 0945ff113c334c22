//! The [Maximum Profile (maxp)](https://docs.microsoft.com/en-us/typography/opentype/spec/maxp) table.

use sfnt_types::Fixed;

use crate::error::ReadError;
use crate::parser::Parser;

const VERSION_0_5: Fixed = Fixed::from_bits(0x00005000);
const VERSION_1_0: Fixed = Fixed::from_bits(0x00010000);

pub(crate) fn parse(p: &mut Parser) -> Result<(), ReadError> {
    let version = p.read::<Fixed>("Version")?;
    p.read::<u16>("Number of glyphs")?;

    if version == VERSION_0_5 {
        return Ok(());
    }
    if version != VERSION_1_0 {
        return Err(ReadError::InvalidVersion);
    }

    p.read::<u16>("Maximum points in a non-composite glyph")?;
    p.read::<u16>("Maximum contours in a non-composite glyph")?;
    p.read::<u16>("Maximum points in a composite glyph")?;
    p.read::<u16>("Maximum contours in a composite glyph")?;
    p.read::<u16>("Maximum zones")?;
    p.read::<u16>("Maximum twilight points")?;
    p.read::<u16>("Number of Storage Area locations")?;
    p.read::<u16>("Number of FDEFs")?;
    p.read::<u16>("Number of IDEFs")?;
    p.read::<u16>("Maximum stack depth")?;
    p.read::<u16>("Maximum byte count for glyph instructions")?;
    p.read::<u16>("Maximum number of components")?;
    p.read::<u16>("Maximum levels of recursion")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use inspect_test_data::bebuffer::BeBuffer;
    use inspect_test_data::maxp_v05;

    use crate::font_data::FontData;
    use crate::parser::Parser;

    #[test]
    fn version_0_5_stops_after_glyph_count() {
        let body = maxp_v05(7);
        let mut p = Parser::new(FontData::new(&body));
        super::parse(&mut p).unwrap();
        assert_eq!(p.offset(), 6);
        let (tree, _) = p.finish();
        assert_eq!(tree.value(tree.child_at(tree.root_id(), 0).unwrap()), "0.3125");
        assert_eq!(tree.value(tree.child_at(tree.root_id(), 1).unwrap()), "7");
    }

    #[test]
    fn version_1_0_reads_profile() {
        let body = BeBuffer::new()
            .push(0x00010000u32)
            .push(4u16)
            .extend([0u16; 13])
            .into_vec();
        let mut p = Parser::new(FontData::new(&body));
        super::parse(&mut p).unwrap();
        assert_eq!(p.offset(), 32);
    }

    #[test]
    fn rejects_unknown_version() {
        let body = BeBuffer::new().push(0x00020000u32).push(0u16).into_vec();
        let mut p = Parser::new(FontData::new(&body));
        assert_eq!(super::parse(&mut p), Err(crate::ReadError::InvalidVersion));
    }
}
