//! Class-definition and coverage tables shared by the OpenType layout
//! tables.

use sfnt_types::GlyphId;

use crate::error::ReadError;
use crate::parser::Parser;

pub(crate) fn parse_class_definition(p: &mut Parser) -> Result<(), ReadError> {
    let format = p.read::<u16>("Format")?;
    match format {
        1 => {
            p.read::<u16>("First glyph ID")?;
            let glyph_count = p.read::<u16>("Number of classes")?;
            for _ in 0..glyph_count {
                p.read::<u16>("Class")?;
            }
            Ok(())
        }
        2 => {
            let range_count = p.read::<u16>("Number of records")?;
            for _ in 0..range_count {
                p.begin_group("Class Range Record");
                let first = p.read::<u16>("First glyph ID")?;
                let last = p.read::<u16>("Last glyph ID")?;
                let class = p.read::<u16>("Class")?;
                p.end_group_valued(format!("{first}..{last} {class}"));
            }
            Ok(())
        }
        _ => Err(ReadError::MalformedData("invalid class format")),
    }
}

pub(crate) fn parse_coverage(p: &mut Parser) -> Result<(), ReadError> {
    let format = p.read::<u16>("Format")?;
    match format {
        1 => {
            let glyph_count = p.read::<u16>("Number of glyphs")?;
            for _ in 0..glyph_count {
                p.read::<GlyphId>("Glyph")?;
            }
            Ok(())
        }
        2 => {
            let range_count = p.read::<u16>("Number of records")?;
            for _ in 0..range_count {
                p.begin_group("Range Record");
                let first = p.read::<u16>("First glyph ID")?;
                let last = p.read::<u16>("Last glyph ID")?;
                let index = p.read::<u16>("Coverage Index of first glyph ID")?;
                p.end_group_valued(format!("{first}..{last} {index}"));
            }
            Ok(())
        }
        _ => Err(ReadError::MalformedData("invalid coverage format")),
    }
}

#[cfg(test)]
mod tests {
    use inspect_test_data::bebuffer::BeBuffer;

    use crate::font_data::FontData;
    use crate::parser::Parser;

    #[test]
    fn class_definition_format_2() {
        let body = BeBuffer::new()
            .push(2u16)
            .push(1u16)
            .extend([10u16, 20, 3])
            .into_vec();
        let mut p = Parser::new(FontData::new(&body));
        super::parse_class_definition(&mut p).unwrap();
        let (tree, _) = p.finish();
        let record = tree.child_at(tree.root_id(), 2).unwrap();
        assert_eq!(tree.value(record), "10..20 3");
    }

    #[test]
    fn coverage_format_1() {
        let body = BeBuffer::new().push(1u16).push(2u16).extend([4u16, 9]).into_vec();
        let mut p = Parser::new(FontData::new(&body));
        super::parse_coverage(&mut p).unwrap();
        assert_eq!(p.offset(), 8);
    }

    #[test]
    fn bad_format_is_rejected() {
        let body = BeBuffer::new().push(9u16).into_vec();
        let mut p = Parser::new(FontData::new(&body));
        assert!(super::parse_coverage(&mut p).is_err());
    }
}
