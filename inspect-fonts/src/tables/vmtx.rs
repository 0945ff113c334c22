//! The [Vertical Metrics (vmtx)](https://docs.microsoft.com/en-us/typography/opentype/spec/vmtx) table.

use crate::error::ReadError;
use crate::parser::Parser;

pub(crate) fn parse(
    p: &mut Parser,
    number_of_metrics: u16,
    number_of_glyphs: u16,
) -> Result<(), ReadError> {
    for i in 0..number_of_metrics {
        p.begin_group_indexed("Glyph", u32::from(i));
        p.read::<u16>("Advance height")?;
        p.read::<i16>("Top side bearing")?;
        p.end_group();
    }

    for i in number_of_metrics..number_of_glyphs {
        p.begin_group_indexed("Glyph", u32::from(i));
        p.read::<i16>("Top side bearing")?;
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
    fn all_full_metrics() {
        let body = BeBuffer::new().extend([900u16, 5, 910, 6]).into_vec();
        let mut p = Parser::new(FontData::new(&body));
        super::parse(&mut p, 2, 2).unwrap();
        assert_eq!(p.offset(), 8);
    }
}
