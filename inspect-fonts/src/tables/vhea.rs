//! The [Vertical Header (vhea)](https://docs.microsoft.com/en-us/typography/opentype/spec/vhea) table.

use sfnt_types::Fixed;

use crate::error::ReadError;
use crate::parser::Parser;

pub(crate) fn parse(p: &mut Parser) -> Result<(), ReadError> {
    let version = p.read::<Fixed>("Version")?;
    // Version 1.1 is stored as 1.0625.
    if version != Fixed::from_bits(0x00010000) && version != Fixed::from_bits(0x00011000) {
        return Err(ReadError::InvalidVersion);
    }

    // 1.0 and 1.1 differ only in field naming; these are the 1.1 names.
    p.read::<i16>("Vertical typographic ascender")?;
    p.read::<i16>("Vertical typographic descender")?;
    p.read::<i16>("Vertical typographic line gap")?;
    p.read::<u16>("Maximum advance width")?;
    p.read::<i16>("Minimum top sidebearing")?;
    p.read::<i16>("Minimum bottom sidebearing")?;
    p.read::<i16>("Maximum Y extent")?;
    p.read::<i16>("Caret slope rise")?;
    p.read::<i16>("Caret slope run")?;
    p.read::<i16>("Caret offset")?;
    p.read::<i16>("Reserved")?;
    p.read::<i16>("Reserved")?;
    p.read::<i16>("Reserved")?;
    p.read::<i16>("Reserved")?;
    p.read::<i16>("Metric data format")?;
    p.read::<u16>("Number of vertical metrics")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use inspect_test_data::bebuffer::BeBuffer;

    use crate::font_data::FontData;
    use crate::parser::Parser;

    #[test]
    fn accepts_version_1_1() {
        let body = BeBuffer::new()
            .push(0x00011000u32)
            .extend([0i16; 15])
            .push(1u16)
            .into_vec();
        let mut p = Parser::new(FontData::new(&body));
        super::parse(&mut p).unwrap();
        assert_eq!(p.offset(), 36);
    }

    #[test]
    fn rejects_version_2() {
        let body = BeBuffer::new().push(0x00020000u32).into_vec();
        let mut p = Parser::new(FontData::new(&body));
        assert_eq!(super::parse(&mut p), Err(crate::ReadError::InvalidVersion));
    }
}
