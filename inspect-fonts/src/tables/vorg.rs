//! The [Vertical Origin (VORG)](https://docs.microsoft.com/en-us/typography/opentype/spec/vorg) table.

use sfnt_types::GlyphId;

use crate::error::ReadError;
use crate::parser::Parser;

pub(crate) fn parse(p: &mut Parser) -> Result<(), ReadError> {
    let major_version = p.read::<u16>("Major version")?;
    let minor_version = p.read::<u16>("Minor version")?;
    if !(major_version == 1 && minor_version == 0) {
        return Err(ReadError::InvalidVersion);
    }

    p.read::<i16>("Default vertical origin")?;
    let count = p.read::<u16>("Number of metrics")?;
    for i in 0..u32::from(count) {
        p.begin_group_indexed("Metric", i);
        p.read::<GlyphId>("Glyph index")?;
        p.read::<i16>("Coordinate")?;
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
    fn metrics() {
        let body = BeBuffer::new()
            .extend([1u16, 0])
            .push(880i16)
            .push(2u16)
            .extend([3u16, 0xFFF6, 7, 850])
            .into_vec();
        let mut p = Parser::new(FontData::new(&body));
        super::parse(&mut p).unwrap();
        assert_eq!(p.offset(), 16);
        let (tree, _) = p.finish();
        let metric = tree.child_at(tree.root_id(), 4).unwrap();
        assert_eq!(tree.title(metric), "Metric");
        assert_eq!(tree.index(metric), Some(0));
    }
}
