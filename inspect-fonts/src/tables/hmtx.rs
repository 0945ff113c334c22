//! The [Horizontal Metrics (hmtx)](https://docs.microsoft.com/en-us/typography/opentype/spec/hmtx) table.

use crate::error::ReadError;
use crate::parser::Parser;

pub(crate) fn parse(
    p: &mut Parser,
    number_of_metrics: u16,
    number_of_glyphs: u16,
) -> Result<(), ReadError> {
    for i in 0..number_of_metrics {
        p.begin_group_indexed("Glyph", u32::from(i));
        p.read::<u16>("Advance width")?;
        p.read::<i16>("Left side bearing")?;
        p.end_group();
    }

    // Monospaced tails carry a lone side bearing per remaining glyph.
    for i in number_of_metrics..number_of_glyphs {
        p.begin_group_indexed("Glyph", u32::from(i));
        p.read::<i16>("Left side bearing")?;
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
    fn metrics_then_bearings() {
        let body = BeBuffer::new()
            .extend([500u16, 10, 550, 20]) // two full metrics
            .push(30i16) // one lone side bearing
            .into_vec();
        let mut p = Parser::new(FontData::new(&body));
        super::parse(&mut p, 2, 3).unwrap();
        assert_eq!(p.offset(), 10);
        let (tree, _) = p.finish();
        let root = tree.root_id();
        assert_eq!(tree.children_count(root), 3);
        let tail = tree.child_at(root, 2).unwrap();
        assert_eq!(tree.index(tail), Some(2));
        assert_eq!(tree.children_count(tail), 1);
    }

    #[test]
    fn truncated_metrics_fail() {
        let body = BeBuffer::new().extend([500u16, 10]).push(550u16).into_vec();
        let mut p = Parser::new(FontData::new(&body));
        assert_eq!(
            super::parse(&mut p, 2, 2),
            Err(crate::ReadError::OutOfBounds)
        );
    }
}
