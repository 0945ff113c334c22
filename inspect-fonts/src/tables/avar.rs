//! The [Axis Variations (avar)](https://docs.microsoft.com/en-us/typography/opentype/spec/avar) table.

use sfnt_types::F2Dot14;

use crate::error::ReadError;
use crate::parser::Parser;

pub(crate) fn parse(p: &mut Parser) -> Result<(), ReadError> {
    let major_version = p.read::<u16>("Major version")?;
    let minor_version = p.read::<u16>("Minor version")?;
    if !(major_version == 1 && minor_version == 0) {
        return Err(ReadError::InvalidVersion);
    }

    p.read::<u16>("Reserved")?;
    let axis_count = p.read::<u16>("Axis count")?;
    for _ in 0..axis_count {
        p.begin_group("Segment map");
        let pairs = p.read::<u16>("Number of map pairs")?;
        for i in 0..u32::from(pairs) {
            p.begin_group_indexed("Pair", i);
            p.read::<F2Dot14>("From coordinate")?;
            p.read::<F2Dot14>("To coordinate")?;
            p.end_group();
        }
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
    fn segment_maps() {
        let body = BeBuffer::new()
            .extend([1u16, 0, 0, 1]) // version, reserved, one axis
            .push(3u16) // three pairs
            .extend([-16384i16, -16384, 0, 0, 16384, 16384])
            .into_vec();
        let mut p = Parser::new(FontData::new(&body));
        super::parse(&mut p).unwrap();
        assert_eq!(p.offset(), body.len());
        let (tree, _) = p.finish();
        let map = tree.child_at(tree.root_id(), 4).unwrap();
        assert_eq!(tree.title(map), "Segment map");
        assert_eq!(tree.children_count(map), 4);
    }
}
