//! The [Vertical Metrics Variations (VVAR)](https://docs.microsoft.com/en-us/typography/opentype/spec/vvar) table.

use sfnt_types::{NullableOffset32, Offset32};

use crate::error::ReadError;
use crate::parser::Parser;
use crate::tables::variations;

pub(crate) fn parse(p: &mut Parser) -> Result<(), ReadError> {
    let start = p.offset();

    let major_version = p.read::<u16>("Major version")?;
    let minor_version = p.read::<u16>("Minor version")?;
    if !(major_version == 1 && minor_version == 0) {
        return Err(ReadError::InvalidVersion);
    }

    let var_store = p.read::<Offset32>("Item variation store offset")?;
    let advance = p.read::<NullableOffset32>("Advance height mapping offset")?;
    let tsb = p.read::<NullableOffset32>("Top side bearing mapping offset")?;
    let bsb = p.read::<NullableOffset32>("Bottom side bearing mapping offset")?;
    let vorg = p.read::<NullableOffset32>("Vertical origin mapping offset")?;

    let mut subtables = [
        ("Item Variation Store", Some(var_store.to_usize()), true),
        ("Advance Height Mapping", advance.non_null(), false),
        ("Top Side Bearing Mapping", tsb.non_null(), false),
        ("Bottom Side Bearing Mapping", bsb.non_null(), false),
        ("Vertical Origin Mapping", vorg.non_null(), false),
    ];
    subtables.sort_by_key(|&(_, offset, _)| offset.unwrap_or(0));

    for (title, offset, is_store) in subtables {
        let Some(offset) = offset.filter(|&offset| offset != 0) else {
            continue;
        };
        p.advance_to(start + offset)?;
        p.begin_group(title);
        if is_store {
            variations::parse_item_variation_store(p)?;
        } else {
            variations::parse_delta_set_index_map(p)?;
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
    use crate::tables::variations::tests::variation_store;

    #[test]
    fn store_only() {
        let body = BeBuffer::new()
            .extend([1u16, 0])
            .push(24u32)
            .extend([0u32, 0, 0, 0])
            .extend(variation_store().into_vec())
            .into_vec();
        let mut p = Parser::new(FontData::new(&body));
        super::parse(&mut p).unwrap();
        assert_eq!(p.offset(), body.len());
    }
}
