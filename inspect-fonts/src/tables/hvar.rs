//! The [Horizontal Metrics Variations (HVAR)](https://docs.microsoft.com/en-us/typography/opentype/spec/hvar) table.

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

    let var_store = p.read::<Offset32>("Item Variation Store offset")?;
    let advance = p.read::<NullableOffset32>("Advance width mapping offset")?;
    let lsb = p.read::<NullableOffset32>("Left side bearing mapping offset")?;
    let rsb = p.read::<NullableOffset32>("Right side bearing mapping offset")?;

    let mut subtables = [
        ("Item Variation Store", Some(var_store.to_usize()), true),
        ("Advance Width Mapping", advance.non_null(), false),
        ("Left Side Bearing Mapping", lsb.non_null(), false),
        ("Right Side Bearing Mapping", rsb.non_null(), false),
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
    fn store_then_mapping() {
        let store = variation_store().into_vec();
        let mapping_offset = 20 + store.len();
        let body = BeBuffer::new()
            .extend([1u16, 0])
            .push(20u32) // store
            .push(mapping_offset as u32) // advance mapping
            .extend([0u32, 0]) // lsb/rsb absent
            .extend(store)
            // Delta-set index map: 1-byte entries, inner bits 0, 1 entry.
            .extend([0x0000u16, 1])
            .push(0x03u8)
            .into_vec();
        let mut p = Parser::new(FontData::new(&body));
        super::parse(&mut p).unwrap();
        assert_eq!(p.offset(), body.len());
        let (tree, _) = p.finish();
        let root = tree.root_id();
        assert_eq!(tree.title(tree.child_at(root, 6).unwrap()), "Item Variation Store");
        assert_eq!(tree.title(tree.child_at(root, 7).unwrap()), "Advance Width Mapping");
    }
}
