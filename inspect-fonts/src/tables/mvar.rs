//! The [Metrics Variations (MVAR)](https://docs.microsoft.com/en-us/typography/opentype/spec/mvar) table.

use sfnt_types::{Offset16, Tag};

use crate::error::ReadError;
use crate::parser::Parser;
use crate::tables::variations;

pub(crate) fn parse(p: &mut Parser) -> Result<(), ReadError> {
    let major_version = p.read::<u16>("Major version")?;
    let minor_version = p.read::<u16>("Minor version")?;
    if !(major_version == 1 && minor_version == 0) {
        return Err(ReadError::InvalidVersion);
    }

    p.read::<u16>("Reserved")?;
    p.read::<u16>("Value record size")?;
    let value_count = p.read::<u16>("Number of Value Records")?;
    p.read::<Offset16>("Offset to the Item Variation Store")?;

    if value_count == 0 {
        return Ok(());
    }

    p.begin_group("Records");
    for i in 0..u32::from(value_count) {
        p.begin_group_indexed("Record", i);
        p.read::<Tag>("Tag")?;
        p.read::<u16>("A delta-set outer index")?;
        p.read::<u16>("A delta-set inner index")?;
        p.end_group();
    }
    p.end_group();

    p.begin_group("Item variation store");
    variations::parse_item_variation_store(p)?;
    p.end_group();
    Ok(())
}

#[cfg(test)]
mod tests {
    use inspect_test_data::bebuffer::BeBuffer;

    use crate::font_data::FontData;
    use crate::parser::Parser;
    use crate::tables::variations::tests::variation_store;

    #[test]
    fn records_then_store() {
        let body = BeBuffer::new()
            .extend([1u16, 0, 0, 8, 1])
            .push(20u16) // offset to the store
            .push(*b"hasc")
            .extend([0u16, 0])
            .extend(variation_store().into_vec())
            .into_vec();
        let mut p = Parser::new(FontData::new(&body));
        super::parse(&mut p).unwrap();
        assert_eq!(p.offset(), body.len());
    }

    #[test]
    fn zero_records_stop_early() {
        let body = BeBuffer::new().extend([1u16, 0, 0, 8, 0, 0]).into_vec();
        let mut p = Parser::new(FontData::new(&body));
        super::parse(&mut p).unwrap();
        assert_eq!(p.offset(), 12);
    }
}
