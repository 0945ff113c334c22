//! The [Style Attributes (STAT)](https://docs.microsoft.com/en-us/typography/opentype/spec/stat) table.

use sfnt_types::{Fixed, Offset16, Offset32, Tag};

use crate::error::ReadError;
use crate::parser::{NamesMap, Parser};

pub(crate) fn parse(p: &mut Parser, names: &NamesMap) -> Result<(), ReadError> {
    let table_start = p.offset();

    let major_version = p.read::<u16>("Major version")?;
    let minor_version = p.read::<u16>("Minor version")?;
    if major_version != 1 {
        return Err(ReadError::InvalidVersion);
    }
    p.read::<u16>("Axis record size")?;
    let design_axis_count = p.read::<u16>("Number of records")?;
    let design_axes_offset = p.read::<Offset32>("Offset to the axes array")?;
    let axis_value_count = p.read::<u16>("Number of axis value tables")?;
    let axis_values_offset = p.read::<Offset32>("Offset to the axes value offsets array")?;

    if minor_version > 0 {
        p.read_name_id("Fallback name ID", names)?;
    }

    if design_axis_count > 0 {
        p.advance_to(table_start + design_axes_offset.to_usize())?;
        p.begin_group_with_value("Design axes", design_axis_count.to_string());
        for _ in 0..design_axis_count {
            p.begin_group("Record");
            p.read::<Tag>("Tag")?;
            p.read_name_id("Name ID", names)?;
            p.read::<u16>("Axis ordering")?;
            p.end_group();
        }
        p.end_group();
    }

    if axis_value_count == 0 {
        return Ok(());
    }

    let values_base = table_start + axis_values_offset.to_usize();
    p.advance_to(values_base)?;

    let mut offsets = Vec::new();
    p.begin_group_with_value("Axis value tables offsets", axis_value_count.to_string());
    for _ in 0..axis_value_count {
        offsets.push(p.read::<Offset16>("Offset")?.to_usize());
    }
    p.end_group();

    offsets.sort_unstable();
    offsets.dedup();

    for offset in offsets {
        p.advance_to(values_base + offset)?;
        p.begin_group("");
        let format = p.read::<u16>("Format")?;
        match format {
            1 => {
                p.read::<u16>("Axis index")?;
                p.read::<u16>("Flags")?;
                p.read_name_id("Value name ID", names)?;
                p.read::<Fixed>("Value")?;
            }
            2 => {
                p.read::<u16>("Axis index")?;
                p.read::<u16>("Flags")?;
                p.read_name_id("Value name ID", names)?;
                p.read::<Fixed>("Nominal value")?;
                p.read::<Fixed>("Range minimum value")?;
                p.read::<Fixed>("Range maximum value")?;
            }
            3 => {
                p.read::<u16>("Axis index")?;
                p.read::<u16>("Flags")?;
                p.read_name_id("Value name ID", names)?;
                p.read::<Fixed>("Value")?;
                p.read::<Fixed>("Linked value")?;
            }
            4 => {
                let axis_count = p.read::<u16>("Axis count")?;
                p.read::<u16>("Flags")?;
                p.read_name_id("Value name ID", names)?;
                for i in 0..u32::from(axis_count) {
                    p.begin_group_indexed("Axis value", i);
                    p.read::<u16>("Axis index")?;
                    p.read::<Fixed>("Value")?;
                    p.end_group();
                }
            }
            _ => return Err(ReadError::MalformedData("invalid axis value format")),
        }
        p.end_group_titled(format!("Axis value table, format {format}"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use inspect_test_data::bebuffer::BeBuffer;

    use crate::font_data::FontData;
    use crate::parser::{NamesMap, Parser};

    #[test]
    fn axes_and_values() {
        let body = BeBuffer::new()
            .extend([1u16, 1]) // version 1.1
            .push(8u16) // axis record size
            .push(1u16) // one design axis
            .push(20u32) // axes offset
            .push(1u16) // one axis value table
            .push(28u32) // value offsets offset
            .push(2u16) // fallback name id
            // Design axis at 20.
            .push(*b"wght")
            .extend([256u16, 0])
            // Offsets array at 28.
            .push(2u16)
            // Axis value format 1 at 30.
            .extend([1u16, 0, 0, 257])
            .push(0x01900000u32)
            .into_vec();
        let mut p = Parser::new(FontData::new(&body));
        super::parse(&mut p, &NamesMap::default()).unwrap();
        assert_eq!(p.offset(), body.len());
        let (tree, _) = p.finish();
        let root = tree.root_id();
        let value = tree.child_at(root, tree.children_count(root) - 1).unwrap();
        assert_eq!(tree.title(value), "Axis value table, format 1");
    }
}
