//! The [Font Variations (fvar)](https://docs.microsoft.com/en-us/typography/opentype/spec/fvar) table.

use sfnt_types::{Fixed, Offset16, Tag};

use crate::error::ReadError;
use crate::parser::{NamesMap, Parser};

pub(crate) fn parse(p: &mut Parser, names: &NamesMap) -> Result<(), ReadError> {
    let major_version = p.read::<u16>("Major version")?;
    let minor_version = p.read::<u16>("Minor version")?;
    if !(major_version == 1 && minor_version == 0) {
        return Err(ReadError::InvalidVersion);
    }

    p.read::<Offset16>("Offset to VariationAxisRecord array")?;
    p.read::<u16>("Reserved")?;
    let axis_count = p.read::<u16>("The number of variation axes")?;
    p.read::<u16>("The size of VariationAxisRecord")?;
    let instance_count = p.read::<u16>("The number of named instances")?;
    let instance_size = p.read::<u16>("The size of InstanceRecord")?;

    p.begin_group("Variation axis records");
    for _ in 0..axis_count {
        p.begin_group("");
        let tag = p.read::<Tag>("Axis tag")?;
        p.read::<Fixed>("Minimum coordinate")?;
        p.read::<Fixed>("Default coordinate")?;
        p.read::<Fixed>("Maximum coordinate")?;
        p.read::<u16>("Axis qualifiers")?;
        p.read_name_id("The name ID", names)?;
        p.end_group_titled(format!("Axis {tag}"));
    }
    p.end_group();

    // An instance record is axis coordinates plus two or three u16 fields;
    // the PostScript name id is present only in the longer form.
    let has_postscript_name_id = usize::from(instance_size) == usize::from(axis_count) * 4 + 6;

    if instance_count > 0 {
        p.begin_group("Instance records");
        for _ in 0..instance_count {
            p.begin_group("Instance");
            p.read_name_id("Subfamily name ID", names)?;
            p.read::<u16>("Reserved")?;
            for _ in 0..axis_count {
                p.read::<Fixed>("Coordinate")?;
            }
            if has_postscript_name_id {
                p.read_name_id("PostScript name ID", names)?;
            }
            p.end_group();
        }
        p.end_group();
    }
    Ok(())
}
