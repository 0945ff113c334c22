//! Structures shared by the variable-font tables: the item variation store
//! and the HVAR-style delta-set index map.

use std::fmt;

use sfnt_types::{F2Dot14, Offset32, ReadScalar, ValueType};

use crate::error::ReadError;
use crate::parser::Parser;

fn parse_region_list(p: &mut Parser) -> Result<(), ReadError> {
    let axis_count = p.read::<u16>("Axis count")?;
    let region_count = p.read::<u16>("Region count")?;

    for _ in 0..region_count {
        p.begin_group("Region");
        for _ in 0..axis_count {
            p.begin_group("Region axis");
            p.read::<F2Dot14>("Start coordinate")?;
            p.read::<F2Dot14>("Peak coordinate")?;
            p.read::<F2Dot14>("End coordinate")?;
            p.end_group();
        }
        p.end_group();
    }
    Ok(())
}

fn parse_item_variation_data(p: &mut Parser) -> Result<(), ReadError> {
    let item_count = p.read::<u16>("Number of delta sets")?;
    let short_delta_count = p.read::<u16>("Number of short deltas")?;
    let region_index_count = p.read::<u16>("Number of variation regions")?;

    if region_index_count != 0 {
        p.read_array_with("Region indices", region_index_count as usize, |p, n| {
            p.read_indexed::<u16>("Index", n).map(|_| ())
        })?;
    }

    if item_count != 0 {
        p.begin_group("Delta-set rows");
        for i in 0..u32::from(item_count) {
            p.begin_group_indexed("Delta-set", i);
            for _ in 0..short_delta_count {
                p.read::<i16>("Delta")?;
            }
            for _ in 0..region_index_count.saturating_sub(short_delta_count) {
                p.read::<i8>("Delta")?;
            }
            p.end_group();
        }
        p.end_group();
    }
    Ok(())
}

/// The item variation store: a region list plus delta-set subtables, parsed
/// in ascending offset order.
pub(crate) fn parse_item_variation_store(p: &mut Parser) -> Result<(), ReadError> {
    let start = p.offset();

    p.read::<u16>("Format")?;
    let region_list_offset = p.read::<Offset32>("Offset to the variation region list")?;
    let data_count = p.read::<u16>("Number of item variation subtables")?;

    let mut offsets = Vec::new();
    if data_count != 0 {
        p.read_array_with("Offsets", data_count as usize, |p, n| {
            offsets.push(p.read_indexed::<Offset32>("Offset", n)?.to_usize());
            Ok(())
        })?;
    }

    if region_list_offset.to_usize() != 0 {
        p.jump_to(start + region_list_offset.to_usize())?;
        p.begin_group("Region list");
        parse_region_list(p)?;
        p.end_group();
    }

    offsets.sort_unstable();
    offsets.dedup();
    for offset in offsets {
        p.jump_to(start + offset)?;
        p.begin_group("Item variation subtable");
        parse_item_variation_data(p)?;
        p.end_group();
    }
    Ok(())
}

/// The packed entry-format field of a delta-set index map.
pub(crate) struct EntryFormat(u16);

impl EntryFormat {
    pub(crate) fn inner_index_bits(&self) -> u16 {
        self.0 & 0x000F
    }

    pub(crate) fn entry_size(&self) -> u16 {
        ((self.0 & 0x0030) >> 4) + 1
    }
}

impl ReadScalar for EntryFormat {
    const RAW_BYTE_LEN: usize = 2;
    const VALUE_TYPE: ValueType = ValueType::Masks;

    fn read_be(data: &[u8]) -> Option<Self> {
        u16::read_be(data).map(Self)
    }
}

impl fmt::Display for EntryFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Inner index bit count: {}\nMap entry size: {}",
            self.inner_index_bits(),
            self.entry_size()
        )
    }
}

fn entry_value(entry: u32, inner_index_bits: u16) -> String {
    let outer = entry >> (inner_index_bits + 1);
    let inner = entry & ((1u32 << (inner_index_bits + 1)) - 1);
    format!("Outer index: {outer}\nInner index: {inner}")
}

/// A delta-set index map (HVAR/VVAR style).
pub(crate) fn parse_delta_set_index_map(p: &mut Parser) -> Result<(), ReadError> {
    let format = p.read::<EntryFormat>("Entry format")?;
    let count = p.read::<u16>("Number of entries")?;

    let inner_index_bits = format.inner_index_bits();
    let entry_size = format.entry_size();
    p.read_array_with("Entries", count as usize, |p, n| {
        match entry_size {
            1 => {
                let entry = p.peek::<u8>()?;
                let value = entry_value(u32::from(entry), inner_index_bits);
                p.read_with_value::<u8>(n.to_string(), value)?;
            }
            2 => {
                let entry = p.peek::<u16>()?;
                let value = entry_value(u32::from(entry), inner_index_bits);
                p.read_with_value::<u16>(n.to_string(), value)?;
            }
            _ => return Err(ReadError::MalformedData("unsupported entry size")),
        }
        Ok(())
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use inspect_test_data::bebuffer::BeBuffer;

    use crate::font_data::FontData;
    use crate::parser::Parser;

    pub(crate) fn variation_store() -> BeBuffer {
        // Header (8 + 4 offset bytes), one region over one axis, one
        // subtable with one two-region... keep it minimal: one region, one
        // subtable with one delta set of one short delta.
        BeBuffer::new()
            .push(1u16) // format
            .push(12u32) // region list offset
            .push(1u16) // one subtable
            .push(20u32) // subtable offset
            // Region list at 12: one axis, one region.
            .extend([1u16, 1])
            .extend([-16384i16, 0, 16384])
            // Subtable at 22... (12 + 10 = 22, so patch the offset above)
            .write_at(8, 22u32)
            .extend([1u16, 1, 1]) // item count, short deltas, region indices
            .push(0u16) // region index 0
            .push(-5i16) // one short delta
    }

    #[test]
    fn store_with_one_region_and_subtable() {
        let body = variation_store().into_vec();
        let mut p = Parser::new(FontData::new(&body));
        super::parse_item_variation_store(&mut p).unwrap();
        assert_eq!(p.offset(), body.len());
        let (tree, _) = p.finish();
        let root = tree.root_id();
        // format, offset, count, offsets array, region list, subtable
        assert_eq!(tree.children_count(root), 6);
        assert_eq!(tree.title(tree.child_at(root, 4).unwrap()), "Region list");
    }

    #[test]
    fn delta_set_index_map_entries() {
        let body = BeBuffer::new()
            // entry size 2 (bits 4-5 = 01), inner bits 3
            .push(0x0013u16)
            .push(1u16)
            .push(0x0125u16)
            .into_vec();
        let mut p = Parser::new(FontData::new(&body));
        super::parse_delta_set_index_map(&mut p).unwrap();
        let (tree, _) = p.finish();
        let entries = tree.child_at(tree.root_id(), 2).unwrap();
        let entry = tree.child_at(entries, 0).unwrap();
        // 0x125 = 0b100100101; outer = entry >> 4, inner = entry & 0xF.
        assert_eq!(tree.value(entry), "Outer index: 18\nInner index: 5");
    }
}
