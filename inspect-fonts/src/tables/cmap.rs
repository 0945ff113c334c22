//! The [Character to Glyph Index Mapping (cmap)](https://docs.microsoft.com/en-us/typography/opentype/spec/cmap) table.

use sfnt_types::{GlyphId, Offset32, Uint24};

use crate::error::ReadError;
use crate::parser::Parser;
use crate::tables::name::{encoding_name, language_name, PlatformId};

fn read_language16(p: &mut Parser, platform_id: PlatformId) -> Result<(), ReadError> {
    let id = p.peek::<u16>()?;
    p.read_with_value::<u16>("Language ID", language_name(platform_id, id))?;
    Ok(())
}

fn read_language32(p: &mut Parser, platform_id: PlatformId) -> Result<(), ReadError> {
    let id = p.peek::<u32>()?;
    p.read_with_value::<u32>("Language ID", language_name(platform_id, id as u16))?;
    Ok(())
}

fn parse_format0(p: &mut Parser, platform_id: PlatformId) -> Result<(), ReadError> {
    p.read::<u16>("Subtable size")?;
    read_language16(p, platform_id)?;
    p.read_array::<u8>("Glyphs", 256)
}

fn parse_format2(p: &mut Parser, platform_id: PlatformId) -> Result<(), ReadError> {
    let table_start = p.offset() - 2;
    let table_size = p.read::<u16>("Subtable size")? as usize;
    read_language16(p, platform_id)?;

    let mut sub_headers_count = 0u16;
    p.read_array_with("SubHeader Keys", 256, |p, n| {
        let key = p.read_nth::<u16>(n)?;
        sub_headers_count = sub_headers_count.max(key / 8);
        Ok(())
    })?;

    p.read_array_with(
        "SubHeader Records",
        sub_headers_count as usize + 1,
        |p, n| {
            p.begin_group_nth(n);
            p.read::<u16>("First valid low byte")?;
            p.read::<u16>("Number of valid low bytes")?;
            p.read::<i16>("ID delta")?;
            p.read::<u16>("ID range offset")?;
            p.end_group();
            Ok(())
        },
    )?;

    // The glyph index sub-arrays can overlap, so the tail is kept flat.
    let tail = table_size.saturating_sub(p.offset() - table_start);
    p.read_array::<GlyphId>("Glyph index array", tail / 2)
}

fn parse_format4(p: &mut Parser, platform_id: PlatformId) -> Result<(), ReadError> {
    let table_start = p.offset() - 2;
    let table_size = p.read::<u16>("Subtable size")? as usize;
    read_language16(p, platform_id)?;
    let seg_count_x2 = p.read::<u16>("2 \u{D7} segCount")?;
    let seg_count = (seg_count_x2 / 2) as usize;
    p.read::<u16>("Search range")?;
    p.read::<u16>("Entry selector")?;
    p.read::<u16>("Range shift")?;
    p.read_array::<u16>("End Character Codes", seg_count)?;
    p.read::<u16>("Reserved")?;
    p.read_array::<u16>("Start Character Codes", seg_count)?;
    p.read_array::<i16>("Deltas", seg_count)?;
    p.read_array::<u16>("Offsets into Glyph Index Array", seg_count)?;

    let tail = table_size.saturating_sub(p.offset() - table_start);
    p.read_array::<GlyphId>("Glyph Index Array", tail / 2)
}

fn parse_format6(p: &mut Parser, platform_id: PlatformId) -> Result<(), ReadError> {
    p.read::<u16>("Subtable size")?;
    read_language16(p, platform_id)?;
    p.read::<u16>("First code")?;
    let count = p.read::<u16>("Number of codes")?;
    p.read_array::<GlyphId>("Glyph Index Array", count as usize)
}

fn parse_format8(p: &mut Parser, platform_id: PlatformId) -> Result<(), ReadError> {
    p.read::<u16>("Reserved")?;
    p.read::<u32>("Subtable size")?;
    read_language32(p, platform_id)?;
    p.read_bytes(8192, "Packed data")?;
    let count = p.read::<u32>("Number of groups")?;
    p.read_array_with("SequentialMapGroup Records", count as usize, |p, n| {
        p.begin_group_nth(n);
        p.read::<u32>("First character code")?;
        p.read::<u32>("Last character code")?;
        p.read::<u32>("Starting glyph index")?;
        p.end_group();
        Ok(())
    })
}

fn parse_format10(p: &mut Parser, platform_id: PlatformId) -> Result<(), ReadError> {
    p.read::<u16>("Reserved")?;
    p.read::<u32>("Subtable size")?;
    read_language32(p, platform_id)?;
    p.read::<u32>("First code")?;
    let count = p.read::<u32>("Number of codes")?;
    p.read_array::<GlyphId>("Glyph Index Array", count as usize)
}

fn parse_format12_13(p: &mut Parser, platform_id: PlatformId, constant: bool) -> Result<(), ReadError> {
    p.read::<u16>("Reserved")?;
    p.read::<u32>("Subtable size")?;
    read_language32(p, platform_id)?;
    let count = p.read::<u32>("Number of groups")?;
    let title = if constant {
        "ConstantMapGroup Records"
    } else {
        "SequentialMapGroup Records"
    };
    p.read_array_with(title, count as usize, |p, n| {
        p.begin_group_nth(n);
        p.read::<u32>("First character code")?;
        p.read::<u32>("Last character code")?;
        if constant {
            p.read::<u32>("Glyph index")?;
        } else {
            p.read::<u32>("Starting glyph index")?;
        }
        p.end_group();
        Ok(())
    })
}

fn parse_format14(p: &mut Parser) -> Result<(), ReadError> {
    let table_start = p.offset() - 2;

    p.read::<u32>("Subtable size")?;
    let count = p.read::<u32>("Number of records")?;

    struct UvsRecord {
        is_default: bool,
        offset: usize,
    }

    let mut records = Vec::new();
    p.read_array_with("VariationSelector Records", count as usize, |p, n| {
        p.begin_group_nth(n);
        p.read::<Uint24>("Variation selector")?;
        let default_offset = p.read::<Offset32>("Offset to Default UVS Table")?;
        let non_default_offset = p.read::<Offset32>("Offset to Non-Default UVS Table")?;
        p.end_group();

        if default_offset.to_usize() != 0 {
            records.push(UvsRecord {
                is_default: true,
                offset: table_start + default_offset.to_usize(),
            });
        }
        if non_default_offset.to_usize() != 0 {
            records.push(UvsRecord {
                is_default: false,
                offset: table_start + non_default_offset.to_usize(),
            });
        }
        Ok(())
    })?;

    records.sort_by_key(|record| record.offset);
    records.dedup_by_key(|record| record.offset);

    for record in records {
        p.advance_to(record.offset)?;
        if record.is_default {
            p.begin_group("Default UVS table");
            let count = p.read::<u32>("Number of Unicode character ranges")?;
            for _ in 0..count {
                p.begin_group("Unicode range");
                p.read::<Uint24>("First value in this range")?;
                p.read::<u8>("Number of additional values")?;
                p.end_group();
            }
            p.end_group();
        } else {
            p.begin_group("Non-Default UVS table");
            let count = p.read::<u32>("Number of UVS Mappings")?;
            for _ in 0..count {
                p.begin_group("UVS mapping");
                p.read::<Uint24>("Base Unicode value")?;
                p.read::<GlyphId>("Glyph ID")?;
                p.end_group();
            }
            p.end_group();
        }
    }
    Ok(())
}

pub(crate) fn parse(p: &mut Parser) -> Result<(), ReadError> {
    let table_start = p.offset();

    let version = p.read::<u16>("Version")?;
    if version != 0 {
        return Err(ReadError::InvalidVersion);
    }

    struct EncodingRecord {
        offset: usize,
        platform_id: PlatformId,
    }

    let num_tables = p.read::<u16>("Number of tables")?;
    let mut records = Vec::new();
    p.read_array_with("Encoding Records", num_tables as usize, |p, n| {
        p.begin_group_nth(n);
        let platform_id = p.read::<PlatformId>("Platform ID")?;
        let encoding_id = p.peek::<u16>()?;
        p.read_with_value::<u16>("Encoding ID", encoding_name(platform_id, encoding_id))?;
        let offset = p.read::<Offset32>("Offset")?;
        p.end_group();

        records.push(EncodingRecord {
            offset: offset.to_usize(),
            platform_id,
        });
        Ok(())
    })?;

    records.sort_by_key(|record| record.offset);
    records.dedup_by_key(|record| record.offset);

    for record in records {
        p.advance_to(table_start + record.offset)?;
        p.begin_group("");
        let format = p.read::<u16>("Format")?;
        let title = match format {
            0 => {
                parse_format0(p, record.platform_id)?;
                "Byte encoding table"
            }
            2 => {
                parse_format2(p, record.platform_id)?;
                "High-byte mapping through table"
            }
            4 => {
                parse_format4(p, record.platform_id)?;
                "Segment mapping to delta values"
            }
            6 => {
                parse_format6(p, record.platform_id)?;
                "Trimmed table mapping"
            }
            8 => {
                parse_format8(p, record.platform_id)?;
                "Mixed 16-bit and 32-bit coverage"
            }
            10 => {
                parse_format10(p, record.platform_id)?;
                "Trimmed array"
            }
            12 => {
                parse_format12_13(p, record.platform_id, false)?;
                "Segmented coverage"
            }
            13 => {
                parse_format12_13(p, record.platform_id, true)?;
                "Many-to-one range mappings"
            }
            14 => {
                parse_format14(p)?;
                "Unicode variation sequences"
            }
            _ => "",
        };
        p.end_group_titled_valued(format!("Subtable {format}"), title);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use inspect_test_data::bebuffer::BeBuffer;

    use crate::font_data::FontData;
    use crate::parser::Parser;

    fn format4_subtable() -> BeBuffer {
        // One segment mapping 0x41..=0x42, plus the required 0xFFFF segment.
        BeBuffer::new()
            .push(4u16) // format
            .push(32u16) // length
            .push(0u16) // language
            .push(4u16) // segCountX2
            .extend([4u16, 1, 0]) // search range / entry selector / range shift
            .extend([0x42u16, 0xFFFF]) // end codes
            .push(0u16) // reserved
            .extend([0x41u16, 0xFFFF]) // start codes
            .extend([1i16, 1]) // deltas
            .extend([0u16, 0]) // range offsets
    }

    #[test]
    fn format4_through_directory() {
        let body = BeBuffer::new()
            .push(0u16) // version
            .push(1u16) // one encoding record
            .extend([3u16, 1]) // Windows, Unicode BMP
            .push(12u32) // offset
            .extend(format4_subtable().into_vec())
            .into_vec();
        let mut p = Parser::new(FontData::new(&body));
        super::parse(&mut p).unwrap();
        assert_eq!(p.offset(), body.len());
        let (tree, _) = p.finish();
        let root = tree.root_id();
        let subtable = tree.child_at(root, 3).unwrap();
        assert_eq!(tree.title(subtable), "Subtable 4");
        assert_eq!(tree.value(subtable), "Segment mapping to delta values");
    }

    #[test]
    fn rejects_nonzero_version() {
        let body = BeBuffer::new().push(1u16).push(0u16).into_vec();
        let mut p = Parser::new(FontData::new(&body));
        assert_eq!(super::parse(&mut p), Err(crate::ReadError::InvalidVersion));
    }
}
