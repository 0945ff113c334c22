//! Lookup tables shared by the AAT tables.
//!
//! All lookup formats converge on the same outcome: a sorted list of
//! sub-resource offsets for the caller to chase.

use sfnt_types::Offset16;

use crate::error::ReadError;
use crate::parser::Parser;

fn parse_binary_search_header(p: &mut Parser) -> Result<u16, ReadError> {
    p.read::<u16>("Segment size")?;
    let number_of_segments = p.read::<u16>("Number of segments")?;
    p.read::<u16>("Search range")?;
    p.read::<u16>("Entry selector")?;
    p.read::<u16>("Range shift")?;
    Ok(number_of_segments)
}

/// Parse an AAT lookup table and return the sorted offsets it refers to.
pub(crate) fn parse_lookup(
    p: &mut Parser,
    number_of_glyphs: u16,
) -> Result<Vec<usize>, ReadError> {
    let start = p.offset();
    let mut offsets: Vec<usize> = Vec::new();

    p.begin_group("Lookup Table");
    let format = p.read::<u16>("Format")?;
    match format {
        0 => {
            p.read_array_with("Offsets", number_of_glyphs as usize, |p, n| {
                offsets.push(p.read_nth::<Offset16>(n)?.to_usize());
                Ok(())
            })?;
        }
        2 => {
            p.begin_group("Binary Search Table");
            let segments = parse_binary_search_header(p)?;
            if segments >= 2 {
                p.read_array_with("Segments", segments as usize, |p, n| {
                    p.begin_group_nth(n);
                    let last = p.read::<u16>("Last glyph")?;
                    p.read::<u16>("First glyph")?;
                    let offset = p.read::<Offset16>("Offset")?;
                    p.end_group();
                    if last != 0xFFFF {
                        offsets.push(offset.to_usize());
                    }
                    Ok(())
                })?;
            }
            p.end_group();
        }
        4 => {
            let mut local: Vec<(usize, u32)> = Vec::new();
            p.begin_group("Binary Search Table");
            let segments = parse_binary_search_header(p)?;
            if segments >= 2 {
                p.read_array_with("Segments", segments as usize, |p, n| {
                    p.begin_group_nth(n);
                    let last = p.read::<u16>("Last glyph")?;
                    let first = p.read::<u16>("First glyph")?;
                    let offset = p.read::<Offset16>("Offset")?;
                    p.end_group();
                    if last == 0xFFFF {
                        return Ok(());
                    }
                    if last < first {
                        return Err(ReadError::MalformedData("invalid values count"));
                    }
                    local.push((offset.to_usize(), u32::from(last - first) + 1));
                    Ok(())
                })?;
            }
            p.end_group();
            local.sort_by_key(|&(offset, _)| offset);
            for (offset, count) in local {
                p.advance_to(start + offset)?;
                p.read_array_with("Offsets", count as usize, |p, n| {
                    offsets.push(p.read_nth::<Offset16>(n)?.to_usize());
                    Ok(())
                })?;
            }
        }
        6 => {
            p.begin_group("Binary Search Table");
            let segments = parse_binary_search_header(p)?;
            if segments >= 2 {
                // One extra sentinel segment; not in the format definition,
                // but present in all Apple fonts.
                p.read_array_with("Segments", segments as usize + 1, |p, n| {
                    p.begin_group_nth(n);
                    p.read::<u16>("Glyph")?;
                    let offset = p.read::<Offset16>("Offset")?;
                    p.end_group();
                    if offset.to_usize() != 0xFFFF {
                        offsets.push(offset.to_usize());
                    }
                    Ok(())
                })?;
            }
            p.end_group();
        }
        8 => {
            p.read::<u16>("First glyph")?;
            let count = p.read::<u16>("Glyph count")?;
            p.read_array_with("Offsets", count as usize, |p, n| {
                offsets.push(p.read_nth::<Offset16>(n)?.to_usize());
                Ok(())
            })?;
        }
        _ => return Err(ReadError::MalformedData("unsupported lookup table format")),
    }
    p.end_group();

    offsets.sort_unstable();
    Ok(offsets)
}

#[cfg(test)]
mod tests {
    use inspect_test_data::bebuffer::BeBuffer;

    use crate::font_data::FontData;
    use crate::parser::Parser;

    #[test]
    fn format_0_reads_one_offset_per_glyph() {
        let body = BeBuffer::new().push(0u16).extend([8u16, 4, 12]).into_vec();
        let mut p = Parser::new(FontData::new(&body));
        let offsets = super::parse_lookup(&mut p, 3).unwrap();
        assert_eq!(offsets, [4, 8, 12]);
    }

    #[test]
    fn format_2_skips_sentinel_segments() {
        let body = BeBuffer::new()
            .push(2u16) // format
            .extend([6u16, 2, 6, 1, 6]) // binary search header
            .extend([5u16, 1, 0x20]) // segment
            .extend([0xFFFFu16, 0xFFFF, 0]) // sentinel
            .into_vec();
        let mut p = Parser::new(FontData::new(&body));
        let offsets = super::parse_lookup(&mut p, 0).unwrap();
        assert_eq!(offsets, [0x20]);
    }

    #[test]
    fn unknown_format_fails() {
        let body = BeBuffer::new().push(5u16).into_vec();
        let mut p = Parser::new(FontData::new(&body));
        assert!(super::parse_lookup(&mut p, 0).is_err());
    }
}
