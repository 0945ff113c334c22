//! The [Glyph Variations (gvar)](https://docs.microsoft.com/en-us/typography/opentype/spec/gvar) table.

use sfnt_types::{F2Dot14, Offset16, Offset32};

use crate::error::ReadError;
use crate::parser::Parser;

const SHARED_POINT_NUMBERS: u16 = 0x8000;
const COUNT_MASK: u16 = 0x0FFF;

const EMBEDDED_PEAK_TUPLE: u16 = 0x8000;
const INTERMEDIATE_REGION: u16 = 0x4000;
const PRIVATE_POINT_NUMBERS: u16 = 0x2000;

const POINTS_ARE_WORDS: u8 = 0x80;
const POINT_RUN_COUNT_MASK: u8 = 0x7F;

const DELTAS_ARE_ZERO: u8 = 0x80;
const DELTAS_ARE_WORDS: u8 = 0x40;
const DELTA_RUN_COUNT_MASK: u8 = 0x3F;

fn unpack_points(p: &mut Parser) -> Result<(), ReadError> {
    let control = p.read::<u8>("Control")?;
    if control == 0 {
        return Ok(());
    }

    let mut count = u16::from(control);
    if control & POINTS_ARE_WORDS != 0 {
        let low = p.read::<u8>("Control")?;
        count = (u16::from(control & POINT_RUN_COUNT_MASK) << 8) | u16::from(low);
    }

    let mut i = 0u16;
    while i < count {
        p.charge(1)?;
        let control = p.read::<u8>("Control")?;
        let run_count = u16::from(control & POINT_RUN_COUNT_MASK) + 1;
        if control & POINTS_ARE_WORDS != 0 {
            for _ in 0..run_count {
                if i >= count {
                    break;
                }
                p.read::<u16>("Point")?;
                i += 1;
            }
        } else {
            for _ in 0..run_count {
                if i >= count {
                    break;
                }
                p.read::<u8>("Point")?;
                i += 1;
            }
        }
    }
    Ok(())
}

fn unpack_deltas(p: &mut Parser, size: usize) -> Result<(), ReadError> {
    let end = p.offset() + size;
    while p.offset() < end {
        p.charge(1)?;
        let control = p.read::<u8>("Control")?;
        let run_count = (control & DELTA_RUN_COUNT_MASK) + 1;
        if control & DELTAS_ARE_ZERO != 0 {
            // No payload; the run is implicit zeros.
        } else if control & DELTAS_ARE_WORDS != 0 {
            for _ in 0..run_count {
                p.read::<u16>("Delta")?;
            }
        } else {
            for _ in 0..run_count {
                p.read::<u8>("Delta")?;
            }
        }
    }
    Ok(())
}

pub(crate) fn parse(p: &mut Parser) -> Result<(), ReadError> {
    p.read::<u16>("Major version")?;
    p.read::<u16>("Minor version")?;
    let axis_count = p.read::<u16>("Axis count")?;
    let shared_tuple_count = p.read::<u16>("Shared tuple count")?;
    p.read::<Offset32>("Offset to the shared tuple records")?;
    let glyph_count = p.read::<u16>("Glyphs count")?;
    let flags = p.read::<u16>("Flags")?;
    p.read::<Offset32>("Offset to the array of Glyph Variation Data tables")?;
    let long_format = flags & 1 == 1;

    let mut offsets = Vec::new();
    p.begin_group_with_value(
        "GlyphVariationData offsets",
        (glyph_count as usize + 1).to_string(),
    );
    for _ in 0..=glyph_count {
        if long_format {
            offsets.push(p.read::<Offset32>("Offset")?.to_usize());
        } else {
            offsets.push(p.read::<Offset16>("Offset")?.to_usize() * 2);
        }
    }
    p.end_group();

    p.begin_group_with_value("Shared tuples", shared_tuple_count.to_string());
    for _ in 0..shared_tuple_count {
        p.begin_group("Tuple record");
        for _ in 0..axis_count {
            p.read::<F2Dot14>("Coordinate")?;
        }
        p.end_group();
    }
    p.end_group();

    // Consecutive identical offsets mean "no data for this glyph".
    offsets.dedup();

    let data_start = p.offset();

    struct TupleHeader {
        data_size: usize,
        has_private_point_numbers: bool,
    }

    p.begin_group_with_value("Tables", offsets.len().saturating_sub(1).to_string());
    for (index, end_offset) in offsets.into_iter().skip(1).enumerate() {
        p.begin_group_indexed("Glyph Variation Data", index as u32);

        let value = p.read::<u16>("Value")?;
        p.read::<Offset16>("Data offset")?;

        // The high 4 bits are flags, the low 12 the tuple count.
        let has_shared_point_numbers = value & SHARED_POINT_NUMBERS != 0;
        let tuple_variation_count = value & COUNT_MASK;

        let mut headers = Vec::new();
        for _ in 0..tuple_variation_count {
            p.begin_group("Tuple Variation Header");
            let data_size = p.read::<u16>("Size of the serialized data")?;
            let tuple_index = p.read::<u16>("Value")?;

            headers.push(TupleHeader {
                data_size: data_size as usize,
                has_private_point_numbers: tuple_index & PRIVATE_POINT_NUMBERS != 0,
            });

            if tuple_index & EMBEDDED_PEAK_TUPLE != 0 {
                p.begin_group("Peak record");
                for _ in 0..axis_count {
                    p.read::<F2Dot14>("Coordinate")?;
                }
                p.end_group();
            }
            if tuple_index & INTERMEDIATE_REGION != 0 {
                p.begin_group("Intermediate record");
                for _ in 0..axis_count {
                    p.read::<F2Dot14>("Start coordinate")?;
                }
                for _ in 0..axis_count {
                    p.read::<F2Dot14>("End coordinate")?;
                }
                p.end_group();
            }
            p.end_group();
        }

        if has_shared_point_numbers {
            p.begin_group("Shared points");
            unpack_points(p)?;
            p.end_group();
        }

        for header in headers {
            let serialized_start = p.offset();
            if header.has_private_point_numbers {
                p.begin_group("Private points");
                unpack_points(p)?;
                p.end_group();
            }
            let private_points_size = p.offset() - serialized_start;

            p.begin_group("Deltas");
            unpack_deltas(p, header.data_size.saturating_sub(private_points_size))?;
            p.end_group();
        }

        // Each glyph's data is padded to its recorded end offset.
        let used = p.offset() - data_start;
        if used < end_offset {
            p.read_unsupported(end_offset - used)?;
        }

        p.end_group();
    }
    p.end_group();
    Ok(())
}
