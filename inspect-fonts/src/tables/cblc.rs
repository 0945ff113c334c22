//! The bitmap location tables: [CBLC](https://docs.microsoft.com/en-us/typography/opentype/spec/cblc),
//! `EBLC` and the AAT `bloc`, which all share one layout.

use std::fmt;
use std::ops::Range;

use sfnt_types::{GlyphId, Offset16, Offset32};

use crate::error::ReadError;
use crate::font_data::Cursor;
use crate::parser::Parser;
use crate::tables::flags_scalar;

/// One glyph image slice collected from the location index, handed to the
/// companion data table (`CBDT`/`EBDT`/`bdat`).
#[derive(Clone, Debug)]
pub(crate) struct BitmapLocation {
    pub image_format: u16,
    /// Byte range relative to the start of the data table.
    pub range: Range<usize>,
}

struct BitmapFlags(u8);
flags_scalar!(BitmapFlags, u8);

impl fmt::Display for BitmapFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08b}", self.0)?;
        if self.0 & 0x01 != 0 { write!(f, "\nBit 0: Horizontal")?; }
        if self.0 & 0x02 != 0 { write!(f, "\nBit 1: Vertical")?; }
        Ok(())
    }
}

fn parse_sbit_line_metrics(p: &mut Parser) -> Result<(), ReadError> {
    p.read::<i8>("Ascender")?;
    p.read::<i8>("Descender")?;
    p.read::<u8>("Max width")?;
    p.read::<i8>("Caret slope numerator")?;
    p.read::<i8>("Caret slope denominator")?;
    p.read::<i8>("Caret offset")?;
    p.read::<i8>("Min origin SB")?;
    p.read::<i8>("Min advance SB")?;
    p.read::<i8>("Max before BL")?;
    p.read::<i8>("Min after BL")?;
    p.read_padding(2)
}

pub(crate) fn parse_sbit_small_glyph_metrics(p: &mut Parser) -> Result<(), ReadError> {
    p.read::<u8>("Height")?;
    p.read::<u8>("Width")?;
    p.read::<i8>("X-axis bearing")?;
    p.read::<i8>("Y-axis bearing")?;
    p.read::<u8>("Advance")?;
    Ok(())
}

pub(crate) fn parse_sbit_big_glyph_metrics(p: &mut Parser) -> Result<(), ReadError> {
    p.read::<u8>("Height")?;
    p.read::<u8>("Width")?;
    p.read::<i8>("Horizontal X-axis bearing")?;
    p.read::<i8>("Horizontal Y-axis bearing")?;
    p.read::<u8>("Horizontal advance")?;
    p.read::<i8>("Vertical X-axis bearing")?;
    p.read::<i8>("Vertical Y-axis bearing")?;
    p.read::<u8>("Vertical advance")?;
    Ok(())
}

struct SubtableArray {
    offset: usize,
    num_subtables: u32,
}

struct SubtableInfo {
    first_glyph: u16,
    last_glyph: u16,
    offset: usize,
}

pub(crate) fn parse(p: &mut Parser) -> Result<(), ReadError> {
    let start = p.offset();

    let major_version = p.read::<u16>("Major version")?;
    let minor_version = p.read::<u16>("Minor version")?;
    // Old Noto emoji fonts still carry a 2.0 version.
    if !((major_version == 2 || major_version == 3) && minor_version == 0) {
        return Err(ReadError::InvalidVersion);
    }

    let num_sizes = p.read::<u32>("Number of tables")?;

    let mut arrays = Vec::new();
    for _ in 0..num_sizes {
        p.begin_group("Table");

        let offset = p.read::<Offset32>("Offset to index subtable")?;
        p.read::<u32>("Index tables size")?;
        let num_subtables = p.read::<u32>("Number of index subtables")?;
        p.read::<u32>("Reserved")?;

        p.begin_group("Line metrics for horizontal text");
        parse_sbit_line_metrics(p)?;
        p.end_group();

        p.begin_group("Line metrics for vertical text");
        parse_sbit_line_metrics(p)?;
        p.end_group();

        p.read::<GlyphId>("Lowest glyph index")?;
        p.read::<GlyphId>("Highest glyph index")?;
        p.read::<u8>("Horizontal pixels per em")?;
        p.read::<u8>("Vertical pixels per em")?;
        p.read::<u8>("Bit depth")?;
        p.read::<BitmapFlags>("Flags")?;

        p.end_group();

        arrays.push(SubtableArray {
            offset: offset.to_usize(),
            num_subtables,
        });
    }

    arrays.sort_by_key(|array| array.offset);
    arrays.dedup_by_key(|array| array.offset);

    let mut subtables = Vec::new();
    for array in &arrays {
        p.jump_to(start + array.offset)?;
        for _ in 0..array.num_subtables {
            p.begin_group("Index subtable array");
            let first_glyph = p.read::<GlyphId>("First glyph ID")?;
            let last_glyph = p.read::<GlyphId>("Last glyph ID")?;
            let additional = p.read::<Offset32>("Additional offset to index subtable")?;
            p.end_group();

            subtables.push(SubtableInfo {
                first_glyph: first_glyph.to_u16(),
                last_glyph: last_glyph.to_u16(),
                offset: start + array.offset + additional.to_usize(),
            });
        }
    }

    subtables.sort_by_key(|info| info.offset);
    subtables.dedup_by_key(|info| info.offset);

    for info in subtables {
        p.jump_to(info.offset)?;
        p.begin_group("Index subtable");
        let index_format = p.read::<u16>("Index format")?;
        p.read::<u16>("Image format")?;
        p.read::<Offset32>("Offset to image data")?;

        let glyphs_spanned = usize::from(info.last_glyph.saturating_sub(info.first_glyph));
        match index_format {
            1 => {
                p.read_array::<Offset32>("Offsets", glyphs_spanned + 2)?;
            }
            2 => {
                p.read::<u32>("Image size")?;
                parse_sbit_big_glyph_metrics(p)?;
            }
            3 => {
                p.read_array::<Offset16>("Offsets", glyphs_spanned + 2)?;
            }
            4 => {
                let num_glyphs = p.read::<u32>("Number of glyphs")?;
                for _ in 0..=num_glyphs {
                    p.read::<GlyphId>("Glyph ID")?;
                    p.read::<Offset16>("Offset")?;
                }
            }
            5 => {
                p.read::<u32>("Image size")?;
                parse_sbit_big_glyph_metrics(p)?;
                let num_glyphs = p.read::<u32>("Number of glyphs")?;
                p.read_array::<GlyphId>("Glyphs", num_glyphs as usize)?;
            }
            _ => return Err(ReadError::MalformedData("unsupported index format")),
        }
        p.end_group();
    }
    Ok(())
}

/// Walk the location index without touching the tree and return the glyph
/// image slices it describes, sorted by start offset.
pub(crate) fn collect_locations(mut cursor: Cursor) -> Result<Vec<BitmapLocation>, ReadError> {
    let mut locations = Vec::new();

    cursor.skip::<u16>()?; // major version
    cursor.skip::<u16>()?; // minor version
    let num_sizes = cursor.read::<u32>()?;

    let mut arrays = Vec::new();
    for _ in 0..num_sizes {
        let offset = cursor.read::<u32>()? as usize;
        cursor.skip::<u32>()?; // index tables size
        let num_subtables = cursor.read::<u32>()?;
        cursor.advance(36)?; // line metrics and bitmap size fields
        arrays.push(SubtableArray {
            offset,
            num_subtables,
        });
    }

    arrays.sort_by_key(|array| array.offset);
    arrays.dedup_by_key(|array| array.offset);

    let mut subtables = Vec::new();
    for array in &arrays {
        cursor.jump_to(array.offset)?;
        for _ in 0..array.num_subtables {
            let first_glyph = cursor.read::<u16>()?;
            let last_glyph = cursor.read::<u16>()?;
            let additional = cursor.read::<u32>()? as usize;
            subtables.push(SubtableInfo {
                first_glyph,
                last_glyph,
                offset: array.offset + additional,
            });
        }
    }

    subtables.sort_by_key(|info| info.offset);
    subtables.dedup_by_key(|info| info.offset);

    for info in subtables {
        cursor.jump_to(info.offset)?;
        let index_format = cursor.read::<u16>()?;
        let image_format = cursor.read::<u16>()?;
        let image_data_offset = cursor.read::<u32>()? as usize;

        let glyphs_spanned = usize::from(info.last_glyph.saturating_sub(info.first_glyph));
        let mut push_ranges = |offsets: &mut Vec<usize>| {
            offsets.sort_unstable();
            offsets.dedup();
            for pair in offsets.windows(2) {
                locations.push(BitmapLocation {
                    image_format,
                    range: pair[0]..pair[1],
                });
            }
        };

        match index_format {
            1 => {
                let mut offsets = Vec::with_capacity(glyphs_spanned + 2);
                for _ in 0..glyphs_spanned + 2 {
                    offsets.push(image_data_offset + cursor.read::<u32>()? as usize);
                }
                push_ranges(&mut offsets);
            }
            2 => {
                let image_size = cursor.read::<u32>()? as usize;
                let mut offset = image_data_offset;
                for _ in 0..glyphs_spanned + 1 {
                    locations.push(BitmapLocation {
                        image_format,
                        range: offset..offset + image_size,
                    });
                    offset += image_size;
                }
            }
            3 => {
                let mut offsets = Vec::with_capacity(glyphs_spanned + 2);
                for _ in 0..glyphs_spanned + 2 {
                    offsets.push(image_data_offset + cursor.read::<u16>()? as usize);
                }
                push_ranges(&mut offsets);
            }
            4 => {
                let num_glyphs = cursor.read::<u32>()?;
                let mut offsets = Vec::new();
                for _ in 0..=num_glyphs {
                    cursor.skip::<u16>()?; // glyph id
                    offsets.push(image_data_offset + cursor.read::<u16>()? as usize);
                }
                push_ranges(&mut offsets);
            }
            5 => {
                let image_size = cursor.read::<u32>()? as usize;
                cursor.advance(8)?; // big glyph metrics
                // No font holds more glyphs than a glyph id can address.
                let num_glyphs = (cursor.read::<u32>()? as usize).min(0xFFFF);
                let mut offsets = Vec::with_capacity(num_glyphs + 1);
                let mut offset = image_data_offset;
                for _ in 0..=num_glyphs {
                    offsets.push(offset);
                    offset += image_size;
                }
                push_ranges(&mut offsets);
            }
            _ => return Err(ReadError::MalformedData("unsupported index format")),
        }
    }

    locations.sort_by_key(|location| location.range.start);
    Ok(locations)
}
