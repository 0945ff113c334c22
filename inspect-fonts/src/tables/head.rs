//! The [Font Header (head)](https://docs.microsoft.com/en-us/typography/opentype/spec/head) table.

use std::fmt;

use sfnt_types::{Fixed, LongDateTime};

use crate::error::ReadError;
use crate::parser::Parser;
use crate::tables::flags_scalar;

struct HeadFlags(u16);
flags_scalar!(HeadFlags, u16);

impl fmt::Display for HeadFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016b}", self.0)?;
        let bits = self.0;
        if bits & 0x0001 != 0 { write!(f, "\nBit 0: Baseline for font at y=0")?; }
        if bits & 0x0002 != 0 { write!(f, "\nBit 1: Left sidebearing point at x=0")?; }
        if bits & 0x0004 != 0 { write!(f, "\nBit 2: Instructions may depend on point size")?; }
        if bits & 0x0008 != 0 { write!(f, "\nBit 3: Force ppem to integer values")?; }
        if bits & 0x0010 != 0 { write!(f, "\nBit 4: Instructions may alter advance width")?; }
        if bits & 0x0020 != 0 { write!(f, "\nBit 5: (AAT only) Vertical layout")?; }
        // 6 - reserved
        if bits & 0x0080 != 0 { write!(f, "\nBit 7: (AAT only) Requires linguistic rendering")?; }
        if bits & 0x0100 != 0 { write!(f, "\nBit 8: (AAT only) Has metamorphosis effects")?; }
        if bits & 0x0200 != 0 { write!(f, "\nBit 9: (AAT only) Font contains strong right-to-left glyphs")?; }
        if bits & 0x0400 != 0 { write!(f, "\nBit 10: (AAT only) Font contains Indic-style rearrangement effects")?; }
        if bits & 0x0800 != 0 { write!(f, "\nBit 11: Font data is \u{201C}lossless\u{201D}")?; }
        if bits & 0x1000 != 0 { write!(f, "\nBit 12: Font converted")?; }
        if bits & 0x2000 != 0 { write!(f, "\nBit 13: Font optimized for ClearType")?; }
        if bits & 0x4000 != 0 { write!(f, "\nBit 14: Last Resort font")?; }
        // 15 - reserved
        Ok(())
    }
}

struct MacStyleFlags(u16);
flags_scalar!(MacStyleFlags, u16);

impl fmt::Display for MacStyleFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016b}", self.0)?;
        let bits = self.0;
        if bits & 0x0001 != 0 { write!(f, "\nBit 0: Bold")?; }
        if bits & 0x0002 != 0 { write!(f, "\nBit 1: Italic")?; }
        if bits & 0x0004 != 0 { write!(f, "\nBit 2: Underline")?; }
        if bits & 0x0008 != 0 { write!(f, "\nBit 3: Outline")?; }
        if bits & 0x0010 != 0 { write!(f, "\nBit 4: Shadow")?; }
        if bits & 0x0020 != 0 { write!(f, "\nBit 5: Condensed")?; }
        if bits & 0x0040 != 0 { write!(f, "\nBit 6: Extended")?; }
        // 7-15 - reserved
        Ok(())
    }
}

pub(crate) fn parse(p: &mut Parser) -> Result<(), ReadError> {
    let major_version = p.read::<u16>("Major version")?;
    let minor_version = p.read::<u16>("Minor version")?;
    if !(major_version == 1 && minor_version == 0) {
        return Err(ReadError::InvalidVersion);
    }

    p.read::<Fixed>("Font revision")?;
    p.read::<u32>("Checksum adjustment")?;
    p.read::<u32>("Magic number")?;
    p.read::<HeadFlags>("Flags")?;
    p.read::<u16>("Units per EM")?;
    p.read::<LongDateTime>("Created")?;
    p.read::<LongDateTime>("Modified")?;
    p.read::<i16>("X min for all glyph bounding boxes")?;
    p.read::<i16>("Y min for all glyph bounding boxes")?;
    p.read::<i16>("X max for all glyph bounding boxes")?;
    p.read::<i16>("Y max for all glyph bounding boxes")?;
    p.read::<MacStyleFlags>("Mac style")?;
    p.read::<u16>("Smallest readable size in pixels")?;
    p.read::<i16>("Font direction hint")?;
    p.read::<i16>("Index to location format")?;
    p.read::<i16>("Glyph data format")?;
    Ok(())
}
