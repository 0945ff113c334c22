//! The [OS/2 and Windows Metrics (OS/2)](https://docs.microsoft.com/en-us/typography/opentype/spec/os2) table.

use std::fmt;

use sfnt_types::{ReadScalar, Tag, ValueType};

use crate::error::ReadError;
use crate::parser::Parser;
use crate::tables::flags_scalar;

struct WeightClass(u16);

impl ReadScalar for WeightClass {
    const RAW_BYTE_LEN: usize = 2;
    const VALUE_TYPE: ValueType = ValueType::UInt16;

    fn read_be(data: &[u8]) -> Option<Self> {
        u16::read_be(data).map(Self)
    }
}

impl fmt::Display for WeightClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self.0 {
            100 => "Thin",
            200 => "Extra-light",
            300 => "Light",
            400 => "Normal",
            500 => "Medium",
            600 => "Semi-bold",
            700 => "Bold",
            800 => "Extra-bold",
            900 => "Black",
            _ => "Other",
        };
        write!(f, "{name} ({})", self.0)
    }
}

struct WidthClass(u16);

impl ReadScalar for WidthClass {
    const RAW_BYTE_LEN: usize = 2;
    const VALUE_TYPE: ValueType = ValueType::UInt16;

    fn read_be(data: &[u8]) -> Option<Self> {
        u16::read_be(data).map(Self)
    }
}

impl fmt::Display for WidthClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self.0 {
            1 => "Ultra-condensed",
            2 => "Extra-condensed",
            3 => "Condensed",
            4 => "Semi-condensed",
            5 => "Normal",
            6 => "Semi-expanded",
            7 => "Expanded",
            8 => "Extra-expanded",
            9 => "Ultra-expanded",
            _ => "Invalid",
        };
        write!(f, "{name} ({})", self.0)
    }
}

struct TypeFlags(u16);
flags_scalar!(TypeFlags, u16);

impl fmt::Display for TypeFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016b}", self.0)?;
        let permissions = match self.0 & 0x000F {
            0 => "Installable",
            2 => "Restricted License",
            4 => "Preview & Print",
            8 => "Editable",
            _ => "Invalid",
        };
        write!(f, "\nBits 0-3: Usage permissions: {permissions}")?;
        // 4-7 - reserved
        if self.0 & 0x0100 != 0 { write!(f, "\nBit 8: No subsetting")?; }
        if self.0 & 0x0200 != 0 { write!(f, "\nBit 9: Bitmap embedding only")?; }
        // 10-15 - reserved
        Ok(())
    }
}

struct SelectionFlags(u16);
flags_scalar!(SelectionFlags, u16);

impl fmt::Display for SelectionFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016b}", self.0)?;
        let bits = self.0;
        if bits & 0x0001 != 0 { write!(f, "\nBit 0: Italic")?; }
        if bits & 0x0002 != 0 { write!(f, "\nBit 1: Underscored")?; }
        if bits & 0x0004 != 0 { write!(f, "\nBit 2: Negative")?; }
        if bits & 0x0008 != 0 { write!(f, "\nBit 3: Outlined")?; }
        if bits & 0x0010 != 0 { write!(f, "\nBit 4: Overstruck")?; }
        if bits & 0x0020 != 0 { write!(f, "\nBit 5: Bold")?; }
        if bits & 0x0040 != 0 { write!(f, "\nBit 6: Regular")?; }
        if bits & 0x0080 != 0 { write!(f, "\nBit 7: Use typographic metrics")?; }
        if bits & 0x0100 != 0 { write!(f, "\nBit 8: WWS")?; }
        if bits & 0x0200 != 0 { write!(f, "\nBit 9: Oblique")?; }
        // 10-15 - reserved
        Ok(())
    }
}

pub(crate) fn parse(p: &mut Parser) -> Result<(), ReadError> {
    let version = p.read::<u16>("Version")?;

    p.read::<i16>("Average weighted escapement")?;
    p.read::<WeightClass>("Weight class")?;
    p.read::<WidthClass>("Width class")?;
    p.read::<TypeFlags>("Type flags")?;
    p.read::<i16>("Subscript horizontal font size")?;
    p.read::<i16>("Subscript vertical font size")?;
    p.read::<i16>("Subscript X offset")?;
    p.read::<i16>("Subscript Y offset")?;
    p.read::<i16>("Superscript horizontal font size")?;
    p.read::<i16>("Superscript vertical font size")?;
    p.read::<i16>("Superscript X offset")?;
    p.read::<i16>("Superscript Y offset")?;
    p.read::<i16>("Strikeout size")?;
    p.read::<i16>("Strikeout position")?;
    p.read::<i16>("Font-family class")?;

    p.begin_group("panose");
    p.read::<u8>("Family type")?;
    p.read::<u8>("Serif style")?;
    p.read::<u8>("Weight")?;
    p.read::<u8>("Proportion")?;
    p.read::<u8>("Contrast")?;
    p.read::<u8>("Stroke variation")?;
    p.read::<u8>("Arm style")?;
    p.read::<u8>("Letterform")?;
    p.read::<u8>("Midline")?;
    p.read::<u8>("x height")?;
    p.end_group();

    p.read::<u32>("Unicode Character Range 1")?;
    p.read::<u32>("Unicode Character Range 2")?;
    p.read::<u32>("Unicode Character Range 3")?;
    p.read::<u32>("Unicode Character Range 4")?;
    p.read::<Tag>("Font Vendor Identification")?;
    p.read::<SelectionFlags>("Font selection flags")?;
    p.read::<u16>("The minimum Unicode index")?;
    p.read::<u16>("The maximum Unicode index")?;
    p.read::<i16>("Typographic ascender")?;
    p.read::<i16>("Typographic descender")?;
    p.read::<i16>("Typographic line gap")?;
    p.read::<u16>("Windows ascender")?;
    p.read::<u16>("Windows descender")?;

    if version == 0 {
        return Ok(());
    }

    p.read::<u32>("Code Page Character Range 1")?;
    p.read::<u32>("Code Page Character Range 2")?;

    if version < 2 {
        return Ok(());
    }

    p.read::<i16>("x height")?;
    p.read::<i16>("Capital height")?;
    p.read::<u16>("Default character")?;
    p.read::<u16>("Break character")?;
    p.read::<u16>("The maximum glyph context")?;

    if version < 5 {
        return Ok(());
    }

    p.read::<u16>("Lower optical point size")?;
    p.read::<u16>("Upper optical point size")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use inspect_test_data::bebuffer::BeBuffer;

    use crate::font_data::FontData;
    use crate::parser::Parser;

    fn os2_v0() -> BeBuffer {
        BeBuffer::new()
            .push(0u16) // version
            .push(500i16)
            .push(700u16) // weight
            .push(5u16) // width
            .push(0x0008u16) // type flags
            .extend([0i16; 10])
            .push(2i16) // family class
            .extend([2u8, 0, 0, 0, 0, 0, 0, 0, 0, 0]) // panose
            .extend([0u32; 4])
            .push(*b"TEST")
            .push(0x0060u16) // selection
            .extend([0x20u16, 0xFFFF])
            .extend([800i16, -200, 90])
            .extend([1000u16, 300])
    }

    #[test]
    fn version_0_stops_early() {
        let body = os2_v0().into_vec();
        assert_eq!(body.len(), 78);
        let mut p = Parser::new(FontData::new(&body));
        super::parse(&mut p).unwrap();
        assert_eq!(p.offset(), 78);
        let (tree, _) = p.finish();
        let weight = tree.child_at(tree.root_id(), 2).unwrap();
        assert_eq!(tree.value(weight), "Bold (700)");
    }

    #[test]
    fn version_4_reads_extensions() {
        let body = os2_v0()
            .write_at(1, 4u8)
            .extend([0u32, 0]) // code pages
            .extend([500i16, 700])
            .extend([0u16, 32, 2])
            .into_vec();
        let mut p = Parser::new(FontData::new(&body));
        super::parse(&mut p).unwrap();
        assert_eq!(p.offset(), 96);
    }
}
