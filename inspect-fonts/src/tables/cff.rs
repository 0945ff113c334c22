//! The [Compact Font Format (CFF)](https://docs.microsoft.com/en-us/typography/opentype/spec/cff) table,
//! plus the INDEX/DICT/charstring machinery shared with `CFF2`.

use std::fmt;

use sfnt_types::{ReadScalar, ValueType};

use crate::error::ReadError;
use crate::font_data::Cursor;
use crate::parser::Parser;

/// The width of entries in an INDEX offset array. Valid values are 1-4.
pub(crate) struct OffsetSize(u8);

impl OffsetSize {
    pub(crate) fn byte_len(&self) -> Result<usize, ReadError> {
        match self.0 {
            1..=4 => Ok(self.0 as usize),
            _ => Err(ReadError::MalformedData("invalid OffsetSize")),
        }
    }
}

impl ReadScalar for OffsetSize {
    const RAW_BYTE_LEN: usize = 1;
    const VALUE_TYPE: ValueType = ValueType::OffsetSize;

    fn read_be(data: &[u8]) -> Option<Self> {
        u8::read_be(data).map(Self)
    }
}

impl fmt::Display for OffsetSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

const END_OF_FLOAT_FLAG: u8 = 0xF;
const FLOAT_MAX_LEN: usize = 64;

fn push_float_nibble(nibble: u8, buf: &mut String) -> Result<(), ReadError> {
    if buf.len() >= FLOAT_MAX_LEN {
        return Err(ReadError::InvalidFloat);
    }
    match nibble {
        0..=9 => buf.push((b'0' + nibble) as char),
        10 => buf.push('.'),
        11 => buf.push('E'),
        12 => buf.push_str("E-"),
        14 => buf.push('-'),
        _ => return Err(ReadError::InvalidFloat),
    }
    Ok(())
}

/// Decode a nibble-packed real number, leaving the cursor after the `0xF`
/// terminator.
pub(crate) fn parse_float(cursor: &mut Cursor) -> Result<f32, ReadError> {
    let mut repr = String::new();
    while !cursor.at_end() {
        let byte = cursor.read::<u8>()?;
        let high = byte >> 4;
        let low = byte & 0xF;

        if high == END_OF_FLOAT_FLAG {
            break;
        }
        push_float_nibble(high, &mut repr)?;

        if low == END_OF_FLOAT_FLAG {
            break;
        }
        push_float_nibble(low, &mut repr)?;
    }

    repr.parse().map_err(|_| ReadError::InvalidFloat)
}

fn render_float(value: f32) -> String {
    if value == value.trunc() {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

/// Parse an INDEX: a count, an offset array and the packed data area, with
/// `f` invoked once per entry as `(parser, entry_len, entry_index)`.
///
/// Offsets are one-based, so entry `i` spans `offsets[i]-1..offsets[i+1]-1`
/// of the data area. `CFF2` widens the count field to 32 bits.
pub(crate) fn parse_index(
    p: &mut Parser,
    title: &'static str,
    items_title: &'static str,
    long_count: bool,
    f: &mut dyn FnMut(&mut Parser, usize, u32) -> Result<(), ReadError>,
) -> Result<(), ReadError> {
    p.begin_group(title);

    let count = if long_count {
        p.read::<u32>("Count")? as usize
    } else {
        p.read::<u16>("Count")? as usize
    };

    if count == 0 {
        p.end_group();
        return Ok(());
    }

    let offset_size = p.read::<OffsetSize>("Offset size")?;
    let offset_len = offset_size.byte_len()?;

    // The count is attacker-controlled; let the vector grow with the reads.
    let mut offsets: Vec<usize> = Vec::with_capacity((count + 1).min(0x10000));
    // One more offset at the end closes the last entry.
    p.read_array_with("Indexes", count + 1, |p, n| {
        let offset = match offset_len {
            1 => usize::from(p.read_nth::<u8>(n)?),
            2 => usize::from(p.read_nth::<u16>(n)?),
            3 => p.read_nth::<sfnt_types::Uint24>(n)?.to_u32() as usize,
            _ => p.read_nth::<u32>(n)? as usize,
        };
        offsets.push(offset);
        Ok(())
    })?;

    p.read_array_with(items_title, count, |p, n| {
        let start = offsets[n as usize]
            .checked_sub(1)
            .ok_or(ReadError::MalformedData("invalid INDEX offset"))?;
        let end = offsets[n as usize + 1]
            .checked_sub(1)
            .ok_or(ReadError::MalformedData("invalid INDEX offset"))?;
        if end < start {
            return Err(ReadError::MalformedData("invalid INDEX offset"));
        }
        if start == end {
            return Ok(());
        }

        let entry_len = end - start;
        let before = p.offset();
        f(p, entry_len, n)?;
        let used = p.offset() - before;
        if used < entry_len {
            p.read_unsupported(entry_len - used)?;
        } else if used > entry_len {
            return Err(ReadError::MalformedData("INDEX entry read too much"));
        }
        Ok(())
    })?;

    p.end_group();
    Ok(())
}

/// The operators and operands recovered from a DICT, for offset chasing.
#[derive(Default)]
pub(crate) struct Dict {
    records: Vec<(u16, Vec<f32>)>,
}

impl Dict {
    pub(crate) fn operands(&self, op: u16) -> Option<&[f32]> {
        self.records
            .iter()
            .find(|(record_op, _)| *record_op == op)
            .map(|(_, operands)| operands.as_slice())
    }

    /// A single non-negative operand, as most offset operators require.
    pub(crate) fn offset_operand(&self, op: u16) -> Result<Option<usize>, ReadError> {
        match self.operands(op) {
            None => Ok(None),
            Some([value]) if *value >= 0.0 => Ok(Some(*value as usize)),
            Some(_) => Err(ReadError::MalformedData("invalid DICT operands")),
        }
    }
}

pub(crate) mod dict_op {
    pub const CHARSET: u16 = 15;
    pub const CHAR_STRINGS: u16 = 17;
    pub const PRIVATE: u16 = 18;
    pub const SUBRS: u16 = 19;
    pub const VSTORE: u16 = 24;
    pub const FD_ARRAY: u16 = 1236;
}

fn cff_op_name(op: u16) -> &'static str {
    match op {
        0 => "Version",
        1 => "Notice",
        2 => "Full name",
        3 => "Family name",
        4 => "Weight",
        5 => "Font bbox",
        6 => "Blue values",
        7 => "Other blues",
        8 => "Family blues",
        9 => "Family other blues",
        10 => "Std HW",
        11 => "Std VW",
        13 => "Unique ID",
        14 => "XUID",
        15 => "charset",
        16 => "Encoding",
        17 => "CharStrings",
        18 => "Private",
        19 => "Local subroutines",
        20 => "Default width X",
        21 => "Nominal width X",
        1200 => "Copyright",
        1201 => "Is fixed pitch",
        1202 => "Italic angle",
        1203 => "Underline position",
        1204 => "Underline thickness",
        1205 => "Paint type",
        1206 => "Charstring type",
        1207 => "Font matrix",
        1208 => "Stroke width",
        1209 => "Blue scale",
        1210 => "Blue shift",
        1211 => "Blue fuzz",
        1212 => "Stem snap H",
        1213 => "Stem snap V",
        1214 => "Force bold",
        1217 => "Language group",
        1218 => "Expansion factor",
        1219 => "Initial random seed",
        1220 => "Synthetic base",
        1221 => "PostScript",
        1222 => "Base font name",
        1223 => "Base font blend",
        1230 => "ROS",
        1231 => "CID font version",
        1232 => "CID font revision",
        1233 => "CID font type",
        1234 => "CID count",
        1235 => "UID base",
        1236 => "FD array",
        1237 => "FD select",
        1238 => "Font name",
        _ => "",
    }
}

fn cff2_op_name(op: u16) -> &'static str {
    match op {
        6 => "Blue values",
        7 => "Other blues",
        8 => "Family blues",
        9 => "Family other blues",
        10 => "Std HW",
        11 => "Std VW",
        17 => "CharStrings",
        18 => "Private",
        19 => "Local subroutines",
        22 => "Variation Store index",
        23 => "Blend",
        24 => "Variation Store offset",
        1207 => "Font matrix",
        1209 => "Blue scale",
        1210 => "Blue shift",
        1211 => "Blue fuzz",
        1212 => "Stem snap H",
        1213 => "Stem snap V",
        1217 => "Language group",
        1218 => "Expansion factor",
        1236 => "Font DICT INDEX",
        1237 => "FD select",
        _ => "",
    }
}

/// Which dialect's operator vocabulary a DICT or charstring uses.
#[derive(Clone, Copy, PartialEq)]
pub(crate) enum Flavor {
    Cff,
    Cff2,
}

/// Parse a DICT: runs of operands closed by an operator, each run wrapped
/// in a group titled after the operator.
pub(crate) fn parse_dict(p: &mut Parser, size: usize, flavor: Flavor) -> Result<Dict, ReadError> {
    let op_name = match flavor {
        Flavor::Cff => cff_op_name,
        Flavor::Cff2 => cff2_op_name,
    };

    let mut dict = Dict::default();
    if size == 0 {
        return Ok(dict);
    }

    let end = p.offset() + size;
    let mut operands: Vec<f32> = Vec::new();
    let mut group_open = true;
    p.begin_group("");

    while p.offset() < end {
        p.charge(1)?;
        if !group_open {
            p.begin_group("");
            group_open = true;
        }

        let b0 = p.peek::<u8>()?;
        if b0 == 12 {
            let b1 = p.peek_at::<u8>(1)?;
            let op = 1200 + u16::from(b1);
            p.read::<u16>("Operator")?;
            let run = std::mem::take(&mut operands);
            // Only known operators are kept for offset chasing.
            if !op_name(op).is_empty() {
                dict.records.push((op, run));
            }
            p.end_group_titled(op_name(op));
            group_open = false;
        } else if b0 <= 27 {
            let op = u16::from(b0);
            p.read::<u8>("Operator")?;
            let run = std::mem::take(&mut operands);
            if !op_name(op).is_empty() {
                dict.records.push((op, run));
            }
            p.end_group_titled(op_name(op));
            group_open = false;
        } else if b0 == 28 {
            let value = i16::from_be_bytes([p.peek_at::<u8>(1)?, p.peek_at::<u8>(2)?]);
            p.read_value_span(3, "Number", value.to_string(), ValueType::CffNumber)?;
            operands.push(f32::from(value));
        } else if b0 == 29 {
            let value = i32::from_be_bytes([
                p.peek_at::<u8>(1)?,
                p.peek_at::<u8>(2)?,
                p.peek_at::<u8>(3)?,
                p.peek_at::<u8>(4)?,
            ]);
            p.read_value_span(5, "Number", value.to_string(), ValueType::CffNumber)?;
            operands.push(value as f32);
        } else if b0 == 30 {
            let mut shadow = p.shadow();
            shadow.skip::<u8>()?;
            let value = parse_float(&mut shadow)?;
            p.read_value_span(shadow.offset(), "Number", render_float(value), ValueType::CffNumber)?;
            operands.push(value);
        } else if (32..=246).contains(&b0) {
            let value = i32::from(b0) - 139;
            p.read_value_span(1, "Number", value.to_string(), ValueType::CffNumber)?;
            operands.push(value as f32);
        } else if (247..=250).contains(&b0) {
            let b1 = p.peek_at::<u8>(1)?;
            let value = (i32::from(b0) - 247) * 256 + i32::from(b1) + 108;
            p.read_value_span(2, "Number", value.to_string(), ValueType::CffNumber)?;
            operands.push(value as f32);
        } else if (251..=254).contains(&b0) {
            let b1 = p.peek_at::<u8>(1)?;
            let value = -(i32::from(b0) - 251) * 256 - i32::from(b1) - 108;
            p.read_value_span(2, "Number", value.to_string(), ValueType::CffNumber)?;
            operands.push(value as f32);
        } else {
            p.read::<u8>("Unknown")?;
        }
    }

    if group_open {
        p.end_group();
    }
    Ok(dict)
}

fn charstring_op_name(flavor: Flavor, b0: u8) -> &'static str {
    match (flavor, b0) {
        (_, 1) => "Horizontal stem (hstem)",
        (_, 3) => "Vertical stem (vstem)",
        (_, 4) => "Vertical move to (vmoveto)",
        (_, 5) => "Line to (rlineto)",
        (_, 6) => "Horizontal line to (hlineto)",
        (_, 7) => "Vertical line to (vlineto)",
        (_, 8) => "Curve to (rrcurveto)",
        (_, 10) => "Call local subroutine (callsubr)",
        (Flavor::Cff, 11) => "Return (return)",
        (Flavor::Cff, 14) => "Endchar (endchar)",
        (Flavor::Cff2, 15) => "Variation Store index (vsindex)",
        (Flavor::Cff2, 16) => "Blend (blend)",
        (_, 18) => "Horizontal stem hint mask (hstemhm)",
        (_, 19) => "Hint mask (hintmask)",
        (_, 20) => "Counter mask (cntrmask)",
        (_, 21) => "Move to (rmoveto)",
        (_, 22) => "Horizontal move to (hmoveto)",
        (_, 23) => "Vertical stem hint mask (vstemhm)",
        (_, 24) => "Curve line (rcurveline)",
        (_, 25) => "Line curve (rlinecurve)",
        (_, 26) => "Vertical vertical curve to (vvcurveto)",
        (_, 27) => "Horizontal horizontal curve to (hhcurveto)",
        (_, 29) => "Call global subroutine (callgsubr)",
        (_, 30) => "Vertical horizontal curve to (vhcurveto)",
        (_, 31) => "Horizontal vertical curve to (hvcurveto)",
        _ => "Reserved",
    }
}

fn charstring_escape_name(flavor: Flavor, b1: u8) -> &'static str {
    if flavor == Flavor::Cff {
        match b1 {
            3 => return "(and)",
            4 => return "(or)",
            5 => return "(not)",
            9 => return "(abs)",
            10 => return "(add)",
            11 => return "(sub)",
            12 => return "(div)",
            14 => return "(neg)",
            15 => return "(eq)",
            18 => return "(drop)",
            20 => return "(put)",
            21 => return "(get)",
            22 => return "(ifelse)",
            23 => return "(random)",
            24 => return "(mul)",
            26 => return "(sqrt)",
            27 => return "(dup)",
            28 => return "(exch)",
            29 => return "(index)",
            30 => return "(roll)",
            _ => {}
        }
    }
    match b1 {
        34 => "Horizontal flex (hflex)",
        35 => "Flex (flex)",
        36 => "Horizontal flex 1 (hflex1)",
        37 => "Flex 1 (flex1)",
        _ => "Reserved",
    }
}

/// Parse one charstring or subroutine, opcode by opcode.
pub(crate) fn parse_charstring(
    p: &mut Parser,
    len: usize,
    index: u32,
    flavor: Flavor,
) -> Result<(), ReadError> {
    // One-byte programs carry nothing of interest; the INDEX walker labels
    // the remainder.
    if len < 2 {
        return Ok(());
    }

    p.begin_group_nth(index);
    let end = p.offset() + len;

    while p.offset() < end {
        p.charge(1)?;
        let b0 = p.peek::<u8>()?;
        match b0 {
            12 => {
                let b1 = p.peek_at::<u8>(1)?;
                p.read::<u16>(charstring_escape_name(flavor, b1))?;
            }
            28 => {
                if p.offset() + 3 > end {
                    break;
                }
                let value = i16::from_be_bytes([p.peek_at::<u8>(1)?, p.peek_at::<u8>(2)?]);
                p.read_value_span(3, "Number", value.to_string(), ValueType::CffNumber)?;
            }
            32..=246 => {
                let value = i32::from(b0) - 139;
                p.read_value_span(1, "Number", value.to_string(), ValueType::CffNumber)?;
            }
            247..=250 => {
                if p.offset() + 2 > end {
                    break;
                }
                let b1 = p.peek_at::<u8>(1)?;
                let value = (i32::from(b0) - 247) * 256 + i32::from(b1) + 108;
                p.read_value_span(2, "Number", value.to_string(), ValueType::CffNumber)?;
            }
            251..=254 => {
                if p.offset() + 2 > end {
                    break;
                }
                let b1 = p.peek_at::<u8>(1)?;
                let value = -(i32::from(b0) - 251) * 256 - i32::from(b1) - 108;
                p.read_value_span(2, "Number", value.to_string(), ValueType::CffNumber)?;
            }
            255 => {
                if p.offset() + 5 > end {
                    break;
                }
                let raw = i32::from_be_bytes([
                    p.peek_at::<u8>(1)?,
                    p.peek_at::<u8>(2)?,
                    p.peek_at::<u8>(3)?,
                    p.peek_at::<u8>(4)?,
                ]);
                let value = raw as f32 / 65536.0;
                p.read_value_span(5, "Number", render_float(value), ValueType::CffNumber)?;
            }
            _ => {
                p.read::<u8>(charstring_op_name(flavor, b0))?;
                if flavor == Flavor::Cff && (b0 == 11 || b0 == 14) {
                    // return / endchar terminate the program.
                    break;
                }
            }
        }
    }

    p.end_group();
    Ok(())
}

fn parse_charset(p: &mut Parser, number_of_glyphs: u16) -> Result<(), ReadError> {
    // `.notdef` is omitted throughout.
    let format = p.read::<u8>("Format")?;
    match format {
        0 => p.read_array::<u16>("Glyph Name Array", usize::from(number_of_glyphs) - 1),
        1 => {
            // The number of ranges is not stored; read until no glyphs
            // remain.
            let mut left = i64::from(number_of_glyphs) - 1;
            while left > 0 {
                p.charge(1)?;
                p.begin_group("Range");
                p.read::<u16>("First glyph")?;
                left -= i64::from(p.read::<u8>("Glyphs left")?) + 1;
                p.end_group();
            }
            Ok(())
        }
        2 => {
            let mut left = i64::from(number_of_glyphs) - 1;
            while left > 0 {
                p.charge(1)?;
                p.begin_group("Range");
                p.read::<u16>("First glyph")?;
                left -= i64::from(p.read::<u16>("Glyphs left")?) + 1;
                p.end_group();
            }
            Ok(())
        }
        _ => Err(ReadError::MalformedData("invalid charset format")),
    }
}

pub(crate) fn parse(p: &mut Parser) -> Result<(), ReadError> {
    let table_start = p.offset();

    p.begin_group("Header");
    p.read::<u8>("Major version")?;
    p.read::<u8>("Minor version")?;
    let header_size = p.read::<u8>("Header size")?;
    p.read::<u8>("Absolute offset")?;
    p.end_group();

    match usize::from(header_size) {
        size if size > 4 => p.read_padding(size - 4)?,
        4 => {}
        _ => return Err(ReadError::MalformedData("header size is too small")),
    }

    parse_index(p, "Name INDEX", "Names", false, &mut |p, len, n| {
        p.read_utf8_string(n.to_string(), len).map(|_| ())
    })?;

    let mut top_dict = Dict::default();
    parse_index(p, "Top DICT INDEX", "Values", false, &mut |p, len, n| {
        if n != 0 {
            return Err(ReadError::MalformedData(
                "Top DICT INDEX should have only one dictionary",
            ));
        }
        top_dict = parse_dict(p, len, Flavor::Cff)?;
        Ok(())
    })?;

    parse_index(p, "String INDEX", "Strings", false, &mut |p, len, n| {
        p.read_utf8_string(n.to_string(), len).map(|_| ())
    })?;

    parse_index(p, "Global Subr INDEX", "Subrs", false, &mut |p, len, n| {
        parse_charstring(p, len, n, Flavor::Cff)
    })?;

    #[derive(Clone, Copy, PartialEq)]
    enum SubtableKind {
        Charset,
        CharStrings,
        PrivateDict,
    }

    let mut subtables = Vec::new();

    let char_strings_offset = top_dict.offset_operand(dict_op::CHAR_STRINGS)?;

    // The glyph count lives in the count field of the CharStrings INDEX.
    let mut number_of_glyphs = 0u16;
    if let Some(offset) = char_strings_offset {
        number_of_glyphs = p.peek_abs::<u16>(table_start + offset)?;
    }

    if let Some(offset) = top_dict.offset_operand(dict_op::CHARSET)? {
        // There is no charset when there are no glyphs.
        if number_of_glyphs > 0 {
            subtables.push((SubtableKind::Charset, table_start + offset));
        }
    }

    if let Some(offset) = char_strings_offset {
        subtables.push((SubtableKind::CharStrings, table_start + offset));
    }

    let mut private_dict_size = 0usize;
    if let Some(operands) = top_dict.operands(dict_op::PRIVATE) {
        let [size, offset] = operands else {
            return Err(ReadError::MalformedData("invalid Private DICT operands"));
        };
        if *size < 0.0 || *offset < 0.0 {
            return Err(ReadError::MalformedData("invalid Private DICT operands"));
        }
        private_dict_size = *size as usize;
        subtables.push((SubtableKind::PrivateDict, table_start + *offset as usize));
    }

    subtables.sort_by_key(|&(_, offset)| offset);

    for (kind, offset) in subtables {
        if offset == table_start {
            continue;
        }
        p.advance_to(offset)?;
        match kind {
            SubtableKind::Charset => {
                p.begin_group("Charsets");
                parse_charset(p, number_of_glyphs)?;
                p.end_group();
            }
            SubtableKind::CharStrings => {
                parse_index(p, "CharStrings INDEX", "CharStrings", false, &mut |p, len, n| {
                    parse_charstring(p, len, n, Flavor::Cff)
                })?;
            }
            SubtableKind::PrivateDict => {
                p.begin_group("Private DICT");
                let private_dict = parse_dict(p, private_dict_size, Flavor::Cff)?;
                p.end_group();

                // The local subroutines offset is relative to the Private
                // DICT data.
                if let Some(subrs_offset) = private_dict.offset_operand(dict_op::SUBRS)? {
                    p.advance_to(offset + subrs_offset)?;
                    parse_index(p, "Local Subr INDEX", "Subrs", false, &mut |p, len, n| {
                        parse_charstring(p, len, n, Flavor::Cff)
                    })?;
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use inspect_test_data::bebuffer::BeBuffer;

    use crate::font_data::{Cursor, FontData};
    use crate::parser::Parser;

    #[test]
    fn float_decoding() {
        // 0.140541E-3, the canonical example: nibbles 0 . 1 4 0 5 4 1 E- 3 f.
        let bytes = [0x0A, 0x14, 0x05, 0x41, 0xC3, 0xFF];
        let mut cursor = Cursor::new(FontData::new(&bytes));
        let value = super::parse_float(&mut cursor).unwrap();
        assert!((value - 0.140541e-3).abs() < 1e-9);
        assert_eq!(cursor.offset(), 6);
    }

    #[test]
    fn invalid_float_nibble() {
        let bytes = [0x0D, 0xFF];
        let mut cursor = Cursor::new(FontData::new(&bytes));
        assert_eq!(
            super::parse_float(&mut cursor),
            Err(crate::ReadError::InvalidFloat)
        );
    }

    // A minimal CFF: a one-name Name INDEX, a top dict pointing at a
    // CharStrings INDEX with one tiny program, empty string/gsubr indexes.
    fn minimal_cff() -> Vec<u8> {
        BeBuffer::new()
            // Header.
            .extend([1u8, 0, 4, 2])
            // Name INDEX at 4: one entry, "A".
            .push(1u16)
            .push(1u8) // offset size
            .extend([1u8, 2]) // offsets
            .push(b'A')
            // Top DICT INDEX at 10: one dict: "21 CharStrings".
            .push(1u16)
            .push(1u8)
            .extend([1u8, 3])
            .extend([139u8 + 21, 17])
            // String INDEX at 17: empty.
            .push(0u16)
            // Global Subr INDEX at 19: empty.
            .push(0u16)
            // CharStrings INDEX at 21: "0 0 rmoveto".
            .push(1u16)
            .push(1u8)
            .extend([1u8, 4])
            .extend([139u8, 139, 21])
            .into_vec()
    }

    #[test]
    fn minimal_font_parses() {
        let body = minimal_cff();
        let mut p = Parser::new(FontData::new(&body));
        super::parse(&mut p).unwrap();
        assert_eq!(p.offset(), body.len());
        let (tree, _) = p.finish();
        let root = tree.root_id();
        assert_eq!(tree.children_count(root), 6);
        let charstrings = tree.child_at(root, 5).unwrap();
        assert_eq!(tree.title(charstrings), "CharStrings INDEX");
        // The one program: two numbers and an operator.
        let items = tree.child_at(charstrings, 3).unwrap();
        let program = tree.child_at(items, 0).unwrap();
        assert_eq!(tree.children_count(program), 3);
    }
}
