//! The [Glyph Data (glyf)](https://docs.microsoft.com/en-us/typography/opentype/spec/glyf) table.

use std::fmt;

use sfnt_types::{F2Dot14, GlyphId};

use crate::error::ReadError;
use crate::parser::Parser;
use crate::tables::flags_scalar;

struct SimpleGlyphFlags(u8);
flags_scalar!(SimpleGlyphFlags, u8);

const ON_CURVE_POINT: u8 = 0x01;
const X_SHORT_VECTOR: u8 = 0x02;
const Y_SHORT_VECTOR: u8 = 0x04;
const REPEAT_FLAG: u8 = 0x08;
const X_IS_SAME_OR_POSITIVE: u8 = 0x10;
const Y_IS_SAME_OR_POSITIVE: u8 = 0x20;
const OVERLAP_SIMPLE: u8 = 0x40;

impl fmt::Display for SimpleGlyphFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08b}", self.0)?;
        let bits = self.0;
        if bits & ON_CURVE_POINT != 0 { write!(f, "\nBit 0: On curve point")?; }
        if bits & X_SHORT_VECTOR != 0 { write!(f, "\nBit 1: X-coordinate is 1 byte long")?; }
        if bits & Y_SHORT_VECTOR != 0 { write!(f, "\nBit 2: Y-coordinate is 1 byte long")?; }
        if bits & REPEAT_FLAG != 0 { write!(f, "\nBit 3: Repeat flag")?; }

        match (bits & X_SHORT_VECTOR != 0, bits & X_IS_SAME_OR_POSITIVE != 0) {
            (true, true) => write!(f, "\nBit 4: X-coordinate is positive")?,
            (true, false) => write!(f, "\nBit 4: X-coordinate is negative")?,
            (false, true) => write!(f, "\nBit 4: Use the previous X-coordinate")?,
            (false, false) => write!(f, "\nBit 4: X-coordinate is 2 byte long, signed")?,
        }
        match (bits & Y_SHORT_VECTOR != 0, bits & Y_IS_SAME_OR_POSITIVE != 0) {
            (true, true) => write!(f, "\nBit 5: Y-coordinate is positive")?,
            (true, false) => write!(f, "\nBit 5: Y-coordinate is negative")?,
            (false, true) => write!(f, "\nBit 5: Use the previous Y-coordinate")?,
            (false, false) => write!(f, "\nBit 5: Y-coordinate is 2 byte long, signed")?,
        }

        if bits & OVERLAP_SIMPLE != 0 { write!(f, "\nBit 6: Contours may overlap")?; }
        // 7 - reserved
        Ok(())
    }
}

struct CompositeGlyphFlags(u16);
flags_scalar!(CompositeGlyphFlags, u16);

const ARG_1_AND_2_ARE_WORDS: u16 = 0x0001;
const ARGS_ARE_XY_VALUES: u16 = 0x0002;
const WE_HAVE_A_SCALE: u16 = 0x0008;
const MORE_COMPONENTS: u16 = 0x0020;
const WE_HAVE_AN_X_AND_Y_SCALE: u16 = 0x0040;
const WE_HAVE_A_TWO_BY_TWO: u16 = 0x0080;
const WE_HAVE_INSTRUCTIONS: u16 = 0x0100;

impl fmt::Display for CompositeGlyphFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016b}", self.0)?;
        let bits = self.0;
        if bits & 0x0001 != 0 { write!(f, "\nBit 0: Arguments are 16-bit")?; }
        if bits & 0x0002 != 0 { write!(f, "\nBit 1: Arguments are signed xy values")?; }
        if bits & 0x0004 != 0 { write!(f, "\nBit 2: Round XY to grid")?; }
        if bits & 0x0008 != 0 { write!(f, "\nBit 3: Has a simple scale")?; }
        // 4 - reserved
        if bits & 0x0020 != 0 { write!(f, "\nBit 5: Has more glyphs")?; }
        if bits & 0x0040 != 0 { write!(f, "\nBit 6: Non-proportional scale")?; }
        if bits & 0x0080 != 0 { write!(f, "\nBit 7: Has 2 by 2 transformation matrix")?; }
        if bits & 0x0100 != 0 { write!(f, "\nBit 8: Has instructions after the last component")?; }
        if bits & 0x0200 != 0 { write!(f, "\nBit 9: Use my metrics")?; }
        if bits & 0x0400 != 0 { write!(f, "\nBit 10: Components overlap")?; }
        if bits & 0x0800 != 0 { write!(f, "\nBit 11: Scaled component offset")?; }
        if bits & 0x1000 != 0 { write!(f, "\nBit 12: Unscaled component offset")?; }
        // 13, 14, 15 - reserved
        Ok(())
    }
}

/// Glyph byte sizes derived from consecutive loca offsets.
fn glyph_sizes(number_of_glyphs: u16, loca_offsets: &[u32]) -> Result<Vec<u32>, ReadError> {
    if loca_offsets.len() < number_of_glyphs as usize + 1 {
        return Err(ReadError::OutOfBounds);
    }
    let mut sizes = Vec::with_capacity(number_of_glyphs as usize);
    for pair in loca_offsets.windows(2) {
        if pair[1] < pair[0] {
            return Err(ReadError::MalformedData("invalid offset"));
        }
        sizes.push(pair[1] - pair[0]);
    }
    Ok(sizes)
}

fn parse_simple_glyph(p: &mut Parser, number_of_contours: u16) -> Result<(), ReadError> {
    let mut last_point = 0u16;
    p.begin_group("Endpoints");
    for i in 0..u32::from(number_of_contours) {
        last_point = p.read_indexed::<u16>("Endpoint", i)?;
    }
    p.end_group();

    let instruction_len = p.read::<u16>("Instructions size")?;
    if instruction_len > 0 {
        p.read_bytes(instruction_len as usize, "Instructions")?;
    }

    let mut all_flags = Vec::new();
    p.begin_group("Flags");
    let mut points_left = i64::from(last_point) + 1;
    while points_left > 0 {
        p.charge(1)?;
        let flags = p.read::<SimpleGlyphFlags>("Flag")?.0;
        all_flags.push(flags);

        let mut repeats = 1i64;
        if flags & REPEAT_FLAG != 0 {
            let count = p.read::<u8>("Number of repeats")?;
            for _ in 0..count {
                all_flags.push(flags);
            }
            repeats += i64::from(count);
        }
        points_left -= repeats;
    }
    p.end_group();

    p.begin_group("X-coordinates");
    for &flags in &all_flags {
        if flags & X_SHORT_VECTOR != 0 {
            p.read::<u8>("Coordinate")?;
        } else if flags & X_IS_SAME_OR_POSITIVE == 0 {
            p.read::<i16>("Coordinate")?;
        }
    }
    p.end_group();

    p.begin_group("Y-coordinates");
    for &flags in &all_flags {
        if flags & Y_SHORT_VECTOR != 0 {
            p.read::<u8>("Coordinate")?;
        } else if flags & Y_IS_SAME_OR_POSITIVE == 0 {
            p.read::<i16>("Coordinate")?;
        }
    }
    p.end_group();
    Ok(())
}

fn parse_composite_glyph(p: &mut Parser) -> Result<(), ReadError> {
    let mut have_instructions = false;
    loop {
        p.charge(1)?;
        let flags = p.read::<CompositeGlyphFlags>("Flag")?.0;
        p.read::<GlyphId>("Glyph ID")?;
        have_instructions |= flags & WE_HAVE_INSTRUCTIONS != 0;

        let mut matrix = [0.0f32; 6];
        p.begin_group("");
        if flags & ARGS_ARE_XY_VALUES != 0 {
            if flags & ARG_1_AND_2_ARE_WORDS != 0 {
                matrix[4] = f32::from(p.read::<i16>("E")?);
                matrix[5] = f32::from(p.read::<i16>("F")?);
            } else {
                matrix[4] = f32::from(p.read::<i8>("E")?);
                matrix[5] = f32::from(p.read::<i8>("F")?);
            }
        } else if flags & ARG_1_AND_2_ARE_WORDS != 0 {
            p.read::<u16>("Point number 1")?;
            p.read::<u16>("Point number 2")?;
        } else {
            p.read::<u8>("Point number 1")?;
            p.read::<u8>("Point number 2")?;
        }

        if flags & WE_HAVE_A_TWO_BY_TWO != 0 {
            matrix[0] = p.read::<F2Dot14>("A")?.to_f32();
            matrix[1] = p.read::<F2Dot14>("B")?.to_f32();
            matrix[2] = p.read::<F2Dot14>("C")?.to_f32();
            matrix[3] = p.read::<F2Dot14>("D")?.to_f32();
        } else if flags & WE_HAVE_AN_X_AND_Y_SCALE != 0 {
            matrix[0] = p.read::<F2Dot14>("A")?.to_f32();
            matrix[3] = p.read::<F2Dot14>("D")?.to_f32();
        } else if flags & WE_HAVE_A_SCALE != 0 {
            matrix[0] = p.read::<F2Dot14>("A")?.to_f32();
            matrix[3] = matrix[0];
        }

        p.end_group_titled(format!(
            "Matrix ({} {} {} {} {} {})",
            matrix[0], matrix[1], matrix[2], matrix[3], matrix[4], matrix[5]
        ));

        if flags & MORE_COMPONENTS == 0 {
            break;
        }
    }

    if have_instructions {
        let len = p.read::<u16>("Instructions size")?;
        if len > 0 {
            p.read_bytes(len as usize, "Instructions")?;
        }
    }
    Ok(())
}

enum GlyphKind {
    Other,
    Composite,
}

fn parse_glyph(p: &mut Parser) -> Result<GlyphKind, ReadError> {
    let number_of_contours = p.read::<i16>("Number of contours")?;
    p.read::<i16>("x min")?;
    p.read::<i16>("y min")?;
    p.read::<i16>("x max")?;
    p.read::<i16>("y max")?;

    if number_of_contours > 0 {
        parse_simple_glyph(p, number_of_contours as u16)?;
        Ok(GlyphKind::Other)
    } else if number_of_contours < 0 {
        parse_composite_glyph(p)?;
        Ok(GlyphKind::Composite)
    } else {
        Ok(GlyphKind::Other)
    }
}

pub(crate) fn parse(
    p: &mut Parser,
    number_of_glyphs: u16,
    loca_offsets: &[u32],
) -> Result<(), ReadError> {
    let sizes = glyph_sizes(number_of_glyphs, loca_offsets)?;

    for (gid, size) in sizes.iter().copied().enumerate() {
        if size == 0 {
            continue;
        }

        let start = p.offset();
        p.begin_group(format!("Glyph {gid}"));
        let kind = parse_glyph(p)?;
        if let GlyphKind::Composite = kind {
            p.end_group_titled(format!("Glyph {gid} (composite)"));
        } else {
            p.end_group();
        }

        let used = p.offset() - start;
        match (size as usize).checked_sub(used) {
            Some(0) => {}
            Some(padding) => p.read_padding(padding)?,
            None => return Err(ReadError::MalformedData("malformed glyph")),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use inspect_test_data::bebuffer::BeBuffer;

    use crate::font_data::FontData;
    use crate::parser::Parser;

    fn simple_glyph() -> BeBuffer {
        BeBuffer::new()
            .push(1i16) // one contour
            .extend([0i16, 0, 10, 10]) // bbox
            .push(1u16) // endpoint: two points
            .push(0u16) // no instructions
            // Two flags: both on-curve, x short & positive, y short & positive.
            .extend([0x37u8, 0x37])
            .extend([5u8, 5]) // x coordinates
            .extend([7u8, 3]) // y coordinates
    }

    #[test]
    fn simple_glyph_streams() {
        let body = simple_glyph().into_vec();
        let loca = [0, body.len() as u32];
        let mut p = Parser::new(FontData::new(&body));
        super::parse(&mut p, 1, &loca).unwrap();
        assert_eq!(p.offset(), body.len());
        let (tree, _) = p.finish();
        let glyph = tree.child_at(tree.root_id(), 0).unwrap();
        assert_eq!(tree.title(glyph), "Glyph 0");
        // contours + bbox (4) + endpoints + instr size + flags + x + y
        assert_eq!(tree.children_count(glyph), 10);
    }

    #[test]
    fn composite_glyph_components() {
        let body = BeBuffer::new()
            .push(-1i16) // composite
            .extend([0i16, 0, 100, 100])
            // First component: MORE_COMPONENTS | ARGS_ARE_XY_VALUES.
            .push(0x0022u16)
            .push(1u16) // glyph id
            .extend([5i8, 6]) // offsets
            // Second component: ARGS_ARE_XY_VALUES | WE_HAVE_A_SCALE.
            .push(0x000Au16)
            .push(2u16)
            .extend([1i8, 2])
            .push(0x4000i16) // scale = 1.0
            .into_vec();
        let loca = [0, body.len() as u32];
        let mut p = Parser::new(FontData::new(&body));
        super::parse(&mut p, 1, &loca).unwrap();
        let (tree, _) = p.finish();
        let glyph = tree.child_at(tree.root_id(), 0).unwrap();
        assert_eq!(tree.title(glyph), "Glyph 0 (composite)");
        // contours + bbox (4) + per component: flag, glyph id, matrix group.
        assert_eq!(tree.children_count(glyph), 11);
        let matrix = tree.child_at(glyph, 7).unwrap();
        assert_eq!(tree.title(matrix), "Matrix (0 0 0 0 5 6)");
    }

    #[test]
    fn empty_glyphs_are_skipped() {
        let body = simple_glyph().into_vec();
        let loca = [0, 0, body.len() as u32];
        let mut p = Parser::new(FontData::new(&body));
        super::parse(&mut p, 2, &loca).unwrap();
        let (tree, _) = p.finish();
        assert_eq!(tree.children_count(tree.root_id()), 1);
        assert_eq!(tree.title(tree.child_at(tree.root_id(), 0).unwrap()), "Glyph 1");
    }

    #[test]
    fn decreasing_loca_fails() {
        let body = simple_glyph().into_vec();
        let loca = [10, 0, 12];
        let mut p = Parser::new(FontData::new(&body));
        assert!(super::parse(&mut p, 2, &loca).is_err());
    }
}
