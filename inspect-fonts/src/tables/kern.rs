//! The [Kerning (kern)](https://developer.apple.com/fonts/TrueType-Reference-Manual/RM06/Chap6kern.html) table.
//!
//! Two dialects share the tag: the OpenType one (16-bit version 0) and the
//! Apple one (Fixed version 1.0). They differ in header layout, subtable
//! headers and the supported formats, so each gets its own walker.

use std::fmt;

use sfnt_types::{Fixed, GlyphId, Offset16, ReadScalar, ValueType};

use crate::error::ReadError;
use crate::font_data::Cursor;
use crate::parser::Parser;
use crate::tables::flags_scalar;

struct OpenTypeCoverage(u8);
flags_scalar!(OpenTypeCoverage, u8);

impl fmt::Display for OpenTypeCoverage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08b}", self.0)?;
        if self.0 & 0x01 != 0 { write!(f, "\nBit 0: Horizontal")?; }
        if self.0 & 0x02 != 0 { write!(f, "\nBit 1: Has minimum values")?; }
        if self.0 & 0x04 != 0 { write!(f, "\nBit 2: Cross-stream")?; }
        if self.0 & 0x08 != 0 { write!(f, "\nBit 3: Override")?; }
        // 4-7 - reserved
        Ok(())
    }
}

struct AppleCoverage(u8);
flags_scalar!(AppleCoverage, u8);

impl fmt::Display for AppleCoverage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08b}", self.0)?;
        // 0-4 - reserved
        if self.0 & 0x20 != 0 { write!(f, "\nBit 5: Has variation")?; }
        if self.0 & 0x40 != 0 { write!(f, "\nBit 6: Cross-stream")?; }
        if self.0 & 0x80 != 0 { write!(f, "\nBit 7: Vertical")?; }
        Ok(())
    }
}

struct EntryFlags(u16);
flags_scalar!(EntryFlags, u16);

impl fmt::Display for EntryFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Offset {}", self.0 & 0x3FFF)?;
        write!(f, "\n{:016b}", self.0)?;
        if self.0 & 0x8000 != 0 {
            write!(f, "\nBit 15: Push onto the kerning stack")?;
        }
        Ok(())
    }
}

struct Action(u16);

impl ReadScalar for Action {
    const RAW_BYTE_LEN: usize = 2;
    const VALUE_TYPE: ValueType = ValueType::UInt16;

    fn read_be(data: &[u8]) -> Option<Self> {
        u16::read_be(data).map(Self)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            0x0001 => write!(f, "Kerning 0. End of List."),
            0x8001 => write!(f, "Reset cross-stream. End of List."),
            value => write!(f, "Kerning {}", value as i16),
        }
    }
}

fn parse_format0(p: &mut Parser) -> Result<(), ReadError> {
    let count = p.read::<u16>("Number of kerning pairs")?;
    p.read::<u16>("Search range")?;
    p.read::<u16>("Entry selector")?;
    p.read::<u16>("Range shift")?;

    p.read_array_with("Values", count as usize, |p, n| {
        p.begin_group_nth(n);
        p.read::<GlyphId>("Left")?;
        p.read::<GlyphId>("Right")?;
        p.read::<i16>("Value")?;
        p.end_group();
        Ok(())
    })
}

/// One entry in a format 1 state machine.
struct StateEntry {
    new_state: u16,
}

/// Derive the number of state-machine entries for a format 1 subtable.
///
/// The count is not stored anywhere; it has to be discovered by sweeping the
/// states reachable from state zero and following each entry's next-state
/// offset until a fixed point. Malformed subtables can describe unbounded
/// walks, so every step is charged against the parse budget.
fn detect_number_of_entries(
    p: &mut Parser,
    number_of_classes: i64,
    state_array_offset: i64,
    states: &[u8],
    entries: &[StateEntry],
) -> Result<usize, ReadError> {
    if number_of_classes == 0 {
        return Err(ReadError::InvalidStateMachine);
    }

    let mut min_state = 0i64;
    let mut max_state = 0i64;
    let mut num_entries = 0usize;

    let mut state_pos = 0i64;
    let mut state_neg = 0i64;
    let mut entry = 0usize;
    while min_state < state_neg || state_pos <= max_state {
        if min_state < state_neg {
            // Negative states.
            let steps = (state_neg - min_state).try_into().map_err(|_| ReadError::InvalidStateMachine)?;
            p.charge(steps).map_err(|_| ReadError::InvalidStateMachine)?;

            let end = min_state * number_of_classes;
            if end > 0 {
                for i in (0..end).rev() {
                    let index = usize::try_from(i - 1).map_err(|_| ReadError::InvalidStateMachine)?;
                    let class = *states.get(index).ok_or(ReadError::InvalidStateMachine)?;
                    num_entries = num_entries.max(class as usize + 1);
                }
            }
            state_neg = min_state;
        }

        if state_pos <= max_state {
            // Positive states.
            let steps = (max_state - state_pos + 1).try_into().map_err(|_| ReadError::InvalidStateMachine)?;
            p.charge(steps).map_err(|_| ReadError::InvalidStateMachine)?;

            let start = state_pos * number_of_classes;
            let end = (max_state + 1) * number_of_classes;
            for i in start..end {
                let class = *states
                    .get(usize::try_from(i).map_err(|_| ReadError::InvalidStateMachine)?)
                    .ok_or(ReadError::InvalidStateMachine)?;
                num_entries = num_entries.max(class as usize + 1);
            }
            state_pos = max_state + 1;
        }

        let steps = (num_entries - entry).try_into().map_err(|_| ReadError::InvalidStateMachine)?;
        p.charge(steps).map_err(|_| ReadError::InvalidStateMachine)?;

        // Sweep new entries.
        for i in entry..num_entries {
            let new_state = entries.get(i).ok_or(ReadError::InvalidStateMachine)?.new_state;
            let state = (i64::from(new_state) - state_array_offset) / number_of_classes;
            min_state = min_state.min(state);
            max_state = max_state.max(state);
        }
        entry = num_entries;
    }

    Ok(num_entries)
}

// AAT contextual kerning. The layout is underdocumented; the decoding here
// follows HarfBuzz's reading of the format. Apple's own fonts exercising it
// include GeezaPro, Farisi, Mishafi and Waseem.
fn parse_format1(p: &mut Parser, subtable_size: usize) -> Result<(), ReadError> {
    let start = p.offset();
    let shadow = p.shadow();

    let number_of_classes = p.read::<u16>("Number of classes")?;
    // Offsets are relative to this header, not to the subtable start.
    let class_table_offset = p.read::<Offset16>("Offset to class subtable")?;
    let state_array_offset = p.read::<Offset16>("Offset to state array")?;
    let entry_table_offset = p.read::<Offset16>("Offset to entry table")?;
    let values_offset = p.read::<Offset16>("Offset to values")?;

    // Random subtable layouts are not supported.
    if class_table_offset >= state_array_offset
        || state_array_offset >= entry_table_offset
        || entry_table_offset >= values_offset
    {
        return Err(ReadError::InvalidStateMachine);
    }

    let number_of_entries = {
        // The state and entry regions have no recorded lengths; take
        // everything up to the end of the subtable, clamped to the data we
        // actually have.
        let mut s1 = shadow;
        s1.jump_to(state_array_offset.to_usize())?;
        let states_len = subtable_size
            .checked_sub(state_array_offset.to_usize())
            .ok_or(ReadError::InvalidStateMachine)?
            .min(s1.remaining());
        let states = s1.read_bytes(states_len)?;

        let mut s2 = shadow;
        s2.jump_to(entry_table_offset.to_usize())?;
        let entries_count = subtable_size
            .checked_sub(entry_table_offset.to_usize())
            .ok_or(ReadError::InvalidStateMachine)?
            .min(s2.remaining())
            / 4;
        let mut entries = Vec::with_capacity(entries_count);
        for _ in 0..entries_count {
            let new_state = s2.read::<u16>()?;
            s2.read::<u16>()?; // flags
            entries.push(StateEntry { new_state });
        }

        detect_number_of_entries(
            p,
            i64::from(number_of_classes),
            state_array_offset.to_usize() as i64,
            states,
            &entries,
        )?
    };

    p.pad_to(start + class_table_offset.to_usize())?;
    p.begin_group("Class Subtable");
    p.read::<GlyphId>("First glyph")?;
    let number_of_glyphs = p.read::<u16>("Number of glyphs")?;
    p.read_array::<u8>("Classes", number_of_glyphs as usize)?;
    p.end_group();

    p.pad_to(start + state_array_offset.to_usize())?;
    // The entry table is assumed to sit right after the state array.
    let rows = (entry_table_offset.to_usize() - state_array_offset.to_usize())
        / usize::from(number_of_classes.max(1));
    p.read_array_with("State Array", rows, |p, _| {
        p.read_bytes(usize::from(number_of_classes), "Data").map(|_| ())
    })?;

    p.pad_to(start + entry_table_offset.to_usize())?;
    p.read_array_with("Entries", number_of_entries, |p, n| {
        p.begin_group_nth(n);
        p.read::<Offset16>("State offset")?;
        p.read::<EntryFlags>("Flags")?;
        p.end_group();
        Ok(())
    })?;

    p.pad_to(start + values_offset.to_usize())?;
    let number_of_actions = (subtable_size.saturating_sub(8))
        .saturating_sub(p.offset() - start)
        / 2;
    p.read_array::<Action>("Actions", number_of_actions)
}

fn detect_number_of_classes(offset: usize, shadow: &Cursor) -> Result<usize, ReadError> {
    let mut cursor = *shadow;
    cursor.jump_to(offset)?;
    cursor.read::<GlyphId>()?;
    let count = cursor.read::<u16>()?;
    let mut classes: Vec<u16> = Vec::with_capacity(count as usize);
    for _ in 0..count {
        classes.push(cursor.read::<u16>()?);
    }
    classes.sort_unstable();
    classes.dedup();
    Ok(classes.len())
}

fn parse_format2(p: &mut Parser, subtable_start: usize) -> Result<(), ReadError> {
    let shadow = p.shadow();
    let header_size = p.offset() - subtable_start;

    p.read::<u16>("Row width in bytes")?;

    let left_offset = p.read::<Offset16>("Offset to left-hand class table")?;
    let right_offset = p.read::<Offset16>("Offset to right-hand class table")?;
    let array_offset = p.read::<Offset16>("Offset to kerning array")?;

    // The offsets are from the subtable start; the shadow sits just past
    // the header.
    let rows = detect_number_of_classes(
        left_offset
            .to_usize()
            .checked_sub(header_size)
            .ok_or(ReadError::OutOfBounds)?,
        &shadow,
    )?;
    let columns = detect_number_of_classes(
        right_offset
            .to_usize()
            .checked_sub(header_size)
            .ok_or(ReadError::OutOfBounds)?,
        &shadow,
    )?;

    #[derive(Clone, Copy, PartialEq)]
    enum Subtable {
        LeftHand,
        RightHand,
        Array,
    }

    let mut subtables = [
        (Subtable::LeftHand, left_offset.to_usize()),
        (Subtable::RightHand, right_offset.to_usize()),
        (Subtable::Array, array_offset.to_usize()),
    ];
    subtables.sort_by_key(|&(_, offset)| offset);

    for (kind, offset) in subtables {
        if offset == 0 {
            continue;
        }
        p.advance_to(subtable_start + offset)?;
        match kind {
            Subtable::LeftHand | Subtable::RightHand => {
                p.begin_group(if kind == Subtable::LeftHand {
                    "Left-hand Class Table"
                } else {
                    "Right-hand Class Table"
                });
                p.read::<GlyphId>("First glyph")?;
                let count = p.read::<u16>("Number of glyphs")?;
                p.read_array::<u16>("Classes", count as usize)?;
                p.end_group();
            }
            Subtable::Array => {
                p.read_array::<i16>("Kerning Values", rows * columns)?;
            }
        }
    }
    Ok(())
}

fn parse_format3(
    p: &mut Parser,
    subtable_start: usize,
    subtable_size: usize,
) -> Result<(), ReadError> {
    let glyph_count = p.read::<u16>("Number of glyphs")?;
    let kern_values = p.read::<u8>("Number of kerning values")?;
    let left_classes = p.read::<u8>("Number of left-hand classes")?;
    let right_classes = p.read::<u8>("Number of right-hand classes")?;
    p.read::<u8>("Reserved")?;

    p.read_array::<i16>("Kerning Values", usize::from(kern_values))?;
    p.read_array::<u8>("Left-hand Classes", usize::from(glyph_count))?;
    p.read_array::<u8>("Right-hand Classes", usize::from(glyph_count))?;
    p.read_array::<u8>("Indices", usize::from(left_classes) * usize::from(right_classes))?;

    let left = subtable_size.saturating_sub(p.offset() - subtable_start);
    p.read_padding(left)
}

// https://docs.microsoft.com/en-us/typography/opentype/spec/kern
fn parse_opentype(p: &mut Parser) -> Result<(), ReadError> {
    p.read::<u16>("Version")?;
    let number_of_tables = p.read::<u16>("Number of tables")?;
    p.read_array_with("Subtables", number_of_tables as usize, |p, n| {
        let subtable_start = p.offset();

        p.begin_group_nth(n);
        p.read::<u16>("Version")?;
        p.read::<u16>("Length")?;
        let format = p.read::<u8>("Format")?;
        p.read::<OpenTypeCoverage>("Coverage")?;

        match format {
            0 => parse_format0(p)?,
            2 => parse_format2(p, subtable_start)?,
            _ => return Err(ReadError::MalformedData("invalid subtable format")),
        }

        p.end_group_valued(format!("Format {format}"));
        Ok(())
    })
}

// https://developer.apple.com/fonts/TrueType-Reference-Manual/RM06/Chap6kern.html
fn parse_apple(p: &mut Parser) -> Result<(), ReadError> {
    p.read::<Fixed>("Version")?;
    let number_of_tables = p.read::<u32>("Number of tables")?;
    p.read_array_with("Subtables", number_of_tables as usize, |p, n| {
        let subtable_start = p.offset();

        p.begin_group_nth(n);
        let length = p.read::<u32>("Length")? as usize;
        // The coverage and format order is inverted relative to OpenType.
        p.read::<AppleCoverage>("Coverage")?;
        let format = p.read::<u8>("Format")?;
        p.read::<u16>("Tuple index")?;

        match format {
            0 => parse_format0(p)?,
            1 => parse_format1(p, length)?,
            2 => parse_format2(p, subtable_start)?,
            3 => parse_format3(p, subtable_start, length)?,
            _ => return Err(ReadError::MalformedData("invalid subtable format")),
        }

        p.end_group_valued(format!("Format {format}"));
        Ok(())
    })
}

pub(crate) fn parse(p: &mut Parser) -> Result<(), ReadError> {
    // There is no robust way to tell the dialects apart. The OpenType header
    // starts with a 16-bit version of zero; the Apple one with a Fixed 1.0,
    // whose first two bytes are 0x0001.
    if p.peek::<u16>()? == 0 {
        parse_opentype(p)
    } else {
        parse_apple(p)
    }
}

#[cfg(test)]
mod tests {
    use inspect_test_data::bebuffer::BeBuffer;

    use crate::font_data::FontData;
    use crate::parser::Parser;

    // The fonttools kern version 0 format 0 example: three kerning pairs.
    fn ot_format0() -> Vec<u8> {
        BeBuffer::new()
            .extend([0u16, 1]) // version, one subtable
            .extend([0u16, 32]) // subtable version, length
            .extend([0u8, 1]) // format 0, horizontal coverage
            .extend([3u16, 12, 1, 6]) // nPairs + search fields
            .extend([4u16, 12])
            .push(-40i16)
            .extend([4u16, 28])
            .push(40i16)
            .extend([5u16, 40])
            .push(-50i16)
            .into_vec()
    }

    #[test]
    fn opentype_format0() {
        let body = ot_format0();
        let mut p = Parser::new(FontData::new(&body));
        super::parse(&mut p).unwrap();
        assert_eq!(p.offset(), body.len());
        let (tree, _) = p.finish();
        let subtables = tree.child_at(tree.root_id(), 2).unwrap();
        let subtable = tree.child_at(subtables, 0).unwrap();
        assert_eq!(tree.value(subtable), "Format 0");
        let pairs = tree.child_at(subtable, 4).unwrap();
        assert_eq!(tree.children_count(pairs), 3);
    }

    #[test]
    fn apple_format0() {
        let body = BeBuffer::new()
            .push(0x00010000u32) // version 1.0
            .push(1u32) // one subtable
            .push(22u32) // length
            .push(0u8) // coverage
            .push(0u8) // format
            .push(0u16) // tuple index
            .extend([1u16, 1, 0, 1]) // one pair + search fields
            .extend([4u16, 12])
            .push(-40i16)
            .into_vec();
        let mut p = Parser::new(FontData::new(&body));
        super::parse(&mut p).unwrap();
        assert_eq!(p.offset(), body.len());
    }

    #[test]
    fn apple_format1_state_machine() {
        // A tiny two-class machine: one state row, one entry, two actions.
        let body = BeBuffer::new()
            .push(0x00010000u32)
            .push(1u32)
            .push(34u32) // subtable length
            .push(0u8)
            .push(1u8) // format 1
            .push(0u16)
            // State table header, offsets relative to here.
            .push(2u16) // two classes
            .push(10u16) // class subtable
            .push(16u16) // state array
            .push(18u16) // entry table
            .push(22u16) // values
            // Class subtable at +10: first glyph 1, two glyphs.
            .extend([1u16, 2])
            .extend([0u8, 1])
            // State array at +16: one row of two classes.
            .extend([0u8, 0])
            // Entry table at +18: one entry, next state at the row start.
            .push(16u16) // state offset
            .push(0x8000u16) // push flag
            // Values at +22: two actions.
            .extend([0x0001u16, 0x8001])
            .into_vec();
        let mut p = Parser::new(FontData::new(&body));
        super::parse(&mut p).unwrap();
        assert_eq!(p.offset(), body.len());
        let (tree, _) = p.finish();
        let subtables = tree.child_at(tree.root_id(), 2).unwrap();
        let subtable = tree.child_at(subtables, 0).unwrap();
        assert_eq!(tree.value(subtable), "Format 1");
    }
}
