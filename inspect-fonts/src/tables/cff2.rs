//! The [Compact Font Format 2 (CFF2)](https://docs.microsoft.com/en-us/typography/opentype/spec/cff2) table.
//!
//! CFF2 reuses the INDEX/DICT/charstring machinery from [`cff`](super::cff)
//! with a wider INDEX count, its own operator vocabulary, and a variation
//! store block in place of charset/encoding.

use crate::error::ReadError;
use crate::parser::Parser;
use crate::tables::cff::{dict_op, parse_charstring, parse_dict, parse_index, Flavor};
use crate::tables::variations;

pub(crate) fn parse(p: &mut Parser) -> Result<(), ReadError> {
    let table_start = p.offset();

    p.begin_group("Header");
    p.read::<u8>("Major version")?;
    p.read::<u8>("Minor version")?;
    let header_size = p.read::<u8>("Header size")?;
    let top_dict_size = p.read::<u16>("Length of Top DICT")?;
    p.end_group();

    match usize::from(header_size) {
        size if size > 5 => p.read_padding(size - 5)?,
        5 => {}
        _ => return Err(ReadError::MalformedData("header size is too small")),
    }

    p.begin_group("Top DICT");
    let top_dict = parse_dict(p, top_dict_size as usize, Flavor::Cff2)?;
    p.end_group();

    parse_index(p, "Global Subr INDEX", "Subrs", true, &mut |p, len, n| {
        parse_charstring(p, len, n, Flavor::Cff2)
    })?;

    if let Some(offset) = top_dict.offset_operand(dict_op::VSTORE)? {
        p.jump_to(table_start + offset)?;
        p.begin_group("Variation Store");
        p.read::<u16>("Variation Store size")?;
        variations::parse_item_variation_store(p)?;
        p.end_group();
    }

    if let Some(offset) = top_dict.offset_operand(dict_op::CHAR_STRINGS)? {
        p.jump_to(table_start + offset)?;
        parse_index(p, "CharStrings INDEX", "CharStrings", true, &mut |p, len, n| {
            parse_charstring(p, len, n, Flavor::Cff2)
        })?;
    }

    // Private DICT ranges referenced by the Font DICT INDEX.
    let mut private_dicts: Vec<(usize, usize)> = Vec::new();
    if let Some(offset) = top_dict.offset_operand(dict_op::FD_ARRAY)? {
        p.jump_to(table_start + offset)?;
        let mut collected = Vec::new();
        parse_index(p, "Font DICT INDEX", "Values", true, &mut |p, len, n| {
            p.begin_group_indexed("DICT", n);
            let dict = parse_dict(p, len, Flavor::Cff2)?;
            p.end_group();

            if let Some(operands) = dict.operands(dict_op::PRIVATE) {
                let [size, offset] = operands else {
                    return Err(ReadError::MalformedData("invalid Private DICT operands"));
                };
                if *size < 0.0 || *offset < 0.0 {
                    return Err(ReadError::MalformedData("invalid Private DICT operands"));
                }
                collected.push((*offset as usize, *size as usize));
            }
            Ok(())
        })?;
        private_dicts = collected;
    }

    private_dicts.sort_by_key(|&(offset, _)| offset);

    let mut subrs_offsets = Vec::new();
    for (offset, size) in private_dicts {
        p.jump_to(table_start + offset)?;
        p.begin_group("Private DICT");
        let private_dict = parse_dict(p, size, Flavor::Cff2)?;
        p.end_group();

        // Relative to the start of the Private DICT data.
        if let Some(subrs) = private_dict.offset_operand(dict_op::SUBRS)? {
            subrs_offsets.push(table_start + offset + subrs);
        }
    }

    for offset in subrs_offsets {
        p.jump_to(offset)?;
        parse_index(p, "Local Subr INDEX", "Subrs", true, &mut |p, len, n| {
            parse_charstring(p, len, n, Flavor::Cff2)
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use inspect_test_data::bebuffer::BeBuffer;

    use crate::font_data::FontData;
    use crate::parser::Parser;

    // Header + a top dict addressing a CharStrings INDEX, with an empty
    // global subr INDEX between them.
    fn minimal_cff2() -> Vec<u8> {
        BeBuffer::new()
            // Header: version 2.0, size 5, top dict length 2.
            .extend([2u8, 0, 5])
            .push(2u16)
            // Top DICT at 5: "11 CharStrings".
            .extend([139u8 + 11, 17])
            // Global Subr INDEX at 7: empty (32-bit count).
            .push(0u32)
            // CharStrings INDEX at 11: one program: "1 blend".
            .push(1u32)
            .push(1u8)
            .extend([1u8, 3])
            .extend([140u8, 16])
            .into_vec()
    }

    #[test]
    fn minimal_font_parses() {
        let body = minimal_cff2();
        let mut p = Parser::new(FontData::new(&body));
        super::parse(&mut p).unwrap();
        assert_eq!(p.offset(), body.len());
        let (tree, _) = p.finish();
        let root = tree.root_id();
        // Header, Top DICT, Global Subr INDEX, CharStrings INDEX.
        assert_eq!(tree.children_count(root), 4);
        assert_eq!(tree.title(tree.child_at(root, 3).unwrap()), "CharStrings INDEX");
    }

    #[test]
    fn short_header_fails() {
        let body = BeBuffer::new().extend([2u8, 0, 3]).push(0u16).into_vec();
        let mut p = Parser::new(FontData::new(&body));
        assert!(super::parse(&mut p).is_err());
    }
}
