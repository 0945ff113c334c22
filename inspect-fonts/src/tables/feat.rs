//! The [Feature Name (feat)](https://developer.apple.com/fonts/TrueType-Reference-Manual/RM06/Chap6feat.html) table.

use std::fmt;

use sfnt_types::{Fixed, Offset32};

use crate::error::ReadError;
use crate::parser::{NamesMap, Parser};
use crate::tables::flags_scalar;

struct FeatureFlags(u8);
flags_scalar!(FeatureFlags, u8);

impl fmt::Display for FeatureFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08b}", self.0)?;
        if self.0 & 0x40 != 0 {
            write!(f, "\nBit 6: Next byte is the default setting index")?;
        }
        if self.0 & 0x80 != 0 {
            write!(f, "\nBit 7: Exclusive settings")?;
        }
        Ok(())
    }
}

pub(crate) fn parse(p: &mut Parser, names: &NamesMap) -> Result<(), ReadError> {
    p.read::<Fixed>("Version")?;
    let number_of_features = p.read::<u16>("Number of features")?;
    p.read::<u16>("Reserved")?;
    p.read::<u32>("Reserved")?;

    let mut number_of_settings = 0usize;
    p.read_array_with("Feature Name Array", number_of_features as usize, |p, n| {
        p.begin_group_nth(n);
        p.read::<u16>("Type")?;
        number_of_settings += p.read::<u16>("Number of settings")? as usize;
        p.read::<Offset32>("Offset to setting name array")?;
        p.read::<FeatureFlags>("Flags")?;
        p.read::<u8>("Default setting index")?;
        let name = p.read_name_id("Name ID", names)?;
        p.end_group_valued(name.unwrap_or_default());
        Ok(())
    })?;

    p.read_array_with("Setting Name Array", number_of_settings, |p, n| {
        p.begin_group_nth(n);
        p.read::<u16>("Setting")?;
        let name = p.read_name_id("Name ID", names)?;
        p.end_group_valued(name.unwrap_or_default());
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use inspect_test_data::bebuffer::BeBuffer;

    use crate::font_data::FontData;
    use crate::parser::{NamesMap, Parser};

    #[test]
    fn features_and_settings() {
        let body = BeBuffer::new()
            .push(0x00010000u32) // version
            .push(1u16) // one feature
            .push(0u16)
            .push(0u32)
            // Feature: type 1, two settings.
            .extend([1u16, 2])
            .push(24u32)
            .push(0x80u8) // exclusive
            .push(0u8)
            .push(260u16)
            // Two settings.
            .extend([0u16, 261, 2, 262])
            .into_vec();
        let mut names = NamesMap::default();
        names.insert(260, "Ligatures".to_string());
        let mut p = Parser::new(FontData::new(&body));
        super::parse(&mut p, &names).unwrap();
        assert_eq!(p.offset(), body.len());
        let (tree, _) = p.finish();
        let features = tree.child_at(tree.root_id(), 4).unwrap();
        let feature = tree.child_at(features, 0).unwrap();
        assert_eq!(tree.value(feature), "Ligatures");
        let settings = tree.child_at(tree.root_id(), 5).unwrap();
        assert_eq!(tree.children_count(settings), 2);
    }
}
