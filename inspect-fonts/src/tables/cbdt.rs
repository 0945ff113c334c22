//! The bitmap data tables: [CBDT](https://docs.microsoft.com/en-us/typography/opentype/spec/cbdt),
//! `EBDT` and the AAT `bdat`.
//!
//! The data table is an opaque byte pool; the glyph slices come from the
//! companion location table, collected ahead of time by
//! [`cblc::collect_locations`](super::cblc::collect_locations).

use sfnt_types::GlyphId;

use crate::error::ReadError;
use crate::parser::Parser;
use crate::tables::cblc::{
    parse_sbit_big_glyph_metrics, parse_sbit_small_glyph_metrics, BitmapLocation,
};

pub(crate) fn parse(p: &mut Parser, locations: &[BitmapLocation]) -> Result<(), ReadError> {
    let start = p.offset();

    let major_version = p.read::<u16>("Major version")?;
    let minor_version = p.read::<u16>("Minor version")?;
    if !((major_version == 2 || major_version == 3) && minor_version == 0) {
        return Err(ReadError::InvalidVersion);
    }

    for location in locations {
        p.jump_to(start + location.range.start)?;
        p.begin_group(format!("Bitmap Format {}", location.image_format));

        let size = location.range.len();
        match location.image_format {
            1 => {
                parse_sbit_small_glyph_metrics(p)?;
                p.read_bytes(size.saturating_sub(5), "Byte-aligned bitmap data")?;
            }
            2 => {
                parse_sbit_small_glyph_metrics(p)?;
                p.read_bytes(size.saturating_sub(5), "Bit-aligned bitmap data")?;
            }
            5 => {
                p.read_bytes(size, "Bit-aligned bitmap data")?;
            }
            6 => {
                parse_sbit_big_glyph_metrics(p)?;
                p.read_bytes(size.saturating_sub(8), "Byte-aligned bitmap data")?;
            }
            7 => {
                parse_sbit_big_glyph_metrics(p)?;
                p.read_bytes(size.saturating_sub(8), "Bit-aligned bitmap data")?;
            }
            8 => {
                parse_sbit_small_glyph_metrics(p)?;
                p.read::<u8>("Pad")?;
                let count = p.read::<u16>("Number of components")?;
                for _ in 0..count {
                    parse_component(p)?;
                }
            }
            9 => {
                parse_sbit_big_glyph_metrics(p)?;
                let count = p.read::<u16>("Number of components")?;
                for _ in 0..count {
                    parse_component(p)?;
                }
            }
            17 => {
                parse_sbit_small_glyph_metrics(p)?;
                let len = p.read::<u32>("Length of data")?;
                p.read_bytes(len as usize, "Raw PNG data")?;
            }
            18 => {
                parse_sbit_big_glyph_metrics(p)?;
                let len = p.read::<u32>("Length of data")?;
                p.read_bytes(len as usize, "Raw PNG data")?;
            }
            19 => {
                let len = p.read::<u32>("Length of data")?;
                p.read_bytes(len as usize, "Raw PNG data")?;
            }
            _ => {}
        }

        p.end_group();
    }
    Ok(())
}

fn parse_component(p: &mut Parser) -> Result<(), ReadError> {
    p.begin_group("Ebdt component");
    p.read::<GlyphId>("Glyph ID")?;
    p.read::<i8>("X-axis offset")?;
    p.read::<i8>("Y-axis offset")?;
    p.end_group();
    Ok(())
}

#[cfg(test)]
mod tests {
    use inspect_test_data::bebuffer::BeBuffer;

    use crate::font_data::FontData;
    use crate::parser::Parser;
    use crate::tables::cblc::BitmapLocation;

    #[test]
    fn png_slices() {
        let body = BeBuffer::new()
            .extend([3u16, 0]) // version
            // Format 17 glyph at 4: small metrics + length + payload.
            .extend([16u8, 16, 0, 0, 16])
            .push(3u32)
            .extend([1u8, 2, 3])
            .into_vec();
        let locations = [BitmapLocation {
            image_format: 17,
            range: 4..16,
        }];
        let mut p = Parser::new(FontData::new(&body));
        super::parse(&mut p, &locations).unwrap();
        assert_eq!(p.offset(), body.len());
        let (tree, _) = p.finish();
        let glyph = tree.child_at(tree.root_id(), 2).unwrap();
        assert_eq!(tree.title(glyph), "Bitmap Format 17");
        assert_eq!(tree.children_count(glyph), 7);
    }
}
