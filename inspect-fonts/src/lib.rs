//! Structural dissection of font binaries.
//!
//! This crate walks a TrueType or OpenType font (or a `ttcf` collection) and
//! labels every byte it recognizes: the result is a single [`Tree`] whose
//! leaves cover disjoint ranges of the input, plus a [`Coverage`] summary
//! that partitions the file into labeled and skipped runs. Together they are
//! enough to drive a hex viewer and a structural tree view.
//!
//! The parser is strictly an inspector. It does not validate fonts beyond
//! what parsing requires, does not render glyphs, and never rewrites bytes.
//! Malformed tables are contained: a table that fails to parse is dropped
//! from the tree and reported as a warning, and parsing continues with the
//! next table.
//!
//! # Example
//!
//! ```no_run
//! # let path_to_my_font_file = std::path::Path::new("");
//! let font_bytes = std::fs::read(path_to_my_font_file).unwrap();
//! let output = inspect_fonts::parse(&font_bytes).expect("not a font file");
//! let tree = &output.tree;
//! let root = tree.root_id();
//! for row in 0..tree.children_count(root) {
//!     let table = tree.child_at(root, row).unwrap();
//!     println!("{} {:?}", tree.title(table), tree.range(table));
//! }
//! ```

mod coverage;
mod error;
mod font_data;
mod parser;
mod tables;
mod tree;

use sfnt_types::{NullableOffset32, Offset32, Tag};

pub use coverage::Coverage;
pub use error::ReadError;
pub use tree::{NodeId, Tree};

/// Public re-export of the scalar types crate.
pub use sfnt_types as types;

use font_data::{Cursor, FontData};
use parser::{NamesMap, Parser};
use tables::cblc::BitmapLocation;

const TT_SFNT_VERSION: u32 = 0x00010000;
const CFF_SFNT_VERSION: u32 = 0x4F54544F;
const TTC_HEADER: u32 = 0x74746366;

/// The result of parsing a font file.
pub struct ParseOutput {
    /// The hierarchical description of the file.
    pub tree: Tree,
    /// Human-readable reports for tables that failed to parse.
    pub warnings: Vec<String>,
    /// The labeled/skipped byte-run summary.
    pub coverage: Coverage,
}

/// A table directory entry, tagged with the face it belongs to.
#[derive(Clone, Debug)]
struct FontTable {
    face_index: u32,
    tag: Tag,
    offset: usize,
    length: usize,
}

/// Cross-table values prefetched per face before any table is parsed.
///
/// Each field is best-effort: `None` means the providing table is absent or
/// unreadable, and the error surfaces only if a dependent table is parsed.
#[derive(Default)]
struct FaceData {
    num_glyphs: Option<u16>,
    index_to_loc_format: Option<u16>,
    num_h_metrics: Option<u16>,
    num_v_metrics: Option<u16>,
    loca_offsets: Option<Vec<u32>>,
    names: NamesMap,
    bloc: Option<Vec<BitmapLocation>>,
    eblc: Option<Vec<BitmapLocation>>,
    cblc: Option<Vec<BitmapLocation>>,
}

/// Parse a font binary into a labeled tree.
///
/// The only fatal error is an unrecognized magic in the first four bytes;
/// everything else degrades into warnings and skipped byte runs.
pub fn parse(data: &[u8]) -> Result<ParseOutput, ReadError> {
    let data = FontData::new(data);
    let mut parser = Parser::new(data);

    let magic = match parser.peek::<u32>() {
        Ok(magic) => magic,
        Err(_) => return Err(ReadError::InvalidSfnt(0)),
    };

    let mut tables = Vec::new();
    let mut face_count = 1u32;

    match magic {
        TT_SFNT_VERSION | CFF_SFNT_VERSION => {
            parse_font_header(&mut parser, 0, &mut tables)?;
        }
        TTC_HEADER => {
            parser.begin_group("Header");
            parser.read_with_value::<u32>("Magic", "Font Collection")?;
            let major_version = parser.read::<u16>("Major version")?;
            parser.read::<u16>("Minor version")?;
            let num_fonts = parser.read::<u32>("Number of fonts")?;

            let mut offsets = Vec::new();
            parser.read_array_with("Offsets", num_fonts as usize, |p, n| {
                offsets.push(p.read_nth::<Offset32>(n)?.to_usize());
                Ok(())
            })?;
            offsets.sort_unstable();
            offsets.dedup();

            if major_version == 2 {
                parser.read::<Tag>("DSIG tag")?;
                parser.read::<u32>("DSIG table length")?;
                parser.read::<NullableOffset32>("DSIG table offset")?;
            }
            parser.end_group();

            face_count = offsets.len() as u32;
            for (index, offset) in offsets.into_iter().enumerate() {
                parser.advance_to(offset)?;
                parser.begin_group_indexed("Font", index as u32);
                parse_font_header(&mut parser, index as u32, &mut tables)?;
                parser.end_group();
            }
        }
        other => return Err(ReadError::InvalidSfnt(other)),
    }

    tables.sort_by_key(|table| table.offset);

    let faces: Vec<FaceData> = (0..face_count)
        .map(|face| FaceData::collect(data, &tables, face))
        .collect();

    let warnings = parse_tables(&mut parser, &tables, &faces, face_count);

    let (tree, coverage) = parser.finish();
    Ok(ParseOutput {
        tree,
        warnings,
        coverage,
    })
}

fn parse_font_header(
    parser: &mut Parser,
    face_index: u32,
    tables: &mut Vec<FontTable>,
) -> Result<(), ReadError> {
    parser.begin_group("Header");
    let magic = parser.peek::<u32>()?;
    let label = match magic {
        TT_SFNT_VERSION => "TrueType",
        CFF_SFNT_VERSION => "OpenType",
        other => return Err(ReadError::InvalidSfnt(other)),
    };
    parser.read_with_value::<u32>("Magic", label)?;
    let num_tables = parser.read::<u16>("Number of tables")?;
    parser.read::<u16>("Search range")?;
    parser.read::<u16>("Entry selector")?;
    parser.read::<u16>("Range shift")?;
    parser.end_group();

    parser.read_array_with("Table Records", num_tables as usize, |p, n| {
        p.begin_group_nth(n);
        let tag = p.read::<Tag>("Tag")?;
        p.read::<u32>("Checksum")?;
        let offset = p.read::<Offset32>("Offset")?;
        let length = p.read::<u32>("Length")?;
        p.end_group_titled_valued(table_name(tag), tag.to_string());

        if length != 0 {
            tables.push(FontTable {
                face_index,
                tag,
                offset: offset.to_usize(),
                length: length as usize,
            });
        }
        Ok(())
    })
}

fn parse_tables(
    parser: &mut Parser,
    tables: &[FontTable],
    faces: &[FaceData],
    face_count: u32,
) -> Vec<String> {
    let mut warnings = Vec::new();
    // Multiple records can point at the same bytes, mainly in collections;
    // the first record at an offset wins.
    let mut processed_offsets = Vec::new();

    for table in tables {
        if table.offset < parser.offset() {
            continue;
        }
        if processed_offsets.contains(&table.offset) {
            continue;
        }
        processed_offsets.push(table.offset);

        let face = &faces[table.face_index as usize];
        let end = table
            .offset
            .saturating_add(table.length)
            .min(parser.data_len());
        // Tables are padded to a 4-byte boundary.
        let aligned_len = (table.length + 3) & !3;
        let aligned_end = table
            .offset
            .saturating_add(aligned_len)
            .min(parser.data_len());

        let mark = parser.checkpoint();
        let result = (|| -> Result<(), ReadError> {
            parser.advance_to(table.offset)?;
            if face_count > 1 {
                parser.begin_group_with_value(
                    format!("{} (Face {})", table_name(table.tag), table.face_index),
                    table.tag.to_string(),
                );
            } else {
                parser.begin_group_with_value(table_name(table.tag), table.tag.to_string());
            }
            dispatch(parser, table, face)?;
            // Parsers may legitimately stop short of the declared length, or
            // chase subtable offsets past it; only pad forward.
            parser.pad_to(end.max(parser.offset()))?;
            parser.pad_to(aligned_end.max(parser.offset()))?;
            parser.end_group();
            Ok(())
        })();

        if let Err(reason) = result {
            parser.undo_to(mark);
            log::warn!("discarding '{}' table: {reason}", table.tag);
            warnings.push(format!(
                "Failed to parse the '{}' table because {reason}",
                table.tag
            ));
            // Keep the byte accounting whole: the entire span of the failed
            // table reads as one skipped run.
            let _ = parser.advance_to(aligned_end);
        }
    }

    warnings
}

fn dispatch(parser: &mut Parser, table: &FontTable, face: &FaceData) -> Result<(), ReadError> {
    let num_glyphs = || {
        face.num_glyphs
            .ok_or(ReadError::TableIsMissing(Tag::new(b"maxp")))
    };

    match &table.tag.into_bytes() {
        b"ankr" => tables::ankr::parse(parser, num_glyphs()?),
        b"avar" => tables::avar::parse(parser),
        b"bdat" => {
            let locations = face
                .bloc
                .as_ref()
                .ok_or(ReadError::TableIsMissing(Tag::new(b"bloc")))?;
            tables::cbdt::parse(parser, locations)
        }
        b"bloc" => tables::cblc::parse(parser),
        b"CBDT" => {
            let locations = face
                .cblc
                .as_ref()
                .ok_or(ReadError::TableIsMissing(Tag::new(b"CBLC")))?;
            tables::cbdt::parse(parser, locations)
        }
        b"CBLC" => tables::cblc::parse(parser),
        b"CFF " => tables::cff::parse(parser),
        b"CFF2" => tables::cff2::parse(parser),
        b"cmap" => tables::cmap::parse(parser),
        b"cvt " => parser.read_array::<i16>("Values", table.length / 2),
        b"EBDT" => {
            let locations = face
                .eblc
                .as_ref()
                .ok_or(ReadError::TableIsMissing(Tag::new(b"EBLC")))?;
            tables::cbdt::parse(parser, locations)
        }
        b"EBLC" => tables::cblc::parse(parser),
        b"feat" => tables::feat::parse(parser, &face.names),
        b"fpgm" | b"prep" => parser.read_bytes(table.length, "Instructions").map(|_| ()),
        b"fvar" => tables::fvar::parse(parser, &face.names),
        b"GDEF" => tables::gdef::parse(parser),
        b"glyf" => {
            let num_glyphs = num_glyphs()?;
            face.index_to_loc_format
                .ok_or(ReadError::TableIsMissing(Tag::new(b"head")))?;
            let loca = face
                .loca_offsets
                .as_deref()
                .ok_or(ReadError::TableIsMissing(Tag::new(b"loca")))?;
            tables::glyf::parse(parser, num_glyphs, loca)
        }
        b"gvar" => tables::gvar::parse(parser),
        b"head" => tables::head::parse(parser),
        b"hhea" => tables::hhea::parse(parser),
        b"hmtx" => {
            let num_metrics = face
                .num_h_metrics
                .ok_or(ReadError::TableIsMissing(Tag::new(b"hhea")))?;
            tables::hmtx::parse(parser, num_metrics, num_glyphs()?)
        }
        b"HVAR" => tables::hvar::parse(parser),
        b"kern" => tables::kern::parse(parser),
        b"loca" => {
            let format = face
                .index_to_loc_format
                .ok_or(ReadError::TableIsMissing(Tag::new(b"head")))?;
            tables::loca::parse(parser, num_glyphs()?, format)
        }
        b"maxp" => tables::maxp::parse(parser),
        b"MVAR" => tables::mvar::parse(parser),
        b"name" => tables::name::parse(parser),
        b"OS/2" => tables::os2::parse(parser),
        b"post" => tables::post::parse(parser),
        b"sbix" => tables::sbix::parse(parser, num_glyphs()?),
        b"STAT" => tables::stat::parse(parser, &face.names),
        b"SVG " => tables::svg::parse(parser),
        b"trak" => tables::trak::parse(parser, &face.names),
        b"vhea" => tables::vhea::parse(parser),
        b"vmtx" => {
            let num_metrics = face
                .num_v_metrics
                .ok_or(ReadError::TableIsMissing(Tag::new(b"vhea")))?;
            tables::vmtx::parse(parser, num_metrics, num_glyphs()?)
        }
        b"VORG" => tables::vorg::parse(parser),
        b"VVAR" => tables::vvar::parse(parser),
        _ => {
            let len = table.length.min(parser.remaining());
            parser.read_unsupported(len)
        }
    }
}

impl FaceData {
    fn collect(data: FontData, tables: &[FontTable], face_index: u32) -> FaceData {
        let find = |tag: &[u8; 4]| {
            tables
                .iter()
                .find(|table| table.face_index == face_index && table.tag == tag)
        };
        let cursor_at = |offset: usize| -> Result<Cursor, ReadError> {
            let mut cursor = Cursor::new(data);
            cursor.jump_to(offset)?;
            Ok(cursor.shadow())
        };

        let mut face = FaceData::default();

        if let Some(table) = find(b"maxp") {
            face.num_glyphs = data.read_at(table.offset + 4).ok();
        }
        if let Some(table) = find(b"head") {
            face.index_to_loc_format = data.read_at(table.offset + 50).ok();
        }
        if let Some(table) = find(b"hhea") {
            face.num_h_metrics = data.read_at(table.offset + 34).ok();
        }
        if let Some(table) = find(b"vhea") {
            face.num_v_metrics = data.read_at(table.offset + 34).ok();
        }
        if let (Some(table), Some(num_glyphs), Some(format)) =
            (find(b"loca"), face.num_glyphs, face.index_to_loc_format)
        {
            face.loca_offsets = cursor_at(table.offset)
                .and_then(|cursor| tables::loca::collect_offsets(cursor, num_glyphs, format))
                .ok();
        }
        if let Some(table) = find(b"name") {
            face.names = cursor_at(table.offset)
                .and_then(tables::name::collect_names)
                .unwrap_or_default();
        }
        for (tag, slot) in [
            (b"bloc", &mut face.bloc),
            (b"EBLC", &mut face.eblc),
            (b"CBLC", &mut face.cblc),
        ] {
            if let Some(table) = find(tag) {
                *slot = cursor_at(table.offset)
                    .and_then(tables::cblc::collect_locations)
                    .ok();
            }
        }

        face
    }
}

fn table_name(tag: Tag) -> &'static str {
    match &tag.into_bytes() {
        b"acnt" => "Accent Attachment Table",
        b"ankr" => "Anchor Point Table",
        b"avar" => "Axis Variations Table",
        b"BASE" => "Baseline Table",
        b"bdat" => "Bitmap Data Table",
        b"bhed" => "Bitmap Font Header Table",
        b"bloc" => "Bitmap Location Table",
        b"bsln" => "Baseline Table",
        b"CBDT" => "Color Bitmap Data Table",
        b"CBLC" => "Color Bitmap Location Table",
        b"CFF " => "Compact Font Format Table",
        b"CFF2" => "Compact Font Format 2 Table",
        b"cmap" => "Character to Glyph Index Mapping Table",
        b"COLR" => "Color Table",
        b"CPAL" => "Color Palette Table",
        b"cvar" => "CVT Variations Table",
        b"cvt " => "Control Value Table",
        b"DSIG" => "Digital Signature Table",
        b"EBDT" => "Embedded Bitmap Data Table",
        b"EBLC" => "Embedded Bitmap Location Table",
        b"EBSC" => "Embedded Bitmap Scaling Table",
        b"fdsc" => "Font Descriptors Table",
        b"feat" => "Feature Name Table",
        b"fmtx" => "Font Metrics Table",
        b"fpgm" => "Font Program Table",
        b"fvar" => "Font Variations Table",
        b"gasp" => "Grid-fitting and Scan-conversion Procedure Table",
        b"gcid" => "Character to CID Table",
        b"GDEF" => "Glyph Definition Table",
        b"glyf" => "Glyph Data Table",
        b"GPOS" => "Glyph Positioning Table",
        b"GSUB" => "Glyph Substitution Table",
        b"gvar" => "Glyph Variations Table",
        b"hdmx" => "Horizontal Device Metrics",
        b"head" => "Font Header Table",
        b"hhea" => "Horizontal Header Table",
        b"hmtx" => "Horizontal Metrics Table",
        b"HVAR" => "Horizontal Metrics Variations Table",
        b"JSTF" => "Justification Table",
        b"just" => "Justification Table",
        b"kern" => "Kerning Table",
        b"kerx" => "Extended Kerning Table",
        b"lcar" => "Ligature Caret Table",
        b"loca" => "Index to Location Table",
        b"ltag" => "IETF Language Tags Table",
        b"LTSH" => "Linear Threshold Table",
        b"MATH" => "The Mathematical Typesetting Table",
        b"maxp" => "Maximum Profile Table",
        b"MERG" => "Merge Table",
        b"meta" => "Metadata Table",
        b"mort" => "Glyph Metamorphosis Table",
        b"morx" => "Extended Glyph Metamorphosis Table",
        b"MVAR" => "Metrics Variations Table",
        b"name" => "Naming Table",
        b"opbd" => "Optical Bounds Table",
        b"OS/2" => "OS/2 and Windows Metrics Table",
        b"PCLT" => "PCL 5 Table",
        b"post" => "PostScript Table",
        b"prep" => "Control Value Program",
        b"prop" => "Glyph Properties Table",
        b"sbix" => "Standard Bitmap Graphics Table",
        b"STAT" => "Style Attributes Table",
        b"SVG " => "Scalable Vector Graphics Table",
        b"trak" => "Tracking Table",
        b"VDMX" => "Vertical Device Metrics",
        b"vhea" => "Vertical Header Table",
        b"vmtx" => "Vertical Metrics Table",
        b"VORG" => "Vertical Origin Table",
        b"VVAR" => "Vertical Metrics Variations Table",
        b"Zapf" => "Glyph Information Table",
        _ => "Unknown Table",
    }
}
