//! End-to-end parses of synthetic fonts, plus the structural invariants
//! every parse must uphold.

use inspect_fonts::{parse, NodeId, ParseOutput, ReadError, Tree};
use inspect_test_data::bebuffer::BeBuffer;
use inspect_test_data::{
    head_body, maxp_v05, minimal_ttf, two_face_ttc, OTTO_MAGIC, TT_MAGIC,
};

/// Walk the whole tree and coverage structure, checking the invariants the
/// UI depends on.
fn check_invariants(output: &ParseOutput, file_len: usize) {
    fn walk(tree: &Tree, node: NodeId, file_len: usize) {
        let range = tree.range(node);
        assert!(range.start <= range.end && range.end <= file_len);

        let count = tree.children_count(node);
        if count == 0 {
            return;
        }

        let mut prev_start = 0;
        let mut max_end = 0;
        for row in 0..count {
            let child = tree.child_at(node, row).unwrap();
            let child_range = tree.range(child);
            // Children are ordered by start offset.
            assert!(child_range.start >= prev_start);
            prev_start = child_range.start;
            max_end = max_end.max(child_range.end);
            assert_eq!(tree.parent(child), Some(node));
            assert_eq!(tree.child_index(child), row);
            walk(tree, child, file_len);
        }

        let first = tree.range(tree.child_at(node, 0).unwrap());
        assert_eq!(range.start, first.start, "group start == first child start");
        assert_eq!(range.end, max_end, "group end == max child end");
    }

    walk(&output.tree, output.tree.root_id(), file_len);

    let offsets = output.coverage.offsets();
    assert!(offsets.windows(2).all(|pair| pair[0] < pair[1]));
    assert_eq!(offsets.last().copied(), Some(file_len));
    for skipped in output.coverage.unsupported() {
        assert!(offsets.binary_search(skipped).is_ok());
    }

    // Every labeled run start resolves to a node containing it.
    for pair in offsets.windows(2) {
        if output.coverage.unsupported().binary_search(&pair[0]).is_err() {
            let node = output.tree.item_at_byte(pair[0]).expect("labeled byte");
            let range = output.tree.range(node);
            assert!(range.contains(&pair[0]));
        }
    }
}

fn titles_at_root(tree: &Tree) -> Vec<String> {
    let root = tree.root_id();
    (0..tree.children_count(root))
        .map(|row| tree.title(tree.child_at(root, row).unwrap()).to_string())
        .collect()
}

#[test]
fn minimal_truetype() {
    let font = minimal_ttf();
    let output = parse(&font).unwrap();
    assert!(output.warnings.is_empty());
    assert_eq!(
        titles_at_root(&output.tree),
        ["Header", "Table Records", "Maximum Profile Table"]
    );
    check_invariants(&output, font.len());
}

#[test]
fn opentype_magic_parses_identically() {
    let ttf = minimal_ttf();
    let mut otf = ttf.clone();
    otf[..4].copy_from_slice(&OTTO_MAGIC.to_be_bytes());
    let output = parse(&otf).unwrap();
    assert!(output.warnings.is_empty());
    assert_eq!(
        titles_at_root(&output.tree),
        ["Header", "Table Records", "Maximum Profile Table"]
    );
}

#[test]
fn font_collection_tags_faces() {
    let font = two_face_ttc();
    let output = parse(&font).unwrap();
    assert!(output.warnings.is_empty(), "{:?}", output.warnings);
    // The shared maxp is parsed once, tagged with the face that owns it.
    assert_eq!(
        titles_at_root(&output.tree),
        ["Header", "Font", "Font", "Maximum Profile Table (Face 0)"]
    );
    check_invariants(&output, font.len());
}

#[test]
fn missing_dependency_skips_only_the_dependent_table() {
    let font = inspect_test_data::SfntBuilder::new(TT_MAGIC)
        .table(b"head", head_body(0))
        .table(b"glyf", vec![0u8; 12])
        .build();
    let output = parse(&font).unwrap();
    assert_eq!(
        output.warnings,
        ["Failed to parse the 'glyf' table because no 'maxp' table"]
    );
    let titles = titles_at_root(&output.tree);
    assert!(titles.contains(&"Font Header Table".to_string()));
    assert!(!titles.contains(&"Glyph Data Table".to_string()));
    check_invariants(&output, font.len());
}

#[test]
fn truncated_hmtx_is_reported_and_dropped() {
    let hhea = BeBuffer::new()
        .extend([1u16, 0])
        .extend([0i16; 15])
        .push(2u16) // two metrics
        .into_vec();
    let mut font = inspect_test_data::SfntBuilder::new(TT_MAGIC)
        .table(b"maxp", maxp_v05(2))
        .table(b"hhea", hhea)
        .table(b"hmtx", vec![0u8; 8])
        .build();
    // Cut the last metric off the end of the file.
    font.truncate(font.len() - 4);
    let output = parse(&font).unwrap();
    assert_eq!(
        output.warnings,
        ["Failed to parse the 'hmtx' table because read out of bounds"]
    );
    assert!(!titles_at_root(&output.tree).contains(&"Horizontal Metrics Table".to_string()));
    check_invariants(&output, font.len());
}

#[test]
fn composite_glyph_components() {
    let glyf = BeBuffer::new()
        .push(-1i16)
        .extend([0i16, 0, 100, 100])
        // Two components: MORE_COMPONENTS set, then clear.
        .push(0x0022u16)
        .push(1u16)
        .extend([5i8, 6])
        .push(0x0002u16)
        .push(2u16)
        .extend([1i8, 2])
        .into_vec();
    let loca = BeBuffer::new().extend([0u16, glyf.len() as u16 / 2]).into_vec();
    let font = inspect_test_data::SfntBuilder::new(TT_MAGIC)
        .table(b"head", head_body(0))
        .table(b"maxp", maxp_v05(1))
        .table(b"loca", loca)
        .table(b"glyf", glyf)
        .build();
    let output = parse(&font).unwrap();
    assert!(output.warnings.is_empty(), "{:?}", output.warnings);

    let tree = &output.tree;
    let root = tree.root_id();
    let glyf_table = (0..tree.children_count(root))
        .map(|row| tree.child_at(root, row).unwrap())
        .find(|&node| tree.title(node) == "Glyph Data Table")
        .expect("glyf parsed");
    let glyph = tree.child_at(glyf_table, 0).unwrap();
    assert_eq!(tree.title(glyph), "Glyph 0 (composite)");
    let matrices = (0..tree.children_count(glyph))
        .filter(|&row| {
            tree.title(tree.child_at(glyph, row).unwrap())
                .starts_with("Matrix")
        })
        .count();
    assert_eq!(matrices, 2);
    check_invariants(&output, font.len());
}

#[test]
fn trailing_bytes_become_one_unsupported_leaf() {
    let font = minimal_ttf();
    let mut padded = font.clone();
    padded.extend_from_slice(&[0xAB; 100]);

    let plain = parse(&font).unwrap();
    let extended = parse(&padded).unwrap();
    assert!(extended.warnings.is_empty());

    // The recognized portion is unchanged; the junk is one skipped run.
    let mut titles = titles_at_root(&extended.tree);
    assert_eq!(titles.pop().as_deref(), Some("Unsupported"));
    assert_eq!(titles, titles_at_root(&plain.tree));

    let last = extended
        .tree
        .child_at(
            extended.tree.root_id(),
            extended.tree.children_count(extended.tree.root_id()) - 1,
        )
        .unwrap();
    assert_eq!(extended.tree.range(last), font.len()..padded.len());
    assert!(extended
        .coverage
        .unsupported()
        .binary_search(&font.len())
        .is_ok());
    check_invariants(&extended, padded.len());
}

#[test]
fn unknown_magic_is_fatal() {
    // A zero-byte input is "not a font", not an out-of-bounds read.
    let Err(err) = parse(&[]) else {
        panic!("empty input must not parse")
    };
    assert_eq!(err, ReadError::InvalidSfnt(0));

    let Err(err) = parse(b"true_garbage") else {
        panic!("bad magic must not parse")
    };
    assert!(matches!(err, ReadError::InvalidSfnt(_)));
    assert_eq!(err.to_string(), "not a TrueType font");
}

#[test]
fn unknown_tables_are_skipped_whole() {
    let font = inspect_test_data::SfntBuilder::new(TT_MAGIC)
        .table(b"maxp", maxp_v05(0))
        .table(b"zzzz", vec![1u8, 2, 3, 4])
        .build();
    let output = parse(&font).unwrap();
    assert!(output.warnings.is_empty());
    let titles = titles_at_root(&output.tree);
    assert!(titles.contains(&"Unknown Table".to_string()));
    check_invariants(&output, font.len());
}

#[test]
fn parsing_is_deterministic() {
    let font = two_face_ttc();
    let first = parse(&font).unwrap();
    let second = parse(&font).unwrap();
    assert_eq!(first.tree.len(), second.tree.len());
    assert_eq!(first.coverage.offsets(), second.coverage.offsets());
    assert_eq!(first.coverage.unsupported(), second.coverage.unsupported());

    fn compare(a: &Tree, b: &Tree, node_a: NodeId, node_b: NodeId) {
        assert_eq!(a.title(node_a), b.title(node_b));
        assert_eq!(a.value(node_a), b.value(node_b));
        assert_eq!(a.range(node_a), b.range(node_b));
        assert_eq!(a.children_count(node_a), b.children_count(node_b));
        for row in 0..a.children_count(node_a) {
            compare(
                a,
                b,
                a.child_at(node_a, row).unwrap(),
                b.child_at(node_b, row).unwrap(),
            );
        }
    }
    compare(&first.tree, &second.tree, first.tree.root_id(), second.tree.root_id());
}

#[test]
fn item_at_byte_resolves_header_fields() {
    let font = minimal_ttf();
    let output = parse(&font).unwrap();
    // Byte 0 falls in the magic leaf inside the header group.
    let node = output.tree.item_at_byte(0).unwrap();
    assert_eq!(output.tree.title(node), "Magic");
    assert_eq!(output.tree.range(node), 0..4);
    // Byte 12 is the first table record's tag.
    let node = output.tree.item_at_byte(12).unwrap();
    assert_eq!(output.tree.title(node), "Tag");
}
