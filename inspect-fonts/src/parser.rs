//! The recording parser: every read decodes a value and appends a leaf.

use std::collections::HashMap;
use std::ops::Range;

use sfnt_types::{ReadScalar, ValueType};

use crate::coverage::{Coverage, CoverageCheckpoint};
use crate::error::ReadError;
use crate::font_data::{Cursor, FontData};
use crate::tree::{NodeData, NodeId, Title, Tree, TreeCheckpoint};

/// Decoded name strings from the `name` table, keyed by name id.
pub(crate) type NamesMap = HashMap<u16, String>;

/// Soft cap on state-machine steps and packed-data items per parse.
///
/// Malformed fonts can describe unbounded loops (AAT state machines,
/// CFF subroutines, packed deltas); the budget turns those into a
/// recoverable failure instead of a hang.
const DEFAULT_OP_BUDGET: u32 = 0x3FFF_FFFF;

/// A title argument: either a literal or a computed string to intern.
pub(crate) enum TitleRef {
    Static(&'static str),
    Owned(String),
}

impl From<&'static str> for TitleRef {
    fn from(s: &'static str) -> Self {
        TitleRef::Static(s)
    }
}

impl From<String> for TitleRef {
    fn from(s: String) -> Self {
        TitleRef::Owned(s)
    }
}

/// Restores the parser to the state captured by [`Parser::checkpoint`].
#[derive(Clone, Copy, Debug)]
pub(crate) struct Checkpoint {
    tree: TreeCheckpoint,
    coverage: CoverageCheckpoint,
    open: usize,
    pos: usize,
}

/// A byte cursor paired with the output tree.
///
/// Each typed read appends a leaf covering exactly the consumed bytes and
/// records its start offset in the coverage structure, so the finished tree
/// accounts for every byte the parser understood.
pub(crate) struct Parser<'a> {
    data: FontData<'a>,
    pos: usize,
    tree: Tree,
    open: Vec<NodeId>,
    coverage: Coverage,
    budget: u32,
}

impl<'a> Parser<'a> {
    pub fn new(data: FontData<'a>) -> Self {
        let tree = Tree::new(data.len());
        let root = tree.root_id();
        Parser {
            data,
            pos: 0,
            tree,
            open: vec![root],
            coverage: Coverage::default(),
            budget: DEFAULT_OP_BUDGET,
        }
    }

    pub fn offset(&self) -> usize {
        self.pos
    }

    pub fn data_len(&self) -> usize {
        self.data.len()
    }

    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Deduct `ops` from the operation budget.
    pub fn charge(&mut self, ops: u32) -> Result<(), ReadError> {
        self.budget = self
            .budget
            .checked_sub(ops)
            .ok_or(ReadError::BudgetExceeded)?;
        Ok(())
    }

    /// A look-ahead cursor over the remaining bytes; reading through it does
    /// not touch the tree.
    pub fn shadow(&self) -> Cursor<'a> {
        let mut cursor = Cursor::new(self.data);
        // The parser position is always in bounds.
        let _ = cursor.jump_to(self.pos);
        cursor.shadow()
    }

    pub fn jump_to(&mut self, offset: usize) -> Result<(), ReadError> {
        if offset <= self.data.len() {
            self.pos = offset;
            Ok(())
        } else {
            Err(ReadError::OutOfBounds)
        }
    }

    pub fn peek<T: ReadScalar>(&self) -> Result<T, ReadError> {
        self.data.read_at(self.pos)
    }

    pub fn peek_at<T: ReadScalar>(&self, delta: usize) -> Result<T, ReadError> {
        self.data.read_at(self.pos + delta)
    }

    /// Peek at an absolute offset, independent of the current position.
    pub fn peek_abs<T: ReadScalar>(&self, offset: usize) -> Result<T, ReadError> {
        self.data.read_at(offset)
    }

    fn parent(&self) -> NodeId {
        self.open.last().copied().unwrap_or(self.tree.root_id())
    }

    fn make_title(&mut self, title: TitleRef) -> Title {
        match title {
            TitleRef::Static(s) => Title::Static(s),
            TitleRef::Owned(s) => Title::Interned(self.tree.intern(&s)),
        }
    }

    fn add_leaf(
        &mut self,
        title: Title,
        index: Option<u32>,
        value: String,
        value_type: ValueType,
        range: Range<usize>,
    ) {
        let parent = self.parent();
        self.tree.append(
            parent,
            NodeData {
                title,
                index,
                value,
                value_type,
                range,
            },
        );
    }

    fn read_leaf<T: ReadScalar>(
        &mut self,
        title: Title,
        index: Option<u32>,
    ) -> Result<T, ReadError> {
        let value: T = self.data.read_at(self.pos)?;
        let start = self.pos;
        self.pos += T::RAW_BYTE_LEN;
        self.coverage.record(start);
        self.add_leaf(title, index, value.to_string(), T::VALUE_TYPE, start..self.pos);
        Ok(value)
    }

    /// Read a value and append a leaf named `title`.
    pub fn read<T: ReadScalar>(&mut self, title: impl Into<TitleRef>) -> Result<T, ReadError> {
        let title = self.make_title(title.into());
        self.read_leaf(title, None)
    }

    /// Read a value as the `n`th element of an array; the leaf's title is
    /// the decimal index.
    pub fn read_nth<T: ReadScalar>(&mut self, n: u32) -> Result<T, ReadError> {
        let title = Title::Interned(self.tree.index_label(n));
        self.read_leaf(title, Some(n))
    }

    /// Read a value, labeling the leaf with both a title and an index.
    pub fn read_indexed<T: ReadScalar>(
        &mut self,
        title: impl Into<TitleRef>,
        n: u32,
    ) -> Result<T, ReadError> {
        let title = self.make_title(title.into());
        self.read_leaf(title, Some(n))
    }

    /// Read a value but render it with a caller-provided string.
    pub fn read_with_value<T: ReadScalar>(
        &mut self,
        title: impl Into<TitleRef>,
        value: impl Into<String>,
    ) -> Result<T, ReadError> {
        let scalar: T = self.data.read_at(self.pos)?;
        let title = self.make_title(title.into());
        let start = self.pos;
        self.pos += T::RAW_BYTE_LEN;
        self.coverage.record(start);
        self.add_leaf(title, None, value.into(), T::VALUE_TYPE, start..self.pos);
        Ok(scalar)
    }

    /// Append a leaf with an explicit byte length, rendering and type.
    ///
    /// This is the escape hatch for values with no fixed-width scalar form,
    /// like CFF variable-length numbers.
    pub fn read_value_span(
        &mut self,
        len: usize,
        title: impl Into<TitleRef>,
        value: impl Into<String>,
        value_type: ValueType,
    ) -> Result<(), ReadError> {
        let end = self.pos.checked_add(len).ok_or(ReadError::OutOfBounds)?;
        if end > self.data.len() {
            return Err(ReadError::OutOfBounds);
        }
        let title = self.make_title(title.into());
        let start = self.pos;
        self.pos = end;
        self.coverage.record(start);
        self.add_leaf(title, None, value.into(), value_type, start..end);
        Ok(())
    }

    /// Read `len` raw bytes as a leaf of type `Bytes`.
    pub fn read_bytes(
        &mut self,
        len: usize,
        title: impl Into<TitleRef>,
    ) -> Result<&'a [u8], ReadError> {
        let end = self.pos.checked_add(len).ok_or(ReadError::OutOfBounds)?;
        let bytes = self.data.slice(self.pos, end)?;
        if len != 0 {
            let title = self.make_title(title.into());
            let start = self.pos;
            self.coverage.record(start);
            self.add_leaf(title, None, String::new(), ValueType::Bytes, start..end);
        }
        self.pos = end;
        Ok(bytes)
    }

    pub fn read_padding(&mut self, len: usize) -> Result<(), ReadError> {
        self.read_bytes(len, "Padding").map(|_| ())
    }

    /// Skip `len` bytes, labeling them as intentionally unsupported.
    pub fn read_unsupported(&mut self, len: usize) -> Result<(), ReadError> {
        if len == 0 {
            return Ok(());
        }
        let end = self.pos.checked_add(len).ok_or(ReadError::OutOfBounds)?;
        if end > self.data.len() {
            return Err(ReadError::OutOfBounds);
        }
        let start = self.pos;
        self.pos = end;
        self.coverage.record_unsupported(start);
        self.add_leaf(
            Title::Static("Unsupported"),
            None,
            String::new(),
            ValueType::None,
            start..end,
        );
        Ok(())
    }

    /// Advance to `offset`, marking any skipped bytes as unsupported.
    pub fn advance_to(&mut self, offset: usize) -> Result<(), ReadError> {
        if offset < self.pos {
            return Err(ReadError::MalformedData("attempt to advance backward"));
        }
        self.read_unsupported(offset - self.pos)
    }

    /// Advance to `offset`, labeling any skipped bytes as padding.
    pub fn pad_to(&mut self, offset: usize) -> Result<(), ReadError> {
        if offset < self.pos {
            return Err(ReadError::MalformedData("attempt to advance backward"));
        }
        self.read_padding(offset - self.pos)
    }

    pub fn read_utf8_string(
        &mut self,
        title: impl Into<TitleRef>,
        len: usize,
    ) -> Result<String, ReadError> {
        let end = self.pos.checked_add(len).ok_or(ReadError::OutOfBounds)?;
        let bytes = self.data.slice(self.pos, end)?;
        let value = String::from_utf8_lossy(bytes).into_owned();
        if len != 0 {
            let title = self.make_title(title.into());
            let start = self.pos;
            self.coverage.record(start);
            self.add_leaf(title, None, value.clone(), ValueType::String, start..end);
        }
        self.pos = end;
        Ok(value)
    }

    pub fn read_utf16_string(
        &mut self,
        title: impl Into<TitleRef>,
        len: usize,
    ) -> Result<String, ReadError> {
        let end = self.pos.checked_add(len).ok_or(ReadError::OutOfBounds)?;
        let bytes = self.data.slice(self.pos, end)?;
        let mut cursor = Cursor::new(FontData::new(bytes));
        let value = cursor.read_utf16_be(len)?;
        self.string_leaf(title, len, value.clone())?;
        Ok(value)
    }

    pub fn read_mac_roman_string(
        &mut self,
        title: impl Into<TitleRef>,
        len: usize,
    ) -> Result<String, ReadError> {
        let end = self.pos.checked_add(len).ok_or(ReadError::OutOfBounds)?;
        let bytes = self.data.slice(self.pos, end)?;
        let mut cursor = Cursor::new(FontData::new(bytes));
        let value = cursor.read_mac_roman(len)?;
        self.string_leaf(title, len, value.clone())?;
        Ok(value)
    }

    fn string_leaf(
        &mut self,
        title: impl Into<TitleRef>,
        len: usize,
        value: String,
    ) -> Result<(), ReadError> {
        let end = self.pos.checked_add(len).ok_or(ReadError::OutOfBounds)?;
        if end > self.data.len() {
            return Err(ReadError::OutOfBounds);
        }
        if len != 0 {
            let title = self.make_title(title.into());
            let start = self.pos;
            self.coverage.record(start);
            self.add_leaf(title, None, value, ValueType::String, start..end);
        }
        self.pos = end;
        Ok(())
    }

    /// Read a length-prefixed string as a two-leaf group.
    pub fn read_pascal_string(
        &mut self,
        title: impl Into<TitleRef>,
    ) -> Result<String, ReadError> {
        self.begin_group("");
        let len = self.read::<u8>("Length")?;
        let value = if len != 0 {
            self.read_utf8_string("Data", len as usize)?
        } else {
            String::new()
        };
        self.end_group_with(Some(title.into()), Some(value.clone()), Some(ValueType::String));
        Ok(value)
    }

    /// Read a name id, rendered as `<name> (<id>)` when the id resolves.
    pub fn read_name_id(
        &mut self,
        title: impl Into<TitleRef>,
        names: &NamesMap,
    ) -> Result<Option<String>, ReadError> {
        let id = self.peek::<u16>()?;
        match names.get(&id) {
            Some(name) => {
                self.read_with_value::<u16>(title, format!("{name} ({id})"))?;
                Ok(Some(name.clone()))
            }
            None => {
                self.read::<u16>(title)?;
                Ok(None)
            }
        }
    }

    pub fn begin_group(&mut self, title: impl Into<TitleRef>) {
        let title = self.make_title(title.into());
        self.open_node(title, None, String::new());
    }

    pub fn begin_group_with_value(
        &mut self,
        title: impl Into<TitleRef>,
        value: impl Into<String>,
    ) {
        let title = self.make_title(title.into());
        self.open_node(title, None, value.into());
    }

    /// Open a group whose title is its array index.
    pub fn begin_group_nth(&mut self, n: u32) {
        let title = Title::Interned(self.tree.index_label(n));
        self.open_node(title, Some(n), String::new());
    }

    /// Open a titled group that is also the `n`th element of a sequence.
    pub fn begin_group_indexed(&mut self, title: impl Into<TitleRef>, n: u32) {
        let title = self.make_title(title.into());
        self.open_node(title, Some(n), String::new());
    }

    fn open_node(&mut self, title: Title, index: Option<u32>, value: String) {
        let parent = self.parent();
        let id = self.tree.append(
            parent,
            NodeData {
                title,
                index,
                value,
                value_type: ValueType::None,
                // The end offset is filled in by `end_group`.
                range: self.pos..self.pos,
            },
        );
        self.open.push(id);
    }

    pub fn end_group(&mut self) {
        self.end_group_with(None, None, None);
    }

    pub fn end_group_titled(&mut self, title: impl Into<TitleRef>) {
        self.end_group_with(Some(title.into()), None, None);
    }

    pub fn end_group_valued(&mut self, value: impl Into<String>) {
        self.end_group_with(None, Some(value.into()), None);
    }

    pub fn end_group_titled_valued(
        &mut self,
        title: impl Into<TitleRef>,
        value: impl Into<String>,
    ) {
        self.end_group_with(Some(title.into()), Some(value.into()), None);
    }

    /// Close the current group, optionally overriding its title, value, or
    /// type now that the contents are known.
    ///
    /// Overrides only apply to non-empty groups, so a group that consumed no
    /// bytes keeps its placeholder appearance.
    fn end_group_with(
        &mut self,
        title: Option<TitleRef>,
        value: Option<String>,
        value_type: Option<ValueType>,
    ) {
        debug_assert!(self.open.len() > 1, "unbalanced end_group");
        let Some(id) = self.open.pop() else {
            return;
        };
        // An empty override leaves the group as it was opened.
        let title = title.filter(|t| match t {
            TitleRef::Static(s) => !s.is_empty(),
            TitleRef::Owned(s) => !s.is_empty(),
        });
        if self.tree.has_children(id) {
            let title = title.map(|t| self.make_title(t));
            let data = self.tree.data_mut(id);
            if let Some(title) = title {
                data.title = title;
            }
            if let Some(value) = value.filter(|v| !v.is_empty()) {
                data.value = value;
            }
            if let Some(value_type) = value_type {
                data.value_type = value_type;
            }
        }
        self.tree.data_mut(id).range.end = self.pos;
    }

    pub fn begin_array(&mut self, title: impl Into<TitleRef>, count: usize) {
        let value = if count == 1 {
            "1 item".to_string()
        } else {
            format!("{count} items")
        };
        let title = self.make_title(title.into());
        let parent = self.parent();
        let id = self.tree.append(
            parent,
            NodeData {
                title,
                index: None,
                value,
                value_type: ValueType::Array,
                range: self.pos..self.pos,
            },
        );
        self.open.push(id);
    }

    pub fn end_array(&mut self) {
        self.end_group();
    }

    /// Read `count` scalars as an array group with index-titled leaves.
    pub fn read_array<T: ReadScalar>(
        &mut self,
        title: impl Into<TitleRef>,
        count: usize,
    ) -> Result<(), ReadError> {
        self.read_array_with(title, count, |parser, n| {
            parser.read_nth::<T>(n).map(|_: T| ())
        })
    }

    /// Read a `count`-element array, delegating each element to `f`.
    pub fn read_array_with(
        &mut self,
        title: impl Into<TitleRef>,
        count: usize,
        mut f: impl FnMut(&mut Self, u32) -> Result<(), ReadError>,
    ) -> Result<(), ReadError> {
        if count == 0 {
            return Ok(());
        }
        self.begin_array(title, count);
        for n in 0..count {
            f(self, n as u32)?;
        }
        self.end_array();
        Ok(())
    }

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            tree: self.tree.checkpoint(self.parent()),
            coverage: self.coverage.checkpoint(),
            open: self.open.len(),
            pos: self.pos,
        }
    }

    /// Discard every node, offset and open group created after `mark`.
    pub fn undo_to(&mut self, mark: Checkpoint) {
        self.open.truncate(mark.open);
        self.tree.undo_to(mark.tree);
        self.coverage.undo_to(mark.coverage);
        self.pos = mark.pos;
    }

    /// Mark the remaining tail unsupported and seal the coverage structure.
    pub fn finish(mut self) -> (Tree, Coverage) {
        let tail = self.remaining();
        // Both calls are in bounds by construction.
        let _ = self.read_unsupported(tail);
        self.coverage.finish(self.data.len());
        (self.tree, self.coverage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser(bytes: &[u8]) -> Parser<'_> {
        Parser::new(FontData::new(bytes))
    }

    #[test]
    fn reads_append_leaves_and_offsets() {
        let mut p = parser(&[0x00, 0x02, 0xAB, 0xCD]);
        assert_eq!(p.read::<u16>("Count").unwrap(), 2);
        assert_eq!(p.read::<u16>("Value").unwrap(), 0xABCD);
        let (tree, coverage) = p.finish();
        let root = tree.root_id();
        assert_eq!(tree.children_count(root), 2);
        let first = tree.child_at(root, 0).unwrap();
        assert_eq!(tree.title(first), "Count");
        assert_eq!(tree.value(first), "2");
        assert_eq!(tree.range(first), 0..2);
        assert_eq!(coverage.offsets(), &[0, 2, 4]);
    }

    #[test]
    fn group_ranges_span_children() {
        let mut p = parser(&[0; 6]);
        p.begin_group("outer");
        p.read::<u32>("a").unwrap();
        p.read::<u16>("b").unwrap();
        p.end_group();
        let (tree, _) = p.finish();
        let group = tree.child_at(tree.root_id(), 0).unwrap();
        assert_eq!(tree.title(group), "outer");
        assert_eq!(tree.range(group), 0..6);
    }

    #[test]
    fn late_binding_skips_empty_groups() {
        let mut p = parser(&[0; 2]);
        p.begin_group("placeholder");
        p.end_group_titled("ignored");
        p.begin_group("filled");
        p.read::<u16>("x").unwrap();
        p.end_group_titled_valued("final", "val");
        let (tree, _) = p.finish();
        let root = tree.root_id();
        assert_eq!(tree.title(tree.child_at(root, 0).unwrap()), "placeholder");
        let filled = tree.child_at(root, 1).unwrap();
        assert_eq!(tree.title(filled), "final");
        assert_eq!(tree.value(filled), "val");
    }

    #[test]
    fn unsupported_runs_are_tracked() {
        let mut p = parser(&[0; 8]);
        p.read::<u16>("a").unwrap();
        p.advance_to(6).unwrap();
        p.read::<u16>("b").unwrap();
        let (_, coverage) = p.finish();
        assert_eq!(coverage.offsets(), &[0, 2, 6, 8]);
        assert_eq!(coverage.unsupported(), &[2]);
    }

    #[test]
    fn undo_restores_everything() {
        let mut p = parser(&[0; 8]);
        p.read::<u16>("keep").unwrap();
        let mark = p.checkpoint();
        p.begin_group("table");
        p.read::<u32>("field").unwrap();
        assert!(p.read::<u32>("missing").is_err());
        p.undo_to(mark);
        assert_eq!(p.offset(), 2);
        let (tree, coverage) = p.finish();
        assert_eq!(tree.children_count(tree.root_id()), 2); // keep + trailing unsupported
        assert_eq!(coverage.offsets(), &[0, 2, 8]);
        assert_eq!(coverage.unsupported(), &[2]);
    }

    #[test]
    fn arrays_use_index_labels() {
        let mut p = parser(&[0, 1, 0, 2, 0, 3]);
        p.read_array::<u16>("Values", 3).unwrap();
        let (tree, _) = p.finish();
        let array = tree.child_at(tree.root_id(), 0).unwrap();
        assert_eq!(tree.value(array), "3 items");
        assert_eq!(tree.value_type(array), ValueType::Array);
        assert_eq!(tree.children_count(array), 3);
        let second = tree.child_at(array, 1).unwrap();
        assert_eq!(tree.title(second), "1");
        assert_eq!(tree.index(second), Some(1));
    }

    #[test]
    fn budget_exhaustion() {
        let mut p = parser(&[0; 2]);
        p.budget = 10;
        assert!(p.charge(8).is_ok());
        assert_eq!(p.charge(8), Err(ReadError::BudgetExceeded));
    }

    #[test]
    fn pascal_string() {
        let mut p = parser(&[3, b'a', b'b', b'c']);
        let s = p.read_pascal_string("Name").unwrap();
        assert_eq!(s, "abc");
        let (tree, _) = p.finish();
        let group = tree.child_at(tree.root_id(), 0).unwrap();
        assert_eq!(tree.title(group), "Name");
        assert_eq!(tree.value(group), "abc");
        assert_eq!(tree.children_count(group), 2);
    }
}
