//! The output tree: an append-only arena of labeled byte ranges.
//!
//! Nodes live in a single vector and refer to each other by index, which
//! gives the UI stable, copyable handles and makes discarding a partially
//! built subtree a truncation. The tree is immutable once parsing finishes.

use std::collections::HashMap;
use std::ops::Range;

use sfnt_types::ValueType;

/// A stable identifier for a node in a [`Tree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    const ROOT: NodeId = NodeId(0);

    fn index(self) -> usize {
        self.0 as usize
    }
}

/// An interned string handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct StrId(u32);

/// A node title: either a string literal or an interned computed string.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Title {
    Static(&'static str),
    Interned(StrId),
}

/// The payload of a tree node.
#[derive(Clone, Debug)]
pub(crate) struct NodeData {
    pub title: Title,
    /// Position within an enclosing array, when the node is an element.
    pub index: Option<u32>,
    pub value: String,
    pub value_type: ValueType,
    /// Absolute byte range in the input.
    pub range: Range<usize>,
}

struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    data: NodeData,
}

/// Interns the small vocabulary of computed titles and index labels.
///
/// The tree routinely holds hundreds of thousands of leaves whose titles
/// repeat ("Offset", "0", "1", "Glyph 12", ...); storing each once keeps the
/// arena compact.
#[derive(Default)]
struct Interner {
    pool: Vec<Box<str>>,
    lookup: HashMap<Box<str>, StrId>,
    index_labels: Vec<StrId>,
}

impl Interner {
    fn intern(&mut self, s: &str) -> StrId {
        if let Some(&id) = self.lookup.get(s) {
            return id;
        }
        let id = StrId(self.pool.len() as u32);
        self.pool.push(s.into());
        self.lookup.insert(s.into(), id);
        id
    }

    fn index_label(&mut self, n: u32) -> StrId {
        while self.index_labels.len() <= n as usize {
            let next = self.index_labels.len().to_string();
            let id = self.intern(&next);
            self.index_labels.push(id);
        }
        self.index_labels[n as usize]
    }

    fn get(&self, id: StrId) -> &str {
        &self.pool[id.0 as usize]
    }
}

/// The hierarchical description of a parsed font file.
pub struct Tree {
    nodes: Vec<Node>,
    strings: Interner,
}

/// A mark used to discard everything appended after it.
#[derive(Clone, Copy, Debug)]
pub(crate) struct TreeCheckpoint {
    nodes: usize,
    parent: NodeId,
    parent_children: usize,
}

impl Tree {
    pub(crate) fn new(file_len: usize) -> Self {
        let root = Node {
            parent: None,
            children: Vec::new(),
            data: NodeData {
                title: Title::Static(""),
                index: None,
                value: String::new(),
                value_type: ValueType::None,
                range: 0..file_len,
            },
        };
        Tree {
            nodes: vec![root],
            strings: Interner::default(),
        }
    }

    pub(crate) fn append(&mut self, parent: NodeId, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            parent: Some(parent),
            children: Vec::new(),
            data,
        });
        self.nodes[parent.index()].children.push(id);
        id
    }

    pub(crate) fn data_mut(&mut self, id: NodeId) -> &mut NodeData {
        &mut self.nodes[id.index()].data
    }

    pub(crate) fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.index()].data
    }

    pub(crate) fn intern(&mut self, s: &str) -> StrId {
        self.strings.intern(s)
    }

    pub(crate) fn index_label(&mut self, n: u32) -> StrId {
        self.strings.index_label(n)
    }

    pub(crate) fn checkpoint(&self, parent: NodeId) -> TreeCheckpoint {
        TreeCheckpoint {
            nodes: self.nodes.len(),
            parent,
            parent_children: self.nodes[parent.index()].children.len(),
        }
    }

    /// Drop every node appended after `mark`.
    ///
    /// New nodes are only ever attached below the group that was current
    /// when the mark was taken, so restoring that group's child list and
    /// truncating the arena is a complete undo.
    pub(crate) fn undo_to(&mut self, mark: TreeCheckpoint) {
        self.nodes.truncate(mark.nodes);
        self.nodes[mark.parent.index()]
            .children
            .truncate(mark.parent_children);
    }

    /// The id of the root node, whose range spans the whole file.
    pub fn root_id(&self) -> NodeId {
        NodeId::ROOT
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id.index())?.parent
    }

    pub fn child_at(&self, parent: NodeId, row: usize) -> Option<NodeId> {
        self.nodes.get(parent.index())?.children.get(row).copied()
    }

    pub fn children_count(&self, id: NodeId) -> usize {
        self.nodes
            .get(id.index())
            .map_or(0, |node| node.children.len())
    }

    pub fn has_children(&self, id: NodeId) -> bool {
        self.children_count(id) != 0
    }

    /// The node's row within its parent.
    pub fn child_index(&self, id: NodeId) -> usize {
        match self.parent(id) {
            Some(parent) => self.nodes[parent.index()]
                .children
                .iter()
                .position(|&child| child == id)
                .unwrap_or(0),
            None => 0,
        }
    }

    pub fn title(&self, id: NodeId) -> &str {
        match self.data(id).title {
            Title::Static(s) => s,
            Title::Interned(id) => self.strings.get(id),
        }
    }

    pub fn value(&self, id: NodeId) -> &str {
        &self.data(id).value
    }

    pub fn value_type(&self, id: NodeId) -> ValueType {
        self.data(id).value_type
    }

    /// The numeric sequence position, when the node is an array element.
    pub fn index(&self, id: NodeId) -> Option<u32> {
        self.data(id).index
    }

    /// The absolute byte range `[start, end)` covered by the node.
    pub fn range(&self, id: NodeId) -> Range<usize> {
        self.data(id).range.clone()
    }

    /// The deepest leaf whose range contains `offset`.
    ///
    /// Returns `None` when the offset falls in a gap that no leaf covers.
    pub fn item_at_byte(&self, offset: usize) -> Option<NodeId> {
        let mut current = NodeId::ROOT;
        if !self.data(current).range.contains(&offset) {
            return None;
        }
        loop {
            let node = &self.nodes[current.index()];
            if node.children.is_empty() {
                return (current != NodeId::ROOT).then_some(current);
            }
            // Children are ordered by non-decreasing start offset.
            let candidate = node
                .children
                .partition_point(|&child| self.data(child).range.start <= offset)
                .checked_sub(1)
                .map(|row| node.children[row]);
            match candidate {
                Some(child) if self.data(child).range.contains(&offset) => current = child,
                _ => return None,
            }
        }
    }

    /// Total number of nodes, including the root.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        // The root always exists.
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(tree: &mut Tree, parent: NodeId, title: &'static str, range: Range<usize>) -> NodeId {
        tree.append(
            parent,
            NodeData {
                title: Title::Static(title),
                index: None,
                value: String::new(),
                value_type: ValueType::UInt16,
                range,
            },
        )
    }

    #[test]
    fn navigation() {
        let mut tree = Tree::new(10);
        let root = tree.root_id();
        let group = leaf(&mut tree, root, "group", 0..0);
        let a = leaf(&mut tree, group, "a", 0..2);
        let b = leaf(&mut tree, group, "b", 2..6);
        tree.data_mut(group).range = 0..6;

        assert_eq!(tree.children_count(root), 1);
        assert_eq!(tree.child_at(group, 0), Some(a));
        assert_eq!(tree.child_at(group, 1), Some(b));
        assert_eq!(tree.parent(b), Some(group));
        assert_eq!(tree.child_index(b), 1);
        assert_eq!(tree.title(a), "a");
    }

    #[test]
    fn item_at_byte_finds_deepest_leaf() {
        let mut tree = Tree::new(10);
        let root = tree.root_id();
        let group = leaf(&mut tree, root, "group", 0..0);
        let a = leaf(&mut tree, group, "a", 0..2);
        let b = leaf(&mut tree, group, "b", 2..6);
        tree.data_mut(group).range = 0..6;

        assert_eq!(tree.item_at_byte(0), Some(a));
        assert_eq!(tree.item_at_byte(1), Some(a));
        assert_eq!(tree.item_at_byte(2), Some(b));
        assert_eq!(tree.item_at_byte(5), Some(b));
        // A gap past the group's children.
        assert_eq!(tree.item_at_byte(7), None);
        // Past the end of the file.
        assert_eq!(tree.item_at_byte(10), None);
    }

    #[test]
    fn undo_restores_previous_shape() {
        let mut tree = Tree::new(10);
        let root = tree.root_id();
        leaf(&mut tree, root, "keep", 0..2);
        let mark = tree.checkpoint(root);
        let group = leaf(&mut tree, root, "drop", 2..2);
        leaf(&mut tree, group, "child", 2..4);
        assert_eq!(tree.children_count(root), 2);

        tree.undo_to(mark);
        assert_eq!(tree.children_count(root), 1);
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.title(tree.child_at(root, 0).unwrap()), "keep");
    }

    #[test]
    fn interner_reuses_labels() {
        let mut tree = Tree::new(0);
        let a = tree.intern("Subtable 4");
        let b = tree.intern("Subtable 4");
        assert_eq!(a, b);
        let l0 = tree.index_label(2);
        assert_eq!(tree.index_label(2), l0);
        assert_eq!(tree.intern("2"), l0);
    }
}
