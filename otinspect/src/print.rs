//! Pretty printing implementation.

use inspect_fonts::{NodeId, Tree};

static MANY_SPACES: [u8; 200] = [0x20; 200];

pub struct PrettyPrinter<'a> {
    depth: usize,
    indent_size: usize,
    writer: &'a mut (dyn std::io::Write + 'a),
}

impl<'a> PrettyPrinter<'a> {
    pub fn new(writer: &'a mut (dyn std::io::Write + 'a)) -> Self {
        PrettyPrinter {
            depth: 0,
            indent_size: 2,
            writer,
        }
    }

    fn print_indent(&mut self) -> std::io::Result<()> {
        let indent_len = (self.depth * self.indent_size).min(MANY_SPACES.len());
        self.writer.write_all(&MANY_SPACES[..indent_len])
    }

    pub fn print_tree(&mut self, tree: &Tree) -> std::io::Result<()> {
        let root = tree.root_id();
        for row in 0..tree.children_count(root) {
            self.print_node(tree, tree.child_at(root, row).unwrap())?;
        }
        Ok(())
    }

    fn print_node(&mut self, tree: &Tree, node: NodeId) -> std::io::Result<()> {
        self.print_indent()?;

        let title = tree.title(node);
        match tree.index(node) {
            Some(index) if title.is_empty() => write!(self.writer, "{index}")?,
            // Pure index labels already carry the number as their title.
            Some(index) if title != index.to_string() => {
                write!(self.writer, "{title} {index}")?
            }
            _ => write!(self.writer, "{title}")?,
        }

        // Multi-line values (bit listings) only show their first line here.
        let value = tree.value(node).lines().next().unwrap_or_default();
        if !value.is_empty() {
            write!(self.writer, ": {value}")?;
        }

        let range = tree.range(node);
        writeln!(self.writer, "  [{}..{}]", range.start, range.end)?;

        self.depth += 1;
        for row in 0..tree.children_count(node) {
            self.print_node(tree, tree.child_at(node, row).unwrap())?;
        }
        self.depth -= 1;
        Ok(())
    }
}
