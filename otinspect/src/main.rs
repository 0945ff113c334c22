//! Print the structural byte tree of a font file.
//!
//! Every recognized field is shown with its title, rendered value and byte
//! range, nested the way the font nests its tables and subtables.

mod print;

use print::PrettyPrinter;

fn main() -> Result<(), Error> {
    env_logger::init();

    let args = flags::Otinspect::from_env_or_exit();
    let bytes = std::fs::read(&args.input)
        .map_err(|e| Error(format!("failed to read {}: {e}", args.input.display())))?;
    let output = inspect_fonts::parse(&bytes).map_err(Error::new)?;

    if args.list {
        list_tables(&output.tree);
    } else if args.coverage {
        print_coverage(&output);
    } else {
        let stdout = std::io::stdout();
        let mut locked = stdout.lock();
        let mut printer = PrettyPrinter::new(&mut locked);
        printer.print_tree(&output.tree).map_err(Error::new)?;
    }

    for warning in &output.warnings {
        eprintln!("warning: {warning}");
    }
    Ok(())
}

/// Print one line per top-level node: tables, headers, face groups.
fn list_tables(tree: &inspect_fonts::Tree) {
    let root = tree.root_id();
    for row in 0..tree.children_count(root) {
        let node = tree.child_at(root, row).unwrap();
        let range = tree.range(node);
        println!(
            "{:<48} {:>8}..{:<8} {}",
            tree.title(node),
            range.start,
            range.end,
            tree.value(node),
        );
    }
}

/// Print the labeled/skipped byte-run summary.
fn print_coverage(output: &inspect_fonts::ParseOutput) {
    let offsets = output.coverage.offsets();
    for pair in offsets.windows(2) {
        let skipped = output.coverage.unsupported().binary_search(&pair[0]).is_ok();
        let label = if skipped { "skipped" } else { "labeled" };
        println!("{:>8}..{:<8} {label}", pair[0], pair[1]);
    }
}

#[derive(Debug, Clone)]
struct Error(String);

impl Error {
    fn new(t: impl std::fmt::Display) -> Self {
        Self(t.to_string())
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::error::Error for Error {}

mod flags {
    use std::path::PathBuf;

    xflags::xflags! {
        /// Dump the structural byte tree of a binary font file.
        ///
        /// By default otinspect prints every labeled field in the font with
        /// its byte range. The -l option lists only the top-level entries,
        /// and -c prints the byte-coverage summary used by hex views.
        cmd otinspect {
            required input: PathBuf
            optional -l, --list
            optional -c, --coverage
        }
    }
}
