//! The per-parse summary of which bytes are labeled and which are skipped.

/// Sorted byte offsets partitioning the input into labeled and skipped runs.
///
/// `offsets` holds the start of every recognized leaf plus a final sentinel
/// equal to the input length; `unsupported` is the subset of starts whose
/// run was intentionally skipped. A hex view walks consecutive pairs of
/// `offsets` and shades the runs whose start appears in `unsupported`.
#[derive(Debug, Default)]
pub struct Coverage {
    offsets: Vec<usize>,
    unsupported: Vec<usize>,
}

/// A mark used to roll back offsets recorded by a discarded subtree.
#[derive(Clone, Copy, Debug)]
pub(crate) struct CoverageCheckpoint {
    offsets: usize,
    unsupported: usize,
}

impl Coverage {
    pub(crate) fn record(&mut self, offset: usize) {
        self.offsets.push(offset);
    }

    pub(crate) fn record_unsupported(&mut self, offset: usize) {
        self.offsets.push(offset);
        self.unsupported.push(offset);
    }

    pub(crate) fn checkpoint(&self) -> CoverageCheckpoint {
        CoverageCheckpoint {
            offsets: self.offsets.len(),
            unsupported: self.unsupported.len(),
        }
    }

    pub(crate) fn undo_to(&mut self, mark: CoverageCheckpoint) {
        self.offsets.truncate(mark.offsets);
        self.unsupported.truncate(mark.unsupported);
    }

    /// Sort, deduplicate and close the structure with the `file_len`
    /// sentinel.
    pub(crate) fn finish(&mut self, file_len: usize) {
        self.offsets.push(file_len);
        self.offsets.sort_unstable();
        self.offsets.dedup();
        self.unsupported.sort_unstable();
        self.unsupported.dedup();
        debug_assert!(self.is_consistent(), "unsupported offsets must be recorded");
    }

    fn is_consistent(&self) -> bool {
        self.unsupported
            .iter()
            .all(|offset| self.offsets.binary_search(offset).is_ok())
    }

    /// Every recognized run start, ascending, ending with the input length.
    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }

    /// The starts of skipped runs; a subset of [`offsets`](Self::offsets).
    pub fn unsupported(&self) -> &[usize] {
        &self.unsupported
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finish_sorts_and_dedups() {
        let mut coverage = Coverage::default();
        coverage.record(4);
        coverage.record(0);
        coverage.record_unsupported(8);
        coverage.record(4);
        coverage.finish(12);
        assert_eq!(coverage.offsets(), &[0, 4, 8, 12]);
        assert_eq!(coverage.unsupported(), &[8]);
    }

    #[test]
    fn undo_drops_recorded_offsets() {
        let mut coverage = Coverage::default();
        coverage.record(0);
        let mark = coverage.checkpoint();
        coverage.record(2);
        coverage.record_unsupported(4);
        coverage.undo_to(mark);
        coverage.finish(6);
        assert_eq!(coverage.offsets(), &[0, 6]);
        assert!(coverage.unsupported().is_empty());
    }
}
