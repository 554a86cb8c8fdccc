//! Domain types shared across Bookforge crates.

use serde::Serialize;

// ---------------------------------------------------------------------------
// Per-item outcomes
// ---------------------------------------------------------------------------

/// How a single file fared in a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    /// Output written or rename performed.
    Succeeded,
    /// Nothing usable to write (e.g. empty content).
    Skipped,
    /// Already in the desired state.
    Unchanged,
    /// Read, write, or rename error.
    Failed,
}

/// Tally of item outcomes for one batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OutcomeCounts {
    pub succeeded: usize,
    pub skipped: usize,
    pub unchanged: usize,
    pub failed: usize,
}

impl OutcomeCounts {
    /// Count one item.
    pub fn record(&mut self, status: ItemStatus) {
        match status {
            ItemStatus::Succeeded => self.succeeded += 1,
            ItemStatus::Skipped => self.skipped += 1,
            ItemStatus::Unchanged => self.unchanged += 1,
            ItemStatus::Failed => self.failed += 1,
        }
    }

    /// Total number of items seen.
    pub fn total(&self) -> usize {
        self.succeeded + self.skipped + self.unchanged + self.failed
    }
}

// ---------------------------------------------------------------------------
// RenamePair
// ---------------------------------------------------------------------------

/// One rename that was actually performed (or planned, in a dry run).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenamePair {
    /// Filename before the rename.
    pub from: String,
    /// Filename after the rename.
    pub to: String,
}

impl RenamePair {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_record_each_status() {
        let mut counts = OutcomeCounts::default();
        counts.record(ItemStatus::Succeeded);
        counts.record(ItemStatus::Succeeded);
        counts.record(ItemStatus::Skipped);
        counts.record(ItemStatus::Failed);

        assert_eq!(counts.succeeded, 2);
        assert_eq!(counts.skipped, 1);
        assert_eq!(counts.unchanged, 0);
        assert_eq!(counts.failed, 1);
        assert_eq!(counts.total(), 4);
    }
}
