//! Progress reporting shared by all batch passes.

use bookforge_shared::{BookforgeError, ItemStatus, OutcomeCounts};

/// What happened to one input file.
#[derive(Debug)]
pub enum ItemEvent<'a> {
    /// Processing of `name` has begun.
    Started { name: &'a str },
    /// `name` produced `output` (a written file or a new filename).
    Succeeded { name: &'a str, output: &'a str },
    /// Nothing to do for `name`, e.g. empty content.
    Skipped { name: &'a str, reason: &'a str },
    /// `name` was already in the desired state.
    Unchanged { name: &'a str },
    /// `name` failed and was skipped.
    Failed {
        name: &'a str,
        error: &'a BookforgeError,
    },
}

impl ItemEvent<'_> {
    /// Final status carried by this event, `None` for [`ItemEvent::Started`].
    pub fn status(&self) -> Option<ItemStatus> {
        match self {
            Self::Started { .. } => None,
            Self::Succeeded { .. } => Some(ItemStatus::Succeeded),
            Self::Skipped { .. } => Some(ItemStatus::Skipped),
            Self::Unchanged { .. } => Some(ItemStatus::Unchanged),
            Self::Failed { .. } => Some(ItemStatus::Failed),
        }
    }
}

/// Progress callback for reporting batch status.
pub trait ProgressReporter: Send + Sync {
    /// Called when a pass starts, with the number of input files.
    fn phase(&self, name: &str, total: usize);
    /// Called for every per-item event.
    fn item(&self, event: &ItemEvent<'_>);
    /// Called when the pass completes.
    fn done(&self, counts: &OutcomeCounts);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str, _total: usize) {}
    fn item(&self, _event: &ItemEvent<'_>) {}
    fn done(&self, _counts: &OutcomeCounts) {}
}

/// Forwards events to a reporter while counting final statuses.
pub(crate) struct Tally<'a> {
    progress: &'a dyn ProgressReporter,
    counts: OutcomeCounts,
}

impl<'a> Tally<'a> {
    pub(crate) fn new(progress: &'a dyn ProgressReporter) -> Self {
        Self {
            progress,
            counts: OutcomeCounts::default(),
        }
    }

    pub(crate) fn report(&mut self, event: ItemEvent<'_>) {
        if let Some(status) = event.status() {
            self.counts.record(status);
        }
        self.progress.item(&event);
    }

    /// Signal completion and hand back the counts.
    pub(crate) fn finish(self) -> OutcomeCounts {
        self.progress.done(&self.counts);
        self.counts
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;

    use super::*;

    /// Records every event as a compact string, e.g. `ok:a.txt->02-a.tex`.
    #[derive(Default)]
    pub(crate) struct RecordingProgress {
        pub(crate) events: Mutex<Vec<String>>,
    }

    impl RecordingProgress {
        pub(crate) fn events(&self) -> Vec<String> {
            self.events.lock().unwrap().clone()
        }
    }

    impl ProgressReporter for RecordingProgress {
        fn phase(&self, name: &str, total: usize) {
            self.events.lock().unwrap().push(format!("phase:{name}:{total}"));
        }

        fn item(&self, event: &ItemEvent<'_>) {
            let line = match event {
                ItemEvent::Started { name } => format!("start:{name}"),
                ItemEvent::Succeeded { name, output } => format!("ok:{name}->{output}"),
                ItemEvent::Skipped { name, .. } => format!("skip:{name}"),
                ItemEvent::Unchanged { name } => format!("same:{name}"),
                ItemEvent::Failed { name, .. } => format!("fail:{name}"),
            };
            self.events.lock().unwrap().push(line);
        }

        fn done(&self, counts: &OutcomeCounts) {
            self.events.lock().unwrap().push(format!("done:{}", counts.total()));
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
