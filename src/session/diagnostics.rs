//! Diagnostic publication with per-path dirty tracking.
//!
//! Every path moves between [`PublishState::Clean`] and
//! [`PublishState::DirtyPendingPublish`]. [`DiagnosticPublisher::flush`]
//! drains all dirty paths in one pass; a path whose diagnostics went away
//! receives an empty publish.

use std::path::Path;

use rustc_hash::FxHashMap;
use tracing::trace;

use crate::base::{PathId, PathInterner};
use crate::hir::Diagnostic;

/// Receiver of published diagnostics, usually the protocol layer.
pub trait DiagnosticsClient {
    /// Replace every diagnostic shown for `path`. An empty slice clears it.
    fn publish(&self, path: &Path, diagnostics: &[Diagnostic]);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishState {
    Clean,
    DirtyPendingPublish,
}

#[derive(Debug)]
struct Entry {
    state: PublishState,
    diagnostics: Vec<Diagnostic>,
}

/// Staged diagnostics per path and what still needs publishing.
#[derive(Debug, Default)]
pub struct DiagnosticPublisher {
    entries: FxHashMap<PathId, Entry>,
}

impl DiagnosticPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the diagnostics for `file` and mark it dirty.
    pub fn stage(&mut self, file: PathId, diagnostics: Vec<Diagnostic>) {
        self.entries.insert(
            file,
            Entry {
                state: PublishState::DirtyPendingPublish,
                diagnostics,
            },
        );
    }

    /// Stage `sets` and clear every other known path.
    pub fn replace_all(&mut self, sets: impl IntoIterator<Item = (PathId, Vec<Diagnostic>)>) {
        let sets: FxHashMap<PathId, Vec<Diagnostic>> = sets.into_iter().collect();
        let stale: Vec<PathId> = self
            .entries
            .keys()
            .filter(|file| !sets.contains_key(file))
            .copied()
            .collect();
        for file in stale {
            self.clear(file);
        }
        for (file, diagnostics) in sets {
            self.stage(file, diagnostics);
        }
    }

    /// Schedule an empty publish for `file` if anything is shown for it.
    pub fn clear(&mut self, file: PathId) {
        if let Some(entry) = self.entries.get_mut(&file) {
            entry.diagnostics.clear();
            entry.state = PublishState::DirtyPendingPublish;
        }
    }

    /// [`clear`](Self::clear) every known path.
    pub fn clear_all(&mut self) {
        for entry in self.entries.values_mut() {
            entry.diagnostics.clear();
            entry.state = PublishState::DirtyPendingPublish;
        }
    }

    /// Publish every dirty path and mark it clean. Returns how many paths
    /// were published.
    ///
    /// Paths are published in id order. Paths left with no diagnostics are
    /// forgotten after their empty publish.
    pub fn flush(&mut self, interner: &PathInterner, client: &dyn DiagnosticsClient) -> usize {
        let mut dirty: Vec<PathId> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.state == PublishState::DirtyPendingPublish)
            .map(|(file, _)| *file)
            .collect();
        dirty.sort();

        for file in &dirty {
            let Some(entry) = self.entries.get_mut(file) else {
                continue;
            };
            let path = interner.lookup(*file);
            trace!(file = %path.display(), count = entry.diagnostics.len(), "publish diagnostics");
            client.publish(&path, &entry.diagnostics);
            entry.state = PublishState::Clean;
        }
        self.entries.retain(|_, entry| !entry.diagnostics.is_empty());
        dirty.len()
    }

    pub fn state(&self, file: PathId) -> PublishState {
        self.entries
            .get(&file)
            .map(|entry| entry.state)
            .unwrap_or(PublishState::Clean)
    }

    /// Diagnostics currently staged or shown for `file`.
    pub fn diagnostics(&self, file: PathId) -> &[Diagnostic] {
        self.entries
            .get(&file)
            .map(|entry| entry.diagnostics.as_slice())
            .unwrap_or_default()
    }

    pub fn has_pending(&self) -> bool {
        self.entries
            .values()
            .any(|entry| entry.state == PublishState::DirtyPendingPublish)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::Span;
    use parking_lot::Mutex;
    use std::path::PathBuf;

    #[derive(Default)]
    struct Recorder {
        published: Mutex<Vec<(PathBuf, usize)>>,
    }

    impl DiagnosticsClient for Recorder {
        fn publish(&self, path: &Path, diagnostics: &[Diagnostic]) {
            self.published.lock().push((path.to_path_buf(), diagnostics.len()));
        }
    }

    fn diag(file: PathId) -> Diagnostic {
        Diagnostic::error(file, Span::default(), "broken")
    }

    #[test]
    fn test_stage_flush_clear() {
        let interner = PathInterner::new();
        let a = interner.intern("/nonexistent/a.sv");
        let recorder = Recorder::default();
        let mut publisher = DiagnosticPublisher::new();

        publisher.stage(a, vec![diag(a)]);
        assert_eq!(publisher.state(a), PublishState::DirtyPendingPublish);
        assert_eq!(publisher.flush(&interner, &recorder), 1);
        assert_eq!(publisher.state(a), PublishState::Clean);
        assert_eq!(publisher.flush(&interner, &recorder), 0);

        publisher.clear(a);
        assert_eq!(publisher.flush(&interner, &recorder), 1);
        assert_eq!(
            *recorder.published.lock(),
            vec![(PathBuf::from("/nonexistent/a.sv"), 1), (PathBuf::from("/nonexistent/a.sv"), 0)]
        );
        assert!(publisher.diagnostics(a).is_empty());
    }

    #[test]
    fn test_clear_unknown_path_publishes_nothing() {
        let interner = PathInterner::new();
        let a = interner.intern("/nonexistent/a.sv");
        let recorder = Recorder::default();
        let mut publisher = DiagnosticPublisher::new();
        publisher.clear(a);
        publisher.clear_all();
        assert_eq!(publisher.flush(&interner, &recorder), 0);
        assert!(recorder.published.lock().is_empty());
    }

    #[test]
    fn test_replace_all_clears_missing_paths() {
        let interner = PathInterner::new();
        let a = interner.intern("/nonexistent/a.sv");
        let b = interner.intern("/nonexistent/b.sv");
        let recorder = Recorder::default();
        let mut publisher = DiagnosticPublisher::new();

        publisher.stage(a, vec![diag(a)]);
        publisher.flush(&interner, &recorder);
        publisher.replace_all([(b, vec![diag(b), diag(b)])]);
        publisher.flush(&interner, &recorder);

        let published = recorder.published.lock();
        assert_eq!(published[1], (PathBuf::from("/nonexistent/a.sv"), 0));
        assert_eq!(published[2], (PathBuf::from("/nonexistent/b.sv"), 2));
    }
}
