//! Bulk and incremental indexing with a readiness signal.
//!
//! A bulk run crawls and scans on a background thread. The extracts come
//! back as owned values and are merged into the [`WorkspaceIndex`] on the
//! thread that waits for completion, so the tables are only ever mutated
//! from one thread.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::JoinHandle;

use parking_lot::{Condvar, Mutex};
use tracing::{debug, error, info};

use super::scanner::{FileExtract, FileScanner};
use super::storage::WorkspaceIndex;
use crate::base::{PathId, PathInterner};
use crate::hir::FrontEnd;
use crate::project::collect_file_paths;
use crate::syntax::SyntaxTree;

/// Busy/idle flag that other threads can block on.
#[derive(Debug, Default)]
pub struct IndexingSignal {
    busy: Mutex<bool>,
    idle: Condvar,
}

impl IndexingSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        *self.busy.lock()
    }

    /// Block until no indexing run is active.
    pub fn wait_idle(&self) {
        let mut busy = self.busy.lock();
        while *busy {
            self.idle.wait(&mut busy);
        }
    }

    /// Mark the signal busy until the returned guard is dropped.
    pub fn enter(self: &Arc<Self>) -> BusyGuard {
        *self.busy.lock() = true;
        BusyGuard {
            signal: Arc::clone(self),
        }
    }

    fn leave(&self) {
        let mut busy = self.busy.lock();
        *busy = false;
        self.idle.notify_all();
    }
}

/// Restores the idle state on drop, including during unwinding.
#[derive(Debug)]
pub struct BusyGuard {
    signal: Arc<IndexingSignal>,
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.signal.leave();
    }
}

/// Owns the workspace index and keeps it up to date.
#[derive(Debug)]
pub struct Indexer {
    interner: Arc<PathInterner>,
    scanner: FileScanner,
    index: WorkspaceIndex,
    signal: Arc<IndexingSignal>,
    pending: Option<JoinHandle<Vec<FileExtract>>>,
}

impl Indexer {
    pub fn new(interner: Arc<PathInterner>, front_end: Arc<dyn FrontEnd>) -> Self {
        Self {
            interner,
            scanner: FileScanner::new(front_end),
            index: WorkspaceIndex::new(),
            signal: Arc::new(IndexingSignal::new()),
            pending: None,
        }
    }

    pub fn index(&self) -> &WorkspaceIndex {
        &self.index
    }

    pub fn signal(&self) -> Arc<IndexingSignal> {
        Arc::clone(&self.signal)
    }

    /// Whether a bulk run is scanning or waiting to be merged.
    pub fn is_indexing(&self) -> bool {
        self.pending.is_some() || self.signal.is_busy()
    }

    /// Crawl `globs` and scan the matches on a background thread.
    ///
    /// Results are merged by [`Indexer::wait_for_indexing_completion`]. A
    /// run already in flight is merged first.
    pub fn start_indexing(
        &mut self,
        globs: Vec<String>,
        exclude_dirs: Vec<String>,
        threads: usize,
    ) {
        self.wait_for_indexing_completion();

        let guard = self.signal.enter();
        let scanner = self.scanner.clone();
        info!(globs = ?globs, excludes = ?exclude_dirs, "starting workspace indexing");
        let handle = std::thread::spawn(move || {
            let _guard = guard;
            let paths = collect_file_paths(&globs, &exclude_dirs);
            debug!(files = paths.len(), "crawl complete");
            scanner.scan(&paths, threads)
        });
        self.pending = Some(handle);
    }

    /// Block until the current bulk run has finished, then merge it.
    pub fn wait_for_indexing_completion(&mut self) {
        self.signal.wait_idle();
        let Some(handle) = self.pending.take() else {
            return;
        };
        match handle.join() {
            Ok(extracts) => {
                let files = extracts.len();
                self.merge(extracts);
                info!(
                    files,
                    symbols = self.index.symbol_count(),
                    macros = self.index.macro_count(),
                    "workspace indexing complete"
                );
            }
            Err(_) => error!("indexing thread panicked, index left unchanged"),
        }
    }

    /// Scan and merge `paths` on the calling thread.
    pub fn add_documents(&mut self, paths: &[PathBuf], threads: usize) {
        self.wait_for_indexing_completion();
        let _guard = self.signal.enter();
        let extracts = self.scanner.scan(paths, threads);
        debug!(requested = paths.len(), indexed = extracts.len(), "added documents");
        self.merge(extracts);
    }

    /// Drop every entry contributed by `paths`. Unindexed paths are skipped.
    pub fn remove_documents(&mut self, paths: &[PathBuf]) {
        self.wait_for_indexing_completion();
        let _guard = self.signal.enter();
        for path in paths {
            match self.interner.get(path) {
                Some(id) if self.index.contains(id) => {
                    self.index.remove(id);
                }
                _ => debug!(file = %path.display(), "not indexed, nothing to remove"),
            }
        }
    }

    /// Replace the entries for `path` with those of an already-parsed tree.
    pub fn index_tree(&mut self, path: &Path, tree: &SyntaxTree) -> PathId {
        self.wait_for_indexing_completion();
        let id = self.interner.intern(path);
        let extract = FileScanner::extract_tree(path, tree);
        self.index.add_or_replace(extract.into_record(id));
        id
    }

    fn merge(&mut self, extracts: Vec<FileExtract>) {
        for extract in extracts {
            let id = self.interner.intern(&extract.path);
            self.index.add_or_replace(extract.into_record(id));
        }
    }
}

impl Drop for Indexer {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            let _ = handle.join();
        }
    }
}
