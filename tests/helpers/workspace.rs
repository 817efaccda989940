//! Temporary workspaces driven through a `SessionManager`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use svindex::session::DiagnosticsClient;
use svindex::{Diagnostic, ServerConfig, SessionManager};
use tempfile::TempDir;

/// One `publish` call as the client saw it.
#[derive(Debug, Clone)]
pub struct Publish {
    pub path: PathBuf,
    pub diagnostics: Vec<Diagnostic>,
}

/// Client that keeps every publish in order.
#[derive(Debug, Default)]
pub struct RecordingClient {
    published: Mutex<Vec<Publish>>,
}

impl DiagnosticsClient for RecordingClient {
    fn publish(&self, path: &Path, diagnostics: &[Diagnostic]) {
        self.published.lock().push(Publish {
            path: path.to_path_buf(),
            diagnostics: diagnostics.to_vec(),
        });
    }
}

impl RecordingClient {
    /// Drain everything published so far.
    pub fn take(&self) -> Vec<Publish> {
        std::mem::take(&mut *self.published.lock())
    }

    /// Diagnostic count of every publish for `path`, oldest first.
    pub fn counts_for(&self, path: &Path) -> Vec<usize> {
        self.published
            .lock()
            .iter()
            .filter(|p| p.path == path)
            .map(|p| p.diagnostics.len())
            .collect()
    }

    /// The most recent publish for `path`.
    pub fn last_for(&self, path: &Path) -> Option<Vec<Diagnostic>> {
        self.published
            .lock()
            .iter()
            .rev()
            .find(|p| p.path == path)
            .map(|p| p.diagnostics.clone())
    }
}

pub struct TestWorkspace {
    _dir: TempDir,
    root: PathBuf,
    pub client: Arc<RecordingClient>,
    pub manager: SessionManager,
}

impl TestWorkspace {
    /// Write `files` into a fresh directory and index it.
    pub fn new(files: &[(&str, &str)]) -> Self {
        Self::with_config(files, |config| config)
    }

    /// Like [`new`](Self::new), with `configure` applied to the default
    /// test configuration.
    pub fn with_config(
        files: &[(&str, &str)],
        configure: impl FnOnce(ServerConfig) -> ServerConfig,
    ) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().canonicalize().unwrap();
        for (name, text) in files {
            write_file(&root.join(name), text);
        }

        let config = configure(
            ServerConfig::new()
                .with_index_globs([format!("{}/**/*.sv*", root.display())])
                .with_indexing_threads(2),
        );
        let client = Arc::new(RecordingClient::default());
        let mut manager = SessionManager::new(config, client.clone());
        manager.start_indexing();
        manager.wait_for_indexing_completion();

        Self {
            _dir: dir,
            root,
            client,
            manager,
        }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write `text` to `name` on disk without notifying the manager.
    pub fn write(&self, name: &str, text: &str) -> PathBuf {
        let path = self.path(name);
        write_file(&path, text);
        path
    }

    /// Open `name` with its current disk contents.
    pub fn open(&mut self, name: &str) -> PathBuf {
        let path = self.path(name);
        let text = std::fs::read_to_string(&path).unwrap();
        self.manager.did_open(&path, &text);
        path
    }

    /// File names declaring `name`, sorted.
    pub fn declaring_files(&mut self, name: &str) -> Vec<String> {
        let files: Vec<_> = self
            .manager
            .lookup_symbol(name)
            .into_iter()
            .map(|location| location.file)
            .collect();
        let interner = Arc::clone(self.manager.interner());
        let mut names: Vec<String> = files
            .into_iter()
            .map(|id| file_name(&interner.lookup(id)))
            .collect();
        names.sort();
        names
    }
}

pub fn file_name(path: &Path) -> String {
    path.file_name().unwrap().to_string_lossy().into_owned()
}

fn write_file(path: &Path, text: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, text).unwrap();
}
