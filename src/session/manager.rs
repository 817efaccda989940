//! Session manager: routes editor lifecycle events through the document
//! registry, the workspace index and the active compilation session.
//!
//! All methods run on the caller's thread. The only work done elsewhere is
//! the scan phase of bulk indexing; anything that reads the index first
//! waits for that to finish and merges its results.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use smol_str::SmolStr;
use tracing::{debug, info, warn};

use super::compilation::{CompilationSession, analyze_document};
use super::dependents::{DependencySources, ExpansionPolicy, resolve_dependents};
use super::diagnostics::{DiagnosticPublisher, DiagnosticsClient};
use super::document::Document;
use super::error::SessionError;
use super::registry::{DocumentRegistry, DocumentState};
use crate::base::{PathId, PathInterner, TextChange};
use crate::hir::{Diagnostic, FrontEnd, ParseOptions, SessionMode, ShallowFrontEnd};
use crate::index::{
    Indexer, MacroLocation, SymbolLocation, WorkspaceIncludes, WorkspaceIndex, WorkspaceSymbol,
};
use crate::project::{BuildFile, SOURCE_EXTENSIONS, ServerConfig, is_excluded};
use crate::syntax::DeclKind;

/// Kind of an external file-system change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileChangeKind {
    Created,
    Changed,
    Deleted,
}

/// One watched-file notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEvent {
    pub path: PathBuf,
    pub kind: FileChangeKind,
}

impl FileEvent {
    pub fn created(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            kind: FileChangeKind::Created,
        }
    }

    pub fn changed(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            kind: FileChangeKind::Changed,
        }
    }

    pub fn deleted(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            kind: FileChangeKind::Deleted,
        }
    }
}

/// Owns the index, the documents and the live compilation session.
pub struct SessionManager {
    config: ServerConfig,
    interner: Arc<PathInterner>,
    front_end: Arc<dyn FrontEnd>,
    indexer: Indexer,
    registry: DocumentRegistry,
    publisher: DiagnosticPublisher,
    client: Arc<dyn DiagnosticsClient>,
    session: CompilationSession,
    /// Include directories of the active mode.
    include_dirs: Vec<PathBuf>,
}

impl SessionManager {
    /// A manager in Explore mode over the built-in front end.
    pub fn new(config: ServerConfig, client: Arc<dyn DiagnosticsClient>) -> Self {
        Self::with_front_end(config, Arc::new(ShallowFrontEnd::new()), client)
    }

    pub fn with_front_end(
        config: ServerConfig,
        front_end: Arc<dyn FrontEnd>,
        client: Arc<dyn DiagnosticsClient>,
    ) -> Self {
        let interner = Arc::new(PathInterner::new());
        let options = ParseOptions::with_include_depth(config.open_include_depth);
        Self {
            indexer: Indexer::new(Arc::clone(&interner), Arc::clone(&front_end)),
            registry: DocumentRegistry::new(Arc::clone(&interner), Arc::clone(&front_end), options),
            publisher: DiagnosticPublisher::new(),
            session: CompilationSession::explore(),
            include_dirs: config.include_dirs.clone(),
            config,
            interner,
            front_end,
            client,
        }
    }

    /// Start indexing and, when a build file is configured, enter
    /// BuildFile mode once indexing completes.
    pub fn initialize(&mut self) -> Result<(), SessionError> {
        self.start_indexing();
        match self.config.build_file.clone() {
            Some(build_file) => self.set_build_file(&build_file),
            None => Ok(()),
        }
    }

    // ------------------------------------------------------------------
    // Indexing
    // ------------------------------------------------------------------

    /// Crawl the configured globs and index the matches in the background.
    pub fn start_indexing(&mut self) {
        self.indexer.start_indexing(
            self.config.index_globs(),
            self.config.exclude_dirs.clone(),
            self.config.indexing_threads,
        );
    }

    pub fn wait_for_indexing_completion(&mut self) {
        self.indexer.wait_for_indexing_completion();
    }

    pub fn add_documents(&mut self, paths: &[PathBuf]) {
        self.indexer.add_documents(paths, self.config.indexing_threads);
    }

    pub fn remove_documents(&mut self, paths: &[PathBuf]) {
        self.indexer.remove_documents(paths);
    }

    // ------------------------------------------------------------------
    // Document lifecycle
    // ------------------------------------------------------------------

    pub fn did_open(&mut self, path: &Path, text: &str) {
        let includes =
            WorkspaceIncludes::new(self.indexer.index(), &self.interner, &self.include_dirs);
        let document = self.registry.open(path, text, &includes);

        if self.session.is_full() {
            if self.session.contains(document.id()) {
                self.refresh_session();
            }
        } else {
            self.analyze_open_document(document.id());
        }
        self.flush();
    }

    pub fn did_change(&mut self, path: &Path, changes: &[TextChange]) -> Result<(), SessionError> {
        let includes =
            WorkspaceIncludes::new(self.indexer.index(), &self.interner, &self.include_dirs);
        let document = self.registry.apply_changes(path, changes, &includes)?;

        if self.session.is_full() {
            self.refresh_session();
        } else {
            self.analyze_open_document(document.id());
        }
        self.flush();
        Ok(())
    }

    /// Handle a save. `saved_text` is the editor's copy of what was written,
    /// when it sends one.
    pub fn did_save(&mut self, path: &Path, saved_text: Option<&str>) -> Result<(), SessionError> {
        let document = {
            let includes =
                WorkspaceIncludes::new(self.indexer.index(), &self.interner, &self.include_dirs);
            self.registry.mark_saved(path, saved_text, &includes)?
        };
        self.indexer.index_tree(document.path(), document.tree());
        debug!(file = %path.display(), "indexed saved document");

        match self.session.mode().clone() {
            SessionMode::TopLevel { root, top } => self.rebuild_top_level(root, top),
            SessionMode::BuildFile { .. } => self.refresh_session(),
            SessionMode::Explore => self.analyze_open_document(document.id()),
        }
        self.flush();
        Ok(())
    }

    pub fn did_close(&mut self, path: &Path) {
        if !self.registry.close(path) {
            debug!(file = %path.display(), "close for a document that was not open");
        }
        if !self.session.is_full() {
            if let Some(id) = self.interner.get(path) {
                self.publisher.clear(id);
            }
            self.flush();
        }
    }

    /// Apply external file-system changes to the index.
    ///
    /// A changed file is re-indexed when it is already indexed or has a
    /// source extension. Changes to open documents are ignored; their saves
    /// update the index.
    pub fn did_change_watched_files(&mut self, events: &[FileEvent]) {
        self.indexer.wait_for_indexing_completion();
        let mut to_index = Vec::new();
        let mut to_remove = Vec::new();
        let mut session_touched = false;

        for event in events {
            let path = &event.path;
            let id = self.interner.get(path);
            match event.kind {
                FileChangeKind::Created => {
                    if self.should_index(path) {
                        to_index.push(path.clone());
                    }
                }
                FileChangeKind::Changed => {
                    if id.is_some_and(|id| self.registry.is_open(id)) {
                        continue;
                    }
                    // A failed rescan must leave no record behind.
                    let indexed = id.is_some_and(|id| self.indexer.index().contains(id));
                    if indexed {
                        to_remove.push(path.clone());
                    }
                    if indexed || self.should_index(path) {
                        to_index.push(path.clone());
                    }
                    if self.registry.remove(path).is_some() {
                        session_touched |= self.reload_member(path, id);
                    }
                }
                FileChangeKind::Deleted => {
                    let Some(id) = id else {
                        continue;
                    };
                    if self.indexer.index().contains(id) {
                        to_remove.push(path.clone());
                    }
                    self.registry.remove(path);
                    self.publisher.clear(id);
                    session_touched |= self.session.contains(id);
                }
            }
        }

        if !to_remove.is_empty() {
            self.indexer.remove_documents(&to_remove);
        }
        if !to_index.is_empty() {
            self.indexer.add_documents(&to_index, self.config.indexing_threads);
        }
        if session_touched {
            self.refresh_session();
        }
        debug!(
            events = events.len(),
            indexed = to_index.len(),
            removed = to_remove.len(),
            "watched files changed"
        );
        self.flush();
    }

    // ------------------------------------------------------------------
    // Mode switches
    // ------------------------------------------------------------------

    /// Drop any design root; analyze open documents one at a time.
    pub fn set_explore(&mut self) {
        let registry = self.next_registry();
        info!("switching to explore mode");
        self.install(registry, CompilationSession::explore(), self.config.include_dirs.clone());
    }

    /// Compile `path` and everything it depends on, with the first module
    /// of the file that nothing there instantiates as the top.
    pub fn set_top_level(&mut self, path: &Path) -> Result<(), SessionError> {
        self.wait_for_indexing_completion();
        let include_dirs = self.config.include_dirs.clone();
        let mut registry = self.next_registry();

        match self.build_top_level(path, &mut registry, &include_dirs) {
            Ok(session) => {
                info!(
                    root = %path.display(),
                    top = ?session.elaboration().top,
                    members = session.len(),
                    "switching to top-level mode"
                );
                self.install(registry, session, include_dirs);
                Ok(())
            }
            Err(e) => {
                warn!(root = %path.display(), error = %e, "cannot enter top-level mode");
                self.set_explore();
                Err(e)
            }
        }
    }

    /// Compile exactly the files listed in the command file at `path`.
    pub fn set_build_file(&mut self, path: &Path) -> Result<(), SessionError> {
        self.wait_for_indexing_completion();
        let build = match BuildFile::read(path) {
            Ok(build) => build,
            Err(e) => {
                warn!(build_file = %path.display(), error = %e, "cannot enter build-file mode");
                self.set_explore();
                return Err(e.into());
            }
        };

        let mut include_dirs = self.config.include_dirs.clone();
        for dir in &build.include_dirs {
            if !include_dirs.contains(dir) {
                include_dirs.push(dir.clone());
            }
        }

        let mut registry = self.next_registry();
        let mut members = Vec::with_capacity(build.files.len());
        {
            let includes =
                WorkspaceIncludes::new(self.indexer.index(), &self.interner, &include_dirs);
            for file in &build.files {
                match registry.get_or_load(file, &includes) {
                    Ok(document) => members.push(document),
                    Err(e) => {
                        warn!(file = %file.display(), error = %e, "skipping build file entry")
                    }
                }
            }
        }

        let mode = SessionMode::BuildFile {
            build_file: build.path.clone(),
            files: members.iter().map(Document::id).collect(),
        };
        let session = CompilationSession::build(mode, members, self.front_end.as_ref());
        info!(
            build_file = %build.path.display(),
            members = session.len(),
            "switching to build-file mode"
        );
        self.install(registry, session, include_dirs);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn lookup_symbol(&mut self, name: &str) -> Vec<SymbolLocation> {
        self.index().lookup_symbol(name).to_vec()
    }

    pub fn lookup_macro(&mut self, name: &str) -> Vec<MacroLocation> {
        self.index().lookup_macro(name).to_vec()
    }

    pub fn lookup_referencing_files(&mut self, name: &str) -> Vec<Arc<Path>> {
        let files = self.index().lookup_referencing_files(name).to_vec();
        files.into_iter().map(|id| self.interner.lookup(id)).collect()
    }

    pub fn workspace_symbols(&mut self, query: &str) -> Vec<WorkspaceSymbol> {
        self.index().workspace_symbols(query)
    }

    /// Files declaring a module named `name`.
    pub fn files_containing_module(&mut self, name: &str) -> Vec<Arc<Path>> {
        let mut files: Vec<PathId> = Vec::new();
        for location in self.index().lookup_symbol(name) {
            if location.kind == DeclKind::Module && !files.contains(&location.file) {
                files.push(location.file);
            }
        }
        files.into_iter().map(|id| self.interner.lookup(id)).collect()
    }

    /// Modules the index holds for `path`.
    pub fn modules_in_file(&mut self, path: &Path) -> Vec<SmolStr> {
        let Some(id) = self.interner.get(path) else {
            return Vec::new();
        };
        self.index()
            .record(id)
            .map(|record| {
                record
                    .symbols
                    .iter()
                    .filter(|symbol| symbol.kind == DeclKind::Module)
                    .map(|symbol| symbol.name.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// The workspace index, once any bulk run has been merged.
    pub fn index(&mut self) -> &WorkspaceIndex {
        self.indexer.wait_for_indexing_completion();
        self.indexer.index()
    }

    pub fn get_document(&self, path: &Path) -> Option<&Document> {
        self.registry.get(path)
    }

    pub fn document_state(&self, path: &Path) -> DocumentState {
        match self.registry.state(path) {
            DocumentState::Unknown => {
                let indexed = self
                    .interner
                    .get(path)
                    .is_some_and(|id| self.indexer.index().contains(id));
                if indexed || path.is_file() {
                    DocumentState::Known
                } else {
                    DocumentState::Unknown
                }
            }
            state => state,
        }
    }

    pub fn active_session(&self) -> &CompilationSession {
        &self.session
    }

    /// Diagnostics currently shown for `path`.
    pub fn diagnostics(&self, path: &Path) -> &[Diagnostic] {
        match self.interner.get(path) {
            Some(id) => self.publisher.diagnostics(id),
            None => &[],
        }
    }

    pub fn interner(&self) -> &Arc<PathInterner> {
        &self.interner
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn is_indexing(&self) -> bool {
        self.indexer.is_indexing()
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    /// An empty registry holding the current open documents.
    fn next_registry(&self) -> DocumentRegistry {
        let mut registry = self.registry.fresh();
        registry.restore(self.registry.snapshot_open());
        registry
    }

    /// Replace the registry and session, then republish from scratch.
    fn install(
        &mut self,
        registry: DocumentRegistry,
        session: CompilationSession,
        include_dirs: Vec<PathBuf>,
    ) {
        self.registry = registry;
        self.session = session;
        self.include_dirs = include_dirs;

        self.publisher.clear_all();
        if self.session.is_full() {
            self.publisher.replace_all(self.session.diagnostics_by_member());
        } else {
            let open: Vec<PathId> = self.registry.open_ids().collect();
            for id in open {
                self.analyze_open_document(id);
            }
        }
        self.flush();
    }

    fn build_top_level(
        &self,
        path: &Path,
        registry: &mut DocumentRegistry,
        include_dirs: &[PathBuf],
    ) -> Result<CompilationSession, SessionError> {
        let includes = WorkspaceIncludes::new(self.indexer.index(), &self.interner, include_dirs);
        let root = registry.get_or_load(path, &includes)?;
        let Some(top) = self.front_end.top_candidates(root.tree()).into_iter().next() else {
            return Err(SessionError::NoTopModules(path.to_path_buf()));
        };

        let sources = DependencySources {
            index: self.indexer.index(),
            interner: &self.interner,
            includes: &includes,
        };
        let mut members = vec![root.clone()];
        members.extend(resolve_dependents(&root, ExpansionPolicy::Transitive, &sources, registry));

        let mode = SessionMode::TopLevel {
            root: root.id(),
            top,
        };
        Ok(CompilationSession::build(mode, members, self.front_end.as_ref()))
    }

    /// Recompute a TopLevel session's members after the index changed.
    fn rebuild_top_level(&mut self, root: PathId, top: SmolStr) {
        let root = match self.registry.get_by_id(root) {
            Some(document) => document.clone(),
            None => {
                warn!(root = %self.interner.lookup(root).display(), "top-level root is gone");
                self.refresh_session();
                return;
            }
        };

        let includes =
            WorkspaceIncludes::new(self.indexer.index(), &self.interner, &self.include_dirs);
        let sources = DependencySources {
            index: self.indexer.index(),
            interner: &self.interner,
            includes: &includes,
        };
        let mut members = vec![root.clone()];
        members.extend(resolve_dependents(
            &root,
            ExpansionPolicy::Transitive,
            &sources,
            &mut self.registry,
        ));

        let mode = SessionMode::TopLevel {
            root: root.id(),
            top,
        };
        self.session = CompilationSession::build(mode, members, self.front_end.as_ref());
        self.publisher.replace_all(self.session.diagnostics_by_member());
    }

    fn refresh_session(&mut self) {
        if !self.session.is_full() {
            return;
        }
        self.session.refresh(&self.registry, self.front_end.as_ref());
        self.publisher.replace_all(self.session.diagnostics_by_member());
    }

    /// Stage diagnostics for one open document analyzed on its own.
    fn analyze_open_document(&mut self, id: PathId) {
        if !self.registry.is_open(id) {
            return;
        }
        let Some(document) = self.registry.get_by_id(id).cloned() else {
            return;
        };
        let includes =
            WorkspaceIncludes::new(self.indexer.index(), &self.interner, &self.include_dirs);
        let sources = DependencySources {
            index: self.indexer.index(),
            interner: &self.interner,
            includes: &includes,
        };
        let dependents = resolve_dependents(
            &document,
            ExpansionPolicy::PackagesOnly,
            &sources,
            &mut self.registry,
        );
        let diagnostics = analyze_document(&document, &dependents, self.front_end.as_ref());
        self.publisher.stage(id, diagnostics);
    }

    /// Reload a session member evicted after an external change. Returns
    /// whether the session needs refreshing.
    fn reload_member(&mut self, path: &Path, id: Option<PathId>) -> bool {
        let Some(id) = id.filter(|id| self.session.contains(*id)) else {
            return false;
        };
        let includes =
            WorkspaceIncludes::new(self.indexer.index(), &self.interner, &self.include_dirs);
        if let Err(e) = self.registry.get_or_load(path, &includes) {
            warn!(file = %path.display(), error = %e, "failed to reload changed member");
        }
        debug!(member = id.index(), "reloaded changed member");
        true
    }

    fn should_index(&self, path: &Path) -> bool {
        let excludes: Vec<&str> = self.config.exclude_dirs.iter().map(String::as_str).collect();
        let source = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext));
        source && !is_excluded(path, &excludes)
    }

    fn flush(&mut self) {
        self.publisher.flush(&self.interner, self.client.as_ref());
    }
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("mode", self.session.mode())
            .field("registry", &self.registry)
            .field("indexed_files", &self.indexer.index().file_count())
            .finish_non_exhaustive()
    }
}
