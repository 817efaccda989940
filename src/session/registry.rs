//! Document registry: every parsed file the server holds, and which of
//! them the editor has open.

use std::path::Path;
use std::sync::Arc;

use indexmap::IndexSet;
use rustc_hash::FxHashMap;
use tracing::{debug, warn};

use super::document::Document;
use super::error::SessionError;
use crate::base::{PathId, PathInterner, TextChange, apply_changes};
use crate::hir::{FrontEnd, FrontEndError, IncludeResolver, ParseOptions};

/// Lifecycle state of a path as far as the registry can tell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentState {
    /// Never seen.
    Unknown,
    /// Parsed and cached, not open in the editor.
    Known,
    /// Open in the editor; may differ from disk.
    Open,
}

/// The open documents with their live text, in open order.
///
/// Taken before a mode switch and restored into the replacement registry.
#[derive(Debug, Clone, Default)]
pub struct OpenDocuments {
    documents: Vec<Document>,
}

impl OpenDocuments {
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

/// Cached documents plus the editor's open set.
pub struct DocumentRegistry {
    interner: Arc<PathInterner>,
    front_end: Arc<dyn FrontEnd>,
    options: ParseOptions,
    documents: FxHashMap<PathId, Document>,
    open: IndexSet<PathId>,
}

impl DocumentRegistry {
    pub fn new(
        interner: Arc<PathInterner>,
        front_end: Arc<dyn FrontEnd>,
        options: ParseOptions,
    ) -> Self {
        Self {
            interner,
            front_end,
            options,
            documents: FxHashMap::default(),
            open: IndexSet::new(),
        }
    }

    /// An empty registry with the same front end and options.
    pub fn fresh(&self) -> Self {
        Self::new(Arc::clone(&self.interner), Arc::clone(&self.front_end), self.options)
    }

    /// Open `path` with the editor's `text`.
    ///
    /// A cached document with identical text is reused as is.
    pub fn open(&mut self, path: &Path, text: &str, includes: &dyn IncludeResolver) -> Document {
        let id = self.interner.intern(path);
        let document = match self.documents.get(&id) {
            Some(existing) if existing.text() == text => existing.clone(),
            _ => {
                let path = self.interner.lookup(id);
                let tree = self.front_end.parse_text(&path, text, &self.options, includes);
                Document::new(id, path, tree)
            }
        };
        self.documents.insert(id, document.clone());
        self.open.insert(id);
        debug!(file = %path.display(), "opened");
        document
    }

    /// Apply editor `changes` to an open or cached document and reparse.
    pub fn apply_changes(
        &mut self,
        path: &Path,
        changes: &[TextChange],
        includes: &dyn IncludeResolver,
    ) -> Result<Document, SessionError> {
        let current = self
            .get(path)
            .ok_or_else(|| SessionError::DocumentNotFound(path.to_path_buf()))?;
        let new_text = apply_changes(current.text(), changes);
        let tree = self.front_end.reparse_incremental(
            current.path(),
            current.tree(),
            &new_text,
            changes,
            &self.options,
            includes,
        );
        let document = current.with_tree(tree);
        self.documents.insert(document.id(), document.clone());
        Ok(document)
    }

    /// Mark a document saved.
    ///
    /// When the editor supplies the saved text and it differs from the
    /// buffer, a change notification was missed; the buffer is replaced by
    /// the editor's text before saving.
    pub fn mark_saved(
        &mut self,
        path: &Path,
        saved_text: Option<&str>,
        includes: &dyn IncludeResolver,
    ) -> Result<Document, SessionError> {
        let current = self
            .get(path)
            .ok_or_else(|| SessionError::DocumentNotFound(path.to_path_buf()))?;
        let current = match saved_text {
            Some(text) if text != current.text() => {
                warn!(file = %path.display(), "buffer out of sync with saved text, reloading");
                let tree = self
                    .front_end
                    .parse_text(current.path(), text, &self.options, includes);
                current.with_tree(tree)
            }
            _ => current.clone(),
        };
        let document = current.saved();
        self.documents.insert(document.id(), document.clone());
        Ok(document)
    }

    /// Drop `path` from the open set, keeping its cached document.
    pub fn close(&mut self, path: &Path) -> bool {
        match self.interner.get(path) {
            Some(id) => self.open.shift_remove(&id),
            None => false,
        }
    }

    /// Forget `path` entirely, open or not.
    pub fn remove(&mut self, path: &Path) -> Option<Document> {
        let id = self.interner.get(path)?;
        self.open.shift_remove(&id);
        self.documents.remove(&id)
    }

    pub fn get(&self, path: &Path) -> Option<&Document> {
        let id = self.interner.get(path)?;
        self.documents.get(&id)
    }

    pub fn get_by_id(&self, id: PathId) -> Option<&Document> {
        self.documents.get(&id)
    }

    /// The cached document for `path`, reading and parsing it on a miss.
    pub fn get_or_load(
        &mut self,
        path: &Path,
        includes: &dyn IncludeResolver,
    ) -> Result<Document, FrontEndError> {
        let id = self.interner.intern(path);
        if let Some(document) = self.documents.get(&id) {
            return Ok(document.clone());
        }
        let path = self.interner.lookup(id);
        let tree = self.front_end.parse_file(&path, &self.options, includes)?;
        let document = Document::new(id, path, tree);
        self.documents.insert(id, document.clone());
        debug!(file = %document.path().display(), "loaded");
        Ok(document)
    }

    pub fn state(&self, path: &Path) -> DocumentState {
        let Some(id) = self.interner.get(path) else {
            return DocumentState::Unknown;
        };
        if self.open.contains(&id) {
            DocumentState::Open
        } else if self.documents.contains_key(&id) {
            DocumentState::Known
        } else {
            DocumentState::Unknown
        }
    }

    pub fn is_open(&self, id: PathId) -> bool {
        self.open.contains(&id)
    }

    /// Open document ids in open order.
    pub fn open_ids(&self) -> impl Iterator<Item = PathId> + '_ {
        self.open.iter().copied()
    }

    /// Capture every open document with its live text.
    pub fn snapshot_open(&self) -> OpenDocuments {
        let documents = self
            .open
            .iter()
            .filter_map(|id| self.documents.get(id).cloned())
            .collect();
        OpenDocuments { documents }
    }

    /// Re-open every document of `snapshot`, unsaved edits included.
    pub fn restore(&mut self, snapshot: OpenDocuments) {
        for document in snapshot.documents {
            let id = document.id();
            self.documents.insert(id, document);
            self.open.insert(id);
        }
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl std::fmt::Debug for DocumentRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentRegistry")
            .field("documents", &self.documents.len())
            .field("open", &self.open)
            .finish_non_exhaustive()
    }
}
