//! Immutable document snapshots.

use std::path::Path;
use std::sync::Arc;

use crate::base::PathId;
use crate::syntax::SyntaxTree;

/// One version of a file as the server sees it.
///
/// Edits never mutate a document; they produce the next snapshot.
#[derive(Debug, Clone)]
pub struct Document {
    id: PathId,
    path: Arc<Path>,
    tree: SyntaxTree,
    last_saved_text: Arc<str>,
}

impl Document {
    /// A document whose current text is also its saved text.
    pub fn new(id: PathId, path: Arc<Path>, tree: SyntaxTree) -> Self {
        let last_saved_text = tree.shared_text();
        Self {
            id,
            path,
            tree,
            last_saved_text,
        }
    }

    pub fn id(&self) -> PathId {
        self.id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn shared_path(&self) -> Arc<Path> {
        Arc::clone(&self.path)
    }

    /// Current (possibly unsaved) text.
    pub fn text(&self) -> &str {
        self.tree.text()
    }

    pub fn tree(&self) -> &SyntaxTree {
        &self.tree
    }

    pub fn last_saved_text(&self) -> &str {
        &self.last_saved_text
    }

    /// Whether the buffer differs from the last saved text.
    pub fn is_dirty(&self) -> bool {
        self.text() != &*self.last_saved_text
    }

    /// The next version with `tree` as its content.
    pub fn with_tree(&self, tree: SyntaxTree) -> Self {
        Self {
            id: self.id,
            path: Arc::clone(&self.path),
            tree,
            last_saved_text: Arc::clone(&self.last_saved_text),
        }
    }

    /// This version, marked as saved.
    pub fn saved(&self) -> Self {
        Self {
            last_saved_text: self.tree.shared_text(),
            ..self.clone()
        }
    }
}
