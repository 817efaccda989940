//! `` `include `` resolution backed by the workspace index.

use std::path::{Path, PathBuf};

use tracing::trace;

use super::storage::WorkspaceIndex;
use crate::base::PathInterner;
use crate::hir::IncludeResolver;

/// Resolves include targets against the including file's directory, the
/// configured include directories, and finally the index's basename table.
#[derive(Debug, Clone, Copy)]
pub struct WorkspaceIncludes<'a> {
    index: &'a WorkspaceIndex,
    interner: &'a PathInterner,
    include_dirs: &'a [PathBuf],
}

impl<'a> WorkspaceIncludes<'a> {
    pub fn new(
        index: &'a WorkspaceIndex,
        interner: &'a PathInterner,
        include_dirs: &'a [PathBuf],
    ) -> Self {
        Self {
            index,
            interner,
            include_dirs,
        }
    }

    fn from_index(&self, target: &Path) -> Option<PathBuf> {
        let basename = target.file_name()?.to_str()?;
        let candidates: Vec<_> = self
            .index
            .files_by_basename(basename)
            .iter()
            .map(|id| self.interner.lookup(*id))
            .collect();
        // Prefer a file whose trailing components match the whole target.
        candidates
            .iter()
            .find(|path| path.ends_with(target))
            .or_else(|| candidates.first())
            .map(|path| path.to_path_buf())
    }
}

impl IncludeResolver for WorkspaceIncludes<'_> {
    fn resolve(&self, including: &Path, target: &str) -> Option<PathBuf> {
        let target = Path::new(target);
        if target.is_absolute() {
            return target.is_file().then(|| target.to_path_buf());
        }

        let local = including.parent().map(|dir| dir.join(target));
        let found = local
            .into_iter()
            .chain(self.include_dirs.iter().map(|dir| dir.join(target)))
            .find(|candidate| candidate.is_file())
            .or_else(|| self.from_index(target));
        trace!(
            including = %including.display(),
            target = %target.display(),
            found = ?found,
            "resolve include"
        );
        found
    }
}
