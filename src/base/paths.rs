//! Path interner for stable file identities.
//!
//! Every file path the server touches is interned once and referred to by a
//! [`PathId`] afterwards. Storage is append-only: an id handed out stays valid
//! and keeps naming the same path for the lifetime of the interner, even after
//! the file is removed from every index table.

use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

/// Interned file path handle. Cheap to copy, hash and compare.
///
/// Only a [`PathInterner`] creates these, so every id in circulation names a
/// live arena slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PathId(u32);

impl PathId {
    /// Raw slot number, for logging.
    pub fn index(self) -> u32 {
        self.0
    }
}

#[derive(Debug, Default)]
struct Arena {
    paths: Vec<Arc<Path>>,
    ids: FxHashMap<Arc<Path>, PathId>,
}

/// Thread-safe, append-only path interner.
///
/// Interning normalizes the path first (see [`normalize_path`]) so that
/// `a/./b.sv` and `a/b.sv` share an id.
#[derive(Debug, Default)]
pub struct PathInterner {
    arena: RwLock<Arena>,
}

impl PathInterner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a path, returning its stable id.
    pub fn intern(&self, path: impl AsRef<Path>) -> PathId {
        let normalized = normalize_path(path.as_ref());
        if let Some(id) = self.arena.read().ids.get(normalized.as_path()) {
            return *id;
        }

        let mut arena = self.arena.write();
        // Another thread may have won the race between the two locks.
        if let Some(id) = arena.ids.get(normalized.as_path()) {
            return *id;
        }
        let id = PathId(arena.paths.len() as u32);
        let shared: Arc<Path> = Arc::from(normalized);
        arena.paths.push(Arc::clone(&shared));
        arena.ids.insert(shared, id);
        id
    }

    /// Get the id for a path if it has been interned, without creating it.
    pub fn get(&self, path: impl AsRef<Path>) -> Option<PathId> {
        let normalized = normalize_path(path.as_ref());
        self.arena.read().ids.get(normalized.as_path()).copied()
    }

    /// Resolve an id back to its path.
    pub fn lookup(&self, id: PathId) -> Arc<Path> {
        Arc::clone(&self.arena.read().paths[id.0 as usize])
    }

    /// Number of unique paths interned.
    pub fn len(&self) -> usize {
        self.arena.read().paths.len()
    }

    /// Returns true if no paths have been interned.
    pub fn is_empty(&self) -> bool {
        self.arena.read().paths.is_empty()
    }
}

/// Normalize a path for interning.
///
/// The result does not depend on whether the file exists, so a buffer keeps
/// its id across save and delete. Relative paths are joined to the current
/// directory and `.`/`..` are folded lexically. The deepest existing ancestor
/// directory is then canonicalized, which makes symlinked directory spellings
/// agree; the components below it are kept as written.
pub fn normalize_path(path: &Path) -> PathBuf {
    let absolute = if path.is_relative() {
        match std::env::current_dir() {
            Ok(cwd) => cwd.join(path),
            Err(_) => path.to_path_buf(),
        }
    } else {
        path.to_path_buf()
    };
    resolve_ancestors(fold_lexically(&absolute))
}

fn fold_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() && !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

fn resolve_ancestors(path: PathBuf) -> PathBuf {
    let mut tail: Vec<OsString> = Vec::new();
    let mut current = path.as_path();
    loop {
        let (Some(name), Some(parent)) = (current.file_name(), current.parent()) else {
            break;
        };
        tail.push(name.to_os_string());
        if let Ok(mut resolved) = std::fs::canonicalize(parent) {
            resolved.extend(tail.iter().rev());
            return resolved;
        }
        current = parent;
    }
    path
}
