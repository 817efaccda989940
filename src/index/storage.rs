//! Workspace index tables.
//!
//! Four name-keyed tables (symbols, macros, references, basenames) are
//! built from one [`ExtractedFileRecord`] per file. The record itself is
//! stored too, so a file's contributions can be removed or replaced without
//! touching the disk.

use std::path::Path;

use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use tracing::error;

use crate::base::{PathId, Span};
use crate::syntax::DeclKind;

/// A top-level declaration as stored in the index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedSymbol {
    pub name: SmolStr,
    pub kind: DeclKind,
    /// Span of the declared name.
    pub span: Span,
}

/// A `` `define `` as stored in the index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedMacro {
    pub name: SmolStr,
    pub span: Span,
}

/// Everything one file contributes to the index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedFileRecord {
    pub path: PathId,
    /// File name without directories.
    pub basename: SmolStr,
    pub symbols: Vec<IndexedSymbol>,
    /// All macros the file defines. Only indexed when `symbols` is empty.
    pub macros: Vec<IndexedMacro>,
    /// Names used but not declared in the file.
    pub referenced: Vec<SmolStr>,
}

impl ExtractedFileRecord {
    /// An empty record for `path`.
    pub fn new(path: PathId, file_path: &Path) -> Self {
        let basename = file_path
            .file_name()
            .map(|n| SmolStr::new(n.to_string_lossy()))
            .unwrap_or_default();
        Self {
            path,
            basename,
            symbols: Vec::new(),
            macros: Vec::new(),
            referenced: Vec::new(),
        }
    }

    /// Whether this record's macros go into the macro table.
    ///
    /// Only files with no declarations are treated as macro headers.
    pub fn indexes_macros(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// Where a symbol is declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymbolLocation {
    pub file: PathId,
    pub kind: DeclKind,
    pub span: Span,
}

/// Where a macro is defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MacroLocation {
    pub file: PathId,
    pub span: Span,
}

/// Entry returned by [`WorkspaceIndex::workspace_symbols`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceSymbol {
    pub name: SmolStr,
    pub location: SymbolLocation,
}

/// Name-keyed tables over every indexed file.
///
/// For each file the entries across all tables are exactly those of its
/// stored record.
#[derive(Debug, Clone, Default)]
pub struct WorkspaceIndex {
    records: FxHashMap<PathId, ExtractedFileRecord>,
    symbols: FxHashMap<SmolStr, Vec<SymbolLocation>>,
    macros: FxHashMap<SmolStr, Vec<MacroLocation>>,
    references: FxHashMap<SmolStr, Vec<PathId>>,
    basenames: FxHashMap<SmolStr, Vec<PathId>>,
}

impl WorkspaceIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `record`, replacing whatever its path contributed before.
    pub fn add_or_replace(&mut self, record: ExtractedFileRecord) {
        if let Some(old) = self.records.remove(&record.path) {
            self.unlink(&old);
        }
        self.link(&record);
        self.records.insert(record.path, record);
    }

    /// Remove every entry contributed by `path`, using its stored record.
    ///
    /// Returns the removed record. Removing a path that was never added is
    /// a caller bug.
    pub fn remove(&mut self, path: PathId) -> Option<ExtractedFileRecord> {
        let removed = self.records.remove(&path);
        debug_assert!(removed.is_some(), "removing unindexed path {path:?}");
        match &removed {
            Some(record) => self.unlink(record),
            None => error!(path = path.index(), "removing unindexed path"),
        }
        removed
    }

    pub fn contains(&self, path: PathId) -> bool {
        self.records.contains_key(&path)
    }

    pub fn record(&self, path: PathId) -> Option<&ExtractedFileRecord> {
        self.records.get(&path)
    }

    /// Every declaration of `name`.
    pub fn lookup_symbol(&self, name: &str) -> &[SymbolLocation] {
        self.symbols.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    /// Every indexed definition of macro `name`.
    pub fn lookup_macro(&self, name: &str) -> &[MacroLocation] {
        self.macros.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    /// Files that use `name` without declaring it.
    pub fn lookup_referencing_files(&self, name: &str) -> &[PathId] {
        self.references.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    /// Files declaring `name`, in index order, without duplicates.
    pub fn files_for_name(&self, name: &str) -> Vec<PathId> {
        let mut files: Vec<PathId> = Vec::new();
        for location in self.lookup_symbol(name) {
            if !files.contains(&location.file) {
                files.push(location.file);
            }
        }
        files
    }

    /// Files whose name (without directories) is `basename`.
    pub fn files_by_basename(&self, basename: &str) -> &[PathId] {
        self.basenames.get(basename).map(Vec::as_slice).unwrap_or_default()
    }

    /// All symbols whose name contains `query`, ignoring ASCII case.
    ///
    /// Sorted by name, then by file id. An empty query matches everything.
    pub fn workspace_symbols(&self, query: &str) -> Vec<WorkspaceSymbol> {
        let query = query.to_ascii_lowercase();
        let mut out: Vec<WorkspaceSymbol> = self
            .symbols
            .iter()
            .filter(|(name, _)| query.is_empty() || name.to_ascii_lowercase().contains(&query))
            .flat_map(|(name, locations)| {
                locations.iter().map(move |location| WorkspaceSymbol {
                    name: name.clone(),
                    location: *location,
                })
            })
            .collect();
        out.sort_by(|a, b| {
            a.name
                .cmp(&b.name)
                .then(a.location.file.cmp(&b.location.file))
        });
        out
    }

    pub fn file_count(&self) -> usize {
        self.records.len()
    }

    pub fn symbol_count(&self) -> usize {
        self.symbols.values().map(Vec::len).sum()
    }

    pub fn macro_count(&self) -> usize {
        self.macros.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn files(&self) -> impl Iterator<Item = PathId> + '_ {
        self.records.keys().copied()
    }

    fn link(&mut self, record: &ExtractedFileRecord) {
        let file = record.path;
        for symbol in &record.symbols {
            self.symbols
                .entry(symbol.name.clone())
                .or_default()
                .push(SymbolLocation {
                    file,
                    kind: symbol.kind,
                    span: symbol.span,
                });
        }
        if record.indexes_macros() {
            for def in &record.macros {
                self.macros.entry(def.name.clone()).or_default().push(MacroLocation {
                    file,
                    span: def.span,
                });
            }
        }
        for name in &record.referenced {
            let files = self.references.entry(name.clone()).or_default();
            if !files.contains(&file) {
                files.push(file);
            }
        }
        if !record.basename.is_empty() {
            self.basenames
                .entry(record.basename.clone())
                .or_default()
                .push(file);
        }
    }

    fn unlink(&mut self, record: &ExtractedFileRecord) {
        let file = record.path;
        for symbol in &record.symbols {
            retain_or_drop(&mut self.symbols, &symbol.name, |l| l.file != file);
        }
        if record.indexes_macros() {
            for def in &record.macros {
                retain_or_drop(&mut self.macros, &def.name, |l| l.file != file);
            }
        }
        for name in &record.referenced {
            retain_or_drop(&mut self.references, name, |f| *f != file);
        }
        retain_or_drop(&mut self.basenames, &record.basename, |f| *f != file);
    }
}

/// Filter one table entry, dropping the key once nothing is left.
fn retain_or_drop<T>(
    table: &mut FxHashMap<SmolStr, Vec<T>>,
    key: &str,
    keep: impl FnMut(&T) -> bool,
) {
    if let Some(list) = table.get_mut(key) {
        list.retain(keep);
        if list.is_empty() {
            table.remove(key);
        }
    }
}
