//! Per-file extraction for the workspace index.
//!
//! Scanning is the scatter half of bulk indexing: every file is parsed in
//! isolation and turned into an owned [`FileExtract`]. Nothing here touches
//! the shared tables.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rayon::prelude::*;
use smol_str::SmolStr;
use tracing::{debug, warn};

use super::storage::{ExtractedFileRecord, IndexedMacro, IndexedSymbol};
use crate::base::PathId;
use crate::hir::{FrontEnd, FrontEndError, NoIncludes, ParseOptions};
use crate::syntax::SyntaxTree;

/// Below this many files the scan runs on the calling thread.
pub const MIN_FILES_FOR_THREADING: usize = 4;

/// What one file contributes to the index, before its path is interned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileExtract {
    pub path: PathBuf,
    pub symbols: Vec<IndexedSymbol>,
    pub macros: Vec<IndexedMacro>,
    pub referenced: Vec<SmolStr>,
}

impl FileExtract {
    /// Attach the interned id, producing the stored record.
    pub fn into_record(self, id: PathId) -> ExtractedFileRecord {
        let mut record = ExtractedFileRecord::new(id, &self.path);
        record.symbols = self.symbols;
        record.macros = self.macros;
        record.referenced = self.referenced;
        record
    }
}

/// Parses files in isolation and extracts their index contributions.
#[derive(Clone)]
pub struct FileScanner {
    front_end: Arc<dyn FrontEnd>,
}

impl FileScanner {
    pub fn new(front_end: Arc<dyn FrontEnd>) -> Self {
        Self { front_end }
    }

    /// Read and extract one file with includes disabled.
    pub fn extract(&self, path: &Path) -> Result<FileExtract, FrontEndError> {
        let tree = self
            .front_end
            .parse_file(path, &ParseOptions::ISOLATED, &NoIncludes)?;
        Ok(Self::extract_tree(path, &tree))
    }

    /// Extract from an already-parsed tree.
    ///
    /// Only outer declarations are kept, and only macros defined in the
    /// buffer itself, so an include-expanded tree yields the same record as
    /// an isolated parse.
    pub fn extract_tree(path: &Path, tree: &SyntaxTree) -> FileExtract {
        let meta = tree.metadata();
        let symbols = meta
            .declarations
            .iter()
            .map(|decl| IndexedSymbol {
                name: decl.name.clone(),
                kind: decl.kind,
                span: tree.span(decl.range),
            })
            .collect();
        let macros = meta
            .local_macros()
            .map(|def| IndexedMacro {
                name: def.name.clone(),
                span: tree.span(def.range),
            })
            .collect();
        let referenced = meta.referenced_names().cloned().collect();

        FileExtract {
            path: path.to_path_buf(),
            symbols,
            macros,
            referenced,
        }
    }

    /// Extract every file in `paths`, in order, skipping failures.
    ///
    /// Uses a dedicated pool of `threads` workers (`0` lets rayon choose)
    /// once there are at least [`MIN_FILES_FOR_THREADING`] files.
    pub fn scan(&self, paths: &[PathBuf], threads: usize) -> Vec<FileExtract> {
        if paths.len() < MIN_FILES_FOR_THREADING {
            return paths.iter().filter_map(|path| self.extract_logged(path)).collect();
        }

        let pool = match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
            Ok(pool) => pool,
            Err(e) => {
                warn!(error = %e, "failed to build indexing pool, scanning serially");
                return paths.iter().filter_map(|path| self.extract_logged(path)).collect();
            }
        };
        debug!(files = paths.len(), workers = pool.current_num_threads(), "parallel scan");
        pool.install(|| {
            paths
                .par_iter()
                .filter_map(|path| self.extract_logged(path))
                .collect()
        })
    }

    fn extract_logged(&self, path: &Path) -> Option<FileExtract> {
        match self.extract(path) {
            Ok(extract) => Some(extract),
            Err(e) => {
                warn!(file = %path.display(), error = %e, "skipping file");
                None
            }
        }
    }
}

impl std::fmt::Debug for FileScanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileScanner").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hir::ShallowFrontEnd;
    use crate::syntax::DeclKind;
    use std::fs;

    fn scanner() -> FileScanner {
        FileScanner::new(Arc::new(ShallowFrontEnd::new()))
    }

    #[test]
    fn test_extract_outer_declarations() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.sv");
        fs::write(
            &path,
            "`define LOCAL 1\nmodule m1;\n  class inner; endclass\n  leaf u();\nendmodule\n",
        )
        .unwrap();

        let extract = scanner().extract(&path).unwrap();
        let symbols: Vec<_> = extract.symbols.iter().map(|s| (s.name.as_str(), s.kind)).collect();
        assert_eq!(symbols, vec![("m1", DeclKind::Module)]);
        assert_eq!(extract.macros.len(), 1);
        assert_eq!(extract.referenced, vec!["leaf"]);
        assert_eq!(extract.symbols[0].span.start.line, 1);
    }

    #[test]
    fn test_extract_tree_keeps_local_macros_only() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("defs.svh"), "`define FROM_HEADER 1\n").unwrap();
        let top = dir.path().join("top.sv");
        let text = "`include \"defs.svh\"\n`define OWN 2\n";

        struct Sibling;
        impl crate::hir::IncludeResolver for Sibling {
            fn resolve(&self, including: &Path, target: &str) -> Option<PathBuf> {
                Some(including.parent()?.join(target))
            }
        }
        let tree = ShallowFrontEnd::new().parse_text(
            &top,
            text,
            &ParseOptions::with_include_depth(2),
            &Sibling,
        );
        assert_eq!(tree.metadata().macros.len(), 2);

        let extract = FileScanner::extract_tree(&top, &tree);
        let macros: Vec<_> = extract.macros.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(macros, vec!["OWN"]);
    }

    #[test]
    fn test_scan_skips_failures_and_keeps_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut paths = Vec::new();
        for i in 0..6 {
            let path = dir.path().join(format!("m{i}.sv"));
            fs::write(&path, format!("module m{i}; endmodule\n")).unwrap();
            paths.push(path);
        }
        paths.insert(2, dir.path().join("missing.sv"));

        let extracts = scanner().scan(&paths, 2);
        let names: Vec<_> = extracts.iter().map(|e| e.symbols[0].name.as_str()).collect();
        assert_eq!(names, vec!["m0", "m1", "m2", "m3", "m4", "m5"]);
    }

    #[test]
    fn test_scan_small_batch_serial() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("p.sv");
        fs::write(&path, "package p; endpackage\n").unwrap();
        let extracts = scanner().scan(std::slice::from_ref(&path), 0);
        assert_eq!(extracts.len(), 1);
        assert_eq!(extracts[0].symbols[0].kind, DeclKind::Package);
    }
}
