//! The compiler front-end seam.
//!
//! Everything above this module talks to parsing and elaboration through
//! [`FrontEnd`]. [`ShallowFrontEnd`] is the built-in implementation backed
//! by the structural parser.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rustc_hash::FxHashSet;
use smol_str::SmolStr;
use thiserror::Error;
use tracing::{debug, trace, warn};

use super::elaborate::{Elaboration, ElaborationUnit, SessionMode, elaborate_units, top_candidates};
use crate::base::TextChange;
use crate::syntax::{IncludedFile, SyntaxTree};

/// Errors from the front end.
#[derive(Debug, Error)]
pub enum FrontEndError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Parse settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParseOptions {
    /// How many levels of `` `include `` to follow. `0` parses the buffer
    /// in isolation.
    pub include_depth: u32,
}

impl ParseOptions {
    /// Isolated parse, as used by the indexer.
    pub const ISOLATED: ParseOptions = ParseOptions { include_depth: 0 };

    pub fn with_include_depth(include_depth: u32) -> Self {
        Self { include_depth }
    }
}

/// Maps an `` `include `` target to a file on disk.
pub trait IncludeResolver {
    /// Resolve `target` as written in `including`.
    fn resolve(&self, including: &Path, target: &str) -> Option<PathBuf>;
}

/// Resolver that never finds anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoIncludes;

impl IncludeResolver for NoIncludes {
    fn resolve(&self, _including: &Path, _target: &str) -> Option<PathBuf> {
        None
    }
}

/// Parsing and elaboration, as consumed by the index and the sessions.
pub trait FrontEnd: Send + Sync {
    /// Parse an in-memory buffer.
    fn parse_text(
        &self,
        path: &Path,
        text: &str,
        options: &ParseOptions,
        includes: &dyn IncludeResolver,
    ) -> SyntaxTree;

    /// Read and parse a file from disk.
    fn parse_file(
        &self,
        path: &Path,
        options: &ParseOptions,
        includes: &dyn IncludeResolver,
    ) -> Result<SyntaxTree, FrontEndError> {
        let text = std::fs::read_to_string(path).map_err(|source| FrontEndError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(self.parse_text(path, &text, options, includes))
    }

    /// Produce the tree for `new_text`, the result of applying `changes` to
    /// the text of `old`.
    fn reparse_incremental(
        &self,
        path: &Path,
        old: &SyntaxTree,
        new_text: &str,
        changes: &[TextChange],
        options: &ParseOptions,
        includes: &dyn IncludeResolver,
    ) -> SyntaxTree;

    /// Elaborate a member set under `mode`.
    fn elaborate(&self, units: &[ElaborationUnit], mode: &SessionMode) -> Elaboration;

    /// Modules of a file suitable as a design root.
    fn top_candidates(&self, tree: &SyntaxTree) -> Vec<SmolStr> {
        top_candidates(tree)
    }
}

/// Built-in front end over the structural parser.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShallowFrontEnd;

impl ShallowFrontEnd {
    pub fn new() -> Self {
        Self
    }

    /// Load the includes of `tree`, following nested includes up to `depth`
    /// levels. Each file is attached at most once per parse.
    fn load_includes(
        &self,
        path: &Path,
        tree: &SyntaxTree,
        depth: u32,
        resolver: &dyn IncludeResolver,
        visited: &mut FxHashSet<PathBuf>,
    ) -> Vec<IncludedFile> {
        let mut out = Vec::new();
        if depth == 0 {
            return out;
        }
        for include in &tree.metadata().includes {
            let Some(resolved) = resolver.resolve(path, &include.target) else {
                debug!(file = %path.display(), target = %include.target, "include not found");
                continue;
            };
            if !visited.insert(resolved.clone()) {
                continue;
            }
            let text = match std::fs::read_to_string(&resolved) {
                Ok(text) => text,
                Err(e) => {
                    warn!(file = %resolved.display(), error = %e, "failed to read include");
                    continue;
                }
            };
            let child = SyntaxTree::parse(&text);
            let nested = self.load_includes(&resolved, &child, depth - 1, resolver, visited);
            let child = if nested.is_empty() {
                child
            } else {
                child.with_included(nested)
            };
            out.push(IncludedFile {
                path: Arc::from(resolved),
                tree: child,
            });
        }
        out
    }

    fn attach_includes(
        &self,
        path: &Path,
        tree: SyntaxTree,
        options: &ParseOptions,
        includes: &dyn IncludeResolver,
    ) -> SyntaxTree {
        if options.include_depth == 0 || tree.metadata().includes.is_empty() {
            return tree;
        }
        let mut visited = FxHashSet::default();
        visited.insert(path.to_path_buf());
        let included =
            self.load_includes(path, &tree, options.include_depth, includes, &mut visited);
        tree.with_included(included)
    }
}

impl FrontEnd for ShallowFrontEnd {
    fn parse_text(
        &self,
        path: &Path,
        text: &str,
        options: &ParseOptions,
        includes: &dyn IncludeResolver,
    ) -> SyntaxTree {
        let tree = SyntaxTree::parse(text);
        trace!(file = %path.display(), errors = tree.errors().len(), "parsed");
        self.attach_includes(path, tree, options, includes)
    }

    fn reparse_incremental(
        &self,
        path: &Path,
        old: &SyntaxTree,
        new_text: &str,
        changes: &[TextChange],
        options: &ParseOptions,
        includes: &dyn IncludeResolver,
    ) -> SyntaxTree {
        let tree = SyntaxTree::parse(new_text);
        trace!(file = %path.display(), changes = changes.len(), "reparsed");

        // Unchanged include directives keep the already-loaded files.
        let same_targets = old
            .metadata()
            .includes
            .iter()
            .map(|i| &i.target)
            .eq(tree.metadata().includes.iter().map(|i| &i.target));
        if same_targets {
            if old.included().is_empty() {
                return tree;
            }
            return tree.with_included(old.included().to_vec());
        }
        self.attach_includes(path, tree, options, includes)
    }

    fn elaborate(&self, units: &[ElaborationUnit], mode: &SessionMode) -> Elaboration {
        elaborate_units(units, mode)
    }
}
