//! Shallow elaboration over a set of parsed members.
//!
//! Checks what can be checked without a full semantic model: syntax errors,
//! design units declared twice across the member set, and references to
//! units no member declares.

use std::path::PathBuf;

use indexmap::IndexMap;
use smol_str::SmolStr;
use tracing::debug;

use super::diagnostics::{Diagnostic, DiagnosticCollector};
use crate::base::{PathId, Span};
use crate::syntax::{DeclKind, SyntaxTree};

/// Which files compile together, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionMode {
    /// No design root; each open document is analyzed on its own.
    Explore,
    /// A root file and the dependencies discovered through the index.
    TopLevel { root: PathId, top: SmolStr },
    /// An explicit file list read from a command file.
    BuildFile {
        build_file: PathBuf,
        files: Vec<PathId>,
    },
}

impl SessionMode {
    pub fn name(&self) -> &'static str {
        match self {
            SessionMode::Explore => "explore",
            SessionMode::TopLevel { .. } => "top-level",
            SessionMode::BuildFile { .. } => "build-file",
        }
    }

    /// Whether a full compilation (rather than per-document analysis) is
    /// active.
    pub fn is_full(&self) -> bool {
        !matches!(self, SessionMode::Explore)
    }
}

/// One member of an elaboration.
#[derive(Debug, Clone)]
pub struct ElaborationUnit {
    pub file: PathId,
    pub tree: SyntaxTree,
}

/// A design-unit definition visible to the elaboration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Definition {
    pub file: PathId,
    pub kind: DeclKind,
    pub span: Span,
}

/// Result of elaborating a member set.
#[derive(Debug, Clone, Default)]
pub struct Elaboration {
    /// Chosen top module in TopLevel mode.
    pub top: Option<SmolStr>,
    /// First definition of each name, in member order.
    pub definitions: IndexMap<SmolStr, Definition>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Elaboration {
    pub fn diagnostics_for(&self, file: PathId) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(move |d| d.file == file)
    }

    pub fn definition(&self, name: &str) -> Option<&Definition> {
        self.definitions.get(name)
    }
}

/// Elaborate `units` as one compilation.
pub fn elaborate_units(units: &[ElaborationUnit], mode: &SessionMode) -> Elaboration {
    let mut collector = DiagnosticCollector::new();
    let mut definitions: IndexMap<SmolStr, Definition> = IndexMap::new();

    for unit in units {
        for error in unit.tree.errors() {
            collector.syntax_error(unit.file, unit.tree.span(error.range), &error.message);
        }

        for decl in &unit.tree.metadata().declarations {
            let span = unit.tree.span(decl.range);
            match definitions.get(&decl.name) {
                Some(existing) => collector.duplicate_definition(
                    unit.file,
                    span,
                    &decl.name,
                    existing.file,
                    existing.span,
                ),
                None => {
                    definitions.insert(
                        decl.name.clone(),
                        Definition {
                            file: unit.file,
                            kind: decl.kind,
                            span,
                        },
                    );
                }
            }
        }
    }

    for unit in units {
        for reference in &unit.tree.metadata().references {
            if !reference.context.requires_definition()
                || definitions.contains_key(&reference.name)
            {
                continue;
            }
            collector.unresolved_reference(
                unit.file,
                unit.tree.span(reference.range),
                &reference.name,
            );
        }
    }

    let top = match mode {
        SessionMode::TopLevel { top, .. } => Some(top.clone()),
        _ => None,
    };
    let diagnostics = collector.finish();
    debug!(
        mode = mode.name(),
        members = units.len(),
        definitions = definitions.len(),
        diagnostics = diagnostics.len(),
        "elaborated"
    );

    Elaboration {
        top,
        definitions,
        diagnostics,
    }
}

/// Modules of a file that no unit in the same file instantiates.
pub fn top_candidates(tree: &SyntaxTree) -> Vec<SmolStr> {
    let meta = tree.metadata();
    meta.declarations
        .iter()
        .filter(|d| d.kind == DeclKind::Module && !meta.instantiated.contains(&d.name))
        .map(|d| d.name.clone())
        .collect()
}
