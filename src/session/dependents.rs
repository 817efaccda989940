//! Dependent-document resolution.
//!
//! Starting from one document, follows its referenced names through the
//! workspace index and loads the files that declare them.

use std::collections::VecDeque;

use rustc_hash::FxHashSet;
use smol_str::SmolStr;
use tracing::{debug, trace, warn};

use super::document::Document;
use super::registry::DocumentRegistry;
use crate::base::{PathId, PathInterner};
use crate::hir::IncludeResolver;
use crate::index::WorkspaceIndex;

/// Which loaded files have their own references followed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpansionPolicy {
    /// Only files declaring a package. Modules found along the way supply
    /// their declarations but are not expanded.
    PackagesOnly,
    /// Every loaded file.
    Transitive,
}

impl ExpansionPolicy {
    fn expands(self, document: &Document) -> bool {
        match self {
            ExpansionPolicy::PackagesOnly => document.tree().metadata().declares_package(),
            ExpansionPolicy::Transitive => true,
        }
    }
}

/// Where dependent documents are looked up and loaded from.
pub struct DependencySources<'a> {
    pub index: &'a WorkspaceIndex,
    pub interner: &'a PathInterner,
    pub includes: &'a dyn IncludeResolver,
}

/// Load the documents `root` depends on, each exactly once and in
/// discovery order. `root` itself is not part of the result.
///
/// Names without a declaring file in the index are skipped; elaboration
/// reports them. Files that fail to load are logged and skipped.
pub fn resolve_dependents(
    root: &Document,
    policy: ExpansionPolicy,
    sources: &DependencySources<'_>,
    registry: &mut DocumentRegistry,
) -> Vec<Document> {
    let root_meta = root.tree().metadata();
    let mut known: FxHashSet<SmolStr> = root_meta
        .declarations
        .iter()
        .map(|decl| decl.name.clone())
        .collect();
    let mut processed: FxHashSet<PathId> = FxHashSet::default();
    processed.insert(root.id());
    let mut worklist: VecDeque<SmolStr> = root_meta.referenced_names().cloned().collect();
    let mut result = Vec::new();

    while let Some(name) = worklist.pop_front() {
        if !known.insert(name.clone()) {
            continue;
        }
        let Some(location) = sources.index.lookup_symbol(&name).first() else {
            trace!(name = %name, "no declaring file");
            continue;
        };
        if !processed.insert(location.file) {
            continue;
        }

        let path = sources.interner.lookup(location.file);
        let document = match registry.get_or_load(&path, sources.includes) {
            Ok(document) => document,
            Err(e) => {
                warn!(file = %path.display(), error = %e, "failed to load dependency");
                continue;
            }
        };

        let meta = document.tree().metadata();
        known.extend(meta.declarations.iter().map(|decl| decl.name.clone()));
        if policy.expands(&document) {
            worklist.extend(meta.referenced_names().cloned());
        }
        result.push(document);
    }

    debug!(
        root = %root.path().display(),
        policy = ?policy,
        dependents = result.len(),
        "resolved dependents"
    );
    result
}
