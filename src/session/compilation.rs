//! A compilation session: the documents that compile together under one
//! mode, and what elaborating them produced.

use indexmap::IndexMap;
use tracing::debug;

use super::document::Document;
use super::registry::DocumentRegistry;
use crate::base::PathId;
use crate::hir::{Diagnostic, Elaboration, ElaborationUnit, FrontEnd, SessionMode};

/// One elaborated member set.
///
/// Built fresh on every mode switch. Within a mode it is only refreshed:
/// members are re-read from the registry and elaborated again.
#[derive(Debug, Clone)]
pub struct CompilationSession {
    mode: SessionMode,
    members: IndexMap<PathId, Document>,
    elaboration: Elaboration,
}

impl CompilationSession {
    /// A session with no members. Open documents are analyzed one at a time.
    pub fn explore() -> Self {
        Self {
            mode: SessionMode::Explore,
            members: IndexMap::new(),
            elaboration: Elaboration::default(),
        }
    }

    /// Elaborate `members` under `mode`. Later duplicates of a document
    /// are dropped.
    pub fn build(mode: SessionMode, members: Vec<Document>, front_end: &dyn FrontEnd) -> Self {
        let mut map = IndexMap::with_capacity(members.len());
        for document in members {
            map.entry(document.id()).or_insert(document);
        }
        let elaboration = elaborate(&map, &mode, front_end);
        debug!(mode = mode.name(), members = map.len(), "built compilation session");
        Self {
            mode,
            members: map,
            elaboration,
        }
    }

    /// Re-snapshot every member from `registry` and elaborate again.
    ///
    /// Members the registry no longer holds are dropped.
    pub fn refresh(&mut self, registry: &DocumentRegistry, front_end: &dyn FrontEnd) {
        self.members = self
            .members
            .keys()
            .filter_map(|id| registry.get_by_id(*id).map(|doc| (*id, doc.clone())))
            .collect();
        self.elaboration = elaborate(&self.members, &self.mode, front_end);
        debug!(
            mode = self.mode.name(),
            members = self.members.len(),
            "refreshed compilation session"
        );
    }

    pub fn mode(&self) -> &SessionMode {
        &self.mode
    }

    pub fn is_full(&self) -> bool {
        self.mode.is_full()
    }

    pub fn members(&self) -> impl Iterator<Item = &Document> {
        self.members.values()
    }

    pub fn member_ids(&self) -> impl Iterator<Item = PathId> + '_ {
        self.members.keys().copied()
    }

    pub fn member(&self, id: PathId) -> Option<&Document> {
        self.members.get(&id)
    }

    pub fn contains(&self, id: PathId) -> bool {
        self.members.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn elaboration(&self) -> &Elaboration {
        &self.elaboration
    }

    /// Diagnostics of every member, including members with none.
    pub fn diagnostics_by_member(&self) -> Vec<(PathId, Vec<Diagnostic>)> {
        self.members
            .keys()
            .map(|id| (*id, self.elaboration.diagnostics_for(*id).cloned().collect()))
            .collect()
    }
}

/// Analyze one document together with the dependents loaded for it,
/// keeping only the document's own diagnostics.
pub fn analyze_document(
    document: &Document,
    dependents: &[Document],
    front_end: &dyn FrontEnd,
) -> Vec<Diagnostic> {
    let units: Vec<ElaborationUnit> = std::iter::once(document)
        .chain(dependents)
        .map(unit)
        .collect();
    front_end
        .elaborate(&units, &SessionMode::Explore)
        .diagnostics_for(document.id())
        .cloned()
        .collect()
}

fn elaborate(
    members: &IndexMap<PathId, Document>,
    mode: &SessionMode,
    front_end: &dyn FrontEnd,
) -> Elaboration {
    let units: Vec<ElaborationUnit> = members.values().map(unit).collect();
    front_end.elaborate(&units, mode)
}

fn unit(document: &Document) -> ElaborationUnit {
    ElaborationUnit {
        file: document.id(),
        tree: document.tree().clone(),
    }
}
