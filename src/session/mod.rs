//! Documents, compilation sessions and the orchestrator tying them to the
//! workspace index.
//!
//! ## Key Types
//!
//! - [`SessionManager`] - Entry point for editor lifecycle events, mode
//!   switches and index queries
//! - [`DocumentRegistry`] - Parsed documents and the editor's open set
//! - [`CompilationSession`] - The member set of the active mode and its
//!   elaboration
//! - [`DiagnosticPublisher`] - Per-path publish state, drained to a
//!   [`DiagnosticsClient`]
//!
//! ## Modes
//!
//! ```text
//! Explore ──set_top_level──► TopLevel { root, top }
//!    ▲  ◄──────set_explore──────┘        │
//!    │                                   │ set_build_file
//!    └──────────set_explore───── BuildFile { build_file, files }
//! ```
//!
//! Every switch snapshots the open documents, builds the new session from
//! that snapshot, and only then replaces the old one and republishes.

mod compilation;
mod dependents;
mod diagnostics;
mod document;
mod error;
mod manager;
mod registry;

pub use compilation::{CompilationSession, analyze_document};
pub use dependents::{DependencySources, ExpansionPolicy, resolve_dependents};
pub use diagnostics::{DiagnosticPublisher, DiagnosticsClient, PublishState};
pub use document::Document;
pub use error::SessionError;
pub use manager::{FileChangeKind, FileEvent, SessionManager};
pub use registry::{DocumentRegistry, DocumentState, OpenDocuments};

pub use crate::base::TextChange;
pub use crate::hir::SessionMode;
