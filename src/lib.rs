//! # svindex-base
//!
//! Workspace index and compilation session orchestration for a
//! SystemVerilog language server.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! session   → Documents, compilation sessions, SessionManager
//!   ↓
//! index     → Workspace index tables, file scanner, background indexer
//!   ↓
//! hir       → Front-end seam, shallow elaboration, diagnostics
//!   ↓
//! project   → Glob crawl, command files, configuration
//!   ↓
//! syntax    → SyntaxTree and per-file metadata
//!   ↓
//! parser    → Logos lexer, rowan recursive-descent parser
//!   ↓
//! base      → Primitives (PathId interning, LineIndex, TextRange)
//! ```

// ============================================================================
// MODULES (dependency order: base → parser → syntax → project → hir → index → session)
// ============================================================================

/// Foundation types: PathId interning, positions, text edits
pub mod base;

/// Parser: Logos lexer, structural recursive-descent parser
pub mod parser;

/// Syntax: parsed buffers and their declarations, macros and references
pub mod syntax;

/// Project inputs: file discovery, command files, server configuration
pub mod project;

/// Front-end seam, elaboration and diagnostics
pub mod hir;

/// Workspace index and indexing
pub mod index;

/// Documents, compilation sessions and the session manager
pub mod session;

// Re-export foundation types
pub use base::{LineCol, LineIndex, PathId, PathInterner, Span, TextChange, TextRange, TextSize};

// Re-export the orchestration surface
pub use hir::{Diagnostic, FrontEnd, SessionMode, Severity, ShallowFrontEnd};
pub use index::{WorkspaceIndex, WorkspaceSymbol};
pub use project::ServerConfig;
pub use session::{
    CompilationSession, DiagnosticsClient, Document, FileEvent, SessionError, SessionManager,
};
