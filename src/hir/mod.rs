//! High-level IR (HIR) - the front-end seam and elaboration.
//!
//! ## Key Types
//!
//! - [`FrontEnd`] - Parsing and elaboration as consumed by the index and
//!   the sessions
//! - [`ShallowFrontEnd`] - Built-in implementation over the structural parser
//! - [`SessionMode`] - Which files compile together
//! - [`Elaboration`] - Definitions and diagnostics for a member set
//! - [`Diagnostic`] - A located error or warning
//!
//! ## Layers
//!
//! ```text
//! parse_text(path, text)        ← per file, optional include expansion
//!     │
//!     ▼
//! SyntaxTree + FileMetadata     ← declarations, macros, references
//!     │
//!     ▼
//! elaborate(units, mode)        ← duplicates, unresolved references
//!     │
//!     ▼
//! Vec<Diagnostic>
//! ```

mod diagnostics;
mod elaborate;
mod frontend;

pub use diagnostics::{Diagnostic, DiagnosticCollector, RelatedInfo, Severity, codes};
pub use elaborate::{
    Definition, Elaboration, ElaborationUnit, SessionMode, elaborate_units, top_candidates,
};
pub use frontend::{
    FrontEnd, FrontEndError, IncludeResolver, NoIncludes, ParseOptions, ShallowFrontEnd,
};
