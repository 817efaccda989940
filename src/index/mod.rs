//! Workspace index: which files declare, define and use which names.
//!
//! ## Key Types
//!
//! - [`WorkspaceIndex`] - Symbol, macro, reference and basename tables
//! - [`FileScanner`] - Isolated per-file extraction, optionally parallel
//! - [`Indexer`] - Bulk indexing on a background thread plus the
//!   readiness signal, incremental updates from saved documents
//! - [`WorkspaceIncludes`] - `` `include `` resolution over the index
//!
//! ## Data Flow
//!
//! ```text
//! globs ─► collect_file_paths ─► FileScanner::scan (parallel, owned results)
//!                                      │
//!                                      ▼
//!                 Indexer::wait_for_indexing_completion (single-threaded merge)
//!                                      │
//!                                      ▼
//!                               WorkspaceIndex
//! ```

mod includes;
mod indexer;
mod scanner;
mod storage;

pub use includes::WorkspaceIncludes;
pub use indexer::{BusyGuard, Indexer, IndexingSignal};
pub use scanner::{FileExtract, FileScanner, MIN_FILES_FOR_THREADING};
pub use storage::{
    ExtractedFileRecord, IndexedMacro, IndexedSymbol, MacroLocation, SymbolLocation,
    WorkspaceIndex, WorkspaceSymbol,
};
