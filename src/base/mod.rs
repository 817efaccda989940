//! Foundation types for the svindex toolchain.
//!
//! This module provides fundamental types used throughout the crate:
//! - [`PathId`], [`PathInterner`] - Interned, process-stable file identities
//! - [`TextRange`], [`TextSize`] - Source positions (byte offsets)
//! - [`LineCol`], [`LineIndex`] - Line/column conversion
//! - [`Span`] - Line/column ranges for diagnostics
//! - [`TextChange`] - Editor edits and [`apply_changes`]
//!
//! This module has NO dependencies on other svindex modules.

mod paths;
mod position;
mod span;

pub use paths::{PathId, PathInterner, normalize_path};
pub use position::{LineCol, Span, TextChange, apply_changes};
pub use span::{LineIndex, TextRange, TextSize};

// Re-export text-size types for convenience
pub use text_size;
