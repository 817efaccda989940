//! Parsed buffers and the structural facts the index reads from them.

mod metadata;
mod tree;

pub use metadata::{
    DeclKind, Declaration, FileMetadata, IncludeRef, MacroDef, MacroOrigin, RefContext,
    Reference,
};
pub use tree::{IncludedFile, SyntaxTree};
