//! Immutable parse result for one buffer.

use std::path::Path;
use std::sync::Arc;

use crate::base::{LineCol, LineIndex, Span, TextRange, TextSize};
use crate::parser::{self, AstNode, GreenNode, SourceFile, SyntaxError, SyntaxNode};

use super::metadata::{FileMetadata, MacroDef, MacroOrigin};

/// A file pulled in through `` `include `` while parsing another buffer.
#[derive(Debug, Clone)]
pub struct IncludedFile {
    pub path: Arc<Path>,
    pub tree: SyntaxTree,
}

#[derive(Debug)]
struct TreeData {
    text: Arc<str>,
    green: GreenNode,
    errors: Vec<SyntaxError>,
    line_index: LineIndex,
    included: Vec<IncludedFile>,
    metadata: FileMetadata,
}

/// Parsed buffer with its metadata.
///
/// Cloning is a reference-count bump; the tree is never mutated after
/// construction.
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    data: Arc<TreeData>,
}

impl SyntaxTree {
    /// Parse `text` in isolation, with no includes attached.
    pub fn parse(text: &str) -> Self {
        let parse = parser::parse(text);
        let root = SyntaxNode::new_root(parse.green.clone());
        let metadata = SourceFile::cast(root)
            .map(|file| FileMetadata::collect(&file))
            .unwrap_or_default();

        Self {
            data: Arc::new(TreeData {
                text: Arc::from(text),
                green: parse.green,
                errors: parse.errors,
                line_index: LineIndex::new(text),
                included: Vec::new(),
                metadata,
            }),
        }
    }

    /// The same parse with `included` files attached in place of any
    /// previously attached ones.
    ///
    /// Macros defined by the included files (and their own includes) are
    /// added to the metadata with an [`MacroOrigin::Included`] origin.
    pub fn with_included(&self, included: Vec<IncludedFile>) -> Self {
        let mut metadata = self.data.metadata.clone();
        metadata.macros.retain(|m| m.origin == MacroOrigin::Local);

        for file in &included {
            for def in &file.tree.metadata().macros {
                let origin = match &def.origin {
                    MacroOrigin::Local => MacroOrigin::Included(Arc::clone(&file.path)),
                    other => other.clone(),
                };
                metadata.macros.push(MacroDef {
                    name: def.name.clone(),
                    origin,
                    range: def.range,
                });
            }
        }

        Self {
            data: Arc::new(TreeData {
                text: Arc::clone(&self.data.text),
                green: self.data.green.clone(),
                errors: self.data.errors.clone(),
                line_index: self.data.line_index.clone(),
                included,
                metadata,
            }),
        }
    }

    pub fn text(&self) -> &str {
        &self.data.text
    }

    pub fn shared_text(&self) -> Arc<str> {
        Arc::clone(&self.data.text)
    }

    pub fn green(&self) -> &GreenNode {
        &self.data.green
    }

    /// Root node of the CST.
    pub fn syntax(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.data.green.clone())
    }

    pub fn source_file(&self) -> Option<SourceFile> {
        SourceFile::cast(self.syntax())
    }

    pub fn errors(&self) -> &[SyntaxError] {
        &self.data.errors
    }

    pub fn has_errors(&self) -> bool {
        !self.data.errors.is_empty()
    }

    pub fn metadata(&self) -> &FileMetadata {
        &self.data.metadata
    }

    pub fn included(&self) -> &[IncludedFile] {
        &self.data.included
    }

    pub fn line_index(&self) -> &LineIndex {
        &self.data.line_index
    }

    pub fn line_col(&self, offset: TextSize) -> LineCol {
        self.data.line_index.line_col(&self.data.text, offset)
    }

    /// Convert a byte range into an editor span.
    pub fn span(&self, range: TextRange) -> Span {
        Span::new(self.line_col(range.start()), self.line_col(range.end()))
    }

    /// Whether both trees were built from the same text.
    pub fn same_text(&self, other: &SyntaxTree) -> bool {
        Arc::ptr_eq(&self.data.text, &other.data.text) || self.data.text == other.data.text
    }
}
