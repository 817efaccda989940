//! Diagnostics produced by elaboration and published by the session layer.

use std::sync::Arc;

use crate::base::{PathId, Span};

/// Severity level of a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
    Info,
    Hint,
}

impl Severity {
    /// The `DiagnosticSeverity` number editor protocols use.
    pub fn to_lsp(self) -> u32 {
        match self {
            Severity::Error => 1,
            Severity::Warning => 2,
            Severity::Info => 3,
            Severity::Hint => 4,
        }
    }
}

/// One problem found in a member file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub file: PathId,
    pub span: Span,
    pub severity: Severity,
    /// One of [`codes`], when the problem has a stable identity.
    pub code: Option<&'static str>,
    pub message: Arc<str>,
    /// Other places that explain this one, e.g. a first definition.
    pub related: Vec<RelatedInfo>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RelatedInfo {
    pub file: PathId,
    pub span: Span,
    pub message: Arc<str>,
}

impl Diagnostic {
    pub fn error(file: PathId, span: Span, message: impl Into<Arc<str>>) -> Self {
        Self::new(file, span, Severity::Error, message)
    }

    pub fn warning(file: PathId, span: Span, message: impl Into<Arc<str>>) -> Self {
        Self::new(file, span, Severity::Warning, message)
    }

    fn new(file: PathId, span: Span, severity: Severity, message: impl Into<Arc<str>>) -> Self {
        Self {
            file,
            span,
            severity,
            code: None,
            message: message.into(),
            related: Vec::new(),
        }
    }

    pub fn with_code(mut self, code: &'static str) -> Self {
        self.code = Some(code);
        self
    }

    pub fn with_related(mut self, file: PathId, span: Span, message: impl Into<Arc<str>>) -> Self {
        self.related.push(RelatedInfo {
            file,
            span,
            message: message.into(),
        });
        self
    }
}

/// Stable diagnostic codes.
///
/// `E00xx` covers elaboration and syntax.
pub mod codes {
    /// Referenced design unit or package is not declared by any member.
    pub const UNRESOLVED_REFERENCE: &str = "E0001";
    /// Two members declare the same design unit.
    pub const DUPLICATE_DEFINITION: &str = "E0002";
    /// The parser could not recognize the structure.
    pub const SYNTAX_ERROR: &str = "E0003";
}

/// Accumulates the diagnostics of one elaboration.
#[derive(Clone, Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn unresolved_reference(&mut self, file: PathId, span: Span, name: &str) {
        self.add(
            Diagnostic::error(file, span, format!("unknown module, package or class '{name}'"))
                .with_code(codes::UNRESOLVED_REFERENCE),
        );
    }

    /// A second declaration of `name`, pointing back at the first.
    pub fn duplicate_definition(
        &mut self,
        file: PathId,
        span: Span,
        name: &str,
        first_file: PathId,
        first_span: Span,
    ) {
        self.add(
            Diagnostic::error(file, span, format!("duplicate definition of '{name}'"))
                .with_code(codes::DUPLICATE_DEFINITION)
                .with_related(first_file, first_span, format!("'{name}' first defined here")),
        );
    }

    pub fn syntax_error(&mut self, file: PathId, span: Span, message: &str) {
        self.add(Diagnostic::error(file, span, message).with_code(codes::SYNTAX_ERROR));
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn finish(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}
