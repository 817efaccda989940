//! Per-file structural facts extracted from a parse tree.
//!
//! This is everything the workspace index and the shallow elaborator know
//! about a file: what it declares at file scope, which macros it defines,
//! and which names it uses without declaring them.

use std::path::Path;
use std::sync::Arc;

use rustc_hash::FxHashSet;
use smol_str::SmolStr;

use crate::base::TextRange;
use crate::parser::{AstNode, DesignUnit, SourceFile, SyntaxKind};

/// The kind of a design-unit declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DeclKind {
    Module,
    Interface,
    Program,
    Package,
    Class,
    Primitive,
    Checker,
    Config,
}

impl DeclKind {
    pub fn from_syntax(kind: SyntaxKind) -> Option<Self> {
        Some(match kind {
            SyntaxKind::MODULE_DECL => Self::Module,
            SyntaxKind::INTERFACE_DECL => Self::Interface,
            SyntaxKind::PROGRAM_DECL => Self::Program,
            SyntaxKind::PACKAGE_DECL => Self::Package,
            SyntaxKind::CLASS_DECL => Self::Class,
            SyntaxKind::PRIMITIVE_DECL => Self::Primitive,
            SyntaxKind::CHECKER_DECL => Self::Checker,
            SyntaxKind::CONFIG_DECL => Self::Config,
            _ => return None,
        })
    }

    /// Package-like grouping construct whose own references are followed
    /// during dependent-document resolution.
    pub fn is_package(self) -> bool {
        self == Self::Package
    }

    /// Units that can be instantiated as the root of a design hierarchy.
    pub fn is_instantiable(self) -> bool {
        matches!(
            self,
            Self::Module | Self::Interface | Self::Program | Self::Primitive | Self::Checker
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Module => "module",
            Self::Interface => "interface",
            Self::Program => "program",
            Self::Package => "package",
            Self::Class => "class",
            Self::Primitive => "primitive",
            Self::Checker => "checker",
            Self::Config => "config",
        }
    }
}

impl std::fmt::Display for DeclKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A file-scope design-unit declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub name: SmolStr,
    pub kind: DeclKind,
    /// Range of the declared name.
    pub range: TextRange,
}

/// Where a macro definition physically lives.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MacroOrigin {
    /// Defined in the parsed buffer itself.
    Local,
    /// Pulled in through an `` `include `` of the given file.
    Included(Arc<Path>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacroDef {
    pub name: SmolStr,
    pub origin: MacroOrigin,
    /// Range within the defining buffer.
    pub range: TextRange,
}

/// The construct a reference appears in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RefContext {
    Instantiation,
    Import,
    Scope,
    Extends,
    InterfacePort,
    Bind,
}

impl RefContext {
    fn from_parent(kind: Option<SyntaxKind>) -> Self {
        match kind {
            Some(SyntaxKind::INSTANTIATION) => Self::Instantiation,
            Some(SyntaxKind::IMPORT_DECL) => Self::Import,
            Some(SyntaxKind::EXTENDS_CLAUSE) => Self::Extends,
            Some(SyntaxKind::INTERFACE_PORT) => Self::InterfacePort,
            Some(SyntaxKind::ITEM) => Self::Bind,
            _ => Self::Scope,
        }
    }

    /// Whether a miss for this reference is certainly an error.
    ///
    /// Scoped prefixes may name type parameters, which are not design units.
    pub fn requires_definition(self) -> bool {
        self != Self::Scope
    }
}

/// A name used but not declared in the file, at its first use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub name: SmolStr,
    pub context: RefContext,
    pub range: TextRange,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncludeRef {
    /// File name as written, without quotes.
    pub target: String,
    pub range: TextRange,
}

/// Structural summary of one file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileMetadata {
    /// Outermost design units only.
    pub declarations: Vec<Declaration>,
    /// Design units declared inside another unit.
    pub nested: Vec<SmolStr>,
    pub macros: Vec<MacroDef>,
    /// Referenced names minus every name declared in the file.
    pub references: Vec<Reference>,
    pub includes: Vec<IncludeRef>,
    /// Type names instantiated directly by file-scope units.
    pub instantiated: FxHashSet<SmolStr>,
}

/// Names that never refer to a workspace declaration.
const BUILTIN_SCOPES: &[&str] = &["std"];

impl FileMetadata {
    pub(crate) fn collect(file: &SourceFile) -> Self {
        let mut meta = FileMetadata::default();

        for unit in file.units() {
            let Some(kind) = DeclKind::from_syntax(unit.kind()) else {
                continue;
            };
            if let Some(name) = unit.name().and_then(|n| n.text()) {
                meta.declarations.push(Declaration {
                    name: SmolStr::new(name),
                    kind,
                    range: unit.name_range(),
                });
            }
            for inst in unit.instantiations() {
                if let Some(name) = inst.type_ref().and_then(|r| r.text()) {
                    meta.instantiated.insert(SmolStr::new(name));
                }
            }
            collect_nested(&unit, &mut meta.nested);
        }

        for define in file.defines() {
            if let Some(name) = define.name().and_then(|n| n.text()) {
                meta.macros.push(MacroDef {
                    name: SmolStr::new(name),
                    origin: MacroOrigin::Local,
                    range: define.syntax().text_range(),
                });
            }
        }

        for include in file.includes() {
            if let Some(target) = include.target() {
                meta.includes.push(IncludeRef {
                    target,
                    range: include.range(),
                });
            }
        }

        let declared: FxHashSet<&str> = meta
            .declarations
            .iter()
            .map(|d| d.name.as_str())
            .chain(meta.nested.iter().map(SmolStr::as_str))
            .collect();
        let mut seen = FxHashSet::default();
        let mut references = Vec::new();
        for name_ref in file.name_refs() {
            let Some(name) = name_ref.text() else {
                continue;
            };
            if declared.contains(name.as_str()) || BUILTIN_SCOPES.contains(&name.as_str()) {
                continue;
            }
            let name = SmolStr::new(name);
            if seen.insert(name.clone()) {
                references.push(Reference {
                    name,
                    context: RefContext::from_parent(name_ref.context()),
                    range: name_ref.syntax().text_range(),
                });
            }
        }
        meta.references = references;
        meta
    }

    /// Referenced names in first-use order.
    pub fn referenced_names(&self) -> impl Iterator<Item = &SmolStr> {
        self.references.iter().map(|r| &r.name)
    }

    /// Macros defined in the buffer itself.
    pub fn local_macros(&self) -> impl Iterator<Item = &MacroDef> {
        self.macros
            .iter()
            .filter(|m| m.origin == MacroOrigin::Local)
    }

    /// Whether the file declares a package-like unit at file scope.
    pub fn declares_package(&self) -> bool {
        self.declarations.iter().any(|d| d.kind.is_package())
    }
}

fn collect_nested(unit: &DesignUnit, out: &mut Vec<SmolStr>) {
    for nested in unit.nested_units() {
        if let Some(name) = nested.name().and_then(|n| n.text()) {
            out.push(SmolStr::new(name));
        }
        collect_nested(&nested, out);
    }
}
