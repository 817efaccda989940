//! Typed AST wrappers over the untyped rowan CST.
//!
//! Each struct wraps a SyntaxNode and provides accessors for the pieces the
//! workspace index reads: unit names, referenced names, macro names and
//! include targets.

use super::syntax_kind::SyntaxKind;
use super::{SyntaxNode, SyntaxToken};
use rowan::TextRange;

/// Trait for AST nodes that wrap a SyntaxNode
pub trait AstNode: Sized {
    fn can_cast(kind: SyntaxKind) -> bool;
    fn cast(node: SyntaxNode) -> Option<Self>;
    fn syntax(&self) -> &SyntaxNode;
}

// ============================================================================
// Helper macros
// ============================================================================

macro_rules! ast_node {
    ($name:ident, $kind:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(SyntaxNode);

        impl AstNode for $name {
            fn can_cast(kind: SyntaxKind) -> bool {
                kind == SyntaxKind::$kind
            }

            fn cast(node: SyntaxNode) -> Option<Self> {
                if Self::can_cast(node.kind()) {
                    Some(Self(node))
                } else {
                    None
                }
            }

            fn syntax(&self) -> &SyntaxNode {
                &self.0
            }
        }
    };
}

/// First non-trivia token of a node with the given kind.
fn token_of(node: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxToken> {
    node.children_with_tokens()
        .filter_map(|it| it.into_token())
        .find(|t| t.kind() == kind)
}

/// Identifier text, with the escape stripped from `\escaped` names.
fn ident_text(token: &SyntaxToken) -> &str {
    let text = token.text();
    text.strip_prefix('\\').unwrap_or(text)
}

// ============================================================================
// Root
// ============================================================================

ast_node!(SourceFile, SOURCE_FILE);

impl SourceFile {
    /// Design units declared at file scope.
    pub fn units(&self) -> impl Iterator<Item = DesignUnit> + '_ {
        self.0.children().filter_map(DesignUnit::cast)
    }

    /// Every `` `define `` in the file, at any depth.
    pub fn defines(&self) -> impl Iterator<Item = DefineDirective> + '_ {
        self.0.descendants().filter_map(DefineDirective::cast)
    }

    /// Every `` `include `` in the file, at any depth.
    pub fn includes(&self) -> impl Iterator<Item = IncludeDirective> + '_ {
        self.0.descendants().filter_map(IncludeDirective::cast)
    }

    /// Every reference to another design unit or package, at any depth.
    pub fn name_refs(&self) -> impl Iterator<Item = NameRef> + '_ {
        self.0.descendants().filter_map(NameRef::cast)
    }
}

// ============================================================================
// Design units
// ============================================================================

/// Any design unit: module, interface, program, package, class, primitive,
/// checker or config.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DesignUnit(SyntaxNode);

impl AstNode for DesignUnit {
    fn can_cast(kind: SyntaxKind) -> bool {
        kind.is_unit_decl()
    }

    fn cast(node: SyntaxNode) -> Option<Self> {
        if Self::can_cast(node.kind()) {
            Some(Self(node))
        } else {
            None
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        &self.0
    }
}

impl DesignUnit {
    pub fn kind(&self) -> SyntaxKind {
        self.0.kind()
    }

    pub fn name(&self) -> Option<Name> {
        self.0.children().find_map(Name::cast)
    }

    /// Design units declared directly inside this one.
    pub fn nested_units(&self) -> impl Iterator<Item = DesignUnit> + '_ {
        self.0.children().filter_map(DesignUnit::cast)
    }

    /// Instantiations anywhere in this unit, excluding nested units.
    pub fn instantiations(&self) -> Vec<Instantiation> {
        let mut out = Vec::new();
        collect_shallow(&self.0, &mut out);
        out
    }

    /// Range of the declared name, or of the whole unit when unnamed.
    pub fn name_range(&self) -> TextRange {
        self.name()
            .map(|n| n.syntax().text_range())
            .unwrap_or_else(|| self.0.text_range())
    }
}

fn collect_shallow(node: &SyntaxNode, out: &mut Vec<Instantiation>) {
    for child in node.children() {
        if child.kind().is_unit_decl() {
            continue;
        }
        if let Some(inst) = Instantiation::cast(child.clone()) {
            out.push(inst);
        } else {
            collect_shallow(&child, out);
        }
    }
}

// ============================================================================
// Names
// ============================================================================

ast_node!(Name, NAME);

impl Name {
    pub fn ident(&self) -> Option<SyntaxToken> {
        token_of(&self.0, SyntaxKind::IDENT)
    }

    pub fn text(&self) -> Option<String> {
        self.ident().map(|t| ident_text(&t).to_string())
    }
}

ast_node!(NameRef, NAME_REF);

impl NameRef {
    pub fn ident(&self) -> Option<SyntaxToken> {
        token_of(&self.0, SyntaxKind::IDENT)
    }

    pub fn text(&self) -> Option<String> {
        self.ident().map(|t| ident_text(&t).to_string())
    }

    /// The syntactic construct this reference belongs to.
    pub fn context(&self) -> Option<SyntaxKind> {
        self.0.parent().map(|p| p.kind())
    }
}

// ============================================================================
// Items
// ============================================================================

ast_node!(Instantiation, INSTANTIATION);

impl Instantiation {
    pub fn type_ref(&self) -> Option<NameRef> {
        self.0.children().find_map(NameRef::cast)
    }
}

ast_node!(ImportDecl, IMPORT_DECL);

impl ImportDecl {
    pub fn packages(&self) -> impl Iterator<Item = NameRef> + '_ {
        self.0.children().filter_map(NameRef::cast)
    }
}

ast_node!(ScopedName, SCOPED_NAME);
ast_node!(ExtendsClause, EXTENDS_CLAUSE);
ast_node!(InterfacePort, INTERFACE_PORT);

// ============================================================================
// Directives
// ============================================================================

ast_node!(DefineDirective, DEFINE_DIRECTIVE);

impl DefineDirective {
    pub fn name(&self) -> Option<Name> {
        self.0.children().find_map(Name::cast)
    }
}

ast_node!(IncludeDirective, INCLUDE_DIRECTIVE);

impl IncludeDirective {
    /// The included file name without quotes or angle brackets.
    ///
    /// Returns `None` for macro-expanded targets (`` `include `FILE ``).
    pub fn target(&self) -> Option<String> {
        let mut tokens = self
            .0
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .filter(|t| !t.kind().is_trivia())
            .skip(1);
        let first = tokens.next()?;
        match first.kind() {
            SyntaxKind::STRING => {
                let text = first.text();
                Some(text.trim_matches('"').to_string())
            }
            SyntaxKind::OPERATOR if first.text() == "<" => {
                let mut target = String::new();
                for token in tokens {
                    if token.text() == ">" {
                        return Some(target);
                    }
                    target.push_str(token.text());
                }
                None
            }
            _ => None,
        }
    }

    pub fn range(&self) -> TextRange {
        self.0.text_range()
    }
}
