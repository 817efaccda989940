//! Syntax kinds for the Rowan-based CST
//!
//! This enum defines all node and token kinds the structural SystemVerilog
//! parser produces. Only constructs the workspace index cares about get
//! dedicated kinds; everything else is carried as opaque tokens.

/// All syntax kinds (tokens and nodes)
///
/// Tokens are leaf nodes (identifiers, keywords, punctuation).
/// Nodes are composite (design units, instantiations, directives).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    // =========================================================================
    // TRIVIA
    // =========================================================================
    WHITESPACE = 0,
    LINE_COMMENT,
    BLOCK_COMMENT,
    LINE_CONTINUATION, // `\` immediately followed by a newline

    // =========================================================================
    // LITERALS
    // =========================================================================
    IDENT,        // foo, \escaped$name
    SYSTEM_IDENT, // $display
    NUMBER,       // 42, 4'd3, 'x, 1.5e3
    STRING,       // "hello"
    DIRECTIVE,    // `define, `include, `MY_MACRO

    // =========================================================================
    // PUNCTUATION
    // =========================================================================
    L_PAREN,     // (
    R_PAREN,     // )
    L_BRACKET,   // [
    R_BRACKET,   // ]
    L_BRACE,     // {
    R_BRACE,     // }
    SEMICOLON,   // ;
    COLON,       // :
    COLON_COLON, // ::
    DOT,         // .
    COMMA,       // ,
    HASH,        // #
    AT,          // @
    EQ,          // =
    APOSTROPHE,  // '
    OPERATOR,    // any other operator character sequence

    // =========================================================================
    // KEYWORDS - design units
    // =========================================================================
    MODULE_KW, // module, macromodule
    ENDMODULE_KW,
    INTERFACE_KW,
    ENDINTERFACE_KW,
    PROGRAM_KW,
    ENDPROGRAM_KW,
    PACKAGE_KW,
    ENDPACKAGE_KW,
    CLASS_KW,
    ENDCLASS_KW,
    PRIMITIVE_KW,
    ENDPRIMITIVE_KW,
    CHECKER_KW,
    ENDCHECKER_KW,
    CONFIG_KW,
    ENDCONFIG_KW,

    // =========================================================================
    // KEYWORDS - subroutines and items
    // =========================================================================
    FUNCTION_KW,
    ENDFUNCTION_KW,
    TASK_KW,
    ENDTASK_KW,
    IMPORT_KW,
    EXPORT_KW,
    EXTENDS_KW,
    IMPLEMENTS_KW,
    EXTERN_KW,
    PURE_KW,
    VIRTUAL_KW,
    TYPEDEF_KW,
    BIND_KW,
    IF_KW,
    ELSE_KW,
    BEGIN_KW, // begin, fork, generate, specify, clocking-like block openers
    END_KW,   // end, join*, endgenerate, endcase and other non-unit block closers
    KEYWORD,  // any other reserved word

    // =========================================================================
    // NODES
    // =========================================================================
    SOURCE_FILE,
    MODULE_DECL,
    INTERFACE_DECL,
    PROGRAM_DECL,
    PACKAGE_DECL,
    CLASS_DECL,
    PRIMITIVE_DECL,
    CHECKER_DECL,
    CONFIG_DECL,
    NAME,             // declared name of a design unit
    NAME_REF,         // reference to another design unit / package / class
    END_LABEL,        // `: name` after an end keyword
    FUNCTION_DECL,
    TASK_DECL,
    INSTANTIATION,    // type #(params) inst (ports);
    IMPORT_DECL,      // import pkg::*;
    SCOPED_NAME,      // pkg::item
    EXTENDS_CLAUSE,   // extends Base
    INTERFACE_PORT,   // iface.modport name
    DEFINE_DIRECTIVE, // `define NAME body
    INCLUDE_DIRECTIVE,
    DIRECTIVE_LINE,   // any other directive with its operands
    ITEM,             // opaque item up to `;`

    // Special
    ERROR,

    #[doc(hidden)]
    __LAST,
}

impl SyntaxKind {
    /// Check if this is a trivia token (whitespace or comment)
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            Self::WHITESPACE | Self::LINE_COMMENT | Self::BLOCK_COMMENT | Self::LINE_CONTINUATION
        )
    }

    /// Keyword that opens a design unit.
    pub fn is_unit_start(self) -> bool {
        matches!(
            self,
            Self::MODULE_KW
                | Self::INTERFACE_KW
                | Self::PROGRAM_KW
                | Self::PACKAGE_KW
                | Self::CLASS_KW
                | Self::PRIMITIVE_KW
                | Self::CHECKER_KW
                | Self::CONFIG_KW
        )
    }

    /// Keyword that closes a design unit.
    pub fn is_unit_end(self) -> bool {
        matches!(
            self,
            Self::ENDMODULE_KW
                | Self::ENDINTERFACE_KW
                | Self::ENDPROGRAM_KW
                | Self::ENDPACKAGE_KW
                | Self::ENDCLASS_KW
                | Self::ENDPRIMITIVE_KW
                | Self::ENDCHECKER_KW
                | Self::ENDCONFIG_KW
        )
    }

    /// The end keyword matching a design-unit start keyword.
    pub fn unit_end(self) -> Option<SyntaxKind> {
        Some(match self {
            Self::MODULE_KW => Self::ENDMODULE_KW,
            Self::INTERFACE_KW => Self::ENDINTERFACE_KW,
            Self::PROGRAM_KW => Self::ENDPROGRAM_KW,
            Self::PACKAGE_KW => Self::ENDPACKAGE_KW,
            Self::CLASS_KW => Self::ENDCLASS_KW,
            Self::PRIMITIVE_KW => Self::ENDPRIMITIVE_KW,
            Self::CHECKER_KW => Self::ENDCHECKER_KW,
            Self::CONFIG_KW => Self::ENDCONFIG_KW,
            _ => return None,
        })
    }

    /// The node kind produced for a design-unit start keyword.
    pub fn unit_node(self) -> Option<SyntaxKind> {
        Some(match self {
            Self::MODULE_KW => Self::MODULE_DECL,
            Self::INTERFACE_KW => Self::INTERFACE_DECL,
            Self::PROGRAM_KW => Self::PROGRAM_DECL,
            Self::PACKAGE_KW => Self::PACKAGE_DECL,
            Self::CLASS_KW => Self::CLASS_DECL,
            Self::PRIMITIVE_KW => Self::PRIMITIVE_DECL,
            Self::CHECKER_KW => Self::CHECKER_DECL,
            Self::CONFIG_KW => Self::CONFIG_DECL,
            _ => return None,
        })
    }

    /// Node kinds that represent a design unit declaration.
    pub fn is_unit_decl(self) -> bool {
        matches!(
            self,
            Self::MODULE_DECL
                | Self::INTERFACE_DECL
                | Self::PROGRAM_DECL
                | Self::PACKAGE_DECL
                | Self::CLASS_DECL
                | Self::PRIMITIVE_DECL
                | Self::CHECKER_DECL
                | Self::CONFIG_DECL
        )
    }

    /// Tokens that terminate an opaque item without being part of it.
    pub fn ends_item(self) -> bool {
        self.is_unit_start()
            || self.is_unit_end()
            || matches!(
                self,
                Self::BEGIN_KW
                    | Self::END_KW
                    | Self::FUNCTION_KW
                    | Self::ENDFUNCTION_KW
                    | Self::TASK_KW
                    | Self::ENDTASK_KW
            )
    }

    /// Check if this is a keyword
    pub fn is_keyword(self) -> bool {
        (self as u16) >= (Self::MODULE_KW as u16) && (self as u16) <= (Self::KEYWORD as u16)
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

impl From<rowan::SyntaxKind> for SyntaxKind {
    fn from(raw: rowan::SyntaxKind) -> Self {
        assert!(raw.0 < SyntaxKind::__LAST as u16);
        // Safety: we control all syntax kinds and check bounds above
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }
}

/// Language definition for Rowan
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SvLanguage {}

impl rowan::Language for SvLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        raw.into()
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

/// Type aliases for convenience
pub type SyntaxNode = rowan::SyntaxNode<SvLanguage>;
pub type SyntaxToken = rowan::SyntaxToken<SvLanguage>;
pub type SyntaxElement = rowan::SyntaxElement<SvLanguage>;
