//! Logos-based lexer for SystemVerilog
//!
//! Fast, lossless tokenization using the logos crate. Every byte of the input
//! ends up in exactly one token; unrecognized bytes become `ERROR` tokens.

use super::syntax_kind::SyntaxKind;
use logos::Logos;
use rowan::TextSize;

/// A token with its kind, text, and position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: SyntaxKind,
    pub text: &'a str,
    pub offset: TextSize,
}

/// Lexer wrapping the logos-generated tokenizer
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, LogosToken>,
    offset: u32,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            inner: LogosToken::lexer(input),
            offset: 0,
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let logos_token = self.inner.next()?;
        let text = self.inner.slice();
        let offset = TextSize::new(self.offset);
        self.offset += text.len() as u32;

        let kind = match logos_token {
            Ok(t) => t.into(),
            Err(()) => SyntaxKind::ERROR,
        };

        Some(Token { kind, text, offset })
    }
}

/// Tokenize an entire string into a Vec
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    Lexer::new(input).collect()
}

/// Logos token enum - maps to SyntaxKind
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
pub enum LogosToken {
    // =========================================================================
    // TRIVIA
    // =========================================================================
    #[regex(r"[ \t\r\n\f]+")]
    Whitespace,

    #[regex(r"//[^\n]*")]
    LineComment,

    #[regex(r"/\*([^*]|\*+[^*/])*\*+/")]
    BlockComment,

    #[regex(r"\\\r?\n")]
    LineContinuation,

    // =========================================================================
    // LITERALS
    // =========================================================================
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_$]*")]
    #[regex(r"\\[^ \t\r\n]+")]
    Ident,

    #[regex(r"\$[a-zA-Z0-9_$]+")]
    SystemIdent,

    #[regex(r"[0-9][0-9_]*(\.[0-9_]+)?([eE][+-]?[0-9_]+)?")]
    #[regex(r"[0-9][0-9_]*[ \t]*'[sS]?[bBoOdDhH][ \t]*[0-9a-fA-FxXzZ?_]+")]
    #[regex(r"'[sS]?[bBoOdDhH][0-9a-fA-FxXzZ?_]+")]
    #[regex(r"'[01xXzZ]")]
    Number,

    #[regex(r#""([^"\\]|\\.)*""#)]
    String,

    #[regex(r"`[a-zA-Z_][a-zA-Z0-9_$]*")]
    Directive,

    // =========================================================================
    // PUNCTUATION
    // =========================================================================
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(";")]
    Semicolon,
    #[token(":")]
    Colon,
    #[token("::")]
    ColonColon,
    #[token(".")]
    Dot,
    #[token(",")]
    Comma,
    #[token("#")]
    Hash,
    #[token("@")]
    At,
    #[token("=", priority = 10)]
    Eq,
    #[token("'")]
    Apostrophe,

    #[regex(r"[+\-*/%<>!&|^~?=]+")]
    #[token("##")]
    #[token("$")]
    #[token("``")]
    #[token("`\"")]
    Operator,

    // =========================================================================
    // KEYWORDS - design units
    // =========================================================================
    #[token("module")]
    #[token("macromodule")]
    Module,
    #[token("endmodule")]
    Endmodule,
    #[token("interface")]
    Interface,
    #[token("endinterface")]
    Endinterface,
    #[token("program")]
    Program,
    #[token("endprogram")]
    Endprogram,
    #[token("package")]
    Package,
    #[token("endpackage")]
    Endpackage,
    #[token("class")]
    Class,
    #[token("endclass")]
    Endclass,
    #[token("primitive")]
    Primitive,
    #[token("endprimitive")]
    Endprimitive,
    #[token("checker")]
    Checker,
    #[token("endchecker")]
    Endchecker,
    #[token("config")]
    Config,
    #[token("endconfig")]
    Endconfig,

    // =========================================================================
    // KEYWORDS - subroutines and items
    // =========================================================================
    #[token("function")]
    Function,
    #[token("endfunction")]
    Endfunction,
    #[token("task")]
    Task,
    #[token("endtask")]
    Endtask,
    #[token("import")]
    Import,
    #[token("export")]
    Export,
    #[token("extends")]
    Extends,
    #[token("implements")]
    Implements,
    #[token("extern")]
    Extern,
    #[token("pure")]
    Pure,
    #[token("virtual")]
    Virtual,
    #[token("typedef")]
    Typedef,
    #[token("bind")]
    Bind,
    #[token("if")]
    If,
    #[token("else")]
    Else,

    #[token("begin")]
    #[token("fork")]
    #[token("generate")]
    #[token("specify")]
    #[token("clocking")]
    #[token("covergroup")]
    #[token("property")]
    #[token("sequence")]
    #[token("table")]
    Begin,

    #[token("end")]
    #[token("join")]
    #[token("join_any")]
    #[token("join_none")]
    #[token("endgenerate")]
    #[token("endcase")]
    #[token("endspecify")]
    #[token("endclocking")]
    #[token("endgroup")]
    #[token("endproperty")]
    #[token("endsequence")]
    #[token("endtable")]
    End,

    #[token("logic")]
    #[token("wire")]
    #[token("reg")]
    #[token("bit")]
    #[token("byte")]
    #[token("int")]
    #[token("integer")]
    #[token("shortint")]
    #[token("longint")]
    #[token("real")]
    #[token("shortreal")]
    #[token("realtime")]
    #[token("time")]
    #[token("string")]
    #[token("chandle")]
    #[token("event")]
    #[token("void")]
    #[token("input")]
    #[token("output")]
    #[token("inout")]
    #[token("ref")]
    #[token("var")]
    #[token("tri")]
    #[token("wand")]
    #[token("wor")]
    #[token("supply0")]
    #[token("supply1")]
    #[token("parameter")]
    #[token("localparam")]
    #[token("specparam")]
    #[token("defparam")]
    #[token("genvar")]
    #[token("assign")]
    #[token("always")]
    #[token("always_ff")]
    #[token("always_comb")]
    #[token("always_latch")]
    #[token("initial")]
    #[token("final")]
    #[token("signed")]
    #[token("unsigned")]
    #[token("static")]
    #[token("automatic")]
    #[token("local")]
    #[token("protected")]
    #[token("const")]
    #[token("rand")]
    #[token("randc")]
    #[token("new")]
    #[token("this")]
    #[token("super")]
    #[token("null")]
    #[token("return")]
    #[token("modport")]
    #[token("default")]
    #[token("posedge")]
    #[token("negedge")]
    #[token("edge")]
    #[token("or")]
    #[token("and")]
    #[token("not")]
    #[token("wait")]
    #[token("forever")]
    #[token("repeat")]
    #[token("while")]
    #[token("do")]
    #[token("for")]
    #[token("foreach")]
    #[token("case")]
    #[token("casex")]
    #[token("casez")]
    #[token("enum")]
    #[token("struct")]
    #[token("union")]
    #[token("packed")]
    #[token("type")]
    #[token("let")]
    #[token("assert")]
    #[token("assume")]
    #[token("cover")]
    #[token("unique")]
    #[token("unique0")]
    #[token("priority")]
    #[token("inside")]
    #[token("with")]
    #[token("constraint")]
    #[token("forkjoin")]
    #[token("context")]
    Keyword,
}

impl From<LogosToken> for SyntaxKind {
    fn from(token: LogosToken) -> Self {
        match token {
            LogosToken::Whitespace => SyntaxKind::WHITESPACE,
            LogosToken::LineComment => SyntaxKind::LINE_COMMENT,
            LogosToken::BlockComment => SyntaxKind::BLOCK_COMMENT,
            LogosToken::LineContinuation => SyntaxKind::LINE_CONTINUATION,
            LogosToken::Ident => SyntaxKind::IDENT,
            LogosToken::SystemIdent => SyntaxKind::SYSTEM_IDENT,
            LogosToken::Number => SyntaxKind::NUMBER,
            LogosToken::String => SyntaxKind::STRING,
            LogosToken::Directive => SyntaxKind::DIRECTIVE,
            LogosToken::LParen => SyntaxKind::L_PAREN,
            LogosToken::RParen => SyntaxKind::R_PAREN,
            LogosToken::LBracket => SyntaxKind::L_BRACKET,
            LogosToken::RBracket => SyntaxKind::R_BRACKET,
            LogosToken::LBrace => SyntaxKind::L_BRACE,
            LogosToken::RBrace => SyntaxKind::R_BRACE,
            LogosToken::Semicolon => SyntaxKind::SEMICOLON,
            LogosToken::Colon => SyntaxKind::COLON,
            LogosToken::ColonColon => SyntaxKind::COLON_COLON,
            LogosToken::Dot => SyntaxKind::DOT,
            LogosToken::Comma => SyntaxKind::COMMA,
            LogosToken::Hash => SyntaxKind::HASH,
            LogosToken::At => SyntaxKind::AT,
            LogosToken::Eq => SyntaxKind::EQ,
            LogosToken::Apostrophe => SyntaxKind::APOSTROPHE,
            LogosToken::Operator => SyntaxKind::OPERATOR,
            LogosToken::Module => SyntaxKind::MODULE_KW,
            LogosToken::Endmodule => SyntaxKind::ENDMODULE_KW,
            LogosToken::Interface => SyntaxKind::INTERFACE_KW,
            LogosToken::Endinterface => SyntaxKind::ENDINTERFACE_KW,
            LogosToken::Program => SyntaxKind::PROGRAM_KW,
            LogosToken::Endprogram => SyntaxKind::ENDPROGRAM_KW,
            LogosToken::Package => SyntaxKind::PACKAGE_KW,
            LogosToken::Endpackage => SyntaxKind::ENDPACKAGE_KW,
            LogosToken::Class => SyntaxKind::CLASS_KW,
            LogosToken::Endclass => SyntaxKind::ENDCLASS_KW,
            LogosToken::Primitive => SyntaxKind::PRIMITIVE_KW,
            LogosToken::Endprimitive => SyntaxKind::ENDPRIMITIVE_KW,
            LogosToken::Checker => SyntaxKind::CHECKER_KW,
            LogosToken::Endchecker => SyntaxKind::ENDCHECKER_KW,
            LogosToken::Config => SyntaxKind::CONFIG_KW,
            LogosToken::Endconfig => SyntaxKind::ENDCONFIG_KW,
            LogosToken::Function => SyntaxKind::FUNCTION_KW,
            LogosToken::Endfunction => SyntaxKind::ENDFUNCTION_KW,
            LogosToken::Task => SyntaxKind::TASK_KW,
            LogosToken::Endtask => SyntaxKind::ENDTASK_KW,
            LogosToken::Import => SyntaxKind::IMPORT_KW,
            LogosToken::Export => SyntaxKind::EXPORT_KW,
            LogosToken::Extends => SyntaxKind::EXTENDS_KW,
            LogosToken::Implements => SyntaxKind::IMPLEMENTS_KW,
            LogosToken::Extern => SyntaxKind::EXTERN_KW,
            LogosToken::Pure => SyntaxKind::PURE_KW,
            LogosToken::Virtual => SyntaxKind::VIRTUAL_KW,
            LogosToken::Typedef => SyntaxKind::TYPEDEF_KW,
            LogosToken::Bind => SyntaxKind::BIND_KW,
            LogosToken::If => SyntaxKind::IF_KW,
            LogosToken::Else => SyntaxKind::ELSE_KW,
            LogosToken::Begin => SyntaxKind::BEGIN_KW,
            LogosToken::End => SyntaxKind::END_KW,
            LogosToken::Keyword => SyntaxKind::KEYWORD,
        }
    }
}
