//! Recursive descent parser for the structural subset of SystemVerilog
//!
//! Builds a rowan GreenNode tree from tokens. Only the structure the
//! workspace index needs is recognized (design units, subroutines,
//! instantiations, imports, scoped names, directives); everything else is
//! kept as opaque `ITEM` nodes. The tree is lossless and parsing never fails.

use super::lexer::{Lexer, Token};
use super::syntax_kind::SyntaxKind;
use rowan::{GreenNode, GreenNodeBuilder, TextRange, TextSize};

/// Parse result containing the green tree and any errors
#[derive(Debug, Clone)]
pub struct Parse {
    pub green: GreenNode,
    pub errors: Vec<SyntaxError>,
}

impl Parse {
    /// Get the root syntax node
    pub fn syntax(&self) -> super::SyntaxNode {
        super::SyntaxNode::new_root(self.green.clone())
    }

    /// Check if parsing succeeded without errors
    pub fn ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// A syntax error with location and message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub message: String,
    pub range: TextRange,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, range: TextRange) -> Self {
        Self {
            message: message.into(),
            range,
        }
    }
}

/// Parse SystemVerilog source text into a CST
pub fn parse(input: &str) -> Parse {
    let tokens: Vec<_> = Lexer::new(input).collect();
    let mut parser = Parser::new(&tokens, TextSize::of(input));
    parser.parse_source_file();
    parser.finish()
}

/// Directives whose operands run to the end of the line.
const LINE_DIRECTIVES: &[&str] = &[
    "`timescale",
    "`default_nettype",
    "`pragma",
    "`line",
    "`begin_keywords",
    "`unconnected_drive",
    "`default_decay_time",
    "`default_trireg_strength",
    "`delay_mode_distributed",
];

/// Directives that take a single identifier operand.
const NAME_DIRECTIVES: &[&str] = &["`ifdef", "`ifndef", "`elsif", "`undef"];

/// Directives without operands.
const BARE_DIRECTIVES: &[&str] = &[
    "`else",
    "`endif",
    "`resetall",
    "`celldefine",
    "`endcelldefine",
    "`nounconnected_drive",
    "`end_keywords",
    "`undefineall",
];

/// The parser state
struct Parser<'a> {
    tokens: &'a [Token<'a>],
    pos: usize,
    len: TextSize,
    builder: GreenNodeBuilder<'static>,
    errors: Vec<SyntaxError>,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token<'a>], len: TextSize) -> Self {
        Self {
            tokens,
            pos: 0,
            len,
            builder: GreenNodeBuilder::new(),
            errors: Vec::new(),
        }
    }

    fn finish(self) -> Parse {
        Parse {
            green: self.builder.finish(),
            errors: self.errors,
        }
    }

    // =========================================================================
    // Token inspection
    // =========================================================================

    fn current(&self) -> Option<&Token<'a>> {
        self.tokens.get(self.pos)
    }

    fn current_kind(&self) -> SyntaxKind {
        self.current().map(|t| t.kind).unwrap_or(SyntaxKind::ERROR)
    }

    fn current_text(&self) -> &str {
        self.current().map(|t| t.text).unwrap_or("")
    }

    fn at(&self, kind: SyntaxKind) -> bool {
        !self.at_eof() && self.current_kind() == kind
    }

    fn at_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Index of the n-th non-trivia token at or after `from`.
    fn nth_index(&self, from: usize, n: usize) -> Option<usize> {
        let mut count = 0;
        for (idx, token) in self.tokens.iter().enumerate().skip(from) {
            if token.kind.is_trivia() {
                continue;
            }
            if count == n {
                return Some(idx);
            }
            count += 1;
        }
        None
    }

    /// Look ahead, skipping trivia
    fn nth(&self, n: usize) -> SyntaxKind {
        self.nth_index(self.pos, n)
            .map(|idx| self.tokens[idx].kind)
            .unwrap_or(SyntaxKind::ERROR)
    }

    fn nth_text(&self, n: usize) -> &str {
        self.nth_index(self.pos, n)
            .map(|idx| self.tokens[idx].text)
            .unwrap_or("")
    }

    // =========================================================================
    // Token consumption
    // =========================================================================

    fn bump(&mut self) {
        if let Some(token) = self.current() {
            self.builder.token(token.kind.into(), token.text);
            self.pos += 1;
        }
    }

    fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn skip_trivia(&mut self) {
        while self.current().map(|t| t.kind.is_trivia()).unwrap_or(false) {
            self.bump();
        }
    }

    /// Skip trivia that stays on the current line.
    fn skip_inline_trivia(&mut self) {
        while let Some(token) = self.current() {
            let inline = match token.kind {
                SyntaxKind::WHITESPACE => !token.text.contains('\n'),
                SyntaxKind::BLOCK_COMMENT => !token.text.contains('\n'),
                SyntaxKind::LINE_CONTINUATION => true,
                _ => false,
            };
            if !inline {
                break;
            }
            self.bump();
        }
    }

    // =========================================================================
    // Error handling
    // =========================================================================

    fn error(&mut self, message: impl Into<String>) {
        let range = self
            .current()
            .map(|t| TextRange::at(t.offset, TextSize::of(t.text)))
            .unwrap_or_else(|| TextRange::empty(self.len));
        self.errors.push(SyntaxError::new(message, range));
    }

    /// Report an error and wrap the current token in an ERROR node.
    fn error_bump(&mut self, message: impl Into<String>) {
        self.error(message);
        self.start_node(SyntaxKind::ERROR);
        self.bump();
        self.finish_node();
    }

    // =========================================================================
    // Node building helpers
    // =========================================================================

    fn start_node(&mut self, kind: SyntaxKind) {
        self.builder.start_node(kind.into());
    }

    fn finish_node(&mut self) {
        self.builder.finish_node();
    }

    fn bump_as_node(&mut self, kind: SyntaxKind) {
        self.start_node(kind);
        self.bump();
        self.finish_node();
    }

    // =========================================================================
    // Source file
    // =========================================================================

    fn parse_source_file(&mut self) {
        self.start_node(SyntaxKind::SOURCE_FILE);
        loop {
            self.skip_trivia();
            if self.at_eof() {
                break;
            }
            let kind = self.current_kind();
            if kind.is_unit_end() {
                let text = self.current_text().to_string();
                self.error_bump(format!("unexpected {text}"));
                continue;
            }
            self.parse_item();
        }
        self.finish_node();
    }

    /// Parse one item of a source file or design-unit body.
    ///
    /// Callers handle the enclosing unit's end keyword before calling this.
    fn parse_item(&mut self) {
        match self.current_kind() {
            SyntaxKind::DIRECTIVE => self.parse_directive(),
            SyntaxKind::INTERFACE_KW if self.nth(1) == SyntaxKind::CLASS_KW => {
                self.parse_design_unit(SyntaxKind::CLASS_KW)
            }
            kind if kind.is_unit_start() => self.parse_design_unit(kind),
            SyntaxKind::VIRTUAL_KW | SyntaxKind::KEYWORD => self.parse_qualified_item(),
            SyntaxKind::FUNCTION_KW | SyntaxKind::TASK_KW => self.parse_subroutine(),
            SyntaxKind::EXTERN_KW | SyntaxKind::PURE_KW | SyntaxKind::EXPORT_KW => {
                self.parse_generic_item(true)
            }
            SyntaxKind::IMPORT_KW if self.nth(1) == SyntaxKind::STRING => {
                self.parse_generic_item(true)
            }
            SyntaxKind::IMPORT_KW => self.parse_import(),
            SyntaxKind::BIND_KW => self.parse_bind(),
            SyntaxKind::BEGIN_KW | SyntaxKind::END_KW => {
                self.bump();
                self.parse_end_label();
            }
            SyntaxKind::ENDFUNCTION_KW | SyntaxKind::ENDTASK_KW => {
                let text = self.current_text().to_string();
                self.error_bump(format!("unexpected {text}"));
            }
            _ if self.at_instantiation() => self.parse_instantiation(),
            _ => self.parse_generic_item(false),
        }
    }

    /// Items that start with qualifiers: `virtual class`, `static function`,
    /// `protected virtual task` and plain declarations like `logic x;`.
    fn parse_qualified_item(&mut self) {
        let mut n = 0;
        loop {
            match self.nth(n) {
                SyntaxKind::VIRTUAL_KW => n += 1,
                SyntaxKind::KEYWORD
                    if matches!(
                        self.nth_text(n),
                        "static" | "protected" | "local" | "automatic"
                    ) =>
                {
                    n += 1
                }
                _ => break,
            }
        }
        match self.nth(n) {
            SyntaxKind::CLASS_KW if n > 0 => self.parse_design_unit(SyntaxKind::CLASS_KW),
            SyntaxKind::FUNCTION_KW | SyntaxKind::TASK_KW if n > 0 => self.parse_subroutine(),
            _ => self.parse_generic_item(false),
        }
    }

    // =========================================================================
    // Design units
    // =========================================================================

    /// Parse a design unit whose start keyword is `keyword`.
    ///
    /// Leading qualifiers (`virtual`, `interface` before `class`) are
    /// consumed into the node.
    fn parse_design_unit(&mut self, keyword: SyntaxKind) {
        let (Some(node), Some(end)) = (keyword.unit_node(), keyword.unit_end()) else {
            self.parse_generic_item(false);
            return;
        };

        self.start_node(node);
        while !self.at(keyword) && !self.at_eof() {
            self.bump();
            self.skip_trivia();
        }
        self.bump();
        self.skip_trivia();

        // Lifetime qualifier: `module automatic m;`
        if self.at(SyntaxKind::KEYWORD)
            && matches!(self.current_text(), "static" | "automatic")
        {
            self.bump();
            self.skip_trivia();
        }

        if self.at(SyntaxKind::IDENT) {
            self.bump_as_node(SyntaxKind::NAME);
        } else {
            self.error(format!("expected {} name", unit_label(keyword)));
        }

        match self.parse_unit_header(end) {
            HeaderEnd::Body => self.parse_unit_body(end),
            HeaderEnd::Closed => {}
            HeaderEnd::Interrupted => self.error(format!("expected {}", end_label(end))),
        }
        self.finish_node();
    }

    /// Parse everything between the unit name and the header `;`.
    fn parse_unit_header(&mut self, end: SyntaxKind) -> HeaderEnd {
        let mut depth = 0usize;
        loop {
            self.skip_trivia();
            if self.at_eof() {
                return HeaderEnd::Interrupted;
            }
            let kind = self.current_kind();
            if kind == end {
                self.error("expected ;");
                self.bump();
                self.parse_end_label();
                return HeaderEnd::Closed;
            }
            if kind.is_unit_end()
                || (depth == 0 && kind.is_unit_start() && kind != SyntaxKind::INTERFACE_KW)
            {
                return HeaderEnd::Interrupted;
            }
            match kind {
                SyntaxKind::SEMICOLON if depth == 0 => {
                    self.bump();
                    return HeaderEnd::Body;
                }
                SyntaxKind::IMPORT_KW if depth == 0 => self.parse_import(),
                SyntaxKind::EXTENDS_KW | SyntaxKind::IMPLEMENTS_KW => self.parse_extends(),
                SyntaxKind::DIRECTIVE => self.parse_directive(),
                SyntaxKind::IDENT if self.nth(1) == SyntaxKind::COLON_COLON => {
                    self.parse_scoped_name()
                }
                SyntaxKind::IDENT if self.at_interface_port() => self.parse_interface_port(),
                SyntaxKind::L_PAREN | SyntaxKind::L_BRACKET | SyntaxKind::L_BRACE => {
                    depth += 1;
                    self.bump();
                }
                SyntaxKind::R_PAREN | SyntaxKind::R_BRACKET | SyntaxKind::R_BRACE => {
                    depth = depth.saturating_sub(1);
                    self.bump();
                }
                _ => self.bump(),
            }
        }
    }

    fn parse_unit_body(&mut self, end: SyntaxKind) {
        loop {
            self.skip_trivia();
            if self.at_eof() {
                self.error(format!("expected {}", end_label(end)));
                return;
            }
            let kind = self.current_kind();
            if kind == end {
                self.bump();
                self.parse_end_label();
                return;
            }
            if kind.is_unit_end() {
                // Leave the mismatched end keyword for an enclosing unit.
                self.error(format!("expected {}", end_label(end)));
                return;
            }
            self.parse_item();
        }
    }

    /// Optional `: label` after an end keyword.
    fn parse_end_label(&mut self) {
        let is_label = self.nth(0) == SyntaxKind::COLON
            && (self.nth(1) == SyntaxKind::IDENT
                || (self.nth(1) == SyntaxKind::KEYWORD && self.nth_text(1) == "new"));
        if !is_label {
            return;
        }
        self.skip_inline_trivia();
        self.start_node(SyntaxKind::END_LABEL);
        self.bump();
        self.skip_trivia();
        self.bump();
        self.finish_node();
    }

    // =========================================================================
    // Subroutines
    // =========================================================================

    fn parse_subroutine(&mut self) {
        let mut n = 0;
        while !matches!(
            self.nth(n),
            SyntaxKind::FUNCTION_KW | SyntaxKind::TASK_KW | SyntaxKind::ERROR
        ) {
            n += 1;
        }
        let (node, end) = if self.nth(n) == SyntaxKind::TASK_KW {
            (SyntaxKind::TASK_DECL, SyntaxKind::ENDTASK_KW)
        } else {
            (SyntaxKind::FUNCTION_DECL, SyntaxKind::ENDFUNCTION_KW)
        };

        self.start_node(node);
        for _ in 0..=n {
            self.skip_trivia();
            self.bump();
        }

        // Header up to the first `;` outside parentheses.
        let mut depth = 0usize;
        loop {
            self.skip_trivia();
            if self.at_eof() {
                break;
            }
            let kind = self.current_kind();
            if kind.is_unit_end() || kind == end {
                break;
            }
            match kind {
                SyntaxKind::SEMICOLON if depth == 0 => {
                    self.bump();
                    break;
                }
                SyntaxKind::IDENT if self.nth(1) == SyntaxKind::COLON_COLON => {
                    self.parse_scoped_name()
                }
                SyntaxKind::L_PAREN | SyntaxKind::L_BRACKET | SyntaxKind::L_BRACE => {
                    depth += 1;
                    self.bump();
                }
                SyntaxKind::R_PAREN | SyntaxKind::R_BRACKET | SyntaxKind::R_BRACE => {
                    depth = depth.saturating_sub(1);
                    self.bump();
                }
                _ => self.bump(),
            }
        }

        loop {
            self.skip_trivia();
            if self.at_eof() {
                self.error(format!("expected {}", end_label(end)));
                break;
            }
            let kind = self.current_kind();
            if kind == end {
                self.bump();
                self.parse_end_label();
                break;
            }
            if kind.is_unit_end() || (kind.is_unit_start() && kind != SyntaxKind::INTERFACE_KW) {
                self.error(format!("expected {}", end_label(end)));
                break;
            }
            if matches!(kind, SyntaxKind::ENDFUNCTION_KW | SyntaxKind::ENDTASK_KW) {
                let text = self.current_text().to_string();
                self.error_bump(format!("unexpected {text}"));
                continue;
            }
            self.parse_item();
        }
        self.finish_node();
    }

    // =========================================================================
    // Items
    // =========================================================================

    /// Opaque item up to the next `;` at bracket depth zero.
    ///
    /// Prototype items (`extern`, `pure`, DPI imports) may contain
    /// `function`/`task` keywords without opening a body.
    fn parse_generic_item(&mut self, prototype: bool) {
        self.start_node(SyntaxKind::ITEM);
        let mut depth = 0usize;
        let mut consumed = false;
        loop {
            self.skip_trivia();
            if self.at_eof() {
                break;
            }
            let kind = self.current_kind();
            if kind.is_unit_end() {
                break;
            }
            if consumed && depth == 0 && stops_item(kind, prototype) {
                break;
            }
            consumed = true;
            match kind {
                SyntaxKind::SEMICOLON if depth == 0 => {
                    self.bump();
                    break;
                }
                SyntaxKind::IDENT if self.nth(1) == SyntaxKind::COLON_COLON => {
                    self.parse_scoped_name()
                }
                SyntaxKind::DIRECTIVE => self.parse_directive(),
                SyntaxKind::L_PAREN | SyntaxKind::L_BRACKET | SyntaxKind::L_BRACE => {
                    depth += 1;
                    self.bump();
                }
                SyntaxKind::R_PAREN | SyntaxKind::R_BRACKET | SyntaxKind::R_BRACE => {
                    depth = depth.saturating_sub(1);
                    self.bump();
                    if depth == 0 && kind == SyntaxKind::R_PAREN && self.at_instantiation() {
                        break;
                    }
                }
                SyntaxKind::COLON | SyntaxKind::ELSE_KW if depth == 0 => {
                    self.bump();
                    if self.at_instantiation() {
                        break;
                    }
                }
                _ => self.bump(),
            }
        }
        self.finish_node();
    }

    /// `type [#(params)] inst [dims] (`
    fn at_instantiation(&self) -> bool {
        let Some(mut idx) = self.nth_index(self.pos, 0) else {
            return false;
        };
        if self.tokens[idx].kind != SyntaxKind::IDENT {
            return false;
        }
        let Some(next) = self.nth_index(idx + 1, 0) else {
            return false;
        };
        idx = next;

        if self.tokens[idx].kind == SyntaxKind::HASH {
            let Some(open) = self.nth_index(idx + 1, 0) else {
                return false;
            };
            if self.tokens[open].kind != SyntaxKind::L_PAREN {
                return false;
            }
            let Some(close) = self.skip_balanced(open) else {
                return false;
            };
            let Some(next) = self.nth_index(close + 1, 0) else {
                return false;
            };
            idx = next;
        }

        if self.tokens[idx].kind != SyntaxKind::IDENT {
            return false;
        }
        let Some(mut next) = self.nth_index(idx + 1, 0) else {
            return false;
        };
        while self.tokens[next].kind == SyntaxKind::L_BRACKET {
            let Some(close) = self.skip_balanced(next) else {
                return false;
            };
            match self.nth_index(close + 1, 0) {
                Some(after) => next = after,
                None => return false,
            }
        }
        self.tokens[next].kind == SyntaxKind::L_PAREN
    }

    /// Index of the token closing the bracket at `open`.
    fn skip_balanced(&self, open: usize) -> Option<usize> {
        let mut depth = 0usize;
        for (idx, token) in self.tokens.iter().enumerate().skip(open) {
            match token.kind {
                SyntaxKind::L_PAREN | SyntaxKind::L_BRACKET | SyntaxKind::L_BRACE => depth += 1,
                SyntaxKind::R_PAREN | SyntaxKind::R_BRACKET | SyntaxKind::R_BRACE => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return Some(idx);
                    }
                }
                SyntaxKind::SEMICOLON => return None,
                kind if kind.is_unit_end() => return None,
                _ => {}
            }
        }
        None
    }

    fn parse_instantiation(&mut self) {
        self.start_node(SyntaxKind::INSTANTIATION);
        self.bump_as_node(SyntaxKind::NAME_REF);
        let mut depth = 0usize;
        loop {
            self.skip_trivia();
            if self.at_eof() || self.current_kind().is_unit_end() {
                break;
            }
            match self.current_kind() {
                SyntaxKind::SEMICOLON if depth == 0 => {
                    self.bump();
                    break;
                }
                SyntaxKind::IDENT if self.nth(1) == SyntaxKind::COLON_COLON => {
                    self.parse_scoped_name()
                }
                SyntaxKind::DIRECTIVE => self.parse_directive(),
                SyntaxKind::L_PAREN | SyntaxKind::L_BRACKET | SyntaxKind::L_BRACE => {
                    depth += 1;
                    self.bump();
                }
                SyntaxKind::R_PAREN | SyntaxKind::R_BRACKET | SyntaxKind::R_BRACE => {
                    depth = depth.saturating_sub(1);
                    self.bump();
                }
                kind if depth == 0 && stops_item(kind, false) => break,
                _ => self.bump(),
            }
        }
        self.finish_node();
    }

    /// `import pkg::*, other::name;`
    fn parse_import(&mut self) {
        self.start_node(SyntaxKind::IMPORT_DECL);
        self.bump();
        loop {
            self.skip_trivia();
            if self.at_eof() {
                break;
            }
            let kind = self.current_kind();
            if kind.is_unit_end() || stops_item(kind, false) {
                break;
            }
            match kind {
                SyntaxKind::SEMICOLON => {
                    self.bump();
                    break;
                }
                SyntaxKind::IDENT if self.nth(1) == SyntaxKind::COLON_COLON => {
                    self.bump_as_node(SyntaxKind::NAME_REF);
                }
                _ => self.bump(),
            }
        }
        self.finish_node();
    }

    /// `pkg::item`, possibly chained. Only the leading package is a reference.
    fn parse_scoped_name(&mut self) {
        self.start_node(SyntaxKind::SCOPED_NAME);
        self.bump_as_node(SyntaxKind::NAME_REF);
        while self.nth(0) == SyntaxKind::COLON_COLON {
            self.skip_trivia();
            self.bump();
            if matches!(self.nth(0), SyntaxKind::IDENT | SyntaxKind::KEYWORD)
                || self.nth_text(0) == "*"
            {
                self.skip_trivia();
                self.bump();
            }
        }
        self.finish_node();
    }

    /// `extends Base #(..)` or `implements A, B`
    fn parse_extends(&mut self) {
        self.start_node(SyntaxKind::EXTENDS_CLAUSE);
        self.bump();
        loop {
            self.skip_trivia();
            match self.current_kind() {
                SyntaxKind::IDENT if self.nth(1) == SyntaxKind::COLON_COLON => {
                    self.parse_scoped_name()
                }
                SyntaxKind::IDENT => self.bump_as_node(SyntaxKind::NAME_REF),
                _ => break,
            }
            self.skip_trivia();
            if self.at(SyntaxKind::HASH) && self.nth(1) == SyntaxKind::L_PAREN {
                self.bump();
                self.skip_trivia();
                let close = self.skip_balanced(self.pos);
                match close {
                    Some(close) => {
                        while self.pos <= close {
                            self.bump();
                        }
                    }
                    None => break,
                }
                self.skip_trivia();
            }
            if !self.eat(SyntaxKind::COMMA) {
                break;
            }
        }
        self.finish_node();
    }

    /// `iface.modport name`
    fn at_interface_port(&self) -> bool {
        self.nth(1) == SyntaxKind::DOT
            && self.nth(2) == SyntaxKind::IDENT
            && self.nth(3) == SyntaxKind::IDENT
    }

    fn parse_interface_port(&mut self) {
        self.start_node(SyntaxKind::INTERFACE_PORT);
        self.bump_as_node(SyntaxKind::NAME_REF);
        for _ in 0..3 {
            self.skip_trivia();
            self.bump();
        }
        self.finish_node();
    }

    /// `bind target type inst (..);`
    fn parse_bind(&mut self) {
        self.start_node(SyntaxKind::ITEM);
        self.bump();
        self.skip_trivia();
        if self.at(SyntaxKind::IDENT) {
            self.bump_as_node(SyntaxKind::NAME_REF);
        }
        loop {
            self.skip_trivia();
            if self.at_eof() || self.current_kind().is_unit_end() {
                break;
            }
            if self.at_instantiation() {
                self.parse_instantiation();
                break;
            }
            if self.eat(SyntaxKind::SEMICOLON) {
                break;
            }
            self.bump();
        }
        self.finish_node();
    }

    // =========================================================================
    // Directives
    // =========================================================================

    fn parse_directive(&mut self) {
        let text = self.current_text();
        match text {
            "`define" => self.parse_define(),
            "`include" => self.parse_include(),
            _ if NAME_DIRECTIVES.contains(&text) => {
                self.start_node(SyntaxKind::DIRECTIVE_LINE);
                self.bump();
                self.skip_inline_trivia();
                self.eat(SyntaxKind::IDENT);
                self.finish_node();
            }
            _ if LINE_DIRECTIVES.contains(&text) => {
                self.start_node(SyntaxKind::DIRECTIVE_LINE);
                self.bump();
                self.bump_rest_of_line();
                self.finish_node();
            }
            _ if BARE_DIRECTIVES.contains(&text) => {
                self.bump_as_node(SyntaxKind::DIRECTIVE_LINE);
            }
            // Macro usage
            _ => self.bump(),
        }
    }

    /// `` `define NAME[(args)] body `` with `\` line continuations.
    fn parse_define(&mut self) {
        self.start_node(SyntaxKind::DEFINE_DIRECTIVE);
        self.bump();
        self.skip_inline_trivia();
        if self.at(SyntaxKind::IDENT) {
            self.bump_as_node(SyntaxKind::NAME);
        } else {
            self.error("expected macro name");
        }
        self.bump_rest_of_line();
        self.finish_node();
    }

    fn bump_rest_of_line(&mut self) {
        while let Some(token) = self.current() {
            if token.kind == SyntaxKind::WHITESPACE && token.text.contains('\n') {
                break;
            }
            if token.kind == SyntaxKind::BLOCK_COMMENT && token.text.contains('\n') {
                break;
            }
            self.bump();
        }
    }

    /// `` `include "file.svh" `` or `` `include <file.svh> ``
    fn parse_include(&mut self) {
        self.start_node(SyntaxKind::INCLUDE_DIRECTIVE);
        self.bump();
        self.skip_inline_trivia();
        if !self.eat(SyntaxKind::STRING) {
            if self.at(SyntaxKind::OPERATOR) && self.current_text() == "<" {
                self.bump_rest_of_line();
            } else if !self.eat(SyntaxKind::DIRECTIVE) {
                self.error("expected include file name");
            }
        }
        self.finish_node();
    }
}

/// How a design-unit header ended.
enum HeaderEnd {
    /// Header `;` consumed, body follows.
    Body,
    /// The unit's own end keyword closed it early.
    Closed,
    /// EOF or a foreign keyword cut the unit short.
    Interrupted,
}

/// Tokens that end an opaque item without being part of it.
///
/// Prototypes (`extern module`, `pure virtual function`) may mention unit
/// and subroutine keywords without opening a body.
fn stops_item(kind: SyntaxKind, prototype: bool) -> bool {
    if prototype {
        return matches!(
            kind,
            SyntaxKind::BEGIN_KW
                | SyntaxKind::END_KW
                | SyntaxKind::ENDFUNCTION_KW
                | SyntaxKind::ENDTASK_KW
        );
    }
    match kind {
        SyntaxKind::INTERFACE_KW | SyntaxKind::CLASS_KW => false,
        _ => kind.ends_item(),
    }
}

fn unit_label(keyword: SyntaxKind) -> &'static str {
    match keyword {
        SyntaxKind::MODULE_KW => "module",
        SyntaxKind::INTERFACE_KW => "interface",
        SyntaxKind::PROGRAM_KW => "program",
        SyntaxKind::PACKAGE_KW => "package",
        SyntaxKind::CLASS_KW => "class",
        SyntaxKind::PRIMITIVE_KW => "primitive",
        SyntaxKind::CHECKER_KW => "checker",
        SyntaxKind::CONFIG_KW => "config",
        _ => "unit",
    }
}

fn end_label(end: SyntaxKind) -> &'static str {
    match end {
        SyntaxKind::ENDMODULE_KW => "endmodule",
        SyntaxKind::ENDINTERFACE_KW => "endinterface",
        SyntaxKind::ENDPROGRAM_KW => "endprogram",
        SyntaxKind::ENDPACKAGE_KW => "endpackage",
        SyntaxKind::ENDCLASS_KW => "endclass",
        SyntaxKind::ENDPRIMITIVE_KW => "endprimitive",
        SyntaxKind::ENDCHECKER_KW => "endchecker",
        SyntaxKind::ENDCONFIG_KW => "endconfig",
        SyntaxKind::ENDFUNCTION_KW => "endfunction",
        SyntaxKind::ENDTASK_KW => "endtask",
        _ => "end",
    }
}
