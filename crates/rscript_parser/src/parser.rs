//! The TypeScript parser implementation.
//!
//! A recursive descent parser that consumes tokens from the scanner and
//! builds an arena-allocated AST. It never gives up on malformed input: it
//! reports a diagnostic, synthesizes a missing node where one is required
//! and resynchronizes at the next token that can start a statement.

use bumpalo::Bump;
use rscript_ast::node::*;
use rscript_ast::syntax_kind::SyntaxKind;
use rscript_ast::types::*;
use rscript_core::text::TextSpan;
use rscript_diagnostics::{messages, Diagnostic, DiagnosticCollection, DiagnosticMessage};
use rscript_scanner::{Scanner, ScannerState};
use rustc_hash::FxHashSet;

use crate::error::ParseError;
use crate::precedence::{get_binary_operator_precedence, OperatorPrecedence};
use crate::utilities::{
    can_start_expression, can_start_statement, is_identifier_kind, is_list_breaker,
    is_statement_recovery_point,
};

/// Maximum nesting of statements, expressions and types before the parser bails out.
pub const DEFAULT_MAX_DEPTH: u32 = 200;

/// Options for a single parse.
#[derive(Debug, Clone)]
pub struct ParserOptions {
    /// Overrides the script kind derived from the file name.
    pub script_kind: Option<ScriptKind>,
    /// Nesting depth at which parsing stops descending.
    pub max_depth: u32,
    /// Longest source, in bytes, that `try_parse_source_file` accepts.
    pub max_source_length: usize,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            script_kind: None,
            max_depth: DEFAULT_MAX_DEPTH,
            max_source_length: u32::MAX as usize,
        }
    }
}

/// Everything speculative parsing has to rewind.
struct ParserState {
    scanner: ScannerState,
    prev_token_end: u32,
    diagnostic_count: usize,
    last_error_pos: Option<u32>,
    context_flags: NodeFlags,
    disallow_in: bool,
    disallow_conditional_types: bool,
    depth_exceeded_at: Option<u32>,
}

/// The parts of an arrow function before `=>`.
struct ArrowHead<'a> {
    pos: u32,
    modifiers: ModifierFlags,
    type_parameters: Option<&'a [TypeParameterDeclaration<'a>]>,
    parameters: &'a [ParameterDeclaration<'a>],
    return_type: Option<&'a TypeNode<'a>>,
}

/// The parser produces a SourceFile AST from TypeScript source text.
pub struct Parser<'a> {
    arena: &'a Bump,
    scanner: Scanner,
    file_name: String,
    options: ParserOptions,
    context_flags: NodeFlags,
    disallow_in: bool,
    disallow_conditional_types: bool,
    diagnostics: DiagnosticCollection,
    recursion_depth: u32,
    /// End of the last consumed token; node ranges end here.
    prev_token_end: u32,
    last_error_pos: Option<u32>,
    depth_exceeded_at: Option<u32>,
    /// Positions where a parenthesized arrow function was tried and failed.
    not_arrow_at: FxHashSet<u32>,
}

impl<'a> Parser<'a> {
    pub fn new(arena: &'a Bump, file_name: &str, source_text: &str) -> Self {
        Self::with_options(arena, file_name, source_text, ParserOptions::default())
    }

    pub fn with_options(
        arena: &'a Bump,
        file_name: &str,
        source_text: &str,
        options: ParserOptions,
    ) -> Self {
        let context_flags = if is_declaration_file_name(file_name) {
            NodeFlags::AMBIENT
        } else {
            NodeFlags::NONE
        };
        Self {
            arena,
            scanner: Scanner::new(source_text),
            file_name: file_name.to_string(),
            options,
            context_flags,
            disallow_in: false,
            disallow_conditional_types: false,
            diagnostics: DiagnosticCollection::new(),
            recursion_depth: 0,
            prev_token_end: 0,
            last_error_pos: None,
            depth_exceeded_at: None,
            not_arrow_at: FxHashSet::default(),
        }
    }

    /// Parse the whole file, recovering from every syntax error.
    pub fn parse_source_file(self) -> SourceFile<'a> {
        self.parse_file().0
    }

    /// Parse the whole file, failing when the source is too large or nests
    /// deeper than `ParserOptions::max_depth`.
    pub fn try_parse_source_file(self) -> Result<SourceFile<'a>, ParseError> {
        let length = self.scanner.text().len();
        let limit = self.options.max_source_length;
        if length > limit {
            tracing::debug!(file = %self.file_name, length, limit, "source text too large to parse");
            return Err(ParseError::SourceTooLarge { length, limit });
        }
        let depth = self.options.max_depth;
        match self.parse_file() {
            (_, Some(pos)) => Err(ParseError::NestingTooDeep { depth, pos }),
            (file, None) => Ok(file),
        }
    }

    fn parse_file(mut self) -> (SourceFile<'a>, Option<u32>) {
        self.scanner.skip_shebang();
        self.next_token();

        let statements = self.parse_list_of_statements(|_| false);
        let end = self.scanner.text().len() as u32;
        let end_of_file_token = Token::new(SyntaxKind::EndOfFileToken, self.token_pos(), end);
        let script_kind = self
            .options
            .script_kind
            .unwrap_or_else(|| ScriptKind::from_file_name(&self.file_name));
        let is_declaration_file = is_declaration_file_name(&self.file_name);

        let mut diagnostics = self.diagnostics;
        for mut diagnostic in self.scanner.take_diagnostics().into_diagnostics() {
            diagnostic.file = Some(self.file_name.clone());
            diagnostics.add(diagnostic);
        }
        diagnostics.sort();

        tracing::debug!(
            file = %self.file_name,
            statements = statements.len(),
            diagnostics = diagnostics.len(),
            "parsed source file"
        );

        let file = SourceFile {
            data: NodeData::new(SyntaxKind::SourceFile, 0, end),
            statements,
            end_of_file_token,
            text: self.scanner.into_text(),
            file_name: self.file_name,
            script_kind,
            is_declaration_file,
            parse_diagnostics: diagnostics.into_diagnostics(),
        };
        (file, self.depth_exceeded_at)
    }

    // ========================================================================
    // Token management
    // ========================================================================

    #[inline]
    fn token(&self) -> SyntaxKind {
        self.scanner.token()
    }

    fn next_token(&mut self) -> SyntaxKind {
        self.prev_token_end = self.scanner.token_end() as u32;
        self.scanner.scan()
    }

    #[inline]
    fn token_pos(&self) -> u32 {
        self.scanner.token_start() as u32
    }

    #[inline]
    fn token_end(&self) -> u32 {
        self.scanner.token_end() as u32
    }

    #[inline]
    fn has_preceding_line_break(&self) -> bool {
        self.scanner.has_preceding_line_break()
    }

    /// Whether the current token can be used as an identifier here.
    fn is_identifier(&self) -> bool {
        match self.token() {
            SyntaxKind::Identifier => true,
            SyntaxKind::YieldKeyword if self.context_flags.contains(NodeFlags::YIELD_CONTEXT) => false,
            SyntaxKind::AwaitKeyword if self.context_flags.contains(NodeFlags::AWAIT_CONTEXT) => false,
            kind => is_identifier_kind(kind),
        }
    }

    fn parse_expected(&mut self, kind: SyntaxKind) -> bool {
        if self.token() == kind {
            self.next_token();
            true
        } else {
            let text = kind.token_text().unwrap_or("token");
            self.error(&messages::_0_EXPECTED, &[text]);
            false
        }
    }

    fn parse_optional(&mut self, kind: SyntaxKind) -> bool {
        if self.token() == kind {
            self.next_token();
            true
        } else {
            false
        }
    }

    fn can_parse_semicolon(&self) -> bool {
        matches!(
            self.token(),
            SyntaxKind::SemicolonToken | SyntaxKind::CloseBraceToken | SyntaxKind::EndOfFileToken
        ) || self.has_preceding_line_break()
    }

    /// Consume a `;`, or accept its automatic insertion.
    fn parse_semicolon(&mut self) -> bool {
        if self.parse_optional(SyntaxKind::SemicolonToken) || self.can_parse_semicolon() {
            return true;
        }
        self.parse_expected(SyntaxKind::SemicolonToken)
    }

    fn error(&mut self, message: &DiagnosticMessage, args: &[&str]) {
        let (pos, end) = (self.token_pos(), self.token_end());
        self.error_at(pos, end, message, args);
    }

    /// Report at most one error per position.
    fn error_at(&mut self, pos: u32, end: u32, message: &DiagnosticMessage, args: &[&str]) {
        if self.last_error_pos == Some(pos) {
            return;
        }
        self.last_error_pos = Some(pos);
        self.diagnostics.add(Diagnostic::with_location(
            self.file_name.clone(),
            TextSpan::from_bounds(pos, end),
            message,
            args,
        ));
    }

    // ========================================================================
    // Allocation and node construction
    // ========================================================================

    #[inline]
    fn alloc<T>(&self, value: T) -> &'a T {
        self.arena.alloc(value)
    }

    fn alloc_slice<T>(&self, items: Vec<T>) -> &'a [T] {
        if items.is_empty() {
            return &[];
        }
        self.arena.alloc_slice_fill_iter(items)
    }

    #[inline]
    fn alloc_str(&self, text: &str) -> &'a str {
        self.arena.alloc_str(text)
    }

    /// Node data spanning from `pos` to the end of the last consumed token.
    fn finish(&self, kind: SyntaxKind, pos: u32) -> NodeData {
        NodeData::new(kind, pos, self.prev_token_end.max(pos)).with_flags(self.context_flags)
    }

    fn finish_token(&self, kind: SyntaxKind, pos: u32) -> Token {
        Token { data: self.finish(kind, pos) }
    }

    fn missing_identifier(&self) -> Identifier<'a> {
        let pos = self.token_pos();
        Identifier {
            data: NodeData::new(SyntaxKind::Identifier, pos, pos).with_flags(NodeFlags::THIS_NODE_HAS_ERROR),
            text: "",
            original_keyword_kind: None,
        }
    }

    fn missing_expression(&mut self) -> Expression<'a> {
        Expression::Identifier(self.missing_identifier())
    }

    fn missing_type(&mut self) -> TypeNode<'a> {
        let pos = self.token_pos();
        TypeNode::TypeReference(TypeReferenceNode {
            data: NodeData::new(SyntaxKind::TypeReference, pos, pos).with_flags(NodeFlags::THIS_NODE_HAS_ERROR),
            type_name: EntityName::Identifier(self.missing_identifier()),
            type_arguments: None,
        })
    }

    fn missing_statement(&mut self) -> Statement<'a> {
        let pos = self.token_pos();
        Statement::MissingDeclaration(Token {
            data: NodeData::new(SyntaxKind::MissingDeclaration, pos, pos).with_flags(NodeFlags::THIS_NODE_HAS_ERROR),
        })
    }

    // ========================================================================
    // Speculation and context
    // ========================================================================

    fn save_state(&self) -> ParserState {
        ParserState {
            scanner: self.scanner.save_state(),
            prev_token_end: self.prev_token_end,
            diagnostic_count: self.diagnostics.len(),
            last_error_pos: self.last_error_pos,
            context_flags: self.context_flags,
            disallow_in: self.disallow_in,
            disallow_conditional_types: self.disallow_conditional_types,
            depth_exceeded_at: self.depth_exceeded_at,
        }
    }

    fn restore_state(&mut self, state: ParserState) {
        self.scanner.restore_state(state.scanner);
        self.prev_token_end = state.prev_token_end;
        self.diagnostics.truncate(state.diagnostic_count);
        self.last_error_pos = state.last_error_pos;
        self.context_flags = state.context_flags;
        self.disallow_in = state.disallow_in;
        self.disallow_conditional_types = state.disallow_conditional_types;
        self.depth_exceeded_at = state.depth_exceeded_at;
    }

    /// Run `f` and rewind everything it consumed or reported.
    fn look_ahead<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        let state = self.save_state();
        let result = f(self);
        self.restore_state(state);
        result
    }

    /// Run `f`, rewinding only if it returns `None`.
    fn try_parse<T>(&mut self, f: impl FnOnce(&mut Self) -> Option<T>) -> Option<T> {
        let state = self.save_state();
        let result = f(self);
        if result.is_none() {
            self.restore_state(state);
        }
        result
    }

    /// Like `try_parse`, but any diagnostic reported by `f` also counts as failure.
    fn try_parse_clean<T>(&mut self, f: impl FnOnce(&mut Self) -> Option<T>) -> Option<T> {
        self.try_parse(|p| {
            let parser_errors = p.diagnostics.len();
            let scanner_errors = p.scanner.diagnostics().len();
            p.last_error_pos = None;
            let result = f(p)?;
            if p.diagnostics.len() == parser_errors && p.scanner.diagnostics().len() == scanner_errors {
                Some(result)
            } else {
                None
            }
        })
    }

    fn next_token_is(&mut self, f: impl FnOnce(&mut Self) -> bool) -> bool {
        self.look_ahead(|p| {
            p.next_token();
            f(p)
        })
    }

    fn next_token_is_identifier(&mut self) -> bool {
        self.next_token_is(|p| p.is_identifier())
    }

    /// Parse with await/yield context replaced by `flags`.
    fn with_context<T>(&mut self, flags: NodeFlags, f: impl FnOnce(&mut Self) -> T) -> T {
        let saved = self.context_flags;
        self.context_flags = saved
            .difference(NodeFlags::AWAIT_CONTEXT | NodeFlags::YIELD_CONTEXT)
            .union(flags);
        let result = f(self);
        self.context_flags = saved;
        result
    }

    fn with_disallow_in<T>(&mut self, disallow_in: bool, f: impl FnOnce(&mut Self) -> T) -> T {
        let saved = self.disallow_in;
        self.disallow_in = disallow_in;
        let result = f(self);
        self.disallow_in = saved;
        result
    }

    fn allow_in<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        self.with_disallow_in(false, f)
    }

    fn with_disallow_conditional_types<T>(&mut self, value: bool, f: impl FnOnce(&mut Self) -> T) -> T {
        let saved = self.disallow_conditional_types;
        self.disallow_conditional_types = value;
        let result = f(self);
        self.disallow_conditional_types = saved;
        result
    }

    /// Run `f` one nesting level deeper. Past the depth limit the rest of the
    /// file is skipped and `missing` stands in for the node.
    fn guarded<T>(&mut self, missing: fn(&mut Self) -> T, f: impl FnOnce(&mut Self) -> T) -> T {
        if self.recursion_depth >= self.options.max_depth {
            if self.depth_exceeded_at.is_none() {
                let pos = self.token_pos();
                self.depth_exceeded_at = Some(pos);
                let depth = self.options.max_depth.to_string();
                self.error(&messages::MAXIMUM_NESTING_DEPTH_EXCEEDED, &[&depth]);
                tracing::debug!(file = %self.file_name, pos, "maximum nesting depth exceeded");
            }
            while self.token() != SyntaxKind::EndOfFileToken {
                self.next_token();
            }
            return missing(self);
        }
        self.recursion_depth += 1;
        let result = f(self);
        self.recursion_depth -= 1;
        result
    }

    /// Parse `elem (, elem)*` up to `close`, which is left unconsumed.
    fn parse_delimited_list<T>(
        &mut self,
        close: SyntaxKind,
        mut parse_element: impl FnMut(&mut Self) -> T,
    ) -> Vec<T> {
        let mut elements = Vec::new();
        loop {
            if self.token() == close || self.token() == SyntaxKind::EndOfFileToken {
                break;
            }
            let start = self.scanner.token_start();
            elements.push(parse_element(self));
            if self.parse_optional(SyntaxKind::CommaToken) {
                continue;
            }
            if self.token() == close || is_list_breaker(self.token()) {
                break;
            }
            if self.scanner.token_start() == start {
                break;
            }
            self.error(&messages::_0_EXPECTED, &[","]);
        }
        elements
    }

    // ========================================================================
    // Names and literals
    // ========================================================================

    fn create_identifier(&mut self, is_identifier: bool, message: &DiagnosticMessage) -> Identifier<'a> {
        if !is_identifier {
            self.error(message, &[]);
            return self.missing_identifier();
        }
        let pos = self.token_pos();
        let kind = self.token();
        let text = self.alloc_str(self.scanner.token_value());
        self.next_token();
        Identifier {
            data: self.finish(SyntaxKind::Identifier, pos),
            text,
            original_keyword_kind: (kind != SyntaxKind::Identifier).then_some(kind),
        }
    }

    fn parse_identifier(&mut self) -> Identifier<'a> {
        let is_identifier = self.is_identifier();
        self.create_identifier(is_identifier, &messages::IDENTIFIER_EXPECTED)
    }

    /// An identifier where reserved words are allowed, such as after `.`.
    fn parse_identifier_name(&mut self) -> Identifier<'a> {
        let is_identifier = self.token().is_identifier_or_keyword();
        self.create_identifier(is_identifier, &messages::IDENTIFIER_EXPECTED)
    }

    /// `this` in parameter and type predicate position, as an identifier.
    fn parse_this_or_identifier(&mut self) -> Identifier<'a> {
        if self.token() == SyntaxKind::ThisKeyword {
            self.parse_identifier_name()
        } else {
            self.parse_identifier()
        }
    }

    fn parse_private_identifier(&mut self) -> Identifier<'a> {
        let pos = self.token_pos();
        let text = self.alloc_str(self.scanner.token_value());
        self.next_token();
        Identifier {
            data: self.finish(SyntaxKind::PrivateIdentifier, pos),
            text,
            original_keyword_kind: None,
        }
    }

    fn parse_string_literal(&mut self) -> StringLiteral<'a> {
        let pos = self.token_pos();
        let text = self.alloc_str(self.scanner.token_value());
        let is_single_quote = self.scanner.token_flags().contains(TokenFlags::SINGLE_QUOTE);
        self.next_token();
        StringLiteral {
            data: self.finish(SyntaxKind::StringLiteral, pos),
            text,
            is_single_quote,
        }
    }

    fn parse_numeric_literal(&mut self) -> NumericLiteral<'a> {
        let pos = self.token_pos();
        let text = self.alloc_str(self.scanner.token_value());
        self.next_token();
        NumericLiteral {
            data: self.finish(SyntaxKind::NumericLiteral, pos),
            text,
        }
    }

    fn parse_big_int_literal(&mut self) -> BigIntLiteral<'a> {
        let pos = self.token_pos();
        let text = self.alloc_str(self.scanner.token_value());
        self.next_token();
        BigIntLiteral {
            data: self.finish(SyntaxKind::BigIntLiteral, pos),
            text,
        }
    }

    /// A no-substitution template or a template head, middle or tail.
    fn parse_template_literal_like(&mut self) -> TemplateLiteralLikeNode<'a> {
        let pos = self.token_pos();
        let kind = self.token();
        let text = self.alloc_str(self.scanner.token_value());
        let raw_text = self.alloc_str(self.scanner.token_raw_text());
        self.next_token();
        TemplateLiteralLikeNode {
            data: self.finish(kind, pos),
            text,
            raw_text,
        }
    }

    /// The middle or tail following a substitution. The current token must be
    /// the `}` that closes the substitution.
    fn parse_template_span_literal(&mut self) -> TemplateLiteralLikeNode<'a> {
        if self.token() == SyntaxKind::CloseBraceToken {
            self.scanner.rescan_template_token();
            return self.parse_template_literal_like();
        }
        self.error(&messages::_0_EXPECTED, &["}"]);
        let pos = self.token_pos();
        TemplateLiteralLikeNode {
            data: NodeData::new(SyntaxKind::TemplateTail, pos, pos).with_flags(NodeFlags::THIS_NODE_HAS_ERROR),
            text: "",
            raw_text: "",
        }
    }

    fn is_literal_property_name(&self) -> bool {
        let token = self.token();
        token.is_identifier_or_keyword()
            || matches!(
                token,
                SyntaxKind::StringLiteral | SyntaxKind::NumericLiteral | SyntaxKind::PrivateIdentifier
            )
    }

    fn parse_property_name(&mut self) -> PropertyName<'a> {
        match self.token() {
            SyntaxKind::StringLiteral => PropertyName::StringLiteral(self.parse_string_literal()),
            SyntaxKind::NumericLiteral => PropertyName::NumericLiteral(self.parse_numeric_literal()),
            SyntaxKind::PrivateIdentifier => PropertyName::PrivateIdentifier(self.parse_private_identifier()),
            SyntaxKind::OpenBracketToken => {
                let pos = self.token_pos();
                self.next_token();
                let expression = self.allow_in(Self::parse_expression);
                let expression = self.alloc(expression);
                self.parse_expected(SyntaxKind::CloseBracketToken);
                let name = ComputedPropertyName {
                    data: self.finish(SyntaxKind::ComputedPropertyName, pos),
                    expression,
                };
                PropertyName::ComputedPropertyName(self.alloc(name))
            }
            _ => PropertyName::Identifier(self.parse_identifier_name()),
        }
    }

    /// `A`, `A.B.C`.
    fn parse_entity_name(&mut self, allow_reserved_words: bool) -> EntityName<'a> {
        let pos = self.token_pos();
        let first = if allow_reserved_words {
            self.parse_identifier_name()
        } else {
            self.parse_identifier()
        };
        let mut entity = EntityName::Identifier(first);
        while self.token() == SyntaxKind::DotToken {
            self.next_token();
            let right = self.parse_identifier_name();
            let name = QualifiedName {
                data: self.finish(SyntaxKind::QualifiedName, pos),
                left: entity,
                right,
            };
            entity = EntityName::QualifiedName(self.alloc(name));
        }
        entity
    }

    // ========================================================================
    // Statement lists
    // ========================================================================

    fn parse_list_of_statements(&mut self, is_terminator: fn(SyntaxKind) -> bool) -> &'a [Statement<'a>] {
        let mut statements = Vec::new();
        loop {
            let token = self.token();
            if token == SyntaxKind::EndOfFileToken || is_terminator(token) {
                break;
            }
            if !can_start_statement(token) {
                self.error(&messages::DECLARATION_OR_STATEMENT_EXPECTED, &[]);
                self.next_token();
                self.skip_to_recovery_point(is_terminator);
                continue;
            }
            let start = self.scanner.token_start();
            let statement = self.parse_statement();
            if self.scanner.token_start() == start && self.token() != SyntaxKind::EndOfFileToken {
                // No progress: drop the statement and resynchronize.
                self.next_token();
                self.skip_to_recovery_point(is_terminator);
                continue;
            }
            statements.push(statement);
        }
        self.alloc_slice(statements)
    }

    fn skip_to_recovery_point(&mut self, is_terminator: fn(SyntaxKind) -> bool) {
        loop {
            let token = self.token();
            if token == SyntaxKind::EndOfFileToken || is_terminator(token) || is_statement_recovery_point(token) {
                return;
            }
            self.next_token();
        }
    }

    fn parse_statement(&mut self) -> Statement<'a> {
        self.guarded(Self::missing_statement, Self::parse_statement_worker)
    }

    fn parse_statement_worker(&mut self) -> Statement<'a> {
        let pos = self.token_pos();
        match self.token() {
            SyntaxKind::SemicolonToken => {
                self.next_token();
                Statement::EmptyStatement(self.finish_token(SyntaxKind::EmptyStatement, pos))
            }
            SyntaxKind::OpenBraceToken => Statement::Block(self.parse_block()),
            SyntaxKind::VarKeyword => {
                Statement::VariableStatement(self.parse_variable_statement(pos, ModifierFlags::NONE))
            }
            SyntaxKind::LetKeyword if self.is_let_declaration() => {
                Statement::VariableStatement(self.parse_variable_statement(pos, ModifierFlags::NONE))
            }
            SyntaxKind::FunctionKeyword => {
                Statement::FunctionDeclaration(self.parse_function_declaration(pos, ModifierFlags::NONE))
            }
            SyntaxKind::ClassKeyword => Statement::ClassDeclaration(self.parse_class_like(
                pos,
                &[],
                ModifierFlags::NONE,
                SyntaxKind::ClassDeclaration,
            )),
            SyntaxKind::IfKeyword => self.parse_if_statement(),
            SyntaxKind::DoKeyword => self.parse_do_statement(),
            SyntaxKind::WhileKeyword => self.parse_while_statement(),
            SyntaxKind::ForKeyword => self.parse_for_statement(),
            SyntaxKind::ContinueKeyword => self.parse_jump_statement(SyntaxKind::ContinueStatement),
            SyntaxKind::BreakKeyword => self.parse_jump_statement(SyntaxKind::BreakStatement),
            SyntaxKind::ReturnKeyword => self.parse_return_statement(),
            SyntaxKind::SwitchKeyword => self.parse_switch_statement(),
            SyntaxKind::ThrowKeyword => self.parse_throw_statement(),
            SyntaxKind::TryKeyword => self.parse_try_statement(),
            SyntaxKind::DebuggerKeyword => {
                self.next_token();
                self.parse_semicolon();
                Statement::DebuggerStatement(self.finish_token(SyntaxKind::DebuggerStatement, pos))
            }
            SyntaxKind::AtToken | SyntaxKind::ExportKeyword => self.parse_declaration(),
            SyntaxKind::ImportKeyword
                if !self.next_token_is(|p| {
                    matches!(p.token(), SyntaxKind::OpenParenToken | SyntaxKind::DotToken)
                }) =>
            {
                self.parse_declaration()
            }
            _ if self.is_start_of_declaration() => self.parse_declaration(),
            _ => self.parse_expression_or_labeled_statement(),
        }
    }

    fn is_let_declaration(&mut self) -> bool {
        self.next_token_is(|p| {
            p.is_identifier() || matches!(p.token(), SyntaxKind::OpenBraceToken | SyntaxKind::OpenBracketToken)
        })
    }

    fn is_start_of_declaration(&mut self) -> bool {
        self.look_ahead(Self::scan_start_of_declaration)
    }

    fn scan_start_of_declaration(&mut self) -> bool {
        loop {
            match self.token() {
                SyntaxKind::VarKeyword
                | SyntaxKind::LetKeyword
                | SyntaxKind::ConstKeyword
                | SyntaxKind::FunctionKeyword
                | SyntaxKind::ClassKeyword
                | SyntaxKind::EnumKeyword
                | SyntaxKind::AtToken => return true,
                SyntaxKind::InterfaceKeyword | SyntaxKind::TypeKeyword => {
                    self.next_token();
                    return !self.has_preceding_line_break() && self.is_identifier();
                }
                SyntaxKind::ModuleKeyword | SyntaxKind::NamespaceKeyword => {
                    self.next_token();
                    return !self.has_preceding_line_break()
                        && (self.is_identifier() || self.token() == SyntaxKind::StringLiteral);
                }
                SyntaxKind::GlobalKeyword => {
                    self.next_token();
                    return matches!(
                        self.token(),
                        SyntaxKind::OpenBraceToken | SyntaxKind::Identifier | SyntaxKind::ExportKeyword
                    );
                }
                SyntaxKind::AbstractKeyword
                | SyntaxKind::AccessorKeyword
                | SyntaxKind::AsyncKeyword
                | SyntaxKind::DeclareKeyword
                | SyntaxKind::PrivateKeyword
                | SyntaxKind::ProtectedKeyword
                | SyntaxKind::PublicKeyword
                | SyntaxKind::ReadonlyKeyword
                | SyntaxKind::StaticKeyword
                | SyntaxKind::OverrideKeyword => {
                    self.next_token();
                    if self.has_preceding_line_break() {
                        return false;
                    }
                }
                SyntaxKind::ImportKeyword => {
                    self.next_token();
                    return matches!(
                        self.token(),
                        SyntaxKind::StringLiteral | SyntaxKind::AsteriskToken | SyntaxKind::OpenBraceToken
                    ) || self.token().is_identifier_or_keyword();
                }
                SyntaxKind::ExportKeyword => return true,
                _ => return false,
            }
        }
    }

    fn parse_block(&mut self) -> Block<'a> {
        let pos = self.token_pos();
        let statements = if self.parse_expected(SyntaxKind::OpenBraceToken) {
            let statements = self.parse_list_of_statements(|kind| kind == SyntaxKind::CloseBraceToken);
            self.parse_expected(SyntaxKind::CloseBraceToken);
            statements
        } else {
            &[]
        };
        Block {
            data: self.finish(SyntaxKind::Block, pos),
            statements,
        }
    }

    fn parse_expression_or_labeled_statement(&mut self) -> Statement<'a> {
        let pos = self.token_pos();
        let starts_with_identifier = self.is_identifier();
        let expression = self.allow_in(Self::parse_expression);
        match expression {
            Expression::Identifier(label)
                if starts_with_identifier && self.token() == SyntaxKind::ColonToken =>
            {
                self.next_token();
                let statement = self.parse_statement();
                Statement::LabeledStatement(LabeledStatement {
                    data: self.finish(SyntaxKind::LabeledStatement, pos),
                    label,
                    statement: self.alloc(statement),
                })
            }
            expression => {
                self.parse_semicolon();
                Statement::ExpressionStatement(ExpressionStatement {
                    data: self.finish(SyntaxKind::ExpressionStatement, pos),
                    expression: self.alloc(expression),
                })
            }
        }
    }

    // ========================================================================
    // Control flow statements
    // ========================================================================

    fn parse_parenthesized_condition(&mut self) -> &'a Expression<'a> {
        self.parse_expected(SyntaxKind::OpenParenToken);
        let expression = self.allow_in(Self::parse_expression);
        self.parse_expected(SyntaxKind::CloseParenToken);
        self.alloc(expression)
    }

    fn parse_embedded_statement(&mut self) -> &'a Statement<'a> {
        let statement = self.parse_statement();
        self.alloc(statement)
    }

    fn parse_if_statement(&mut self) -> Statement<'a> {
        let pos = self.token_pos();
        self.parse_expected(SyntaxKind::IfKeyword);
        let expression = self.parse_parenthesized_condition();
        let then_statement = self.parse_embedded_statement();
        let else_statement = if self.parse_optional(SyntaxKind::ElseKeyword) {
            Some(self.parse_embedded_statement())
        } else {
            None
        };
        Statement::IfStatement(IfStatement {
            data: self.finish(SyntaxKind::IfStatement, pos),
            expression,
            then_statement,
            else_statement,
        })
    }

    fn parse_do_statement(&mut self) -> Statement<'a> {
        let pos = self.token_pos();
        self.parse_expected(SyntaxKind::DoKeyword);
        let statement = self.parse_embedded_statement();
        self.parse_expected(SyntaxKind::WhileKeyword);
        let expression = self.parse_parenthesized_condition();
        // `do x; while (y) z` inserts a semicolon after the condition.
        self.parse_optional(SyntaxKind::SemicolonToken);
        Statement::DoStatement(DoStatement {
            data: self.finish(SyntaxKind::DoStatement, pos),
            statement,
            expression,
        })
    }

    fn parse_while_statement(&mut self) -> Statement<'a> {
        let pos = self.token_pos();
        self.parse_expected(SyntaxKind::WhileKeyword);
        let expression = self.parse_parenthesized_condition();
        let statement = self.parse_embedded_statement();
        Statement::WhileStatement(WhileStatement {
            data: self.finish(SyntaxKind::WhileStatement, pos),
            expression,
            statement,
        })
    }

    fn parse_for_statement(&mut self) -> Statement<'a> {
        let pos = self.token_pos();
        self.parse_expected(SyntaxKind::ForKeyword);
        let await_modifier = self.parse_optional(SyntaxKind::AwaitKeyword);
        self.parse_expected(SyntaxKind::OpenParenToken);

        let initializer = match self.token() {
            SyntaxKind::SemicolonToken => None,
            SyntaxKind::VarKeyword | SyntaxKind::ConstKeyword => Some(self.parse_for_declaration_list()),
            SyntaxKind::LetKeyword if self.is_let_declaration() => Some(self.parse_for_declaration_list()),
            _ => {
                let expression = self.with_disallow_in(true, Self::parse_expression);
                Some(ForInitializer::Expression(self.alloc(expression)))
            }
        };

        match initializer {
            Some(initializer) if await_modifier || self.token() == SyntaxKind::OfKeyword => {
                self.parse_expected(SyntaxKind::OfKeyword);
                let expression = self.allow_in(Self::parse_assignment_expression);
                let expression = self.alloc(expression);
                self.parse_expected(SyntaxKind::CloseParenToken);
                let statement = self.parse_embedded_statement();
                Statement::ForOfStatement(ForInOrOfStatement {
                    data: self.finish(SyntaxKind::ForOfStatement, pos),
                    await_modifier,
                    initializer,
                    expression,
                    statement,
                })
            }
            Some(initializer) if self.token() == SyntaxKind::InKeyword => {
                self.next_token();
                let expression = self.allow_in(Self::parse_expression);
                let expression = self.alloc(expression);
                self.parse_expected(SyntaxKind::CloseParenToken);
                let statement = self.parse_embedded_statement();
                Statement::ForInStatement(ForInOrOfStatement {
                    data: self.finish(SyntaxKind::ForInStatement, pos),
                    await_modifier: false,
                    initializer,
                    expression,
                    statement,
                })
            }
            initializer => {
                self.parse_expected(SyntaxKind::SemicolonToken);
                let condition = if !matches!(
                    self.token(),
                    SyntaxKind::SemicolonToken | SyntaxKind::CloseParenToken
                ) {
                    let condition = self.allow_in(Self::parse_expression);
                    Some(self.alloc(condition))
                } else {
                    None
                };
                self.parse_expected(SyntaxKind::SemicolonToken);
                let incrementor = if self.token() != SyntaxKind::CloseParenToken {
                    let incrementor = self.allow_in(Self::parse_expression);
                    Some(self.alloc(incrementor))
                } else {
                    None
                };
                self.parse_expected(SyntaxKind::CloseParenToken);
                let statement = self.parse_embedded_statement();
                Statement::ForStatement(ForStatement {
                    data: self.finish(SyntaxKind::ForStatement, pos),
                    initializer,
                    condition,
                    incrementor,
                    statement,
                })
            }
        }
    }

    fn parse_for_declaration_list(&mut self) -> ForInitializer<'a> {
        let list = self.with_disallow_in(true, Self::parse_variable_declaration_list);
        ForInitializer::VariableDeclarationList(self.alloc(list))
    }

    fn parse_jump_statement(&mut self, kind: SyntaxKind) -> Statement<'a> {
        let pos = self.token_pos();
        self.next_token();
        let label = if !self.can_parse_semicolon() && self.is_identifier() {
            Some(self.parse_identifier())
        } else {
            None
        };
        self.parse_semicolon();
        let statement = JumpStatement {
            data: self.finish(kind, pos),
            label,
        };
        if kind == SyntaxKind::BreakStatement {
            Statement::BreakStatement(statement)
        } else {
            Statement::ContinueStatement(statement)
        }
    }

    fn parse_return_statement(&mut self) -> Statement<'a> {
        let pos = self.token_pos();
        self.next_token();
        let expression = if !self.can_parse_semicolon() {
            let expression = self.allow_in(Self::parse_expression);
            Some(self.alloc(expression))
        } else {
            None
        };
        self.parse_semicolon();
        Statement::ReturnStatement(ReturnStatement {
            data: self.finish(SyntaxKind::ReturnStatement, pos),
            expression,
        })
    }

    fn parse_throw_statement(&mut self) -> Statement<'a> {
        let pos = self.token_pos();
        self.next_token();
        let expression = self.allow_in(Self::parse_expression);
        let expression = self.alloc(expression);
        self.parse_semicolon();
        Statement::ThrowStatement(ThrowStatement {
            data: self.finish(SyntaxKind::ThrowStatement, pos),
            expression,
        })
    }

    fn parse_try_statement(&mut self) -> Statement<'a> {
        let pos = self.token_pos();
        self.next_token();
        let try_block = self.parse_block();
        let try_block = self.alloc(try_block);

        let catch_clause = if self.token() == SyntaxKind::CatchKeyword {
            let catch_pos = self.token_pos();
            self.next_token();
            let variable_declaration = if self.parse_optional(SyntaxKind::OpenParenToken) {
                let declaration = self.parse_variable_declaration();
                self.parse_expected(SyntaxKind::CloseParenToken);
                Some(self.alloc(declaration))
            } else {
                None
            };
            let block = self.parse_block();
            Some(CatchClause {
                data: self.finish(SyntaxKind::CatchClause, catch_pos),
                variable_declaration,
                block: self.alloc(block),
            })
        } else {
            None
        };

        let finally_block = if catch_clause.is_none() || self.token() == SyntaxKind::FinallyKeyword {
            if self.parse_expected(SyntaxKind::FinallyKeyword) {
                let block = self.parse_block();
                Some(self.alloc(block))
            } else {
                None
            }
        } else {
            None
        };

        Statement::TryStatement(TryStatement {
            data: self.finish(SyntaxKind::TryStatement, pos),
            try_block,
            catch_clause,
            finally_block,
        })
    }

    fn parse_switch_statement(&mut self) -> Statement<'a> {
        let pos = self.token_pos();
        self.next_token();
        let expression = self.parse_parenthesized_condition();

        let block_pos = self.token_pos();
        let mut clauses = Vec::new();
        if self.parse_expected(SyntaxKind::OpenBraceToken) {
            while !matches!(self.token(), SyntaxKind::CloseBraceToken | SyntaxKind::EndOfFileToken) {
                if matches!(self.token(), SyntaxKind::CaseKeyword | SyntaxKind::DefaultKeyword) {
                    clauses.push(self.parse_case_or_default_clause());
                } else {
                    self.error(&messages::CASE_OR_DEFAULT_EXPECTED, &[]);
                    self.next_token();
                }
            }
            self.parse_expected(SyntaxKind::CloseBraceToken);
        }
        let case_block = CaseBlock {
            data: self.finish(SyntaxKind::CaseBlock, block_pos),
            clauses: self.alloc_slice(clauses),
        };

        Statement::SwitchStatement(SwitchStatement {
            data: self.finish(SyntaxKind::SwitchStatement, pos),
            expression,
            case_block,
        })
    }

    fn parse_case_or_default_clause(&mut self) -> CaseOrDefaultClause<'a> {
        let pos = self.token_pos();
        let (kind, expression) = if self.parse_optional(SyntaxKind::CaseKeyword) {
            let expression = self.allow_in(Self::parse_expression);
            (SyntaxKind::CaseClause, Some(self.alloc(expression)))
        } else {
            self.next_token();
            (SyntaxKind::DefaultClause, None)
        };
        self.parse_expected(SyntaxKind::ColonToken);
        let statements = self.parse_list_of_statements(|kind| {
            matches!(
                kind,
                SyntaxKind::CaseKeyword | SyntaxKind::DefaultKeyword | SyntaxKind::CloseBraceToken
            )
        });
        CaseOrDefaultClause {
            data: self.finish(kind, pos),
            expression,
            statements,
        }
    }
}

fn is_declaration_file_name(file_name: &str) -> bool {
    let lower = file_name.to_ascii_lowercase();
    lower.ends_with(".d.ts") || lower.ends_with(".d.mts") || lower.ends_with(".d.cts")
}

/// Await/yield context for a function body.
fn function_context(is_generator: bool, is_async: bool) -> NodeFlags {
    let mut flags = NodeFlags::NONE;
    if is_generator {
        flags |= NodeFlags::YIELD_CONTEXT;
    }
    if is_async {
        flags |= NodeFlags::AWAIT_CONTEXT;
    }
    flags
}

// ============================================================================
// Declarations
// ============================================================================

impl<'a> Parser<'a> {
    fn parse_declaration(&mut self) -> Statement<'a> {
        let pos = self.token_pos();
        let mut decorators = self.parse_decorators();
        let modifiers = self.parse_modifiers();
        if self.token() == SyntaxKind::AtToken {
            decorators.extend(self.parse_decorators());
        }
        let decorators = self.alloc_slice(decorators);

        if modifiers.contains(ModifierFlags::AMBIENT) {
            let saved = self.context_flags;
            self.context_flags |= NodeFlags::AMBIENT;
            let statement = self.parse_declaration_worker(pos, decorators, modifiers);
            self.context_flags = saved;
            statement
        } else {
            self.parse_declaration_worker(pos, decorators, modifiers)
        }
    }

    fn parse_declaration_worker(
        &mut self,
        pos: u32,
        decorators: &'a [Decorator<'a>],
        modifiers: ModifierFlags,
    ) -> Statement<'a> {
        match self.token() {
            SyntaxKind::VarKeyword | SyntaxKind::LetKeyword | SyntaxKind::ConstKeyword => {
                Statement::VariableStatement(self.parse_variable_statement(pos, modifiers))
            }
            SyntaxKind::FunctionKeyword => {
                Statement::FunctionDeclaration(self.parse_function_declaration(pos, modifiers))
            }
            SyntaxKind::ClassKeyword => Statement::ClassDeclaration(self.parse_class_like(
                pos,
                decorators,
                modifiers,
                SyntaxKind::ClassDeclaration,
            )),
            SyntaxKind::InterfaceKeyword => {
                Statement::InterfaceDeclaration(self.parse_interface_declaration(pos, modifiers))
            }
            SyntaxKind::TypeKeyword => {
                Statement::TypeAliasDeclaration(self.parse_type_alias_declaration(pos, modifiers))
            }
            SyntaxKind::EnumKeyword => Statement::EnumDeclaration(self.parse_enum_declaration(pos, modifiers)),
            SyntaxKind::GlobalKeyword | SyntaxKind::ModuleKeyword | SyntaxKind::NamespaceKeyword => {
                Statement::ModuleDeclaration(self.parse_module_declaration(pos, modifiers))
            }
            SyntaxKind::ImportKeyword => self.parse_import_declaration(pos, modifiers),
            SyntaxKind::DefaultKeyword if modifiers.contains(ModifierFlags::EXPORT) => {
                self.next_token();
                let expression = self.allow_in(Self::parse_assignment_expression);
                let expression = self.alloc(expression);
                self.parse_semicolon();
                Statement::ExportAssignment(ExportAssignment {
                    data: self.finish(SyntaxKind::ExportAssignment, pos),
                    is_export_equals: false,
                    expression,
                })
            }
            SyntaxKind::ExportKeyword => {
                self.next_token();
                match self.token() {
                    SyntaxKind::EqualsToken => {
                        self.next_token();
                        let expression = self.allow_in(Self::parse_assignment_expression);
                        let expression = self.alloc(expression);
                        self.parse_semicolon();
                        Statement::ExportAssignment(ExportAssignment {
                            data: self.finish(SyntaxKind::ExportAssignment, pos),
                            is_export_equals: true,
                            expression,
                        })
                    }
                    SyntaxKind::AsKeyword => {
                        // `export as namespace X;` declares a UMD global, which the tree does not model.
                        self.next_token();
                        self.parse_expected(SyntaxKind::NamespaceKeyword);
                        self.parse_identifier();
                        self.parse_semicolon();
                        Statement::MissingDeclaration(self.finish_token(SyntaxKind::MissingDeclaration, pos))
                    }
                    _ => Statement::ExportDeclaration(self.parse_export_declaration(pos, modifiers)),
                }
            }
            _ if modifiers.is_empty() && decorators.is_empty() => self.parse_expression_or_labeled_statement(),
            _ => {
                self.error(&messages::DECLARATION_OR_STATEMENT_EXPECTED, &[]);
                Statement::MissingDeclaration(Token {
                    data: self
                        .finish(SyntaxKind::MissingDeclaration, pos)
                        .with_flags(NodeFlags::THIS_NODE_HAS_ERROR)
                        .with_modifiers(modifiers),
                })
            }
        }
    }

    fn parse_decorators(&mut self) -> Vec<Decorator<'a>> {
        let mut decorators = Vec::new();
        while self.token() == SyntaxKind::AtToken {
            let pos = self.token_pos();
            self.next_token();
            let expression = self.parse_left_hand_side_expression();
            decorators.push(Decorator {
                data: self.finish(SyntaxKind::Decorator, pos),
                expression: self.alloc(expression),
            });
        }
        decorators
    }

    fn parse_modifiers(&mut self) -> ModifierFlags {
        let mut flags = ModifierFlags::NONE;
        loop {
            let kind = self.token();
            if !kind.is_modifier_kind() || !self.next_token_is(|p| p.can_follow_modifier(kind)) {
                return flags;
            }
            self.next_token();
            flags |= ModifierFlags::from_modifier_kind(kind);
        }
    }

    /// Called with the token after `modifier` current.
    fn can_follow_modifier(&mut self, modifier: SyntaxKind) -> bool {
        match modifier {
            SyntaxKind::ConstKeyword => self.token() == SyntaxKind::EnumKeyword,
            SyntaxKind::ExportKeyword => match self.token() {
                SyntaxKind::OpenBraceToken
                | SyntaxKind::AsteriskToken
                | SyntaxKind::EqualsToken
                | SyntaxKind::AsKeyword
                | SyntaxKind::EndOfFileToken => false,
                SyntaxKind::TypeKeyword => !self.next_token_is(|p| {
                    matches!(p.token(), SyntaxKind::OpenBraceToken | SyntaxKind::AsteriskToken)
                }),
                _ => true,
            },
            SyntaxKind::DefaultKeyword => match self.token() {
                SyntaxKind::ClassKeyword
                | SyntaxKind::FunctionKeyword
                | SyntaxKind::InterfaceKeyword
                | SyntaxKind::AbstractKeyword
                | SyntaxKind::AtToken => true,
                SyntaxKind::AsyncKeyword => self.next_token_is(|p| {
                    p.token() == SyntaxKind::FunctionKeyword && !p.has_preceding_line_break()
                }),
                _ => false,
            },
            _ => {
                !self.has_preceding_line_break()
                    && (self.token().is_identifier_or_keyword()
                        || matches!(
                            self.token(),
                            SyntaxKind::OpenBracketToken
                                | SyntaxKind::OpenBraceToken
                                | SyntaxKind::AsteriskToken
                                | SyntaxKind::DotDotDotToken
                                | SyntaxKind::PrivateIdentifier
                                | SyntaxKind::StringLiteral
                                | SyntaxKind::NumericLiteral
                                | SyntaxKind::AtToken
                        ))
            }
        }
    }

    // ========================================================================
    // Variables and bindings
    // ========================================================================

    fn parse_variable_statement(&mut self, pos: u32, modifiers: ModifierFlags) -> VariableStatement<'a> {
        let declaration_list = self.allow_in(Self::parse_variable_declaration_list);
        self.parse_semicolon();
        VariableStatement {
            data: self.finish(SyntaxKind::VariableStatement, pos).with_modifiers(modifiers),
            declaration_list,
        }
    }

    fn parse_variable_declaration_list(&mut self) -> VariableDeclarationList<'a> {
        let pos = self.token_pos();
        let flags = match self.token() {
            SyntaxKind::LetKeyword => NodeFlags::LET,
            SyntaxKind::ConstKeyword => NodeFlags::CONST,
            _ => NodeFlags::NONE,
        };
        self.next_token();

        let mut declarations = Vec::new();
        if !self.is_identifier()
            && !matches!(self.token(), SyntaxKind::OpenBraceToken | SyntaxKind::OpenBracketToken)
        {
            self.error(&messages::VARIABLE_DECLARATION_EXPECTED, &[]);
        } else {
            loop {
                declarations.push(self.parse_variable_declaration());
                if !self.parse_optional(SyntaxKind::CommaToken) {
                    break;
                }
            }
        }
        VariableDeclarationList {
            data: self.finish(SyntaxKind::VariableDeclarationList, pos).with_flags(flags),
            declarations: self.alloc_slice(declarations),
        }
    }

    fn parse_variable_declaration(&mut self) -> VariableDeclaration<'a> {
        let pos = self.token_pos();
        let name = self.parse_binding_name();
        let exclamation_token = matches!(name, BindingName::Identifier(_))
            && self.token() == SyntaxKind::ExclamationToken
            && !self.has_preceding_line_break()
            && self.parse_optional(SyntaxKind::ExclamationToken);
        let type_annotation = self.parse_type_annotation();
        let initializer = self.parse_initializer();
        VariableDeclaration {
            data: self.finish(SyntaxKind::VariableDeclaration, pos),
            name,
            exclamation_token,
            type_annotation,
            initializer,
        }
    }

    fn parse_type_annotation(&mut self) -> Option<&'a TypeNode<'a>> {
        if !self.parse_optional(SyntaxKind::ColonToken) {
            return None;
        }
        let type_node = self.parse_type();
        Some(self.alloc(type_node))
    }

    fn parse_initializer(&mut self) -> Option<&'a Expression<'a>> {
        if !self.parse_optional(SyntaxKind::EqualsToken) {
            return None;
        }
        let expression = self.parse_assignment_expression();
        Some(self.alloc(expression))
    }

    fn parse_binding_name(&mut self) -> BindingName<'a> {
        match self.token() {
            SyntaxKind::OpenBraceToken => {
                let pos = self.token_pos();
                self.next_token();
                let elements = self.parse_delimited_list(SyntaxKind::CloseBraceToken, Self::parse_object_binding_element);
                self.parse_expected(SyntaxKind::CloseBraceToken);
                let pattern = ObjectBindingPattern {
                    data: self.finish(SyntaxKind::ObjectBindingPattern, pos),
                    elements: self.alloc_slice(elements),
                };
                BindingName::ObjectBindingPattern(self.alloc(pattern))
            }
            SyntaxKind::OpenBracketToken => {
                let pos = self.token_pos();
                self.next_token();
                let elements = self.parse_delimited_list(SyntaxKind::CloseBracketToken, Self::parse_array_binding_element);
                self.parse_expected(SyntaxKind::CloseBracketToken);
                let pattern = ArrayBindingPattern {
                    data: self.finish(SyntaxKind::ArrayBindingPattern, pos),
                    elements: self.alloc_slice(elements),
                };
                BindingName::ArrayBindingPattern(self.alloc(pattern))
            }
            _ => BindingName::Identifier(self.parse_identifier()),
        }
    }

    fn parse_object_binding_element(&mut self) -> BindingElement<'a> {
        let pos = self.token_pos();
        let dot_dot_dot_token = self.parse_optional(SyntaxKind::DotDotDotToken);
        let (property_name, name) = if dot_dot_dot_token {
            (None, BindingName::Identifier(self.parse_identifier()))
        } else {
            let property_name = self.parse_property_name();
            if self.parse_optional(SyntaxKind::ColonToken) {
                (Some(property_name), self.parse_binding_name())
            } else {
                match property_name {
                    PropertyName::Identifier(id) => (None, BindingName::Identifier(id)),
                    other => {
                        self.error(&messages::_0_EXPECTED, &[":"]);
                        (Some(other), BindingName::Identifier(self.missing_identifier()))
                    }
                }
            }
        };
        let initializer = self.parse_initializer();
        BindingElement {
            data: self.finish(SyntaxKind::BindingElement, pos),
            dot_dot_dot_token,
            property_name,
            name,
            initializer,
        }
    }

    fn parse_array_binding_element(&mut self) -> ArrayBindingElement<'a> {
        let pos = self.token_pos();
        if self.token() == SyntaxKind::CommaToken {
            return ArrayBindingElement::OmittedExpression(Token::new(SyntaxKind::OmittedExpression, pos, pos));
        }
        let dot_dot_dot_token = self.parse_optional(SyntaxKind::DotDotDotToken);
        let name = self.parse_binding_name();
        let initializer = self.parse_initializer();
        ArrayBindingElement::BindingElement(BindingElement {
            data: self.finish(SyntaxKind::BindingElement, pos),
            dot_dot_dot_token,
            property_name: None,
            name,
            initializer,
        })
    }

    // ========================================================================
    // Functions and signatures
    // ========================================================================

    fn parse_function_declaration(&mut self, pos: u32, modifiers: ModifierFlags) -> FunctionDeclaration<'a> {
        self.parse_expected(SyntaxKind::FunctionKeyword);
        let asterisk_token = self.parse_optional(SyntaxKind::AsteriskToken);
        let name = if self.is_identifier() {
            Some(self.parse_identifier())
        } else {
            if !modifiers.contains(ModifierFlags::DEFAULT) {
                self.error(&messages::IDENTIFIER_EXPECTED, &[]);
            }
            None
        };
        let context = function_context(asterisk_token, modifiers.contains(ModifierFlags::ASYNC));
        let (type_parameters, parameters, return_type) = self.parse_signature(context);
        let body = self.parse_function_body(context);
        FunctionDeclaration {
            data: self.finish(SyntaxKind::FunctionDeclaration, pos).with_modifiers(modifiers),
            asterisk_token,
            name,
            type_parameters,
            parameters,
            return_type,
            body,
        }
    }

    /// Type parameters, parameters and an optional `: T` return type.
    #[allow(clippy::type_complexity)]
    fn parse_signature(
        &mut self,
        context: NodeFlags,
    ) -> (
        Option<&'a [TypeParameterDeclaration<'a>]>,
        &'a [ParameterDeclaration<'a>],
        Option<&'a TypeNode<'a>>,
    ) {
        let type_parameters = self.parse_type_parameters();
        let parameters = self.parse_parameters(context);
        let return_type = if self.parse_optional(SyntaxKind::ColonToken) {
            let type_node = self.parse_type_or_type_predicate();
            Some(self.alloc(type_node))
        } else {
            None
        };
        (type_parameters, parameters, return_type)
    }

    fn parse_parameters(&mut self, context: NodeFlags) -> &'a [ParameterDeclaration<'a>] {
        if !self.parse_expected(SyntaxKind::OpenParenToken) {
            return &[];
        }
        let parameters = self.with_context(context, |p| {
            p.parse_delimited_list(SyntaxKind::CloseParenToken, Self::parse_parameter)
        });
        self.parse_expected(SyntaxKind::CloseParenToken);
        self.alloc_slice(parameters)
    }

    fn parse_parameter(&mut self) -> ParameterDeclaration<'a> {
        let pos = self.token_pos();
        let decorators = self.parse_decorators();
        let decorators = self.alloc_slice(decorators);
        let modifiers = self.parse_modifiers();
        let dot_dot_dot_token = self.parse_optional(SyntaxKind::DotDotDotToken);
        let name = if self.token() == SyntaxKind::ThisKeyword {
            BindingName::Identifier(self.parse_this_or_identifier())
        } else if self.is_identifier()
            || matches!(self.token(), SyntaxKind::OpenBraceToken | SyntaxKind::OpenBracketToken)
        {
            self.parse_binding_name()
        } else {
            self.error(&messages::PARAMETER_DECLARATION_EXPECTED, &[]);
            BindingName::Identifier(self.missing_identifier())
        };
        let question_token = self.parse_optional(SyntaxKind::QuestionToken);
        let type_annotation = self.parse_type_annotation();
        let initializer = self.allow_in(Self::parse_initializer);
        ParameterDeclaration {
            data: self.finish(SyntaxKind::Parameter, pos).with_modifiers(modifiers),
            decorators,
            dot_dot_dot_token,
            name,
            question_token,
            type_annotation,
            initializer,
        }
    }

    fn parse_type_parameters(&mut self) -> Option<&'a [TypeParameterDeclaration<'a>]> {
        if self.token() != SyntaxKind::LessThanToken {
            return None;
        }
        self.next_token();
        let parameters = self.parse_delimited_list(SyntaxKind::GreaterThanToken, Self::parse_type_parameter);
        if parameters.is_empty() {
            self.error(&messages::TYPE_PARAMETER_DECLARATION_EXPECTED, &[]);
        }
        self.parse_expected(SyntaxKind::GreaterThanToken);
        Some(self.alloc_slice(parameters))
    }

    fn parse_type_parameter(&mut self) -> TypeParameterDeclaration<'a> {
        let pos = self.token_pos();
        let mut modifiers = ModifierFlags::NONE;
        // Variance and const modifiers: `const T`, `in T`, `out T`.
        loop {
            let is_modifier = match self.token() {
                SyntaxKind::ConstKeyword | SyntaxKind::InKeyword => self.next_token_is_identifier(),
                SyntaxKind::Identifier if self.scanner.token_value() == "out" => self.next_token_is_identifier(),
                _ => false,
            };
            if !is_modifier {
                break;
            }
            if self.token() == SyntaxKind::ConstKeyword {
                modifiers |= ModifierFlags::CONST;
            }
            self.next_token();
        }
        let name = self.parse_identifier();
        let constraint = if self.parse_optional(SyntaxKind::ExtendsKeyword) {
            let type_node = self.parse_type();
            Some(self.alloc(type_node))
        } else {
            None
        };
        let default = if self.parse_optional(SyntaxKind::EqualsToken) {
            let type_node = self.parse_type();
            Some(self.alloc(type_node))
        } else {
            None
        };
        TypeParameterDeclaration {
            data: self.finish(SyntaxKind::TypeParameter, pos).with_modifiers(modifiers),
            name,
            constraint,
            default,
        }
    }

    /// A `{ ... }` body, or `;` for an overload or ambient signature.
    fn parse_function_body(&mut self, context: NodeFlags) -> Option<&'a Block<'a>> {
        if self.token() == SyntaxKind::OpenBraceToken {
            let block = self.with_context(context, Self::parse_block);
            return Some(self.alloc(block));
        }
        self.parse_semicolon();
        None
    }

    // ========================================================================
    // Classes
    // ========================================================================

    fn parse_class_like(
        &mut self,
        pos: u32,
        decorators: &'a [Decorator<'a>],
        modifiers: ModifierFlags,
        kind: SyntaxKind,
    ) -> ClassDeclaration<'a> {
        self.parse_expected(SyntaxKind::ClassKeyword);
        let name = if self.is_identifier() && self.token() != SyntaxKind::ImplementsKeyword {
            Some(self.parse_identifier())
        } else {
            if kind == SyntaxKind::ClassDeclaration && !modifiers.contains(ModifierFlags::DEFAULT) {
                self.error(&messages::IDENTIFIER_EXPECTED, &[]);
            }
            None
        };
        let type_parameters = self.parse_type_parameters();
        let heritage_clauses = self.parse_heritage_clauses();
        let members = if self.parse_expected(SyntaxKind::OpenBraceToken) {
            let members = self.parse_class_members();
            self.parse_expected(SyntaxKind::CloseBraceToken);
            members
        } else {
            &[]
        };
        ClassDeclaration {
            data: self.finish(kind, pos).with_modifiers(modifiers),
            decorators,
            name,
            type_parameters,
            heritage_clauses,
            members,
        }
    }

    fn parse_heritage_clauses(&mut self) -> &'a [HeritageClause<'a>] {
        let mut clauses = Vec::new();
        while matches!(self.token(), SyntaxKind::ExtendsKeyword | SyntaxKind::ImplementsKeyword) {
            let pos = self.token_pos();
            let token = self.token();
            self.next_token();
            let mut types = Vec::new();
            loop {
                types.push(self.parse_expression_with_type_arguments());
                if !self.parse_optional(SyntaxKind::CommaToken) {
                    break;
                }
            }
            clauses.push(HeritageClause {
                data: self.finish(SyntaxKind::HeritageClause, pos),
                token,
                types: self.alloc_slice(types),
            });
        }
        self.alloc_slice(clauses)
    }

    fn parse_expression_with_type_arguments(&mut self) -> ExpressionWithTypeArguments<'a> {
        let pos = self.token_pos();
        let expression = self.parse_left_hand_side_expression();
        let expression = self.alloc(expression);
        let type_arguments = if self.token() == SyntaxKind::LessThanToken {
            Some(self.parse_type_arguments())
        } else {
            None
        };
        ExpressionWithTypeArguments {
            data: self.finish(SyntaxKind::ExpressionWithTypeArguments, pos),
            expression,
            type_arguments,
        }
    }

    fn parse_class_members(&mut self) -> &'a [ClassElement<'a>] {
        let mut members = Vec::new();
        while !matches!(self.token(), SyntaxKind::CloseBraceToken | SyntaxKind::EndOfFileToken) {
            let start = self.scanner.token_start();
            match self.parse_class_element() {
                Some(member) => members.push(member),
                None => {
                    self.error(&messages::UNEXPECTED_TOKEN_A_CONSTRUCTOR_METHOD_ACCESSOR_OR_PROPERTY_WAS_EXPECTED, &[]);
                    if self.scanner.token_start() == start {
                        self.next_token();
                    }
                }
            }
        }
        self.alloc_slice(members)
    }

    fn is_property_name_start(&self) -> bool {
        self.is_literal_property_name() || self.token() == SyntaxKind::OpenBracketToken
    }

    fn parse_class_element(&mut self) -> Option<ClassElement<'a>> {
        let pos = self.token_pos();
        if self.parse_optional(SyntaxKind::SemicolonToken) {
            return Some(ClassElement::SemicolonClassElement(
                self.finish_token(SyntaxKind::SemicolonClassElement, pos),
            ));
        }

        let decorators = self.parse_decorators();
        let decorators = self.alloc_slice(decorators);
        let modifiers = self.parse_modifiers();

        if modifiers.contains(ModifierFlags::STATIC) && self.token() == SyntaxKind::OpenBraceToken {
            // Static initialization blocks declare nothing.
            self.parse_block();
            return Some(ClassElement::SemicolonClassElement(
                self.finish_token(SyntaxKind::SemicolonClassElement, pos),
            ));
        }

        if matches!(self.token(), SyntaxKind::GetKeyword | SyntaxKind::SetKeyword)
            && self.next_token_is(|p| p.is_property_name_start() && !p.has_preceding_line_break())
        {
            let accessor = self.parse_accessor(pos, decorators, modifiers);
            return Some(if accessor.data.kind == SyntaxKind::GetAccessor {
                ClassElement::GetAccessor(accessor)
            } else {
                ClassElement::SetAccessor(accessor)
            });
        }

        if self.token() == SyntaxKind::ConstructorKeyword
            && self.next_token_is(|p| p.token() == SyntaxKind::OpenParenToken)
        {
            self.next_token();
            let (_, parameters, _) = self.parse_signature(NodeFlags::NONE);
            let body = self.parse_function_body(NodeFlags::NONE);
            return Some(ClassElement::Constructor(ConstructorDeclaration {
                data: self.finish(SyntaxKind::Constructor, pos).with_modifiers(modifiers),
                parameters,
                body,
            }));
        }

        if self.token() == SyntaxKind::OpenBracketToken && self.is_index_signature() {
            let signature = self.parse_index_signature(pos, modifiers);
            self.parse_semicolon();
            return Some(ClassElement::IndexSignature(signature));
        }

        if self.is_property_name_start() || self.token() == SyntaxKind::AsteriskToken {
            return Some(self.parse_method_or_property(pos, decorators, modifiers));
        }
        None
    }

    fn parse_accessor(
        &mut self,
        pos: u32,
        decorators: &'a [Decorator<'a>],
        modifiers: ModifierFlags,
    ) -> AccessorDeclaration<'a> {
        let kind = if self.token() == SyntaxKind::GetKeyword {
            SyntaxKind::GetAccessor
        } else {
            SyntaxKind::SetAccessor
        };
        self.next_token();
        let name = self.parse_property_name();
        let (_, parameters, return_type) = self.parse_signature(NodeFlags::NONE);
        let body = self.parse_function_body(NodeFlags::NONE);
        AccessorDeclaration {
            data: self.finish(kind, pos).with_modifiers(modifiers),
            decorators,
            name,
            parameters,
            return_type,
            body,
        }
    }

    fn parse_method_or_property(
        &mut self,
        pos: u32,
        decorators: &'a [Decorator<'a>],
        modifiers: ModifierFlags,
    ) -> ClassElement<'a> {
        let asterisk_token = self.parse_optional(SyntaxKind::AsteriskToken);
        let name = self.parse_property_name();
        let question_token = self.parse_optional(SyntaxKind::QuestionToken);

        if asterisk_token || matches!(self.token(), SyntaxKind::OpenParenToken | SyntaxKind::LessThanToken) {
            let context = function_context(asterisk_token, modifiers.contains(ModifierFlags::ASYNC));
            let (type_parameters, parameters, return_type) = self.parse_signature(context);
            let body = self.parse_function_body(context);
            return ClassElement::MethodDeclaration(MethodDeclaration {
                data: self.finish(SyntaxKind::MethodDeclaration, pos).with_modifiers(modifiers),
                decorators,
                asterisk_token,
                name,
                question_token,
                type_parameters,
                parameters,
                return_type,
                body,
            });
        }

        let exclamation_token = !question_token && self.parse_optional(SyntaxKind::ExclamationToken);
        let type_annotation = self.parse_type_annotation();
        let initializer = self.with_context(NodeFlags::NONE, |p| p.allow_in(Self::parse_initializer));
        self.parse_semicolon();
        ClassElement::PropertyDeclaration(PropertyDeclaration {
            data: self.finish(SyntaxKind::PropertyDeclaration, pos).with_modifiers(modifiers),
            decorators,
            name,
            question_token,
            exclamation_token,
            type_annotation,
            initializer,
        })
    }

    fn is_index_signature(&mut self) -> bool {
        self.look_ahead(|p| {
            if p.token() != SyntaxKind::OpenBracketToken {
                return false;
            }
            p.next_token();
            if matches!(p.token(), SyntaxKind::DotDotDotToken | SyntaxKind::CloseBracketToken) {
                return true;
            }
            if !p.token().is_identifier_or_keyword() {
                return false;
            }
            p.next_token();
            matches!(p.token(), SyntaxKind::ColonToken | SyntaxKind::CommaToken)
        })
    }

    fn parse_index_signature(&mut self, pos: u32, modifiers: ModifierFlags) -> IndexSignatureDeclaration<'a> {
        self.parse_expected(SyntaxKind::OpenBracketToken);
        let parameters = self.parse_delimited_list(SyntaxKind::CloseBracketToken, Self::parse_parameter);
        self.parse_expected(SyntaxKind::CloseBracketToken);
        let type_annotation = self.parse_type_annotation();
        IndexSignatureDeclaration {
            data: self.finish(SyntaxKind::IndexSignature, pos).with_modifiers(modifiers),
            parameters: self.alloc_slice(parameters),
            type_annotation,
        }
    }

    // ========================================================================
    // Interfaces, type aliases and enums
    // ========================================================================

    fn parse_interface_declaration(&mut self, pos: u32, modifiers: ModifierFlags) -> InterfaceDeclaration<'a> {
        self.parse_expected(SyntaxKind::InterfaceKeyword);
        let name = self.parse_identifier();
        let type_parameters = self.parse_type_parameters();
        let heritage_clauses = self.parse_heritage_clauses();
        let members = self.parse_object_type_members();
        InterfaceDeclaration {
            data: self.finish(SyntaxKind::InterfaceDeclaration, pos).with_modifiers(modifiers),
            name,
            type_parameters,
            heritage_clauses,
            members,
        }
    }

    fn parse_object_type_members(&mut self) -> &'a [TypeElement<'a>] {
        if !self.parse_expected(SyntaxKind::OpenBraceToken) {
            return &[];
        }
        let mut members = Vec::new();
        while !matches!(self.token(), SyntaxKind::CloseBraceToken | SyntaxKind::EndOfFileToken) {
            let start = self.scanner.token_start();
            match self.parse_type_member() {
                Some(member) => members.push(member),
                None => self.error(&messages::PROPERTY_OR_SIGNATURE_EXPECTED, &[]),
            }
            if self.scanner.token_start() == start {
                self.next_token();
            }
        }
        self.parse_expected(SyntaxKind::CloseBraceToken);
        self.alloc_slice(members)
    }

    fn parse_type_member_separator(&mut self) {
        if !self.parse_optional(SyntaxKind::CommaToken) {
            self.parse_semicolon();
        }
    }

    fn parse_type_member(&mut self) -> Option<TypeElement<'a>> {
        let pos = self.token_pos();
        if matches!(self.token(), SyntaxKind::OpenParenToken | SyntaxKind::LessThanToken) {
            let (type_parameters, parameters, return_type) = self.parse_signature(NodeFlags::NONE);
            self.parse_type_member_separator();
            return Some(TypeElement::CallSignature(SignatureDeclaration {
                data: self.finish(SyntaxKind::CallSignature, pos),
                type_parameters,
                parameters,
                return_type,
            }));
        }
        if self.token() == SyntaxKind::NewKeyword
            && self.next_token_is(|p| matches!(p.token(), SyntaxKind::OpenParenToken | SyntaxKind::LessThanToken))
        {
            self.next_token();
            let (type_parameters, parameters, return_type) = self.parse_signature(NodeFlags::NONE);
            self.parse_type_member_separator();
            return Some(TypeElement::ConstructSignature(SignatureDeclaration {
                data: self.finish(SyntaxKind::ConstructSignature, pos),
                type_parameters,
                parameters,
                return_type,
            }));
        }

        let modifiers = self.parse_modifiers();
        if self.token() == SyntaxKind::OpenBracketToken && self.is_index_signature() {
            let signature = self.parse_index_signature(pos, modifiers);
            self.parse_type_member_separator();
            return Some(TypeElement::IndexSignature(signature));
        }
        if matches!(self.token(), SyntaxKind::GetKeyword | SyntaxKind::SetKeyword)
            && self.next_token_is(|p| p.is_property_name_start() && !p.has_preceding_line_break())
        {
            // Accessor signatures are kept as methods.
            self.next_token();
        }
        if !self.is_property_name_start() {
            return None;
        }

        let name = self.parse_property_name();
        let question_token = self.parse_optional(SyntaxKind::QuestionToken);
        let member = if matches!(self.token(), SyntaxKind::OpenParenToken | SyntaxKind::LessThanToken) {
            let (type_parameters, parameters, return_type) = self.parse_signature(NodeFlags::NONE);
            self.parse_type_member_separator();
            TypeElement::MethodSignature(MethodSignature {
                data: self.finish(SyntaxKind::MethodSignature, pos).with_modifiers(modifiers),
                name,
                question_token,
                type_parameters,
                parameters,
                return_type,
            })
        } else {
            let type_annotation = self.parse_type_annotation();
            self.parse_type_member_separator();
            TypeElement::PropertySignature(PropertySignature {
                data: self.finish(SyntaxKind::PropertySignature, pos).with_modifiers(modifiers),
                name,
                question_token,
                type_annotation,
            })
        };
        Some(member)
    }

    fn parse_type_alias_declaration(&mut self, pos: u32, modifiers: ModifierFlags) -> TypeAliasDeclaration<'a> {
        self.parse_expected(SyntaxKind::TypeKeyword);
        let name = self.parse_identifier();
        let type_parameters = self.parse_type_parameters();
        self.parse_expected(SyntaxKind::EqualsToken);
        let type_node = self.parse_type();
        let type_node = self.alloc(type_node);
        self.parse_semicolon();
        TypeAliasDeclaration {
            data: self.finish(SyntaxKind::TypeAliasDeclaration, pos).with_modifiers(modifiers),
            name,
            type_parameters,
            type_node,
        }
    }

    fn parse_enum_declaration(&mut self, pos: u32, modifiers: ModifierFlags) -> EnumDeclaration<'a> {
        self.parse_expected(SyntaxKind::EnumKeyword);
        let name = self.parse_identifier();
        let members = if self.parse_expected(SyntaxKind::OpenBraceToken) {
            let members = self.parse_delimited_list(SyntaxKind::CloseBraceToken, Self::parse_enum_member);
            self.parse_expected(SyntaxKind::CloseBraceToken);
            members
        } else {
            Vec::new()
        };
        EnumDeclaration {
            data: self.finish(SyntaxKind::EnumDeclaration, pos).with_modifiers(modifiers),
            name,
            members: self.alloc_slice(members),
        }
    }

    fn parse_enum_member(&mut self) -> EnumMember<'a> {
        let pos = self.token_pos();
        if !self.is_property_name_start() {
            self.error(&messages::ENUM_MEMBER_EXPECTED, &[]);
        }
        let name = self.parse_property_name();
        let initializer = self.allow_in(Self::parse_initializer);
        EnumMember {
            data: self.finish(SyntaxKind::EnumMember, pos),
            name,
            initializer,
        }
    }

    // ========================================================================
    // Namespaces and modules
    // ========================================================================

    fn parse_module_declaration(&mut self, pos: u32, modifiers: ModifierFlags) -> ModuleDeclaration<'a> {
        match self.token() {
            SyntaxKind::GlobalKeyword => {
                let name = ModuleName::Identifier(self.parse_identifier_name());
                let body = self.parse_optional_module_block();
                ModuleDeclaration {
                    data: self
                        .finish(SyntaxKind::ModuleDeclaration, pos)
                        .with_flags(NodeFlags::GLOBAL_AUGMENTATION)
                        .with_modifiers(modifiers),
                    name,
                    body,
                }
            }
            SyntaxKind::ModuleKeyword if self.next_token_is(|p| p.token() == SyntaxKind::StringLiteral) => {
                self.next_token();
                let name = ModuleName::StringLiteral(self.parse_string_literal());
                let body = self.parse_optional_module_block();
                ModuleDeclaration {
                    data: self.finish(SyntaxKind::ModuleDeclaration, pos).with_modifiers(modifiers),
                    name,
                    body,
                }
            }
            keyword => {
                self.next_token();
                let flags = if keyword == SyntaxKind::NamespaceKeyword {
                    NodeFlags::NAMESPACE
                } else {
                    NodeFlags::NONE
                };
                let outer_name = self.parse_identifier();
                let mut inner_names = Vec::new();
                while self.parse_optional(SyntaxKind::DotToken) {
                    inner_names.push(self.parse_identifier());
                }
                let block = self.parse_module_block();

                // `namespace A.B.C {}` nests as A { B { C {} } }, built from the inside out.
                let mut body = ModuleBody::ModuleBlock(block);
                while let Some(name) = inner_names.pop() {
                    let declaration = ModuleDeclaration {
                        data: self
                            .finish(SyntaxKind::ModuleDeclaration, name.data.range.pos)
                            .with_flags(flags)
                            .with_modifiers(ModifierFlags::EXPORT),
                        name: ModuleName::Identifier(name),
                        body: Some(body),
                    };
                    body = ModuleBody::ModuleDeclaration(self.alloc(declaration));
                }
                ModuleDeclaration {
                    data: self
                        .finish(SyntaxKind::ModuleDeclaration, pos)
                        .with_flags(flags)
                        .with_modifiers(modifiers),
                    name: ModuleName::Identifier(outer_name),
                    body: Some(body),
                }
            }
        }
    }

    fn parse_optional_module_block(&mut self) -> Option<ModuleBody<'a>> {
        if self.token() == SyntaxKind::OpenBraceToken {
            Some(ModuleBody::ModuleBlock(self.parse_module_block()))
        } else {
            self.parse_semicolon();
            None
        }
    }

    fn parse_module_block(&mut self) -> &'a ModuleBlock<'a> {
        let pos = self.token_pos();
        let statements = if self.parse_expected(SyntaxKind::OpenBraceToken) {
            let statements = self.parse_list_of_statements(|kind| kind == SyntaxKind::CloseBraceToken);
            self.parse_expected(SyntaxKind::CloseBraceToken);
            statements
        } else {
            &[]
        };
        let block = ModuleBlock {
            data: self.finish(SyntaxKind::ModuleBlock, pos),
            statements,
        };
        self.alloc(block)
    }

    // ========================================================================
    // Imports and exports
    // ========================================================================

    fn parse_import_declaration(&mut self, pos: u32, modifiers: ModifierFlags) -> Statement<'a> {
        self.parse_expected(SyntaxKind::ImportKeyword);

        if self.token() == SyntaxKind::StringLiteral {
            let module_specifier = self.parse_module_specifier();
            self.skip_import_attributes();
            self.parse_semicolon();
            return Statement::ImportDeclaration(ImportDeclaration {
                data: self.finish(SyntaxKind::ImportDeclaration, pos).with_modifiers(modifiers),
                import_clause: None,
                module_specifier,
            });
        }

        let clause_pos = self.token_pos();
        let is_type_only = self.token() == SyntaxKind::TypeKeyword
            && self.next_token_is(|p| {
                matches!(p.token(), SyntaxKind::OpenBraceToken | SyntaxKind::AsteriskToken)
                    || (p.is_identifier() && p.token() != SyntaxKind::FromKeyword)
            })
            && self.parse_optional(SyntaxKind::TypeKeyword);

        let name = if self.is_identifier() && self.token() != SyntaxKind::FromKeyword {
            Some(self.parse_identifier())
        } else if self.token() == SyntaxKind::FromKeyword
            && self.next_token_is(|p| p.token() == SyntaxKind::FromKeyword)
        {
            Some(self.parse_identifier())
        } else {
            None
        };

        if self.token() == SyntaxKind::EqualsToken {
            if let Some(name) = name {
                return self.parse_import_equals_declaration(pos, modifiers, clause_pos, is_type_only, name);
            }
        }

        let named_bindings = if name.is_none() || self.parse_optional(SyntaxKind::CommaToken) {
            self.parse_named_import_bindings()
        } else {
            None
        };
        let import_clause = ImportClause {
            data: self.finish(SyntaxKind::ImportClause, clause_pos),
            is_type_only,
            name,
            named_bindings,
        };

        self.parse_expected(SyntaxKind::FromKeyword);
        let module_specifier = self.parse_module_specifier();
        self.skip_import_attributes();
        self.parse_semicolon();
        Statement::ImportDeclaration(ImportDeclaration {
            data: self.finish(SyntaxKind::ImportDeclaration, pos).with_modifiers(modifiers),
            import_clause: Some(import_clause),
            module_specifier,
        })
    }

    /// `import x = require("m")` and `import x = A.B`, kept as an import of
    /// `x` whose specifier is the required string or the aliased entity.
    fn parse_import_equals_declaration(
        &mut self,
        pos: u32,
        modifiers: ModifierFlags,
        clause_pos: u32,
        is_type_only: bool,
        name: Identifier<'a>,
    ) -> Statement<'a> {
        self.parse_expected(SyntaxKind::EqualsToken);
        let import_clause = ImportClause {
            data: self.finish(SyntaxKind::ImportClause, clause_pos),
            is_type_only,
            name: Some(name),
            named_bindings: None,
        };
        let module_specifier = if self.token() == SyntaxKind::RequireKeyword
            && self.next_token_is(|p| p.token() == SyntaxKind::OpenParenToken)
        {
            self.next_token();
            self.next_token();
            let specifier = self.parse_module_specifier();
            self.parse_expected(SyntaxKind::CloseParenToken);
            specifier
        } else {
            let expression = self.parse_left_hand_side_expression();
            self.alloc(expression)
        };
        self.parse_semicolon();
        Statement::ImportDeclaration(ImportDeclaration {
            data: self.finish(SyntaxKind::ImportDeclaration, pos).with_modifiers(modifiers),
            import_clause: Some(import_clause),
            module_specifier,
        })
    }

    fn parse_named_import_bindings(&mut self) -> Option<NamedImportBindings<'a>> {
        let pos = self.token_pos();
        match self.token() {
            SyntaxKind::AsteriskToken => {
                self.next_token();
                self.parse_expected(SyntaxKind::AsKeyword);
                let name = self.parse_identifier();
                Some(NamedImportBindings::NamespaceImport(NamespaceImport {
                    data: self.finish(SyntaxKind::NamespaceImport, pos),
                    name,
                }))
            }
            SyntaxKind::OpenBraceToken => {
                self.next_token();
                let elements = self.parse_delimited_list(SyntaxKind::CloseBraceToken, |p| {
                    let (data, is_type_only, property_name, name) =
                        p.parse_import_or_export_specifier(SyntaxKind::ImportSpecifier);
                    ImportSpecifier {
                        data,
                        is_type_only,
                        property_name,
                        name,
                    }
                });
                self.parse_expected(SyntaxKind::CloseBraceToken);
                Some(NamedImportBindings::NamedImports(NamedImports {
                    data: self.finish(SyntaxKind::NamedImports, pos),
                    elements: self.alloc_slice(elements),
                }))
            }
            _ => {
                self.error(&messages::_0_EXPECTED, &["{"]);
                None
            }
        }
    }

    fn parse_import_or_export_specifier(
        &mut self,
        kind: SyntaxKind,
    ) -> (NodeData, bool, Option<Identifier<'a>>, Identifier<'a>) {
        let pos = self.token_pos();
        let is_type_only = self.token() == SyntaxKind::TypeKeyword
            && self.next_token_is(|p| {
                (p.token().is_identifier_or_keyword() && p.token() != SyntaxKind::AsKeyword)
                    || p.token() == SyntaxKind::StringLiteral
            })
            && self.parse_optional(SyntaxKind::TypeKeyword);
        let first = self.parse_module_export_name();
        let (property_name, name) = if self.parse_optional(SyntaxKind::AsKeyword) {
            (Some(first), self.parse_module_export_name())
        } else {
            (None, first)
        };
        (self.finish(kind, pos), is_type_only, property_name, name)
    }

    /// An identifier name, or a string literal used as a name.
    fn parse_module_export_name(&mut self) -> Identifier<'a> {
        if self.token() == SyntaxKind::StringLiteral {
            let literal = self.parse_string_literal();
            return Identifier {
                data: NodeData::new(SyntaxKind::Identifier, literal.data.range.pos, literal.data.range.end),
                text: literal.text,
                original_keyword_kind: None,
            };
        }
        self.parse_identifier_name()
    }

    fn parse_module_specifier(&mut self) -> &'a Expression<'a> {
        let expression = if self.token() == SyntaxKind::StringLiteral {
            Expression::StringLiteral(self.parse_string_literal())
        } else {
            self.error(&messages::STRING_LITERAL_EXPECTED, &[]);
            self.missing_expression()
        };
        self.alloc(expression)
    }

    /// Skip `with { type: "json" }` (or the older `assert { ... }`).
    fn skip_import_attributes(&mut self) {
        let is_attributes = (self.token() == SyntaxKind::WithKeyword
            || (self.token() == SyntaxKind::Identifier && self.scanner.token_value() == "assert"))
            && !self.has_preceding_line_break();
        if !is_attributes {
            return;
        }
        self.next_token();
        if !self.parse_expected(SyntaxKind::OpenBraceToken) {
            return;
        }
        while !matches!(self.token(), SyntaxKind::CloseBraceToken | SyntaxKind::EndOfFileToken) {
            self.next_token();
        }
        self.parse_expected(SyntaxKind::CloseBraceToken);
    }

    /// Everything after `export` in `export { ... }` and `export * from "m"`.
    fn parse_export_declaration(&mut self, pos: u32, modifiers: ModifierFlags) -> ExportDeclaration<'a> {
        let is_type_only = self.token() == SyntaxKind::TypeKeyword
            && self.next_token_is(|p| matches!(p.token(), SyntaxKind::OpenBraceToken | SyntaxKind::AsteriskToken))
            && self.parse_optional(SyntaxKind::TypeKeyword);

        let clause_pos = self.token_pos();
        let (export_clause, requires_from) = match self.token() {
            SyntaxKind::AsteriskToken => {
                self.next_token();
                let clause = if self.parse_optional(SyntaxKind::AsKeyword) {
                    let name = self.parse_module_export_name();
                    Some(NamedExportBindings::NamespaceExport(NamespaceExport {
                        data: self.finish(SyntaxKind::NamespaceExport, clause_pos),
                        name,
                    }))
                } else {
                    None
                };
                (clause, true)
            }
            SyntaxKind::OpenBraceToken => {
                self.next_token();
                let elements = self.parse_delimited_list(SyntaxKind::CloseBraceToken, |p| {
                    let (data, is_type_only, property_name, name) =
                        p.parse_import_or_export_specifier(SyntaxKind::ExportSpecifier);
                    ExportSpecifier {
                        data,
                        is_type_only,
                        property_name,
                        name,
                    }
                });
                self.parse_expected(SyntaxKind::CloseBraceToken);
                let clause = NamedExportBindings::NamedExports(NamedExports {
                    data: self.finish(SyntaxKind::NamedExports, clause_pos),
                    elements: self.alloc_slice(elements),
                });
                (Some(clause), false)
            }
            _ => {
                self.error(&messages::DECLARATION_OR_STATEMENT_EXPECTED, &[]);
                (None, false)
            }
        };

        let module_specifier = if self.parse_optional(SyntaxKind::FromKeyword) {
            Some(self.parse_module_specifier())
        } else {
            if requires_from {
                self.parse_expected(SyntaxKind::FromKeyword);
            }
            None
        };
        self.skip_import_attributes();
        self.parse_semicolon();
        ExportDeclaration {
            data: self.finish(SyntaxKind::ExportDeclaration, pos).with_modifiers(modifiers),
            is_type_only,
            export_clause,
            module_specifier,
        }
    }
}

// ============================================================================
// Expressions
// ============================================================================

impl<'a> Parser<'a> {
    fn parse_operator_token(&mut self) -> Token {
        let token = Token::new(self.token(), self.token_pos(), self.token_end());
        self.next_token();
        token
    }

    fn parse_expression(&mut self) -> Expression<'a> {
        let pos = self.token_pos();
        let mut expression = self.parse_assignment_expression();
        while self.token() == SyntaxKind::CommaToken {
            let operator_token = self.parse_operator_token();
            let right = self.parse_assignment_expression();
            expression = Expression::BinaryExpression(BinaryExpression {
                data: self.finish(SyntaxKind::BinaryExpression, pos),
                left: self.alloc(expression),
                operator_token,
                right: self.alloc(right),
            });
        }
        expression
    }

    fn parse_assignment_expression(&mut self) -> Expression<'a> {
        self.guarded(Self::missing_expression, Self::parse_assignment_expression_worker)
    }

    fn parse_assignment_expression_worker(&mut self) -> Expression<'a> {
        if self.token() == SyntaxKind::YieldKeyword && self.context_flags.contains(NodeFlags::YIELD_CONTEXT) {
            return self.parse_yield_expression();
        }
        if let Some(arrow) = self.try_parse_arrow_function() {
            return arrow;
        }

        let pos = self.token_pos();
        let expression = self.parse_binary_expression(OperatorPrecedence::Lowest);
        if self.token().is_assignment_operator() {
            let operator_token = self.parse_operator_token();
            let right = self.parse_assignment_expression();
            return Expression::BinaryExpression(BinaryExpression {
                data: self.finish(SyntaxKind::BinaryExpression, pos),
                left: self.alloc(expression),
                operator_token,
                right: self.alloc(right),
            });
        }
        self.parse_conditional_expression_rest(pos, expression)
    }

    fn parse_conditional_expression_rest(&mut self, pos: u32, condition: Expression<'a>) -> Expression<'a> {
        if !self.parse_optional(SyntaxKind::QuestionToken) {
            return condition;
        }
        let when_true = self.allow_in(Self::parse_assignment_expression);
        self.parse_expected(SyntaxKind::ColonToken);
        let when_false = self.parse_assignment_expression();
        Expression::ConditionalExpression(ConditionalExpression {
            data: self.finish(SyntaxKind::ConditionalExpression, pos),
            condition: self.alloc(condition),
            when_true: self.alloc(when_true),
            when_false: self.alloc(when_false),
        })
    }

    fn parse_yield_expression(&mut self) -> Expression<'a> {
        let pos = self.token_pos();
        self.next_token();
        let (asterisk_token, expression) = if !self.has_preceding_line_break()
            && (self.token() == SyntaxKind::AsteriskToken || can_start_expression(self.token()))
        {
            let asterisk_token = self.parse_optional(SyntaxKind::AsteriskToken);
            let expression = self.parse_assignment_expression();
            (asterisk_token, Some(self.alloc(expression)))
        } else {
            (false, None)
        };
        Expression::YieldExpression(YieldExpression {
            data: self.finish(SyntaxKind::YieldExpression, pos),
            asterisk_token,
            expression,
        })
    }

    // ========================================================================
    // Arrow functions
    // ========================================================================

    fn try_parse_arrow_function(&mut self) -> Option<Expression<'a>> {
        let pos = self.token_pos();
        let head = match self.token() {
            SyntaxKind::OpenParenToken | SyntaxKind::LessThanToken => {
                self.try_parse_parenthesized_arrow_head(pos, ModifierFlags::NONE)?
            }
            SyntaxKind::AsyncKeyword
                if self.next_token_is(|p| {
                    !p.has_preceding_line_break()
                        && matches!(p.token(), SyntaxKind::OpenParenToken | SyntaxKind::LessThanToken)
                }) =>
            {
                // `async (x)` may also be a call to a function named `async`.
                self.try_parse(|p| {
                    p.next_token();
                    p.try_parse_parenthesized_arrow_head(pos, ModifierFlags::ASYNC)
                })?
            }
            SyntaxKind::AsyncKeyword
                if self.next_token_is(|p| {
                    !p.has_preceding_line_break()
                        && p.is_identifier()
                        && p.next_token_is(|q| q.token() == SyntaxKind::EqualsGreaterThanToken)
                }) =>
            {
                self.next_token();
                self.parse_simple_arrow_head(pos, ModifierFlags::ASYNC)
            }
            _ if self.is_identifier()
                && self.next_token_is(|p| {
                    p.token() == SyntaxKind::EqualsGreaterThanToken && !p.has_preceding_line_break()
                }) =>
            {
                self.parse_simple_arrow_head(pos, ModifierFlags::NONE)
            }
            _ => return None,
        };
        Some(self.parse_arrow_function_body(head))
    }

    /// Whether the tokens at `(` or `<` could begin an arrow parameter list.
    fn can_be_arrow_head(&mut self) -> bool {
        self.look_ahead(|p| {
            let first = p.token();
            p.next_token();
            match first {
                SyntaxKind::OpenParenToken => {
                    matches!(
                        p.token(),
                        SyntaxKind::CloseParenToken
                            | SyntaxKind::DotDotDotToken
                            | SyntaxKind::OpenBraceToken
                            | SyntaxKind::OpenBracketToken
                            | SyntaxKind::ThisKeyword
                            | SyntaxKind::AtToken
                    ) || p.is_identifier()
                }
                SyntaxKind::LessThanToken => p.is_identifier() || p.token() == SyntaxKind::ConstKeyword,
                _ => false,
            }
        })
    }

    fn try_parse_parenthesized_arrow_head(&mut self, pos: u32, modifiers: ModifierFlags) -> Option<ArrowHead<'a>> {
        let start = self.token_pos();
        if self.not_arrow_at.contains(&start) || !self.can_be_arrow_head() {
            return None;
        }
        let head = self.try_parse_clean(|p| p.parse_parenthesized_arrow_head(pos, modifiers));
        if head.is_none() {
            self.not_arrow_at.insert(start);
        }
        head
    }

    fn parse_parenthesized_arrow_head(&mut self, pos: u32, modifiers: ModifierFlags) -> Option<ArrowHead<'a>> {
        let context = function_context(false, modifiers.contains(ModifierFlags::ASYNC));
        let type_parameters = self.parse_type_parameters();
        if self.token() != SyntaxKind::OpenParenToken {
            return None;
        }
        let parameters = self.parse_parameters(context);
        let return_type = if self.parse_optional(SyntaxKind::ColonToken) {
            let type_node = self.parse_type_or_type_predicate();
            Some(self.alloc(type_node))
        } else {
            None
        };
        if self.token() != SyntaxKind::EqualsGreaterThanToken || self.has_preceding_line_break() {
            return None;
        }
        Some(ArrowHead {
            pos,
            modifiers,
            type_parameters,
            parameters,
            return_type,
        })
    }

    /// `x => ...`
    fn parse_simple_arrow_head(&mut self, pos: u32, modifiers: ModifierFlags) -> ArrowHead<'a> {
        let parameter_pos = self.token_pos();
        let name = self.parse_identifier();
        let parameter = ParameterDeclaration {
            data: self.finish(SyntaxKind::Parameter, parameter_pos),
            decorators: &[],
            dot_dot_dot_token: false,
            name: BindingName::Identifier(name),
            question_token: false,
            type_annotation: None,
            initializer: None,
        };
        ArrowHead {
            pos,
            modifiers,
            type_parameters: None,
            parameters: self.alloc_slice(vec![parameter]),
            return_type: None,
        }
    }

    fn parse_arrow_function_body(&mut self, head: ArrowHead<'a>) -> Expression<'a> {
        self.parse_expected(SyntaxKind::EqualsGreaterThanToken);
        let context = function_context(false, head.modifiers.contains(ModifierFlags::ASYNC));
        let body = if self.token() == SyntaxKind::OpenBraceToken {
            let block = self.with_context(context, Self::parse_block);
            ConciseBody::Block(self.alloc(block))
        } else {
            let expression = self.with_context(context, Self::parse_assignment_expression);
            ConciseBody::Expression(self.alloc(expression))
        };
        Expression::ArrowFunction(ArrowFunction {
            data: self.finish(SyntaxKind::ArrowFunction, head.pos).with_modifiers(head.modifiers),
            type_parameters: head.type_parameters,
            parameters: head.parameters,
            return_type: head.return_type,
            body,
        })
    }

    // ========================================================================
    // Binary and unary operators
    // ========================================================================

    fn parse_binary_expression(&mut self, min_precedence: OperatorPrecedence) -> Expression<'a> {
        let pos = self.token_pos();
        let mut left = self.parse_unary_expression();
        loop {
            let kind = self.scanner.rescan_greater_than_token();
            let precedence = get_binary_operator_precedence(kind);
            if precedence == OperatorPrecedence::Invalid {
                break;
            }
            // `**` is right-associative; everything else binds to the left.
            let binds = if kind == SyntaxKind::AsteriskAsteriskToken {
                precedence >= min_precedence
            } else {
                precedence > min_precedence
            };
            if !binds || (kind == SyntaxKind::InKeyword && self.disallow_in) {
                break;
            }

            if matches!(kind, SyntaxKind::AsKeyword | SyntaxKind::SatisfiesKeyword) {
                if self.has_preceding_line_break() {
                    break;
                }
                self.next_token();
                let type_node = self.parse_type();
                let node_kind = if kind == SyntaxKind::AsKeyword {
                    SyntaxKind::AsExpression
                } else {
                    SyntaxKind::SatisfiesExpression
                };
                let assertion = AssertionExpression {
                    data: self.finish(node_kind, pos),
                    expression: self.alloc(left),
                    type_node: self.alloc(type_node),
                };
                left = if kind == SyntaxKind::AsKeyword {
                    Expression::AsExpression(assertion)
                } else {
                    Expression::SatisfiesExpression(assertion)
                };
                continue;
            }

            let operator_token = self.parse_operator_token();
            let right = if kind == SyntaxKind::AsteriskAsteriskToken {
                self.guarded(Self::missing_expression, |p| p.parse_binary_expression(precedence))
            } else {
                self.parse_binary_expression(precedence)
            };
            left = Expression::BinaryExpression(BinaryExpression {
                data: self.finish(SyntaxKind::BinaryExpression, pos),
                left: self.alloc(left),
                operator_token,
                right: self.alloc(right),
            });
        }
        left
    }

    fn is_await_expression(&mut self) -> bool {
        if self.token() != SyntaxKind::AwaitKeyword {
            return false;
        }
        if self.context_flags.contains(NodeFlags::AWAIT_CONTEXT) {
            return true;
        }
        // Top-level await: `await` followed by an operand on the same line.
        self.next_token_is(|p| {
            !p.has_preceding_line_break()
                && (p.token().is_identifier_or_keyword()
                    || p.token().is_literal()
                    || p.token() == SyntaxKind::TemplateHead)
        })
    }

    fn parse_unary_expression(&mut self) -> Expression<'a> {
        // Prefix operators are stacked so long chains like `!!!!x` do not recurse.
        let mut prefixes: Vec<(u32, SyntaxKind)> = Vec::new();
        loop {
            let kind = self.token();
            let is_prefix = match kind {
                SyntaxKind::PlusToken
                | SyntaxKind::MinusToken
                | SyntaxKind::TildeToken
                | SyntaxKind::ExclamationToken
                | SyntaxKind::PlusPlusToken
                | SyntaxKind::MinusMinusToken
                | SyntaxKind::DeleteKeyword
                | SyntaxKind::TypeOfKeyword
                | SyntaxKind::VoidKeyword => true,
                SyntaxKind::AwaitKeyword => self.is_await_expression(),
                _ => false,
            };
            if !is_prefix {
                break;
            }
            prefixes.push((self.token_pos(), kind));
            self.next_token();
        }

        let mut expression = self.parse_postfix_expression();
        while let Some((pos, kind)) = prefixes.pop() {
            let operand = self.alloc(expression);
            expression = match kind {
                SyntaxKind::DeleteKeyword => Expression::DeleteExpression(WrappedExpression {
                    data: self.finish(SyntaxKind::DeleteExpression, pos),
                    expression: operand,
                }),
                SyntaxKind::TypeOfKeyword => Expression::TypeOfExpression(WrappedExpression {
                    data: self.finish(SyntaxKind::TypeOfExpression, pos),
                    expression: operand,
                }),
                SyntaxKind::VoidKeyword => Expression::VoidExpression(WrappedExpression {
                    data: self.finish(SyntaxKind::VoidExpression, pos),
                    expression: operand,
                }),
                SyntaxKind::AwaitKeyword => Expression::AwaitExpression(WrappedExpression {
                    data: self.finish(SyntaxKind::AwaitExpression, pos),
                    expression: operand,
                }),
                operator => Expression::PrefixUnaryExpression(PrefixUnaryExpression {
                    data: self.finish(SyntaxKind::PrefixUnaryExpression, pos),
                    operator,
                    operand,
                }),
            };
        }
        expression
    }

    fn parse_postfix_expression(&mut self) -> Expression<'a> {
        let pos = self.token_pos();
        let expression = self.parse_left_hand_side_expression();
        let operator = self.token();
        if matches!(operator, SyntaxKind::PlusPlusToken | SyntaxKind::MinusMinusToken)
            && !self.has_preceding_line_break()
        {
            self.next_token();
            return Expression::PostfixUnaryExpression(PostfixUnaryExpression {
                data: self.finish(SyntaxKind::PostfixUnaryExpression, pos),
                operand: self.alloc(expression),
                operator,
            });
        }
        expression
    }

    // ========================================================================
    // Member access and calls
    // ========================================================================

    fn parse_left_hand_side_expression(&mut self) -> Expression<'a> {
        let pos = self.token_pos();
        let expression = self.parse_primary_expression();
        self.parse_member_chain(pos, expression, true)
    }

    /// Property and element accesses, non-null assertions, tagged templates
    /// and, when `allow_calls` is set, call expressions.
    fn parse_member_chain(&mut self, pos: u32, expression: Expression<'a>, allow_calls: bool) -> Expression<'a> {
        let mut expression = expression;
        let mut chain_flags = NodeFlags::NONE;
        loop {
            match self.token() {
                SyntaxKind::DotToken => {
                    self.next_token();
                    expression = self.finish_property_access(pos, expression, false, chain_flags);
                }
                SyntaxKind::QuestionDotToken => {
                    self.next_token();
                    chain_flags = NodeFlags::OPTIONAL_CHAIN;
                    expression = match self.token() {
                        SyntaxKind::OpenParenToken => self.finish_call(pos, expression, true, None, chain_flags),
                        SyntaxKind::LessThanToken => {
                            let type_arguments = self.parse_type_arguments();
                            self.finish_call(pos, expression, true, Some(type_arguments), chain_flags)
                        }
                        SyntaxKind::OpenBracketToken => self.finish_element_access(pos, expression, true, chain_flags),
                        _ => self.finish_property_access(pos, expression, true, chain_flags),
                    };
                }
                SyntaxKind::ExclamationToken if !self.has_preceding_line_break() => {
                    self.next_token();
                    expression = Expression::NonNullExpression(WrappedExpression {
                        data: self.finish(SyntaxKind::NonNullExpression, pos).with_flags(chain_flags),
                        expression: self.alloc(expression),
                    });
                }
                SyntaxKind::OpenBracketToken => {
                    expression = self.finish_element_access(pos, expression, false, chain_flags);
                }
                SyntaxKind::NoSubstitutionTemplateLiteral | SyntaxKind::TemplateHead => {
                    expression = self.finish_tagged_template(pos, expression, None);
                }
                SyntaxKind::LessThanToken if allow_calls => {
                    let Some(type_arguments) = self.try_parse_type_arguments_in_expression() else {
                        break;
                    };
                    expression = if self.token() == SyntaxKind::OpenParenToken {
                        self.finish_call(pos, expression, false, Some(type_arguments), chain_flags)
                    } else {
                        self.finish_tagged_template(pos, expression, Some(type_arguments))
                    };
                }
                SyntaxKind::OpenParenToken if allow_calls => {
                    expression = self.finish_call(pos, expression, false, None, chain_flags);
                }
                _ => break,
            }
        }
        expression
    }

    fn finish_property_access(
        &mut self,
        pos: u32,
        expression: Expression<'a>,
        question_dot_token: bool,
        flags: NodeFlags,
    ) -> Expression<'a> {
        let name = if self.token() == SyntaxKind::PrivateIdentifier {
            self.parse_private_identifier()
        } else {
            self.parse_identifier_name()
        };
        Expression::PropertyAccessExpression(PropertyAccessExpression {
            data: self.finish(SyntaxKind::PropertyAccessExpression, pos).with_flags(flags),
            expression: self.alloc(expression),
            question_dot_token,
            name,
        })
    }

    fn finish_element_access(
        &mut self,
        pos: u32,
        expression: Expression<'a>,
        question_dot_token: bool,
        flags: NodeFlags,
    ) -> Expression<'a> {
        self.parse_expected(SyntaxKind::OpenBracketToken);
        let argument_expression = if self.token() == SyntaxKind::CloseBracketToken {
            self.error(&messages::EXPRESSION_EXPECTED, &[]);
            self.missing_expression()
        } else {
            self.allow_in(Self::parse_expression)
        };
        self.parse_expected(SyntaxKind::CloseBracketToken);
        Expression::ElementAccessExpression(ElementAccessExpression {
            data: self.finish(SyntaxKind::ElementAccessExpression, pos).with_flags(flags),
            expression: self.alloc(expression),
            question_dot_token,
            argument_expression: self.alloc(argument_expression),
        })
    }

    fn finish_call(
        &mut self,
        pos: u32,
        expression: Expression<'a>,
        question_dot_token: bool,
        type_arguments: Option<&'a [TypeNode<'a>]>,
        flags: NodeFlags,
    ) -> Expression<'a> {
        let arguments = self.parse_arguments();
        Expression::CallExpression(CallExpression {
            data: self.finish(SyntaxKind::CallExpression, pos).with_flags(flags),
            expression: self.alloc(expression),
            question_dot_token,
            type_arguments,
            arguments,
        })
    }

    fn finish_tagged_template(
        &mut self,
        pos: u32,
        tag: Expression<'a>,
        type_arguments: Option<&'a [TypeNode<'a>]>,
    ) -> Expression<'a> {
        let template = self.parse_template_expression();
        Expression::TaggedTemplateExpression(TaggedTemplateExpression {
            data: self.finish(SyntaxKind::TaggedTemplateExpression, pos),
            tag: self.alloc(tag),
            type_arguments,
            template: self.alloc(template),
        })
    }

    /// `f<T>(x)` or ``f<T>`x` ``; anything else leaves `<` to be parsed as an operator.
    fn try_parse_type_arguments_in_expression(&mut self) -> Option<&'a [TypeNode<'a>]> {
        self.try_parse_clean(|p| {
            p.next_token();
            let arguments = p.parse_delimited_list(SyntaxKind::GreaterThanToken, Self::parse_type);
            if p.token() != SyntaxKind::GreaterThanToken {
                return None;
            }
            p.next_token();
            let followed_by_call = matches!(
                p.token(),
                SyntaxKind::OpenParenToken | SyntaxKind::NoSubstitutionTemplateLiteral | SyntaxKind::TemplateHead
            );
            followed_by_call.then(|| p.alloc_slice(arguments))
        })
    }

    fn parse_arguments(&mut self) -> &'a [Expression<'a>] {
        if !self.parse_expected(SyntaxKind::OpenParenToken) {
            return &[];
        }
        let arguments = self.allow_in(|p| p.parse_delimited_list(SyntaxKind::CloseParenToken, Self::parse_argument));
        self.parse_expected(SyntaxKind::CloseParenToken);
        self.alloc_slice(arguments)
    }

    fn parse_argument(&mut self) -> Expression<'a> {
        if self.token() == SyntaxKind::DotDotDotToken {
            return self.parse_spread_element();
        }
        if !can_start_expression(self.token()) {
            self.error(&messages::ARGUMENT_EXPRESSION_EXPECTED, &[]);
            return self.missing_expression();
        }
        self.parse_assignment_expression()
    }

    fn parse_spread_element(&mut self) -> Expression<'a> {
        let pos = self.token_pos();
        self.next_token();
        let expression = self.allow_in(Self::parse_assignment_expression);
        Expression::SpreadElement(WrappedExpression {
            data: self.finish(SyntaxKind::SpreadElement, pos),
            expression: self.alloc(expression),
        })
    }

    fn parse_new_expression(&mut self) -> Expression<'a> {
        let pos = self.token_pos();
        let new_end = self.token_end();
        self.parse_expected(SyntaxKind::NewKeyword);

        if self.token() == SyntaxKind::DotToken {
            // `new.target` is kept as a property access on an identifier named `new`.
            self.next_token();
            let target = Expression::Identifier(Identifier {
                data: NodeData::new(SyntaxKind::Identifier, pos, new_end),
                text: "new",
                original_keyword_kind: Some(SyntaxKind::NewKeyword),
            });
            let name = self.parse_identifier_name();
            return Expression::PropertyAccessExpression(PropertyAccessExpression {
                data: self.finish(SyntaxKind::PropertyAccessExpression, pos),
                expression: self.alloc(target),
                question_dot_token: false,
                name,
            });
        }

        let callee_pos = self.token_pos();
        let callee = self.guarded(Self::missing_expression, |p| {
            let expression = p.parse_primary_expression();
            p.parse_member_chain(callee_pos, expression, false)
        });
        let type_arguments = if self.token() == SyntaxKind::LessThanToken {
            self.try_parse_clean(|p| {
                let arguments = p.parse_type_arguments();
                (p.token() == SyntaxKind::OpenParenToken || p.can_parse_semicolon()).then_some(arguments)
            })
        } else {
            None
        };
        let arguments = if self.token() == SyntaxKind::OpenParenToken {
            Some(self.parse_arguments())
        } else {
            None
        };
        Expression::NewExpression(NewExpression {
            data: self.finish(SyntaxKind::NewExpression, pos),
            expression: self.alloc(callee),
            type_arguments,
            arguments,
        })
    }

    // ========================================================================
    // Primary expressions
    // ========================================================================

    fn parse_keyword_expression(&mut self, kind: SyntaxKind) -> Token {
        let pos = self.token_pos();
        self.next_token();
        self.finish_token(kind, pos)
    }

    fn parse_primary_expression(&mut self) -> Expression<'a> {
        let pos = self.token_pos();
        match self.token() {
            SyntaxKind::NumericLiteral => Expression::NumericLiteral(self.parse_numeric_literal()),
            SyntaxKind::BigIntLiteral => Expression::BigIntLiteral(self.parse_big_int_literal()),
            SyntaxKind::StringLiteral => Expression::StringLiteral(self.parse_string_literal()),
            SyntaxKind::NoSubstitutionTemplateLiteral | SyntaxKind::TemplateHead => self.parse_template_expression(),
            SyntaxKind::TrueKeyword => Expression::TrueKeyword(self.parse_keyword_expression(SyntaxKind::TrueKeyword)),
            SyntaxKind::FalseKeyword => {
                Expression::FalseKeyword(self.parse_keyword_expression(SyntaxKind::FalseKeyword))
            }
            SyntaxKind::NullKeyword => Expression::NullKeyword(self.parse_keyword_expression(SyntaxKind::NullKeyword)),
            SyntaxKind::ThisKeyword => Expression::ThisKeyword(self.parse_keyword_expression(SyntaxKind::ThisKeyword)),
            SyntaxKind::SuperKeyword => {
                Expression::SuperKeyword(self.parse_keyword_expression(SyntaxKind::SuperKeyword))
            }
            SyntaxKind::OpenParenToken => {
                self.next_token();
                let expression = self.allow_in(Self::parse_expression);
                self.parse_expected(SyntaxKind::CloseParenToken);
                Expression::ParenthesizedExpression(WrappedExpression {
                    data: self.finish(SyntaxKind::ParenthesizedExpression, pos),
                    expression: self.alloc(expression),
                })
            }
            SyntaxKind::OpenBracketToken => self.parse_array_literal(),
            SyntaxKind::OpenBraceToken => self.parse_object_literal(),
            SyntaxKind::AsyncKeyword
                if self.next_token_is(|p| {
                    p.token() == SyntaxKind::FunctionKeyword && !p.has_preceding_line_break()
                }) =>
            {
                self.next_token();
                self.parse_function_expression(pos, ModifierFlags::ASYNC)
            }
            SyntaxKind::FunctionKeyword => self.parse_function_expression(pos, ModifierFlags::NONE),
            SyntaxKind::ClassKeyword => Expression::ClassExpression(self.parse_class_like(
                pos,
                &[],
                ModifierFlags::NONE,
                SyntaxKind::ClassExpression,
            )),
            SyntaxKind::AtToken => {
                let decorators = self.parse_decorators();
                let decorators = self.alloc_slice(decorators);
                if self.token() != SyntaxKind::ClassKeyword {
                    self.error(&messages::EXPRESSION_EXPECTED, &[]);
                    return self.missing_expression();
                }
                Expression::ClassExpression(self.parse_class_like(
                    pos,
                    decorators,
                    ModifierFlags::NONE,
                    SyntaxKind::ClassExpression,
                ))
            }
            SyntaxKind::NewKeyword => self.parse_new_expression(),
            SyntaxKind::SlashToken | SyntaxKind::SlashEqualsToken => {
                self.scanner.rescan_slash_token();
                let text = self.alloc_str(self.scanner.token_value());
                self.next_token();
                Expression::RegularExpressionLiteral(RegularExpressionLiteral {
                    data: self.finish(SyntaxKind::RegularExpressionLiteral, pos),
                    text,
                })
            }
            SyntaxKind::PrivateIdentifier => Expression::PrivateIdentifier(self.parse_private_identifier()),
            // `import(...)` and `import.meta`.
            SyntaxKind::ImportKeyword => Expression::Identifier(self.parse_identifier_name()),
            _ if self.is_identifier() => Expression::Identifier(self.parse_identifier()),
            _ => {
                self.error(&messages::EXPRESSION_EXPECTED, &[]);
                self.missing_expression()
            }
        }
    }

    fn parse_template_expression(&mut self) -> Expression<'a> {
        if self.token() == SyntaxKind::NoSubstitutionTemplateLiteral {
            return Expression::NoSubstitutionTemplateLiteral(self.parse_template_literal_like());
        }
        let pos = self.token_pos();
        let head = self.parse_template_literal_like();
        let mut template_spans = Vec::new();
        loop {
            let span_pos = self.token_pos();
            let expression = self.allow_in(Self::parse_expression);
            let expression = self.alloc(expression);
            let literal = self.parse_template_span_literal();
            let is_middle = literal.data.kind == SyntaxKind::TemplateMiddle;
            template_spans.push(TemplateSpan {
                data: self.finish(SyntaxKind::TemplateSpan, span_pos),
                expression,
                literal,
            });
            if !is_middle {
                break;
            }
        }
        Expression::TemplateExpression(TemplateExpression {
            data: self.finish(SyntaxKind::TemplateExpression, pos),
            head,
            template_spans: self.alloc_slice(template_spans),
        })
    }

    fn parse_array_literal(&mut self) -> Expression<'a> {
        let pos = self.token_pos();
        self.parse_expected(SyntaxKind::OpenBracketToken);
        let elements = self.allow_in(|p| {
            p.parse_delimited_list(SyntaxKind::CloseBracketToken, |p| match p.token() {
                SyntaxKind::CommaToken => {
                    let pos = p.token_pos();
                    Expression::OmittedExpression(Token::new(SyntaxKind::OmittedExpression, pos, pos))
                }
                SyntaxKind::DotDotDotToken => p.parse_spread_element(),
                _ => p.parse_assignment_expression(),
            })
        });
        self.parse_expected(SyntaxKind::CloseBracketToken);
        Expression::ArrayLiteralExpression(ArrayLiteralExpression {
            data: self.finish(SyntaxKind::ArrayLiteralExpression, pos),
            elements: self.alloc_slice(elements),
        })
    }

    fn parse_object_literal(&mut self) -> Expression<'a> {
        let pos = self.token_pos();
        self.parse_expected(SyntaxKind::OpenBraceToken);
        let properties = self.allow_in(|p| {
            p.parse_delimited_list(SyntaxKind::CloseBraceToken, Self::parse_object_literal_element)
        });
        self.parse_expected(SyntaxKind::CloseBraceToken);
        Expression::ObjectLiteralExpression(ObjectLiteralExpression {
            data: self.finish(SyntaxKind::ObjectLiteralExpression, pos),
            properties: self.alloc_slice(properties),
        })
    }

    fn parse_object_literal_element(&mut self) -> ObjectLiteralElement<'a> {
        let pos = self.token_pos();
        if self.parse_optional(SyntaxKind::DotDotDotToken) {
            let expression = self.parse_assignment_expression();
            return ObjectLiteralElement::SpreadAssignment(WrappedExpression {
                data: self.finish(SyntaxKind::SpreadAssignment, pos),
                expression: self.alloc(expression),
            });
        }

        let modifiers = self.parse_modifiers();
        if matches!(self.token(), SyntaxKind::GetKeyword | SyntaxKind::SetKeyword)
            && self.next_token_is(|p| p.is_property_name_start())
        {
            let accessor = self.parse_accessor(pos, &[], modifiers);
            return if accessor.data.kind == SyntaxKind::GetAccessor {
                ObjectLiteralElement::GetAccessor(accessor)
            } else {
                ObjectLiteralElement::SetAccessor(accessor)
            };
        }

        let asterisk_token = self.parse_optional(SyntaxKind::AsteriskToken);
        let token_is_identifier = self.is_identifier();
        if !asterisk_token && !self.is_property_name_start() {
            self.error(&messages::PROPERTY_ASSIGNMENT_EXPECTED, &[]);
        }
        let name = self.parse_property_name();
        let question_token = self.parse_optional(SyntaxKind::QuestionToken);

        if asterisk_token || matches!(self.token(), SyntaxKind::OpenParenToken | SyntaxKind::LessThanToken) {
            let context = function_context(asterisk_token, modifiers.contains(ModifierFlags::ASYNC));
            let (type_parameters, parameters, return_type) = self.parse_signature(context);
            let body = self.parse_function_body(context);
            return ObjectLiteralElement::MethodDeclaration(MethodDeclaration {
                data: self.finish(SyntaxKind::MethodDeclaration, pos).with_modifiers(modifiers),
                decorators: &[],
                asterisk_token,
                name,
                question_token,
                type_parameters,
                parameters,
                return_type,
                body,
            });
        }

        match name {
            PropertyName::Identifier(name) if token_is_identifier && self.token() != SyntaxKind::ColonToken => {
                // `{ a }` and `{ a = 1 }` (the latter only valid as a destructuring target).
                let object_assignment_initializer = self.parse_initializer();
                ObjectLiteralElement::ShorthandPropertyAssignment(ShorthandPropertyAssignment {
                    data: self.finish(SyntaxKind::ShorthandPropertyAssignment, pos),
                    name,
                    object_assignment_initializer,
                })
            }
            name => {
                self.parse_expected(SyntaxKind::ColonToken);
                let initializer = self.parse_assignment_expression();
                ObjectLiteralElement::PropertyAssignment(PropertyAssignment {
                    data: self.finish(SyntaxKind::PropertyAssignment, pos),
                    name,
                    initializer: self.alloc(initializer),
                })
            }
        }
    }

    fn parse_function_expression(&mut self, pos: u32, modifiers: ModifierFlags) -> Expression<'a> {
        self.parse_expected(SyntaxKind::FunctionKeyword);
        let asterisk_token = self.parse_optional(SyntaxKind::AsteriskToken);
        let context = function_context(asterisk_token, modifiers.contains(ModifierFlags::ASYNC));
        let name = if self.is_identifier() {
            Some(self.parse_identifier())
        } else {
            None
        };
        let (type_parameters, parameters, return_type) = self.parse_signature(context);
        let body = self.parse_function_body(context);
        Expression::FunctionExpression(FunctionDeclaration {
            data: self.finish(SyntaxKind::FunctionExpression, pos).with_modifiers(modifiers),
            asterisk_token,
            name,
            type_parameters,
            parameters,
            return_type,
            body,
        })
    }
}

// ============================================================================
// Types
// ============================================================================

impl<'a> Parser<'a> {
    /// A type in a position where conditional types are allowed again,
    /// such as inside brackets or a type argument list.
    fn parse_type(&mut self) -> TypeNode<'a> {
        self.with_disallow_conditional_types(false, Self::parse_type_in_context)
    }

    fn parse_type_in_context(&mut self) -> TypeNode<'a> {
        self.guarded(Self::missing_type, Self::parse_type_worker)
    }

    fn parse_type_worker(&mut self) -> TypeNode<'a> {
        if self.is_start_of_function_or_constructor_type() {
            return self.parse_function_or_constructor_type();
        }
        let pos = self.token_pos();
        let check_type = self.parse_union_type_or_higher();
        if self.disallow_conditional_types
            || self.token() != SyntaxKind::ExtendsKeyword
            || self.has_preceding_line_break()
        {
            return check_type;
        }
        self.next_token();
        // The extends clause cannot itself be an unparenthesized conditional type.
        let extends_type = self.with_disallow_conditional_types(true, Self::parse_type_in_context);
        self.parse_expected(SyntaxKind::QuestionToken);
        let true_type = self.parse_type();
        self.parse_expected(SyntaxKind::ColonToken);
        let false_type = self.parse_type();
        TypeNode::ConditionalType(ConditionalTypeNode {
            data: self.finish(SyntaxKind::ConditionalType, pos),
            check_type: self.alloc(check_type),
            extends_type: self.alloc(extends_type),
            true_type: self.alloc(true_type),
            false_type: self.alloc(false_type),
        })
    }

    /// A return type, which may be a type predicate such as `x is string`.
    fn parse_type_or_type_predicate(&mut self) -> TypeNode<'a> {
        let pos = self.token_pos();
        if self.token() == SyntaxKind::AssertsKeyword
            && self.next_token_is(|p| {
                !p.has_preceding_line_break() && (p.is_identifier() || p.token() == SyntaxKind::ThisKeyword)
            })
        {
            self.next_token();
            let parameter_name = self.parse_this_or_identifier();
            let type_node = if self.parse_optional(SyntaxKind::IsKeyword) {
                let type_node = self.parse_type();
                Some(self.alloc(type_node))
            } else {
                None
            };
            return TypeNode::TypePredicate(TypePredicateNode {
                data: self.finish(SyntaxKind::TypePredicate, pos),
                asserts_modifier: true,
                parameter_name,
                type_node,
            });
        }
        if (self.is_identifier() || self.token() == SyntaxKind::ThisKeyword)
            && self.next_token_is(|p| p.token() == SyntaxKind::IsKeyword && !p.has_preceding_line_break())
        {
            let parameter_name = self.parse_this_or_identifier();
            self.next_token();
            let type_node = self.parse_type();
            return TypeNode::TypePredicate(TypePredicateNode {
                data: self.finish(SyntaxKind::TypePredicate, pos),
                asserts_modifier: false,
                parameter_name,
                type_node: Some(self.alloc(type_node)),
            });
        }
        self.parse_type()
    }

    fn is_start_of_function_or_constructor_type(&mut self) -> bool {
        match self.token() {
            SyntaxKind::LessThanToken | SyntaxKind::NewKeyword => true,
            SyntaxKind::AbstractKeyword => self.next_token_is(|p| p.token() == SyntaxKind::NewKeyword),
            SyntaxKind::OpenParenToken => self.look_ahead(Self::is_unambiguously_start_of_function_type),
            _ => false,
        }
    }

    fn is_unambiguously_start_of_function_type(&mut self) -> bool {
        self.next_token();
        if matches!(self.token(), SyntaxKind::CloseParenToken | SyntaxKind::DotDotDotToken) {
            return true;
        }
        if self.skip_parameter_start() {
            // `(x:`, `(x,`, `(x?` and `(x=` can only be parameter lists.
            if matches!(
                self.token(),
                SyntaxKind::ColonToken | SyntaxKind::CommaToken | SyntaxKind::QuestionToken | SyntaxKind::EqualsToken
            ) {
                return true;
            }
            if self.token() == SyntaxKind::CloseParenToken {
                self.next_token();
                return self.token() == SyntaxKind::EqualsGreaterThanToken;
            }
        }
        false
    }

    fn skip_parameter_start(&mut self) -> bool {
        if self.token().is_modifier_kind() {
            self.parse_modifiers();
        }
        if self.is_identifier() || self.token() == SyntaxKind::ThisKeyword {
            self.next_token();
            return true;
        }
        if matches!(self.token(), SyntaxKind::OpenBracketToken | SyntaxKind::OpenBraceToken) {
            let errors = self.diagnostics.len();
            self.parse_binding_name();
            return errors == self.diagnostics.len();
        }
        false
    }

    fn parse_function_or_constructor_type(&mut self) -> TypeNode<'a> {
        let pos = self.token_pos();
        let modifiers = if self.parse_optional(SyntaxKind::AbstractKeyword) {
            ModifierFlags::ABSTRACT
        } else {
            ModifierFlags::NONE
        };
        let is_constructor = self.parse_optional(SyntaxKind::NewKeyword);
        let type_parameters = self.parse_type_parameters();
        let parameters = self.parse_parameters(NodeFlags::NONE);
        self.parse_expected(SyntaxKind::EqualsGreaterThanToken);
        let return_type = self.parse_type_or_type_predicate();
        let kind = if is_constructor {
            SyntaxKind::ConstructorType
        } else {
            SyntaxKind::FunctionType
        };
        let node = FunctionTypeNode {
            data: self.finish(kind, pos).with_modifiers(modifiers),
            type_parameters,
            parameters,
            return_type: self.alloc(return_type),
        };
        if is_constructor {
            TypeNode::ConstructorType(node)
        } else {
            TypeNode::FunctionType(node)
        }
    }

    fn parse_union_type_or_higher(&mut self) -> TypeNode<'a> {
        self.parse_union_or_intersection_type(SyntaxKind::BarToken, Self::parse_intersection_type_or_higher)
    }

    fn parse_intersection_type_or_higher(&mut self) -> TypeNode<'a> {
        self.parse_union_or_intersection_type(SyntaxKind::AmpersandToken, Self::parse_type_operator_or_higher)
    }

    /// `A | B | C` or `A & B`, with an optional leading operator.
    fn parse_union_or_intersection_type(
        &mut self,
        operator: SyntaxKind,
        parse_constituent: fn(&mut Self) -> TypeNode<'a>,
    ) -> TypeNode<'a> {
        let pos = self.token_pos();
        self.parse_optional(operator);
        let first = parse_constituent(self);
        // A single constituent, even after a leading `|`, is just that type.
        if self.token() != operator {
            return first;
        }
        let mut types = vec![first];
        while self.parse_optional(operator) {
            types.push(parse_constituent(self));
        }
        let data = self.finish(
            if operator == SyntaxKind::BarToken {
                SyntaxKind::UnionType
            } else {
                SyntaxKind::IntersectionType
            },
            pos,
        );
        let types = self.alloc_slice(types);
        if operator == SyntaxKind::BarToken {
            TypeNode::UnionType(UnionTypeNode { data, types })
        } else {
            TypeNode::IntersectionType(IntersectionTypeNode { data, types })
        }
    }

    fn parse_type_operator_or_higher(&mut self) -> TypeNode<'a> {
        let pos = self.token_pos();
        match self.token() {
            SyntaxKind::KeyOfKeyword | SyntaxKind::UniqueKeyword | SyntaxKind::ReadonlyKeyword => {
                let operator = self.token();
                self.next_token();
                let type_node = self.guarded(Self::missing_type, Self::parse_type_operator_or_higher);
                TypeNode::TypeOperator(TypeOperatorNode {
                    data: self.finish(SyntaxKind::TypeOperator, pos),
                    operator,
                    type_node: self.alloc(type_node),
                })
            }
            SyntaxKind::InferKeyword => {
                self.next_token();
                let parameter_pos = self.token_pos();
                let name = self.parse_identifier();
                let constraint = self.try_parse(|p| {
                    if !p.parse_optional(SyntaxKind::ExtendsKeyword) {
                        return None;
                    }
                    let constraint = p.with_disallow_conditional_types(true, Self::parse_type_in_context);
                    // In `infer U extends X ? A : B` outside an extends clause the
                    // `extends` starts the conditional instead.
                    if p.disallow_conditional_types || p.token() != SyntaxKind::QuestionToken {
                        Some(p.alloc(constraint))
                    } else {
                        None
                    }
                });
                let type_parameter = TypeParameterDeclaration {
                    data: self.finish(SyntaxKind::TypeParameter, parameter_pos),
                    name,
                    constraint,
                    default: None,
                };
                TypeNode::InferType(InferTypeNode {
                    data: self.finish(SyntaxKind::InferType, pos),
                    type_parameter: self.alloc(type_parameter),
                })
            }
            _ => self.parse_postfix_type(),
        }
    }

    fn parse_postfix_type(&mut self) -> TypeNode<'a> {
        let pos = self.token_pos();
        let mut type_node = self.parse_non_array_type();
        while self.token() == SyntaxKind::OpenBracketToken && !self.has_preceding_line_break() {
            self.next_token();
            type_node = if self.parse_optional(SyntaxKind::CloseBracketToken) {
                TypeNode::ArrayType(ArrayTypeNode {
                    data: self.finish(SyntaxKind::ArrayType, pos),
                    element_type: self.alloc(type_node),
                })
            } else {
                let index_type = self.parse_type();
                self.parse_expected(SyntaxKind::CloseBracketToken);
                TypeNode::IndexedAccessType(IndexedAccessTypeNode {
                    data: self.finish(SyntaxKind::IndexedAccessType, pos),
                    object_type: self.alloc(type_node),
                    index_type: self.alloc(index_type),
                })
            };
        }
        type_node
    }

    fn parse_non_array_type(&mut self) -> TypeNode<'a> {
        let pos = self.token_pos();
        match self.token() {
            kind if kind.is_keyword_type() && !self.next_token_is(|p| p.token() == SyntaxKind::DotToken) => {
                self.next_token();
                TypeNode::KeywordType(KeywordTypeNode {
                    data: self.finish(kind, pos),
                })
            }
            SyntaxKind::StringLiteral
            | SyntaxKind::NumericLiteral
            | SyntaxKind::BigIntLiteral
            | SyntaxKind::TrueKeyword
            | SyntaxKind::FalseKeyword
            | SyntaxKind::NoSubstitutionTemplateLiteral => {
                let literal = self.parse_primary_expression();
                self.finish_literal_type(pos, literal)
            }
            SyntaxKind::MinusToken
                if self.next_token_is(|p| {
                    matches!(p.token(), SyntaxKind::NumericLiteral | SyntaxKind::BigIntLiteral)
                }) =>
            {
                self.next_token();
                let operand = self.parse_primary_expression();
                let literal = Expression::PrefixUnaryExpression(PrefixUnaryExpression {
                    data: self.finish(SyntaxKind::PrefixUnaryExpression, pos),
                    operator: SyntaxKind::MinusToken,
                    operand: self.alloc(operand),
                });
                self.finish_literal_type(pos, literal)
            }
            SyntaxKind::ThisKeyword => {
                self.next_token();
                TypeNode::ThisType(self.finish_token(SyntaxKind::ThisType, pos))
            }
            SyntaxKind::TypeOfKeyword => {
                self.next_token();
                let expr_name = self.parse_entity_name(true);
                TypeNode::TypeQuery(TypeQueryNode {
                    data: self.finish(SyntaxKind::TypeQuery, pos),
                    expr_name,
                })
            }
            SyntaxKind::OpenBraceToken => {
                if self.look_ahead(Self::is_start_of_mapped_type) {
                    self.parse_mapped_type()
                } else {
                    let members = self.parse_object_type_members();
                    TypeNode::TypeLiteral(TypeLiteralNode {
                        data: self.finish(SyntaxKind::TypeLiteral, pos),
                        members,
                    })
                }
            }
            SyntaxKind::OpenBracketToken => {
                self.next_token();
                let elements = self.parse_delimited_list(SyntaxKind::CloseBracketToken, Self::parse_tuple_element_type);
                self.parse_expected(SyntaxKind::CloseBracketToken);
                TypeNode::TupleType(TupleTypeNode {
                    data: self.finish(SyntaxKind::TupleType, pos),
                    elements: self.alloc_slice(elements),
                })
            }
            SyntaxKind::OpenParenToken => {
                self.next_token();
                let type_node = self.parse_type();
                self.parse_expected(SyntaxKind::CloseParenToken);
                TypeNode::ParenthesizedType(WrappedTypeNode {
                    data: self.finish(SyntaxKind::ParenthesizedType, pos),
                    type_node: self.alloc(type_node),
                })
            }
            SyntaxKind::TemplateHead => self.parse_template_literal_type(),
            // `as const` refers to a type named `const`.
            SyntaxKind::ConstKeyword => {
                let name = self.parse_identifier_name();
                TypeNode::TypeReference(TypeReferenceNode {
                    data: self.finish(SyntaxKind::TypeReference, pos),
                    type_name: EntityName::Identifier(name),
                    type_arguments: None,
                })
            }
            _ if self.is_identifier() => {
                let type_name = self.parse_entity_name(false);
                let type_arguments = if self.token() == SyntaxKind::LessThanToken && !self.has_preceding_line_break() {
                    Some(self.parse_type_arguments())
                } else {
                    None
                };
                TypeNode::TypeReference(TypeReferenceNode {
                    data: self.finish(SyntaxKind::TypeReference, pos),
                    type_name,
                    type_arguments,
                })
            }
            _ => {
                self.error(&messages::TYPE_EXPECTED, &[]);
                self.missing_type()
            }
        }
    }

    fn finish_literal_type(&mut self, pos: u32, literal: Expression<'a>) -> TypeNode<'a> {
        TypeNode::LiteralType(LiteralTypeNode {
            data: self.finish(SyntaxKind::LiteralType, pos),
            literal: self.alloc(literal),
        })
    }

    fn parse_type_arguments(&mut self) -> &'a [TypeNode<'a>] {
        self.parse_expected(SyntaxKind::LessThanToken);
        let arguments = self.parse_delimited_list(SyntaxKind::GreaterThanToken, Self::parse_type);
        self.parse_expected(SyntaxKind::GreaterThanToken);
        self.alloc_slice(arguments)
    }

    fn is_start_of_mapped_type(&mut self) -> bool {
        self.next_token();
        if matches!(self.token(), SyntaxKind::PlusToken | SyntaxKind::MinusToken) {
            self.next_token();
            return self.token() == SyntaxKind::ReadonlyKeyword;
        }
        if self.token() == SyntaxKind::ReadonlyKeyword {
            self.next_token();
        }
        if self.token() != SyntaxKind::OpenBracketToken {
            return false;
        }
        self.next_token();
        if !self.is_identifier() {
            return false;
        }
        self.next_token();
        self.token() == SyntaxKind::InKeyword
    }

    /// A `+`/`-` prefixed modifier token in a mapped type, such as `-readonly` or `+?`.
    fn parse_mapped_type_modifier(&mut self, modifier: SyntaxKind) -> Option<Token> {
        let pos = self.token_pos();
        let kind = self.token();
        if kind == modifier {
            self.next_token();
        } else if matches!(kind, SyntaxKind::PlusToken | SyntaxKind::MinusToken) {
            self.next_token();
            self.parse_expected(modifier);
        } else {
            return None;
        }
        Some(self.finish_token(kind, pos))
    }

    fn parse_mapped_type(&mut self) -> TypeNode<'a> {
        let pos = self.token_pos();
        self.parse_expected(SyntaxKind::OpenBraceToken);
        let readonly_token = self.parse_mapped_type_modifier(SyntaxKind::ReadonlyKeyword);
        self.parse_expected(SyntaxKind::OpenBracketToken);
        let parameter_pos = self.token_pos();
        let name = self.parse_identifier();
        self.parse_expected(SyntaxKind::InKeyword);
        let constraint = self.parse_type();
        let type_parameter = TypeParameterDeclaration {
            data: self.finish(SyntaxKind::TypeParameter, parameter_pos),
            name,
            constraint: Some(self.alloc(constraint)),
            default: None,
        };
        let name_type = if self.parse_optional(SyntaxKind::AsKeyword) {
            let type_node = self.parse_type();
            Some(self.alloc(type_node))
        } else {
            None
        };
        self.parse_expected(SyntaxKind::CloseBracketToken);
        let question_token = self.parse_mapped_type_modifier(SyntaxKind::QuestionToken);
        let type_node = self.parse_type_annotation();
        self.parse_semicolon();
        self.parse_expected(SyntaxKind::CloseBraceToken);
        TypeNode::MappedType(MappedTypeNode {
            data: self.finish(SyntaxKind::MappedType, pos),
            readonly_token,
            type_parameter: self.alloc(type_parameter),
            name_type,
            question_token,
            type_node,
        })
    }

    fn is_named_tuple_member_start(&mut self) -> bool {
        self.look_ahead(|p| {
            p.parse_optional(SyntaxKind::DotDotDotToken);
            if !p.token().is_identifier_or_keyword() {
                return false;
            }
            p.next_token();
            p.parse_optional(SyntaxKind::QuestionToken);
            p.token() == SyntaxKind::ColonToken
        })
    }

    fn parse_tuple_element_type(&mut self) -> TypeNode<'a> {
        let pos = self.token_pos();
        if self.is_named_tuple_member_start() {
            let dot_dot_dot_token = self.parse_optional(SyntaxKind::DotDotDotToken);
            let name = self.parse_identifier_name();
            let question_token = self.parse_optional(SyntaxKind::QuestionToken);
            self.parse_expected(SyntaxKind::ColonToken);
            let type_node = self.parse_type();
            return TypeNode::NamedTupleMember(NamedTupleMemberNode {
                data: self.finish(SyntaxKind::NamedTupleMember, pos),
                dot_dot_dot_token,
                name,
                question_token,
                type_node: self.alloc(type_node),
            });
        }
        if self.parse_optional(SyntaxKind::DotDotDotToken) {
            let type_node = self.parse_type();
            return TypeNode::RestType(WrappedTypeNode {
                data: self.finish(SyntaxKind::RestType, pos),
                type_node: self.alloc(type_node),
            });
        }
        let type_node = self.parse_type();
        if self.parse_optional(SyntaxKind::QuestionToken) {
            return TypeNode::OptionalType(WrappedTypeNode {
                data: self.finish(SyntaxKind::OptionalType, pos),
                type_node: self.alloc(type_node),
            });
        }
        type_node
    }

    fn parse_template_literal_type(&mut self) -> TypeNode<'a> {
        let pos = self.token_pos();
        let head = self.parse_template_literal_like();
        let mut template_spans = Vec::new();
        loop {
            let span_pos = self.token_pos();
            let type_node = self.parse_type();
            let type_node = self.alloc(type_node);
            let literal = self.parse_template_span_literal();
            let is_middle = literal.data.kind == SyntaxKind::TemplateMiddle;
            template_spans.push(TemplateLiteralTypeSpan {
                data: self.finish(SyntaxKind::TemplateLiteralTypeSpan, span_pos),
                type_node,
                literal,
            });
            if !is_middle {
                break;
            }
        }
        TypeNode::TemplateLiteralType(TemplateLiteralTypeNode {
            data: self.finish(SyntaxKind::TemplateLiteralType, pos),
            head,
            template_spans: self.alloc_slice(template_spans),
        })
    }
}
