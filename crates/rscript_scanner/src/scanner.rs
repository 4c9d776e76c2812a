//! The TypeScript scanner.
//!
//! Works directly over the UTF-8 bytes of the source. Every offset it reports
//! is a byte offset and always falls on a char boundary. String and template
//! values are cooked: escapes are resolved in `token_value`, while the raw
//! source of a template part stays available through `token_raw_text`.
//!
//! A handful of tokens are context-sensitive and are only produced when the
//! parser asks for them: `/` as a regular expression, `>` merged into shift
//! operators, and `}` continuing a template.

use crate::token::TokenInfo;
use memchr::{memchr, memchr2, memchr3, memmem};
use rscript_ast::syntax_kind::SyntaxKind;
use rscript_ast::types::TokenFlags;
use rscript_core::text::TextSpan;
use rscript_diagnostics::{messages, Diagnostic, DiagnosticCollection, DiagnosticMessage};
use unicode_xid::UnicodeXID;

/// Saved scanner state for speculative scanning.
#[derive(Debug, Clone)]
pub struct ScannerState {
    pos: usize,
    full_start: usize,
    token_start: usize,
    token: SyntaxKind,
    token_value: String,
    token_flags: TokenFlags,
    raw_range: (usize, usize),
    diagnostic_count: usize,
}

/// Converts TypeScript source text into tokens.
pub struct Scanner {
    text: String,
    /// Current byte position, the end of the current token.
    pos: usize,
    /// Start of the current token including leading trivia.
    full_start: usize,
    /// Start of the current token after trivia.
    token_start: usize,
    token: SyntaxKind,
    /// Identifier name, cooked string value or raw numeric text.
    token_value: String,
    token_flags: TokenFlags,
    /// Byte range of the raw text of the last template part.
    raw_range: (usize, usize),
    diagnostics: DiagnosticCollection,
}

impl Scanner {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            pos: 0,
            full_start: 0,
            token_start: 0,
            token: SyntaxKind::Unknown,
            token_value: String::new(),
            token_flags: TokenFlags::NONE,
            raw_range: (0, 0),
            diagnostics: DiagnosticCollection::new(),
        }
    }

    /// The full source text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Give up the scanner, keeping its copy of the source text.
    pub fn into_text(self) -> String {
        self.text
    }

    /// Skip a `#!` line at the very start of the file. Call before the first `scan`.
    pub fn skip_shebang(&mut self) {
        if self.pos == 0 && self.text.starts_with("#!") {
            let rest = &self.text.as_bytes()[2..];
            self.pos = 2 + memchr2(b'\n', b'\r', rest).unwrap_or(rest.len());
        }
    }

    /// Run `f` and rewind to the current token afterwards.
    pub fn look_ahead<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        let state = self.save_state();
        let result = f(self);
        self.restore_state(state);
        result
    }

    /// Run `f`, rewinding only if it returns `None`.
    pub fn try_scan<T>(&mut self, f: impl FnOnce(&mut Self) -> Option<T>) -> Option<T> {
        let state = self.save_state();
        let result = f(self);
        if result.is_none() {
            self.restore_state(state);
        }
        result
    }

    pub fn save_state(&self) -> ScannerState {
        ScannerState {
            pos: self.pos,
            full_start: self.full_start,
            token_start: self.token_start,
            token: self.token,
            token_value: self.token_value.clone(),
            token_flags: self.token_flags,
            raw_range: self.raw_range,
            diagnostic_count: self.diagnostics.len(),
        }
    }

    /// Rewind to `state`, discarding diagnostics reported since it was saved.
    pub fn restore_state(&mut self, state: ScannerState) {
        self.pos = state.pos;
        self.full_start = state.full_start;
        self.token_start = state.token_start;
        self.token = state.token;
        self.token_value = state.token_value;
        self.token_flags = state.token_flags;
        self.raw_range = state.raw_range;
        self.diagnostics.truncate(state.diagnostic_count);
    }

    #[inline]
    pub fn token(&self) -> SyntaxKind {
        self.token
    }

    #[inline]
    pub fn token_value(&self) -> &str {
        &self.token_value
    }

    #[inline]
    pub fn token_start(&self) -> usize {
        self.token_start
    }

    #[inline]
    pub fn token_end(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn full_start(&self) -> usize {
        self.full_start
    }

    #[inline]
    pub fn token_flags(&self) -> TokenFlags {
        self.token_flags
    }

    #[inline]
    pub fn has_preceding_line_break(&self) -> bool {
        self.token_flags.contains(TokenFlags::PRECEDING_LINE_BREAK)
    }

    /// Source text of the current token.
    pub fn token_text(&self) -> &str {
        self.text.get(self.token_start..self.pos).unwrap_or("")
    }

    /// Raw text of the current template part, without delimiters.
    pub fn token_raw_text(&self) -> &str {
        self.text.get(self.raw_range.0..self.raw_range.1).unwrap_or("")
    }

    pub fn diagnostics(&self) -> &DiagnosticCollection {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> DiagnosticCollection {
        std::mem::take(&mut self.diagnostics)
    }

    pub fn token_info(&self) -> TokenInfo {
        TokenInfo {
            kind: self.token,
            pos: self.token_start as u32,
            end: self.pos as u32,
            text: self.token_value.clone(),
            flags: self.token_flags,
        }
    }

    // ========================================================================
    // Core scanning
    // ========================================================================

    /// Scan the next token.
    pub fn scan(&mut self) -> SyntaxKind {
        self.full_start = self.pos;
        self.token_flags = TokenFlags::NONE;
        self.token_value.clear();
        self.skip_trivia();
        self.token_start = self.pos;
        self.token = self.scan_token();
        self.token
    }

    fn scan_token(&mut self) -> SyntaxKind {
        let Some(ch) = self.current_char() else {
            return SyntaxKind::EndOfFileToken;
        };
        match ch {
            '{' => self.advance_with(1, SyntaxKind::OpenBraceToken),
            '}' => self.advance_with(1, SyntaxKind::CloseBraceToken),
            '(' => self.advance_with(1, SyntaxKind::OpenParenToken),
            ')' => self.advance_with(1, SyntaxKind::CloseParenToken),
            '[' => self.advance_with(1, SyntaxKind::OpenBracketToken),
            ']' => self.advance_with(1, SyntaxKind::CloseBracketToken),
            ';' => self.advance_with(1, SyntaxKind::SemicolonToken),
            ',' => self.advance_with(1, SyntaxKind::CommaToken),
            ':' => self.advance_with(1, SyntaxKind::ColonToken),
            '~' => self.advance_with(1, SyntaxKind::TildeToken),
            '@' => self.advance_with(1, SyntaxKind::AtToken),
            '"' | '\'' => self.scan_string_literal(ch as u8),
            '`' => self.scan_template(true),
            '0'..='9' => self.scan_number(),
            '.' => self.scan_dot(),
            '=' => self.scan_equals(),
            '!' => self.scan_exclamation(),
            '+' => self.scan_plus(),
            '-' => self.scan_minus(),
            '*' => self.scan_asterisk(),
            '/' => self.scan_slash(),
            '%' => self.scan_percent(),
            '&' => self.scan_ampersand(),
            '|' => self.scan_bar(),
            '^' => self.scan_caret(),
            '<' => self.scan_less_than(),
            // `>>` and friends are formed by `rescan_greater_than_token`.
            '>' => self.advance_with(1, SyntaxKind::GreaterThanToken),
            '?' => self.scan_question(),
            '#' => self.scan_hash(),
            '\\' => self.scan_identifier(),
            c if is_identifier_start(c) => self.scan_identifier(),
            c => {
                self.pos += c.len_utf8();
                self.error(&messages::INVALID_CHARACTER, self.token_start, self.pos);
                SyntaxKind::Unknown
            }
        }
    }

    fn skip_trivia(&mut self) {
        while let Some(ch) = self.current_char() {
            match ch {
                '\n' | '\r' | '\u{2028}' | '\u{2029}' => {
                    self.token_flags |= TokenFlags::PRECEDING_LINE_BREAK;
                    self.pos += ch.len_utf8();
                }
                '/' if self.peek(1) == b'/' => {
                    let rest = &self.text.as_bytes()[self.pos..];
                    self.pos += memchr2(b'\n', b'\r', rest).unwrap_or(rest.len());
                }
                '/' if self.peek(1) == b'*' => self.skip_multi_line_comment(),
                c if is_white_space_single_line(c) => self.pos += c.len_utf8(),
                _ => return,
            }
        }
    }

    fn skip_multi_line_comment(&mut self) {
        let comment_start = self.pos;
        let body_start = self.pos + 2;
        let body = &self.text.as_bytes()[body_start..];
        let (body_len, terminated) = match memmem::find(body, b"*/") {
            Some(i) => (i, true),
            None => (body.len(), false),
        };
        if memchr2(b'\n', b'\r', &body[..body_len]).is_some() {
            self.token_flags |= TokenFlags::PRECEDING_LINE_BREAK;
        }
        if terminated {
            self.pos = body_start + body_len + 2;
        } else {
            self.pos = self.text.len();
            self.error(&messages::ASTERISK_SLASH_EXPECTED, comment_start, self.pos);
        }
    }

    // ========================================================================
    // Punctuation
    // ========================================================================

    fn advance_with(&mut self, len: usize, kind: SyntaxKind) -> SyntaxKind {
        self.pos += len;
        kind
    }

    /// Take the first candidate whose text starts at the current position.
    /// The last candidate must be the single character already dispatched on.
    fn scan_longest(&mut self, candidates: &[(&str, SyntaxKind)]) -> SyntaxKind {
        let rest = &self.text.as_bytes()[self.pos..];
        for (text, kind) in candidates {
            if rest.starts_with(text.as_bytes()) {
                self.pos += text.len();
                return *kind;
            }
        }
        self.pos += 1;
        SyntaxKind::Unknown
    }

    fn scan_dot(&mut self) -> SyntaxKind {
        if self.peek(1).is_ascii_digit() {
            return self.scan_number();
        }
        self.scan_longest(&[("...", SyntaxKind::DotDotDotToken), (".", SyntaxKind::DotToken)])
    }

    fn scan_equals(&mut self) -> SyntaxKind {
        self.scan_longest(&[
            ("===", SyntaxKind::EqualsEqualsEqualsToken),
            ("==", SyntaxKind::EqualsEqualsToken),
            ("=>", SyntaxKind::EqualsGreaterThanToken),
            ("=", SyntaxKind::EqualsToken),
        ])
    }

    fn scan_exclamation(&mut self) -> SyntaxKind {
        self.scan_longest(&[
            ("!==", SyntaxKind::ExclamationEqualsEqualsToken),
            ("!=", SyntaxKind::ExclamationEqualsToken),
            ("!", SyntaxKind::ExclamationToken),
        ])
    }

    fn scan_plus(&mut self) -> SyntaxKind {
        self.scan_longest(&[
            ("++", SyntaxKind::PlusPlusToken),
            ("+=", SyntaxKind::PlusEqualsToken),
            ("+", SyntaxKind::PlusToken),
        ])
    }

    fn scan_minus(&mut self) -> SyntaxKind {
        self.scan_longest(&[
            ("--", SyntaxKind::MinusMinusToken),
            ("-=", SyntaxKind::MinusEqualsToken),
            ("-", SyntaxKind::MinusToken),
        ])
    }

    fn scan_asterisk(&mut self) -> SyntaxKind {
        self.scan_longest(&[
            ("**=", SyntaxKind::AsteriskAsteriskEqualsToken),
            ("**", SyntaxKind::AsteriskAsteriskToken),
            ("*=", SyntaxKind::AsteriskEqualsToken),
            ("*", SyntaxKind::AsteriskToken),
        ])
    }

    fn scan_slash(&mut self) -> SyntaxKind {
        self.scan_longest(&[("/=", SyntaxKind::SlashEqualsToken), ("/", SyntaxKind::SlashToken)])
    }

    fn scan_percent(&mut self) -> SyntaxKind {
        self.scan_longest(&[("%=", SyntaxKind::PercentEqualsToken), ("%", SyntaxKind::PercentToken)])
    }

    fn scan_ampersand(&mut self) -> SyntaxKind {
        self.scan_longest(&[
            ("&&=", SyntaxKind::AmpersandAmpersandEqualsToken),
            ("&&", SyntaxKind::AmpersandAmpersandToken),
            ("&=", SyntaxKind::AmpersandEqualsToken),
            ("&", SyntaxKind::AmpersandToken),
        ])
    }

    fn scan_bar(&mut self) -> SyntaxKind {
        self.scan_longest(&[
            ("||=", SyntaxKind::BarBarEqualsToken),
            ("||", SyntaxKind::BarBarToken),
            ("|=", SyntaxKind::BarEqualsToken),
            ("|", SyntaxKind::BarToken),
        ])
    }

    fn scan_caret(&mut self) -> SyntaxKind {
        self.scan_longest(&[("^=", SyntaxKind::CaretEqualsToken), ("^", SyntaxKind::CaretToken)])
    }

    fn scan_less_than(&mut self) -> SyntaxKind {
        self.scan_longest(&[
            ("<<=", SyntaxKind::LessThanLessThanEqualsToken),
            ("<<", SyntaxKind::LessThanLessThanToken),
            ("<=", SyntaxKind::LessThanEqualsToken),
            ("<", SyntaxKind::LessThanToken),
        ])
    }

    fn scan_question(&mut self) -> SyntaxKind {
        // `a?.5:b` is a conditional, not an optional chain.
        if self.peek(1) == b'.' && !self.peek(2).is_ascii_digit() {
            return self.advance_with(2, SyntaxKind::QuestionDotToken);
        }
        self.scan_longest(&[
            ("??=", SyntaxKind::QuestionQuestionEqualsToken),
            ("??", SyntaxKind::QuestionQuestionToken),
            ("?", SyntaxKind::QuestionToken),
        ])
    }

    fn scan_hash(&mut self) -> SyntaxKind {
        let next = self.text.get(self.pos + 1..).and_then(|s| s.chars().next());
        match next {
            Some(c) if is_identifier_start(c) || c == '\\' => {
                self.pos += 1;
                if self.scan_identifier() == SyntaxKind::Unknown {
                    return SyntaxKind::Unknown;
                }
                self.token_value.insert(0, '#');
                SyntaxKind::PrivateIdentifier
            }
            _ => self.advance_with(1, SyntaxKind::HashToken),
        }
    }

    // ========================================================================
    // Rescanning
    // ========================================================================

    /// Merge a `>` token with following characters into `>=`, `>>`, `>>=`,
    /// `>>>` or `>>>=`. Type argument lists never call this.
    pub fn rescan_greater_than_token(&mut self) -> SyntaxKind {
        if self.token == SyntaxKind::GreaterThanToken {
            let (len, kind) = match (self.peek(0), self.peek(1), self.peek(2)) {
                (b'>', b'>', b'=') => (3, SyntaxKind::GreaterThanGreaterThanGreaterThanEqualsToken),
                (b'>', b'>', _) => (2, SyntaxKind::GreaterThanGreaterThanGreaterThanToken),
                (b'>', b'=', _) => (2, SyntaxKind::GreaterThanGreaterThanEqualsToken),
                (b'>', _, _) => (1, SyntaxKind::GreaterThanGreaterThanToken),
                (b'=', _, _) => (1, SyntaxKind::GreaterThanEqualsToken),
                _ => (0, SyntaxKind::GreaterThanToken),
            };
            self.pos += len;
            self.token = kind;
        }
        self.token
    }

    /// Rescan a `/` or `/=` token as a regular expression literal.
    pub fn rescan_slash_token(&mut self) -> SyntaxKind {
        if !matches!(self.token, SyntaxKind::SlashToken | SyntaxKind::SlashEqualsToken) {
            return self.token;
        }
        let bytes = self.text.as_bytes();
        let mut p = self.token_start + 1;
        let mut in_class = false;
        let mut escaped = false;
        let terminated = loop {
            let Some(&b) = bytes.get(p) else { break false };
            if b == b'\n' || b == b'\r' {
                break false;
            }
            p += 1;
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'/' && !in_class {
                break true;
            } else if b == b'[' {
                in_class = true;
            } else if b == b']' {
                in_class = false;
            }
        };
        // A trailing escape may have stepped into a multi-byte char.
        while !self.text.is_char_boundary(p) {
            p += 1;
        }
        self.pos = p;
        if terminated {
            while let Some(c) = self.current_char().filter(|c| is_identifier_part(*c)) {
                self.pos += c.len_utf8();
            }
        } else {
            self.token_flags |= TokenFlags::UNTERMINATED;
            self.error(&messages::UNTERMINATED_REGULAR_EXPRESSION_LITERAL, self.token_start, self.pos);
        }
        self.token_value = self.token_text().to_string();
        self.token = SyntaxKind::RegularExpressionLiteral;
        self.token
    }

    /// Rescan a `}` closing a template substitution as a template middle or tail.
    pub fn rescan_template_token(&mut self) -> SyntaxKind {
        self.pos = self.token_start;
        self.token_value.clear();
        self.token = self.scan_template(false);
        self.token
    }

    // ========================================================================
    // Literals
    // ========================================================================

    fn scan_string_literal(&mut self, quote: u8) -> SyntaxKind {
        if quote == b'\'' {
            self.token_flags |= TokenFlags::SINGLE_QUOTE;
        }
        self.pos += 1;
        let mut value = String::new();
        loop {
            let rest = &self.text.as_bytes()[self.pos..];
            let stop = memchr3(quote, b'\\', b'\n', rest).unwrap_or(rest.len());
            let stop = memchr(b'\r', &rest[..stop]).unwrap_or(stop);
            value.push_str(&self.text[self.pos..self.pos + stop]);
            self.pos += stop;
            match self.text.as_bytes().get(self.pos).copied() {
                Some(b) if b == quote => {
                    self.pos += 1;
                    break;
                }
                Some(b'\\') => self.scan_escape_sequence(&mut value),
                _ => {
                    self.token_flags |= TokenFlags::UNTERMINATED;
                    self.error(&messages::UNTERMINATED_STRING_LITERAL, self.token_start, self.pos);
                    break;
                }
            }
        }
        self.token_value = value;
        SyntaxKind::StringLiteral
    }

    /// Scan a template part starting at `` ` `` or at the `}` ending a substitution.
    fn scan_template(&mut self, starts_with_backtick: bool) -> SyntaxKind {
        self.pos += 1;
        let content_start = self.pos;
        let mut value = String::new();
        let kind = loop {
            let rest = &self.text.as_bytes()[self.pos..];
            let stop = memchr3(b'`', b'$', b'\\', rest).unwrap_or(rest.len());
            let stop = memchr(b'\r', &rest[..stop]).unwrap_or(stop);
            value.push_str(&self.text[self.pos..self.pos + stop]);
            self.pos += stop;
            match self.text.as_bytes().get(self.pos).copied() {
                None => {
                    self.raw_range = (content_start, self.pos);
                    self.token_flags |= TokenFlags::UNTERMINATED;
                    self.error(&messages::UNTERMINATED_TEMPLATE_LITERAL, self.token_start, self.pos);
                    break if starts_with_backtick {
                        SyntaxKind::NoSubstitutionTemplateLiteral
                    } else {
                        SyntaxKind::TemplateTail
                    };
                }
                Some(b'`') => {
                    self.raw_range = (content_start, self.pos);
                    self.pos += 1;
                    break if starts_with_backtick {
                        SyntaxKind::NoSubstitutionTemplateLiteral
                    } else {
                        SyntaxKind::TemplateTail
                    };
                }
                Some(b'$') if self.peek(1) == b'{' => {
                    self.raw_range = (content_start, self.pos);
                    self.pos += 2;
                    break if starts_with_backtick {
                        SyntaxKind::TemplateHead
                    } else {
                        SyntaxKind::TemplateMiddle
                    };
                }
                Some(b'$') => {
                    value.push('$');
                    self.pos += 1;
                }
                Some(b'\\') => self.scan_escape_sequence(&mut value),
                Some(_) => {
                    // CRLF and lone CR both cook to LF.
                    value.push('\n');
                    self.pos += 1;
                    if self.peek(0) == b'\n' {
                        self.pos += 1;
                    }
                }
            }
        };
        self.token_value = value;
        kind
    }

    /// Cook the escape sequence at the current `\` into `out`.
    fn scan_escape_sequence(&mut self, out: &mut String) {
        let start = self.pos;
        self.pos += 1;
        let Some(ch) = self.current_char() else {
            return;
        };
        self.pos += ch.len_utf8();
        match ch {
            '0' if !self.peek(0).is_ascii_digit() => out.push('\0'),
            'b' => out.push('\u{8}'),
            't' => out.push('\t'),
            'n' => out.push('\n'),
            'v' => out.push('\u{B}'),
            'f' => out.push('\u{C}'),
            'r' => out.push('\r'),
            'x' => match self.scan_hex_digits(2, 2) {
                Some(code) => out.push(char::from_u32(code).unwrap_or('\u{FFFD}')),
                None => self.invalid_escape(start),
            },
            'u' => match self.scan_unicode_escape_body() {
                Some(c) => out.push(c),
                None => self.invalid_escape(start),
            },
            '\r' => {
                if self.peek(0) == b'\n' {
                    self.pos += 1;
                }
            }
            '\n' | '\u{2028}' | '\u{2029}' => {}
            other => out.push(other),
        }
    }

    fn invalid_escape(&mut self, start: usize) {
        self.token_flags |= TokenFlags::CONTAINS_INVALID_ESCAPE;
        self.error(&messages::HEXADECIMAL_DIGIT_EXPECTED, start, self.pos);
    }

    /// Decode what follows `\u`: either `{hex}` or four hex digits. A high
    /// surrogate followed by an escaped low surrogate decodes to one char.
    fn scan_unicode_escape_body(&mut self) -> Option<char> {
        if self.peek(0) == b'{' {
            self.pos += 1;
            let code = self.scan_hex_digits(1, 6)?;
            if self.peek(0) != b'}' {
                return None;
            }
            self.pos += 1;
            self.token_flags |= TokenFlags::EXTENDED_UNICODE_ESCAPE;
            return Some(char::from_u32(code).unwrap_or('\u{FFFD}'));
        }
        let code = self.scan_hex_digits(4, 4)?;
        if (0xD800..=0xDBFF).contains(&code) {
            let low = self.try_scan(|s| {
                if s.peek(0) != b'\\' || s.peek(1) != b'u' {
                    return None;
                }
                s.pos += 2;
                s.scan_hex_digits(4, 4).filter(|lo| (0xDC00..=0xDFFF).contains(lo))
            });
            if let Some(low) = low {
                let combined = 0x10000 + ((code - 0xD800) << 10) + (low - 0xDC00);
                return Some(char::from_u32(combined).unwrap_or('\u{FFFD}'));
            }
        }
        Some(char::from_u32(code).unwrap_or('\u{FFFD}'))
    }

    /// Read between `min` and `max` hex digits as a code point value.
    fn scan_hex_digits(&mut self, min: usize, max: usize) -> Option<u32> {
        let mut value: u32 = 0;
        let mut count = 0;
        while count < max {
            let Some(digit) = (self.peek(0) as char).to_digit(16) else {
                break;
            };
            value = value * 16 + digit;
            count += 1;
            self.pos += 1;
        }
        (count >= min).then_some(value)
    }

    fn scan_number(&mut self) -> SyntaxKind {
        let start = self.pos;
        if self.peek(0) == b'0' {
            let radix: Option<(TokenFlags, fn(u8) -> bool, &DiagnosticMessage)> = match self.peek(1) {
                b'x' | b'X' => Some((TokenFlags::HEX_SPECIFIER, is_hex_digit as fn(u8) -> bool, &messages::HEXADECIMAL_DIGIT_EXPECTED)),
                b'b' | b'B' => Some((TokenFlags::BINARY_SPECIFIER, is_binary_digit as fn(u8) -> bool, &messages::DIGIT_EXPECTED)),
                b'o' | b'O' => Some((TokenFlags::OCTAL_SPECIFIER, is_octal_digit as fn(u8) -> bool, &messages::DIGIT_EXPECTED)),
                _ => None,
            };
            if let Some((flag, is_digit, message)) = radix {
                self.pos += 2;
                self.token_flags |= flag;
                if self.scan_digits(is_digit) == 0 {
                    self.error(message, start, self.pos);
                }
                return self.finish_number(start, true);
            }
        }

        let int_start = self.pos;
        let int_digits = self.scan_digits(is_decimal_digit);
        let int_text = &self.text.as_bytes()[int_start..self.pos];
        if int_digits > 1 && int_text[0] == b'0' && int_text.iter().all(|b| is_octal_digit(*b)) {
            self.token_flags |= TokenFlags::OCTAL;
        }

        let mut is_integer = true;
        if self.peek(0) == b'.' {
            self.pos += 1;
            self.scan_digits(is_decimal_digit);
            is_integer = false;
        }
        if matches!(self.peek(0), b'e' | b'E') {
            let exponent_start = self.pos;
            self.pos += 1;
            if matches!(self.peek(0), b'+' | b'-') {
                self.pos += 1;
            }
            if self.scan_digits(is_decimal_digit) == 0 {
                self.error(&messages::DIGIT_EXPECTED, exponent_start, self.pos);
            }
            self.token_flags |= TokenFlags::SCIENTIFIC;
            is_integer = false;
        }
        self.finish_number(start, is_integer)
    }

    fn finish_number(&mut self, start: usize, allow_big_int: bool) -> SyntaxKind {
        let kind = if allow_big_int && self.peek(0) == b'n' {
            self.pos += 1;
            SyntaxKind::BigIntLiteral
        } else {
            SyntaxKind::NumericLiteral
        };
        self.token_value = self.text[start..self.pos].to_string();
        kind
    }

    /// Scan a run of digits with `_` separators, returning the digit count.
    fn scan_digits(&mut self, is_digit: fn(u8) -> bool) -> usize {
        let mut count = 0;
        let mut after_digit = false;
        loop {
            let b = self.peek(0);
            if is_digit(b) {
                count += 1;
                after_digit = true;
                self.pos += 1;
            } else if b == b'_' && count > 0 {
                if after_digit && is_digit(self.peek(1)) {
                    self.token_flags |= TokenFlags::CONTAINS_SEPARATOR;
                } else {
                    self.error(&messages::NUMERIC_SEPARATORS_ARE_NOT_ALLOWED_HERE, self.pos, self.pos + 1);
                }
                after_digit = false;
                self.pos += 1;
            } else {
                return count;
            }
        }
    }

    // ========================================================================
    // Identifiers
    // ========================================================================

    fn scan_identifier(&mut self) -> SyntaxKind {
        let mut name = std::mem::take(&mut self.token_value);
        let mut has_escape = false;
        loop {
            let first = name.is_empty();
            match self.current_char() {
                Some('\\') => {
                    let start = self.pos;
                    let escaped = if self.peek(1) == b'u' {
                        self.pos += 2;
                        self.scan_unicode_escape_body()
                    } else {
                        self.pos += 1;
                        None
                    };
                    match escaped {
                        Some(c) if (first && is_identifier_start(c)) || (!first && is_identifier_part(c)) => {
                            name.push(c);
                            has_escape = true;
                        }
                        _ => {
                            self.error(&messages::INVALID_CHARACTER, start, self.pos);
                            if first {
                                self.token_value = name;
                                return SyntaxKind::Unknown;
                            }
                            break;
                        }
                    }
                }
                Some(c) if (first && is_identifier_start(c)) || (!first && is_identifier_part(c)) => {
                    name.push(c);
                    self.pos += c.len_utf8();
                }
                _ => break,
            }
        }
        let keyword = if has_escape { None } else { SyntaxKind::from_keyword(&name) };
        self.token_value = name;
        keyword.unwrap_or(SyntaxKind::Identifier)
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    /// The byte at `pos + offset`, or 0 past the end.
    #[inline]
    fn peek(&self, offset: usize) -> u8 {
        self.text.as_bytes().get(self.pos + offset).copied().unwrap_or(0)
    }

    #[inline]
    fn current_char(&self) -> Option<char> {
        self.text.get(self.pos..).and_then(|rest| rest.chars().next())
    }

    fn error(&mut self, message: &DiagnosticMessage, start: usize, end: usize) {
        let span = TextSpan::from_bounds(start as u32, end as u32);
        self.diagnostics.add(Diagnostic::new(message, &[]).at(span));
    }
}

/// Scan `text` to the end. Without a parser driving it, `/` is never
/// rescanned as a regular expression and `>` is never merged.
pub fn tokenize(text: &str) -> (Vec<TokenInfo>, DiagnosticCollection) {
    let mut scanner = Scanner::new(text);
    scanner.skip_shebang();
    let mut tokens = Vec::new();
    while scanner.scan() != SyntaxKind::EndOfFileToken {
        tokens.push(scanner.token_info());
    }
    (tokens, scanner.take_diagnostics())
}

pub fn is_identifier_start(ch: char) -> bool {
    if ch.is_ascii() {
        ch.is_ascii_alphabetic() || ch == '$' || ch == '_'
    } else {
        UnicodeXID::is_xid_start(ch)
    }
}

pub fn is_identifier_part(ch: char) -> bool {
    if ch.is_ascii() {
        ch.is_ascii_alphanumeric() || ch == '$' || ch == '_'
    } else {
        UnicodeXID::is_xid_continue(ch) || ch == '\u{200C}' || ch == '\u{200D}'
    }
}

/// Whether `text` is a single identifier, reserved words included.
pub fn is_identifier_text(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) if is_identifier_start(first) => chars.all(is_identifier_part),
        _ => false,
    }
}

fn is_white_space_single_line(ch: char) -> bool {
    matches!(
        ch,
        ' ' | '\t'
            | '\u{B}'
            | '\u{C}'
            | '\u{A0}'
            | '\u{85}'
            | '\u{1680}'
            | '\u{2000}'..='\u{200A}'
            | '\u{202F}'
            | '\u{205F}'
            | '\u{3000}'
            | '\u{FEFF}'
    )
}

fn is_decimal_digit(b: u8) -> bool {
    b.is_ascii_digit()
}

fn is_hex_digit(b: u8) -> bool {
    b.is_ascii_hexdigit()
}

fn is_binary_digit(b: u8) -> bool {
    b == b'0' || b == b'1'
}

fn is_octal_digit(b: u8) -> bool {
    (b'0'..=b'7').contains(&b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_simple_tokens() {
        let mut scanner = Scanner::new("( ) { } [ ] ; , : @");
        assert_eq!(scanner.scan(), SyntaxKind::OpenParenToken);
        assert_eq!(scanner.scan(), SyntaxKind::CloseParenToken);
        assert_eq!(scanner.scan(), SyntaxKind::OpenBraceToken);
        assert_eq!(scanner.scan(), SyntaxKind::CloseBraceToken);
        assert_eq!(scanner.scan(), SyntaxKind::OpenBracketToken);
        assert_eq!(scanner.scan(), SyntaxKind::CloseBracketToken);
        assert_eq!(scanner.scan(), SyntaxKind::SemicolonToken);
        assert_eq!(scanner.scan(), SyntaxKind::CommaToken);
        assert_eq!(scanner.scan(), SyntaxKind::ColonToken);
        assert_eq!(scanner.scan(), SyntaxKind::AtToken);
        assert_eq!(scanner.scan(), SyntaxKind::EndOfFileToken);
    }

    #[test]
    fn test_scan_operators() {
        let mut scanner = Scanner::new("=== !== => ?. ?? ??= ** &&= ||");
        assert_eq!(scanner.scan(), SyntaxKind::EqualsEqualsEqualsToken);
        assert_eq!(scanner.scan(), SyntaxKind::ExclamationEqualsEqualsToken);
        assert_eq!(scanner.scan(), SyntaxKind::EqualsGreaterThanToken);
        assert_eq!(scanner.scan(), SyntaxKind::QuestionDotToken);
        assert_eq!(scanner.scan(), SyntaxKind::QuestionQuestionToken);
        assert_eq!(scanner.scan(), SyntaxKind::QuestionQuestionEqualsToken);
        assert_eq!(scanner.scan(), SyntaxKind::AsteriskAsteriskToken);
        assert_eq!(scanner.scan(), SyntaxKind::AmpersandAmpersandEqualsToken);
        assert_eq!(scanner.scan(), SyntaxKind::BarBarToken);
    }

    #[test]
    fn test_question_dot_before_digit() {
        let mut scanner = Scanner::new("a?.5:1");
        assert_eq!(scanner.scan(), SyntaxKind::Identifier);
        assert_eq!(scanner.scan(), SyntaxKind::QuestionToken);
        assert_eq!(scanner.scan(), SyntaxKind::NumericLiteral);
        assert_eq!(scanner.token_value(), ".5");
    }

    #[test]
    fn test_keyword_and_identifier() {
        let mut scanner = Scanner::new("const myVar async");
        assert_eq!(scanner.scan(), SyntaxKind::ConstKeyword);
        assert_eq!(scanner.scan(), SyntaxKind::Identifier);
        assert_eq!(scanner.token_value(), "myVar");
        assert_eq!(scanner.scan(), SyntaxKind::AsyncKeyword);
    }

    #[test]
    fn test_string_escapes_are_cooked() {
        let mut scanner = Scanner::new(r#""a\nb\x41B\u{43}\'""#);
        assert_eq!(scanner.scan(), SyntaxKind::StringLiteral);
        assert_eq!(scanner.token_value(), "a\nbABC'");
        assert!(scanner.diagnostics().is_empty());
    }

    #[test]
    fn test_unterminated_string() {
        let mut scanner = Scanner::new("'abc\nx");
        assert_eq!(scanner.scan(), SyntaxKind::StringLiteral);
        assert_eq!(scanner.token_value(), "abc");
        assert!(scanner.token_flags().contains(TokenFlags::UNTERMINATED));
        assert_eq!(scanner.diagnostics().diagnostics()[0].code, 1002);
        assert_eq!(scanner.scan(), SyntaxKind::Identifier);
        assert!(scanner.has_preceding_line_break());
    }

    #[test]
    fn test_template_parts() {
        let mut scanner = Scanner::new("`a${x}b${y}c`");
        assert_eq!(scanner.scan(), SyntaxKind::TemplateHead);
        assert_eq!(scanner.token_value(), "a");
        assert_eq!(scanner.scan(), SyntaxKind::Identifier);
        assert_eq!(scanner.scan(), SyntaxKind::CloseBraceToken);
        assert_eq!(scanner.rescan_template_token(), SyntaxKind::TemplateMiddle);
        assert_eq!(scanner.token_value(), "b");
        assert_eq!(scanner.scan(), SyntaxKind::Identifier);
        assert_eq!(scanner.scan(), SyntaxKind::CloseBraceToken);
        assert_eq!(scanner.rescan_template_token(), SyntaxKind::TemplateTail);
        assert_eq!(scanner.token_value(), "c");
        assert_eq!(scanner.scan(), SyntaxKind::EndOfFileToken);
    }

    #[test]
    fn test_template_raw_text() {
        let mut scanner = Scanner::new(r"`a\tb`");
        assert_eq!(scanner.scan(), SyntaxKind::NoSubstitutionTemplateLiteral);
        assert_eq!(scanner.token_value(), "a\tb");
        assert_eq!(scanner.token_raw_text(), r"a\tb");
    }

    #[test]
    fn test_numbers() {
        let mut scanner = Scanner::new("1_000 0x1F 1e3 10n 0777");
        assert_eq!(scanner.scan(), SyntaxKind::NumericLiteral);
        assert_eq!(scanner.token_value(), "1_000");
        assert!(scanner.token_flags().contains(TokenFlags::CONTAINS_SEPARATOR));
        assert_eq!(scanner.scan(), SyntaxKind::NumericLiteral);
        assert!(scanner.token_flags().contains(TokenFlags::HEX_SPECIFIER));
        assert_eq!(scanner.scan(), SyntaxKind::NumericLiteral);
        assert!(scanner.token_flags().contains(TokenFlags::SCIENTIFIC));
        assert_eq!(scanner.scan(), SyntaxKind::BigIntLiteral);
        assert_eq!(scanner.token_value(), "10n");
        assert_eq!(scanner.scan(), SyntaxKind::NumericLiteral);
        assert!(scanner.token_flags().contains(TokenFlags::OCTAL));
    }

    #[test]
    fn test_rescan_greater_than() {
        let mut scanner = Scanner::new("a >>>= b");
        scanner.scan();
        assert_eq!(scanner.scan(), SyntaxKind::GreaterThanToken);
        assert_eq!(
            scanner.rescan_greater_than_token(),
            SyntaxKind::GreaterThanGreaterThanGreaterThanEqualsToken
        );
        assert_eq!(scanner.scan(), SyntaxKind::Identifier);
    }

    #[test]
    fn test_rescan_slash_as_regex() {
        let mut scanner = Scanner::new("/[/]a\\/b/gi;");
        assert_eq!(scanner.scan(), SyntaxKind::SlashToken);
        assert_eq!(scanner.rescan_slash_token(), SyntaxKind::RegularExpressionLiteral);
        assert_eq!(scanner.token_value(), "/[/]a\\/b/gi");
        assert_eq!(scanner.scan(), SyntaxKind::SemicolonToken);
    }

    #[test]
    fn test_comments_and_line_breaks() {
        let mut scanner = Scanner::new("a /* x\n */ b // tail\nc /* same line */ d");
        assert_eq!(scanner.scan(), SyntaxKind::Identifier);
        assert_eq!(scanner.scan(), SyntaxKind::Identifier);
        assert!(scanner.has_preceding_line_break());
        assert_eq!(scanner.scan(), SyntaxKind::Identifier);
        assert!(scanner.has_preceding_line_break());
        assert_eq!(scanner.scan(), SyntaxKind::Identifier);
        assert!(!scanner.has_preceding_line_break());
    }

    #[test]
    fn test_look_ahead_restores_state() {
        let mut scanner = Scanner::new("a b c");
        scanner.scan();
        let next = scanner.look_ahead(|s| {
            s.scan();
            s.scan()
        });
        assert_eq!(next, SyntaxKind::Identifier);
        assert_eq!(scanner.token_value(), "a");
        assert_eq!(scanner.token_end(), 1);
    }

    #[test]
    fn test_private_identifier_and_unicode() {
        let mut scanner = Scanner::new("#count café");
        assert_eq!(scanner.scan(), SyntaxKind::PrivateIdentifier);
        assert_eq!(scanner.token_value(), "#count");
        assert_eq!(scanner.scan(), SyntaxKind::Identifier);
        assert_eq!(scanner.token_value(), "café");
        assert_eq!(scanner.token_end(), "#count café".len());
    }

    #[test]
    fn test_is_identifier_text() {
        assert!(is_identifier_text("fooBar"));
        assert!(is_identifier_text("$_1"));
        assert!(!is_identifier_text("1abc"));
        assert!(!is_identifier_text("a-b"));
        assert!(!is_identifier_text(""));
    }
}
