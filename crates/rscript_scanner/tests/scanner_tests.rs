//! Scanner integration tests.
//!
//! Token streams for the declaration shapes the query layer reads: exports,
//! object literals, interfaces and type annotations.

use rscript_ast::syntax_kind::SyntaxKind;
use rscript_ast::types::TokenFlags;
use rscript_scanner::{tokenize, Scanner};

/// Helper: scan all tokens from source and return as (kind, value) pairs.
fn scan_all(source: &str) -> Vec<(SyntaxKind, String)> {
    let mut scanner = Scanner::new(source);
    let mut tokens = Vec::new();
    loop {
        let kind = scanner.scan();
        if kind == SyntaxKind::EndOfFileToken {
            break;
        }
        tokens.push((kind, scanner.token_value().to_string()));
    }
    tokens
}

/// Helper: scan all token kinds.
fn scan_kinds(source: &str) -> Vec<SyntaxKind> {
    scan_all(source).into_iter().map(|(k, _)| k).collect()
}

// ============================================================================
// Trivia
// ============================================================================

#[test]
fn test_empty_and_whitespace_source() {
    assert!(scan_all("").is_empty());
    assert!(scan_all("   \n\t  \u{FEFF}").is_empty());
    assert!(scan_all("// only a comment").is_empty());
    assert!(scan_all("/* block */").is_empty());
}

#[test]
fn test_shebang_skipping() {
    let (tokens, diagnostics) = tokenize("#!/usr/bin/env node\nlet x");
    assert!(diagnostics.is_empty());
    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[0].kind, SyntaxKind::LetKeyword);
    assert!(tokens[0].has_preceding_line_break());
}

#[test]
fn test_unterminated_block_comment() {
    let mut scanner = Scanner::new("a /* never closed");
    assert_eq!(scanner.scan(), SyntaxKind::Identifier);
    assert_eq!(scanner.scan(), SyntaxKind::EndOfFileToken);
    assert_eq!(scanner.diagnostics().diagnostics()[0].code, 1010);
}

#[test]
fn test_token_positions_exclude_trivia() {
    let mut scanner = Scanner::new("  /* c */ foo");
    scanner.scan();
    assert_eq!(scanner.full_start(), 0);
    assert_eq!(scanner.token_start(), 10);
    assert_eq!(scanner.token_end(), 13);
    assert_eq!(scanner.token_text(), "foo");
}

// ============================================================================
// Declarations
// ============================================================================

#[test]
fn test_export_declaration_tokens() {
    assert_eq!(
        scan_kinds("export default async function handler() {}"),
        vec![
            SyntaxKind::ExportKeyword,
            SyntaxKind::DefaultKeyword,
            SyntaxKind::AsyncKeyword,
            SyntaxKind::FunctionKeyword,
            SyntaxKind::Identifier,
            SyntaxKind::OpenParenToken,
            SyntaxKind::CloseParenToken,
            SyntaxKind::OpenBraceToken,
            SyntaxKind::CloseBraceToken,
        ]
    );
}

#[test]
fn test_interface_tokens() {
    assert_eq!(
        scan_kinds("interface Props { readonly id?: number; }"),
        vec![
            SyntaxKind::InterfaceKeyword,
            SyntaxKind::Identifier,
            SyntaxKind::OpenBraceToken,
            SyntaxKind::ReadonlyKeyword,
            SyntaxKind::Identifier,
            SyntaxKind::QuestionToken,
            SyntaxKind::ColonToken,
            SyntaxKind::NumberKeyword,
            SyntaxKind::SemicolonToken,
            SyntaxKind::CloseBraceToken,
        ]
    );
}

#[test]
fn test_object_literal_tokens() {
    let tokens = scan_all("{ key: 'v', [computed]: 1, ...rest }");
    let kinds: Vec<_> = tokens.iter().map(|(k, _)| *k).collect();
    assert_eq!(
        kinds,
        vec![
            SyntaxKind::OpenBraceToken,
            SyntaxKind::Identifier,
            SyntaxKind::ColonToken,
            SyntaxKind::StringLiteral,
            SyntaxKind::CommaToken,
            SyntaxKind::OpenBracketToken,
            SyntaxKind::Identifier,
            SyntaxKind::CloseBracketToken,
            SyntaxKind::ColonToken,
            SyntaxKind::NumericLiteral,
            SyntaxKind::CommaToken,
            SyntaxKind::DotDotDotToken,
            SyntaxKind::Identifier,
            SyntaxKind::CloseBraceToken,
        ]
    );
    assert_eq!(tokens[3].1, "v");
}

#[test]
fn test_contextual_keywords_are_keywords() {
    let kinds = scan_kinds("type satisfies keyof infer unique declare namespace");
    assert_eq!(
        kinds,
        vec![
            SyntaxKind::TypeKeyword,
            SyntaxKind::SatisfiesKeyword,
            SyntaxKind::KeyOfKeyword,
            SyntaxKind::InferKeyword,
            SyntaxKind::UniqueKeyword,
            SyntaxKind::DeclareKeyword,
            SyntaxKind::NamespaceKeyword,
        ]
    );
}

#[test]
fn test_escaped_keyword_is_identifier() {
    let tokens = scan_all(r"\u0063onst");
    assert_eq!(tokens, vec![(SyntaxKind::Identifier, "const".to_string())]);
}

// ============================================================================
// Literals
// ============================================================================

#[test]
fn test_string_literal_quotes() {
    let mut scanner = Scanner::new(r#"'single' "double""#);
    scanner.scan();
    assert!(scanner.token_flags().contains(TokenFlags::SINGLE_QUOTE));
    assert_eq!(scanner.token_value(), "single");
    scanner.scan();
    assert!(!scanner.token_flags().contains(TokenFlags::SINGLE_QUOTE));
    assert_eq!(scanner.token_value(), "double");
}

#[test]
fn test_surrogate_pair_escape() {
    let tokens = scan_all(r#""\uD83D\uDE00""#);
    assert_eq!(tokens[0].1, "\u{1F600}");
}

#[test]
fn test_line_continuation_in_string() {
    let tokens = scan_all("'a\\\nb'");
    assert_eq!(tokens, vec![(SyntaxKind::StringLiteral, "ab".to_string())]);
}

#[test]
fn test_invalid_hex_escape() {
    let mut scanner = Scanner::new(r#""\xZZ""#);
    assert_eq!(scanner.scan(), SyntaxKind::StringLiteral);
    assert!(scanner.token_flags().contains(TokenFlags::CONTAINS_INVALID_ESCAPE));
    assert_eq!(scanner.diagnostics().diagnostics()[0].code, 1125);
}

#[test]
fn test_no_substitution_template() {
    let tokens = scan_all("`hello ${'$'} world`");
    assert_eq!(tokens[0], (SyntaxKind::TemplateHead, "hello ".to_string()));
    assert_eq!(tokens[1], (SyntaxKind::StringLiteral, "$".to_string()));

    let tokens = scan_all("`cost: $5`");
    assert_eq!(
        tokens,
        vec![(SyntaxKind::NoSubstitutionTemplateLiteral, "cost: $5".to_string())]
    );
}

#[test]
fn test_template_crlf_is_normalized() {
    let tokens = scan_all("`a\r\nb`");
    assert_eq!(tokens[0].1, "a\nb");
}

#[test]
fn test_numeric_literal_values() {
    let tokens = scan_all("42 3.14 .5 1e-7 0b1010 0o77 0xFF_FF");
    let values: Vec<_> = tokens.iter().map(|(_, v)| v.as_str()).collect();
    assert_eq!(values, vec!["42", "3.14", ".5", "1e-7", "0b1010", "0o77", "0xFF_FF"]);
    assert!(tokens.iter().all(|(k, _)| *k == SyntaxKind::NumericLiteral));
}

#[test]
fn test_bigint_literals() {
    assert_eq!(
        scan_all("0n 0x1Fn 123n"),
        vec![
            (SyntaxKind::BigIntLiteral, "0n".to_string()),
            (SyntaxKind::BigIntLiteral, "0x1Fn".to_string()),
            (SyntaxKind::BigIntLiteral, "123n".to_string()),
        ]
    );
}

#[test]
fn test_misplaced_numeric_separator() {
    let mut scanner = Scanner::new("1__0");
    assert_eq!(scanner.scan(), SyntaxKind::NumericLiteral);
    assert_eq!(scanner.diagnostics().diagnostics()[0].code, 6188);
}

#[test]
fn test_missing_exponent_digits() {
    let mut scanner = Scanner::new("1e+");
    assert_eq!(scanner.scan(), SyntaxKind::NumericLiteral);
    assert_eq!(scanner.diagnostics().diagnostics()[0].code, 1124);
}

// ============================================================================
// Operators
// ============================================================================

#[test]
fn test_shift_tokens_need_rescan() {
    assert_eq!(
        scan_kinds("a >> b"),
        vec![
            SyntaxKind::Identifier,
            SyntaxKind::GreaterThanToken,
            SyntaxKind::GreaterThanToken,
            SyntaxKind::Identifier,
        ]
    );
    let mut scanner = Scanner::new(">=");
    scanner.scan();
    assert_eq!(scanner.rescan_greater_than_token(), SyntaxKind::GreaterThanEqualsToken);
    assert_eq!(scanner.token_end(), 2);
}

#[test]
fn test_invalid_character() {
    let mut scanner = Scanner::new("a ¤ b");
    assert_eq!(scanner.scan(), SyntaxKind::Identifier);
    assert_eq!(scanner.scan(), SyntaxKind::Unknown);
    assert_eq!(scanner.scan(), SyntaxKind::Identifier);
    assert_eq!(scanner.diagnostics().error_count(), 1);
}

#[test]
fn test_try_scan_discards_diagnostics_on_failure() {
    let mut scanner = Scanner::new("x 'open");
    scanner.scan();
    let result: Option<()> = scanner.try_scan(|s| {
        s.scan();
        None
    });
    assert!(result.is_none());
    assert!(scanner.diagnostics().is_empty());
    assert_eq!(scanner.token_value(), "x");
}

#[test]
fn test_valid_source_has_no_diagnostics() {
    let source = r#"
        export const config = { runtime: "edge", regions: ['iad1'], maxDuration: 10 };
        export async function GET(req: Request): Promise<Response> {
            return new Response("ok", { status: 200 });
        }
    "#;
    let (tokens, diagnostics) = tokenize(source);
    assert!(diagnostics.is_empty());
    assert!(tokens.iter().all(|t| t.kind != SyntaxKind::Unknown));
    assert!(tokens.iter().all(|t| !t.is_empty()));
}
