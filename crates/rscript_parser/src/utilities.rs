//! Token classification used for lookahead and error recovery.

use rscript_ast::syntax_kind::SyntaxKind;

/// Whether a token of this kind can be used as a binding or reference name.
///
/// Contextual keywords (`type`, `as`, `async`, ...) and the strict-mode
/// reserved words are scanned as keywords but remain valid identifiers.
#[inline]
pub fn is_identifier_kind(kind: SyntaxKind) -> bool {
    kind == SyntaxKind::Identifier || (kind.is_keyword() && !kind.is_reserved_word())
}

/// Whether a token of this kind can start a statement.
pub fn can_start_statement(kind: SyntaxKind) -> bool {
    if is_identifier_kind(kind) {
        return true;
    }
    matches!(
        kind,
        SyntaxKind::OpenBraceToken
            | SyntaxKind::SemicolonToken
            | SyntaxKind::AtToken
            | SyntaxKind::VarKeyword
            | SyntaxKind::ConstKeyword
            | SyntaxKind::FunctionKeyword
            | SyntaxKind::ClassKeyword
            | SyntaxKind::EnumKeyword
            | SyntaxKind::IfKeyword
            | SyntaxKind::DoKeyword
            | SyntaxKind::WhileKeyword
            | SyntaxKind::ForKeyword
            | SyntaxKind::ContinueKeyword
            | SyntaxKind::BreakKeyword
            | SyntaxKind::ReturnKeyword
            | SyntaxKind::SwitchKeyword
            | SyntaxKind::ThrowKeyword
            | SyntaxKind::TryKeyword
            | SyntaxKind::DebuggerKeyword
            | SyntaxKind::ExportKeyword
            | SyntaxKind::ImportKeyword
    ) || can_start_expression(kind)
}

/// Whether a token of this kind can start an expression.
pub fn can_start_expression(kind: SyntaxKind) -> bool {
    if is_identifier_kind(kind) {
        return true;
    }
    matches!(
        kind,
        SyntaxKind::NumericLiteral
            | SyntaxKind::BigIntLiteral
            | SyntaxKind::StringLiteral
            | SyntaxKind::NoSubstitutionTemplateLiteral
            | SyntaxKind::TemplateHead
            | SyntaxKind::PrivateIdentifier
            | SyntaxKind::OpenParenToken
            | SyntaxKind::OpenBracketToken
            | SyntaxKind::OpenBraceToken
            | SyntaxKind::LessThanToken
            | SyntaxKind::PlusToken
            | SyntaxKind::MinusToken
            | SyntaxKind::TildeToken
            | SyntaxKind::ExclamationToken
            | SyntaxKind::PlusPlusToken
            | SyntaxKind::MinusMinusToken
            | SyntaxKind::SlashToken
            | SyntaxKind::SlashEqualsToken
            | SyntaxKind::AtToken
            | SyntaxKind::FunctionKeyword
            | SyntaxKind::ClassKeyword
            | SyntaxKind::NewKeyword
            | SyntaxKind::DeleteKeyword
            | SyntaxKind::TypeOfKeyword
            | SyntaxKind::VoidKeyword
            | SyntaxKind::SuperKeyword
            | SyntaxKind::ThisKeyword
            | SyntaxKind::TrueKeyword
            | SyntaxKind::FalseKeyword
            | SyntaxKind::NullKeyword
            | SyntaxKind::ImportKeyword
    )
}

/// Tokens where skipping stops after a statement failed to parse.
pub fn is_statement_recovery_point(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::VarKeyword
            | SyntaxKind::LetKeyword
            | SyntaxKind::ConstKeyword
            | SyntaxKind::FunctionKeyword
            | SyntaxKind::ClassKeyword
            | SyntaxKind::InterfaceKeyword
            | SyntaxKind::EnumKeyword
            | SyntaxKind::TypeKeyword
            | SyntaxKind::IfKeyword
            | SyntaxKind::ForKeyword
            | SyntaxKind::WhileKeyword
            | SyntaxKind::DoKeyword
            | SyntaxKind::SwitchKeyword
            | SyntaxKind::ReturnKeyword
            | SyntaxKind::ThrowKeyword
            | SyntaxKind::TryKeyword
            | SyntaxKind::BreakKeyword
            | SyntaxKind::ContinueKeyword
            | SyntaxKind::ExportKeyword
            | SyntaxKind::ImportKeyword
            | SyntaxKind::DeclareKeyword
            | SyntaxKind::NamespaceKeyword
            | SyntaxKind::AtToken
    )
}

/// Tokens that end a comma-separated list even when no closing token was seen.
pub fn is_list_breaker(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::SemicolonToken
            | SyntaxKind::CloseBraceToken
            | SyntaxKind::CloseParenToken
            | SyntaxKind::CloseBracketToken
            | SyntaxKind::EqualsGreaterThanToken
            | SyntaxKind::EndOfFileToken
    )
}
