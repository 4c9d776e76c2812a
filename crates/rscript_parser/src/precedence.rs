//! Binary operator precedence.

use rscript_ast::syntax_kind::SyntaxKind;

/// Precedence of binary operators, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum OperatorPrecedence {
    /// Comma, the floor every binary parse starts from.
    Lowest = 0,
    NullishCoalescing,
    LogicalOr,
    LogicalAnd,
    BitwiseOr,
    BitwiseXor,
    BitwiseAnd,
    Equality,
    Relational,
    Shift,
    Additive,
    Multiplicative,
    Exponentiation,
    /// Not a binary operator.
    Invalid = 255,
}

/// Precedence of `kind` when it appears between two operands.
pub fn get_binary_operator_precedence(kind: SyntaxKind) -> OperatorPrecedence {
    match kind {
        SyntaxKind::QuestionQuestionToken => OperatorPrecedence::NullishCoalescing,
        SyntaxKind::BarBarToken => OperatorPrecedence::LogicalOr,
        SyntaxKind::AmpersandAmpersandToken => OperatorPrecedence::LogicalAnd,
        SyntaxKind::BarToken => OperatorPrecedence::BitwiseOr,
        SyntaxKind::CaretToken => OperatorPrecedence::BitwiseXor,
        SyntaxKind::AmpersandToken => OperatorPrecedence::BitwiseAnd,
        SyntaxKind::EqualsEqualsToken
        | SyntaxKind::ExclamationEqualsToken
        | SyntaxKind::EqualsEqualsEqualsToken
        | SyntaxKind::ExclamationEqualsEqualsToken => OperatorPrecedence::Equality,
        SyntaxKind::LessThanToken
        | SyntaxKind::GreaterThanToken
        | SyntaxKind::LessThanEqualsToken
        | SyntaxKind::GreaterThanEqualsToken
        | SyntaxKind::InstanceOfKeyword
        | SyntaxKind::InKeyword
        | SyntaxKind::AsKeyword
        | SyntaxKind::SatisfiesKeyword => OperatorPrecedence::Relational,
        SyntaxKind::LessThanLessThanToken
        | SyntaxKind::GreaterThanGreaterThanToken
        | SyntaxKind::GreaterThanGreaterThanGreaterThanToken => OperatorPrecedence::Shift,
        SyntaxKind::PlusToken | SyntaxKind::MinusToken => OperatorPrecedence::Additive,
        SyntaxKind::AsteriskToken | SyntaxKind::SlashToken | SyntaxKind::PercentToken => {
            OperatorPrecedence::Multiplicative
        }
        SyntaxKind::AsteriskAsteriskToken => OperatorPrecedence::Exponentiation,
        _ => OperatorPrecedence::Invalid,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precedence_ordering() {
        let add = get_binary_operator_precedence(SyntaxKind::PlusToken);
        let mul = get_binary_operator_precedence(SyntaxKind::AsteriskToken);
        let or = get_binary_operator_precedence(SyntaxKind::BarBarToken);
        let coalesce = get_binary_operator_precedence(SyntaxKind::QuestionQuestionToken);
        assert!(mul > add);
        assert!(add > or);
        assert!(or > coalesce);
        assert!(coalesce > OperatorPrecedence::Lowest);
    }

    #[test]
    fn test_non_operators_are_invalid() {
        assert_eq!(
            get_binary_operator_precedence(SyntaxKind::EqualsToken),
            OperatorPrecedence::Invalid
        );
        assert_eq!(
            get_binary_operator_precedence(SyntaxKind::Identifier),
            OperatorPrecedence::Invalid
        );
    }
}
