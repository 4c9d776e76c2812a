//! Flag types and id newtypes shared by the parser, binder and checker.

use crate::syntax_kind::SyntaxKind;
use std::fmt;

bitflags::bitflags! {
    /// Flags for AST nodes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct NodeFlags: u32 {
        const NONE                 = 0;
        const LET                  = 1 << 0;
        const CONST                = 1 << 1;
        const NAMESPACE            = 1 << 2;
        const OPTIONAL_CHAIN       = 1 << 3;
        const GLOBAL_AUGMENTATION  = 1 << 4;
        const AWAIT_CONTEXT        = 1 << 5;
        const YIELD_CONTEXT        = 1 << 6;
        const AMBIENT              = 1 << 7;
        /// The parser reported an error inside this node.
        const THIS_NODE_HAS_ERROR  = 1 << 8;

        const BLOCK_SCOPED = Self::LET.bits() | Self::CONST.bits();
    }
}

bitflags::bitflags! {
    /// Modifier flags for declarations and class members.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ModifierFlags: u32 {
        const NONE      = 0;
        const EXPORT    = 1 << 0;
        const AMBIENT   = 1 << 1;
        const PUBLIC    = 1 << 2;
        const PRIVATE   = 1 << 3;
        const PROTECTED = 1 << 4;
        const STATIC    = 1 << 5;
        const READONLY  = 1 << 6;
        const ACCESSOR  = 1 << 7;
        const ABSTRACT  = 1 << 8;
        const ASYNC     = 1 << 9;
        const DEFAULT   = 1 << 10;
        const CONST     = 1 << 11;
        const OVERRIDE  = 1 << 12;

        const ACCESSIBILITY_MODIFIER = Self::PUBLIC.bits() | Self::PRIVATE.bits() | Self::PROTECTED.bits();
        const EXPORT_DEFAULT = Self::EXPORT.bits() | Self::DEFAULT.bits();
    }
}

impl ModifierFlags {
    /// The flag set by a modifier keyword, or `NONE` for non-modifier kinds.
    pub fn from_modifier_kind(kind: SyntaxKind) -> ModifierFlags {
        match kind {
            SyntaxKind::ExportKeyword => ModifierFlags::EXPORT,
            SyntaxKind::DeclareKeyword => ModifierFlags::AMBIENT,
            SyntaxKind::PublicKeyword => ModifierFlags::PUBLIC,
            SyntaxKind::PrivateKeyword => ModifierFlags::PRIVATE,
            SyntaxKind::ProtectedKeyword => ModifierFlags::PROTECTED,
            SyntaxKind::StaticKeyword => ModifierFlags::STATIC,
            SyntaxKind::ReadonlyKeyword => ModifierFlags::READONLY,
            SyntaxKind::AccessorKeyword => ModifierFlags::ACCESSOR,
            SyntaxKind::AbstractKeyword => ModifierFlags::ABSTRACT,
            SyntaxKind::AsyncKeyword => ModifierFlags::ASYNC,
            SyntaxKind::DefaultKeyword => ModifierFlags::DEFAULT,
            SyntaxKind::ConstKeyword => ModifierFlags::CONST,
            SyntaxKind::OverrideKeyword => ModifierFlags::OVERRIDE,
            _ => ModifierFlags::NONE,
        }
    }
}

bitflags::bitflags! {
    /// Flags attached to scanned tokens.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TokenFlags: u16 {
        const NONE                   = 0;
        const PRECEDING_LINE_BREAK   = 1 << 0;
        const UNTERMINATED           = 1 << 1;
        const EXTENDED_UNICODE_ESCAPE = 1 << 2;
        const SCIENTIFIC             = 1 << 3;
        const OCTAL                  = 1 << 4;
        const HEX_SPECIFIER          = 1 << 5;
        const BINARY_SPECIFIER       = 1 << 6;
        const OCTAL_SPECIFIER        = 1 << 7;
        const CONTAINS_SEPARATOR     = 1 << 8;
        const SINGLE_QUOTE           = 1 << 9;
        const CONTAINS_INVALID_ESCAPE = 1 << 10;

        const NUMERIC_LITERAL_FLAGS = Self::SCIENTIFIC.bits()
            | Self::OCTAL.bits()
            | Self::HEX_SPECIFIER.bits()
            | Self::BINARY_SPECIFIER.bits()
            | Self::OCTAL_SPECIFIER.bits()
            | Self::CONTAINS_SEPARATOR.bits();
    }
}

bitflags::bitflags! {
    /// Type flags used by the checker.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TypeFlags: u32 {
        const NONE            = 0;
        const ANY             = 1 << 0;
        const UNKNOWN         = 1 << 1;
        const STRING          = 1 << 2;
        const NUMBER          = 1 << 3;
        const BOOLEAN         = 1 << 4;
        const ENUM            = 1 << 5;
        const BIG_INT         = 1 << 6;
        const STRING_LITERAL  = 1 << 7;
        const NUMBER_LITERAL  = 1 << 8;
        const BOOLEAN_LITERAL = 1 << 9;
        const ES_SYMBOL       = 1 << 10;
        const VOID            = 1 << 11;
        const UNDEFINED       = 1 << 12;
        const NULL            = 1 << 13;
        const NEVER           = 1 << 14;
        const TYPE_PARAMETER  = 1 << 15;
        const OBJECT          = 1 << 16;
        const UNION           = 1 << 17;
        const INTERSECTION    = 1 << 18;
        const NON_PRIMITIVE   = 1 << 19;

        const LITERAL = Self::STRING_LITERAL.bits()
            | Self::NUMBER_LITERAL.bits()
            | Self::BOOLEAN_LITERAL.bits();
        const INTRINSIC = Self::ANY.bits()
            | Self::UNKNOWN.bits()
            | Self::STRING.bits()
            | Self::NUMBER.bits()
            | Self::BOOLEAN.bits()
            | Self::BIG_INT.bits()
            | Self::ES_SYMBOL.bits()
            | Self::VOID.bits()
            | Self::UNDEFINED.bits()
            | Self::NULL.bits()
            | Self::NEVER.bits()
            | Self::NON_PRIMITIVE.bits();
        const UNION_OR_INTERSECTION = Self::UNION.bits() | Self::INTERSECTION.bits();
    }
}

bitflags::bitflags! {
    /// Flags for symbols produced by the binder.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SymbolFlags: u32 {
        const NONE                     = 0;
        const FUNCTION_SCOPED_VARIABLE = 1 << 0;
        const BLOCK_SCOPED_VARIABLE    = 1 << 1;
        const PROPERTY                 = 1 << 2;
        const ENUM_MEMBER              = 1 << 3;
        const FUNCTION                 = 1 << 4;
        const CLASS                    = 1 << 5;
        const INTERFACE                = 1 << 6;
        const REGULAR_ENUM             = 1 << 7;
        const NAMESPACE_MODULE         = 1 << 8;
        const METHOD                   = 1 << 9;
        const TYPE_PARAMETER           = 1 << 10;
        const TYPE_ALIAS               = 1 << 11;
        const OPTIONAL                 = 1 << 12;
        const EXPORTED                 = 1 << 13;

        const VARIABLE = Self::FUNCTION_SCOPED_VARIABLE.bits() | Self::BLOCK_SCOPED_VARIABLE.bits();
        const VALUE = Self::VARIABLE.bits()
            | Self::PROPERTY.bits()
            | Self::ENUM_MEMBER.bits()
            | Self::FUNCTION.bits()
            | Self::CLASS.bits()
            | Self::REGULAR_ENUM.bits()
            | Self::METHOD.bits();
        const TYPE = Self::CLASS.bits()
            | Self::INTERFACE.bits()
            | Self::REGULAR_ENUM.bits()
            | Self::TYPE_PARAMETER.bits()
            | Self::TYPE_ALIAS.bits();
    }
}

bitflags::bitflags! {
    /// Flags for object types.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ObjectFlags: u32 {
        const NONE           = 0;
        const CLASS          = 1 << 0;
        const INTERFACE      = 1 << 1;
        const REFERENCE      = 1 << 2;
        const TUPLE          = 1 << 3;
        const ANONYMOUS      = 1 << 4;
        const MAPPED         = 1 << 5;
        const OBJECT_LITERAL = 1 << 6;
        const ARRAY          = 1 << 7;
        const FUNCTION       = 1 << 8;
    }
}

/// A type id, indexing the checker's type table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub u32);

impl TypeId {
    pub const INVALID: TypeId = TypeId(u32::MAX);

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A symbol id, indexing the binder's symbol arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(pub u32);

impl SymbolId {
    pub const INVALID: SymbolId = SymbolId(u32::MAX);

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modifier_flags_from_kind() {
        assert_eq!(
            ModifierFlags::from_modifier_kind(SyntaxKind::ExportKeyword),
            ModifierFlags::EXPORT
        );
        assert_eq!(
            ModifierFlags::from_modifier_kind(SyntaxKind::DeclareKeyword),
            ModifierFlags::AMBIENT
        );
        assert_eq!(
            ModifierFlags::from_modifier_kind(SyntaxKind::Identifier),
            ModifierFlags::NONE
        );
        assert!(ModifierFlags::EXPORT_DEFAULT.contains(ModifierFlags::DEFAULT));
    }

    #[test]
    fn test_type_flags_groups() {
        assert!(TypeFlags::INTRINSIC.contains(TypeFlags::NEVER));
        assert!(!TypeFlags::INTRINSIC.intersects(TypeFlags::UNION));
        assert!(SymbolFlags::TYPE.contains(SymbolFlags::INTERFACE));
    }
}
