//! Typed syntax tree.
//!
//! Nodes are allocated in a `bumpalo` arena owned by the caller. Every child
//! reference and list is a plain `&'a` borrow into that arena, and every piece
//! of text is an arena `&'a str`, so no node owns heap memory.

use crate::syntax_kind::SyntaxKind;
use crate::types::*;
use rscript_core::text::TextRange;
use rscript_diagnostics::Diagnostic;

// ============================================================================
// Core Node Wrapper
// ============================================================================

/// Data shared by all nodes.
#[derive(Debug, Clone, Copy)]
pub struct NodeData {
    pub kind: SyntaxKind,
    /// Byte range from the first token start to the last token end.
    pub range: TextRange,
    pub flags: NodeFlags,
    pub modifier_flags: ModifierFlags,
}

impl NodeData {
    pub fn new(kind: SyntaxKind, pos: u32, end: u32) -> Self {
        Self {
            kind,
            range: TextRange::new(pos, end),
            flags: NodeFlags::NONE,
            modifier_flags: ModifierFlags::NONE,
        }
    }

    pub fn with_flags(mut self, flags: NodeFlags) -> Self {
        self.flags |= flags;
        self
    }

    pub fn with_modifiers(mut self, modifier_flags: ModifierFlags) -> Self {
        self.modifier_flags |= modifier_flags;
        self
    }
}

/// A list of nodes, allocated in the arena.
pub type NodeList<'a, T> = &'a [T];

/// An optional arena-allocated node.
pub type OptionalNode<'a, T> = Option<&'a T>;

// ============================================================================
// Source File
// ============================================================================

#[derive(Debug)]
pub struct SourceFile<'a> {
    pub data: NodeData,
    pub statements: NodeList<'a, Statement<'a>>,
    pub end_of_file_token: Token,
    pub file_name: String,
    pub text: String,
    pub script_kind: ScriptKind,
    pub is_declaration_file: bool,
    /// Syntax errors recovered from while parsing.
    pub parse_diagnostics: Vec<Diagnostic>,
}

impl<'a> SourceFile<'a> {
    /// The source text covered by `range`, or `""` if it is out of bounds.
    pub fn text_of(&self, range: TextRange) -> &str {
        self.text.get(range.to_range()).unwrap_or("")
    }

    pub fn has_parse_errors(&self) -> bool {
        self.parse_diagnostics.iter().any(|d| d.is_error())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScriptKind {
    JS,
    JSX,
    #[default]
    TS,
    TSX,
}

impl ScriptKind {
    pub fn from_file_name(file_name: &str) -> ScriptKind {
        let lower = file_name.to_ascii_lowercase();
        if lower.ends_with(".tsx") {
            ScriptKind::TSX
        } else if lower.ends_with(".jsx") {
            ScriptKind::JSX
        } else if lower.ends_with(".js") || lower.ends_with(".mjs") || lower.ends_with(".cjs") {
            ScriptKind::JS
        } else {
            ScriptKind::TS
        }
    }
}

// ============================================================================
// Tokens, identifiers and literals
// ============================================================================

/// A token without further payload (keywords, `this`, omitted slots).
#[derive(Debug, Clone)]
pub struct Token {
    pub data: NodeData,
}

impl Token {
    pub fn new(kind: SyntaxKind, pos: u32, end: u32) -> Self {
        Self {
            data: NodeData::new(kind, pos, end),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Identifier<'a> {
    pub data: NodeData,
    pub text: &'a str,
    /// Set when a contextual keyword is used as a name.
    pub original_keyword_kind: Option<SyntaxKind>,
}

impl<'a> Identifier<'a> {
    /// Whether this identifier was synthesized by error recovery.
    pub fn is_missing(&self) -> bool {
        self.text.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct StringLiteral<'a> {
    pub data: NodeData,
    /// Cooked value, escapes resolved.
    pub text: &'a str,
    pub is_single_quote: bool,
}

#[derive(Debug, Clone)]
pub struct NumericLiteral<'a> {
    pub data: NodeData,
    /// Raw source text, separators included.
    pub text: &'a str,
}

impl<'a> NumericLiteral<'a> {
    /// Numeric value of the literal; `NaN` for text that does not parse.
    pub fn value(&self) -> f64 {
        parse_numeric_text(self.text)
    }
}

/// Parse the text of a numeric literal, honoring radix prefixes and `_` separators.
pub fn parse_numeric_text(text: &str) -> f64 {
    let cleaned: String = text.chars().filter(|c| *c != '_').collect();
    let lower = cleaned.to_ascii_lowercase();
    let radix_value = |digits: &str, radix: u32| {
        u64::from_str_radix(digits, radix)
            .map(|v| v as f64)
            .unwrap_or(f64::NAN)
    };
    if let Some(hex) = lower.strip_prefix("0x") {
        radix_value(hex, 16)
    } else if let Some(bin) = lower.strip_prefix("0b") {
        radix_value(bin, 2)
    } else if let Some(oct) = lower.strip_prefix("0o") {
        radix_value(oct, 8)
    } else {
        lower.parse::<f64>().unwrap_or(f64::NAN)
    }
}

#[derive(Debug, Clone)]
pub struct BigIntLiteral<'a> {
    pub data: NodeData,
    pub text: &'a str,
}

#[derive(Debug, Clone)]
pub struct RegularExpressionLiteral<'a> {
    pub data: NodeData,
    pub text: &'a str,
}

/// A no-substitution template, or a template head, middle or tail.
#[derive(Debug, Clone)]
pub struct TemplateLiteralLikeNode<'a> {
    pub data: NodeData,
    pub text: &'a str,
    pub raw_text: &'a str,
}

// ============================================================================
// Names
// ============================================================================

#[derive(Debug)]
pub enum EntityName<'a> {
    Identifier(Identifier<'a>),
    QualifiedName(&'a QualifiedName<'a>),
}

impl<'a> EntityName<'a> {
    pub fn data(&self) -> &NodeData {
        match self {
            EntityName::Identifier(n) => &n.data,
            EntityName::QualifiedName(n) => &n.data,
        }
    }

    /// The dotted form, e.g. `A.B.C`.
    pub fn to_dotted_string(&self) -> String {
        match self {
            EntityName::Identifier(id) => id.text.to_string(),
            EntityName::QualifiedName(q) => {
                format!("{}.{}", q.left.to_dotted_string(), q.right.text)
            }
        }
    }

    /// The simple name, if this is not a qualified name.
    pub fn as_identifier(&self) -> Option<&Identifier<'a>> {
        match self {
            EntityName::Identifier(id) => Some(id),
            EntityName::QualifiedName(_) => None,
        }
    }
}

#[derive(Debug)]
pub struct QualifiedName<'a> {
    pub data: NodeData,
    pub left: EntityName<'a>,
    pub right: Identifier<'a>,
}

#[derive(Debug)]
pub struct ComputedPropertyName<'a> {
    pub data: NodeData,
    pub expression: &'a Expression<'a>,
}

#[derive(Debug)]
pub enum PropertyName<'a> {
    Identifier(Identifier<'a>),
    PrivateIdentifier(Identifier<'a>),
    StringLiteral(StringLiteral<'a>),
    NumericLiteral(NumericLiteral<'a>),
    ComputedPropertyName(&'a ComputedPropertyName<'a>),
}

impl<'a> PropertyName<'a> {
    pub fn data(&self) -> &NodeData {
        match self {
            PropertyName::Identifier(n) | PropertyName::PrivateIdentifier(n) => &n.data,
            PropertyName::StringLiteral(n) => &n.data,
            PropertyName::NumericLiteral(n) => &n.data,
            PropertyName::ComputedPropertyName(n) => &n.data,
        }
    }

    /// Static text of the name; `None` for computed names.
    pub fn text(&self) -> Option<&'a str> {
        match self {
            PropertyName::Identifier(n) | PropertyName::PrivateIdentifier(n) => Some(n.text),
            PropertyName::StringLiteral(n) => Some(n.text),
            PropertyName::NumericLiteral(n) => Some(n.text),
            PropertyName::ComputedPropertyName(_) => None,
        }
    }

    /// Identifier or string-literal text, the names that read like a plain key.
    pub fn simple_text(&self) -> Option<&'a str> {
        match self {
            PropertyName::Identifier(n) => Some(n.text),
            PropertyName::StringLiteral(n) => Some(n.text),
            _ => None,
        }
    }

    pub fn as_identifier(&self) -> Option<&Identifier<'a>> {
        match self {
            PropertyName::Identifier(id) => Some(id),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub enum BindingName<'a> {
    Identifier(Identifier<'a>),
    ObjectBindingPattern(&'a ObjectBindingPattern<'a>),
    ArrayBindingPattern(&'a ArrayBindingPattern<'a>),
}

impl<'a> BindingName<'a> {
    pub fn data(&self) -> &NodeData {
        match self {
            BindingName::Identifier(n) => &n.data,
            BindingName::ObjectBindingPattern(n) => &n.data,
            BindingName::ArrayBindingPattern(n) => &n.data,
        }
    }

    pub fn as_identifier(&self) -> Option<&Identifier<'a>> {
        match self {
            BindingName::Identifier(id) => Some(id),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub struct ObjectBindingPattern<'a> {
    pub data: NodeData,
    pub elements: NodeList<'a, BindingElement<'a>>,
}

#[derive(Debug)]
pub struct ArrayBindingPattern<'a> {
    pub data: NodeData,
    pub elements: NodeList<'a, ArrayBindingElement<'a>>,
}

#[derive(Debug)]
pub enum ArrayBindingElement<'a> {
    BindingElement(BindingElement<'a>),
    OmittedExpression(Token),
}

#[derive(Debug)]
pub struct BindingElement<'a> {
    pub data: NodeData,
    pub dot_dot_dot_token: bool,
    pub property_name: Option<PropertyName<'a>>,
    pub name: BindingName<'a>,
    pub initializer: OptionalNode<'a, Expression<'a>>,
}

// ============================================================================
// Type Nodes
// ============================================================================

#[derive(Debug)]
pub enum TypeNode<'a> {
    KeywordType(KeywordTypeNode),
    TypeReference(TypeReferenceNode<'a>),
    FunctionType(FunctionTypeNode<'a>),
    ConstructorType(FunctionTypeNode<'a>),
    TypeQuery(TypeQueryNode<'a>),
    TypeLiteral(TypeLiteralNode<'a>),
    ArrayType(ArrayTypeNode<'a>),
    TupleType(TupleTypeNode<'a>),
    OptionalType(WrappedTypeNode<'a>),
    RestType(WrappedTypeNode<'a>),
    NamedTupleMember(NamedTupleMemberNode<'a>),
    UnionType(UnionTypeNode<'a>),
    IntersectionType(IntersectionTypeNode<'a>),
    ConditionalType(ConditionalTypeNode<'a>),
    InferType(InferTypeNode<'a>),
    ParenthesizedType(WrappedTypeNode<'a>),
    ThisType(Token),
    TypeOperator(TypeOperatorNode<'a>),
    IndexedAccessType(IndexedAccessTypeNode<'a>),
    MappedType(MappedTypeNode<'a>),
    LiteralType(LiteralTypeNode<'a>),
    TemplateLiteralType(TemplateLiteralTypeNode<'a>),
    TypePredicate(TypePredicateNode<'a>),
}

impl<'a> TypeNode<'a> {
    pub fn data(&self) -> &NodeData {
        match self {
            TypeNode::KeywordType(n) => &n.data,
            TypeNode::TypeReference(n) => &n.data,
            TypeNode::FunctionType(n) | TypeNode::ConstructorType(n) => &n.data,
            TypeNode::TypeQuery(n) => &n.data,
            TypeNode::TypeLiteral(n) => &n.data,
            TypeNode::ArrayType(n) => &n.data,
            TypeNode::TupleType(n) => &n.data,
            TypeNode::OptionalType(n) | TypeNode::RestType(n) | TypeNode::ParenthesizedType(n) => {
                &n.data
            }
            TypeNode::NamedTupleMember(n) => &n.data,
            TypeNode::UnionType(n) => &n.data,
            TypeNode::IntersectionType(n) => &n.data,
            TypeNode::ConditionalType(n) => &n.data,
            TypeNode::InferType(n) => &n.data,
            TypeNode::ThisType(n) => &n.data,
            TypeNode::TypeOperator(n) => &n.data,
            TypeNode::IndexedAccessType(n) => &n.data,
            TypeNode::MappedType(n) => &n.data,
            TypeNode::LiteralType(n) => &n.data,
            TypeNode::TemplateLiteralType(n) => &n.data,
            TypeNode::TypePredicate(n) => &n.data,
        }
    }

    #[inline]
    pub fn kind(&self) -> SyntaxKind {
        self.data().kind
    }
}

#[derive(Debug)]
pub struct KeywordTypeNode {
    pub data: NodeData,
}

#[derive(Debug)]
pub struct TypeReferenceNode<'a> {
    pub data: NodeData,
    pub type_name: EntityName<'a>,
    pub type_arguments: Option<NodeList<'a, TypeNode<'a>>>,
}

/// Function and constructor types share a shape.
#[derive(Debug)]
pub struct FunctionTypeNode<'a> {
    pub data: NodeData,
    pub type_parameters: Option<NodeList<'a, TypeParameterDeclaration<'a>>>,
    pub parameters: NodeList<'a, ParameterDeclaration<'a>>,
    pub return_type: &'a TypeNode<'a>,
}

#[derive(Debug)]
pub struct TypeQueryNode<'a> {
    pub data: NodeData,
    pub expr_name: EntityName<'a>,
}

#[derive(Debug)]
pub struct TypeLiteralNode<'a> {
    pub data: NodeData,
    pub members: NodeList<'a, TypeElement<'a>>,
}

#[derive(Debug)]
pub struct ArrayTypeNode<'a> {
    pub data: NodeData,
    pub element_type: &'a TypeNode<'a>,
}

#[derive(Debug)]
pub struct TupleTypeNode<'a> {
    pub data: NodeData,
    pub elements: NodeList<'a, TypeNode<'a>>,
}

/// Optional, rest and parenthesized types wrap a single type.
#[derive(Debug)]
pub struct WrappedTypeNode<'a> {
    pub data: NodeData,
    pub type_node: &'a TypeNode<'a>,
}

#[derive(Debug)]
pub struct NamedTupleMemberNode<'a> {
    pub data: NodeData,
    pub dot_dot_dot_token: bool,
    pub name: Identifier<'a>,
    pub question_token: bool,
    pub type_node: &'a TypeNode<'a>,
}

#[derive(Debug)]
pub struct UnionTypeNode<'a> {
    pub data: NodeData,
    pub types: NodeList<'a, TypeNode<'a>>,
}

#[derive(Debug)]
pub struct IntersectionTypeNode<'a> {
    pub data: NodeData,
    pub types: NodeList<'a, TypeNode<'a>>,
}

#[derive(Debug)]
pub struct ConditionalTypeNode<'a> {
    pub data: NodeData,
    pub check_type: &'a TypeNode<'a>,
    pub extends_type: &'a TypeNode<'a>,
    pub true_type: &'a TypeNode<'a>,
    pub false_type: &'a TypeNode<'a>,
}

#[derive(Debug)]
pub struct InferTypeNode<'a> {
    pub data: NodeData,
    pub type_parameter: &'a TypeParameterDeclaration<'a>,
}

#[derive(Debug)]
pub struct TypeOperatorNode<'a> {
    pub data: NodeData,
    /// `keyof`, `unique` or `readonly`.
    pub operator: SyntaxKind,
    pub type_node: &'a TypeNode<'a>,
}

#[derive(Debug)]
pub struct IndexedAccessTypeNode<'a> {
    pub data: NodeData,
    pub object_type: &'a TypeNode<'a>,
    pub index_type: &'a TypeNode<'a>,
}

#[derive(Debug)]
pub struct MappedTypeNode<'a> {
    pub data: NodeData,
    pub readonly_token: Option<Token>,
    pub type_parameter: &'a TypeParameterDeclaration<'a>,
    pub name_type: OptionalNode<'a, TypeNode<'a>>,
    pub question_token: Option<Token>,
    pub type_node: OptionalNode<'a, TypeNode<'a>>,
}

/// A literal in type position. `literal` is a string, numeric, boolean,
/// null or template literal, or a prefix-unary minus over a numeric literal.
#[derive(Debug)]
pub struct LiteralTypeNode<'a> {
    pub data: NodeData,
    pub literal: &'a Expression<'a>,
}

#[derive(Debug)]
pub struct TemplateLiteralTypeNode<'a> {
    pub data: NodeData,
    pub head: TemplateLiteralLikeNode<'a>,
    pub template_spans: NodeList<'a, TemplateLiteralTypeSpan<'a>>,
}

#[derive(Debug)]
pub struct TemplateLiteralTypeSpan<'a> {
    pub data: NodeData,
    pub type_node: &'a TypeNode<'a>,
    pub literal: TemplateLiteralLikeNode<'a>,
}

#[derive(Debug)]
pub struct TypePredicateNode<'a> {
    pub data: NodeData,
    pub asserts_modifier: bool,
    pub parameter_name: Identifier<'a>,
    pub type_node: OptionalNode<'a, TypeNode<'a>>,
}

// ============================================================================
// Signature elements
// ============================================================================

#[derive(Debug)]
pub struct TypeParameterDeclaration<'a> {
    pub data: NodeData,
    pub name: Identifier<'a>,
    pub constraint: OptionalNode<'a, TypeNode<'a>>,
    pub default: OptionalNode<'a, TypeNode<'a>>,
}

#[derive(Debug)]
pub struct ParameterDeclaration<'a> {
    pub data: NodeData,
    pub decorators: NodeList<'a, Decorator<'a>>,
    pub dot_dot_dot_token: bool,
    pub name: BindingName<'a>,
    pub question_token: bool,
    pub type_annotation: OptionalNode<'a, TypeNode<'a>>,
    pub initializer: OptionalNode<'a, Expression<'a>>,
}

#[derive(Debug)]
pub struct Decorator<'a> {
    pub data: NodeData,
    pub expression: &'a Expression<'a>,
}

// ============================================================================
// Type members
// ============================================================================

#[derive(Debug)]
pub enum TypeElement<'a> {
    PropertySignature(PropertySignature<'a>),
    MethodSignature(MethodSignature<'a>),
    CallSignature(SignatureDeclaration<'a>),
    ConstructSignature(SignatureDeclaration<'a>),
    IndexSignature(IndexSignatureDeclaration<'a>),
}

impl<'a> TypeElement<'a> {
    pub fn data(&self) -> &NodeData {
        match self {
            TypeElement::PropertySignature(n) => &n.data,
            TypeElement::MethodSignature(n) => &n.data,
            TypeElement::CallSignature(n) | TypeElement::ConstructSignature(n) => &n.data,
            TypeElement::IndexSignature(n) => &n.data,
        }
    }

    pub fn name(&self) -> Option<&PropertyName<'a>> {
        match self {
            TypeElement::PropertySignature(n) => Some(&n.name),
            TypeElement::MethodSignature(n) => Some(&n.name),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub struct PropertySignature<'a> {
    pub data: NodeData,
    pub name: PropertyName<'a>,
    pub question_token: bool,
    pub type_annotation: OptionalNode<'a, TypeNode<'a>>,
}

#[derive(Debug)]
pub struct MethodSignature<'a> {
    pub data: NodeData,
    pub name: PropertyName<'a>,
    pub question_token: bool,
    pub type_parameters: Option<NodeList<'a, TypeParameterDeclaration<'a>>>,
    pub parameters: NodeList<'a, ParameterDeclaration<'a>>,
    pub return_type: OptionalNode<'a, TypeNode<'a>>,
}

/// Call and construct signatures.
#[derive(Debug)]
pub struct SignatureDeclaration<'a> {
    pub data: NodeData,
    pub type_parameters: Option<NodeList<'a, TypeParameterDeclaration<'a>>>,
    pub parameters: NodeList<'a, ParameterDeclaration<'a>>,
    pub return_type: OptionalNode<'a, TypeNode<'a>>,
}

#[derive(Debug)]
pub struct IndexSignatureDeclaration<'a> {
    pub data: NodeData,
    pub parameters: NodeList<'a, ParameterDeclaration<'a>>,
    pub type_annotation: OptionalNode<'a, TypeNode<'a>>,
}

// ============================================================================
// Expressions
// ============================================================================

#[derive(Debug)]
pub enum Expression<'a> {
    Identifier(Identifier<'a>),
    PrivateIdentifier(Identifier<'a>),
    StringLiteral(StringLiteral<'a>),
    NumericLiteral(NumericLiteral<'a>),
    BigIntLiteral(BigIntLiteral<'a>),
    RegularExpressionLiteral(RegularExpressionLiteral<'a>),
    NoSubstitutionTemplateLiteral(TemplateLiteralLikeNode<'a>),
    TemplateExpression(TemplateExpression<'a>),
    TrueKeyword(Token),
    FalseKeyword(Token),
    NullKeyword(Token),
    ThisKeyword(Token),
    SuperKeyword(Token),
    ArrayLiteralExpression(ArrayLiteralExpression<'a>),
    ObjectLiteralExpression(ObjectLiteralExpression<'a>),
    PropertyAccessExpression(PropertyAccessExpression<'a>),
    ElementAccessExpression(ElementAccessExpression<'a>),
    CallExpression(CallExpression<'a>),
    NewExpression(NewExpression<'a>),
    TaggedTemplateExpression(TaggedTemplateExpression<'a>),
    ParenthesizedExpression(WrappedExpression<'a>),
    FunctionExpression(FunctionDeclaration<'a>),
    ArrowFunction(ArrowFunction<'a>),
    DeleteExpression(WrappedExpression<'a>),
    TypeOfExpression(WrappedExpression<'a>),
    VoidExpression(WrappedExpression<'a>),
    AwaitExpression(WrappedExpression<'a>),
    PrefixUnaryExpression(PrefixUnaryExpression<'a>),
    PostfixUnaryExpression(PostfixUnaryExpression<'a>),
    BinaryExpression(BinaryExpression<'a>),
    ConditionalExpression(ConditionalExpression<'a>),
    YieldExpression(YieldExpression<'a>),
    SpreadElement(WrappedExpression<'a>),
    ClassExpression(ClassDeclaration<'a>),
    OmittedExpression(Token),
    AsExpression(AssertionExpression<'a>),
    SatisfiesExpression(AssertionExpression<'a>),
    NonNullExpression(WrappedExpression<'a>),
}

impl<'a> Expression<'a> {
    pub fn data(&self) -> &NodeData {
        match self {
            Expression::Identifier(n) | Expression::PrivateIdentifier(n) => &n.data,
            Expression::StringLiteral(n) => &n.data,
            Expression::NumericLiteral(n) => &n.data,
            Expression::BigIntLiteral(n) => &n.data,
            Expression::RegularExpressionLiteral(n) => &n.data,
            Expression::NoSubstitutionTemplateLiteral(n) => &n.data,
            Expression::TemplateExpression(n) => &n.data,
            Expression::TrueKeyword(n)
            | Expression::FalseKeyword(n)
            | Expression::NullKeyword(n)
            | Expression::ThisKeyword(n)
            | Expression::SuperKeyword(n)
            | Expression::OmittedExpression(n) => &n.data,
            Expression::ArrayLiteralExpression(n) => &n.data,
            Expression::ObjectLiteralExpression(n) => &n.data,
            Expression::PropertyAccessExpression(n) => &n.data,
            Expression::ElementAccessExpression(n) => &n.data,
            Expression::CallExpression(n) => &n.data,
            Expression::NewExpression(n) => &n.data,
            Expression::TaggedTemplateExpression(n) => &n.data,
            Expression::ParenthesizedExpression(n)
            | Expression::DeleteExpression(n)
            | Expression::TypeOfExpression(n)
            | Expression::VoidExpression(n)
            | Expression::AwaitExpression(n)
            | Expression::SpreadElement(n)
            | Expression::NonNullExpression(n) => &n.data,
            Expression::FunctionExpression(n) => &n.data,
            Expression::ArrowFunction(n) => &n.data,
            Expression::PrefixUnaryExpression(n) => &n.data,
            Expression::PostfixUnaryExpression(n) => &n.data,
            Expression::BinaryExpression(n) => &n.data,
            Expression::ConditionalExpression(n) => &n.data,
            Expression::YieldExpression(n) => &n.data,
            Expression::ClassExpression(n) => &n.data,
            Expression::AsExpression(n) | Expression::SatisfiesExpression(n) => &n.data,
        }
    }

    #[inline]
    pub fn kind(&self) -> SyntaxKind {
        self.data().kind
    }

    pub fn as_identifier(&self) -> Option<&Identifier<'a>> {
        match self {
            Expression::Identifier(id) => Some(id),
            _ => None,
        }
    }

    /// Strips any number of enclosing parentheses.
    pub fn skip_parentheses(&self) -> &Expression<'a> {
        let mut expr = self;
        while let Expression::ParenthesizedExpression(inner) = expr {
            expr = inner.expression;
        }
        expr
    }
}

#[derive(Debug)]
pub struct TemplateExpression<'a> {
    pub data: NodeData,
    pub head: TemplateLiteralLikeNode<'a>,
    pub template_spans: NodeList<'a, TemplateSpan<'a>>,
}

#[derive(Debug)]
pub struct TemplateSpan<'a> {
    pub data: NodeData,
    pub expression: &'a Expression<'a>,
    pub literal: TemplateLiteralLikeNode<'a>,
}

#[derive(Debug)]
pub struct ArrayLiteralExpression<'a> {
    pub data: NodeData,
    pub elements: NodeList<'a, Expression<'a>>,
}

#[derive(Debug)]
pub struct ObjectLiteralExpression<'a> {
    pub data: NodeData,
    pub properties: NodeList<'a, ObjectLiteralElement<'a>>,
}

#[derive(Debug)]
pub enum ObjectLiteralElement<'a> {
    PropertyAssignment(PropertyAssignment<'a>),
    ShorthandPropertyAssignment(ShorthandPropertyAssignment<'a>),
    SpreadAssignment(WrappedExpression<'a>),
    MethodDeclaration(MethodDeclaration<'a>),
    GetAccessor(AccessorDeclaration<'a>),
    SetAccessor(AccessorDeclaration<'a>),
}

impl<'a> ObjectLiteralElement<'a> {
    pub fn data(&self) -> &NodeData {
        match self {
            ObjectLiteralElement::PropertyAssignment(n) => &n.data,
            ObjectLiteralElement::ShorthandPropertyAssignment(n) => &n.data,
            ObjectLiteralElement::SpreadAssignment(n) => &n.data,
            ObjectLiteralElement::MethodDeclaration(n) => &n.data,
            ObjectLiteralElement::GetAccessor(n) | ObjectLiteralElement::SetAccessor(n) => &n.data,
        }
    }
}

#[derive(Debug)]
pub struct PropertyAssignment<'a> {
    pub data: NodeData,
    pub name: PropertyName<'a>,
    pub initializer: &'a Expression<'a>,
}

#[derive(Debug)]
pub struct ShorthandPropertyAssignment<'a> {
    pub data: NodeData,
    pub name: Identifier<'a>,
    /// The `= value` of a shorthand used as a destructuring default.
    pub object_assignment_initializer: OptionalNode<'a, Expression<'a>>,
}

#[derive(Debug)]
pub struct PropertyAccessExpression<'a> {
    pub data: NodeData,
    pub expression: &'a Expression<'a>,
    pub question_dot_token: bool,
    pub name: Identifier<'a>,
}

#[derive(Debug)]
pub struct ElementAccessExpression<'a> {
    pub data: NodeData,
    pub expression: &'a Expression<'a>,
    pub question_dot_token: bool,
    pub argument_expression: &'a Expression<'a>,
}

#[derive(Debug)]
pub struct CallExpression<'a> {
    pub data: NodeData,
    pub expression: &'a Expression<'a>,
    pub question_dot_token: bool,
    pub type_arguments: Option<NodeList<'a, TypeNode<'a>>>,
    pub arguments: NodeList<'a, Expression<'a>>,
}

#[derive(Debug)]
pub struct NewExpression<'a> {
    pub data: NodeData,
    pub expression: &'a Expression<'a>,
    pub type_arguments: Option<NodeList<'a, TypeNode<'a>>>,
    /// `None` for `new X` without an argument list.
    pub arguments: Option<NodeList<'a, Expression<'a>>>,
}

#[derive(Debug)]
pub struct TaggedTemplateExpression<'a> {
    pub data: NodeData,
    pub tag: &'a Expression<'a>,
    pub type_arguments: Option<NodeList<'a, TypeNode<'a>>>,
    /// A template expression or a no-substitution template literal.
    pub template: &'a Expression<'a>,
}

/// An expression with a single operand and no operator payload: parenthesized,
/// `delete`, `typeof`, `void`, `await`, spread and non-null expressions.
#[derive(Debug)]
pub struct WrappedExpression<'a> {
    pub data: NodeData,
    pub expression: &'a Expression<'a>,
}

#[derive(Debug)]
pub struct ArrowFunction<'a> {
    pub data: NodeData,
    pub type_parameters: Option<NodeList<'a, TypeParameterDeclaration<'a>>>,
    pub parameters: NodeList<'a, ParameterDeclaration<'a>>,
    pub return_type: OptionalNode<'a, TypeNode<'a>>,
    pub body: ConciseBody<'a>,
}

#[derive(Debug)]
pub enum ConciseBody<'a> {
    Block(&'a Block<'a>),
    Expression(&'a Expression<'a>),
}

#[derive(Debug)]
pub struct PrefixUnaryExpression<'a> {
    pub data: NodeData,
    pub operator: SyntaxKind,
    pub operand: &'a Expression<'a>,
}

#[derive(Debug)]
pub struct PostfixUnaryExpression<'a> {
    pub data: NodeData,
    pub operand: &'a Expression<'a>,
    pub operator: SyntaxKind,
}

#[derive(Debug)]
pub struct BinaryExpression<'a> {
    pub data: NodeData,
    pub left: &'a Expression<'a>,
    pub operator_token: Token,
    pub right: &'a Expression<'a>,
}

#[derive(Debug)]
pub struct ConditionalExpression<'a> {
    pub data: NodeData,
    pub condition: &'a Expression<'a>,
    pub when_true: &'a Expression<'a>,
    pub when_false: &'a Expression<'a>,
}

#[derive(Debug)]
pub struct YieldExpression<'a> {
    pub data: NodeData,
    pub asterisk_token: bool,
    pub expression: OptionalNode<'a, Expression<'a>>,
}

/// `expr as T` and `expr satisfies T`.
#[derive(Debug)]
pub struct AssertionExpression<'a> {
    pub data: NodeData,
    pub expression: &'a Expression<'a>,
    pub type_node: &'a TypeNode<'a>,
}

// ============================================================================
// Statements
// ============================================================================

#[derive(Debug)]
pub enum Statement<'a> {
    VariableStatement(VariableStatement<'a>),
    FunctionDeclaration(FunctionDeclaration<'a>),
    ClassDeclaration(ClassDeclaration<'a>),
    InterfaceDeclaration(InterfaceDeclaration<'a>),
    TypeAliasDeclaration(TypeAliasDeclaration<'a>),
    EnumDeclaration(EnumDeclaration<'a>),
    ModuleDeclaration(ModuleDeclaration<'a>),
    ImportDeclaration(ImportDeclaration<'a>),
    ExportDeclaration(ExportDeclaration<'a>),
    ExportAssignment(ExportAssignment<'a>),
    Block(Block<'a>),
    EmptyStatement(Token),
    ExpressionStatement(ExpressionStatement<'a>),
    IfStatement(IfStatement<'a>),
    DoStatement(DoStatement<'a>),
    WhileStatement(WhileStatement<'a>),
    ForStatement(ForStatement<'a>),
    ForInStatement(ForInOrOfStatement<'a>),
    ForOfStatement(ForInOrOfStatement<'a>),
    ContinueStatement(JumpStatement<'a>),
    BreakStatement(JumpStatement<'a>),
    ReturnStatement(ReturnStatement<'a>),
    SwitchStatement(SwitchStatement<'a>),
    LabeledStatement(LabeledStatement<'a>),
    ThrowStatement(ThrowStatement<'a>),
    TryStatement(TryStatement<'a>),
    DebuggerStatement(Token),
    MissingDeclaration(Token),
}

impl<'a> Statement<'a> {
    pub fn data(&self) -> &NodeData {
        match self {
            Statement::VariableStatement(n) => &n.data,
            Statement::FunctionDeclaration(n) => &n.data,
            Statement::ClassDeclaration(n) => &n.data,
            Statement::InterfaceDeclaration(n) => &n.data,
            Statement::TypeAliasDeclaration(n) => &n.data,
            Statement::EnumDeclaration(n) => &n.data,
            Statement::ModuleDeclaration(n) => &n.data,
            Statement::ImportDeclaration(n) => &n.data,
            Statement::ExportDeclaration(n) => &n.data,
            Statement::ExportAssignment(n) => &n.data,
            Statement::Block(n) => &n.data,
            Statement::EmptyStatement(n)
            | Statement::DebuggerStatement(n)
            | Statement::MissingDeclaration(n) => &n.data,
            Statement::ExpressionStatement(n) => &n.data,
            Statement::IfStatement(n) => &n.data,
            Statement::DoStatement(n) => &n.data,
            Statement::WhileStatement(n) => &n.data,
            Statement::ForStatement(n) => &n.data,
            Statement::ForInStatement(n) | Statement::ForOfStatement(n) => &n.data,
            Statement::ContinueStatement(n) | Statement::BreakStatement(n) => &n.data,
            Statement::ReturnStatement(n) => &n.data,
            Statement::SwitchStatement(n) => &n.data,
            Statement::LabeledStatement(n) => &n.data,
            Statement::ThrowStatement(n) => &n.data,
            Statement::TryStatement(n) => &n.data,
        }
    }

    #[inline]
    pub fn kind(&self) -> SyntaxKind {
        self.data().kind
    }
}

#[derive(Debug)]
pub struct Block<'a> {
    pub data: NodeData,
    pub statements: NodeList<'a, Statement<'a>>,
}

#[derive(Debug)]
pub struct VariableStatement<'a> {
    pub data: NodeData,
    pub declaration_list: VariableDeclarationList<'a>,
}

#[derive(Debug)]
pub struct VariableDeclarationList<'a> {
    /// `flags` carries `LET` or `CONST`; neither means `var`.
    pub data: NodeData,
    pub declarations: NodeList<'a, VariableDeclaration<'a>>,
}

#[derive(Debug)]
pub struct VariableDeclaration<'a> {
    pub data: NodeData,
    pub name: BindingName<'a>,
    pub exclamation_token: bool,
    pub type_annotation: OptionalNode<'a, TypeNode<'a>>,
    pub initializer: OptionalNode<'a, Expression<'a>>,
}

#[derive(Debug)]
pub struct ExpressionStatement<'a> {
    pub data: NodeData,
    pub expression: &'a Expression<'a>,
}

#[derive(Debug)]
pub struct IfStatement<'a> {
    pub data: NodeData,
    pub expression: &'a Expression<'a>,
    pub then_statement: &'a Statement<'a>,
    pub else_statement: OptionalNode<'a, Statement<'a>>,
}

#[derive(Debug)]
pub struct DoStatement<'a> {
    pub data: NodeData,
    pub statement: &'a Statement<'a>,
    pub expression: &'a Expression<'a>,
}

#[derive(Debug)]
pub struct WhileStatement<'a> {
    pub data: NodeData,
    pub expression: &'a Expression<'a>,
    pub statement: &'a Statement<'a>,
}

#[derive(Debug)]
pub struct ForStatement<'a> {
    pub data: NodeData,
    pub initializer: Option<ForInitializer<'a>>,
    pub condition: OptionalNode<'a, Expression<'a>>,
    pub incrementor: OptionalNode<'a, Expression<'a>>,
    pub statement: &'a Statement<'a>,
}

#[derive(Debug)]
pub enum ForInitializer<'a> {
    VariableDeclarationList(&'a VariableDeclarationList<'a>),
    Expression(&'a Expression<'a>),
}

/// `for (x in y)` and `for (x of y)`.
#[derive(Debug)]
pub struct ForInOrOfStatement<'a> {
    pub data: NodeData,
    pub await_modifier: bool,
    pub initializer: ForInitializer<'a>,
    pub expression: &'a Expression<'a>,
    pub statement: &'a Statement<'a>,
}

/// `break` and `continue`.
#[derive(Debug)]
pub struct JumpStatement<'a> {
    pub data: NodeData,
    pub label: Option<Identifier<'a>>,
}

#[derive(Debug)]
pub struct ReturnStatement<'a> {
    pub data: NodeData,
    pub expression: OptionalNode<'a, Expression<'a>>,
}

#[derive(Debug)]
pub struct SwitchStatement<'a> {
    pub data: NodeData,
    pub expression: &'a Expression<'a>,
    pub case_block: CaseBlock<'a>,
}

#[derive(Debug)]
pub struct CaseBlock<'a> {
    pub data: NodeData,
    pub clauses: NodeList<'a, CaseOrDefaultClause<'a>>,
}

/// A `case expr:` clause, or `default:` when `expression` is `None`.
#[derive(Debug)]
pub struct CaseOrDefaultClause<'a> {
    pub data: NodeData,
    pub expression: OptionalNode<'a, Expression<'a>>,
    pub statements: NodeList<'a, Statement<'a>>,
}

#[derive(Debug)]
pub struct LabeledStatement<'a> {
    pub data: NodeData,
    pub label: Identifier<'a>,
    pub statement: &'a Statement<'a>,
}

#[derive(Debug)]
pub struct ThrowStatement<'a> {
    pub data: NodeData,
    pub expression: &'a Expression<'a>,
}

#[derive(Debug)]
pub struct TryStatement<'a> {
    pub data: NodeData,
    pub try_block: &'a Block<'a>,
    pub catch_clause: Option<CatchClause<'a>>,
    pub finally_block: OptionalNode<'a, Block<'a>>,
}

#[derive(Debug)]
pub struct CatchClause<'a> {
    pub data: NodeData,
    pub variable_declaration: OptionalNode<'a, VariableDeclaration<'a>>,
    pub block: &'a Block<'a>,
}

// ============================================================================
// Declarations
// ============================================================================

/// Function declarations and function expressions.
#[derive(Debug)]
pub struct FunctionDeclaration<'a> {
    pub data: NodeData,
    pub asterisk_token: bool,
    pub name: Option<Identifier<'a>>,
    pub type_parameters: Option<NodeList<'a, TypeParameterDeclaration<'a>>>,
    pub parameters: NodeList<'a, ParameterDeclaration<'a>>,
    pub return_type: OptionalNode<'a, TypeNode<'a>>,
    /// `None` for overload signatures and ambient declarations.
    pub body: OptionalNode<'a, Block<'a>>,
}

/// Class declarations and class expressions.
#[derive(Debug)]
pub struct ClassDeclaration<'a> {
    pub data: NodeData,
    pub decorators: NodeList<'a, Decorator<'a>>,
    pub name: Option<Identifier<'a>>,
    pub type_parameters: Option<NodeList<'a, TypeParameterDeclaration<'a>>>,
    pub heritage_clauses: NodeList<'a, HeritageClause<'a>>,
    pub members: NodeList<'a, ClassElement<'a>>,
}

#[derive(Debug)]
pub struct HeritageClause<'a> {
    pub data: NodeData,
    /// `extends` or `implements`.
    pub token: SyntaxKind,
    pub types: NodeList<'a, ExpressionWithTypeArguments<'a>>,
}

#[derive(Debug)]
pub struct ExpressionWithTypeArguments<'a> {
    pub data: NodeData,
    pub expression: &'a Expression<'a>,
    pub type_arguments: Option<NodeList<'a, TypeNode<'a>>>,
}

#[derive(Debug)]
pub enum ClassElement<'a> {
    PropertyDeclaration(PropertyDeclaration<'a>),
    MethodDeclaration(MethodDeclaration<'a>),
    Constructor(ConstructorDeclaration<'a>),
    GetAccessor(AccessorDeclaration<'a>),
    SetAccessor(AccessorDeclaration<'a>),
    IndexSignature(IndexSignatureDeclaration<'a>),
    SemicolonClassElement(Token),
}

impl<'a> ClassElement<'a> {
    pub fn data(&self) -> &NodeData {
        match self {
            ClassElement::PropertyDeclaration(n) => &n.data,
            ClassElement::MethodDeclaration(n) => &n.data,
            ClassElement::Constructor(n) => &n.data,
            ClassElement::GetAccessor(n) | ClassElement::SetAccessor(n) => &n.data,
            ClassElement::IndexSignature(n) => &n.data,
            ClassElement::SemicolonClassElement(n) => &n.data,
        }
    }

    pub fn name(&self) -> Option<&PropertyName<'a>> {
        match self {
            ClassElement::PropertyDeclaration(n) => Some(&n.name),
            ClassElement::MethodDeclaration(n) => Some(&n.name),
            ClassElement::GetAccessor(n) | ClassElement::SetAccessor(n) => Some(&n.name),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub struct PropertyDeclaration<'a> {
    pub data: NodeData,
    pub decorators: NodeList<'a, Decorator<'a>>,
    pub name: PropertyName<'a>,
    pub question_token: bool,
    pub exclamation_token: bool,
    pub type_annotation: OptionalNode<'a, TypeNode<'a>>,
    pub initializer: OptionalNode<'a, Expression<'a>>,
}

/// Methods of classes and object literals.
#[derive(Debug)]
pub struct MethodDeclaration<'a> {
    pub data: NodeData,
    pub decorators: NodeList<'a, Decorator<'a>>,
    pub asterisk_token: bool,
    pub name: PropertyName<'a>,
    pub question_token: bool,
    pub type_parameters: Option<NodeList<'a, TypeParameterDeclaration<'a>>>,
    pub parameters: NodeList<'a, ParameterDeclaration<'a>>,
    pub return_type: OptionalNode<'a, TypeNode<'a>>,
    pub body: OptionalNode<'a, Block<'a>>,
}

#[derive(Debug)]
pub struct ConstructorDeclaration<'a> {
    pub data: NodeData,
    pub parameters: NodeList<'a, ParameterDeclaration<'a>>,
    pub body: OptionalNode<'a, Block<'a>>,
}

/// `get` and `set` accessors.
#[derive(Debug)]
pub struct AccessorDeclaration<'a> {
    pub data: NodeData,
    pub decorators: NodeList<'a, Decorator<'a>>,
    pub name: PropertyName<'a>,
    pub parameters: NodeList<'a, ParameterDeclaration<'a>>,
    pub return_type: OptionalNode<'a, TypeNode<'a>>,
    pub body: OptionalNode<'a, Block<'a>>,
}

#[derive(Debug)]
pub struct InterfaceDeclaration<'a> {
    pub data: NodeData,
    pub name: Identifier<'a>,
    pub type_parameters: Option<NodeList<'a, TypeParameterDeclaration<'a>>>,
    pub heritage_clauses: NodeList<'a, HeritageClause<'a>>,
    pub members: NodeList<'a, TypeElement<'a>>,
}

#[derive(Debug)]
pub struct TypeAliasDeclaration<'a> {
    pub data: NodeData,
    pub name: Identifier<'a>,
    pub type_parameters: Option<NodeList<'a, TypeParameterDeclaration<'a>>>,
    pub type_node: &'a TypeNode<'a>,
}

#[derive(Debug)]
pub struct EnumDeclaration<'a> {
    pub data: NodeData,
    pub name: Identifier<'a>,
    pub members: NodeList<'a, EnumMember<'a>>,
}

#[derive(Debug)]
pub struct EnumMember<'a> {
    pub data: NodeData,
    pub name: PropertyName<'a>,
    pub initializer: OptionalNode<'a, Expression<'a>>,
}

#[derive(Debug)]
pub struct ModuleDeclaration<'a> {
    pub data: NodeData,
    pub name: ModuleName<'a>,
    pub body: Option<ModuleBody<'a>>,
}

#[derive(Debug)]
pub enum ModuleName<'a> {
    Identifier(Identifier<'a>),
    StringLiteral(StringLiteral<'a>),
}

impl<'a> ModuleName<'a> {
    pub fn text(&self) -> &'a str {
        match self {
            ModuleName::Identifier(n) => n.text,
            ModuleName::StringLiteral(n) => n.text,
        }
    }
}

#[derive(Debug)]
pub enum ModuleBody<'a> {
    ModuleBlock(&'a ModuleBlock<'a>),
    /// The inner part of a dotted `namespace A.B.C`.
    ModuleDeclaration(&'a ModuleDeclaration<'a>),
}

#[derive(Debug)]
pub struct ModuleBlock<'a> {
    pub data: NodeData,
    pub statements: NodeList<'a, Statement<'a>>,
}

#[derive(Debug)]
pub struct ImportDeclaration<'a> {
    pub data: NodeData,
    pub import_clause: Option<ImportClause<'a>>,
    pub module_specifier: &'a Expression<'a>,
}

#[derive(Debug)]
pub struct ImportClause<'a> {
    pub data: NodeData,
    pub is_type_only: bool,
    pub name: Option<Identifier<'a>>,
    pub named_bindings: Option<NamedImportBindings<'a>>,
}

#[derive(Debug)]
pub enum NamedImportBindings<'a> {
    NamespaceImport(NamespaceImport<'a>),
    NamedImports(NamedImports<'a>),
}

#[derive(Debug)]
pub struct NamespaceImport<'a> {
    pub data: NodeData,
    pub name: Identifier<'a>,
}

#[derive(Debug)]
pub struct NamedImports<'a> {
    pub data: NodeData,
    pub elements: NodeList<'a, ImportSpecifier<'a>>,
}

#[derive(Debug)]
pub struct ImportSpecifier<'a> {
    pub data: NodeData,
    pub is_type_only: bool,
    pub property_name: Option<Identifier<'a>>,
    pub name: Identifier<'a>,
}

#[derive(Debug)]
pub struct ExportDeclaration<'a> {
    pub data: NodeData,
    pub is_type_only: bool,
    /// `None` for `export * from "m"`.
    pub export_clause: Option<NamedExportBindings<'a>>,
    pub module_specifier: OptionalNode<'a, Expression<'a>>,
}

#[derive(Debug)]
pub enum NamedExportBindings<'a> {
    NamedExports(NamedExports<'a>),
    NamespaceExport(NamespaceExport<'a>),
}

#[derive(Debug)]
pub struct NamedExports<'a> {
    pub data: NodeData,
    pub elements: NodeList<'a, ExportSpecifier<'a>>,
}

#[derive(Debug)]
pub struct NamespaceExport<'a> {
    pub data: NodeData,
    pub name: Identifier<'a>,
}

/// `local as exported`: `property_name` is the local name when renamed.
#[derive(Debug)]
pub struct ExportSpecifier<'a> {
    pub data: NodeData,
    pub is_type_only: bool,
    pub property_name: Option<Identifier<'a>>,
    pub name: Identifier<'a>,
}

/// `export default expr` or `export = expr`.
#[derive(Debug)]
pub struct ExportAssignment<'a> {
    pub data: NodeData,
    pub is_export_equals: bool,
    pub expression: &'a Expression<'a>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_numeric_text() {
        assert_eq!(parse_numeric_text("42"), 42.0);
        assert_eq!(parse_numeric_text("1_000"), 1000.0);
        assert_eq!(parse_numeric_text("0xFF"), 255.0);
        assert_eq!(parse_numeric_text("0b101"), 5.0);
        assert_eq!(parse_numeric_text("0o17"), 15.0);
        assert_eq!(parse_numeric_text("1.5e3"), 1500.0);
        assert_eq!(parse_numeric_text(".5"), 0.5);
        assert!(parse_numeric_text("abc").is_nan());
    }

    #[test]
    fn test_script_kind_from_file_name() {
        assert_eq!(ScriptKind::from_file_name("a.ts"), ScriptKind::TS);
        assert_eq!(ScriptKind::from_file_name("a.d.ts"), ScriptKind::TS);
        assert_eq!(ScriptKind::from_file_name("A.TSX"), ScriptKind::TSX);
        assert_eq!(ScriptKind::from_file_name("a.mjs"), ScriptKind::JS);
    }

    #[test]
    fn test_entity_name_dotted() {
        let inner = QualifiedName {
            data: NodeData::new(SyntaxKind::QualifiedName, 0, 3),
            left: EntityName::Identifier(Identifier {
                data: NodeData::new(SyntaxKind::Identifier, 0, 1),
                text: "A",
                original_keyword_kind: None,
            }),
            right: Identifier {
                data: NodeData::new(SyntaxKind::Identifier, 2, 3),
                text: "B",
                original_keyword_kind: None,
            },
        };
        let name = EntityName::QualifiedName(&inner);
        assert_eq!(name.to_dotted_string(), "A.B");
        assert!(name.as_identifier().is_none());
    }
}
