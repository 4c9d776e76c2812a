//! A uniform, copyable view over every kind of tree node.
//!
//! The typed AST in [`crate::node`] spreads nodes over many structs and enums.
//! `Node` wraps a borrow of any of them so generic walkers can work with a
//! single type: ask for its kind, range and modifiers, enumerate its children
//! in document order, and downcast back to the concrete struct.

use crate::node::*;
use crate::syntax_kind::SyntaxKind;
use crate::types::ModifierFlags;
use rscript_core::text::TextRange;
use std::ops::ControlFlow;

#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    SourceFile(&'a SourceFile<'a>),
    Statement(&'a Statement<'a>),
    Expression(&'a Expression<'a>),
    TypeNode(&'a TypeNode<'a>),
    TypeElement(&'a TypeElement<'a>),
    ClassElement(&'a ClassElement<'a>),
    ObjectLiteralElement(&'a ObjectLiteralElement<'a>),
    Identifier(&'a Identifier<'a>),
    StringLiteral(&'a StringLiteral<'a>),
    NumericLiteral(&'a NumericLiteral<'a>),
    QualifiedName(&'a QualifiedName<'a>),
    ComputedPropertyName(&'a ComputedPropertyName<'a>),
    ObjectBindingPattern(&'a ObjectBindingPattern<'a>),
    ArrayBindingPattern(&'a ArrayBindingPattern<'a>),
    BindingElement(&'a BindingElement<'a>),
    VariableDeclarationList(&'a VariableDeclarationList<'a>),
    VariableDeclaration(&'a VariableDeclaration<'a>),
    Parameter(&'a ParameterDeclaration<'a>),
    TypeParameter(&'a TypeParameterDeclaration<'a>),
    Decorator(&'a Decorator<'a>),
    HeritageClause(&'a HeritageClause<'a>),
    ExpressionWithTypeArguments(&'a ExpressionWithTypeArguments<'a>),
    TemplateSpan(&'a TemplateSpan<'a>),
    TemplateLiteralTypeSpan(&'a TemplateLiteralTypeSpan<'a>),
    TemplateLiteral(&'a TemplateLiteralLikeNode<'a>),
    Block(&'a Block<'a>),
    ModuleBlock(&'a ModuleBlock<'a>),
    ModuleDeclaration(&'a ModuleDeclaration<'a>),
    CaseBlock(&'a CaseBlock<'a>),
    CaseClause(&'a CaseOrDefaultClause<'a>),
    CatchClause(&'a CatchClause<'a>),
    EnumMember(&'a EnumMember<'a>),
    ImportClause(&'a ImportClause<'a>),
    NamespaceImport(&'a NamespaceImport<'a>),
    NamedImports(&'a NamedImports<'a>),
    ImportSpecifier(&'a ImportSpecifier<'a>),
    NamedExports(&'a NamedExports<'a>),
    NamespaceExport(&'a NamespaceExport<'a>),
    ExportSpecifier(&'a ExportSpecifier<'a>),
}

impl<'a> Node<'a> {
    pub fn data(self) -> &'a NodeData {
        match self {
            Node::SourceFile(n) => &n.data,
            Node::Statement(n) => n.data(),
            Node::Expression(n) => n.data(),
            Node::TypeNode(n) => n.data(),
            Node::TypeElement(n) => n.data(),
            Node::ClassElement(n) => n.data(),
            Node::ObjectLiteralElement(n) => n.data(),
            Node::Identifier(n) => &n.data,
            Node::StringLiteral(n) => &n.data,
            Node::NumericLiteral(n) => &n.data,
            Node::QualifiedName(n) => &n.data,
            Node::ComputedPropertyName(n) => &n.data,
            Node::ObjectBindingPattern(n) => &n.data,
            Node::ArrayBindingPattern(n) => &n.data,
            Node::BindingElement(n) => &n.data,
            Node::VariableDeclarationList(n) => &n.data,
            Node::VariableDeclaration(n) => &n.data,
            Node::Parameter(n) => &n.data,
            Node::TypeParameter(n) => &n.data,
            Node::Decorator(n) => &n.data,
            Node::HeritageClause(n) => &n.data,
            Node::ExpressionWithTypeArguments(n) => &n.data,
            Node::TemplateSpan(n) => &n.data,
            Node::TemplateLiteralTypeSpan(n) => &n.data,
            Node::TemplateLiteral(n) => &n.data,
            Node::Block(n) => &n.data,
            Node::ModuleBlock(n) => &n.data,
            Node::ModuleDeclaration(n) => &n.data,
            Node::CaseBlock(n) => &n.data,
            Node::CaseClause(n) => &n.data,
            Node::CatchClause(n) => &n.data,
            Node::EnumMember(n) => &n.data,
            Node::ImportClause(n) => &n.data,
            Node::NamespaceImport(n) => &n.data,
            Node::NamedImports(n) => &n.data,
            Node::ImportSpecifier(n) => &n.data,
            Node::NamedExports(n) => &n.data,
            Node::NamespaceExport(n) => &n.data,
            Node::ExportSpecifier(n) => &n.data,
        }
    }

    #[inline]
    pub fn kind(self) -> SyntaxKind {
        self.data().kind
    }

    #[inline]
    pub fn range(self) -> TextRange {
        self.data().range
    }

    #[inline]
    pub fn modifier_flags(self) -> ModifierFlags {
        self.data().modifier_flags
    }

    /// Whether nodes of this kind carry a modifier list at all.
    pub fn can_have_modifiers(self) -> bool {
        matches!(
            self.kind(),
            SyntaxKind::VariableStatement
                | SyntaxKind::FunctionDeclaration
                | SyntaxKind::FunctionExpression
                | SyntaxKind::ArrowFunction
                | SyntaxKind::ClassDeclaration
                | SyntaxKind::ClassExpression
                | SyntaxKind::InterfaceDeclaration
                | SyntaxKind::TypeAliasDeclaration
                | SyntaxKind::EnumDeclaration
                | SyntaxKind::ModuleDeclaration
                | SyntaxKind::ImportDeclaration
                | SyntaxKind::ExportDeclaration
                | SyntaxKind::ExportAssignment
                | SyntaxKind::Parameter
                | SyntaxKind::PropertyDeclaration
                | SyntaxKind::PropertySignature
                | SyntaxKind::MethodDeclaration
                | SyntaxKind::MethodSignature
                | SyntaxKind::Constructor
                | SyntaxKind::GetAccessor
                | SyntaxKind::SetAccessor
                | SyntaxKind::IndexSignature
        )
    }

    /// The modifier list of the node, or `None` if the kind has none.
    pub fn modifiers(self) -> Option<ModifierFlags> {
        if self.can_have_modifiers() {
            Some(self.modifier_flags())
        } else {
            None
        }
    }

    /// The source text the node spans, without leading trivia.
    pub fn source_text<'s>(self, source_file: &'s SourceFile<'_>) -> &'s str {
        source_file.text_of(self.range())
    }

    /// Children in document order.
    pub fn children(self) -> Vec<Node<'a>> {
        let mut out = Vec::new();
        self.push_children(&mut out);
        out
    }

    /// Visit the children in document order until `f` breaks.
    pub fn for_each_child<B>(
        self,
        mut f: impl FnMut(Node<'a>) -> ControlFlow<B>,
    ) -> ControlFlow<B> {
        for child in self.children() {
            f(child)?;
        }
        ControlFlow::Continue(())
    }

    // ------------------------------------------------------------------------
    // Downcasts
    // ------------------------------------------------------------------------

    pub fn as_source_file(self) -> Option<&'a SourceFile<'a>> {
        match self {
            Node::SourceFile(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_statement(self) -> Option<&'a Statement<'a>> {
        match self {
            Node::Statement(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_expression(self) -> Option<&'a Expression<'a>> {
        match self {
            Node::Expression(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_type_node(self) -> Option<&'a TypeNode<'a>> {
        match self {
            Node::TypeNode(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_type_element(self) -> Option<&'a TypeElement<'a>> {
        match self {
            Node::TypeElement(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_variable_declaration(self) -> Option<&'a VariableDeclaration<'a>> {
        match self {
            Node::VariableDeclaration(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_call_expression(self) -> Option<&'a CallExpression<'a>> {
        match self {
            Node::Expression(Expression::CallExpression(n)) => Some(n),
            _ => None,
        }
    }

    pub fn as_object_literal(self) -> Option<&'a ObjectLiteralExpression<'a>> {
        match self {
            Node::Expression(Expression::ObjectLiteralExpression(n)) => Some(n),
            _ => None,
        }
    }

    pub fn as_function_declaration(self) -> Option<&'a FunctionDeclaration<'a>> {
        match self {
            Node::Statement(Statement::FunctionDeclaration(n)) => Some(n),
            Node::Expression(Expression::FunctionExpression(n)) => Some(n),
            _ => None,
        }
    }

    pub fn as_class_declaration(self) -> Option<&'a ClassDeclaration<'a>> {
        match self {
            Node::Statement(Statement::ClassDeclaration(n)) => Some(n),
            Node::Expression(Expression::ClassExpression(n)) => Some(n),
            _ => None,
        }
    }

    pub fn as_interface_declaration(self) -> Option<&'a InterfaceDeclaration<'a>> {
        match self {
            Node::Statement(Statement::InterfaceDeclaration(n)) => Some(n),
            _ => None,
        }
    }

    pub fn as_type_alias_declaration(self) -> Option<&'a TypeAliasDeclaration<'a>> {
        match self {
            Node::Statement(Statement::TypeAliasDeclaration(n)) => Some(n),
            _ => None,
        }
    }

    // ------------------------------------------------------------------------
    // Child enumeration
    // ------------------------------------------------------------------------

    fn push_children(self, out: &mut Vec<Node<'a>>) {
        match self {
            Node::SourceFile(n) => push_statements(out, n.statements),
            Node::Statement(n) => push_statement_children(out, n),
            Node::Expression(n) => push_expression_children(out, n),
            Node::TypeNode(n) => push_type_children(out, n),
            Node::TypeElement(n) => push_type_element_children(out, n),
            Node::ClassElement(n) => push_class_element_children(out, n),
            Node::ObjectLiteralElement(n) => push_object_element_children(out, n),
            Node::Identifier(_) | Node::StringLiteral(_) | Node::NumericLiteral(_) => {}
            Node::TemplateLiteral(_) => {}
            Node::QualifiedName(n) => {
                push_entity_name(out, &n.left);
                out.push(Node::Identifier(&n.right));
            }
            Node::ComputedPropertyName(n) => out.push(Node::Expression(n.expression)),
            Node::ObjectBindingPattern(n) => {
                out.extend(n.elements.iter().map(Node::BindingElement));
            }
            Node::ArrayBindingPattern(n) => {
                for element in n.elements {
                    if let ArrayBindingElement::BindingElement(e) = element {
                        out.push(Node::BindingElement(e));
                    }
                }
            }
            Node::BindingElement(n) => {
                if let Some(name) = &n.property_name {
                    push_property_name(out, name);
                }
                push_binding_name(out, &n.name);
                push_opt_expression(out, n.initializer);
            }
            Node::VariableDeclarationList(n) => {
                out.extend(n.declarations.iter().map(Node::VariableDeclaration));
            }
            Node::VariableDeclaration(n) => {
                push_binding_name(out, &n.name);
                push_opt_type(out, n.type_annotation);
                push_opt_expression(out, n.initializer);
            }
            Node::Parameter(n) => {
                out.extend(n.decorators.iter().map(Node::Decorator));
                push_binding_name(out, &n.name);
                push_opt_type(out, n.type_annotation);
                push_opt_expression(out, n.initializer);
            }
            Node::TypeParameter(n) => {
                out.push(Node::Identifier(&n.name));
                push_opt_type(out, n.constraint);
                push_opt_type(out, n.default);
            }
            Node::Decorator(n) => out.push(Node::Expression(n.expression)),
            Node::HeritageClause(n) => {
                out.extend(n.types.iter().map(Node::ExpressionWithTypeArguments));
            }
            Node::ExpressionWithTypeArguments(n) => {
                out.push(Node::Expression(n.expression));
                push_opt_types(out, n.type_arguments);
            }
            Node::TemplateSpan(n) => {
                out.push(Node::Expression(n.expression));
                out.push(Node::TemplateLiteral(&n.literal));
            }
            Node::TemplateLiteralTypeSpan(n) => {
                out.push(Node::TypeNode(n.type_node));
                out.push(Node::TemplateLiteral(&n.literal));
            }
            Node::Block(n) => push_statements(out, n.statements),
            Node::ModuleBlock(n) => push_statements(out, n.statements),
            Node::ModuleDeclaration(n) => push_module_children(out, n),
            Node::CaseBlock(n) => out.extend(n.clauses.iter().map(Node::CaseClause)),
            Node::CaseClause(n) => {
                push_opt_expression(out, n.expression);
                push_statements(out, n.statements);
            }
            Node::CatchClause(n) => {
                if let Some(decl) = n.variable_declaration {
                    out.push(Node::VariableDeclaration(decl));
                }
                out.push(Node::Block(n.block));
            }
            Node::EnumMember(n) => {
                push_property_name(out, &n.name);
                push_opt_expression(out, n.initializer);
            }
            Node::ImportClause(n) => {
                if let Some(name) = &n.name {
                    out.push(Node::Identifier(name));
                }
                match &n.named_bindings {
                    Some(NamedImportBindings::NamespaceImport(ns)) => {
                        out.push(Node::NamespaceImport(ns))
                    }
                    Some(NamedImportBindings::NamedImports(named)) => {
                        out.push(Node::NamedImports(named))
                    }
                    None => {}
                }
            }
            Node::NamespaceImport(n) => out.push(Node::Identifier(&n.name)),
            Node::NamedImports(n) => out.extend(n.elements.iter().map(Node::ImportSpecifier)),
            Node::ImportSpecifier(n) => {
                if let Some(property_name) = &n.property_name {
                    out.push(Node::Identifier(property_name));
                }
                out.push(Node::Identifier(&n.name));
            }
            Node::NamedExports(n) => out.extend(n.elements.iter().map(Node::ExportSpecifier)),
            Node::NamespaceExport(n) => out.push(Node::Identifier(&n.name)),
            Node::ExportSpecifier(n) => {
                if let Some(property_name) = &n.property_name {
                    out.push(Node::Identifier(property_name));
                }
                out.push(Node::Identifier(&n.name));
            }
        }
    }
}

impl<'a> From<&'a SourceFile<'a>> for Node<'a> {
    fn from(source_file: &'a SourceFile<'a>) -> Self {
        Node::SourceFile(source_file)
    }
}

impl<'a> From<&'a Statement<'a>> for Node<'a> {
    fn from(statement: &'a Statement<'a>) -> Self {
        Node::Statement(statement)
    }
}

impl<'a> From<&'a Expression<'a>> for Node<'a> {
    fn from(expression: &'a Expression<'a>) -> Self {
        Node::Expression(expression)
    }
}

impl<'a> From<&'a TypeNode<'a>> for Node<'a> {
    fn from(type_node: &'a TypeNode<'a>) -> Self {
        Node::TypeNode(type_node)
    }
}

// ============================================================================
// Per-family child enumeration
// ============================================================================

fn push_statements<'a>(out: &mut Vec<Node<'a>>, statements: &'a [Statement<'a>]) {
    out.extend(statements.iter().map(Node::Statement));
}

fn push_opt_expression<'a>(out: &mut Vec<Node<'a>>, expr: Option<&'a Expression<'a>>) {
    if let Some(expr) = expr {
        out.push(Node::Expression(expr));
    }
}

fn push_opt_type<'a>(out: &mut Vec<Node<'a>>, ty: Option<&'a TypeNode<'a>>) {
    if let Some(ty) = ty {
        out.push(Node::TypeNode(ty));
    }
}

fn push_opt_types<'a>(out: &mut Vec<Node<'a>>, types: Option<&'a [TypeNode<'a>]>) {
    if let Some(types) = types {
        out.extend(types.iter().map(Node::TypeNode));
    }
}

fn push_type_parameters<'a>(
    out: &mut Vec<Node<'a>>,
    params: Option<&'a [TypeParameterDeclaration<'a>]>,
) {
    if let Some(params) = params {
        out.extend(params.iter().map(Node::TypeParameter));
    }
}

fn push_parameters<'a>(out: &mut Vec<Node<'a>>, params: &'a [ParameterDeclaration<'a>]) {
    out.extend(params.iter().map(Node::Parameter));
}

fn push_opt_block<'a>(out: &mut Vec<Node<'a>>, block: Option<&'a Block<'a>>) {
    if let Some(block) = block {
        out.push(Node::Block(block));
    }
}

fn push_entity_name<'a>(out: &mut Vec<Node<'a>>, name: &'a EntityName<'a>) {
    match name {
        EntityName::Identifier(id) => out.push(Node::Identifier(id)),
        EntityName::QualifiedName(q) => out.push(Node::QualifiedName(q)),
    }
}

fn push_property_name<'a>(out: &mut Vec<Node<'a>>, name: &'a PropertyName<'a>) {
    match name {
        PropertyName::Identifier(id) | PropertyName::PrivateIdentifier(id) => {
            out.push(Node::Identifier(id))
        }
        PropertyName::StringLiteral(s) => out.push(Node::StringLiteral(s)),
        PropertyName::NumericLiteral(n) => out.push(Node::NumericLiteral(n)),
        PropertyName::ComputedPropertyName(c) => out.push(Node::ComputedPropertyName(c)),
    }
}

fn push_binding_name<'a>(out: &mut Vec<Node<'a>>, name: &'a BindingName<'a>) {
    match name {
        BindingName::Identifier(id) => out.push(Node::Identifier(id)),
        BindingName::ObjectBindingPattern(p) => out.push(Node::ObjectBindingPattern(p)),
        BindingName::ArrayBindingPattern(p) => out.push(Node::ArrayBindingPattern(p)),
    }
}

fn push_for_initializer<'a>(out: &mut Vec<Node<'a>>, init: &'a ForInitializer<'a>) {
    match init {
        ForInitializer::VariableDeclarationList(list) => {
            out.push(Node::VariableDeclarationList(list))
        }
        ForInitializer::Expression(expr) => out.push(Node::Expression(expr)),
    }
}

fn push_module_children<'a>(out: &mut Vec<Node<'a>>, n: &'a ModuleDeclaration<'a>) {
    match &n.name {
        ModuleName::Identifier(id) => out.push(Node::Identifier(id)),
        ModuleName::StringLiteral(s) => out.push(Node::StringLiteral(s)),
    }
    match &n.body {
        Some(ModuleBody::ModuleBlock(block)) => out.push(Node::ModuleBlock(block)),
        Some(ModuleBody::ModuleDeclaration(inner)) => out.push(Node::ModuleDeclaration(inner)),
        None => {}
    }
}

fn push_class_children<'a>(out: &mut Vec<Node<'a>>, n: &'a ClassDeclaration<'a>) {
    out.extend(n.decorators.iter().map(Node::Decorator));
    if let Some(name) = &n.name {
        out.push(Node::Identifier(name));
    }
    push_type_parameters(out, n.type_parameters);
    out.extend(n.heritage_clauses.iter().map(Node::HeritageClause));
    out.extend(n.members.iter().map(Node::ClassElement));
}

fn push_function_children<'a>(out: &mut Vec<Node<'a>>, n: &'a FunctionDeclaration<'a>) {
    if let Some(name) = &n.name {
        out.push(Node::Identifier(name));
    }
    push_type_parameters(out, n.type_parameters);
    push_parameters(out, n.parameters);
    push_opt_type(out, n.return_type);
    push_opt_block(out, n.body);
}

fn push_method_children<'a>(out: &mut Vec<Node<'a>>, n: &'a MethodDeclaration<'a>) {
    out.extend(n.decorators.iter().map(Node::Decorator));
    push_property_name(out, &n.name);
    push_type_parameters(out, n.type_parameters);
    push_parameters(out, n.parameters);
    push_opt_type(out, n.return_type);
    push_opt_block(out, n.body);
}

fn push_accessor_children<'a>(out: &mut Vec<Node<'a>>, n: &'a AccessorDeclaration<'a>) {
    out.extend(n.decorators.iter().map(Node::Decorator));
    push_property_name(out, &n.name);
    push_parameters(out, n.parameters);
    push_opt_type(out, n.return_type);
    push_opt_block(out, n.body);
}

fn push_statement_children<'a>(out: &mut Vec<Node<'a>>, stmt: &'a Statement<'a>) {
    match stmt {
        Statement::VariableStatement(n) => {
            out.push(Node::VariableDeclarationList(&n.declaration_list))
        }
        Statement::FunctionDeclaration(n) => push_function_children(out, n),
        Statement::ClassDeclaration(n) => push_class_children(out, n),
        Statement::InterfaceDeclaration(n) => {
            out.push(Node::Identifier(&n.name));
            push_type_parameters(out, n.type_parameters);
            out.extend(n.heritage_clauses.iter().map(Node::HeritageClause));
            out.extend(n.members.iter().map(Node::TypeElement));
        }
        Statement::TypeAliasDeclaration(n) => {
            out.push(Node::Identifier(&n.name));
            push_type_parameters(out, n.type_parameters);
            out.push(Node::TypeNode(n.type_node));
        }
        Statement::EnumDeclaration(n) => {
            out.push(Node::Identifier(&n.name));
            out.extend(n.members.iter().map(Node::EnumMember));
        }
        Statement::ModuleDeclaration(n) => push_module_children(out, n),
        Statement::ImportDeclaration(n) => {
            if let Some(clause) = &n.import_clause {
                out.push(Node::ImportClause(clause));
            }
            out.push(Node::Expression(n.module_specifier));
        }
        Statement::ExportDeclaration(n) => {
            match &n.export_clause {
                Some(NamedExportBindings::NamedExports(named)) => {
                    out.push(Node::NamedExports(named))
                }
                Some(NamedExportBindings::NamespaceExport(ns)) => {
                    out.push(Node::NamespaceExport(ns))
                }
                None => {}
            }
            push_opt_expression(out, n.module_specifier);
        }
        Statement::ExportAssignment(n) => out.push(Node::Expression(n.expression)),
        Statement::Block(n) => push_statements(out, n.statements),
        Statement::EmptyStatement(_)
        | Statement::DebuggerStatement(_)
        | Statement::MissingDeclaration(_) => {}
        Statement::ExpressionStatement(n) => out.push(Node::Expression(n.expression)),
        Statement::IfStatement(n) => {
            out.push(Node::Expression(n.expression));
            out.push(Node::Statement(n.then_statement));
            if let Some(else_statement) = n.else_statement {
                out.push(Node::Statement(else_statement));
            }
        }
        Statement::DoStatement(n) => {
            out.push(Node::Statement(n.statement));
            out.push(Node::Expression(n.expression));
        }
        Statement::WhileStatement(n) => {
            out.push(Node::Expression(n.expression));
            out.push(Node::Statement(n.statement));
        }
        Statement::ForStatement(n) => {
            if let Some(init) = &n.initializer {
                push_for_initializer(out, init);
            }
            push_opt_expression(out, n.condition);
            push_opt_expression(out, n.incrementor);
            out.push(Node::Statement(n.statement));
        }
        Statement::ForInStatement(n) | Statement::ForOfStatement(n) => {
            push_for_initializer(out, &n.initializer);
            out.push(Node::Expression(n.expression));
            out.push(Node::Statement(n.statement));
        }
        Statement::ContinueStatement(n) | Statement::BreakStatement(n) => {
            if let Some(label) = &n.label {
                out.push(Node::Identifier(label));
            }
        }
        Statement::ReturnStatement(n) => push_opt_expression(out, n.expression),
        Statement::SwitchStatement(n) => {
            out.push(Node::Expression(n.expression));
            out.push(Node::CaseBlock(&n.case_block));
        }
        Statement::LabeledStatement(n) => {
            out.push(Node::Identifier(&n.label));
            out.push(Node::Statement(n.statement));
        }
        Statement::ThrowStatement(n) => out.push(Node::Expression(n.expression)),
        Statement::TryStatement(n) => {
            out.push(Node::Block(n.try_block));
            if let Some(catch_clause) = &n.catch_clause {
                out.push(Node::CatchClause(catch_clause));
            }
            push_opt_block(out, n.finally_block);
        }
    }
}

fn push_expression_children<'a>(out: &mut Vec<Node<'a>>, expr: &'a Expression<'a>) {
    match expr {
        Expression::Identifier(_)
        | Expression::PrivateIdentifier(_)
        | Expression::StringLiteral(_)
        | Expression::NumericLiteral(_)
        | Expression::BigIntLiteral(_)
        | Expression::RegularExpressionLiteral(_)
        | Expression::NoSubstitutionTemplateLiteral(_)
        | Expression::TrueKeyword(_)
        | Expression::FalseKeyword(_)
        | Expression::NullKeyword(_)
        | Expression::ThisKeyword(_)
        | Expression::SuperKeyword(_)
        | Expression::OmittedExpression(_) => {}
        Expression::TemplateExpression(n) => {
            out.push(Node::TemplateLiteral(&n.head));
            out.extend(n.template_spans.iter().map(Node::TemplateSpan));
        }
        Expression::ArrayLiteralExpression(n) => {
            out.extend(n.elements.iter().map(Node::Expression));
        }
        Expression::ObjectLiteralExpression(n) => {
            out.extend(n.properties.iter().map(Node::ObjectLiteralElement));
        }
        Expression::PropertyAccessExpression(n) => {
            out.push(Node::Expression(n.expression));
            out.push(Node::Identifier(&n.name));
        }
        Expression::ElementAccessExpression(n) => {
            out.push(Node::Expression(n.expression));
            out.push(Node::Expression(n.argument_expression));
        }
        Expression::CallExpression(n) => {
            out.push(Node::Expression(n.expression));
            push_opt_types(out, n.type_arguments);
            out.extend(n.arguments.iter().map(Node::Expression));
        }
        Expression::NewExpression(n) => {
            out.push(Node::Expression(n.expression));
            push_opt_types(out, n.type_arguments);
            if let Some(args) = n.arguments {
                out.extend(args.iter().map(Node::Expression));
            }
        }
        Expression::TaggedTemplateExpression(n) => {
            out.push(Node::Expression(n.tag));
            push_opt_types(out, n.type_arguments);
            out.push(Node::Expression(n.template));
        }
        Expression::ParenthesizedExpression(n)
        | Expression::DeleteExpression(n)
        | Expression::TypeOfExpression(n)
        | Expression::VoidExpression(n)
        | Expression::AwaitExpression(n)
        | Expression::SpreadElement(n)
        | Expression::NonNullExpression(n) => out.push(Node::Expression(n.expression)),
        Expression::FunctionExpression(n) => push_function_children(out, n),
        Expression::ArrowFunction(n) => {
            push_type_parameters(out, n.type_parameters);
            push_parameters(out, n.parameters);
            push_opt_type(out, n.return_type);
            match &n.body {
                ConciseBody::Block(block) => out.push(Node::Block(block)),
                ConciseBody::Expression(body) => out.push(Node::Expression(body)),
            }
        }
        Expression::PrefixUnaryExpression(n) => out.push(Node::Expression(n.operand)),
        Expression::PostfixUnaryExpression(n) => out.push(Node::Expression(n.operand)),
        Expression::BinaryExpression(n) => {
            out.push(Node::Expression(n.left));
            out.push(Node::Expression(n.right));
        }
        Expression::ConditionalExpression(n) => {
            out.push(Node::Expression(n.condition));
            out.push(Node::Expression(n.when_true));
            out.push(Node::Expression(n.when_false));
        }
        Expression::YieldExpression(n) => push_opt_expression(out, n.expression),
        Expression::ClassExpression(n) => push_class_children(out, n),
        Expression::AsExpression(n) | Expression::SatisfiesExpression(n) => {
            out.push(Node::Expression(n.expression));
            out.push(Node::TypeNode(n.type_node));
        }
    }
}

fn push_type_children<'a>(out: &mut Vec<Node<'a>>, ty: &'a TypeNode<'a>) {
    match ty {
        TypeNode::KeywordType(_) | TypeNode::ThisType(_) => {}
        TypeNode::TypeReference(n) => {
            push_entity_name(out, &n.type_name);
            push_opt_types(out, n.type_arguments);
        }
        TypeNode::FunctionType(n) | TypeNode::ConstructorType(n) => {
            push_type_parameters(out, n.type_parameters);
            push_parameters(out, n.parameters);
            out.push(Node::TypeNode(n.return_type));
        }
        TypeNode::TypeQuery(n) => push_entity_name(out, &n.expr_name),
        TypeNode::TypeLiteral(n) => out.extend(n.members.iter().map(Node::TypeElement)),
        TypeNode::ArrayType(n) => out.push(Node::TypeNode(n.element_type)),
        TypeNode::TupleType(n) => out.extend(n.elements.iter().map(Node::TypeNode)),
        TypeNode::OptionalType(n) | TypeNode::RestType(n) | TypeNode::ParenthesizedType(n) => {
            out.push(Node::TypeNode(n.type_node))
        }
        TypeNode::NamedTupleMember(n) => {
            out.push(Node::Identifier(&n.name));
            out.push(Node::TypeNode(n.type_node));
        }
        TypeNode::UnionType(n) => out.extend(n.types.iter().map(Node::TypeNode)),
        TypeNode::IntersectionType(n) => out.extend(n.types.iter().map(Node::TypeNode)),
        TypeNode::ConditionalType(n) => {
            out.push(Node::TypeNode(n.check_type));
            out.push(Node::TypeNode(n.extends_type));
            out.push(Node::TypeNode(n.true_type));
            out.push(Node::TypeNode(n.false_type));
        }
        TypeNode::InferType(n) => out.push(Node::TypeParameter(n.type_parameter)),
        TypeNode::TypeOperator(n) => out.push(Node::TypeNode(n.type_node)),
        TypeNode::IndexedAccessType(n) => {
            out.push(Node::TypeNode(n.object_type));
            out.push(Node::TypeNode(n.index_type));
        }
        TypeNode::MappedType(n) => {
            out.push(Node::TypeParameter(n.type_parameter));
            push_opt_type(out, n.name_type);
            push_opt_type(out, n.type_node);
        }
        TypeNode::LiteralType(n) => out.push(Node::Expression(n.literal)),
        TypeNode::TemplateLiteralType(n) => {
            out.push(Node::TemplateLiteral(&n.head));
            out.extend(n.template_spans.iter().map(Node::TemplateLiteralTypeSpan));
        }
        TypeNode::TypePredicate(n) => {
            out.push(Node::Identifier(&n.parameter_name));
            push_opt_type(out, n.type_node);
        }
    }
}

fn push_type_element_children<'a>(out: &mut Vec<Node<'a>>, element: &'a TypeElement<'a>) {
    match element {
        TypeElement::PropertySignature(n) => {
            push_property_name(out, &n.name);
            push_opt_type(out, n.type_annotation);
        }
        TypeElement::MethodSignature(n) => {
            push_property_name(out, &n.name);
            push_type_parameters(out, n.type_parameters);
            push_parameters(out, n.parameters);
            push_opt_type(out, n.return_type);
        }
        TypeElement::CallSignature(n) | TypeElement::ConstructSignature(n) => {
            push_type_parameters(out, n.type_parameters);
            push_parameters(out, n.parameters);
            push_opt_type(out, n.return_type);
        }
        TypeElement::IndexSignature(n) => {
            push_parameters(out, n.parameters);
            push_opt_type(out, n.type_annotation);
        }
    }
}

fn push_class_element_children<'a>(out: &mut Vec<Node<'a>>, element: &'a ClassElement<'a>) {
    match element {
        ClassElement::PropertyDeclaration(n) => {
            out.extend(n.decorators.iter().map(Node::Decorator));
            push_property_name(out, &n.name);
            push_opt_type(out, n.type_annotation);
            push_opt_expression(out, n.initializer);
        }
        ClassElement::MethodDeclaration(n) => push_method_children(out, n),
        ClassElement::Constructor(n) => {
            push_parameters(out, n.parameters);
            push_opt_block(out, n.body);
        }
        ClassElement::GetAccessor(n) | ClassElement::SetAccessor(n) => {
            push_accessor_children(out, n)
        }
        ClassElement::IndexSignature(n) => {
            push_parameters(out, n.parameters);
            push_opt_type(out, n.type_annotation);
        }
        ClassElement::SemicolonClassElement(_) => {}
    }
}

fn push_object_element_children<'a>(
    out: &mut Vec<Node<'a>>,
    element: &'a ObjectLiteralElement<'a>,
) {
    match element {
        ObjectLiteralElement::PropertyAssignment(n) => {
            push_property_name(out, &n.name);
            out.push(Node::Expression(n.initializer));
        }
        ObjectLiteralElement::ShorthandPropertyAssignment(n) => {
            out.push(Node::Identifier(&n.name));
            push_opt_expression(out, n.object_assignment_initializer);
        }
        ObjectLiteralElement::SpreadAssignment(n) => out.push(Node::Expression(n.expression)),
        ObjectLiteralElement::MethodDeclaration(n) => push_method_children(out, n),
        ObjectLiteralElement::GetAccessor(n) | ObjectLiteralElement::SetAccessor(n) => {
            push_accessor_children(out, n)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NodeFlags;

    fn ident(text: &'static str, pos: u32) -> Identifier<'static> {
        Identifier {
            data: NodeData::new(SyntaxKind::Identifier, pos, pos + text.len() as u32),
            text,
            original_keyword_kind: None,
        }
    }

    #[test]
    fn test_binary_children_in_order() {
        let left = Expression::Identifier(ident("a", 0));
        let right = Expression::Identifier(ident("b", 4));
        let binary = Expression::BinaryExpression(BinaryExpression {
            data: NodeData::new(SyntaxKind::BinaryExpression, 0, 5),
            left: &left,
            operator_token: Token::new(SyntaxKind::PlusToken, 2, 3),
            right: &right,
        });
        let node = Node::Expression(&binary);
        let kids = node.children();
        assert_eq!(kids.len(), 2);
        assert_eq!(kids[0].range().pos, 0);
        assert_eq!(kids[1].range().pos, 4);
        assert_eq!(node.modifiers(), None);
    }

    #[test]
    fn test_for_each_child_breaks_early() {
        let a = Expression::Identifier(ident("a", 1));
        let b = Expression::Identifier(ident("b", 4));
        let elements = [a, b];
        let array = Expression::ArrayLiteralExpression(ArrayLiteralExpression {
            data: NodeData::new(SyntaxKind::ArrayLiteralExpression, 0, 6),
            elements: &elements,
        });
        let mut seen = 0;
        let result = Node::Expression(&array).for_each_child(|_| {
            seen += 1;
            ControlFlow::Break(())
        });
        assert!(result.is_break());
        assert_eq!(seen, 1);
    }

    #[test]
    fn test_variable_statement_modifiers() {
        let decls = [VariableDeclaration {
            data: NodeData::new(SyntaxKind::VariableDeclaration, 13, 18),
            name: BindingName::Identifier(ident("x", 13)),
            exclamation_token: false,
            type_annotation: None,
            initializer: None,
        }];
        let stmt = Statement::VariableStatement(VariableStatement {
            data: NodeData::new(SyntaxKind::VariableStatement, 0, 19)
                .with_modifiers(ModifierFlags::EXPORT),
            declaration_list: VariableDeclarationList {
                data: NodeData::new(SyntaxKind::VariableDeclarationList, 7, 18)
                    .with_flags(NodeFlags::CONST),
                declarations: &decls,
            },
        });
        let node = Node::Statement(&stmt);
        assert_eq!(node.modifiers(), Some(ModifierFlags::EXPORT));
        let list = node.children();
        assert_eq!(list[0].kind(), SyntaxKind::VariableDeclarationList);
        assert_eq!(list[0].children()[0].kind(), SyntaxKind::VariableDeclaration);
    }
}
