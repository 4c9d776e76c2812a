//! The type checker implementation.
//!
//! The checker turns declarations and type annotations into types stored in
//! a [`TypeTable`]. Each checked file is bound first, then checked in two
//! passes: named types (interfaces, classes, enums) get placeholder object
//! types, and everything is then resolved against those placeholders so
//! declarations may refer to each other in any order. Results are published
//! under their dotted names, which later files and queries resolve against.
//!
//! Anything the checker cannot resolve is `any`. No semantic diagnostics are
//! produced.

use crate::default_lib::{DEFAULT_LIB, DEFAULT_LIB_FILE_NAME};
use crate::types::{ObjectType, Property, Signature, SignatureParameter, TypeKind, TypeTable};
use bumpalo::Bump;
use indexmap::IndexMap;
use rscript_ast::node::*;
use rscript_ast::node_ref::Node;
use rscript_ast::syntax_kind::SyntaxKind;
use rscript_ast::types::*;
use rscript_binder::{bind_source_file, Binder, Declaration};
use rustc_hash::{FxHashMap, FxHashSet};

/// Maximum recursion depth for type stringification to prevent stack overflow.
const MAX_TYPE_TO_STRING_DEPTH: u32 = 20;

/// A resolved named type together with the type parameters it declares.
#[derive(Debug, Clone)]
struct DeclaredType {
    type_id: TypeId,
    type_parameters: Vec<TypeId>,
}

impl DeclaredType {
    fn plain(type_id: TypeId) -> Self {
        Self { type_id, type_parameters: Vec::new() }
    }
}

/// Per-file resolution state.
///
/// Symbols are only meaningful for the binder that created them, so memo
/// tables keyed by `SymbolId` live here rather than on the checker. Queries
/// made after checking use a context without a binder and resolve names
/// through the checker's registry only.
struct Context<'b, 'a> {
    binder: Option<&'b Binder<'a>>,
    declared: FxHashMap<SymbolId, DeclaredType>,
    value_types: FxHashMap<SymbolId, TypeId>,
    /// Symbols whose type is being computed; re-entry resolves to `any`.
    resolving: FxHashSet<SymbolId>,
    members_done: FxHashSet<SymbolId>,
    type_parameter_scopes: Vec<Vec<(String, TypeId)>>,
    /// Namespaces enclosing the declaration being resolved, outermost first.
    containers: Vec<SymbolId>,
    /// Set inside `as const`, where literals are not widened.
    in_const_context: bool,
}

type SavedScope = (Vec<Vec<(String, TypeId)>>, Vec<SymbolId>);

impl<'b, 'a> Context<'b, 'a> {
    fn new(binder: Option<&'b Binder<'a>>) -> Self {
        Self {
            binder,
            declared: FxHashMap::default(),
            value_types: FxHashMap::default(),
            resolving: FxHashSet::default(),
            members_done: FxHashSet::default(),
            type_parameter_scopes: Vec::new(),
            containers: Vec::new(),
            in_const_context: false,
        }
    }

    fn lookup_type_parameter(&self, name: &str) -> Option<TypeId> {
        self.type_parameter_scopes.iter().rev().find_map(|scope| {
            scope.iter().rev().find(|(n, _)| n == name).map(|(_, id)| *id)
        })
    }

    /// Switch to the lexical position of `symbol`'s declarations.
    fn enter_symbol(&mut self, binder: &Binder<'_>, symbol: SymbolId) -> SavedScope {
        let scopes = std::mem::take(&mut self.type_parameter_scopes);
        let containers = std::mem::replace(&mut self.containers, container_chain(binder, symbol));
        (scopes, containers)
    }

    fn leave_symbol(&mut self, saved: SavedScope) {
        self.type_parameter_scopes = saved.0;
        self.containers = saved.1;
    }
}

/// The type checker resolves declared types.
pub struct Checker {
    /// The type table (type arena).
    pub type_table: TypeTable,
    /// Named types of every checked file, keyed by dotted name.
    declared_types: FxHashMap<String, DeclaredType>,
    /// Types of variables and functions of every checked file.
    value_types: FxHashMap<String, TypeId>,
    /// Generic instantiations, keyed by target and arguments.
    reference_cache: FxHashMap<(TypeId, Vec<TypeId>), TypeId>,
    /// References whose members are yet to be instantiated.
    pending_references: Vec<TypeId>,
    /// While set, new references wait in `pending_references` until the
    /// declarations of the file being checked are complete.
    defer_references: bool,
    promise_target: Option<TypeId>,
}

impl Checker {
    /// A checker without any library declarations.
    pub fn new() -> Self {
        let type_table = TypeTable::new();
        let mut declared_types = FxHashMap::default();
        let array_parameters = type_table
            .object(type_table.array_target)
            .map(|array| array.type_parameters.clone())
            .unwrap_or_default();
        declared_types.insert(
            "Array".to_string(),
            DeclaredType { type_id: type_table.array_target, type_parameters: array_parameters },
        );
        Self {
            type_table,
            declared_types,
            value_types: FxHashMap::default(),
            reference_cache: FxHashMap::default(),
            pending_references: Vec::new(),
            defer_references: false,
            promise_target: None,
        }
    }

    /// A checker that has already checked the bundled library declarations
    /// (`Array<T>`, `Promise<T>`, `Date` and `Record<K, T>`).
    pub fn with_default_lib() -> Self {
        let mut checker = Self::new();
        let arena = Bump::new();
        let lib = rscript_parser::parse_source_file(&arena, DEFAULT_LIB_FILE_NAME, DEFAULT_LIB);
        checker.check_source_file(&lib);
        checker
    }

    /// Resolve the declarations of a source file and publish them.
    pub fn check_source_file(&mut self, source_file: &SourceFile<'_>) {
        let binder = bind_source_file(source_file);
        let mut cx = Context::new(Some(&binder));
        self.defer_references = true;

        // Pass 1: placeholders for named object types.
        for symbol in binder.symbols() {
            if symbol.flags.intersects(SymbolFlags::INTERFACE | SymbolFlags::CLASS | SymbolFlags::REGULAR_ENUM) {
                self.declare_named_type(&mut cx, symbol.id);
            }
        }

        // Pass 2: members, aliases and values.
        for symbol in binder.symbols() {
            if symbol.flags.intersects(SymbolFlags::INTERFACE | SymbolFlags::CLASS) {
                self.ensure_members(&mut cx, symbol.id);
            }
        }
        for symbol in binder.symbols() {
            if symbol.flags.contains(SymbolFlags::TYPE_ALIAS) {
                self.declared_type_of_symbol(&mut cx, symbol.id);
            }
            if symbol.flags.intersects(SymbolFlags::VARIABLE | SymbolFlags::FUNCTION) {
                self.value_type_of_symbol(&mut cx, symbol.id);
            }
        }

        self.defer_references = false;
        self.fill_pending_references();

        for symbol in binder.symbols() {
            let name = qualified_name(&binder, symbol.id);
            if let Some(declared) = cx.declared.get(&symbol.id) {
                self.declared_types.insert(name.clone(), declared.clone());
            }
            if let Some(&value) = cx.value_types.get(&symbol.id) {
                self.value_types.insert(name, value);
            }
        }
        if self.promise_target.is_none() {
            self.promise_target = self
                .declared_types
                .get("Promise")
                .filter(|promise| promise.type_parameters.len() == 1)
                .map(|promise| promise.type_id);
        }

        tracing::debug!(
            file = %source_file.file_name,
            symbols = binder.symbols().len(),
            types = self.type_table.len(),
            "checked source file"
        );
    }

    // ========================================================================
    // Public queries
    // ========================================================================

    /// Resolve a type annotation against the checked declarations.
    pub fn get_type_from_type_node(&mut self, node: &TypeNode<'_>) -> TypeId {
        let mut cx = Context::new(None);
        self.type_from_node(&mut cx, node)
    }

    /// The type registered under a dotted name. Type meanings win over values.
    pub fn get_type_of_symbol_name(&self, name: &str) -> Option<TypeId> {
        self.declared_types
            .get(name)
            .map(|declared| declared.type_id)
            .or_else(|| self.value_types.get(name).copied())
    }

    /// The type of the entity at `node`.
    pub fn get_type_at_location(&mut self, node: Node<'_>) -> TypeId {
        let mut cx = Context::new(None);
        let any = self.type_table.any_type;
        match node {
            Node::TypeNode(type_node) => self.type_from_node(&mut cx, type_node),
            Node::Expression(expression) => self.type_of_expression(&mut cx, expression),
            Node::Identifier(identifier) => {
                self.get_type_of_symbol_name(identifier.text).unwrap_or(any)
            }
            Node::VariableDeclaration(declaration) => self.type_of_variable(&mut cx, declaration),
            Node::Parameter(parameter) => match parameter.type_annotation {
                Some(annotation) => self.type_from_node(&mut cx, annotation),
                None => any,
            },
            Node::TypeElement(TypeElement::PropertySignature(signature)) => {
                match signature.type_annotation {
                    Some(annotation) => self.type_from_node(&mut cx, annotation),
                    None => any,
                }
            }
            Node::ClassElement(ClassElement::PropertyDeclaration(property)) => {
                match (property.type_annotation, property.initializer) {
                    (Some(annotation), _) => self.type_from_node(&mut cx, annotation),
                    (None, Some(initializer)) => {
                        let ty = self.type_of_expression(&mut cx, initializer);
                        self.widen(ty)
                    }
                    (None, None) => any,
                }
            }
            Node::Statement(statement) => self.type_of_statement(&mut cx, statement),
            _ => any,
        }
    }

    fn type_of_statement(&mut self, cx: &mut Context<'_, '_>, statement: &Statement<'_>) -> TypeId {
        let any = self.type_table.any_type;
        let name = match statement {
            Statement::InterfaceDeclaration(n) => Some(n.name.text),
            Statement::TypeAliasDeclaration(n) => Some(n.name.text),
            Statement::EnumDeclaration(n) => Some(n.name.text),
            Statement::ClassDeclaration(n) => n.name.as_ref().map(|id| id.text),
            Statement::FunctionDeclaration(n) => n.name.as_ref().map(|id| id.text),
            Statement::VariableStatement(n) => {
                return match n.declaration_list.declarations.first() {
                    Some(declaration) => self.type_of_variable(cx, declaration),
                    None => any,
                };
            }
            _ => None,
        };
        name.and_then(|name| self.get_type_of_symbol_name(name)).unwrap_or(any)
    }

    /// The members of an object, reference or intersection type. A union
    /// contributes the members present in every constituent.
    pub fn get_properties_of_type(&self, type_id: TypeId) -> Vec<Property> {
        self.property_map(type_id).into_values().collect()
    }

    /// The constituents of a union type.
    pub fn get_union_types(&self, type_id: TypeId) -> Option<&[TypeId]> {
        match &self.type_table.get(type_id).kind {
            TypeKind::Union { types } => Some(types),
            _ => None,
        }
    }

    /// The `T` of a `Promise<T>` reference.
    pub fn get_promised_type(&self, type_id: TypeId) -> Option<TypeId> {
        let promise = self.promise_target?;
        match &self.type_table.get(type_id).kind {
            TypeKind::TypeReference { target, type_arguments, .. }
                if *target == promise && type_arguments.len() == 1 =>
            {
                Some(type_arguments[0])
            }
            _ => None,
        }
    }

    fn property_map(&self, type_id: TypeId) -> IndexMap<String, Property> {
        match &self.type_table.get(type_id).kind {
            TypeKind::Object(object) => object.members.clone(),
            TypeKind::TypeReference { members, .. } => members.clone(),
            TypeKind::Intersection { types } => {
                let mut merged = IndexMap::new();
                for &member in types {
                    for (name, property) in self.property_map(member) {
                        merged.entry(name).or_insert(property);
                    }
                }
                merged
            }
            TypeKind::Union { types } => {
                let Some((first, rest)) = types.split_first() else {
                    return IndexMap::new();
                };
                let rest: Vec<_> = rest.iter().map(|&t| self.property_map(t)).collect();
                self.property_map(*first)
                    .into_iter()
                    .filter(|(name, _)| rest.iter().all(|other| other.contains_key(name)))
                    .collect()
            }
            _ => IndexMap::new(),
        }
    }

    // ========================================================================
    // Type construction
    // ========================================================================

    /// Create a union, flattening nested unions and removing duplicates.
    pub fn create_union_type(&mut self, types: Vec<TypeId>) -> TypeId {
        let mut seen = FxHashSet::default();
        let mut flattened = Vec::with_capacity(types.len());
        for type_id in types {
            let members = match &self.type_table.get(type_id).kind {
                TypeKind::Union { types } => types.clone(),
                _ => vec![type_id],
            };
            for member in members {
                if seen.insert(member) {
                    flattened.push(member);
                }
            }
        }
        match flattened.len() {
            0 => self.type_table.never_type,
            1 => flattened[0],
            _ => self.type_table.add_type(TypeFlags::UNION, TypeKind::Union { types: flattened }),
        }
    }

    fn create_intersection_type(&mut self, types: Vec<TypeId>) -> TypeId {
        let mut seen = FxHashSet::default();
        let mut flattened = Vec::with_capacity(types.len());
        for type_id in types {
            let members = match &self.type_table.get(type_id).kind {
                TypeKind::Intersection { types } => types.clone(),
                _ => vec![type_id],
            };
            for member in members {
                if seen.insert(member) {
                    flattened.push(member);
                }
            }
        }
        match flattened.len() {
            0 => self.type_table.unknown_type,
            1 => flattened[0],
            _ => self
                .type_table
                .add_type(TypeFlags::INTERSECTION, TypeKind::Intersection { types: flattened }),
        }
    }

    /// `T[]`, a reference to the `Array` target.
    pub fn create_array_type(&mut self, element_type: TypeId) -> TypeId {
        let array = self.type_table.array_target;
        self.create_type_reference(array, vec![element_type])
    }

    fn create_type_parameter(&mut self, name: &str) -> TypeId {
        self.type_table.add_type(
            TypeFlags::TYPE_PARAMETER,
            TypeKind::TypeParameter { name: name.to_string(), constraint: None },
        )
    }

    fn create_type_reference(&mut self, target: TypeId, type_arguments: Vec<TypeId>) -> TypeId {
        if type_arguments.is_empty() {
            return target;
        }
        let key = (target, type_arguments);
        if let Some(&cached) = self.reference_cache.get(&key) {
            return cached;
        }
        let reference = self.type_table.add_type(
            TypeFlags::OBJECT,
            TypeKind::TypeReference {
                target,
                type_arguments: key.1.clone(),
                members: IndexMap::new(),
            },
        );
        self.reference_cache.insert(key, reference);
        self.pending_references.push(reference);
        if !self.defer_references {
            self.fill_pending_references();
        }
        reference
    }

    /// Instantiate the members of every pending reference. Instantiation can
    /// create further references; they are drained by the same loop.
    fn fill_pending_references(&mut self) {
        while let Some(reference) = self.pending_references.pop() {
            let (target, arguments) = match &self.type_table.get(reference).kind {
                TypeKind::TypeReference { target, type_arguments, .. } => {
                    (*target, type_arguments.clone())
                }
                _ => continue,
            };
            let Some(object) = self.type_table.object(target) else {
                continue;
            };
            let mapper: Vec<(TypeId, TypeId)> =
                object.type_parameters.iter().copied().zip(arguments).collect();
            let target_members = object.members.clone();
            let mut members = IndexMap::with_capacity(target_members.len());
            for (name, mut property) in target_members {
                property.type_id = self.instantiate_type(property.type_id, &mapper);
                members.insert(name, property);
            }
            if let TypeKind::TypeReference { members: slot, .. } =
                &mut self.type_table.get_mut(reference).kind
            {
                *slot = members;
            }
        }
    }

    fn promise_of(&mut self, type_id: TypeId) -> TypeId {
        match self.promise_target {
            Some(promise) => self.create_type_reference(promise, vec![type_id]),
            None => self.type_table.any_type,
        }
    }

    /// Substitute type parameters according to `mapper`.
    pub fn instantiate_type(&mut self, type_id: TypeId, mapper: &[(TypeId, TypeId)]) -> TypeId {
        if mapper.is_empty() {
            return type_id;
        }
        let kind = self.type_table.get(type_id).kind.clone();
        match kind {
            TypeKind::TypeParameter { .. } => mapper
                .iter()
                .find(|(from, _)| *from == type_id)
                .map(|(_, to)| *to)
                .unwrap_or(type_id),
            TypeKind::Union { types } => {
                let mapped = self.instantiate_all(&types, mapper);
                if mapped == types {
                    type_id
                } else {
                    self.create_union_type(mapped)
                }
            }
            TypeKind::Intersection { types } => {
                let mapped = self.instantiate_all(&types, mapper);
                if mapped == types {
                    type_id
                } else {
                    self.create_intersection_type(mapped)
                }
            }
            TypeKind::TypeReference { target, type_arguments, .. } => {
                let mapped = self.instantiate_all(&type_arguments, mapper);
                if mapped == type_arguments {
                    type_id
                } else {
                    self.create_type_reference(target, mapped)
                }
            }
            TypeKind::Tuple { element_types } => {
                let mapped = self.instantiate_all(&element_types, mapper);
                if mapped == element_types {
                    type_id
                } else {
                    self.type_table.add_type(
                        TypeFlags::OBJECT,
                        TypeKind::Tuple { element_types: mapped },
                    )
                }
            }
            TypeKind::Function(signature) => {
                let mut changed = false;
                let mut parameters = Vec::with_capacity(signature.parameters.len());
                for parameter in signature.parameters {
                    let mapped = self.instantiate_type(parameter.type_id, mapper);
                    changed |= mapped != parameter.type_id;
                    parameters.push(SignatureParameter { type_id: mapped, ..parameter });
                }
                let return_type = self.instantiate_type(signature.return_type, mapper);
                changed |= return_type != signature.return_type;
                if !changed {
                    return type_id;
                }
                self.type_table.add_type(
                    TypeFlags::OBJECT,
                    TypeKind::Function(Signature {
                        type_parameters: signature.type_parameters,
                        parameters,
                        return_type,
                    }),
                )
            }
            TypeKind::Object(object) if object.name.is_none() => {
                let mut changed = false;
                let mut members = IndexMap::with_capacity(object.members.len());
                for (name, mut property) in object.members {
                    let mapped = self.instantiate_type(property.type_id, mapper);
                    changed |= mapped != property.type_id;
                    property.type_id = mapped;
                    members.insert(name, property);
                }
                let string_index = object.string_index.map(|t| self.instantiate_type(t, mapper));
                changed |= string_index != object.string_index;
                if !changed {
                    return type_id;
                }
                let flags = self.type_table.get(type_id).flags;
                self.type_table.add_type(
                    flags,
                    TypeKind::Object(ObjectType { members, string_index, ..object }),
                )
            }
            TypeKind::Mapped { type_parameter, constraint, template, optional } => {
                let constraint = self.instantiate_type(constraint, mapper);
                let template = self.instantiate_type(template, mapper);
                self.resolve_mapped_type(type_parameter, constraint, template, optional)
            }
            _ => type_id,
        }
    }

    fn instantiate_all(&mut self, types: &[TypeId], mapper: &[(TypeId, TypeId)]) -> Vec<TypeId> {
        types.iter().map(|&t| self.instantiate_type(t, mapper)).collect()
    }

    /// Expand `{ [P in K]: T }` once `K` is known. A constraint made of
    /// literals gives one member per key; any other concrete constraint gives
    /// a string index signature.
    fn resolve_mapped_type(
        &mut self,
        type_parameter: TypeId,
        constraint: TypeId,
        template: TypeId,
        optional: bool,
    ) -> TypeId {
        let keys = match &self.type_table.get(constraint).kind {
            TypeKind::Union { types } => types.clone(),
            _ => vec![constraint],
        };
        if keys.iter().any(|&key| self.contains_type_parameter(key)) {
            return self.type_table.add_type(
                TypeFlags::OBJECT,
                TypeKind::Mapped { type_parameter, constraint, template, optional },
            );
        }

        let mut object = ObjectType { object_flags: ObjectFlags::MAPPED, ..Default::default() };
        for key in keys {
            let name = match &self.type_table.get(key).kind {
                TypeKind::StringLiteral { value } => value.clone(),
                TypeKind::NumberLiteral { value } => value.to_string(),
                TypeKind::Intrinsic { name: "never" } => continue,
                _ => {
                    let string = self.type_table.string_type;
                    object.string_index =
                        Some(self.instantiate_type(template, &[(type_parameter, string)]));
                    continue;
                }
            };
            let member_type = self.instantiate_type(template, &[(type_parameter, key)]);
            let member_type = if optional {
                let undefined = self.type_table.undefined_type;
                self.create_union_type(vec![member_type, undefined])
            } else {
                member_type
            };
            object.members.insert(
                name.clone(),
                Property { name, type_id: member_type, optional, readonly: false },
            );
        }
        self.type_table.add_type(TypeFlags::OBJECT, TypeKind::Object(object))
    }

    fn contains_type_parameter(&self, type_id: TypeId) -> bool {
        match &self.type_table.get(type_id).kind {
            TypeKind::TypeParameter { .. } | TypeKind::Mapped { .. } => true,
            TypeKind::Union { types } | TypeKind::Intersection { types } => {
                types.iter().any(|&t| self.contains_type_parameter(t))
            }
            _ => false,
        }
    }

    /// The widened form of a literal type.
    fn widen(&mut self, type_id: TypeId) -> TypeId {
        match &self.type_table.get(type_id).kind {
            TypeKind::StringLiteral { .. } => self.type_table.string_type,
            TypeKind::NumberLiteral { .. } => self.type_table.number_type,
            TypeKind::BooleanLiteral { .. } => self.type_table.boolean_type,
            TypeKind::Union { types } => {
                let types = types.clone();
                let widened = types.iter().map(|&t| self.widen(t)).collect();
                self.create_union_type(widened)
            }
            _ => type_id,
        }
    }

    fn widen_unless_const(&mut self, cx: &Context<'_, '_>, type_id: TypeId) -> TypeId {
        if cx.in_const_context {
            type_id
        } else {
            self.widen(type_id)
        }
    }

    fn remove_nullable(&mut self, type_id: TypeId) -> TypeId {
        let (null, undefined) = (self.type_table.null_type, self.type_table.undefined_type);
        match &self.type_table.get(type_id).kind {
            TypeKind::Union { types } => {
                let kept = types.iter().copied().filter(|&t| t != null && t != undefined).collect();
                self.create_union_type(kept)
            }
            _ => type_id,
        }
    }

    // ========================================================================
    // Named type resolution
    // ========================================================================

    /// Create (once) the object type of an interface, class or enum symbol.
    /// A global declaration whose name was published by an earlier file
    /// augments that type instead.
    fn declare_named_type(&mut self, cx: &mut Context<'_, '_>, symbol_id: SymbolId) -> DeclaredType {
        if let Some(declared) = cx.declared.get(&symbol_id) {
            return declared.clone();
        }
        let any = DeclaredType::plain(self.type_table.any_type);
        let Some(binder) = cx.binder else { return any };
        let Some(symbol) = binder.get_symbol(symbol_id) else { return any };

        let qualified = qualified_name(binder, symbol_id);
        let reused = self
            .declared_types
            .get(&qualified)
            .filter(|existing| self.type_table.object(existing.type_id).is_some())
            .cloned();
        let declared = match reused {
            Some(existing) => existing,
            None => {
                let parameter_names: Vec<&str> = symbol
                    .find_declaration(|declaration| match declaration {
                        Declaration::Interface(n) => n.type_parameters,
                        Declaration::Class(n) => n.type_parameters,
                        _ => None,
                    })
                    .map(|parameters| parameters.iter().map(|p| p.name.text).collect())
                    .unwrap_or_default();
                let type_parameters: Vec<TypeId> =
                    parameter_names.iter().map(|name| self.create_type_parameter(name)).collect();

                let mut object_flags = ObjectFlags::NONE;
                if symbol.flags.contains(SymbolFlags::CLASS) {
                    object_flags |= ObjectFlags::CLASS;
                }
                if symbol.flags.contains(SymbolFlags::INTERFACE) {
                    object_flags |= ObjectFlags::INTERFACE;
                }
                let flags = if symbol.flags.contains(SymbolFlags::REGULAR_ENUM) {
                    TypeFlags::ENUM
                } else {
                    TypeFlags::OBJECT
                };
                let type_id = self.type_table.add_type(
                    flags,
                    TypeKind::Object(ObjectType {
                        object_flags,
                        name: Some(binder.symbol_name(symbol_id).to_string()),
                        type_parameters: type_parameters.clone(),
                        ..Default::default()
                    }),
                );
                DeclaredType { type_id, type_parameters }
            }
        };
        cx.declared.insert(symbol_id, declared.clone());
        declared
    }

    /// Resolve the members of an interface or class symbol, merging all of
    /// its declarations. Inherited members follow the symbol's own.
    fn ensure_members(&mut self, cx: &mut Context<'_, '_>, symbol_id: SymbolId) {
        if !cx.members_done.insert(symbol_id) {
            return;
        }
        let Some(binder) = cx.binder else { return };
        let Some(symbol) = binder.get_symbol(symbol_id) else { return };
        let declared = self.declare_named_type(cx, symbol_id);
        let saved = cx.enter_symbol(binder, symbol_id);

        let mut members = IndexMap::new();
        let mut string_index = None;
        let mut inherited = Vec::new();
        for declaration in &symbol.declarations {
            match declaration {
                Declaration::Interface(interface) => {
                    let existing = declared.type_parameters.as_slice();
                    self.push_type_parameters(cx, interface.type_parameters, Some(existing));
                    for element in interface.members.iter() {
                        self.add_type_element(cx, &mut members, &mut string_index, element);
                    }
                    for clause in interface.heritage_clauses.iter() {
                        for base in clause.types.iter() {
                            if let Some(base_members) = self.base_type_members(cx, base) {
                                inherited.push(base_members);
                            }
                        }
                    }
                    cx.type_parameter_scopes.pop();
                }
                Declaration::Class(class) => {
                    let existing = declared.type_parameters.as_slice();
                    self.push_type_parameters(cx, class.type_parameters, Some(existing));
                    for element in class.members.iter() {
                        self.add_class_element(cx, &mut members, &mut string_index, element);
                    }
                    let extends = class
                        .heritage_clauses
                        .iter()
                        .filter(|clause| clause.token == SyntaxKind::ExtendsKeyword);
                    for clause in extends {
                        for base in clause.types.iter() {
                            if let Some(base_members) = self.base_type_members(cx, base) {
                                inherited.push(base_members);
                            }
                        }
                    }
                    cx.type_parameter_scopes.pop();
                }
                _ => {}
            }
        }
        for base_members in inherited {
            for (name, property) in base_members {
                members.entry(name).or_insert(property);
            }
        }
        cx.leave_symbol(saved);

        if let TypeKind::Object(object) = &mut self.type_table.get_mut(declared.type_id).kind {
            for (name, property) in members {
                object.members.entry(name).or_insert(property);
            }
            if string_index.is_some() {
                object.string_index = string_index;
            }
        }
    }

    /// The members a heritage clause entry contributes, instantiated with the
    /// clause's type arguments.
    fn base_type_members(
        &mut self,
        cx: &mut Context<'_, '_>,
        base: &ExpressionWithTypeArguments<'_>,
    ) -> Option<IndexMap<String, Property>> {
        let parts = expression_name_parts(base.expression)?;
        let arguments: Vec<TypeId> = base
            .type_arguments
            .map(|arguments| arguments.iter().map(|t| self.type_from_node(cx, t)).collect())
            .unwrap_or_default();

        let symbol = cx.binder.and_then(|binder| resolve_parts(binder, &cx.containers, &parts));
        let declared = match symbol {
            Some(symbol_id) => {
                let declared = self.declared_type_of_symbol(cx, symbol_id)?;
                self.ensure_members(cx, symbol_id);
                declared
            }
            None => self.declared_types.get(&parts.join("."))?.clone(),
        };

        let mapper: Vec<(TypeId, TypeId)> =
            declared.type_parameters.iter().copied().zip(arguments).collect();
        let mut members = IndexMap::new();
        for (name, mut property) in self.property_map(declared.type_id) {
            property.type_id = self.instantiate_type(property.type_id, &mapper);
            members.insert(name, property);
        }
        Some(members)
    }

    /// The type meaning of a symbol.
    fn declared_type_of_symbol(&mut self, cx: &mut Context<'_, '_>, symbol_id: SymbolId) -> Option<DeclaredType> {
        if let Some(declared) = cx.declared.get(&symbol_id) {
            return Some(declared.clone());
        }
        let binder = cx.binder?;
        let symbol = binder.get_symbol(symbol_id)?;
        if symbol.flags.intersects(SymbolFlags::INTERFACE | SymbolFlags::CLASS | SymbolFlags::REGULAR_ENUM) {
            return Some(self.declare_named_type(cx, symbol_id));
        }
        if !symbol.flags.contains(SymbolFlags::TYPE_ALIAS) {
            return None;
        }
        if cx.resolving.contains(&symbol_id) {
            return Some(DeclaredType::plain(self.type_table.any_type));
        }
        let alias = symbol.find_declaration(|declaration| match declaration {
            Declaration::TypeAlias(alias) => Some(*alias),
            _ => None,
        })?;

        cx.resolving.insert(symbol_id);
        let saved = cx.enter_symbol(binder, symbol_id);
        let type_parameters = self.push_type_parameters(cx, alias.type_parameters, None);
        let type_id = self.type_from_node(cx, alias.type_node);
        cx.type_parameter_scopes.pop();
        cx.leave_symbol(saved);
        cx.resolving.remove(&symbol_id);

        let declared = DeclaredType { type_id, type_parameters };
        cx.declared.insert(symbol_id, declared.clone());
        Some(declared)
    }

    /// The value meaning of a variable or function symbol.
    fn value_type_of_symbol(&mut self, cx: &mut Context<'_, '_>, symbol_id: SymbolId) -> Option<TypeId> {
        if let Some(&type_id) = cx.value_types.get(&symbol_id) {
            return Some(type_id);
        }
        let binder = cx.binder?;
        let symbol = binder.get_symbol(symbol_id)?;
        if !symbol.flags.intersects(SymbolFlags::VARIABLE | SymbolFlags::FUNCTION) {
            return None;
        }
        if cx.resolving.contains(&symbol_id) {
            return Some(self.type_table.any_type);
        }

        cx.resolving.insert(symbol_id);
        let saved = cx.enter_symbol(binder, symbol_id);
        let mut type_id = self.type_table.any_type;
        for declaration in &symbol.declarations {
            match declaration {
                Declaration::Variable(variable) => {
                    type_id = self.type_of_variable(cx, variable);
                    break;
                }
                Declaration::Function(function) => {
                    let is_async = function.data.modifier_flags.contains(ModifierFlags::ASYNC);
                    type_id = self.function_type(
                        cx,
                        function.type_parameters,
                        function.parameters,
                        function.return_type,
                        is_async,
                    );
                    break;
                }
                _ => {}
            }
        }
        cx.leave_symbol(saved);
        cx.resolving.remove(&symbol_id);
        cx.value_types.insert(symbol_id, type_id);
        Some(type_id)
    }

    fn type_of_variable(&mut self, cx: &mut Context<'_, '_>, declaration: &VariableDeclaration<'_>) -> TypeId {
        if let Some(annotation) = declaration.type_annotation {
            return self.type_from_node(cx, annotation);
        }
        if !matches!(declaration.name, BindingName::Identifier(_)) {
            return self.type_table.any_type;
        }
        match declaration.initializer {
            Some(initializer) => {
                let type_id = self.type_of_expression(cx, initializer);
                if is_const_assertion(initializer) {
                    type_id
                } else {
                    self.widen(type_id)
                }
            }
            None => self.type_table.any_type,
        }
    }

    /// Push a scope for `declarations`, reusing `existing` parameter types
    /// when the owner already has them.
    fn push_type_parameters(
        &mut self,
        cx: &mut Context<'_, '_>,
        declarations: Option<&[TypeParameterDeclaration<'_>]>,
        existing: Option<&[TypeId]>,
    ) -> Vec<TypeId> {
        let declarations = declarations.unwrap_or(&[]);
        let mut scope = Vec::with_capacity(declarations.len());
        let mut ids = Vec::with_capacity(declarations.len());
        for (index, declaration) in declarations.iter().enumerate() {
            let id = match existing.and_then(|existing| existing.get(index)) {
                Some(&id) => id,
                None => self.create_type_parameter(declaration.name.text),
            };
            scope.push((declaration.name.text.to_string(), id));
            ids.push(id);
        }
        cx.type_parameter_scopes.push(scope);

        for (declaration, &id) in declarations.iter().zip(&ids) {
            if let Some(constraint_node) = declaration.constraint {
                let constraint = self.type_from_node(cx, constraint_node);
                if let TypeKind::TypeParameter { constraint: slot, .. } =
                    &mut self.type_table.get_mut(id).kind
                {
                    *slot = Some(constraint);
                }
            }
        }
        ids
    }

    fn function_type(
        &mut self,
        cx: &mut Context<'_, '_>,
        type_parameters: Option<&[TypeParameterDeclaration<'_>]>,
        parameters: &[ParameterDeclaration<'_>],
        return_type: Option<&TypeNode<'_>>,
        is_async: bool,
    ) -> TypeId {
        let type_parameters = self.push_type_parameters(cx, type_parameters, None);
        let mut signature_parameters = Vec::with_capacity(parameters.len());
        for (index, parameter) in parameters.iter().enumerate() {
            let name = match &parameter.name {
                BindingName::Identifier(id) => id.text.to_string(),
                _ => format!("__{index}"),
            };
            let type_id = match (parameter.type_annotation, parameter.initializer) {
                (Some(annotation), _) => self.type_from_node(cx, annotation),
                (None, Some(initializer)) => {
                    let ty = self.type_of_expression(cx, initializer);
                    self.widen(ty)
                }
                (None, None) => self.type_table.any_type,
            };
            signature_parameters.push(SignatureParameter {
                name,
                type_id,
                optional: parameter.question_token || parameter.initializer.is_some(),
                rest: parameter.dot_dot_dot_token,
            });
        }
        let return_type = match return_type {
            Some(node) => self.type_from_node(cx, node),
            None if is_async => {
                let any = self.type_table.any_type;
                self.promise_of(any)
            }
            None => self.type_table.any_type,
        };
        cx.type_parameter_scopes.pop();
        self.type_table.add_type(
            TypeFlags::OBJECT,
            TypeKind::Function(Signature {
                type_parameters,
                parameters: signature_parameters,
                return_type,
            }),
        )
    }

    fn insert_member(
        &mut self,
        members: &mut IndexMap<String, Property>,
        name: &str,
        type_id: TypeId,
        optional: bool,
        readonly: bool,
    ) {
        // Later overloads and merged duplicates keep the first member.
        if members.contains_key(name) {
            return;
        }
        let type_id = if optional {
            let undefined = self.type_table.undefined_type;
            self.create_union_type(vec![type_id, undefined])
        } else {
            type_id
        };
        members.insert(name.to_string(), Property { name: name.to_string(), type_id, optional, readonly });
    }

    fn add_type_element(
        &mut self,
        cx: &mut Context<'_, '_>,
        members: &mut IndexMap<String, Property>,
        string_index: &mut Option<TypeId>,
        element: &TypeElement<'_>,
    ) {
        match element {
            TypeElement::PropertySignature(signature) => {
                let Some(name) = signature.name.text() else { return };
                let type_id = match signature.type_annotation {
                    Some(annotation) => self.type_from_node(cx, annotation),
                    None => self.type_table.any_type,
                };
                let readonly = signature.data.modifier_flags.contains(ModifierFlags::READONLY);
                self.insert_member(members, name, type_id, signature.question_token, readonly);
            }
            TypeElement::MethodSignature(method) => {
                let Some(name) = method.name.text() else { return };
                let type_id =
                    self.function_type(cx, method.type_parameters, method.parameters, method.return_type, false);
                self.insert_member(members, name, type_id, method.question_token, false);
            }
            TypeElement::IndexSignature(index) => {
                *string_index = Some(match index.type_annotation {
                    Some(annotation) => self.type_from_node(cx, annotation),
                    None => self.type_table.any_type,
                });
            }
            TypeElement::CallSignature(_) | TypeElement::ConstructSignature(_) => {}
        }
    }

    fn add_class_element(
        &mut self,
        cx: &mut Context<'_, '_>,
        members: &mut IndexMap<String, Property>,
        string_index: &mut Option<TypeId>,
        element: &ClassElement<'_>,
    ) {
        if element.data().modifier_flags.contains(ModifierFlags::STATIC) {
            return;
        }
        match element {
            ClassElement::PropertyDeclaration(property) => {
                let Some(name) = class_member_name(&property.name) else { return };
                let type_id = match (property.type_annotation, property.initializer) {
                    (Some(annotation), _) => self.type_from_node(cx, annotation),
                    (None, Some(initializer)) => {
                        let ty = self.type_of_expression(cx, initializer);
                        self.widen(ty)
                    }
                    (None, None) => self.type_table.any_type,
                };
                let readonly = property.data.modifier_flags.contains(ModifierFlags::READONLY);
                self.insert_member(members, name, type_id, property.question_token, readonly);
            }
            ClassElement::MethodDeclaration(method) => {
                let Some(name) = class_member_name(&method.name) else { return };
                let is_async = method.data.modifier_flags.contains(ModifierFlags::ASYNC);
                let type_id = self.function_type(
                    cx,
                    method.type_parameters,
                    method.parameters,
                    method.return_type,
                    is_async,
                );
                self.insert_member(members, name, type_id, method.question_token, false);
            }
            ClassElement::GetAccessor(accessor) => {
                let Some(name) = class_member_name(&accessor.name) else { return };
                let type_id = match accessor.return_type {
                    Some(annotation) => self.type_from_node(cx, annotation),
                    None => self.type_table.any_type,
                };
                self.insert_member(members, name, type_id, false, false);
            }
            ClassElement::SetAccessor(accessor) => {
                let Some(name) = class_member_name(&accessor.name) else { return };
                let type_id = match accessor.parameters.first().and_then(|p| p.type_annotation) {
                    Some(annotation) => self.type_from_node(cx, annotation),
                    None => self.type_table.any_type,
                };
                self.insert_member(members, name, type_id, false, false);
            }
            ClassElement::Constructor(constructor) => {
                let property_modifiers = ModifierFlags::ACCESSIBILITY_MODIFIER | ModifierFlags::READONLY;
                for parameter in constructor.parameters.iter() {
                    if !parameter.data.modifier_flags.intersects(property_modifiers) {
                        continue;
                    }
                    let BindingName::Identifier(name) = &parameter.name else { continue };
                    let type_id = match parameter.type_annotation {
                        Some(annotation) => self.type_from_node(cx, annotation),
                        None => self.type_table.any_type,
                    };
                    let readonly = parameter.data.modifier_flags.contains(ModifierFlags::READONLY);
                    self.insert_member(members, name.text, type_id, parameter.question_token, readonly);
                }
            }
            ClassElement::IndexSignature(index) => {
                *string_index = Some(match index.type_annotation {
                    Some(annotation) => self.type_from_node(cx, annotation),
                    None => self.type_table.any_type,
                });
            }
            ClassElement::SemicolonClassElement(_) => {}
        }
    }

    // ========================================================================
    // Type nodes
    // ========================================================================

    fn type_from_node(&mut self, cx: &mut Context<'_, '_>, node: &TypeNode<'_>) -> TypeId {
        match node {
            TypeNode::KeywordType(keyword) => self.keyword_type(keyword.data.kind),
            TypeNode::TypeReference(reference) => self.type_from_type_reference(cx, reference),
            TypeNode::FunctionType(function) | TypeNode::ConstructorType(function) => self.function_type(
                cx,
                function.type_parameters,
                function.parameters,
                Some(function.return_type),
                false,
            ),
            TypeNode::TypeQuery(query) => self.value_type_of_entity(cx, &query.expr_name),
            TypeNode::TypeLiteral(literal) => self.type_from_type_literal(cx, literal.members),
            TypeNode::ArrayType(array) => {
                let element = self.type_from_node(cx, array.element_type);
                self.create_array_type(element)
            }
            TypeNode::TupleType(tuple) => {
                let element_types = tuple.elements.iter().map(|e| self.type_from_node(cx, e)).collect();
                self.type_table.add_type(TypeFlags::OBJECT, TypeKind::Tuple { element_types })
            }
            TypeNode::OptionalType(wrapped) => {
                let inner = self.type_from_node(cx, wrapped.type_node);
                let undefined = self.type_table.undefined_type;
                self.create_union_type(vec![inner, undefined])
            }
            TypeNode::RestType(wrapped) | TypeNode::ParenthesizedType(wrapped) => {
                self.type_from_node(cx, wrapped.type_node)
            }
            TypeNode::NamedTupleMember(member) => {
                let inner = self.type_from_node(cx, member.type_node);
                if member.question_token {
                    let undefined = self.type_table.undefined_type;
                    self.create_union_type(vec![inner, undefined])
                } else {
                    inner
                }
            }
            TypeNode::UnionType(union) => {
                let types = union.types.iter().map(|t| self.type_from_node(cx, t)).collect();
                self.create_union_type(types)
            }
            TypeNode::IntersectionType(intersection) => {
                let types = intersection.types.iter().map(|t| self.type_from_node(cx, t)).collect();
                self.create_intersection_type(types)
            }
            TypeNode::ConditionalType(_) | TypeNode::InferType(_) | TypeNode::ThisType(_) => {
                self.type_table.any_type
            }
            TypeNode::TypeOperator(operator) => match operator.operator {
                SyntaxKind::KeyOfKeyword => {
                    let operand = self.type_from_node(cx, operator.type_node);
                    self.key_of_type(operand)
                }
                SyntaxKind::UniqueKeyword => self.type_table.symbol_type,
                _ => self.type_from_node(cx, operator.type_node),
            },
            TypeNode::IndexedAccessType(access) => {
                let object = self.type_from_node(cx, access.object_type);
                let index = self.type_from_node(cx, access.index_type);
                self.indexed_access_type(object, index)
            }
            TypeNode::MappedType(mapped) => self.type_from_mapped_type(cx, mapped),
            TypeNode::LiteralType(literal) => self.type_from_literal(literal.literal),
            TypeNode::TemplateLiteralType(_) => self.type_table.string_type,
            TypeNode::TypePredicate(_) => self.type_table.boolean_type,
        }
    }

    fn keyword_type(&self, kind: SyntaxKind) -> TypeId {
        let table = &self.type_table;
        match kind {
            SyntaxKind::AnyKeyword => table.any_type,
            SyntaxKind::UnknownKeyword => table.unknown_type,
            SyntaxKind::StringKeyword => table.string_type,
            SyntaxKind::NumberKeyword => table.number_type,
            SyntaxKind::BooleanKeyword => table.boolean_type,
            SyntaxKind::VoidKeyword => table.void_type,
            SyntaxKind::UndefinedKeyword => table.undefined_type,
            SyntaxKind::NullKeyword => table.null_type,
            SyntaxKind::NeverKeyword => table.never_type,
            SyntaxKind::BigIntKeyword => table.bigint_type,
            SyntaxKind::SymbolKeyword => table.symbol_type,
            SyntaxKind::ObjectKeyword => table.object_type,
            _ => table.any_type,
        }
    }

    fn type_from_type_reference(&mut self, cx: &mut Context<'_, '_>, reference: &TypeReferenceNode<'_>) -> TypeId {
        let arguments: Vec<TypeId> = reference
            .type_arguments
            .map(|arguments| arguments.iter().map(|t| self.type_from_node(cx, t)).collect())
            .unwrap_or_default();
        let Some(declared) = self.resolve_type_name(cx, &reference.type_name) else {
            return self.type_table.any_type;
        };
        if declared.type_parameters.is_empty() || arguments.is_empty() {
            return declared.type_id;
        }
        if self.type_table.object(declared.type_id).is_some() {
            let any = self.type_table.any_type;
            let mut arguments = arguments;
            arguments.resize(declared.type_parameters.len(), any);
            return self.create_type_reference(declared.type_id, arguments);
        }
        let mapper: Vec<(TypeId, TypeId)> =
            declared.type_parameters.iter().copied().zip(arguments).collect();
        self.instantiate_type(declared.type_id, &mapper)
    }

    /// Resolve a type name: type parameters in scope, then the file's
    /// declarations, then names published by earlier files.
    fn resolve_type_name(&mut self, cx: &mut Context<'_, '_>, name: &EntityName<'_>) -> Option<DeclaredType> {
        if let EntityName::Identifier(identifier) = name {
            if let Some(type_parameter) = cx.lookup_type_parameter(identifier.text) {
                return Some(DeclaredType::plain(type_parameter));
            }
        }
        if let Some(binder) = cx.binder {
            if let Some(symbol) = resolve_entity(binder, &cx.containers, name) {
                if let Some(declared) = self.declared_type_of_symbol(cx, symbol) {
                    return Some(declared);
                }
            }
        }
        self.declared_types.get(&name.to_dotted_string()).cloned()
    }

    fn value_type_of_entity(&mut self, cx: &mut Context<'_, '_>, name: &EntityName<'_>) -> TypeId {
        if let Some(binder) = cx.binder {
            if let Some(symbol) = resolve_entity(binder, &cx.containers, name) {
                if let Some(type_id) = self.value_type_of_symbol(cx, symbol) {
                    return type_id;
                }
            }
        }
        self.value_types
            .get(&name.to_dotted_string())
            .copied()
            .unwrap_or(self.type_table.any_type)
    }

    fn value_type_of_name(&mut self, cx: &mut Context<'_, '_>, name: &str) -> TypeId {
        if let Some(binder) = cx.binder {
            if let Some(symbol) = resolve_in_scope(binder, &cx.containers, name) {
                if let Some(type_id) = self.value_type_of_symbol(cx, symbol) {
                    return type_id;
                }
            }
        }
        self.value_types.get(name).copied().unwrap_or(self.type_table.any_type)
    }

    fn type_from_type_literal(&mut self, cx: &mut Context<'_, '_>, elements: &[TypeElement<'_>]) -> TypeId {
        if let [TypeElement::CallSignature(signature)] = elements {
            return self.function_type(
                cx,
                signature.type_parameters,
                signature.parameters,
                signature.return_type,
                false,
            );
        }
        let mut members = IndexMap::new();
        let mut string_index = None;
        for element in elements {
            self.add_type_element(cx, &mut members, &mut string_index, element);
        }
        self.type_table.add_type(
            TypeFlags::OBJECT,
            TypeKind::Object(ObjectType {
                object_flags: ObjectFlags::ANONYMOUS,
                members,
                string_index,
                ..Default::default()
            }),
        )
    }

    fn type_from_mapped_type(&mut self, cx: &mut Context<'_, '_>, mapped: &MappedTypeNode<'_>) -> TypeId {
        let constraint = match mapped.type_parameter.constraint {
            Some(constraint) => self.type_from_node(cx, constraint),
            None => self.type_table.any_type,
        };
        let parameter_name = mapped.type_parameter.name.text;
        let type_parameter = self.create_type_parameter(parameter_name);
        cx.type_parameter_scopes.push(vec![(parameter_name.to_string(), type_parameter)]);
        let template = match mapped.type_node {
            Some(template) => self.type_from_node(cx, template),
            None => self.type_table.any_type,
        };
        cx.type_parameter_scopes.pop();
        let optional = mapped
            .question_token
            .as_ref()
            .map_or(false, |token| token.data.kind != SyntaxKind::MinusToken);
        self.resolve_mapped_type(type_parameter, constraint, template, optional)
    }

    fn type_from_literal(&mut self, literal: &Expression<'_>) -> TypeId {
        match literal {
            Expression::StringLiteral(s) => self.type_table.string_literal(s.text),
            Expression::NoSubstitutionTemplateLiteral(t) => self.type_table.string_literal(t.text),
            Expression::NumericLiteral(n) => self.type_table.number_literal(n.value()),
            Expression::BigIntLiteral(_) => self.type_table.bigint_type,
            Expression::TrueKeyword(_) => self.type_table.true_type,
            Expression::FalseKeyword(_) => self.type_table.false_type,
            Expression::NullKeyword(_) => self.type_table.null_type,
            Expression::PrefixUnaryExpression(prefix) if prefix.operator == SyntaxKind::MinusToken => {
                match prefix.operand {
                    Expression::NumericLiteral(n) => self.type_table.number_literal(-n.value()),
                    _ => self.type_table.number_type,
                }
            }
            _ => self.type_table.any_type,
        }
    }

    /// `keyof T`: the union of `T`'s member names.
    fn key_of_type(&mut self, type_id: TypeId) -> TypeId {
        if type_id == self.type_table.any_type {
            let table = &self.type_table;
            let keys = vec![table.string_type, table.number_type, table.symbol_type];
            return self.create_union_type(keys);
        }
        if let Some(object) = self.type_table.object(type_id) {
            if object.string_index.is_some() {
                return self.type_table.string_type;
            }
        }
        let names: Vec<String> = self.property_map(type_id).into_keys().collect();
        let keys = names.iter().map(|name| self.type_table.string_literal(name)).collect();
        self.create_union_type(keys)
    }

    /// `T[K]` for literal keys, and element access on arrays and tuples.
    fn indexed_access_type(&mut self, object: TypeId, index: TypeId) -> TypeId {
        let any = self.type_table.any_type;
        let index_kind = self.type_table.get(index).kind.clone();
        match index_kind {
            TypeKind::StringLiteral { value } => {
                let properties = self.property_map(object);
                match properties.get(&value) {
                    Some(property) => property.type_id,
                    None => self
                        .type_table
                        .object(object)
                        .and_then(|o| o.string_index)
                        .unwrap_or(any),
                }
            }
            TypeKind::Union { types } => {
                let resolved = types.iter().map(|&t| self.indexed_access_type(object, t)).collect();
                self.create_union_type(resolved)
            }
            TypeKind::NumberLiteral { .. } | TypeKind::Intrinsic { name: "number" } => {
                match &self.type_table.get(object).kind {
                    TypeKind::TypeReference { target, type_arguments, .. }
                        if *target == self.type_table.array_target =>
                    {
                        type_arguments.first().copied().unwrap_or(any)
                    }
                    TypeKind::Tuple { element_types } => {
                        let element_types = element_types.clone();
                        match index_kind {
                            TypeKind::NumberLiteral { value } => {
                                element_types.get(value as usize).copied().unwrap_or(any)
                            }
                            _ => self.create_union_type(element_types),
                        }
                    }
                    _ => any,
                }
            }
            TypeKind::Intrinsic { name: "string" } => {
                self.type_table.object(object).and_then(|o| o.string_index).unwrap_or(any)
            }
            _ => any,
        }
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    fn type_of_expression(&mut self, cx: &mut Context<'_, '_>, expression: &Expression<'_>) -> TypeId {
        let table = &self.type_table;
        let (any, string, number, boolean) =
            (table.any_type, table.string_type, table.number_type, table.boolean_type);
        match expression {
            Expression::StringLiteral(s) => self.type_table.string_literal(s.text),
            Expression::NoSubstitutionTemplateLiteral(t) => self.type_table.string_literal(t.text),
            Expression::NumericLiteral(n) => self.type_table.number_literal(n.value()),
            Expression::BigIntLiteral(_) => self.type_table.bigint_type,
            Expression::TemplateExpression(_) => string,
            Expression::TrueKeyword(_) => self.type_table.true_type,
            Expression::FalseKeyword(_) => self.type_table.false_type,
            Expression::NullKeyword(_) => self.type_table.null_type,
            Expression::Identifier(identifier) if identifier.text == "undefined" => {
                self.type_table.undefined_type
            }
            Expression::Identifier(identifier) => self.value_type_of_name(cx, identifier.text),
            Expression::ArrayLiteralExpression(array) => self.type_of_array_literal(cx, array),
            Expression::ObjectLiteralExpression(object) => self.type_of_object_literal(cx, object),
            Expression::ParenthesizedExpression(inner) => self.type_of_expression(cx, inner.expression),
            Expression::AsExpression(assertion) => {
                if is_const_type(assertion.type_node) {
                    let was_const = std::mem::replace(&mut cx.in_const_context, true);
                    let type_id = self.type_of_expression(cx, assertion.expression);
                    cx.in_const_context = was_const;
                    type_id
                } else {
                    self.type_from_node(cx, assertion.type_node)
                }
            }
            Expression::SatisfiesExpression(assertion) => self.type_of_expression(cx, assertion.expression),
            Expression::NonNullExpression(inner) => {
                let type_id = self.type_of_expression(cx, inner.expression);
                self.remove_nullable(type_id)
            }
            Expression::AwaitExpression(inner) => {
                let type_id = self.type_of_expression(cx, inner.expression);
                self.get_promised_type(type_id).unwrap_or(type_id)
            }
            Expression::PropertyAccessExpression(access) => {
                let object = self.type_of_expression(cx, access.expression);
                self.property_map(object)
                    .get(access.name.text)
                    .map(|property| property.type_id)
                    .unwrap_or(any)
            }
            Expression::ElementAccessExpression(access) => {
                let object = self.type_of_expression(cx, access.expression);
                let index = self.type_of_expression(cx, access.argument_expression);
                self.indexed_access_type(object, index)
            }
            Expression::CallExpression(call) => {
                let callee = self.type_of_expression(cx, call.expression);
                match &self.type_table.get(callee).kind {
                    TypeKind::Function(signature) => signature.return_type,
                    _ => any,
                }
            }
            Expression::NewExpression(new) => self.type_of_new_expression(cx, new),
            Expression::ArrowFunction(arrow) => {
                let is_async = arrow.data.modifier_flags.contains(ModifierFlags::ASYNC);
                self.function_type(cx, arrow.type_parameters, arrow.parameters, arrow.return_type, is_async)
            }
            Expression::FunctionExpression(function) => {
                let is_async = function.data.modifier_flags.contains(ModifierFlags::ASYNC);
                self.function_type(
                    cx,
                    function.type_parameters,
                    function.parameters,
                    function.return_type,
                    is_async,
                )
            }
            Expression::PrefixUnaryExpression(prefix) => match prefix.operator {
                SyntaxKind::ExclamationToken => boolean,
                SyntaxKind::MinusToken => match prefix.operand {
                    Expression::NumericLiteral(n) if cx.in_const_context => {
                        self.type_table.number_literal(-n.value())
                    }
                    _ => number,
                },
                _ => number,
            },
            Expression::PostfixUnaryExpression(_) => number,
            Expression::TypeOfExpression(_) => string,
            Expression::VoidExpression(_) => self.type_table.undefined_type,
            Expression::DeleteExpression(_) => boolean,
            Expression::BinaryExpression(binary) => self.type_of_binary_expression(cx, binary),
            Expression::ConditionalExpression(conditional) => {
                let when_true = self.type_of_expression(cx, conditional.when_true);
                let when_false = self.type_of_expression(cx, conditional.when_false);
                self.create_union_type(vec![when_true, when_false])
            }
            _ => any,
        }
    }

    fn type_of_binary_expression(&mut self, cx: &mut Context<'_, '_>, binary: &BinaryExpression<'_>) -> TypeId {
        let operator = binary.operator_token.data.kind;
        match operator {
            SyntaxKind::EqualsToken => self.type_of_expression(cx, binary.right),
            SyntaxKind::AmpersandAmpersandToken => self.type_of_expression(cx, binary.right),
            SyntaxKind::BarBarToken | SyntaxKind::QuestionQuestionToken => {
                let left = self.type_of_expression(cx, binary.left);
                let left = self.remove_nullable(left);
                let right = self.type_of_expression(cx, binary.right);
                self.create_union_type(vec![left, right])
            }
            SyntaxKind::LessThanToken
            | SyntaxKind::GreaterThanToken
            | SyntaxKind::LessThanEqualsToken
            | SyntaxKind::GreaterThanEqualsToken
            | SyntaxKind::EqualsEqualsToken
            | SyntaxKind::ExclamationEqualsToken
            | SyntaxKind::EqualsEqualsEqualsToken
            | SyntaxKind::ExclamationEqualsEqualsToken
            | SyntaxKind::InKeyword
            | SyntaxKind::InstanceOfKeyword => self.type_table.boolean_type,
            SyntaxKind::PlusToken | SyntaxKind::PlusEqualsToken => {
                let left = self.type_of_expression(cx, binary.left);
                let right = self.type_of_expression(cx, binary.right);
                let left = self.widen(left);
                let right = self.widen(right);
                let string = self.type_table.string_type;
                if left == string || right == string {
                    string
                } else if left == self.type_table.any_type || right == self.type_table.any_type {
                    self.type_table.any_type
                } else {
                    self.type_table.number_type
                }
            }
            _ => self.type_table.number_type,
        }
    }

    fn type_of_array_literal(&mut self, cx: &mut Context<'_, '_>, array: &ArrayLiteralExpression<'_>) -> TypeId {
        let mut element_types = Vec::with_capacity(array.elements.len());
        for element in array.elements.iter() {
            let type_id = match element {
                Expression::SpreadElement(spread) => {
                    let spread_type = self.type_of_expression(cx, spread.expression);
                    match &self.type_table.get(spread_type).kind {
                        TypeKind::TypeReference { target, type_arguments, .. }
                            if *target == self.type_table.array_target =>
                        {
                            type_arguments.first().copied().unwrap_or(self.type_table.any_type)
                        }
                        _ => self.type_table.any_type,
                    }
                }
                Expression::OmittedExpression(_) => self.type_table.undefined_type,
                _ => self.type_of_expression(cx, element),
            };
            element_types.push(type_id);
        }
        if cx.in_const_context {
            return self.type_table.add_type(TypeFlags::OBJECT, TypeKind::Tuple { element_types });
        }
        let widened = element_types.into_iter().map(|t| self.widen(t)).collect::<Vec<_>>();
        let element = if widened.is_empty() {
            self.type_table.any_type
        } else {
            self.create_union_type(widened)
        };
        self.create_array_type(element)
    }

    fn type_of_object_literal(&mut self, cx: &mut Context<'_, '_>, object: &ObjectLiteralExpression<'_>) -> TypeId {
        let readonly = cx.in_const_context;
        let mut members: IndexMap<String, Property> = IndexMap::new();
        for element in object.properties.iter() {
            let (name, type_id) = match element {
                ObjectLiteralElement::PropertyAssignment(assignment) => {
                    let Some(name) = assignment.name.text() else { continue };
                    let type_id = self.type_of_expression(cx, assignment.initializer);
                    (name, self.widen_unless_const(cx, type_id))
                }
                ObjectLiteralElement::ShorthandPropertyAssignment(shorthand) => {
                    let type_id = self.value_type_of_name(cx, shorthand.name.text);
                    (shorthand.name.text, type_id)
                }
                ObjectLiteralElement::MethodDeclaration(method) => {
                    let Some(name) = method.name.text() else { continue };
                    let is_async = method.data.modifier_flags.contains(ModifierFlags::ASYNC);
                    let type_id = self.function_type(
                        cx,
                        method.type_parameters,
                        method.parameters,
                        method.return_type,
                        is_async,
                    );
                    (name, type_id)
                }
                ObjectLiteralElement::GetAccessor(accessor) => {
                    let Some(name) = accessor.name.text() else { continue };
                    let type_id = match accessor.return_type {
                        Some(annotation) => self.type_from_node(cx, annotation),
                        None => self.type_table.any_type,
                    };
                    (name, type_id)
                }
                ObjectLiteralElement::SetAccessor(_) => continue,
                ObjectLiteralElement::SpreadAssignment(spread) => {
                    let spread_type = self.type_of_expression(cx, spread.expression);
                    for (name, property) in self.property_map(spread_type) {
                        members.insert(name, property);
                    }
                    continue;
                }
            };
            members.insert(
                name.to_string(),
                Property { name: name.to_string(), type_id, optional: false, readonly },
            );
        }
        self.type_table.add_type(
            TypeFlags::OBJECT,
            TypeKind::Object(ObjectType {
                object_flags: ObjectFlags::OBJECT_LITERAL,
                members,
                ..Default::default()
            }),
        )
    }

    fn type_of_new_expression(&mut self, cx: &mut Context<'_, '_>, new: &NewExpression<'_>) -> TypeId {
        let any = self.type_table.any_type;
        let Some(parts) = expression_name_parts(new.expression) else { return any };
        let symbol = cx.binder.and_then(|binder| resolve_parts(binder, &cx.containers, &parts));
        let declared = match symbol.and_then(|symbol| self.declared_type_of_symbol(cx, symbol)) {
            Some(declared) => declared,
            None => match self.declared_types.get(&parts.join(".")) {
                Some(declared) => declared.clone(),
                None => return any,
            },
        };
        let arguments: Vec<TypeId> = new
            .type_arguments
            .map(|arguments| arguments.iter().map(|t| self.type_from_node(cx, t)).collect())
            .unwrap_or_default();
        if declared.type_parameters.is_empty() || self.type_table.object(declared.type_id).is_none() {
            return declared.type_id;
        }
        let mut arguments = arguments;
        arguments.resize(declared.type_parameters.len(), any);
        self.create_type_reference(declared.type_id, arguments)
    }

    // ========================================================================
    // Type to string
    // ========================================================================

    /// Render a type the way it would be written in a declaration.
    pub fn type_to_string(&self, type_id: TypeId) -> String {
        self.type_to_string_with_depth(type_id, 0)
    }

    fn type_to_string_with_depth(&self, type_id: TypeId, depth: u32) -> String {
        if depth > MAX_TYPE_TO_STRING_DEPTH {
            return "...".to_string();
        }
        let next = depth + 1;
        let ty = self.type_table.get(type_id);
        match &ty.kind {
            TypeKind::Intrinsic { name } => name.to_string(),
            TypeKind::StringLiteral { value } => format!("\"{value}\""),
            TypeKind::NumberLiteral { value } => value.to_string(),
            TypeKind::BooleanLiteral { value } => value.to_string(),
            TypeKind::TypeParameter { name, .. } => name.clone(),
            TypeKind::TypeReference { target, type_arguments, .. } => {
                if *target == self.type_table.array_target && type_arguments.len() == 1 {
                    let element = self.type_to_string_with_depth(type_arguments[0], next);
                    return if self.needs_parentheses_in_array(type_arguments[0]) {
                        format!("({element})[]")
                    } else {
                        format!("{element}[]")
                    };
                }
                let name = self
                    .type_table
                    .object(*target)
                    .and_then(|object| object.name.clone())
                    .unwrap_or_default();
                let arguments: Vec<String> = type_arguments
                    .iter()
                    .map(|&t| self.type_to_string_with_depth(t, next))
                    .collect();
                format!("{}<{}>", name, arguments.join(", "))
            }
            TypeKind::Object(object) => match &object.name {
                Some(name) => name.clone(),
                None => self.object_literal_to_string(object, next),
            },
            TypeKind::Union { types } => types
                .iter()
                .map(|&t| self.type_to_string_with_depth(t, next))
                .collect::<Vec<_>>()
                .join(" | "),
            TypeKind::Intersection { types } => types
                .iter()
                .map(|&t| self.type_to_string_with_depth(t, next))
                .collect::<Vec<_>>()
                .join(" & "),
            TypeKind::Tuple { element_types } => {
                let elements: Vec<String> = element_types
                    .iter()
                    .map(|&t| self.type_to_string_with_depth(t, next))
                    .collect();
                format!("[{}]", elements.join(", "))
            }
            TypeKind::Function(signature) => self.signature_to_string(signature, next),
            TypeKind::Mapped { type_parameter, constraint, template, optional } => format!(
                "{{ [{} in {}]{}: {} }}",
                self.type_to_string_with_depth(*type_parameter, next),
                self.type_to_string_with_depth(*constraint, next),
                if *optional { "?" } else { "" },
                self.type_to_string_with_depth(*template, next),
            ),
        }
    }

    fn needs_parentheses_in_array(&self, type_id: TypeId) -> bool {
        matches!(
            self.type_table.get(type_id).kind,
            TypeKind::Union { .. } | TypeKind::Intersection { .. } | TypeKind::Function(_)
        )
    }

    fn object_literal_to_string(&self, object: &ObjectType, depth: u32) -> String {
        let mut parts = Vec::with_capacity(object.members.len() + 1);
        if let Some(index) = object.string_index {
            parts.push(format!("[key: string]: {}", self.type_to_string_with_depth(index, depth)));
        }
        for property in object.members.values() {
            parts.push(format!(
                "{}{}: {}",
                property.name,
                if property.optional { "?" } else { "" },
                self.type_to_string_with_depth(property.type_id, depth)
            ));
        }
        if parts.is_empty() {
            "{}".to_string()
        } else {
            format!("{{ {} }}", parts.join("; "))
        }
    }

    fn signature_to_string(&self, signature: &Signature, depth: u32) -> String {
        let type_parameters = if signature.type_parameters.is_empty() {
            String::new()
        } else {
            let names: Vec<String> = signature
                .type_parameters
                .iter()
                .map(|&t| self.type_to_string_with_depth(t, depth))
                .collect();
            format!("<{}>", names.join(", "))
        };
        let parameters: Vec<String> = signature
            .parameters
            .iter()
            .map(|parameter| {
                format!(
                    "{}{}{}: {}",
                    if parameter.rest { "..." } else { "" },
                    parameter.name,
                    if parameter.optional { "?" } else { "" },
                    self.type_to_string_with_depth(parameter.type_id, depth)
                )
            })
            .collect();
        format!(
            "{}({}) => {}",
            type_parameters,
            parameters.join(", "),
            self.type_to_string_with_depth(signature.return_type, depth)
        )
    }
}

impl Default for Checker {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Name helpers
// ============================================================================

/// Dotted name of a symbol through its enclosing namespaces.
fn qualified_name(binder: &Binder<'_>, symbol_id: SymbolId) -> String {
    let mut parts = Vec::new();
    let mut current = Some(symbol_id);
    while let Some(id) = current {
        parts.push(binder.symbol_name(id));
        current = binder.get_symbol(id).and_then(|symbol| symbol.parent);
    }
    parts.reverse();
    parts.join(".")
}

/// The namespaces enclosing `symbol_id`, outermost first.
fn container_chain(binder: &Binder<'_>, symbol_id: SymbolId) -> Vec<SymbolId> {
    let mut chain = Vec::new();
    let mut current = binder.get_symbol(symbol_id).and_then(|symbol| symbol.parent);
    while let Some(id) = current {
        chain.push(id);
        current = binder.get_symbol(id).and_then(|symbol| symbol.parent);
    }
    chain.reverse();
    chain
}

/// Look `name` up in the enclosing namespaces, innermost first, then globals.
fn resolve_in_scope(binder: &Binder<'_>, containers: &[SymbolId], name: &str) -> Option<SymbolId> {
    containers
        .iter()
        .rev()
        .find_map(|&container| binder.resolve_member(container, name))
        .or_else(|| binder.resolve_name(name))
}

fn resolve_entity(binder: &Binder<'_>, containers: &[SymbolId], name: &EntityName<'_>) -> Option<SymbolId> {
    match name {
        EntityName::Identifier(identifier) => resolve_in_scope(binder, containers, identifier.text),
        EntityName::QualifiedName(qualified) => {
            let left = resolve_entity(binder, containers, &qualified.left)?;
            binder.resolve_member(left, qualified.right.text)
        }
    }
}

fn resolve_parts(binder: &Binder<'_>, containers: &[SymbolId], parts: &[&str]) -> Option<SymbolId> {
    let (first, rest) = parts.split_first()?;
    let mut current = resolve_in_scope(binder, containers, first)?;
    for part in rest {
        current = binder.resolve_member(current, part)?;
    }
    Some(current)
}

/// `a.b.c` as `["a", "b", "c"]`.
fn expression_name_parts<'a>(expression: &Expression<'a>) -> Option<Vec<&'a str>> {
    match expression {
        Expression::Identifier(identifier) => Some(vec![identifier.text]),
        Expression::PropertyAccessExpression(access) => {
            let mut parts = expression_name_parts(access.expression)?;
            parts.push(access.name.text);
            Some(parts)
        }
        Expression::ParenthesizedExpression(inner) => expression_name_parts(inner.expression),
        _ => None,
    }
}

fn class_member_name<'a>(name: &PropertyName<'a>) -> Option<&'a str> {
    match name {
        PropertyName::PrivateIdentifier(_) => None,
        _ => name.text(),
    }
}

fn is_const_type(type_node: &TypeNode<'_>) -> bool {
    matches!(
        type_node,
        TypeNode::TypeReference(reference)
            if reference.type_arguments.is_none()
                && matches!(&reference.type_name, EntityName::Identifier(id) if id.text == "const")
    )
}

fn is_const_assertion(expression: &Expression<'_>) -> bool {
    match expression.skip_parentheses() {
        Expression::AsExpression(assertion) => is_const_type(assertion.type_node),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(checker: &mut Checker, source: &str) {
        let arena = Bump::new();
        let source_file = rscript_parser::parse_source_file(&arena, "test.ts", source);
        checker.check_source_file(&source_file);
    }

    #[test]
    fn test_union_dedupes_and_flattens() {
        let mut checker = Checker::new();
        let string = checker.type_table.string_type;
        let number = checker.type_table.number_type;
        let inner = checker.create_union_type(vec![string, number]);
        let outer = checker.create_union_type(vec![inner, string]);
        assert_eq!(checker.get_union_types(outer), Some(&[string, number][..]));
        assert_eq!(checker.create_union_type(vec![]), checker.type_table.never_type);
        assert_eq!(checker.create_union_type(vec![number, number]), number);
    }

    #[test]
    fn test_union_keeps_never() {
        let mut checker = Checker::new();
        let never = checker.type_table.never_type;
        let string = checker.type_table.string_type;
        let union = checker.create_union_type(vec![string, never]);
        assert_eq!(checker.type_to_string(union), "string | never");
    }

    #[test]
    fn test_array_parenthesizes_unions() {
        let mut checker = Checker::new();
        let string = checker.type_table.string_type;
        let number = checker.type_table.number_type;
        let plain = checker.create_array_type(string);
        assert_eq!(checker.type_to_string(plain), "string[]");
        let union = checker.create_union_type(vec![string, number]);
        let array = checker.create_array_type(union);
        assert_eq!(checker.type_to_string(array), "(string | number)[]");
    }

    #[test]
    fn test_literal_strings() {
        let mut checker = Checker::new();
        let a = checker.type_table.string_literal("a");
        let n = checker.type_table.number_literal(1.5);
        assert_eq!(checker.type_to_string(a), "\"a\"");
        assert_eq!(checker.type_to_string(n), "1.5");
        assert_eq!(checker.type_to_string(checker.type_table.true_type), "true");
    }

    #[test]
    fn test_instantiate_reference_members() {
        let mut checker = Checker::new();
        check(&mut checker, "interface Box<T> { value: T; all: T[] }");
        let boxed = checker.get_type_of_symbol_name("Box").expect("Box declared");
        let string = checker.type_table.string_type;
        let parameter = checker.type_table.object(boxed).expect("object").type_parameters[0];
        let reference = checker.create_type_reference(boxed, vec![string]);
        let mapped = checker.instantiate_type(reference, &[(parameter, string)]);
        assert_eq!(mapped, reference);
        let names: Vec<String> = checker
            .get_properties_of_type(reference)
            .iter()
            .map(|p| checker.type_to_string(p.type_id))
            .collect();
        assert_eq!(names, vec!["string", "string[]"]);
    }

    #[test]
    fn test_qualified_names() {
        let mut checker = Checker::new();
        check(&mut checker, "namespace Api.V1 { export interface Request { url: string } }");
        assert!(checker.get_type_of_symbol_name("Api.V1.Request").is_some());
        assert!(checker.get_type_of_symbol_name("Request").is_none());
    }
}
