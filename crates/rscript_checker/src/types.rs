//! Type system representation.
//!
//! Types are stored in a TypeTable (type arena) and referenced by TypeId.
//! This avoids lifetime issues with recursive type structures.

use indexmap::IndexMap;
use rscript_ast::types::{ObjectFlags, TypeFlags, TypeId};
use rustc_hash::FxHashMap;

/// A type in the type system.
#[derive(Debug, Clone)]
pub struct Type {
    /// Unique identifier.
    pub id: TypeId,
    /// Type flags describing what kind of type this is.
    pub flags: TypeFlags,
    /// The specific kind of type.
    pub kind: TypeKind,
}

/// The specific data for each type kind.
#[derive(Debug, Clone)]
pub enum TypeKind {
    /// any, unknown, string, number, boolean, void, undefined, null, never,
    /// bigint, symbol and object.
    Intrinsic { name: &'static str },
    StringLiteral { value: String },
    NumberLiteral { value: f64 },
    BooleanLiteral { value: bool },
    /// Interfaces, classes, enums and anonymous object types.
    Object(ObjectType),
    /// A generic interface or class applied to type arguments. `members`
    /// holds the target's members with the arguments substituted.
    TypeReference {
        target: TypeId,
        type_arguments: Vec<TypeId>,
        members: IndexMap<String, Property>,
    },
    Union { types: Vec<TypeId> },
    Intersection { types: Vec<TypeId> },
    TypeParameter { name: String, constraint: Option<TypeId> },
    Tuple { element_types: Vec<TypeId> },
    Function(Signature),
    /// `{ [P in K]: T }` over a constraint that is not yet known.
    Mapped {
        type_parameter: TypeId,
        constraint: TypeId,
        template: TypeId,
        optional: bool,
    },
}

/// The members of an object type.
#[derive(Debug, Clone)]
pub struct ObjectType {
    pub object_flags: ObjectFlags,
    /// Declared name, `None` for anonymous types.
    pub name: Option<String>,
    pub type_parameters: Vec<TypeId>,
    pub members: IndexMap<String, Property>,
    /// Value type of a `[key: string]: T` signature.
    pub string_index: Option<TypeId>,
}

impl Default for ObjectType {
    fn default() -> Self {
        Self {
            object_flags: ObjectFlags::NONE,
            name: None,
            type_parameters: Vec::new(),
            members: IndexMap::new(),
            string_index: None,
        }
    }
}

/// A named member of an object type.
#[derive(Debug, Clone)]
pub struct Property {
    pub name: String,
    pub type_id: TypeId,
    pub optional: bool,
    pub readonly: bool,
}

/// A function/method signature.
#[derive(Debug, Clone)]
pub struct Signature {
    pub type_parameters: Vec<TypeId>,
    pub parameters: Vec<SignatureParameter>,
    pub return_type: TypeId,
}

/// A parameter in a signature.
#[derive(Debug, Clone)]
pub struct SignatureParameter {
    pub name: String,
    pub type_id: TypeId,
    pub optional: bool,
    pub rest: bool,
}

/// The type table stores all types and provides access by TypeId.
#[derive(Debug)]
pub struct TypeTable {
    types: Vec<Type>,
    string_literals: FxHashMap<String, TypeId>,
    number_literals: FxHashMap<u64, TypeId>,
    // Well-known types
    pub any_type: TypeId,
    pub unknown_type: TypeId,
    pub string_type: TypeId,
    pub number_type: TypeId,
    pub boolean_type: TypeId,
    pub void_type: TypeId,
    pub undefined_type: TypeId,
    pub null_type: TypeId,
    pub never_type: TypeId,
    pub bigint_type: TypeId,
    pub symbol_type: TypeId,
    pub object_type: TypeId,
    pub true_type: TypeId,
    pub false_type: TypeId,
    /// The generic `Array<T>` target behind every `T[]`.
    pub array_target: TypeId,
}

impl TypeTable {
    pub fn new() -> Self {
        let mut table = Self {
            types: Vec::with_capacity(256),
            string_literals: FxHashMap::default(),
            number_literals: FxHashMap::default(),
            any_type: TypeId(0),
            unknown_type: TypeId(1),
            string_type: TypeId(2),
            number_type: TypeId(3),
            boolean_type: TypeId(4),
            void_type: TypeId(5),
            undefined_type: TypeId(6),
            null_type: TypeId(7),
            never_type: TypeId(8),
            bigint_type: TypeId(9),
            symbol_type: TypeId(10),
            object_type: TypeId(11),
            true_type: TypeId(12),
            false_type: TypeId(13),
            array_target: TypeId(15),
        };

        table.create_intrinsic(TypeFlags::ANY, "any");
        table.create_intrinsic(TypeFlags::UNKNOWN, "unknown");
        table.create_intrinsic(TypeFlags::STRING, "string");
        table.create_intrinsic(TypeFlags::NUMBER, "number");
        table.create_intrinsic(TypeFlags::BOOLEAN, "boolean");
        table.create_intrinsic(TypeFlags::VOID, "void");
        table.create_intrinsic(TypeFlags::UNDEFINED, "undefined");
        table.create_intrinsic(TypeFlags::NULL, "null");
        table.create_intrinsic(TypeFlags::NEVER, "never");
        table.create_intrinsic(TypeFlags::BIG_INT, "bigint");
        table.create_intrinsic(TypeFlags::ES_SYMBOL, "symbol");
        table.create_intrinsic(TypeFlags::NON_PRIMITIVE, "object");
        table.add_type(TypeFlags::BOOLEAN_LITERAL, TypeKind::BooleanLiteral { value: true });
        table.add_type(TypeFlags::BOOLEAN_LITERAL, TypeKind::BooleanLiteral { value: false });

        let element = table.add_type(
            TypeFlags::TYPE_PARAMETER,
            TypeKind::TypeParameter { name: "T".to_string(), constraint: None },
        );
        let mut members = IndexMap::new();
        members.insert(
            "length".to_string(),
            Property {
                name: "length".to_string(),
                type_id: table.number_type,
                optional: false,
                readonly: false,
            },
        );
        let array = table.add_type(
            TypeFlags::OBJECT,
            TypeKind::Object(ObjectType {
                object_flags: ObjectFlags::INTERFACE | ObjectFlags::ARRAY,
                name: Some("Array".to_string()),
                type_parameters: vec![element],
                members,
                string_index: None,
            }),
        );
        debug_assert_eq!(array, table.array_target);

        table
    }

    fn create_intrinsic(&mut self, flags: TypeFlags, name: &'static str) -> TypeId {
        self.add_type(flags, TypeKind::Intrinsic { name })
    }

    /// Add a new type to the table and return its ID.
    pub fn add_type(&mut self, flags: TypeFlags, kind: TypeKind) -> TypeId {
        let id = TypeId(self.types.len() as u32);
        self.types.push(Type { id, flags, kind });
        id
    }

    /// The interned literal type for `value`.
    pub fn string_literal(&mut self, value: &str) -> TypeId {
        if let Some(&id) = self.string_literals.get(value) {
            return id;
        }
        let id = self.add_type(
            TypeFlags::STRING_LITERAL,
            TypeKind::StringLiteral { value: value.to_string() },
        );
        self.string_literals.insert(value.to_string(), id);
        id
    }

    /// The interned literal type for `value`.
    pub fn number_literal(&mut self, value: f64) -> TypeId {
        if let Some(&id) = self.number_literals.get(&value.to_bits()) {
            return id;
        }
        let id = self.add_type(TypeFlags::NUMBER_LITERAL, TypeKind::NumberLiteral { value });
        self.number_literals.insert(value.to_bits(), id);
        id
    }

    /// Get a type by its ID.
    pub fn get(&self, id: TypeId) -> &Type {
        &self.types[id.index()]
    }

    /// Get a mutable reference to a type by its ID.
    pub fn get_mut(&mut self, id: TypeId) -> &mut Type {
        &mut self.types[id.index()]
    }

    /// The object data of `id`, if it is an object type.
    pub fn object(&self, id: TypeId) -> Option<&ObjectType> {
        match &self.get(id).kind {
            TypeKind::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Get the total number of types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl Default for TypeTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_well_known_ids() {
        let table = TypeTable::new();
        assert!(matches!(table.get(table.never_type).kind, TypeKind::Intrinsic { name: "never" }));
        assert!(matches!(table.get(table.false_type).kind, TypeKind::BooleanLiteral { value: false }));
        let array = table.object(table.array_target).expect("array target is an object");
        assert_eq!(array.name.as_deref(), Some("Array"));
        assert_eq!(array.type_parameters.len(), 1);
    }

    #[test]
    fn test_literals_are_interned() {
        let mut table = TypeTable::new();
        let a = table.string_literal("a");
        assert_eq!(table.string_literal("a"), a);
        assert_ne!(table.string_literal("b"), a);
        let one = table.number_literal(1.0);
        assert_eq!(table.number_literal(1.0), one);
    }
}
