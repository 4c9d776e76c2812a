//! Canonical strings for checker-resolved types.
//!
//! The checker does the resolving; this module only layers union
//! `never`-filtering, property extraction and `Promise` unwrapping on top of
//! what a [`TypeResolver`] reports.

use indexmap::IndexMap;
use rscript_checker::{Checker, Property, TypeId};

/// What the canonicalization routines need from a type checker.
pub trait TypeResolver {
    /// A handle valid for the lifetime of the resolver's session.
    type Type: Copy;
    type Property;

    /// The checker's own rendering of `ty`.
    fn type_to_string(&self, ty: Self::Type) -> String;

    /// The constituents of `ty` if it is a union.
    fn union_constituents(&self, ty: Self::Type) -> Option<Vec<Self::Type>>;

    fn properties_of_type(&self, ty: Self::Type) -> Vec<Self::Property>;

    fn property_name(&self, property: &Self::Property) -> String;

    /// The declared type of `property`, or `None` if it cannot be resolved.
    fn type_of_property(&self, property: &Self::Property) -> Option<Self::Type>;

    /// `T` if `ty` is an instantiation of the built-in `Promise<T>`.
    fn promise_type_argument(&self, ty: Self::Type) -> Option<Self::Type>;
}

impl TypeResolver for Checker {
    type Type = TypeId;
    type Property = Property;

    fn type_to_string(&self, ty: TypeId) -> String {
        Checker::type_to_string(self, ty)
    }

    fn union_constituents(&self, ty: TypeId) -> Option<Vec<TypeId>> {
        self.get_union_types(ty).map(<[TypeId]>::to_vec)
    }

    fn properties_of_type(&self, ty: TypeId) -> Vec<Property> {
        self.get_properties_of_type(ty)
    }

    fn property_name(&self, property: &Property) -> String {
        property.name.clone()
    }

    fn type_of_property(&self, property: &Property) -> Option<TypeId> {
        Some(property.type_id)
    }

    fn promise_type_argument(&self, ty: TypeId) -> Option<TypeId> {
        self.get_promised_type(ty)
    }
}

/// The canonical string of `ty`.
///
/// Union members that render as `never` are dropped. The remaining members
/// keep the checker's order.
pub fn type_to_canonical_string<R: TypeResolver + ?Sized>(resolver: &R, ty: R::Type) -> String {
    let Some(constituents) = resolver.union_constituents(ty) else {
        return resolver.type_to_string(ty);
    };
    let members: Vec<String> = constituents
        .into_iter()
        .map(|member| type_to_canonical_string(resolver, member))
        .filter(|member| member != "never")
        .collect();
    match members.len() {
        0 => "never".to_string(),
        _ => members.join(" | "),
    }
}

/// The `name: type` pairs of an object-shaped type, in the checker's member
/// order. Empty object types are reported as `any`.
pub fn extract_properties_from_type<R: TypeResolver + ?Sized>(
    resolver: &R,
    ty: R::Type,
) -> IndexMap<String, String> {
    resolver
        .properties_of_type(ty)
        .iter()
        .filter_map(|property| {
            let property_type = resolver.type_of_property(property)?;
            let mut rendered = type_to_canonical_string(resolver, property_type);
            if rendered == "{}" {
                rendered = "any".to_string();
            }
            Some((resolver.property_name(property), rendered))
        })
        .collect()
}

/// `T` for `Promise<T>`, or for a union with exactly one `Promise<T>`
/// member. Any other type is returned unchanged.
pub fn unwrap_promise_type<R: TypeResolver + ?Sized>(resolver: &R, ty: R::Type) -> R::Type {
    if let Some(inner) = resolver.promise_type_argument(ty) {
        return inner;
    }
    let Some(constituents) = resolver.union_constituents(ty) else {
        return ty;
    };
    let mut promised = constituents
        .into_iter()
        .filter_map(|member| resolver.promise_type_argument(member));
    match (promised.next(), promised.next()) {
        (Some(inner), None) => inner,
        _ => ty,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A resolver over a fixed table of types.
    struct FakeResolver {
        types: Vec<FakeType>,
    }

    enum FakeType {
        Named(&'static str),
        Union(Vec<usize>),
        Object(Vec<(&'static str, Option<usize>)>),
        Promise(usize),
    }

    impl TypeResolver for FakeResolver {
        type Type = usize;
        type Property = (&'static str, Option<usize>);

        fn type_to_string(&self, ty: usize) -> String {
            match &self.types[ty] {
                FakeType::Named(name) => name.to_string(),
                FakeType::Union(_) => "<union>".to_string(),
                FakeType::Object(props) if props.is_empty() => "{}".to_string(),
                FakeType::Object(_) => "{ ... }".to_string(),
                FakeType::Promise(inner) => format!("Promise<{}>", self.type_to_string(*inner)),
            }
        }

        fn union_constituents(&self, ty: usize) -> Option<Vec<usize>> {
            match &self.types[ty] {
                FakeType::Union(members) => Some(members.clone()),
                _ => None,
            }
        }

        fn properties_of_type(&self, ty: usize) -> Vec<Self::Property> {
            match &self.types[ty] {
                FakeType::Object(props) => props.clone(),
                _ => Vec::new(),
            }
        }

        fn property_name(&self, property: &Self::Property) -> String {
            property.0.to_string()
        }

        fn type_of_property(&self, property: &Self::Property) -> Option<usize> {
            property.1
        }

        fn promise_type_argument(&self, ty: usize) -> Option<usize> {
            match &self.types[ty] {
                FakeType::Promise(inner) => Some(*inner),
                _ => None,
            }
        }
    }

    fn fake() -> FakeResolver {
        FakeResolver {
            types: vec![
                FakeType::Named("never"),            // 0
                FakeType::Named("string"),           // 1
                FakeType::Named("number"),           // 2
                FakeType::Union(vec![0, 0]),         // 3
                FakeType::Union(vec![0, 1]),         // 4
                FakeType::Union(vec![2, 0, 1]),      // 5
                FakeType::Promise(1),                // 6
                FakeType::Union(vec![6, 2]),         // 7
                FakeType::Union(vec![6, 6]),         // 8
                FakeType::Object(vec![]),            // 9
                FakeType::Object(vec![("a", Some(1)), ("b", None), ("c", Some(9)), ("d", Some(5))]), // 10
            ],
        }
    }

    #[test]
    fn test_never_absorption() {
        let r = fake();
        assert_eq!(type_to_canonical_string(&r, 3), "never");
        assert_eq!(type_to_canonical_string(&r, 4), "string");
        assert_eq!(type_to_canonical_string(&r, 5), "number | string");
        assert_eq!(type_to_canonical_string(&r, 0), "never");
    }

    #[test]
    fn test_extract_properties() {
        let r = fake();
        let props = extract_properties_from_type(&r, 10);
        let pairs: Vec<_> = props.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
        assert_eq!(pairs, vec![("a", "string"), ("c", "any"), ("d", "number | string")]);
    }

    #[test]
    fn test_unwrap_promise() {
        let r = fake();
        assert_eq!(unwrap_promise_type(&r, 6), 1);
        assert_eq!(unwrap_promise_type(&r, 7), 1);
        assert_eq!(unwrap_promise_type(&r, 8), 8);
        assert_eq!(unwrap_promise_type(&r, 2), 2);
    }
}
