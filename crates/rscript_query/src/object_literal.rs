//! Reading the properties of object literals.

use crate::literals::{generic_array_values, literal_value, LiteralValue};
use rscript_ast::{Expression, Node, ObjectLiteralElement, ObjectLiteralExpression, PropertyName, SourceFile};

/// The shape of a property's initializer.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Literal(LiteralValue),
    /// The literal elements of an array initializer.
    Array(Vec<LiteralValue>),
    /// An object initializer. Its contents are not read.
    Object,
    /// Anything that is not a literal, such as a call or identifier.
    Absent,
}

impl RawValue {
    fn of(initializer: &Expression<'_>) -> RawValue {
        match initializer {
            Expression::ArrayLiteralExpression(_) => RawValue::Array(generic_array_values(initializer)),
            Expression::ObjectLiteralExpression(_) => RawValue::Object,
            _ => literal_value(initializer).map_or(RawValue::Absent, RawValue::Literal),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PropertyDescriptor<'a> {
    /// Key text, or the source text of the key expression when computed.
    pub key: String,
    pub raw_value: RawValue,
    pub value_node: &'a Expression<'a>,
    pub is_computed: bool,
}

/// The `key: value` properties of `object`, in order.
///
/// Shorthand properties, spreads, methods, accessors, and numeric or private
/// keys are skipped.
pub fn read_object_literal<'a>(
    object: &'a ObjectLiteralExpression<'a>,
    source_file: &SourceFile<'_>,
) -> Vec<PropertyDescriptor<'a>> {
    object
        .properties
        .iter()
        .filter_map(|element| {
            let ObjectLiteralElement::PropertyAssignment(assignment) = element else {
                return None;
            };
            let (key, is_computed) = match &assignment.name {
                PropertyName::Identifier(id) => (id.text.to_string(), false),
                PropertyName::StringLiteral(s) => (s.text.to_string(), false),
                PropertyName::ComputedPropertyName(computed) => (
                    Node::Expression(computed.expression).source_text(source_file).to_string(),
                    true,
                ),
                PropertyName::NumericLiteral(_) | PropertyName::PrivateIdentifier(_) => return None,
            };
            Some(PropertyDescriptor {
                key,
                raw_value: RawValue::of(assignment.initializer),
                value_node: assignment.initializer,
                is_computed,
            })
        })
        .collect()
}

fn property_initializer<'a>(object: &'a ObjectLiteralExpression<'a>, name: &str) -> Option<&'a Expression<'a>> {
    object.properties.iter().find_map(|element| match element {
        ObjectLiteralElement::PropertyAssignment(assignment)
            if assignment.name.as_identifier().map_or(false, |id| id.text == name) =>
        {
            Some(assignment.initializer)
        }
        _ => None,
    })
}

/// The literal value of the identifier-keyed property `name`.
pub fn get_property_value(object: &ObjectLiteralExpression<'_>, name: &str) -> Option<LiteralValue> {
    property_initializer(object, name).and_then(literal_value)
}

/// The value of property `name` if its initializer is `true` or `false`.
/// Truthy strings and numbers are not coerced.
pub fn get_boolean_property(object: &ObjectLiteralExpression<'_>, name: &str) -> Option<bool> {
    match property_initializer(object, name)? {
        Expression::TrueKeyword(_) => Some(true),
        Expression::FalseKeyword(_) => Some(false),
        _ => None,
    }
}

/// Whether `object` has a property or method named `name`.
pub fn has_property(object: &ObjectLiteralExpression<'_>, name: &str) -> bool {
    object.properties.iter().any(|element| match element {
        ObjectLiteralElement::PropertyAssignment(assignment) => {
            assignment.name.as_identifier().map_or(false, |id| id.text == name)
        }
        ObjectLiteralElement::ShorthandPropertyAssignment(shorthand) => shorthand.name.text == name,
        ObjectLiteralElement::MethodDeclaration(method) => {
            method.name.as_identifier().map_or(false, |id| id.text == name)
        }
        _ => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::find_first;
    use bumpalo::Bump;
    use rscript_parser::parse_source_file;

    const CONFIG: &str = r#"
        const config = {
            name: "api",
            "port": 8080,
            [prefix + "Key"]: true,
            tags: ["a", 1, other],
            nested: { deep: 1 },
            handler: makeHandler(),
            short,
            ...rest,
            start() {},
            7: "seven",
        };
    "#;

    #[test]
    fn test_read_object_literal() {
        let arena = Bump::new();
        let sf = parse_source_file(&arena, "config.ts", CONFIG);
        let object = find_first(Node::SourceFile(&sf), |n| n.as_object_literal().is_some())
            .and_then(|n| n.as_object_literal())
            .expect("object literal");
        let props = read_object_literal(object, &sf);
        let keys: Vec<_> = props.iter().map(|p| p.key.as_str()).collect();
        assert_eq!(keys, vec!["name", "port", "prefix + \"Key\"", "tags", "nested", "handler"]);

        assert_eq!(props[0].raw_value, RawValue::Literal(LiteralValue::String("api".into())));
        assert_eq!(props[1].raw_value, RawValue::Literal(LiteralValue::Number(8080.0)));
        assert!(props[2].is_computed);
        assert!(!props[1].is_computed);
        assert_eq!(
            props[3].raw_value,
            RawValue::Array(vec![LiteralValue::String("a".into()), LiteralValue::Number(1.0)])
        );
        assert_eq!(props[4].raw_value, RawValue::Object);
        assert_eq!(props[5].raw_value, RawValue::Absent);
        assert!(matches!(props[5].value_node, Expression::CallExpression(_)));
    }

    #[test]
    fn test_named_lookups() {
        let arena = Bump::new();
        let sf = parse_source_file(
            &arena,
            "a.ts",
            "const o = { enabled: true, strict: 'yes', count: 1, run() {}, \"quoted\": 2, short };",
        );
        let object = find_first(Node::SourceFile(&sf), |n| n.as_object_literal().is_some())
            .and_then(|n| n.as_object_literal())
            .expect("object literal");

        assert_eq!(get_property_value(object, "count"), Some(LiteralValue::Number(1.0)));
        assert_eq!(get_property_value(object, "quoted"), None);
        assert_eq!(get_property_value(object, "missing"), None);

        assert_eq!(get_boolean_property(object, "enabled"), Some(true));
        assert_eq!(get_boolean_property(object, "strict"), None);
        assert_eq!(get_boolean_property(object, "count"), None);

        assert!(has_property(object, "run"));
        assert!(has_property(object, "short"));
        assert!(has_property(object, "enabled"));
        assert!(!has_property(object, "quoted"));
    }
}
