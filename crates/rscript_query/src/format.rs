//! Property-key formatting and type-map comparison.

use indexmap::IndexMap;
use rscript_scanner::is_identifier_text;

/// Whether `key` can be written as a bare property name.
pub fn is_valid_identifier(key: &str) -> bool {
    is_identifier_text(key)
}

/// `key` as it would be written in an object type: bare when it is an
/// identifier, double-quoted otherwise.
pub fn format_property_key(key: &str) -> String {
    if is_valid_identifier(key) {
        key.to_string()
    } else {
        format!("\"{key}\"")
    }
}

/// Whether two property maps have the same keys with the same type strings,
/// in any order.
pub fn type_maps_equal(a: &IndexMap<String, String>, b: &IndexMap<String, String>) -> bool {
    a.len() == b.len() && a.iter().all(|(key, ty)| b.get(key) == Some(ty))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_identifier() {
        for key in ["_private", "$jquery", "CamelCase", "a1", "ünïcode"] {
            assert!(is_valid_identifier(key), "{key}");
        }
        for key in ["", "123abc", "my-var", "my var", "my.var"] {
            assert!(!is_valid_identifier(key), "{key}");
        }
    }

    #[test]
    fn test_format_property_key() {
        for key in ["", "123abc", "my-var", "my var", "my.var", "_private", "$jquery", "CamelCase"] {
            let expected = if is_valid_identifier(key) {
                key.to_string()
            } else {
                format!("\"{key}\"")
            };
            assert_eq!(format_property_key(key), expected);
        }
        assert_eq!(format_property_key("my-var"), "\"my-var\"");
        assert_eq!(format_property_key("ok"), "ok");
    }

    #[test]
    fn test_type_maps_equal_ignores_order() {
        let a: IndexMap<String, String> = [("x", "string"), ("y", "number")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let b: IndexMap<String, String> = [("y", "number"), ("x", "string")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        assert!(type_maps_equal(&a, &b));

        let mut c = b.clone();
        c.insert("x".to_string(), "boolean".to_string());
        assert!(!type_maps_equal(&a, &c));
        c.insert("z".to_string(), "any".to_string());
        assert!(!type_maps_equal(&a, &c));
        assert!(type_maps_equal(&IndexMap::new(), &IndexMap::new()));
    }
}
