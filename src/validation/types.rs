//! Pluggable type-checking dialects for the structural validator.
//!
//! The validator itself is one static type; what varies is how a schema
//! `type` name is matched against an instance. This replaces per-dialect
//! validator construction, which would otherwise need its own bounded cache
//! to stay leak-free.

use serde_json::Value;

/// Maps a schema `type` name to an instance predicate.
pub trait TypeCheck: Send + Sync {
    fn is_type(&self, instance: &Value, type_name: &str) -> bool;
}

/// Draft-style checking: an `integer` must be a JSON integer, an `array`
/// must be a JSON array.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardTypes;

impl TypeCheck for StandardTypes {
    fn is_type(&self, instance: &Value, type_name: &str) -> bool {
        match type_name {
            "null" => instance.is_null(),
            "boolean" => instance.is_boolean(),
            "string" => instance.is_string(),
            "number" => instance.is_number(),
            "integer" => instance.is_i64() || instance.is_u64(),
            "array" => instance.is_array(),
            "object" => instance.is_object(),
            _ => false,
        }
    }
}

/// The dialect used for configuration validation.
///
/// `array` accepts every JSON sequence, whether it came from a growable
/// list or a fixed-size pair (Rust tuples such as `perturbation_factors`
/// serialize to the same array shape, and both spellings are valid config).
/// `integer` additionally accepts numbers with a zero fractional part, so a
/// YAML `81.0` satisfies an integer field.
#[derive(Debug, Clone, Copy, Default)]
pub struct TupleTolerantTypes;

impl TypeCheck for TupleTolerantTypes {
    fn is_type(&self, instance: &Value, type_name: &str) -> bool {
        if StandardTypes.is_type(instance, type_name) {
            return true;
        }
        match type_name {
            "integer" => instance
                .as_f64()
                .is_some_and(|number| number.fract() == 0.0),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_standard_integer_is_bit_exact() {
        assert!(StandardTypes.is_type(&json!(5), "integer"));
        assert!(!StandardTypes.is_type(&json!(5.0), "integer"));
        assert!(!StandardTypes.is_type(&json!(5.5), "integer"));
    }

    #[test]
    fn test_tolerant_integer_accepts_whole_floats() {
        assert!(TupleTolerantTypes.is_type(&json!(5), "integer"));
        assert!(TupleTolerantTypes.is_type(&json!(5.0), "integer"));
        assert!(!TupleTolerantTypes.is_type(&json!(5.5), "integer"));
    }

    #[test]
    fn test_tuple_and_list_sequences_are_both_arrays() {
        let from_tuple = serde_json::to_value((1.2, 0.8)).unwrap();
        let from_list = serde_json::to_value(vec![1.2, 0.8]).unwrap();
        assert!(TupleTolerantTypes.is_type(&from_tuple, "array"));
        assert!(TupleTolerantTypes.is_type(&from_list, "array"));
        assert_eq!(from_tuple, from_list);
    }

    #[test]
    fn test_booleans_are_not_numbers() {
        assert!(!TupleTolerantTypes.is_type(&json!(true), "number"));
        assert!(!TupleTolerantTypes.is_type(&json!(true), "integer"));
    }

    #[test]
    fn test_unknown_type_name_matches_nothing() {
        assert!(!StandardTypes.is_type(&json!(5), "quaternion"));
    }
}
