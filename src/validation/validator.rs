//! Structural schema validator.
//!
//! Walks a JSON-Schema-like node against a configuration instance and
//! reports the first violation with a JSON-pointer-like path to the
//! offending field. Supported keywords cover what the schema builders emit:
//! `type`, `enum`, `const`, `minimum`, `maximum`, `minItems`, `maxItems`,
//! `items`, `properties`, `required`, `additionalProperties` (boolean),
//! `allOf`, and `if`/`then`. Unknown keywords are ignored.

use serde_json::Value;

use super::types::TypeCheck;
use crate::error::value_kind;

/// A structural mismatch between an instance and its schema.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("config{path}: {message}")]
pub struct SchemaViolation {
    /// JSON-pointer-like path to the offending field, empty at the root.
    pub path: String,
    pub message: String,
}

impl SchemaViolation {
    fn new(path: &str, message: String) -> Self {
        Self {
            path: path.to_string(),
            message,
        }
    }
}

/// Statically defined validator parameterized by a type-checking dialect.
pub struct SchemaValidator<'t> {
    types: &'t dyn TypeCheck,
}

impl<'t> SchemaValidator<'t> {
    pub fn new(types: &'t dyn TypeCheck) -> Self {
        Self { types }
    }

    /// Validate an instance against a schema, reporting the first violation.
    pub fn validate(&self, instance: &Value, schema: &Value) -> Result<(), SchemaViolation> {
        self.check(instance, schema, "")
    }

    fn check(&self, instance: &Value, schema: &Value, path: &str) -> Result<(), SchemaViolation> {
        let schema = match schema.as_object() {
            Some(schema) => schema,
            // A non-object schema node constrains nothing.
            None => return Ok(()),
        };

        if let Some(expected) = schema.get("type") {
            self.check_type(instance, expected, path)?;
        }
        if let Some(allowed) = schema.get("enum").and_then(Value::as_array) {
            if !allowed.contains(instance) {
                return Err(SchemaViolation::new(
                    path,
                    format!("{instance} is not one of {}", Value::Array(allowed.clone())),
                ));
            }
        }
        if let Some(expected) = schema.get("const") {
            if instance != expected {
                return Err(SchemaViolation::new(
                    path,
                    format!("{instance} is not the constant {expected}"),
                ));
            }
        }
        self.check_bounds(instance, schema, path)?;
        self.check_items(instance, schema, path)?;
        self.check_object(instance, schema, path)?;

        if let Some(clauses) = schema.get("allOf").and_then(Value::as_array) {
            for clause in clauses {
                self.check(instance, clause, path)?;
            }
        }
        if let Some(condition) = schema.get("if") {
            if self.check(instance, condition, path).is_ok() {
                if let Some(consequent) = schema.get("then") {
                    self.check(instance, consequent, path)?;
                }
            }
        }
        Ok(())
    }

    fn check_type(
        &self,
        instance: &Value,
        expected: &Value,
        path: &str,
    ) -> Result<(), SchemaViolation> {
        let matches = match expected {
            Value::String(name) => self.types.is_type(instance, name),
            Value::Array(names) => names
                .iter()
                .filter_map(Value::as_str)
                .any(|name| self.types.is_type(instance, name)),
            _ => true,
        };
        if matches {
            Ok(())
        } else {
            Err(SchemaViolation::new(
                path,
                format!("expected {expected}, got {}", value_kind(instance)),
            ))
        }
    }

    fn check_bounds(
        &self,
        instance: &Value,
        schema: &serde_json::Map<String, Value>,
        path: &str,
    ) -> Result<(), SchemaViolation> {
        let number = match instance.as_f64() {
            Some(number) if instance.is_number() => number,
            _ => return Ok(()),
        };
        if let Some(minimum) = schema.get("minimum").and_then(Value::as_f64) {
            if number < minimum {
                return Err(SchemaViolation::new(
                    path,
                    format!("{number} is less than the minimum of {minimum}"),
                ));
            }
        }
        if let Some(maximum) = schema.get("maximum").and_then(Value::as_f64) {
            if number > maximum {
                return Err(SchemaViolation::new(
                    path,
                    format!("{number} is greater than the maximum of {maximum}"),
                ));
            }
        }
        Ok(())
    }

    fn check_items(
        &self,
        instance: &Value,
        schema: &serde_json::Map<String, Value>,
        path: &str,
    ) -> Result<(), SchemaViolation> {
        let items = match instance.as_array() {
            Some(items) => items,
            None => return Ok(()),
        };
        if let Some(min_items) = schema.get("minItems").and_then(Value::as_u64) {
            if (items.len() as u64) < min_items {
                return Err(SchemaViolation::new(
                    path,
                    format!("expected at least {min_items} items, got {}", items.len()),
                ));
            }
        }
        if let Some(max_items) = schema.get("maxItems").and_then(Value::as_u64) {
            if (items.len() as u64) > max_items {
                return Err(SchemaViolation::new(
                    path,
                    format!("expected at most {max_items} items, got {}", items.len()),
                ));
            }
        }
        if let Some(item_schema) = schema.get("items") {
            for (index, item) in items.iter().enumerate() {
                self.check(item, item_schema, &format!("{path}/{index}"))?;
            }
        }
        Ok(())
    }

    fn check_object(
        &self,
        instance: &Value,
        schema: &serde_json::Map<String, Value>,
        path: &str,
    ) -> Result<(), SchemaViolation> {
        let object = match instance.as_object() {
            Some(object) => object,
            None => return Ok(()),
        };
        let properties = schema.get("properties").and_then(Value::as_object);
        if let Some(properties) = properties {
            for (name, subschema) in properties {
                if let Some(value) = object.get(name) {
                    self.check(value, subschema, &format!("{path}/{name}"))?;
                }
            }
        }
        if let Some(required) = schema.get("required").and_then(Value::as_array) {
            for name in required.iter().filter_map(Value::as_str) {
                if !object.contains_key(name) {
                    return Err(SchemaViolation::new(
                        path,
                        format!("missing required property `{name}`"),
                    ));
                }
            }
        }
        if schema.get("additionalProperties").and_then(Value::as_bool) == Some(false) {
            for name in object.keys() {
                let declared = properties.is_some_and(|props| props.contains_key(name));
                if !declared {
                    return Err(SchemaViolation::new(
                        &format!("{path}/{name}"),
                        format!("unexpected property `{name}`"),
                    ));
                }
            }
        }
        Ok(())
    }
}
