//! Field constraint descriptors.
//!
//! One `FieldSchema` describes one parameter of a variant config: its
//! semantic kind, default, allowed options, numeric bounds, nullability,
//! and description. A descriptor renders to a JSON-Schema node for the
//! structural pass, and also enforces its own constraints at load time via
//! [`FieldSchema::check`]. Both are deterministic and side-effect-free, so
//! schemas built from them can be cached and shared.

use serde_json::{json, Map, Value};

/// Semantic kind of a config field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldKind {
    String,
    Integer,
    Number,
    Boolean,
    Object,
    /// Fixed-size pair of numbers, e.g. perturbation scaling factors.
    FloatPair,
}

impl FieldKind {
    fn type_name(self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::Integer => "integer",
            FieldKind::Number => "number",
            FieldKind::Boolean => "boolean",
            FieldKind::Object => "object",
            FieldKind::FloatPair => "array",
        }
    }
}

/// Constraint descriptor for a single config field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSchema {
    kind: FieldKind,
    default: Option<Value>,
    options: Option<Vec<Value>>,
    minimum: Option<f64>,
    maximum: Option<f64>,
    allow_none: bool,
    description: String,
}

/// Field name → descriptor pairs in declaration order.
pub type FieldMap = Vec<(&'static str, FieldSchema)>;

impl FieldSchema {
    fn new(kind: FieldKind, description: &str) -> Self {
        Self {
            kind,
            default: None,
            options: None,
            minimum: None,
            maximum: None,
            allow_none: false,
            description: description.to_string(),
        }
    }

    /// Required string constrained to a fixed set of options.
    pub fn string_options(options: &[&str], default: &str, description: &str) -> Self {
        let mut schema = Self::new(FieldKind::String, description);
        schema.options = Some(options.iter().map(|o| json!(o)).collect());
        schema.default = Some(json!(default));
        schema
    }

    /// Nullable string constrained to a fixed set of options, default null.
    pub fn optional_string_options(options: &[&str], description: &str) -> Self {
        let mut schema = Self::new(FieldKind::String, description);
        schema.options = Some(options.iter().map(|o| json!(o)).collect());
        schema.default = Some(Value::Null);
        schema.allow_none = true;
        schema
    }

    /// Nullable free-form string, default null.
    pub fn string(description: &str) -> Self {
        let mut schema = Self::new(FieldKind::String, description);
        schema.default = Some(Value::Null);
        schema.allow_none = true;
        schema
    }

    /// Boolean with a default.
    pub fn boolean(default: bool, description: &str) -> Self {
        let mut schema = Self::new(FieldKind::Boolean, description);
        schema.default = Some(json!(default));
        schema
    }

    /// Integer with minimum 1.
    pub fn positive_integer(default: u64, description: &str) -> Self {
        let mut schema = Self::new(FieldKind::Integer, description);
        schema.default = Some(json!(default));
        schema.minimum = Some(1.0);
        schema
    }

    /// Integer with minimum 0.
    pub fn non_negative_integer(default: u64, description: &str) -> Self {
        let mut schema = Self::new(FieldKind::Integer, description);
        schema.default = Some(json!(default));
        schema.minimum = Some(0.0);
        schema
    }

    /// Number with minimum 0.
    pub fn non_negative_float(default: f64, description: &str) -> Self {
        let mut schema = Self::new(FieldKind::Number, description);
        schema.default = Some(json!(default));
        schema.minimum = Some(0.0);
        schema
    }

    /// Number bounded on both sides (inclusive).
    pub fn float_range(default: f64, min: f64, max: f64, description: &str) -> Self {
        let mut schema = Self::new(FieldKind::Number, description);
        schema.default = Some(json!(default));
        schema.minimum = Some(min);
        schema.maximum = Some(max);
        schema
    }

    /// Nullable free-form mapping, default null.
    pub fn dict(description: &str) -> Self {
        let mut schema = Self::new(FieldKind::Object, description);
        schema.default = Some(Value::Null);
        schema.allow_none = true;
        schema
    }

    /// Fixed pair of numbers.
    pub fn float_pair(default: (f64, f64), description: &str) -> Self {
        let mut schema = Self::new(FieldKind::FloatPair, description);
        schema.default = Some(json!([default.0, default.1]));
        schema
    }

    /// Render the descriptor as a JSON-Schema node.
    pub fn to_json_schema(&self) -> Value {
        let mut node = Map::new();
        if self.allow_none {
            node.insert("type".into(), json!([self.kind.type_name(), "null"]));
        } else {
            node.insert("type".into(), json!(self.kind.type_name()));
        }
        if let Some(options) = &self.options {
            let mut allowed = options.clone();
            if self.allow_none {
                allowed.push(Value::Null);
            }
            node.insert("enum".into(), Value::Array(allowed));
        }
        if let Some(default) = &self.default {
            node.insert("default".into(), default.clone());
        }
        if let Some(minimum) = self.minimum {
            node.insert("minimum".into(), number_value(minimum));
        }
        if let Some(maximum) = self.maximum {
            node.insert("maximum".into(), number_value(maximum));
        }
        if self.kind == FieldKind::FloatPair {
            node.insert("items".into(), json!({"type": "number"}));
            node.insert("minItems".into(), json!(2));
            node.insert("maxItems".into(), json!(2));
        }
        node.insert("description".into(), json!(self.description));
        Value::Object(node)
    }

    /// Enforce the descriptor's constraints against a value.
    ///
    /// The returned message omits the field name; the caller prefixes it.
    pub fn check(&self, value: &Value) -> Result<(), String> {
        if value.is_null() {
            if self.allow_none {
                return Ok(());
            }
            return Err("null is not allowed".to_string());
        }
        self.check_kind(value)?;
        if let Some(options) = &self.options {
            if !options.contains(value) {
                return Err(format!("{value} is not one of {}", Value::Array(options.clone())));
            }
        }
        if let Some(number) = value.as_f64() {
            if let Some(minimum) = self.minimum {
                if number < minimum {
                    return Err(format!("{number} is less than the minimum of {minimum}"));
                }
            }
            if let Some(maximum) = self.maximum {
                if number > maximum {
                    return Err(format!("{number} is greater than the maximum of {maximum}"));
                }
            }
        }
        Ok(())
    }

    fn check_kind(&self, value: &Value) -> Result<(), String> {
        let ok = match self.kind {
            FieldKind::String => value.is_string(),
            FieldKind::Integer => value.is_i64() || value.is_u64(),
            FieldKind::Number => value.is_number(),
            FieldKind::Boolean => value.is_boolean(),
            FieldKind::Object => value.is_object(),
            FieldKind::FloatPair => match value.as_array() {
                Some(items) => items.len() == 2 && items.iter().all(Value::is_number),
                None => false,
            },
        };
        if ok {
            Ok(())
        } else {
            Err(format!(
                "expected {}, got {}",
                self.kind.type_name(),
                crate::error::value_kind(value)
            ))
        }
    }

    /// Whether the declared default satisfies the descriptor's own
    /// constraints. Every registered variant is swept by a test.
    pub fn default_is_valid(&self) -> bool {
        match &self.default {
            Some(default) => self.check(default).is_ok(),
            None => true,
        }
    }

    /// The declared default, if any.
    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }
}

/// Emit a number as an integer when it has no fractional part, so integer
/// bounds render as `1` rather than `1.0`.
fn number_value(value: f64) -> Value {
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        json!(value as i64)
    } else {
        json!(value)
    }
}
