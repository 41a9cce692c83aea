//! Discriminated-union composition.
//!
//! A polymorphic family validates through a single schema node: a `type`
//! property enumerating every registered name, plus one conditional clause
//! per variant that activates that variant's field constraints when `type`
//! matches. Branches are mutually exclusive on the discriminator, so clause
//! order never affects the outcome.

use serde_json::{json, Map, Value};

use super::variant::VariantSpec;
use crate::registry::Registry;

/// Policy for properties a variant does not declare.
///
/// `Deny` matches the top-level schema's own strictness and is the
/// documented default; `Allow` lets undeclared keys pass through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtraFields {
    #[default]
    Deny,
    Allow,
}

/// Build one conditional clause: if `type` equals `discriminator`, the
/// instance must satisfy `properties`.
///
/// Under [`ExtraFields::Deny`] the branch re-admits the discriminator key
/// itself, since the branch's property set is checked exhaustively.
pub fn create_cond(discriminator: &str, properties: Map<String, Value>, extra: ExtraFields) -> Value {
    let mut then = Map::new();
    let mut properties = properties;
    if extra == ExtraFields::Deny {
        properties.insert("type".to_string(), json!({}));
        then.insert("additionalProperties".to_string(), json!(false));
    }
    then.insert("properties".to_string(), Value::Object(properties));
    json!({
        "if": {"properties": {"type": {"const": discriminator}}},
        "then": Value::Object(then),
    })
}

/// One conditional clause per registered name, with the `type` descriptor
/// stripped from the branch (the discriminator lives at the union level).
pub fn variant_conditionals<C>(
    registry: &Registry<VariantSpec<C>>,
    extra: ExtraFields,
) -> Vec<Value> {
    registry
        .iter()
        .map(|(name, spec)| {
            let properties: Map<String, Value> = (spec.fields)()
                .into_iter()
                .filter(|(field, _)| *field != "type")
                .map(|(field, descriptor)| (field.to_string(), descriptor.to_json_schema()))
                .collect();
            create_cond(name, properties, extra)
        })
        .collect()
}

/// The family-level discriminated-union schema node.
pub fn discriminated_union<C>(
    registry: &Registry<VariantSpec<C>>,
    family: &str,
    default_type: &str,
    title: &str,
    description: &str,
    extra: ExtraFields,
) -> Value {
    let names: Vec<&str> = registry.keys().collect();
    json!({
        "type": "object",
        "properties": {
            "type": {
                "type": "string",
                "enum": names,
                "default": default_type,
                "description": format!("The type of {family} to use."),
            },
        },
        "title": title,
        "allOf": variant_conditionals(registry, extra),
        "required": ["type"],
        "description": description,
    })
}
