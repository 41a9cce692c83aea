//! Polymorphic config resolution by discriminator.
//!
//! A family registry maps each accepted `type` name to a [`VariantSpec`]:
//! the variant's canonical name, its field-schema builder, and a loader
//! that turns a raw mapping into the typed config. [`load_variant_config`]
//! dispatches on the `type` key; [`VariantField`] declares one configurable
//! slot of a family inside an enclosing config object, with a fail-fast
//! default.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use super::cond::{discriminated_union, ExtraFields};
use super::field::FieldMap;
use crate::error::{value_kind, ConfigError, ValidationError};
use crate::registry::Registry;

/// One variant of a polymorphic family.
pub struct VariantSpec<C> {
    /// Canonical registered name.
    pub canonical: &'static str,
    /// Pure builder for the variant's field descriptors.
    pub fields: fn() -> FieldMap,
    /// Loader from a raw mapping (including the `type` key) to the typed
    /// family config.
    pub load: fn(&Map<String, Value>) -> Result<C, ValidationError>,
}

impl<C> Clone for VariantSpec<C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C> Copy for VariantSpec<C> {}

impl<C> std::fmt::Debug for VariantSpec<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VariantSpec")
            .field("canonical", &self.canonical)
            .finish_non_exhaustive()
    }
}

/// Resolve a raw value into a typed variant config.
///
/// `None` and null pass through as absent: the slot is optional at this
/// layer. Anything else must be a mapping carrying a registered `type`.
pub fn load_variant_config<C>(
    family: &'static str,
    registry: &Registry<VariantSpec<C>>,
    value: Option<&Value>,
) -> Result<Option<C>, ValidationError> {
    let value = match value {
        None | Some(Value::Null) => return Ok(None),
        Some(value) => value,
    };
    let map = value.as_object().ok_or(ValidationError::NotAMapping {
        family,
        found: value_kind(value),
    })?;
    let discriminator = map
        .get("type")
        .and_then(Value::as_str)
        .filter(|name| registry.contains(name))
        .ok_or_else(|| ValidationError::InvalidDiscriminator {
            family,
            value: value.clone(),
        })?;
    let spec = registry
        .get(discriminator)
        .map_err(|_| ValidationError::InvalidDiscriminator {
            family,
            value: value.clone(),
        })?;
    (spec.load)(map).map(Some)
}

/// Shared loader body for variant specs: serde-deserialize the typed struct
/// (types, defaults, unknown-field rejection), then enforce every field
/// descriptor against the dumped result (option membership, numeric bounds).
/// All failures aggregate into one error naming the variant.
pub(crate) fn load_typed<C, T>(
    variant: &'static str,
    fields: fn() -> FieldMap,
    wrap: fn(T) -> C,
    map: &Map<String, Value>,
) -> Result<C, ValidationError>
where
    T: DeserializeOwned + Serialize,
{
    let config: T = serde_json::from_value(Value::Object(map.clone())).map_err(|e| {
        ValidationError::VariantParams {
            variant,
            detail: e.to_string(),
        }
    })?;
    let dumped = serde_json::to_value(&config).map_err(|e| ValidationError::VariantParams {
        variant,
        detail: e.to_string(),
    })?;
    let mut problems = Vec::new();
    for (name, descriptor) in fields() {
        let slot = dumped.get(name).unwrap_or(&Value::Null);
        if let Err(reason) = descriptor.check(slot) {
            problems.push(format!("{name}: {reason}"));
        }
    }
    if !problems.is_empty() {
        return Err(ValidationError::VariantParams {
            variant,
            detail: problems.join("; "),
        });
    }
    Ok(wrap(config))
}

/// One configurable slot of a polymorphic family inside an enclosing config
/// object: a resolved default plus the family's discriminated-union schema.
///
/// Construction fails fast when the declared default is not a mapping, has
/// no `type`, names an unregistered variant, or violates the variant's own
/// constraints, so a bad field declaration never survives to use time.
#[derive(Debug)]
pub struct VariantField<C> {
    family: &'static str,
    title: &'static str,
    default: C,
    default_type: String,
    description: String,
}

impl<C> VariantField<C> {
    pub fn new(
        family: &'static str,
        title: &'static str,
        registry: &Registry<VariantSpec<C>>,
        default: Value,
        description: &str,
    ) -> Result<Self, ConfigError> {
        let map = default
            .as_object()
            .ok_or_else(|| ConfigError::InvalidDefault {
                field: family,
                reason: format!("default must be a mapping, got {}", value_kind(&default)),
            })?;
        let default_type = map
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| ConfigError::InvalidDefault {
                field: family,
                reason: "default has no `type` key".to_string(),
            })?
            .to_lowercase();
        if !registry.contains(&default_type) {
            return Err(ConfigError::InvalidDefault {
                field: family,
                reason: format!("unregistered type `{default_type}`"),
            });
        }
        let resolved = load_variant_config(family, registry, Some(&default))
            .map_err(|e| ConfigError::InvalidDefault {
                field: family,
                reason: e.to_string(),
            })?
            .ok_or_else(|| ConfigError::InvalidDefault {
                field: family,
                reason: "default resolved to nothing".to_string(),
            })?;
        Ok(Self {
            family,
            title,
            default: resolved,
            default_type,
            description: description.to_string(),
        })
    }

    /// The fully-typed, fully-defaulted config used when the user supplies
    /// no value for this slot.
    pub fn default_config(&self) -> &C {
        &self.default
    }

    /// Canonical discriminator of the default.
    pub fn default_type(&self) -> &str {
        &self.default_type
    }

    /// Human-readable slot description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Resolve a user-supplied value for this slot.
    pub fn load(
        &self,
        registry: &Registry<VariantSpec<C>>,
        value: Option<&Value>,
    ) -> Result<Option<C>, ValidationError> {
        load_variant_config(self.family, registry, value)
    }

    /// The family's discriminated-union schema, carrying this slot's
    /// default and description.
    pub fn json_schema(&self, registry: &Registry<VariantSpec<C>>, extra: ExtraFields) -> Value {
        discriminated_union(
            registry,
            self.family,
            &self.default_type,
            self.title,
            &self.description,
            extra,
        )
    }
}
