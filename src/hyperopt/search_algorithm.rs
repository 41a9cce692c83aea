//! Search algorithm configuration family.
//!
//! Search algorithms carry no tunable parameters at this layer; the config
//! is the discriminator alone, constrained to the registered name list. The
//! family still flows through the generic registry/loader machinery so the
//! assembled schema and the error behavior match the scheduler family.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ConfigError, ValidationError};
use crate::registry::Registry;
use crate::schema::{load_typed, load_variant_config, FieldMap, FieldSchema, VariantField, VariantSpec};

/// Names of the supported search algorithms.
pub const SEARCH_ALGORITHM_NAMES: [&str; 14] = [
    "variant_generator",
    "random",
    "ax",
    "bayesopt",
    "blendsearch",
    "bohb",
    "cfo",
    "dragonfly",
    "hebo",
    "hyperopt",
    "nevergrad",
    "optuna",
    "skopt",
    "zoopt",
];

/// Basic search algorithm settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchAlgorithmConfig {
    pub r#type: String,
}

impl Default for SearchAlgorithmConfig {
    fn default() -> Self {
        Self {
            r#type: "variant_generator".to_string(),
        }
    }
}

impl SearchAlgorithmConfig {
    pub fn fields() -> FieldMap {
        vec![(
            "type",
            FieldSchema::string_options(
                &SEARCH_ALGORITHM_NAMES,
                "variant_generator",
                "Search algorithm discriminator.",
            ),
        )]
    }
}

type SearchAlgorithmSpec = VariantSpec<SearchAlgorithmConfig>;

fn load_search_algorithm_variant(
    map: &Map<String, Value>,
) -> Result<SearchAlgorithmConfig, ValidationError> {
    load_typed(
        "SearchAlgorithmConfig",
        SearchAlgorithmConfig::fields,
        std::convert::identity,
        map,
    )
}

/// Build the search algorithm family registry.
pub fn search_algorithm_registry() -> Registry<SearchAlgorithmSpec> {
    let mut registry = Registry::new();
    for name in SEARCH_ALGORITHM_NAMES {
        registry.register(
            name,
            SearchAlgorithmSpec {
                canonical: name,
                fields: SearchAlgorithmConfig::fields,
                load: load_search_algorithm_variant,
            },
        );
    }
    registry
}

/// Declare a search algorithm slot with the given description and default.
pub fn search_algorithm_field(
    registry: &Registry<SearchAlgorithmSpec>,
    description: &str,
    default: Value,
) -> Result<VariantField<SearchAlgorithmConfig>, ConfigError> {
    VariantField::new("search_alg", "search_algorithm", registry, default, description)
}

/// Resolve a raw search algorithm value against the family registry.
pub fn load_search_algorithm(
    registry: &Registry<SearchAlgorithmSpec>,
    value: Option<&Value>,
) -> Result<Option<SearchAlgorithmConfig>, ValidationError> {
    load_variant_config("search_alg", registry, value)
}
