//! Top-level schema assembly.
//!
//! `SchemaContext` owns everything validation needs: the family registries,
//! the polymorphic field declarations, the external collaborators, and the
//! bounded schema cache. The assembled schema for a model type is built
//! once, cached, and shared read-only.

use std::sync::Arc;

use serde_json::{json, Map, Value};

use super::cache::BoundedCache;
use crate::compat::{LatestVersionUpgrader, VersionUpgrader, VERSION_KEY};
use crate::error::ConfigError;
use crate::hyperopt::scheduler::{scheduler_field, scheduler_registry, SchedulerConfig};
use crate::hyperopt::search_algorithm::{
    search_algorithm_field, search_algorithm_registry, SearchAlgorithmConfig,
};
use crate::registry::Registry;
use crate::schema::{ExtraFields, VariantField, VariantSpec};
use crate::split::{DefaultSplitters, SplitterFactory};

/// Encoder-combiner-decoder architecture; the only model type with a
/// combiner stage.
pub const MODEL_ECD: &str = "ecd";
/// Gradient-boosted tree architecture.
pub const MODEL_GBM: &str = "gbm";
pub const MODEL_TYPES: [&str; 2] = [MODEL_ECD, MODEL_GBM];

// Top-level section names.
pub(crate) const MODEL_TYPE: &str = "model_type";
pub(crate) const INPUT_FEATURES: &str = "input_features";
pub(crate) const OUTPUT_FEATURES: &str = "output_features";
pub(crate) const TRAINER: &str = "trainer";
pub(crate) const PREPROCESSING: &str = "preprocessing";
pub(crate) const HYPEROPT: &str = "hyperopt";
pub(crate) const DEFAULTS: &str = "defaults";
pub(crate) const BACKEND: &str = "backend";
pub(crate) const COMBINER: &str = "combiner";
pub(crate) const SPLIT: &str = "split";

/// Feature types a column can declare.
pub const FEATURE_TYPES: [&str; 12] = [
    "binary",
    "number",
    "category",
    "set",
    "bag",
    "sequence",
    "text",
    "timeseries",
    "vector",
    "audio",
    "image",
    "date",
];

const COMBINER_TYPES: [&str; 6] = [
    "concat",
    "sequence_concat",
    "sequence",
    "comparator",
    "tabnet",
    "transformer",
];

fn model_type_schema() -> Value {
    json!({
        "type": "string",
        "enum": MODEL_TYPES,
        "default": MODEL_ECD,
        "title": MODEL_TYPE,
        "description": "The model architecture to train.",
    })
}

fn feature_list_schema(title: &str) -> Value {
    json!({
        "type": "array",
        "minItems": 1,
        "items": {
            "type": "object",
            "properties": {
                "name": {"type": "string", "description": "Column name of the feature."},
                "type": {"type": "string", "enum": FEATURE_TYPES, "description": "Feature type."},
            },
            "required": ["name", "type"],
            // Encoder/decoder parameters are owned by the feature modules.
            "additionalProperties": true,
        },
        "title": title,
        "description": "Feature declarations, one per column.",
    })
}

fn trainer_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "learning_rate": {"type": "number", "minimum": 0.0, "description": "Base learning rate."},
            "epochs": {"type": "integer", "minimum": 1, "description": "Number of training epochs."},
            "batch_size": {"type": "integer", "minimum": 1, "description": "Samples per training batch."},
            "early_stop": {"type": "integer", "minimum": -1, "description": "Evaluations without improvement before stopping; -1 disables."},
        },
        // Remaining trainer knobs are owned by the training loop.
        "additionalProperties": true,
        "title": TRAINER,
        "description": "Trainer settings.",
    })
}

fn preprocessing_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "split": {
                "type": "object",
                "properties": {"type": {"type": "string", "description": "Split strategy."}},
                "additionalProperties": true,
                "description": "Dataset split settings; cross-field consistency is checked by the splitter.",
            },
            "sample_ratio": {"type": "number", "minimum": 0.0, "maximum": 1.0, "description": "Fraction of the dataset to use."},
        },
        "additionalProperties": true,
        "title": PREPROCESSING,
        "description": "Preprocessing settings.",
    })
}

fn defaults_schema() -> Value {
    json!({
        "type": "object",
        "additionalProperties": true,
        "title": DEFAULTS,
        "description": "Per-feature-type default settings.",
    })
}

fn version_schema() -> Value {
    json!({
        "type": "string",
        "title": VERSION_KEY,
        "description": "Current config schema version.",
    })
}

fn backend_schema() -> Value {
    json!({
        "type": "object",
        "additionalProperties": true,
        "title": BACKEND,
        "description": "Execution backend settings.",
    })
}

fn combiner_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "type": {"type": "string", "enum": COMBINER_TYPES, "default": "concat", "description": "Combiner type."},
        },
        "additionalProperties": true,
        "title": COMBINER,
        "description": "Combiner settings; merges input feature encodings.",
    })
}

/// Registries, field declarations, collaborators, and the schema cache for
/// one validation pipeline.
pub struct SchemaContext {
    schedulers: Registry<VariantSpec<SchedulerConfig>>,
    search_algorithms: Registry<VariantSpec<SearchAlgorithmConfig>>,
    scheduler_slot: VariantField<SchedulerConfig>,
    search_algorithm_slot: VariantField<SearchAlgorithmConfig>,
    upgrader: Box<dyn VersionUpgrader>,
    splitters: Box<dyn SplitterFactory>,
    extra_fields: ExtraFields,
    cache: BoundedCache<Value>,
}

impl SchemaContext {
    /// Build a context with the given collaborators and the default
    /// registries.
    pub fn new(
        upgrader: Box<dyn VersionUpgrader>,
        splitters: Box<dyn SplitterFactory>,
    ) -> Result<Self, ConfigError> {
        let schedulers = scheduler_registry();
        let search_algorithms = search_algorithm_registry();
        let scheduler_slot = scheduler_field(
            &schedulers,
            json!({"type": "async_hyperband"}),
            "Hyperopt scheduler settings.",
        )?;
        let search_algorithm_slot = search_algorithm_field(
            &search_algorithms,
            "Hyperopt search algorithm settings.",
            json!({"type": "variant_generator"}),
        )?;
        Ok(Self {
            schedulers,
            search_algorithms,
            scheduler_slot,
            search_algorithm_slot,
            upgrader,
            splitters,
            extra_fields: ExtraFields::Deny,
            cache: BoundedCache::new(2),
        })
    }

    /// Context with the default collaborators: pass-through version
    /// stamping and the built-in splitters.
    pub fn with_defaults() -> Result<Self, ConfigError> {
        Self::new(Box::new(LatestVersionUpgrader), Box::new(DefaultSplitters))
    }

    /// Change the extra-properties policy for variant branches.
    pub fn extra_fields(mut self, policy: ExtraFields) -> Self {
        self.extra_fields = policy;
        self
    }

    pub fn schedulers(&self) -> &Registry<VariantSpec<SchedulerConfig>> {
        &self.schedulers
    }

    pub fn search_algorithms(&self) -> &Registry<VariantSpec<SearchAlgorithmConfig>> {
        &self.search_algorithms
    }

    pub fn scheduler_slot(&self) -> &VariantField<SchedulerConfig> {
        &self.scheduler_slot
    }

    pub fn search_algorithm_slot(&self) -> &VariantField<SearchAlgorithmConfig> {
        &self.search_algorithm_slot
    }

    pub(crate) fn upgrader(&self) -> &dyn VersionUpgrader {
        self.upgrader.as_ref()
    }

    pub(crate) fn splitters(&self) -> &dyn SplitterFactory {
        self.splitters.as_ref()
    }

    /// The assembled schema for a model type, cached and shared read-only.
    pub fn schema(&self, model_type: &str) -> Arc<Value> {
        self.cache
            .get_or_insert_with(model_type, || build_schema(self, model_type))
    }

    /// Cached model types, least recently used first.
    pub fn cached_model_types(&self) -> Vec<String> {
        self.cache.keys()
    }

    fn hyperopt_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "goal": {"type": "string", "enum": ["minimize", "maximize"], "default": "minimize", "description": "Whether to minimize or maximize the metric."},
                "metric": {"type": "string", "description": "Metric to optimize."},
                "output_feature": {"type": "string", "description": "Output feature the metric belongs to."},
                "parameters": {"type": "object", "additionalProperties": true, "description": "Search space, one entry per hyperparameter."},
                "executor": {"type": "object", "additionalProperties": true, "description": "Trial executor settings."},
                "scheduler": self.scheduler_slot.json_schema(&self.schedulers, self.extra_fields),
                "search_alg": self.search_algorithm_slot.json_schema(&self.search_algorithms, self.extra_fields),
            },
            "additionalProperties": false,
            "title": HYPEROPT,
            "description": "Hyperparameter search settings.",
        })
    }
}

impl std::fmt::Debug for SchemaContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaContext")
            .field("schedulers", &self.schedulers.len())
            .field("search_algorithms", &self.search_algorithms.len())
            .field("extra_fields", &self.extra_fields)
            .finish_non_exhaustive()
    }
}

/// Assemble the full top-level schema for a model type.
///
/// Pure function of the context's registries and the model type; the result
/// is cached by [`SchemaContext::schema`] and must not be mutated.
pub fn build_schema(ctx: &SchemaContext, model_type: &str) -> Value {
    let mut properties = Map::new();
    properties.insert(MODEL_TYPE.to_string(), model_type_schema());
    properties.insert(INPUT_FEATURES.to_string(), feature_list_schema(INPUT_FEATURES));
    properties.insert(OUTPUT_FEATURES.to_string(), feature_list_schema(OUTPUT_FEATURES));
    properties.insert(TRAINER.to_string(), trainer_schema());
    properties.insert(PREPROCESSING.to_string(), preprocessing_schema());
    properties.insert(HYPEROPT.to_string(), ctx.hyperopt_schema());
    properties.insert(DEFAULTS.to_string(), defaults_schema());
    properties.insert(VERSION_KEY.to_string(), version_schema());
    properties.insert(BACKEND.to_string(), backend_schema());
    if model_type == MODEL_ECD {
        properties.insert(COMBINER.to_string(), combiner_schema());
    }
    json!({
        "type": "object",
        "properties": properties,
        "required": [INPUT_FEATURES, OUTPUT_FEATURES],
        "additionalProperties": false,
    })
}
