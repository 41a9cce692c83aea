//! Trial scheduler configuration family.
//!
//! Each scheduler variant is a flat serde struct with per-field defaults and
//! a pure `fields()` builder describing its constraints. The family registry
//! maps every accepted name (canonical plus aliases) to its variant spec;
//! [`scheduler_field`] declares a scheduler slot for the enclosing config.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ConfigError, ValidationError};
use crate::registry::Registry;
use crate::schema::{load_variant_config, FieldMap, FieldSchema, VariantField, VariantSpec};

// Result attributes reported by the trial executor. Schedulers compare
// progress and objective values through these keys.
pub const TRAINING_ITERATION: &str = "training_iteration";
pub const TIME_TOTAL_S: &str = "time_total_s";
pub const TIMESTEPS_TOTAL: &str = "timesteps_total";
pub const MEAN_ACCURACY: &str = "mean_accuracy";
pub const MEAN_LOSS: &str = "mean_loss";

pub const RESULT_KEYS: [&str; 5] = [
    TRAINING_ITERATION,
    TIME_TOTAL_S,
    TIMESTEPS_TOTAL,
    MEAN_ACCURACY,
    MEAN_LOSS,
];

/// Placeholder metric key substituted by the executor when only a mode was
/// given.
const DEFAULT_METRIC: &str = "_metric";

const METRIC_KEYS: [&str; 6] = [
    TRAINING_ITERATION,
    TIME_TOTAL_S,
    TIMESTEPS_TOTAL,
    MEAN_ACCURACY,
    MEAN_LOSS,
    DEFAULT_METRIC,
];

/// Inline reference to a user-registered callable.
///
/// A callable cannot be validated structurally; the schema stores the
/// reference name and resolution is deferred to the plugin layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CallableRef(pub String);

fn time_attr_field(default: &str) -> FieldSchema {
    FieldSchema::string_options(
        &RESULT_KEYS,
        default,
        "Result attribute to use for comparing time. Any monotonically increasing attribute works.",
    )
}

fn metric_field() -> FieldSchema {
    FieldSchema::optional_string_options(
        &METRIC_KEYS,
        "Result attribute holding the objective value. If unset but a mode was given, the executor's default metric is used.",
    )
}

fn mode_field() -> FieldSchema {
    FieldSchema::optional_string_options(
        &["min", "max"],
        "Whether the objective is minimizing or maximizing the metric attribute.",
    )
}

// ---------------------------------------------------------------------------
// Variants
// ---------------------------------------------------------------------------

/// Asynchronous successive-halving (ASHA) scheduler settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AsyncHyperbandConfig {
    pub r#type: String,
    pub time_attr: String,
    pub metric: Option<String>,
    pub mode: Option<String>,
    pub max_t: u64,
    pub grace_period: u64,
    pub reduction_factor: f64,
}

impl Default for AsyncHyperbandConfig {
    fn default() -> Self {
        Self {
            r#type: "async_hyperband".to_string(),
            time_attr: TRAINING_ITERATION.to_string(),
            metric: None,
            mode: None,
            max_t: 100,
            grace_period: 1,
            reduction_factor: 4.0,
        }
    }
}

impl AsyncHyperbandConfig {
    pub fn fields() -> FieldMap {
        vec![
            (
                "type",
                FieldSchema::string_options(
                    &["async_hyperband", "asynchyperband"],
                    "async_hyperband",
                    "Scheduler discriminator.",
                ),
            ),
            ("time_attr", time_attr_field(TRAINING_ITERATION)),
            ("metric", metric_field()),
            ("mode", mode_field()),
            (
                "max_t",
                FieldSchema::positive_integer(
                    100,
                    "Max time units per trial; trials stop after max_t units of time_attr have passed.",
                ),
            ),
            (
                "grace_period",
                FieldSchema::positive_integer(
                    1,
                    "Only stop trials at least this old, in units of time_attr.",
                ),
            ),
            (
                "reduction_factor",
                FieldSchema::non_negative_float(
                    4.0,
                    "Sets halving rate and amount. A unit-less scalar.",
                ),
            ),
        ]
    }
}

/// Standard hyperband scheduler settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HyperbandConfig {
    pub r#type: String,
    pub time_attr: String,
    pub metric: Option<String>,
    pub mode: Option<String>,
    pub max_t: u64,
    pub reduction_factor: f64,
    pub stop_last_trials: bool,
}

impl Default for HyperbandConfig {
    fn default() -> Self {
        Self {
            r#type: "hyperband".to_string(),
            time_attr: TRAINING_ITERATION.to_string(),
            metric: None,
            mode: None,
            max_t: 81,
            reduction_factor: 3.0,
            stop_last_trials: true,
        }
    }
}

impl HyperbandConfig {
    pub fn fields() -> FieldMap {
        vec![
            (
                "type",
                FieldSchema::string_options(&["hyperband"], "hyperband", "Scheduler discriminator."),
            ),
            ("time_attr", time_attr_field(TRAINING_ITERATION)),
            ("metric", metric_field()),
            ("mode", mode_field()),
            (
                "max_t",
                FieldSchema::positive_integer(
                    81,
                    "Max time units per trial; trials stop after max_t units of time_attr have passed.",
                ),
            ),
            (
                "reduction_factor",
                FieldSchema::non_negative_float(
                    3.0,
                    "Sets halving rate and amount. A unit-less scalar.",
                ),
            ),
            (
                "stop_last_trials",
                FieldSchema::boolean(true, "Whether to terminate the trials after reaching max_t."),
            ),
        ]
    }
}

/// Median stopping rule scheduler settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MedianStoppingRuleConfig {
    pub r#type: String,
    pub time_attr: String,
    pub metric: Option<String>,
    pub mode: Option<String>,
    pub grace_period: f64,
    pub min_samples_required: u64,
    pub min_time_slice: u64,
    pub hard_stop: bool,
}

impl Default for MedianStoppingRuleConfig {
    fn default() -> Self {
        Self {
            r#type: "median_stopping_rule".to_string(),
            time_attr: TIME_TOTAL_S.to_string(),
            metric: None,
            mode: None,
            grace_period: 60.0,
            min_samples_required: 3,
            min_time_slice: 0,
            hard_stop: true,
        }
    }
}

impl MedianStoppingRuleConfig {
    pub fn fields() -> FieldMap {
        vec![
            (
                "type",
                FieldSchema::string_options(
                    &["median_stopping_rule", "medianstoppingrule"],
                    "median_stopping_rule",
                    "Scheduler discriminator.",
                ),
            ),
            ("time_attr", time_attr_field(TIME_TOTAL_S)),
            ("metric", metric_field()),
            ("mode", mode_field()),
            (
                "grace_period",
                FieldSchema::non_negative_float(
                    60.0,
                    "Only stop trials at least this old; the median is computed from this time onwards.",
                ),
            ),
            (
                "min_samples_required",
                FieldSchema::positive_integer(3, "Minimum number of trials to compute the median over."),
            ),
            (
                "min_time_slice",
                FieldSchema::non_negative_integer(
                    0,
                    "Each trial runs at least this long before yielding, in units of time_attr.",
                ),
            ),
            (
                "hard_stop",
                FieldSchema::boolean(
                    true,
                    "If false, pauses trials instead of stopping them; paused trials resume FIFO once all others complete.",
                ),
            ),
        ]
    }
}

/// Population-based training scheduler settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PbtConfig {
    pub r#type: String,
    pub time_attr: String,
    pub metric: Option<String>,
    pub mode: Option<String>,
    pub perturbation_interval: f64,
    pub burn_in_period: f64,
    pub hyperparam_mutations: Option<Map<String, Value>>,
    pub quantile_fraction: f64,
    pub resample_probability: f64,
    pub perturbation_factors: (f64, f64),
    pub custom_explore_fn: Option<CallableRef>,
    pub log_config: bool,
    pub require_attrs: bool,
    pub synch: bool,
}

impl Default for PbtConfig {
    fn default() -> Self {
        Self {
            r#type: "pbt".to_string(),
            time_attr: TIME_TOTAL_S.to_string(),
            metric: None,
            mode: None,
            perturbation_interval: 60.0,
            burn_in_period: 60.0,
            hyperparam_mutations: None,
            quantile_fraction: 0.25,
            resample_probability: 0.25,
            perturbation_factors: (1.2, 0.8),
            custom_explore_fn: None,
            log_config: true,
            require_attrs: true,
            synch: false,
        }
    }
}

impl PbtConfig {
    pub fn fields() -> FieldMap {
        vec![
            (
                "type",
                FieldSchema::string_options(&["pbt"], "pbt", "Scheduler discriminator."),
            ),
            ("time_attr", time_attr_field(TIME_TOTAL_S)),
            ("metric", metric_field()),
            ("mode", mode_field()),
            (
                "perturbation_interval",
                FieldSchema::non_negative_float(
                    60.0,
                    "Models are considered for perturbation at this interval of time_attr. Perturbation incurs checkpoint overhead.",
                ),
            ),
            (
                "burn_in_period",
                FieldSchema::non_negative_float(
                    60.0,
                    "Models are not considered for perturbation before this interval of time_attr has passed.",
                ),
            ),
            (
                "hyperparam_mutations",
                FieldSchema::dict(
                    "Hyperparameters to mutate: per key, an allowed categorical set or a search-space distribution. At least one of hyperparam_mutations or custom_explore_fn must be given.",
                ),
            ),
            (
                "quantile_fraction",
                FieldSchema::float_range(
                    0.25,
                    0.0,
                    0.5,
                    "Parameters transfer from the top fraction of trials to the bottom fraction. Zero implies no exploitation at all.",
                ),
            ),
            (
                "resample_probability",
                FieldSchema::non_negative_float(
                    0.25,
                    "Probability of resampling from the original distribution when applying hyperparam_mutations.",
                ),
            ),
            (
                "perturbation_factors",
                FieldSchema::float_pair(
                    (1.2, 0.8),
                    "Scaling factors to choose between when mutating a continuous hyperparameter.",
                ),
            ),
            (
                "custom_explore_fn",
                FieldSchema::string(
                    "Name of a custom exploration callable, invoked after built-in perturbations; resolved by the plugin layer.",
                ),
            ),
            (
                "log_config",
                FieldSchema::boolean(
                    true,
                    "Whether to log each model's config at each exploit, so the config schedule can be reconstructed.",
                ),
            ),
            (
                "require_attrs",
                FieldSchema::boolean(
                    true,
                    "Whether time_attr and metric must appear in the result of every iteration.",
                ),
            ),
            (
                "synch",
                FieldSchema::boolean(
                    false,
                    "If true, use the synchronous implementation: perturbations occur only after all trials sync at the same time_attr.",
                ),
            ),
        ]
    }
}

/// Population-based training replay scheduler settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PbtReplayConfig {
    pub r#type: String,
    pub policy_file: Option<String>,
}

impl Default for PbtReplayConfig {
    fn default() -> Self {
        Self {
            r#type: "pbt_replay".to_string(),
            policy_file: None,
        }
    }
}

impl PbtReplayConfig {
    pub fn fields() -> FieldMap {
        vec![
            (
                "type",
                FieldSchema::string_options(&["pbt_replay"], "pbt_replay", "Scheduler discriminator."),
            ),
            (
                "policy_file",
                FieldSchema::string("The population-based-training policy file to replay."),
            ),
        ]
    }
}

/// Population-based bandits (PB2) scheduler settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Pb2Config {
    pub r#type: String,
    pub time_attr: String,
    pub metric: Option<String>,
    pub mode: Option<String>,
    pub perturbation_interval: f64,
    pub hyperparam_bounds: Option<Map<String, Value>>,
    pub quantile_fraction: f64,
    pub log_config: bool,
    pub require_attrs: bool,
    pub synch: bool,
}

impl Default for Pb2Config {
    fn default() -> Self {
        Self {
            r#type: "pb2".to_string(),
            time_attr: TIME_TOTAL_S.to_string(),
            metric: None,
            mode: None,
            perturbation_interval: 60.0,
            hyperparam_bounds: None,
            quantile_fraction: 0.25,
            log_config: true,
            require_attrs: true,
            synch: false,
        }
    }
}

impl Pb2Config {
    pub fn fields() -> FieldMap {
        vec![
            (
                "type",
                FieldSchema::string_options(&["pb2"], "pb2", "Scheduler discriminator."),
            ),
            ("time_attr", time_attr_field(TIME_TOTAL_S)),
            ("metric", metric_field()),
            ("mode", mode_field()),
            (
                "perturbation_interval",
                FieldSchema::non_negative_float(
                    60.0,
                    "Models are considered for perturbation at this interval of time_attr.",
                ),
            ),
            (
                "hyperparam_bounds",
                FieldSchema::dict(
                    "Hyperparameters to mutate: per key, a [min, max] pair bounding the value.",
                ),
            ),
            (
                "quantile_fraction",
                FieldSchema::float_range(
                    0.25,
                    0.0,
                    0.5,
                    "Parameters transfer from the top fraction of trials to the bottom fraction. Zero implies no exploitation at all.",
                ),
            ),
            (
                "log_config",
                FieldSchema::boolean(
                    true,
                    "Whether to log each model's config at each exploit, so the config schedule can be reconstructed.",
                ),
            ),
            (
                "require_attrs",
                FieldSchema::boolean(
                    true,
                    "Whether time_attr and metric must appear in the result of every iteration.",
                ),
            ),
            (
                "synch",
                FieldSchema::boolean(
                    false,
                    "If true, use the synchronous implementation: perturbations occur only after all trials sync at the same time_attr.",
                ),
            ),
        ]
    }
}

/// Hyperband-for-BOHB scheduler settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BohbConfig {
    pub r#type: String,
    pub time_attr: String,
    pub metric: Option<String>,
    pub mode: Option<String>,
    pub max_t: u64,
    pub reduction_factor: f64,
    pub stop_last_trials: bool,
}

impl Default for BohbConfig {
    fn default() -> Self {
        Self {
            r#type: "bohb".to_string(),
            time_attr: TRAINING_ITERATION.to_string(),
            metric: None,
            mode: None,
            max_t: 81,
            reduction_factor: 3.0,
            stop_last_trials: true,
        }
    }
}

impl BohbConfig {
    pub fn fields() -> FieldMap {
        vec![
            (
                "type",
                FieldSchema::string_options(&["bohb", "hb_bohb"], "bohb", "Scheduler discriminator."),
            ),
            ("time_attr", time_attr_field(TRAINING_ITERATION)),
            ("metric", metric_field()),
            ("mode", mode_field()),
            (
                "max_t",
                FieldSchema::positive_integer(
                    81,
                    "Max time units per trial; trials stop after max_t units of time_attr have passed.",
                ),
            ),
            (
                "reduction_factor",
                FieldSchema::non_negative_float(
                    3.0,
                    "Sets halving rate and amount. A unit-less scalar.",
                ),
            ),
            (
                "stop_last_trials",
                FieldSchema::boolean(true, "Whether to terminate the trials after reaching max_t."),
            ),
        ]
    }
}

/// First-in-first-out trial scheduler settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FifoConfig {
    pub r#type: String,
}

impl Default for FifoConfig {
    fn default() -> Self {
        Self {
            r#type: "fifo".to_string(),
        }
    }
}

impl FifoConfig {
    pub fn fields() -> FieldMap {
        vec![(
            "type",
            FieldSchema::string_options(&["fifo"], "fifo", "Scheduler discriminator."),
        )]
    }
}

/// Resource-changing scheduler settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResourceChangingConfig {
    pub r#type: String,
    pub base_scheduler: Option<CallableRef>,
    pub resources_allocation_function: Option<CallableRef>,
}

impl Default for ResourceChangingConfig {
    fn default() -> Self {
        Self {
            r#type: "resource_changing".to_string(),
            base_scheduler: None,
            resources_allocation_function: None,
        }
    }
}

impl ResourceChangingConfig {
    pub fn fields() -> FieldMap {
        vec![
            (
                "type",
                FieldSchema::string_options(
                    &["resource_changing"],
                    "resource_changing",
                    "Scheduler discriminator.",
                ),
            ),
            (
                "base_scheduler",
                FieldSchema::string(
                    "Name of the scheduler providing decisions about trials; FIFO when unset.",
                ),
            ),
            (
                "resources_allocation_function",
                FieldSchema::string(
                    "Name of the callable that changes live trial resource requirements during tuning; resolved by the plugin layer.",
                ),
            ),
        ]
    }
}

// ---------------------------------------------------------------------------
// Family wiring
// ---------------------------------------------------------------------------

/// A concrete trial scheduler configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SchedulerConfig {
    AsyncHyperband(AsyncHyperbandConfig),
    Hyperband(HyperbandConfig),
    MedianStoppingRule(MedianStoppingRuleConfig),
    Pbt(PbtConfig),
    PbtReplay(PbtReplayConfig),
    Pb2(Pb2Config),
    Bohb(BohbConfig),
    Fifo(FifoConfig),
    ResourceChanging(ResourceChangingConfig),
}

impl SchedulerConfig {
    /// The discriminator value this config was loaded with.
    pub fn scheduler_type(&self) -> &str {
        match self {
            SchedulerConfig::AsyncHyperband(c) => &c.r#type,
            SchedulerConfig::Hyperband(c) => &c.r#type,
            SchedulerConfig::MedianStoppingRule(c) => &c.r#type,
            SchedulerConfig::Pbt(c) => &c.r#type,
            SchedulerConfig::PbtReplay(c) => &c.r#type,
            SchedulerConfig::Pb2(c) => &c.r#type,
            SchedulerConfig::Bohb(c) => &c.r#type,
            SchedulerConfig::Fifo(c) => &c.r#type,
            SchedulerConfig::ResourceChanging(c) => &c.r#type,
        }
    }
}

type SchedulerSpec = VariantSpec<SchedulerConfig>;

/// Build the scheduler family registry.
pub fn scheduler_registry() -> Registry<SchedulerSpec> {
    use crate::schema::load_typed;

    let mut registry = Registry::new();
    registry.register_aliases(
        &["async_hyperband", "asynchyperband"],
        SchedulerSpec {
            canonical: "async_hyperband",
            fields: AsyncHyperbandConfig::fields,
            load: |map| {
                load_typed(
                    "AsyncHyperbandConfig",
                    AsyncHyperbandConfig::fields,
                    SchedulerConfig::AsyncHyperband,
                    map,
                )
            },
        },
    );
    registry.register(
        "hyperband",
        SchedulerSpec {
            canonical: "hyperband",
            fields: HyperbandConfig::fields,
            load: |map| {
                load_typed(
                    "HyperbandConfig",
                    HyperbandConfig::fields,
                    SchedulerConfig::Hyperband,
                    map,
                )
            },
        },
    );
    registry.register_aliases(
        &["median_stopping_rule", "medianstoppingrule"],
        SchedulerSpec {
            canonical: "median_stopping_rule",
            fields: MedianStoppingRuleConfig::fields,
            load: |map| {
                load_typed(
                    "MedianStoppingRuleConfig",
                    MedianStoppingRuleConfig::fields,
                    SchedulerConfig::MedianStoppingRule,
                    map,
                )
            },
        },
    );
    registry.register(
        "pbt",
        SchedulerSpec {
            canonical: "pbt",
            fields: PbtConfig::fields,
            load: |map| load_typed("PbtConfig", PbtConfig::fields, SchedulerConfig::Pbt, map),
        },
    );
    registry.register(
        "pbt_replay",
        SchedulerSpec {
            canonical: "pbt_replay",
            fields: PbtReplayConfig::fields,
            load: |map| {
                load_typed(
                    "PbtReplayConfig",
                    PbtReplayConfig::fields,
                    SchedulerConfig::PbtReplay,
                    map,
                )
            },
        },
    );
    registry.register(
        "pb2",
        SchedulerSpec {
            canonical: "pb2",
            fields: Pb2Config::fields,
            load: |map| load_typed("Pb2Config", Pb2Config::fields, SchedulerConfig::Pb2, map),
        },
    );
    registry.register_aliases(
        &["bohb", "hb_bohb"],
        SchedulerSpec {
            canonical: "bohb",
            fields: BohbConfig::fields,
            load: |map| load_typed("BohbConfig", BohbConfig::fields, SchedulerConfig::Bohb, map),
        },
    );
    registry.register(
        "fifo",
        SchedulerSpec {
            canonical: "fifo",
            fields: FifoConfig::fields,
            load: |map| load_typed("FifoConfig", FifoConfig::fields, SchedulerConfig::Fifo, map),
        },
    );
    registry.register(
        "resource_changing",
        SchedulerSpec {
            canonical: "resource_changing",
            fields: ResourceChangingConfig::fields,
            load: |map| {
                load_typed(
                    "ResourceChangingConfig",
                    ResourceChangingConfig::fields,
                    SchedulerConfig::ResourceChanging,
                    map,
                )
            },
        },
    );
    registry
}

/// Declare a scheduler slot with the given default mapping and description.
///
/// Fails fast when the default does not name a registered scheduler or
/// violates that variant's constraints.
pub fn scheduler_field(
    registry: &Registry<SchedulerSpec>,
    default: Value,
    description: &str,
) -> Result<VariantField<SchedulerConfig>, ConfigError> {
    VariantField::new("scheduler", "scheduler_options", registry, default, description)
}

/// Resolve a raw scheduler value against the family registry.
pub fn load_scheduler(
    registry: &Registry<SchedulerSpec>,
    value: Option<&Value>,
) -> Result<Option<SchedulerConfig>, ValidationError> {
    load_variant_config("scheduler", registry, value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_every_registered_name_loads_minimal_mapping() {
        let registry = scheduler_registry();
        for name in registry.keys().map(str::to_string).collect::<Vec<_>>() {
            let loaded = load_scheduler(&registry, Some(&json!({"type": name.as_str()})))
                .unwrap_or_else(|e| panic!("{name}: {e}"))
                .unwrap();
            assert_eq!(loaded.scheduler_type(), name);
        }
    }

    #[test]
    fn test_minimal_mapping_gets_variant_defaults() {
        let registry = scheduler_registry();
        let loaded = load_scheduler(&registry, Some(&json!({"type": "hyperband"})))
            .unwrap()
            .unwrap();
        match loaded {
            SchedulerConfig::Hyperband(config) => {
                assert_eq!(config.max_t, 81);
                assert_eq!(config.reduction_factor, 3.0);
                assert!(config.stop_last_trials);
                assert_eq!(config.time_attr, TRAINING_ITERATION);
                assert!(config.metric.is_none());
            }
            other => panic!("wrong variant: {other:?}"),
        }
    }

    #[test]
    fn test_alias_resolves_to_same_variant() {
        let registry = scheduler_registry();
        let loaded = load_scheduler(&registry, Some(&json!({"type": "asynchyperband"})))
            .unwrap()
            .unwrap();
        assert!(matches!(loaded, SchedulerConfig::AsyncHyperband(_)));
        assert_eq!(loaded.scheduler_type(), "asynchyperband");
    }

    #[test]
    fn test_absent_and_null_pass_through() {
        let registry = scheduler_registry();
        assert!(load_scheduler(&registry, None).unwrap().is_none());
        assert!(load_scheduler(&registry, Some(&Value::Null)).unwrap().is_none());
    }

    #[test]
    fn test_non_mapping_is_type_error() {
        let registry = scheduler_registry();
        let err = load_scheduler(&registry, Some(&json!("fifo"))).unwrap_err();
        assert!(matches!(err, ValidationError::NotAMapping { .. }), "{err}");
    }

    #[test]
    fn test_missing_or_unknown_discriminator_fails() {
        let registry = scheduler_registry();
        let err = load_scheduler(&registry, Some(&json!({"max_t": 10}))).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidDiscriminator { .. }), "{err}");

        let err = load_scheduler(&registry, Some(&json!({"type": "simulated_annealing"}))).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidDiscriminator { .. }), "{err}");
    }

    #[test]
    fn test_unknown_extra_field_is_aggregated_error() {
        let registry = scheduler_registry();
        let err = load_scheduler(&registry, Some(&json!({"type": "fifo", "max_t": 10}))).unwrap_err();
        match err {
            ValidationError::VariantParams { variant, detail } => {
                assert_eq!(variant, "FifoConfig");
                assert!(detail.contains("max_t"), "{detail}");
            }
            other => panic!("wrong error: {other}"),
        }
    }

    #[test]
    fn test_pbt_quantile_fraction_bounds() {
        let registry = scheduler_registry();
        for accepted in [0.0, 0.25, 0.5] {
            let value = json!({"type": "pbt", "quantile_fraction": accepted});
            assert!(load_scheduler(&registry, Some(&value)).is_ok(), "{accepted}");
        }
        let err = load_scheduler(&registry, Some(&json!({"type": "pbt", "quantile_fraction": 0.6})))
            .unwrap_err();
        match err {
            ValidationError::VariantParams { variant, detail } => {
                assert_eq!(variant, "PbtConfig");
                assert!(detail.contains("quantile_fraction"), "{detail}");
            }
            other => panic!("wrong error: {other}"),
        }
    }

    #[test]
    fn test_pbt_default_quantile_fraction() {
        let registry = scheduler_registry();
        let loaded = load_scheduler(&registry, Some(&json!({"type": "pbt"}))).unwrap().unwrap();
        match loaded {
            SchedulerConfig::Pbt(config) => {
                assert_eq!(config.quantile_fraction, 0.25);
                assert_eq!(config.perturbation_factors, (1.2, 0.8));
            }
            other => panic!("wrong variant: {other:?}"),
        }
    }

    #[test]
    fn test_out_of_range_max_t_fails() {
        let registry = scheduler_registry();
        let err = load_scheduler(
            &registry,
            Some(&json!({"type": "async_hyperband", "max_t": -1})),
        )
        .unwrap_err();
        assert!(matches!(err, ValidationError::VariantParams { .. }), "{err}");
    }

    #[test]
    fn test_hyperband_round_trip() {
        let registry = scheduler_registry();
        let raw = json!({
            "type": "hyperband",
            "max_t": 81,
            "reduction_factor": 3,
            "stop_last_trials": true,
        });
        let first = load_scheduler(&registry, Some(&raw)).unwrap().unwrap();
        let dumped = serde_json::to_value(&first).unwrap();
        let second = load_scheduler(&registry, Some(&dumped)).unwrap().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_round_trip_all_defaults() {
        let registry = scheduler_registry();
        for name in registry.keys().map(str::to_string).collect::<Vec<_>>() {
            let first = load_scheduler(&registry, Some(&json!({"type": name.as_str()})))
                .unwrap()
                .unwrap();
            let dumped = serde_json::to_value(&first).unwrap();
            let second = load_scheduler(&registry, Some(&dumped)).unwrap().unwrap();
            assert_eq!(first, second, "{name}");
        }
    }

    #[test]
    fn test_every_variant_default_satisfies_own_constraints() {
        let registry = scheduler_registry();
        for (name, spec) in registry.iter() {
            for (field, descriptor) in (spec.fields)() {
                assert!(descriptor.default_is_valid(), "{name}.{field}");
            }
        }
    }

    #[test]
    fn test_callable_reference_is_inline_name() {
        let registry = scheduler_registry();
        let value = json!({"type": "pbt", "custom_explore_fn": "my_plugin.explore"});
        let loaded = load_scheduler(&registry, Some(&value)).unwrap().unwrap();
        match loaded {
            SchedulerConfig::Pbt(config) => {
                assert_eq!(config.custom_explore_fn, Some(CallableRef("my_plugin.explore".to_string())));
            }
            other => panic!("wrong variant: {other:?}"),
        }
    }

    #[test]
    fn test_scheduler_field_fail_fast() {
        let registry = scheduler_registry();
        assert!(scheduler_field(&registry, json!({"type": "async_hyperband"}), "").is_ok());
        assert!(scheduler_field(&registry, json!("async_hyperband"), "").is_err());
        assert!(scheduler_field(&registry, json!({}), "").is_err());
        assert!(scheduler_field(&registry, json!({"type": "unknown"}), "").is_err());
        assert!(scheduler_field(&registry, json!({"type": "pbt", "quantile_fraction": 0.9}), "").is_err());
    }

    #[test]
    fn test_scheduler_field_resolves_default() {
        let registry = scheduler_registry();
        let field = scheduler_field(
            &registry,
            json!({"type": "async_hyperband"}),
            "Hyperopt scheduler settings.",
        )
        .unwrap();
        assert_eq!(field.default_type(), "async_hyperband");
        match field.default_config() {
            SchedulerConfig::AsyncHyperband(config) => assert_eq!(config.max_t, 100),
            other => panic!("wrong variant: {other:?}"),
        }
    }
}
