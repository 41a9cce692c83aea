//! End-to-end configuration validation tests.
//!
//! Configs are authored in YAML, the way users write them, and pushed
//! through the full Raw → Upgraded → Validated pipeline.

use afinar::hyperopt::scheduler::{load_scheduler, scheduler_registry, SchedulerConfig};
use afinar::schema::ExtraFields;
use afinar::validation::{validate_config, SchemaContext, MODEL_ECD, MODEL_GBM};
use serde_json::{json, Value};

fn from_yaml(yaml: &str) -> Value {
    serde_yaml::from_str(yaml).expect("test yaml must parse")
}

#[test]
fn test_yaml_config_end_to_end() {
    let ctx = SchemaContext::with_defaults().unwrap();
    let config = from_yaml(
        r"
model_type: ecd
input_features:
  - name: review
    type: text
output_features:
  - name: sentiment
    type: category
trainer:
  learning_rate: 0.001
  epochs: 10
hyperopt:
  goal: minimize
  scheduler:
    type: async_hyperband
    max_t: 50
  search_alg:
    type: variant_generator
",
    );
    validate_config(&ctx, &config).unwrap();
}

#[test]
fn test_yaml_config_bad_scheduler_field_fails() {
    let ctx = SchemaContext::with_defaults().unwrap();
    let config = from_yaml(
        r"
input_features:
  - name: review
    type: text
output_features:
  - name: sentiment
    type: category
hyperopt:
  scheduler:
    type: async_hyperband
    max_t: -1
",
    );
    let err = validate_config(&ctx, &config).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("max_t"), "{message}");
    assert!(message.contains("/hyperopt/scheduler/max_t"), "{message}");
}

#[test]
fn test_combiner_accepted_for_ecd_rejected_for_gbm() {
    let ctx = SchemaContext::with_defaults().unwrap();
    let mut config = json!({
        "model_type": MODEL_ECD,
        "input_features": [{"name": "x", "type": "number"}],
        "output_features": [{"name": "y", "type": "number"}],
        "combiner": {"type": "concat"},
    });
    validate_config(&ctx, &config).unwrap();

    config["model_type"] = json!(MODEL_GBM);
    let err = validate_config(&ctx, &config).unwrap_err();
    assert!(err.to_string().contains("combiner"), "{err}");
}

#[test]
fn test_tuple_and_list_perturbation_factors_both_validate() {
    let ctx = SchemaContext::with_defaults().unwrap();
    let base = json!({
        "input_features": [{"name": "x", "type": "number"}],
        "output_features": [{"name": "y", "type": "number"}],
    });

    // Authored as a YAML sequence.
    let mut from_list = base.clone();
    from_list["hyperopt"] = json!({
        "scheduler": {"type": "pbt", "perturbation_factors": [1.2, 0.8]},
    });
    validate_config(&ctx, &from_list).unwrap();

    // Serialized from the typed config, whose field is a fixed Rust pair.
    let registry = scheduler_registry();
    let loaded = load_scheduler(&registry, Some(&json!({"type": "pbt"})))
        .unwrap()
        .unwrap();
    if let SchedulerConfig::Pbt(pbt) = &loaded {
        assert_eq!(pbt.perturbation_factors, (1.2, 0.8));
    } else {
        panic!("wrong variant");
    }
    let mut from_tuple = base;
    from_tuple["hyperopt"] = json!({"scheduler": serde_json::to_value(&loaded).unwrap()});
    validate_config(&ctx, &from_tuple).unwrap();
}

#[test]
fn test_extra_scheduler_field_policy_both_ways() {
    let config = json!({
        "input_features": [{"name": "x", "type": "number"}],
        "output_features": [{"name": "y", "type": "number"}],
        "hyperopt": {"scheduler": {"type": "fifo", "max_t": 10}},
    });

    // The documented default rejects properties the variant never declared.
    let deny = SchemaContext::with_defaults().unwrap();
    let err = validate_config(&deny, &config).unwrap_err();
    assert!(err.to_string().contains("max_t"), "{err}");

    // The permissive policy lets them through.
    let allow = SchemaContext::with_defaults()
        .unwrap()
        .extra_fields(ExtraFields::Allow);
    validate_config(&allow, &config).unwrap();

    // A declared field is accepted either way.
    let declared = json!({
        "input_features": [{"name": "x", "type": "number"}],
        "output_features": [{"name": "y", "type": "number"}],
        "hyperopt": {"scheduler": {"type": "fifo"}},
    });
    validate_config(&deny, &declared).unwrap();
}

#[test]
fn test_scheduler_default_round_trip_is_idempotent() {
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
    assert_eq!(dumped, serde_json::to_value(&second).unwrap());
}

#[test]
fn test_schema_cache_keeps_last_two_model_types() {
    let ctx = SchemaContext::with_defaults().unwrap();
    let first = ctx.schema(MODEL_ECD);
    let again = ctx.schema(MODEL_ECD);
    assert_eq!(*first, *again);

    ctx.schema(MODEL_GBM);
    ctx.schema("llm");
    let cached = ctx.cached_model_types();
    assert_eq!(cached.len(), 2);
    assert!(cached.contains(&MODEL_GBM.to_string()));
    assert!(cached.contains(&"llm".to_string()));
}

#[test]
fn test_concurrent_validation_is_safe() {
    let ctx = SchemaContext::with_defaults().unwrap();
    let good = json!({
        "input_features": [{"name": "x", "type": "number"}],
        "output_features": [{"name": "y", "type": "number"}],
        "hyperopt": {"scheduler": {"type": "hyperband"}},
    });
    let bad = json!({
        "input_features": [{"name": "x", "type": "number"}],
        "output_features": [{"name": "y", "type": "number"}],
        "hyperopt": {"scheduler": {"type": "hyperband", "max_t": 0}},
    });

    std::thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                for _ in 0..25 {
                    assert!(validate_config(&ctx, &good).is_ok());
                    assert!(validate_config(&ctx, &bad).is_err());
                }
            });
        }
    });
}

#[test]
fn test_version_is_stamped_by_default_upgrader() {
    let ctx = SchemaContext::with_defaults().unwrap();
    // A config carrying an explicit version string also validates.
    let config = json!({
        "afinar_version": "0.4.1",
        "input_features": [{"name": "x", "type": "number"}],
        "output_features": [{"name": "y", "type": "number"}],
    });
    validate_config(&ctx, &config).unwrap();
}
