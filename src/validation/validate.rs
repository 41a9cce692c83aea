//! Validation orchestrator: Raw → Upgraded → Validated.
//!
//! The raw config is first normalized to the latest schema version, then
//! split settings are checked by the splitter collaborator, and finally the
//! upgraded config is validated against the assembled schema under the
//! process-wide validation lock.

use std::sync::{Mutex, PoisonError};

use serde_json::{Map, Value};

use super::assemble::{SchemaContext, MODEL_ECD, MODEL_TYPE, PREPROCESSING, SPLIT};
use super::types::TupleTolerantTypes;
use super::validator::SchemaValidator;
use crate::error::ValidationError;

/// Serializes every structural validation in the process, regardless of
/// model type, so a concurrent cache rebuild is never observed
/// mid-construction.
static VALIDATION_LOCK: Mutex<()> = Mutex::new(());

/// Validate a raw configuration.
///
/// Success is the absence of an error; there is no partial result. Upgrader
/// and splitter failures propagate with their own messages.
pub fn validate_config(ctx: &SchemaContext, config: &Value) -> Result<(), ValidationError> {
    let upgraded = ctx
        .upgrader()
        .upgrade(config)
        .map_err(ValidationError::Upgrade)?;
    validate_upgraded_config(ctx, &upgraded)
}

/// Validate a configuration already in the latest schema version's shape.
pub fn validate_upgraded_config(
    ctx: &SchemaContext,
    upgraded: &Value,
) -> Result<(), ValidationError> {
    let model_type = upgraded
        .get(MODEL_TYPE)
        .and_then(Value::as_str)
        .unwrap_or(MODEL_ECD);

    // Split semantics need cross-field reasoning the structural schema
    // cannot express, so the splitter runs its own check first.
    let empty = Map::new();
    let split_options = upgraded
        .get(PREPROCESSING)
        .and_then(|preprocessing| preprocessing.get(SPLIT))
        .and_then(Value::as_object)
        .unwrap_or(&empty);
    let splitter = ctx
        .splitters()
        .splitter(split_options)
        .map_err(ValidationError::Split)?;
    splitter.validate(upgraded).map_err(ValidationError::Split)?;

    let _guard = VALIDATION_LOCK
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    let schema = ctx.schema(model_type);
    SchemaValidator::new(&TupleTolerantTypes).validate(upgraded, &schema)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compat::VersionUpgrader;
    use crate::error::BoxError;
    use crate::split::{Splitter, SplitterFactory};
    use serde_json::json;

    fn minimal_config() -> Value {
        json!({
            "input_features": [{"name": "review", "type": "text"}],
            "output_features": [{"name": "sentiment", "type": "category"}],
        })
    }

    #[test]
    fn test_minimal_config_validates() {
        let ctx = SchemaContext::with_defaults().unwrap();
        validate_config(&ctx, &minimal_config()).unwrap();
    }

    #[test]
    fn test_scheduler_config_validates_end_to_end() {
        let ctx = SchemaContext::with_defaults().unwrap();
        let mut config = minimal_config();
        config["model_type"] = json!("ecd");
        config["hyperopt"] = json!({"scheduler": {"type": "async_hyperband", "max_t": 50}});
        validate_config(&ctx, &config).unwrap();
    }

    #[test]
    fn test_negative_max_t_reports_field() {
        let ctx = SchemaContext::with_defaults().unwrap();
        let mut config = minimal_config();
        config["hyperopt"] = json!({"scheduler": {"type": "async_hyperband", "max_t": -1}});
        let err = validate_config(&ctx, &config).unwrap_err();
        assert!(err.to_string().contains("max_t"), "{err}");
    }

    #[test]
    fn test_unknown_top_level_key_rejected() {
        let ctx = SchemaContext::with_defaults().unwrap();
        let mut config = minimal_config();
        config["trainerr"] = json!({});
        let err = validate_config(&ctx, &config).unwrap_err();
        assert!(err.to_string().contains("trainerr"), "{err}");
    }

    #[test]
    fn test_missing_required_features_rejected() {
        let ctx = SchemaContext::with_defaults().unwrap();
        let err = validate_config(&ctx, &json!({"output_features": [{"name": "y", "type": "number"}]}))
            .unwrap_err();
        assert!(err.to_string().contains("input_features"), "{err}");
    }

    struct FailingUpgrader;

    impl VersionUpgrader for FailingUpgrader {
        fn upgrade(&self, _config: &Value) -> Result<Value, BoxError> {
            Err("config version 0.0 is no longer supported".into())
        }
    }

    #[test]
    fn test_upgrader_error_propagates_as_is() {
        let ctx = SchemaContext::new(
            Box::new(FailingUpgrader),
            Box::new(crate::split::DefaultSplitters),
        )
        .unwrap();
        let err = validate_config(&ctx, &minimal_config()).unwrap_err();
        assert_eq!(err.to_string(), "config version 0.0 is no longer supported");
    }

    struct RefusingSplitters;
    #[derive(Debug)]
    struct RefusingSplitter;

    impl Splitter for RefusingSplitter {
        fn validate(&self, _config: &Value) -> Result<(), BoxError> {
            Err("split column is not categorical".into())
        }
    }

    impl SplitterFactory for RefusingSplitters {
        fn splitter(&self, _options: &Map<String, Value>) -> Result<Box<dyn Splitter>, BoxError> {
            Ok(Box::new(RefusingSplitter))
        }
    }

    #[test]
    fn test_splitter_error_propagates_as_is() {
        let ctx = SchemaContext::new(
            Box::new(crate::compat::LatestVersionUpgrader),
            Box::new(RefusingSplitters),
        )
        .unwrap();
        let err = validate_config(&ctx, &minimal_config()).unwrap_err();
        assert_eq!(err.to_string(), "split column is not categorical");
    }

    #[test]
    fn test_fixed_split_cross_field_check_runs_on_upgraded_config() {
        let ctx = SchemaContext::with_defaults().unwrap();
        let mut config = minimal_config();
        config["preprocessing"] = json!({"split": {"type": "fixed", "column": "fold"}});
        let err = validate_config(&ctx, &config).unwrap_err();
        assert!(err.to_string().contains("fold"), "{err}");

        config["input_features"] = json!([
            {"name": "review", "type": "text"},
            {"name": "fold", "type": "category"},
        ]);
        validate_config(&ctx, &config).unwrap();
    }
}
