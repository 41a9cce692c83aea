//! Dataset splitter collaborator seam.
//!
//! Split settings need cross-field reasoning the structural schema cannot
//! express (a fixed split references a column the features must declare),
//! so the orchestrator hands the upgraded config to a splitter built from
//! the `preprocessing.split` options. Splitter errors propagate with their
//! own semantics.

use serde_json::{Map, Value};

use crate::error::BoxError;

/// Validates split settings against the whole config.
pub trait Splitter: Send + Sync + std::fmt::Debug {
    fn validate(&self, config: &Value) -> Result<(), BoxError>;
}

/// Builds a splitter from the `preprocessing.split` options mapping.
pub trait SplitterFactory: Send + Sync {
    fn splitter(&self, options: &Map<String, Value>) -> Result<Box<dyn Splitter>, BoxError>;
}

/// Split configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum SplitError {
    #[error("unknown split type: {0}")]
    UnknownType(String),

    #[error("invalid split probabilities: sum is {sum} (expected 1.0)")]
    InvalidProbabilities { sum: f64 },

    #[error("split probabilities must be a sequence of 3 numbers")]
    MalformedProbabilities,

    #[error("fixed split requires a `column` option")]
    MissingColumn,

    #[error("fixed split column `{0}` is not declared by any input or output feature")]
    UndeclaredColumn(String),
}

/// Random split by train/validation/test probabilities.
#[derive(Debug, Clone)]
pub struct RandomSplitter {
    probabilities: [f64; 3],
}

impl RandomSplitter {
    pub fn new(probabilities: [f64; 3]) -> Self {
        Self { probabilities }
    }
}

impl Default for RandomSplitter {
    fn default() -> Self {
        Self {
            probabilities: [0.7, 0.1, 0.2],
        }
    }
}

impl Splitter for RandomSplitter {
    fn validate(&self, _config: &Value) -> Result<(), BoxError> {
        let sum: f64 = self.probabilities.iter().sum();
        // Tolerance absorbs floating-point drift in user-authored ratios.
        if (sum - 1.0).abs() > 1e-3 {
            return Err(Box::new(SplitError::InvalidProbabilities { sum }));
        }
        Ok(())
    }
}

/// Split along an explicit indicator column.
#[derive(Debug, Clone)]
pub struct FixedSplitter {
    column: String,
}

impl FixedSplitter {
    pub fn new(column: &str) -> Self {
        Self {
            column: column.to_string(),
        }
    }
}

impl Splitter for FixedSplitter {
    fn validate(&self, config: &Value) -> Result<(), BoxError> {
        let declared = feature_names(config);
        if !declared.iter().any(|name| *name == self.column) {
            return Err(Box::new(SplitError::UndeclaredColumn(self.column.clone())));
        }
        Ok(())
    }
}

/// Names declared by input and output features.
fn feature_names(config: &Value) -> Vec<&str> {
    ["input_features", "output_features"]
        .iter()
        .filter_map(|section| config.get(section).and_then(Value::as_array))
        .flatten()
        .filter_map(|feature| feature.get("name").and_then(Value::as_str))
        .collect()
}

/// Built-in splitter factory dispatching on the split `type`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultSplitters;

impl SplitterFactory for DefaultSplitters {
    fn splitter(&self, options: &Map<String, Value>) -> Result<Box<dyn Splitter>, BoxError> {
        match options.get("type").and_then(Value::as_str).unwrap_or("random") {
            "random" => {
                let splitter = match options.get("probabilities") {
                    Some(value) => RandomSplitter::new(parse_probabilities(value)?),
                    None => RandomSplitter::default(),
                };
                Ok(Box::new(splitter))
            }
            "fixed" => {
                let column = options
                    .get("column")
                    .and_then(Value::as_str)
                    .ok_or_else(|| Box::new(SplitError::MissingColumn) as BoxError)?;
                Ok(Box::new(FixedSplitter::new(column)))
            }
            other => Err(Box::new(SplitError::UnknownType(other.to_string()))),
        }
    }
}

fn parse_probabilities(value: &Value) -> Result<[f64; 3], BoxError> {
    let items = value
        .as_array()
        .filter(|items| items.len() == 3)
        .ok_or_else(|| Box::new(SplitError::MalformedProbabilities) as BoxError)?;
    let mut probabilities = [0.0; 3];
    for (slot, item) in probabilities.iter_mut().zip(items) {
        *slot = item
            .as_f64()
            .ok_or_else(|| Box::new(SplitError::MalformedProbabilities) as BoxError)?;
    }
    Ok(probabilities)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn options(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn test_empty_options_build_random_splitter() {
        let splitter = DefaultSplitters.splitter(&Map::new()).unwrap();
        assert!(splitter.validate(&json!({})).is_ok());
    }

    #[test]
    fn test_random_probabilities_must_sum_to_one() {
        let splitter = DefaultSplitters
            .splitter(&options(json!({"type": "random", "probabilities": [0.5, 0.2, 0.2]})))
            .unwrap();
        let err = splitter.validate(&json!({})).unwrap_err();
        assert!(err.to_string().contains("sum is 0.9"), "{err}");

        let splitter = DefaultSplitters
            .splitter(&options(json!({"type": "random", "probabilities": [0.8, 0.1, 0.1]})))
            .unwrap();
        assert!(splitter.validate(&json!({})).is_ok());
    }

    #[test]
    fn test_fixed_split_requires_declared_column() {
        let splitter = DefaultSplitters
            .splitter(&options(json!({"type": "fixed", "column": "fold"})))
            .unwrap();
        let config = json!({
            "input_features": [{"name": "text", "type": "text"}],
            "output_features": [{"name": "label", "type": "category"}],
        });
        let err = splitter.validate(&config).unwrap_err();
        assert!(err.to_string().contains("fold"), "{err}");

        let config = json!({
            "input_features": [{"name": "text", "type": "text"}, {"name": "fold", "type": "category"}],
            "output_features": [{"name": "label", "type": "category"}],
        });
        assert!(splitter.validate(&config).is_ok());
    }

    #[test]
    fn test_fixed_split_without_column_fails_at_build() {
        let err = DefaultSplitters
            .splitter(&options(json!({"type": "fixed"})))
            .unwrap_err();
        assert!(err.to_string().contains("column"), "{err}");
    }

    #[test]
    fn test_unknown_split_type() {
        let err = DefaultSplitters
            .splitter(&options(json!({"type": "stratify"})))
            .unwrap_err();
        assert!(err.to_string().contains("stratify"), "{err}");
    }
}
