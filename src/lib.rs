//! Declarative configuration validation for training pipelines.
//!
//! A training configuration arrives as a nested mapping (deserialized from
//! YAML, JSON, or built in memory), possibly written against an older schema
//! version. This crate normalizes it to the latest schema version, checks
//! split settings that need cross-field reasoning, and validates the result
//! against a versioned structural schema assembled from per-section builders.
//!
//! Polymorphic config families (hyperparameter-search schedulers, search
//! algorithms) are resolved through per-family registries: a `type`
//! discriminator field selects the variant, and each variant contributes its
//! own field constraints to a single discriminated-union schema.
//!
//! # Example
//!
//! ```
//! use afinar::validation::{validate_config, SchemaContext};
//! use serde_json::json;
//!
//! let ctx = SchemaContext::with_defaults().unwrap();
//! let config = json!({
//!     "input_features": [{"name": "review", "type": "text"}],
//!     "output_features": [{"name": "sentiment", "type": "category"}],
//!     "hyperopt": {"scheduler": {"type": "async_hyperband", "max_t": 50}},
//! });
//! validate_config(&ctx, &config).unwrap();
//! ```

pub mod compat;
pub mod error;
pub mod hyperopt;
pub mod registry;
pub mod schema;
pub mod split;
pub mod validation;

pub use error::{BoxError, ConfigError, ValidationError};
pub use registry::{Registry, RegistryError};
pub use validation::{validate_config, SchemaContext};
