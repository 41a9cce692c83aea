//! Structural validation of assembled configurations.
//!
//! A single statically defined validator walks the assembled schema; its
//! type-checking dialect is a pluggable strategy rather than a generated
//! class, so no validator cache exists. The assembled top-level schema is
//! cached per model type in a bounded LRU cache, and all structural
//! validation is serialized behind one process-wide lock.

mod assemble;
mod cache;
mod types;
mod validate;
mod validator;

pub use assemble::{
    build_schema, SchemaContext, FEATURE_TYPES, MODEL_ECD, MODEL_GBM, MODEL_TYPES,
};
pub use cache::BoundedCache;
pub use types::{StandardTypes, TupleTolerantTypes, TypeCheck};
pub use validate::{validate_config, validate_upgraded_config};
pub use validator::{SchemaValidator, SchemaViolation};
