//! Error types shared across the configuration pipeline.
//!
//! Three moments can fail: defining a polymorphic field (`ConfigError`,
//! raised once at construction), resolving or validating user input
//! (`ValidationError`), and looking up an unregistered name
//! ([`crate::registry::RegistryError`]).

use serde_json::Value;

use crate::validation::SchemaViolation;

/// Boxed collaborator error (version upgrader, splitter).
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Definition-time error for polymorphic field builders.
///
/// Raised when a field is declared with a malformed default, so a bad
/// declaration fails at construction rather than on first use.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid default for {field}: {reason}")]
    InvalidDefault { field: &'static str, reason: String },
}

/// Runtime error raised while resolving or validating a configuration.
///
/// Collaborator failures (`Upgrade`, `Split`) keep their original message;
/// this subsystem adds no wrapping text of its own.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    /// A polymorphic field was given something other than a mapping or null.
    #[error("{family} field should be a mapping or null, got {found}")]
    NotAMapping {
        family: &'static str,
        found: &'static str,
    },

    /// The mapping had no `type` key, or named an unregistered variant.
    #[error("invalid params for {family}: {value}; expected a mapping with at least a valid `type` attribute")]
    InvalidDiscriminator { family: &'static str, value: Value },

    /// The variant was recognized but its parameters failed a constraint.
    /// All field-level causes are aggregated into `detail`.
    #[error("invalid params for {variant}: {detail}")]
    VariantParams {
        variant: &'static str,
        detail: String,
    },

    /// Structural schema mismatch, carrying the path to the offending field.
    #[error(transparent)]
    Schema(#[from] SchemaViolation),

    /// Version upgrader failure, propagated with its own message.
    #[error("{0}")]
    Upgrade(BoxError),

    /// Splitter failure, propagated with its own message.
    #[error("{0}")]
    Split(BoxError),
}

/// Printable name for a JSON value's type, used in error messages.
pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}
