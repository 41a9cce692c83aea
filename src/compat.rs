//! Version-upgrade collaborator seam.
//!
//! Configurations may be written against older schema versions. The
//! upgrader normalizes a raw config to the latest version's shape before
//! any validation runs; its internals live outside this subsystem and its
//! errors propagate unmodified.

use serde_json::Value;

use crate::error::BoxError;

/// Top-level key carrying the config schema version.
pub const VERSION_KEY: &str = "afinar_version";

/// Transforms an arbitrary-version raw config into the latest shape.
pub trait VersionUpgrader: Send + Sync {
    fn upgrade(&self, config: &Value) -> Result<Value, BoxError>;
}

/// Default upgrader for configs already in the latest shape: passes the
/// config through and stamps the schema version when absent.
#[derive(Debug, Clone, Copy, Default)]
pub struct LatestVersionUpgrader;

impl VersionUpgrader for LatestVersionUpgrader {
    fn upgrade(&self, config: &Value) -> Result<Value, BoxError> {
        let mut upgraded = config.clone();
        if let Value::Object(map) = &mut upgraded {
            map.entry(VERSION_KEY)
                .or_insert_with(|| Value::String(env!("CARGO_PKG_VERSION").to_string()));
        }
        Ok(upgraded)
    }
}
