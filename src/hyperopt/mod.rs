//! Hyperparameter-search configuration families.
//!
//! Two polymorphic families live here: trial schedulers and search
//! algorithms. Each family owns a registry of named variants and exposes a
//! field builder used by the top-level schema assembly.

pub mod scheduler;
pub mod search_algorithm;

pub use scheduler::{
    load_scheduler, scheduler_field, scheduler_registry, CallableRef, SchedulerConfig,
};
pub use search_algorithm::{
    load_search_algorithm, search_algorithm_field, search_algorithm_registry,
    SearchAlgorithmConfig, SEARCH_ALGORITHM_NAMES,
};
