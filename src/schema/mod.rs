//! Schema description primitives.
//!
//! Field constraint descriptors, the conditional composer that turns a
//! variant family into a discriminated-union schema, and the polymorphic
//! config loader that resolves a `type`-keyed mapping into a typed variant.

mod cond;
mod field;
mod variant;

pub use cond::{create_cond, discriminated_union, variant_conditionals, ExtraFields};
pub use field::{FieldMap, FieldSchema};
pub(crate) use variant::load_typed;
pub use variant::{load_variant_config, VariantField, VariantSpec};
