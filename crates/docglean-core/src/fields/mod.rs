//! Field rule registry and label-guided resolution.

pub mod normalize;
pub mod registry;
pub mod resolver;

pub use normalize::normalize;
pub use registry::{invoice_rules, pii_rules, FieldDefinition, FieldRegistry, FieldRule, ValueType};
pub use resolver::{FieldResolver, LabelResolver};

use crate::error::RegistryError;

/// Result type for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;
