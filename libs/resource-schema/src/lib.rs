//! Schema description models for provider resources
//!
//! Describes which attributes and nested blocks a resource declares, their
//! value types, and whether they are required, computed or replace-only.

pub mod models;

pub use models::{Attribute, Block, ProviderSchema, ResourceSchema, Timeouts, ValueType};
