//! Core data model for the weft binding generator.
//!
//! Describes a native library's API surface independently of any target
//! language, and carries the naming configuration for one generation run.
//!
//! ## Modules
//!
//! - [`name`] — Namespaced symbol names
//! - [`native_type`] — Native type descriptions and their text syntax
//! - [`entity`] — Classified API entities and callable signatures
//! - [`registry`] — Name-keyed entity registry
//! - [`config`] — Prefix and override tables (`weft.toml`)
//! - [`description`] — `.api.toml` description file parsing

pub mod config;
pub mod description;
pub mod entity;
pub mod error;
pub mod name;
pub mod native_type;
pub mod registry;

// Re-export key types for convenience
pub use config::Config;
pub use description::ApiDescription;
pub use entity::{ApiEntity, Argument, Callable, Direction, EntityKind};
pub use error::CoreError;
pub use name::QualifiedName;
pub use native_type::{BasicType, NativeType};
pub use registry::EntityRegistry;
