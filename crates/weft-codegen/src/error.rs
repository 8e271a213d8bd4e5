//! Code generation error types.
//!
//! Every error aborts the whole generation run; there is no per-entity
//! recovery.

use weft_core::CoreError;

/// Errors that can occur while resolving, mapping or emitting bindings.
#[derive(Debug, thiserror::Error)]
pub enum CodegenError {
    /// A namespace has no configured prefix.
    #[error("namespace '{namespace}' has no registered prefix")]
    UnregisteredNamespace { namespace: String },

    /// A symbol's local name is empty.
    #[error("empty local name in namespace '{namespace}'")]
    EmptyIdentifier { namespace: String },

    /// No conversion rule covers a native/high-level representation pair.
    #[error("no conversion between native '{native}' and high-level '{high}'")]
    UnknownConversion { native: String, high: String },

    /// A type reference resolved to something that cannot be marshalled.
    #[error("unclassified entity '{name}' ({kind})")]
    UnclassifiedEntity { name: String, kind: String },

    /// A constant's type or literal cannot be emitted.
    #[error("invalid constant '{name}': {detail}")]
    InvalidConstant { name: String, detail: String },

    /// Data model error.
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Result type alias for code generation.
pub type Result<T> = std::result::Result<T, CodegenError>;
