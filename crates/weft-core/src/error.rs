//! Data model error types.

/// Errors raised while building or loading the API data model.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A native type expression could not be parsed.
    #[error("invalid native type '{input}': {detail}")]
    InvalidNativeType { input: String, detail: String },

    /// A qualified name is not of the form `Namespace.name`.
    #[error("invalid qualified name '{input}': {detail}")]
    InvalidQualifiedName { input: String, detail: String },

    /// Two entities were registered under the same qualified name.
    #[error("duplicate entity '{name}'")]
    DuplicateEntity { name: String },

    /// A namespace used by an entity has no configured prefix.
    #[error("namespace '{namespace}' has no registered prefix")]
    UnregisteredNamespace { namespace: String },

    /// An API description file is structurally invalid.
    #[error("invalid API description: {detail}")]
    InvalidDescription { detail: String },

    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for data model operations.
pub type Result<T> = std::result::Result<T, CoreError>;
