//! The read-only context threaded through every resolution call.

use weft_core::{Config, EntityKind, EntityRegistry, QualifiedName};

use crate::error::{CodegenError, Result};

/// Configuration and entity registry for one generation run.
///
/// Both are borrowed immutably; resolution and mapping are pure functions
/// of their input and this context.
#[derive(Debug, Clone, Copy)]
pub struct Context<'a> {
    pub config: &'a Config,
    pub registry: &'a EntityRegistry,
}

impl<'a> Context<'a> {
    pub fn new(config: &'a Config, registry: &'a EntityRegistry) -> Self {
        Self { config, registry }
    }

    /// Classify a referenced name. Unknown names are an error.
    pub fn classify(&self, name: &QualifiedName) -> Result<EntityKind> {
        self.registry
            .classify(name)
            .ok_or_else(|| CodegenError::UnclassifiedEntity {
                name: name.to_string(),
                kind: "unregistered".to_string(),
            })
    }
}
