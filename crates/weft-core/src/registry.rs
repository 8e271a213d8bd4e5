//! The registry of classified API entities for one generation run.

use std::collections::HashMap;

use crate::entity::{ApiEntity, EntityKind};
use crate::error::{CoreError, Result};
use crate::name::QualifiedName;

/// Insertion-ordered map from qualified name to entity.
///
/// The type mapper asks the registry what a referenced name *is*
/// (enumeration, flag set, structure, ...), always by `QualifiedName`.
#[derive(Debug, Clone, Default)]
pub struct EntityRegistry {
    entries: Vec<(QualifiedName, ApiEntity)>,
    index: HashMap<QualifiedName, usize>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from `(name, entity)` pairs, rejecting duplicates.
    pub fn from_entries(entries: impl IntoIterator<Item = (QualifiedName, ApiEntity)>) -> Result<Self> {
        let mut registry = Self::new();
        for (name, entity) in entries {
            registry.insert(name, entity)?;
        }
        Ok(registry)
    }

    /// Register an entity. A name may only be registered once.
    pub fn insert(&mut self, name: QualifiedName, entity: ApiEntity) -> Result<()> {
        if self.index.contains_key(&name) {
            return Err(CoreError::DuplicateEntity {
                name: name.to_string(),
            });
        }
        self.index.insert(name.clone(), self.entries.len());
        self.entries.push((name, entity));
        Ok(())
    }

    pub fn get(&self, name: &QualifiedName) -> Option<&ApiEntity> {
        self.index.get(name).map(|&i| &self.entries[i].1)
    }

    /// The classification of a registered name.
    pub fn classify(&self, name: &QualifiedName) -> Option<EntityKind> {
        self.get(name).map(ApiEntity::kind)
    }

    pub fn contains(&self, name: &QualifiedName) -> bool {
        self.index.contains_key(name)
    }

    /// Entities in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&QualifiedName, &ApiEntity)> {
        self.entries.iter().map(|(n, e)| (n, e))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every namespace an entity is declared in or refers to, sorted and deduplicated.
    pub fn namespaces(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for (name, entity) in &self.entries {
            out.push(name.namespace.as_str());
            for ty in entity.native_types() {
                out.extend(ty.interfaces().into_iter().map(|q| q.namespace.as_str()));
            }
        }
        out.sort_unstable();
        out.dedup();
        out
    }
}
