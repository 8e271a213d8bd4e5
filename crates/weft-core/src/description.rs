//! API description file (`.api.toml`) parsing.
//!
//! A description lists already-classified entities of one library. Native
//! types inside it use the syntax accepted by [`NativeType::parse`].
//!
//! [`NativeType::parse`]: crate::native_type::NativeType::parse

use serde::{Deserialize, Serialize};

use crate::entity::ApiEntity;
use crate::error::{CoreError, Result};
use crate::name::QualifiedName;
use crate::registry::EntityRegistry;

/// A complete API description parsed from an `.api.toml` file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiDescription {
    /// Metadata about the described library.
    pub library: LibraryInfo,
    /// The entities, in declaration order.
    #[serde(default)]
    pub entities: Vec<EntityDecl>,
}

/// Metadata about the described library.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryInfo {
    /// Library name (e.g., "gtk").
    pub name: String,
    /// Namespace applied to entities that do not name one.
    pub namespace: String,
    /// Library version string, informational only.
    #[serde(default)]
    pub version: Option<String>,
}

/// One entity declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityDecl {
    /// Defaults to the library namespace.
    #[serde(default)]
    pub namespace: Option<String>,
    /// Local symbol name.
    pub name: String,
    /// Whether this entity is left out of generation.
    #[serde(default)]
    pub excluded: bool,
    #[serde(flatten)]
    pub entity: ApiEntity,
}

impl ApiDescription {
    /// Parse a description from a TOML string.
    pub fn parse(input: &str) -> Result<Self> {
        let desc: ApiDescription = toml::from_str(input).map_err(CoreError::Toml)?;

        if desc.library.namespace.is_empty() {
            return Err(CoreError::InvalidDescription {
                detail: "library.namespace is required".to_string(),
            });
        }

        Ok(desc)
    }

    /// Parse a description from a file path.
    pub fn load(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// The qualified name of a declaration.
    pub fn qualified_name(&self, decl: &EntityDecl) -> QualifiedName {
        let namespace = decl.namespace.as_deref().unwrap_or(&self.library.namespace);
        QualifiedName::new(namespace, decl.name.as_str())
    }

    /// Return only the non-excluded declarations.
    pub fn active_entities(&self) -> Vec<&EntityDecl> {
        self.entities.iter().filter(|e| !e.excluded).collect()
    }

    /// Build the entity registry from the active declarations.
    pub fn to_registry(&self) -> Result<EntityRegistry> {
        EntityRegistry::from_entries(
            self.active_entities()
                .into_iter()
                .map(|decl| (self.qualified_name(decl), decl.entity.clone())),
        )
    }
}
