//! Generator configuration (`weft.toml`).
//!
//! ```toml
//! [prefixes]
//! Gtk = "gtk"
//! GLib = "g"
//!
//! [overrides]
//! main = "gtkMainLoop"
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::registry::EntityRegistry;

/// Read-only naming tables for one generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Namespace → identifier prefix.
    #[serde(default)]
    pub prefixes: BTreeMap<String, String>,
    /// Local symbol name → verbatim replacement identifier.
    #[serde(default)]
    pub overrides: BTreeMap<String, String>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from a TOML string.
    pub fn parse(input: &str) -> Result<Self> {
        let config: Config = toml::from_str(input).map_err(CoreError::Toml)?;
        Ok(config)
    }

    /// Parse a configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn with_prefix(mut self, namespace: &str, prefix: &str) -> Self {
        self.prefixes.insert(namespace.to_string(), prefix.to_string());
        self
    }

    pub fn with_override(mut self, symbol: &str, replacement: &str) -> Self {
        self.overrides.insert(symbol.to_string(), replacement.to_string());
        self
    }

    pub fn prefix(&self, namespace: &str) -> Option<&str> {
        self.prefixes.get(namespace).map(String::as_str)
    }

    /// The prefix for `namespace`; a missing entry is a configuration error.
    pub fn require_prefix(&self, namespace: &str) -> Result<&str> {
        self.prefix(namespace).ok_or_else(|| CoreError::UnregisteredNamespace {
            namespace: namespace.to_string(),
        })
    }

    pub fn override_for(&self, symbol: &str) -> Option<&str> {
        self.overrides.get(symbol).map(String::as_str)
    }

    /// Verify that every namespace used in `registry` has a prefix.
    pub fn check_namespaces(&self, registry: &EntityRegistry) -> Result<()> {
        for namespace in registry.namespaces() {
            self.require_prefix(namespace)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{ApiEntity, Struct};
    use crate::name::QualifiedName;

    #[test]
    fn parse_tables() {
        let toml = r#"
[prefixes]
Gtk = "gtk"
GLib = "g"

[overrides]
main = "gtkMainLoop"
"#;
        let config = Config::parse(toml).unwrap();
        assert_eq!(config.prefix("Gtk"), Some("gtk"));
        assert_eq!(config.prefix("GLib"), Some("g"));
        assert_eq!(config.prefix("Gdk"), None);
        assert_eq!(config.override_for("main"), Some("gtkMainLoop"));
    }

    #[test]
    fn empty_config_is_valid() {
        let config = Config::parse("").unwrap();
        assert!(config.prefixes.is_empty());
        assert!(config.overrides.is_empty());
    }

    #[test]
    fn missing_prefix_names_namespace() {
        let config = Config::new().with_prefix("Gtk", "gtk");
        let err = config.require_prefix("Gdk").unwrap_err();
        assert!(err.to_string().contains("'Gdk'"));
    }

    #[test]
    fn check_namespaces_against_registry() {
        let registry = EntityRegistry::from_entries(vec![(
            QualifiedName::new("Gdk", "Event"),
            ApiEntity::Struct(Struct::default()),
        )])
        .unwrap();
        let config = Config::new().with_prefix("Gtk", "gtk");
        assert!(config.check_namespaces(&registry).is_err());
        let config = config.with_prefix("Gdk", "gdk");
        assert!(config.check_namespaces(&registry).is_ok());
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("weft.toml");
        std::fs::write(&path, "[prefixes]\nFoo = \"foo\"\n").unwrap();
        let config = Config::load(&path).unwrap();
        assert_eq!(config.prefix("Foo"), Some("foo"));
    }
}
