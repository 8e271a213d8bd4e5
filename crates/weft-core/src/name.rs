//! Namespaced symbol names.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// A namespace identifier paired with a local symbol name.
///
/// Every lookup in the generator (prefixes, overrides, cross references)
/// is keyed by a `QualifiedName`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct QualifiedName {
    pub namespace: String,
    pub name: String,
}

impl QualifiedName {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// Parse `Namespace.local_name`. The split happens at the first `.`.
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        let (namespace, name) = input
            .split_once('.')
            .ok_or_else(|| CoreError::InvalidQualifiedName {
                input: input.to_string(),
                detail: "expected 'Namespace.name'".to_string(),
            })?;
        if namespace.is_empty() {
            return Err(CoreError::InvalidQualifiedName {
                input: input.to_string(),
                detail: "empty namespace".to_string(),
            });
        }
        Ok(Self::new(namespace, name))
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.namespace, self.name)
    }
}

impl FromStr for QualifiedName {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
