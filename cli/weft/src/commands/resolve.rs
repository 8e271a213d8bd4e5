//! `weft resolve`.

use std::path::Path;

use anyhow::{Context, Result};
use weft_codegen::{resolve, Style};
use weft_core::{Config, QualifiedName};

/// Resolve one qualified name against a configuration.
pub fn run(name: &str, style: Style, config: &Path) -> Result<String> {
    let config = Config::load(config).with_context(|| format!("loading {}", config.display()))?;
    let name = QualifiedName::parse(name)?;
    let ident = resolve(&name, style, &config).with_context(|| format!("resolving {name}"))?;
    Ok(ident)
}
