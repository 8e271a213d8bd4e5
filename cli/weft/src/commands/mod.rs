//! Sub-command implementations.

pub mod check;
pub mod generate;
pub mod resolve;

use std::path::Path;

use anyhow::{bail, Context, Result};
use weft_core::{ApiDescription, Config, EntityRegistry};

/// Load the description and configuration for one run.
pub fn load_inputs(api: &Path, config: &Path) -> Result<(EntityRegistry, Config)> {
    if !api.is_file() {
        bail!("API description not found: {}", api.display());
    }
    if !config.is_file() {
        bail!("configuration not found: {}", config.display());
    }

    let desc = ApiDescription::load(api).with_context(|| format!("loading {}", api.display()))?;
    let registry = desc
        .to_registry()
        .with_context(|| format!("registering entities of '{}'", desc.library.name))?;
    let config = Config::load(config).with_context(|| format!("loading {}", config.display()))?;

    log::debug!(
        "loaded {} entities of '{}' and {} prefixes",
        registry.len(),
        desc.library.name,
        config.prefixes.len()
    );
    Ok((registry, config))
}
