//! `weft check`.

use std::path::Path;

use anyhow::{Context, Result};
use weft_codegen::generate_module;

/// Run generation without writing anything and report a summary.
pub fn run(api: &Path, config: &Path) -> Result<()> {
    let (registry, config) = super::load_inputs(api, config)?;
    let ctx = weft_codegen::Context::new(&config, &registry);
    let module = generate_module(&ctx).with_context(|| format!("checking {}", api.display()))?;

    let unmanaged = module
        .functions
        .iter()
        .filter(|f| f.fragments.wrapper.unmanaged_result)
        .count();

    println!(
        "ok: {} functions, {} constants, {} entities for declarative emitters",
        module.functions.len(),
        module.constants.len(),
        module.skipped.len()
    );
    if unmanaged > 0 {
        println!("warning: {unmanaged} functions return unmanaged handles");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_reports_missing_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let api = dir.path().join("foo.api.toml");
        let cfg = dir.path().join("weft.toml");
        std::fs::write(
            &api,
            "[library]\nname = \"foo\"\nnamespace = \"Foo\"\n\n[[entities]]\nkind = \"constant\"\nname = \"LIMIT\"\ntype = \"int32\"\nvalue = \"10\"\n",
        )
        .unwrap();

        std::fs::write(&cfg, "[prefixes]\nFoo = \"foo\"\n").unwrap();
        run(&api, &cfg).unwrap();

        std::fs::write(&cfg, "[prefixes]\nBar = \"bar\"\n").unwrap();
        let err = run(&api, &cfg).unwrap_err();
        assert!(format!("{err:#}").contains("'Foo'"));
    }
}
