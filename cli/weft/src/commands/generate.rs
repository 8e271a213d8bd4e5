//! `weft generate`.

use std::path::Path;

use anyhow::{Context, Result};
use weft_codegen::generate_module;

use crate::OutputFormat;

/// Generate the whole module, then write it.
///
/// Nothing is written unless every entity generated successfully.
pub fn run(api: &Path, config: &Path, output: Option<&Path>, format: OutputFormat) -> Result<()> {
    let (registry, config) = super::load_inputs(api, config)?;
    let ctx = weft_codegen::Context::new(&config, &registry);

    let module = generate_module(&ctx).with_context(|| format!("generating {}", api.display()))?;

    let text = match format {
        OutputFormat::Text => module.render(),
        OutputFormat::Json => serde_json::to_string_pretty(&module)? + "\n",
    };

    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            std::fs::write(path, &text).with_context(|| format!("writing {}", path.display()))?;
            println!(
                "Generated {} functions and {} constants → {}",
                module.functions.len(),
                module.constants.len(),
                path.display()
            );
        }
        None => print!("{text}"),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const API: &str = r#"
[library]
name = "foo"
namespace = "Foo"

[[entities]]
kind = "function"
name = "bar_baz"
symbol = "foo_bar_baz"

[[entities.args]]
name = "flag"
type = "boolean"

[[entities.args]]
name = "count"
type = "int32"
direction = "out"
"#;

    fn write_inputs(dir: &Path, config: &str) -> (std::path::PathBuf, std::path::PathBuf) {
        let api = dir.join("foo.api.toml");
        let cfg = dir.join("weft.toml");
        std::fs::write(&api, API).unwrap();
        std::fs::write(&cfg, config).unwrap();
        (api, cfg)
    }

    #[test]
    fn writes_text_output() {
        let dir = tempfile::tempdir().unwrap();
        let (api, cfg) = write_inputs(dir.path(), "[prefixes]\nFoo = \"foo\"\n");
        let out = dir.path().join("gen").join("Foo.hs");

        run(&api, &cfg, Some(&out), OutputFormat::Text).unwrap();

        let text = std::fs::read_to_string(&out).unwrap();
        assert!(text.contains("foreign import ccall safe \"foo_bar_baz\" c_fooBarBaz"));
        assert!(text.contains("fooBarBaz :: Bool -> IO (Int32)"));
    }

    #[test]
    fn writes_json_output() {
        let dir = tempfile::tempdir().unwrap();
        let (api, cfg) = write_inputs(dir.path(), "[prefixes]\nFoo = \"foo\"\n");
        let out = dir.path().join("foo.json");

        run(&api, &cfg, Some(&out), OutputFormat::Json).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(json["functions"][0]["wrapper"]["name"], "fooBarBaz");
    }

    #[test]
    fn failure_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let (api, cfg) = write_inputs(dir.path(), "[prefixes]\n");
        let out = dir.path().join("Foo.hs");

        let err = run(&api, &cfg, Some(&out), OutputFormat::Text).unwrap_err();
        assert!(format!("{err:#}").contains("'Foo'"));
        assert!(!out.exists());
    }

    #[test]
    fn missing_description_reported() {
        let dir = tempfile::tempdir().unwrap();
        let (_, cfg) = write_inputs(dir.path(), "");
        let err = run(&dir.path().join("nope.api.toml"), &cfg, None, OutputFormat::Text).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }
}
