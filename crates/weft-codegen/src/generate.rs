//! Module-level generation driver.
//!
//! Walks every entity of a registry in declaration order. Functions and
//! constants are emitted here; the remaining kinds belong to the
//! declarative emitters and are only recorded. The first error aborts the
//! whole module.

use std::fmt;

use serde::Serialize;
use weft_core::{ApiEntity, EntityKind, QualifiedName};

use crate::callable::{emit_callable, CallableFragments};
use crate::constant::{emit_constant, ConstantFragment};
use crate::context::Context;
use crate::error::Result;

/// A function's fragments, tagged with its qualified name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionOutput {
    pub name: QualifiedName,
    #[serde(flatten)]
    pub fragments: CallableFragments,
}

/// An entity left to the declarative emitters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedEntity {
    pub name: QualifiedName,
    pub kind: EntityKind,
}

/// Every fragment generated for one module.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GeneratedModule {
    pub functions: Vec<FunctionOutput>,
    pub constants: Vec<ConstantFragment>,
    pub skipped: Vec<SkippedEntity>,
}

impl GeneratedModule {
    /// Render all fragments as text: foreign imports, constants, wrappers.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for GeneratedModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for function in &self.functions {
            writeln!(f, "{}", function.fragments.foreign)?;
            first = false;
        }
        for constant in &self.constants {
            if !first {
                writeln!(f)?;
            }
            writeln!(f, "{constant}")?;
            first = false;
        }
        for function in &self.functions {
            if !first {
                writeln!(f)?;
            }
            writeln!(f, "{}", function.fragments.wrapper)?;
            first = false;
        }
        Ok(())
    }
}

/// Generate every function and constant of the context's registry.
pub fn generate_module(ctx: &Context<'_>) -> Result<GeneratedModule> {
    ctx.config.check_namespaces(ctx.registry)?;

    let mut module = GeneratedModule::default();
    for (name, entity) in ctx.registry.iter() {
        match entity {
            ApiEntity::Function(function) => {
                log::debug!("emitting function {name} ({})", function.symbol);
                let fragments = emit_callable(ctx, name, &function.symbol, &function.callable)?;
                module.functions.push(FunctionOutput {
                    name: name.clone(),
                    fragments,
                });
            }
            ApiEntity::Constant(constant) => {
                log::debug!("emitting constant {name}");
                module.constants.push(emit_constant(ctx, name, constant)?);
            }
            other => {
                log::debug!("skipping {} {name}", other.kind());
                module.skipped.push(SkippedEntity {
                    name: name.clone(),
                    kind: other.kind(),
                });
            }
        }
    }

    log::info!(
        "generated {} functions and {} constants ({} entities left to declarative emitters)",
        module.functions.len(),
        module.constants.len(),
        module.skipped.len()
    );
    Ok(module)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CodegenError;
    use weft_core::{ApiDescription, Config};

    const DESCRIPTION: &str = r#"
[library]
name = "foo"
namespace = "Foo"

[[entities]]
kind = "enumeration"
name = "Mode"

[[entities.members]]
name = "fast"
value = 0

[[entities]]
kind = "constant"
name = "LIMIT"
type = "int32"
value = "64"

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

[[entities]]
kind = "function"
name = "get_mode"
symbol = "foo_get_mode"
return = "Foo.Mode"
"#;

    fn generate(description: &str, config: &Config) -> Result<GeneratedModule> {
        let desc = ApiDescription::parse(description).unwrap();
        let registry = desc.to_registry().unwrap();
        let ctx = Context::new(config, &registry);
        generate_module(&ctx)
    }

    #[test]
    fn generates_in_declaration_order() {
        let config = Config::new().with_prefix("Foo", "foo");
        let module = generate(DESCRIPTION, &config).unwrap();

        let names: Vec<&str> = module.functions.iter().map(|f| f.fragments.wrapper.name.as_str()).collect();
        assert_eq!(names, vec!["fooBarBaz", "fooGetMode"]);
        assert_eq!(module.constants.len(), 1);
        assert_eq!(module.constants[0].name, "fooLIMIT");
        assert_eq!(module.skipped.len(), 1);
        assert_eq!(module.skipped[0].kind, EntityKind::Enumeration);
    }

    #[test]
    fn render_groups_fragments() {
        let config = Config::new().with_prefix("Foo", "foo");
        let text = generate(DESCRIPTION, &config).unwrap().render();
        let first_import = text.find("foreign import").unwrap();
        let constant = text.find("fooLIMIT ::").unwrap();
        let wrapper = text.find("\nfooBarBaz ::").unwrap();
        assert!(first_import < constant && constant < wrapper);
        assert!(text.contains("fooGetMode :: IO FooMode"));
        assert!(text.contains("let result' = toEnum (fromIntegral result)"));
    }

    #[test]
    fn missing_prefix_aborts_before_emission() {
        let err = generate(DESCRIPTION, &Config::new()).unwrap_err();
        assert!(err.to_string().contains("'Foo'"));
    }

    #[test]
    fn one_bad_entity_fails_the_module() {
        let bad = format!(
            "{DESCRIPTION}\n[[entities]]\nkind = \"function\"\nname = \"take\"\nsymbol = \"foo_take\"\n\n[[entities.args]]\nname = \"xs\"\ntype = \"list<int32>\"\n"
        );
        let config = Config::new().with_prefix("Foo", "foo");
        let err = generate(&bad, &config).unwrap_err();
        assert!(matches!(err, CodegenError::UnknownConversion { .. }));
    }

    #[test]
    fn module_serializes_to_json() {
        let config = Config::new().with_prefix("Foo", "foo");
        let module = generate(DESCRIPTION, &config).unwrap();
        let json = serde_json::to_value(&module).unwrap();
        assert_eq!(json["functions"][0]["name"]["name"], "bar_baz");
        assert_eq!(json["functions"][0]["wrapper"]["result"], "(Int32)");
        assert_eq!(json["skipped"][0]["kind"], "enumeration");
    }
}
