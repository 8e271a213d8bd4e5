//! Constant emission: a type signature and a value definition.

use std::fmt;

use serde::Serialize;
use weft_core::entity::Constant;
use weft_core::{BasicType, NativeType, QualifiedName};

use crate::context::Context;
use crate::error::{CodegenError, Result};
use crate::ident::{self, Style};
use crate::types::{Repr, TypeMapper};

/// `name :: T` followed by `name = literal`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConstantFragment {
    pub name: String,
    pub repr: Repr,
    pub value: String,
}

impl fmt::Display for ConstantFragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} :: {}", self.name, self.repr)?;
        write!(f, "{} = {}", self.name, self.value)
    }
}

/// Emit the declaration pair for a constant.
pub fn emit_constant(
    ctx: &Context<'_>,
    name: &QualifiedName,
    constant: &Constant,
) -> Result<ConstantFragment> {
    let types = TypeMapper::new(*ctx);
    let ident = ident::resolve(name, Style::Value, ctx.config)?;
    let repr = types.high_repr(&constant.ty)?;

    let invalid = |detail: String| CodegenError::InvalidConstant {
        name: name.to_string(),
        detail,
    };

    let basic = match &constant.ty {
        NativeType::Basic(basic) => *basic,
        other => return Err(invalid(format!("unsupported constant type '{other}'"))),
    };
    let raw = constant.value.trim();

    let value = match basic {
        b if b.is_integer() => {
            let n: i128 = raw
                .parse()
                .map_err(|_| invalid(format!("'{raw}' is not an integer")))?;
            match b.integer_range() {
                Some((min, max)) if n < min || n > max => {
                    return Err(invalid(format!(
                        "{n} is out of range for {} ({min}..={max})",
                        b.keyword()
                    )))
                }
                _ => negative_in_parens(n.to_string()),
            }
        }
        BasicType::Float | BasicType::Double => {
            match raw.parse::<f64>() {
                Ok(x) if x.is_finite() => negative_in_parens(raw.to_string()),
                _ => return Err(invalid(format!("'{raw}' is not a finite number"))),
            }
        }
        BasicType::Boolean => match raw {
            "true" | "TRUE" | "1" => "True".to_string(),
            "false" | "FALSE" | "0" => "False".to_string(),
            _ => return Err(invalid(format!("'{raw}' is not a boolean"))),
        },
        BasicType::Utf8 | BasicType::FileName => string_literal(&constant.value),
        other => {
            return Err(invalid(format!(
                "unsupported constant type '{}'",
                other.keyword()
            )))
        }
    };

    Ok(ConstantFragment {
        name: ident,
        repr,
        value,
    })
}

fn negative_in_parens(literal: String) -> String {
    if literal.starts_with('-') {
        format!("({literal})")
    } else {
        literal
    }
}

/// A Haskell string literal. Non-ASCII and control characters use decimal
/// escapes terminated with `\&`.
fn string_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            ' '..='~' => out.push(c),
            other => out.push_str(&format!("\\{}\\&", other as u32)),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use weft_core::{Config, EntityRegistry};

    fn emit(name: &str, ty: &str, value: &str) -> Result<ConstantFragment> {
        let config = Config::new().with_prefix("Gtk", "gtk");
        let registry = EntityRegistry::new();
        let ctx = Context::new(&config, &registry);
        let constant = Constant {
            ty: NativeType::parse(ty).unwrap(),
            value: value.to_string(),
        };
        emit_constant(&ctx, &QualifiedName::new("Gtk", name), &constant)
    }

    #[test]
    fn integer_constant() {
        let c = emit("MAJOR_VERSION", "int32", "3").unwrap();
        assert_eq!(c.to_string(), "gtkMAJORVERSION :: Int32\ngtkMAJORVERSION = 3");
        assert_eq!(emit("MIN", "int64", "-7").unwrap().value, "(-7)");
    }

    #[test]
    fn integers_must_fit_their_type() {
        assert_eq!(emit("MAX", "uint8", "255").unwrap().value, "255");
        assert_eq!(emit("MIN", "int8", "-128").unwrap().value, "(-128)");
        let err = emit("X", "uint8", "-1").unwrap_err();
        assert!(matches!(err, CodegenError::InvalidConstant { .. }));
        assert!(err.to_string().contains("uint8"));
        assert!(emit("X", "int8", "300").is_err());
        assert!(emit("X", "uint64", "18446744073709551616").is_err());
        assert!(emit("X", "uint64", "18446744073709551615").is_ok());
    }

    #[test]
    fn string_constant_is_escaped() {
        let c = emit("label", "utf8", "say \"hi\"\n\u{e9}").unwrap();
        assert_eq!(c.repr, Repr::con("Text"));
        assert_eq!(c.value, "\"say \\\"hi\\\"\\n\\233\\&\"");
    }

    #[test]
    fn boolean_and_float_constants() {
        assert_eq!(emit("flag", "boolean", "true").unwrap().value, "True");
        assert_eq!(emit("flag", "boolean", "0").unwrap().value, "False");
        assert_eq!(emit("ratio", "double", "0.5").unwrap().value, "0.5");
        assert_eq!(emit("ratio", "float", "-1.5").unwrap().value, "(-1.5)");
    }

    #[test]
    fn invalid_literals_rejected() {
        assert!(matches!(
            emit("n", "int32", "three"),
            Err(CodegenError::InvalidConstant { .. })
        ));
        assert!(emit("b", "boolean", "maybe").is_err());
        assert!(emit("d", "double", "x1").is_err());
        assert!(emit("d", "double", "inf").is_err());
    }

    #[test]
    fn unsupported_types_rejected() {
        let err = emit("p", "pointer", "0").unwrap_err();
        assert!(err.to_string().contains("Gtk.p"));
        assert!(emit("l", "list<int32>", "[]").is_err());
    }
}
