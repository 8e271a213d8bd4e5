//! Identifier resolution: namespaced names to Haskell identifiers.

use std::borrow::Cow;
use std::collections::HashSet;

use weft_core::{Config, QualifiedName};

use crate::error::{CodegenError, Result};

/// Casing style of a resolved identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    /// `lowerCamel`, for functions, constants and bindings.
    Value,
    /// `UpperCamel`, for types and constructors.
    Type,
}

/// Words that cannot be used as identifiers in generated code.
pub const RESERVED_WORDS: &[&str] = &[
    "case", "class", "data", "default", "deriving", "do", "else", "forall", "foreign", "if",
    "import", "in", "infix", "infixl", "infixr", "instance", "let", "mdo", "module", "newtype",
    "of", "proc", "rec", "then", "type", "where",
];

/// Resolve a qualified name to an identifier in the given style.
///
/// A configured override for the local name is returned verbatim. Otherwise
/// the namespace prefix becomes the leading token and the underscore
/// separated tokens of the local name follow.
pub fn resolve(name: &QualifiedName, style: Style, config: &Config) -> Result<String> {
    if let Some(replacement) = config.override_for(&name.name) {
        return Ok(replacement.to_string());
    }
    if name.name.is_empty() {
        return Err(CodegenError::EmptyIdentifier {
            namespace: name.namespace.clone(),
        });
    }
    let prefix = config
        .prefix(&name.namespace)
        .ok_or_else(|| CodegenError::UnregisteredNamespace {
            namespace: name.namespace.clone(),
        })?;

    let local = escape_reserved(&name.name);
    let tokens = std::iter::once(prefix).chain(local.split('_'));
    Ok(join_tokens(tokens, style))
}

/// Render an argument or binding name: value style, no prefix.
pub fn local_name(name: &str) -> Result<String> {
    if name.is_empty() {
        return Err(CodegenError::EmptyIdentifier {
            namespace: String::new(),
        });
    }
    let escaped = escape_reserved(name);
    Ok(join_tokens(escaped.split('_'), Style::Value))
}

/// Claim `base`, or `base` with `_` appended until unused, as a new binding.
pub fn fresh(base: &str, used: &mut HashSet<String>) -> String {
    let mut name = base.to_string();
    while used.contains(&name) {
        name.push('_');
    }
    used.insert(name.clone());
    name
}

fn escape_reserved(name: &str) -> Cow<'_, str> {
    if RESERVED_WORDS.contains(&name) {
        Cow::Owned(format!("{name}_"))
    } else {
        Cow::Borrowed(name)
    }
}

fn join_tokens<'t>(tokens: impl Iterator<Item = &'t str>, style: Style) -> String {
    let mut out = String::new();
    for (i, token) in tokens.enumerate() {
        if token.is_empty() {
            // Dropping empty tokens would let `a__b` and `a_b` collide.
            out.push('_');
        } else if i == 0 && style == Style::Value {
            out.push_str(&token.to_lowercase());
        } else {
            out.push_str(&capitalize(token));
        }
    }
    out
}

fn capitalize(token: &str) -> String {
    let mut chars = token.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
