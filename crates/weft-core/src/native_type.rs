//! Native type descriptions and their compact text syntax.
//!
//! Description files spell native types as short expressions:
//!
//! - a basic keyword: `int32`, `utf8`, `boolean`, `none`, ...
//! - `[T]` for a fixed-size C array of `T`
//! - `list<T>` for a singly-linked list
//! - `map<K, V>` for an association map
//! - `error` for the opaque error type
//! - `Namespace.Name` for a reference to another API entity

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::name::QualifiedName;

/// Primitive scalar types that cross the native boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BasicType {
    /// No value (`void`).
    None,
    /// Boolean carried as a native `int`.
    Boolean,
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Long,
    ULong,
    Size,
    SSize,
    Float,
    Double,
    /// A Unicode code point carried as a native `int`.
    UniChar,
    /// Boxed runtime type handle, a machine word.
    GType,
    /// NUL-terminated UTF-8 string.
    Utf8,
    /// NUL-terminated file name in the platform encoding.
    FileName,
    /// Untyped pointer (`void*`).
    Pointer,
}

impl BasicType {
    /// Look up a basic type by its keyword.
    pub fn from_keyword(s: &str) -> Option<Self> {
        let ty = match s {
            "none" | "void" => Self::None,
            "boolean" | "gboolean" => Self::Boolean,
            "int8" => Self::Int8,
            "uint8" => Self::UInt8,
            "int16" => Self::Int16,
            "uint16" => Self::UInt16,
            "int32" | "int" => Self::Int32,
            "uint32" | "uint" => Self::UInt32,
            "int64" => Self::Int64,
            "uint64" => Self::UInt64,
            "long" => Self::Long,
            "ulong" => Self::ULong,
            "size" | "gsize" => Self::Size,
            "ssize" | "gssize" => Self::SSize,
            "float" => Self::Float,
            "double" => Self::Double,
            "unichar" => Self::UniChar,
            "gtype" => Self::GType,
            "utf8" => Self::Utf8,
            "filename" => Self::FileName,
            "pointer" | "gpointer" => Self::Pointer,
            _ => return None,
        };
        Some(ty)
    }

    /// The canonical keyword for this type.
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Boolean => "boolean",
            Self::Int8 => "int8",
            Self::UInt8 => "uint8",
            Self::Int16 => "int16",
            Self::UInt16 => "uint16",
            Self::Int32 => "int32",
            Self::UInt32 => "uint32",
            Self::Int64 => "int64",
            Self::UInt64 => "uint64",
            Self::Long => "long",
            Self::ULong => "ulong",
            Self::Size => "size",
            Self::SSize => "ssize",
            Self::Float => "float",
            Self::Double => "double",
            Self::UniChar => "unichar",
            Self::GType => "gtype",
            Self::Utf8 => "utf8",
            Self::FileName => "filename",
            Self::Pointer => "pointer",
        }
    }

    /// Whether this is one of the fixed-width or platform integer types.
    pub fn is_integer(&self) -> bool {
        self.integer_range().is_some()
    }

    /// Inclusive value range of an integer type. Platform types assume an
    /// LP64 target.
    pub fn integer_range(&self) -> Option<(i128, i128)> {
        let range: (i128, i128) = match self {
            Self::Int8 => (i8::MIN.into(), i8::MAX.into()),
            Self::UInt8 => (0, u8::MAX.into()),
            Self::Int16 => (i16::MIN.into(), i16::MAX.into()),
            Self::UInt16 => (0, u16::MAX.into()),
            Self::Int32 => (i32::MIN.into(), i32::MAX.into()),
            Self::UInt32 => (0, u32::MAX.into()),
            Self::Int64 | Self::Long | Self::SSize => (i64::MIN.into(), i64::MAX.into()),
            Self::UInt64 | Self::ULong | Self::Size => (0, u64::MAX.into()),
            _ => return None,
        };
        Some(range)
    }
}

/// A native type as described by the API metadata.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum NativeType {
    Basic(BasicType),
    /// Fixed-size C array.
    Array(Box<NativeType>),
    /// Singly-linked list.
    List(Box<NativeType>),
    /// Association map from key type to value type.
    Map(Box<NativeType>, Box<NativeType>),
    /// The library's opaque error type.
    Error,
    /// Reference to another API entity.
    Interface(QualifiedName),
}

impl NativeType {
    pub fn basic(ty: BasicType) -> Self {
        Self::Basic(ty)
    }

    pub fn array(element: NativeType) -> Self {
        Self::Array(Box::new(element))
    }

    pub fn list(element: NativeType) -> Self {
        Self::List(Box::new(element))
    }

    pub fn map(key: NativeType, value: NativeType) -> Self {
        Self::Map(Box::new(key), Box::new(value))
    }

    pub fn interface(namespace: &str, name: &str) -> Self {
        Self::Interface(QualifiedName::new(namespace, name))
    }

    /// Whether this is the unit (`none`) type.
    pub fn is_none(&self) -> bool {
        matches!(self, Self::Basic(BasicType::None))
    }

    /// Every interface reference reachable from this type, outermost first.
    pub fn interfaces(&self) -> Vec<&QualifiedName> {
        let mut out = Vec::new();
        self.collect_interfaces(&mut out);
        out
    }

    fn collect_interfaces<'a>(&'a self, out: &mut Vec<&'a QualifiedName>) {
        match self {
            Self::Basic(_) | Self::Error => {}
            Self::Array(inner) | Self::List(inner) => inner.collect_interfaces(out),
            Self::Map(key, value) => {
                key.collect_interfaces(out);
                value.collect_interfaces(out);
            }
            Self::Interface(name) => out.push(name),
        }
    }

    /// Parse a native type expression.
    pub fn parse(input: &str) -> Result<Self> {
        let mut parser = TypeParser::new(input);
        let ty = parser.parse_type()?;
        parser.skip_ws();
        if !parser.at_end() {
            return Err(parser.error("trailing input"));
        }
        Ok(ty)
    }
}

impl fmt::Display for NativeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Basic(b) => write!(f, "{}", b.keyword()),
            Self::Array(inner) => write!(f, "[{inner}]"),
            Self::List(inner) => write!(f, "list<{inner}>"),
            Self::Map(key, value) => write!(f, "map<{key}, {value}>"),
            Self::Error => write!(f, "error"),
            Self::Interface(name) => write!(f, "{name}"),
        }
    }
}

impl FromStr for NativeType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for NativeType {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<NativeType> for String {
    fn from(ty: NativeType) -> Self {
        ty.to_string()
    }
}

/// Recursive-descent parser over a type expression.
struct TypeParser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> TypeParser<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn error(&self, detail: &str) -> CoreError {
        CoreError::InvalidNativeType {
            input: self.input.to_string(),
            detail: format!("{detail} at offset {}", self.pos),
        }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn skip_ws(&mut self) {
        let trimmed = self.rest().trim_start();
        self.pos = self.input.len() - trimmed.len();
    }

    fn eat(&mut self, c: char) -> bool {
        self.skip_ws();
        if self.rest().starts_with(c) {
            self.pos += c.len_utf8();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, c: char) -> Result<()> {
        if self.eat(c) {
            Ok(())
        } else {
            Err(self.error(&format!("expected '{c}'")))
        }
    }

    /// A word is a run of identifier characters and dots.
    fn word(&mut self) -> &'a str {
        self.skip_ws();
        let rest = self.rest();
        let len = rest
            .find(|c: char| !(c.is_alphanumeric() || c == '_' || c == '.'))
            .unwrap_or(rest.len());
        self.pos += len;
        &rest[..len]
    }

    fn parse_type(&mut self) -> Result<NativeType> {
        if self.eat('[') {
            let inner = self.parse_type()?;
            self.expect(']')?;
            return Ok(NativeType::array(inner));
        }

        let word = self.word();
        match word {
            "" => Err(self.error("expected type")),
            "list" => {
                self.expect('<')?;
                let inner = self.parse_type()?;
                self.expect('>')?;
                Ok(NativeType::list(inner))
            }
            "map" => {
                self.expect('<')?;
                let key = self.parse_type()?;
                self.expect(',')?;
                let value = self.parse_type()?;
                self.expect('>')?;
                Ok(NativeType::map(key, value))
            }
            "error" => Ok(NativeType::Error),
            other => {
                if let Some(basic) = BasicType::from_keyword(other) {
                    return Ok(NativeType::Basic(basic));
                }
                if other.contains('.') {
                    let name = QualifiedName::parse(other).map_err(|_| self.error("bad reference"))?;
                    if name.name.is_empty() {
                        return Err(self.error("empty reference name"));
                    }
                    return Ok(NativeType::Interface(name));
                }
                Err(self.error(&format!("unknown type '{other}'")))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_ranges() {
        assert_eq!(BasicType::UInt8.integer_range(), Some((0, 255)));
        assert_eq!(BasicType::Int8.integer_range(), Some((-128, 127)));
        assert_eq!(BasicType::Size.integer_range(), Some((0, u64::MAX as i128)));
        assert_eq!(BasicType::Double.integer_range(), None);
        assert!(BasicType::SSize.is_integer());
        assert!(!BasicType::Boolean.is_integer());
    }

    #[test]
    fn parse_basic() {
        assert_eq!(
            NativeType::parse("int32").unwrap(),
            NativeType::Basic(BasicType::Int32)
        );
        assert_eq!(
            NativeType::parse(" utf8 ").unwrap(),
            NativeType::Basic(BasicType::Utf8)
        );
        assert_eq!(
            NativeType::parse("gboolean").unwrap(),
            NativeType::Basic(BasicType::Boolean)
        );
    }

    #[test]
    fn parse_structural() {
        let ty = NativeType::parse("map<utf8, list<[Gtk.Widget]>>").unwrap();
        assert_eq!(
            ty,
            NativeType::map(
                NativeType::basic(BasicType::Utf8),
                NativeType::list(NativeType::array(NativeType::interface("Gtk", "Widget"))),
            )
        );
    }

    #[test]
    fn display_is_reparseable() {
        for src in ["[int32]", "list<Gio.File>", "map<utf8, double>", "error", "none"] {
            let ty = NativeType::parse(src).unwrap();
            assert_eq!(NativeType::parse(&ty.to_string()).unwrap(), ty);
        }
    }

    #[test]
    fn collects_nested_interfaces() {
        let ty = NativeType::parse("map<Foo.Key, list<Bar.Value>>").unwrap();
        let names: Vec<String> = ty.interfaces().iter().map(|q| q.to_string()).collect();
        assert_eq!(names, vec!["Foo.Key", "Bar.Value"]);
    }

    #[test]
    fn parse_errors() {
        assert!(NativeType::parse("").is_err());
        assert!(NativeType::parse("[int32").is_err());
        assert!(NativeType::parse("map<int32>").is_err());
        assert!(NativeType::parse("bogus").is_err());
        assert!(NativeType::parse("int32 int32").is_err());
        assert!(NativeType::parse("Foo.").is_err());
    }

    #[test]
    fn error_names_input() {
        let err = NativeType::parse("list<wat>").unwrap_err();
        assert!(err.to_string().contains("list<wat>"));
    }
}
