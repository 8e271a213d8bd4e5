//! Native ↔ high-level type mapping.
//!
//! Every [`NativeType`] has two Haskell representations: the shape it has
//! across the raw foreign call (`CInt`, `Ptr GtkWidget`, `CString`) and the
//! shape exposed to callers of the bindings (`Bool`, `GtkWidget`, `Text`).

use std::fmt;

use serde::{Serialize, Serializer};
use weft_core::{Argument, BasicType, EntityKind, NativeType, QualifiedName};

use crate::context::Context;
use crate::error::{CodegenError, Result};
use crate::ident::{self, Style};

/// Native representation of enumerations and flag sets.
pub const GENERATED_TYPE_NATIVE: &str = "CUInt";

/// A printable Haskell type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Repr {
    /// A nullary type constructor: `CInt`, `Text`.
    Con(String),
    /// A type constructor applied to arguments: `Ptr CInt`, `Map Text Int32`.
    App(String, Vec<Repr>),
    /// `[a]`
    List(Box<Repr>),
    /// `()`, `(a)`, `(a, b)`. A one-element tuple is kept distinct from `a`.
    Tuple(Vec<Repr>),
    /// A single-field wrapper over a pointer, printed as its name.
    Wrapper { name: String, field: Box<Repr> },
}

impl Repr {
    pub fn con(name: &str) -> Self {
        Self::Con(name.to_string())
    }

    pub fn app(name: &str, args: Vec<Repr>) -> Self {
        Self::App(name.to_string(), args)
    }

    pub fn unit() -> Self {
        Self::Tuple(Vec::new())
    }

    pub fn tuple(elements: Vec<Repr>) -> Self {
        Self::Tuple(elements)
    }

    pub fn list(element: Repr) -> Self {
        Self::List(Box::new(element))
    }

    pub fn ptr(inner: Repr) -> Self {
        Self::app("Ptr", vec![inner])
    }

    pub fn fun_ptr(inner: Repr) -> Self {
        Self::app("FunPtr", vec![inner])
    }

    pub fn maybe(inner: Repr) -> Self {
        Self::app("Maybe", vec![inner])
    }

    pub fn io(inner: Repr) -> Self {
        Self::app("IO", vec![inner])
    }

    /// A wrapper named `name` around `Ptr name`.
    pub fn pointer_wrapper(name: &str) -> Self {
        Self::Wrapper {
            name: name.to_string(),
            field: Box::new(Self::ptr(Self::con(name))),
        }
    }

    /// Whether values of this type are addresses (and may be null).
    pub fn is_pointer(&self) -> bool {
        self.null_literal().is_some()
    }

    /// The null value to compare an address of this type against.
    ///
    /// `nullPtr :: Ptr a` does not unify with `FunPtr a`, so function
    /// pointers get `nullFunPtr`.
    pub fn null_literal(&self) -> Option<&'static str> {
        match self {
            Self::Con(name) if name == "CString" => Some("nullPtr"),
            Self::App(name, _) if name == "Ptr" => Some("nullPtr"),
            Self::App(name, _) if name == "FunPtr" => Some("nullFunPtr"),
            _ => None,
        }
    }

    fn needs_parens(&self) -> bool {
        matches!(self, Self::App(_, args) if !args.is_empty())
    }

    fn fmt_atom(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.needs_parens() {
            write!(f, "({self})")
        } else {
            write!(f, "{self}")
        }
    }
}

impl fmt::Display for Repr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Con(name) => write!(f, "{name}"),
            Self::App(name, args) => {
                write!(f, "{name}")?;
                for arg in args {
                    write!(f, " ")?;
                    arg.fmt_atom(f)?;
                }
                Ok(())
            }
            Self::List(inner) => write!(f, "[{inner}]"),
            Self::Tuple(elements) => {
                write!(f, "(")?;
                for (i, e) in elements.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{e}")?;
                }
                write!(f, ")")
            }
            Self::Wrapper { name, .. } => write!(f, "{name}"),
        }
    }
}

impl Serialize for Repr {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Maps native types to their native and high-level representations.
#[derive(Debug, Clone, Copy)]
pub struct TypeMapper<'a> {
    ctx: Context<'a>,
}

impl<'a> TypeMapper<'a> {
    pub fn new(ctx: Context<'a>) -> Self {
        Self { ctx }
    }

    /// The type-style identifier of a referenced entity.
    pub fn type_name(&self, name: &QualifiedName) -> Result<String> {
        ident::resolve(name, Style::Type, self.ctx.config)
    }

    /// Resolve and classify an interface reference.
    ///
    /// The name is resolved before the registry is consulted, so an
    /// unregistered namespace is reported ahead of an unknown entity.
    pub fn interface(&self, name: &QualifiedName) -> Result<(String, EntityKind)> {
        let type_name = self.type_name(name)?;
        let kind = self.ctx.classify(name)?;
        match kind {
            EntityKind::Function | EntityKind::Constant => Err(CodegenError::UnclassifiedEntity {
                name: name.to_string(),
                kind: kind.to_string(),
            }),
            _ => Ok((type_name, kind)),
        }
    }

    /// The registry classification of `ty`, when it is an interface reference.
    pub fn classify(&self, ty: &NativeType) -> Result<Option<EntityKind>> {
        match ty {
            NativeType::Interface(name) => Ok(Some(self.interface(name)?.1)),
            _ => Ok(None),
        }
    }

    /// Representation across the raw foreign call.
    pub fn native_repr(&self, ty: &NativeType) -> Result<Repr> {
        let repr = match ty {
            NativeType::Basic(basic) => basic_native(*basic),
            NativeType::Array(inner) => Repr::app("CArray", vec![self.native_repr(inner)?]),
            NativeType::List(inner) => Repr::app("GSList", vec![self.native_repr(inner)?]),
            NativeType::Map(key, value) => Repr::app(
                "GHashTable",
                vec![self.native_repr(key)?, self.native_repr(value)?],
            ),
            NativeType::Error => Repr::ptr(Repr::con("GError")),
            NativeType::Interface(name) => {
                let (type_name, kind) = self.interface(name)?;
                match kind {
                    kind if kind.is_generated_type() => Repr::con(GENERATED_TYPE_NATIVE),
                    EntityKind::Callback => Repr::fun_ptr(Repr::con(&type_name)),
                    _ => Repr::ptr(Repr::con(&type_name)),
                }
            }
        };
        Ok(repr)
    }

    /// Representation exposed to callers of the bindings.
    pub fn high_repr(&self, ty: &NativeType) -> Result<Repr> {
        let repr = match ty {
            NativeType::Basic(basic) => basic_high(*basic),
            NativeType::Array(inner) => Repr::list(self.high_repr(inner)?),
            NativeType::List(inner) => Repr::list(self.high_repr(inner)?),
            NativeType::Map(key, value) => {
                Repr::app("Map", vec![self.high_repr(key)?, self.high_repr(value)?])
            }
            NativeType::Error => Repr::pointer_wrapper("GError"),
            NativeType::Interface(name) => {
                let (type_name, kind) = self.interface(name)?;
                match kind {
                    kind if kind.is_generated_type() => Repr::con(&type_name),
                    EntityKind::Callback => Repr::fun_ptr(Repr::con(&type_name)),
                    _ => Repr::pointer_wrapper(&type_name),
                }
            }
        };
        Ok(repr)
    }

    /// Native parameter type of an argument: outputs are passed by pointer.
    pub fn arg_native_repr(&self, arg: &Argument) -> Result<Repr> {
        let repr = self.native_repr(&arg.ty)?;
        if arg.direction.is_output() {
            Ok(Repr::ptr(repr))
        } else {
            Ok(repr)
        }
    }
}

fn basic_native(basic: BasicType) -> Repr {
    match basic {
        BasicType::None => Repr::unit(),
        BasicType::Boolean | BasicType::UniChar => Repr::con("CInt"),
        BasicType::Float => Repr::con("CFloat"),
        BasicType::Double => Repr::con("CDouble"),
        BasicType::GType => Repr::con("CGType"),
        BasicType::Utf8 | BasicType::FileName => Repr::con("CString"),
        other => basic_high(other),
    }
}

fn basic_high(basic: BasicType) -> Repr {
    match basic {
        BasicType::None => Repr::unit(),
        BasicType::Boolean => Repr::con("Bool"),
        BasicType::Int8 => Repr::con("Int8"),
        BasicType::UInt8 => Repr::con("Word8"),
        BasicType::Int16 => Repr::con("Int16"),
        BasicType::UInt16 => Repr::con("Word16"),
        BasicType::Int32 => Repr::con("Int32"),
        BasicType::UInt32 => Repr::con("Word32"),
        BasicType::Int64 => Repr::con("Int64"),
        BasicType::UInt64 => Repr::con("Word64"),
        BasicType::Long => Repr::con("CLong"),
        BasicType::ULong => Repr::con("CULong"),
        BasicType::Size => Repr::con("CSize"),
        BasicType::SSize => Repr::con("CSsize"),
        BasicType::Float => Repr::con("Float"),
        BasicType::Double => Repr::con("Double"),
        BasicType::UniChar => Repr::con("Char"),
        BasicType::GType => Repr::con("GType"),
        BasicType::Utf8 | BasicType::FileName => Repr::con("Text"),
        BasicType::Pointer => Repr::ptr(Repr::unit()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weft_core::entity::{ApiEntity, Callback, Enumeration, FlagSet, Struct};
    use weft_core::{Callable, Config, Direction, EntityRegistry};

    fn fixture() -> (Config, EntityRegistry) {
        let config = Config::new().with_prefix("Gtk", "gtk").with_prefix("GLib", "g");
        let registry = EntityRegistry::from_entries(vec![
            (QualifiedName::new("Gtk", "Align"), ApiEntity::Enumeration(Enumeration::default())),
            (QualifiedName::new("Gtk", "StateFlags"), ApiEntity::FlagSet(FlagSet::default())),
            (QualifiedName::new("Gtk", "Widget"), ApiEntity::Struct(Struct::default())),
            (
                QualifiedName::new("Gtk", "Callback"),
                ApiEntity::Callback(Callback {
                    callable: Callable::new(vec![], NativeType::basic(BasicType::None)),
                }),
            ),
            (QualifiedName::new("Gdk", "Event"), ApiEntity::Struct(Struct::default())),
        ])
        .unwrap();
        (config, registry)
    }

    fn ty(src: &str) -> NativeType {
        NativeType::parse(src).unwrap()
    }

    #[test]
    fn basic_representations() {
        let (config, registry) = fixture();
        let mapper = TypeMapper::new(Context::new(&config, &registry));
        let cases = [
            ("boolean", "CInt", "Bool"),
            ("int32", "Int32", "Int32"),
            ("uint64", "Word64", "Word64"),
            ("double", "CDouble", "Double"),
            ("utf8", "CString", "Text"),
            ("gtype", "CGType", "GType"),
            ("unichar", "CInt", "Char"),
            ("pointer", "Ptr ()", "Ptr ()"),
            ("none", "()", "()"),
        ];
        for (src, native, high) in cases {
            assert_eq!(mapper.native_repr(&ty(src)).unwrap().to_string(), native, "{src}");
            assert_eq!(mapper.high_repr(&ty(src)).unwrap().to_string(), high, "{src}");
        }
    }

    #[test]
    fn generated_types_cross_as_integers() {
        let (config, registry) = fixture();
        let mapper = TypeMapper::new(Context::new(&config, &registry));
        assert_eq!(mapper.native_repr(&ty("Gtk.Align")).unwrap(), Repr::con("CUInt"));
        assert_eq!(mapper.high_repr(&ty("Gtk.Align")).unwrap(), Repr::con("GtkAlign"));
        assert_eq!(mapper.native_repr(&ty("Gtk.StateFlags")).unwrap(), Repr::con("CUInt"));
        assert_eq!(mapper.high_repr(&ty("Gtk.StateFlags")).unwrap(), Repr::con("GtkStateFlags"));
    }

    #[test]
    fn structs_are_pointer_wrappers() {
        let (config, registry) = fixture();
        let mapper = TypeMapper::new(Context::new(&config, &registry));
        let native = mapper.native_repr(&ty("Gtk.Widget")).unwrap();
        let high = mapper.high_repr(&ty("Gtk.Widget")).unwrap();
        assert_eq!(native.to_string(), "Ptr GtkWidget");
        assert_eq!(high.to_string(), "GtkWidget");
        match high {
            Repr::Wrapper { field, .. } => assert_eq!(*field, native),
            other => panic!("expected wrapper, got {other:?}"),
        }
    }

    #[test]
    fn callbacks_are_function_pointers() {
        let (config, registry) = fixture();
        let mapper = TypeMapper::new(Context::new(&config, &registry));
        assert_eq!(mapper.native_repr(&ty("Gtk.Callback")).unwrap().to_string(), "FunPtr GtkCallback");
        assert_eq!(mapper.high_repr(&ty("Gtk.Callback")).unwrap().to_string(), "FunPtr GtkCallback");
    }

    #[test]
    fn structural_types_recurse() {
        let (config, registry) = fixture();
        let mapper = TypeMapper::new(Context::new(&config, &registry));
        let t = ty("map<utf8, list<Gtk.Align>>");
        assert_eq!(mapper.native_repr(&t).unwrap().to_string(), "GHashTable CString (GSList CUInt)");
        assert_eq!(mapper.high_repr(&t).unwrap().to_string(), "Map Text [GtkAlign]");
        assert_eq!(mapper.native_repr(&ty("[double]")).unwrap().to_string(), "CArray CDouble");
        assert_eq!(mapper.high_repr(&ty("[double]")).unwrap().to_string(), "[Double]");
        assert_eq!(mapper.native_repr(&ty("error")).unwrap().to_string(), "Ptr GError");
        assert_eq!(mapper.high_repr(&ty("error")).unwrap().to_string(), "GError");
    }

    #[test]
    fn outputs_are_passed_by_pointer() {
        let (config, registry) = fixture();
        let mapper = TypeMapper::new(Context::new(&config, &registry));
        let input = Argument::input("x", ty("int32"));
        let output = Argument::output("y", ty("int32"));
        let inout = Argument::new("z", ty("Gtk.Widget"), Direction::InOut);
        assert_eq!(mapper.arg_native_repr(&input).unwrap().to_string(), "Int32");
        assert_eq!(mapper.arg_native_repr(&output).unwrap().to_string(), "Ptr Int32");
        assert_eq!(mapper.arg_native_repr(&inout).unwrap().to_string(), "Ptr (Ptr GtkWidget)");
    }

    #[test]
    fn nested_reference_into_unregistered_namespace() {
        let (config, registry) = fixture();
        let mapper = TypeMapper::new(Context::new(&config, &registry));
        let err = mapper.native_repr(&ty("list<Gdk.Event>")).unwrap_err();
        assert!(matches!(err, CodegenError::UnregisteredNamespace { ref namespace } if namespace == "Gdk"));
        assert!(mapper.high_repr(&ty("list<Gdk.Event>")).is_err());
    }

    #[test]
    fn unknown_entity_is_fatal() {
        let (config, registry) = fixture();
        let mapper = TypeMapper::new(Context::new(&config, &registry));
        let err = mapper.native_repr(&ty("Gtk.Missing")).unwrap_err();
        assert!(matches!(err, CodegenError::UnclassifiedEntity { .. }));
        assert!(err.to_string().contains("Gtk.Missing"));
    }

    #[test]
    fn tuple_display() {
        assert_eq!(Repr::unit().to_string(), "()");
        assert_eq!(Repr::tuple(vec![Repr::con("Int32")]).to_string(), "(Int32)");
        assert_eq!(
            Repr::io(Repr::maybe(Repr::tuple(vec![Repr::con("Int32"), Repr::con("Bool")]))).to_string(),
            "IO (Maybe (Int32, Bool))"
        );
        assert_ne!(Repr::tuple(vec![Repr::con("Int32")]), Repr::con("Int32"));
    }

    #[test]
    fn null_literals_follow_pointer_kind() {
        assert_eq!(Repr::ptr(Repr::con("GtkWidget")).null_literal(), Some("nullPtr"));
        assert_eq!(Repr::con("CString").null_literal(), Some("nullPtr"));
        assert_eq!(Repr::fun_ptr(Repr::con("GtkCallback")).null_literal(), Some("nullFunPtr"));
        assert_eq!(Repr::con("CInt").null_literal(), None);
        assert!(!Repr::con("CInt").is_pointer());
    }
}
