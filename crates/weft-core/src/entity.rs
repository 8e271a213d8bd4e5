//! API entities: the classified items of a library's surface.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::native_type::{BasicType, NativeType};

/// Which way an argument's value flows across the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Caller to callee.
    #[default]
    In,
    /// Callee to caller, through a pointer the wrapper allocates.
    Out,
    /// Both ways: the caller's value is written before the call and read back after.
    InOut,
}

impl Direction {
    /// Whether the wrapper takes a high-level parameter for this direction.
    pub fn is_input(&self) -> bool {
        matches!(self, Self::In | Self::InOut)
    }

    /// Whether the callee writes a value the wrapper must read back.
    pub fn is_output(&self) -> bool {
        matches!(self, Self::Out | Self::InOut)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::In => write!(f, "in"),
            Self::Out => write!(f, "out"),
            Self::InOut => write!(f, "inout"),
        }
    }
}

/// One argument of a callable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Argument {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: NativeType,
    #[serde(default)]
    pub direction: Direction,
}

impl Argument {
    pub fn new(name: impl Into<String>, ty: NativeType, direction: Direction) -> Self {
        Self {
            name: name.into(),
            ty,
            direction,
        }
    }

    pub fn input(name: impl Into<String>, ty: NativeType) -> Self {
        Self::new(name, ty, Direction::In)
    }

    pub fn output(name: impl Into<String>, ty: NativeType) -> Self {
        Self::new(name, ty, Direction::Out)
    }
}

fn default_return() -> NativeType {
    NativeType::Basic(BasicType::None)
}

/// A native signature: ordered arguments, a return type and the
/// nullable-result policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Callable {
    #[serde(default)]
    pub args: Vec<Argument>,
    #[serde(rename = "return", default = "default_return")]
    pub return_type: NativeType,
    /// The result may be absent; the wrapper's aggregate becomes optional.
    #[serde(default)]
    pub nullable: bool,
}

impl Callable {
    pub fn new(args: Vec<Argument>, return_type: NativeType) -> Self {
        Self {
            args,
            return_type,
            nullable: false,
        }
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Arguments the callee writes back, in declaration order.
    pub fn outputs(&self) -> impl Iterator<Item = &Argument> {
        self.args.iter().filter(|a| a.direction.is_output())
    }
}

/// A named compile-time constant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constant {
    #[serde(rename = "type")]
    pub ty: NativeType,
    /// Literal value as written in the metadata.
    pub value: String,
}

/// A native function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Function {
    /// The C symbol to bind.
    pub symbol: String,
    #[serde(flatten)]
    pub callable: Callable,
}

/// A named member of an enumeration or flag set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub name: String,
    pub value: i64,
}

/// An enumeration: members with distinct ordinals.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Enumeration {
    #[serde(default)]
    pub members: Vec<Member>,
}

/// A bit-flag set: members with (usually) power-of-two values.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FlagSet {
    #[serde(default)]
    pub members: Vec<Member>,
}

/// A field of a structure or union.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: NativeType,
}

/// A structure, handled as an opaque pointer by the marshalling core.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Struct {
    #[serde(default)]
    pub fields: Vec<Field>,
}

/// A union, handled like a structure.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Union {
    #[serde(default)]
    pub fields: Vec<Field>,
}

/// A callback signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Callback {
    #[serde(flatten)]
    pub callable: Callable,
}

/// A classified API entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ApiEntity {
    Constant(Constant),
    Function(Function),
    #[serde(alias = "enum")]
    Enumeration(Enumeration),
    #[serde(rename = "flags")]
    FlagSet(FlagSet),
    Struct(Struct),
    Callback(Callback),
    Union(Union),
}

impl ApiEntity {
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Constant(_) => EntityKind::Constant,
            Self::Function(_) => EntityKind::Function,
            Self::Enumeration(_) => EntityKind::Enumeration,
            Self::FlagSet(_) => EntityKind::FlagSet,
            Self::Struct(_) => EntityKind::Struct,
            Self::Callback(_) => EntityKind::Callback,
            Self::Union(_) => EntityKind::Union,
        }
    }

    /// Native types mentioned anywhere in this entity's signature or fields.
    pub fn native_types(&self) -> Vec<&NativeType> {
        match self {
            Self::Constant(c) => vec![&c.ty],
            Self::Function(Function { callable, .. }) | Self::Callback(Callback { callable }) => {
                let mut types: Vec<&NativeType> = callable.args.iter().map(|a| &a.ty).collect();
                types.push(&callable.return_type);
                types
            }
            Self::Struct(Struct { fields }) | Self::Union(Union { fields }) => {
                fields.iter().map(|f| &f.ty).collect()
            }
            Self::Enumeration(_) | Self::FlagSet(_) => Vec::new(),
        }
    }
}

/// The classification of an entity, without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Constant,
    Function,
    Enumeration,
    FlagSet,
    Struct,
    Callback,
    Union,
}

impl EntityKind {
    /// Enumerations and flag sets cross the native boundary as raw integers.
    pub fn is_generated_type(&self) -> bool {
        matches!(self, Self::Enumeration | Self::FlagSet)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant => write!(f, "constant"),
            Self::Function => write!(f, "function"),
            Self::Enumeration => write!(f, "enumeration"),
            Self::FlagSet => write!(f, "flags"),
            Self::Struct => write!(f, "struct"),
            Self::Callback => write!(f, "callback"),
            Self::Union => write!(f, "union"),
        }
    }
}
