//! Conversion of values across the native boundary.
//!
//! For a native type the engine picks one [`Rule`], checked in a fixed
//! precedence order, and expands it into straight-line [`Step`]s. Each step
//! binds a new name (by default the source name with a `'` suffix); callers
//! that assemble several conversions pick destinations that never shadow.

use serde::Serialize;
use weft_core::{Argument, EntityKind, NativeType};

use crate::error::{CodegenError, Result};
use crate::ident;
use crate::types::{Repr, TypeMapper};

/// How a step binds its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StepKind {
    /// `let b = expr`
    Pure,
    /// `b <- expr`; runs an action.
    Effect,
    /// `expr $ \b -> do`; the rest of the body runs inside a bracket that
    /// releases its allocation on every exit path.
    Scoped,
}

/// One binding in a wrapper body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Step {
    pub kind: StepKind,
    /// Name bound by this step.
    pub binding: String,
    /// Constructor to destructure the value with, for wrapper projections.
    pub pattern: Option<String>,
    pub expr: String,
}

impl Step {
    fn new(kind: StepKind, binding: String, expr: String) -> Self {
        Self {
            kind,
            binding,
            pattern: None,
            expr,
        }
    }

    /// Whether this step performs an action (allocation, copy, ...).
    pub fn suspends(&self) -> bool {
        !matches!(self.kind, StepKind::Pure)
    }

    /// Render as a single line of a `do` block.
    pub fn render(&self) -> String {
        let lhs = match &self.pattern {
            Some(con) => format!("({con} {})", self.binding),
            None => self.binding.clone(),
        };
        match self.kind {
            StepKind::Pure => format!("let {lhs} = {}", self.expr),
            StepKind::Effect => format!("{lhs} <- {}", self.expr),
            StepKind::Scoped => format!("{} $ \\{lhs} -> do", self.expr),
        }
    }
}

/// A named entry of the fixed primitive conversion table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrimitiveConversion {
    pub native: &'static str,
    pub high: &'static str,
    pub to_high: &'static str,
    pub to_high_kind: StepKind,
    pub to_native: &'static str,
    pub to_native_kind: StepKind,
}

/// Conversions between representation pairs that no structural rule covers.
pub const PRIMITIVE_CONVERSIONS: &[PrimitiveConversion] = &[
    PrimitiveConversion {
        native: "CString",
        high: "Text",
        to_high: "cstringToText",
        to_high_kind: StepKind::Effect,
        to_native: "withTextCString",
        to_native_kind: StepKind::Scoped,
    },
    PrimitiveConversion {
        native: "CGType",
        high: "GType",
        to_high: "GType",
        to_high_kind: StepKind::Pure,
        to_native: "gtypeToCGType",
        to_native_kind: StepKind::Pure,
    },
    PrimitiveConversion {
        native: "CInt",
        high: "Bool",
        to_high: "(/= 0)",
        to_high_kind: StepKind::Pure,
        to_native: "(fromIntegral . fromEnum)",
        to_native_kind: StepKind::Pure,
    },
    PrimitiveConversion {
        native: "CFloat",
        high: "Float",
        to_high: "realToFrac",
        to_high_kind: StepKind::Pure,
        to_native: "realToFrac",
        to_native_kind: StepKind::Pure,
    },
    PrimitiveConversion {
        native: "CDouble",
        high: "Double",
        to_high: "realToFrac",
        to_high_kind: StepKind::Pure,
        to_native: "realToFrac",
        to_native_kind: StepKind::Pure,
    },
    PrimitiveConversion {
        native: "CInt",
        high: "Char",
        to_high: "(chr . fromIntegral)",
        to_high_kind: StepKind::Pure,
        to_native: "(fromIntegral . ord)",
        to_native_kind: StepKind::Pure,
    },
];

/// Look up the table entry for a representation pair.
pub fn primitive_conversion(native: &Repr, high: &Repr) -> Option<&'static PrimitiveConversion> {
    let (native, high) = (native.to_string(), high.to_string());
    PRIMITIVE_CONVERSIONS
        .iter()
        .find(|c| c.native == native && c.high == high)
}

/// The conversion rule chosen for a native type, in precedence order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    /// Both representations are equal.
    Identity,
    /// Ordinal ↔ enumeration value.
    Enumeration,
    /// Raw integer reinterpretation.
    Flags,
    /// Construct or destructure a single-field pointer wrapper.
    PointerUnwrap { wrapper: String },
    /// An entry of [`PRIMITIVE_CONVERSIONS`].
    Primitive(&'static PrimitiveConversion),
}

/// The steps converting one value, and the name holding the result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    pub rule: Rule,
    pub steps: Vec<Step>,
    pub result: String,
}

impl Conversion {
    fn identity(source: &str) -> Self {
        Self {
            rule: Rule::Identity,
            steps: Vec::new(),
            result: source.to_string(),
        }
    }

    fn single(rule: Rule, step: Step) -> Self {
        let result = step.binding.clone();
        Self {
            rule,
            steps: vec![step],
            result,
        }
    }

    /// Whether any step performs an action.
    pub fn suspends(&self) -> bool {
        self.steps.iter().any(Step::suspends)
    }
}

/// Derives conversion steps between native and high-level values.
#[derive(Debug, Clone, Copy)]
pub struct Marshaller<'a> {
    types: TypeMapper<'a>,
}

impl<'a> Marshaller<'a> {
    pub fn new(types: TypeMapper<'a>) -> Self {
        Self { types }
    }

    /// Pick the conversion rule for `ty`. The first matching rule wins:
    /// identity, generated type, pointer unwrap, primitive table.
    pub fn select_rule(&self, ty: &NativeType) -> Result<Rule> {
        let native = self.types.native_repr(ty)?;
        let high = self.types.high_repr(ty)?;

        if native == high {
            return Ok(Rule::Identity);
        }

        if let Some(kind) = self.types.classify(ty)?.filter(EntityKind::is_generated_type) {
            return Ok(if kind == EntityKind::Enumeration {
                Rule::Enumeration
            } else {
                Rule::Flags
            });
        }

        if let Repr::Wrapper { name, field } = &high {
            if **field == native {
                return Ok(Rule::PointerUnwrap {
                    wrapper: name.clone(),
                });
            }
        }

        primitive_conversion(&native, &high)
            .map(Rule::Primitive)
            .ok_or_else(|| CodegenError::UnknownConversion {
                native: native.to_string(),
                high: high.to_string(),
            })
    }

    /// High-level → native conversion of an argument's value.
    ///
    /// The source binding is the argument's rendered local name.
    pub fn h_to_f(&self, arg: &Argument) -> Result<Conversion> {
        let source = ident::local_name(&arg.name)?;
        self.h_to_f_value(&arg.ty, &source)
    }

    /// High-level → native conversion of the value bound to `source`.
    pub fn h_to_f_value(&self, ty: &NativeType, source: &str) -> Result<Conversion> {
        self.h_to_f_into(ty, source, &format!("{source}'"))
    }

    /// High-level → native conversion of the value bound to `source`,
    /// binding the result to `dest`.
    pub fn h_to_f_into(&self, ty: &NativeType, source: &str, dest: &str) -> Result<Conversion> {
        let rule = self.select_rule(ty)?;
        let dest = dest.to_string();
        let step = match &rule {
            Rule::Identity => return Ok(Conversion::identity(source)),
            Rule::Enumeration => Step::new(
                StepKind::Pure,
                dest,
                format!("fromIntegral (fromEnum {source})"),
            ),
            Rule::Flags => Step::new(StepKind::Pure, dest, format!("fromIntegral {source}")),
            Rule::PointerUnwrap { wrapper } => Step {
                kind: StepKind::Pure,
                binding: dest,
                pattern: Some(wrapper.clone()),
                expr: source.to_string(),
            },
            Rule::Primitive(entry) => Step::new(
                entry.to_native_kind,
                dest,
                format!("{} {source}", entry.to_native),
            ),
        };
        Ok(Conversion::single(rule, step))
    }

    /// Native → high-level conversion of the value bound to `source`,
    /// binding the result to `dest`.
    pub fn f_to_h(&self, ty: &NativeType, source: &str, dest: &str) -> Result<Conversion> {
        let rule = self.select_rule(ty)?;
        let dest = dest.to_string();
        let step = match &rule {
            Rule::Identity => return Ok(Conversion::identity(source)),
            Rule::Enumeration => Step::new(
                StepKind::Pure,
                dest,
                format!("toEnum (fromIntegral {source})"),
            ),
            Rule::Flags => Step::new(StepKind::Pure, dest, format!("fromIntegral {source}")),
            Rule::PointerUnwrap { wrapper } => {
                Step::new(StepKind::Pure, dest, format!("{wrapper} {source}"))
            }
            Rule::Primitive(entry) => Step::new(
                entry.to_high_kind,
                dest,
                format!("{} {source}", entry.to_high),
            ),
        };
        Ok(Conversion::single(rule, step))
    }
}
