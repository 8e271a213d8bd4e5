//! Callable emission: foreign import plus a marshalling wrapper.
//!
//! For `Foo.bar_baz(flag: boolean, out count: int32)` the emitter produces
//!
//! ```text
//! foreign import ccall safe "foo_bar_baz" c_fooBarBaz :: CInt -> Ptr Int32 -> IO ()
//!
//! fooBarBaz :: Bool -> IO (Int32)
//! fooBarBaz flag = do
//!   let flag' = (fromIntegral . fromEnum) flag
//!   alloca $ \countPtr -> do
//!     c_fooBarBaz flag' countPtr
//!     count <- peek countPtr
//!     return (count)
//! ```

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;
use weft_core::{Callable, Direction, QualifiedName};

use crate::context::Context;
use crate::error::Result;
use crate::ident::{self, Style};
use crate::marshal::{Conversion, Marshaller, StepKind};
use crate::types::{Repr, TypeMapper};

/// The `foreign import` declaration of a native symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForeignDecl {
    pub symbol: String,
    pub name: String,
    pub params: Vec<Repr>,
    /// Native return representation, without the `IO`.
    pub result: Repr,
}

impl fmt::Display for ForeignDecl {
    // `safe` imports may block; the runtime moves them off its scheduler.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "foreign import ccall safe \"{}\" {} ::", self.symbol, self.name)?;
        for param in &self.params {
            write!(f, " {param} ->")?;
        }
        write!(f, " {}", Repr::io(self.result.clone()))
    }
}

/// A high-level wrapper parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Param {
    pub name: String,
    pub repr: Repr,
}

/// The wrapper callable exposed by the bindings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Wrapper {
    pub name: String,
    pub params: Vec<Param>,
    /// Aggregate result type, without the `IO`.
    pub result: Repr,
    /// Body lines, already indented relative to the definition.
    pub body: Vec<String>,
    /// The native result is a pointer whose ownership is not tracked.
    pub unmanaged_result: bool,
}

impl fmt::Display for Wrapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.unmanaged_result {
            writeln!(
                f,
                "-- | Unmanaged: ownership of the native result is not tracked."
            )?;
        }
        write!(f, "{} ::", self.name)?;
        for param in &self.params {
            write!(f, " {} ->", param.repr)?;
        }
        writeln!(f, " {}", Repr::io(self.result.clone()))?;
        write!(f, "{}", self.name)?;
        for param in &self.params {
            write!(f, " {}", param.name)?;
        }
        write!(f, " = do")?;
        for line in &self.body {
            write!(f, "\n  {line}")?;
        }
        Ok(())
    }
}

/// Both fragments emitted for one callable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallableFragments {
    pub foreign: ForeignDecl,
    pub wrapper: Wrapper,
}

/// Straight-line `do` block under construction.
#[derive(Debug, Default)]
struct Body {
    lines: Vec<String>,
    depth: usize,
}

impl Body {
    fn line(&mut self, text: String) {
        self.lines.push(format!("{}{text}", "  ".repeat(self.depth)));
    }

    /// Emit a line that opens a nested `do` block.
    fn open(&mut self, text: String) {
        self.line(text);
        self.depth += 1;
    }

    fn conversion(&mut self, conversion: &Conversion) {
        for step in &conversion.steps {
            if step.kind == StepKind::Scoped {
                self.open(step.render());
            } else {
                self.line(step.render());
            }
        }
    }
}

/// An argument whose value the wrapper reads back after the call.
struct OutputSlot<'c> {
    ty: &'c weft_core::NativeType,
    pointer: String,
    peeked: String,
}

/// Emit the foreign declaration and wrapper for a callable.
///
/// `name` determines the wrapper's identifier; `symbol` is the C symbol.
pub fn emit_callable(
    ctx: &Context<'_>,
    name: &QualifiedName,
    symbol: &str,
    callable: &Callable,
) -> Result<CallableFragments> {
    let types = TypeMapper::new(*ctx);
    let marshal = Marshaller::new(types);

    let wrapper_name = ident::resolve(name, Style::Value, ctx.config)?;
    let foreign_name = format!("c_{wrapper_name}");

    let mut native_params = Vec::with_capacity(callable.args.len());
    let mut params = Vec::new();
    let mut actuals = Vec::with_capacity(callable.args.len());
    let mut outputs = Vec::with_capacity(callable.outputs().count());
    let mut body = Body::default();

    // Every name bound in the body, parameters first, so no binding shadows
    // another.
    let mut used = HashSet::from([wrapper_name.clone(), foreign_name.clone()]);
    let mut locals = Vec::with_capacity(callable.args.len());
    for arg in &callable.args {
        let local = ident::local_name(&arg.name)?;
        if arg.direction.is_input() {
            locals.push(ident::fresh(&local, &mut used));
        } else {
            locals.push(local);
        }
    }
    let result_name = ident::fresh("result", &mut used);

    for (arg, local) in callable.args.iter().zip(&locals) {
        native_params.push(types.arg_native_repr(arg)?);

        if arg.direction.is_input() {
            params.push(Param {
                name: local.clone(),
                repr: types.high_repr(&arg.ty)?,
            });
        }

        match arg.direction {
            Direction::In => {
                let dest = ident::fresh(&format!("{local}'"), &mut used);
                let conversion = marshal.h_to_f_into(&arg.ty, local, &dest)?;
                body.conversion(&conversion);
                actuals.push(conversion.result);
            }
            Direction::Out | Direction::InOut => {
                if arg.direction == Direction::InOut {
                    // The caller's value is written before the call.
                    let dest = ident::fresh(&format!("{local}'"), &mut used);
                    let conversion = marshal.h_to_f_into(&arg.ty, local, &dest)?;
                    body.conversion(&conversion);
                    let pointer = ident::fresh(&format!("{local}Ptr"), &mut used);
                    body.open(format!("alloca $ \\{pointer} -> do"));
                    body.line(format!("poke {pointer} {}", conversion.result));
                    actuals.push(pointer.clone());
                    outputs.push(OutputSlot {
                        ty: &arg.ty,
                        pointer,
                        peeked: format!("{local}Out"),
                    });
                } else {
                    let pointer = ident::fresh(&format!("{local}Ptr"), &mut used);
                    body.open(format!("alloca $ \\{pointer} -> do"));
                    actuals.push(pointer.clone());
                    outputs.push(OutputSlot {
                        ty: &arg.ty,
                        pointer,
                        peeked: local.clone(),
                    });
                }
            }
        }
    }

    let native_result = types.native_repr(&callable.return_type)?;
    let call = std::iter::once(foreign_name.clone())
        .chain(actuals)
        .collect::<Vec<_>>()
        .join(" ");
    let has_result = !callable.return_type.is_none();
    if has_result {
        body.line(format!("{result_name} <- {call}"));
    } else {
        body.line(call);
    }

    let null_literal = native_result.null_literal().filter(|_| callable.nullable && has_result);
    if let Some(null) = null_literal {
        body.line(format!("if {result_name} == {null}"));
        body.line("  then return Nothing".to_string());
        body.open("  else do".to_string());
        body.depth += 1;
    }

    let mut returned: Option<(String, Repr)> = None;
    if has_result {
        let dest = ident::fresh(&format!("{result_name}'"), &mut used);
        let conversion = marshal.f_to_h(&callable.return_type, &result_name, &dest)?;
        body.conversion(&conversion);
        returned = Some((conversion.result, types.high_repr(&callable.return_type)?));
    }

    let mut out_values = Vec::with_capacity(outputs.len());
    for slot in &outputs {
        let peeked = ident::fresh(&slot.peeked, &mut used);
        body.line(format!("{peeked} <- peek {}", slot.pointer));
        let dest = ident::fresh(&format!("{peeked}'"), &mut used);
        let conversion = marshal.f_to_h(slot.ty, &peeked, &dest)?;
        body.conversion(&conversion);
        out_values.push((conversion.result, types.high_repr(slot.ty)?));
    }

    let (value, mut result) = aggregate(returned, out_values);
    let value = if callable.nullable {
        result = Repr::maybe(result);
        format!("(Just {value})")
    } else {
        value
    };
    body.line(format!("return {value}"));

    let unmanaged_result = has_result && native_result.is_pointer();
    if unmanaged_result {
        log::warn!(
            "{name}: native result {native_result} is an unmanaged handle; ownership is not tracked"
        );
    }

    Ok(CallableFragments {
        foreign: ForeignDecl {
            symbol: symbol.to_string(),
            name: foreign_name,
            params: native_params,
            result: native_result,
        },
        wrapper: Wrapper {
            name: wrapper_name,
            params,
            result,
            body: body.lines,
            unmanaged_result,
        },
    })
}

/// Combine the converted return value and output values into the
/// wrapper's result expression and type.
///
/// | return | outputs | result            |
/// |--------|---------|-------------------|
/// | unit   | 0       | `()`              |
/// | unit   | n > 0   | `(o1, …, on)`     |
/// | value  | 0       | `v`               |
/// | value  | n > 0   | `(v, o1, …, on)`  |
fn aggregate(returned: Option<(String, Repr)>, outputs: Vec<(String, Repr)>) -> (String, Repr) {
    match (returned, outputs.is_empty()) {
        (None, true) => ("()".to_string(), Repr::unit()),
        (Some((value, repr)), true) => (value, repr),
        (returned, false) => {
            let elements: Vec<(String, Repr)> = returned.into_iter().chain(outputs).collect();
            let names: Vec<String> = elements.iter().map(|(n, _)| n.clone()).collect();
            let reprs = elements.into_iter().map(|(_, r)| r).collect();
            (format!("({})", names.join(", ")), Repr::tuple(reprs))
        }
    }
}
