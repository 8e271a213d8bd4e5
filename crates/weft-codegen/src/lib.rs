//! Identifier resolution, type mapping and marshalling for weft.
//!
//! Turns the language-neutral API model of `weft-core` into Haskell
//! binding fragments: a `foreign import` per native function and a wrapper
//! that converts every argument across the native boundary.
//!
//! ## Modules
//!
//! - [`ident`] — Namespaced names to Haskell identifiers
//! - [`types`] — Native and high-level type representations
//! - [`marshal`] — Conversion rules and step derivation
//! - [`callable`] — Foreign declaration and wrapper emission
//! - [`constant`] — Constant declaration emission
//! - [`generate`] — Module-level driver

pub mod callable;
pub mod constant;
pub mod context;
pub mod error;
pub mod generate;
pub mod ident;
pub mod marshal;
pub mod types;

// Re-export key types for convenience
pub use callable::{emit_callable, CallableFragments};
pub use constant::{emit_constant, ConstantFragment};
pub use context::Context;
pub use error::CodegenError;
pub use generate::{generate_module, GeneratedModule};
pub use ident::{resolve, Style};
pub use marshal::{Conversion, Marshaller, Rule};
pub use types::{Repr, TypeMapper};
