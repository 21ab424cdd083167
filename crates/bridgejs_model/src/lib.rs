//! Resolved program model for the bridgejs emitter.
//!
//! This crate defines the fully resolved, type-checked representation of a source program that the semantic
//! resolution engine hands to emission. Every name in the model already points at its declaration: member accesses
//! carry a [`SymbolRef`] naming the declaring type, invocations of overloaded members carry the overload ordinal, and
//! expressions carry their resolved static type where the engine knows it.
//!
//! ## Notes
//!
//! - The model is read-only for the emitter. Nothing in `bridgejs` mutates a [`ResolvedProgram`].
//! - All collections are `Vec`s in declaration/source order. Emission relies on that order being stable.
//! - The model is `serde`-serialisable so an out-of-process resolution engine can hand it over as JSON.

mod body;
mod program;

pub use body::{
    BinaryOp, CatchClause, ConstructorInitializer, Expr, ExprKind, InitializerTarget, Literal, Stmt, StmtKind,
    SwitchSection, UnaryOp,
};
pub use program::{
    Accessibility, Member, MemberKind, Param, ResolvedProgram, SymbolKind, SymbolRef, TypeDecl, TypeKind, TypeRef,
};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Source position of a model node (1-based line and column).
///
/// The file is tracked once per type declaration ([`TypeDecl::source_file`]); spans only carry the position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Span {
    #[serde(default)]
    pub line: u32,
    #[serde(default)]
    pub column: u32,
}

impl Span {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}
