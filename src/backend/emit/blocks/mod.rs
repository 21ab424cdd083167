//! Emission blocks.
//!
//! A block wraps exactly one node of the resolved program and renders it through the shared
//! [`EmissionContext`]. Blocks are created while walking the model, rendered immediately and dropped.
//!
//! The variant sets are closed: [`TypeBlock`] and [`MemberBlock`] carry one variant per declaration kind, and
//! [`StatementBlock`] / [`ExpressionBlock`] dispatch exhaustively over the model's statement and expression kinds.
//! Adding a construct means adding a variant, which the compiler then forces every renderer to handle.
//!
//! ## See also
//! - [`types`]: `Bridge.define` registration of one type
//! - [`members`]: object-literal entries for fields, properties, methods and constructors
//! - [`statements`]: statement rendering
//! - [`expressions`]: expression rendering

mod expressions;
mod members;
mod statements;
mod types;

pub use expressions::ExpressionBlock;
pub use members::{MemberBlock, MemberSite, member_sites};
pub use statements::StatementBlock;
pub use types::TypeBlock;

use bridgejs_model::Stmt;

use super::context::EmissionContext;
use super::errors::EmissionFault;

/// Render one construct into the active buffer.
///
/// Implementations must leave indentation and scoped context state as they found them.
pub trait Emit {
    fn emit(&self, ctx: &mut EmissionContext<'_>) -> Result<(), EmissionFault>;
}

/// Render statements in source order.
pub(crate) fn emit_statements(ctx: &mut EmissionContext<'_>, body: &[Stmt]) -> Result<(), EmissionFault> {
    for stmt in body {
        StatementBlock(stmt).emit(ctx)?;
    }
    Ok(())
}

/// Render `function (a, b) {` ... `}` with its own temporary scope; `body` writes the statements.
///
/// The closing brace is left open on its line so callers can follow it with `,` `;` or `)`.
pub(crate) fn emit_function(
    ctx: &mut EmissionContext<'_>,
    params: &[String],
    body: impl FnOnce(&mut EmissionContext<'_>) -> Result<(), EmissionFault>,
) -> Result<(), EmissionFault> {
    ctx.write(&format!("function ({}) {{", params.join(", ")));
    ctx.newline();
    ctx.indented(|ctx| ctx.function_body(body))?;
    ctx.write("}");
    Ok(())
}

/// Render comma-separated object-literal entries between braces.
pub(crate) fn emit_object<E: Emit>(ctx: &mut EmissionContext<'_>, entries: &[E]) -> Result<(), EmissionFault> {
    if entries.is_empty() {
        ctx.write("{ }");
        return Ok(());
    }
    ctx.write("{");
    ctx.newline();
    ctx.indented(|ctx| {
        for (i, entry) in entries.iter().enumerate() {
            if i > 0 {
                ctx.write(",");
                ctx.newline();
            }
            entry.emit(ctx)?;
        }
        ctx.newline();
        Ok(())
    })?;
    ctx.write("}");
    Ok(())
}
