//! Statement rendering.
//!
//! Every statement writes whole lines. Compound statements indent their bodies through the context so nesting is
//! always restored, and `foreach`/`catch` lowering allocates its synthesized names from the enclosing function
//! scope.

use bridgejs_core::lang::{conventions, keywords, types};
use bridgejs_model::{CatchClause, Expr, Stmt, StmtKind, SwitchSection};

use super::expressions::{emit_statement_expression, is_omitted_call};
use super::{Emit, ExpressionBlock, emit_statements};
use crate::backend::emit::context::EmissionContext;
use crate::backend::emit::errors::EmissionFault;

type EmitResult = Result<(), EmissionFault>;

const EXCEPTION_TYPE: &str = "System.Exception";

/// Renders one statement.
pub struct StatementBlock<'m>(pub &'m Stmt);

impl Emit for StatementBlock<'_> {
    fn emit(&self, ctx: &mut EmissionContext<'_>) -> EmitResult {
        let stmt = self.0;
        ctx.at_span(stmt.span, |ctx| match &stmt.kind {
            StmtKind::Expression(expr) => {
                if is_omitted_call(ctx, expr) {
                    tracing::debug!(construct = %ctx.construct(), "dropping call to conditional member");
                    return Ok(());
                }
                emit_statement_expression(ctx, expr)?;
                ctx.writeln(";");
                Ok(())
            }
            StmtKind::VariableDeclaration { name, initializer, .. } => {
                ctx.write(&format!("var {}", keywords::escape_identifier(name)));
                if let Some(init) = initializer {
                    ctx.write(" = ");
                    expr(ctx, init)?;
                }
                ctx.writeln(";");
                Ok(())
            }
            StmtKind::Return(value) => {
                ctx.write("return");
                if let Some(value) = value {
                    ctx.write(" ");
                    expr(ctx, value)?;
                }
                ctx.writeln(";");
                Ok(())
            }
            StmtKind::If {
                condition,
                then_branch,
                else_branch,
            } => emit_if(ctx, condition, then_branch, else_branch.as_deref()),
            StmtKind::While { condition, body } => {
                ctx.write("while (");
                expr(ctx, condition)?;
                ctx.writeln(") {");
                block(ctx, body)?;
                ctx.writeln("}");
                Ok(())
            }
            StmtKind::DoWhile { body, condition } => {
                ctx.writeln("do {");
                block(ctx, body)?;
                ctx.write("} while (");
                expr(ctx, condition)?;
                ctx.writeln(");");
                Ok(())
            }
            StmtKind::For {
                initializers,
                condition,
                iterators,
                body,
            } => emit_for(ctx, initializers, condition.as_ref(), iterators, body),
            StmtKind::ForEach {
                variable,
                collection,
                body,
                ..
            } => emit_foreach(ctx, variable, collection, body),
            StmtKind::Break => {
                ctx.writeln("break;");
                Ok(())
            }
            StmtKind::Continue => {
                ctx.writeln("continue;");
                Ok(())
            }
            StmtKind::Block(body) => {
                ctx.writeln("{");
                block(ctx, body)?;
                ctx.writeln("}");
                Ok(())
            }
            StmtKind::Throw(Some(value)) => {
                ctx.write("throw ");
                expr(ctx, value)?;
                ctx.writeln(";");
                Ok(())
            }
            StmtKind::Throw(None) => match ctx.current_catch() {
                Some(binding) => {
                    let line = format!("throw {};", binding);
                    ctx.writeln(&line);
                    Ok(())
                }
                None => Err(ctx.fault("rethrow outside of a catch clause")),
            },
            StmtKind::Try { body, catches, finally } => emit_try(ctx, body, catches, finally.as_deref()),
            StmtKind::Switch { subject, sections } => emit_switch(ctx, subject, sections),
            StmtKind::Goto(label) => Err(ctx.fault(format!("goto `{}` has no JavaScript equivalent", label))),
        })
    }
}

fn expr(ctx: &mut EmissionContext<'_>, e: &Expr) -> EmitResult {
    ExpressionBlock(e).emit(ctx)
}

fn block(ctx: &mut EmissionContext<'_>, body: &[Stmt]) -> EmitResult {
    ctx.indented(|ctx| emit_statements(ctx, body))
}

fn emit_if(ctx: &mut EmissionContext<'_>, condition: &Expr, then_branch: &[Stmt], else_branch: Option<&[Stmt]>) -> EmitResult {
    ctx.write("if (");
    expr(ctx, condition)?;
    ctx.writeln(") {");
    block(ctx, then_branch)?;
    match else_branch {
        None => {
            ctx.writeln("}");
            Ok(())
        }
        Some([nested @ Stmt { kind: StmtKind::If { .. }, .. }]) => {
            ctx.write("} else ");
            StatementBlock(nested).emit(ctx)
        }
        Some(body) => {
            ctx.writeln("} else {");
            block(ctx, body)?;
            ctx.writeln("}");
            Ok(())
        }
    }
}

fn emit_for(
    ctx: &mut EmissionContext<'_>,
    initializers: &[Stmt],
    condition: Option<&Expr>,
    iterators: &[Expr],
    body: &[Stmt],
) -> EmitResult {
    ctx.write("for (");
    let declares = initializers
        .iter()
        .all(|s| matches!(s.kind, StmtKind::VariableDeclaration { .. }));
    if declares && !initializers.is_empty() {
        ctx.write("var ");
    }
    for (i, init) in initializers.iter().enumerate() {
        if i > 0 {
            ctx.write(", ");
        }
        match &init.kind {
            StmtKind::VariableDeclaration { name, initializer, .. } if declares => {
                ctx.write(&keywords::escape_identifier(name));
                if let Some(value) = initializer {
                    ctx.write(" = ");
                    expr(ctx, value)?;
                }
            }
            StmtKind::Expression(e) if !declares => expr(ctx, e)?,
            _ => return Err(ctx.at_span(init.span, |ctx| ctx.fault("for-loop initializers mix declarations and expressions"))),
        }
    }
    ctx.write("; ");
    if let Some(condition) = condition {
        expr(ctx, condition)?;
    }
    ctx.write("; ");
    for (i, iterator) in iterators.iter().enumerate() {
        if i > 0 {
            ctx.write(", ");
        }
        emit_statement_expression(ctx, iterator)?;
    }
    ctx.writeln(") {");
    block(ctx, body)?;
    ctx.writeln("}");
    Ok(())
}

fn emit_foreach(ctx: &mut EmissionContext<'_>, variable: &str, collection: &Expr, body: &[Stmt]) -> EmitResult {
    let enumerator = ctx.alloc_temp("t");
    ctx.write(&format!("{} = {}(", enumerator, conventions::GET_ENUMERATOR));
    expr(ctx, collection)?;
    ctx.writeln(");");
    ctx.writeln(&format!("while ({}.{}()) {{", enumerator, conventions::MOVE_NEXT));
    ctx.indented(|ctx| {
        ctx.writeln(&format!(
            "var {} = {}.{}();",
            keywords::escape_identifier(variable),
            enumerator,
            conventions::GET_CURRENT
        ));
        emit_statements(ctx, body)
    })?;
    ctx.writeln("}");
    Ok(())
}

fn is_catch_all(clause: &CatchClause) -> bool {
    clause.ty.as_ref().is_none_or(|t| t.name() == EXCEPTION_TYPE)
}

fn emit_try(ctx: &mut EmissionContext<'_>, body: &[Stmt], catches: &[CatchClause], finally: Option<&[Stmt]>) -> EmitResult {
    ctx.writeln("try {");
    block(ctx, body)?;

    match catches {
        [] => {}
        [only] if is_catch_all(only) => {
            let binding = match &only.variable {
                Some(name) => keywords::escape_identifier(name),
                None => ctx.alloc_binding("e"),
            };
            ctx.writeln(&format!("}} catch ({}) {{", binding));
            ctx.in_catch(&binding, |ctx| block(ctx, &only.body))?;
        }
        _ => {
            let binding = ctx.alloc_binding("e");
            ctx.writeln(&format!("}} catch ({}) {{", binding));
            ctx.indented(|ctx| ctx.in_catch(&binding, |ctx| emit_catch_chain(ctx, &binding, catches)))?;
        }
    }

    if let Some(finally) = finally {
        ctx.writeln("} finally {");
        block(ctx, finally)?;
    }
    ctx.writeln("}");
    Ok(())
}

/// Dispatch on the caught value's type: one `if` per typed clause, the catch-all (or a rethrow) last.
fn emit_catch_chain(ctx: &mut EmissionContext<'_>, binding: &str, catches: &[CatchClause]) -> EmitResult {
    let mut handled_all = false;
    for (i, clause) in catches.iter().enumerate() {
        let opener = if i == 0 { "" } else { "} else " };
        if is_catch_all(clause) {
            if i == 0 {
                ctx.writeln("{");
            } else {
                ctx.writeln("} else {");
            }
            handled_all = true;
        } else {
            let ty = clause.ty.as_ref().map(|t| types::js_type_expr(t.name())).unwrap_or_default();
            ctx.writeln(&format!("{}if ({}({}, {})) {{", opener, conventions::IS, binding, ty));
        }
        ctx.indented(|ctx| {
            if let Some(variable) = &clause.variable {
                ctx.writeln(&format!("var {} = {};", keywords::escape_identifier(variable), binding));
            }
            emit_statements(ctx, &clause.body)
        })?;
        if handled_all {
            break;
        }
    }
    if !handled_all {
        ctx.writeln("} else {");
        ctx.indented(|ctx| ctx.writeln(&format!("throw {};", binding)));
    }
    ctx.writeln("}");
    Ok(())
}

fn emit_switch(ctx: &mut EmissionContext<'_>, subject: &Expr, sections: &[SwitchSection]) -> EmitResult {
    ctx.write("switch (");
    expr(ctx, subject)?;
    ctx.writeln(") {");
    ctx.indented(|ctx| {
        for section in sections {
            for label in &section.labels {
                match label {
                    Some(value) => {
                        ctx.write("case ");
                        expr(ctx, value)?;
                        ctx.writeln(":");
                    }
                    None => ctx.writeln("default:"),
                }
            }
            block(ctx, &section.body)?;
        }
        Ok(())
    })?;
    ctx.writeln("}");
    Ok(())
}
