//! Expression rendering.
//!
//! Expressions are written inline at the writer's current position. Lambdas are the only expressions that span
//! lines; their bodies indent relative to the line the expression started on.

use bridgejs_core::lang::operators::{self, OperatorId};
use bridgejs_core::lang::types::{self, NumericKind};
use bridgejs_core::lang::{conventions, intrinsics, keywords};
use bridgejs_model::{BinaryOp, Expr, ExprKind, Literal, SymbolKind, SymbolRef, TypeRef, UnaryOp};

use super::members::{getter_name, setter_name};
use super::{Emit, emit_function, emit_statements};
use crate::backend::emit::context::{EmissionContext, with_ordinal};
use crate::backend::emit::errors::EmissionFault;

type EmitResult = Result<(), EmissionFault>;

/// Renders one expression.
pub struct ExpressionBlock<'m>(pub &'m Expr);

impl Emit for ExpressionBlock<'_> {
    fn emit(&self, ctx: &mut EmissionContext<'_>) -> EmitResult {
        let expr = self.0;
        ctx.at_span(expr.span, |ctx| match &expr.kind {
            ExprKind::Literal(lit) => {
                let text = literal(ctx, lit)?;
                ctx.write(&text);
                Ok(())
            }
            ExprKind::Name(name) => {
                ctx.write(&keywords::escape_identifier(name));
                Ok(())
            }
            ExprKind::This => {
                ctx.write("this");
                Ok(())
            }
            ExprKind::Base => Err(ctx.fault("`base` can only be used to access a member")),
            ExprKind::MemberAccess { target, symbol } => emit_member_access(ctx, target.as_deref(), symbol),
            ExprKind::Invocation { callee, args } => emit_invocation(ctx, callee, args),
            ExprKind::New { ty, constructor, args } => {
                ctx.write("new ");
                ctx.write(&types::js_type_expr(ty.name()));
                if *constructor > 0 {
                    ctx.write(".");
                    ctx.write(&with_ordinal(conventions::CONSTRUCTOR_KEY.to_string(), *constructor));
                }
                ctx.write("(");
                emit_args(ctx, args)?;
                ctx.write(")");
                Ok(())
            }
            ExprKind::Binary { op, left, right } => {
                let integral = is_binary_integral(expr, left, right);
                let min = combined_precedence(*op, integral).unwrap_or(0);
                let left = |ctx: &mut EmissionContext<'_>| emit_operand(ctx, left, min);
                emit_combined(ctx, *op, integral, &left, &Operand::Expr(right.as_ref()))
            }
            ExprKind::Unary { op, operand } => emit_unary(ctx, *op, operand),
            ExprKind::Assignment { op, target, value } => {
                emit_assignment(ctx, *op, target, &Operand::Expr(value.as_ref()))
            }
            ExprKind::Conditional {
                condition,
                when_true,
                when_false,
            } => {
                emit_operand(ctx, condition, operators::COALESCE_PRECEDENCE)?;
                ctx.write(" ? ");
                emit_operand(ctx, when_true, operators::ASSIGNMENT_PRECEDENCE)?;
                ctx.write(" : ");
                emit_operand(ctx, when_false, operators::ASSIGNMENT_PRECEDENCE)
            }
            ExprKind::Index { target, index } => {
                emit_operand(ctx, target, operators::CALL_PRECEDENCE)?;
                ctx.write("[");
                sub(ctx, index)?;
                ctx.write("]");
                Ok(())
            }
            ExprKind::ArrayLiteral { elements, .. } => {
                ctx.write("[");
                emit_args(ctx, elements)?;
                ctx.write("]");
                Ok(())
            }
            ExprKind::Lambda { params, body } => {
                let params: Vec<String> = params.iter().map(|p| keywords::escape_identifier(p)).collect();
                emit_function(ctx, &params, |ctx| emit_statements(ctx, body))
            }
            ExprKind::Cast { ty, expr: inner } => emit_cast(ctx, ty, inner),
            ExprKind::Is { expr: inner, ty } => emit_type_check(ctx, conventions::IS, inner, ty),
            ExprKind::As { expr: inner, ty } => emit_type_check(ctx, conventions::AS, inner, ty),
            ExprKind::TypeOf(ty) => {
                ctx.write(&types::js_type_expr(ty.name()));
                Ok(())
            }
            ExprKind::Default(ty) => {
                match types::default_literal(ty.name()) {
                    Some(lit) => ctx.write(lit),
                    None => ctx.write(&format!(
                        "{}({})",
                        conventions::GET_DEFAULT_VALUE,
                        types::js_type_expr(ty.name())
                    )),
                }
                Ok(())
            }
            ExprKind::Parenthesized(inner) => {
                ctx.write("(");
                sub(ctx, inner)?;
                ctx.write(")");
                Ok(())
            }
        })
    }
}

fn sub(ctx: &mut EmissionContext<'_>, expr: &Expr) -> EmitResult {
    ExpressionBlock(expr).emit(ctx)
}

/// Write `expr`, parenthesized when it binds looser than `min`.
fn emit_operand(ctx: &mut EmissionContext<'_>, expr: &Expr, min: u8) -> EmitResult {
    if precedence_of(expr) >= min {
        return sub(ctx, expr);
    }
    ctx.write("(");
    sub(ctx, expr)?;
    ctx.write(")");
    Ok(())
}

/// Precedence of the JavaScript an expression renders to.
fn precedence_of(expr: &Expr) -> u8 {
    match &expr.kind {
        ExprKind::Literal(Literal::Int(i)) if *i < 0 => PREFIX_PRECEDENCE,
        ExprKind::Literal(Literal::Float(f)) if f.is_sign_negative() && !f.is_nan() => PREFIX_PRECEDENCE,
        ExprKind::Literal(_)
        | ExprKind::Name(_)
        | ExprKind::This
        | ExprKind::Base
        | ExprKind::ArrayLiteral { .. }
        | ExprKind::TypeOf(_)
        | ExprKind::Parenthesized(_) => operators::PRIMARY_PRECEDENCE,
        ExprKind::MemberAccess { .. }
        | ExprKind::Invocation { .. }
        | ExprKind::New { .. }
        | ExprKind::Index { .. }
        | ExprKind::Is { .. }
        | ExprKind::As { .. }
        | ExprKind::Default(_) => operators::CALL_PRECEDENCE,
        ExprKind::Cast { ty, expr: inner } if is_transparent_cast(ty, inner) => precedence_of(inner),
        ExprKind::Cast { .. } => operators::CALL_PRECEDENCE,
        ExprKind::Binary { op, left, right } => {
            combined_precedence(*op, is_binary_integral(expr, left, right)).unwrap_or(operators::CALL_PRECEDENCE)
        }
        ExprKind::Unary { op, operand } => match op {
            // Lowered to a parenthesized sequence.
            _ if step_of(*op).is_some() && is_property_access(operand) => operators::PRIMARY_PRECEDENCE,
            UnaryOp::PostIncrement | UnaryOp::PostDecrement => POSTFIX_PRECEDENCE,
            _ => PREFIX_PRECEDENCE,
        },
        ExprKind::Assignment { target, .. } if is_property_access(target) => operators::CALL_PRECEDENCE,
        ExprKind::Assignment { .. } | ExprKind::Conditional { .. } | ExprKind::Lambda { .. } => {
            operators::ASSIGNMENT_PRECEDENCE
        }
    }
}

const PREFIX_PRECEDENCE: u8 = 140;
const POSTFIX_PRECEDENCE: u8 = 150;

fn is_binary_integral(expr: &Expr, left: &Expr, right: &Expr) -> bool {
    is_integral(expr.ty.as_ref()) || (is_integral(left.ty.as_ref()) && is_integral(right.ty.as_ref()))
}

fn emit_args(ctx: &mut EmissionContext<'_>, args: &[Expr]) -> EmitResult {
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            ctx.write(", ");
        }
        sub(ctx, arg)?;
    }
    Ok(())
}

fn literal(ctx: &EmissionContext<'_>, lit: &Literal) -> Result<String, EmissionFault> {
    Ok(match lit {
        Literal::Null => "null".to_string(),
        Literal::Bool(b) => b.to_string(),
        Literal::Int(i) => i.to_string(),
        Literal::Float(f) if f.is_nan() => "NaN".to_string(),
        Literal::Float(f) if f.is_infinite() => {
            if *f > 0.0 {
                "Infinity".to_string()
            } else {
                "-Infinity".to_string()
            }
        }
        Literal::Float(f) => f.to_string(),
        Literal::String(s) => serde_json::to_string(s).map_err(|e| ctx.fault(e.to_string()))?,
        Literal::Char(c) => (*c as u32).to_string(),
    })
}

fn is_integral(ty: Option<&TypeRef>) -> bool {
    ty.and_then(|t| types::numeric_kind(t.name())) == Some(NumericKind::Integral)
}

fn intrinsic(ctx: &EmissionContext<'_>, symbol: &SymbolRef) -> Option<&'static str> {
    let resolver = ctx.resolver();
    intrinsics::all()
        .find(|i| resolver.resolves_to(symbol, i.clr_member))
        .map(|i| i.js)
}

fn is_base(target: Option<&Expr>) -> bool {
    matches!(target.map(|t| &t.kind), Some(ExprKind::Base))
}

/// Write the receiver of a member access: the declaring type for static access, `this` for `base`.
fn emit_receiver(ctx: &mut EmissionContext<'_>, target: Option<&Expr>, symbol: &SymbolRef) -> EmitResult {
    match target {
        None => {
            ctx.write(&types::js_type_expr(&symbol.declaring_type));
            Ok(())
        }
        Some(Expr {
            kind: ExprKind::Base, ..
        }) => {
            ctx.write("this");
            Ok(())
        }
        Some(target) => emit_operand(ctx, target, operators::CALL_PRECEDENCE),
    }
}

fn prototype_of(symbol: &SymbolRef) -> String {
    format!("{}.prototype", types::js_type_expr(&symbol.declaring_type))
}

fn emit_member_access(ctx: &mut EmissionContext<'_>, target: Option<&Expr>, symbol: &SymbolRef) -> EmitResult {
    if let Some(js) = intrinsic(ctx, symbol) {
        ctx.write(js);
        return Ok(());
    }
    match symbol.kind {
        SymbolKind::Property => emit_property_get(ctx, target, symbol),
        SymbolKind::Method => {
            let name = ctx.overloaded_name(&symbol.name, symbol.overload);
            match target {
                Some(t) if !symbol.is_static => {
                    ctx.write(conventions::FN_BIND);
                    ctx.write("(");
                    if is_base(Some(t)) {
                        ctx.write(&format!("this, {}", prototype_of(symbol)));
                    } else if is_trivial_target(Some(t)) {
                        emit_receiver(ctx, Some(t), symbol)?;
                        ctx.write(", ");
                        emit_receiver(ctx, Some(t), symbol)?;
                    } else {
                        // The receiver is evaluated once into a temporary.
                        let temp = ctx.alloc_temp("t");
                        ctx.write(&format!("{} = ", temp));
                        sub(ctx, t)?;
                        ctx.write(&format!(", {}", temp));
                    }
                    ctx.write(&format!(".{})", name));
                    Ok(())
                }
                _ => {
                    emit_receiver(ctx, target, symbol)?;
                    ctx.write(&format!(".{}", name));
                    Ok(())
                }
            }
        }
        SymbolKind::Type => {
            ctx.write(&format!("{}.{}", types::js_type_expr(&symbol.declaring_type), symbol.name));
            Ok(())
        }
        SymbolKind::Field | SymbolKind::Constant | SymbolKind::EnumValue => {
            emit_receiver(ctx, target, symbol)?;
            ctx.write(&format!(".{}", ctx.member_name(&symbol.name)));
            Ok(())
        }
    }
}

fn emit_property_get(ctx: &mut EmissionContext<'_>, target: Option<&Expr>, symbol: &SymbolRef) -> EmitResult {
    if is_base(target) {
        ctx.write(&format!("{}.{}.call(this)", prototype_of(symbol), getter_name(&symbol.name)));
        return Ok(());
    }
    emit_receiver(ctx, target, symbol)?;
    ctx.write(&format!(".{}()", getter_name(&symbol.name)));
    Ok(())
}

fn emit_invocation(ctx: &mut EmissionContext<'_>, callee: &Expr, args: &[Expr]) -> EmitResult {
    if let ExprKind::MemberAccess { target, symbol } = &callee.kind {
        if symbol.kind == SymbolKind::Method {
            let target = target.as_deref();
            if let Some(js) = intrinsic(ctx, symbol) {
                ctx.write(js);
            } else if is_base(target) {
                let name = ctx.overloaded_name(&symbol.name, symbol.overload);
                ctx.write(&format!("{}.{}.call(this", prototype_of(symbol), name));
                for arg in args {
                    ctx.write(", ");
                    sub(ctx, arg)?;
                }
                ctx.write(")");
                return Ok(());
            } else {
                let name = ctx.overloaded_name(&symbol.name, symbol.overload);
                emit_receiver(ctx, target, symbol)?;
                ctx.write(&format!(".{}", name));
            }
            ctx.write("(");
            emit_args(ctx, args)?;
            ctx.write(")");
            return Ok(());
        }
    }
    emit_operand(ctx, callee, operators::CALL_PRECEDENCE)?;
    ctx.write("(");
    emit_args(ctx, args)?;
    ctx.write(")");
    Ok(())
}

/// Whether an expression statement is a call to a conditional member whose symbols are all undefined.
pub(crate) fn is_omitted_call(ctx: &EmissionContext<'_>, expr: &Expr) -> bool {
    let ExprKind::Invocation { callee, .. } = &expr.kind else {
        return false;
    };
    let ExprKind::MemberAccess { symbol, .. } = &callee.kind else {
        return false;
    };
    match ctx.resolver().member(symbol) {
        Some(member) => !ctx.is_condition_defined(&member.conditional),
        None => false,
    }
}

fn binary_operator(op: BinaryOp) -> Option<OperatorId> {
    Some(match op {
        BinaryOp::Add => OperatorId::Plus,
        BinaryOp::Subtract => OperatorId::Minus,
        BinaryOp::Multiply => OperatorId::Star,
        BinaryOp::Divide => OperatorId::Slash,
        BinaryOp::Modulo => OperatorId::Percent,
        BinaryOp::Equal => OperatorId::StrictEq,
        BinaryOp::NotEqual => OperatorId::StrictNotEq,
        BinaryOp::Less => OperatorId::Lt,
        BinaryOp::LessEqual => OperatorId::LtEq,
        BinaryOp::Greater => OperatorId::Gt,
        BinaryOp::GreaterEqual => OperatorId::GtEq,
        BinaryOp::LogicalAnd => OperatorId::AndAnd,
        BinaryOp::LogicalOr => OperatorId::OrOr,
        BinaryOp::BitAnd => OperatorId::Amp,
        BinaryOp::BitOr => OperatorId::Pipe,
        BinaryOp::BitXor => OperatorId::Caret,
        BinaryOp::ShiftLeft => OperatorId::Shl,
        BinaryOp::ShiftRight => OperatorId::Shr,
        BinaryOp::NullCoalescing => return None,
    })
}

/// Right-hand operand of a combined operation: a model expression, or the implicit `1` of `++`/`--`.
enum Operand<'e> {
    Expr(&'e Expr),
    One,
}

impl Operand<'_> {
    fn emit(&self, ctx: &mut EmissionContext<'_>) -> EmitResult {
        self.emit_at(ctx, 0)
    }

    fn emit_at(&self, ctx: &mut EmissionContext<'_>, min: u8) -> EmitResult {
        match self {
            Operand::Expr(e) => emit_operand(ctx, e, min),
            Operand::One => {
                ctx.write("1");
                Ok(())
            }
        }
    }
}

type LeftWriter<'f> = &'f dyn Fn(&mut EmissionContext<'_>) -> EmitResult;

/// `left op right`, with runtime helpers for integer division and null coalescing.
fn emit_combined(
    ctx: &mut EmissionContext<'_>,
    op: BinaryOp,
    integral: bool,
    left: LeftWriter<'_>,
    right: &Operand<'_>,
) -> EmitResult {
    let helper = match op {
        BinaryOp::NullCoalescing => Some(conventions::COALESCE),
        BinaryOp::Divide if integral => Some(conventions::INT_DIV),
        _ => None,
    };
    if let Some(helper) = helper {
        ctx.write(helper);
        ctx.write("(");
        left(ctx)?;
        ctx.write(", ");
        right.emit(ctx)?;
        ctx.write(")");
        return Ok(());
    }
    let id = binary_operator(op).ok_or_else(|| ctx.fault(format!("operator {:?} has no JavaScript form", op)))?;
    left(ctx)?;
    ctx.write(&format!(" {} ", operators::as_str(id)));
    // Left-associative: an equal-precedence right operand keeps its grouping.
    right.emit_at(ctx, operators::precedence(id) + 1)
}

/// Precedence of `op` as rendered, or `None` when it becomes a runtime helper call.
fn combined_precedence(op: BinaryOp, integral: bool) -> Option<u8> {
    match op {
        BinaryOp::NullCoalescing => None,
        BinaryOp::Divide if integral => None,
        _ => binary_operator(op).map(operators::precedence),
    }
}

fn is_property_access(expr: &Expr) -> bool {
    matches!(&expr.kind, ExprKind::MemberAccess { symbol, .. } if symbol.kind == SymbolKind::Property)
}

fn emit_unary(ctx: &mut EmissionContext<'_>, op: UnaryOp, operand: &Expr) -> EmitResult {
    let (id, prefix) = match op {
        UnaryOp::Negate => (OperatorId::UnaryMinus, true),
        UnaryOp::Plus => (OperatorId::UnaryPlus, true),
        UnaryOp::Not => (OperatorId::Bang, true),
        UnaryOp::BitNot => (OperatorId::Tilde, true),
        UnaryOp::PreIncrement => (OperatorId::Increment, true),
        UnaryOp::PreDecrement => (OperatorId::Decrement, true),
        UnaryOp::PostIncrement => (OperatorId::Increment, false),
        UnaryOp::PostDecrement => (OperatorId::Decrement, false),
    };
    if let (Some(step), ExprKind::MemberAccess { target, symbol }) = (step_of(op), &operand.kind) {
        if symbol.kind == SymbolKind::Property {
            return emit_property_step(ctx, target.as_deref(), symbol, step, prefix);
        }
    }
    let spelling = operators::as_str(id);
    if prefix {
        ctx.write(spelling);
        if starts_with_sign(operand, spelling) {
            ctx.write(" ");
        }
        emit_operand(ctx, operand, PREFIX_PRECEDENCE)
    } else {
        emit_operand(ctx, operand, POSTFIX_PRECEDENCE)?;
        ctx.write(spelling);
        Ok(())
    }
}

/// Text of a receiver that [`is_trivial_target`] accepts, other than `base`.
fn trivial_receiver(receiver: Option<&Expr>, symbol: &SymbolRef) -> Option<String> {
    match receiver.map(|r| &r.kind) {
        None => Some(types::js_type_expr(&symbol.declaring_type)),
        Some(ExprKind::This) => Some("this".to_string()),
        Some(ExprKind::Name(name)) => Some(keywords::escape_identifier(name)),
        Some(_) => None,
    }
}

/// The arithmetic step of an increment or decrement.
fn step_of(op: UnaryOp) -> Option<BinaryOp> {
    match op {
        UnaryOp::PreIncrement | UnaryOp::PostIncrement => Some(BinaryOp::Add),
        UnaryOp::PreDecrement | UnaryOp::PostDecrement => Some(BinaryOp::Subtract),
        _ => None,
    }
}

/// `++`/`--` on a property used as a value, as a sequence yielding the old (postfix) or new (prefix) value.
///
/// Postfix: `($t = r.getX(), r.setX($t + 1), $t)`. Prefix: `($t = r.getX() + 1, r.setX($t), $t)`.
fn emit_property_step(
    ctx: &mut EmissionContext<'_>,
    receiver: Option<&Expr>,
    symbol: &SymbolRef,
    step: BinaryOp,
    prefix: bool,
) -> EmitResult {
    let sign = binary_operator(step)
        .map(operators::as_str)
        .ok_or_else(|| ctx.fault(format!("operator {:?} has no JavaScript form", step)))?;
    let getter = getter_name(&symbol.name);
    let setter = setter_name(&symbol.name);
    ctx.write("(");
    let (get, set) = if is_base(receiver) {
        let proto = prototype_of(symbol);
        (format!("{}.{}.call(this)", proto, getter), format!("{}.{}.call(this, ", proto, setter))
    } else if let Some(recv) = trivial_receiver(receiver, symbol) {
        (format!("{}.{}()", recv, getter), format!("{}.{}(", recv, setter))
    } else {
        let recv = ctx.alloc_temp("t");
        ctx.write(&format!("{} = ", recv));
        emit_receiver(ctx, receiver, symbol)?;
        ctx.write(", ");
        (format!("{}.{}()", recv, getter), format!("{}.{}(", recv, setter))
    };
    let value = ctx.alloc_temp("t");
    if prefix {
        ctx.write(&format!("{v} = {get} {sign} 1, {set}{v}), {v})", v = value, get = get, sign = sign, set = set));
    } else {
        ctx.write(&format!("{v} = {get}, {set}{v} {sign} 1), {v})", v = value, get = get, sign = sign, set = set));
    }
    Ok(())
}

/// Whether writing `operand` right after a `+`/`-` sign would fuse into `++`/`--`.
fn starts_with_sign(operand: &Expr, spelling: &str) -> bool {
    let sign = match spelling {
        "-" | "--" => '-',
        "+" | "++" => '+',
        _ => return false,
    };
    match &operand.kind {
        ExprKind::Unary { op, .. } => match op {
            UnaryOp::Negate | UnaryOp::PreDecrement => sign == '-',
            UnaryOp::Plus | UnaryOp::PreIncrement => sign == '+',
            _ => false,
        },
        ExprKind::Literal(Literal::Int(i)) => sign == '-' && *i < 0,
        ExprKind::Literal(Literal::Float(f)) => sign == '-' && f.is_sign_negative(),
        _ => false,
    }
}

fn is_assignable(expr: &Expr) -> bool {
    match &expr.kind {
        ExprKind::Name(_) | ExprKind::Index { .. } => true,
        ExprKind::MemberAccess { symbol, .. } => matches!(symbol.kind, SymbolKind::Field | SymbolKind::Property),
        ExprKind::Parenthesized(inner) => is_assignable(inner),
        _ => false,
    }
}

/// Targets that can be evaluated twice without observable effects.
fn is_trivial_target(target: Option<&Expr>) -> bool {
    match target {
        None => true,
        Some(t) => matches!(t.kind, ExprKind::This | ExprKind::Base | ExprKind::Name(_)),
    }
}

fn emit_assignment(ctx: &mut EmissionContext<'_>, op: Option<BinaryOp>, target: &Expr, value: &Operand<'_>) -> EmitResult {
    if !is_assignable(target) {
        return Err(ctx.fault("expression is not assignable"));
    }
    if let ExprKind::MemberAccess { target: receiver, symbol } = &target.kind {
        if symbol.kind == SymbolKind::Property {
            let integral = is_integral(target.ty.as_ref());
            return emit_property_assignment(ctx, receiver.as_deref(), symbol, op, integral, value);
        }
    }

    let Some(op) = op else {
        sub(ctx, target)?;
        ctx.write(" = ");
        return value.emit(ctx);
    };
    let integral = is_integral(target.ty.as_ref());
    if op == BinaryOp::NullCoalescing || (op == BinaryOp::Divide && integral) {
        sub(ctx, target)?;
        ctx.write(" = ");
        return emit_combined(ctx, op, integral, &|ctx: &mut EmissionContext<'_>| sub(ctx, target), value);
    }
    let compound = binary_operator(op)
        .and_then(operators::compound_assignment)
        .ok_or_else(|| ctx.fault(format!("operator {:?} has no compound assignment form", op)))?;
    sub(ctx, target)?;
    ctx.write(&format!(" {} ", operators::as_str(compound)));
    value.emit(ctx)
}

fn emit_property_assignment(
    ctx: &mut EmissionContext<'_>,
    receiver: Option<&Expr>,
    symbol: &SymbolRef,
    op: Option<BinaryOp>,
    integral: bool,
    value: &Operand<'_>,
) -> EmitResult {
    let setter = setter_name(&symbol.name);
    let getter = getter_name(&symbol.name);

    if is_base(receiver) {
        let proto = prototype_of(symbol);
        ctx.write(&format!("{}.{}.call(this, ", proto, setter));
        match op {
            None => value.emit(ctx)?,
            Some(op) => emit_combined(
                ctx,
                op,
                integral,
                &|ctx: &mut EmissionContext<'_>| {
                    ctx.write(&format!("{}.{}.call(this)", proto, getter));
                    Ok(())
                },
                value,
            )?,
        }
        ctx.write(")");
        return Ok(());
    }

    let Some(op) = op else {
        emit_receiver(ctx, receiver, symbol)?;
        ctx.write(&format!(".{}(", setter));
        value.emit(ctx)?;
        ctx.write(")");
        return Ok(());
    };

    if is_trivial_target(receiver) {
        emit_receiver(ctx, receiver, symbol)?;
        ctx.write(&format!(".{}(", setter));
        emit_combined(
            ctx,
            op,
            integral,
            &|ctx: &mut EmissionContext<'_>| {
                emit_receiver(ctx, receiver, symbol)?;
                ctx.write(&format!(".{}()", getter));
                Ok(())
            },
            value,
        )?;
        ctx.write(")");
        return Ok(());
    }

    // The receiver is evaluated once into a temporary.
    let temp = ctx.alloc_temp("t");
    ctx.write(&format!("({} = ", temp));
    emit_receiver(ctx, receiver, symbol)?;
    ctx.write(&format!(", {}.{}(", temp, setter));
    emit_combined(
        ctx,
        op,
        integral,
        &|ctx: &mut EmissionContext<'_>| {
            ctx.write(&format!("{}.{}()", temp, getter));
            Ok(())
        },
        value,
    )?;
    ctx.write("))");
    Ok(())
}

/// Render an expression in statement position (without the trailing `;`).
///
/// Increments and decrements of properties are only expressible here, as a get/set pair.
pub(crate) fn emit_statement_expression(ctx: &mut EmissionContext<'_>, expr: &Expr) -> EmitResult {
    if let ExprKind::Unary { op, operand } = &expr.kind {
        if is_property_access(operand) {
            if let Some(step) = step_of(*op) {
                return ctx.at_span(expr.span, |ctx| emit_assignment(ctx, Some(step), operand, &Operand::One));
            }
        }
    }
    sub(ctx, expr)
}

/// Casts that leave the operand as written: numeric to numeric (except float to integer) and identity.
fn is_transparent_cast(ty: &TypeRef, inner: &Expr) -> bool {
    let source = inner.ty.as_ref().map(TypeRef::name);
    match (source.and_then(types::numeric_kind), types::numeric_kind(ty.name())) {
        (Some(NumericKind::Floating), Some(NumericKind::Integral)) => false,
        (Some(_), Some(_)) => true,
        _ => source == Some(ty.name()),
    }
}

fn emit_cast(ctx: &mut EmissionContext<'_>, ty: &TypeRef, inner: &Expr) -> EmitResult {
    let target = ty.name();
    let source = inner.ty.as_ref().map(TypeRef::name);
    let source_kind = source.and_then(types::numeric_kind);
    let target_kind = types::numeric_kind(target);
    match (source_kind, target_kind) {
        (Some(NumericKind::Floating), Some(NumericKind::Integral)) => {
            ctx.write(conventions::INT_TRUNC);
            ctx.write("(");
            sub(ctx, inner)?;
            ctx.write(")");
            Ok(())
        }
        (Some(_), Some(_)) => sub(ctx, inner),
        _ if source == Some(target) => sub(ctx, inner),
        _ => emit_type_check(ctx, conventions::CAST, inner, ty),
    }
}

fn emit_type_check(ctx: &mut EmissionContext<'_>, helper: &str, inner: &Expr, ty: &TypeRef) -> EmitResult {
    ctx.write(helper);
    ctx.write("(");
    sub(ctx, inner)?;
    ctx.write(&format!(", {})", types::js_type_expr(ty.name())));
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::backend::emit::blocks::test_support::{render, render_with};
    use crate::backend::emit::context::EmitOptions;
    use bridgejs_model::{Member, ResolvedProgram, TypeDecl};

    fn emit(expr: &Expr) -> Result<String, EmissionFault> {
        render(|ctx| ExpressionBlock(expr).emit(ctx))
    }

    fn prop(target: Option<Expr>, name: &str) -> Expr {
        Expr::member(target, SymbolRef::new("N1.A", name, SymbolKind::Property)).with_type("System.Int32")
    }

    #[test]
    fn literals() {
        assert_eq!(emit(&Expr::string("a\"b\n")).unwrap(), r#""a\"b\n""#);
        assert_eq!(emit(&Expr::new(ExprKind::Literal(Literal::Char('A')))).unwrap(), "65");
        assert_eq!(emit(&Expr::new(ExprKind::Literal(Literal::Float(1.5)))).unwrap(), "1.5");
        assert_eq!(emit(&Expr::null()).unwrap(), "null");
    }

    #[test]
    fn integer_division_uses_runtime_helper() {
        let div = Expr::binary(BinaryOp::Divide, Expr::name("a").with_type("System.Int32"), Expr::int(2));
        assert_eq!(emit(&div).unwrap(), "Bridge.Int.div(a, 2)");
        let float_div = Expr::binary(
            BinaryOp::Divide,
            Expr::name("a").with_type("System.Double"),
            Expr::int(2),
        );
        assert_eq!(emit(&float_div).unwrap(), "a / 2");
    }

    #[test]
    fn equality_is_strict() {
        let eq = Expr::binary(BinaryOp::Equal, Expr::name("a"), Expr::null());
        assert_eq!(emit(&eq).unwrap(), "a === null");
        let ne = Expr::binary(BinaryOp::NotEqual, Expr::name("a"), Expr::null());
        assert_eq!(emit(&ne).unwrap(), "a !== null");
    }

    #[test]
    fn property_reads_and_writes_use_accessors() {
        assert_eq!(emit(&prop(Some(Expr::this()), "Count")).unwrap(), "this.getCount()");
        let set = Expr::assign(prop(Some(Expr::this()), "Count"), Expr::int(3));
        assert_eq!(emit(&set).unwrap(), "this.setCount(3)");
    }

    #[test]
    fn compound_property_assignment_on_complex_target_uses_temporary() {
        let receiver = Expr::member(
            Some(Expr::this()),
            SymbolRef::new("N1.A", "Child", SymbolKind::Field),
        );
        let compound = Expr::new(ExprKind::Assignment {
            op: Some(BinaryOp::Add),
            target: Box::new(prop(Some(receiver), "Count")),
            value: Box::new(Expr::int(1)),
        });
        let out = render(|ctx| ctx.function_body(|ctx| ExpressionBlock(&compound).emit(ctx))).unwrap();
        assert_eq!(out, "var $t;\n($t = this.child, $t.setCount($t.getCount() + 1))");
    }

    #[test]
    fn compound_assignment_on_simple_target() {
        let compound = Expr::new(ExprKind::Assignment {
            op: Some(BinaryOp::Add),
            target: Box::new(prop(Some(Expr::this()), "Count")),
            value: Box::new(Expr::int(2)),
        });
        assert_eq!(emit(&compound).unwrap(), "this.setCount(this.getCount() + 2)");

        let local = Expr::new(ExprKind::Assignment {
            op: Some(BinaryOp::Divide),
            target: Box::new(Expr::name("n").with_type("System.Int32")),
            value: Box::new(Expr::int(2)),
        });
        assert_eq!(emit(&local).unwrap(), "n = Bridge.Int.div(n, 2)");
    }

    #[test]
    fn assignment_to_non_assignable_target_faults() {
        let bad = Expr::assign(Expr::int(1), Expr::int(2));
        let fault = emit(&bad).unwrap_err();
        assert_eq!(fault.message, "expression is not assignable");
    }

    #[test]
    fn bare_base_faults() {
        assert!(emit(&Expr::new(ExprKind::Base)).is_err());
    }

    #[test]
    fn intrinsics_are_mapped() {
        let call = Expr::call(
            Expr::member(None, SymbolRef::method("System.Console", "WriteLine").with_static()),
            vec![Expr::string("hi")],
        );
        assert_eq!(emit(&call).unwrap(), r#"console.log("hi")"#);
    }

    #[test]
    fn overloads_and_base_calls() {
        let call = Expr::call(
            Expr::member(Some(Expr::this()), SymbolRef::method("N1.A", "Add").with_overload(1)),
            vec![Expr::int(1)],
        );
        assert_eq!(emit(&call).unwrap(), "this.add$1(1)");
        let base = Expr::call(
            Expr::member(Some(Expr::new(ExprKind::Base)), SymbolRef::method("N1.Base", "Run")),
            vec![Expr::int(1)],
        );
        assert_eq!(emit(&base).unwrap(), "N1.Base.prototype.run.call(this, 1)");
    }

    #[test]
    fn new_with_overloaded_constructor() {
        let new = Expr::new(ExprKind::New {
            ty: TypeRef::new("N1.A"),
            constructor: 1,
            args: vec![Expr::int(1)],
        });
        assert_eq!(emit(&new).unwrap(), "new N1.A.constructor$1(1)");
    }

    #[test]
    fn casts_and_type_checks() {
        let trunc = Expr::new(ExprKind::Cast {
            ty: TypeRef::new("System.Int32"),
            expr: Box::new(Expr::name("d").with_type("System.Double")),
        });
        assert_eq!(emit(&trunc).unwrap(), "Bridge.Int.trunc(d)");
        let cast = Expr::new(ExprKind::Cast {
            ty: TypeRef::new("N1.B"),
            expr: Box::new(Expr::name("o").with_type("System.Object")),
        });
        assert_eq!(emit(&cast).unwrap(), "Bridge.cast(o, N1.B)");
        let is = Expr::new(ExprKind::Is {
            expr: Box::new(Expr::name("o")),
            ty: TypeRef::new("System.String"),
        });
        assert_eq!(emit(&is).unwrap(), "Bridge.is(o, String)");
        let default = Expr::new(ExprKind::Default(TypeRef::new("N1.S")));
        assert_eq!(emit(&default).unwrap(), "Bridge.getDefaultValue(N1.S)");
    }

    #[test]
    fn nested_negation_keeps_tokens_apart() {
        let neg = Expr::new(ExprKind::Unary {
            op: UnaryOp::Negate,
            operand: Box::new(Expr::new(ExprKind::Unary {
                op: UnaryOp::Negate,
                operand: Box::new(Expr::name("x")),
            })),
        });
        assert_eq!(emit(&neg).unwrap(), "- -x");
    }

    fn in_function(expr: &Expr) -> String {
        render(|ctx| ctx.function_body(|ctx| ExpressionBlock(expr).emit(ctx))).unwrap()
    }

    fn unary(op: UnaryOp, operand: Expr) -> Expr {
        Expr::new(ExprKind::Unary {
            op,
            operand: Box::new(operand),
        })
    }

    #[test]
    fn property_increment_as_statement() {
        let inc = unary(UnaryOp::PostIncrement, prop(Some(Expr::this()), "Count"));
        let out = render(|ctx| emit_statement_expression(ctx, &inc)).unwrap();
        assert_eq!(out, "this.setCount(this.getCount() + 1)");
    }

    #[test]
    fn property_increment_as_value_yields_old_or_new_value() {
        let post = unary(UnaryOp::PostIncrement, prop(Some(Expr::this()), "Count"));
        assert_eq!(
            in_function(&post),
            "var $t;\n($t = this.getCount(), this.setCount($t + 1), $t)"
        );
        let pre = unary(UnaryOp::PreDecrement, prop(Some(Expr::this()), "Count"));
        assert_eq!(
            in_function(&pre),
            "var $t;\n($t = this.getCount() - 1, this.setCount($t), $t)"
        );
    }

    #[test]
    fn property_increment_in_comparison_on_computed_receiver() {
        let receiver = Expr::call(Expr::member(Some(Expr::this()), SymbolRef::method("N1.A", "Next")), vec![]);
        let cond = Expr::binary(
            BinaryOp::Greater,
            unary(UnaryOp::PostDecrement, prop(Some(receiver), "Left")),
            Expr::int(0),
        );
        assert_eq!(
            in_function(&cond),
            "var $t, $t1;\n($t = this.next(), $t1 = $t.getLeft(), $t.setLeft($t1 - 1), $t1) > 0"
        );
    }

    #[test]
    fn compound_property_assignment_groups_the_value() {
        let compound = |op, value| {
            Expr::new(ExprKind::Assignment {
                op: Some(op),
                target: Box::new(prop(Some(Expr::this()), "Count")),
                value: Box::new(value),
            })
        };
        let diff = Expr::binary(BinaryOp::Subtract, Expr::name("a"), Expr::name("b"));
        assert_eq!(
            emit(&compound(BinaryOp::Subtract, diff)).unwrap(),
            "this.setCount(this.getCount() - (a - b))"
        );
        let sum = Expr::binary(BinaryOp::Add, Expr::name("a"), Expr::name("b"));
        assert_eq!(
            emit(&compound(BinaryOp::Multiply, sum)).unwrap(),
            "this.setCount(this.getCount() * (a + b))"
        );
        // Tighter-binding values need no grouping.
        let product = Expr::binary(BinaryOp::Multiply, Expr::name("a"), Expr::name("b"));
        assert_eq!(
            emit(&compound(BinaryOp::Add, product)).unwrap(),
            "this.setCount(this.getCount() + a * b)"
        );
    }

    #[test]
    fn operands_are_grouped_by_precedence() {
        let sum = Expr::binary(BinaryOp::Add, Expr::name("a"), Expr::name("b"));
        let scaled = Expr::binary(BinaryOp::Multiply, sum.clone(), Expr::name("c"));
        assert_eq!(emit(&scaled).unwrap(), "(a + b) * c");
        let chained = Expr::binary(BinaryOp::Add, sum.clone(), Expr::name("c"));
        assert_eq!(emit(&chained).unwrap(), "a + b + c");
        let nested = Expr::binary(BinaryOp::Subtract, Expr::name("c"), sum.clone());
        assert_eq!(emit(&nested).unwrap(), "c - (a + b)");
        let negated = unary(UnaryOp::Negate, sum);
        assert_eq!(emit(&negated).unwrap(), "-(a + b)");
    }

    #[test]
    fn method_group_on_computed_receiver_evaluates_it_once() {
        let receiver = Expr::call(Expr::member(None, SymbolRef::method("N1.A", "GetObj").with_static()), vec![]);
        let group = Expr::member(Some(receiver), SymbolRef::method("N1.B", "Run"));
        assert_eq!(in_function(&group), "var $t;\nBridge.fn.bind($t = N1.A.getObj(), $t.run)");

        let local = Expr::member(Some(Expr::name("b")), SymbolRef::method("N1.B", "Run"));
        assert_eq!(emit(&local).unwrap(), "Bridge.fn.bind(b, b.run)");
    }

    #[test]
    fn nested_type_reference_uses_javascript_type_name() {
        let nested = Expr::member(None, SymbolRef::new("System.String", "Inner", SymbolKind::Type));
        assert_eq!(emit(&nested).unwrap(), "String.Inner");
    }

    #[test]
    fn conditional_calls_are_detected() {
        let program = ResolvedProgram::new("Demo").with_type(
            TypeDecl::class("N1", "Log")
                .with_member(Member::method("Trace", vec![], "System.Void", vec![]).with_conditional("DEBUG")),
        );
        let call = Expr::call(
            Expr::member(None, SymbolRef::method("N1.Log", "Trace").with_static()),
            vec![],
        );
        let omitted = |options: EmitOptions| {
            let mut result = false;
            render_with(&program, &options, |ctx| {
                result = is_omitted_call(ctx, &call);
                Ok(())
            })
            .unwrap();
            result
        };
        assert!(omitted(EmitOptions::default()));
        let debug = EmitOptions {
            define_constants: vec!["BRIDGE".to_string(), "DEBUG".to_string()],
            ..EmitOptions::default()
        };
        assert!(!omitted(debug));
    }
}
