//! Object-literal entries for type members.
//!
//! Each [`MemberBlock`] renders one `key: value` entry (two for a property with both accessors) without a trailing
//! separator; the enclosing object literal decides where commas and line breaks go.

use std::collections::HashMap;

use bridgejs_core::lang::{conventions, keywords, types};
use bridgejs_model::{
    ConstructorInitializer, Expr, ExprKind, InitializerTarget, Literal, Member, MemberKind, Param, Stmt, TypeDecl,
    TypeRef,
};

use super::{Emit, ExpressionBlock, emit_function, emit_statements};
use crate::backend::emit::context::{EmissionContext, upper_first, with_ordinal};
use crate::backend::emit::errors::EmissionFault;

type EmitResult = Result<(), EmissionFault>;

/// A member together with its owner and its overload ordinal.
#[derive(Debug, Clone, Copy)]
pub struct MemberSite<'m> {
    pub owner: &'m TypeDecl,
    pub member: &'m Member,
    /// Position among same-named callable members of the owner, in declaration order.
    pub ordinal: usize,
}

impl MemberSite<'_> {
    /// `Owner.Member`, the identity used in diagnostics.
    pub fn identity(&self) -> String {
        format!("{}.{}", self.owner.full_name(), self.member.name)
    }
}

/// Every member of `owner` with its overload ordinal.
///
/// Ordinals count same-named methods and constructors separately from other member kinds, the same way symbol
/// references number overloads.
pub fn member_sites(owner: &TypeDecl) -> Vec<MemberSite<'_>> {
    let mut seen: HashMap<(&str, bool), usize> = HashMap::new();
    owner
        .members
        .iter()
        .map(|member| {
            let callable = matches!(member.kind, MemberKind::Method { .. } | MemberKind::Constructor { .. });
            let next = seen.entry((member.name.as_str(), callable)).or_insert(0);
            let ordinal = *next;
            *next += 1;
            MemberSite { owner, member, ordinal }
        })
        .collect()
}

pub enum MemberBlock<'m> {
    Field(MemberSite<'m>),
    Constant(MemberSite<'m>),
    Property(MemberSite<'m>),
    Method(MemberSite<'m>),
    Constructor(MemberSite<'m>),
    EnumValue(MemberSite<'m>),
}

impl<'m> MemberBlock<'m> {
    pub fn of(site: MemberSite<'m>) -> Self {
        match site.member.kind {
            MemberKind::Field { .. } => MemberBlock::Field(site),
            MemberKind::Constant { .. } => MemberBlock::Constant(site),
            MemberKind::Property { .. } => MemberBlock::Property(site),
            MemberKind::Method { .. } => MemberBlock::Method(site),
            MemberKind::Constructor { .. } => MemberBlock::Constructor(site),
            MemberKind::EnumValue { .. } => MemberBlock::EnumValue(site),
        }
    }

    pub fn site(&self) -> MemberSite<'m> {
        match self {
            MemberBlock::Field(site)
            | MemberBlock::Constant(site)
            | MemberBlock::Property(site)
            | MemberBlock::Method(site)
            | MemberBlock::Constructor(site)
            | MemberBlock::EnumValue(site) => *site,
        }
    }
}

impl Emit for MemberBlock<'_> {
    fn emit(&self, ctx: &mut EmissionContext<'_>) -> EmitResult {
        let site = self.site();
        ctx.at(site.identity(), site.member.span, |ctx| match (self, &site.member.kind) {
            (MemberBlock::Field(_), MemberKind::Field { ty, initializer }) => {
                ctx.write(&format!("{}: ", ctx.member_name(&site.member.name)));
                emit_initial_value(ctx, ty, initializer.as_ref())
            }
            (MemberBlock::Constant(_), MemberKind::Constant { ty, value }) => {
                ctx.write(&format!("{}: ", ctx.member_name(&site.member.name)));
                ExpressionBlock(&Expr::typed(ExprKind::Literal(value.clone()), ty.name())).emit(ctx)
            }
            (MemberBlock::EnumValue(_), MemberKind::EnumValue { value }) => {
                ctx.write(&format!("{}: {}", ctx.member_name(&site.member.name), value));
                Ok(())
            }
            (
                MemberBlock::Property(_),
                MemberKind::Property {
                    ty,
                    getter,
                    setter,
                    auto,
                    initializer,
                },
            ) => {
                if *auto {
                    // Auto-properties are declared by value; the runtime synthesizes their accessors.
                    ctx.write(&format!("{}: ", site.member.name));
                    return emit_initial_value(ctx, ty, initializer.as_ref());
                }
                emit_accessors(ctx, &site.member.name, getter.as_deref(), setter.as_deref())
            }
            (MemberBlock::Method(_), MemberKind::Method { params, body, .. }) => {
                let Some(body) = body else {
                    return Err(ctx.fault("method has no body"));
                };
                ctx.write(&format!("{}: ", ctx.overloaded_name(&site.member.name, site.ordinal)));
                emit_function(ctx, &param_names(params), |ctx| emit_statements(ctx, body))
            }
            (
                MemberBlock::Constructor(_),
                MemberKind::Constructor {
                    params,
                    body,
                    initializer,
                },
            ) => {
                let key = if site.member.is_static {
                    conventions::CONSTRUCTOR_KEY.to_string()
                } else {
                    with_ordinal(conventions::CONSTRUCTOR_KEY.to_string(), site.ordinal)
                };
                ctx.write(&format!("{}: ", key));
                emit_function(ctx, &param_names(params), |ctx| {
                    if let Some(init) = initializer {
                        emit_chained_constructor(ctx, site.owner, init)?;
                    }
                    emit_statements(ctx, body)
                })
            }
            _ => Err(ctx.fault("member block does not match the member kind")),
        })
    }
}

/// `getName` for property `Name`.
pub(crate) fn getter_name(property: &str) -> String {
    format!("{}{}", conventions::GETTER_PREFIX, upper_first(property))
}

/// `setName` for property `Name`.
pub(crate) fn setter_name(property: &str) -> String {
    format!("{}{}", conventions::SETTER_PREFIX, upper_first(property))
}

/// Whether an initializer can be written inline as the member's value rather than assigned in `init`.
pub(crate) fn is_inline_initializer(expr: &Expr) -> bool {
    match &expr.kind {
        ExprKind::Literal(_) | ExprKind::Default(_) => true,
        ExprKind::Unary { operand, .. } => matches!(operand.kind, ExprKind::Literal(Literal::Int(_) | Literal::Float(_))),
        _ => false,
    }
}

/// The declared value: an inline initializer, or the type's default.
fn emit_initial_value(ctx: &mut EmissionContext<'_>, ty: &TypeRef, initializer: Option<&Expr>) -> EmitResult {
    match initializer {
        Some(init) if is_inline_initializer(init) => ExpressionBlock(init).emit(ctx),
        _ => {
            ctx.write(types::default_literal(ty.name()).unwrap_or("null"));
            Ok(())
        }
    }
}

fn param_names(params: &[Param]) -> Vec<String> {
    params.iter().map(|p| keywords::escape_identifier(&p.name)).collect()
}

fn emit_accessors(
    ctx: &mut EmissionContext<'_>,
    name: &str,
    getter: Option<&[Stmt]>,
    setter: Option<&[Stmt]>,
) -> EmitResult {
    if getter.is_none() && setter.is_none() {
        return Err(ctx.fault("property has neither accessor bodies nor an automatic implementation"));
    }
    if let Some(body) = getter {
        ctx.write(&format!("{}: ", getter_name(name)));
        emit_function(ctx, &[], |ctx| emit_statements(ctx, body))?;
    }
    if let Some(body) = setter {
        if getter.is_some() {
            ctx.write(",");
            ctx.newline();
        }
        ctx.write(&format!("{}: ", setter_name(name)));
        emit_function(ctx, &["value".to_string()], |ctx| emit_statements(ctx, body))?;
    }
    Ok(())
}

/// `Base.prototype.$constructor.call(this, ...);` for `: base(...)`, the owner's own prototype for `: this(...)`.
fn emit_chained_constructor(ctx: &mut EmissionContext<'_>, owner: &TypeDecl, init: &ConstructorInitializer) -> EmitResult {
    let target = match init.target {
        InitializerTarget::Base => match owner.base_types.first() {
            Some(base) => types::js_type_expr(base.name()),
            None => {
                return Err(ctx.fault(format!(
                    "constructor chains to a base constructor but `{}` has no base type",
                    owner.full_name()
                )));
            }
        },
        InitializerTarget::This => owner.full_name(),
    };
    let name = if init.overload == 0 {
        conventions::CONSTRUCTOR_ALIAS.to_string()
    } else {
        with_ordinal(conventions::CONSTRUCTOR_KEY.to_string(), init.overload)
    };
    ctx.write(&format!("{}.prototype.{}.call(this", target, name));
    for arg in &init.args {
        ctx.write(", ");
        ExpressionBlock(arg).emit(ctx)?;
    }
    ctx.writeln(");");
    Ok(())
}
