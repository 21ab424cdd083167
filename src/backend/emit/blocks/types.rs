//! `Bridge.define` registration of one type declaration.

use bridgejs_core::lang::{conventions, types};
use bridgejs_model::{Expr, Member, MemberKind, TypeDecl, TypeKind};

use super::members::{MemberBlock, MemberSite, is_inline_initializer, member_sites, setter_name};
use super::{Emit, ExpressionBlock, emit_function, emit_object};
use crate::backend::emit::comments::{Commented, DocSubject};
use crate::backend::emit::context::EmissionContext;
use crate::backend::emit::errors::EmissionFault;

type EmitResult = Result<(), EmissionFault>;

pub enum TypeBlock<'m> {
    Class(&'m TypeDecl),
    Struct(&'m TypeDecl),
    Interface(&'m TypeDecl),
    Enum(&'m TypeDecl),
}

impl<'m> TypeBlock<'m> {
    pub fn of(decl: &'m TypeDecl) -> Self {
        match decl.kind {
            TypeKind::Class => TypeBlock::Class(decl),
            TypeKind::Struct => TypeBlock::Struct(decl),
            TypeKind::Interface => TypeBlock::Interface(decl),
            TypeKind::Enum => TypeBlock::Enum(decl),
        }
    }

    pub fn decl(&self) -> &'m TypeDecl {
        match self {
            TypeBlock::Class(decl) | TypeBlock::Struct(decl) | TypeBlock::Interface(decl) | TypeBlock::Enum(decl) => {
                decl
            }
        }
    }

    fn entries(&self) -> Vec<Entry<'m>> {
        let decl = self.decl();
        let mut entries = Vec::new();
        if !decl.base_types.is_empty() && !matches!(self, TypeBlock::Enum(_)) {
            let bases: Vec<String> = decl.base_types.iter().map(|b| types::js_type_expr(b.name())).collect();
            entries.push(Entry::Raw(format!("{}: [{}]", conventions::INHERITS_KEY, bases.join(", "))));
        }
        let marker = match self {
            TypeBlock::Class(_) => None,
            TypeBlock::Struct(_) => Some(conventions::STRUCT_MARKER),
            TypeBlock::Interface(_) => Some(conventions::INTERFACE_MARKER),
            TypeBlock::Enum(_) => Some(conventions::ENUM_MARKER),
        };
        if let Some(marker) = marker {
            entries.push(Entry::Raw(format!("{}: true", marker)));
        }
        if matches!(self, TypeBlock::Interface(_)) {
            return entries;
        }

        let mut statics = Layout::default();
        let mut instance = Layout::default();
        for site in member_sites(decl) {
            if is_static(site.member) {
                statics.place(site);
            } else {
                instance.place(site);
            }
        }
        let static_entries = statics.into_entries();
        if !static_entries.is_empty() {
            entries.push(Entry::Object(conventions::STATICS_KEY, static_entries));
        }
        entries.extend(instance.into_entries());
        entries
    }
}

impl Emit for TypeBlock<'_> {
    fn emit(&self, ctx: &mut EmissionContext<'_>) -> EmitResult {
        let decl = self.decl();
        ctx.at(decl.full_name(), decl.span, |ctx| {
            ctx.write(&format!("{}(\"{}\", ", conventions::DEFINE, decl.full_name()));
            emit_object(ctx, &self.entries())?;
            ctx.writeln(");");
            Ok(())
        })
    }
}

fn is_static(member: &Member) -> bool {
    member.is_static || matches!(member.kind, MemberKind::Constant { .. } | MemberKind::EnumValue { .. })
}

/// Members of one placement (static or instance), sorted into the groups of the type literal.
#[derive(Default)]
struct Layout<'m> {
    values: Vec<MemberSite<'m>>,
    properties: Vec<MemberSite<'m>>,
    inits: Vec<(MemberSite<'m>, &'m Expr)>,
    constructors: Vec<MemberSite<'m>>,
    callables: Vec<MemberSite<'m>>,
}

impl<'m> Layout<'m> {
    fn place(&mut self, site: MemberSite<'m>) {
        match &site.member.kind {
            MemberKind::Field { initializer, .. } => {
                self.values.push(site);
                if let Some(init) = initializer.as_ref().filter(|e| !is_inline_initializer(e)) {
                    self.inits.push((site, init));
                }
            }
            MemberKind::Constant { .. } | MemberKind::EnumValue { .. } => self.values.push(site),
            MemberKind::Property { auto: true, initializer, .. } => {
                self.properties.push(site);
                if let Some(init) = initializer.as_ref().filter(|e| !is_inline_initializer(e)) {
                    self.inits.push((site, init));
                }
            }
            MemberKind::Property { .. } if site.member.is_abstract => {}
            MemberKind::Property { .. } => self.callables.push(site),
            MemberKind::Method { body: None, .. } => {}
            MemberKind::Method { .. } if site.member.is_abstract => {}
            MemberKind::Method { .. } => self.callables.push(site),
            MemberKind::Constructor { .. } => self.constructors.push(site),
        }
    }

    fn into_entries(self) -> Vec<Entry<'m>> {
        let mut entries: Vec<Entry<'m>> = self.values.into_iter().map(Entry::member).collect();
        let mut config = Vec::new();
        if !self.properties.is_empty() {
            config.push(Entry::Object(
                conventions::PROPERTIES_KEY,
                self.properties.into_iter().map(Entry::member).collect(),
            ));
        }
        if !self.inits.is_empty() {
            config.push(Entry::Init(self.inits));
        }
        if !config.is_empty() {
            entries.push(Entry::Object(conventions::CONFIG_KEY, config));
        }
        entries.extend(self.constructors.into_iter().map(Entry::member));
        entries.extend(self.callables.into_iter().map(Entry::member));
        entries
    }
}

/// One `key: value` entry of a type literal.
enum Entry<'m> {
    Raw(String),
    Member(Commented<'m, MemberBlock<'m>>),
    Object(&'static str, Vec<Entry<'m>>),
    /// `init: function () { ... }` assigning the initializers that are not inline values.
    Init(Vec<(MemberSite<'m>, &'m Expr)>),
}

impl<'m> Entry<'m> {
    fn member(site: MemberSite<'m>) -> Self {
        Entry::Member(Commented::new(
            DocSubject::Member {
                owner: site.owner,
                member: site.member,
            },
            MemberBlock::of(site),
        ))
    }
}

impl Emit for Entry<'_> {
    fn emit(&self, ctx: &mut EmissionContext<'_>) -> EmitResult {
        match self {
            Entry::Raw(text) => {
                ctx.write(text);
                Ok(())
            }
            Entry::Member(block) => block.emit(ctx),
            Entry::Object(key, entries) => {
                ctx.write(&format!("{}: ", key));
                emit_object(ctx, entries)
            }
            Entry::Init(inits) => {
                ctx.write(&format!("{}: ", conventions::INIT_KEY));
                emit_function(ctx, &[], |ctx| {
                    for (site, value) in inits {
                        ctx.at(site.identity(), site.member.span, |ctx| emit_init(ctx, *site, value))?;
                    }
                    Ok(())
                })
            }
        }
    }
}

fn emit_init(ctx: &mut EmissionContext<'_>, site: MemberSite<'_>, value: &Expr) -> EmitResult {
    if matches!(site.member.kind, MemberKind::Property { .. }) {
        ctx.write(&format!("this.{}(", setter_name(&site.member.name)));
        ExpressionBlock(value).emit(ctx)?;
        ctx.writeln(");");
    } else {
        ctx.write(&format!("this.{} = ", ctx.member_name(&site.member.name)));
        ExpressionBlock(value).emit(ctx)?;
        ctx.writeln(";");
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::backend::emit::blocks::test_support::render;
    use bridgejs_model::{Param, Stmt, TypeRef};

    fn render_type(decl: &TypeDecl) -> String {
        render(|ctx| TypeBlock::of(decl).emit(ctx)).unwrap()
    }

    #[test]
    fn class_layout_orders_groups() {
        let decl = TypeDecl::class("N1", "Counter")
            .with_base("N1.Base")
            .with_member(Member::method("Reset", vec![], "System.Void", vec![]))
            .with_member(Member::field("Count", "System.Int32", None))
            .with_member(Member::field("Zero", "System.Int32", Some(Expr::int(0))).with_static())
            .with_member(Member::field(
                "Items",
                "N1.Bag",
                Some(Expr::new(bridgejs_model::ExprKind::New {
                    ty: TypeRef::new("N1.Bag"),
                    constructor: 0,
                    args: vec![],
                })),
            ))
            .with_member(Member::auto_property("Name", "System.String"))
            .with_member(Member::constructor(vec![Param::new("n", "System.Int32")], vec![]));
        insta::assert_snapshot!(render_type(&decl), @r#"
        Bridge.define("N1.Counter", {
            inherits: [N1.Base],
            statics: {
                zero: 0
            },
            count: 0,
            items: null,
            config: {
                properties: {
                    Name: null
                },
                init: function () {
                    this.items = new N1.Bag();
                }
            },
            constructor: function (n) {
            },
            reset: function () {
            }
        });
        "#);
    }

    #[test]
    fn enums_register_static_values() {
        let decl = TypeDecl::new(Some("N1"), "Color", TypeKind::Enum)
            .with_member(Member::enum_value("Red", 0))
            .with_member(Member::enum_value("Green", 1));
        assert_eq!(
            render_type(&decl),
            "Bridge.define(\"N1.Color\", {\n    $enum: true,\n    statics: {\n        red: 0,\n        green: 1\n    }\n});\n"
        );
    }

    #[test]
    fn interfaces_only_carry_inheritance_and_marker() {
        let decl = TypeDecl::new(Some("N1"), "IShape", TypeKind::Interface)
            .with_base("N1.IBase")
            .with_member(Member::new(
                "Area",
                MemberKind::Method {
                    params: vec![],
                    return_type: TypeRef::new("System.Double"),
                    body: None,
                },
            ));
        assert_eq!(
            render_type(&decl),
            "Bridge.define(\"N1.IShape\", {\n    inherits: [N1.IBase],\n    $interface: true\n});\n"
        );
    }

    #[test]
    fn empty_class_and_static_constructor() {
        assert_eq!(render_type(&TypeDecl::class("N1", "A")), "Bridge.define(\"N1.A\", { });\n");
        let decl = TypeDecl::class("N1", "B").with_member(
            Member::constructor(vec![], vec![Stmt::expr(Expr::call(Expr::name("setup"), vec![]))]).with_static(),
        );
        assert_eq!(
            render_type(&decl),
            "Bridge.define(\"N1.B\", {\n    statics: {\n        constructor: function () {\n            setup();\n        }\n    }\n});\n"
        );
    }

    #[test]
    fn member_documentation_precedes_its_entry() {
        let decl = TypeDecl::class("N1", "A").with_member(
            Member::method("Run", vec![], "System.Void", vec![]).with_doc("<summary>Runs.</summary>"),
        );
        assert_eq!(
            render_type(&decl),
            "Bridge.define(\"N1.A\", {\n    /**\n     * Runs.\n     */\n    run: function () {\n    }\n});\n"
        );
    }
}
