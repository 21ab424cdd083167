//! TypeScript declaration text for the types of one output unit.
//!
//! Types are grouped by namespace in first-appearance order. Only the public surface is described: private members
//! are left out, bodies never appear, and every CLR type is spelled the way TypeScript expects it.

use bridgejs_core::lang::types::ts_type;
use bridgejs_model::{Accessibility, Member, MemberKind, Param, ResolvedProgram, TypeDecl, TypeKind};
use indexmap::IndexMap;

use super::blocks::member_sites;
use super::context::{js_member_name, upper_first, with_ordinal};
use super::writer::JsWriter;

/// Render declarations for `decls`; `program` answers whether a base type is an interface.
pub fn render_declarations(program: &ResolvedProgram, decls: &[&TypeDecl], preserve_member_case: bool) -> String {
    let mut groups: IndexMap<Option<&str>, Vec<&TypeDecl>> = IndexMap::new();
    for decl in decls {
        let ns = decl.namespace.as_deref().filter(|ns| !ns.is_empty());
        groups.entry(ns).or_default().push(decl);
    }

    let renderer = Declarations {
        program,
        preserve_member_case,
    };
    let mut w = JsWriter::new();
    for (i, (ns, decls)) in groups.iter().enumerate() {
        if i > 0 {
            w.newline();
        }
        match ns {
            Some(ns) => {
                w.writeln(&format!("declare namespace {} {{", ns));
                w.indent();
                for decl in decls {
                    renderer.type_decl(&mut w, decl, "export ");
                }
                w.dedent();
                w.writeln("}");
            }
            None => {
                for decl in decls {
                    renderer.type_decl(&mut w, decl, "declare ");
                }
            }
        }
    }
    w.finish()
}

struct Declarations<'p> {
    program: &'p ResolvedProgram,
    preserve_member_case: bool,
}

impl Declarations<'_> {
    fn is_interface(&self, name: &str) -> bool {
        self.program
            .find_type(name)
            .is_some_and(|t| t.kind == TypeKind::Interface)
    }

    fn type_decl(&self, w: &mut JsWriter, decl: &TypeDecl, modifier: &str) {
        let bases: Vec<&str> = decl.base_types.iter().map(|b| b.name()).collect();
        let header = match decl.kind {
            TypeKind::Interface => {
                let mut header = format!("{}interface {}", modifier, decl.name);
                if !bases.is_empty() {
                    header.push_str(&format!(" extends {}", bases.join(", ")));
                }
                header
            }
            TypeKind::Enum => format!("{}enum {}", modifier, decl.name),
            TypeKind::Class | TypeKind::Struct => {
                let mut header = format!("{}class {}", modifier, decl.name);
                let (interfaces, classes): (Vec<&str>, Vec<&str>) =
                    bases.iter().copied().partition(|b| self.is_interface(b));
                if let Some(base) = classes.first() {
                    header.push_str(&format!(" extends {}", base));
                }
                if !interfaces.is_empty() {
                    header.push_str(&format!(" implements {}", interfaces.join(", ")));
                }
                header
            }
        };
        w.writeln(&format!("{} {{", header));
        w.indent();
        if decl.kind == TypeKind::Enum {
            let values: Vec<String> = decl
                .members
                .iter()
                .filter_map(|m| match m.kind {
                    MemberKind::EnumValue { value } => Some(format!("{} = {}", self.name(&m.name), value)),
                    _ => None,
                })
                .collect();
            for (i, value) in values.iter().enumerate() {
                if i + 1 < values.len() {
                    w.writeln(&format!("{},", value));
                } else {
                    w.writeln(value);
                }
            }
        } else {
            for site in member_sites(decl) {
                if site.member.accessibility == Accessibility::Private {
                    continue;
                }
                self.member(w, site.member, site.ordinal);
            }
        }
        w.dedent();
        w.writeln("}");
    }

    fn name(&self, name: &str) -> String {
        js_member_name(name, self.preserve_member_case)
    }

    fn member(&self, w: &mut JsWriter, member: &Member, ordinal: usize) {
        let prefix = if member.is_static || matches!(member.kind, MemberKind::Constant { .. }) {
            "static "
        } else {
            ""
        };
        match &member.kind {
            MemberKind::Field { ty, .. } | MemberKind::Constant { ty, .. } => {
                w.writeln(&format!("{}{}: {};", prefix, self.name(&member.name), ts_type(ty.name())));
            }
            MemberKind::Property {
                ty, getter, setter, auto, ..
            } => {
                let ty = ts_type(ty.name());
                let accessor = upper_first(&member.name);
                if *auto || getter.is_some() || member.is_abstract {
                    w.writeln(&format!("{}get{}(): {};", prefix, accessor, ty));
                }
                if *auto || setter.is_some() {
                    w.writeln(&format!("{}set{}(value: {}): void;", prefix, accessor, ty));
                }
            }
            MemberKind::Method {
                params, return_type, ..
            } => {
                let name = with_ordinal(self.name(&member.name), ordinal);
                w.writeln(&format!(
                    "{}{}({}): {};",
                    prefix,
                    name,
                    signature(params),
                    ts_type(return_type.name())
                ));
            }
            MemberKind::Constructor { params, .. } if !member.is_static => {
                w.writeln(&format!("constructor({});", signature(params)));
            }
            MemberKind::Constructor { .. } | MemberKind::EnumValue { .. } => {}
        }
    }
}

fn signature(params: &[Param]) -> String {
    params
        .iter()
        .map(|p| format!("{}: {}", p.name, ts_type(p.ty.name())))
        .collect::<Vec<_>>()
        .join(", ")
}
