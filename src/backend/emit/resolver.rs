//! Symbol resolution queries used during emission.
//!
//! The resolution engine already bound every name; emission only asks narrow questions about those bindings:
//! whether a reference denotes a specific well-known member, and which declaration a reference points at.

use std::collections::HashMap;

use bridgejs_model::{Member, MemberKind, ResolvedProgram, SymbolRef};

/// Answers symbol questions for emission.
pub trait Resolver {
    /// Whether `symbol` denotes the member named `target` (`System.Console.WriteLine`).
    fn resolves_to(&self, symbol: &SymbolRef, target: &str) -> bool;

    /// Declaration a reference points at, when it is declared in the translated program.
    fn member(&self, symbol: &SymbolRef) -> Option<&Member>;
}

/// [`Resolver`] backed by an index over a [`ResolvedProgram`].
pub struct ProgramResolver<'p> {
    members: HashMap<(String, &'p str, usize), &'p Member>,
}

impl<'p> ProgramResolver<'p> {
    pub fn new(program: &'p ResolvedProgram) -> Self {
        let mut members = HashMap::new();
        for ty in &program.types {
            let owner = ty.full_name();
            let mut seen: HashMap<(&str, bool), usize> = HashMap::new();
            for member in &ty.members {
                let ordinal = seen.entry((member.name.as_str(), is_callable(member))).or_insert(0);
                members.insert((owner.clone(), member.name.as_str(), *ordinal), member);
                *ordinal += 1;
            }
        }
        Self { members }
    }
}

fn is_callable(member: &Member) -> bool {
    matches!(member.kind, MemberKind::Method { .. } | MemberKind::Constructor { .. })
}

impl Resolver for ProgramResolver<'_> {
    fn resolves_to(&self, symbol: &SymbolRef, target: &str) -> bool {
        symbol.full_name() == target
    }

    fn member(&self, symbol: &SymbolRef) -> Option<&Member> {
        self.members
            .get(&(symbol.declaring_type.clone(), symbol.name.as_str(), symbol.overload))
            .copied()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use bridgejs_model::{Param, TypeDecl};

    fn program() -> ResolvedProgram {
        ResolvedProgram::new("Demo").with_type(
            TypeDecl::class("N1", "A")
                .with_member(Member::method("Log", vec![], "System.Void", vec![]).with_conditional("DEBUG"))
                .with_member(Member::method(
                    "Log",
                    vec![Param::new("m", "System.String")],
                    "System.Void",
                    vec![],
                )),
        )
    }

    #[test]
    fn member_lookup_respects_overload_ordinal() {
        let program = program();
        let resolver = ProgramResolver::new(&program);
        let first = resolver.member(&SymbolRef::method("N1.A", "Log")).unwrap();
        assert_eq!(first.conditional, vec!["DEBUG".to_string()]);
        let second = resolver.member(&SymbolRef::method("N1.A", "Log").with_overload(1)).unwrap();
        assert!(second.conditional.is_empty());
        assert!(resolver.member(&SymbolRef::method("N1.A", "Log").with_overload(2)).is_none());
    }

    #[test]
    fn resolves_to_compares_qualified_names() {
        let program = program();
        let resolver = ProgramResolver::new(&program);
        let symbol = SymbolRef::method("System.Console", "WriteLine").with_static();
        assert!(resolver.resolves_to(&symbol, "System.Console.WriteLine"));
        assert!(!resolver.resolves_to(&symbol, "System.Console.Write"));
    }
}
