//! Program-level emission: walk the resolved program and render each type into its output unit.
//!
//! ## Notes
//!
//! - Units are keyed and ordered by first appearance of their types in declaration order, so two runs over the same
//!   program produce the same units in the same order.
//! - A fault in one type either stops the run (fail-fast) or discards that type's partial text and continues with the
//!   next type (collect). Either way no half-rendered type ever reaches a unit.

use bridgejs_model::{ResolvedProgram, TypeDecl};
use indexmap::IndexMap;

use super::blocks::{Emit, TypeBlock};
use super::comments::{Commented, DocSubject, DocTranslator, XmlDocTranslator};
use super::context::{EmissionContext, EmitOptions};
use super::declarations::render_declarations;
use super::errors::{DocumentationFault, EmissionFault, EmitFailure, ListenerFault};
use super::resolver::ProgramResolver;
use crate::config::{FailurePolicy, OutputBy};

/// Logical identity of an output unit.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum UnitKey {
    /// A single type (by-class output), named by its full name.
    Class(String),
    /// All types of one namespace.
    Namespace(String),
    /// Every type of the program.
    Project(String),
    /// Types that requested an explicit output file.
    File(String),
}

impl UnitKey {
    /// Base name the unit's files are derived from.
    pub fn name(&self) -> &str {
        match self {
            UnitKey::Class(name) | UnitKey::Namespace(name) | UnitKey::Project(name) | UnitKey::File(name) => name,
        }
    }
}

/// Rendered text of one unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputUnit {
    pub key: UnitKey,
    /// Full names of the rendered types, in emission order.
    pub types: Vec<String>,
    pub js: String,
    /// Declaration text, when declarations are enabled.
    pub declarations: Option<String>,
}

/// Everything one emitter run produced.
#[derive(Debug, Clone, Default)]
pub struct EmissionOutput {
    pub units: IndexMap<UnitKey, OutputUnit>,
    /// Faults of discarded types (collect policy only).
    pub faults: Vec<EmissionFault>,
    pub warnings: Vec<DocumentationFault>,
}

/// Observes units as they are rendered; may edit a finished unit.
pub trait UnitObserver {
    fn before_unit(&mut self, _key: &UnitKey) -> Result<(), ListenerFault> {
        Ok(())
    }

    fn after_unit(&mut self, _unit: &mut OutputUnit) -> Result<(), ListenerFault> {
        Ok(())
    }
}

/// Observer that does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoObserver;

impl UnitObserver for NoObserver {}

/// Renders a resolved program into output units.
pub struct Emitter<'a> {
    options: &'a EmitOptions,
    docs: &'a dyn DocTranslator,
}

impl<'a> Emitter<'a> {
    pub fn new(options: &'a EmitOptions) -> Self {
        Self {
            options,
            docs: &XmlDocTranslator,
        }
    }

    /// Use a different documentation dialect.
    pub fn with_translator(mut self, docs: &'a dyn DocTranslator) -> Self {
        self.docs = docs;
        self
    }

    /// Group types into units (first appearance order), keeping declaration order within each unit.
    pub fn plan<'p>(&self, program: &'p ResolvedProgram) -> IndexMap<UnitKey, Vec<&'p TypeDecl>> {
        let default_unit = self
            .options
            .default_unit
            .clone()
            .unwrap_or_else(|| program.assembly_name.clone());
        let mut plan: IndexMap<UnitKey, Vec<&TypeDecl>> = IndexMap::new();
        for decl in &program.types {
            let key = match (decl.output_file.as_deref(), self.options.output_by) {
                (Some(file), _) if !file.trim().is_empty() => UnitKey::File(file.to_string()),
                (_, OutputBy::Class) => UnitKey::Class(decl.full_name()),
                (_, OutputBy::Namespace) => match decl.namespace.as_deref() {
                    Some(ns) if !ns.is_empty() => UnitKey::Namespace(ns.to_string()),
                    _ => UnitKey::Project(default_unit.clone()),
                },
                (_, OutputBy::Project) => UnitKey::Project(default_unit.clone()),
            };
            plan.entry(key).or_default().push(decl);
        }
        plan
    }

    /// Render every type of `program`.
    #[tracing::instrument(skip_all, fields(assembly = %program.assembly_name, types = program.types.len()))]
    pub fn run(
        &self,
        program: &ResolvedProgram,
        observer: &mut dyn UnitObserver,
    ) -> Result<EmissionOutput, EmitFailure> {
        let resolver = ProgramResolver::new(program);
        let mut ctx = EmissionContext::new(self.options, &resolver, self.docs);
        let mut output = EmissionOutput::default();

        for (key, decls) in self.plan(program) {
            observer.before_unit(&key)?;
            let mut rendered = Vec::new();
            let mut emitted = Vec::new();
            for decl in decls {
                ctx.set_source_file(decl.source_file.clone());
                let block = Commented::new(DocSubject::Type(decl), TypeBlock::of(decl));
                match block.emit(&mut ctx) {
                    Ok(()) => {
                        rendered.push(ctx.take_output());
                        emitted.push(decl);
                    }
                    Err(fault) => match self.options.failure_policy {
                        FailurePolicy::FailFast => return Err(fault.into()),
                        FailurePolicy::Collect => {
                            tracing::error!(construct = %fault.construct, "{}", fault);
                            ctx.discard_output();
                            output.faults.push(fault);
                        }
                    },
                }
            }
            if emitted.is_empty() {
                tracing::debug!(unit = key.name(), "no types rendered; unit dropped");
                continue;
            }

            let declarations = self
                .options
                .declarations
                .then(|| render_declarations(program, &emitted, self.options.preserve_member_case));
            let mut unit = OutputUnit {
                key: key.clone(),
                types: emitted.iter().map(|d| d.full_name()).collect(),
                js: rendered.join("\n"),
                declarations,
            };
            observer.after_unit(&mut unit)?;
            tracing::debug!(unit = key.name(), types = unit.types.len(), "unit rendered");
            output.units.insert(key, unit);
        }

        output.warnings = ctx.take_warnings();
        Ok(output)
    }
}
