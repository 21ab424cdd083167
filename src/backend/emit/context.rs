//! Shared per-run emission state.
//!
//! One [`EmissionContext`] is created per emitter run and threaded explicitly through every block's `emit` call. It
//! owns the output buffer and indentation, the temporary-name table, and the diagnostic cursor. Every scoped
//! change (indentation, function scope, cursor) is made through a closure-taking method that restores the previous
//! state before returning, whether the closure succeeded or not.

use bridgejs_core::lang::{conventions, keywords};
use bridgejs_model::Span;

use super::comments::DocTranslator;
use super::errors::{DocumentationFault, EmissionFault};
use super::resolver::Resolver;
use super::writer::JsWriter;
use crate::config::{DocumentationLevel, FailurePolicy, OutputBy};

/// Emission settings derived from the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitOptions {
    pub preserve_member_case: bool,
    pub documentation: DocumentationLevel,
    /// Defined conditional-compilation symbols.
    pub define_constants: Vec<String>,
    /// Granularity of output units.
    pub output_by: OutputBy,
    /// Name of the project unit (and of the unit for namespace-less types); the assembly name when unset.
    pub default_unit: Option<String>,
    pub failure_policy: FailurePolicy,
    /// Also render declaration (`.d.ts`) text per unit.
    pub declarations: bool,
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self {
            preserve_member_case: false,
            documentation: DocumentationLevel::Basic,
            define_constants: vec![conventions::DEFAULT_DEFINE_CONSTANT.to_string()],
            output_by: OutputBy::Project,
            default_unit: None,
            failure_policy: FailurePolicy::FailFast,
            declarations: false,
        }
    }
}

#[derive(Debug, Default)]
struct TempScope {
    /// Temporaries that must be declared with `var` at the top of the function.
    declared: Vec<String>,
    /// Every name allocated in this scope (declared temporaries and bindings).
    allocated: Vec<String>,
}

#[derive(Debug, Clone, Default)]
struct Cursor {
    construct: String,
    span: Span,
}

pub struct EmissionContext<'a> {
    options: &'a EmitOptions,
    resolver: &'a dyn Resolver,
    docs: &'a dyn DocTranslator,
    writer: JsWriter,
    scopes: Vec<TempScope>,
    /// Variables bound by the enclosing `catch` clauses, innermost last (targets of a bare rethrow).
    catch_bindings: Vec<String>,
    cursor: Cursor,
    source_file: Option<String>,
    warnings: Vec<DocumentationFault>,
}

impl<'a> EmissionContext<'a> {
    pub fn new(options: &'a EmitOptions, resolver: &'a dyn Resolver, docs: &'a dyn DocTranslator) -> Self {
        Self {
            options,
            resolver,
            docs,
            writer: JsWriter::new(),
            scopes: Vec::new(),
            catch_bindings: Vec::new(),
            cursor: Cursor::default(),
            source_file: None,
            warnings: Vec::new(),
        }
    }

    pub fn options(&self) -> &'a EmitOptions {
        self.options
    }

    pub fn resolver(&self) -> &'a dyn Resolver {
        self.resolver
    }

    pub fn docs(&self) -> &'a dyn DocTranslator {
        self.docs
    }

    // ---- output ----

    pub fn write(&mut self, s: &str) {
        self.writer.write(s);
    }

    pub fn writeln(&mut self, s: &str) {
        self.writer.writeln(s);
    }

    pub fn newline(&mut self) {
        self.writer.newline();
    }

    /// Run `f` one indentation level deeper.
    pub fn indented<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        let level = self.writer.current_indent();
        self.writer.indent();
        let result = f(self);
        self.writer.set_indent(level);
        result
    }

    /// Take the text rendered so far (one type's worth), leaving an empty buffer.
    pub fn take_output(&mut self) -> String {
        self.writer.take()
    }

    /// Reset the buffer and scoped state after a failed type so the next one starts clean.
    pub fn discard_output(&mut self) {
        self.writer.take();
        self.writer.set_indent(0);
        self.scopes.clear();
        self.catch_bindings.clear();
    }

    // ---- temporaries ----

    /// Render a function body in its own temporary scope.
    ///
    /// The body is captured first; the `var` list of the temporaries it allocated is written ahead of it, at the
    /// body's indentation.
    pub fn function_body<R, E>(&mut self, f: impl FnOnce(&mut Self) -> Result<R, E>) -> Result<R, E> {
        self.scopes.push(TempScope::default());
        let mark = self.writer.begin_capture();
        let result = f(self);
        let body = self.writer.end_capture(mark);
        let scope = self.scopes.pop().unwrap_or_default();
        let value = result?;
        if !scope.declared.is_empty() {
            self.writer.writeln(&format!("var {};", scope.declared.join(", ")));
        }
        self.writer.write_raw(&body);
        Ok(value)
    }

    /// Allocate a temporary that is declared at the top of the enclosing function (`$t`, `$t1`, ...).
    pub fn alloc_temp(&mut self, base: &str) -> String {
        let name = self.unique_name(base);
        if let Some(scope) = self.scopes.last_mut() {
            scope.declared.push(name.clone());
            scope.allocated.push(name.clone());
        }
        name
    }

    /// Allocate a name bound by the construct itself (a `catch` parameter); not added to the `var` list.
    pub fn alloc_binding(&mut self, base: &str) -> String {
        let name = self.unique_name(base);
        if let Some(scope) = self.scopes.last_mut() {
            scope.allocated.push(name.clone());
        }
        name
    }

    fn unique_name(&self, base: &str) -> String {
        let stem = format!("{}{}", conventions::TEMP_PREFIX, base);
        let taken = |candidate: &str| self.scopes.iter().any(|s| s.allocated.iter().any(|n| n == candidate));
        if !taken(&stem) {
            return stem;
        }
        let mut n = 1usize;
        loop {
            let candidate = format!("{}{}", stem, n);
            if !taken(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }

    /// Run `f` with `binding` as the innermost caught exception.
    pub fn in_catch<R>(&mut self, binding: &str, f: impl FnOnce(&mut Self) -> R) -> R {
        self.catch_bindings.push(binding.to_string());
        let result = f(self);
        self.catch_bindings.pop();
        result
    }

    pub fn current_catch(&self) -> Option<&str> {
        self.catch_bindings.last().map(String::as_str)
    }

    // ---- diagnostics ----

    /// Set the source file of the type being emitted.
    pub fn set_source_file(&mut self, file: Option<String>) {
        self.source_file = file;
    }

    /// Run `f` with the cursor on a named construct (a type or member).
    pub fn at<R>(&mut self, construct: impl Into<String>, span: Span, f: impl FnOnce(&mut Self) -> R) -> R {
        let saved = std::mem::replace(
            &mut self.cursor,
            Cursor {
                construct: construct.into(),
                span,
            },
        );
        let result = f(self);
        self.cursor = saved;
        result
    }

    /// Move the cursor to a position inside the current construct for the duration of `f`.
    pub fn at_span<R>(&mut self, span: Span, f: impl FnOnce(&mut Self) -> R) -> R {
        if span == Span::default() {
            return f(self);
        }
        let saved = std::mem::replace(&mut self.cursor.span, span);
        let result = f(self);
        self.cursor.span = saved;
        result
    }

    pub fn construct(&self) -> &str {
        &self.cursor.construct
    }

    /// Build a fault for the construct under the cursor.
    pub fn fault(&self, message: impl Into<String>) -> EmissionFault {
        EmissionFault {
            construct: self.cursor.construct.clone(),
            file: self.source_file.clone(),
            span: self.cursor.span,
            message: message.into(),
        }
    }

    pub fn warn_documentation(&mut self, construct: &str, span: Span, message: impl Into<String>) {
        let fault = DocumentationFault {
            construct: construct.to_string(),
            file: self.source_file.clone(),
            span,
            message: message.into(),
        };
        tracing::warn!(construct = %fault.construct, "{}", fault);
        self.warnings.push(fault);
    }

    pub fn take_warnings(&mut self) -> Vec<DocumentationFault> {
        std::mem::take(&mut self.warnings)
    }

    // ---- naming ----

    /// JavaScript spelling of a member name (casing policy and reserved-word escaping).
    pub fn member_name(&self, name: &str) -> String {
        js_member_name(name, self.options.preserve_member_case)
    }

    /// Member name with its overload suffix (`add`, `add$1`).
    pub fn overloaded_name(&self, name: &str, ordinal: usize) -> String {
        with_ordinal(self.member_name(name), ordinal)
    }

    /// Whether a call to a member carrying these conditional symbols is kept.
    pub fn is_condition_defined(&self, conditional: &[String]) -> bool {
        conditional.is_empty() || conditional.iter().any(|c| self.options.define_constants.contains(c))
    }
}

/// Member name under the casing policy, escaped when it collides with a reserved word.
pub fn js_member_name(name: &str, preserve_case: bool) -> String {
    if preserve_case {
        keywords::escape_identifier(name)
    } else {
        keywords::escape_identifier(&lower_first(name))
    }
}

/// Append the overload suffix for ordinals after the first.
pub fn with_ordinal(name: String, ordinal: usize) -> String {
    if ordinal == 0 {
        name
    } else {
        format!("{}{}{}", name, conventions::OVERLOAD_SEPARATOR, ordinal)
    }
}

pub fn lower_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn upper_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
