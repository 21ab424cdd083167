//! Error types for model → JavaScript emission.
//!
//! These errors represent *emission* failures: a construct that has no JavaScript rendering, a documentation comment
//! that could not be translated, or an extension listener that refused a unit.
//!
//! ## Notes
//!
//! - Every fault names the construct and where it came from so users can find it in their sources.
//! - Documentation faults never abort emission; they are collected as warnings.

use bridgejs_model::Span;
use miette::Diagnostic;
use thiserror::Error;

fn location(file: &Option<String>, span: &Span) -> String {
    match file {
        Some(file) => format!("{}:{}", file, span),
        None => span.to_string(),
    }
}

/// A construct that could not be rendered.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
#[error("cannot emit {construct} at {}: {message}", location(.file, .span))]
#[diagnostic(code(bridgejs::emit))]
pub struct EmissionFault {
    /// Identity of the construct (`N1.A.Run`, `goto statement`).
    pub construct: String,
    /// Source file of the enclosing type, when known.
    pub file: Option<String>,
    pub span: Span,
    pub message: String,
}

/// Faults recorded while emitting under the collect-and-continue policy.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
#[error("{} construct(s) could not be emitted", .faults.len())]
#[diagnostic(code(bridgejs::emit))]
pub struct EmissionFaults {
    #[related]
    pub faults: Vec<EmissionFault>,
}

/// A documentation comment that could not be translated; emission continues without it.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
#[error("documentation of {construct} at {} was not translated: {message}", location(.file, .span))]
#[diagnostic(code(bridgejs::doc), severity(Warning))]
pub struct DocumentationFault {
    pub construct: String,
    pub file: Option<String>,
    pub span: Span,
    pub message: String,
}

/// An extension listener failed while observing emission.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
#[error("plugin `{listener}` failed during {event}: {message}")]
#[diagnostic(code(bridgejs::plugin))]
pub struct ListenerFault {
    pub listener: String,
    pub event: String,
    pub message: String,
}

/// Why a whole emission run stopped.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum EmitFailure {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Fault(#[from] EmissionFault),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Listener(#[from] ListenerFault),
}
