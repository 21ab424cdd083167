#![forbid(unsafe_code)]
//! bridgejs: JavaScript emission for resolved object-oriented programs
//!
//! A semantic-resolution engine hands over a [`bridgejs_model::ResolvedProgram`]; this crate renders it as
//! JavaScript targeting the Bridge runtime, partitions the result into files and writes them.
//!
//! ## Panic Policy
//!
//! This codebase follows explicit error handling:
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli`, `backend` and
//!   `pipeline` modules enforce `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.
//!
//! - **True invariants**: If a panic represents an emitter bug (logic error), use `.expect("INVARIANT: reason")` with
//!   a clear explanation.

pub mod backend;
pub mod cli;
pub mod config;
pub mod pipeline;

pub use backend::emit::{EmissionFault, EmitOptions, Emitter, OutputUnit, UnitKey};
pub use backend::output::{OutputFile, OutputWriter, Variant};
pub use config::Config;
pub use pipeline::{TranslateError, Translation, Translator};
