//! Output partitioning and writing.
//!
//! The partitioner maps the emitter's [`OutputUnit`]s onto [`OutputFile`]s: it derives each unit's safe relative
//! base path, merges units that land on the same path, and produces the formatting variants the policy asks for.
//! When a module name is configured, each file's JavaScript is wrapped in an AMD `define` call. The runtime, when
//! supplied, is added as `bridge.js` / `bridge.min.js` / `bridge.d.ts` under the same rules. [`OutputWriter`] persists
//! the result under an output root.
//!
//! ## See also
//! - [`naming`]: path sanitisation and casing
//! - [`minify`]: the minifier seam
//! - [`runtime`]: the runtime source seam
//! - [`writer`]: filesystem writes, manifest and stale-file removal

#![deny(clippy::unwrap_used)]

pub mod minify;
pub mod naming;
pub mod runtime;
mod writer;

pub use minify::{Minifier, MinifyError, OxcMinifier};
pub use runtime::{RUNTIME_FILE_STEM, Runtime, RuntimeDir, RuntimeFault, RuntimeSource};
pub use writer::{MANIFEST_FILE_NAME, OutputWriter, WriteFault, WriteReport};

use std::path::PathBuf;

use bridgejs_core::lang::conventions;
use indexmap::IndexMap;

use crate::backend::emit::{OutputUnit, UnitKey};
use crate::config::{FileNameCasing, OutputFormatting};

/// Naming and formatting settings for partitioning.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OutputPolicy {
    pub formatting: OutputFormatting,
    pub casing: FileNameCasing,
    /// Whether runtime declarations are shipped; unit declarations follow the units themselves.
    pub declarations: bool,
    /// AMD module name wrapping each file's JavaScript.
    pub module: Option<String>,
}

/// Which rendering of a unit a file carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    Beautified,
    Minified,
    Declaration,
}

/// A file ready to be written: a path relative to the output root and its content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFile {
    pub path: PathBuf,
    pub variant: Variant,
    pub content: String,
}

/// Relative base path of a unit (no extension).
///
/// Names that sanitise to nothing fall back to `_` so every unit still gets a path under the root.
pub fn base_path(key: &UnitKey, casing: FileNameCasing) -> String {
    let sanitized = naming::sanitize(key.name());
    let cased = naming::apply_casing(&sanitized, casing);
    let suffix = format!(".{}", conventions::JS_EXTENSION);
    let stem = match cased.len().checked_sub(suffix.len()) {
        Some(cut) if cased.is_char_boundary(cut) && cased[cut..].eq_ignore_ascii_case(&suffix) => &cased[..cut],
        _ => cased.as_str(),
    };
    if stem.is_empty() || stem.ends_with('/') {
        format!("{}_", stem)
    } else {
        stem.to_string()
    }
}

#[derive(Default)]
struct Merged {
    js: Vec<String>,
    declarations: Vec<String>,
}

/// Wrap JavaScript in an AMD module definition that depends on the runtime.
pub fn wrap_module(name: &str, js: &str) -> String {
    let quoted = serde_json::to_string(name).unwrap_or_else(|_| format!("\"{}\"", name));
    let mut out = format!("define({}, [\"{}\"], function () {{\n", quoted, RUNTIME_FILE_STEM);
    for line in js.lines() {
        if !line.is_empty() {
            out.push_str("    ");
            out.push_str(line);
        }
        out.push('\n');
    }
    out.push_str("});\n");
    out
}

/// Map units onto files, in unit order; within a base path: beautified, minified, declaration. Runtime files, if
/// any, come last.
#[tracing::instrument(skip_all, fields(units = units.len()))]
pub fn partition(
    units: &IndexMap<UnitKey, OutputUnit>,
    policy: &OutputPolicy,
    runtime: Option<&Runtime>,
    minifier: &dyn Minifier,
) -> Result<Vec<OutputFile>, MinifyError> {
    let mut merged: IndexMap<String, Merged> = IndexMap::new();
    for (key, unit) in units {
        let base = base_path(key, policy.casing);
        let entry = merged.entry(base).or_default();
        entry.js.push(unit.js.clone());
        if let Some(declarations) = &unit.declarations {
            entry.declarations.push(declarations.clone());
        }
    }

    let mut files = Vec::new();
    for (base, parts) in merged {
        let js = parts.js.join("\n");
        let js = match &policy.module {
            Some(module) => wrap_module(module, &js),
            None => js,
        };
        if policy.formatting.beautified() {
            files.push(OutputFile {
                path: PathBuf::from(format!("{}.{}", base, conventions::JS_EXTENSION)),
                variant: Variant::Beautified,
                content: format!("{}{}", conventions::JS_FILE_HEADER, js),
            });
        }
        if policy.formatting.minified() {
            files.push(OutputFile {
                path: PathBuf::from(format!(
                    "{}.{}.{}",
                    base,
                    conventions::MINIFIED_MARKER,
                    conventions::JS_EXTENSION
                )),
                variant: Variant::Minified,
                content: minifier.minify(&js)?,
            });
        }
        if !parts.declarations.is_empty() {
            files.push(OutputFile {
                path: PathBuf::from(format!("{}.{}", base, conventions::DECLARATION_EXTENSION)),
                variant: Variant::Declaration,
                content: parts.declarations.join("\n"),
            });
        }
    }
    if let Some(runtime) = runtime {
        add_runtime(&mut files, runtime, policy, minifier)?;
    }
    tracing::debug!(files = files.len(), "partitioned");
    Ok(files)
}

/// Runtime files carry no header and are never wrapped; a unit already using one of their paths keeps it.
fn add_runtime(
    files: &mut Vec<OutputFile>,
    runtime: &Runtime,
    policy: &OutputPolicy,
    minifier: &dyn Minifier,
) -> Result<(), MinifyError> {
    let mut candidates = Vec::new();
    if policy.formatting.beautified() {
        candidates.push(OutputFile {
            path: PathBuf::from(format!("{}.{}", RUNTIME_FILE_STEM, conventions::JS_EXTENSION)),
            variant: Variant::Beautified,
            content: runtime.script.clone(),
        });
    }
    if policy.formatting.minified() {
        candidates.push(OutputFile {
            path: PathBuf::from(format!(
                "{}.{}.{}",
                RUNTIME_FILE_STEM,
                conventions::MINIFIED_MARKER,
                conventions::JS_EXTENSION
            )),
            variant: Variant::Minified,
            content: minifier.minify(&runtime.script)?,
        });
    }
    if let (true, Some(declarations)) = (policy.declarations, &runtime.declarations) {
        candidates.push(OutputFile {
            path: PathBuf::from(format!("{}.{}", RUNTIME_FILE_STEM, conventions::DECLARATION_EXTENSION)),
            variant: Variant::Declaration,
            content: declarations.clone(),
        });
    }
    for file in candidates {
        if files.iter().any(|f| f.path == file.path) {
            tracing::warn!(path = %file.path.display(), "a generated file uses the runtime's name; runtime file skipped");
            continue;
        }
        files.push(file);
    }
    Ok(())
}
