//! The Bridge runtime shipped next to the generated files.
//!
//! A [`RuntimeSource`] supplies the runtime script (and, optionally, its TypeScript declarations). The partitioner
//! adds `bridge.js`, `bridge.min.js` and `bridge.d.ts` under the same formatting and declaration rules as the units.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use bridgejs_core::lang::conventions;
use miette::Diagnostic;
use thiserror::Error;

/// File stem of the runtime outputs (`bridge.js`, `bridge.min.js`, `bridge.d.ts`).
pub const RUNTIME_FILE_STEM: &str = "bridge";

#[derive(Debug, Error, Diagnostic)]
#[error("cannot read runtime file {}: {source}", .path.display())]
#[diagnostic(code(bridgejs::runtime), help("point `runtime` in bridge.json at a folder containing bridge.js"))]
pub struct RuntimeFault {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

/// Runtime texts as loaded from a source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Runtime {
    pub script: String,
    pub declarations: Option<String>,
}

/// Where the runtime comes from.
pub trait RuntimeSource {
    fn load(&self) -> Result<Runtime, RuntimeFault>;
}

impl RuntimeSource for Runtime {
    fn load(&self) -> Result<Runtime, RuntimeFault> {
        Ok(self.clone())
    }
}

/// A folder holding `bridge.js` and, optionally, `bridge.d.ts`.
#[derive(Debug, Clone)]
pub struct RuntimeDir {
    dir: PathBuf,
}

impl RuntimeDir {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn file(&self, extension: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", RUNTIME_FILE_STEM, extension))
    }
}

fn read(path: &Path) -> Result<String, RuntimeFault> {
    fs::read_to_string(path).map_err(|source| RuntimeFault {
        path: path.to_path_buf(),
        source,
    })
}

impl RuntimeSource for RuntimeDir {
    #[tracing::instrument(skip_all, fields(dir = %self.dir.display()))]
    fn load(&self) -> Result<Runtime, RuntimeFault> {
        let script = read(&self.file(conventions::JS_EXTENSION))?;
        let declarations_path = self.file(conventions::DECLARATION_EXTENSION);
        let declarations = match read(&declarations_path) {
            Ok(text) => Some(text),
            Err(RuntimeFault { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %declarations_path.display(), "runtime has no declarations");
                None
            }
            Err(fault) => return Err(fault),
        };
        Ok(Runtime { script, declarations })
    }
}
