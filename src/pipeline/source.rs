//! Acquisition of the resolved program from the resolution engine.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use bridgejs_model::ResolvedProgram;
use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum ProgramFault {
    #[error("cannot read resolved program {}", .path.display())]
    #[diagnostic(code(bridgejs::program))]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed resolved program {}: {source}", .path.display())]
    #[diagnostic(code(bridgejs::program))]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("program source failed: {0}")]
    #[diagnostic(code(bridgejs::program))]
    Source(String),
}

/// Produces the resolved program for one run; receives the defined conditional-compilation symbols.
pub trait ProgramSource {
    fn load(&self, define_constants: &[String]) -> Result<ResolvedProgram, ProgramFault>;
}

/// An already resolved program.
impl ProgramSource for ResolvedProgram {
    fn load(&self, _define_constants: &[String]) -> Result<ResolvedProgram, ProgramFault> {
        Ok(self.clone())
    }
}

/// A resolved program serialised as JSON by an out-of-process engine.
#[derive(Debug, Clone)]
pub struct JsonProgramSource {
    path: PathBuf,
}

impl JsonProgramSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ProgramSource for JsonProgramSource {
    fn load(&self, define_constants: &[String]) -> Result<ResolvedProgram, ProgramFault> {
        // Symbols were applied when the engine resolved the program.
        tracing::debug!(path = %self.path.display(), constants = ?define_constants, "loading resolved program");
        let text = fs::read_to_string(&self.path).map_err(|source| ProgramFault::Read {
            path: self.path.clone(),
            source,
        })?;
        ResolvedProgram::from_json(&text).map_err(|source| ProgramFault::Parse {
            path: self.path.clone(),
            source,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn json_source_reads_program() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("program.json");
        fs::write(&path, r#"{ "assemblyName": "Demo", "types": [ { "name": "A", "namespace": "N1" } ] }"#).unwrap();
        let program = JsonProgramSource::new(&path).load(&[]).unwrap();
        assert_eq!(program.assembly_name, "Demo");
        assert!(program.find_type("N1.A").is_some());
    }

    #[test]
    fn missing_and_malformed_programs_are_faults() {
        let dir = tempfile::tempdir().unwrap();
        let missing = JsonProgramSource::new(dir.path().join("nope.json")).load(&[]);
        assert!(matches!(missing, Err(ProgramFault::Read { .. })));

        let path = dir.path().join("bad.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(JsonProgramSource::new(&path).load(&[]), Err(ProgramFault::Parse { .. })));
    }
}
