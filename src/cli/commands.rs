//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::path::{Path, PathBuf};

use crate::backend::emit::EmissionFaults;
use crate::config::{CONFIG_FILE_NAME, Config};
use crate::pipeline::{JsonProgramSource, Translation, Translator};

use super::{CliError, CliResult, ExitCode};

/// Project directory and the configuration found in it.
#[derive(Debug)]
pub struct Project {
    pub dir: PathBuf,
    pub config: Config,
}

impl Project {
    /// Load `config_path` (default `./bridge.json`); the project directory is the directory holding it.
    pub fn locate(config_path: Option<&Path>) -> CliResult<Self> {
        let path = config_path.unwrap_or(Path::new(CONFIG_FILE_NAME));
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let config = Config::load(path).map_err(CliError::diagnostic)?;
        Ok(Self { dir, config })
    }

    fn translator(&self) -> Translator {
        Translator::new(&self.dir).with_config(self.config.clone())
    }
}

/// Run the whole pipeline and write the outputs.
pub fn translate(project: &Project, program: &Path, out: Option<&Path>) -> CliResult<ExitCode> {
    let mut translator = project.translator();
    if let Some(out) = out {
        translator = translator.with_output(out);
    }
    let translation = translator
        .translate(&JsonProgramSource::new(program))
        .map_err(CliError::diagnostic)?;

    if let (Some(root), Some(report)) = (&translation.output_root, &translation.report) {
        println!("Wrote {} file(s) to {}", report.written.len(), root.display());
        if !report.removed.is_empty() {
            println!("Removed {} stale file(s)", report.removed.len());
        }
    }
    finish(translation)
}

/// Print the combined beautified JavaScript.
pub fn print_code(project: &Project, program: &Path) -> CliResult<ExitCode> {
    let translation = project
        .translator()
        .emit(&JsonProgramSource::new(program))
        .map_err(CliError::diagnostic)?;
    print!("{}", translation.code());
    finish(translation)
}

/// Print every output file, path first, without writing.
pub fn emit(project: &Project, program: &Path) -> CliResult<ExitCode> {
    let translation = project
        .translator()
        .emit(&JsonProgramSource::new(program))
        .map_err(CliError::diagnostic)?;
    for (path, content) in translation.contents() {
        println!("// {}", path.display());
        println!("{}", content);
    }
    finish(translation)
}

/// Report documentation warnings and collected faults; any collected fault fails the command.
fn finish(translation: Translation) -> CliResult<ExitCode> {
    for warning in &translation.warnings {
        eprintln!("warning: {}", warning);
    }
    if translation.faults.is_empty() {
        return Ok(ExitCode::SUCCESS);
    }
    Err(CliError::diagnostic(EmissionFaults {
        faults: translation.faults,
    }))
}
