//! Translation configuration (`bridge.json`).
//!
//! The configuration record is read once per translation run. The orchestrator derives narrower option structs from
//! it for each stage ([`crate::backend::emit::EmitOptions`], [`crate::backend::output::OutputPolicy`]), so nothing
//! below the orchestrator depends on this module's file format.

#![deny(clippy::unwrap_used)]

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use bridgejs_core::lang::conventions;
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::backend::output::naming;

/// Conventional configuration file name.
pub const CONFIG_FILE_NAME: &str = "bridge.json";

/// Which JavaScript artifacts are produced per unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputFormatting {
    Formatted,
    Minified,
    #[default]
    Both,
}

impl OutputFormatting {
    pub fn beautified(self) -> bool {
        matches!(self, OutputFormatting::Formatted | OutputFormatting::Both)
    }

    pub fn minified(self) -> bool {
        matches!(self, OutputFormatting::Minified | OutputFormatting::Both)
    }
}

/// Partitioning granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputBy {
    Class,
    Namespace,
    #[default]
    Project,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FileNameCasing {
    None,
    #[default]
    CamelCase,
    Lowercase,
}

/// How much of the source documentation is carried into the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum DocumentationLevel {
    None,
    #[default]
    Basic,
    Full,
}

/// What happens when a construct cannot be emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FailurePolicy {
    /// Abort the run on the first fault; nothing is written.
    #[default]
    FailFast,
    /// Skip the faulted type, keep emitting the rest and report every fault at the end.
    Collect,
}

/// Configuration errors; always fatal and detected before emission starts.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigurationFault {
    #[error("cannot read configuration file {}: {source}", .path.display())]
    #[diagnostic(code(bridgejs::config))]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed configuration{}: {source}", .path.as_ref().map(|p| format!(" in {}", p.display())).unwrap_or_default())]
    #[diagnostic(code(bridgejs::config), help("check the option names and enum spellings in bridge.json"))]
    Parse {
        path: Option<PathBuf>,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid configuration: {0}")]
    #[diagnostic(code(bridgejs::config))]
    Invalid(String),
}

/// The `bridge.json` record.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub output_formatting: OutputFormatting,
    pub output_by: OutputBy,
    pub file_name_casing: FileNameCasing,
    pub generate_type_script: bool,
    pub generate_documentation: DocumentationLevel,
    pub preserve_member_case: bool,
    /// File name of by-project output; the assembly name when absent.
    pub file_name: Option<String>,
    /// Output folder, relative to the configuration file.
    pub output: Option<String>,
    pub before_build: Option<String>,
    pub after_build: Option<String>,
    pub define_constants: Vec<String>,
    pub emission_failure: FailurePolicy,
    /// AMD module name; when set, every output file is wrapped in `define("<module>", ["bridge"], ...)`.
    pub module: Option<String>,
    /// Folder holding the runtime (`bridge.js`, optional `bridge.d.ts`) to ship next to the outputs.
    pub runtime: Option<String>,
}

impl Config {
    /// Parse a configuration from JSON text.
    pub fn from_json(source: &str) -> Result<Self, ConfigurationFault> {
        serde_json::from_str(source).map_err(|source| ConfigurationFault::Parse { path: None, source })
    }

    /// Load a configuration file; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigurationFault> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no configuration file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigurationFault::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        serde_json::from_str(&text).map_err(|source| ConfigurationFault::Parse {
            path: Some(path.to_path_buf()),
            source,
        })
    }

    /// Reject settings that would make emission or naming meaningless.
    pub fn validate(&self) -> Result<(), ConfigurationFault> {
        if let Some(name) = &self.file_name {
            if naming::sanitize(name).is_empty() {
                return Err(ConfigurationFault::Invalid(format!(
                    "fileName `{}` does not name a file",
                    name
                )));
            }
        }
        for constant in &self.define_constants {
            if constant.is_empty() || constant.chars().any(char::is_whitespace) {
                return Err(ConfigurationFault::Invalid(format!(
                    "define constant `{}` must be a non-empty symbol without whitespace",
                    constant
                )));
            }
        }
        Ok(())
    }

    /// Defined conditional-compilation symbols: the built-in constant first, then the configured ones, de-duplicated.
    pub fn resolved_define_constants(&self) -> Vec<String> {
        let mut resolved = vec![conventions::DEFAULT_DEFINE_CONSTANT.to_string()];
        for constant in &self.define_constants {
            if !resolved.contains(constant) {
                resolved.push(constant.clone());
            }
        }
        resolved
    }

    pub fn before_build_command(&self) -> Option<&str> {
        non_blank(self.before_build.as_deref())
    }

    pub fn after_build_command(&self) -> Option<&str> {
        non_blank(self.after_build.as_deref())
    }

    pub fn module_name(&self) -> Option<&str> {
        non_blank(self.module.as_deref()).map(str::trim)
    }

    pub fn runtime_dir(&self) -> Option<&str> {
        non_blank(self.runtime.as_deref()).map(str::trim)
    }

    /// File name for by-project output (and types outside any namespace).
    pub fn default_file_name(&self, assembly_name: &str) -> String {
        match non_blank(self.file_name.as_deref()) {
            Some(name) => name.to_string(),
            None => assembly_name.to_string(),
        }
    }

    pub fn with_output_formatting(mut self, formatting: OutputFormatting) -> Self {
        self.output_formatting = formatting;
        self
    }

    pub fn with_output_by(mut self, output_by: OutputBy) -> Self {
        self.output_by = output_by;
        self
    }

    pub fn with_file_name_casing(mut self, casing: FileNameCasing) -> Self {
        self.file_name_casing = casing;
        self
    }

    pub fn with_type_script(mut self, enabled: bool) -> Self {
        self.generate_type_script = enabled;
        self
    }

    pub fn with_documentation(mut self, level: DocumentationLevel) -> Self {
        self.generate_documentation = level;
        self
    }

    pub fn with_preserve_member_case(mut self, preserve: bool) -> Self {
        self.preserve_member_case = preserve;
        self
    }

    pub fn with_file_name(mut self, name: &str) -> Self {
        self.file_name = Some(name.to_string());
        self
    }

    pub fn with_before_build(mut self, command: &str) -> Self {
        self.before_build = Some(command.to_string());
        self
    }

    pub fn with_after_build(mut self, command: &str) -> Self {
        self.after_build = Some(command.to_string());
        self
    }

    pub fn with_define_constant(mut self, constant: &str) -> Self {
        self.define_constants.push(constant.to_string());
        self
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.emission_failure = policy;
        self
    }

    pub fn with_module(mut self, name: &str) -> Self {
        self.module = Some(name.to_string());
        self
    }

    pub fn with_runtime(mut self, dir: &str) -> Self {
        self.runtime = Some(dir.to_string());
        self
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.output_formatting, OutputFormatting::Both);
        assert_eq!(config.output_by, OutputBy::Project);
        assert_eq!(config.file_name_casing, FileNameCasing::CamelCase);
        assert_eq!(config.generate_documentation, DocumentationLevel::Basic);
        assert_eq!(config.emission_failure, FailurePolicy::FailFast);
        assert!(!config.generate_type_script);
        assert_eq!(config.module_name(), None);
        assert_eq!(config.runtime_dir(), None);
    }

    #[test]
    fn parses_camel_case_keys() {
        let config = Config::from_json(
            r#"{
                "outputFormatting": "Formatted",
                "outputBy": "Namespace",
                "fileNameCasing": "Lowercase",
                "generateTypeScript": true,
                "generateDocumentation": "Full",
                "defineConstants": ["DEBUG"],
                "emissionFailure": "Collect",
                "module": " App ",
                "runtime": "lib/bridge",
                "someUnrelatedKey": 1
            }"#,
        )
        .unwrap();
        assert_eq!(config.output_formatting, OutputFormatting::Formatted);
        assert_eq!(config.output_by, OutputBy::Namespace);
        assert_eq!(config.file_name_casing, FileNameCasing::Lowercase);
        assert!(config.generate_type_script);
        assert_eq!(config.generate_documentation, DocumentationLevel::Full);
        assert_eq!(config.emission_failure, FailurePolicy::Collect);
        assert_eq!(config.module_name(), Some("App"));
        assert_eq!(config.runtime_dir(), Some("lib/bridge"));
    }

    #[test]
    fn unknown_enum_spelling_is_a_configuration_fault() {
        let err = Config::from_json(r#"{ "outputBy": "Module" }"#).unwrap_err();
        assert!(matches!(err, ConfigurationFault::Parse { .. }));
    }

    #[test]
    fn define_constants_always_include_builtin_once() {
        let config = Config::default()
            .with_define_constant("DEBUG")
            .with_define_constant("BRIDGE")
            .with_define_constant("DEBUG");
        assert_eq!(config.resolved_define_constants(), vec!["BRIDGE", "DEBUG"]);
    }

    #[test]
    fn blank_hooks_are_absent() {
        let config = Config::default().with_before_build("   ").with_after_build("echo done");
        assert_eq!(config.before_build_command(), None);
        assert_eq!(config.after_build_command(), Some("echo done"));
    }

    #[test]
    fn validation_rejects_unusable_names() {
        assert!(Config::default().with_file_name("/./../").validate().is_err());
        assert!(Config::default().with_define_constant("A B").validate().is_err());
        assert!(Config::default().with_define_constant("").validate().is_err());
        assert!(Config::default().with_file_name("app").validate().is_ok());
    }

    #[test]
    fn default_file_name_falls_back_to_assembly() {
        assert_eq!(Config::default().default_file_name("Demo"), "Demo");
        assert_eq!(Config::default().with_file_name("app").default_file_name("Demo"), "app");
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(&dir.path().join(CONFIG_FILE_NAME)).unwrap();
        assert_eq!(config, Config::default());
    }
}
