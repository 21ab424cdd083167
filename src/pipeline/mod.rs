//! Translation orchestrator.
//!
//! [`Translator`] runs one translation in a fixed order:
//!
//! 1. resolve the configuration (load `bridge.json`, let plugins adjust it, validate)
//! 2. run the `beforeBuild` command
//! 3. acquire the resolved program
//! 4. emit units (plugins observe each unit)
//! 5. partition units (and the runtime, when configured) into files and write them under the output root
//! 6. run the `afterBuild` command
//!
//! A failing `beforeBuild` command aborts before any emission work. A failing `afterBuild` command is reported after
//! the files already exist on disk. Under the fail-fast policy an emission fault aborts before anything is written;
//! under the collect policy the types that rendered are written and the faults are returned with the result.
//!
//! ## See also
//! - [`hooks`]: build-event commands
//! - [`plugins`]: in-process lifecycle listeners
//! - [`source`]: resolved-program acquisition

#![deny(clippy::unwrap_used)]

pub mod hooks;
pub mod plugins;
pub mod source;

pub use hooks::{HookFault, HookOutput, HookStage, run_hook};
pub use plugins::{Event, Plugin, PluginError, Plugins};
pub use source::{JsonProgramSource, ProgramFault, ProgramSource};

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use miette::Diagnostic;
use thiserror::Error;

use crate::backend::emit::{
    DocumentationFault, EmissionFault, EmitFailure, EmitOptions, Emitter, ListenerFault, UnitObserver,
};
use crate::backend::output::{
    Minifier, MinifyError, OutputFile, OutputPolicy, OutputWriter, OxcMinifier, RuntimeDir, RuntimeFault,
    RuntimeSource, Variant, WriteFault, WriteReport, partition,
};
use crate::config::{CONFIG_FILE_NAME, Config, ConfigurationFault};

/// Why a translation failed.
#[derive(Debug, Error, Diagnostic)]
pub enum TranslateError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigurationFault),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Hook(#[from] HookFault),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Program(#[from] ProgramFault),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Emission(#[from] EmissionFault),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Plugin(#[from] ListenerFault),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Runtime(#[from] RuntimeFault),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Minify(#[from] MinifyError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Write(#[from] WriteFault),
}

impl From<EmitFailure> for TranslateError {
    fn from(failure: EmitFailure) -> Self {
        match failure {
            EmitFailure::Fault(fault) => TranslateError::Emission(fault),
            EmitFailure::Listener(fault) => TranslateError::Plugin(fault),
        }
    }
}

/// Result of a translation.
#[derive(Debug, Default)]
pub struct Translation {
    /// Files in partition order.
    pub files: Vec<OutputFile>,
    /// Where the files were written; `None` for emit-only runs.
    pub output_root: Option<PathBuf>,
    pub report: Option<WriteReport>,
    /// Types left out under the collect policy.
    pub faults: Vec<EmissionFault>,
    pub warnings: Vec<DocumentationFault>,
}

impl Translation {
    /// Relative path to content, ordered by path.
    pub fn contents(&self) -> BTreeMap<&Path, &str> {
        self.files.iter().map(|f| (f.path.as_path(), f.content.as_str())).collect()
    }

    /// All beautified JavaScript, in path order, each followed by a newline.
    pub fn code(&self) -> String {
        let mut js: Vec<&OutputFile> = self.files.iter().filter(|f| f.variant == Variant::Beautified).collect();
        js.sort_by(|a, b| a.path.cmp(&b.path));
        js.iter().map(|f| format!("{}\n", f.content)).collect()
    }
}

/// Runs translations for one project directory.
pub struct Translator {
    project_dir: PathBuf,
    config: Option<Config>,
    output_override: Option<PathBuf>,
    plugins: Plugins,
    minifier: Box<dyn Minifier>,
    runtime: Option<Box<dyn RuntimeSource>>,
}

impl Translator {
    /// A translator for the project in `project_dir`, where `bridge.json` is looked up and relative paths resolve.
    pub fn new(project_dir: impl Into<PathBuf>) -> Self {
        Self {
            project_dir: project_dir.into(),
            config: None,
            output_override: None,
            plugins: Plugins::new(),
            minifier: Box::new(OxcMinifier),
            runtime: None,
        }
    }

    /// Use `config` instead of reading `bridge.json`.
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Write to `dir` regardless of the configured output folder.
    pub fn with_output(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_override = Some(dir.into());
        self
    }

    pub fn with_plugin(mut self, plugin: Box<dyn Plugin>) -> Self {
        self.plugins.register(plugin);
        self
    }

    pub fn with_minifier(mut self, minifier: Box<dyn Minifier>) -> Self {
        self.minifier = minifier;
        self
    }

    /// Ship this runtime next to the outputs instead of the configured `runtime` folder.
    pub fn with_runtime(mut self, runtime: Box<dyn RuntimeSource>) -> Self {
        self.runtime = Some(runtime);
        self
    }

    /// Run the whole pipeline, hooks and writing included.
    #[tracing::instrument(skip_all, fields(project = %self.project_dir.display()))]
    pub fn translate(&mut self, source: &dyn ProgramSource) -> Result<Translation, TranslateError> {
        let config = self.resolve_config()?;
        if let Some(command) = config.before_build_command() {
            run_hook(HookStage::BeforeBuild, command, &self.project_dir)?;
        }

        let mut translation = self.render(&config, source)?;
        let root = self.output_root(&config);
        let report = OutputWriter::new(&root).write(&translation.files)?;
        tracing::info!(
            files = report.written.len(),
            removed = report.removed.len(),
            root = %root.display(),
            "translation written"
        );
        translation.output_root = Some(root);
        translation.report = Some(report);

        if let Some(command) = config.after_build_command() {
            run_hook(HookStage::AfterBuild, command, &self.project_dir)?;
        }
        Ok(translation)
    }

    /// Produce the files without running hooks or touching the disk.
    #[tracing::instrument(skip_all, fields(project = %self.project_dir.display()))]
    pub fn emit(&mut self, source: &dyn ProgramSource) -> Result<Translation, TranslateError> {
        let config = self.resolve_config()?;
        self.render(&config, source)
    }

    /// Beautified JavaScript of every unit as one string; see [`Translation::code`].
    pub fn code(&mut self, source: &dyn ProgramSource) -> Result<String, TranslateError> {
        Ok(self.emit(source)?.code())
    }

    /// Configuration of this run: explicit or loaded, adjusted by plugins, validated.
    pub fn resolve_config(&mut self) -> Result<Config, TranslateError> {
        let mut config = match &self.config {
            Some(config) => config.clone(),
            None => Config::load(&self.project_dir.join(CONFIG_FILE_NAME))?,
        };
        self.plugins.config_read(&mut config)?;
        config.validate()?;
        Ok(config)
    }

    /// Output root: the override, or the configured folder relative to the project directory.
    pub fn output_root(&self, config: &Config) -> PathBuf {
        if let Some(dir) = &self.output_override {
            return dir.clone();
        }
        let configured = config.output.as_deref().map(str::trim).filter(|o| !o.is_empty());
        match configured {
            Some(output) if Path::new(output).is_absolute() => {
                tracing::warn!(output, "output folder is absolute; writing outside the project directory");
                PathBuf::from(output)
            }
            Some(output) => self.project_dir.join(output),
            None => self.project_dir.clone(),
        }
    }

    fn render(&mut self, config: &Config, source: &dyn ProgramSource) -> Result<Translation, TranslateError> {
        let define_constants = config.resolved_define_constants();
        let mut program = source.load(&define_constants)?;
        self.plugins.before_emit(&mut program)?;

        let options = EmitOptions {
            preserve_member_case: config.preserve_member_case,
            documentation: config.generate_documentation,
            define_constants,
            output_by: config.output_by,
            default_unit: Some(config.default_file_name(&program.assembly_name)),
            failure_policy: config.emission_failure,
            declarations: config.generate_type_script,
        };
        let observer: &mut dyn UnitObserver = &mut self.plugins;
        let mut output = Emitter::new(&options).run(&program, observer)?;
        self.plugins.after_emit(&mut output)?;
        if !output.faults.is_empty() {
            tracing::warn!(faults = output.faults.len(), "types left out of the output");
        }

        let policy = OutputPolicy {
            formatting: config.output_formatting,
            casing: config.file_name_casing,
            declarations: config.generate_type_script,
            module: config.module_name().map(str::to_string),
        };
        let runtime = match (&self.runtime, config.runtime_dir()) {
            (Some(source), _) => Some(source.load()?),
            (None, Some(dir)) => Some(RuntimeDir::new(self.project_dir.join(dir)).load()?),
            (None, None) => None,
        };
        let files = partition(&output.units, &policy, runtime.as_ref(), self.minifier.as_ref())?;
        Ok(Translation {
            files,
            output_root: None,
            report: None,
            faults: output.faults,
            warnings: output.warnings,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::{FailurePolicy, OutputBy, OutputFormatting};
    use bridgejs_model::{Member, ResolvedProgram, Stmt, StmtKind, TypeDecl};
    use std::fs;

    fn program() -> ResolvedProgram {
        ResolvedProgram::new("Demo")
            .with_type(TypeDecl::class("N1", "A"))
            .with_type(TypeDecl::class("N2", "B"))
    }

    fn formatted() -> Config {
        Config::default().with_output_formatting(OutputFormatting::Formatted)
    }

    #[test]
    fn translate_writes_files_and_reports_them() {
        let dir = tempfile::tempdir().unwrap();
        let translation = Translator::new(dir.path())
            .with_config(formatted())
            .translate(&program())
            .unwrap();
        let written = fs::read_to_string(dir.path().join("demo.js")).unwrap();
        assert!(written.starts_with("/* global Bridge */\n\nBridge.define(\"N1.A\""));
        assert_eq!(translation.report.unwrap().written.len(), 1);
    }

    #[test]
    fn bridge_json_is_read_from_the_project_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            r#"{ "outputBy": "Namespace", "outputFormatting": "Formatted", "output": "out" }"#,
        )
        .unwrap();
        Translator::new(dir.path()).translate(&program()).unwrap();
        assert!(dir.path().join("out/n1.js").exists());
        assert!(dir.path().join("out/n2.js").exists());
    }

    #[test]
    fn failing_before_build_aborts_before_emission() {
        let dir = tempfile::tempdir().unwrap();
        let config = formatted().with_before_build("exit 1");
        let err = Translator::new(dir.path())
            .with_config(config)
            .translate(&program())
            .unwrap_err();
        assert!(matches!(err, TranslateError::Hook(HookFault { stage: HookStage::BeforeBuild, .. })));
        assert!(!dir.path().join("demo.js").exists());
    }

    #[test]
    fn failing_after_build_leaves_outputs_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let config = formatted().with_after_build("exit 2");
        let err = Translator::new(dir.path())
            .with_config(config)
            .translate(&program())
            .unwrap_err();
        assert!(matches!(err, TranslateError::Hook(HookFault { stage: HookStage::AfterBuild, .. })));
        assert!(dir.path().join("demo.js").exists());
    }

    #[test]
    fn invalid_configuration_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let err = Translator::new(dir.path())
            .with_config(Config::default().with_define_constant("TWO WORDS"))
            .emit(&program())
            .unwrap_err();
        assert!(matches!(err, TranslateError::Config(ConfigurationFault::Invalid(_))));
    }

    #[test]
    fn fail_fast_writes_nothing_and_collect_writes_the_rest() {
        let broken = TypeDecl::class("N2", "Bad").with_member(Member::method(
            "Jump",
            vec![],
            "System.Void",
            vec![Stmt::new(StmtKind::Goto("x".to_string()))],
        ));
        let program = program().with_type(broken);
        let by_namespace = formatted().with_output_by(OutputBy::Namespace);

        let dir = tempfile::tempdir().unwrap();
        let err = Translator::new(dir.path())
            .with_config(by_namespace.clone())
            .translate(&program)
            .unwrap_err();
        assert!(matches!(err, TranslateError::Emission(_)));
        assert!(!dir.path().join("n1.js").exists());

        let translation = Translator::new(dir.path())
            .with_config(by_namespace.with_failure_policy(FailurePolicy::Collect))
            .translate(&program)
            .unwrap();
        assert_eq!(translation.faults.len(), 1);
        assert!(dir.path().join("n1.js").exists());
        let n2 = fs::read_to_string(dir.path().join("n2.js")).unwrap();
        assert!(n2.contains("N2.B") && !n2.contains("N2.Bad"));
    }

    #[test]
    fn code_concatenates_beautified_outputs_in_path_order() {
        let dir = tempfile::tempdir().unwrap();
        let translation = Translator::new(dir.path())
            .with_config(Config::default().with_output_by(OutputBy::Namespace))
            .emit(&program())
            .unwrap();
        assert_eq!(translation.files.len(), 4);
        let code = translation.code();
        let a = code.find("N1.A").unwrap();
        let b = code.find("N2.B").unwrap();
        assert!(a < b);
        assert_eq!(code.matches("/* global Bridge */").count(), 2);
        assert!(fs::read_dir(dir.path()).unwrap().next().is_none());
    }

    #[test]
    fn configured_runtime_and_module_are_shipped() {
        let dir = tempfile::tempdir().unwrap();
        let runtime = dir.path().join("lib");
        fs::create_dir(&runtime).unwrap();
        fs::write(runtime.join("bridge.js"), "var Bridge = {};\n").unwrap();
        let config = formatted().with_runtime("lib").with_module("App");
        let translation = Translator::new(dir.path())
            .with_config(config)
            .with_output(dir.path().join("out"))
            .translate(&program())
            .unwrap();

        let paths: Vec<_> = translation.files.iter().map(|f| f.path.clone()).collect();
        assert_eq!(paths, vec![PathBuf::from("demo.js"), PathBuf::from("bridge.js")]);
        let demo = fs::read_to_string(dir.path().join("out/demo.js")).unwrap();
        assert!(demo.starts_with("/* global Bridge */\n\ndefine(\"App\", [\"bridge\"], function () {\n    Bridge.define(\"N1.A\""));
        assert_eq!(fs::read_to_string(dir.path().join("out/bridge.js")).unwrap(), "var Bridge = {};\n");
    }

    #[test]
    fn missing_runtime_folder_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = Translator::new(dir.path())
            .with_config(formatted().with_runtime("nowhere"))
            .emit(&program())
            .unwrap_err();
        assert!(matches!(err, TranslateError::Runtime(_)));
    }

    #[test]
    fn output_root_resolution() {
        let translator = Translator::new("/project");
        let mut config = Config::default();
        assert_eq!(translator.output_root(&config), PathBuf::from("/project"));
        config.output = Some("dist".to_string());
        assert_eq!(translator.output_root(&config), PathBuf::from("/project/dist"));
        let overridden = Translator::new("/project").with_output("/elsewhere");
        assert_eq!(overridden.output_root(&config), PathBuf::from("/elsewhere"));
    }
}
