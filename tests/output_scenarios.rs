//! End-to-end output scenarios: partitioning, formatting variants, determinism and rewrites of an output root.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use bridgejs::backend::output::Runtime;
use bridgejs::config::{FileNameCasing, OutputBy, OutputFormatting};
use bridgejs::{Config, Translator, Variant};
use bridgejs_model::{Expr, Member, ResolvedProgram, Stmt, TypeDecl};

fn two_namespaces() -> ResolvedProgram {
    ResolvedProgram::new("Demo")
        .with_type(TypeDecl::class("N1", "A"))
        .with_type(TypeDecl::class("N2", "B"))
}

fn greeter() -> TypeDecl {
    TypeDecl::class("App", "Greeter")
        .with_member(Member::field("count", "System.Int32", None))
        .with_member(Member::method(
            "Greet",
            vec![],
            "System.String",
            vec![Stmt::ret(Some(Expr::string("hello   world")))],
        ))
}

/// Every regular file under `root`, relative path to content, manifest excluded.
fn tree(root: &Path) -> BTreeMap<PathBuf, String> {
    fn walk(root: &Path, dir: &Path, out: &mut BTreeMap<PathBuf, String>) {
        for entry in fs::read_dir(dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                walk(root, &path, out);
            } else if path.file_name().unwrap() != bridgejs::backend::output::MANIFEST_FILE_NAME {
                let relative = path.strip_prefix(root).unwrap().to_path_buf();
                out.insert(relative, fs::read_to_string(&path).unwrap());
            }
        }
    }
    let mut out = BTreeMap::new();
    walk(root, root, &mut out);
    out
}

#[test]
fn namespaces_formatted_lowercase_give_one_file_per_namespace() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::default()
        .with_output_by(OutputBy::Namespace)
        .with_output_formatting(OutputFormatting::Formatted)
        .with_file_name_casing(FileNameCasing::Lowercase);
    Translator::new(dir.path())
        .with_config(config)
        .translate(&two_namespaces())
        .unwrap();

    let files = tree(dir.path());
    let names: Vec<_> = files.keys().cloned().collect();
    assert_eq!(names, vec![PathBuf::from("n1.js"), PathBuf::from("n2.js")]);
    assert!(files[Path::new("n1.js")].contains("\"N1.A\""));
    assert!(!files[Path::new("n1.js")].contains("\"N2.B\""));
    assert!(files[Path::new("n2.js")].contains("\"N2.B\""));
}

#[test]
fn single_class_with_both_variants() {
    let dir = tempfile::tempdir().unwrap();
    let program = ResolvedProgram::new("Demo").with_type(greeter());
    let config = Config::default().with_output_by(OutputBy::Class);
    let translation = Translator::new(dir.path())
        .with_config(config)
        .translate(&program)
        .unwrap();

    let files = tree(dir.path());
    assert_eq!(files.len(), 2);
    let beautified = &files[Path::new("app.Greeter.js")];
    let minified = &files[Path::new("app.Greeter.min.js")];
    assert!(minified.len() < beautified.len());
    assert!(!minified.contains('\n'));
    // String contents survive minification untouched.
    assert!(minified.contains("\"hello   world\""));
    let variants: Vec<_> = translation.files.iter().map(|f| f.variant).collect();
    assert_eq!(variants, vec![Variant::Beautified, Variant::Minified]);
}

#[test]
fn runs_are_deterministic() {
    let program = two_namespaces().with_type(greeter());
    let config = Config::default()
        .with_output_by(OutputBy::Namespace)
        .with_type_script(true);

    let first = tempfile::tempdir().unwrap();
    let second = tempfile::tempdir().unwrap();
    for dir in [&first, &second] {
        Translator::new(dir.path())
            .with_config(config.clone())
            .translate(&program)
            .unwrap();
    }
    let again = Translator::new(first.path())
        .with_config(config)
        .translate(&program)
        .unwrap();

    assert_eq!(tree(first.path()), tree(second.path()));
    assert!(again.report.unwrap().removed.is_empty());
}

#[test]
fn by_class_yields_one_script_per_type_and_by_project_exactly_one() {
    let program = two_namespaces().with_type(greeter()).with_type(TypeDecl::class("N1", "C"));

    let by_class = Translator::new(".")
        .with_config(Config::default().with_output_by(OutputBy::Class))
        .emit(&program)
        .unwrap();
    let count = |variant| by_class.files.iter().filter(|f| f.variant == variant).count();
    assert_eq!(count(Variant::Beautified), program.types.len());
    assert_eq!(count(Variant::Minified), program.types.len());

    let by_project = Translator::new(".")
        .with_config(Config::default().with_output_formatting(OutputFormatting::Formatted))
        .emit(&program)
        .unwrap();
    assert_eq!(by_project.files.len(), 1);
    assert_eq!(by_project.files[0].path, PathBuf::from("demo.js"));
}

#[test]
fn declarations_are_never_minified() {
    let program = ResolvedProgram::new("Demo").with_type(greeter());
    let translation = Translator::new(".")
        .with_config(
            Config::default()
                .with_output_formatting(OutputFormatting::Minified)
                .with_type_script(true),
        )
        .emit(&program)
        .unwrap();
    let paths: Vec<_> = translation.files.iter().map(|f| f.path.clone()).collect();
    assert_eq!(paths, vec![PathBuf::from("demo.min.js"), PathBuf::from("demo.d.ts")]);
    assert!(translation.files[1].content.contains("\n    export class Greeter {\n"));
}

#[test]
fn moving_a_type_removes_its_previous_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::default()
        .with_output_by(OutputBy::Namespace)
        .with_output_formatting(OutputFormatting::Formatted);
    Translator::new(dir.path())
        .with_config(config.clone())
        .translate(&two_namespaces())
        .unwrap();
    assert!(dir.path().join("n2.js").exists());

    let moved = ResolvedProgram::new("Demo")
        .with_type(TypeDecl::class("N1", "A"))
        .with_type(TypeDecl::class("N3", "B"));
    let translation = Translator::new(dir.path())
        .with_config(config)
        .translate(&moved)
        .unwrap();

    assert_eq!(translation.report.unwrap().removed, vec![dir.path().join("n2.js")]);
    let names: Vec<_> = tree(dir.path()).into_keys().collect();
    assert_eq!(names, vec![PathBuf::from("n1.js"), PathBuf::from("n3.js")]);
}

#[test]
fn hostile_file_names_stay_under_the_output_root() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out");
    let program = ResolvedProgram::new("Demo")
        .with_type(TypeDecl::class("N1", "A").with_output_file("C:\\..\\..\\escape"))
        .with_type(TypeDecl::class("N1", "B").with_output_file("/etc/passwd"));
    Translator::new(dir.path())
        .with_config(Config::default().with_output_formatting(OutputFormatting::Formatted))
        .with_output(&out)
        .translate(&program)
        .unwrap();

    let names: Vec<_> = tree(&out).into_keys().collect();
    assert_eq!(names, vec![PathBuf::from("c_/escape.js"), PathBuf::from("etc/passwd.js")]);
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn switching_partitioning_mode_leaves_no_stale_files() {
    let dir = tempfile::tempdir().unwrap();
    let program = two_namespaces().with_type(greeter());
    Translator::new(dir.path())
        .with_config(Config::default().with_output_by(OutputBy::Class))
        .translate(&program)
        .unwrap();
    assert_eq!(tree(dir.path()).len(), 2 * program.types.len());

    Translator::new(dir.path())
        .with_config(Config::default().with_output_by(OutputBy::Project))
        .translate(&program)
        .unwrap();
    let names: Vec<_> = tree(dir.path()).into_keys().collect();
    assert_eq!(names, vec![PathBuf::from("demo.js"), PathBuf::from("demo.min.js")]);
}

#[test]
fn runtime_is_shipped_under_the_same_rules() {
    let dir = tempfile::tempdir().unwrap();
    let runtime = Runtime {
        script: "var Bridge = {\n    define: function (name, body) {\n        return body;\n    }\n};\n".to_string(),
        declarations: Some("declare var Bridge: any;\n".to_string()),
    };
    let config = Config::default()
        .with_output_formatting(OutputFormatting::Minified)
        .with_type_script(true);
    Translator::new(dir.path())
        .with_config(config)
        .with_runtime(Box::new(runtime))
        .translate(&ResolvedProgram::new("Demo").with_type(greeter()))
        .unwrap();

    let files = tree(dir.path());
    let names: Vec<_> = files.keys().cloned().collect();
    assert_eq!(
        names,
        vec![
            PathBuf::from("bridge.d.ts"),
            PathBuf::from("bridge.min.js"),
            PathBuf::from("demo.d.ts"),
            PathBuf::from("demo.min.js"),
        ]
    );
    assert!(!files[Path::new("bridge.min.js")].contains('\n'));
    assert!(files[Path::new("bridge.min.js")].contains("define"));
}
