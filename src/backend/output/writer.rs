//! Persist output files under an output root.
//!
//! The writer keeps a manifest of the files it wrote so the next run can remove outputs that are no longer produced
//! (a type that moved to another namespace, a unit that disappeared). A failed run removes what it already wrote and
//! leaves the previous manifest untouched.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::OutputFile;

/// Manifest of the files written by the last successful run, relative to the output root.
pub const MANIFEST_FILE_NAME: &str = ".bridgejs-manifest.json";

#[derive(Debug, Error, Diagnostic)]
pub enum WriteFault {
    #[error("failed to write {}", .path.display())]
    #[diagnostic(code(bridgejs::write))]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("refusing to write outside the output root: {}", .0.display())]
    #[diagnostic(code(bridgejs::write), help("output paths must be relative and must not contain `..`"))]
    UnsafePath(PathBuf),
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Manifest {
    files: Vec<PathBuf>,
}

/// Files touched by one write.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteReport {
    /// Relative path to the content now on disk.
    pub files: BTreeMap<PathBuf, String>,
    /// Absolute (root-joined) paths written, in input order.
    pub written: Vec<PathBuf>,
    /// Stale outputs of the previous run that were removed.
    pub removed: Vec<PathBuf>,
}

pub struct OutputWriter {
    root: PathBuf,
}

impl OutputWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write every file, then drop the previous run's outputs that were not rewritten.
    #[tracing::instrument(skip_all, fields(root = %self.root.display(), files = files.len()))]
    pub fn write(&self, files: &[OutputFile]) -> Result<WriteReport, WriteFault> {
        for file in files {
            if !is_contained(&file.path) {
                return Err(WriteFault::UnsafePath(file.path.clone()));
            }
        }
        fs::create_dir_all(&self.root).map_err(|source| WriteFault::Io {
            path: self.root.clone(),
            source,
        })?;
        let previous = self.read_manifest();

        let mut report = WriteReport::default();
        for file in files {
            let full = self.root.join(&file.path);
            if let Err(fault) = write_one(&full, &file.content) {
                self.rollback(&report.written);
                return Err(fault);
            }
            tracing::debug!(path = %full.display(), bytes = file.content.len(), "wrote output");
            report.written.push(full);
            report.files.insert(file.path.clone(), file.content.clone());
        }

        let current: Vec<PathBuf> = files.iter().map(|f| f.path.clone()).collect();
        for stale in previous.files.iter().filter(|p| is_contained(p) && !current.contains(p)) {
            let full = self.root.join(stale);
            match fs::remove_file(&full) {
                Ok(()) => report.removed.push(full),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => tracing::warn!(path = %full.display(), error = %e, "could not remove stale output"),
            }
        }

        let manifest = Manifest { files: current };
        let manifest_path = self.root.join(MANIFEST_FILE_NAME);
        let text = serde_json::to_string_pretty(&manifest).map_err(|e| WriteFault::Io {
            path: manifest_path.clone(),
            source: io::Error::other(e),
        })?;
        write_one(&manifest_path, &text)?;
        Ok(report)
    }

    fn read_manifest(&self) -> Manifest {
        let path = self.root.join(MANIFEST_FILE_NAME);
        let Ok(text) = fs::read_to_string(&path) else {
            return Manifest::default();
        };
        serde_json::from_str(&text).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable output manifest");
            Manifest::default()
        })
    }

    fn rollback(&self, written: &[PathBuf]) {
        for path in written {
            if let Err(e) = fs::remove_file(path) {
                tracing::warn!(path = %path.display(), error = %e, "could not roll back output");
            }
        }
    }
}

fn write_one(path: &Path, content: &str) -> Result<(), WriteFault> {
    let io_fault = |source| WriteFault::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_fault)?;
    }
    fs::write(path, content).map_err(io_fault)
}

/// Relative, made only of normal segments.
fn is_contained(path: &Path) -> bool {
    path.components().next().is_some() && path.components().all(|c| matches!(c, Component::Normal(_)))
}
