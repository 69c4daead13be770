//! Definition loader.
//!
//! Scans a root directory for definition files, derives a URL prefix from
//! each file's location, and emits the flat ordered endpoint list the
//! dispatch engine is built from. Everything short of a missing root
//! directory is contained as a per-file or per-declaration diagnostic.

use crate::definition::{EndpointDeclaration, ResolvedEndpoint};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::{Component, Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error;
use tracing::debug;

/// Matches the two recognized definition extensions.
static DEFINITION_GLOBS: LazyLock<GlobSet> = LazyLock::new(|| {
    let mut builder = GlobSetBuilder::new();
    builder.add(Glob::new("**/*.yaml").unwrap());
    builder.add(Glob::new("**/*.yml").unwrap());
    builder.build().unwrap()
});

/// Fatal loader failure. The only class that should stop the process.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("definitions directory not found: {0}")]
    RootNotFound(PathBuf),
}

/// A skipped file or declaration, surfaced but never fatal.
#[derive(Debug, Clone)]
pub struct LoadDiagnostic {
    /// Definition file the problem was found in, relative to the root.
    pub source: String,
    /// What went wrong.
    pub detail: String,
}

/// Result of loading a definition tree.
#[derive(Debug, Default)]
pub struct LoadOutcome {
    /// Resolved endpoints, in file order then within-file order.
    pub endpoints: Vec<ResolvedEndpoint>,
    /// Everything that was skipped along the way.
    pub diagnostics: Vec<LoadDiagnostic>,
}

/// Load all endpoint definitions under `root`.
///
/// An empty result is not an error; callers decide how to report it.
pub fn load_endpoints(root: &Path) -> Result<LoadOutcome, LoadError> {
    if !root.is_dir() {
        return Err(LoadError::RootNotFound(root.to_path_buf()));
    }

    let mut outcome = LoadOutcome::default();
    let mut files = Vec::new();
    collect_definition_files(root, root, &mut files, &mut outcome.diagnostics);
    files.sort();

    for file in files {
        load_file(root, &file, &mut outcome);
    }

    Ok(outcome)
}

/// Recursively gather definition files. Directory read errors become
/// diagnostics so a single unreadable subtree cannot sink the load.
fn collect_definition_files(
    root: &Path,
    dir: &Path,
    files: &mut Vec<PathBuf>,
    diagnostics: &mut Vec<LoadDiagnostic>,
) {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(error) => {
            diagnostics.push(LoadDiagnostic {
                source: relative_display(root, dir),
                detail: format!("failed to read directory: {}", error),
            });
            return;
        }
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_definition_files(root, &path, files, diagnostics);
        } else if DEFINITION_GLOBS.is_match(&path) {
            files.push(path);
        }
    }
}

fn load_file(root: &Path, file: &Path, outcome: &mut LoadOutcome) {
    let source = relative_display(root, file);

    let content = match std::fs::read_to_string(file) {
        Ok(content) => content,
        Err(error) => {
            outcome.diagnostics.push(LoadDiagnostic {
                source,
                detail: format!("failed to read file: {}", error),
            });
            return;
        }
    };

    let parsed = match serde_yaml::from_str::<serde_yaml::Value>(&content) {
        Ok(value) => value,
        Err(error) => {
            outcome.diagnostics.push(LoadDiagnostic {
                source,
                detail: format!("failed to parse: {}", error),
            });
            return;
        }
    };

    let Some(items) = parsed.as_sequence() else {
        outcome.diagnostics.push(LoadDiagnostic {
            source,
            detail: "top-level shape is not a sequence of declarations".to_string(),
        });
        return;
    };

    let prefix = route_prefix(file.strip_prefix(root).unwrap_or(file));
    debug!(source = %source, prefix = %prefix, declarations = items.len(), "Loading definition file");

    for (index, item) in items.iter().enumerate() {
        let declaration = match serde_yaml::from_value::<EndpointDeclaration>(item.clone()) {
            Ok(declaration) => declaration,
            Err(error) => {
                outcome.diagnostics.push(LoadDiagnostic {
                    source: source.clone(),
                    detail: format!("declaration {}: {}", index, error),
                });
                continue;
            }
        };

        if let Err(error) = declaration.validate() {
            outcome.diagnostics.push(LoadDiagnostic {
                source: source.clone(),
                detail: format!("declaration {}: {}", index, error),
            });
            continue;
        }

        outcome.endpoints.push(declaration.resolve(&prefix, &source));
    }
}

/// Derive a URL prefix from a file's path relative to the root.
///
/// The extension is stripped and directory separators become `/`. A trailing
/// `index` segment (case-sensitive) is dropped, so an index file contributes
/// routes to its directory's own prefix.
fn route_prefix(relative: &Path) -> String {
    let stem = relative.with_extension("");
    let mut segments: Vec<String> = stem
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => part.to_str().map(str::to_string),
            _ => None,
        })
        .collect();

    if segments.last().is_some_and(|segment| segment == "index") {
        segments.pop();
    }

    if segments.is_empty() {
        String::new()
    } else {
        format!("/{}", segments.join("/"))
    }
}

fn relative_display(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => part.to_str(),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
