//! File-name derivation for output units.
//!
//! Unit names come from type names, namespaces and user-supplied file names, so they may contain anything. These
//! helpers turn them into safe relative paths: `/`-separated, no rooted prefix, no `:`, no `.`/`..` segments.

use crate::config::FileNameCasing;

/// Make `name` a safe relative path.
///
/// Every `:` becomes `_`, `\` separators become `/`, leading separators are trimmed and empty, `.` and `..` segments
/// are dropped. The result is empty only when nothing usable is left.
pub fn sanitize(name: &str) -> String {
    let replaced = name.replace(':', "_").replace('\\', "/");
    replaced
        .split('/')
        .map(str::trim)
        .filter(|segment| !segment.is_empty() && *segment != "." && *segment != "..")
        .collect::<Vec<_>>()
        .join("/")
}

/// Apply the casing policy to every path segment.
pub fn apply_casing(path: &str, casing: FileNameCasing) -> String {
    match casing {
        FileNameCasing::None => path.to_string(),
        FileNameCasing::Lowercase => path.to_lowercase(),
        FileNameCasing::CamelCase => path.split('/').map(lower_first).collect::<Vec<_>>().join("/"),
    }
}

fn lower_first(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}
