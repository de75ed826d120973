// SPDX-FileCopyrightText: 2026 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Logical path to backend key mapping.
//!
//! Logical paths are repository-relative and `/`-separated. Backend keys are
//! `<repository>/<path>` for files and `<repository>/<path>/` for directory
//! markers; the trailing delimiter is the only thing that tells the two apart.

/// Separator used both in logical paths and in backend keys
pub const DELIMITER: char = '/';

/// Iterates the meaningful components of a path, skipping empty and `.` parts
pub fn components(path: &str) -> impl Iterator<Item = &str> {
    path.split(DELIMITER).filter(|c| !c.is_empty() && *c != ".")
}

/// True for the empty path and for any path made only of separators
pub fn is_root(path: &str) -> bool {
    components(path).next().is_none()
}

/// Normalizes a logical path to its absolute `/a/b` form (`/` for the root)
pub fn normalize(path: &str) -> String {
    let mut out = String::new();
    for component in components(path) {
        out.push(DELIMITER);
        out.push_str(component);
    }
    if out.is_empty() {
        out.push(DELIMITER);
    }
    out
}

/// Joins a child name onto a logical directory path
pub fn join(dir: &str, name: &str) -> String {
    let mut out = normalize(dir);
    if !out.ends_with(DELIMITER) {
        out.push(DELIMITER);
    }
    out.push_str(name);
    normalize(&out)
}

/// Extracts the final component of a path, if any
pub fn basename(path: &str) -> Option<&str> {
    components(path).last()
}

/// Maps logical paths to backend keys under a repository root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyMapper {
    repository: String,
}

impl KeyMapper {
    pub fn new(repository: &str) -> Self {
        Self {
            repository: components(repository).collect::<Vec<_>>().join("/"),
        }
    }

    /// The repository root without leading or trailing delimiters
    pub fn repository(&self) -> &str {
        &self.repository
    }

    /// Key for `path`, with a trailing delimiter when `is_directory` is set
    ///
    /// With an empty repository the root directory key is the empty prefix,
    /// so that listing the root enumerates the whole bucket.
    pub fn key(&self, path: &str, is_directory: bool) -> String {
        let mut key = self.repository.clone();
        for component in components(path) {
            if !key.is_empty() {
                key.push(DELIMITER);
            }
            key.push_str(component);
        }
        if is_directory && !key.is_empty() {
            key.push(DELIMITER);
        }
        key
    }
}
