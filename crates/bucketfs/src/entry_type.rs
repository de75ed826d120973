// SPDX-FileCopyrightText: 2026 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

/// Entry kinds a head probe can be narrowed to
///
/// Passing `None` where an `Option<EntryType>` is expected means
/// "determine automatically".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    /// Regular file entry
    File,
    /// Directory entry, explicit (marker) or implied by children
    Directory,
}

impl EntryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryType::File => "file",
            EntryType::Directory => "directory",
        }
    }

    /// Whether a probe with this hint should look at file objects
    pub fn wants_file(hint: Option<EntryType>) -> bool {
        !matches!(hint, Some(EntryType::Directory))
    }

    /// Whether a probe with this hint should look at directory markers and children
    pub fn wants_directory(hint: Option<EntryType>) -> bool {
        !matches!(hint, Some(EntryType::File))
    }
}

impl std::fmt::Display for EntryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for EntryType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "file" => Ok(EntryType::File),
            "directory" | "dir" => Ok(EntryType::Directory),
            other => Err(format!("Unknown entry type: {}", other)),
        }
    }
}
