// SPDX-FileCopyrightText: 2026 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Stats and their marshalling to and from object metadata.
//!
//! Stats are never stored as a structure. On write the caller-defined
//! fields travel as object user metadata; on read they are rebuilt from the
//! head response together with the backend-derived size, modification time
//! and entity tag.

use crate::backend::{ObjectHead, UserMetadata};
use std::collections::BTreeMap;

pub const SIZE: &str = "size";
pub const MODIFIED: &str = "modified";
pub const ETAG: &str = "etag";

/// Keys that belong to the backend and never appear as user metadata
pub const RESERVED_KEYS: [&str; 3] = [SIZE, MODIFIED, ETAG];

pub fn is_reserved(key: &str) -> bool {
    RESERVED_KEYS.contains(&key)
}

/// Metadata of a file or directory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stats {
    /// Byte count, absent for directories
    pub size: Option<u64>,
    /// Milliseconds since the Unix epoch
    pub modified: Option<i64>,
    /// Backend-assigned content tag
    pub etag: Option<String>,
    custom: BTreeMap<String, String>,
}

impl Stats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    /// Adds a caller-defined field; reserved keys are ignored
    pub fn with_custom<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        let _ = self.set_custom(key, value);
        self
    }

    /// Sets a caller-defined field, returning false if `key` is reserved
    pub fn set_custom<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) -> bool {
        let key = key.into();
        if is_reserved(&key) {
            return false;
        }
        _ = self.custom.insert(key, value.into());
        true
    }

    pub fn custom(&self) -> &BTreeMap<String, String> {
        &self.custom
    }

    /// Looks a field up by name, reserved or caller-defined
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            SIZE => self.size.map(|s| s.to_string()),
            MODIFIED => self.modified.map(|m| m.to_string()),
            ETAG => self.etag.clone(),
            _ => self.custom.get(key).cloned(),
        }
    }

    /// Directories are the entries without a size
    pub fn is_directory(&self) -> bool {
        self.size.is_none()
    }

    pub fn is_empty(&self) -> bool {
        self.size.is_none()
            && self.modified.is_none()
            && self.etag.is_none()
            && self.custom.is_empty()
    }
}

/// Builds stats from a head response.
///
/// `size` is only filled in for files. User metadata named like a reserved
/// field is dropped so the backend-derived values cannot be shadowed.
pub fn to_stats(head: &ObjectHead, is_directory: bool) -> Stats {
    let mut stats = Stats::new();
    if !is_directory {
        stats.size = head.content_length;
    }
    stats.modified = head.last_modified.map(|t| t.timestamp_millis());
    stats.etag = head.etag.clone();
    for (key, value) in &head.metadata {
        _ = stats.set_custom(key.as_str(), value.as_str());
    }
    stats
}

/// Extracts the user metadata to persist alongside an object
pub fn to_metadata(stats: &Stats) -> UserMetadata {
    stats.custom.clone()
}
