// SPDX-FileCopyrightText: 2026 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Filesystem error taxonomy and the classifier every backend failure
//! passes through.

use crate::backend::BackendError;

pub type Result<T> = std::result::Result<T, Error>;

/// Represents errors that can occur in filesystem operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("Path not found: {repository}:{path}: {source}")]
    NotFound {
        repository: String,
        path: String,
        source: BackendError,
    },

    #[error("Path not readable: {repository}:{path}: {source}")]
    NotReadable {
        repository: String,
        path: String,
        source: BackendError,
    },

    #[error("No modification allowed: {repository}:{path}: {source}")]
    NoModificationAllowed {
        repository: String,
        path: String,
        source: BackendError,
    },

    #[error("Not supported: {repository}:{path}: {reason}")]
    NotSupported {
        repository: String,
        path: String,
        reason: String,
    },
}

/// Discriminant of [`Error`] for callers that branch on the taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    NotReadable,
    NoModificationAllowed,
    NotSupported,
}

/// Whether the failed operation meant to read or to modify the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Read,
    Write,
}

impl Error {
    pub fn not_found<R: Into<String>, P: Into<String>>(
        repository: R,
        path: P,
        source: BackendError,
    ) -> Self {
        Error::NotFound {
            repository: repository.into(),
            path: path.into(),
            source,
        }
    }

    pub fn not_readable<R: Into<String>, P: Into<String>>(
        repository: R,
        path: P,
        source: BackendError,
    ) -> Self {
        Error::NotReadable {
            repository: repository.into(),
            path: path.into(),
            source,
        }
    }

    pub fn no_modification_allowed<R: Into<String>, P: Into<String>>(
        repository: R,
        path: P,
        source: BackendError,
    ) -> Self {
        Error::NoModificationAllowed {
            repository: repository.into(),
            path: path.into(),
            source,
        }
    }

    pub fn not_supported<R: Into<String>, P: Into<String>, S: Into<String>>(
        repository: R,
        path: P,
        reason: S,
    ) -> Self {
        Error::NotSupported {
            repository: repository.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::NotFound { .. } => ErrorKind::NotFound,
            Error::NotReadable { .. } => ErrorKind::NotReadable,
            Error::NoModificationAllowed { .. } => ErrorKind::NoModificationAllowed,
            Error::NotSupported { .. } => ErrorKind::NotSupported,
        }
    }

    /// Logical path the failing operation was addressed to
    pub fn path(&self) -> &str {
        match self {
            Error::NotFound { path, .. }
            | Error::NotReadable { path, .. }
            | Error::NoModificationAllowed { path, .. }
            | Error::NotSupported { path, .. } => path,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}

/// Maps a backend failure onto the filesystem taxonomy.
///
/// A 404 is `NotFound` whatever the intent; anything else is
/// `NoModificationAllowed` for writes and `NotReadable` for reads.
pub fn classify(repository: &str, path: &str, source: BackendError, intent: Intent) -> Error {
    if source.is_not_found() {
        return Error::not_found(repository, path, source);
    }
    match intent {
        Intent::Write => Error::no_modification_allowed(repository, path, source),
        Intent::Read => Error::not_readable(repository, path, source),
    }
}
