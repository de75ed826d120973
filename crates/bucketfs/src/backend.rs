// SPDX-FileCopyrightText: 2026 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! The object-store client seam.
//!
//! The filesystem never speaks a wire protocol itself. Everything it needs
//! from the store (head, get, put, streaming upload, copy, delete, delimited
//! listing and URL signing) goes through [`ObjectClient`]. Implementations
//! report failures as [`BackendError`], which the error classifier turns
//! into the filesystem taxonomy before anything reaches a caller.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::pin::Pin;
use std::time::Duration;
use tokio::io::AsyncRead;

/// User metadata attached to an object (`x-amz-meta-*` on S3)
pub type UserMetadata = BTreeMap<String, String>;

/// A streaming body of unknown length
pub type ByteReader = Pin<Box<dyn AsyncRead + Send>>;

/// HTTP status the store uses for an absent key
pub const STATUS_NOT_FOUND: u16 = 404;

/// Raw failure reported by an object-store client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendError {
    /// Response status, when the failure came from an HTTP response
    pub status: Option<u16>,
    pub message: String,
}

impl BackendError {
    pub fn new<S: Into<String>>(message: S) -> Self {
        Self {
            status: None,
            message: message.into(),
        }
    }

    pub fn with_status<S: Into<String>>(status: u16, message: S) -> Self {
        Self {
            status: Some(status),
            message: message.into(),
        }
    }

    pub fn not_found<S: AsRef<str>>(key: S) -> Self {
        Self::with_status(
            STATUS_NOT_FOUND,
            format!("no such key: {}", key.as_ref()),
        )
    }

    pub fn is_not_found(&self) -> bool {
        self.status == Some(STATUS_NOT_FOUND)
    }
}

impl std::fmt::Display for BackendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.status {
            Some(status) => write!(f, "backend status {}: {}", status, self.message),
            None => write!(f, "backend failure: {}", self.message),
        }
    }
}

impl std::error::Error for BackendError {}

pub type BackendResult<T> = std::result::Result<T, BackendError>;

/// Response to a head request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectHead {
    pub content_length: Option<u64>,
    pub last_modified: Option<DateTime<Utc>>,
    pub etag: Option<String>,
    pub metadata: UserMetadata,
}

/// One delimited listing query
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListRequest {
    pub prefix: String,
    pub delimiter: Option<String>,
    pub max_keys: Option<usize>,
    pub continuation_token: Option<String>,
}

impl ListRequest {
    /// A `/`-delimited listing under `prefix`
    pub fn delimited<S: Into<String>>(prefix: S) -> Self {
        Self {
            prefix: prefix.into(),
            delimiter: Some(crate::key::DELIMITER.to_string()),
            max_keys: None,
            continuation_token: None,
        }
    }

    pub fn with_max_keys(mut self, max_keys: usize) -> Self {
        self.max_keys = Some(max_keys);
        self
    }
}

/// An object returned in the contents of a listing page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedObject {
    pub key: String,
    pub size: u64,
}

/// One page of a delimited listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListPage {
    /// Grouped keys, each ending in the delimiter (child directories)
    pub common_prefixes: Vec<String>,
    /// Exact keys directly under the prefix (child files and markers)
    pub contents: Vec<ListedObject>,
    pub is_truncated: bool,
    pub next_continuation_token: Option<String>,
}

impl ListPage {
    pub fn is_empty(&self) -> bool {
        self.common_prefixes.is_empty() && self.contents.is_empty()
    }
}

/// Operations a signed URL can grant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignedOperation {
    GetObject,
    PutObject,
    DeleteObject,
}

impl SignedOperation {
    pub fn method(&self) -> &'static str {
        match self {
            SignedOperation::GetObject => "GET",
            SignedOperation::PutObject => "PUT",
            SignedOperation::DeleteObject => "DELETE",
        }
    }
}

/// Object-store client used by the filesystem
///
/// Keys are raw store keys: the trailing `/` of a directory marker is
/// significant and must be preserved by implementations.
#[async_trait]
pub trait ObjectClient: Send + Sync {
    async fn head_object(&self, key: &str) -> BackendResult<ObjectHead>;

    async fn get_object(&self, key: &str) -> BackendResult<Bytes>;

    /// Single-shot upload with an explicit content length
    async fn put_object(
        &self,
        key: &str,
        body: Bytes,
        content_length: u64,
        metadata: Option<&UserMetadata>,
    ) -> BackendResult<()>;

    /// Streaming upload of a body whose length is not known up front
    async fn upload(
        &self,
        key: &str,
        body: ByteReader,
        metadata: Option<&UserMetadata>,
    ) -> BackendResult<()>;

    /// Copy an object onto itself, replacing its user metadata
    async fn copy_object(&self, key: &str, metadata: &UserMetadata) -> BackendResult<()>;

    async fn delete_object(&self, key: &str) -> BackendResult<()>;

    async fn list_objects(&self, request: &ListRequest) -> BackendResult<ListPage>;

    async fn sign_url(
        &self,
        operation: SignedOperation,
        key: &str,
        expires: Duration,
    ) -> BackendResult<String>;
}
