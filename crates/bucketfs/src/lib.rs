// SPDX-FileCopyrightText: 2026 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! A hierarchical filesystem over a flat object store.
//!
//! Logical paths under a repository prefix map onto object keys. Directories
//! are either emulated with zero-length marker objects whose keys end in `/`
//! or inferred from the keys that share their prefix. Stats live in object
//! user metadata.

pub mod backend;
pub mod config;
pub mod data;
pub mod dir;
pub mod entry_type;
pub mod error;
pub mod file;
pub mod fs;
pub mod head;
pub mod key;
pub mod memory;
pub mod s3;
pub mod stats;
pub mod url;

#[cfg(test)]
mod tests;

pub use backend::{
    BackendError, BackendResult, ByteReader, ListPage, ListRequest, ListedObject, ObjectClient,
    ObjectHead, SignedOperation, UserMetadata,
};
pub use config::{BucketConfig, ConfigError, FileSystemOptions, S3Config};
pub use data::{Body, Data};
pub use dir::BucketDir;
pub use entry_type::EntryType;
pub use error::{Error, ErrorKind, Intent, Result, classify};
pub use file::{BucketFile, WriteOptions};
pub use fs::{BucketFs, ClientSource};
pub use key::KeyMapper;
pub use memory::{DeleteMissing, MemoryClient, Operation};
pub use self::s3::S3Client;
pub use stats::Stats;
pub use url::{DEFAULT_URL_EXPIRY, UrlOptions};
