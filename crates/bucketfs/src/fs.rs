// SPDX-FileCopyrightText: 2026 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use crate::backend::ObjectClient;
use crate::config::{BucketConfig, FileSystemOptions, S3Config};
use crate::data::Data;
use crate::dir::BucketDir;
use crate::entry_type::EntryType;
use crate::error::{Error, Intent, Result, classify};
use crate::file::{BucketFile, WriteOptions};
use crate::head::{self, Resolution};
use crate::key::{self, KeyMapper};
use crate::s3::S3Client;
use crate::stats::{Stats, to_metadata, to_stats};
use crate::url::{UrlOptions, signed_operation};
use bytes::Bytes;
use diagnostics::*;
use futures::future::{BoxFuture, FutureExt, Shared};
use std::sync::Arc;
use tokio::sync::Mutex;

type Connecting = Shared<BoxFuture<'static, Result<Arc<dyn ObjectClient>>>>;

/// Where the backend client comes from
#[derive(Clone)]
pub enum ClientSource {
    /// Build an S3 client from settings on first use
    S3(S3Config),
    /// Use an already constructed client
    Client(Arc<dyn ObjectClient>),
}

/// A repository inside a bucket, seen as a filesystem
///
/// Cheap to clone; clones share the backend connection.
#[derive(Clone)]
pub struct BucketFs {
    inner: Arc<Inner>,
}

struct Inner {
    keys: KeyMapper,
    options: FileSystemOptions,
    source: ClientSource,
    connection: Mutex<Option<Connecting>>,
}

impl BucketFs {
    pub fn new(repository: &str, source: ClientSource, options: FileSystemOptions) -> Self {
        Self {
            inner: Arc::new(Inner {
                keys: KeyMapper::new(repository),
                options,
                source,
                connection: Mutex::new(None),
            }),
        }
    }

    pub fn with_client<C: ObjectClient + 'static>(
        repository: &str,
        client: C,
        options: FileSystemOptions,
    ) -> Self {
        Self::new(repository, ClientSource::Client(Arc::new(client)), options)
    }

    pub fn from_config(config: &BucketConfig) -> Self {
        Self::new(
            &config.repository,
            ClientSource::S3(config.s3.clone()),
            config.options.clone(),
        )
    }

    pub fn repository(&self) -> &str {
        self.inner.keys.repository()
    }

    /// Whether directories are emulated with marker objects
    pub fn supports_directory(&self) -> bool {
        self.inner.options.can_create_directory
    }

    pub fn can_patch_accessed(&self) -> bool {
        false
    }

    pub fn can_patch_created(&self) -> bool {
        false
    }

    pub fn can_patch_modified(&self) -> bool {
        false
    }

    pub fn key(&self, path: &str, is_directory: bool) -> String {
        self.inner.keys.key(path, is_directory)
    }

    pub(crate) fn keys(&self) -> &KeyMapper {
        &self.inner.keys
    }

    /// Classifies a backend failure for `path`
    pub fn error(&self, path: &str, err: crate::backend::BackendError, intent: Intent) -> Error {
        classify(self.repository(), &key::normalize(path), err, intent)
    }

    /// The backend client, connecting on first use.
    ///
    /// With directory emulation on, connecting also makes sure the
    /// repository root marker exists. Concurrent callers share a single
    /// attempt and see the same outcome; a failed attempt is retried by the
    /// next caller.
    pub async fn client(&self) -> Result<Arc<dyn ObjectClient>> {
        let connecting = {
            let mut slot = self.inner.connection.lock().await;
            match slot.as_ref() {
                Some(connecting) if !matches!(connecting.peek(), Some(Err(_))) => {
                    connecting.clone()
                }
                _ => {
                    let connecting = connect(
                        self.inner.source.clone(),
                        self.inner.keys.clone(),
                        self.supports_directory(),
                    )
                    .boxed()
                    .shared();
                    *slot = Some(connecting.clone());
                    connecting
                }
            }
        };
        connecting.await
    }

    pub fn dir(&self, path: &str) -> BucketDir {
        BucketDir::new(self.clone(), path)
    }

    pub fn file(&self, path: &str) -> BucketFile {
        BucketFile::new(self.clone(), path)
    }

    /// Stats for `path`, optionally narrowed to one entry type
    pub async fn head(&self, path: &str, hint: Option<EntryType>) -> Result<Stats> {
        let client = self.client().await?;
        if !self.supports_directory() {
            return client
                .head_object(&self.key(path, false))
                .await
                .map(|head| to_stats(&head, false))
                .map_err(|e| self.error(path, e, Intent::Read));
        }

        match head::resolve(client.as_ref(), self.keys(), path, hint).await {
            Resolution::File(head) => Ok(to_stats(&head, false)),
            Resolution::Directory(head) => {
                let mut stats = to_stats(&head, true);
                stats.size = None;
                Ok(stats)
            }
            Resolution::ImplicitDirectory => Ok(Stats::new()),
            Resolution::Missing(err) => Err(self.error(path, err, Intent::Read)),
        }
    }

    /// Immediate children of `path`; empty when nothing lives under it
    pub async fn list(&self, path: &str) -> Result<Vec<String>> {
        self.dir(path).list().await
    }

    pub async fn read(&self, path: &str) -> Result<Data> {
        self.file(path).read().await
    }

    /// Writes `data`; `stats` are the entry's current stats, if it exists
    pub async fn write(
        &self,
        path: &str,
        data: Data,
        stats: Option<&Stats>,
        options: &WriteOptions,
    ) -> Result<()> {
        self.file(path).write(data, stats, options).await
    }

    pub async fn remove(&self, path: &str) -> Result<()> {
        self.file(path).rm().await
    }

    pub async fn make_directory_marker(&self, path: &str) -> Result<()> {
        self.dir(path).mkcol().await
    }

    pub async fn remove_directory_marker(&self, path: &str) -> Result<()> {
        self.dir(path).rmdir().await
    }

    /// Signed, time-limited URL granting `options.url_type` on `path`
    pub async fn to_url(
        &self,
        path: &str,
        is_directory: bool,
        options: &UrlOptions,
    ) -> Result<String> {
        let operation = signed_operation(&options.url_type).ok_or_else(|| {
            Error::not_supported(
                self.repository(),
                key::normalize(path),
                format!("\"{}\" is not supported", options.url_type),
            )
        })?;
        let client = self.client().await?;
        client
            .sign_url(operation, &self.key(path, is_directory), options.expires)
            .await
            .map_err(|e| self.error(path, e, Intent::Read))
    }

    /// Replaces the user metadata of `path` with the custom fields of `props`.
    ///
    /// A directory is assumed when `props` carries no size.
    pub async fn patch(&self, path: &str, props: &Stats) -> Result<()> {
        let key = self.key(path, props.is_directory());
        let client = self.client().await?;
        client
            .copy_object(&key, &to_metadata(props))
            .await
            .map_err(|e| self.error(path, e, Intent::Write))
    }
}

async fn connect(
    source: ClientSource,
    keys: KeyMapper,
    ensure_root: bool,
) -> Result<Arc<dyn ObjectClient>> {
    let repository = keys.repository().to_string();
    let client: Arc<dyn ObjectClient> = match source {
        ClientSource::Client(client) => client,
        ClientSource::S3(config) => Arc::new(
            S3Client::connect(&config)
                .map_err(|e| classify(&repository, "/", e, Intent::Read))?,
        ),
    };

    let root = keys.key("/", true);
    if !ensure_root || root.is_empty() {
        return Ok(client);
    }

    match client.head_object(&root).await {
        Ok(_) => {
            debug!("root marker {root} present", root: root.as_str());
            return Ok(client);
        }
        Err(e) => {
            let err = classify(&repository, "/", e, Intent::Read);
            if !err.is_not_found() {
                return Err(err);
            }
        }
    }

    info!("creating root marker {root}", root: root.as_str());
    client
        .put_object(&root, Bytes::new(), 0, None)
        .await
        .map_err(|e| classify(&repository, "/", e, Intent::Write))?;
    Ok(client)
}
