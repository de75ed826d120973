// SPDX-FileCopyrightText: 2026 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! In-memory object store.
//!
//! Behaves like a flat, strongly consistent S3 bucket: raw keys in sorted
//! order, delimiter listings with opaque continuation tokens, and user
//! metadata on every object. Tests use the call counters and failure
//! injection to observe and perturb what the filesystem sends.

use crate::backend::{
    BackendError, BackendResult, ByteReader, ListPage, ListRequest, ListedObject, ObjectClient,
    ObjectHead, SignedOperation, UserMetadata,
};
use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use diagnostics::*;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tokio::sync::Mutex;

/// Page size S3 uses when the request does not ask for less
pub const DEFAULT_MAX_KEYS: usize = 1000;

/// Client operations, for counting and failure injection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Head,
    Get,
    Put,
    Upload,
    Copy,
    Delete,
    List,
    Sign,
}

/// What deleting an absent key does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeleteMissing {
    /// Succeed silently, as S3 does
    #[default]
    NoOp,
    /// Fail with a 404
    NotFound,
}

#[derive(Debug, Clone)]
struct StoredObject {
    body: Bytes,
    metadata: UserMetadata,
    etag: String,
    last_modified: DateTime<Utc>,
}

/// In-memory [`ObjectClient`]; clones share the same bucket
///
/// Page size and delete policy belong to the handle: a builder call affects
/// the returned client and clones made from it afterwards, never clones
/// taken earlier.
#[derive(Clone, Default)]
pub struct MemoryClient {
    state: Arc<Mutex<State>>,
    settings: Settings,
}

#[derive(Debug, Clone, Copy)]
struct Settings {
    page_size: usize,
    delete_missing: DeleteMissing,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_MAX_KEYS,
            delete_missing: DeleteMissing::default(),
        }
    }
}

#[derive(Default)]
struct State {
    objects: BTreeMap<String, StoredObject>,
    failures: HashMap<Operation, BackendError>,
    key_failures: HashMap<(Operation, String), BackendError>,
    calls: HashMap<Operation, usize>,
    generation: u64,
}

/// Where a listing continues from
enum Resume {
    AfterKey(String),
    AfterPrefix(String),
}

/// One entry of a delimited listing
#[derive(Debug, Clone, PartialEq, Eq)]
enum Entry {
    Content(String, u64),
    Prefix(String),
}

impl Entry {
    fn token(&self) -> String {
        match self {
            Entry::Content(key, _) => format!("k:{}", key),
            Entry::Prefix(prefix) => format!("p:{}", prefix),
        }
    }
}

impl Resume {
    fn parse(token: &str) -> BackendResult<Self> {
        if let Some(key) = token.strip_prefix("k:") {
            Ok(Resume::AfterKey(key.to_string()))
        } else if let Some(prefix) = token.strip_prefix("p:") {
            Ok(Resume::AfterPrefix(prefix.to_string()))
        } else {
            Err(BackendError::with_status(
                400,
                format!("invalid continuation token: {}", token),
            ))
        }
    }

    fn skips(&self, key: &str) -> bool {
        match self {
            Resume::AfterKey(last) => key <= last.as_str(),
            Resume::AfterPrefix(last) => key <= last.as_str() || key.starts_with(last.as_str()),
        }
    }
}

impl MemoryClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Caps every listing page at `page_size` entries
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.settings.page_size = page_size.max(1);
        self
    }

    pub fn with_delete_missing(mut self, mode: DeleteMissing) -> Self {
        self.settings.delete_missing = mode;
        self
    }

    /// Stores an object directly, bypassing counters and failures
    pub async fn insert<K: Into<String>, B: Into<Bytes>>(&self, key: K, body: B) {
        self.state
            .lock()
            .await
            .store(key.into(), body.into(), UserMetadata::new());
    }

    pub async fn contents(&self, key: &str) -> Option<Bytes> {
        self.state
            .lock()
            .await
            .objects
            .get(key)
            .map(|o| o.body.clone())
    }

    pub async fn metadata(&self, key: &str) -> Option<UserMetadata> {
        self.state
            .lock()
            .await
            .objects
            .get(key)
            .map(|o| o.metadata.clone())
    }

    pub async fn keys(&self) -> Vec<String> {
        self.state.lock().await.objects.keys().cloned().collect()
    }

    /// Number of times `operation` reached the client
    pub async fn calls(&self, operation: Operation) -> usize {
        self.state
            .lock()
            .await
            .calls
            .get(&operation)
            .copied()
            .unwrap_or(0)
    }

    /// Makes every `operation` fail with `error` until cleared
    pub async fn fail(&self, operation: Operation, error: BackendError) {
        _ = self.state.lock().await.failures.insert(operation, error);
    }

    /// Makes `operation` on exactly `key` fail with `error` until cleared
    pub async fn fail_key<K: Into<String>>(
        &self,
        operation: Operation,
        key: K,
        error: BackendError,
    ) {
        _ = self
            .state
            .lock()
            .await
            .key_failures
            .insert((operation, key.into()), error);
    }

    pub async fn clear_failures(&self) {
        let mut state = self.state.lock().await;
        state.failures.clear();
        state.key_failures.clear();
    }
}

impl State {
    fn enter(&mut self, operation: Operation, key: &str) -> BackendResult<()> {
        *self.calls.entry(operation).or_insert(0) += 1;
        if let Some(err) = self.key_failures.get(&(operation, key.to_string())) {
            return Err(err.clone());
        }
        match self.failures.get(&operation) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn store(&mut self, key: String, body: Bytes, metadata: UserMetadata) {
        self.generation += 1;
        let object = StoredObject {
            body,
            metadata,
            etag: format!("\"{:016x}\"", self.generation),
            last_modified: Utc::now(),
        };
        _ = self.objects.insert(key, object);
    }

    fn object(&self, key: &str) -> BackendResult<&StoredObject> {
        self.objects
            .get(key)
            .ok_or_else(|| BackendError::not_found(key))
    }

    fn list(&self, request: &ListRequest, page_size: usize) -> BackendResult<ListPage> {
        let limit = request
            .max_keys
            .unwrap_or(DEFAULT_MAX_KEYS)
            .min(page_size)
            .max(1);
        let resume = request
            .continuation_token
            .as_deref()
            .map(Resume::parse)
            .transpose()?;
        let prefix = request.prefix.as_str();

        let mut page = ListPage::default();
        let mut count = 0;
        let mut last: Option<Entry> = None;

        for (key, object) in self.objects.range(request.prefix.clone()..) {
            if !key.starts_with(prefix) {
                break;
            }
            if resume.as_ref().is_some_and(|r| r.skips(key)) {
                continue;
            }
            let rest = &key[prefix.len()..];
            let split = request
                .delimiter
                .as_deref()
                .and_then(|d| rest.find(d).map(|i| (d, i)));
            let entry = match split {
                Some((delimiter, idx)) => {
                    Entry::Prefix(format!("{}{}", prefix, &rest[..idx + delimiter.len()]))
                }
                None => Entry::Content(key.clone(), object.body.len() as u64),
            };
            if let (Entry::Prefix(p), Some(Entry::Prefix(l))) = (&entry, &last) {
                if p == l {
                    continue;
                }
            }
            if count == limit {
                page.is_truncated = true;
                page.next_continuation_token = last.as_ref().map(Entry::token);
                break;
            }
            match &entry {
                Entry::Content(key, size) => page.contents.push(ListedObject {
                    key: key.clone(),
                    size: *size,
                }),
                Entry::Prefix(p) => page.common_prefixes.push(p.clone()),
            }
            count += 1;
            last = Some(entry);
        }
        Ok(page)
    }
}

#[async_trait]
impl ObjectClient for MemoryClient {
    async fn head_object(&self, key: &str) -> BackendResult<ObjectHead> {
        let mut state = self.state.lock().await;
        state.enter(Operation::Head, key)?;
        let object = state.object(key)?;
        Ok(ObjectHead {
            content_length: Some(object.body.len() as u64),
            last_modified: Some(object.last_modified),
            etag: Some(object.etag.clone()),
            metadata: object.metadata.clone(),
        })
    }

    async fn get_object(&self, key: &str) -> BackendResult<Bytes> {
        let mut state = self.state.lock().await;
        state.enter(Operation::Get, key)?;
        Ok(state.object(key)?.body.clone())
    }

    async fn put_object(
        &self,
        key: &str,
        body: Bytes,
        content_length: u64,
        metadata: Option<&UserMetadata>,
    ) -> BackendResult<()> {
        let mut state = self.state.lock().await;
        state.enter(Operation::Put, key)?;
        if body.len() as u64 != content_length {
            return Err(BackendError::with_status(
                400,
                format!(
                    "content length {} does not match body of {} bytes",
                    content_length,
                    body.len()
                ),
            ));
        }
        state.store(key.to_string(), body, metadata.cloned().unwrap_or_default());
        Ok(())
    }

    async fn upload(
        &self,
        key: &str,
        mut body: ByteReader,
        metadata: Option<&UserMetadata>,
    ) -> BackendResult<()> {
        self.state.lock().await.enter(Operation::Upload, key)?;

        let mut buf = Vec::new();
        _ = body
            .read_to_end(&mut buf)
            .await
            .map_err(|e| BackendError::new(format!("reading upload body: {}", e)))?;

        debug!("memory upload of {len} bytes to {key}", len: buf.len(), key: key);
        self.state
            .lock()
            .await
            .store(key.to_string(), Bytes::from(buf), metadata.cloned().unwrap_or_default());
        Ok(())
    }

    async fn copy_object(&self, key: &str, metadata: &UserMetadata) -> BackendResult<()> {
        let mut state = self.state.lock().await;
        state.enter(Operation::Copy, key)?;
        let body = state.object(key)?.body.clone();
        state.store(key.to_string(), body, metadata.clone());
        Ok(())
    }

    async fn delete_object(&self, key: &str) -> BackendResult<()> {
        let mut state = self.state.lock().await;
        state.enter(Operation::Delete, key)?;
        match (state.objects.remove(key), self.settings.delete_missing) {
            (None, DeleteMissing::NotFound) => Err(BackendError::not_found(key)),
            _ => Ok(()),
        }
    }

    async fn list_objects(&self, request: &ListRequest) -> BackendResult<ListPage> {
        let mut state = self.state.lock().await;
        state.enter(Operation::List, &request.prefix)?;
        state.list(request, self.settings.page_size)
    }

    async fn sign_url(
        &self,
        operation: SignedOperation,
        key: &str,
        expires: Duration,
    ) -> BackendResult<String> {
        self.state.lock().await.enter(Operation::Sign, key)?;
        Ok(format!(
            "memory:///{}?X-Method={}&X-Expires={}",
            key,
            operation.method(),
            expires.as_secs()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seeded(keys: &[&str]) -> MemoryClient {
        let client = MemoryClient::new();
        for key in keys {
            client.insert(*key, Bytes::from_static(b"x")).await;
        }
        client
    }

    #[tokio::test]
    async fn test_delimited_listing_groups_prefixes() {
        let client = seeded(&["r/", "r/a", "r/b/", "r/b/c", "r/b/d/e", "r/c", "s/z"]).await;
        let page = client.list_objects(&ListRequest::delimited("r/")).await.unwrap();
        assert_eq!(page.common_prefixes, vec!["r/b/".to_string()]);
        let keys: Vec<_> = page.contents.iter().map(|o| o.key.as_str()).collect();
        assert_eq!(keys, vec!["r/", "r/a", "r/c"]);
        assert!(!page.is_truncated);
    }

    #[tokio::test]
    async fn test_pagination_tokens_resume_after_prefix() {
        let client = seeded(&["r/a", "r/b/1", "r/b/2", "r/b/3", "r/c", "r/d/1"]).await;
        let mut request = ListRequest::delimited("r/").with_max_keys(2);
        let mut seen = Vec::new();
        loop {
            let page = client.list_objects(&request).await.unwrap();
            seen.extend(page.common_prefixes.iter().cloned());
            seen.extend(page.contents.iter().map(|o| o.key.clone()));
            if !page.is_truncated {
                break;
            }
            request.continuation_token = page.next_continuation_token;
        }
        seen.sort();
        assert_eq!(seen, vec!["r/a", "r/b/", "r/c", "r/d/"]);
        assert_eq!(client.calls(Operation::List).await, 2);
    }

    #[tokio::test]
    async fn test_invalid_token() {
        let client = seeded(&["r/a"]).await;
        let mut request = ListRequest::delimited("r/");
        request.continuation_token = Some("garbage".to_string());
        let err = client.list_objects(&request).await.unwrap_err();
        assert_eq!(err.status, Some(400));
    }

    #[tokio::test]
    async fn test_head_and_metadata() {
        let client = MemoryClient::new();
        let metadata = UserMetadata::from([("owner".to_string(), "bob".to_string())]);
        client
            .put_object("r/a", Bytes::from_static(b"hello"), 5, Some(&metadata))
            .await
            .unwrap();
        let head = client.head_object("r/a").await.unwrap();
        assert_eq!(head.content_length, Some(5));
        assert_eq!(head.metadata, metadata);
        assert!(head.etag.is_some());

        let err = client.head_object("r/missing").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_put_rejects_wrong_length() {
        let client = MemoryClient::new();
        let err = client
            .put_object("r/a", Bytes::from_static(b"hello"), 4, None)
            .await
            .unwrap_err();
        assert_eq!(err.status, Some(400));
        assert!(client.contents("r/a").await.is_none());
    }

    #[tokio::test]
    async fn test_delete_missing_modes() {
        let lenient = MemoryClient::new();
        assert!(lenient.delete_object("r/none").await.is_ok());

        let strict = MemoryClient::new().with_delete_missing(DeleteMissing::NotFound);
        let err = strict.delete_object("r/none").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_settings_follow_the_handle() {
        let shared = MemoryClient::new();
        let earlier = shared.clone();
        let paged = shared.with_page_size(1);
        earlier.insert("r/a", "a").await;
        earlier.insert("r/b", "b").await;

        let page = paged.list_objects(&ListRequest::delimited("r/")).await.unwrap();
        assert_eq!(page.contents.len(), 1);
        assert!(page.is_truncated);

        let page = earlier.list_objects(&ListRequest::delimited("r/")).await.unwrap();
        assert_eq!(page.contents.len(), 2);
        assert!(!page.is_truncated);
    }

    #[tokio::test]
    async fn test_failure_injection() {
        let client = seeded(&["r/a", "r/b"]).await;
        client
            .fail_key(Operation::Get, "r/a", BackendError::with_status(500, "boom"))
            .await;
        assert!(client.get_object("r/a").await.is_err());
        assert!(client.get_object("r/b").await.is_ok());
        client.clear_failures().await;
        assert!(client.get_object("r/a").await.is_ok());
        assert_eq!(client.calls(Operation::Get).await, 3);
    }
}
