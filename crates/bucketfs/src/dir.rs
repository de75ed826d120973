// SPDX-FileCopyrightText: 2026 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use crate::backend::{BackendResult, ListRequest, ObjectClient};
use crate::error::{Error, Intent, Result};
use crate::fs::BucketFs;
use crate::key::{self, DELIMITER};
use bytes::Bytes;
use diagnostics::*;

/// A directory of a [`BucketFs`]
pub struct BucketDir {
    fs: BucketFs,
    path: String,
}

impl BucketDir {
    pub(crate) fn new(fs: BucketFs, path: &str) -> Self {
        Self {
            fs,
            path: key::normalize(path),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Lists immediate children, following continuation tokens to the end.
    ///
    /// An absent directory lists as empty; use `head` to test existence.
    pub async fn list(&self) -> Result<Vec<String>> {
        let client = self.fs.client().await?;
        let prefix = self.fs.key(&self.path, true);
        let mut children = Vec::new();

        match self.list_into(client.as_ref(), &prefix, &mut children).await {
            Ok(()) => Ok(children),
            Err(e) => {
                let err = self.fs.error(&self.path, e, Intent::Read);
                if err.is_not_found() {
                    Ok(children)
                } else {
                    Err(err)
                }
            }
        }
    }

    async fn list_into(
        &self,
        client: &dyn ObjectClient,
        prefix: &str,
        children: &mut Vec<String>,
    ) -> BackendResult<()> {
        let mut request = ListRequest::delimited(prefix);
        let mut pages = 0usize;
        loop {
            let page = client.list_objects(&request).await?;
            pages += 1;

            // Directories
            for common in &page.common_prefixes {
                if common == prefix {
                    continue;
                }
                match directory_name(common) {
                    Some(name) => children.push(key::join(&self.path, name)),
                    None => {
                        warn!("skipping malformed prefix {prefix}", prefix: common.as_str());
                    }
                }
            }
            // Files
            for object in &page.contents {
                if object.key == prefix {
                    continue;
                }
                match file_name(&object.key) {
                    Some(name) => children.push(key::join(&self.path, name)),
                    None => {
                        warn!("skipping malformed key {key}", key: object.key.as_str());
                    }
                }
            }

            if !page.is_truncated {
                break;
            }
            match page.next_continuation_token {
                Some(token) => request.continuation_token = Some(token),
                None => {
                    warn!(
                        "truncated listing of {prefix} without a continuation token",
                        prefix: prefix,
                    );
                    break;
                }
            }
        }
        debug!(
            "listed {count} children of {path} in {pages} pages",
            count: children.len(),
            path: self.path.as_str(),
            pages: pages,
        );
        Ok(())
    }

    /// Creates the directory marker object
    pub async fn mkcol(&self) -> Result<()> {
        self.check_supported()?;
        let client = self.fs.client().await?;
        client
            .put_object(&self.fs.key(&self.path, true), Bytes::new(), 0, None)
            .await
            .map_err(|e| self.fs.error(&self.path, e, Intent::Write))
    }

    /// Deletes the directory marker object; children are left alone
    pub async fn rmdir(&self) -> Result<()> {
        self.check_supported()?;
        let client = self.fs.client().await?;
        client
            .delete_object(&self.fs.key(&self.path, true))
            .await
            .map_err(|e| self.fs.error(&self.path, e, Intent::Write))
    }

    fn check_supported(&self) -> Result<()> {
        if self.fs.supports_directory() {
            Ok(())
        } else {
            Err(Error::not_supported(
                self.fs.repository(),
                self.path.as_str(),
                "directory markers are disabled",
            ))
        }
    }
}

/// Name of a grouped prefix: the component just before the trailing delimiter
fn directory_name(common_prefix: &str) -> Option<&str> {
    common_prefix
        .strip_suffix(DELIMITER)
        .unwrap_or(common_prefix)
        .rsplit(DELIMITER)
        .next()
        .filter(|name| is_child_name(name))
}

/// Name of an object: its final component
fn file_name(key: &str) -> Option<&str> {
    key.rsplit(DELIMITER).next().filter(|name| is_child_name(name))
}

// `.` and `..` would resolve to the directory itself or its parent.
fn is_child_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".."
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{
        BackendError, ByteReader, ListPage, ListedObject, ObjectHead, SignedOperation,
        UserMetadata,
    };
    use crate::config::FileSystemOptions;
    use crate::fs::ClientSource;
    use async_trait::async_trait;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[test]
    fn test_directory_name() {
        assert_eq!(directory_name("repo/a/b/"), Some("b"));
        assert_eq!(directory_name("b/"), Some("b"));
        assert_eq!(directory_name("repo/a//"), None);
    }

    #[test]
    fn test_file_name() {
        assert_eq!(file_name("repo/a/file.txt"), Some("file.txt"));
        assert_eq!(file_name("file.txt"), Some("file.txt"));
        assert_eq!(file_name("repo/a/"), None);
        assert_eq!(file_name("repo/a/."), None);
        assert_eq!(file_name("repo/a/.."), None);
        assert_eq!(file_name("repo/a/.hidden"), Some(".hidden"));
        assert_eq!(directory_name("repo/a/./"), None);
        assert_eq!(directory_name("repo/a/../"), None);
    }

    /// Serves one truncated page that carries no continuation token
    struct TokenlessClient {
        lists: AtomicUsize,
    }

    #[async_trait]
    impl ObjectClient for TokenlessClient {
        async fn head_object(&self, key: &str) -> BackendResult<ObjectHead> {
            Err(BackendError::not_found(key))
        }

        async fn get_object(&self, key: &str) -> BackendResult<Bytes> {
            Err(BackendError::not_found(key))
        }

        async fn put_object(
            &self,
            _key: &str,
            _body: Bytes,
            _content_length: u64,
            _metadata: Option<&UserMetadata>,
        ) -> BackendResult<()> {
            Ok(())
        }

        async fn upload(
            &self,
            _key: &str,
            _body: ByteReader,
            _metadata: Option<&UserMetadata>,
        ) -> BackendResult<()> {
            Ok(())
        }

        async fn copy_object(&self, key: &str, _metadata: &UserMetadata) -> BackendResult<()> {
            Err(BackendError::not_found(key))
        }

        async fn delete_object(&self, _key: &str) -> BackendResult<()> {
            Ok(())
        }

        async fn list_objects(&self, request: &ListRequest) -> BackendResult<ListPage> {
            _ = self.lists.fetch_add(1, Ordering::SeqCst);
            Ok(ListPage {
                common_prefixes: vec![format!("{}sub/", request.prefix)],
                contents: vec![ListedObject {
                    key: format!("{}a.txt", request.prefix),
                    size: 1,
                }],
                is_truncated: true,
                next_continuation_token: None,
            })
        }

        async fn sign_url(
            &self,
            _operation: SignedOperation,
            key: &str,
            _expires: Duration,
        ) -> BackendResult<String> {
            Ok(key.to_string())
        }
    }

    #[tokio::test]
    async fn test_truncated_page_without_token_stops() {
        let client = Arc::new(TokenlessClient {
            lists: AtomicUsize::new(0),
        });
        let fs = BucketFs::new(
            "repo",
            ClientSource::Client(client.clone()),
            FileSystemOptions::default(),
        );

        let mut children = fs.list("/d").await.unwrap();
        children.sort();
        assert_eq!(children, vec!["/d/a.txt", "/d/sub"]);
        assert_eq!(client.lists.load(Ordering::SeqCst), 1);
    }
}
