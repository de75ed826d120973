// SPDX-FileCopyrightText: 2026 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! [`ObjectClient`] over S3 and S3-compatible stores, via `rust-s3`.

use crate::backend::{
    BackendError, BackendResult, ByteReader, ListPage, ListRequest, ListedObject, ObjectClient,
    ObjectHead, SignedOperation, UserMetadata,
};
use crate::config::S3Config;
use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use diagnostics::*;
use s3::bucket::Bucket;
use s3::creds::Credentials;
use s3::error::S3Error;
use s3::region::Region;
use std::time::Duration;

const METADATA_HEADER_PREFIX: &str = "x-amz-meta-";
const METADATA_DIRECTIVE_HEADER: &str = "x-amz-metadata-directive";

/// Client for one S3 bucket
pub struct S3Client {
    bucket: Box<Bucket>,
}

impl S3Client {
    /// Builds a client; no request is sent until the first operation
    pub fn connect(config: &S3Config) -> BackendResult<Self> {
        let region = match &config.endpoint {
            Some(endpoint) => Region::Custom {
                region: config.region.clone(),
                endpoint: endpoint.clone(),
            },
            None => config.region.parse::<Region>().map_err(|e| {
                BackendError::new(format!("invalid region {}: {}", config.region, e))
            })?,
        };
        let credentials = Credentials::new(
            config.access_key.as_deref(),
            config.secret_key.as_deref(),
            None,
            None,
            None,
        )
        .map_err(|e| BackendError::new(format!("credentials: {}", e)))?;

        let mut bucket = Bucket::new(&config.bucket, region, credentials).map_err(backend_error)?;
        if config.path_style {
            bucket = bucket.with_path_style();
        }
        debug!("S3 client ready for bucket {bucket}", bucket: config.bucket.as_str());
        Ok(Self { bucket })
    }

    /// A bucket handle that sends `metadata` as `x-amz-meta-*` headers
    fn with_metadata(&self, metadata: Option<&UserMetadata>) -> BackendResult<Bucket> {
        let mut bucket = (*self.bucket).clone();
        for (key, value) in metadata.into_iter().flatten() {
            check_header(key, value)?;
            bucket.add_header(&format!("{}{}", METADATA_HEADER_PREFIX, key), value);
        }
        Ok(bucket)
    }
}

/// Rejects metadata that cannot travel as an HTTP header
fn check_header(key: &str, value: &str) -> BackendResult<()> {
    let key_ok = !key.is_empty()
        && key
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b"-_.".contains(&b));
    let value_ok = value.bytes().all(|b| b == b'\t' || (0x20..0x7f).contains(&b));
    if key_ok && value_ok {
        Ok(())
    } else {
        Err(BackendError::with_status(
            400,
            format!("metadata {:?} cannot be sent as an HTTP header", key),
        ))
    }
}

fn backend_error(err: S3Error) -> BackendError {
    match err {
        S3Error::HttpFailWithBody(status, body) => BackendError::with_status(status, body),
        other => BackendError::new(other.to_string()),
    }
}

fn check_status(status: u16, key: &str) -> BackendResult<()> {
    if (200..300).contains(&status) {
        Ok(())
    } else {
        Err(BackendError::with_status(status, format!("request for {} failed", key)))
    }
}

fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(value)
        .or_else(|_| DateTime::parse_from_rfc3339(value))
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

#[async_trait]
impl ObjectClient for S3Client {
    async fn head_object(&self, key: &str) -> BackendResult<ObjectHead> {
        let (head, status) = self.bucket.head_object(key).await.map_err(backend_error)?;
        check_status(status, key)?;
        Ok(ObjectHead {
            content_length: head.content_length.and_then(|len| u64::try_from(len).ok()),
            last_modified: head.last_modified.as_deref().and_then(parse_http_date),
            etag: head.e_tag,
            metadata: head.metadata.unwrap_or_default().into_iter().collect(),
        })
    }

    async fn get_object(&self, key: &str) -> BackendResult<Bytes> {
        let response = self.bucket.get_object(key).await.map_err(backend_error)?;
        check_status(response.status_code(), key)?;
        Ok(Bytes::copy_from_slice(response.bytes()))
    }

    async fn put_object(
        &self,
        key: &str,
        body: Bytes,
        content_length: u64,
        metadata: Option<&UserMetadata>,
    ) -> BackendResult<()> {
        if body.len() as u64 != content_length {
            return Err(BackendError::with_status(
                400,
                format!("content length {} does not match body", content_length),
            ));
        }
        let bucket = self.with_metadata(metadata)?;
        let response = bucket.put_object(key, &body).await.map_err(backend_error)?;
        check_status(response.status_code(), key)
    }

    async fn upload(
        &self,
        key: &str,
        mut body: ByteReader,
        metadata: Option<&UserMetadata>,
    ) -> BackendResult<()> {
        let bucket = self.with_metadata(metadata)?;
        let _ = bucket
            .put_object_stream(&mut body, key)
            .await
            .map_err(backend_error)?;
        Ok(())
    }

    async fn copy_object(&self, key: &str, metadata: &UserMetadata) -> BackendResult<()> {
        let mut bucket = self.with_metadata(Some(metadata))?;
        bucket.add_header(METADATA_DIRECTIVE_HEADER, "REPLACE");
        let status = bucket
            .copy_object_internal(key, key)
            .await
            .map_err(backend_error)?;
        check_status(status, key)
    }

    async fn delete_object(&self, key: &str) -> BackendResult<()> {
        let response = self.bucket.delete_object(key).await.map_err(backend_error)?;
        check_status(response.status_code(), key)
    }

    async fn list_objects(&self, request: &ListRequest) -> BackendResult<ListPage> {
        let (result, status) = self
            .bucket
            .list_page(
                request.prefix.clone(),
                request.delimiter.clone(),
                request.continuation_token.clone(),
                None,
                request.max_keys,
            )
            .await
            .map_err(backend_error)?;
        check_status(status, &request.prefix)?;
        Ok(ListPage {
            common_prefixes: result
                .common_prefixes
                .unwrap_or_default()
                .into_iter()
                .map(|p| p.prefix)
                .collect(),
            contents: result
                .contents
                .into_iter()
                .map(|o| ListedObject {
                    key: o.key,
                    size: o.size,
                })
                .collect(),
            is_truncated: result.is_truncated,
            next_continuation_token: result.next_continuation_token,
        })
    }

    async fn sign_url(
        &self,
        operation: SignedOperation,
        key: &str,
        expires: Duration,
    ) -> BackendResult<String> {
        let expiry_secs = u32::try_from(expires.as_secs())
            .map_err(|_| BackendError::with_status(400, "expiry too large"))?;
        let url = match operation {
            SignedOperation::GetObject => self.bucket.presign_get(key, expiry_secs, None).await,
            SignedOperation::PutObject => {
                self.bucket
                    .presign_put(key, expiry_secs, None, None)
                    .await
            }
            SignedOperation::DeleteObject => self.bucket.presign_delete(key, expiry_secs).await,
        };
        url.map_err(backend_error)
    }
}
