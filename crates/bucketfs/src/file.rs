// SPDX-FileCopyrightText: 2026 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use crate::data::{Body, Data};
use crate::error::{Intent, Result};
use crate::fs::BucketFs;
use crate::key;
use crate::stats::{Stats, to_metadata};
use diagnostics::*;

/// Options for [`BucketFile::write`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteOptions {
    /// Append to the current content instead of replacing it
    pub append: bool,
}

impl WriteOptions {
    pub fn append() -> Self {
        Self { append: true }
    }
}

/// A file of a [`BucketFs`]
pub struct BucketFile {
    fs: BucketFs,
    path: String,
}

impl BucketFile {
    pub(crate) fn new(fs: BucketFs, path: &str) -> Self {
        Self {
            fs,
            path: key::normalize(path),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Reads the whole object; an empty object reads as empty text
    pub async fn read(&self) -> Result<Data> {
        let client = self.fs.client().await?;
        let body = client
            .get_object(&self.fs.key(&self.path, false))
            .await
            .map_err(|e| self.fs.error(&self.path, e, Intent::Read))?;
        if body.is_empty() {
            Ok(Data::Text(String::new()))
        } else {
            Ok(Data::Bytes(body))
        }
    }

    /// Uploads `data`, merging it after the current content when appending.
    ///
    /// `stats` are the current stats of the file, if it exists. Their custom
    /// fields are stored as object metadata, and an append only reads the
    /// current content when they are present. The merge completes before
    /// the upload starts, so a failed read never leaves a partial object.
    pub async fn write(
        &self,
        data: Data,
        stats: Option<&Stats>,
        options: &WriteOptions,
    ) -> Result<()> {
        let data = match stats {
            Some(_) if options.append => Data::merge(self.read().await?, data),
            _ => data,
        };
        let metadata = stats.map(to_metadata);

        let client = self.fs.client().await?;
        let key = self.fs.key(&self.path, false);
        let uploaded = match data.into_body() {
            Body::Stream(reader) => {
                debug!("streaming upload to {key}", key: key.as_str());
                client.upload(&key, reader, metadata.as_ref()).await
            }
            Body::Buffer(bytes) => {
                let length = bytes.len() as u64;
                debug!(
                    "single put of {length} bytes to {key}",
                    length: length,
                    key: key.as_str(),
                );
                client.put_object(&key, bytes, length, metadata.as_ref()).await
            }
        };
        uploaded.map_err(|e| self.fs.error(&self.path, e, Intent::Write))
    }

    /// Deletes the object; deleting an absent key is up to the backend
    pub async fn rm(&self) -> Result<()> {
        let client = self.fs.client().await?;
        client
            .delete_object(&self.fs.key(&self.path, false))
            .await
            .map_err(|e| self.fs.error(&self.path, e, Intent::Write))
    }
}
