// SPDX-FileCopyrightText: 2026 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;

use anyhow::{Context, Result};
use bucketfs::{BucketFs, ByteReader, Data, EntryType, WriteOptions};
use diagnostics::{log_debug, log_info};

use crate::common::current_stats;

/// Where `put` takes its content from
#[derive(Debug, Clone)]
pub enum PutSource {
    Content(String),
    File(PathBuf),
    Stdin,
}

impl PutSource {
    async fn open(self) -> Result<Data> {
        match self {
            PutSource::Content(text) => Ok(Data::Text(text)),
            PutSource::File(path) => {
                let file = tokio::fs::File::open(&path)
                    .await
                    .with_context(|| format!("Failed to open source file {}", path.display()))?;
                let reader: ByteReader = Box::pin(file);
                Ok(Data::Stream(reader))
            }
            PutSource::Stdin => {
                let reader: ByteReader = Box::pin(tokio::io::stdin());
                Ok(Data::Stream(reader))
            }
        }
    }
}

pub async fn put_command(fs: &BucketFs, path: &str, source: PutSource, append: bool) -> Result<()> {
    // Appending needs the current stats; metadata carries over with them.
    let stats = if append {
        current_stats(fs, path, Some(EntryType::File)).await?
    } else {
        None
    };
    log_debug!("Writing {path}, append {append}", path: path, append: append);

    let data = source.open().await?;
    fs.write(path, data, stats.as_ref(), &WriteOptions { append })
        .await
        .with_context(|| format!("Failed to write {}", path))?;

    log_info!("Wrote {path}", path: path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bucketfs::{FileSystemOptions, MemoryClient};
    use std::io::Write;

    #[tokio::test]
    async fn test_put_content_and_append() {
        let client = MemoryClient::new();
        let fs = BucketFs::with_client("r", client.clone(), FileSystemOptions::default());

        put_command(&fs, "/log", PutSource::Content("A".to_string()), false)
            .await
            .unwrap();
        put_command(&fs, "/log", PutSource::Content("B".to_string()), true)
            .await
            .unwrap();
        assert_eq!(client.contents("r/log").await.unwrap().as_ref(), b"AB");

        // Appending to nothing creates the file
        put_command(&fs, "/new", PutSource::Content("C".to_string()), true)
            .await
            .unwrap();
        assert_eq!(client.contents("r/new").await.unwrap().as_ref(), b"C");
    }

    #[tokio::test]
    async fn test_put_from_file_streams() {
        let mut source = tempfile::NamedTempFile::new().unwrap();
        source.write_all(b"from disk").unwrap();

        let client = MemoryClient::new();
        let fs = BucketFs::with_client("r", client.clone(), FileSystemOptions::default());
        put_command(&fs, "/copy", PutSource::File(source.path().to_path_buf()), false)
            .await
            .unwrap();
        assert_eq!(client.contents("r/copy").await.unwrap().as_ref(), b"from disk");

        let missing = PutSource::File(PathBuf::from("/nonexistent/source"));
        assert!(put_command(&fs, "/x", missing, false).await.is_err());
    }
}
