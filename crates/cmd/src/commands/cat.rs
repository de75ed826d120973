// SPDX-FileCopyrightText: 2026 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::io::Write;

use anyhow::{Context, Result};
use bucketfs::BucketFs;

pub async fn cat_command(fs: &BucketFs, path: &str, out: &mut impl Write) -> Result<()> {
    let data = fs
        .read(path)
        .await
        .with_context(|| format!("Failed to read {}", path))?;
    let bytes = data.into_bytes().await?;
    out.write_all(&bytes)?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bucketfs::{FileSystemOptions, MemoryClient};

    #[tokio::test]
    async fn test_cat() {
        let client = MemoryClient::new();
        client.insert("r/hello.txt", "hello\n").await;
        let fs = BucketFs::with_client("r", client, FileSystemOptions::default());

        let mut out = Vec::new();
        cat_command(&fs, "/hello.txt", &mut out).await.unwrap();
        assert_eq!(out, b"hello\n");

        let err = cat_command(&fs, "/missing", &mut Vec::new()).await.unwrap_err();
        assert!(err.to_string().contains("Failed to read /missing"));
    }
}
