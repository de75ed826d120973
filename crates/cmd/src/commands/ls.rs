// SPDX-FileCopyrightText: 2026 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::io::Write;

use anyhow::{Context, Result};
use bucketfs::BucketFs;
use diagnostics::log_debug;

pub async fn ls_command(fs: &BucketFs, path: &str, out: &mut impl Write) -> Result<()> {
    let mut children = fs
        .list(path)
        .await
        .with_context(|| format!("Failed to list {}", path))?;

    // Sort results by path for consistent output
    children.sort();
    log_debug!("Listing {path}: {count} entries", path: path, count: children.len());

    for child in children {
        writeln!(out, "{}", child)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bucketfs::{FileSystemOptions, MemoryClient};

    #[tokio::test]
    async fn test_ls_sorted() {
        let client = MemoryClient::new();
        client.insert("r/z.txt", "").await;
        client.insert("r/a/", "").await;
        client.insert("r/m.txt", "").await;
        let fs = BucketFs::with_client("r", client, FileSystemOptions::default());

        let mut out = Vec::new();
        ls_command(&fs, "/", &mut out).await.unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "/a\n/m.txt\n/z.txt\n");
    }
}
