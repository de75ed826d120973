// SPDX-FileCopyrightText: 2026 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::io::Write;

use anyhow::{Context, Result};
use bucketfs::{BucketFs, EntryType};

use crate::common::format_stats;

pub async fn stat_command(
    fs: &BucketFs,
    path: &str,
    hint: Option<EntryType>,
    out: &mut impl Write,
) -> Result<()> {
    let stats = fs
        .head(path, hint)
        .await
        .with_context(|| format!("Failed to stat {}", path))?;
    out.write_all(format_stats(path, &stats).as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bucketfs::{FileSystemOptions, MemoryClient};

    #[tokio::test]
    async fn test_stat_file_and_directory() {
        let client = MemoryClient::new();
        client.insert("r/d/a.txt", "abc").await;
        let fs = BucketFs::with_client("r", client, FileSystemOptions::default());

        let mut out = Vec::new();
        stat_command(&fs, "/d/a.txt", None, &mut out).await.unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("type: file\nsize: 3\n"), "{text}");

        let mut out = Vec::new();
        stat_command(&fs, "/d", Some(EntryType::Directory), &mut out)
            .await
            .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "path: /d\ntype: directory\n");

        let mut out = Vec::new();
        assert!(stat_command(&fs, "/nope", None, &mut out).await.is_err());
    }
}
