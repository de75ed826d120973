// SPDX-FileCopyrightText: 2026 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use anyhow::{Context, Result};
use bucketfs::BucketFs;
use diagnostics::{log_debug, log_info};

pub async fn mkdir_command(fs: &BucketFs, path: &str) -> Result<()> {
    log_debug!("Creating directory marker: {path}", path: path);
    fs.make_directory_marker(path)
        .await
        .with_context(|| format!("Failed to create directory {}", path))?;
    log_info!("Directory created successfully: {path}", path: path);
    Ok(())
}

/// Removes only the marker; objects under the directory stay
pub async fn rmdir_command(fs: &BucketFs, path: &str) -> Result<()> {
    fs.remove_directory_marker(path)
        .await
        .with_context(|| format!("Failed to remove directory {}", path))?;
    log_info!("Directory marker removed: {path}", path: path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::rm_command;
    use bucketfs::{FileSystemOptions, MemoryClient};

    #[tokio::test]
    async fn test_mkdir_rmdir() {
        let client = MemoryClient::new();
        let fs = BucketFs::with_client("r", client.clone(), FileSystemOptions::default());

        mkdir_command(&fs, "/d").await.unwrap();
        assert!(client.contents("r/d/").await.is_some());
        client.insert("r/d/f", "f").await;

        rmdir_command(&fs, "/d").await.unwrap();
        assert!(client.contents("r/d/").await.is_none());
        rm_command(&fs, "/d/f").await.unwrap();
        assert!(client.contents("r/d/f").await.is_none());
    }

    #[tokio::test]
    async fn test_mkdir_without_directories() {
        let options = FileSystemOptions {
            can_create_directory: false,
        };
        let fs = BucketFs::with_client("r", MemoryClient::new(), options);
        let err = mkdir_command(&fs, "/d").await.unwrap_err();
        assert!(format!("{:#}", err).contains("directory markers are disabled"), "{err:#}");
    }
}
