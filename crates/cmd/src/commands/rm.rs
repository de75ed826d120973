// SPDX-FileCopyrightText: 2026 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use anyhow::{Context, Result};
use bucketfs::BucketFs;
use diagnostics::log_info;

pub async fn rm_command(fs: &BucketFs, path: &str) -> Result<()> {
    fs.remove(path)
        .await
        .with_context(|| format!("Failed to remove {}", path))?;
    log_info!("Removed {path}", path: path);
    Ok(())
}
