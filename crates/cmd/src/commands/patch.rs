// SPDX-FileCopyrightText: 2026 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use anyhow::{Context, Result, anyhow};
use bucketfs::{BucketFs, Stats};
use diagnostics::log_info;

use crate::common::{current_stats, parse_pair};

/// Replaces the custom metadata of `path` with `pairs`
pub async fn patch_command(fs: &BucketFs, path: &str, pairs: &[String]) -> Result<()> {
    let current = current_stats(fs, path, None)
        .await?
        .ok_or_else(|| anyhow!("No such file or directory: {}", path))?;

    let mut props = Stats::new();
    props.size = current.size;
    for pair in pairs {
        let (key, value) = parse_pair(pair)?;
        if !props.set_custom(key.as_str(), value) {
            return Err(anyhow!("'{}' is reserved and cannot be patched", key));
        }
    }

    fs.patch(path, &props)
        .await
        .with_context(|| format!("Failed to patch {}", path))?;
    log_info!("Patched {count} properties of {path}", count: pairs.len(), path: path);
    Ok(())
}
