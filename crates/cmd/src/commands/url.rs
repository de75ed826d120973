// SPDX-FileCopyrightText: 2026 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::io::Write;
use std::time::Duration;

use anyhow::{Context, Result};
use bucketfs::{BucketFs, UrlOptions};

pub async fn url_command(
    fs: &BucketFs,
    path: &str,
    method: &str,
    expires_secs: u64,
    is_directory: bool,
    out: &mut impl Write,
) -> Result<()> {
    let options = UrlOptions::new(method).with_expires(Duration::from_secs(expires_secs));
    let url = fs
        .to_url(path, is_directory, &options)
        .await
        .with_context(|| format!("Failed to sign {} URL for {}", method, path))?;
    writeln!(out, "{}", url)?;
    Ok(())
}
