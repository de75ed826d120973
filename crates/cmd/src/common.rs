// SPDX-FileCopyrightText: 2026 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use bucketfs::config::ENV_REPOSITORY;
use bucketfs::{
    BucketConfig, BucketFs, ClientSource, EntryType, FileSystemOptions, MemoryClient, S3Config,
    Stats,
};
use chrono::{DateTime, SecondsFormat, Utc};
use clap::Args;
use diagnostics::log_debug;

/// Options shared by every subcommand
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// YAML configuration file; BUCKETFS_* environment variables otherwise
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Repository prefix, overriding the configuration
    #[arg(long, global = true)]
    pub repository: Option<String>,

    /// Do not emulate directories with marker objects
    #[arg(long, global = true)]
    pub no_directories: bool,

    /// Use an empty in-process bucket
    #[arg(long, global = true)]
    pub memory: bool,
}

/// Opens the filesystem described by the global arguments
pub fn open_fs(args: &GlobalArgs) -> Result<BucketFs> {
    if args.memory {
        let repository = args.repository.clone().unwrap_or_default();
        log_debug!("Using in-memory bucket for {repository}", repository: repository.as_str());
        return Ok(BucketFs::with_client(&repository, MemoryClient::new(), options(args, None)));
    }

    let (repository, s3, configured) = match &args.config {
        Some(path) => {
            let config = BucketConfig::load(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?;
            (config.repository, config.s3, Some(config.options))
        }
        None => {
            let s3 = S3Config::from_env().context("Failed to read S3 settings from environment")?;
            let repository = std::env::var(ENV_REPOSITORY).unwrap_or_default();
            (repository, s3, None)
        }
    };
    let repository = args.repository.clone().unwrap_or(repository);
    log_debug!(
        "Opening bucket {bucket} at {repository}",
        bucket: s3.bucket.as_str(),
        repository: repository.as_str(),
    );
    Ok(BucketFs::new(&repository, ClientSource::S3(s3), options(args, configured)))
}

fn options(args: &GlobalArgs, configured: Option<FileSystemOptions>) -> FileSystemOptions {
    let mut options = configured.unwrap_or_default();
    if args.no_directories {
        options.can_create_directory = false;
    }
    options
}

/// Parses a `key=value` argument
pub fn parse_pair(arg: &str) -> Result<(String, String)> {
    let (key, value) = arg
        .split_once('=')
        .ok_or_else(|| anyhow!("Expected key=value, got '{}'", arg))?;
    if key.is_empty() {
        return Err(anyhow!("Empty key in '{}'", arg));
    }
    Ok((key.to_string(), value.to_string()))
}

/// Looks up stats, treating an absent entry as `None`
pub async fn current_stats(
    fs: &BucketFs,
    path: &str,
    hint: Option<EntryType>,
) -> Result<Option<Stats>> {
    match fs.head(path, hint).await {
        Ok(stats) => Ok(Some(stats)),
        Err(e) if e.is_not_found() => Ok(None),
        Err(e) => Err(e).with_context(|| format!("Failed to stat {}", path)),
    }
}

/// Renders stats one `name: value` per line
pub fn format_stats(path: &str, stats: &Stats) -> String {
    let mut out = format!("path: {}\n", path);
    let kind = if stats.is_directory() {
        EntryType::Directory
    } else {
        EntryType::File
    };
    out.push_str(&format!("type: {}\n", kind));
    if let Some(size) = stats.size {
        out.push_str(&format!("size: {}\n", size));
    }
    if let Some(modified) = stats.modified {
        out.push_str(&format!("modified: {}\n", format_millis(modified)));
    }
    if let Some(etag) = &stats.etag {
        out.push_str(&format!("etag: {}\n", etag));
    }
    for (key, value) in stats.custom() {
        out.push_str(&format!("{}: {}\n", key, value));
    }
    out
}

fn format_millis(millis: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .map(|t| t.to_rfc3339_opts(SecondsFormat::Millis, true))
        .unwrap_or_else(|| millis.to_string())
}
