// SPDX-FileCopyrightText: 2026 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Configuration for the filesystem and its S3 client.
//!
//! A configuration file is YAML:
//!
//! ```yaml
//! repository: projects/demo
//! options:
//!   can_create_directory: true
//! s3:
//!   bucket: my-bucket
//!   region: us-east-1
//!   endpoint: http://localhost:9000   # MinIO, R2, ...
//!   access_key: minioadmin
//!   secret_key: minioadmin
//!   path_style: true
//! ```
//!
//! The same S3 settings can come from `BUCKETFS_*` environment variables.

use serde::{Deserialize, Serialize};
use std::path::Path;

pub const ENV_BUCKET: &str = "BUCKETFS_BUCKET";
pub const ENV_REGION: &str = "BUCKETFS_REGION";
pub const ENV_ENDPOINT: &str = "BUCKETFS_ENDPOINT";
pub const ENV_ACCESS_KEY: &str = "BUCKETFS_ACCESS_KEY";
pub const ENV_SECRET_KEY: &str = "BUCKETFS_SECRET_KEY";
pub const ENV_PATH_STYLE: &str = "BUCKETFS_PATH_STYLE";
pub const ENV_REPOSITORY: &str = "BUCKETFS_REPOSITORY";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse YAML configuration: {0}")]
    Parse(#[from] serde_yaml_ng::Error),

    #[error("Missing setting: {0}")]
    Missing(&'static str),

    #[error("Invalid setting {name}: {message}")]
    Invalid { name: &'static str, message: String },
}

/// Filesystem behavior switches
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSystemOptions {
    /// Emulate directories with marker objects
    #[serde(default = "default_true")]
    pub can_create_directory: bool,
}

fn default_true() -> bool {
    true
}

impl Default for FileSystemOptions {
    fn default() -> Self {
        Self {
            can_create_directory: true,
        }
    }
}

/// S3 client settings; never introspected by the filesystem itself
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct S3Config {
    pub bucket: String,

    #[serde(default)]
    pub region: String,

    /// Custom endpoint for S3-compatible stores (MinIO, R2, etc.)
    #[serde(default)]
    pub endpoint: Option<String>,

    #[serde(default)]
    pub access_key: Option<String>,

    #[serde(default)]
    pub secret_key: Option<String>,

    /// Address the bucket in the path instead of the host name
    #[serde(default)]
    pub path_style: bool,
}

impl S3Config {
    /// Reads settings from `BUCKETFS_*` environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds settings from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.is_empty());
        let path_style = match non_empty(ENV_PATH_STYLE) {
            None => false,
            Some(v) => parse_bool(&v).ok_or_else(|| ConfigError::Invalid {
                name: ENV_PATH_STYLE,
                message: format!("expected true or false, got {:?}", v),
            })?,
        };
        let config = Self {
            bucket: non_empty(ENV_BUCKET).ok_or(ConfigError::Missing(ENV_BUCKET))?,
            region: non_empty(ENV_REGION).unwrap_or_default(),
            endpoint: non_empty(ENV_ENDPOINT),
            access_key: non_empty(ENV_ACCESS_KEY),
            secret_key: non_empty(ENV_SECRET_KEY),
            path_style,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bucket.is_empty() {
            return Err(ConfigError::Missing("bucket"));
        }
        if self.region.is_empty() && self.endpoint.is_none() {
            return Err(ConfigError::Invalid {
                name: "region",
                message: "either a region or an endpoint is required".to_string(),
            });
        }
        if self.access_key.is_some() != self.secret_key.is_some() {
            return Err(ConfigError::Invalid {
                name: "access_key",
                message: "access_key and secret_key must be given together".to_string(),
            });
        }
        Ok(())
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Top-level configuration document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketConfig {
    /// Key prefix all logical paths live under
    #[serde(default)]
    pub repository: String,

    #[serde(default)]
    pub options: FileSystemOptions,

    pub s3: S3Config,
}

impl BucketConfig {
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: BucketConfig = serde_yaml_ng::from_str(content)?;
        config.s3.validate()?;
        Ok(config)
    }

    /// Load configuration from YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.as_ref().display().to_string(),
            source,
        })?;
        Self::from_yaml(&content)
    }
}
