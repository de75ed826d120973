// SPDX-FileCopyrightText: 2026 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Logging for the bucketfs crates.
//!
//! Usage:
//! - Set BUCKETFS_LOG=off (default) - no logs
//! - Set BUCKETFS_LOG=info - connections and marker creation
//! - Set BUCKETFS_LOG=debug - probes, listing pages and upload strategy
//!
//! Crates calling the macros must also depend on `emit`.

use std::str::FromStr;
use std::sync::Once;

// Re-export emit so macros can use it
pub use emit;

/// Environment variable selecting the log level
pub const LOG_ENV: &str = "BUCKETFS_LOG";

static INIT: Once = Once::new();

/// How much to log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    #[default]
    Off,
    Error,
    Warn,
    Info,
    Debug,
}

impl Verbosity {
    /// Lowest level that gets through, `None` when logging is off
    pub fn min_level(self) -> Option<emit::Level> {
        match self {
            Verbosity::Off => None,
            Verbosity::Error => Some(emit::Level::Error),
            Verbosity::Warn => Some(emit::Level::Warn),
            Verbosity::Info => Some(emit::Level::Info),
            Verbosity::Debug => Some(emit::Level::Debug),
        }
    }
}

impl FromStr for Verbosity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "off" => Ok(Verbosity::Off),
            "error" => Ok(Verbosity::Error),
            "warn" => Ok(Verbosity::Warn),
            "info" => Ok(Verbosity::Info),
            "debug" => Ok(Verbosity::Debug),
            other => Err(format!("unknown log level '{}'", other)),
        }
    }
}

/// Initialize diagnostics based on the BUCKETFS_LOG environment variable
///
/// Call once at startup; later calls are ignored.
pub fn init_diagnostics() {
    let value = std::env::var(LOG_ENV).unwrap_or_default();
    let (verbosity, unknown) = match value.parse::<Verbosity>() {
        Ok(verbosity) => (verbosity, None),
        Err(_) => (Verbosity::Info, Some(value)),
    };
    init_with(verbosity);
    if let Some(value) = unknown {
        emit::warn!("unknown {env} value {value}, using info", env: LOG_ENV, value: value.as_str());
    }
}

/// Initialize diagnostics at an explicit verbosity
pub fn init_with(verbosity: Verbosity) {
    INIT.call_once(|| {
        let Some(level) = verbosity.min_level() else {
            return;
        };
        let rt = emit::setup()
            .emit_to(emit_term::stderr())
            .emit_when(emit::level::min_filter(level))
            .init();
        // The runtime lives for the rest of the process.
        std::mem::forget(rt);
    });
}

/// Log basic operations (connections, marker creation)
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        $crate::emit::info!($($arg)*)
    };
}

/// Log detailed diagnostics (probe outcomes, page counts)
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        $crate::emit::debug!($($arg)*)
    };
}

/// Log recoverable oddities
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        $crate::emit::warn!($($arg)*)
    };
}

/// Log failures
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        $crate::emit::error!($($arg)*)
    };
}

/// Log basic operations (connections, marker creation)
#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        $crate::emit::info!($($arg)*)
    };
}

/// Log detailed diagnostics (probe outcomes, page counts, upload strategy)
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {
        $crate::emit::debug!($($arg)*)
    };
}

/// Log recoverable oddities, such as a truncated listing without a token
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        $crate::emit::warn!($($arg)*)
    };
}

/// Log failures that abort an operation
#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        $crate::emit::error!($($arg)*)
    };
}

pub use init_diagnostics as init;
