// SPDX-FileCopyrightText: 2026 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Head resolution: is a path a file, a directory, or nothing?
//!
//! Up to three probes run concurrently: a head on the file key, a head on
//! the directory marker key, and a one-entry delimited listing under the
//! directory key. Every probe settles on its own, so one failure never hides
//! the others, and [`reconcile`] then picks the answer by precedence:
//!
//! 1. a live file object wins, even over a stale directory marker;
//! 2. then an explicit directory marker;
//! 3. then any child under the prefix (an implicit directory);
//! 4. otherwise the path is missing, reported with the file probe's error
//!    if one ran, else the marker probe's, else the listing's.

use crate::backend::{
    BackendError, BackendResult, ListPage, ListRequest, ObjectClient, ObjectHead,
};
use crate::entry_type::EntryType;
use crate::key::KeyMapper;
use diagnostics::*;
use std::future::Future;

/// Outcome of one probe
#[derive(Debug, Clone, PartialEq)]
pub enum Probe<T> {
    /// Not relevant for the entry-type hint, never sent
    Skipped,
    Settled(BackendResult<T>),
}

/// Runs `probe` when `enabled`, capturing its success or failure.
///
/// Futures are lazy, so a disabled probe never reaches the backend.
pub async fn settle<T, F>(enabled: bool, probe: F) -> Probe<T>
where
    F: Future<Output = BackendResult<T>>,
{
    if enabled {
        Probe::Settled(probe.await)
    } else {
        Probe::Skipped
    }
}

/// What a path resolved to
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    File(ObjectHead),
    /// Directory with an explicit marker object
    Directory(ObjectHead),
    /// Directory known only through its children
    ImplicitDirectory,
    Missing(BackendError),
}

/// Picks the answer from three settled probes; pure, no I/O
pub fn reconcile(
    file: Probe<ObjectHead>,
    marker: Probe<ObjectHead>,
    listing: Probe<ListPage>,
) -> Resolution {
    let file_err = match file {
        Probe::Settled(Ok(head)) => return Resolution::File(head),
        Probe::Settled(Err(err)) => Some(err),
        Probe::Skipped => None,
    };
    let marker_err = match marker {
        Probe::Settled(Ok(head)) => return Resolution::Directory(head),
        Probe::Settled(Err(err)) => Some(err),
        Probe::Skipped => None,
    };
    let listing_err = match listing {
        Probe::Settled(Ok(page)) if !page.is_empty() => return Resolution::ImplicitDirectory,
        Probe::Settled(Ok(_)) => None,
        Probe::Settled(Err(err)) => Some(err),
        Probe::Skipped => None,
    };
    // The marker error outranks the listing error. That ordering is kept
    // for compatibility with existing deployments.
    Resolution::Missing(
        file_err
            .or(marker_err)
            .or(listing_err)
            .unwrap_or_else(|| BackendError::not_found("no file, directory marker or children")),
    )
}

/// Probes the backend for `path` according to `hint`
pub async fn resolve(
    client: &dyn ObjectClient,
    keys: &KeyMapper,
    path: &str,
    hint: Option<EntryType>,
) -> Resolution {
    let wants_file = EntryType::wants_file(hint);
    let wants_directory = EntryType::wants_directory(hint);

    let file_key = keys.key(path, false);
    let dir_key = keys.key(path, true);
    let listing = ListRequest::delimited(dir_key.clone()).with_max_keys(1);

    let (file, marker, children) = tokio::join!(
        settle(wants_file, client.head_object(&file_key)),
        settle(wants_directory, client.head_object(&dir_key)),
        settle(wants_directory, client.list_objects(&listing)),
    );

    let resolution = reconcile(file, marker, children);
    debug!(
        "head {path} resolved to {resolution}",
        path: path,
        resolution: describe(&resolution),
    );
    resolution
}

fn describe(resolution: &Resolution) -> &'static str {
    match resolution {
        Resolution::File(_) => "file",
        Resolution::Directory(_) => "directory",
        Resolution::ImplicitDirectory => "implicit directory",
        Resolution::Missing(_) => "missing",
    }
}
