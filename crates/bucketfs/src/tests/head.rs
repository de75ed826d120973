// SPDX-FileCopyrightText: 2026 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use super::*;
use crate::backend::BackendError;
use crate::entry_type::EntryType;
use crate::error::ErrorKind;
use crate::memory::Operation;

#[tokio::test]
async fn test_head_file() {
    let (fs, client) = new_fs();
    client.insert("repo/notes.txt", "hello").await;

    let stats = fs.head("/notes.txt", None).await.unwrap();
    assert_eq!(stats.size, Some(5));
    assert!(stats.etag.is_some());
    assert!(stats.modified.is_some());
}

#[tokio::test]
async fn test_file_beats_stale_marker() {
    let (fs, client) = new_fs();
    client.insert("repo/x", "data").await;
    client.insert("repo/x/", "").await;

    let stats = fs.head("/x", None).await.unwrap();
    assert_eq!(stats.size, Some(4));
    assert!(!stats.is_directory());
}

#[tokio::test]
async fn test_head_marker_directory() {
    let (fs, client) = new_fs();
    client.insert("repo/d/", "").await;

    let stats = fs.head("/d", None).await.unwrap();
    assert!(stats.is_directory());
    assert!(stats.etag.is_some());
}

#[tokio::test]
async fn test_head_implicit_directory() {
    let (fs, client) = new_fs();
    client.insert("repo/x/y/z.txt", "z").await;

    let stats = fs.head("/x", None).await.unwrap();
    assert_eq!(stats.size, None);
    assert!(stats.is_empty());

    let stats = fs.head("/x/y", Some(EntryType::Directory)).await.unwrap();
    assert!(stats.is_directory());
}

#[tokio::test]
async fn test_head_missing() {
    let (fs, _client) = new_fs();
    let err = fs.head("/ghost", None).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(err.path(), "/ghost");
}

#[tokio::test]
async fn test_hint_limits_probes() {
    let (fs, client) = new_fs();
    client.insert("repo/f", "f").await;
    _ = fs.client().await.unwrap();
    let heads = client.calls(Operation::Head).await;

    _ = fs.head("/f", Some(EntryType::File)).await.unwrap();
    assert_eq!(client.calls(Operation::Head).await, heads + 1);
    assert_eq!(client.calls(Operation::List).await, 0);

    let err = fs.head("/f", Some(EntryType::Directory)).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(client.calls(Operation::Head).await, heads + 2);
    assert_eq!(client.calls(Operation::List).await, 1);
}

#[tokio::test]
async fn test_one_failed_probe_does_not_hide_directory() {
    let (fs, client) = new_fs();
    client.insert("repo/d/child", "c").await;
    client
        .fail_key(
            Operation::Head,
            "repo/d",
            BackendError::with_status(500, "internal error"),
        )
        .await;

    let stats = fs.head("/d", None).await.unwrap();
    assert!(stats.is_directory());
}

#[tokio::test]
async fn test_file_error_reported_first() {
    let (fs, client) = new_fs();
    client
        .fail_key(
            Operation::Head,
            "repo/locked",
            BackendError::with_status(403, "denied"),
        )
        .await;

    let err = fs.head("/locked", None).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotReadable);
}

#[tokio::test]
async fn test_flat_mode_heads_file_only() {
    let (fs, client) = with_options(MemoryClient::new(), flat());
    client.insert("repo/x/y", "y").await;

    let err = fs.head("/x", None).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(client.calls(Operation::Head).await, 1);
    assert_eq!(client.calls(Operation::List).await, 0);

    let stats = fs.head("/x/y", None).await.unwrap();
    assert_eq!(stats.size, Some(1));
}
