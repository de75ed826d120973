// SPDX-FileCopyrightText: 2026 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use super::*;
use crate::backend::BackendError;
use crate::error::ErrorKind;
use crate::memory::Operation;

#[tokio::test]
async fn test_root_marker_created_once() {
    let (fs, client) = new_fs();
    let results = futures::future::join_all((0..8).map(|_| fs.client())).await;
    assert!(results.iter().all(|r| r.is_ok()));

    assert_eq!(client.calls(Operation::Head).await, 1);
    assert_eq!(client.calls(Operation::Put).await, 1);
    assert_eq!(client.contents("repo/").await.unwrap().len(), 0);

    // Clones share the connection
    _ = fs.clone().client().await.unwrap();
    assert_eq!(client.calls(Operation::Head).await, 1);
}

#[tokio::test]
async fn test_existing_root_marker_kept() {
    let (fs, client) = new_fs();
    client.insert("repo/", "").await;
    _ = fs.client().await.unwrap();
    assert_eq!(client.calls(Operation::Put).await, 0);
}

#[tokio::test]
async fn test_failed_connect_is_retried() {
    let (fs, client) = new_fs();
    client
        .fail(Operation::Head, BackendError::with_status(503, "slow down"))
        .await;

    let err = fs.list("/").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotReadable);
    assert_eq!(client.calls(Operation::Put).await, 0);

    client.clear_failures().await;
    assert!(fs.list("/").await.unwrap().is_empty());
    assert_eq!(client.calls(Operation::Head).await, 2);
    assert_eq!(client.calls(Operation::Put).await, 1);
}

#[tokio::test]
async fn test_root_marker_write_failure() {
    let (fs, client) = new_fs();
    client
        .fail(Operation::Put, BackendError::with_status(403, "read-only bucket"))
        .await;

    let err = fs.client().await.err().unwrap();
    assert_eq!(err.kind(), ErrorKind::NoModificationAllowed);
    assert_eq!(err.path(), "/");
}

#[tokio::test]
async fn test_flat_mode_skips_root_marker() {
    let (fs, client) = with_options(MemoryClient::new(), flat());
    _ = fs.client().await.unwrap();
    assert_eq!(client.calls(Operation::Head).await, 0);
    assert!(client.keys().await.is_empty());
}

#[tokio::test]
async fn test_empty_repository_skips_root_marker() {
    let client = MemoryClient::new();
    let fs = BucketFs::with_client("", client.clone(), FileSystemOptions::default());
    client.insert("top.txt", "t").await;

    assert_eq!(fs.list("/").await.unwrap(), vec!["/top.txt"]);
    assert_eq!(client.calls(Operation::Head).await, 0);
    assert_eq!(client.calls(Operation::Put).await, 0);
}
