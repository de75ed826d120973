// SPDX-FileCopyrightText: 2026 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

mod connection;
mod head;

use crate::config::FileSystemOptions;
use crate::fs::BucketFs;
use crate::memory::MemoryClient;

pub const REPO: &str = "repo";

/// A filesystem over a fresh in-memory bucket, plus a handle on that bucket
pub fn new_fs() -> (BucketFs, MemoryClient) {
    with_client(MemoryClient::new())
}

pub fn with_client(client: MemoryClient) -> (BucketFs, MemoryClient) {
    with_options(client, FileSystemOptions::default())
}

pub fn with_options(client: MemoryClient, options: FileSystemOptions) -> (BucketFs, MemoryClient) {
    let fs = BucketFs::with_client(REPO, client.clone(), options);
    (fs, client)
}

pub fn flat() -> FileSystemOptions {
    FileSystemOptions {
        can_create_directory: false,
    }
}
