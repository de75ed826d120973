// SPDX-FileCopyrightText: 2026 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use crate::backend::SignedOperation;
use std::time::Duration;

/// Lifetime of a signed URL unless the caller asks otherwise
pub const DEFAULT_URL_EXPIRY: Duration = Duration::from_secs(86400);

/// Options for [`crate::BucketFs::to_url`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlOptions {
    /// Requested HTTP method: `GET`, `PUT`, `POST` or `DELETE`
    pub url_type: String,
    pub expires: Duration,
}

impl Default for UrlOptions {
    fn default() -> Self {
        Self {
            url_type: "GET".to_string(),
            expires: DEFAULT_URL_EXPIRY,
        }
    }
}

impl UrlOptions {
    pub fn new<S: Into<String>>(url_type: S) -> Self {
        Self {
            url_type: url_type.into(),
            ..Self::default()
        }
    }

    pub fn with_expires(mut self, expires: Duration) -> Self {
        self.expires = expires;
        self
    }
}

/// Maps a requested URL type onto a signable operation.
///
/// Create and replace share a signed put. Returns `None` for anything
/// else; the caller reports that as not supported.
pub fn signed_operation(url_type: &str) -> Option<SignedOperation> {
    match url_type {
        "GET" => Some(SignedOperation::GetObject),
        "PUT" | "POST" => Some(SignedOperation::PutObject),
        "DELETE" => Some(SignedOperation::DeleteObject),
        _ => None,
    }
}
