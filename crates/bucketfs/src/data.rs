// SPDX-FileCopyrightText: 2026 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! File payloads.
//!
//! A payload is text, an in-memory byte buffer or a stream of unknown
//! length. Appends merge the current content with the new payload, keeping
//! the narrowest representation: two texts stay text, anything involving a
//! stream becomes a chained stream, everything else becomes one buffer.

use crate::backend::ByteReader;
use bytes::{Bytes, BytesMut};
use std::io::Cursor;
use tokio::io::AsyncReadExt;

/// Content read from or written to a file
pub enum Data {
    Text(String),
    Bytes(Bytes),
    Stream(ByteReader),
}

/// The shape handed to the backend on upload
pub enum Body {
    /// Known length, uploaded with a single put
    Buffer(Bytes),
    /// Unknown length, uploaded in parts
    Stream(ByteReader),
}

impl std::fmt::Debug for Data {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Data::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Data::Bytes(bytes) => f.debug_tuple("Bytes").field(bytes).finish(),
            Data::Stream(_) => f.write_str("Stream(..)"),
        }
    }
}

impl Data {
    pub fn is_stream(&self) -> bool {
        matches!(self, Data::Stream(_))
    }

    /// Appends `tail` after `head` without touching the network
    pub fn merge(head: Data, tail: Data) -> Data {
        match (head, tail) {
            (head, tail) if head.is_stream() || tail.is_stream() => {
                Data::Stream(Box::pin(head.into_reader().chain(tail.into_reader())))
            }
            (Data::Text(mut head), Data::Text(tail)) => {
                head.push_str(&tail);
                Data::Text(head)
            }
            (head, tail) => {
                let head = head.buffered();
                let tail = tail.buffered();
                let mut merged = BytesMut::with_capacity(head.len() + tail.len());
                merged.extend_from_slice(&head);
                merged.extend_from_slice(&tail);
                Data::Bytes(merged.freeze())
            }
        }
    }

    /// Upload shape for this payload; text and buffers are passed as-is
    pub fn into_body(self) -> Body {
        match self {
            Data::Text(text) => Body::Buffer(Bytes::from(text)),
            Data::Bytes(bytes) => Body::Buffer(bytes),
            Data::Stream(reader) => Body::Stream(reader),
        }
    }

    pub fn into_reader(self) -> ByteReader {
        match self {
            Data::Text(text) => Box::pin(Cursor::new(Bytes::from(text))),
            Data::Bytes(bytes) => Box::pin(Cursor::new(bytes)),
            Data::Stream(reader) => reader,
        }
    }

    /// Materializes the payload, draining a stream if necessary
    pub async fn into_bytes(self) -> std::io::Result<Bytes> {
        match self {
            Data::Stream(mut reader) => {
                let mut buf = Vec::new();
                _ = reader.read_to_end(&mut buf).await?;
                Ok(Bytes::from(buf))
            }
            other => Ok(other.buffered()),
        }
    }

    // Only called on non-stream variants.
    fn buffered(self) -> Bytes {
        match self {
            Data::Text(text) => Bytes::from(text),
            Data::Bytes(bytes) => bytes,
            Data::Stream(_) => Bytes::new(),
        }
    }
}

impl From<String> for Data {
    fn from(text: String) -> Self {
        Data::Text(text)
    }
}

impl From<&str> for Data {
    fn from(text: &str) -> Self {
        Data::Text(text.to_string())
    }
}

impl From<Vec<u8>> for Data {
    fn from(bytes: Vec<u8>) -> Self {
        Data::Bytes(Bytes::from(bytes))
    }
}

impl From<Bytes> for Data {
    fn from(bytes: Bytes) -> Self {
        Data::Bytes(bytes)
    }
}

impl From<ByteReader> for Data {
    fn from(reader: ByteReader) -> Self {
        Data::Stream(reader)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stream(content: &'static [u8]) -> Data {
        Data::Stream(Box::pin(Cursor::new(content)))
    }

    #[tokio::test]
    async fn test_text_merge_stays_text() {
        let merged = Data::merge(Data::from("A"), Data::from("B"));
        match merged {
            Data::Text(text) => assert_eq!(text, "AB"),
            other => panic!("expected text, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_mixed_merge_is_buffer() {
        let merged = Data::merge(Data::from("head-"), Data::from(b"tail".to_vec()));
        match merged {
            Data::Bytes(bytes) => assert_eq!(&bytes[..], b"head-tail"),
            other => panic!("expected bytes, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_stream_merge_preserves_order() {
        let merged = Data::merge(Data::from("head-"), stream(b"streamed"));
        assert!(merged.is_stream());
        let bytes = merged.into_bytes().await.unwrap();
        assert_eq!(&bytes[..], b"head-streamed");

        let merged = Data::merge(stream(b"first-"), Data::from(b"second".to_vec()));
        assert!(merged.is_stream());
        let bytes = merged.into_bytes().await.unwrap();
        assert_eq!(&bytes[..], b"first-second");
    }

    #[test]
    fn test_body_shape() {
        assert!(matches!(Data::from("x").into_body(), Body::Buffer(_)));
        assert!(matches!(Data::from(vec![1u8]).into_body(), Body::Buffer(_)));
        assert!(matches!(stream(b"x").into_body(), Body::Stream(_)));
    }
}
