// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Request body sources
//!
//! A body is chosen once when the request is built. Every variant knows its
//! size up front so Content-Length can be sent explicitly, and file-backed
//! variants stream through a small fixed buffer.

use std::fmt;
use std::io;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use bytes::Bytes;
use tokio::io::{AsyncRead, ReadBuf};
use tokio_util::io::ReaderStream;

use crate::error::{ErrorContext, Result};

/// Bytes pulled per read when streaming a body
const CHUNK_SIZE: usize = 16 * 1024;

/// Progress callback receiving `(bytes_done, bytes_total)`
pub type ProgressFn = Arc<dyn Fn(u64, u64) + Send + Sync>;

/// Outgoing request body
pub enum Body {
    /// File streamed from disk
    File { path: PathBuf, size: u64 },
    /// Reader with a size known in advance
    Stream {
        reader: Box<dyn AsyncRead + Send + Sync + Unpin>,
        size: u64,
    },
    /// In-memory buffer
    Buffer(Bytes),
}

impl Body {
    /// File body sized from its metadata
    pub fn file(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let size = std::fs::metadata(&path).with_path(&path)?.len();
        Ok(Body::File { path, size })
    }

    /// File body that reports upload progress as it is read
    pub fn file_with_progress(path: impl Into<PathBuf>, progress: ProgressFn) -> Result<Self> {
        let path = path.into();
        let file = std::fs::File::open(&path).with_path(&path)?;
        let size = file.metadata().with_path(&path)?.len();
        let reader = ProgressReader::new(tokio::fs::File::from_std(file), size, progress);
        Ok(Body::Stream {
            reader: Box::new(reader),
            size,
        })
    }

    /// Body size in bytes
    pub fn size(&self) -> u64 {
        match self {
            Body::File { size, .. } | Body::Stream { size, .. } => *size,
            Body::Buffer(bytes) => bytes.len() as u64,
        }
    }

    /// Turn the body into something the transport can send
    pub async fn open(self) -> Result<reqwest::Body> {
        match self {
            Body::File { path, .. } => {
                let file = tokio::fs::File::open(&path).await.with_path(&path)?;
                Ok(stream_body(file))
            }
            Body::Stream { reader, .. } => Ok(stream_body(reader)),
            Body::Buffer(bytes) => Ok(reqwest::Body::from(bytes)),
        }
    }
}

/// Chunked transport body pulled from `reader`
fn stream_body<R>(reader: R) -> reqwest::Body
where
    R: AsyncRead + Send + Sync + 'static,
{
    reqwest::Body::wrap_stream(ReaderStream::with_capacity(reader, CHUNK_SIZE))
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Body::File { path, size } => f
                .debug_struct("File")
                .field("path", path)
                .field("size", size)
                .finish(),
            Body::Stream { size, .. } => f.debug_struct("Stream").field("size", size).finish(),
            Body::Buffer(bytes) => f.debug_tuple("Buffer").field(&bytes.len()).finish(),
        }
    }
}

impl From<Bytes> for Body {
    fn from(bytes: Bytes) -> Self {
        Body::Buffer(bytes)
    }
}

/// Reader that reports how many bytes have passed through it
pub struct ProgressReader<R> {
    inner: R,
    done: u64,
    total: u64,
    report: ProgressFn,
}

impl<R> ProgressReader<R> {
    /// Wrap `inner`, expecting `total` bytes
    pub fn new(inner: R, total: u64, report: ProgressFn) -> Self {
        Self {
            inner,
            done: 0,
            total,
            report,
        }
    }
}

impl<R: AsyncRead + Unpin> AsyncRead for ProgressReader<R> {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let before = buf.filled().len();
        let this = &mut *self;
        let poll = Pin::new(&mut this.inner).poll_read(cx, buf);
        if let Poll::Ready(Ok(())) = poll {
            let read = (buf.filled().len() - before) as u64;
            if read > 0 {
                this.done += read;
                (this.report)(this.done, this.total);
            }
        }
        poll
    }
}
