use std::io::Result;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures_util::Stream;
use hyper::body::Bytes;

use crate::file::{ChunkRead, FileChunkReader};

/// Streams at most `remaining` bytes from the current reader position.
pub struct FileBytesStream<T = FileChunkReader> {
    pub(crate) reader: T,
    pub(crate) remaining: u64,
}

impl<T> FileBytesStream<T> {
    pub fn new(reader: T, limit: u64) -> Self {
        Self {
            reader,
            remaining: limit,
        }
    }

    pub(crate) fn remaining(&self) -> u64 {
        self.remaining
    }
}

impl<T: ChunkRead> Stream for FileBytesStream<T> {
    type Item = Result<Bytes>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let Self {
            ref mut reader,
            ref mut remaining,
        } = *self;
        match Pin::new(reader).poll_chunk(cx, *remaining) {
            Poll::Ready(Ok(bytes)) => {
                *remaining -= bytes.len() as u64;
                if bytes.is_empty() {
                    Poll::Ready(None)
                } else {
                    Poll::Ready(Some(Ok(bytes)))
                }
            }
            Poll::Ready(Err(e)) => Poll::Ready(Some(Err(e))),
            Poll::Pending => Poll::Pending,
        }
    }
}
