use std::io::{Result, SeekFrom};
use std::pin::Pin;
use std::task::{Context, Poll};

use futures_util::Stream;
use hyper::body::Bytes;
use tokio::io::AsyncSeek;

use crate::file::FileChunkReader;
use crate::range::ByteRange;

use super::bytes_stream::FileBytesStream;

#[derive(Debug, Clone, Copy)]
enum RangeState {
    Initial,
    Seeking,
    Reading,
}

/// Seeks to the range start, then streams exactly the range length.
pub struct RangeBytesStream {
    state: RangeState,
    start_pos: u64,
    stream: FileBytesStream,
}

impl RangeBytesStream {
    pub fn new(reader: FileChunkReader, range: &ByteRange) -> RangeBytesStream {
        Self {
            stream: FileBytesStream::new(reader, range.length),
            start_pos: range.start,
            state: RangeState::Initial,
        }
    }

    pub(crate) fn remaining(&self) -> u64 {
        self.stream.remaining()
    }
}

impl Stream for RangeBytesStream {
    type Item = Result<Bytes>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let Self {
            ref mut stream,
            ref mut state,
            start_pos,
        } = *self;
        if let RangeState::Initial = *state {
            let seek_position = SeekFrom::Start(start_pos);
            *state = RangeState::Seeking;
            if let Err(e) = Pin::new(&mut stream.reader).start_seek(seek_position) {
                return Poll::Ready(Some(Err(e)));
            }
        }
        if let RangeState::Seeking = *state {
            match Pin::new(&mut stream.reader).poll_complete(cx) {
                Poll::Ready(Ok(_)) => {
                    *state = RangeState::Reading;
                }
                Poll::Ready(Err(e)) => return Poll::Ready(Some(Err(e))),
                Poll::Pending => return Poll::Pending,
            };
        }
        Pin::new(stream).poll_next(cx)
    }
}
