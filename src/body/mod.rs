use std::io::Error;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures_util::Stream;
use hyper::body::{Bytes, SizeHint};

pub use self::bytes_stream::FileBytesStream;
pub use self::range_bytes_stream::RangeBytesStream;

mod bytes_stream;
mod range_bytes_stream;

/// Response body: empty, a short fixed text, or a streamed file region.
pub enum Body {
    Empty,
    Once(Option<Bytes>),
    File(FileBytesStream),
    Range(RangeBytesStream),
}

impl Body {
    pub fn text(text: &'static str) -> Self {
        Body::Once(Some(Bytes::from_static(text.as_bytes())))
    }
}

impl hyper::body::HttpBody for Body {
    type Data = Bytes;

    type Error = Error;

    fn poll_data(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Self::Data, Self::Error>>> {
        match *self {
            Body::Empty => Poll::Ready(None),
            Body::Once(ref mut bytes) => Poll::Ready(bytes.take().map(Ok)),
            Body::File(ref mut stream) => Pin::new(stream).poll_next(cx),
            Body::Range(ref mut stream) => Pin::new(stream).poll_next(cx),
        }
    }

    fn poll_trailers(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
    ) -> Poll<Result<Option<hyper::HeaderMap>, Self::Error>> {
        Poll::Ready(Ok(None))
    }

    fn is_end_stream(&self) -> bool {
        match *self {
            Body::Empty | Body::Once(None) => true,
            _ => false,
        }
    }

    fn size_hint(&self) -> SizeHint {
        match *self {
            Body::Empty | Body::Once(None) => SizeHint::with_exact(0),
            Body::Once(Some(ref bytes)) => SizeHint::with_exact(bytes.len() as u64),
            Body::File(ref stream) => SizeHint::with_exact(stream.remaining()),
            Body::Range(ref stream) => SizeHint::with_exact(stream.remaining()),
        }
    }
}
