use std::cmp::min;
use std::io::{Result, SeekFrom};
use std::mem::MaybeUninit;
use std::path::Path;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::SystemTime;

use hyper::body::Bytes;
use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncSeek, ReadBuf};

const READ_BUF_SIZE: usize = 16384;

/// An opened file plus the metadata needed to build a response.
#[derive(Debug)]
pub struct AssetFile {
    pub file: File,
    pub size: u64,
    pub is_dir: bool,
    pub modified: Option<SystemTime>,
}

impl AssetFile {
    pub fn into_reader(self) -> FileChunkReader {
        FileChunkReader::new(self.file)
    }
}

/// Open a path and capture its metadata in one pass. The caller decides
/// what a directory target means; this function only reports it.
pub async fn open_asset(path: &Path) -> Result<AssetFile> {
    let file = File::open(path).await?;
    let meta = file.metadata().await?;
    Ok(AssetFile {
        size: meta.len(),
        is_dir: meta.is_dir(),
        modified: meta.modified().ok(),
        file,
    })
}

/// Chunked reader feeding response body streams. `limit` caps how many
/// bytes a single poll may yield so a range body never reads past its end.
pub trait ChunkRead: AsyncSeek + Unpin + Send + 'static {
    fn poll_chunk(self: Pin<&mut Self>, cx: &mut Context<'_>, limit: u64) -> Poll<Result<Bytes>>;
}

/// `ChunkRead` over a tokio file with a fixed reusable read buffer.
pub struct FileChunkReader {
    file: File,
    buf: Box<[MaybeUninit<u8>; READ_BUF_SIZE]>,
}

impl FileChunkReader {
    fn new(file: File) -> Self {
        Self {
            file,
            buf: Box::new([MaybeUninit::uninit(); READ_BUF_SIZE]),
        }
    }
}

impl ChunkRead for FileChunkReader {
    fn poll_chunk(mut self: Pin<&mut Self>, cx: &mut Context<'_>, limit: u64) -> Poll<Result<Bytes>> {
        let Self {
            ref mut file,
            ref mut buf,
        } = *self;
        let buf_len = min(limit as usize, buf.len());
        let mut buf = ReadBuf::uninit(&mut buf[..buf_len]);
        match Pin::new(file).poll_read(cx, &mut buf) {
            Poll::Ready(Ok(())) => {
                let filled = buf.filled();
                if filled.is_empty() {
                    Poll::Ready(Ok(Bytes::new()))
                } else {
                    Poll::Ready(Ok(Bytes::copy_from_slice(filled)))
                }
            }
            Poll::Ready(Err(e)) => Poll::Ready(Err(e)),
            Poll::Pending => Poll::Pending,
        }
    }
}

impl AsyncSeek for FileChunkReader {
    fn start_seek(self: Pin<&mut Self>, position: SeekFrom) -> Result<()> {
        Pin::new(&mut self.get_mut().file).start_seek(position)
    }

    fn poll_complete(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Result<u64>> {
        Pin::new(&mut self.get_mut().file).poll_complete(cx)
    }
}
