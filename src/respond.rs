use std::time::{Duration, SystemTime, UNIX_EPOCH};

use hyper::http::request::Parts;
use hyper::http::Result;
use hyper::{header, HeaderMap, Method, Response, StatusCode};

use crate::body::{Body, FileBytesStream, RangeBytesStream};
use crate::file::AssetFile;
use crate::range::ByteRange;

// mtimes this close to the epoch are filesystem placeholders, not real
// modification times
const VALID_MTIME: Duration = Duration::from_secs(2);

const TEXT_PLAIN: &str = "text/plain; charset=utf-8";

/// Assembles the response for a resolved file from the conditional and
/// range headers of the request.
#[derive(Default, Debug, Clone)]
pub struct ResponseBuilder {
    range: Option<String>,
    // `If-Modified-Since` request header.
    if_modified_since: Option<SystemTime>,
    is_head: bool,
}

impl ResponseBuilder {
    pub fn from_parts(parts: &Parts) -> Self {
        let mut builder = Self::default();
        builder.is_head = parts.method == Method::HEAD;
        builder.request_headers(&parts.headers);
        builder
    }

    fn request_headers(&mut self, headers: &HeaderMap) -> &mut Self {
        self.range = headers
            .get(header::RANGE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        self.if_modified_since = headers
            .get(header::IF_MODIFIED_SINCE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| httpdate::parse_http_date(v).ok());
        self
    }

    pub fn build(&self, asset: AssetFile, content_type: &str) -> Result<Response<Body>> {
        let file_size = asset.size;
        let mut resp = Response::builder();
        let modified = asset.modified.filter(|m| {
            m.duration_since(UNIX_EPOCH)
                .ok()
                .filter(|d| d >= &VALID_MTIME)
                .is_some()
        });
        if let Some(modified) = modified {
            if let Ok(mtime) = modified.duration_since(UNIX_EPOCH) {
                let ims = self.if_modified_since.map(|t| t.duration_since(UNIX_EPOCH));
                if let Some(Ok(ims)) = ims {
                    if mtime.as_secs() <= ims.as_secs() {
                        return resp.status(StatusCode::NOT_MODIFIED).body(Body::Empty);
                    }
                }
            }
            resp = resp.header(header::LAST_MODIFIED, httpdate::fmt_http_date(modified));
        }
        resp = resp
            .header(header::CONTENT_TYPE, content_type)
            .header(header::ACCEPT_RANGES, "bytes");
        if self.is_head {
            return resp
                .header(header::CONTENT_LENGTH, file_size)
                .status(StatusCode::OK)
                .body(Body::Empty);
        }
        let range = match self.range.as_deref().map(|r| ByteRange::parse(r, file_size)) {
            None => None,
            // a multi-range request falls through to the full body
            Some(Ok(range)) => range,
            Some(Err(_)) => {
                return resp
                    .status(StatusCode::RANGE_NOT_SATISFIABLE)
                    .header(header::CONTENT_RANGE, format!("bytes */{file_size}"))
                    .body(Body::Empty)
            }
        };
        match range {
            Some(range) => {
                let content_range = format!("bytes {}-{}/{}", range.start, range.end(), file_size);
                let stream = RangeBytesStream::new(asset.into_reader(), &range);
                resp.header(header::CONTENT_RANGE, content_range)
                    .header(header::CONTENT_LENGTH, range.length)
                    .status(StatusCode::PARTIAL_CONTENT)
                    .body(Body::Range(stream))
            }
            None => {
                let stream = FileBytesStream::new(asset.into_reader(), file_size);
                resp.header(header::CONTENT_LENGTH, file_size)
                    .status(StatusCode::OK)
                    .body(Body::File(stream))
            }
        }
    }
}

pub fn preflight_ok() -> Result<Response<Body>> {
    Response::builder()
        .status(StatusCode::OK)
        .body(Body::Empty)
}

pub fn not_found() -> Result<Response<Body>> {
    Response::builder()
        .status(StatusCode::NOT_FOUND)
        .header(header::CONTENT_TYPE, TEXT_PLAIN)
        .body(Body::text("404 Not Found\n"))
}

pub fn forbidden() -> Result<Response<Body>> {
    Response::builder()
        .status(StatusCode::FORBIDDEN)
        .header(header::CONTENT_TYPE, TEXT_PLAIN)
        .body(Body::text("403 Forbidden\n"))
}

pub fn method_not_allowed() -> Result<Response<Body>> {
    Response::builder()
        .status(StatusCode::METHOD_NOT_ALLOWED)
        .header(header::ALLOW, "GET, HEAD, OPTIONS")
        .header(header::CONTENT_TYPE, TEXT_PLAIN)
        .body(Body::text("405 Method Not Allowed\n"))
}

pub fn server_error() -> Result<Response<Body>> {
    Response::builder()
        .status(StatusCode::INTERNAL_SERVER_ERROR)
        .header(header::CONTENT_TYPE, TEXT_PLAIN)
        .body(Body::text("500 Internal Server Error\n"))
}

#[cfg(test)]
mod test {
    use super::*;
    use hyper::Request;

    async fn scratch_asset(bytes: &[u8]) -> AssetFile {
        use std::sync::atomic::{AtomicUsize, Ordering};
        static SEQ: AtomicUsize = AtomicUsize::new(0);
        let path = std::env::temp_dir().join(format!(
            "asset-serve-respond-{}-{}.bin",
            std::process::id(),
            SEQ.fetch_add(1, Ordering::Relaxed)
        ));
        tokio::fs::write(&path, bytes).await.unwrap();
        crate::file::open_asset(&path).await.unwrap()
    }

    fn parts_for(req: Request<()>) -> Parts {
        req.into_parts().0
    }

    #[tokio::test]
    async fn test_full_body_response() {
        let asset = scratch_asset(b"0123456789").await;
        let parts = parts_for(Request::get("/f.bin").body(()).unwrap());
        let resp = ResponseBuilder::from_parts(&parts)
            .build(asset, "application/octet-stream")
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[header::CONTENT_LENGTH], "10");
        assert_eq!(resp.headers()[header::ACCEPT_RANGES], "bytes");
        assert!(resp.headers().contains_key(header::LAST_MODIFIED));
    }

    #[tokio::test]
    async fn test_head_has_length_but_no_body() {
        let asset = scratch_asset(b"0123456789").await;
        let parts = parts_for(Request::head("/f.bin").body(()).unwrap());
        let resp = ResponseBuilder::from_parts(&parts)
            .build(asset, "application/octet-stream")
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[header::CONTENT_LENGTH], "10");
        assert!(matches!(resp.into_body(), Body::Empty));
    }

    #[tokio::test]
    async fn test_not_modified_cutoff() {
        let asset = scratch_asset(b"0123456789").await;
        let mtime = asset.modified.unwrap();
        let parts = parts_for(
            Request::get("/f.bin")
                .header(header::IF_MODIFIED_SINCE, httpdate::fmt_http_date(mtime))
                .body(())
                .unwrap(),
        );
        let resp = ResponseBuilder::from_parts(&parts)
            .build(asset, "application/octet-stream")
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_MODIFIED);
        assert!(matches!(resp.into_body(), Body::Empty));
    }

    #[tokio::test]
    async fn test_stale_if_modified_since_serves_body() {
        let asset = scratch_asset(b"0123456789").await;
        let old = UNIX_EPOCH + Duration::from_secs(1_000_000);
        let parts = parts_for(
            Request::get("/f.bin")
                .header(header::IF_MODIFIED_SINCE, httpdate::fmt_http_date(old))
                .body(())
                .unwrap(),
        );
        let resp = ResponseBuilder::from_parts(&parts)
            .build(asset, "application/octet-stream")
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_range_response_headers() {
        let asset = scratch_asset(b"0123456789").await;
        let parts = parts_for(
            Request::get("/f.bin")
                .header(header::RANGE, "bytes=2-5")
                .body(())
                .unwrap(),
        );
        let resp = ResponseBuilder::from_parts(&parts)
            .build(asset, "application/octet-stream")
            .unwrap();
        assert_eq!(resp.status(), StatusCode::PARTIAL_CONTENT);
        assert_eq!(resp.headers()[header::CONTENT_RANGE], "bytes 2-5/10");
        assert_eq!(resp.headers()[header::CONTENT_LENGTH], "4");
    }

    #[tokio::test]
    async fn test_unsatisfiable_range() {
        let asset = scratch_asset(b"0123456789").await;
        let parts = parts_for(
            Request::get("/f.bin")
                .header(header::RANGE, "bytes=100-200")
                .body(())
                .unwrap(),
        );
        let resp = ResponseBuilder::from_parts(&parts)
            .build(asset, "application/octet-stream")
            .unwrap();
        assert_eq!(resp.status(), StatusCode::RANGE_NOT_SATISFIABLE);
        assert_eq!(resp.headers()[header::CONTENT_RANGE], "bytes */10");
    }
}
