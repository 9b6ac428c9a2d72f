use std::io::{ErrorKind, Result};
use std::path::{Path, PathBuf};

use percent_encoding::percent_decode_str;

use crate::file::{open_asset, AssetFile};

const INDEX_FILE: &str = "index.html";

/// Outcome of resolving a request path below the serve root.
#[derive(Debug)]
pub enum Resolved {
    NotFound,
    Forbidden,
    /// The opened file and the path it was found at; the path is what the
    /// content-type lookup sees (it differs from the request path when a
    /// directory falls through to its index file).
    Found(AssetFile, PathBuf),
}

/// Resolve a raw request path to a file under `root`.
///
/// Traversal attempts surface as `Forbidden`, missing targets as
/// `NotFound`, a directory as its `index.html` if present. Only genuinely
/// unexpected I/O errors propagate as `Err`.
pub async fn resolve(root: &Path, uri_path: &str) -> Result<Resolved> {
    let path = match sanitize(root, uri_path) {
        Some(path) => path,
        None => return Ok(Resolved::Forbidden),
    };
    match open_asset(&path).await {
        Ok(asset) if asset.is_dir => {
            let index = path.join(INDEX_FILE);
            match open_asset(&index).await {
                Ok(asset) if asset.is_dir => Ok(Resolved::NotFound),
                Ok(asset) => Ok(Resolved::Found(asset, index)),
                Err(e) => open_failure(e),
            }
        }
        Ok(asset) => Ok(Resolved::Found(asset, path)),
        Err(e) => open_failure(e),
    }
}

fn open_failure(e: std::io::Error) -> Result<Resolved> {
    match e.kind() {
        ErrorKind::NotFound | ErrorKind::InvalidInput => Ok(Resolved::NotFound),
        // opening `existing_file/anything` fails with NotADirectory
        ErrorKind::NotADirectory => Ok(Resolved::NotFound),
        ErrorKind::PermissionDenied => Ok(Resolved::Forbidden),
        _ => Err(e),
    }
}

/// Rebuild the request path below `root` segment by segment.
///
/// Percent-decoding happens exactly once, before segmentation, so an
/// encoded `%2e%2e` is seen as a plain `..`. Every `..` is refused
/// outright rather than normalized; nothing above `root` is ever named.
fn sanitize(root: &Path, uri_path: &str) -> Option<PathBuf> {
    let decoded = percent_decode_str(uri_path).decode_utf8().ok()?;
    let mut path = root.to_path_buf();
    for segment in decoded.split('/') {
        match segment {
            "" | "." => {}
            ".." => return None,
            s if s.contains('\0') || s.contains('\\') => return None,
            s => path.push(s),
        }
    }
    Some(path)
}

#[cfg(test)]
mod test {
    use super::*;

    fn sanitized(uri_path: &str) -> Option<PathBuf> {
        sanitize(Path::new("/srv/root"), uri_path)
    }

    #[test]
    fn test_plain_paths() {
        assert_eq!(sanitized("/model.glb"), Some("/srv/root/model.glb".into()));
        assert_eq!(
            sanitized("/assets/app.js"),
            Some("/srv/root/assets/app.js".into())
        );
        assert_eq!(sanitized("/"), Some("/srv/root".into()));
    }

    #[test]
    fn test_redundant_segments_collapse() {
        assert_eq!(sanitized("//a///b"), Some("/srv/root/a/b".into()));
        assert_eq!(sanitized("/./a/./b"), Some("/srv/root/a/b".into()));
    }

    #[test]
    fn test_percent_decoding() {
        assert_eq!(
            sanitized("/with%20space.txt"),
            Some("/srv/root/with space.txt".into())
        );
    }

    #[test]
    fn test_traversal_refused() {
        assert_eq!(sanitized("/../etc/passwd"), None);
        assert_eq!(sanitized("/a/../../b"), None);
        // non-escaping dot-dot is refused too
        assert_eq!(sanitized("/a/../b"), None);
    }

    #[test]
    fn test_encoded_traversal_refused() {
        assert_eq!(sanitized("/%2e%2e/etc/passwd"), None);
        assert_eq!(sanitized("/a/%2E%2E/b"), None);
    }

    #[test]
    fn test_double_encoded_is_literal() {
        // %252e decodes to the literal text "%2e", not a dot; the segment
        // is an ordinary (unlikely) file name inside the root
        assert_eq!(
            sanitized("/%252e%252e/x"),
            Some("/srv/root/%2e%2e/x".into())
        );
    }

    #[test]
    fn test_hostile_segments_refused() {
        assert_eq!(sanitized("/a%00b"), None);
        assert_eq!(sanitized("/a%5c..%5cb"), None);
        assert_eq!(sanitized("/%ff%fe"), None);
    }
}
