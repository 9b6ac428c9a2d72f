use crate::error::RangeParseError;

const HEADER_PREFIX: &str = "bytes=";

/// A single satisfiable byte range, clamped to the file size.
#[derive(Debug, PartialEq, Eq)]
pub struct ByteRange {
    pub start: u64,
    pub length: u64,
}

type Result<T> = std::result::Result<T, RangeParseError>;

impl ByteRange {
    /// Parse a `Range` request header against the target file size.
    ///
    /// Returns `Ok(None)` when the header names more than one range: the
    /// server does not produce multipart bodies, so multi-range requests
    /// are answered with the full file instead.
    pub fn parse(header: &str, file_size: u64) -> Result<Option<ByteRange>> {
        let ranges = header
            .strip_prefix(HEADER_PREFIX)
            .ok_or(RangeParseError::Malformed)?;
        if ranges.contains(',') {
            return Ok(None);
        }
        let spec = ranges.trim();
        let (start, end) = spec.split_once('-').ok_or(RangeParseError::Malformed)?;
        if start.is_empty() {
            // suffix form: the last `end` bytes of the file
            let suffix: u64 = end.parse().map_err(|_| RangeParseError::Malformed)?;
            if suffix == 0 || file_size == 0 {
                return Err(RangeParseError::Unsatisfiable);
            }
            let length = suffix.min(file_size);
            Ok(Some(ByteRange {
                start: file_size - length,
                length,
            }))
        } else {
            let start: u64 = start.parse().map_err(|_| RangeParseError::Malformed)?;
            if start >= file_size {
                return Err(RangeParseError::Unsatisfiable);
            }
            let length = if end.is_empty() {
                file_size - start
            } else {
                let end: u64 = end.parse().map_err(|_| RangeParseError::Malformed)?;
                if end < start {
                    return Err(RangeParseError::Malformed);
                }
                end.min(file_size - 1) - start + 1
            };
            Ok(Some(ByteRange { start, length }))
        }
    }

    /// Inclusive end offset, for the `Content-Range` header.
    pub fn end(&self) -> u64 {
        self.start + self.length - 1
    }
}
