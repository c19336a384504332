//! HTTP Range request parsing module
//!
//! Single-range `bytes=` parsing per RFC 7233. Multi-range requests and
//! non-byte units are ignored and answered with the full content.

/// A resolved byte range within a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    /// First byte position (inclusive)
    pub start: usize,
    /// Last byte position (inclusive), None means until end of file
    pub end: Option<usize>,
}

impl ByteRange {
    /// Actual last byte position for a file of `file_size` bytes
    #[inline]
    pub fn end_position(&self, file_size: usize) -> usize {
        self.end.unwrap_or_else(|| file_size.saturating_sub(1))
    }

    #[cfg(test)]
    pub fn len(&self, file_size: usize) -> usize {
        self.end_position(file_size).saturating_sub(self.start) + 1
    }
}

/// Outcome of parsing a Range header against a concrete file size
#[derive(Debug)]
pub enum RangeOutcome {
    /// Satisfiable range, respond 206
    Valid(ByteRange),
    /// Start lies beyond the file, respond 416
    NotSatisfiable,
    /// No Range header, or a form we do not serve; respond with full content
    None,
}

/// Parse an HTTP Range header (single range, bytes unit only)
///
/// Supported forms:
/// - `bytes=start-end`
/// - `bytes=start-` (open ended)
/// - `bytes=-suffix` (last `suffix` bytes)
pub fn parse_range_header(range_header: Option<&str>, file_size: usize) -> RangeOutcome {
    let Some(spec) = range_header.and_then(|h| h.strip_prefix("bytes=")) else {
        return RangeOutcome::None;
    };

    // Multi-range responses (multipart/byteranges) are not served
    if spec.contains(',') {
        return RangeOutcome::None;
    }

    // No byte of an empty file is addressable
    if file_size == 0 {
        return RangeOutcome::NotSatisfiable;
    }

    let Some((start_str, end_str)) = spec.split_once('-') else {
        return RangeOutcome::None;
    };
    let (start_str, end_str) = (start_str.trim(), end_str.trim());

    if start_str.is_empty() {
        // Suffix form: "-500" means the last 500 bytes
        let Ok(suffix) = end_str.parse::<usize>() else {
            return RangeOutcome::None;
        };
        if suffix == 0 {
            return RangeOutcome::NotSatisfiable;
        }
        return RangeOutcome::Valid(ByteRange {
            start: file_size.saturating_sub(suffix),
            end: Some(file_size.saturating_sub(1)),
        });
    }

    let Ok(start) = start_str.parse::<usize>() else {
        return RangeOutcome::None;
    };
    if start >= file_size {
        return RangeOutcome::NotSatisfiable;
    }

    let end = if end_str.is_empty() {
        None
    } else {
        let Ok(e) = end_str.parse::<usize>() else {
            return RangeOutcome::None;
        };
        if e < start {
            return RangeOutcome::NotSatisfiable;
        }
        // Clamp to the last byte of the file
        Some(e.min(file_size - 1))
    };

    RangeOutcome::Valid(ByteRange { start, end })
}
