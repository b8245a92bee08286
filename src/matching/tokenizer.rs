/// A `(start, len)` descriptor of one segment inside the original path
/// buffer. Never owns or copies the underlying text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PathSegment {
    pub start: usize,
    pub len: usize,
}

impl PathSegment {
    pub fn new(start: usize, len: usize) -> Self {
        Self { start, len }
    }

    /// Resolve this descriptor against the path it was tokenized from.
    pub fn of<'a>(&self, path: &'a str) -> &'a str {
        &path[self.start..self.start + self.len]
    }
}

/// Split a request path into segment descriptors.
///
/// The path must be empty or begin with `/`. An empty path yields zero
/// segments. Each non-empty run of characters between slashes becomes one
/// descriptor; residue after the final slash (no terminating slash) becomes
/// the last segment, so `/a/b/` yields exactly `a`, `b`.
///
/// Writes at most `segments.len()` descriptors and stops early once the
/// buffer fills — anything beyond that bound is silently not tokenized.
/// Callers must size the buffer to the maximum supported path depth and
/// treat a full buffer as overflow.
pub fn tokenize(path: &str, segments: &mut [PathSegment]) -> usize {
    if path.is_empty() {
        return 0;
    }

    debug_assert!(path.starts_with('/'), "path must be empty or start with '/'");

    let bytes = path.as_bytes();
    let mut count = 0;
    // Paths always carry a leading slash.
    let mut start = 1;
    let mut i = 1;
    while i < bytes.len() && count < segments.len() {
        if bytes[i] == b'/' {
            if i > start {
                segments[count] = PathSegment::new(start, i - start);
                count += 1;
            }
            start = i + 1;
        }
        i += 1;
    }

    // Residue after the final slash.
    if start < bytes.len() && count < segments.len() {
        segments[count] = PathSegment::new(start, bytes.len() - start);
        count += 1;
    }

    count
}
