use std::fmt::{Display, Formatter, Result as FmtResult};

/// Bounds of a single HTTP byte range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeBounds {
    /// `bytes=start-end`, both inclusive
    Closed { start: u64, end: u64 },
    /// `bytes=start-`
    From { start: u64 },
    /// `bytes=-length`, the last `length` bytes
    Suffix { length: u64 },
}

/// A single-range `Range` request header.
///
/// Only the `bytes` unit with exactly one range is accepted. The inbound header
/// text is kept so it can be forwarded to the origin unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ByteRange {
    raw: String,
    bounds: RangeBounds,
}

impl ByteRange {
    /// Parse a `Range` header value. Returns `None` for anything that is not a
    /// single satisfiable-looking byte range; callers then serve the full body.
    pub fn parse(header: &str) -> Option<Self> {
        let trimmed = header.trim();
        let (unit, spec) = trimmed.split_once('=')?;
        if !unit.trim().eq_ignore_ascii_case("bytes") {
            return None;
        }

        let spec = spec.trim();
        if spec.contains(',') {
            return None;
        }

        let (start, end) = spec.split_once('-')?;
        let (start, end) = (start.trim(), end.trim());

        let bounds = match (start.is_empty(), end.is_empty()) {
            (true, true) => return None,
            (true, false) => {
                let length = parse_position(end)?;
                if length == 0 {
                    return None;
                }
                RangeBounds::Suffix { length }
            }
            (false, true) => RangeBounds::From {
                start: parse_position(start)?,
            },
            (false, false) => {
                let start = parse_position(start)?;
                let end = parse_position(end)?;
                if end < start {
                    return None;
                }
                RangeBounds::Closed { start, end }
            }
        };

        Some(Self {
            raw: header.to_string(),
            bounds,
        })
    }

    pub fn bounds(&self) -> RangeBounds {
        self.bounds
    }

    /// Header value exactly as the client sent it.
    pub fn header_value(&self) -> &str {
        &self.raw
    }

    pub fn starts_at_zero(&self) -> bool {
        matches!(
            self.bounds,
            RangeBounds::Closed { start: 0, .. } | RangeBounds::From { start: 0 }
        )
    }
}

impl Display for ByteRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self.bounds {
            RangeBounds::Closed { start, end } => write!(f, "bytes={}-{}", start, end),
            RangeBounds::From { start } => write!(f, "bytes={}-", start),
            RangeBounds::Suffix { length } => write!(f, "bytes=-{}", length),
        }
    }
}

fn parse_position(s: &str) -> Option<u64> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}
