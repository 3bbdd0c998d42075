//! Wildcard key patterns
//!
//! The selection grammar has one metacharacter: `*`. Everything else is
//! literal. Parsing classifies a pattern once; matching is then a plain
//! string operation per key.
//!
//! ## Grammar
//!
//! | Pattern shape | Semantics |
//! |----------------------------|----------------------------------|
//! | no `*` | exact equality |
//! | one `*`, trailing | prefix match |
//! | one `*`, leading | suffix match |
//! | two `*`, leading + trailing| substring match |
//! | anything else | multi-segment match (see below) |
//!
//! Multi-segment: the pattern is split on `*` into ordered literal
//! segments. A non-empty first segment anchors the start of the key, a
//! non-empty last segment anchors the end, and every non-empty middle
//! segment must occur in order, non-overlapping, scanning strictly left
//! to right from the end of the previous match. Empty segments
//! (adjacent `*`s) are skipped. The asymmetry - edge segments anchored,
//! middle segments merely ordered-contained - is deliberate: it is what
//! makes `user_*_*` match `user_profile_name`.

/// A parsed wildcard pattern
///
/// Parse once with [`KeyPattern::parse`], then match any number of keys
/// with [`KeyPattern::matches`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPattern {
    raw: String,
    shape: Shape,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Shape {
    Exact(String),
    Prefix(String),
    Suffix(String),
    Substring(String),
    Segments(Vec<String>),
}

impl KeyPattern {
    /// Parse a pattern string
    ///
    /// Never fails: every string is a valid pattern. The empty pattern
    /// matches only the empty key; `"*"` matches every key.
    pub fn parse(pattern: &str) -> Self {
        let raw = pattern.to_string();
        let stars = pattern.matches('*').count();
        let shape = match stars {
            0 => Shape::Exact(raw.clone()),
            1 if pattern.ends_with('*') => {
                Shape::Prefix(pattern[..pattern.len() - 1].to_string())
            }
            1 if pattern.starts_with('*') => Shape::Suffix(pattern[1..].to_string()),
            2 if pattern.starts_with('*') && pattern.ends_with('*') => {
                Shape::Substring(pattern[1..pattern.len() - 1].to_string())
            }
            _ => Shape::Segments(pattern.split('*').map(str::to_string).collect()),
        };
        KeyPattern { raw, shape }
    }

    /// The pattern string this was parsed from
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Test a key against this pattern
    pub fn matches(&self, key: &str) -> bool {
        match &self.shape {
            Shape::Exact(literal) => key == literal,
            Shape::Prefix(prefix) => key.starts_with(prefix),
            Shape::Suffix(suffix) => key.ends_with(suffix),
            Shape::Substring(needle) => key.contains(needle),
            Shape::Segments(segments) => match_segments(key, segments),
        }
    }
}

/// General multi-segment match
///
/// `segments` always has at least two elements (any `*` splits the
/// pattern in two).
fn match_segments(key: &str, segments: &[String]) -> bool {
    let first = &segments[0];
    let last = &segments[segments.len() - 1];

    if !first.is_empty() && !key.starts_with(first.as_str()) {
        return false;
    }
    if !last.is_empty() && !key.ends_with(last.as_str()) {
        return false;
    }

    // Middle segments: ordered, non-overlapping, scanning from the end
    // of the previous match.
    let mut pos = first.len();
    for segment in &segments[1..segments.len() - 1] {
        if segment.is_empty() {
            continue;
        }
        match key[pos..].find(segment.as_str()) {
            Some(found) => pos += found + segment.len(),
            None => return false,
        }
    }
    true
}

/// One-shot convenience over [`KeyPattern::parse`] + [`KeyPattern::matches`]
pub fn matches(key: &str, pattern: &str) -> bool {
    KeyPattern::parse(pattern).matches(key)
}
