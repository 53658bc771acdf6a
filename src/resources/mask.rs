//! Mask classification and matching.
//!
//! # Responsibilities
//! - Classify a mask string once, when the map is registered
//! - Match a normalized request path against each mask kind
//!
//! # Design Decisions
//! - A mask is tried as every kind whose marker it carries, in the order
//!   regex (`#...#`), wildcard (`*`), segment (`:`); the first hit wins and
//!   its kind is the one reported
//! - Regex masks use a backtracking engine so look-around and
//!   backreferences work; the interior is tested unanchored
//! - Wildcard masks are anchored at the start only (`/assets/*` acts as a prefix)
//! - Segment masks require the same segment count as the path
//! - A mask with no marker only ever matches the identical path

use std::fmt;

use regex::Regex;
use serde::Serialize;
use thiserror::Error;

use crate::resources::request::RequestPath;

/// Delimiter wrapping a regex mask, e.g. `#\.html$#`.
pub const REGEX_DELIMITER: char = '#';

/// Errors raised while compiling a mask.
#[derive(Debug, Error)]
pub enum MaskError {
    /// Delimiter-wrapped mask whose interior is not a valid regex.
    #[error("invalid regex mask `{mask}`: {source}")]
    InvalidPattern {
        mask: String,
        #[source]
        source: fancy_regex::Error,
    },

    /// Wildcard mask whose escaped form could not be compiled.
    #[error("invalid wildcard mask `{mask}`: {source}")]
    InvalidWildcard {
        mask: String,
        #[source]
        source: regex::Error,
    },
}

/// Trait for matching a request path against a compiled mask.
pub trait Matcher: Send + Sync + fmt::Debug {
    /// Returns true if the path matches this mask.
    fn matches(&self, path: &RequestPath) -> bool;
}

/// Matches one path literally.
#[derive(Debug, Clone)]
pub struct ExactMatcher {
    expected: String,
}

impl ExactMatcher {
    /// Match `expected` and nothing else.
    pub fn new(expected: impl Into<String>) -> Self {
        Self {
            expected: expected.into(),
        }
    }
}

impl Matcher for ExactMatcher {
    fn matches(&self, path: &RequestPath) -> bool {
        path.as_str() == self.expected
    }
}

/// Matches a user-supplied regular expression anywhere in the path.
#[derive(Debug, Clone)]
pub struct RegexMatcher {
    pattern: fancy_regex::Regex,
}

impl RegexMatcher {
    /// Compile the interior of a `#...#` mask.
    pub fn new(pattern: &str) -> Result<Self, fancy_regex::Error> {
        Ok(Self {
            pattern: fancy_regex::Regex::new(pattern)?,
        })
    }
}

impl Matcher for RegexMatcher {
    fn matches(&self, path: &RequestPath) -> bool {
        match self.pattern.is_match(path.as_str()) {
            Ok(matched) => matched,
            Err(e) => {
                tracing::warn!(
                    pattern = %self.pattern.as_str(),
                    path = %path,
                    error = %e,
                    "regex mask evaluation failed, treating as no match"
                );
                false
            }
        }
    }
}

/// Matches `*` holes, anchored at the start of the path.
#[derive(Debug, Clone)]
pub struct WildcardMatcher {
    pattern: Regex,
}

impl WildcardMatcher {
    /// Everything but `*` is matched literally.
    pub fn new(mask: &str) -> Result<Self, regex::Error> {
        let body = regex::escape(mask).replace(r"\*", "(.*)");

        Ok(Self {
            pattern: Regex::new(&format!("^{body}"))?,
        })
    }
}

impl Matcher for WildcardMatcher {
    fn matches(&self, path: &RequestPath) -> bool {
        self.pattern.is_match(path.as_str())
    }
}

/// One `/`-delimited part of a segment mask.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentPart {
    /// Must equal the path segment.
    Literal(String),
    /// `:name`, matches any single segment.
    Named(String),
}

/// Compares `/`-delimited parts positionally.
#[derive(Debug, Clone)]
pub struct SegmentMatcher {
    parts: Vec<SegmentPart>,
}

impl SegmentMatcher {
    /// Everything before the first `/` is discarded, like the leading empty
    /// segment of an absolute mask.
    pub fn new(mask: &str) -> Self {
        let parts = mask
            .split('/')
            .skip(1)
            .map(|part| match part.strip_prefix(':') {
                Some(name) => SegmentPart::Named(name.to_string()),
                None => SegmentPart::Literal(part.to_string()),
            })
            .collect();

        Self { parts }
    }

    /// The parsed parts, in path order.
    pub fn parts(&self) -> &[SegmentPart] {
        &self.parts
    }
}

impl Matcher for SegmentMatcher {
    fn matches(&self, path: &RequestPath) -> bool {
        if path.segment_count() != self.parts.len() {
            return false;
        }

        self.parts
            .iter()
            .zip(path.segments())
            .all(|(part, segment)| match part {
                SegmentPart::Named(_) => true,
                SegmentPart::Literal(literal) => literal == segment,
            })
    }
}

/// The kind a mask was classified as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MaskKind {
    Exact,
    Regex,
    Wildcard,
    Segment,
}

impl MaskKind {
    /// Lowercase name, as used in logs and listings.
    pub fn as_str(&self) -> &'static str {
        match self {
            MaskKind::Exact => "exact",
            MaskKind::Regex => "regex",
            MaskKind::Wildcard => "wildcard",
            MaskKind::Segment => "segment",
        }
    }
}

impl fmt::Display for MaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
enum MaskPattern {
    Exact(ExactMatcher),
    Regex(RegexMatcher),
    Wildcard(WildcardMatcher),
    Segment(SegmentMatcher),
}

impl MaskPattern {
    fn kind(&self) -> MaskKind {
        match self {
            MaskPattern::Exact(_) => MaskKind::Exact,
            MaskPattern::Regex(_) => MaskKind::Regex,
            MaskPattern::Wildcard(_) => MaskKind::Wildcard,
            MaskPattern::Segment(_) => MaskKind::Segment,
        }
    }
}

impl Matcher for MaskPattern {
    fn matches(&self, path: &RequestPath) -> bool {
        match self {
            MaskPattern::Exact(m) => m.matches(path),
            MaskPattern::Regex(m) => m.matches(path),
            MaskPattern::Wildcard(m) => m.matches(path),
            MaskPattern::Segment(m) => m.matches(path),
        }
    }
}

/// A classified, compiled mask.
#[derive(Debug, Clone)]
pub struct Mask {
    source: String,
    /// Never empty; tried in order.
    patterns: Vec<MaskPattern>,
}

impl Mask {
    /// Classify and compile a mask string.
    pub fn parse(source: &str) -> Result<Self, MaskError> {
        let mut patterns = Vec::new();

        if let Some(interior) = regex_interior(source) {
            let matcher = RegexMatcher::new(interior).map_err(|e| MaskError::InvalidPattern {
                mask: source.to_string(),
                source: e,
            })?;
            patterns.push(MaskPattern::Regex(matcher));
        }
        if source.contains('*') {
            let matcher = WildcardMatcher::new(source).map_err(|e| MaskError::InvalidWildcard {
                mask: source.to_string(),
                source: e,
            })?;
            patterns.push(MaskPattern::Wildcard(matcher));
        }
        if source.contains(':') {
            patterns.push(MaskPattern::Segment(SegmentMatcher::new(source)));
        }
        if patterns.is_empty() {
            patterns.push(MaskPattern::Exact(ExactMatcher::new(source)));
        }

        Ok(Self {
            source: source.to_string(),
            patterns,
        })
    }

    /// The mask as configured.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The first kind the mask is tried as.
    pub fn kind(&self) -> MaskKind {
        self.patterns
            .first()
            .map_or(MaskKind::Exact, MaskPattern::kind)
    }

    /// Every kind the mask is tried as, in order.
    pub fn kinds(&self) -> Vec<MaskKind> {
        self.patterns.iter().map(MaskPattern::kind).collect()
    }
}

impl Matcher for Mask {
    fn matches(&self, path: &RequestPath) -> bool {
        self.patterns.iter().any(|pattern| pattern.matches(path))
    }
}

fn regex_interior(source: &str) -> Option<&str> {
    source
        .strip_prefix(REGEX_DELIMITER)
        .and_then(|rest| rest.strip_suffix(REGEX_DELIMITER))
}
