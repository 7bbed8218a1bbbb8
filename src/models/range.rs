//! Position expressions: bare line numbers and `(lower,upper)` ranges.

use crate::error::{Result, StoreError};

/// Inclusive, 1-based span of order keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct LineRange {
    pub lower: usize,
    pub upper: usize,
}

impl LineRange {
    pub fn new(lower: usize, upper: usize) -> Self {
        Self { lower, upper }
    }

    pub fn point(line: usize) -> Self {
        Self::new(line, line)
    }

    pub fn width(&self) -> usize {
        self.upper + 1 - self.lower
    }

    pub fn contains(&self, key: usize) -> bool {
        (self.lower..=self.upper).contains(&key)
    }

    pub fn is_point(&self) -> bool {
        self.lower == self.upper
    }

    /// Requires `1 <= lower <= upper <= count`.
    pub fn validate(self, count: usize) -> Result<Self> {
        if self.lower == 0 || self.lower > self.upper || self.upper > count {
            return Err(StoreError::InvalidRange {
                lower: self.lower,
                upper: self.upper,
                count,
            });
        }
        Ok(self)
    }

    /// Parses `"(" [lower] "," [upper] ")"`; `lower` defaults to 1 and
    /// `upper` to `count`.
    pub fn parse(text: &str, count: usize) -> Result<Self> {
        let malformed = || StoreError::MalformedRange(text.to_string());

        let inner = text
            .trim()
            .strip_prefix('(')
            .and_then(|s| s.strip_suffix(')'))
            .ok_or_else(malformed)?;
        let (lower, upper) = inner.split_once(',').ok_or_else(malformed)?;

        let lower = parse_bound(lower, 1).ok_or_else(malformed)?;
        let upper = parse_bound(upper, count).ok_or_else(malformed)?;

        Self::new(lower, upper).validate(count)
    }
}

fn parse_bound(text: &str, default: usize) -> Option<usize> {
    let text = text.trim();
    if text.is_empty() {
        return Some(default);
    }
    if !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

/// What a command points at: a single line or a validated range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Line(usize),
    Range(LineRange),
}

impl Target {
    /// A bare integer is a point reference and is not bounds-checked here;
    /// its valid span depends on the command (insert accepts `count + 1`).
    pub fn parse(text: &str, count: usize) -> Result<Self> {
        let text = text.trim();
        if text.starts_with('(') {
            return LineRange::parse(text, count).map(Target::Range);
        }
        if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
            return Err(StoreError::MalformedRange(text.to_string()));
        }
        text.parse()
            .map(Target::Line)
            .map_err(|_| StoreError::MalformedRange(text.to_string()))
    }

    pub fn into_range(self) -> LineRange {
        match self {
            Target::Line(line) => LineRange::point(line),
            Target::Range(range) => range,
        }
    }
}

impl From<LineRange> for Target {
    fn from(range: LineRange) -> Self {
        Target::Range(range)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/models/range.rs"]
mod tests;
