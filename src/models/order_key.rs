//! Directory-name codec: `"<key> <label>"`.
//!
//! Only the first space delimits; the label keeps any spaces it has.

use compact_str::{format_compact, CompactString};
use std::fmt;

/// Prefix of the hidden names entries take while a rename plan is in flight.
pub const SCRATCH_PREFIX: &str = ".scratch-";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OrderKey {
    pub key: usize,
    pub label: CompactString,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed line name: {0:?}")]
pub struct MalformedName(pub String);

impl OrderKey {
    pub fn new(key: usize, label: impl Into<CompactString>) -> Self {
        Self {
            key,
            label: label.into(),
        }
    }

    pub fn parse(name: &str) -> Result<Self, MalformedName> {
        let malformed = || MalformedName(name.to_string());

        let (digits, label) = name.split_once(' ').ok_or_else(malformed)?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }
        // Rejects key 0 too; other leading zeros would not survive a format round trip.
        if digits.starts_with('0') {
            return Err(malformed());
        }
        let key: usize = digits.parse().map_err(|_| malformed())?;

        Ok(Self::new(key, label))
    }

    pub fn format(&self) -> CompactString {
        format(self.key, &self.label)
    }

    pub fn with_key(&self, key: usize) -> Self {
        Self::new(key, self.label.clone())
    }

    /// Hidden detour name derived from the entry's current key.
    pub fn scratch_name(&self) -> CompactString {
        format_compact!("{}{}", SCRATCH_PREFIX, self.format())
    }
}

impl fmt::Display for OrderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.key, self.label)
    }
}

pub fn format(key: usize, label: &str) -> CompactString {
    format_compact!("{} {}", key, label)
}

pub fn is_scratch_name(name: &str) -> bool {
    name.starts_with(SCRATCH_PREFIX)
}

/// Labels become path components, so separators and NUL are rejected.
pub fn validate_label(label: &str) -> bool {
    !label.is_empty() && !label.contains(['/', '\\', '\0'])
}

#[cfg(test)]
#[path = "../../tests/unit/models/order_key.rs"]
mod tests;
