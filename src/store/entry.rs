use crate::models::order_key::{self, OrderKey};
use compact_str::CompactString;
use std::path::{Path, PathBuf};

/// One line of a container: a directory named `"<key> <label>"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub key: usize,
    pub label: CompactString,
    pub path: PathBuf,
}

impl Entry {
    pub fn from_order_key(container: &Path, key: OrderKey) -> Self {
        let path = container.join(key.format().as_str());
        Self {
            key: key.key,
            label: key.label,
            path,
        }
    }

    pub fn name(&self) -> CompactString {
        order_key::format(self.key, &self.label)
    }

    pub fn order_key(&self) -> OrderKey {
        OrderKey::new(self.key, self.label.clone())
    }
}

/// Summary shown by `info`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryInfo {
    pub key: usize,
    pub label: CompactString,
    pub children: usize,
}
