//! Per-form list of previously entered items.
//!
//! Backs the "remembered foods/drinks" picker on the entry forms. Values stay
//! in memory for the life of the form and are never submitted.
//!
//! Rust callers only: the C ABI does not expose this type, and mobile hosts
//! keep their own form state.

/// Insertion-ordered list of remembered entries. Duplicates are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RememberedValues {
    values: Vec<String>,
}

impl RememberedValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `value` unless it is empty. Returns whether it was stored.
    pub fn remember(&mut self, value: impl Into<String>) -> bool {
        let value = value.into();
        if value.is_empty() {
            return false;
        }
        self.values.push(value);
        true
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
