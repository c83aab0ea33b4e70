use crate::error::{Error, Result};

/// Hard upper bound on stored recent searches, whatever the configured limit.
pub const MAX_HISTORY_LEN: usize = 12;

/// Recent search terms, most recent first, capped at `limit` entries.
///
/// `limit` never exceeds `MAX_HISTORY_LEN`. Repeated terms are kept as
/// separate entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHistory {
    entries: Vec<String>,
    limit: usize,
}

impl SearchHistory {
    pub fn new(limit: usize) -> Self {
        Self {
            entries: Vec::new(),
            limit: limit.min(MAX_HISTORY_LEN),
        }
    }

    /// Restores persisted entries, dropping any beyond the limit.
    pub fn from_entries(mut entries: Vec<String>, limit: usize) -> Self {
        let limit = limit.min(MAX_HISTORY_LEN);
        entries.truncate(limit);
        Self { entries, limit }
    }

    pub fn push(&mut self, term: &str) {
        self.entries.insert(0, term.to_string());
        self.entries.truncate(self.limit);
    }

    pub fn remove(&mut self, index: usize) -> Result<String> {
        if index >= self.entries.len() {
            return Err(Error::InvalidHistoryIndex {
                index,
                len: self.entries.len(),
            });
        }
        Ok(self.entries.remove(index))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
