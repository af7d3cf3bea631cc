//! Entry collection: the unit of persistence

use crate::domain::entry::{Entry, EntryDraft};
use crate::domain::search::SearchQuery;
use crate::error::{JournalError, Result};
use serde::{Deserialize, Serialize};

/// Ordered sequence of entries; insertion order is preserved
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryCollection {
    entries: Vec<Entry>,
}

impl EntryCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Append an entry, returning its zero-based index
    pub fn push(&mut self, entry: Entry) -> usize {
        self.entries.push(entry);
        self.entries.len() - 1
    }

    pub fn get(&self, index: usize) -> Result<&Entry> {
        self.entries
            .get(index)
            .ok_or(JournalError::EntryNotFound(index + 1))
    }

    /// Edit the entry at `index` in place
    pub fn update(&mut self, index: usize, draft: EntryDraft) -> Result<&Entry> {
        let entry = self
            .entries
            .get_mut(index)
            .ok_or(JournalError::EntryNotFound(index + 1))?;
        entry.apply(draft)?;
        Ok(entry)
    }

    /// Remove and return the entry at `index`
    pub fn remove(&mut self, index: usize) -> Result<Entry> {
        if index >= self.entries.len() {
            return Err(JournalError::EntryNotFound(index + 1));
        }
        Ok(self.entries.remove(index))
    }

    /// Entries matching the query, with their indices, in collection order
    pub fn search<'a>(&'a self, query: &'a SearchQuery) -> impl Iterator<Item = (usize, &'a Entry)> + 'a {
        self.entries
            .iter()
            .enumerate()
            .filter(move |(_, entry)| query.matches(entry))
    }
}

impl FromIterator<Entry> for EntryCollection {
    fn from_iter<I: IntoIterator<Item = Entry>>(iter: I) -> Self {
        EntryCollection {
            entries: iter.into_iter().collect(),
        }
    }
}
