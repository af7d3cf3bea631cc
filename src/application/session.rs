//! Logged-in journal session

use crate::domain::{Entry, EntryCollection, EntryDraft, Username};
use crate::error::Result;
use crate::infrastructure::EntryStore;
use zeroize::Zeroizing;

/// Context for one logged-in user: the store, the credentials and the loaded collection.
///
/// Every mutation is saved before it becomes visible; if saving fails the
/// in-memory collection is left as it was.
pub struct JournalSession<S: EntryStore> {
    store: S,
    user: Username,
    password: Zeroizing<String>,
    collection: EntryCollection,
}

impl<S: EntryStore> JournalSession<S> {
    pub(crate) fn new(
        store: S,
        user: Username,
        password: Zeroizing<String>,
        collection: EntryCollection,
    ) -> Self {
        JournalSession {
            store,
            user,
            password,
            collection,
        }
    }

    pub fn user(&self) -> &Username {
        &self.user
    }

    pub fn collection(&self) -> &EntryCollection {
        &self.collection
    }

    pub fn entries(&self) -> &[Entry] {
        self.collection.entries()
    }

    /// Append an entry and persist; returns its zero-based index
    pub fn add(&mut self, entry: Entry) -> Result<usize> {
        let mut next = self.collection.clone();
        let index = next.push(entry);
        self.commit(next)?;
        Ok(index)
    }

    /// Replace the editable fields of an entry and persist.
    ///
    /// Inline `#hashtags` in the new body are added to the tags, as on capture.
    pub fn update(&mut self, index: usize, draft: EntryDraft) -> Result<&Entry> {
        let mut next = self.collection.clone();
        next.update(index, draft.with_inline_hashtags())?;
        self.commit(next)?;
        self.collection.get(index)
    }

    /// Delete an entry and persist
    pub fn delete(&mut self, index: usize) -> Result<Entry> {
        let mut next = self.collection.clone();
        let removed = next.remove(index)?;
        self.commit(next)?;
        Ok(removed)
    }

    fn commit(&mut self, next: EntryCollection) -> Result<()> {
        self.store.save(&self.user, &self.password, &next)?;
        self.collection = next;
        Ok(())
    }
}
