//! Domain layer - Journal entries, collections and search

pub mod collection;
pub mod entry;
pub mod search;
pub mod user;

pub use collection::EntryCollection;
pub use entry::{Entry, EntryDraft, MoodRating};
pub use search::SearchQuery;
pub use user::Username;
