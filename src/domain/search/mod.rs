//! Entry search

pub mod tag_query;

pub use tag_query::TagQuery;

use crate::domain::entry::Entry;
use crate::error::{JournalError, Result};
use chrono::NaiveDate;

/// Ways to filter a collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchQuery {
    /// Case-insensitive substring of the mood label
    Mood(String),
    /// Inclusive range over the local creation date
    DateRange { from: NaiveDate, to: NaiveDate },
    /// Boolean tag expression
    Tags(TagQuery),
    /// Case-insensitive substring of title or body
    Text(String),
}

impl SearchQuery {
    pub fn mood(needle: &str) -> Self {
        SearchQuery::Mood(needle.trim().to_lowercase())
    }

    pub fn text(needle: &str) -> Self {
        SearchQuery::Text(needle.trim().to_lowercase())
    }

    pub fn tags(query: &str) -> Result<Self> {
        TagQuery::parse(query).map(SearchQuery::Tags)
    }

    /// Build a date range from two `YYYY-MM-DD` strings
    pub fn date_range(from: &str, to: &str) -> Result<Self> {
        let from = parse_date(from)?;
        let to = parse_date(to)?;
        if from > to {
            return Err(JournalError::InvalidQuery(format!(
                "start date {} is after end date {}",
                from, to
            )));
        }
        Ok(SearchQuery::DateRange { from, to })
    }

    pub fn matches(&self, entry: &Entry) -> bool {
        match self {
            SearchQuery::Mood(needle) => entry.mood.to_lowercase().contains(needle.as_str()),
            SearchQuery::DateRange { from, to } => {
                let date = entry.local_date();
                *from <= date && date <= *to
            }
            SearchQuery::Tags(query) => query.matches(&entry.tags),
            SearchQuery::Text(needle) => {
                entry.title.to_lowercase().contains(needle.as_str())
                    || entry.body.to_lowercase().contains(needle.as_str())
            }
        }
    }
}

/// Parse a `YYYY-MM-DD` date
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|_| JournalError::InvalidDate(input.trim().to_string()))
}
