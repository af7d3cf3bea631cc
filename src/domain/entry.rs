//! Journal entries and mood ratings

use crate::error::{JournalError, Result};
use chrono::{DateTime, Local, NaiveDate, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Mood rating on a 1-10 scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct MoodRating(u8);

impl MoodRating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;

    /// Create a rating, rejecting anything outside 1..=10
    pub fn new(value: i64) -> Result<Self> {
        if (Self::MIN as i64..=Self::MAX as i64).contains(&value) {
            Ok(MoodRating(value as u8))
        } else {
            Err(JournalError::InvalidMoodRating(value))
        }
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    /// Short encouragement for low and high ratings
    pub fn feedback(&self) -> Option<&'static str> {
        match self.0 {
            1..=3 => Some("You seem down. Remember: this too shall pass!"),
            8..=10 => Some("Great mood! Keep the positivity going!"),
            _ => None,
        }
    }
}

impl TryFrom<u8> for MoodRating {
    type Error = JournalError;

    fn try_from(value: u8) -> Result<Self> {
        MoodRating::new(value as i64)
    }
}

impl From<MoodRating> for u8 {
    fn from(rating: MoodRating) -> u8 {
        rating.0
    }
}

impl fmt::Display for MoodRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.0, Self::MAX)
    }
}

/// A single journal record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    created: DateTime<Utc>,
    pub title: String,
    pub body: String,
    pub mood: String,
    pub rating: MoodRating,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub completed_tasks: Vec<String>,
    #[serde(default)]
    pub forgettable: Option<String>,
}

impl Entry {
    /// Build an entry from a draft, stamping the given creation time
    pub fn from_draft(draft: EntryDraft, created: DateTime<Utc>) -> Result<Self> {
        let draft = draft.validated()?;
        let rating = MoodRating::new(draft.rating)?;

        Ok(Entry {
            created,
            title: draft.title,
            body: draft.body,
            mood: draft.mood,
            rating,
            tags: draft.tags,
            completed_tasks: draft.completed_tasks,
            forgettable: draft.forgettable,
        })
    }

    /// Creation timestamp (never changes after capture)
    pub fn created(&self) -> DateTime<Utc> {
        self.created
    }

    /// Creation date in the local timezone
    pub fn local_date(&self) -> NaiveDate {
        self.created.with_timezone(&Local).date_naive()
    }

    /// Creation time formatted for display
    pub fn display_date(&self) -> String {
        self.created
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string()
    }

    /// Replace every field except the creation timestamp
    pub fn apply(&mut self, draft: EntryDraft) -> Result<()> {
        let replacement = Entry::from_draft(draft, self.created)?;
        *self = replacement;
        Ok(())
    }

    /// Turn this entry back into a draft, e.g. to prefill an edit form
    pub fn to_draft(&self) -> EntryDraft {
        EntryDraft {
            title: self.title.clone(),
            body: self.body.clone(),
            mood: self.mood.clone(),
            rating: self.rating.value() as i64,
            tags: self.tags.clone(),
            completed_tasks: self.completed_tasks.clone(),
            forgettable: self.forgettable.clone(),
        }
    }

    /// First `max_chars` characters of the body, with an ellipsis when cut
    pub fn preview(&self, max_chars: usize) -> String {
        if self.body.chars().count() > max_chars {
            let cut: String = self.body.chars().take(max_chars).collect();
            format!("{}...", cut)
        } else {
            self.body.clone()
        }
    }
}

/// User-supplied fields of an entry, before validation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryDraft {
    pub title: String,
    pub body: String,
    pub mood: String,
    pub rating: i64,
    pub tags: Vec<String>,
    pub completed_tasks: Vec<String>,
    pub forgettable: Option<String>,
}

impl EntryDraft {
    pub fn new(body: impl Into<String>, rating: i64) -> Self {
        EntryDraft {
            body: body.into(),
            rating,
            ..Default::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_mood(mut self, mood: impl Into<String>) -> Self {
        self.mood = mood.into();
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.tags = tags.into_iter().map(|t| t.as_ref().to_string()).collect();
        self
    }

    pub fn with_tasks<I, S>(mut self, tasks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.completed_tasks = tasks.into_iter().map(|t| t.as_ref().to_string()).collect();
        self
    }

    pub fn with_forgettable(mut self, thing: impl Into<String>) -> Self {
        self.forgettable = Some(thing.into());
        self
    }

    /// Add the body's `#hashtags` to the tag list
    pub fn with_inline_hashtags(mut self) -> Self {
        let inline = extract_hashtags(&self.body);
        self.tags.extend(inline);
        self
    }

    /// Trim fields, normalize tags and tasks, reject an empty body
    fn validated(mut self) -> Result<Self> {
        self.body = self.body.trim().to_string();
        if self.body.is_empty() {
            return Err(JournalError::InvalidEntry(
                "entry text cannot be empty".to_string(),
            ));
        }
        MoodRating::new(self.rating)?;

        self.title = self.title.trim().to_string();
        if self.title.is_empty() {
            self.title = "Untitled".to_string();
        }
        self.mood = self.mood.trim().to_string();
        self.tags = normalize_tags(&self.tags);
        self.completed_tasks = self
            .completed_tasks
            .iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();
        self.forgettable = self
            .forgettable
            .map(|f| f.trim().to_string())
            .filter(|f| !f.is_empty());

        Ok(self)
    }
}

/// Regex for matching hashtags: #word, #word-with-dashes, #word_with_underscores
fn tag_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"#([a-zA-Z0-9_-]+)").unwrap())
}

/// Extract inline hashtags from free text (normalized to lowercase)
pub fn extract_hashtags(text: &str) -> Vec<String> {
    tag_regex()
        .captures_iter(text)
        .map(|cap| cap[1].to_lowercase())
        .collect()
}

/// Normalize a tag list: trim, drop leading '#', collapse inner whitespace,
/// lowercase, drop empties and duplicates
pub fn normalize_tags<S: AsRef<str>>(tags: &[S]) -> Vec<String> {
    let mut unique = Vec::new();
    for tag in tags {
        let tag = tag.as_ref().trim();
        let tag = tag.strip_prefix('#').unwrap_or(tag);
        let tag = tag.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase();
        if !tag.is_empty() && !unique.contains(&tag) {
            unique.push(tag);
        }
    }
    unique
}

/// Split comma-separated user input into trimmed, non-empty items
pub fn split_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
