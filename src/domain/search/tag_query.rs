//! Boolean tag queries
//!
//! Supports AND, OR and NOT with precedence NOT > AND > OR. Words between
//! operators form one tag, so `self care AND NOT work` looks for the tag
//! `self care`.
//!
//! ```
//! use moodlog::domain::search::TagQuery;
//!
//! let query = TagQuery::parse("work AND NOT meeting").unwrap();
//! assert!(query.matches(&["work".to_string(), "focus".to_string()]));
//! assert!(!query.matches(&["work".to_string(), "meeting".to_string()]));
//! ```

use crate::domain::entry::normalize_tags;
use crate::error::{JournalError, Result};
use std::collections::HashSet;

/// Tag query abstract syntax tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagQuery {
    Single(String),
    And(Box<TagQuery>, Box<TagQuery>),
    Or(Box<TagQuery>, Box<TagQuery>),
    Not(Box<TagQuery>),
}

impl TagQuery {
    /// Parse a query such as `work`, `#work OR family` or `work AND NOT sick`
    pub fn parse(query: &str) -> Result<Self> {
        let tokens = tokenize(query)?;
        let mut pos = 0;
        let result = parse_or(&tokens, &mut pos)?;

        if pos != tokens.len() {
            return Err(JournalError::InvalidQuery(format!(
                "unexpected '{}' after a complete query",
                tokens[pos]
            )));
        }

        Ok(result)
    }

    /// Evaluate against an entry's tags (tags are stored lowercase)
    pub fn matches(&self, tags: &[String]) -> bool {
        let tag_set: HashSet<&str> = tags.iter().map(|s| s.as_str()).collect();
        self.matches_set(&tag_set)
    }

    fn matches_set(&self, tags: &HashSet<&str>) -> bool {
        match self {
            TagQuery::Single(tag) => tags.contains(tag.as_str()),
            TagQuery::And(left, right) => left.matches_set(tags) && right.matches_set(tags),
            TagQuery::Or(left, right) => left.matches_set(tags) || right.matches_set(tags),
            TagQuery::Not(inner) => !inner.matches_set(tags),
        }
    }
}

impl std::fmt::Display for TagQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TagQuery::Single(tag) => write!(f, "#{}", tag),
            TagQuery::And(left, right) => write!(f, "{} AND {}", left, right),
            TagQuery::Or(left, right) => write!(f, "{} OR {}", left, right),
            TagQuery::Not(inner) => write!(f, "NOT {}", inner),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Tag(String),
    And,
    Or,
    Not,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Tag(tag) => write!(f, "{}", tag),
            Token::And => f.write_str("AND"),
            Token::Or => f.write_str("OR"),
            Token::Not => f.write_str("NOT"),
        }
    }
}

fn tokenize(query: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut words: Vec<&str> = Vec::new();

    for word in query.split_whitespace() {
        let operator = match word.to_uppercase().as_str() {
            "AND" => Token::And,
            "OR" => Token::Or,
            "NOT" => Token::Not,
            _ => {
                words.push(word);
                continue;
            }
        };
        push_tag(&mut tokens, &mut words)?;
        tokens.push(operator);
    }
    push_tag(&mut tokens, &mut words)?;

    if tokens.is_empty() {
        return Err(JournalError::InvalidQuery("empty query".to_string()));
    }

    Ok(tokens)
}

/// Join pending words into one tag, normalized the way stored tags are
fn push_tag(tokens: &mut Vec<Token>, words: &mut Vec<&str>) -> Result<()> {
    if words.is_empty() {
        return Ok(());
    }
    let joined = words.join(" ");
    words.clear();

    let tag = normalize_tags(&[joined.as_str()]).pop().unwrap_or_default();
    if tag.is_empty() {
        return Err(JournalError::InvalidQuery(format!("invalid tag '{}'", joined)));
    }
    tokens.push(Token::Tag(tag));
    Ok(())
}

fn parse_or(tokens: &[Token], pos: &mut usize) -> Result<TagQuery> {
    let mut left = parse_and(tokens, pos)?;

    while *pos < tokens.len() && tokens[*pos] == Token::Or {
        *pos += 1;
        let right = parse_and(tokens, pos)?;
        left = TagQuery::Or(Box::new(left), Box::new(right));
    }

    Ok(left)
}

fn parse_and(tokens: &[Token], pos: &mut usize) -> Result<TagQuery> {
    let mut left = parse_not(tokens, pos)?;

    while *pos < tokens.len() && tokens[*pos] == Token::And {
        *pos += 1;
        let right = parse_not(tokens, pos)?;
        left = TagQuery::And(Box::new(left), Box::new(right));
    }

    Ok(left)
}

// NOT is right-associative
fn parse_not(tokens: &[Token], pos: &mut usize) -> Result<TagQuery> {
    match tokens.get(*pos) {
        Some(Token::Not) => {
            *pos += 1;
            let inner = parse_not(tokens, pos)?;
            Ok(TagQuery::Not(Box::new(inner)))
        }
        Some(Token::Tag(tag)) => {
            *pos += 1;
            Ok(TagQuery::Single(tag.clone()))
        }
        Some(other) => Err(JournalError::InvalidQuery(format!(
            "expected a tag, found '{}'",
            other
        ))),
        None => Err(JournalError::InvalidQuery(
            "query ends after an operator".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_single_tag_strips_hash_and_lowercases() {
        assert_eq!(
            TagQuery::parse("#Work").unwrap(),
            TagQuery::Single("work".to_string())
        );
    }

    #[test]
    fn test_precedence_and_binds_tighter_than_or() {
        let query = TagQuery::parse("work and urgent or personal").unwrap();
        assert_eq!(query.to_string(), "#work AND #urgent OR #personal");
        assert!(query.matches(&tags(&["personal"])));
        assert!(query.matches(&tags(&["work", "urgent"])));
        assert!(!query.matches(&tags(&["work"])));
    }

    #[test]
    fn test_not() {
        let query = TagQuery::parse("work AND NOT meeting").unwrap();
        assert!(query.matches(&tags(&["work"])));
        assert!(!query.matches(&tags(&["work", "meeting"])));

        let double = TagQuery::parse("NOT NOT gym").unwrap();
        assert!(double.matches(&tags(&["gym"])));
    }

    #[test]
    fn test_invalid_queries() {
        assert!(TagQuery::parse("").is_err());
        assert!(TagQuery::parse("   ").is_err());
        assert!(TagQuery::parse("work AND").is_err());
        assert!(TagQuery::parse("OR work").is_err());
        assert!(TagQuery::parse("#").is_err());
        assert!(TagQuery::parse("work NOT gym").is_err());
    }

    #[test]
    fn test_multi_word_and_symbol_tags() {
        assert_eq!(
            TagQuery::parse("Self  Care").unwrap(),
            TagQuery::Single("self care".to_string())
        );

        let query = TagQuery::parse("self care AND NOT c++").unwrap();
        assert!(query.matches(&tags(&["self care"])));
        assert!(!query.matches(&tags(&["self care", "c++"])));
        assert!(TagQuery::parse("me@home").unwrap().matches(&tags(&["me@home"])));
    }

    #[test]
    fn test_display_parses_back() {
        for input in ["work", "a OR b AND NOT c", "NOT x OR y OR z AND w", "self care OR NOT gym"] {
            let query = TagQuery::parse(input).unwrap();
            assert_eq!(TagQuery::parse(&query.to_string()).unwrap(), query);
        }
    }
}
