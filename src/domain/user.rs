//! Usernames

use crate::error::{JournalError, Result};
use std::fmt;
use std::str::FromStr;

const MAX_LEN: usize = 32;

/// A validated username; safe to embed in a file name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Username {
    type Err = JournalError;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim();
        let valid = !name.is_empty()
            && name.len() <= MAX_LEN
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

        if valid {
            Ok(Username(name.to_string()))
        } else {
            Err(JournalError::InvalidUsername(s.to_string()))
        }
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_usernames() {
        assert_eq!("alice".parse::<Username>().unwrap().as_str(), "alice");
        assert_eq!(" bob_2 ".parse::<Username>().unwrap().as_str(), "bob_2");
        assert!("a-b".parse::<Username>().is_ok());
    }

    #[test]
    fn test_invalid_usernames() {
        assert!("".parse::<Username>().is_err());
        assert!("../etc".parse::<Username>().is_err());
        assert!("with space".parse::<Username>().is_err());
        assert!("a".repeat(33).parse::<Username>().is_err());
    }
}
