//! Markdown rendering
//!
//! Entry fields are escaped so that journal text is shown as typed, never
//! read as Markdown structure or HTML.

use super::DocumentRenderer;
use crate::domain::Entry;
use crate::error::Result;

/// Renders entries as a Markdown document; output depends only on the entries
#[derive(Debug, Default, Clone, Copy)]
pub struct MarkdownRenderer;

impl MarkdownRenderer {
    pub fn render_string(&self, owner: &str, entries: &[Entry]) -> String {
        let mut md = format!("# Journal for {}\n\n", owner);

        for entry in entries {
            md.push_str(&format!("## {}\n\n", escape_line(&entry.title)));
            md.push_str(&format!("**Date**: {}  \n", entry.display_date()));
            if entry.mood.is_empty() {
                md.push_str(&format!("**Mood**: {}\n\n", entry.rating));
            } else {
                md.push_str(&format!(
                    "**Mood**: {} ({})\n\n",
                    escape_line(&entry.mood),
                    entry.rating
                ));
            }
            md.push_str(&format!("{}\n\n", escape(&entry.body)));

            if !entry.tags.is_empty() {
                let tags: Vec<String> = entry.tags.iter().map(|t| escape_line(t)).collect();
                md.push_str(&format!("**Tags**: {}\n\n", tags.join(", ")));
            }

            if !entry.completed_tasks.is_empty() {
                md.push_str("**Completed Tasks**:\n\n");
                for task in &entry.completed_tasks {
                    md.push_str(&format!("- {}\n", escape_line(task)));
                }
                md.push('\n');
            }

            md.push_str("---\n\n");
        }

        md
    }
}

/// Escape multi-line text, keeping its line breaks
fn escape(text: &str) -> String {
    text.lines().map(escape_line).collect::<Vec<_>>().join("\n")
}

/// Escape one line. Leading indentation is dropped so it cannot start a code block.
fn escape_line(line: &str) -> String {
    let line = line.trim();
    let mut out = String::with_capacity(line.len() + 8);

    // digits then '.' or ')' would start an ordered list
    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    let list_marker = digits > 0 && matches!(line[digits..].chars().next(), Some('.' | ')'));

    for (i, c) in line.char_indices() {
        let at_start = i == 0 && matches!(c, '#' | '-' | '+' | '=' | '~' | '|');
        if at_start || (list_marker && i == digits) || is_inline_special(c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn is_inline_special(c: char) -> bool {
    matches!(c, '\\' | '`' | '*' | '_' | '[' | ']' | '<' | '>' | '&' | '!')
}

impl DocumentRenderer for MarkdownRenderer {
    fn extension(&self) -> &'static str {
        "md"
    }

    fn render(&self, owner: &str, entries: &[Entry]) -> Result<Vec<u8>> {
        Ok(self.render_string(owner, entries).into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EntryDraft;
    use chrono::{TimeZone, Utc};

    fn sample() -> Vec<Entry> {
        let created = Utc.with_ymd_and_hms(2025, 1, 17, 9, 30, 0).unwrap();
        vec![Entry::from_draft(
            EntryDraft::new("Felt great today", 8)
                .with_title("Friday")
                .with_mood("happy")
                .with_tags(["work", "gym"])
                .with_tasks(["ship release"])
                .with_forgettable("the traffic"),
            created,
        )
        .unwrap()]
    }

    #[test]
    fn test_layout() {
        let md = MarkdownRenderer.render_string("alice", &sample());

        assert!(md.starts_with("# Journal for alice\n\n## Friday\n\n"));
        assert!(md.contains("**Mood**: happy (8/10)"));
        assert!(md.contains("\nFelt great today\n"));
        assert!(md.contains("**Tags**: work, gym"));
        assert!(md.contains("**Completed Tasks**:\n\n- ship release\n"));
        assert!(md.ends_with("---\n\n"));
        assert!(!md.contains("traffic"));
    }

    #[test]
    fn test_user_text_is_escaped() {
        let created = Utc.with_ymd_and_hms(2025, 1, 17, 9, 30, 0).unwrap();
        let entry = Entry::from_draft(
            EntryDraft::new("<b>x</b> and *y*\n---\n1. not a list\n    #not-a-heading", 5)
                .with_title("# big")
                .with_tasks(["[link](x)"]),
            created,
        )
        .unwrap();
        let md = MarkdownRenderer.render_string("alice", &[entry]);

        assert!(md.contains("## \\# big\n"));
        assert!(md.contains("\\<b\\>x\\</b\\> and \\*y\\*\n\\---\n1\\. not a list\n\\#not-a-heading\n"));
        assert!(md.contains("- \\[link\\](x)\n"));
    }

    #[test]
    fn test_escape_line_leaves_plain_text_alone() {
        assert_eq!(escape_line("Long run #fitness, 5 km"), "Long run #fitness, 5 km");
        assert_eq!(escape_line("2025) recap"), "2025\\) recap");
        assert_eq!(escape_line("a\\b"), "a\\\\b");
    }

    #[test]
    fn test_empty_journal() {
        let md = MarkdownRenderer.render_string("bob", &[]);
        assert_eq!(md, "# Journal for bob\n\n");
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let entries = sample();
        let first = MarkdownRenderer.render("alice", &entries).unwrap();
        let second = MarkdownRenderer.render("alice", &entries).unwrap();
        assert_eq!(first, second);
    }
}
