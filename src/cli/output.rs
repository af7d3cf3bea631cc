//! Output formatting utilities

use crate::domain::Entry;
use colored::Colorize;
use comfy_table::{presets::UTF8_BORDERS_ONLY, Table};

const PREVIEW_CHARS: usize = 40;

/// Format numbered entries as a table; numbers are 1-based
pub fn format_entry_table<'a, I>(entries: I) -> String
where
    I: IntoIterator<Item = (usize, &'a Entry)>,
{
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["#", "Date", "Title", "Mood", "Tags", "Preview"]);

    let mut rows = 0;
    for (index, entry) in entries {
        table.add_row(vec![
            (index + 1).to_string(),
            entry.display_date(),
            entry.title.clone(),
            mood_label(entry),
            entry.tags.join(", "),
            entry.preview(PREVIEW_CHARS),
        ]);
        rows += 1;
    }

    if rows == 0 {
        return "No entries found".to_string();
    }
    table.to_string()
}

/// Format one entry in full
pub fn format_entry_detail(index: usize, entry: &Entry) -> String {
    let mut output = format!(
        "{} {}\n",
        format!("#{}", index + 1).dimmed(),
        entry.title.bold()
    );
    output.push_str(&format!("{}: {}\n", "Date".cyan(), entry.display_date()));
    output.push_str(&format!("{}: {}\n", "Mood".cyan(), mood_label(entry)));
    if !entry.tags.is_empty() {
        let tags: Vec<String> = entry.tags.iter().map(|t| format!("#{}", t)).collect();
        output.push_str(&format!("{}: {}\n", "Tags".cyan(), tags.join(" ")));
    }
    output.push_str(&format!("\n{}\n", entry.body));

    if !entry.completed_tasks.is_empty() {
        output.push_str(&format!("\n{}:\n", "Completed tasks".cyan()));
        for task in &entry.completed_tasks {
            output.push_str(&format!("  - {}\n", task));
        }
    }
    if let Some(thing) = &entry.forgettable {
        output.push_str(&format!("\n{}: {}\n", "Letting go of".cyan(), thing));
    }

    output
}

/// Encouragement after saving an entry with a low or high rating
pub fn format_mood_feedback(entry: &Entry) -> Option<String> {
    let message = entry.rating.feedback()?;
    let styled = if entry.rating.value() < 4 {
        message.yellow()
    } else {
        message.green()
    };
    Some(styled.to_string())
}

fn mood_label(entry: &Entry) -> String {
    if entry.mood.is_empty() {
        entry.rating.to_string()
    } else {
        format!("{} ({})", entry.mood, entry.rating)
    }
}
