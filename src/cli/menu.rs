//! Interactive menus
//!
//! The login menu opens a `JournalSession`; the main menu hands that session
//! to one handler per choice. Handler errors are printed and the loop continues.

use crate::application::{
    capture_text, capture_voice, AccountService, AudioSource, ExportFormat, ExportService,
    JournalSession,
};
use crate::cli::output::{format_entry_detail, format_entry_table, format_mood_feedback};
use crate::cli::prompt::Prompter;
use crate::domain::entry::split_list;
use crate::domain::{EntryDraft, MoodRating, SearchQuery};
use crate::error::{JournalError, Result};
use crate::infrastructure::transcription::TranscriptionError;
use crate::infrastructure::{Config, FileEntryStore};
use colored::Colorize;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

type Session = JournalSession<FileEntryStore>;

const LOGIN_CHOICES: &[&str] = &["Log in", "Create account", "Exit"];

const MAIN_CHOICES: &[&str] = &[
    "Write text entry",
    "Write voice entry",
    "View entries",
    "Search entries",
    "Edit entry",
    "Delete entry",
    "Export to PDF",
    "Export to Markdown",
    "Log out",
];

const SEARCH_CHOICES: &[&str] = &["By mood", "By date range", "By tags", "By text"];

/// Edit answer that empties an optional field
const CLEAR: &str = "-";

/// What the user asked for when editing one field
enum FieldEdit<T> {
    Keep,
    Clear,
    Replace(T),
}

impl<T> FieldEdit<T> {
    fn resolve(self, current: T, cleared: T) -> T {
        match self {
            FieldEdit::Keep => current,
            FieldEdit::Clear => cleared,
            FieldEdit::Replace(value) => value,
        }
    }
}

/// Drives the menus over any pair of input/output streams
pub struct Menu<R: BufRead, W: Write> {
    prompter: Prompter<R, W>,
    config: Config,
    data_dir: PathBuf,
}

impl<R: BufRead, W: Write> Menu<R, W> {
    pub fn new(prompter: Prompter<R, W>, config: Config, data_dir: &Path) -> Self {
        Menu {
            prompter,
            config,
            data_dir: data_dir.to_path_buf(),
        }
    }

    /// Run until the user exits or input ends
    pub fn run(&mut self) -> Result<()> {
        let accounts = AccountService::new(self.config.entry_store(&self.data_dir));

        loop {
            self.show_choices("moodlog", LOGIN_CHOICES)?;
            let Some(choice) = self.prompter.line("Choose")? else {
                return Ok(());
            };

            let opened = match choice.as_str() {
                "1" => self.login(&accounts),
                "2" => self.create_account(&accounts),
                "3" | "q" => return Ok(()),
                _ => {
                    writeln!(self.prompter.out(), "Unknown choice: {}", choice)?;
                    continue;
                }
            };

            match opened {
                Ok(Some(mut session)) => {
                    writeln!(
                        self.prompter.out(),
                        "{}",
                        format!("Welcome, {}!", session.user()).green()
                    )?;
                    self.main_menu(&mut session)?;
                }
                Ok(None) => {}
                Err(e) => self.report(&e)?,
            }
        }
    }

    fn login(&mut self, accounts: &AccountService<FileEntryStore>) -> Result<Option<Session>> {
        let username = self.prompter.text("Username")?;
        if username.is_empty() {
            return Ok(None);
        }
        let password = self.prompter.secret("Password")?;
        accounts.login(&username, &password).map(Some)
    }

    fn create_account(&mut self, accounts: &AccountService<FileEntryStore>) -> Result<Option<Session>> {
        let username = self.prompter.text("Choose a username")?;
        if username.is_empty() {
            return Ok(None);
        }
        let password = self.prompter.secret("Choose a password")?;
        let confirm = self.prompter.secret("Confirm password")?;
        let session = accounts.create(&username, &password, &confirm)?;
        writeln!(self.prompter.out(), "Account '{}' created", session.user())?;
        Ok(Some(session))
    }

    fn main_menu(&mut self, session: &mut Session) -> Result<()> {
        loop {
            let heading = format!("{}'s journal ({} entries)", session.user(), session.entries().len());
            self.show_choices(&heading, MAIN_CHOICES)?;
            let Some(choice) = self.prompter.line("Choose")? else {
                return Ok(());
            };

            let result = match choice.as_str() {
                "1" => self.text_entry(session),
                "2" => self.voice_entry(session),
                "3" => self.view_entries(session),
                "4" => self.search_entries(session),
                "5" => self.edit_entry(session),
                "6" => self.delete_entry(session),
                "7" => self.export(session, ExportFormat::Pdf),
                "8" => self.export(session, ExportFormat::Markdown),
                "9" | "q" => {
                    tracing::info!(user = %session.user(), "logged out");
                    writeln!(self.prompter.out(), "Logged out")?;
                    return Ok(());
                }
                _ => {
                    writeln!(self.prompter.out(), "Unknown choice: {}", choice)?;
                    continue;
                }
            };

            if let Err(e) = result {
                self.report(&e)?;
            }
        }
    }

    fn text_entry(&mut self, session: &mut Session) -> Result<()> {
        let body = self.prompter.text("How was your day?")?;
        let draft = self.entry_details(body)?;
        self.save_new(session, draft)
    }

    fn voice_entry(&mut self, session: &mut Session) -> Result<()> {
        let transcriber = self.config.transcription.transcriber()?;
        let Some(source) = self.audio_source()? else {
            return Ok(());
        };

        writeln!(self.prompter.out(), "Transcribing...")?;
        let transcript = match capture_voice(&transcriber, source, &self.config.voice.stop_word) {
            Err(TranscriptionError::Cancelled) => {
                writeln!(self.prompter.out(), "Voice entry cancelled")?;
                return Ok(());
            }
            other => other?,
        };

        writeln!(self.prompter.out(), "\n{}\n{}\n", "You said:".cyan(), transcript)?;
        let draft = self.entry_details(transcript)?;
        self.save_new(session, draft)
    }

    fn audio_source(&mut self) -> Result<Option<AudioSource>> {
        let path = self
            .prompter
            .text("Audio file (leave empty to use the microphone)")?;
        if !path.is_empty() {
            return Ok(Some(AudioSource::File(PathBuf::from(path))));
        }

        match self.record() {
            Err(JournalError::Transcription(TranscriptionError::MicrophoneUnavailable)) => {
                writeln!(
                    self.prompter.out(),
                    "{}",
                    "Microphone capture is not available in this build".yellow()
                )?;
                let path = self.prompter.text("Audio file")?;
                Ok((!path.is_empty()).then(|| AudioSource::File(PathBuf::from(path))))
            }
            other => other.map(Some),
        }
    }

    #[cfg(feature = "microphone")]
    fn record(&mut self) -> Result<AudioSource> {
        use crate::infrastructure::transcription::microphone::Recording;

        let recording = Recording::start()?;
        self.prompter
            .text(&format!("{} Press Enter to stop", "Recording...".red().bold()))?;
        Ok(AudioSource::Recorded(recording.finish()?))
    }

    #[cfg(not(feature = "microphone"))]
    fn record(&mut self) -> Result<AudioSource> {
        Err(TranscriptionError::MicrophoneUnavailable.into())
    }

    /// Ask for the fields that go with a body
    fn entry_details(&mut self, body: String) -> Result<EntryDraft> {
        let title = self.prompter.text("Title")?;
        let mood = self.prompter.text("Mood (e.g. happy, tired)")?;
        let rating = self.ask_rating("Mood rating (1-10)", None)?;
        let tags = self.prompter.list("Tags (comma separated)")?;
        let tasks = self.prompter.list("Completed tasks (comma separated)")?;
        let forgettable = self.prompter.text("Something to let go of (optional)")?;

        let mut draft = EntryDraft::new(body, rating)
            .with_title(title)
            .with_mood(mood)
            .with_tags(tags)
            .with_tasks(tasks);
        if !forgettable.is_empty() {
            draft = draft.with_forgettable(forgettable);
        }
        Ok(draft)
    }

    fn save_new(&mut self, session: &mut Session, draft: EntryDraft) -> Result<()> {
        let entry = capture_text(draft)?;
        let feedback = format_mood_feedback(&entry);
        let index = session.add(entry)?;

        writeln!(self.prompter.out(), "{}", format!("Entry #{} saved", index + 1).green())?;
        if let Some(feedback) = feedback {
            writeln!(self.prompter.out(), "{}", feedback)?;
        }
        Ok(())
    }

    fn view_entries(&mut self, session: &Session) -> Result<()> {
        writeln!(
            self.prompter.out(),
            "{}",
            format_entry_table(session.entries().iter().enumerate())
        )?;
        if session.entries().is_empty() {
            return Ok(());
        }

        if let Some(index) = self.choose_entry("Open entry # (leave empty to go back)")? {
            let entry = session.collection().get(index)?;
            writeln!(self.prompter.out(), "\n{}", format_entry_detail(index, entry))?;
        }
        Ok(())
    }

    fn search_entries(&mut self, session: &Session) -> Result<()> {
        self.show_choices("Search", SEARCH_CHOICES)?;
        let choice = self.prompter.text("Choose")?;

        let query = match choice.as_str() {
            "1" => SearchQuery::mood(&self.prompter.text("Mood contains")?),
            "2" => {
                let from = self.prompter.text("From (YYYY-MM-DD)")?;
                let to = self.prompter.text("To (YYYY-MM-DD)")?;
                SearchQuery::date_range(&from, &to)?
            }
            "3" => SearchQuery::tags(&self.prompter.text("Tags (e.g. work AND NOT meeting)")?)?,
            "4" => SearchQuery::text(&self.prompter.text("Text contains")?),
            "" => return Ok(()),
            _ => {
                writeln!(self.prompter.out(), "Unknown choice: {}", choice)?;
                return Ok(());
            }
        };

        tracing::debug!(?query, "searching entries");
        let table = format_entry_table(session.collection().search(&query));
        writeln!(self.prompter.out(), "{}", table)?;
        Ok(())
    }

    fn edit_entry(&mut self, session: &mut Session) -> Result<()> {
        let Some(index) = self.choose_entry("Entry # to edit")? else {
            return Ok(());
        };
        let current = session.collection().get(index)?.to_draft();
        writeln!(
            self.prompter.out(),
            "Leave a field empty to keep its current value, or enter '{}' to clear it",
            CLEAR
        )?;

        let title = self.edit_text("Title", &current.title)?;
        let body = self.prompter.text(&format!("Text [{}]", current.body))?;
        let mood = self.edit_text("Mood", &current.mood)?;
        let rating = self.ask_rating(
            &format!("Mood rating (1-10) [{}]", current.rating),
            Some(current.rating),
        )?;
        let tags = self.edit_list("Tags", &current.tags)?;
        let tasks = self.edit_list("Completed tasks", &current.completed_tasks)?;
        let forgettable = self.edit_text(
            "Something to let go of",
            current.forgettable.as_deref().unwrap_or_default(),
        )?;

        let draft = EntryDraft {
            title: title.resolve(current.title, String::new()),
            body: if body.is_empty() { current.body } else { body },
            mood: mood.resolve(current.mood, String::new()),
            rating,
            tags: tags.resolve(current.tags, Vec::new()),
            completed_tasks: tasks.resolve(current.completed_tasks, Vec::new()),
            forgettable: forgettable
                .resolve(current.forgettable.unwrap_or_default(), String::new())
                .into(),
        };

        session.update(index, draft)?;
        writeln!(self.prompter.out(), "{}", format!("Entry #{} updated", index + 1).green())?;
        Ok(())
    }

    fn delete_entry(&mut self, session: &mut Session) -> Result<()> {
        let Some(index) = self.choose_entry("Entry # to delete")? else {
            return Ok(());
        };
        let entry = session.collection().get(index)?;
        writeln!(self.prompter.out(), "\n{}", format_entry_detail(index, entry))?;

        if !self.prompter.confirm("Delete this entry?")? {
            writeln!(self.prompter.out(), "Kept")?;
            return Ok(());
        }
        session.delete(index)?;
        writeln!(self.prompter.out(), "Entry #{} deleted", index + 1)?;
        Ok(())
    }

    fn export(&mut self, session: &Session, format: ExportFormat) -> Result<()> {
        let service = ExportService::new(self.config.export_dir(&self.data_dir));
        let path = service.export(session.user(), session.entries(), format)?;
        writeln!(
            self.prompter.out(),
            "{} {}",
            "Exported to".green(),
            path.display()
        )?;
        Ok(())
    }

    /// Read a 1-based entry number and return its index
    fn choose_entry(&mut self, label: &str) -> Result<Option<usize>> {
        match self.prompter.number(label)? {
            None => Ok(None),
            Some(n) if n >= 1 => Ok(Some(n as usize - 1)),
            Some(n) => Err(JournalError::EntryNotFound(n.max(0) as usize)),
        }
    }

    /// Ask for a rating until one from 1 to 10 is given.
    ///
    /// An empty answer keeps `current` when there is one; end of input with
    /// no rating is an error.
    fn ask_rating(&mut self, label: &str, current: Option<i64>) -> Result<i64> {
        loop {
            let Some(answer) = self.prompter.line(label)? else {
                return current.ok_or_else(|| {
                    JournalError::InvalidEntry("a mood rating is required".to_string())
                });
            };

            if answer.is_empty() {
                if let Some(current) = current {
                    return Ok(current);
                }
                writeln!(self.prompter.out(), "{}", "A mood rating is required".yellow())?;
                continue;
            }

            match answer.parse::<i64>() {
                Ok(n) => match MoodRating::new(n) {
                    Ok(_) => return Ok(n),
                    Err(e) => writeln!(self.prompter.out(), "{}", e.to_string().yellow())?,
                },
                Err(_) => writeln!(
                    self.prompter.out(),
                    "{}",
                    "Please enter a whole number from 1 to 10".yellow()
                )?,
            }
        }
    }

    fn edit_text(&mut self, label: &str, current: &str) -> Result<FieldEdit<String>> {
        let answer = self.prompter.text(&format!("{} [{}]", label, current))?;
        Ok(match answer.as_str() {
            "" => FieldEdit::Keep,
            CLEAR => FieldEdit::Clear,
            _ => FieldEdit::Replace(answer),
        })
    }

    fn edit_list(&mut self, label: &str, current: &[String]) -> Result<FieldEdit<Vec<String>>> {
        let answer = self.prompter.text(&format!("{} [{}]", label, current.join(", ")))?;
        Ok(match answer.as_str() {
            "" => FieldEdit::Keep,
            CLEAR => FieldEdit::Clear,
            _ => FieldEdit::Replace(split_list(&answer)),
        })
    }

    fn show_choices(&mut self, heading: &str, choices: &[&str]) -> Result<()> {
        let out = self.prompter.out();
        writeln!(out, "\n{}", heading.bold())?;
        for (i, choice) in choices.iter().enumerate() {
            writeln!(out, "  {}. {}", i + 1, choice)?;
        }
        Ok(())
    }

    fn report(&mut self, error: &JournalError) -> Result<()> {
        tracing::debug!(error = ?error, "menu action failed");
        writeln!(
            self.prompter.out(),
            "{} {}",
            "Error:".red().bold(),
            error.display_with_suggestions()
        )?;
        Ok(())
    }
}
