//! Export use case
//!
//! Writes a user's entries to `journal_<user>.md` or `journal_<user>.pdf`.

use crate::domain::{Entry, Username};
use crate::error::{JournalError, Result};
use crate::infrastructure::render::{DocumentRenderer, MarkdownRenderer, PdfRenderer};
use crate::infrastructure::store::write_atomic;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Output document format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Markdown,
    Pdf,
}

impl ExportFormat {
    fn renderer(&self) -> Box<dyn DocumentRenderer> {
        match self {
            ExportFormat::Markdown => Box::new(MarkdownRenderer),
            ExportFormat::Pdf => Box::new(PdfRenderer::new()),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = JournalError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "md" | "markdown" => Ok(ExportFormat::Markdown),
            "pdf" => Ok(ExportFormat::Pdf),
            _ => Err(JournalError::Export(format!(
                "unknown format '{}', expected markdown or pdf",
                s
            ))),
        }
    }
}

/// Service for exporting entries to documents
pub struct ExportService {
    out_dir: PathBuf,
}

impl ExportService {
    pub fn new(out_dir: PathBuf) -> Self {
        ExportService { out_dir }
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Render `entries` and write the document into the output directory.
    ///
    /// Returns the path of the written document. An existing export for the
    /// same user and format is replaced.
    pub fn export(&self, user: &Username, entries: &[Entry], format: ExportFormat) -> Result<PathBuf> {
        let renderer = format.renderer();
        let bytes = renderer.render(user.as_str(), entries)?;

        std::fs::create_dir_all(&self.out_dir)?;
        let path = self
            .out_dir
            .join(format!("journal_{}.{}", user, renderer.extension()));
        write_atomic(&path, &bytes)?;

        tracing::info!(
            path = %path.display(),
            entries = entries.len(),
            bytes = bytes.len(),
            "exported journal"
        );
        Ok(path)
    }
}
