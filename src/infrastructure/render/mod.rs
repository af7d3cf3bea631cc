//! Document renderers used by export

pub mod markdown;
pub mod pdf;

pub use markdown::MarkdownRenderer;
pub use pdf::PdfRenderer;

use crate::domain::Entry;
use crate::error::Result;

/// Port for turning a user's entries into a document
pub trait DocumentRenderer {
    /// File extension of the produced document, without the dot
    fn extension(&self) -> &'static str;

    /// Render the whole document in memory
    fn render(&self, owner: &str, entries: &[Entry]) -> Result<Vec<u8>>;
}
