//! Application layer - Use cases and orchestration

pub mod account;
pub mod capture;
pub mod export;
pub mod session;

pub use account::AccountService;
pub use capture::{capture_text, capture_voice, AudioSource};
pub use export::{ExportFormat, ExportService};
pub use session::JournalSession;
