//! CLI layer - Arguments, prompts and menus

pub mod commands;
pub mod menu;
pub mod output;
pub mod prompt;

pub use commands::Cli;
pub use menu::Menu;
pub use prompt::{InputMode, Prompter};
