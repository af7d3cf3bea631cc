use clap::Parser;
use moodlog::cli::{Cli, InputMode, Menu, Prompter};
use moodlog::error::JournalError;
use moodlog::infrastructure::Config;
use std::io::{BufReader, IsTerminal};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_logging(&cli);

    match run(cli) {
        Ok(_) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {}", e.display_with_suggestions());
            std::process::exit(e.exit_code());
        }
    }
}

fn init_logging(cli: &Cli) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,moodlog={}", cli.log_level())));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<(), JournalError> {
    std::fs::create_dir_all(&cli.data_dir).map_err(|source| JournalError::DataDirectory {
        path: cli.data_dir.clone(),
        source,
    })?;
    let config = Config::load_from_dir(&cli.data_dir)?;
    tracing::info!(data_dir = %cli.data_dir.display(), "starting");

    // dialoguer reads stdin itself, so the stream must not hold the stdin lock
    let mode = if std::io::stdin().is_terminal() {
        InputMode::Terminal
    } else {
        InputMode::Scripted
    };
    let prompter =
        Prompter::new(BufReader::new(std::io::stdin()), std::io::stdout()).with_mode(mode);
    Menu::new(prompter, config, &cli.data_dir).run()
}
