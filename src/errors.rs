use tally_config::ConfigError;
use tally_core::CoreError;
use thiserror::Error;

/// Unified error type for the bot and its console front end.
#[derive(Debug, Error)]
pub enum BotError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Line editor error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),
    #[error("Invalid input: {0}")]
    Input(String),
}

pub type Result<T> = std::result::Result<T, BotError>;
