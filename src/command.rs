pub mod cli;
pub use cli::Command;

use crate::store::StoreError;
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CommandError {
    #[error("invalid option: {0}")]
    InvalidOption(String),

    #[error(transparent)]
    Arguments(#[from] clap::Error),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("malformed store file: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<String> for CommandError {
    fn from(message: String) -> Self {
        CommandError::InvalidOption(message)
    }
}
