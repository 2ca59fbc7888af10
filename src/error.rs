//! Error types for loading puzzles and running the command-line tool.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// A structure or word file couldn't be read, or the output couldn't be written.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("structure contains no rows")]
    EmptyStructure,

    #[error("word list contains no words")]
    EmptyWordList,

    #[error("failed to initialize logging: {0}")]
    Logger(#[from] log::SetLoggerError),
}

pub type Result<T> = std::result::Result<T, Error>;
