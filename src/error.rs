use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Malformed `MM:SS` time text.
    #[error("Format error: {0}")]
    Format(String),

    /// Missing or malformed tracking/annotation file, or a schema mismatch.
    #[error("Data error: {0}")]
    Data(String),

    /// A command that the current session state does not allow.
    #[error("State error: {0}")]
    State(String),

    #[error("Index {index} is out of range (len {len})")]
    Range { index: usize, len: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
