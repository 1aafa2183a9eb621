use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArchiveError {
    /// Store could not be opened or did not answer the startup ping.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Business-logic storage errors (invalid state, unexpected rows, etc.)
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Query failed: {0}")]
    Query(String),

    /// Insert or delete failed mid-run. Earlier mutations stay applied.
    #[error("Mutation failed: {0}")]
    Mutation(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Global subscriber could not be installed.
    #[error("Logging setup failed: {0}")]
    Logging(String),
}

pub type ArchiveResult<T> = Result<T, ArchiveError>;
