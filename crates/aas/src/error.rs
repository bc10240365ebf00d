use aas_types::ParseStatusError;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Error types
///
/// Every variant is recoverable; callers decide whether to retry or report.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Duplicate identity: {0}")]
    DuplicateIdentity(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Malformed record: {0}")]
    MalformedRecord(String),

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    #[error("Version conflict on {id}: expected {expected}, stored {stored}")]
    VersionConflict { id: String, expected: u64, stored: u64 },

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ParseStatusError> for Error {
    fn from(err: ParseStatusError) -> Self {
        Error::InvalidStatus(err.0)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::MalformedRecord(err.to_string())
    }
}

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Error::Config(err.to_string())
    }
}

macro_rules! storage_error {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Error {
                fn from(err: $ty) -> Self {
                    Error::StorageUnavailable(err.to_string())
                }
            }
        )*
    };
}

storage_error!(
    redb::DatabaseError,
    redb::TransactionError,
    redb::TableError,
    redb::StorageError,
    redb::CommitError,
);
