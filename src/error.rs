use sea_orm::TransactionError;

/// Failure kinds surfaced by the service layer. Malformed user input maps to
/// `Validation`, dangling ids to `NotFound`; everything else is a store
/// failure.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("invalid {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    #[error(transparent)]
    Database(#[from] sea_orm::DbErr),
}

impl Error {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Error::Validation {
            field,
            message: message.into(),
        }
    }
}

// Unwrap SeaORM's transaction wrapper so service code can use `?` on
// `conn.transaction(..)` results.
impl From<TransactionError<Error>> for Error {
    fn from(err: TransactionError<Error>) -> Self {
        match err {
            TransactionError::Connection(e) => Error::Database(e),
            TransactionError::Transaction(e) => e,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
