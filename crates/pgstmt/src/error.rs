//! Error types for pgstmt

use thiserror::Error;

/// Result type alias for pgstmt operations
pub type StmtResult<T> = Result<T, StmtError>;

/// Error types for statement building and execution
#[derive(Debug, Error)]
pub enum StmtError {
    /// A predicate referenced a bind name absent from the value map
    #[error("Missing parameter: no value supplied for '{0}'")]
    MissingParameter(String),

    /// A SELECT was built with an empty marker list
    #[error("Select statement has no markers")]
    NoSelectMarkers,

    /// A DELETE was built without a WHERE predicate
    #[error("Delete on '{0}' has no where clause; attach Predicate::MatchAll to delete all rows")]
    UnscopedDelete(String),

    /// Database connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Query execution error
    #[error("Query error: {0}")]
    Query(#[from] tokio_postgres::Error),

    /// Row not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Unique constraint violation
    #[error("Unique constraint violation: {0}")]
    UniqueViolation(String),

    /// Foreign key constraint violation
    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    /// Check constraint violation
    #[error("Check constraint violation: {0}")]
    CheckViolation(String),

    /// Pool error
    #[cfg(feature = "pool")]
    #[error("Pool error: {0}")]
    Pool(String),
}

impl StmtError {
    /// Create a missing-parameter error
    pub fn missing_parameter(name: impl Into<String>) -> Self {
        Self::MissingParameter(name.into())
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Check if this is a missing-parameter error
    pub fn is_missing_parameter(&self) -> bool {
        matches!(self, Self::MissingParameter(_))
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Parse a tokio_postgres error into a more specific StmtError
    pub fn from_db_error(err: tokio_postgres::Error) -> Self {
        if let Some(db_err) = err.as_db_error() {
            let constraint = db_err.constraint().unwrap_or("unknown");
            let message = db_err.message();

            match db_err.code().code() {
                "23505" => return Self::UniqueViolation(format!("{}: {}", constraint, message)),
                "23503" => {
                    return Self::ForeignKeyViolation(format!("{}: {}", constraint, message));
                }
                "23514" => return Self::CheckViolation(format!("{}: {}", constraint, message)),
                _ => {}
            }
        }
        Self::Query(err)
    }
}

#[cfg(feature = "pool")]
impl From<deadpool_postgres::PoolError> for StmtError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        Self::Pool(err.to_string())
    }
}
