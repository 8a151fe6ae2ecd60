use std::error::Error;
use std::fmt;

/// Errors raised by the store
#[derive(Debug)]
pub enum DbError {
    /// Statement or transaction failure reported by SeaORM
    SeaOrmError(sea_orm::DbErr),
    /// The pool could not be opened
    ConnectionError(String),
    /// A chain value does not fit its column
    OutOfRange(String),
}

impl fmt::Display for DbError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DbError::SeaOrmError(e) => write!(f, "Database error: {}", e),
            DbError::ConnectionError(msg) => write!(f, "Connection error: {}", msg),
            DbError::OutOfRange(msg) => write!(f, "Value out of range: {}", msg),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            DbError::SeaOrmError(e) => Some(e),
            DbError::ConnectionError(_) | DbError::OutOfRange(_) => None,
        }
    }
}

impl From<sea_orm::DbErr> for DbError {
    fn from(err: sea_orm::DbErr) -> Self {
        DbError::SeaOrmError(err)
    }
}
