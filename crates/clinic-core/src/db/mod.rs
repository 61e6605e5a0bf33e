//! Persistence layer: SQLite schema, bounded connection pool and the gateway
//! that executes built statements.

mod gateway;
mod pool;
mod rows;
mod schema;

pub use gateway::*;
pub use pool::*;
pub use rows::*;
pub use schema::*;

use std::time::Duration;

use thiserror::Error;

/// Database errors.
///
/// Every variant represents an infrastructure failure; a statement that
/// simply matched no rows is reported as `Ok(false)`, never as an error.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Constraint violation: {0}")]
    Constraint(String),

    #[error("No pooled connection became available within {0:?}")]
    PoolExhausted(Duration),

    #[error("Connection pool is shut down")]
    PoolClosed,

    #[error("Invalid pool bounds: floor {floor} must be >= 1 and <= ceiling {ceiling}")]
    InvalidPoolBounds { floor: usize, ceiling: usize },

    #[error("Connection pool error: {0}")]
    Pool(#[from] r2d2::Error),
}

impl DbError {
    /// Lift SQLite constraint failures into [`DbError::Constraint`].
    pub(crate) fn classify(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(code, message)
                if code.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                DbError::Constraint(message.clone().unwrap_or_else(|| code.to_string()))
            }
            _ => DbError::Sqlite(err),
        }
    }
}

pub type DbResult<T> = Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_constraint() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();
        let err = conn
            .execute(
                "INSERT INTO patients (id, first_name, last_name, date_of_birth, gender) \
                 VALUES ('x', 'A', 'B', '1990-01-01', 'Other')",
                [],
            )
            .unwrap_err();
        assert!(matches!(DbError::classify(err), DbError::Constraint(_)));
    }

    #[test]
    fn test_classify_other() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        let err = conn.execute("SELECT * FROM nowhere", []).unwrap_err();
        assert!(matches!(DbError::classify(err), DbError::Sqlite(_)));
    }
}
