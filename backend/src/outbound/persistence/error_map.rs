//! Shared classification of Diesel and pool failures.
//!
//! Adapters fold the classified kind into their own port error enums, so the
//! match on Diesel internals lives in exactly one place.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::models::RowConversionError;
use super::pool::PoolError;

/// Storage failure classified into the shapes port errors distinguish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbErrorKind {
    /// Connection-level failure; the store is unreachable or overloaded.
    Connection(String),
    /// Query-level failure.
    Query(String),
    /// Unique constraint violation.
    UniqueViolation(String),
}

/// Classify a pool failure. Checkout and build failures are both
/// connection-level from a caller's point of view.
pub fn classify_pool_error(error: PoolError) -> DbErrorKind {
    DbErrorKind::Connection(error.to_string())
}

/// Classify a Diesel failure without leaking driver detail upward.
pub fn classify_diesel_error(error: DieselError) -> DbErrorKind {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        other => debug!(error = %other, "diesel operation failed"),
    }

    match error {
        DieselError::NotFound => DbErrorKind::Query("record not found".to_owned()),
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            DbErrorKind::UniqueViolation(info.message().to_owned())
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            DbErrorKind::Connection("database connection error".to_owned())
        }
        DieselError::DatabaseError(_, _) => DbErrorKind::Query("database error".to_owned()),
        _ => DbErrorKind::Query("database error".to_owned()),
    }
}

/// Classify a row-to-entity conversion failure as a query error.
pub fn classify_conversion_error(error: RowConversionError) -> DbErrorKind {
    DbErrorKind::Query(error.to_string())
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;

    #[test]
    fn pool_errors_classify_as_connection() {
        let kind = classify_pool_error(PoolError::checkout("connection refused"));
        assert!(matches!(kind, DbErrorKind::Connection(message) if message.contains("refused")));
    }

    #[test]
    fn not_found_classifies_as_query() {
        let kind = classify_diesel_error(DieselError::NotFound);
        assert_eq!(kind, DbErrorKind::Query("record not found".to_owned()));
    }

    #[test]
    fn conversion_errors_classify_as_query() {
        let kind = classify_conversion_error(RowConversionError {
            column: "status",
            message: "unknown vehicle status: impounded".to_owned(),
        });
        assert!(matches!(kind, DbErrorKind::Query(message) if message.contains("status")));
    }
}
