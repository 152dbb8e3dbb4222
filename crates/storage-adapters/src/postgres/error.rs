//! Classification of sqlx errors into [`StorageError`].

use domains::StorageError;
use sqlx::error::ErrorKind;

/// SQLSTATE raised when `statement_timeout` cancels a query.
const QUERY_CANCELED: &str = "57014";

pub fn map_sqlx(err: sqlx::Error) -> StorageError {
    match &err {
        sqlx::Error::Database(db) => {
            let message = db.message().to_owned();
            match db.kind() {
                ErrorKind::UniqueViolation => {
                    StorageError::Conflict(conflict_message(db.constraint(), message))
                }
                ErrorKind::ForeignKeyViolation
                | ErrorKind::NotNullViolation
                | ErrorKind::CheckViolation => StorageError::Constraint(message),
                _ if db.code().as_deref() == Some(QUERY_CANCELED) => {
                    StorageError::Unavailable(format!("statement timed out: {message}"))
                }
                _ => StorageError::Query(message),
            }
        }
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            StorageError::Unavailable(err.to_string())
        }
        _ => StorageError::Query(err.to_string()),
    }
}

fn conflict_message(constraint: Option<&str>, fallback: String) -> String {
    match constraint {
        Some("card_users_pkey") => "user already assigned to card".to_owned(),
        Some("card_users_single_owner") => "card already has an owner".to_owned(),
        Some("board_users_pkey") => "user already linked to board".to_owned(),
        _ => fallback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_timeout_is_unavailable() {
        assert!(matches!(map_sqlx(sqlx::Error::PoolTimedOut), StorageError::Unavailable(_)));
    }

    #[test]
    fn missing_row_is_a_query_failure() {
        assert!(matches!(map_sqlx(sqlx::Error::RowNotFound), StorageError::Query(_)));
    }

    #[test]
    fn known_constraints_get_readable_messages() {
        assert_eq!(
            conflict_message(Some("card_users_single_owner"), "duplicate key".into()),
            "card already has an owner"
        );
        assert_eq!(conflict_message(None, "duplicate key".into()), "duplicate key");
    }
}
