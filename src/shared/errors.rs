use sea_orm::SqlErr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Validation: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal: {0}")]
    Internal(String),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl DomainError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        DomainError::NotFound {
            entity,
            field: "id",
            value: id.to_string(),
        }
    }

    /// Whether the caller may retry the same request unchanged
    /// (lock contention, transaction timeout).
    pub fn is_transient(&self) -> bool {
        match self {
            DomainError::Conflict(msg) => msg.ends_with("retry"),
            _ => false,
        }
    }
}

/// Classify a database failure.
///
/// Constraint violations are recognised from the driver error code:
/// unique keys become `Conflict`, dangling foreign keys `Validation`.
/// Lock waits, deadlocks and serialization failures surface as a retryable
/// `Conflict`; everything else is an `Internal` error.
pub fn db_err(e: sea_orm::DbErr) -> DomainError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            return DomainError::Conflict("Record already exists".to_string())
        }
        Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
            return DomainError::Validation("Referenced record does not exist".to_string())
        }
        _ => {}
    }

    let msg = e.to_string();
    if is_contention(&msg) {
        DomainError::Conflict("Resource is busy, retry".to_string())
    } else {
        DomainError::Internal(format!("Database error: {}", msg))
    }
}

/// SQLite and PostgreSQL wording for lock contention.
const CONTENTION_MESSAGES: &[&str] = &[
    "database is locked",
    "database table is locked",
    "deadlock detected",
    "could not serialize access",
    "could not obtain lock",
    "lock timeout",
    "lock wait timeout",
];

fn is_contention(message: &str) -> bool {
    let lower = message.to_lowercase();
    CONTENTION_MESSAGES.iter().any(|needle| lower.contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locked_database_is_retryable_conflict() {
        let err = db_err(sea_orm::DbErr::Custom("database is locked".into()));
        assert!(matches!(err, DomainError::Conflict(_)));
        assert!(err.is_transient());
    }

    #[test]
    fn postgres_deadlock_is_retryable_conflict() {
        let err = db_err(sea_orm::DbErr::Custom("ERROR: deadlock detected".into()));
        assert!(err.is_transient());
    }

    #[test]
    fn busy_in_unrelated_text_is_not_contention() {
        let err = db_err(sea_orm::DbErr::Custom("no such table: busy_slots".into()));
        assert!(matches!(err, DomainError::Internal(_)));
        assert!(!is_contention("column 'busy' does not exist"));
    }

    #[test]
    fn other_database_failures_are_internal() {
        let err = db_err(sea_orm::DbErr::Custom("no such table: cars".into()));
        assert!(matches!(err, DomainError::Internal(_)));
        assert!(!err.is_transient());
    }

    #[test]
    fn not_found_message_names_entity() {
        let err = DomainError::not_found("Car", 7);
        assert_eq!(err.to_string(), "Not found: Car with id=7");
    }
}
