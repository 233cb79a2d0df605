use thiserror::Error;

pub type Result<T> = std::result::Result<T, DatabaseError>;

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Database error: {0}")]
    Sqlx(sqlx::Error),

    #[error("Migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Duplicate entry: {0}")]
    DuplicateEntry(String),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Immutable record: {0}")]
    ImmutableRecord(String),

    #[error("Database error: {0}")]
    Other(String),
}

impl DatabaseError {
    pub fn not_found(entity: &str, id: &str) -> Self {
        DatabaseError::NotFound(format!("{} with id {}", entity, id))
    }

    pub fn duplicate(entity: &str, field: &str) -> Self {
        DatabaseError::DuplicateEntry(format!("{} with this {} already exists", entity, field))
    }
}

impl From<sqlx::Error> for DatabaseError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            let message = db_err.message().to_string();
            // Aborts raised by the audit triggers
            if message.contains("immutable") || message.contains("cannot be deleted") {
                return DatabaseError::ImmutableRecord(message);
            }
            return match db_err.kind() {
                sqlx::error::ErrorKind::UniqueViolation => DatabaseError::DuplicateEntry(message),
                sqlx::error::ErrorKind::ForeignKeyViolation
                | sqlx::error::ErrorKind::NotNullViolation
                | sqlx::error::ErrorKind::CheckViolation => {
                    DatabaseError::ConstraintViolation(message)
                }
                _ => DatabaseError::Sqlx(err),
            };
        }
        DatabaseError::Sqlx(err)
    }
}
