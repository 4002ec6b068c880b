use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Distribution requires at least one beneficiary")]
    EmptyBeneficiarySet,

    #[error("Distribution failed: {0}")]
    Distribution(#[source] sqlx::Error),

    #[error("Referential constraint: {0}")]
    ReferentialConstraint(String),

    #[error("Config error: {0}")]
    Config(String),
}

/// True when the underlying SQLite error is a foreign key violation.
/// Used to turn delete failures on still-referenced rows into
/// `ReferentialConstraint` instead of a generic database error.
pub fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    matches!(
        err.as_database_error().map(|e| e.kind()),
        Some(sqlx::error::ErrorKind::ForeignKeyViolation)
    )
}
