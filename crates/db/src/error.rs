use attier_core::error::CoreError;

/// Data-layer error: either a domain rejection raised during validation or
/// a storage failure.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl DbError {
    /// True when the underlying storage error is a unique constraint
    /// violation (Postgres error code 23505).
    pub fn is_unique_violation(&self) -> bool {
        match self {
            DbError::Sqlx(sqlx::Error::Database(e)) => e.code().as_deref() == Some("23505"),
            _ => false,
        }
    }
}

pub type DbResult<T> = Result<T, DbError>;
