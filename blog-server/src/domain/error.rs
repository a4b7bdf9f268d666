use crate::domain::validation::FieldErrors;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("User not found")]
    UserNotFound,

    #[error("Incorrect Credentials")]
    InvalidCredentials,

    #[error("Not found.")]
    BlogNotFound,

    #[error("Invalid page.")]
    InvalidPage,

    #[error("Forbidden: you don't have permission to perform this action")]
    Forbidden,

    #[error("Validation error: {0}")]
    Validation(FieldErrors),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Slug already taken: {0}")]
    SlugConflict(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl DomainError {
    pub fn to_status_code(&self) -> u16 {
        match self {
            Self::UserNotFound | Self::BlogNotFound | Self::InvalidPage => 404,
            Self::InvalidCredentials | Self::Validation(_) => 400,
            Self::Unauthorized(_) => 401,
            Self::Forbidden => 403,
            Self::SlugConflict(_)
            | Self::DatabaseError(_)
            | Self::StorageError(_)
            | Self::InternalError(_) => 500,
        }
    }

    /// Shorthand for a validation failure on a single field.
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::default();
        errors.add(field, message);
        Self::Validation(errors)
    }
}

impl From<sqlx::Error> for DomainError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Self::UserNotFound,
            _ => Self::DatabaseError(err.to_string()),
        }
    }
}
