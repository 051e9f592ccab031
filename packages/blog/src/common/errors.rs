use thiserror::Error;

use super::auth::AuthError;

/// Errors surfaced by blog activities
///
/// `NotFound` and `Forbidden` stay distinct here even though the HTTP layer
/// may render both the same way.
#[derive(Error, Debug)]
pub enum ContentError {
    #[error("Record not found")]
    NotFound,

    #[error("Forbidden")]
    Forbidden,

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Store(#[from] anyhow::Error),
}

impl From<AuthError> for ContentError {
    fn from(err: AuthError) -> Self {
        tracing::debug!(error = %err, "Access denied");
        ContentError::Forbidden
    }
}

impl From<sqlx::Error> for ContentError {
    fn from(err: sqlx::Error) -> Self {
        ContentError::Store(err.into())
    }
}

impl ContentError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ContentError::NotFound)
    }

    pub fn is_forbidden(&self) -> bool {
        matches!(self, ContentError::Forbidden)
    }
}
