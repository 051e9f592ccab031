pub mod blog;
pub mod blog_editor;
pub mod blog_post;

pub use blog::*;
pub use blog_editor::*;
pub use blog_post::*;

/// Empty or whitespace-only slugs are stored as NULL so the unique index
/// only binds slugs that are actually set.
pub(crate) fn normalize_slug(slug: Option<String>, max_chars: Option<usize>) -> Option<String> {
    let slug = slug?;
    let trimmed = slug.trim();
    if trimmed.is_empty() {
        return None;
    }

    Some(match max_chars {
        Some(max) => trimmed.chars().take(max).collect(),
        None => trimmed.to_string(),
    })
}

/// True when the error chain carries a unique-constraint violation.
pub(crate) fn is_unique_violation(err: &anyhow::Error) -> bool {
    err.downcast_ref::<sqlx::Error>()
        .and_then(|e| e.as_database_error())
        .map(|db| db.is_unique_violation())
        .unwrap_or(false)
}

/// True when the error chain carries a foreign-key violation.
pub(crate) fn is_foreign_key_violation(err: &anyhow::Error) -> bool {
    err.downcast_ref::<sqlx::Error>()
        .and_then(|e| e.as_database_error())
        .map(|db| db.is_foreign_key_violation())
        .unwrap_or(false)
}
