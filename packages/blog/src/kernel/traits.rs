// Trait definitions for dependency injection
//
// Infrastructure seams only. The publication engine talks to storage through
// these so it can run against the in-memory doubles in tests.
//
// Naming convention: Base* for trait names

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domains::blogs::models::BlogPost;

// =============================================================================
// Publication Store Trait
// =============================================================================

#[async_trait]
pub trait BasePublicationStore: Send + Sync {
    /// Unpublished posts scheduled at or before `due_before`, oldest created
    /// first, at most `limit`
    async fn find_due_posts(&self, due_before: DateTime<Utc>, limit: i64) -> Result<Vec<BlogPost>>;

    /// Publish one post. `Ok(false)` when it was already published.
    async fn publish(&self, post: &mut BlogPost) -> Result<bool>;
}
