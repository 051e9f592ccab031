//! Blog dependencies for activities (using traits for testability)

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::config::Config;
use crate::domains::blogs::models::BlogPost;
use crate::domains::blogs::LinkConfig;
use crate::kernel::BasePublicationStore;

// =============================================================================
// PgPublicationStore (implements BasePublicationStore)
// =============================================================================

/// Publication store backed by the `blog_posts` table
pub struct PgPublicationStore(pub PgPool);

impl PgPublicationStore {
    pub fn new(pool: PgPool) -> Self {
        Self(pool)
    }
}

#[async_trait]
impl BasePublicationStore for PgPublicationStore {
    async fn find_due_posts(&self, due_before: DateTime<Utc>, limit: i64) -> Result<Vec<BlogPost>> {
        BlogPost::find_due_for_publication(due_before, limit, &self.0).await
    }

    async fn publish(&self, post: &mut BlogPost) -> Result<bool> {
        post.publish(&self.0).await
    }
}

// =============================================================================
// BlogDeps
// =============================================================================

/// Dependencies shared by every blog activity
#[derive(Clone)]
pub struct BlogDeps {
    pub db_pool: PgPool,
    /// Permanent link builder, from `APP_ORIGIN`
    pub links: LinkConfig,
    pub publication_store: Arc<dyn BasePublicationStore>,
    pub publish_batch_limit: i64,
}

impl BlogDeps {
    pub fn new(db_pool: PgPool, config: &Config) -> Self {
        Self {
            publication_store: Arc::new(PgPublicationStore::new(db_pool.clone())),
            links: LinkConfig::new(config.app_origin.clone()),
            publish_batch_limit: config.publish_batch_limit,
            db_pool,
        }
    }

    /// Swap the publication store (tests)
    pub fn with_publication_store(mut self, store: Arc<dyn BasePublicationStore>) -> Self {
        self.publication_store = store;
        self
    }
}
