// Test doubles for the kernel traits

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use super::BasePublicationStore;
use crate::domains::blogs::models::BlogPost;

// =============================================================================
// Mock Publication Store
// =============================================================================

/// In-memory publication store.
///
/// Honors the same selection rule as the database query and records every
/// publish attempt. Ids registered with [`with_failure`](Self::with_failure)
/// fail on publish.
#[derive(Clone, Default)]
pub struct MockPublicationStore {
    posts: Arc<Mutex<Vec<BlogPost>>>,
    failing: Arc<Mutex<HashSet<i64>>>,
    raced: Arc<Mutex<HashSet<i64>>>,
    scan_error: Arc<Mutex<Option<String>>>,
    publish_calls: Arc<Mutex<Vec<i64>>>,
}

impl MockPublicationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_post(self, post: BlogPost) -> Self {
        self.posts.lock().unwrap().push(post);
        self
    }

    pub fn with_failure(self, post_id: i64) -> Self {
        self.failing.lock().unwrap().insert(post_id);
        self
    }

    /// Someone else publishes this post between the scan and our publish call.
    pub fn with_concurrent_publish(self, post_id: i64) -> Self {
        self.raced.lock().unwrap().insert(post_id);
        self
    }

    /// Make `find_due_posts` fail
    pub fn with_scan_error(self, message: &str) -> Self {
        *self.scan_error.lock().unwrap() = Some(message.to_string());
        self
    }

    /// Mark a stored post as published behind the engine's back, as a
    /// concurrent manual publish would.
    pub fn publish_externally(&self, post_id: i64, at: DateTime<Utc>) {
        let mut posts = self.posts.lock().unwrap();
        if let Some(post) = posts.iter_mut().find(|p| p.id == post_id) {
            post.published = true;
            post.published_at = Some(at);
        }
    }

    pub fn post(&self, post_id: i64) -> Option<BlogPost> {
        self.posts
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == post_id)
            .cloned()
    }

    pub fn publish_calls(&self) -> Vec<i64> {
        self.publish_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl BasePublicationStore for MockPublicationStore {
    async fn find_due_posts(&self, due_before: DateTime<Utc>, limit: i64) -> Result<Vec<BlogPost>> {
        if let Some(message) = self.scan_error.lock().unwrap().clone() {
            anyhow::bail!(message);
        }

        let mut due: Vec<BlogPost> = self
            .posts
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.is_due(due_before))
            .cloned()
            .collect();
        due.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        due.truncate(limit.max(0) as usize);
        Ok(due)
    }

    async fn publish(&self, post: &mut BlogPost) -> Result<bool> {
        self.publish_calls.lock().unwrap().push(post.id);

        if self.failing.lock().unwrap().contains(&post.id) {
            anyhow::bail!("simulated publish failure for post {}", post.id);
        }

        if self.raced.lock().unwrap().contains(&post.id) {
            self.publish_externally(post.id, Utc::now() - chrono::Duration::seconds(5));
        }

        let mut posts = self.posts.lock().unwrap();
        let Some(stored) = posts.iter_mut().find(|p| p.id == post.id) else {
            anyhow::bail!("post {} not found", post.id);
        };

        if stored.published {
            *post = stored.clone();
            return Ok(false);
        }

        stored.published = true;
        stored.published_at = Some(Utc::now());
        *post = stored.clone();
        Ok(true)
    }
}
