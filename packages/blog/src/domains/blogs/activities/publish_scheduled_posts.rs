//! Scheduled publication
//!
//! Promotes posts whose scheduled time has come. One run scans at most
//! `batch_limit` candidates and tries each exactly once; a failing post is
//! logged and skipped, and becomes a candidate again on the next run.
//!
//! Runs are not locked against each other. Two overlapping runs may pick the
//! same posts; publishing is idempotent so the second write is a no-op. Keeping
//! runs from overlapping is the scheduler's job.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::domains::blogs::models::due_cutoff;
use crate::kernel::{BasePublicationStore, BlogDeps};

#[derive(Debug, Clone, Serialize)]
pub struct PublishFailure {
    pub post_id: i64,
    pub error: String,
}

/// Outcome of one scheduled publication run
#[derive(Debug, Clone, Default, Serialize)]
pub struct PublicationReport {
    /// Posts selected by the scan
    pub candidates: usize,
    pub published: Vec<i64>,
    /// Candidates that were published by someone else before we got to them
    pub already_published: Vec<i64>,
    pub failures: Vec<PublishFailure>,
    /// Set when the candidate scan itself failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scan_error: Option<String>,
}

impl PublicationReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && self.scan_error.is_none()
    }
}

pub async fn publish_scheduled_posts(
    store: &dyn BasePublicationStore,
    batch_limit: i64,
    now: DateTime<Utc>,
) -> PublicationReport {
    let due_before = due_cutoff(now);
    let mut report = PublicationReport::default();

    let candidates = match store.find_due_posts(due_before, batch_limit.max(0)).await {
        Ok(posts) => posts,
        Err(e) => {
            error!(error = %e, "Scheduled publication scan failed");
            report.scan_error = Some(e.to_string());
            return report;
        }
    };

    report.candidates = candidates.len();
    if candidates.is_empty() {
        info!("No scheduled posts due");
        return report;
    }

    info!(candidates = candidates.len(), %due_before, "Publishing scheduled posts");

    for mut post in candidates {
        let post_id = post.id;
        match store.publish(&mut post).await {
            Ok(true) => {
                info!(post_id, published_at = ?post.published_at, "Scheduled post published");
                report.published.push(post_id);
            }
            Ok(false) => {
                info!(post_id, "Scheduled post was already published");
                report.already_published.push(post_id);
            }
            Err(e) => {
                warn!(post_id, error = %e, "Failed to publish scheduled post");
                report.failures.push(PublishFailure {
                    post_id,
                    error: e.to_string(),
                });
            }
        }
    }

    info!(
        candidates = report.candidates,
        published = report.published.len(),
        already_published = report.already_published.len(),
        failed = report.failures.len(),
        "Scheduled publication run complete"
    );

    report
}

/// One run with the configured store and batch limit
pub async fn run_scheduled_publication(deps: &BlogDeps) -> PublicationReport {
    publish_scheduled_posts(
        deps.publication_store.as_ref(),
        deps.publish_batch_limit,
        Utc::now(),
    )
    .await
}
