//! Access Policy Gate
//!
//! Decides which publication states a caller may see. Callers without
//! [`Capability::AccessBlogsUnpublished`] only ever see published posts, and a
//! caller who tries to filter on publication state without the capability is
//! refused outright instead of being quietly narrowed to published posts.

use crate::common::{Capability, CapabilityPolicy, ContentError};

use super::filters::{Collection, FilterCriteria, ListingParams};
use super::models::BlogPost;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingAccess {
    /// Answer with an empty page
    Refused,
    /// Force `published = true`
    PublishedOnly,
    /// Criteria pass through untouched
    Unrestricted,
}

impl ListingAccess {
    pub fn evaluate(
        policy: &dyn CapabilityPolicy,
        collection: Collection,
        params: &ListingParams,
    ) -> Self {
        if !collection.has_publish_gate() {
            return ListingAccess::Unrestricted;
        }

        if can_see_unpublished(policy) {
            return ListingAccess::Unrestricted;
        }

        if params.requests_publish_filter() {
            tracing::warn!(
                collection = %collection,
                published = params.published.as_deref().unwrap_or_default(),
                "Publication filter requested without access to unpublished posts"
            );
            return ListingAccess::Refused;
        }

        ListingAccess::PublishedOnly
    }

    /// `None` means the listing is refused.
    pub fn apply(self, mut criteria: FilterCriteria) -> Option<FilterCriteria> {
        match self {
            ListingAccess::Refused => None,
            ListingAccess::PublishedOnly => {
                criteria.published = Some(true);
                Some(criteria)
            }
            ListingAccess::Unrestricted => Some(criteria),
        }
    }
}

pub fn can_see_unpublished(policy: &dyn CapabilityPolicy) -> bool {
    policy.can(Capability::AccessBlogsUnpublished)
}

/// Single-item gate: an unpublished post is forbidden to callers without the
/// capability, whatever way it was addressed.
pub fn ensure_post_visible(
    policy: &dyn CapabilityPolicy,
    post: &BlogPost,
) -> Result<(), ContentError> {
    if post.published || can_see_unpublished(policy) {
        return Ok(());
    }

    tracing::debug!(post_id = post.id, "Unpublished post hidden from caller");
    Err(ContentError::Forbidden)
}
