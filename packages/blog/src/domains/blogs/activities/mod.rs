//! Blog activities - entry-point business logic
//!
//! Activities take raw input and a [`Caller`], run capability checks, and
//! return plain models or a [`ContentError`].

pub mod blog_posts;
pub mod blogs;
pub mod latest;
pub mod publish_scheduled_posts;

pub use blog_posts::*;
pub use blogs::*;
pub use latest::*;
pub use publish_scheduled_posts::{
    publish_scheduled_posts, run_scheduled_publication, PublicationReport, PublishFailure,
};

use crate::common::{CapabilityPolicy, ContentError};

use super::access::ListingAccess;
use super::filters::{
    Collection, FilterCriteria, FilterCriteriaBuilder, ListingParams, RenderContext,
};
use super::models::{is_foreign_key_violation, is_unique_violation};

/// The caller's capabilities plus where the result will be rendered
#[derive(Clone, Copy)]
pub struct Caller<'a> {
    pub policy: &'a dyn CapabilityPolicy,
    pub render: RenderContext,
}

impl<'a> Caller<'a> {
    pub fn new(policy: &'a dyn CapabilityPolicy, render: RenderContext) -> Self {
        Self { policy, render }
    }

    pub fn html(policy: &'a dyn CapabilityPolicy) -> Self {
        Self::new(policy, RenderContext::Html)
    }

    pub fn api(policy: &'a dyn CapabilityPolicy) -> Self {
        Self::new(policy, RenderContext::Api)
    }
}

/// Gate, then build. `None` when the listing is refused.
pub(crate) fn listing_criteria(
    collection: Collection,
    params: &ListingParams,
    caller: &Caller<'_>,
) -> Option<FilterCriteria> {
    let access = ListingAccess::evaluate(caller.policy, collection, params);
    let criteria = FilterCriteriaBuilder::new(collection, caller.render).build(params);
    access.apply(criteria)
}

pub(crate) fn require_title(title: &str) -> Result<(), ContentError> {
    if title.trim().is_empty() {
        return Err(ContentError::Validation("title must not be blank".to_string()));
    }
    Ok(())
}

/// Constraint violations on save are caller mistakes, everything else is a store failure.
pub(crate) fn save_error(err: anyhow::Error) -> ContentError {
    if is_unique_violation(&err) {
        ContentError::Validation("slug already in use".to_string())
    } else if is_foreign_key_violation(&err) {
        ContentError::Validation("blog does not exist".to_string())
    } else {
        ContentError::Store(err)
    }
}
