//! Blog post listing, lookup, CRUD and manual publication

use tracing::{error, info};

use crate::common::{Actor, Capability, ContentError, Page, PageArgs};
use crate::domains::blogs::access::ensure_post_visible;
use crate::domains::blogs::filters::{Collection, ListingParams, RenderContext};
use crate::domains::blogs::models::{BlogPost, BlogPostChanges, NewBlogPost};
use crate::domains::blogs::query::ListingQuery;
use crate::kernel::BlogDeps;

use super::{listing_criteria, require_title, save_error, Caller};

/// Paged post listing behind the access gate. Store errors propagate.
pub async fn try_list_posts(
    params: &ListingParams,
    args: PageArgs,
    caller: &Caller<'_>,
    deps: &BlogDeps,
) -> Result<Page<BlogPost>, ContentError> {
    let Some(criteria) = listing_criteria(Collection::BlogPosts, params, caller) else {
        return Ok(Page::empty());
    };

    let mut page: Page<BlogPost> = ListingQuery::new(&criteria)
        .fetch_page(&args, &deps.db_pool)
        .await?;
    for post in &mut page.items {
        deps.links.hydrate_post(post);
    }

    Ok(page)
}

/// Best-effort listing for pages: a store failure is logged and shows as empty.
pub async fn list_posts(
    params: &ListingParams,
    args: PageArgs,
    caller: &Caller<'_>,
    deps: &BlogDeps,
) -> Page<BlogPost> {
    match try_list_posts(params, args, caller, deps).await {
        Ok(page) => page,
        Err(e) => {
            error!(error = %e, "Blog post listing failed, returning empty page");
            Page::empty()
        }
    }
}

pub async fn count_posts(
    params: &ListingParams,
    caller: &Caller<'_>,
    deps: &BlogDeps,
) -> Result<i64, ContentError> {
    let Some(criteria) = listing_criteria(Collection::BlogPosts, params, caller) else {
        return Ok(0);
    };
    Ok(ListingQuery::new(&criteria).count(&deps.db_pool).await?)
}

/// Post by id or url path.
///
/// API callers need `FindBlogPost`; public pages do not. `NotFound` when
/// nothing matches, `Forbidden` when the post is unpublished and the caller
/// may not see unpublished posts.
pub async fn find_post(
    id_or_slug: &str,
    caller: &Caller<'_>,
    deps: &BlogDeps,
) -> Result<BlogPost, ContentError> {
    if caller.render == RenderContext::Api {
        Actor::new(caller.policy)
            .can(Capability::FindBlogPost)
            .check()?;
    }

    let mut post = BlogPost::find_one(id_or_slug, &deps.db_pool)
        .await?
        .ok_or(ContentError::NotFound)?;
    ensure_post_visible(caller.policy, &post)?;

    deps.links.hydrate_post(&mut post);
    Ok(post)
}

pub async fn create_post(
    input: NewBlogPost,
    caller: &Caller<'_>,
    deps: &BlogDeps,
) -> Result<BlogPost, ContentError> {
    Actor::new(caller.policy)
        .can(Capability::CreateBlogPost)
        .check()?;
    require_title(&input.title)?;

    let mut post = BlogPost::from(input);
    post.save(&deps.db_pool).await.map_err(save_error)?;
    deps.links.hydrate_post(&mut post);

    info!(
        post_id = post.id,
        blog_id = ?post.blog_id,
        published = post.published,
        scheduled_at = ?post.scheduled_at,
        "Blog post created"
    );
    Ok(post)
}

pub async fn update_post(
    post_id: i64,
    changes: BlogPostChanges,
    caller: &Caller<'_>,
    deps: &BlogDeps,
) -> Result<BlogPost, ContentError> {
    Actor::new(caller.policy)
        .can(Capability::UpdateBlogPost)
        .check()?;

    let mut post = BlogPost::find_by_id(post_id, &deps.db_pool)
        .await?
        .ok_or(ContentError::NotFound)?;

    changes.apply_to(&mut post);
    require_title(&post.title)?;

    post.save(&deps.db_pool).await.map_err(save_error)?;
    deps.links.hydrate_post(&mut post);

    info!(post_id = post.id, published = post.published, "Blog post updated");
    Ok(post)
}

pub async fn delete_post(
    post_id: i64,
    caller: &Caller<'_>,
    deps: &BlogDeps,
) -> Result<(), ContentError> {
    Actor::new(caller.policy)
        .can(Capability::DeleteBlogPost)
        .check()?;

    let deleted = BlogPost::delete(post_id, &deps.db_pool).await?;
    if deleted == 0 {
        return Err(ContentError::NotFound);
    }

    info!(post_id, "Blog post deleted");
    Ok(())
}

/// Publish now. Publishing an already published post changes nothing.
pub async fn publish_post(
    post_id: i64,
    caller: &Caller<'_>,
    deps: &BlogDeps,
) -> Result<BlogPost, ContentError> {
    Actor::new(caller.policy)
        .can(Capability::UpdateBlogPost)
        .check()?;

    let mut post = BlogPost::find_by_id(post_id, &deps.db_pool)
        .await?
        .ok_or(ContentError::NotFound)?;

    let changed = post.publish(&deps.db_pool).await?;
    deps.links.hydrate_post(&mut post);

    info!(post_id, changed, published_at = ?post.published_at, "Blog post published");
    Ok(post)
}

/// Take a post offline and cancel its schedule.
pub async fn unpublish_post(
    post_id: i64,
    caller: &Caller<'_>,
    deps: &BlogDeps,
) -> Result<BlogPost, ContentError> {
    Actor::new(caller.policy)
        .can(Capability::UpdateBlogPost)
        .check()?;

    let mut post = BlogPost::find_by_id(post_id, &deps.db_pool)
        .await?
        .ok_or(ContentError::NotFound)?;

    post.unpublish(&deps.db_pool).await?;
    deps.links.hydrate_post(&mut post);

    info!(post_id, "Blog post unpublished");
    Ok(post)
}
