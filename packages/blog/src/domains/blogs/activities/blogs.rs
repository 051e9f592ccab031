//! Blog listing, lookup and CRUD

use tracing::{error, info};

use crate::common::{Actor, Capability, ContentError, Page, PageArgs};
use crate::domains::blogs::filters::{Collection, ListingParams};
use crate::domains::blogs::models::{Blog, BlogChanges, BlogEditor, NewBlog};
use crate::domains::blogs::query::ListingQuery;
use crate::kernel::BlogDeps;

use super::{listing_criteria, require_title, save_error, Caller};

/// Paged blog listing. Store errors propagate.
pub async fn try_list_blogs(
    params: &ListingParams,
    args: PageArgs,
    caller: &Caller<'_>,
    deps: &BlogDeps,
) -> Result<Page<Blog>, ContentError> {
    let Some(criteria) = listing_criteria(Collection::Blogs, params, caller) else {
        return Ok(Page::empty());
    };

    let mut page: Page<Blog> = ListingQuery::new(&criteria)
        .fetch_page(&args, &deps.db_pool)
        .await?;

    let ids: Vec<i64> = page.items.iter().map(|b| b.id).collect();
    let mut editors = BlogEditor::find_for_blogs(&ids, &deps.db_pool).await?;
    for blog in &mut page.items {
        blog.editors = editors.remove(&blog.id).unwrap_or_default();
        deps.links.hydrate_blog(blog);
    }

    Ok(page)
}

/// Best-effort listing for pages: a store failure is logged and shows as empty.
pub async fn list_blogs(
    params: &ListingParams,
    args: PageArgs,
    caller: &Caller<'_>,
    deps: &BlogDeps,
) -> Page<Blog> {
    match try_list_blogs(params, args, caller, deps).await {
        Ok(page) => page,
        Err(e) => {
            error!(error = %e, "Blog listing failed, returning empty page");
            Page::empty()
        }
    }
}

pub async fn count_blogs(
    params: &ListingParams,
    caller: &Caller<'_>,
    deps: &BlogDeps,
) -> Result<i64, ContentError> {
    let Some(criteria) = listing_criteria(Collection::Blogs, params, caller) else {
        return Ok(0);
    };
    Ok(ListingQuery::new(&criteria).count(&deps.db_pool).await?)
}

/// Blog by id or unique path, editors and permanent link loaded
pub async fn find_blog(id_or_slug: &str, deps: &BlogDeps) -> Result<Blog, ContentError> {
    let mut blog = Blog::find_one(id_or_slug, &deps.db_pool)
        .await?
        .ok_or(ContentError::NotFound)?;
    deps.links.hydrate_blog(&mut blog);
    Ok(blog)
}

pub async fn create_blog(
    input: NewBlog,
    caller: &Caller<'_>,
    deps: &BlogDeps,
) -> Result<Blog, ContentError> {
    Actor::new(caller.policy).can(Capability::CreateBlog).check()?;
    require_title(&input.title)?;

    let mut blog = Blog::from(input);
    blog.save(&deps.db_pool).await.map_err(save_error)?;
    deps.links.hydrate_blog(&mut blog);

    info!(blog_id = blog.id, editors = blog.editors.len(), "Blog created");
    Ok(blog)
}

/// Apply changes to an existing blog. A supplied editor list replaces the
/// stored one wholesale.
pub async fn update_blog(
    blog_id: i64,
    changes: BlogChanges,
    caller: &Caller<'_>,
    deps: &BlogDeps,
) -> Result<Blog, ContentError> {
    Actor::new(caller.policy).can(Capability::UpdateBlog).check()?;

    let mut blog = Blog::find_by_id(blog_id, &deps.db_pool)
        .await?
        .ok_or(ContentError::NotFound)?;
    blog.editors = BlogEditor::find_user_ids(blog.id, &deps.db_pool).await?;

    changes.apply_to(&mut blog);
    require_title(&blog.title)?;

    blog.save(&deps.db_pool).await.map_err(save_error)?;
    deps.links.hydrate_blog(&mut blog);

    info!(blog_id = blog.id, "Blog updated");
    Ok(blog)
}

/// Hard delete. Editor rows go with it; posts stay and lose their blog.
pub async fn delete_blog(
    blog_id: i64,
    caller: &Caller<'_>,
    deps: &BlogDeps,
) -> Result<(), ContentError> {
    Actor::new(caller.policy).can(Capability::DeleteBlog).check()?;

    let deleted = Blog::delete(blog_id, &deps.db_pool).await?;
    if deleted == 0 {
        return Err(ContentError::NotFound);
    }

    info!(blog_id, "Blog deleted");
    Ok(())
}
