//! "Latest" blocks for the home page and blog teasers.
//!
//! Read paths: failures are logged and render as an empty block.

use tracing::error;

use crate::domains::blogs::models::{Blog, BlogPost};
use crate::kernel::BlogDeps;

/// Posts shown in the home page block when no limit is given
pub const DEFAULT_LATEST_POSTS: i64 = 4;

pub async fn latest_blogs(limit: i64, deps: &BlogDeps) -> Vec<Blog> {
    match Blog::find_latest(limit.max(0), &deps.db_pool).await {
        Ok(mut blogs) => {
            blogs.iter_mut().for_each(|b| deps.links.hydrate_blog(b));
            blogs
        }
        Err(e) => {
            error!(error = %e, "Failed to load latest blogs");
            Vec::new()
        }
    }
}

/// Latest published posts across all blogs
pub async fn latest_posts(limit: Option<i64>, deps: &BlogDeps) -> Vec<BlogPost> {
    let limit = limit.unwrap_or(DEFAULT_LATEST_POSTS).max(0);
    match BlogPost::find_latest_published(limit, &deps.db_pool).await {
        Ok(posts) => hydrate(posts, deps),
        Err(e) => {
            error!(error = %e, "Failed to load latest posts");
            Vec::new()
        }
    }
}

/// Latest published posts of one blog
pub async fn latest_posts_for_blog(
    blog_id: i64,
    limit: Option<i64>,
    deps: &BlogDeps,
) -> Vec<BlogPost> {
    let limit = limit.unwrap_or(DEFAULT_LATEST_POSTS).max(0);
    match BlogPost::find_latest_for_blog(blog_id, limit, &deps.db_pool).await {
        Ok(posts) => hydrate(posts, deps),
        Err(e) => {
            error!(blog_id, error = %e, "Failed to load latest posts for blog");
            Vec::new()
        }
    }
}

fn hydrate(mut posts: Vec<BlogPost>, deps: &BlogDeps) -> Vec<BlogPost> {
    posts.iter_mut().for_each(|p| deps.links.hydrate_post(p));
    posts
}
