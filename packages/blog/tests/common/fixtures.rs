//! Test fixtures for creating test data.
//!
//! Fixtures go through the model methods directly, skipping capability checks.

use anyhow::Result;
use blog_core::common::{Capability, GrantedCapabilities};
use blog_core::domains::blogs::models::{Blog, BlogPost, NewBlog, NewBlogPost};
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::atomic::{AtomicU64, Ordering};

static COUNTER: AtomicU64 = AtomicU64::new(0);

/// Token unique within the run, for scoping searches and slugs
pub fn unique_token(prefix: &str) -> String {
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    let nanos = Utc::now().timestamp_nanos_opt().unwrap_or_default();
    format!("{prefix}{nanos:x}{n}")
}

/// Policy of an anonymous visitor who may read published posts
pub fn visitor() -> GrantedCapabilities {
    GrantedCapabilities::none().with(Capability::FindBlogPost)
}

/// Policy of a full editor
pub fn editor() -> GrantedCapabilities {
    GrantedCapabilities::all()
}

pub async fn insert_blog(pool: &PgPool, title: &str) -> Result<Blog> {
    let mut blog: Blog = NewBlog::builder().title(title).build().into();
    blog.save(pool).await?;
    Ok(blog)
}

pub async fn insert_blog_with_editors(
    pool: &PgPool,
    title: &str,
    editors: Vec<i64>,
) -> Result<Blog> {
    let mut blog: Blog = NewBlog::builder().title(title).editors(editors).build().into();
    blog.save(pool).await?;
    Ok(blog)
}

pub async fn insert_post(
    pool: &PgPool,
    blog_id: i64,
    title: &str,
    body: &str,
    published: bool,
) -> Result<BlogPost> {
    let mut post: BlogPost = NewBlogPost::builder()
        .title(title)
        .body(body)
        .published(published)
        .blog_id(Some(blog_id))
        .build()
        .into();
    post.save(pool).await?;
    Ok(post)
}

pub async fn insert_scheduled_post(
    pool: &PgPool,
    blog_id: i64,
    title: &str,
    scheduled_at: DateTime<Utc>,
) -> Result<BlogPost> {
    let mut post: BlogPost = NewBlogPost::builder()
        .title(title)
        .scheduled_at(Some(scheduled_at))
        .blog_id(Some(blog_id))
        .build()
        .into();
    post.save(pool).await?;
    Ok(post)
}

pub async fn set_highlighted(pool: &PgPool, post_id: i64, highlighted: i32) -> Result<()> {
    sqlx::query("UPDATE blog_posts SET highlighted = $2 WHERE id = $1")
        .bind(post_id)
        .bind(highlighted)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn set_show_in_lists(pool: &PgPool, post_id: i64, show: bool) -> Result<()> {
    sqlx::query("UPDATE blog_posts SET show_in_lists = $2 WHERE id = $1")
        .bind(post_id)
        .bind(show)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn set_published_at(pool: &PgPool, post_id: i64, at: DateTime<Utc>) -> Result<()> {
    sqlx::query("UPDATE blog_posts SET published_at = $2 WHERE id = $1 AND published")
        .bind(post_id)
        .bind(at)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn set_blog_created_at(pool: &PgPool, blog_id: i64, at: DateTime<Utc>) -> Result<()> {
    sqlx::query("UPDATE blogs SET created_at = $2 WHERE id = $1")
        .bind(blog_id)
        .bind(at)
        .execute(pool)
        .await?;
    Ok(())
}
