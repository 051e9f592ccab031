use anyhow::{Context, Result};
use chrono::{DateTime, Duration, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use typed_builder::TypedBuilder;

use super::normalize_slug;

/// Posts scheduled up to this far ahead are published by the current run.
pub const PUBLISH_LOOK_AHEAD: Duration = Duration::minutes(1);

/// Latest scheduled time a publication run at `now` picks up.
pub fn due_cutoff(now: DateTime<Utc>) -> DateTime<Utc> {
    now + PUBLISH_LOOK_AHEAD
}

/// Blog post - an article, optionally attached to a blog.
///
/// `published` and `published_at` always move together: a post is published
/// exactly when it carries a publication time. `scheduled_at` is the requested
/// publication time for posts that are not live yet.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    pub id: i64,
    pub title: String,
    pub teaser: String,
    pub body: String,
    pub published: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub highlighted: i32,
    pub allow_comments: bool,
    pub in_rss: bool,
    pub url_path: Option<String>,
    pub show_in_lists: bool,
    pub creator_id: Option<i64>,
    pub blog_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    #[sqlx(skip)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_permanent: Option<String>,
}

// =============================================================================
// Creation / update parameter structs
// =============================================================================

#[derive(Debug, Clone, TypedBuilder)]
#[builder(field_defaults(setter(into)))]
pub struct NewBlogPost {
    pub title: String,
    #[builder(default)]
    pub teaser: String,
    #[builder(default)]
    pub body: String,
    #[builder(default)]
    pub published: bool,
    #[builder(default)]
    pub scheduled_at: Option<DateTime<Utc>>,
    #[builder(default)]
    pub highlighted: i32,
    #[builder(default = true)]
    pub allow_comments: bool,
    #[builder(default)]
    pub in_rss: bool,
    #[builder(default)]
    pub url_path: Option<String>,
    #[builder(default = true)]
    pub show_in_lists: bool,
    #[builder(default)]
    pub creator_id: Option<i64>,
    #[builder(default)]
    pub blog_id: Option<i64>,
}

/// Partial update; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct BlogPostChanges {
    pub title: Option<String>,
    pub teaser: Option<String>,
    pub body: Option<String>,
    pub published: Option<bool>,
    pub scheduled_at: Option<Option<DateTime<Utc>>>,
    pub highlighted: Option<i32>,
    pub allow_comments: Option<bool>,
    pub in_rss: Option<bool>,
    pub url_path: Option<Option<String>>,
    pub show_in_lists: Option<bool>,
    pub blog_id: Option<Option<i64>>,
}

impl Default for BlogPost {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            title: String::new(),
            teaser: String::new(),
            body: String::new(),
            published: false,
            published_at: None,
            scheduled_at: None,
            highlighted: 0,
            allow_comments: true,
            in_rss: false,
            url_path: None,
            show_in_lists: true,
            creator_id: None,
            blog_id: None,
            created_at: now,
            updated_at: now,
            link_permanent: None,
        }
    }
}

impl From<NewBlogPost> for BlogPost {
    fn from(input: NewBlogPost) -> Self {
        Self {
            title: input.title,
            teaser: input.teaser,
            body: input.body,
            published: input.published,
            scheduled_at: input.scheduled_at,
            highlighted: input.highlighted,
            allow_comments: input.allow_comments,
            in_rss: input.in_rss,
            url_path: input.url_path,
            show_in_lists: input.show_in_lists,
            creator_id: input.creator_id,
            blog_id: input.blog_id,
            ..Self::default()
        }
    }
}

impl BlogPostChanges {
    pub fn apply_to(self, post: &mut BlogPost) {
        if let Some(title) = self.title {
            post.title = title;
        }
        if let Some(teaser) = self.teaser {
            post.teaser = teaser;
        }
        if let Some(body) = self.body {
            post.body = body;
        }
        if let Some(published) = self.published {
            post.published = published;
        }
        if let Some(scheduled_at) = self.scheduled_at {
            post.scheduled_at = scheduled_at;
        }
        if let Some(highlighted) = self.highlighted {
            post.highlighted = highlighted;
        }
        if let Some(allow_comments) = self.allow_comments {
            post.allow_comments = allow_comments;
        }
        if let Some(in_rss) = self.in_rss {
            post.in_rss = in_rss;
        }
        if let Some(url_path) = self.url_path {
            post.url_path = url_path;
        }
        if let Some(show_in_lists) = self.show_in_lists {
            post.show_in_lists = show_in_lists;
        }
        if let Some(blog_id) = self.blog_id {
            post.blog_id = blog_id;
        }
    }
}

/// Postgres stores microseconds; truncating keeps in-memory and stored values equal.
pub(crate) fn db_now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

impl BlogPost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_persisted(&self) -> bool {
        self.id != 0
    }

    pub fn path(&self) -> String {
        if self.is_persisted() {
            format!("/blog-post/{}", self.id)
        } else {
            String::new()
        }
    }

    /// Bring the publication fields into agreement before a write.
    ///
    /// Published without a time gets `now`; unpublished drops any stale time.
    pub fn normalize_for_save(&mut self, now: DateTime<Utc>) {
        self.url_path = normalize_slug(self.url_path.take(), None);

        if self.published {
            if self.published_at.is_none() {
                self.published_at = Some(now);
            }
        } else {
            self.published_at = None;
        }
    }

    /// True when the post is unpublished and scheduled at or before `due_before`.
    pub fn is_due(&self, due_before: DateTime<Utc>) -> bool {
        !self.published && self.scheduled_at.is_some_and(|at| at <= due_before)
    }

    // =========================================================================
    // SQL Queries
    // =========================================================================

    pub async fn find_by_id(id: i64, pool: &PgPool) -> Result<Option<Self>> {
        let post = sqlx::query_as::<_, BlogPost>("SELECT * FROM blog_posts WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(post)
    }

    /// Find one post by numeric id or url path
    pub async fn find_one(id_or_slug: &str, pool: &PgPool) -> Result<Option<Self>> {
        let id = id_or_slug.trim().parse::<i64>().ok();

        let post = sqlx::query_as::<_, BlogPost>(
            "SELECT * FROM blog_posts WHERE id = $1 OR url_path = $2 ORDER BY id ASC LIMIT 1",
        )
        .bind(id)
        .bind(id_or_slug)
        .fetch_optional(pool)
        .await
        .context("Failed to find blog post")?;
        Ok(post)
    }

    /// Latest published posts across all blogs
    pub async fn find_latest_published(limit: i64, pool: &PgPool) -> Result<Vec<Self>> {
        let posts = sqlx::query_as::<_, BlogPost>(
            r#"
            SELECT * FROM blog_posts
            WHERE published = TRUE
            ORDER BY published_at DESC, id DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(pool)
        .await?;
        Ok(posts)
    }

    /// Latest published posts of one blog
    pub async fn find_latest_for_blog(
        blog_id: i64,
        limit: i64,
        pool: &PgPool,
    ) -> Result<Vec<Self>> {
        let posts = sqlx::query_as::<_, BlogPost>(
            r#"
            SELECT * FROM blog_posts
            WHERE published = TRUE AND blog_id = $1
            ORDER BY published_at DESC, id DESC
            LIMIT $2
            "#,
        )
        .bind(blog_id)
        .bind(limit)
        .fetch_all(pool)
        .await?;
        Ok(posts)
    }

    /// Unpublished posts whose scheduled time is at or before `due_before`,
    /// oldest first.
    pub async fn find_due_for_publication(
        due_before: DateTime<Utc>,
        limit: i64,
        pool: &PgPool,
    ) -> Result<Vec<Self>> {
        let posts = sqlx::query_as::<_, BlogPost>(
            r#"
            SELECT * FROM blog_posts
            WHERE published = FALSE
              AND scheduled_at IS NOT NULL
              AND scheduled_at <= $1
            ORDER BY created_at ASC, id ASC
            LIMIT $2
            "#,
        )
        .bind(due_before)
        .bind(limit)
        .fetch_all(pool)
        .await?;
        Ok(posts)
    }

    /// Insert when unsaved, update otherwise.
    pub async fn save(&mut self, pool: &PgPool) -> Result<()> {
        self.normalize_for_save(db_now());

        let saved = if self.is_persisted() {
            sqlx::query_as::<_, BlogPost>(
                r#"
                UPDATE blog_posts
                SET
                    title = $2,
                    teaser = $3,
                    body = $4,
                    published = $5,
                    published_at = $6,
                    scheduled_at = $7,
                    highlighted = $8,
                    allow_comments = $9,
                    in_rss = $10,
                    url_path = $11,
                    show_in_lists = $12,
                    blog_id = $13,
                    updated_at = NOW()
                WHERE id = $1
                RETURNING *
                "#,
            )
            .bind(self.id)
            .bind(&self.title)
            .bind(&self.teaser)
            .bind(&self.body)
            .bind(self.published)
            .bind(self.published_at)
            .bind(self.scheduled_at)
            .bind(self.highlighted)
            .bind(self.allow_comments)
            .bind(self.in_rss)
            .bind(&self.url_path)
            .bind(self.show_in_lists)
            .bind(self.blog_id)
            .fetch_one(pool)
            .await
            .with_context(|| format!("Failed to update blog post {}", self.id))?
        } else {
            sqlx::query_as::<_, BlogPost>(
                r#"
                INSERT INTO blog_posts (
                    title,
                    teaser,
                    body,
                    published,
                    published_at,
                    scheduled_at,
                    highlighted,
                    allow_comments,
                    in_rss,
                    url_path,
                    show_in_lists,
                    creator_id,
                    blog_id
                ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
                RETURNING *
                "#,
            )
            .bind(&self.title)
            .bind(&self.teaser)
            .bind(&self.body)
            .bind(self.published)
            .bind(self.published_at)
            .bind(self.scheduled_at)
            .bind(self.highlighted)
            .bind(self.allow_comments)
            .bind(self.in_rss)
            .bind(&self.url_path)
            .bind(self.show_in_lists)
            .bind(self.creator_id)
            .bind(self.blog_id)
            .fetch_one(pool)
            .await
            .context("Failed to insert blog post")?
        };

        *self = BlogPost {
            link_permanent: self.link_permanent.take(),
            ..saved
        };
        Ok(())
    }

    /// Publish now. Returns `false` without writing when the post is already
    /// published, so repeated calls keep the first publication time.
    pub async fn publish(&mut self, pool: &PgPool) -> Result<bool> {
        if self.published {
            return Ok(false);
        }

        let updated = sqlx::query_as::<_, BlogPost>(
            r#"
            UPDATE blog_posts
            SET published = TRUE, published_at = $2, updated_at = NOW()
            WHERE id = $1 AND published = FALSE
            RETURNING *
            "#,
        )
        .bind(self.id)
        .bind(db_now())
        .fetch_optional(pool)
        .await
        .with_context(|| format!("Failed to publish blog post {}", self.id))?;

        match updated {
            Some(post) => {
                *self = BlogPost {
                    link_permanent: self.link_permanent.take(),
                    ..post
                };
                Ok(true)
            }
            None => {
                // Someone else got there first; pick up the stored state.
                if let Some(current) = Self::find_by_id(self.id, pool).await? {
                    *self = BlogPost {
                        link_permanent: self.link_permanent.take(),
                        ..current
                    };
                }
                Ok(false)
            }
        }
    }

    /// Take the post offline and drop any pending schedule.
    pub async fn unpublish(&mut self, pool: &PgPool) -> Result<()> {
        let updated = sqlx::query_as::<_, BlogPost>(
            r#"
            UPDATE blog_posts
            SET published = FALSE, published_at = NULL, scheduled_at = NULL, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(self.id)
        .fetch_one(pool)
        .await
        .with_context(|| format!("Failed to unpublish blog post {}", self.id))?;

        *self = BlogPost {
            link_permanent: self.link_permanent.take(),
            ..updated
        };
        Ok(())
    }

    pub async fn delete(id: i64, pool: &PgPool) -> Result<u64> {
        let result = sqlx::query("DELETE FROM blog_posts WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
