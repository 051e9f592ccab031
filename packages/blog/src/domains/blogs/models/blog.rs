use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use typed_builder::TypedBuilder;

use super::{normalize_slug, BlogEditor};

/// Blog slugs are capped so generated aliases stay short.
pub const BLOG_SLUG_MAX_CHARS: usize = 60;

/// Blog - a named collection of posts with a set of editors
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Blog {
    /// 0 until the row is inserted
    pub id: i64,
    pub title: String,
    pub description: String,
    pub description_small: String,
    pub url_unique_path: Option<String>,
    pub show_in_lists: bool,
    pub creator_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    /// Editor user ids (blog_editors rows)
    #[sqlx(skip)]
    #[serde(default)]
    pub editors: Vec<i64>,

    #[sqlx(skip)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_permanent: Option<String>,
}

// =============================================================================
// Creation / update parameter structs
// =============================================================================

#[derive(Debug, Clone, TypedBuilder)]
#[builder(field_defaults(setter(into)))]
pub struct NewBlog {
    pub title: String,
    #[builder(default)]
    pub description: String,
    #[builder(default)]
    pub description_small: String,
    #[builder(default)]
    pub url_unique_path: Option<String>,
    #[builder(default = true)]
    pub show_in_lists: bool,
    #[builder(default)]
    pub creator_id: Option<i64>,
    #[builder(default)]
    pub editors: Vec<i64>,
}

/// Partial update; `None` keeps the stored value.
///
/// `editors`, when set, replaces the whole editor set (last write wins).
#[derive(Debug, Clone, Default)]
pub struct BlogChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub description_small: Option<String>,
    pub url_unique_path: Option<Option<String>>,
    pub show_in_lists: Option<bool>,
    pub editors: Option<Vec<i64>>,
}

impl Default for Blog {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            title: String::new(),
            description: String::new(),
            description_small: String::new(),
            url_unique_path: None,
            show_in_lists: true,
            creator_id: None,
            created_at: now,
            updated_at: now,
            editors: Vec::new(),
            link_permanent: None,
        }
    }
}

impl From<NewBlog> for Blog {
    fn from(input: NewBlog) -> Self {
        Self {
            title: input.title,
            description: input.description,
            description_small: input.description_small,
            url_unique_path: input.url_unique_path,
            show_in_lists: input.show_in_lists,
            creator_id: input.creator_id,
            editors: input.editors,
            ..Self::default()
        }
    }
}

impl BlogChanges {
    pub fn apply_to(self, blog: &mut Blog) {
        if let Some(title) = self.title {
            blog.title = title;
        }
        if let Some(description) = self.description {
            blog.description = description;
        }
        if let Some(description_small) = self.description_small {
            blog.description_small = description_small;
        }
        if let Some(url_unique_path) = self.url_unique_path {
            blog.url_unique_path = url_unique_path;
        }
        if let Some(show_in_lists) = self.show_in_lists {
            blog.show_in_lists = show_in_lists;
        }
        if let Some(editors) = self.editors {
            blog.editors = editors;
        }
    }
}

// =============================================================================
// SQL Queries
// =============================================================================

impl Blog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_persisted(&self) -> bool {
        self.id != 0
    }

    /// Relative path, empty for unsaved records
    pub fn path(&self) -> String {
        if self.is_persisted() {
            format!("/blog/{}", self.id)
        } else {
            String::new()
        }
    }

    pub fn refresh_slug(&mut self) {
        self.url_unique_path =
            normalize_slug(self.url_unique_path.take(), Some(BLOG_SLUG_MAX_CHARS));
    }

    pub async fn find_by_id(id: i64, pool: &PgPool) -> Result<Option<Self>> {
        let blog = sqlx::query_as::<_, Blog>("SELECT * FROM blogs WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(blog)
    }

    /// Find one blog by numeric id or unique path, editors included.
    ///
    /// Returns `None` when nothing matches.
    pub async fn find_one(id_or_slug: &str, pool: &PgPool) -> Result<Option<Self>> {
        let id = id_or_slug.trim().parse::<i64>().ok();

        let blog = sqlx::query_as::<_, Blog>(
            "SELECT * FROM blogs WHERE id = $1 OR url_unique_path = $2 ORDER BY id ASC LIMIT 1",
        )
        .bind(id)
        .bind(id_or_slug)
        .fetch_optional(pool)
        .await
        .context("Failed to find blog")?;

        match blog {
            Some(mut blog) => {
                blog.editors = BlogEditor::find_user_ids(blog.id, pool).await?;
                Ok(Some(blog))
            }
            None => Ok(None),
        }
    }

    /// Latest blogs, newest first
    pub async fn find_latest(limit: i64, pool: &PgPool) -> Result<Vec<Self>> {
        let blogs = sqlx::query_as::<_, Blog>(
            "SELECT * FROM blogs ORDER BY created_at DESC, id DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(pool)
        .await?;
        Ok(blogs)
    }

    /// Insert when unsaved, update otherwise. The editor set is reconciled in
    /// the same transaction.
    pub async fn save(&mut self, pool: &PgPool) -> Result<()> {
        self.refresh_slug();

        let mut tx = pool.begin().await?;

        let saved = if self.is_persisted() {
            sqlx::query_as::<_, Blog>(
                r#"
                UPDATE blogs
                SET
                    title = $2,
                    description = $3,
                    description_small = $4,
                    url_unique_path = $5,
                    show_in_lists = $6,
                    updated_at = NOW()
                WHERE id = $1
                RETURNING *
                "#,
            )
            .bind(self.id)
            .bind(&self.title)
            .bind(&self.description)
            .bind(&self.description_small)
            .bind(&self.url_unique_path)
            .bind(self.show_in_lists)
            .fetch_one(&mut *tx)
            .await
            .with_context(|| format!("Failed to update blog {}", self.id))?
        } else {
            sqlx::query_as::<_, Blog>(
                r#"
                INSERT INTO blogs (
                    title,
                    description,
                    description_small,
                    url_unique_path,
                    show_in_lists,
                    creator_id
                ) VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING *
                "#,
            )
            .bind(&self.title)
            .bind(&self.description)
            .bind(&self.description_small)
            .bind(&self.url_unique_path)
            .bind(self.show_in_lists)
            .bind(self.creator_id)
            .fetch_one(&mut *tx)
            .await
            .context("Failed to insert blog")?
        };

        let diff = BlogEditor::replace_for_blog(saved.id, &self.editors, &mut tx).await?;

        tx.commit().await?;

        tracing::debug!(
            blog_id = saved.id,
            editors_added = diff.added.len(),
            editors_removed = diff.removed.len(),
            "Blog saved"
        );

        let editors = std::mem::take(&mut self.editors);
        *self = Blog {
            editors: normalize_editor_ids(editors),
            link_permanent: self.link_permanent.take(),
            ..saved
        };

        Ok(())
    }

    /// Hard delete; editor rows cascade, posts are detached.
    pub async fn delete(id: i64, pool: &PgPool) -> Result<u64> {
        let result = sqlx::query("DELETE FROM blogs WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}

fn normalize_editor_ids(mut ids: Vec<i64>) -> Vec<i64> {
    ids.sort_unstable();
    ids.dedup();
    ids
}
