use std::collections::{BTreeSet, HashMap};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, Transaction};

/// Blog editor - links a user to a blog they may edit
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct BlogEditor {
    pub blog_id: i64,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
}

/// Rows to add and remove to turn the stored editor set into the desired one
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditorDiff {
    pub added: Vec<i64>,
    pub removed: Vec<i64>,
}

impl EditorDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Compare current and desired editor ids. Duplicates collapse; output is sorted.
pub fn diff_editors(current: &[i64], desired: &[i64]) -> EditorDiff {
    let current: BTreeSet<i64> = current.iter().copied().collect();
    let desired: BTreeSet<i64> = desired.iter().copied().collect();

    EditorDiff {
        added: desired.difference(&current).copied().collect(),
        removed: current.difference(&desired).copied().collect(),
    }
}

impl BlogEditor {
    pub async fn find_user_ids(blog_id: i64, pool: &PgPool) -> Result<Vec<i64>> {
        let ids = sqlx::query_scalar::<_, i64>(
            "SELECT user_id FROM blog_editors WHERE blog_id = $1 ORDER BY user_id",
        )
        .bind(blog_id)
        .fetch_all(pool)
        .await?;
        Ok(ids)
    }

    /// Editor ids for several blogs at once, keyed by blog id.
    pub async fn find_for_blogs(blog_ids: &[i64], pool: &PgPool) -> Result<HashMap<i64, Vec<i64>>> {
        if blog_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query_as::<_, BlogEditor>(
            "SELECT * FROM blog_editors WHERE blog_id = ANY($1) ORDER BY blog_id, user_id",
        )
        .bind(blog_ids)
        .fetch_all(pool)
        .await?;

        let mut by_blog: HashMap<i64, Vec<i64>> = HashMap::new();
        for row in rows {
            by_blog.entry(row.blog_id).or_default().push(row.user_id);
        }
        Ok(by_blog)
    }

    /// Make the stored editor set equal `desired`, inside the caller's transaction.
    pub async fn replace_for_blog(
        blog_id: i64,
        desired: &[i64],
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<EditorDiff> {
        let current = sqlx::query_scalar::<_, i64>(
            "SELECT user_id FROM blog_editors WHERE blog_id = $1 FOR UPDATE",
        )
        .bind(blog_id)
        .fetch_all(&mut **tx)
        .await?;

        let diff = diff_editors(&current, desired);
        if diff.is_empty() {
            return Ok(diff);
        }

        if !diff.removed.is_empty() {
            sqlx::query("DELETE FROM blog_editors WHERE blog_id = $1 AND user_id = ANY($2)")
                .bind(blog_id)
                .bind(&diff.removed)
                .execute(&mut **tx)
                .await
                .context("Failed to remove blog editors")?;
        }

        if !diff.added.is_empty() {
            sqlx::query(
                r#"
                INSERT INTO blog_editors (blog_id, user_id)
                SELECT $1, user_id FROM UNNEST($2::BIGINT[]) AS user_id
                ON CONFLICT (blog_id, user_id) DO NOTHING
                "#,
            )
            .bind(blog_id)
            .bind(&diff.added)
            .execute(&mut **tx)
            .await
            .context("Failed to add blog editors")?;
        }

        Ok(diff)
    }
}
