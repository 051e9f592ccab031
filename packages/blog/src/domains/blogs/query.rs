//! Query Executor
//!
//! Turns a [`FilterCriteria`] into a page fetch plus an independent count.
//! Both statements are generated by the same predicate writer so they can
//! never disagree on what matches. User text is only ever pushed as a bind
//! parameter; identifiers come from whitelisted enums.

use anyhow::{Context, Result};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};

use crate::common::{Page, PageArgs};

use super::filters::{FieldValue, FilterCriteria};

pub struct ListingQuery<'c> {
    criteria: &'c FilterCriteria,
}

impl<'c> ListingQuery<'c> {
    pub fn new(criteria: &'c FilterCriteria) -> Self {
        Self { criteria }
    }

    pub fn build_select(&self, args: &PageArgs) -> QueryBuilder<'static, Postgres> {
        let mut qb = QueryBuilder::new("SELECT * FROM ");
        qb.push(self.criteria.collection.table());
        self.push_predicates(&mut qb);

        qb.push(" ORDER BY ");
        qb.push(self.criteria.order.to_sql());

        qb.push(" LIMIT ");
        qb.push_bind(args.limit);
        qb.push(" OFFSET ");
        qb.push_bind(args.offset);
        qb
    }

    pub fn build_count(&self) -> QueryBuilder<'static, Postgres> {
        let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM ");
        qb.push(self.criteria.collection.table());
        self.push_predicates(&mut qb);
        qb
    }

    /// AND-joined predicates; the search term is one OR group.
    fn push_predicates(&self, qb: &mut QueryBuilder<'static, Postgres>) {
        let criteria = self.criteria;
        let mut sep = " WHERE ";

        if let Some(term) = &criteria.search {
            let pattern = format!("%{}%", escape_like(term));
            qb.push(sep);
            qb.push("(");
            for (i, column) in criteria.collection.search_columns().iter().enumerate() {
                if i > 0 {
                    qb.push(" OR ");
                }
                qb.push(*column);
                qb.push(" ILIKE ");
                qb.push_bind(pattern.clone());
            }
            qb.push(")");
            sep = " AND ";
        }

        if let Some(show_in_lists) = criteria.show_in_lists {
            qb.push(sep);
            qb.push("show_in_lists = ");
            qb.push_bind(show_in_lists);
            sep = " AND ";
        }

        if criteria.collection.has_publish_gate() {
            if let Some(published) = criteria.published {
                qb.push(sep);
                qb.push("published = ");
                qb.push_bind(published);
                sep = " AND ";
            }
        }

        if let (Some(column), Some(parent_id)) =
            (criteria.collection.parent_column(), criteria.parent_id)
        {
            qb.push(sep);
            qb.push(column);
            qb.push(" = ");
            qb.push_bind(parent_id);
            sep = " AND ";
        }

        for field in &criteria.fields {
            if !field.applies_to(criteria.collection) {
                continue;
            }
            qb.push(sep);
            qb.push(field.column());
            qb.push(" = ");
            match field.value() {
                FieldValue::BigInt(v) => qb.push_bind(v),
                FieldValue::Int(v) => qb.push_bind(v),
                FieldValue::Text(v) => qb.push_bind(v.to_string()),
            };
            sep = " AND ";
        }
    }

    /// Page of rows followed by the total count under the same predicates.
    pub async fn fetch_page<T>(&self, args: &PageArgs, pool: &PgPool) -> Result<Page<T>>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        let mut select = self.build_select(args);
        let items = select
            .build_query_as::<T>()
            .fetch_all(pool)
            .await
            .with_context(|| format!("Failed to list {}", self.criteria.collection))?;

        let total_count = self.count(pool).await?;

        tracing::debug!(
            collection = %self.criteria.collection,
            limit = args.limit,
            offset = args.offset,
            returned = items.len(),
            total_count,
            "Listing fetched"
        );

        Ok(Page::new(items, total_count))
    }

    pub async fn count(&self, pool: &PgPool) -> Result<i64> {
        let mut count = self.build_count();
        let total: i64 = count
            .build_query_scalar()
            .fetch_one(pool)
            .await
            .with_context(|| format!("Failed to count {}", self.criteria.collection))?;
        Ok(total)
    }
}

/// Escape LIKE metacharacters so the term matches literally.
pub fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
