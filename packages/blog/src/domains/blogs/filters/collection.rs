use serde::Serialize;

use super::order::{OrderSpec, OrderTerm, SortColumn, SortDirection};

/// The two listable collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Blogs,
    BlogPosts,
}

impl Collection {
    pub fn table(&self) -> &'static str {
        match self {
            Collection::Blogs => "blogs",
            Collection::BlogPosts => "blog_posts",
        }
    }

    /// Columns matched by the free-text search
    pub fn search_columns(&self) -> &'static [&'static str] {
        match self {
            Collection::Blogs => &["title", "description"],
            Collection::BlogPosts => &["title", "body"],
        }
    }

    /// Only posts carry a publication state.
    pub fn has_publish_gate(&self) -> bool {
        matches!(self, Collection::BlogPosts)
    }

    /// Column used by the parent (blog) filter, if the collection has one
    pub fn parent_column(&self) -> Option<&'static str> {
        match self {
            Collection::Blogs => None,
            Collection::BlogPosts => Some("blog_id"),
        }
    }

    /// Whether `column` exists on this collection.
    pub fn supports(&self, column: SortColumn) -> bool {
        match column {
            SortColumn::PublishedAt | SortColumn::Highlighted => {
                matches!(self, Collection::BlogPosts)
            }
            _ => true,
        }
    }

    pub fn default_order(&self) -> OrderSpec {
        match self {
            Collection::Blogs => OrderSpec::from_terms(vec![OrderTerm::new(
                SortColumn::CreatedAt,
                SortDirection::Desc,
            )]),
            Collection::BlogPosts => OrderSpec::from_terms(vec![
                OrderTerm::new(SortColumn::Highlighted, SortDirection::Desc),
                OrderTerm::new(SortColumn::PublishedAt, SortDirection::Desc),
            ]),
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.table())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn posts_only_columns() {
        assert!(!Collection::Blogs.supports(SortColumn::PublishedAt));
        assert!(!Collection::Blogs.supports(SortColumn::Highlighted));
        assert!(Collection::BlogPosts.supports(SortColumn::PublishedAt));
        assert!(Collection::Blogs.supports(SortColumn::Title));
    }

    #[test]
    fn default_orders_end_with_id() {
        assert_eq!(
            Collection::Blogs.default_order().to_sql(),
            "created_at DESC, id DESC"
        );
        assert_eq!(
            Collection::BlogPosts.default_order().to_sql(),
            "highlighted DESC, published_at DESC NULLS LAST, id DESC"
        );
    }
}
