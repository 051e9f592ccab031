use serde::Deserialize;

use super::collection::Collection;
use super::fields::{field_filters, FieldFilter};
use super::order::OrderSpec;

/// Who is rendering the listing. HTML pages hide unlisted items by default,
/// API consumers see everything unless they ask otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderContext {
    #[default]
    Html,
    Api,
}

/// Raw, untrusted listing parameters as received from the HTTP layer
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingParams {
    pub q: Option<String>,
    pub order: Option<String>,
    pub show_in_lists: Option<String>,
    pub blog_id: Option<String>,
    pub published: Option<String>,
    pub id: Option<String>,
    pub title: Option<String>,
    pub teaser: Option<String>,
    pub body: Option<String>,
    pub highlighted: Option<String>,
    pub url_path: Option<String>,
    pub description_small: Option<String>,
}

impl ListingParams {
    /// True when the caller sent a `published` value at all.
    pub fn requests_publish_filter(&self) -> bool {
        self.published
            .as_deref()
            .is_some_and(|p| !p.trim().is_empty())
    }
}

/// Validated listing filter. Every field is typed; free text is only ever bound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCriteria {
    pub collection: Collection,
    /// Case-insensitive substring match on the collection's search columns
    pub search: Option<String>,
    pub show_in_lists: Option<bool>,
    pub published: Option<bool>,
    pub parent_id: Option<i64>,
    /// Exact-match column filters, AND-joined
    pub fields: Vec<FieldFilter>,
    pub order: OrderSpec,
}

impl FilterCriteria {
    /// No predicates, default order
    pub fn unfiltered(collection: Collection) -> Self {
        Self {
            collection,
            search: None,
            show_in_lists: None,
            published: None,
            parent_id: None,
            fields: Vec::new(),
            order: collection.default_order(),
        }
    }
}

pub struct FilterCriteriaBuilder {
    collection: Collection,
    render: RenderContext,
}

impl FilterCriteriaBuilder {
    pub fn new(collection: Collection, render: RenderContext) -> Self {
        Self { collection, render }
    }

    pub fn build(&self, params: &ListingParams) -> FilterCriteria {
        let search = params
            .q
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_string);

        let published = if self.collection.has_publish_gate() {
            params.published.as_deref().and_then(parse_published)
        } else {
            None
        };

        let parent_id = match self.collection.parent_column() {
            Some(_) => params.blog_id.as_deref().and_then(parse_parent_id),
            None => None,
        };

        FilterCriteria {
            collection: self.collection,
            search,
            show_in_lists: resolve_show_in_lists(
                params.show_in_lists.as_deref(),
                self.render,
            ),
            published,
            parent_id,
            fields: field_filters(self.collection, params),
            order: OrderSpec::resolve(self.collection, params.order.as_deref()),
        }
    }
}

/// Map the `showInLists` selector onto a predicate.
///
/// - unset: listed only on HTML pages, no restriction for the API
/// - `false` / `0`: unlisted only
/// - `all`: no restriction
/// - anything else: listed only
pub fn resolve_show_in_lists(raw: Option<&str>, render: RenderContext) -> Option<bool> {
    match raw.map(str::trim) {
        None | Some("") => match render {
            RenderContext::Html => Some(true),
            RenderContext::Api => None,
        },
        Some("false") | Some("0") => Some(false),
        Some("all") => None,
        Some(_) => Some(true),
    }
}

/// `true`/`1` and `false`/`0`; other values carry no filter.
fn parse_published(raw: &str) -> Option<bool> {
    match raw.trim() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

/// An unparseable id scopes to id 0, which never exists, so the listing is
/// empty instead of silently unscoped.
fn parse_parent_id(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    match raw.parse::<i64>() {
        Ok(id) => Some(id),
        Err(_) => {
            tracing::warn!(blog_id = raw, "Unparseable blog id in listing parameters");
            Some(0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> ListingParams {
        ListingParams::default()
    }

    #[test]
    fn show_in_lists_selector() {
        use RenderContext::*;
        assert_eq!(resolve_show_in_lists(None, Html), Some(true));
        assert_eq!(resolve_show_in_lists(None, Api), None);
        assert_eq!(resolve_show_in_lists(Some("false"), Html), Some(false));
        assert_eq!(resolve_show_in_lists(Some("0"), Api), Some(false));
        assert_eq!(resolve_show_in_lists(Some("all"), Html), None);
        assert_eq!(resolve_show_in_lists(Some("yes please"), Api), Some(true));
        assert_eq!(resolve_show_in_lists(Some("true"), Api), Some(true));
    }

    #[test]
    fn blank_search_is_dropped() {
        let criteria = FilterCriteriaBuilder::new(Collection::BlogPosts, RenderContext::Api).build(
            &ListingParams {
                q: Some("   ".to_string()),
                ..params()
            },
        );
        assert_eq!(criteria.search, None);
    }

    #[test]
    fn search_is_trimmed() {
        let criteria = FilterCriteriaBuilder::new(Collection::Blogs, RenderContext::Api).build(
            &ListingParams {
                q: Some("  launch ".to_string()),
                ..params()
            },
        );
        assert_eq!(criteria.search.as_deref(), Some("launch"));
    }

    #[test]
    fn blog_id_only_applies_to_posts() {
        let raw = ListingParams {
            blog_id: Some("7".to_string()),
            ..params()
        };
        let posts =
            FilterCriteriaBuilder::new(Collection::BlogPosts, RenderContext::Api).build(&raw);
        let blogs =
            FilterCriteriaBuilder::new(Collection::Blogs, RenderContext::Api).build(&raw);
        assert_eq!(posts.parent_id, Some(7));
        assert_eq!(blogs.parent_id, None);
    }

    #[test]
    fn bad_blog_id_matches_nothing() {
        let criteria = FilterCriteriaBuilder::new(Collection::BlogPosts, RenderContext::Api).build(
            &ListingParams {
                blog_id: Some("seven".to_string()),
                ..params()
            },
        );
        assert_eq!(criteria.parent_id, Some(0));
    }

    #[test]
    fn field_filters_follow_collection() {
        let raw = ListingParams {
            teaser: Some("short".to_string()),
            description_small: Some("tiny".to_string()),
            ..params()
        };
        let posts =
            FilterCriteriaBuilder::new(Collection::BlogPosts, RenderContext::Api).build(&raw);
        let blogs =
            FilterCriteriaBuilder::new(Collection::Blogs, RenderContext::Api).build(&raw);
        assert_eq!(posts.fields, vec![FieldFilter::Teaser("short".to_string())]);
        assert_eq!(
            blogs.fields,
            vec![FieldFilter::DescriptionSmall("tiny".to_string())]
        );
    }

    #[test]
    fn published_values() {
        let build = |p: &str| {
            FilterCriteriaBuilder::new(Collection::BlogPosts, RenderContext::Api)
                .build(&ListingParams {
                    published: Some(p.to_string()),
                    ..params()
                })
                .published
        };
        assert_eq!(build("1"), Some(true));
        assert_eq!(build("true"), Some(true));
        assert_eq!(build("0"), Some(false));
        assert_eq!(build("false"), Some(false));
        assert_eq!(build("maybe"), None);
    }

    #[test]
    fn blogs_ignore_published() {
        let criteria = FilterCriteriaBuilder::new(Collection::Blogs, RenderContext::Api).build(
            &ListingParams {
                published: Some("0".to_string()),
                ..params()
            },
        );
        assert_eq!(criteria.published, None);
    }

    #[test]
    fn invalid_order_falls_back() {
        let criteria = FilterCriteriaBuilder::new(Collection::BlogPosts, RenderContext::Html).build(
            &ListingParams {
                order: Some("body; DELETE FROM blog_posts".to_string()),
                ..params()
            },
        );
        assert_eq!(criteria.order, Collection::BlogPosts.default_order());
        assert_eq!(criteria.show_in_lists, Some(true));
    }

    #[test]
    fn detects_publish_filter_attempt() {
        assert!(!params().requests_publish_filter());
        assert!(!ListingParams {
            published: Some(" ".to_string()),
            ..params()
        }
        .requests_publish_filter());
        assert!(ListingParams {
            published: Some("anything".to_string()),
            ..params()
        }
        .requests_publish_filter());
    }
}
