use tracing::warn;

use super::collection::Collection;
use super::criteria::ListingParams;

/// Exact-match filter on one whitelisted column
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldFilter {
    Id(i64),
    Title(String),
    Teaser(String),
    Body(String),
    Highlighted(i32),
    UrlPath(String),
    DescriptionSmall(String),
}

/// Typed bind value of a [`FieldFilter`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    BigInt(i64),
    Int(i32),
    Text(&'a str),
}

impl FieldFilter {
    pub fn column(&self) -> &'static str {
        match self {
            FieldFilter::Id(_) => "id",
            FieldFilter::Title(_) => "title",
            FieldFilter::Teaser(_) => "teaser",
            FieldFilter::Body(_) => "body",
            FieldFilter::Highlighted(_) => "highlighted",
            FieldFilter::UrlPath(_) => "url_path",
            FieldFilter::DescriptionSmall(_) => "description_small",
        }
    }

    pub fn value(&self) -> FieldValue<'_> {
        match self {
            FieldFilter::Id(id) => FieldValue::BigInt(*id),
            FieldFilter::Highlighted(level) => FieldValue::Int(*level),
            FieldFilter::Title(s)
            | FieldFilter::Teaser(s)
            | FieldFilter::Body(s)
            | FieldFilter::UrlPath(s)
            | FieldFilter::DescriptionSmall(s) => FieldValue::Text(s),
        }
    }

    /// Whether the column exists on `collection`.
    pub fn applies_to(&self, collection: Collection) -> bool {
        match self {
            FieldFilter::Id(_) | FieldFilter::Title(_) => true,
            FieldFilter::Teaser(_)
            | FieldFilter::Body(_)
            | FieldFilter::Highlighted(_)
            | FieldFilter::UrlPath(_) => collection == Collection::BlogPosts,
            FieldFilter::DescriptionSmall(_) => collection == Collection::Blogs,
        }
    }
}

/// Field filters requested in `params` that exist on `collection`, in column order.
///
/// Blank values are skipped. An unparseable `id` matches nothing; an
/// unparseable `highlighted` is dropped.
pub fn field_filters(collection: Collection, params: &ListingParams) -> Vec<FieldFilter> {
    let text = |raw: &Option<String>| {
        raw.as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };

    let mut filters = Vec::new();

    if let Some(raw) = text(&params.id) {
        let id = raw.parse::<i64>().unwrap_or_else(|_| {
            warn!(id = %raw, "Unparseable id in listing parameters");
            0
        });
        filters.push(FieldFilter::Id(id));
    }
    if let Some(title) = text(&params.title) {
        filters.push(FieldFilter::Title(title));
    }
    if let Some(teaser) = text(&params.teaser) {
        filters.push(FieldFilter::Teaser(teaser));
    }
    if let Some(body) = text(&params.body) {
        filters.push(FieldFilter::Body(body));
    }
    if let Some(raw) = text(&params.highlighted) {
        match raw.parse::<i32>() {
            Ok(level) => filters.push(FieldFilter::Highlighted(level)),
            Err(_) => warn!(highlighted = %raw, "Ignoring unparseable highlighted filter"),
        }
    }
    if let Some(url_path) = text(&params.url_path) {
        filters.push(FieldFilter::UrlPath(url_path));
    }
    if let Some(description) = text(&params.description_small) {
        filters.push(FieldFilter::DescriptionSmall(description));
    }

    filters.retain(|f| f.applies_to(collection));
    filters
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_fields() {
        let params = ListingParams {
            id: Some("12".to_string()),
            title: Some(" Launch ".to_string()),
            highlighted: Some("2".to_string()),
            url_path: Some("launch-day".to_string()),
            description_small: Some("blogs only".to_string()),
            ..Default::default()
        };
        assert_eq!(
            field_filters(Collection::BlogPosts, &params),
            vec![
                FieldFilter::Id(12),
                FieldFilter::Title("Launch".to_string()),
                FieldFilter::Highlighted(2),
                FieldFilter::UrlPath("launch-day".to_string()),
            ]
        );
    }

    #[test]
    fn blog_fields() {
        let params = ListingParams {
            title: Some("Notes".to_string()),
            body: Some("posts only".to_string()),
            description_small: Some("short".to_string()),
            ..Default::default()
        };
        assert_eq!(
            field_filters(Collection::Blogs, &params),
            vec![
                FieldFilter::Title("Notes".to_string()),
                FieldFilter::DescriptionSmall("short".to_string()),
            ]
        );
    }

    #[test]
    fn bad_numbers() {
        let params = ListingParams {
            id: Some("twelve".to_string()),
            highlighted: Some("high".to_string()),
            teaser: Some("  ".to_string()),
            ..Default::default()
        };
        assert_eq!(
            field_filters(Collection::BlogPosts, &params),
            vec![FieldFilter::Id(0)]
        );
    }

    #[test]
    fn values_are_typed() {
        assert_eq!(FieldFilter::Id(3).value(), FieldValue::BigInt(3));
        assert_eq!(FieldFilter::Highlighted(1).value(), FieldValue::Int(1));
        assert_eq!(
            FieldFilter::Body("x".to_string()).value(),
            FieldValue::Text("x")
        );
    }
}
