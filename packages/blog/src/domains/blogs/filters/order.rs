use std::str::FromStr;

use thiserror::Error;

use super::collection::Collection;

/// Why a raw `order` parameter was rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OrderParseError {
    #[error("empty order specification")]
    Empty,

    #[error("unknown sort column: {0}")]
    UnknownColumn(String),

    #[error("sort column {column} is not available on {collection}")]
    UnsupportedColumn {
        column: SortColumn,
        collection: Collection,
    },

    #[error("unknown sort direction: {0}")]
    UnknownDirection(String),

    #[error("too many tokens in order term: {0}")]
    TooManyTokens(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

impl FromStr for SortDirection {
    type Err = OrderParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            _ => Err(OrderParseError::UnknownDirection(s.to_string())),
        }
    }
}

/// Whitelisted sort columns. SQL only ever sees [`SortColumn::as_sql`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortColumn {
    Id,
    Title,
    CreatedAt,
    UpdatedAt,
    PublishedAt,
    Highlighted,
    ShowInLists,
}

impl SortColumn {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortColumn::Id => "id",
            SortColumn::Title => "title",
            SortColumn::CreatedAt => "created_at",
            SortColumn::UpdatedAt => "updated_at",
            SortColumn::PublishedAt => "published_at",
            SortColumn::Highlighted => "highlighted",
            SortColumn::ShowInLists => "show_in_lists",
        }
    }

    fn nullable(&self) -> bool {
        matches!(self, SortColumn::PublishedAt)
    }
}

impl std::fmt::Display for SortColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_sql())
    }
}

impl FromStr for SortColumn {
    type Err = OrderParseError;

    /// Accepts both the request spelling (`createdAt`) and the column name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "id" => Ok(SortColumn::Id),
            "title" => Ok(SortColumn::Title),
            "createdAt" | "created_at" => Ok(SortColumn::CreatedAt),
            "updatedAt" | "updated_at" => Ok(SortColumn::UpdatedAt),
            "publishedAt" | "published_at" => Ok(SortColumn::PublishedAt),
            "highlighted" => Ok(SortColumn::Highlighted),
            "showInLists" | "show_in_lists" => Ok(SortColumn::ShowInLists),
            _ => Err(OrderParseError::UnknownColumn(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderTerm {
    pub column: SortColumn,
    pub direction: SortDirection,
}

impl OrderTerm {
    pub fn new(column: SortColumn, direction: SortDirection) -> Self {
        Self { column, direction }
    }

    fn to_sql(self) -> String {
        let mut sql = format!("{} {}", self.column.as_sql(), self.direction.as_sql());
        if self.column.nullable() {
            sql.push_str(" NULLS LAST");
        }
        sql
    }
}

/// Resolved ORDER BY list. Always ends in an `id` term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderSpec {
    terms: Vec<OrderTerm>,
}

impl OrderSpec {
    /// Appends `id DESC` unless the terms already order by id.
    pub fn from_terms(mut terms: Vec<OrderTerm>) -> Self {
        if !terms.iter().any(|t| t.column == SortColumn::Id) {
            terms.push(OrderTerm::new(SortColumn::Id, SortDirection::Desc));
        }
        Self { terms }
    }

    /// Parse `column [asc|desc]`, several terms separated by commas.
    ///
    /// Tokens may be split by whitespace or `+` (an encoded space). A missing
    /// direction means ascending.
    pub fn parse(collection: Collection, raw: &str) -> Result<Self, OrderParseError> {
        let mut terms = Vec::new();

        for part in raw.split(',') {
            let tokens: Vec<&str> = part
                .split(|c: char| c.is_whitespace() || c == '+')
                .filter(|t| !t.is_empty())
                .collect();

            let term = match tokens.as_slice() {
                [] => continue,
                [column] => OrderTerm::new(column.parse()?, SortDirection::Asc),
                [column, direction] => OrderTerm::new(column.parse()?, direction.parse()?),
                _ => return Err(OrderParseError::TooManyTokens(part.trim().to_string())),
            };

            if !collection.supports(term.column) {
                return Err(OrderParseError::UnsupportedColumn {
                    column: term.column,
                    collection,
                });
            }
            terms.push(term);
        }

        if terms.is_empty() {
            return Err(OrderParseError::Empty);
        }

        Ok(Self::from_terms(terms))
    }

    /// Parse, or fall back to the collection default when the input is
    /// missing or rejected.
    pub fn resolve(collection: Collection, raw: Option<&str>) -> Self {
        let Some(raw) = raw.filter(|r| !r.trim().is_empty()) else {
            return collection.default_order();
        };

        match Self::parse(collection, raw) {
            Ok(spec) => spec,
            Err(e) => {
                tracing::warn!(
                    collection = %collection,
                    order = raw,
                    error = %e,
                    "Rejected order parameter, using default order"
                );
                collection.default_order()
            }
        }
    }

    /// ORDER BY body built only from whitelisted names.
    pub fn to_sql(&self) -> String {
        self.terms
            .iter()
            .map(|t| t.to_sql())
            .collect::<Vec<_>>()
            .join(", ")
    }
}
