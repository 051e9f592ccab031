// Blog subsystem: blogs, blog posts, editors and the scheduled publication job

pub mod access;
pub mod activities;
pub mod filters;
pub mod links;
pub mod models;
pub mod query;

pub use access::ListingAccess;
pub use filters::{Collection, FilterCriteria, FilterCriteriaBuilder, ListingParams, RenderContext};
pub use links::LinkConfig;
pub use models::{Blog, BlogEditor, BlogPost};
pub use query::ListingQuery;
