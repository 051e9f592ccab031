//! Listing filters: which collection, which predicates, which order.
//!
//! Everything here is pure. Raw request values go in, a validated
//! [`FilterCriteria`] comes out; nothing user-supplied reaches SQL text.

pub mod collection;
pub mod criteria;
pub mod fields;
pub mod order;

pub use collection::Collection;
pub use criteria::{FilterCriteria, FilterCriteriaBuilder, ListingParams, RenderContext};
pub use fields::{FieldFilter, FieldValue};
pub use order::{OrderParseError, OrderSpec, OrderTerm, SortColumn, SortDirection};
