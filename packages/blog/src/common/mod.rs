// Common types and utilities shared across the blog subsystem

pub mod auth;
pub mod errors;
pub mod pagination;

pub use auth::{Actor, AuthError, Capability, CapabilityPolicy, GrantedCapabilities};
pub use errors::ContentError;
pub use pagination::{Page, PageArgs};
