/// Authorization module for the blog subsystem
///
/// Provides a fluent API for capability checks in activity code:
///
/// ```rust,ignore
/// use crate::common::auth::{Actor, Capability};
///
/// Actor::new(caller.policy)
///     .can(Capability::UpdateBlogPost)
///     .check()?;
/// ```
///
/// Role resolution lives outside this crate. Callers hand in any
/// `CapabilityPolicy`; the core only asks about the closed `Capability` set.

mod builder;
mod capability;
mod errors;

pub use builder::{Actor, CapabilityBuilder};
pub use capability::{Capability, CapabilityPolicy, GrantedCapabilities};
pub use errors::AuthError;
