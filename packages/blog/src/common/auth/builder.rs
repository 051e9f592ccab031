use super::{AuthError, Capability, CapabilityPolicy};

/// Entry point for authorization checks
///
/// Usage:
/// ```rust,ignore
/// Actor::new(&policy)
///     .can(Capability::DeleteBlogPost)
///     .check()?;
/// ```
pub struct Actor<'a> {
    policy: &'a dyn CapabilityPolicy,
}

impl<'a> Actor<'a> {
    pub fn new(policy: &'a dyn CapabilityPolicy) -> Self {
        Self { policy }
    }

    /// Specify what capability the actor needs
    pub fn can(self, capability: Capability) -> CapabilityBuilder<'a> {
        CapabilityBuilder {
            policy: self.policy,
            capability,
        }
    }
}

/// Builder after specifying capability
pub struct CapabilityBuilder<'a> {
    policy: &'a dyn CapabilityPolicy,
    capability: Capability,
}

impl CapabilityBuilder<'_> {
    /// Perform the authorization check
    pub fn check(self) -> Result<(), AuthError> {
        if !self.policy.can(self.capability) {
            tracing::debug!(capability = %self.capability, "Capability check denied");
            return Err(AuthError::PermissionDenied(self.capability));
        }

        Ok(())
    }
}
