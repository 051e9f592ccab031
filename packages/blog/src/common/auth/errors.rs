use thiserror::Error;

use super::Capability;

/// Authorization errors for the blog subsystem
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Permission denied: {0}")]
    PermissionDenied(Capability),
}
