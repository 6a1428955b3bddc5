//! Owner identity and the per-request context that carries it.
//!
//! Identity issuance happens outside this crate. Callers resolve the session
//! themselves and hand the result to every service call through
//! [`RequestContext`], so no operation ever looks identity up ambiently.

use super::TrackerDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier of the authenticated actor that owns a record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerIdentity(String);

impl OwnerIdentity {
    /// Creates a validated owner identity.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerDomainError::EmptyOwnerIdentity`] when the value is
    /// empty after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, TrackerDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TrackerDomainError::EmptyOwnerIdentity);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the identity as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for OwnerIdentity {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for OwnerIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Request-scoped context supplied by the identity collaborator.
///
/// An anonymous context represents a request without a resolved session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    identity: Option<OwnerIdentity>,
}

impl RequestContext {
    /// Creates a context for an authenticated actor.
    #[must_use]
    pub const fn authenticated(identity: OwnerIdentity) -> Self {
        Self {
            identity: Some(identity),
        }
    }

    /// Creates a context for a request with no resolved identity.
    #[must_use]
    pub const fn anonymous() -> Self {
        Self { identity: None }
    }

    /// Returns the resolved identity, if any.
    #[must_use]
    pub const fn identity(&self) -> Option<&OwnerIdentity> {
        self.identity.as_ref()
    }
}

impl From<OwnerIdentity> for RequestContext {
    fn from(identity: OwnerIdentity) -> Self {
        Self::authenticated(identity)
    }
}
