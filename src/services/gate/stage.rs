//! Gate stages: the individual checks the authorization gate is built from.
//!
//! A stage reads and extends a [`RequestScope`], then either lets the request
//! continue (`Ok(())`) or short-circuits it (`Err(GateError)`).
//! The same stage values back the inline gate and the middleware filters.

use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::services::auth::{CredentialCodec, IdentityContext};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GateError {
    #[error("must be logged in")]
    Unauthenticated,
    #[error("lacks permission: requires role {required_role:?}")]
    Forbidden { required_role: String },
}

/// Per-request state threaded through the gate stages.
///
/// Holds the raw credential as delivered by the transport and, once the
/// authenticate stage has run, the derived identity.
#[derive(Debug, Clone, Default)]
pub struct RequestScope {
    credential: Option<String>,
    identity: Option<IdentityContext>,
}

impl RequestScope {
    pub fn new(credential: Option<&str>) -> Self {
        Self {
            credential: credential.map(str::to_string),
            identity: None,
        }
    }

    pub fn credential(&self) -> Option<&str> {
        self.credential.as_deref()
    }

    pub fn identity(&self) -> Option<&IdentityContext> {
        self.identity.as_ref()
    }

    pub fn into_identity(self) -> Option<IdentityContext> {
        self.identity
    }
}

pub trait GateStage: Send + Sync {
    fn name(&self) -> &'static str;

    fn check(&self, scope: &mut RequestScope) -> Result<(), GateError>;
}

/// Verifies the credential and stores the identity in the scope.
#[derive(Debug, Clone)]
pub struct Authenticate {
    codec: Arc<CredentialCodec>,
}

impl Authenticate {
    pub fn new(codec: Arc<CredentialCodec>) -> Self {
        Self { codec }
    }
}

impl GateStage for Authenticate {
    fn name(&self) -> &'static str {
        "authenticate"
    }

    fn check(&self, scope: &mut RequestScope) -> Result<(), GateError> {
        let raw = scope.credential().ok_or(GateError::Unauthenticated)?;

        let identity = self.codec.verify(raw).map_err(|err| {
            debug!(error = %err, "credential rejected");
            GateError::Unauthenticated
        })?;

        scope.identity = Some(identity);
        Ok(())
    }
}

/// Requires an authenticated identity holding `role`.
#[derive(Debug, Clone)]
pub struct RequireRole {
    role: String,
}

impl RequireRole {
    pub fn new(role: impl Into<String>) -> Self {
        Self { role: role.into() }
    }
}

impl GateStage for RequireRole {
    fn name(&self) -> &'static str {
        "authorize"
    }

    fn check(&self, scope: &mut RequestScope) -> Result<(), GateError> {
        // No identity means no authenticate stage ran before this one.
        let identity = scope
            .identity()
            .filter(|identity| identity.is_authenticated)
            .ok_or(GateError::Unauthenticated)?;

        if identity.has_role(&self.role) {
            Ok(())
        } else {
            Err(GateError::Forbidden {
                required_role: self.role.clone(),
            })
        }
    }
}
