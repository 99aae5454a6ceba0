//! Credential resolution for the agent endpoint.
//!
//! The original deployment resolves credentials through a prioritized chain:
//! a tenant override (local development), a user-assigned managed identity,
//! and finally ambient default credentials. The chain is configuration-driven
//! branching, first match wins, and the resolved kind is kept on the instance
//! so it can be logged and inspected.

use std::fmt;

use crate::config::ChatConfig;

/// Which strategy produced the credential.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CredentialKind {
    /// A tenant id override was configured (local-development escape hatch).
    TenantScoped,
    /// A user-assigned managed-identity client id was configured.
    ManagedIdentity,
    /// Neither override was present; ambient default credentials.
    Default,
}

impl CredentialKind {
    /// Human-readable strategy name, used in startup logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TenantScoped => "tenant credentials",
            Self::ManagedIdentity => "managed identity credentials",
            Self::Default => "default credentials",
        }
    }
}

impl fmt::Display for CredentialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resolved credential for the agent endpoint.
#[derive(Clone, Debug)]
pub struct Credential {
    kind: CredentialKind,
    secret: Option<String>,
}

impl Credential {
    /// Resolve a credential from configuration, first match wins:
    /// tenant override, then managed identity, then default.
    #[must_use]
    pub fn resolve(config: &ChatConfig) -> Self {
        let kind = if config.tenant_id.is_some() {
            CredentialKind::TenantScoped
        } else if config.managed_identity_client_id.is_some() {
            CredentialKind::ManagedIdentity
        } else {
            CredentialKind::Default
        };

        Self {
            kind,
            secret: config.api_key.clone(),
        }
    }

    /// Which strategy was selected.
    #[must_use]
    pub const fn kind(&self) -> CredentialKind {
        self.kind
    }

    /// Bearer secret to attach to outbound requests, when one is configured.
    #[must_use]
    pub fn bearer(&self) -> Option<&str> {
        self.secret.as_deref()
    }
}
