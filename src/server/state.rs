//! Application state shared across all request handlers.

use std::sync::Arc;

use crate::agent::PersistentAgentsClient;
use crate::chat::CompletionProxy;
use crate::config::ChatConfig;
use crate::credentials::{Credential, CredentialKind};

/// Shared application state.
pub struct AppState {
    /// The completion proxy handlers delegate to.
    pub proxy: CompletionProxy,
    /// Display name of the configured agent.
    pub agent_name: String,
    /// Which credential strategy was selected at startup.
    pub credential_kind: CredentialKind,
}

impl AppState {
    /// Build application state from validated configuration.
    ///
    /// Resolves the credential, constructs the outbound client and wires the
    /// completion proxy. The resolved credential kind is kept here (instance
    /// scoped) rather than in any process-wide static.
    ///
    /// # Errors
    /// Returns an error if validation fails or the HTTP client cannot be built.
    pub fn new(config: ChatConfig) -> Result<Arc<Self>, Box<dyn std::error::Error + Send + Sync>> {
        config.validate()?;

        let credential = Credential::resolve(&config);
        let credential_kind = credential.kind();
        tracing::info!(
            kind = %credential_kind,
            endpoint = %config.agent_endpoint,
            "created credentials for agent endpoint"
        );

        let client = PersistentAgentsClient::new(
            &config.agent_endpoint,
            credential,
            config.request_timeout,
            config.connect_timeout,
        )?;

        let agent_name = config
            .agent_name
            .clone()
            .unwrap_or_else(|| config.agent_id.clone());

        Ok(Arc::new(Self {
            proxy: CompletionProxy::new(Arc::new(client), config),
            agent_name,
            credential_kind,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_builds_from_valid_config() -> Result<(), Box<dyn std::error::Error + Send + Sync>>
    {
        let config = ChatConfig::new("https://agents.example.com/api/projects/demo", "asst_1")
            .with_tenant_id("tenant-1");
        let state = AppState::new(config)?;
        assert_eq!(state.agent_name, "asst_1");
        assert_eq!(state.credential_kind, CredentialKind::TenantScoped);
        Ok(())
    }

    #[test]
    fn test_state_rejects_invalid_config() {
        let config = ChatConfig::new("not a url", "asst_1");
        assert!(AppState::new(config).is_err());
    }
}
