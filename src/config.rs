//! Configuration for the ChatUI server.
//!
//! Options are bound from `CHATUI_*` environment variables at startup and
//! validated before the server accepts traffic, so a bad endpoint or a
//! missing agent id fails fast instead of at the first request.

use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Environment variable holding the agent endpoint URL.
pub const AGENT_ENDPOINT_ENV: &str = "CHATUI_AGENT_ENDPOINT";
/// Environment variable holding the agent id to run.
pub const AGENT_ID_ENV: &str = "CHATUI_AGENT_ID";
/// Environment variable holding the agent display name.
pub const AGENT_NAME_ENV: &str = "CHATUI_AGENT_NAME";
/// Environment variable holding the tenant override for credential resolution.
pub const TENANT_ID_ENV: &str = "CHATUI_TENANT_ID";
/// Environment variable holding the managed-identity client id.
pub const MI_CLIENT_ID_ENV: &str = "CHATUI_MI_CLIENT_ID";
/// Environment variable holding the bearer secret for the agent endpoint.
pub const API_KEY_ENV: &str = "CHATUI_API_KEY";
/// Environment variable overriding the poll interval, in milliseconds.
pub const POLL_INTERVAL_ENV: &str = "CHATUI_POLL_INTERVAL_MS";
/// Environment variable overriding the poll deadline, in seconds.
pub const POLL_DEADLINE_ENV: &str = "CHATUI_POLL_DEADLINE_SECS";

/// Fixed delay between run-status polls.
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);
/// Upper bound on how long a single completion may keep polling.
const DEFAULT_POLL_DEADLINE: Duration = Duration::from_secs(120);
/// Per-request timeout for calls to the agent service.
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
/// Connection timeout for calls to the agent service.
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors produced while binding or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is absent or empty.
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),

    /// A numeric environment variable did not parse.
    #[error("environment variable {0} is not a valid number")]
    InvalidNumber(&'static str),

    /// The agent endpoint is not a usable URL.
    #[error("agent endpoint is not a valid URL: {0}")]
    InvalidEndpoint(String),

    /// The agent id is empty or all whitespace.
    #[error("agent id must not be blank")]
    BlankAgentId,
}

/// Recognized configuration options.
#[derive(Clone, Debug)]
pub struct ChatConfig {
    /// Base URL of the persistent-agent service.
    pub agent_endpoint: String,
    /// Identifier of the agent to run against each conversation.
    pub agent_id: String,
    /// Display name of the agent, for logs and the front-end.
    pub agent_name: Option<String>,
    /// Tenant override for credential resolution (local development).
    pub tenant_id: Option<String>,
    /// User-assigned managed-identity client id for credential resolution.
    pub managed_identity_client_id: Option<String>,
    /// Bearer secret for the agent endpoint.
    pub api_key: Option<String>,
    /// Delay between run-status polls.
    pub poll_interval: Duration,
    /// Upper bound on polling for a single completion.
    pub poll_deadline: Duration,
    /// Per-request timeout for outbound calls.
    pub request_timeout: Duration,
    /// Connection timeout for outbound calls.
    pub connect_timeout: Duration,
}

impl ChatConfig {
    /// Create a config with the given endpoint and agent id and default tuning.
    #[must_use]
    pub fn new(agent_endpoint: impl Into<String>, agent_id: impl Into<String>) -> Self {
        Self {
            agent_endpoint: agent_endpoint.into(),
            agent_id: agent_id.into(),
            agent_name: None,
            tenant_id: None,
            managed_identity_client_id: None,
            api_key: None,
            poll_interval: DEFAULT_POLL_INTERVAL,
            poll_deadline: DEFAULT_POLL_DEADLINE,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }

    /// Bind configuration from `CHATUI_*` environment variables and validate it.
    ///
    /// # Errors
    /// Returns an error if a required variable is missing, a numeric override
    /// does not parse, or validation fails.
    pub fn from_env() -> Result<Self, ConfigError> {
        let agent_endpoint =
            optional_var(AGENT_ENDPOINT_ENV).ok_or(ConfigError::MissingVar(AGENT_ENDPOINT_ENV))?;
        let agent_id = optional_var(AGENT_ID_ENV).ok_or(ConfigError::MissingVar(AGENT_ID_ENV))?;

        let mut config = Self::new(agent_endpoint, agent_id);
        config.agent_name = optional_var(AGENT_NAME_ENV);
        config.tenant_id = optional_var(TENANT_ID_ENV);
        config.managed_identity_client_id = optional_var(MI_CLIENT_ID_ENV);
        config.api_key = optional_var(API_KEY_ENV);

        if let Some(millis) = optional_var(POLL_INTERVAL_ENV) {
            let millis: u64 = millis
                .parse()
                .map_err(|_| ConfigError::InvalidNumber(POLL_INTERVAL_ENV))?;
            config.poll_interval = Duration::from_millis(millis);
        }
        if let Some(secs) = optional_var(POLL_DEADLINE_ENV) {
            let secs: u64 = secs
                .parse()
                .map_err(|_| ConfigError::InvalidNumber(POLL_DEADLINE_ENV))?;
            config.poll_deadline = Duration::from_secs(secs);
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate the bound options.
    ///
    /// # Errors
    /// Returns an error if the endpoint is not an absolute URL or the agent id
    /// is blank.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let endpoint = Url::parse(&self.agent_endpoint)
            .map_err(|_| ConfigError::InvalidEndpoint(self.agent_endpoint.clone()))?;
        if endpoint.cannot_be_a_base() {
            return Err(ConfigError::InvalidEndpoint(self.agent_endpoint.clone()));
        }
        if self.agent_id.trim().is_empty() {
            return Err(ConfigError::BlankAgentId);
        }
        Ok(())
    }

    /// Set the tenant override.
    #[must_use]
    pub fn with_tenant_id(mut self, tenant_id: impl Into<String>) -> Self {
        self.tenant_id = Some(tenant_id.into());
        self
    }

    /// Set the managed-identity client id.
    #[must_use]
    pub fn with_managed_identity_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.managed_identity_client_id = Some(client_id.into());
        self
    }

    /// Set the bearer secret.
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the poll interval.
    #[must_use]
    pub const fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Set the poll deadline.
    #[must_use]
    pub const fn with_poll_deadline(mut self, deadline: Duration) -> Self {
        self.poll_deadline = deadline;
        self
    }
}

/// Read an environment variable, treating empty values as absent.
fn optional_var(name: &'static str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.trim().is_empty())
}
