//! HTTP client for the persistent-agent service.
//!
//! The service exposes a thread/message/run REST surface:
//! - `POST {endpoint}/threads` creates a conversation thread,
//! - `POST {endpoint}/threads/{tid}/messages` appends a message,
//! - `POST {endpoint}/threads/{tid}/runs` starts an agent run,
//! - `GET  {endpoint}/threads/{tid}/runs/{rid}` re-fetches a run,
//! - `GET  {endpoint}/threads/{tid}/messages` lists messages.
//!
//! Every request carries the `api-version` query parameter and, when a secret
//! is configured, a bearer `Authorization` header.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::credentials::Credential;

use super::error::AgentError;
use super::types::{
    AgentThread, ListSortOrder, MessageRole, ThreadMessage, ThreadRun,
};

/// API version understood by this client.
const API_VERSION: &str = "2025-05-01";

/// Boundary to the remote agent service.
///
/// The completion proxy only talks to this trait, which keeps the poll loop
/// testable against a scripted in-process implementation.
#[async_trait]
pub trait AgentService: Send + Sync {
    /// Create a new conversation thread.
    ///
    /// # Errors
    /// Returns an error if the service rejects the creation.
    async fn create_thread(&self) -> Result<AgentThread, AgentError>;

    /// Append a message to an existing thread.
    ///
    /// # Errors
    /// Returns an error if the service rejects the message.
    async fn create_message(
        &self,
        thread_id: &str,
        role: MessageRole,
        text: &str,
    ) -> Result<ThreadMessage, AgentError>;

    /// Start a run of the given agent against a thread.
    ///
    /// # Errors
    /// Returns an error if the run cannot be started.
    async fn create_run(&self, thread_id: &str, agent_id: &str) -> Result<ThreadRun, AgentError>;

    /// Re-fetch a run by id to observe its current status.
    ///
    /// # Errors
    /// Returns an error if the run cannot be fetched.
    async fn get_run(&self, thread_id: &str, run_id: &str) -> Result<ThreadRun, AgentError>;

    /// List all messages of a thread in the given order.
    ///
    /// # Errors
    /// Returns an error if the listing fails.
    async fn list_messages(
        &self,
        thread_id: &str,
        order: ListSortOrder,
    ) -> Result<Vec<ThreadMessage>, AgentError>;
}

#[derive(Serialize)]
struct CreateMessageRequest<'a> {
    role: MessageRole,
    content: &'a str,
}

#[derive(Serialize)]
struct CreateRunRequest<'a> {
    assistant_id: &'a str,
}

#[derive(Deserialize)]
struct MessageList {
    data: Vec<ThreadMessage>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: Option<ErrorDetail>,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: Option<String>,
}

/// Reqwest-backed client for the persistent-agent service.
pub struct PersistentAgentsClient {
    client: reqwest::Client,
    endpoint: Url,
    credential: Credential,
}

impl PersistentAgentsClient {
    /// Create a client for the given endpoint and credential.
    ///
    /// # Errors
    /// Returns an error if the endpoint is not a valid URL or the HTTP client
    /// cannot be built.
    pub fn new(
        endpoint: &str,
        credential: Credential,
        request_timeout: Duration,
        connect_timeout: Duration,
    ) -> Result<Self, AgentError> {
        let endpoint = Url::parse(endpoint)?;
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .connect_timeout(connect_timeout)
            .build()?;
        Ok(Self {
            client,
            endpoint,
            credential,
        })
    }

    /// Build a service URL for `path` with the API version and extra query pairs.
    fn url(&self, path: &str, query: &[(&str, &str)]) -> Result<Url, AgentError> {
        let base = format!("{}/{path}", self.endpoint.as_str().trim_end_matches('/'));
        let mut url = Url::parse(&base)?;
        {
            let mut params = url.query_pairs_mut();
            params.append_pair("api-version", API_VERSION);
            for (key, value) in query {
                params.append_pair(key, value);
            }
        }
        Ok(url)
    }

    /// Send a request, turning any non-success status into a service error.
    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, AgentError> {
        let request = match self.credential.bearer() {
            Some(secret) => request.bearer_auth(secret),
            None => request,
        };
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(AgentError::Service {
            status: status.as_u16(),
            message: extract_error_message(&body),
        })
    }
}

#[async_trait]
impl AgentService for PersistentAgentsClient {
    async fn create_thread(&self) -> Result<AgentThread, AgentError> {
        let url = self.url("threads", &[])?;
        let response = self
            .send(self.client.post(url).json(&serde_json::json!({})))
            .await?;
        Ok(response.json().await?)
    }

    async fn create_message(
        &self,
        thread_id: &str,
        role: MessageRole,
        text: &str,
    ) -> Result<ThreadMessage, AgentError> {
        let url = self.url(&format!("threads/{thread_id}/messages"), &[])?;
        let body = CreateMessageRequest {
            role,
            content: text,
        };
        let response = self.send(self.client.post(url).json(&body)).await?;
        Ok(response.json().await?)
    }

    async fn create_run(&self, thread_id: &str, agent_id: &str) -> Result<ThreadRun, AgentError> {
        let url = self.url(&format!("threads/{thread_id}/runs"), &[])?;
        let body = CreateRunRequest {
            assistant_id: agent_id,
        };
        let response = self.send(self.client.post(url).json(&body)).await?;
        Ok(response.json().await?)
    }

    async fn get_run(&self, thread_id: &str, run_id: &str) -> Result<ThreadRun, AgentError> {
        let url = self.url(&format!("threads/{thread_id}/runs/{run_id}"), &[])?;
        let response = self.send(self.client.get(url)).await?;
        Ok(response.json().await?)
    }

    async fn list_messages(
        &self,
        thread_id: &str,
        order: ListSortOrder,
    ) -> Result<Vec<ThreadMessage>, AgentError> {
        let url = self.url(
            &format!("threads/{thread_id}/messages"),
            &[("order", order.as_query())],
        )?;
        let response = self.send(self.client.get(url)).await?;
        let list: MessageList = response.json().await?;
        Ok(list.data)
    }
}

/// Pull a readable message out of a service error body.
///
/// The service wraps errors as `{"error": {"message": ...}}`; anything else is
/// returned verbatim.
fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(|envelope| envelope.error)
        .and_then(|detail| detail.message)
        .unwrap_or_else(|| body.to_string())
}
