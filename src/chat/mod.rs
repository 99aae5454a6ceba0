//! The agent completion proxy.
//!
//! Given a conversation id and a user prompt, the proxy appends the prompt to
//! the remote thread, starts one run of the configured agent, polls the run on
//! a fixed interval until it leaves the pending set, then returns the newest
//! agent-authored text segment. The remote service is the sole source of
//! truth; no conversation or run state is cached locally.

pub mod error;

pub use error::ChatError;

use std::sync::Arc;

use tokio::time::{Instant, sleep};

use crate::agent::{AgentService, ListSortOrder, MessageRole, ThreadMessage};
use crate::build_info::BuildInfo;
use crate::config::ChatConfig;

/// Proxies prompt completions to the remote agent service.
///
/// Each call is an independent sequential pipeline; concurrent callers share
/// nothing but the underlying client, so no locking is needed.
pub struct CompletionProxy {
    service: Arc<dyn AgentService>,
    config: ChatConfig,
}

impl CompletionProxy {
    /// Create a proxy over the given service boundary.
    #[must_use]
    pub fn new(service: Arc<dyn AgentService>, config: ChatConfig) -> Self {
        Self { service, config }
    }

    /// Allocate a fresh remote conversation and return its identifier.
    ///
    /// # Errors
    /// Returns a service error if the remote side rejects the creation.
    pub async fn start_conversation(&self) -> Result<String, ChatError> {
        let thread = self.service.create_thread().await?;
        tracing::info!(thread_id = %thread.id, "created conversation thread");
        Ok(thread.id)
    }

    /// Complete one prompt against an existing conversation.
    ///
    /// Appends the prompt as a user message, starts exactly one run of the
    /// configured agent, polls until the run leaves the pending set (bounded
    /// by the poll deadline), then extracts the last agent-authored text
    /// segment of the conversation. Terminal failure statuses are not
    /// special-cased: whatever agent messages exist afterwards are read.
    ///
    /// # Errors
    /// - `InvalidArgument` for an empty or whitespace-only prompt (no remote
    ///   call is made).
    /// - `Service` for any remote rejection, carrying the remote status code
    ///   and message.
    /// - `RunTimedOut` if the run is still pending at the poll deadline.
    /// - `EmptyReply` if no agent-authored text exists after the run.
    pub async fn complete(&self, conversation_id: &str, prompt: &str) -> Result<String, ChatError> {
        if prompt.trim().is_empty() {
            return Err(ChatError::InvalidArgument(
                "prompt cannot be null, empty, or whitespace".to_string(),
            ));
        }

        tracing::info!(thread_id = %conversation_id, prompt, "completion starting");

        self.service
            .create_message(conversation_id, MessageRole::User, prompt)
            .await?;

        let mut run = self
            .service
            .create_run(conversation_id, &self.config.agent_id)
            .await?;

        let deadline = Instant::now() + self.config.poll_deadline;
        while run.status.is_pending() {
            if Instant::now() >= deadline {
                tracing::warn!(
                    thread_id = %conversation_id,
                    run_id = %run.id,
                    status = ?run.status,
                    "run still pending at poll deadline"
                );
                return Err(ChatError::RunTimedOut(self.config.poll_deadline));
            }
            sleep(self.config.poll_interval).await;
            run = self.service.get_run(conversation_id, &run.id).await?;
        }

        if let Some(last_error) = &run.last_error {
            tracing::warn!(
                thread_id = %conversation_id,
                run_id = %run.id,
                code = %last_error.code,
                message = %last_error.message,
                "run finished with an error; reading whatever reply exists"
            );
        }

        let messages = self
            .service
            .list_messages(conversation_id, ListSortOrder::Ascending)
            .await?;

        let reply = messages
            .iter()
            .filter(|message| message.role == MessageRole::Agent)
            .flat_map(ThreadMessage::text_segments)
            .last()
            .map(str::to_string)
            .ok_or(ChatError::EmptyReply)?;

        tracing::info!(thread_id = %conversation_id, run_id = %run.id, "completion finished");
        Ok(reply)
    }

    /// Static build metadata of this server.
    #[must_use]
    pub fn info(&self) -> BuildInfo {
        BuildInfo::current()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::VecDeque;
    use std::time::Duration;

    use async_trait::async_trait;
    use chrono::Utc;
    use tokio::sync::Mutex;

    use crate::agent::types::{MessageContent, MessageText};
    use crate::agent::{AgentError, AgentThread, RunStatus, ThreadRun};

    /// One recorded call against the scripted service.
    #[derive(Clone, Debug, PartialEq, Eq)]
    enum Call {
        CreateThread,
        CreateMessage(String),
        CreateRun,
        GetRun,
        ListMessages,
    }

    /// In-process agent service with a scripted run-status sequence.
    ///
    /// `create_run` yields the first status; each `get_run` yields the next,
    /// repeating the final one once the script is exhausted.
    struct ScriptedService {
        calls: Mutex<Vec<Call>>,
        statuses: Mutex<VecDeque<RunStatus>>,
        messages: Vec<ThreadMessage>,
        message_error: Option<u16>,
    }

    impl ScriptedService {
        fn new(statuses: &[RunStatus], messages: Vec<ThreadMessage>) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                statuses: Mutex::new(statuses.iter().copied().collect()),
                messages,
                message_error: None,
            }
        }

        fn with_message_error(mut self, status: u16) -> Self {
            self.message_error = Some(status);
            self
        }

        async fn recorded_calls(&self) -> Vec<Call> {
            self.calls.lock().await.clone()
        }

        async fn record(&self, call: Call) {
            self.calls.lock().await.push(call);
        }

        async fn next_status(&self) -> RunStatus {
            let mut script = self.statuses.lock().await;
            if script.len() > 1 {
                script.pop_front().unwrap_or(RunStatus::Unknown)
            } else {
                script.front().copied().unwrap_or(RunStatus::Unknown)
            }
        }
    }

    #[async_trait]
    impl AgentService for ScriptedService {
        async fn create_thread(&self) -> Result<AgentThread, AgentError> {
            self.record(Call::CreateThread).await;
            Ok(AgentThread {
                id: "thread_123".to_string(),
            })
        }

        async fn create_message(
            &self,
            _thread_id: &str,
            role: MessageRole,
            text: &str,
        ) -> Result<ThreadMessage, AgentError> {
            self.record(Call::CreateMessage(text.to_string())).await;
            if let Some(status) = self.message_error {
                return Err(AgentError::Service {
                    status,
                    message: "Rate limit is exceeded.".to_string(),
                });
            }
            Ok(message(role, text))
        }

        async fn create_run(
            &self,
            _thread_id: &str,
            _agent_id: &str,
        ) -> Result<ThreadRun, AgentError> {
            self.record(Call::CreateRun).await;
            Ok(ThreadRun {
                id: "run_1".to_string(),
                status: self.next_status().await,
                last_error: None,
            })
        }

        async fn get_run(&self, _thread_id: &str, run_id: &str) -> Result<ThreadRun, AgentError> {
            self.record(Call::GetRun).await;
            Ok(ThreadRun {
                id: run_id.to_string(),
                status: self.next_status().await,
                last_error: None,
            })
        }

        async fn list_messages(
            &self,
            _thread_id: &str,
            _order: ListSortOrder,
        ) -> Result<Vec<ThreadMessage>, AgentError> {
            self.record(Call::ListMessages).await;
            Ok(self.messages.clone())
        }
    }

    fn message(role: MessageRole, text: &str) -> ThreadMessage {
        ThreadMessage {
            id: format!("msg_{text}"),
            role,
            created_at: Utc::now(),
            content: vec![MessageContent::Text {
                text: MessageText {
                    value: text.to_string(),
                },
            }],
        }
    }

    fn fast_config() -> ChatConfig {
        ChatConfig::new("https://agents.example.com/api/projects/demo", "asst_1")
            .with_poll_interval(Duration::from_millis(1))
    }

    fn proxy(service: &Arc<ScriptedService>, config: ChatConfig) -> CompletionProxy {
        CompletionProxy::new(service.clone(), config)
    }

    #[tokio::test]
    async fn test_complete_returns_latest_agent_reply() -> Result<(), ChatError> {
        let service = Arc::new(ScriptedService::new(
            &[
                RunStatus::Queued,
                RunStatus::InProgress,
                RunStatus::Completed,
            ],
            vec![
                message(MessageRole::Agent, "older answer"),
                message(MessageRole::User, "hello"),
                message(MessageRole::Agent, "hi there"),
            ],
        ));
        let proxy = proxy(&service, fast_config());

        let reply = proxy.complete("thread_123", "hello").await?;
        assert_eq!(reply, "hi there");

        let calls = service.recorded_calls().await;
        assert_eq!(
            calls,
            vec![
                Call::CreateMessage("hello".to_string()),
                Call::CreateRun,
                Call::GetRun,
                Call::GetRun,
                Call::ListMessages,
            ]
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_blank_prompt_rejected_before_any_remote_call() {
        let service = Arc::new(ScriptedService::new(&[RunStatus::Completed], Vec::new()));
        let proxy = proxy(&service, fast_config());

        for prompt in ["", "   ", "\t\n"] {
            let result = proxy.complete("thread_123", prompt).await;
            assert!(matches!(result, Err(ChatError::InvalidArgument(_))));
        }
        assert!(service.recorded_calls().await.is_empty());
    }

    #[tokio::test]
    async fn test_remote_message_rejection_skips_run() {
        let service = Arc::new(
            ScriptedService::new(&[RunStatus::Completed], Vec::new()).with_message_error(429),
        );
        let proxy = proxy(&service, fast_config());

        let result = proxy.complete("thread_123", "hello").await;
        assert!(matches!(
            result,
            Err(ChatError::Service { status: 429, ref message }) if message == "Rate limit is exceeded."
        ));

        let calls = service.recorded_calls().await;
        assert!(!calls.contains(&Call::CreateRun));
        assert!(!calls.contains(&Call::ListMessages));
    }

    #[tokio::test]
    async fn test_failed_run_halts_polling_and_still_reads_reply() -> Result<(), ChatError> {
        let service = Arc::new(ScriptedService::new(
            &[RunStatus::Failed],
            vec![message(MessageRole::Agent, "partial answer")],
        ));
        let proxy = proxy(&service, fast_config());

        let reply = proxy.complete("thread_123", "hello").await?;
        assert_eq!(reply, "partial answer");

        // Failed is terminal from the start, so the run is never re-fetched.
        let calls = service.recorded_calls().await;
        assert!(!calls.contains(&Call::GetRun));
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_agent_reply_is_guarded() {
        let service = Arc::new(ScriptedService::new(
            &[RunStatus::Completed],
            vec![message(MessageRole::User, "hello")],
        ));
        let proxy = proxy(&service, fast_config());

        let result = proxy.complete("thread_123", "hello").await;
        assert!(matches!(result, Err(ChatError::EmptyReply)));
    }

    #[tokio::test]
    async fn test_poll_deadline_bounds_a_stuck_run() {
        let service = Arc::new(ScriptedService::new(&[RunStatus::Queued], Vec::new()));
        let config = fast_config().with_poll_deadline(Duration::from_millis(20));
        let proxy = proxy(&service, config);

        let result = proxy.complete("thread_123", "hello").await;
        assert!(matches!(result, Err(ChatError::RunTimedOut(_))));

        let calls = service.recorded_calls().await;
        assert!(!calls.contains(&Call::ListMessages));
    }

    #[tokio::test]
    async fn test_start_conversation_returns_remote_id() -> Result<(), ChatError> {
        let service = Arc::new(ScriptedService::new(&[RunStatus::Completed], Vec::new()));
        let proxy = proxy(&service, fast_config());

        let id = proxy.start_conversation().await?;
        assert_eq!(id, "thread_123");
        assert_eq!(service.recorded_calls().await, vec![Call::CreateThread]);
        Ok(())
    }

    #[tokio::test]
    async fn test_info_reports_build_metadata() {
        let service = Arc::new(ScriptedService::new(&[RunStatus::Completed], Vec::new()));
        let proxy = proxy(&service, fast_config());

        let info = proxy.info();
        assert_eq!(info.version, env!("CARGO_PKG_VERSION"));
    }
}
