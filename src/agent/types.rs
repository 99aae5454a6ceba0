//! Wire types for the persistent-agent service (threads, messages, runs).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role attached to a thread message.
///
/// The wire format uses `assistant` for agent-authored messages.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Message appended by the caller.
    User,
    /// Message authored by the remote agent.
    #[serde(rename = "assistant")]
    Agent,
}

/// Status of a run, as reported by the remote service.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// Run accepted, waiting for execution.
    Queued,
    /// Agent is executing against the thread.
    InProgress,
    /// Run is paused waiting for tool output.
    RequiresAction,
    /// Cancellation requested, not yet terminal.
    Cancelling,
    /// Run was cancelled.
    Cancelled,
    /// Run failed; `last_error` carries the reason.
    Failed,
    /// Run finished and the agent reply is available.
    Completed,
    /// Run exceeded its server-side lifetime.
    Expired,
    /// Any status this client does not know about.
    #[serde(other)]
    Unknown,
}

impl RunStatus {
    /// Whether the run is still worth polling.
    ///
    /// Exactly `Queued`, `InProgress` and `RequiresAction` keep the poll loop
    /// going; every other status (terminal or not) stops it.
    #[must_use]
    pub const fn is_pending(self) -> bool {
        matches!(self, Self::Queued | Self::InProgress | Self::RequiresAction)
    }
}

/// Error details attached to a failed run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunLastError {
    /// Machine-readable error code.
    pub code: String,
    /// Human-readable failure description.
    pub message: String,
}

/// One execution of the agent against a thread.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ThreadRun {
    /// Server-issued run identifier.
    pub id: String,
    /// Current run status.
    pub status: RunStatus,
    /// Failure details, present once the run has failed.
    #[serde(default)]
    pub last_error: Option<RunLastError>,
}

/// A remote conversation thread.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AgentThread {
    /// Server-issued thread identifier.
    pub id: String,
}

/// Text payload of a message content segment.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MessageText {
    /// The text itself.
    pub value: String,
}

/// Reference to an image file produced by the agent.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ImageFileRef {
    /// Server-side file identifier.
    pub file_id: String,
}

/// One content segment of a thread message.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessageContent {
    /// A text segment.
    Text {
        /// Text payload.
        text: MessageText,
    },
    /// An image-file segment (not rendered by this front-end).
    ImageFile {
        /// File reference.
        image_file: ImageFileRef,
    },
}

/// A single message within a thread.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ThreadMessage {
    /// Server-issued message identifier.
    pub id: String,
    /// Who authored the message.
    pub role: MessageRole,
    /// Server-assigned creation time.
    #[serde(with = "chrono::serde::ts_seconds")]
    pub created_at: DateTime<Utc>,
    /// Ordered content segments.
    pub content: Vec<MessageContent>,
}

impl ThreadMessage {
    /// Iterate over the text segments of this message, skipping non-text content.
    pub fn text_segments(&self) -> impl Iterator<Item = &str> {
        self.content.iter().filter_map(|segment| match segment {
            MessageContent::Text { text } => Some(text.value.as_str()),
            MessageContent::ImageFile { .. } => None,
        })
    }
}

/// Sort order for message listing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListSortOrder {
    /// Oldest message first.
    Ascending,
    /// Newest message first.
    Descending,
}

impl ListSortOrder {
    /// Value of the `order` query parameter for this sort order.
    #[must_use]
    pub const fn as_query(self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }
}
