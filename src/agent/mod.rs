//! Boundary to the remote persistent-agent service.
//!
//! The service owns all conversation state: threads, their messages, and the
//! runs executed against them. This module provides the wire types, the
//! `AgentService` trait the rest of the crate programs against, and the
//! reqwest-backed client implementing it.

pub mod client;
pub mod error;
pub mod types;

pub use client::{AgentService, PersistentAgentsClient};
pub use error::AgentError;
pub use types::{
    AgentThread, ListSortOrder, MessageContent, MessageRole, RunStatus, ThreadMessage, ThreadRun,
};
