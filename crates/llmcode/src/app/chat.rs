//! Chat transcript handling and the backend seam.

use std::path::Path;

use anyhow::Result;

use crate::domain::model::ChatMessage;

/// Fixed acknowledgment appended after workspace context is injected.
pub const CONTEXT_ACK: &str = "I've received and understood the workspace context. \
I'll use this information to provide better assistance.";

/// Reply produced by the built-in mock backend.
pub const MOCK_REPLY: &str =
    "DEBUG MODE: This is a mock response. Set debug=false to use actual API.";

fn system_prompt(cwd: &Path) -> String {
    format!(
        "You are a helpful coding assistant. You have access to the user's filesystem.\nCurrent directory: {}",
        cwd.display()
    )
}

/// The conversation sent to the assistant: a system message naming the
/// working directory followed by alternating user/assistant turns.
#[derive(Debug, Clone)]
pub struct ChatHistory {
    messages: Vec<ChatMessage>,
}

impl ChatHistory {
    pub fn new(cwd: &Path) -> Self {
        Self {
            messages: vec![ChatMessage::system(system_prompt(cwd))],
        }
    }

    /// Refresh the system message after the working directory changed.
    pub fn set_working_directory(&mut self, cwd: &Path) {
        self.messages[0] = ChatMessage::system(system_prompt(cwd));
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.messages.push(ChatMessage::user(content));
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.messages.push(ChatMessage::assistant(content));
    }

    /// Inject a serialized workspace-context block as a user message and
    /// acknowledge it with the fixed assistant reply.
    pub fn push_context(&mut self, block: &str) {
        self.push_user(format!("Here's the current workspace context:\n{block}"));
        self.push_assistant(CONTEXT_ACK);
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// A backend able to answer a transcript with a completion.
///
/// Remote transports (auth, wire protocol, streaming) are provided
/// separately; this crate bundles only [`MockClient`].
pub trait ChatClient {
    fn complete(&self, messages: &[ChatMessage]) -> Result<String>;
}

/// Offline backend returning a canned reply. Selected whenever debug mode is
/// active; also what the tests run against.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockClient;

impl MockClient {
    pub fn new() -> Self {
        Self
    }
}

impl ChatClient for MockClient {
    fn complete(&self, _messages: &[ChatMessage]) -> Result<String> {
        Ok(MOCK_REPLY.to_owned())
    }
}
