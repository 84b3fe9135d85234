use std::sync::Arc;

use tracing::debug;

use crate::llm::{LlmClient, LlmError, Message};

/// Forwards a single user message to the bound model and returns its reply.
pub struct ChatRelay {
    client: Arc<dyn LlmClient>,
}

impl ChatRelay {
    pub fn new(client: Arc<dyn LlmClient>) -> Self {
        Self { client }
    }

    pub fn model(&self) -> &str {
        self.client.model()
    }

    /// One request per call, no history. Client errors are returned as-is.
    pub async fn get_chat_response(&self, user_input: &str) -> Result<String, LlmError> {
        debug!("Relaying {} chars to {}", user_input.len(), self.client.model());
        let messages = vec![Message::user(user_input)];
        self.client.invoke(messages).await
    }
}
