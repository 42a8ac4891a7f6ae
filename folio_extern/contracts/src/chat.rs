use std::future::Future;

use serde::{Deserialize, Serialize};

/// Client for an OpenAI compatible chat completion API.
#[cfg_attr(feature = "mock", mockall::automock)]
pub trait ChatCompletionApiService: Send + Sync + 'static {
    /// Return whether an API key has been configured.
    ///
    /// [`complete`](Self::complete) must not be called otherwise.
    fn is_enabled(&self) -> bool;

    /// Request a completion and return the content of the first choice.
    fn complete(
        &self,
        request: ChatCompletionRequest,
    ) -> impl Future<Output = anyhow::Result<String>> + Send;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatCompletionRequest {
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Ask the model to answer with a JSON object.
    pub json_response: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

#[cfg(feature = "mock")]
impl MockChatCompletionApiService {
    pub fn with_is_enabled(mut self, enabled: bool) -> Self {
        self.expect_is_enabled().return_const(enabled);
        self
    }

    pub fn with_complete(mut self, result: Result<String, String>) -> Self {
        self.expect_complete().once().return_once(move |_| {
            Box::pin(std::future::ready(result.map_err(anyhow::Error::msg)))
        });
        self
    }
}
