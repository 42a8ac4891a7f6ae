use std::{sync::Arc, time::Duration};

use anyhow::{anyhow, Context};
use folio_di::Build;
use folio_extern_contracts::chat::{ChatCompletionApiService, ChatCompletionRequest, ChatMessage};
use folio_models::Sensitive;
use folio_utils::trace_instrument;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::warn;
use url::Url;

use crate::http::HttpClient;

pub const DEFAULT_ENDPOINT: &str = "https://api.groq.com/openai/v1/chat/completions";

const RETRY_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Build)]
pub struct ChatCompletionApiServiceImpl {
    config: Arc<ChatCompletionApiServiceConfig>,
    #[state]
    client: HttpClient,
}

#[derive(Debug, Clone)]
pub struct ChatCompletionApiServiceConfig {
    pub endpoint: Url,
    pub model: String,
    /// Without an API key the service is disabled.
    pub api_key: Option<Sensitive<String>>,
    /// Applies to each attempt separately.
    pub timeout: Duration,
    /// Additional attempts after connection failures, rate limiting and
    /// server errors.
    pub max_retries: u32,
}

impl ChatCompletionApiService for ChatCompletionApiServiceImpl {
    fn is_enabled(&self) -> bool {
        self.config.api_key.is_some()
    }

    #[trace_instrument(skip(self, request), fields(model = %self.config.model))]
    async fn complete(&self, request: ChatCompletionRequest) -> anyhow::Result<String> {
        let api_key = self
            .config
            .api_key
            .as_ref()
            .context("No API key has been configured")?;

        let body = CompletionRequest {
            model: &self.config.model,
            messages: &request.messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            response_format: request
                .json_response
                .then_some(ResponseFormat { r#type: "json_object" }),
        };

        let mut attempt = 0;
        let response = loop {
            let result = self
                .client
                .post(self.config.endpoint.clone())
                .bearer_auth(&**api_key)
                .timeout(self.config.timeout)
                .json(&body)
                .send()
                .await;

            let retry = match &result {
                Ok(response) => is_retryable_status(response.status()),
                Err(err) => err.is_connect(),
            };
            if !retry || attempt >= self.config.max_retries {
                break result?;
            }

            attempt += 1;
            match &result {
                Ok(response) => warn!(status = %response.status(), attempt, "Retrying chat completion"),
                Err(err) => warn!(%err, attempt, "Retrying chat completion"),
            }
            tokio::time::sleep(RETRY_DELAY * attempt).await;
        };

        let response = response
            .error_for_status()?
            .json::<CompletionResponse>()
            .await?;

        response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("Completion did not contain any choices"))?
            .message
            .content
            .filter(|content| !content.is_empty())
            .ok_or_else(|| anyhow!("Completion did not contain any content"))
    }
}

fn is_retryable_status(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Serialize)]
struct ResponseFormat {
    r#type: &'static str,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Deserialize)]
struct CompletionMessage {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_status() {
        assert!(is_retryable_status(StatusCode::TOO_MANY_REQUESTS));
        assert!(is_retryable_status(StatusCode::BAD_GATEWAY));
        assert!(!is_retryable_status(StatusCode::UNAUTHORIZED));
        assert!(!is_retryable_status(StatusCode::OK));
    }
}
