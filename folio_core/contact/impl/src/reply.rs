use std::sync::Arc;

use anyhow::{ensure, Context};
use folio_core_contact_contracts::reply::ContactReplyComposerService;
use folio_di::Build;
use folio_extern_contracts::chat::{ChatCompletionApiService, ChatCompletionRequest, ChatMessage};
use folio_models::contact::{ComposedReply, ContactSubmission, DraftedReply, ReplySource};
use folio_utils::trace_instrument;
use tracing::{debug, warn};

#[derive(Debug, Clone, Build)]
pub struct ContactReplyComposerServiceImpl<ChatCompletionApi> {
    chat_completion_api: ChatCompletionApi,
    config: Arc<ContactReplyComposerConfig>,
}

#[derive(Debug, Clone)]
pub struct ContactReplyComposerConfig {
    /// The name the replies are written and signed as.
    pub owner_name: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl<ChatCompletionApi> ContactReplyComposerService
    for ContactReplyComposerServiceImpl<ChatCompletionApi>
where
    ChatCompletionApi: ChatCompletionApiService,
{
    #[trace_instrument(skip(self))]
    async fn compose(&self, submission: &ContactSubmission) -> ComposedReply {
        if !self.chat_completion_api.is_enabled() {
            debug!("Chat completion is disabled, using fallback reply");
            return self.fallback(submission);
        }

        match self.draft(submission).await {
            Ok(reply) => ComposedReply {
                source: ReplySource::Ai,
                reply,
            },
            Err(err) => {
                warn!("Failed to draft reply, using fallback reply: {err:#}");
                self.fallback(submission)
            }
        }
    }
}

impl<ChatCompletionApi> ContactReplyComposerServiceImpl<ChatCompletionApi>
where
    ChatCompletionApi: ChatCompletionApiService,
{
    async fn draft(&self, submission: &ContactSubmission) -> anyhow::Result<DraftedReply> {
        let content = self
            .chat_completion_api
            .complete(ChatCompletionRequest {
                messages: vec![
                    ChatMessage::system(system_prompt(&self.config.owner_name)),
                    ChatMessage::user(user_prompt(submission)),
                ],
                temperature: self.config.temperature,
                max_tokens: self.config.max_tokens,
                json_response: true,
            })
            .await?;

        let mut reply = serde_json::from_str::<DraftedReply>(&content)
            .context("Failed to parse drafted reply")?;
        ensure!(
            !reply.greeting.trim().is_empty() && !reply.response.trim().is_empty(),
            "Drafted reply is incomplete"
        );

        if reply.closing.trim().is_empty() {
            reply.closing = self.fallback_closing();
        }

        Ok(reply)
    }

    fn fallback(&self, submission: &ContactSubmission) -> ComposedReply {
        ComposedReply {
            source: ReplySource::Fallback,
            reply: DraftedReply {
                greeting: format!("Hello {},", *submission.name),
                response: format!(
                    "Thank you for reaching out regarding \"{}\". I have received your message \
                     and will get back to you as soon as possible.",
                    *submission.subject
                ),
                closing: self.fallback_closing(),
            },
        }
    }

    fn fallback_closing(&self) -> String {
        format!("Best regards,\n{}", self.config.owner_name)
    }
}

fn system_prompt(owner_name: &str) -> String {
    format!(
        "You are {owner_name}. Someone has contacted you through the contact form on your \
         portfolio website and you are writing a short reply to them. Write in the first person \
         as {owner_name}. Be professional, friendly and concise, acknowledge what the message is \
         about and do not make any commitments. Respond with a JSON object containing exactly \
         the string fields \"greeting\", \"response\" and \"closing\". The closing is signed \
         with your name."
    )
}

fn user_prompt(submission: &ContactSubmission) -> String {
    format!(
        "Name: {}\nEmail: {}\nSubject: {}\nMessage:\n{}",
        *submission.name, *submission.email, *submission.subject, *submission.message
    )
}

#[cfg(test)]
mod tests {
    use folio_demo::{
        contact::{ANA, ANA_AI_REPLY, ANA_FALLBACK_REPLY},
        OWNER_NAME,
    };
    use folio_extern_contracts::chat::{ChatRole, MockChatCompletionApiService};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn ai_reply() {
        // Arrange
        let mut chat_completion_api = MockChatCompletionApiService::new().with_is_enabled(true);
        let content = serde_json::to_string(&*ANA_AI_REPLY).unwrap();
        chat_completion_api
            .expect_complete()
            .once()
            .withf(|request| {
                request.json_response
                    && request.messages.len() == 2
                    && request.messages[0].role == ChatRole::System
                    && request.messages[0].content.contains(OWNER_NAME)
                    && request.messages[1].role == ChatRole::User
                    && request.messages[1].content.contains("ana@x.com")
                    && request.messages[1].content.contains("Hello there")
            })
            .return_once(move |_| Box::pin(std::future::ready(Ok(content))));

        let sut = make_sut(chat_completion_api);

        // Act
        let result = sut.compose(&ANA).await;

        // Assert
        assert_eq!(
            result,
            ComposedReply {
                source: ReplySource::Ai,
                reply: ANA_AI_REPLY.clone(),
            }
        );
    }

    #[tokio::test]
    async fn disabled() {
        // Arrange
        let chat_completion_api = MockChatCompletionApiService::new().with_is_enabled(false);
        let sut = make_sut(chat_completion_api);

        // Act
        let result = sut.compose(&ANA).await;

        // Assert
        assert_eq!(result, fallback());
    }

    #[tokio::test]
    async fn request_failed() {
        // Arrange
        let chat_completion_api = MockChatCompletionApiService::new()
            .with_is_enabled(true)
            .with_complete(Err("500 Internal Server Error".into()));
        let sut = make_sut(chat_completion_api);

        // Act
        let result = sut.compose(&ANA).await;

        // Assert
        assert_eq!(result, fallback());
    }

    #[tokio::test]
    async fn unparsable_content() {
        // Arrange
        let chat_completion_api = MockChatCompletionApiService::new()
            .with_is_enabled(true)
            .with_complete(Ok("Sure! Here is your reply: Hello Ana".into()));
        let sut = make_sut(chat_completion_api);

        // Act
        let result = sut.compose(&ANA).await;

        // Assert
        assert_eq!(result, fallback());
    }

    #[tokio::test]
    async fn empty_response() {
        // Arrange
        let content = json!({"greeting": "Hi Ana,", "response": " ", "closing": "Bye"});
        let chat_completion_api = MockChatCompletionApiService::new()
            .with_is_enabled(true)
            .with_complete(Ok(content.to_string()));
        let sut = make_sut(chat_completion_api);

        // Act
        let result = sut.compose(&ANA).await;

        // Assert
        assert_eq!(result, fallback());
    }

    #[tokio::test]
    async fn missing_closing() {
        // Arrange
        let content = json!({"greeting": "Hi Ana,", "response": "Thanks!"});
        let chat_completion_api = MockChatCompletionApiService::new()
            .with_is_enabled(true)
            .with_complete(Ok(content.to_string()));
        let sut = make_sut(chat_completion_api);

        // Act
        let result = sut.compose(&ANA).await;

        // Assert
        assert_eq!(
            result,
            ComposedReply {
                source: ReplySource::Ai,
                reply: DraftedReply {
                    greeting: "Hi Ana,".into(),
                    response: "Thanks!".into(),
                    closing: ANA_FALLBACK_REPLY.closing.clone(),
                },
            }
        );
    }

    fn fallback() -> ComposedReply {
        ComposedReply {
            source: ReplySource::Fallback,
            reply: ANA_FALLBACK_REPLY.clone(),
        }
    }

    fn make_sut(
        chat_completion_api: MockChatCompletionApiService,
    ) -> ContactReplyComposerServiceImpl<MockChatCompletionApiService> {
        ContactReplyComposerServiceImpl {
            chat_completion_api,
            config: ContactReplyComposerConfig {
                owner_name: OWNER_NAME.into(),
                temperature: 0.3,
                max_tokens: 512,
            }
            .into(),
        }
    }
}
