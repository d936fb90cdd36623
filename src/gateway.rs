use async_openai::{
    Client,
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs, CreateChatCompletionResponse,
    },
};
use std::future::Future;

use crate::error::GatewayError;
use crate::message::{Message, Role};
use crate::settings::Settings;

/// Boundary through which every text generation request passes.
///
/// One attempt per call, no retries. An empty or malformed completion is an
/// empty reply, not an error.
pub trait Gateway: Send + Sync {
    fn complete(
        &self,
        messages: &[Message],
        temperature: f32,
        max_tokens: u32,
    ) -> impl Future<Output = Result<String, GatewayError>> + Send;

    fn prompt(
        &self,
        system: &str,
        user: &str,
        temperature: f32,
        max_tokens: u32,
    ) -> impl Future<Output = Result<String, GatewayError>> + Send {
        let messages = vec![Message::system(system), Message::user(user)];
        async move { self.complete(&messages, temperature, max_tokens).await }
    }
}

// Chat requests must open with exactly the priming system entry.
pub fn validate_messages(messages: &[Message]) -> Result<(), GatewayError> {
    match messages.first() {
        None => Err(GatewayError::InvalidRequest(
            "message list is empty".to_string(),
        )),
        Some(first) if first.role != Role::System => Err(GatewayError::InvalidRequest(
            format!("first message must be a system message, got {}", first.role),
        )),
        Some(_) => Ok(()),
    }
}

/// Inline rendering of a gateway failure, shown to the player in place of a reply.
pub fn error_reply(err: &GatewayError) -> String {
    format!("⚠️ LLM Error: {err}")
}

#[derive(Clone, Debug)]
pub struct OpenAiGateway {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiGateway {
    pub fn new(client: Client<OpenAIConfig>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    pub fn for_interrogation(settings: &Settings, api_key: &str) -> Self {
        Self::new(settings.client(api_key), &settings.interrogation_model)
    }

    pub fn for_story(settings: &Settings, api_key: &str) -> Self {
        Self::new(settings.client(api_key), &settings.story_model)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn request(
        &self,
        messages: &[Message],
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String, GatewayError> {
        let messages = messages
            .iter()
            .map(to_request_message)
            .collect::<Result<Vec<_>, _>>()?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .temperature(temperature)
            .max_tokens(max_tokens)
            .build()?;

        let response = self.client.chat().create(request).await?;
        Ok(reply_text(response))
    }
}

impl Gateway for OpenAiGateway {
    async fn complete(
        &self,
        messages: &[Message],
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String, GatewayError> {
        validate_messages(messages)?;
        log::debug!(
            "Completion request: model={}, messages={}, temperature={}",
            self.model,
            messages.len(),
            temperature
        );
        let result = self.request(messages, temperature, max_tokens).await;
        if let Err(e) = &result {
            log::error!("Completion failed: {e}");
        }
        result
    }
}

// No choices or a null content both read as an empty reply.
fn reply_text(response: CreateChatCompletionResponse) -> String {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .unwrap_or_default()
}

fn to_request_message(message: &Message) -> Result<ChatCompletionRequestMessage, GatewayError> {
    let content = message.prompt_content();
    let request_message = match message.role {
        Role::System => ChatCompletionRequestSystemMessageArgs::default()
            .content(content)
            .build()?
            .into(),
        Role::User => ChatCompletionRequestUserMessageArgs::default()
            .content(content)
            .build()?
            .into(),
        Role::Assistant => ChatCompletionRequestAssistantMessageArgs::default()
            .content(content)
            .build()?
            .into(),
    };
    Ok(request_message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_history_is_rejected() {
        assert!(matches!(
            validate_messages(&[]),
            Err(GatewayError::InvalidRequest(_))
        ));
    }

    #[test]
    fn history_must_open_with_system_entry() {
        let history = [Message::user("hello")];
        assert!(matches!(
            validate_messages(&history),
            Err(GatewayError::InvalidRequest(_))
        ));

        let history = [Message::system("rules"), Message::user("hello")];
        assert!(validate_messages(&history).is_ok());
    }

    #[test]
    fn error_reply_carries_the_error_text() {
        let reply = error_reply(&GatewayError::Remote("401 Unauthorized".into()));
        assert_eq!(reply, "⚠️ LLM Error: 401 Unauthorized");
    }

    fn response(choices: &str) -> CreateChatCompletionResponse {
        let json = format!(
            r#"{{"id":"chatcmpl-1","object":"chat.completion","created":0,"model":"llama-3.1-8b-instant","choices":{choices}}}"#
        );
        serde_json::from_str(&json).unwrap()
    }

    #[test]
    fn reply_text_takes_the_first_choice() {
        let reply = reply_text(response(
            r#"[{"index":0,"message":{"role":"assistant","content":"I was at home."},"finish_reason":"stop"}]"#,
        ));
        assert_eq!(reply, "I was at home.");
    }

    #[test]
    fn missing_choices_read_as_empty_reply() {
        assert_eq!(reply_text(response("[]")), "");
    }

    #[test]
    fn null_content_reads_as_empty_reply() {
        let reply = reply_text(response(
            r#"[{"index":0,"message":{"role":"assistant","content":null},"finish_reason":"stop"}]"#,
        ));
        assert_eq!(reply, "");
    }

    #[test]
    fn request_messages_keep_roles() {
        let converted = to_request_message(&Message::assistant("hi")).unwrap();
        assert!(matches!(
            converted,
            ChatCompletionRequestMessage::Assistant(_)
        ));
        let converted = to_request_message(&Message::user("who?").with_suspect("Chef")).unwrap();
        assert!(matches!(converted, ChatCompletionRequestMessage::User(_)));
    }
}
