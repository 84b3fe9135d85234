use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, error};

use super::error::LlmError;
use super::types::{
    ChatCompletionRequest, ChatCompletionResponse, GenerateContentRequest,
    GenerateContentResponse, Message,
};

pub type Result<T> = std::result::Result<T, LlmError>;

#[async_trait]
pub trait LlmClient: Send + Sync {
    fn model(&self) -> &str;
    async fn invoke(&self, messages: Vec<Message>) -> Result<String>;
}

/// Hand back the response on 2xx, otherwise read the body and classify it.
async fn check_status(provider: &str, response: Response) -> Result<Response> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let error_text = response.text().await?;
    error!("{} API error {}: {}", provider, status, error_text);
    Err(LlmError::from_status(status, &error_text))
}

pub struct GeminiClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: SecretString,
}

impl GeminiClient {
    pub const DEFAULT_BASE_URL: &'static str = "https://generativelanguage.googleapis.com";

    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: SecretString,
    ) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key,
        }
    }
}

#[async_trait]
impl LlmClient for GeminiClient {
    fn model(&self) -> &str {
        &self.model
    }

    async fn invoke(&self, messages: Vec<Message>) -> Result<String> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );

        debug!("Sending generateContent request to Gemini: {}", self.model);

        let body = GenerateContentRequest::from_messages(messages);
        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(&body)
            .send()
            .await?;

        let response = check_status("Gemini", response).await?;
        let reply: GenerateContentResponse = response.json().await?;

        let content = reply.into_text()?;

        debug!("Gemini response: {}", content);
        Ok(content)
    }
}

pub struct OpenAiClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: SecretString,
}

impl OpenAiClient {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.openai.com/v1";

    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: SecretString,
    ) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key,
        }
    }
}

#[async_trait]
impl LlmClient for OpenAiClient {
    fn model(&self) -> &str {
        &self.model
    }

    async fn invoke(&self, messages: Vec<Message>) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);

        debug!("Sending chat request to OpenAI: {}", self.model);

        let body = ChatCompletionRequest {
            model: &self.model,
            messages,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await?;

        let response = check_status("OpenAI", response).await?;
        let reply: ChatCompletionResponse = response.json().await?;

        let content = reply.into_text()?;

        debug!("OpenAI response: {}", content);
        Ok(content)
    }
}
