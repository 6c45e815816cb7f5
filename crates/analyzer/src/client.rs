use async_trait::async_trait;
use common::config::LlmConfig;
use common::{PipelineError, PipelineResult};
use reqwest::Client;
use serde::Deserialize;

#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub system: String,
    pub user: String,
    /// Ask the service for a JSON object instead of free text.
    pub json_mode: bool,
}

/// Anything that turns a system + user message into generated text.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> PipelineResult<String>;
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Deserialize)]
struct Message {
    content: Option<String>,
}

/// Client for an OpenAI-compatible `/chat/completions` endpoint, such as a
/// local Ollama server. No API key is sent.
pub struct ChatCompletionClient {
    http_client: Client,
    base_url: String,
    model: String,
    temperature: f32,
}

impl ChatCompletionClient {
    pub fn new(config: &LlmConfig) -> PipelineResult<Self> {
        let http_client = Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl CompletionClient for ChatCompletionClient {
    async fn complete(&self, request: &CompletionRequest) -> PipelineResult<String> {
        let url = format!("{}/chat/completions", self.base_url);
        let mut body = serde_json::json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": request.system},
                {"role": "user", "content": request.user}
            ],
            "temperature": self.temperature
        });
        if request.json_mode {
            body["response_format"] = serde_json::json!({"type": "json_object"});
        }

        let res = self
            .http_client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(PipelineError::Api(format!(
                "completion request failed: {} - {}",
                status, text
            )));
        }

        let resp: ChatCompletionResponse = res.json().await?;
        resp.choices
            .into_iter()
            .next()
            .map(|c| c.message.content.unwrap_or_default())
            .ok_or_else(|| PipelineError::Parse("completion response had no choices".to_string()))
    }
}
