//! Chat completions client.
//!
//! The generator builds a [`ChatRequest`] and hands it to a [`ChatModel`]; the
//! live implementation posts it to `{OPENAI_API_URL}/chat/completions`.

use async_trait::async_trait;
use reqwest::{Client, header};

use crate::{
    error::PipelineError,
    types::{ChatRequest, ChatResponse},
};

#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, PipelineError>;
}

pub struct OpenAiClient {
    http: Client,
    api_url: String,
    api_key: String,
}

impl OpenAiClient {
    pub fn new(api_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        OpenAiClient {
            http: Client::new(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl ChatModel for OpenAiClient {
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, PipelineError> {
        let response = self
            .http
            .post(format!("{}/chat/completions", self.api_url))
            .header(header::CONTENT_TYPE, "application/json")
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(PipelineError::openai)?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(PipelineError::Generation(format!(
                "chat endpoint returned {status}: {error_text}"
            )));
        }

        response
            .json::<ChatResponse>()
            .await
            .map_err(|e| PipelineError::Generation(format!("unreadable chat response: {e}")))
    }
}
