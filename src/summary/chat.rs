//! Chat-completion summarizer (OpenRouter, OpenAI and compatible APIs).

use super::{Summarizer, REMOTE_ERROR_PREFIX};
use crate::config::SummarizationSettings;
use crate::error::{RecapError, Result};
use crate::openai::create_client;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequest,
    CreateChatCompletionRequestArgs,
};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Summarizer that posts the transcript to a chat-completions endpoint.
pub struct ChatCompletionSummarizer {
    http: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    system_prompt: String,
}

impl ChatCompletionSummarizer {
    /// Create a summarizer.
    ///
    /// `api_key` is sent as a bearer token. Without one, requests go out
    /// unauthenticated and the remote API's refusal surfaces in the summary.
    pub fn new(
        settings: &SummarizationSettings,
        api_key: Option<String>,
        system_prompt: &str,
    ) -> Result<Self> {
        if api_key.is_none() {
            warn!(
                "No API key configured ({} is unset); summarization requests will be unauthenticated",
                settings.api_key_env
            );
        }

        Ok(Self {
            http: create_client(settings.timeout_secs.map(Duration::from_secs))?,
            endpoint: settings.endpoint.clone(),
            model: settings.model.clone(),
            api_key,
            system_prompt: system_prompt.to_string(),
        })
    }

    fn build_request(&self, transcript: &str) -> Result<CreateChatCompletionRequest> {
        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(self.system_prompt.clone())
                .build()
                .map_err(|e| RecapError::Summarization(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(transcript)
                .build()
                .map_err(|e| RecapError::Summarization(e.to_string()))?
                .into(),
        ];

        CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .build()
            .map_err(|e| RecapError::Summarization(e.to_string()))
    }
}

#[async_trait]
impl Summarizer for ChatCompletionSummarizer {
    #[instrument(skip(self, transcript), fields(model = %self.model, transcript_len = transcript.len()))]
    async fn summarize(&self, transcript: &str) -> Result<String> {
        let request = self.build_request(transcript)?;

        info!("Requesting summary from {}", self.endpoint);

        let mut builder = self.http.post(&self.endpoint).json(&request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await.map_err(|e| {
            RecapError::Summarization(format!("Request to {} failed: {}", self.endpoint, e))
        })?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await?;
            warn!(%status, "Summarization API returned an error");
            return Ok(format!("{REMOTE_ERROR_PREFIX}{body}"));
        }

        let envelope: ChatCompletionEnvelope = response.json().await.map_err(|e| {
            RecapError::Summarization(format!("Failed to parse chat completion response: {}", e))
        })?;

        let summary = envelope
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| {
                RecapError::Summarization(
                    "Chat completion response contained no message content".to_string(),
                )
            })?;

        debug!("Received {} bytes of summary", summary.len());
        Ok(summary)
    }
}

// Only the fields read back; compatible providers add their own extras.
#[derive(Debug, Deserialize)]
struct ChatCompletionEnvelope {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}
