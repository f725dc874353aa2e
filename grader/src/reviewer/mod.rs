//! # Quality Reviewer
//!
//! LLM-backed code-quality review over an OpenAI-compatible chat-completions
//! endpoint. Builds one deterministic prompt from the collected source, test
//! results, optional rubric, and registry data, then parses a strict JSON
//! analysis out of a possibly malformed response (see [`parse`]).
//!
//! The reviewer is deliberately infallible: any network or parsing failure
//! degrades into a zero-score [`QualityAnalysis`] whose report explains the
//! failure, so a submission still reaches a terminal `completed` state with
//! an explainable grade.

pub mod parse;
pub mod prompt;

use crate::config::ReviewerConfig;
use crate::traits::{ReviewInput, Reviewer};
use crate::types::{ProjectType, QualityAnalysis};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::time::Duration;

/// Request body for the chat-completions API.
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

/// A single chat message in the request.
#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

/// Response from the chat-completions API.
#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

/// One candidate completion.
#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

/// The generated message of a candidate completion.
#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

/// Production reviewer backed by an LLM provider. All settings come from the
/// explicit [`ReviewerConfig`] handed to the constructor; nothing here reads
/// the process environment.
pub struct LlmReviewer {
    client: reqwest::Client,
    config: ReviewerConfig,
}

impl LlmReviewer {
    pub fn new(config: ReviewerConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_default();
        Self { client, config }
    }

    /// One completion call. Returns the model's message content, or a
    /// human-readable reason on any failure.
    async fn complete(&self, prompt: &str) -> Result<String, String> {
        let request_body = ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        let response = self
            .client
            .post(format!(
                "{}/chat/completions",
                self.config.base_url.trim_end_matches('/')
            ))
            .bearer_auth(&self.config.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| format!("request failed: {}", e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| format!("error reading response body: {}", e))?;

        if !status.is_success() {
            return Err(format!("provider returned {}: {}", status, body.trim()));
        }

        let parsed = serde_json::from_str::<ChatResponse>(&body)
            .map_err(|e| format!("error decoding response body: {}. Full response: {}", e, body))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| "provider returned no completion choices".to_string())
    }
}

/// The degraded analysis substituted when the model call itself fails.
pub fn failed_analysis(project_type: ProjectType, reason: &str) -> QualityAnalysis {
    QualityAnalysis {
        code_quality_score: 0.0,
        code_smell_score: (!project_type.is_executable()).then_some(0.0),
        test_score: None,
        report: format!(
            "## Automated Review Unavailable\n\nAI analysis failed: {}\n\n\
             The quality score defaults to 0; the test results above are unaffected.",
            reason
        ),
    }
}

#[async_trait]
impl Reviewer for LlmReviewer {
    async fn review(&self, input: ReviewInput<'_>) -> QualityAnalysis {
        let prompt = prompt::build_prompt(&input);
        match self.complete(&prompt).await {
            Ok(content) => parse::parse_analysis(&content, input.project_type),
            Err(reason) => {
                log::warn!("quality review degraded: {}", reason);
                failed_analysis(input.project_type, &reason)
            }
        }
    }
}
