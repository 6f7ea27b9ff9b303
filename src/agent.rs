//! LLM agent module for summarisation.
//!
//! All document text is "stuffed" into a single prompt and sent to an
//! OpenAI-compatible chat completions endpoint (Groq by default). There is
//! no chunking: content larger than the model's context window comes back
//! as an API error.

use crate::config::ModelConfig;
use crate::document::ExtractedDocument;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

pub const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";
pub const DEFAULT_ENDPOINT: &str = "https://api.groq.com/openai/v1/chat/completions";
pub const DEFAULT_TARGET_WORDS: u32 = 300;

/// Instruction template; `{length}` and `{text}` are filled in by [`build_prompt`]
pub const PROMPT_TEMPLATE: &str =
    "Provide a clear, concise summary of the following content in about {length} words.\nContent: {text}";

/// Separator placed between documents in the stuffed prompt
const DOCUMENT_SEPARATOR: &str = "\n\n";

#[derive(Error, Debug)]
pub enum SummarizationError {
    #[error("API credential is required")]
    MissingCredential,
    #[error("target length {target} is outside {min}..={max} words")]
    TargetOutOfRange { target: u32, min: u32, max: u32 },
    #[error("authentication failed: {0}")]
    Authentication(String),
    #[error("rate limited: {0}")]
    RateLimited(String),
    #[error("LLM API returned HTTP {status}: {body}")]
    Api { status: u16, body: String },
    #[error("LLM request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    #[error("failed to parse response: {0}")]
    ParseError(String),
}

/// Allowed summary lengths in words, inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordRange {
    pub min: u32,
    pub max: u32,
    /// Granularity offered by the interactive picker; not enforced
    pub step: u32,
}

impl WordRange {
    pub fn new(min: u32, max: u32, step: u32) -> Self {
        Self { min, max, step }
    }

    pub fn contains(&self, words: u32) -> bool {
        (self.min..=self.max).contains(&words)
    }

    pub fn check(&self, words: u32) -> Result<(), SummarizationError> {
        if self.contains(words) {
            Ok(())
        } else {
            Err(SummarizationError::TargetOutOfRange {
                target: words,
                min: self.min,
                max: self.max,
            })
        }
    }

    /// Every selectable length, `min` first
    pub fn choices(&self) -> Vec<u32> {
        let step = self.step.max(1) as usize;
        (self.min..=self.max).step_by(step).collect()
    }
}

impl Default for WordRange {
    fn default() -> Self {
        Self::new(100, 600, 50)
    }
}

/// A remote model that turns a prompt into text.
#[async_trait]
pub trait CompletionModel: Send + Sync {
    async fn complete(&self, prompt: &str, credential: &str) -> Result<String, SummarizationError>;
}

/// Fill the prompt template with the concatenated document text
pub fn build_prompt(docs: &[ExtractedDocument], target_words: u32) -> String {
    let text = docs
        .iter()
        .map(|doc| doc.text.as_str())
        .collect::<Vec<_>>()
        .join(DOCUMENT_SEPARATOR);

    PROMPT_TEMPLATE
        .replace("{length}", &target_words.to_string())
        .replace("{text}", &text)
}

/// Summarise `docs` in about `target_words` words.
///
/// The credential and target are checked before the model is called. The
/// model's reply is returned untouched.
pub async fn summarize<M: CompletionModel + ?Sized>(
    model: &M,
    docs: &[ExtractedDocument],
    target_words: u32,
    credential: &str,
    range: WordRange,
) -> Result<String, SummarizationError> {
    let credential = credential.trim();
    if credential.is_empty() {
        return Err(SummarizationError::MissingCredential);
    }
    range.check(target_words)?;

    let prompt = build_prompt(docs, target_words);
    debug!(
        documents = docs.len(),
        prompt_chars = prompt.len(),
        target_words,
        "prompt assembled"
    );

    model.complete(&prompt, credential).await
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

/// Chat completions client for Groq and other OpenAI-compatible APIs.
#[derive(Debug, Clone)]
pub struct GroqClient {
    client: Client,
    model: String,
    endpoint: String,
}

impl GroqClient {
    pub fn new(config: &ModelConfig, timeout: Duration) -> Result<Self, SummarizationError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            model: config.name.clone(),
            endpoint: config.endpoint.clone(),
        })
    }
}

#[async_trait]
impl CompletionModel for GroqClient {
    async fn complete(&self, prompt: &str, credential: &str) -> Result<String, SummarizationError> {
        info!(model = %self.model, "requesting completion");

        let request = ChatRequest {
            model: &self.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(credential)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(status_error(status, &body));
        }

        parse_completion(&body)
    }
}

/// Map a failed HTTP status to the matching error
fn status_error(status: StatusCode, body: &str) -> SummarizationError {
    let detail = api_error_message(body).unwrap_or_else(|| body.trim().to_string());
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            SummarizationError::Authentication(detail)
        }
        StatusCode::TOO_MANY_REQUESTS => SummarizationError::RateLimited(detail),
        other => SummarizationError::Api {
            status: other.as_u16(),
            body: detail,
        },
    }
}

/// Pull `error.message` out of an OpenAI-style error body
fn api_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("error")?
        .get("message")?
        .as_str()
        .map(str::to_string)
}

/// Extract the first choice's text from a chat completions response
fn parse_completion(body: &str) -> Result<String, SummarizationError> {
    let response: ChatResponse = serde_json::from_str(body)
        .map_err(|e| SummarizationError::ParseError(format!("{}: {}", e, body)))?;

    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| SummarizationError::ParseError("response has no message content".into()))
}
