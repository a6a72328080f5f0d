//! Best-effort narrative generation.
//!
//! One bounded prompt goes to a Gemini-style text-generation API; transient
//! failures are retried, and a terminal failure is reported as display
//! content rather than an error. The numeric dashboard must render whether
//! or not this call succeeds.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::SummaryConfig;
use crate::error::SummaryError;
use crate::model::CurrentConditions;
use crate::retry::{RetryConfig, with_retry};

/// Narrative generation seam. Implementations never fail loudly; the string
/// is either the generated text or an explanatory failure message.
#[async_trait]
pub trait Summarizer: Send + Sync + Debug {
    async fn summarize(&self, conditions: &CurrentConditions) -> String;
}

/// Build the prompt from the readings the narrative should react to.
/// Missing fields read as "unknown" so the prompt stays well-formed.
#[must_use]
pub fn build_prompt(conditions: &CurrentConditions) -> String {
    let sky = conditions.sky_text.as_deref().unwrap_or("unknown");
    let temperature = conditions
        .temperature_c
        .map_or_else(|| "unknown".to_string(), |t| format!("{t:.1}"));
    let uv = conditions.uv_index_text.as_deref().unwrap_or("unknown");

    format!(
        "The current weather is {sky} with a temperature of {temperature} °C \
         and a UV index described as {uv}. Do not restate the readings or \
         define the terms. Explain in simple language, for a general \
         audience, what to do in this weather, considering temperature, \
         pressure and humidity."
    )
}

/// Cap the prompt at `max_words` whitespace-separated words. Truncation is
/// by word, never mid-word.
#[must_use]
pub fn truncate_words(prompt: &str, max_words: usize) -> String {
    prompt
        .split_whitespace()
        .take(max_words)
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: Client,
    api_key: String,
    base_url: String,
    model: String,
    max_prompt_words: usize,
    retry: RetryConfig,
}

impl GeminiClient {
    pub fn new(config: &SummaryConfig) -> anyhow::Result<Self> {
        let api_key = config.require_api_key()?.to_string();

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            max_prompt_words: config.max_prompt_words,
            retry: config.retry.clone(),
        })
    }

    async fn generate(&self, prompt: &str) -> Result<String, SummaryError> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.base_url, self.model
        );
        let request = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![TextPart { text: prompt.to_string() }],
            }],
        };

        debug!(model = %self.model, "requesting weather narrative");

        let response = with_retry(&self.retry, || async {
            self.http
                .post(&url)
                .query(&[("key", self.api_key.as_str())])
                .json(&request)
                .send()
                .await
        })
        .await
        .map_err(|e| SummaryError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SummaryError::Rejected {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| SummaryError::InvalidResponse(e.to_string()))?;

        parsed
            .first_text()
            .ok_or_else(|| SummaryError::InvalidResponse("response contained no text".to_string()))
    }
}

#[async_trait]
impl Summarizer for GeminiClient {
    async fn summarize(&self, conditions: &CurrentConditions) -> String {
        let prompt = truncate_words(&build_prompt(conditions), self.max_prompt_words);

        match self.generate(&prompt).await {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "narrative generation failed, degrading to message");
                format!("Weather summary unavailable: {e}")
            }
        }
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<RequestContent>,
}

#[derive(Debug, Serialize)]
struct RequestContent {
    parts: Vec<TextPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct TextPart {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

impl GenerateResponse {
    fn first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()
            .map(|p| p.text)
    }
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<TextPart>,
}
