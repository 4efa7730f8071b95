// Gemini generateContent client.
// Single-shot generation plus the retry loop with backoff, lite-model fallback and truncation handling.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{
    Client,
    header::{HeaderMap, HeaderValue},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::Settings;
use crate::error::{AppError, Result};

use super::TextGenerator;
use super::retry::{RetryPolicy, keep_longest};

/// Why the model stopped producing tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FinishReason {
    Stop,
    MaxTokens,
    Safety,
    Recitation,
    #[default]
    #[serde(other)]
    Unknown,
}

/// Text returned by one generation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generation {
    pub text: String,
    pub finish_reason: FinishReason,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: FinishReason,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    code: u16,
    message: String,
}

/// Gemini API client bound to a primary and a lite model.
pub struct GeminiClient {
    client: Client,
    base_url: String,
    model: String,
    lite_model: String,
    temperature: f32,
    policy: RetryPolicy,
}

impl GeminiClient {
    /// Create a new client for the given API key and models.
    pub fn new(
        api_key: &str,
        base_url: &str,
        model: &str,
        lite_model: &str,
        timeout: Duration,
    ) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-goog-api-key",
            HeaderValue::from_str(api_key).map_err(|e| AppError::Other(e.to_string()))?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            lite_model: lite_model.to_string(),
            temperature: 0.8,
            policy: RetryPolicy::default(),
        })
    }

    /// Create a client from loaded settings.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let gemini = &settings.gemini;
        Ok(Self::new(
            settings.gemini_api_key()?,
            &gemini.base_url,
            &gemini.model,
            &gemini.lite_model,
            Duration::from_secs(gemini.timeout_secs),
        )?
        .with_temperature(gemini.temperature))
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// One generateContent call against `model`.
    pub async fn generate_once(
        &self,
        model: &str,
        prompt: &str,
        max_output_tokens: u32,
    ) -> Result<Generation> {
        let url = format!("{}/models/{}:generateContent", self.base_url, model);
        let request = GenerateRequest {
            contents: [Content {
                parts: [Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                max_output_tokens,
                temperature: self.temperature,
            },
        };

        debug!(model, max_output_tokens, "gemini request");
        let response = self.client.post(&url).json(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|_| AppError::InvalidResponse("Gemini"))?;

        if let Some(error) = body.error {
            return Err(AppError::Upstream {
                status: error.code,
                message: error.message,
            });
        }

        let candidate = body.candidates.into_iter().next();
        let finish_reason = candidate
            .as_ref()
            .map(|c| c.finish_reason)
            .unwrap_or_default();
        let text: String = candidate
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect()
            })
            .unwrap_or_default();

        let text = text.trim();
        if text.is_empty() {
            return Err(AppError::Upstream {
                status: 500,
                message: "No content generated".to_string(),
            });
        }

        Ok(Generation {
            text: text.to_string(),
            finish_reason,
        })
    }

    /// Generate text, riding out overload, rate limiting and truncation.
    ///
    /// 503 responses are retried on the same model after each backoff delay; once
    /// the schedule is spent the lite model is tried. 429 switches to the lite model
    /// at once. A MAX_TOKENS truncation is retried once with the extended budget.
    /// When no attempt completes, the longest partial text wins over the error.
    pub async fn generate_with_retry(&self, prompt: &str) -> Result<String> {
        let mut model = self.model.as_str();
        let mut on_lite = false;
        let mut max_tokens = self.policy.initial_tokens;
        let mut extended = false;
        let mut backoff = self.policy.backoff.iter();
        let mut best_partial: Option<String> = None;

        let last_error = loop {
            match self.generate_once(model, prompt, max_tokens).await {
                Ok(generation) if generation.finish_reason == FinishReason::MaxTokens => {
                    keep_longest(&mut best_partial, generation.text);
                    if extended {
                        warn!(model, max_tokens, "gemini output truncated again, using best partial");
                        break None;
                    }
                    warn!(model, max_tokens, "gemini output truncated, retrying with larger budget");
                    extended = true;
                    max_tokens = self.policy.extended_tokens;
                }
                Ok(generation) => return Ok(generation.text),
                Err(e) => match e.upstream_status() {
                    Some(503) => {
                        if let Some(delay) = backoff.next() {
                            warn!(model, delay_ms = delay.as_millis() as u64, "gemini overloaded, backing off");
                            tokio::time::sleep(*delay).await;
                        } else if !on_lite {
                            warn!(model, fallback = %self.lite_model, "gemini still overloaded, switching to lite model");
                            on_lite = true;
                            model = self.lite_model.as_str();
                        } else {
                            break Some(e);
                        }
                    }
                    Some(429) if !on_lite => {
                        warn!(model, fallback = %self.lite_model, "gemini rate limited, switching to lite model");
                        on_lite = true;
                        model = self.lite_model.as_str();
                    }
                    _ => break Some(e),
                },
            }
        };

        match (best_partial, last_error) {
            (Some(text), error) => {
                if let Some(e) = error {
                    warn!(error = %e, "gemini failed after a truncated attempt, returning partial text");
                }
                Ok(text)
            }
            (None, Some(e)) => Err(e),
            (None, None) => Err(AppError::Other("Gemini produced no text".to_string())),
        }
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.generate_with_retry(prompt).await
    }
}
