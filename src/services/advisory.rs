//! Budget advice from a text-generation service.
//!
//! The event's totals and items are summarized into a single prompt and sent to
//! the model; the raw answer text is returned. Any failure yields
//! [`FALLBACK_ADVICE`] instead of an error, since advice is optional.

use crate::{
    config::settings::AdvisoryConfig,
    core::report::advisory_prompt,
    entities::Event,
    errors::{Error, Result},
};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{error, info, instrument, warn};

/// Returned whenever advice cannot be produced.
pub const FALLBACK_ADVICE: &str =
    "Suggestions could not be loaded right now. Please check your connection.";

/// Produces free-form budget advice for an event.
#[async_trait]
pub trait Advisor: Send + Sync {
    /// Advice text for `event`, or [`FALLBACK_ADVICE`] on failure.
    async fn advise(&self, event: &Event) -> String;
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

impl GenerateResponse {
    /// Concatenated text of the first candidate, if it has any.
    fn into_text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content.parts.into_iter().map(|part| part.text).collect();
        if text.trim().is_empty() { None } else { Some(text) }
    }
}

/// [`Advisor`] backed by the Gemini `generateContent` API.
pub struct GeminiAdvisor {
    client: Client,
    config: AdvisoryConfig,
    api_key: Option<String>,
}

impl GeminiAdvisor {
    /// Builds an advisor. Without an API key every call returns the fallback.
    ///
    /// # Errors
    /// Returns [`Error::Http`] if the HTTP client cannot be constructed.
    pub fn new(config: AdvisoryConfig, api_key: Option<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            config,
            api_key,
        })
    }

    fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.endpoint.trim_end_matches('/'),
            self.config.model
        )
    }

    /// Sends the prompt and extracts the answer text.
    ///
    /// # Errors
    /// Returns [`Error::Network`] if no API key is configured, the service
    /// answers with a non-success status or an empty answer.
    #[instrument(skip(self, prompt))]
    pub async fn generate(&self, prompt: &str) -> Result<String> {
        let api_key = self.api_key.as_deref().ok_or_else(|| Error::Network {
            message: "no advisory API key configured".to_string(),
        })?;

        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Network {
                message: format!("advisory request failed with status {status}"),
            });
        }

        let parsed: GenerateResponse = response.json().await?;
        parsed.into_text().ok_or_else(|| Error::Network {
            message: "advisory service returned no text".to_string(),
        })
    }
}

#[async_trait]
impl Advisor for GeminiAdvisor {
    async fn advise(&self, event: &Event) -> String {
        let prompt = advisory_prompt(event, &self.config.language);
        match self.generate(&prompt).await {
            Ok(advice) => {
                info!("Received advice for event {}", event.id);
                advice
            }
            Err(e) if self.api_key.is_none() => {
                warn!("Advice unavailable: {}", e);
                FALLBACK_ADVICE.to_string()
            }
            Err(e) => {
                error!("Advisory request failed: {}", e);
                FALLBACK_ADVICE.to_string()
            }
        }
    }
}
