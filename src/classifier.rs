use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use std::time::Duration;
use tracing::debug;

use crate::config::ClassifierConfig;
use crate::error::{Result, WorkerError};
use crate::model::{has_required_keys, ClassificationDocument};

/// Per-chunk classification seam. The pipeline only depends on this
/// trait, so tests can substitute a scripted backend.
#[async_trait]
pub trait ChunkClassifier: Send + Sync {
    async fn classify(&self, chunk: &str) -> Result<ClassificationDocument>;
}

/// Gemini-backed classifier client.
#[derive(Debug)]
pub struct GeminiClient {
    config: ClassifierConfig,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiContent,
}

impl GeminiClient {
    /// Create the client. Fails immediately when no API key is
    /// configured, before any transcription work is spent.
    pub fn new(config: ClassifierConfig) -> Result<Self> {
        if config.api_key.is_none() {
            return Err(WorkerError::ClassifierNotConfigured(
                "GEMINI_API_KEY is not set".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self { config, client })
    }
}

#[async_trait]
impl ChunkClassifier for GeminiClient {
    async fn classify(&self, chunk: &str) -> Result<ClassificationDocument> {
        let api_key = self.config.api_key.as_ref().ok_or_else(|| {
            WorkerError::ClassifierNotConfigured("GEMINI_API_KEY is not set".to_string())
        })?;

        let request = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart {
                    text: build_prompt(chunk),
                }],
            }],
        };

        let url = format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent?key={}",
            self.config.model, api_key
        );

        debug!("Sending {} chars to Gemini", chunk.chars().count());

        let response = self.client.post(&url).json(&request).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(WorkerError::MalformedResponse(format!(
                "Gemini API error {}: {}",
                status, body
            )));
        }

        let gemini_response: GeminiResponse = response
            .json()
            .await
            .map_err(|e| WorkerError::MalformedResponse(e.to_string()))?;

        let raw = gemini_response
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.as_str())
            .ok_or_else(|| {
                WorkerError::MalformedResponse("no candidates in response".to_string())
            })?;

        parse_classifier_output(raw)
    }
}

/// Strict-JSON classification prompt for one transcript chunk.
fn build_prompt(chunk: &str) -> String {
    format!(
        r#"Return STRICT JSON ONLY.

{{
  "entities": {{
    "people": [],
    "tools": [],
    "brands": [],
    "products": [],
    "organizations": []
  }},
  "tone": {{
    "primary": "",
    "secondary": [],
    "confidence": 0.0
  }},
  "style": {{
    "primary": "",
    "confidence": 0.0
  }},
  "safety_flags": {{
    "sensitive_domains": [],
    "severity": "",
    "requires_review": false
  }}
}}

Transcript:
{}"#,
        chunk
    )
}

/// Pull the first brace-delimited block out of the raw model text. Models wrap
/// JSON in prose or markdown fences often enough that parsing the whole
/// response directly is not viable.
fn extract_json_block(text: &str) -> &str {
    static JSON_BLOCK: OnceLock<Regex> = OnceLock::new();
    let re = JSON_BLOCK.get_or_init(|| Regex::new(r"(?s)\{.*\}").expect("static pattern"));
    re.find(text).map(|m| m.as_str()).unwrap_or(text)
}

/// Parse raw model text into a validated classification document.
///
/// Failure modes map onto the protocol error taxonomy: unparseable text
/// is a malformed response, a parsed object missing required keys is
/// schema-invalid. Both abort the whole run.
pub fn parse_classifier_output(raw: &str) -> Result<ClassificationDocument> {
    let value: serde_json::Value = serde_json::from_str(extract_json_block(raw))
        .map_err(|e| WorkerError::MalformedResponse(e.to_string()))?;

    if !has_required_keys(&value) {
        return Err(WorkerError::SchemaInvalid);
    }

    serde_json::from_value(value).map_err(|e| WorkerError::MalformedResponse(e.to_string()))
}
