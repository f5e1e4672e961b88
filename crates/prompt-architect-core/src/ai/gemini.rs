use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::category::Category;
use crate::enhance::{system_instruction, user_content, EnhanceError, Enhancer};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

const TEMPERATURE: f32 = 0.75;
const TOP_P: f32 = 0.9;
const TOP_K: u32 = 40;

#[derive(Serialize)]
struct GeminiPart {
    text: String,
}

#[derive(Serialize)]
struct GeminiInstruction {
    parts: Vec<GeminiPart>,
}

#[derive(Serialize)]
struct GeminiContent {
    role: String,
    parts: Vec<GeminiPart>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
    top_k: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    system_instruction: GeminiInstruction,
    contents: Vec<GeminiContent>,
    generation_config: GenerationConfig,
}

#[derive(Deserialize, Default)]
struct GeminiResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize, Default)]
struct GeminiResponseContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiResponseContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
struct GeminiErrorBody {
    message: String,
}

#[derive(Deserialize)]
struct GeminiErrorResponse {
    error: GeminiErrorBody,
}

/// Where the API key comes from. Resolved on every request.
#[derive(Debug, Clone)]
pub enum KeySource {
    /// `API_KEY`, then `GEMINI_API_KEY`, then the configured fallback
    Environment { fallback: Option<String> },
    Static(Option<String>),
}

const KEY_VARS: [&str; 2] = ["API_KEY", "GEMINI_API_KEY"];

fn non_blank(key: Option<String>) -> Option<String> {
    key.filter(|k| !k.trim().is_empty())
}

impl KeySource {
    pub fn resolve(&self) -> Option<String> {
        self.resolve_with(|name| std::env::var(name).ok())
    }

    /// Resolve using `lookup` in place of the process environment
    pub fn resolve_with<F>(&self, lookup: F) -> Option<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        match self {
            KeySource::Environment { fallback } => KEY_VARS
                .into_iter()
                .find_map(|name| non_blank(lookup(name)))
                .or_else(|| non_blank(fallback.clone())),
            KeySource::Static(key) => non_blank(key.clone()),
        }
    }
}

#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
    model: String,
    key_source: KeySource,
}

impl GeminiClient {
    pub fn new(key_source: KeySource) -> Self {
        Self {
            client: Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            key_source,
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    pub async fn generate(
        &self,
        category: Option<&Category>,
        keywords: &str,
    ) -> Result<String, EnhanceError> {
        let api_key = match self.key_source.resolve() {
            Some(key) => key,
            None => {
                error!("no Gemini API key configured");
                return Err(EnhanceError::MissingApiKey);
            }
        };

        let request = build_request(category, keywords);
        info!(
            model = %self.model,
            category = category.map(|c| c.name).unwrap_or("none"),
            "requesting prompt enhancement"
        );

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| provider_error(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| provider_error(e.to_string()))?;

        if !status.is_success() {
            return Err(provider_error(describe_failure(status, &body)));
        }

        let text = parse_response(&body).map_err(provider_error)?;
        debug!(chars = text.chars().count(), "received enhanced prompt");
        Ok(text)
    }
}

#[async_trait]
impl Enhancer for GeminiClient {
    async fn enhance(
        &self,
        category: Option<&'static Category>,
        keywords: &str,
    ) -> Result<String, EnhanceError> {
        self.generate(category, keywords).await
    }
}

fn provider_error(detail: String) -> EnhanceError {
    error!(%detail, "Gemini request failed");
    EnhanceError::Provider(detail)
}

fn build_request(category: Option<&Category>, keywords: &str) -> GeminiRequest {
    GeminiRequest {
        system_instruction: GeminiInstruction {
            parts: vec![GeminiPart {
                text: system_instruction(category),
            }],
        },
        contents: vec![GeminiContent {
            role: "user".to_string(),
            parts: vec![GeminiPart {
                text: user_content(keywords),
            }],
        }],
        generation_config: GenerationConfig {
            temperature: TEMPERATURE,
            top_p: TOP_P,
            top_k: TOP_K,
        },
    }
}

/// Status line plus the provider's own message when the error body parses
fn describe_failure(status: reqwest::StatusCode, body: &str) -> String {
    match serde_json::from_str::<GeminiErrorResponse>(body) {
        Ok(parsed) => format!("Gemini API error {}: {}", status, parsed.error.message),
        Err(_) if body.trim().is_empty() => format!("Gemini API error {}", status),
        Err(_) => format!("Gemini API error {}: {}", status, body.trim()),
    }
}

/// Concatenate the text parts of the first candidate
fn parse_response(body: &str) -> Result<String, String> {
    let response: GeminiResponse =
        serde_json::from_str(body).map_err(|e| format!("invalid response from Gemini: {}", e))?;

    let Some(candidate) = response.candidates.into_iter().next() else {
        let reason = response
            .prompt_feedback
            .and_then(|f| f.block_reason)
            .map(|r| format!("prompt was blocked ({})", r))
            .unwrap_or_else(|| "response contained no candidates".to_string());
        return Err(reason);
    };

    let text: String = candidate
        .content
        .unwrap_or_default()
        .parts
        .into_iter()
        .filter_map(|p| p.text)
        .collect();

    if text.is_empty() {
        return Err(match candidate.finish_reason {
            Some(reason) => format!("response contained no text (finish reason: {})", reason),
            None => "response contained no text".to_string(),
        });
    }

    Ok(text)
}
