/// LLM Client — the single point of entry for all Gemini API calls in Tailr.
///
/// ARCHITECTURAL RULE: No other module may call the generative-language API
/// directly. All model interactions MUST go through this module.
///
/// Three response modes are supported, selected per call:
///   - free text (summary generation, description refinement)
///   - constrained JSON against a declared response schema (rewrite,
///     extraction, keyword analysis, audit)
///   - search-tool-augmented free text (URL-based extraction; the platform
///     does NOT enforce a schema here, so callers must parse defensively)
///
/// Calls are NOT retried. Transport and provider errors propagate verbatim
/// to the caller, which surfaces them to the user.
use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
/// The model used for all LLM calls in Tailr.
/// This is intentionally hardcoded to prevent accidental drift.
pub const MODEL: &str = "gemini-2.5-flash";

/// Every AI operation fails with the same taxonomy. `MissingApiKey` is
/// raised before any request is constructed; `EmptyResponse` and
/// `MalformedOutput` are deliberately distinct so callers can tell "the
/// model said nothing" from "the model said garbage".
#[derive(Debug, Error)]
pub enum AiError {
    #[error("Gemini API key is missing or a placeholder — set GEMINI_API_KEY")]
    MissingApiKey,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("model returned no usable text")]
    EmptyResponse,

    #[error("model output is not valid JSON: {0}")]
    MalformedOutput(String),
}

/// How the model should shape its response.
#[derive(Debug, Clone)]
pub enum ResponseMode {
    /// Plain text, trimmed.
    Text,
    /// JSON constrained by the given response schema.
    Json(Value),
    /// Free text backed by the external-search tool. No schema enforcement.
    Search,
}

/// Inline binary attachment (a PDF, typically) sent alongside the prompt.
#[derive(Debug, Clone)]
pub struct Attachment {
    pub mime_type: String,
    pub data: Vec<u8>,
}

/// One generation request. Prompt plus optional attachment, response mode,
/// and sampling temperature.
#[derive(Debug)]
pub struct GenerateRequest<'a> {
    pub prompt: &'a str,
    pub attachment: Option<&'a Attachment>,
    pub mode: ResponseMode,
    pub temperature: Option<f32>,
}

impl<'a> GenerateRequest<'a> {
    pub fn text(prompt: &'a str) -> Self {
        GenerateRequest {
            prompt,
            attachment: None,
            mode: ResponseMode::Text,
            temperature: None,
        }
    }

    pub fn json(prompt: &'a str, schema: Value) -> Self {
        GenerateRequest {
            prompt,
            attachment: None,
            mode: ResponseMode::Json(schema),
            temperature: None,
        }
    }

    pub fn with_attachment(mut self, attachment: &'a Attachment) -> Self {
        self.attachment = Some(attachment);
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Wire types (generateContent REST shape)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentBody {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<Tool>>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    /// Base64-encoded payload, per the inline-data wire contract.
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Tool {
    google_search: EmptyConfig,
}

#[derive(Debug, Serialize)]
struct EmptyConfig {}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
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

impl GenerateContentResponse {
    /// Concatenates the text parts of the first candidate.
    fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Client
// ────────────────────────────────────────────────────────────────────────────

/// The single LLM client used by all services in Tailr.
#[derive(Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
}

impl GeminiClient {
    pub fn new(api_key: String) -> Self {
        GeminiClient {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
        }
    }

    /// Fails fast when the key is absent or still one of the placeholder
    /// values that ship in `.env.example`. Checked before any request is
    /// constructed, so a misconfigured deployment never touches the
    /// network.
    fn ensure_configured(&self) -> Result<(), AiError> {
        validate_api_key(&self.api_key)
    }

    /// Makes one generateContent call and returns the trimmed response text.
    pub async fn generate(&self, request: GenerateRequest<'_>) -> Result<String, AiError> {
        self.ensure_configured()?;

        let body = build_body(&request);
        let url = format!("{GEMINI_API_BASE}/{MODEL}:generateContent");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let raw = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<GeminiError>(&raw)
                .map(|e| e.error.message)
                .unwrap_or(raw);
            return Err(AiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateContentResponse = response.json().await?;
        let text = parsed.text().ok_or(AiError::EmptyResponse)?;

        debug!("LLM call succeeded: {} chars of response text", text.len());

        Ok(text.trim().to_string())
    }
}

fn validate_api_key(key: &str) -> Result<(), AiError> {
    let key = key.trim();
    if key.is_empty() || key == "YOUR_API_KEY_HERE" || key.contains("paste_your_google") {
        return Err(AiError::MissingApiKey);
    }
    Ok(())
}

fn build_body(request: &GenerateRequest<'_>) -> GenerateContentBody {
    let mut parts = Vec::new();
    if let Some(attachment) = request.attachment {
        parts.push(Part::InlineData {
            inline_data: InlineData {
                mime_type: attachment.mime_type.clone(),
                data: base64::engine::general_purpose::STANDARD.encode(&attachment.data),
            },
        });
    }
    parts.push(Part::Text {
        text: request.prompt.to_string(),
    });

    let (generation_config, tools) = match &request.mode {
        ResponseMode::Text => (
            request.temperature.map(|t| GenerationConfig {
                temperature: Some(t),
                response_mime_type: None,
                response_schema: None,
            }),
            None,
        ),
        ResponseMode::Json(schema) => (
            Some(GenerationConfig {
                temperature: request.temperature,
                response_mime_type: Some("application/json"),
                response_schema: Some(schema.clone()),
            }),
            None,
        ),
        // Search mode cannot carry a response schema — the platform rejects
        // the combination. The caller parses the free text defensively.
        ResponseMode::Search => (
            request.temperature.map(|t| GenerationConfig {
                temperature: Some(t),
                response_mime_type: None,
                response_schema: None,
            }),
            Some(vec![Tool {
                google_search: EmptyConfig {},
            }]),
        ),
    };

    GenerateContentBody {
        contents: vec![Content { parts }],
        generation_config,
        tools,
    }
}
