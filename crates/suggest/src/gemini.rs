//! Client for the Gemini `generateContent` REST endpoint.
use api_types::suggest::{SuggestCategoryInput, SuggestCategoryOutput};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::{
    CategorySuggester, SuggestError,
    prompt::{PROMPT_NAME, output_schema, render_prompt},
};

#[derive(Clone, Debug)]
pub struct GeminiConfig {
    /// Root of the API, e.g. `https://generativelanguage.googleapis.com/v1beta`.
    pub base_url: String,
    pub model: String,
    pub api_key: String,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-2.0-flash".to_string(),
            api_key: api_key.into(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: Value,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorStatus,
}

#[derive(Debug, Deserialize)]
struct ErrorStatus {
    message: String,
}

/// Suggests categories with a hosted Gemini model.
#[derive(Clone, Debug)]
pub struct GeminiSuggester {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl GeminiSuggester {
    pub fn new(config: GeminiConfig) -> Self {
        let endpoint = format!(
            "{}/models/{}:generateContent",
            config.base_url.trim_end_matches('/'),
            config.model
        );
        Self {
            http: reqwest::Client::new(),
            endpoint,
            api_key: config.api_key,
        }
    }

    fn request_body(input: &SuggestCategoryInput) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: render_prompt(&input.description),
                }],
            }],
            generation_config: json!({
                "responseMimeType": "application/json",
                "responseSchema": output_schema(),
            }),
        }
    }
}

impl CategorySuggester for GeminiSuggester {
    async fn suggest(
        &self,
        input: SuggestCategoryInput,
    ) -> Result<SuggestCategoryOutput, SuggestError> {
        tracing::debug!(prompt = PROMPT_NAME, "requesting category suggestion");
        let res = self
            .http
            .post(&self.endpoint)
            .header("x-goog-api-key", &self.api_key)
            .json(&Self::request_body(&input))
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let message = res
                .json::<ErrorResponse>()
                .await
                .map(|err| err.error.message)
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(SuggestError::Server {
                status: status.as_u16(),
                message,
            });
        }

        let body: GenerateContentResponse = res.json().await?;
        parse_output(body)
    }
}

fn parse_output(body: GenerateContentResponse) -> Result<SuggestCategoryOutput, SuggestError> {
    let text: String = body
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| content.parts.into_iter().map(|part| part.text).collect())
        .unwrap_or_default();

    let json = strip_fence(&text);
    if json.is_empty() {
        return Err(SuggestError::EmptyResponse);
    }
    let mut output: SuggestCategoryOutput = serde_json::from_str(json)?;
    output.category = output.category.trim().to_string();
    if output.category.is_empty() {
        return Err(SuggestError::EmptyResponse);
    }
    Ok(output)
}

/// Models occasionally wrap JSON output in a Markdown code fence.
fn strip_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}
