//! The completion capability and its OpenAI-compatible HTTP implementation.

use std::time::Duration;

use async_trait::async_trait;
use dossier_config::{CompletionConfig, ConfigError};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::LlmError;
use crate::http::check_response;

/// One structured completion call.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system: String,
    pub prompt: String,
    /// Registered name of the output schema.
    pub schema_name: String,
    pub schema: Value,
    /// Overrides the client's default model.
    pub model: Option<String>,
}

/// `complete(system, prompt, schema) -> object`.
///
/// Implementations return the raw JSON object the model produced. Schema
/// validation happens in [`crate::StructuredCompleter`], not here.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<Value, LlmError>;
}

// ---------------------------------------------------------------------------
// OpenAI-compatible client
// ---------------------------------------------------------------------------

/// Chat-completions client using `response_format: json_schema`.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    http: reqwest::Client,
    url: String,
    model: String,
    max_output_tokens: u32,
    temperature: f32,
}

impl OpenAiClient {
    /// Build a client from the `[completion]` config section.
    ///
    /// # Errors
    ///
    /// Returns `LlmError::Config` if the section is incomplete or the API key
    /// is not a valid header value, or `LlmError::Http` if the HTTP client
    /// cannot be built.
    pub fn new(config: &CompletionConfig) -> Result<Self, LlmError> {
        let config = config.require()?;

        let mut headers = HeaderMap::new();
        let bearer = HeaderValue::from_str(&format!("Bearer {}", config.api_key)).map_err(|e| {
            ConfigError::InvalidValue {
                field: "completion.api_key".into(),
                reason: e.to_string(),
            }
        })?;
        headers.insert(AUTHORIZATION, bearer);

        let http = reqwest::Client::builder()
            .user_agent("dossier/0.1")
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            url: config.chat_completions_url(),
            model: config.model.clone(),
            max_output_tokens: config.max_output_tokens,
            temperature: config.temperature,
        })
    }

    fn body<'a>(&'a self, request: &'a CompletionRequest) -> ChatBody<'a> {
        ChatBody {
            model: request.model.as_deref().unwrap_or(&self.model),
            messages: [
                ChatMessage {
                    role: "system",
                    content: &request.system,
                },
                ChatMessage {
                    role: "user",
                    content: &request.prompt,
                },
            ],
            temperature: self.temperature,
            max_tokens: self.max_output_tokens,
            response_format: ResponseFormat {
                kind: "json_schema",
                json_schema: JsonSchemaFormat {
                    name: &request.schema_name,
                    schema: &request.schema,
                    strict: false,
                },
            },
        }
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<Value, LlmError> {
        tracing::debug!(
            schema = %request.schema_name,
            model = request.model.as_deref().unwrap_or(&self.model),
            "completion request"
        );
        let resp = check_response(
            self.http
                .post(&self.url)
                .json(&self.body(request))
                .send()
                .await?,
        )
        .await?;

        let data: ChatResponse = resp.json().await?;
        parse_choice(data, &request.schema_name)
    }
}

/// Pull the JSON object out of the first choice. Content that is missing,
/// not JSON, or not an object breaks the output contract for `schema`.
fn parse_choice(data: ChatResponse, schema: &str) -> Result<Value, LlmError> {
    let message = data
        .choices
        .into_iter()
        .next()
        .map(|c| c.message)
        .ok_or_else(|| LlmError::Parse("response has no choices".into()))?;

    if let Some(refusal) = message.refusal {
        return Err(LlmError::Refused(refusal));
    }
    let nonconforming = |reason: String| LlmError::SchemaValidation {
        schema: schema.to_string(),
        errors: vec![reason],
    };
    let content = message
        .content
        .ok_or_else(|| nonconforming("message has no content".into()))?;
    let value: Value = serde_json::from_str(&content)
        .map_err(|e| nonconforming(format!("content is not JSON: {e}")))?;
    if value.is_object() {
        Ok(value)
    } else {
        Err(nonconforming("content is not a JSON object".into()))
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct ChatBody<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
    response_format: ResponseFormat<'a>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    json_schema: JsonSchemaFormat<'a>,
}

#[derive(Serialize)]
struct JsonSchemaFormat<'a> {
    name: &'a str,
    schema: &'a Value,
    strict: bool,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
    refusal: Option<String>,
}
