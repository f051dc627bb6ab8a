use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use crate::provider::{LlmError, LlmProvider, Message, Role};

pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiProvider {
    pub fn new(api_key: String, model: String, base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    /// Build the request body for the Gemini generateContent API.
    fn build_request_body(messages: &[Message], temperature: f32, max_tokens: u32) -> Value {
        // Gemini takes the system prompt in a separate system_instruction field
        let system_msg = messages
            .iter()
            .find(|m| m.role == Role::System)
            .map(|m| m.content.clone());

        let contents: Vec<Value> = messages
            .iter()
            .filter(|m| m.role != Role::System)
            .map(|m| {
                json!({
                    "role": match m.role {
                        Role::Assistant => "model",
                        _ => "user",
                    },
                    "parts": [{ "text": m.content }],
                })
            })
            .collect();

        let mut body = json!({
            "contents": contents,
            "generationConfig": {
                "temperature": temperature,
                "maxOutputTokens": max_tokens,
            },
        });

        if let Some(system) = system_msg {
            body["system_instruction"] = json!({
                "parts": [{ "text": system }],
            });
        }

        body
    }

    /// Pull the generated text out of a generateContent response.
    ///
    /// All text parts of the first candidate are concatenated. A response
    /// with no candidates, no parts, or only whitespace is an
    /// [`LlmError::EmptyResponse`].
    fn parse_response(resp: &Value) -> Result<String, LlmError> {
        let candidate = match resp["candidates"].as_array().and_then(|c| c.first()) {
            Some(candidate) => candidate,
            None => {
                if let Some(reason) = resp["promptFeedback"]["blockReason"].as_str() {
                    return Err(LlmError::Blocked(reason.to_string()));
                }
                return Err(LlmError::EmptyResponse("no candidates".into()));
            }
        };

        let finish_reason = candidate["finishReason"].as_str().unwrap_or("UNKNOWN");
        let parts = match candidate["content"]["parts"].as_array() {
            Some(parts) if !parts.is_empty() => parts,
            _ => {
                return Err(LlmError::EmptyResponse(format!(
                    "candidate has no content parts (finishReason={finish_reason})"
                )))
            }
        };

        let texts: Vec<&str> = parts.iter().filter_map(|p| p["text"].as_str()).collect();
        if texts.is_empty() {
            return Err(LlmError::ParseError(
                "missing candidates[0].content.parts[].text".into(),
            ));
        }

        let text = texts.concat();
        if text.trim().is_empty() {
            return Err(LlmError::EmptyResponse(format!(
                "whitespace-only text (finishReason={finish_reason})"
            )));
        }
        if finish_reason == "MAX_TOKENS" {
            tracing::warn!(model = "gemini", "response truncated at maxOutputTokens");
        }
        Ok(text)
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    async fn complete(
        &self,
        messages: Vec<Message>,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String, LlmError> {
        let url = self.endpoint();
        let body = Self::build_request_body(&messages, temperature, max_tokens);

        debug!("Gemini request to model={}", self.model);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status().as_u16();
        if status != 200 {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::ApiError { status, body });
        }

        let resp: Value = response.json().await?;
        Self::parse_response(&resp)
    }

    fn name(&self) -> &str {
        &self.model
    }
}
