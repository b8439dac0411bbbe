use serde::{Deserialize, Serialize};

use crate::model::settings::Settings;

/// Error type for completion requests. A failed request never touches the
/// editor: callers only stream text in after a successful return.
#[derive(Debug, thiserror::Error)]
pub enum AiError {
    #[error("no API credential configured")]
    MissingKey,
    #[error("the service rejected the credential (HTTP {0})")]
    Auth(u16),
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("service returned HTTP {0}")]
    Http(u16),
    #[error("unexpected response shape: {0}")]
    Malformed(String),
}

/// Per-request model parameters, usually lifted from settings
#[derive(Debug, Clone)]
pub struct ModelParams {
    pub model: String,
    pub temperature: f32,
    /// None lets the service pick (used by brainstorming)
    pub max_tokens: Option<u32>,
}

impl ModelParams {
    pub fn from_settings(settings: &Settings) -> Self {
        ModelParams {
            model: settings.model.clone(),
            temperature: settings.temperature,
            max_tokens: Some(settings.max_tokens),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<WireMessage<'a>>,
    pub temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
pub(crate) struct WireMessage<'a> {
    pub role: &'a str,
    pub content: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatResponse {
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChoiceMessage {
    pub content: String,
}

/// One HTTPS JSON POST per request against an OpenAI-compatible chat
/// completion endpoint, authenticated with the user's bearer credential.
/// The credential goes to this endpoint and nowhere else.
pub struct CompletionClient {
    endpoint: String,
    key: String,
    http: reqwest::blocking::Client,
}

impl CompletionClient {
    pub fn new(endpoint: &str, key: Option<&str>) -> Result<Self, AiError> {
        let key = key.map(str::trim).unwrap_or_default();
        if key.is_empty() {
            return Err(AiError::MissingKey);
        }
        Ok(CompletionClient {
            endpoint: endpoint.to_string(),
            key: key.to_string(),
            http: reqwest::blocking::Client::new(),
        })
    }

    /// From settings, failing early when no credential is configured
    pub fn from_settings(settings: &Settings) -> Result<Self, AiError> {
        CompletionClient::new(&settings.api_endpoint, settings.api_key.as_deref())
    }

    /// Send one system+user exchange and return the completion text
    pub fn complete(
        &self,
        params: &ModelParams,
        system: &str,
        user: &str,
    ) -> Result<String, AiError> {
        self.send(params, vec![("system", system), ("user", user)])
    }

    /// Send a full message transcript (used by the brainstorm chat)
    pub fn send(
        &self,
        params: &ModelParams,
        messages: Vec<(&str, &str)>,
    ) -> Result<String, AiError> {
        let body = ChatRequest {
            model: &params.model,
            messages: messages
                .iter()
                .map(|(role, content)| WireMessage { role, content })
                .collect(),
            temperature: params.temperature,
            max_tokens: params.max_tokens,
        };

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.key)
            .json(&body)
            .send()?;

        let status = response.status();
        if status.as_u16() == 401 || status.as_u16() == 403 {
            return Err(AiError::Auth(status.as_u16()));
        }
        if !status.is_success() {
            return Err(AiError::Http(status.as_u16()));
        }

        let parsed: ChatResponse = response
            .json()
            .map_err(|e| AiError::Malformed(e.to_string()))?;
        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AiError::Malformed("no choices in response".into()))?;
        Ok(choice.message.content.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_fails_before_any_request() {
        assert!(matches!(
            CompletionClient::new("https://example.test", None),
            Err(AiError::MissingKey)
        ));
        assert!(matches!(
            CompletionClient::new("https://example.test", Some("   ")),
            Err(AiError::MissingKey)
        ));
    }

    #[test]
    fn request_body_matches_wire_shape() {
        let body = ChatRequest {
            model: "openrouter/auto",
            messages: vec![
                WireMessage {
                    role: "system",
                    content: "sys",
                },
                WireMessage {
                    role: "user",
                    content: "usr",
                },
            ],
            temperature: 0.5,
            max_tokens: Some(500),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "openrouter/auto");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "usr");
        assert_eq!(json["temperature"], 0.5);
        assert_eq!(json["max_tokens"], 500);
    }

    #[test]
    fn absent_max_tokens_is_omitted() {
        let body = ChatRequest {
            model: "m",
            messages: vec![],
            temperature: 1.0,
            max_tokens: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("max_tokens").is_none());
    }

    #[test]
    fn response_parsing_takes_first_choice() {
        let raw = r#"{"choices":[{"message":{"content":"  hello there  "}}]}"#;
        let parsed: ChatResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.choices[0].message.content, "  hello there  ");
    }

    #[test]
    fn params_from_settings() {
        let settings = Settings::default();
        let params = ModelParams::from_settings(&settings);
        assert_eq!(params.model, settings.model);
        assert_eq!(params.max_tokens, Some(settings.max_tokens));
    }
}
