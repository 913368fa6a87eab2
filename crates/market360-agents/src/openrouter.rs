use async_trait::async_trait;
use market360_models::{CompletionRequest, Credentials, OpenRouterConfig};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::client::CompletionClient;
use crate::error::AgentError;
use crate::orchestrator::normalize_model;
use crate::prompts::{PING_SYSTEM_PROMPT, PING_USER_PROMPT};

/// Chat-completions transport for OpenRouter and compatible endpoints.
///
/// Stateless apart from the pooled HTTP client: credentials and endpoint
/// travel with each [`CompletionRequest`]. No retry, no timeout, no streaming.
#[derive(Debug, Clone)]
pub struct OpenRouterClient {
    http: reqwest::Client,
    referer: String,
    title: String,
}

impl OpenRouterClient {
    pub fn new(referer: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            referer: referer.into(),
            title: title.into(),
        }
    }

    pub fn from_config(config: &OpenRouterConfig) -> Self {
        Self::new(config.referer.clone(), config.title.clone())
    }
}

impl Default for OpenRouterClient {
    fn default() -> Self {
        Self::from_config(&OpenRouterConfig::default())
    }
}

#[derive(Serialize)]
struct ChatBody<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<ChoiceMessage>,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Endpoint for chat completions under `base_url`, tolerating a trailing slash.
pub fn completions_url(base_url: &str) -> String {
    format!("{}/chat/completions", base_url.trim_end_matches('/'))
}

#[async_trait]
impl CompletionClient for OpenRouterClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, AgentError> {
        if request.api_key.trim().is_empty() {
            return Err(AgentError::CredentialMissing);
        }

        let url = completions_url(&request.base_url);
        debug!(model = %request.model, url = %url, "Requesting completion");

        let body = ChatBody {
            model: &request.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &request.system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: &request.user_prompt,
                },
            ],
            temperature: request.temperature,
        };

        let response = self
            .http
            .post(&url)
            .bearer_auth(&request.api_key)
            .header("HTTP-Referer", &self.referer)
            .header("X-Title", &self.title)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(model = %request.model, status = status.as_u16(), "Completion request failed");
            return Err(AgentError::Transport {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        let text = response.text().await?;
        let parsed: ChatResponse = serde_json::from_str(&text)?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .filter(|content| !content.is_empty())
            .ok_or(AgentError::EmptyResponse)
    }
}

/// Round-trip a trivial prompt to confirm the key, endpoint and model work.
pub async fn ping(
    client: &dyn CompletionClient,
    model: &str,
    credentials: &Credentials,
) -> Result<String, AgentError> {
    let request = CompletionRequest::new(
        normalize_model(model),
        credentials.api_key.clone(),
        PING_SYSTEM_PROMPT,
        PING_USER_PROMPT,
    )
    .with_base_url(credentials.base_url.as_deref());
    client.complete(&request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ScriptedClient;

    #[test]
    fn default_client_identity() {
        let client = OpenRouterClient::default();
        assert_eq!(client.referer, "market-360.local");
        assert_eq!(client.title, "Market 360");
    }

    #[test]
    fn completions_url_trims_trailing_slash() {
        assert_eq!(
            completions_url("https://openrouter.ai/api/v1/"),
            "https://openrouter.ai/api/v1/chat/completions"
        );
        assert_eq!(
            completions_url("http://localhost:8080"),
            "http://localhost:8080/chat/completions"
        );
    }

    #[test]
    fn body_omits_absent_temperature() {
        let body = ChatBody {
            model: "m",
            messages: [
                ChatMessage {
                    role: "system",
                    content: "s",
                },
                ChatMessage {
                    role: "user",
                    content: "u",
                },
            ],
            temperature: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("temperature").is_none());
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "u");
    }

    #[tokio::test]
    async fn ping_strips_provider_prefix() {
        let client = ScriptedClient::new().reply("anthropic/claude-3.5-sonnet", "pong");
        let reply = ping(
            &client,
            "openrouter/anthropic/claude-3.5-sonnet",
            &Credentials::new("sk-or-test", None),
        )
        .await
        .unwrap();

        assert_eq!(reply, "pong");
        assert_eq!(client.requests()[0].model, "anthropic/claude-3.5-sonnet");
        assert_eq!(client.requests()[0].system_prompt, PING_SYSTEM_PROMPT);
    }

    #[tokio::test]
    async fn missing_key_fails_before_network() {
        let client = OpenRouterClient::default();
        // Unroutable base URL: reaching the network would surface an Http error instead.
        let request = CompletionRequest::new("m", "", "s", "u").with_base_url(Some("http://127.0.0.1:1"));
        let err = client.complete(&request).await.unwrap_err();
        assert!(matches!(err, AgentError::CredentialMissing));
    }
}
