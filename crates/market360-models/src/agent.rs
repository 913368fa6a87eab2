use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Endpoint used when neither the caller nor the settings store names one.
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// A named (model, system prompt) pair dispatched as one independent completion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentConfig {
    pub id: String,
    pub title: String,
    pub model: String,
    pub system_prompt: String,
    /// Short description of what the agent is for. Display only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub focus: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

impl AgentConfig {
    /// Copy of this agent bound to another model.
    pub fn with_model(&self, model: &str) -> Self {
        Self {
            model: model.to_string(),
            ..self.clone()
        }
    }
}

/// One chat-completion call. Built per call and dropped afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub api_key: String,
    pub base_url: String,
    pub system_prompt: String,
    pub user_prompt: String,
    pub temperature: Option<f64>,
}

impl CompletionRequest {
    pub fn new(
        model: impl Into<String>,
        api_key: impl Into<String>,
        system_prompt: impl Into<String>,
        user_prompt: impl Into<String>,
    ) -> Self {
        Self {
            model: model.into(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            system_prompt: system_prompt.into(),
            user_prompt: user_prompt.into(),
            temperature: None,
        }
    }

    pub fn with_base_url(mut self, base_url: Option<&str>) -> Self {
        if let Some(url) = base_url.filter(|u| !u.trim().is_empty()) {
            self.base_url = url.to_string();
        }
        self
    }

    pub fn with_temperature(mut self, temperature: Option<f64>) -> Self {
        self.temperature = temperature;
        self
    }
}

/// Credential and endpoint shared by every call of one run.
#[derive(Clone, PartialEq, Default)]
pub struct Credentials {
    pub api_key: String,
    pub base_url: Option<String>,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, base_url: Option<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url,
        }
    }
}

// Keeps the key out of Debug output and therefore out of logs.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Outcome of one agent within a fan-out run.
///
/// `content` is empty whenever `error` is set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentRunResult {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AgentRunResult {
    pub fn success(agent: &AgentConfig, content: String) -> Self {
        Self {
            id: agent.id.clone(),
            title: agent.title.clone(),
            content,
            error: None,
        }
    }

    pub fn failure(agent: &AgentConfig, error: impl Into<String>) -> Self {
        Self {
            id: agent.id.clone(),
            title: agent.title.clone(),
            content: String::new(),
            error: Some(error.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// A complete fan-out run as handed to the presentation layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentRunReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub elapsed_ms: u64,
    pub results: Vec<AgentRunResult>,
}

impl AgentRunReport {
    pub fn failed_count(&self) -> usize {
        self.results.iter().filter(|r| !r.is_success()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyst() -> AgentConfig {
        AgentConfig {
            id: "analyst".to_string(),
            title: "Agent Analyst".to_string(),
            model: "anthropic/claude-3.5-sonnet".to_string(),
            system_prompt: "You are an industry analyst.".to_string(),
            focus: Some("Explain fundamentals".to_string()),
            temperature: None,
        }
    }

    #[test]
    fn request_defaults_to_openrouter() {
        let req = CompletionRequest::new("m", "k", "s", "u");
        assert_eq!(req.base_url, DEFAULT_BASE_URL);
        assert!(req.temperature.is_none());
    }

    #[test]
    fn blank_base_url_override_is_ignored() {
        let req = CompletionRequest::new("m", "k", "s", "u").with_base_url(Some("  "));
        assert_eq!(req.base_url, DEFAULT_BASE_URL);

        let req = CompletionRequest::new("m", "k", "s", "u").with_base_url(Some("http://localhost:9"));
        assert_eq!(req.base_url, "http://localhost:9");
    }

    #[test]
    fn failure_result_has_empty_content() {
        let result = AgentRunResult::failure(&analyst(), "boom");
        assert_eq!(result.content, "");
        assert_eq!(result.error.as_deref(), Some("boom"));
        assert!(!result.is_success());
    }

    #[test]
    fn success_result_omits_error_in_json() {
        let result = AgentRunResult::success(&analyst(), "ok".to_string());
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["id"], "analyst");
        assert_eq!(json["content"], "ok");
        assert!(json.get("error").is_none());
    }

    #[test]
    fn with_model_keeps_everything_else() {
        let agent = analyst().with_model("openai/gpt-4o");
        assert_eq!(agent.model, "openai/gpt-4o");
        assert_eq!(agent.id, "analyst");
        assert_eq!(agent.system_prompt, "You are an industry analyst.");
    }

    #[test]
    fn credentials_debug_hides_key() {
        let creds = Credentials::new("sk-or-secret", None);
        let printed = format!("{creds:?}");
        assert!(!printed.contains("sk-or-secret"));
    }
}
