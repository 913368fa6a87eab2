use serde::{Deserialize, Serialize};

use crate::agent::{AgentConfig, DEFAULT_BASE_URL};

pub const DEFAULT_MODEL: &str = "anthropic/claude-3.5-sonnet";

/// Top-level configuration for Market 360.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Market360Config {
    pub openrouter: OpenRouterConfig,
    pub agents: AgentsConfig,
    pub store: StoreConfig,
}

/// Defaults for the chat-completions endpoint. The API key is never read from here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OpenRouterConfig {
    pub base_url: String,
    pub model: String,
    /// Sent as `HTTP-Referer`.
    pub referer: String,
    /// Sent as `X-Title`.
    pub title: String,
}

impl Default for OpenRouterConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            referer: "market-360.local".to_string(),
            title: "Market 360".to_string(),
        }
    }
}

/// Agent presets used by a fan-out run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AgentsConfig {
    pub presets: Vec<AgentConfig>,
}

impl Default for AgentsConfig {
    fn default() -> Self {
        let preset = |id: &str, title: &str, focus: &str, system_prompt: &str| AgentConfig {
            id: id.to_string(),
            title: title.to_string(),
            model: DEFAULT_MODEL.to_string(),
            system_prompt: system_prompt.to_string(),
            focus: Some(focus.to_string()),
            temperature: None,
        };

        Self {
            presets: vec![
                preset(
                    "analyst",
                    "Agent Analyst",
                    "Explain fundamentals",
                    "You are an industry analyst. Explain fundamentals clearly and concisely.",
                ),
                preset(
                    "quant",
                    "Agent Quant",
                    "Forecast numbers",
                    "You are a quantitative forecaster. Provide directional estimates and rationale.",
                ),
                preset(
                    "strategist",
                    "Agent Strategist",
                    "Explore scenarios",
                    "You are a strategist. Explore scenarios and strategic options.",
                ),
                preset(
                    "storyteller",
                    "Agent Storyteller",
                    "Craft narratives",
                    "You are a storyteller. Craft persuasive narratives and summaries.",
                ),
                preset(
                    "risk",
                    "Agent Risk Officer",
                    "Map vulnerabilities",
                    "You are a risk officer. Map vulnerabilities and mitigations.",
                ),
            ],
        }
    }
}

/// Where the settings database and the industry fixtures live.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StoreConfig {
    pub settings_path: String,
    /// Directory holding `industries.json` and the per-industry fixture files.
    pub data_dir: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            settings_path: "data/market360_settings.db".to_string(),
            data_dir: "data".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_five_presets() {
        let agents = AgentsConfig::default();
        assert_eq!(agents.presets.len(), 5);
        let ids: Vec<&str> = agents.presets.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["analyst", "quant", "strategist", "storyteller", "risk"]);
    }

    #[test]
    fn roundtrip_config() {
        let config = Market360Config::default();
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: Market360Config = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let toml_str = r#"
[openrouter]
model = "openai/gpt-4o-mini"
"#;

        let config: Market360Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.openrouter.model, "openai/gpt-4o-mini");
        assert_eq!(config.openrouter.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.agents.presets.len(), 5);
        assert_eq!(config.store.data_dir, "data");
    }

    #[test]
    fn config_from_toml_with_custom_presets() {
        let toml_str = r#"
[openrouter]
base_url = "http://localhost:8080/v1"
model = "meta-llama/llama-3.1-70b-instruct"
referer = "intranet.example"
title = "Market 360 (staging)"

[[agents.presets]]
id = "bull"
title = "Agent Bull"
model = "openrouter/openai/gpt-4o"
system_prompt = "Argue the bull case."
temperature = 0.9

[[agents.presets]]
id = "bear"
title = "Agent Bear"
model = "openai/gpt-4o"
system_prompt = "Argue the bear case."

[store]
settings_path = "/tmp/settings.db"
data_dir = "/srv/market360/data"
"#;

        let config: Market360Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.agents.presets.len(), 2);
        assert_eq!(config.agents.presets[0].temperature, Some(0.9));
        assert!(config.agents.presets[1].focus.is_none());
        assert_eq!(config.openrouter.title, "Market 360 (staging)");
        assert_eq!(config.store.settings_path, "/tmp/settings.db");
    }
}
