//! Market 360 - industry intelligence with multi-agent LLM analysis
//!
//! Fans a prompt out to a set of analyst agents over an OpenRouter-compatible
//! chat-completions API, and turns a stricter structured request into a
//! validated snapshot of basket index, company moves and news items.
//!
//! # Library Usage
//!
//! ```rust,no_run
//! use market360::agents::{Orchestrator, OpenRouterClient, extract_insight};
//! use market360::models::{AgentConfig, Credentials, Market360Config};
//! use market360::store::{IndustryCatalog, SqliteSettingsStore};
//! ```

pub use market360_agents as agents;
pub use market360_models as models;
pub use market360_store as store;

use std::path::Path;

use market360_agents::prompts::{insight_system_prompt, report_user_prompt, ANALYST_SYSTEM_PROMPT};
use market360_agents::{extract_insight, AgentError, CompletionClient, Orchestrator};
use market360_models::{
    AgentConfig, AgentRunReport, CompletionRequest, Credentials, IndustryDataBundle,
    Market360Config, OpenRouterConfig, ReportContext, StructuredInsightDocument,
};
use market360_store::OpenRouterSettings;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Instructions ahead of the industry payload for the structured request.
pub const INSIGHT_TEMPLATE: &str =
    "Return the structured market snapshot for this industry in the required JSON shape.";

/// Load configuration from a TOML file, or defaults when the file does not exist.
pub fn load_config(path: &Path) -> Result<Market360Config, anyhow::Error> {
    if !path.exists() {
        info!(path = %path.display(), "No config file, using defaults");
        return Ok(Market360Config::default());
    }
    let text = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&text)?)
}

/// Credentials and model after applying precedence:
/// explicit overrides, then persisted settings, then config defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConnection {
    pub credentials: Credentials,
    pub model: String,
}

pub fn resolve_connection(
    config: &OpenRouterConfig,
    stored: &OpenRouterSettings,
    overrides: &OpenRouterSettings,
) -> ResolvedConnection {
    let pick = |over: &Option<String>, saved: &Option<String>| {
        over.clone()
            .filter(|v| !v.trim().is_empty())
            .or_else(|| saved.clone())
    };

    let api_key = pick(&overrides.api_key, &stored.api_key).unwrap_or_default();
    let base_url =
        pick(&overrides.base_url, &stored.base_url).unwrap_or_else(|| config.base_url.clone());
    let model = pick(&overrides.model, &stored.model).unwrap_or_else(|| config.model.clone());

    ResolvedConnection {
        credentials: Credentials::new(api_key, Some(base_url)),
        model,
    }
}

/// Run every preset against one shared prompt. With `model` set, every preset
/// is bound to that model first.
pub async fn run_agents(
    orchestrator: &Orchestrator,
    presets: &[AgentConfig],
    model: Option<&str>,
    user_prompt: &str,
    credentials: &Credentials,
    cancel: &CancellationToken,
) -> AgentRunReport {
    let agents: Vec<AgentConfig> = match model {
        Some(model) => presets.iter().map(|p| p.with_model(model)).collect(),
        None => presets.to_vec(),
    };
    orchestrator.run(&agents, user_prompt, credentials, cancel).await
}

/// Narrative report plus optional structured snapshot.
///
/// Either half may fail on its own; the other is still reported.
#[derive(Debug, Clone, Serialize, PartialEq, Default)]
pub struct ReportOutcome {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub narrative: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub narrative_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insight: Option<StructuredInsightDocument>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insight_error: Option<String>,
}

/// Issue the narrative request and, when `with_insight` is set, the structured
/// request alongside it.
pub async fn run_report(
    client: &dyn CompletionClient,
    connection: &ResolvedConnection,
    template: &str,
    bundle: &IndustryDataBundle,
    context: &ReportContext,
    with_insight: bool,
) -> Result<ReportOutcome, AgentError> {
    let credentials = &connection.credentials;
    let model = market360_agents::normalize_model(&connection.model);

    let narrative_request = CompletionRequest::new(
        model,
        credentials.api_key.clone(),
        ANALYST_SYSTEM_PROMPT,
        report_user_prompt(template, bundle, context)?,
    )
    .with_base_url(credentials.base_url.as_deref());

    let insight_request = CompletionRequest::new(
        model,
        credentials.api_key.clone(),
        insight_system_prompt(),
        report_user_prompt(INSIGHT_TEMPLATE, bundle, context)?,
    )
    .with_base_url(credentials.base_url.as_deref());

    let insight = async {
        if !with_insight {
            return None;
        }
        let raw = client.complete(&insight_request).await;
        Some(raw.and_then(|text| extract_insight(&text)))
    };
    let (narrative, insight) = tokio::join!(client.complete(&narrative_request), insight);

    let mut outcome = ReportOutcome::default();
    match narrative {
        Ok(text) => outcome.narrative = Some(text),
        Err(e) => {
            warn!(error = %e, "Narrative report failed");
            outcome.narrative_error = Some(e.to_string());
        }
    }
    match insight {
        Some(Ok(document)) => outcome.insight = Some(document),
        Some(Err(e)) => {
            warn!(error = %e, "Structured insight failed");
            outcome.insight_error = Some(e.to_string());
        }
        None => {}
    }
    Ok(outcome)
}
