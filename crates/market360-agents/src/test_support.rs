//! Test support: a scripted completion client and sample fixtures.
//!
//! `ScriptedClient` answers per model id, so a fan-out run can be given a mix
//! of replies, HTTP failures, delays and hung calls without touching the network.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use market360_models::industry::{
    CompetitiveIntensity, CustomerSegment, DemographicsProfile, Indicator, IndicatorCategory,
    IndicatorSet, Industry, IndustryDataBundle, Level, MacroEnvironment, MacroRisk,
    RegionImportance, RiskItem, RiskOpportunityProfile, SegmentType, ValueChainStage,
};
use market360_models::{AgentConfig, CompletionRequest};

use crate::client::CompletionClient;
use crate::error::AgentError;

#[derive(Debug, Clone)]
enum Outcome {
    Reply(String),
    Fail { status: u16, body: String },
    Empty,
    Hang,
}

/// A [`CompletionClient`] with canned outcomes keyed by model id.
///
/// Models without a script fail with HTTP 404. An empty API key fails with
/// [`AgentError::CredentialMissing`], matching the real transport.
#[derive(Default)]
pub struct ScriptedClient {
    outcomes: HashMap<String, Outcome>,
    system_replies: Vec<(String, String)>,
    delays: HashMap<String, Duration>,
    seen: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(mut self, model: &str, content: &str) -> Self {
        self.outcomes
            .insert(model.to_string(), Outcome::Reply(content.to_string()));
        self
    }

    pub fn fail(mut self, model: &str, status: u16, body: &str) -> Self {
        self.outcomes.insert(
            model.to_string(),
            Outcome::Fail {
                status,
                body: body.to_string(),
            },
        );
        self
    }

    /// Reply with `content` to any request whose system prompt contains
    /// `fragment`, whatever the model. Checked before the per-model scripts.
    pub fn reply_for_system(mut self, fragment: &str, content: &str) -> Self {
        self.system_replies
            .push((fragment.to_string(), content.to_string()));
        self
    }

    /// HTTP success without any completion content.
    pub fn empty(mut self, model: &str) -> Self {
        self.outcomes.insert(model.to_string(), Outcome::Empty);
        self
    }

    /// Never resolve. Useful for cancellation tests.
    pub fn hang(mut self, model: &str) -> Self {
        self.outcomes.insert(model.to_string(), Outcome::Hang);
        self
    }

    pub fn delay(mut self, model: &str, delay: Duration) -> Self {
        self.delays.insert(model.to_string(), delay);
        self
    }

    /// Every request received so far, in arrival order.
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.seen.lock().map(|seen| seen.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl CompletionClient for ScriptedClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, AgentError> {
        if request.api_key.trim().is_empty() {
            return Err(AgentError::CredentialMissing);
        }
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(request.clone());
        }
        if let Some(delay) = self.delays.get(&request.model) {
            tokio::time::sleep(*delay).await;
        }

        if let Some((_, content)) = self
            .system_replies
            .iter()
            .find(|(fragment, _)| request.system_prompt.contains(fragment.as_str()))
        {
            return Ok(content.clone());
        }

        match self.outcomes.get(&request.model).cloned() {
            Some(Outcome::Reply(content)) => Ok(content),
            Some(Outcome::Fail { status, body }) => Err(AgentError::Transport { status, body }),
            Some(Outcome::Empty) => Err(AgentError::EmptyResponse),
            Some(Outcome::Hang) => std::future::pending().await,
            None => Err(AgentError::Transport {
                status: 404,
                body: format!("no script for model {}", request.model),
            }),
        }
    }
}

/// Agent config with the given id, model and system prompt.
pub fn agent(id: &str, model: &str, system_prompt: &str) -> AgentConfig {
    AgentConfig {
        id: id.to_string(),
        title: format!("Agent {id}"),
        model: model.to_string(),
        system_prompt: system_prompt.to_string(),
        focus: None,
        temperature: None,
    }
}

/// A small but complete semiconductor industry bundle.
pub fn sample_bundle() -> IndustryDataBundle {
    let id = "semis".to_string();
    IndustryDataBundle {
        industry: Industry {
            id: id.clone(),
            name: "Semiconductors".to_string(),
            category: "Technology".to_string(),
            description: "Chip design, fabrication and packaging".to_string(),
            business_models: vec!["Fabless".to_string(), "Foundry".to_string()],
            revenue_drivers: vec!["Unit volumes".to_string()],
            cost_drivers: vec!["Capex".to_string()],
            value_chain: vec![ValueChainStage {
                stage: "Design".to_string(),
                description: "IP and EDA".to_string(),
                margin_profile: Level::High,
            }],
            segments: vec!["Logic".to_string(), "Memory".to_string()],
        },
        demographics: DemographicsProfile {
            industry_id: id.clone(),
            customer_segments: vec![CustomerSegment {
                name: "Device OEMs".to_string(),
                kind: SegmentType::B2B,
                share: 85.0,
            }],
            regions: vec![RegionImportance {
                name: "Asia-Pacific".to_string(),
                importance: Level::High,
            }],
            income_brackets: None,
            age_groups: None,
            urban_vs_rural: None,
            notes: None,
        },
        macro_env: MacroEnvironment {
            industry_id: id.clone(),
            political: vec!["Export controls".to_string()],
            economic: vec!["Inventory cycle".to_string()],
            social: vec![],
            technological: vec!["AI accelerator demand".to_string()],
            environmental: vec![],
            legal: vec![],
            macro_risks: vec![MacroRisk {
                name: "Trade restrictions".to_string(),
                severity: 8.0,
                notes: None,
            }],
        },
        indicators: IndicatorSet {
            industry_id: id.clone(),
            leading_indicators: vec![Indicator {
                name: "Book-to-bill".to_string(),
                description: "Orders relative to shipments".to_string(),
                rationale: "Turns before revenue".to_string(),
                proxy: Some("SEMI equipment book-to-bill".to_string()),
                category: IndicatorCategory::Demand,
            }],
            lagging_indicators: vec![],
        },
        risk_profile: RiskOpportunityProfile {
            industry_id: id,
            risks: vec![RiskItem {
                item: "Cyclical oversupply".to_string(),
                impact: Level::High,
            }],
            opportunities: vec!["Advanced packaging".to_string()],
            structural_trends: vec!["Reshoring".to_string()],
            competitive_intensity: CompetitiveIntensity {
                level: Level::High,
                notes: None,
            },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn scripted_outcomes() {
        let client = ScriptedClient::new()
            .reply("good", "hi")
            .fail("bad", 502, "gateway")
            .empty("blank");
        let req = |model: &str| CompletionRequest::new(model, "k", "s", "u");

        assert_eq!(client.complete(&req("good")).await.unwrap(), "hi");
        assert!(matches!(
            client.complete(&req("bad")).await,
            Err(AgentError::Transport { status: 502, .. })
        ));
        assert!(matches!(
            client.complete(&req("blank")).await,
            Err(AgentError::EmptyResponse)
        ));
        assert!(matches!(
            client.complete(&req("unknown")).await,
            Err(AgentError::Transport { status: 404, .. })
        ));
        assert_eq!(client.requests().len(), 4);
    }

    #[tokio::test]
    async fn system_routes_win_over_model_scripts() {
        let client = ScriptedClient::new()
            .reply("m", "narrative")
            .reply_for_system("data desk", "{}");
        let narrative = CompletionRequest::new("m", "k", "You are an analyst.", "u");
        let structured = CompletionRequest::new("m", "k", "You are a market data desk.", "u");

        assert_eq!(client.complete(&narrative).await.unwrap(), "narrative");
        assert_eq!(client.complete(&structured).await.unwrap(), "{}");
    }
}
