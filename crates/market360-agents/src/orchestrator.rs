use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use market360_models::{AgentConfig, AgentRunReport, AgentRunResult, CompletionRequest, Credentials};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::client::CompletionClient;
use crate::error::AgentError;

const PROVIDER_PREFIX: &str = "openrouter/";

/// Strip a redundant `openrouter/` namespace from a model id.
pub fn normalize_model(model: &str) -> &str {
    model.strip_prefix(PROVIDER_PREFIX).unwrap_or(model)
}

/// Fans one user prompt out to many agents and collects every outcome.
///
/// All calls are dispatched before any is awaited. Results come back in input
/// order, one per agent; a failing agent is reported in its own slot and never
/// affects the others.
pub struct Orchestrator {
    client: Arc<dyn CompletionClient>,
}

impl Orchestrator {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self { client }
    }

    pub async fn run_all(
        &self,
        agents: &[AgentConfig],
        user_prompt: &str,
        credentials: &Credentials,
    ) -> Vec<AgentRunResult> {
        self.run_all_with_cancel(agents, user_prompt, credentials, &CancellationToken::new())
            .await
    }

    /// Like [`run_all`](Self::run_all), but aborts whatever is still in flight
    /// once `cancel` fires. Those slots report [`AgentError::Cancelled`].
    pub async fn run_all_with_cancel(
        &self,
        agents: &[AgentConfig],
        user_prompt: &str,
        credentials: &Credentials,
        cancel: &CancellationToken,
    ) -> Vec<AgentRunResult> {
        let start = Instant::now();
        info!(agents = agents.len(), "Starting agent fan-out");

        // 1. Dispatch every agent
        let mut handles = Vec::with_capacity(agents.len());
        for agent in agents {
            let client = Arc::clone(&self.client);
            let request = CompletionRequest::new(
                normalize_model(&agent.model),
                credentials.api_key.clone(),
                agent.system_prompt.clone(),
                user_prompt,
            )
            .with_base_url(credentials.base_url.as_deref())
            .with_temperature(agent.temperature);

            handles.push(tokio::spawn(async move {
                let agent_start = Instant::now();
                let result = client.complete(&request).await;
                (result, agent_start.elapsed())
            }));
        }

        // 2. Collect in input order (all-settle)
        let mut results = Vec::with_capacity(agents.len());
        for (agent, mut handle) in agents.iter().zip(handles) {
            let joined = tokio::select! {
                biased;
                joined = &mut handle => Some(joined),
                _ = cancel.cancelled() => None,
            };

            let result = match joined {
                Some(Ok((Ok(content), elapsed))) => {
                    info!(agent = %agent.id, elapsed_ms = elapsed.as_millis(), "Agent succeeded");
                    AgentRunResult::success(agent, content)
                }
                Some(Ok((Err(e), elapsed))) => {
                    warn!(agent = %agent.id, error = %e, elapsed_ms = elapsed.as_millis(), "Agent failed");
                    AgentRunResult::failure(agent, e.to_string())
                }
                Some(Err(e)) => {
                    error!(agent = %agent.id, error = %e, "Agent task panicked");
                    AgentRunResult::failure(agent, format!("Agent task failed: {e}"))
                }
                None => {
                    handle.abort();
                    warn!(agent = %agent.id, "Agent cancelled");
                    AgentRunResult::failure(agent, AgentError::Cancelled.to_string())
                }
            };
            results.push(result);
        }

        info!(
            agents = results.len(),
            failed = results.iter().filter(|r| !r.is_success()).count(),
            elapsed_ms = start.elapsed().as_millis(),
            "Agent fan-out complete"
        );
        results
    }

    /// One fresh, identified run wrapping [`run_all_with_cancel`](Self::run_all_with_cancel).
    pub async fn run(
        &self,
        agents: &[AgentConfig],
        user_prompt: &str,
        credentials: &Credentials,
        cancel: &CancellationToken,
    ) -> AgentRunReport {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        let start = Instant::now();
        info!(run_id = %run_id, "Starting agent run");

        let results = self
            .run_all_with_cancel(agents, user_prompt, credentials, cancel)
            .await;

        AgentRunReport {
            run_id,
            started_at,
            elapsed_ms: start.elapsed().as_millis() as u64,
            results,
        }
    }
}
