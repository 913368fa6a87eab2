use market360_models::{IndustryDataBundle, LayoutMode, ReportContext, ViewMode};

use crate::error::AgentError;

pub const PING_SYSTEM_PROMPT: &str = "You are a ping responder.";
pub const PING_USER_PROMPT: &str = "Reply with 'pong'.";

/// System prompt for the single narrative report.
pub const ANALYST_SYSTEM_PROMPT: &str =
    "You are a senior market analyst. Produce concise, decision-useful insights.";

/// Default instructions placed ahead of the industry payload in a report prompt.
pub const DEFAULT_REPORT_TEMPLATE: &str = "Focus on:
- Executive summary
- Opportunities
- Risks
- KPIs to watch over next 12-24 months";

/// System prompt for the structured-insight request.
///
/// The field names and limits here are the ones `extract_insight` validates.
pub fn insight_system_prompt() -> String {
    r#"You are a market data desk. Respond ONLY with a JSON object. No markdown, no code fences, no commentary.

The object has exactly these fields:
- "basketIndex": array of {"label": string, "value": number}. An ordered time series of an equal-weighted basket of the industry's listed companies, oldest first, 6 to 12 points, rebased so the first point is 100.
- "companies": array of at most 15 {"name": string, "ticker": string, "direction": "up" | "down", "changePct": number, "driver": string}. The most relevant listed companies and their latest move, with a one-line driver.
- "stories": array of at most 5 {"headline": string, "summary": string, "impact": string, "source": string}. Short news-like items that matter for the industry right now.

Use plain numbers for "value" and "changePct" (no percent signs). Omit a field's entries rather than inventing data you are unsure of."#
        .to_string()
}

/// Shared user prompt for a fan-out run.
pub fn agent_user_prompt(view_mode: ViewMode, layout: LayoutMode) -> String {
    format!(
        "Mode: {view_mode:?}\nLayout: {layout:?}\nProvide concise, decision-grade output with bullet structure and clear calls to action."
    )
}

/// Pretty-printed industry payload with the user's framing attached under `context`.
pub fn report_payload(
    bundle: &IndustryDataBundle,
    context: &ReportContext,
) -> Result<String, AgentError> {
    let mut payload = serde_json::to_value(bundle)?;
    if let Some(obj) = payload.as_object_mut() {
        obj.insert("context".to_string(), serde_json::to_value(context)?);
    }
    Ok(serde_json::to_string_pretty(&payload)?)
}

/// User prompt for a narrative report or structured-insight request.
pub fn report_user_prompt(
    template: &str,
    bundle: &IndustryDataBundle,
    context: &ReportContext,
) -> Result<String, AgentError> {
    Ok(format!(
        "{template}\n\nIndustry data:\n{}",
        report_payload(bundle, context)?
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_bundle;
    use market360_models::{Region, Scenario, TimeHorizon};

    #[test]
    fn agent_prompt_names_mode_and_layout() {
        let prompt = agent_user_prompt(ViewMode::Quant, LayoutMode::Research);
        assert!(prompt.starts_with("Mode: Quant\nLayout: Research\n"));
    }

    #[test]
    fn report_payload_has_context_and_sections() {
        let context = ReportContext {
            region: Region::Europe,
            time_horizon: TimeHorizon::MediumTerm,
            scenario: Scenario::Optimistic,
            question: "What drives margins?".to_string(),
        };
        let payload = report_payload(&sample_bundle(), &context).unwrap();
        let value: serde_json::Value = serde_json::from_str(&payload).unwrap();

        for key in ["industry", "demographics", "macro", "indicators", "riskProfile"] {
            assert!(value.get(key).is_some(), "missing {key}");
        }
        assert_eq!(value["context"]["region"], "Europe");
        assert_eq!(value["context"]["timeHorizon"], "Medium-term");
        assert_eq!(value["context"]["question"], "What drives margins?");
    }

    #[test]
    fn report_prompt_starts_with_template() {
        let prompt =
            report_user_prompt(DEFAULT_REPORT_TEMPLATE, &sample_bundle(), &ReportContext::default())
                .unwrap();
        assert!(prompt.starts_with("Focus on:"));
        assert!(prompt.contains("\n\nIndustry data:\n{"));
    }

    #[test]
    fn insight_prompt_names_every_field() {
        let prompt = insight_system_prompt();
        for field in ["basketIndex", "companies", "stories", "changePct", "headline"] {
            assert!(prompt.contains(field));
        }
    }
}
