//! Structured-insight extraction.
//!
//! The model is asked for a fixed JSON shape but may wrap it in code fences,
//! put numbers in strings, or leave entries half filled. Each entry goes through
//! an explicit validation step that either produces a typed value or a
//! [`Rejection`]; rejected entries are dropped individually and logged, the rest
//! of the document survives.

use std::fmt;

use market360_models::{
    BasketPoint, CompanyMove, Direction, Story, StructuredInsightDocument, MAX_COMPANIES,
    MAX_STORIES,
};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::AgentError;

pub const PARSE_FAILED: &str = "could not parse structured data";
pub const EMPTY_SNAPSHOT: &str = "empty structured snapshot";

/// Why a single entry was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    NotAnObject,
    MissingLabel,
    NonNumericValue,
    MissingName,
    MissingHeadline,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Rejection::NotAnObject => "entry is not an object",
            Rejection::MissingLabel => "missing or empty label",
            Rejection::NonNumericValue => "value is not numeric",
            Rejection::MissingName => "missing or empty name",
            Rejection::MissingHeadline => "missing or empty headline",
        };
        f.write_str(reason)
    }
}

/// Parse and validate a structured snapshot returned by the model.
///
/// Fails with [`AgentError::Parse`] when the text is not a JSON object, or when
/// nothing usable survives validation.
pub fn extract_insight(raw: &str) -> Result<StructuredInsightDocument, AgentError> {
    let text = strip_code_fence(raw);
    let value: Value = serde_json::from_str(text).map_err(|e| {
        debug!(error = %e, len = raw.len(), "Structured insight is not valid JSON");
        AgentError::Parse(PARSE_FAILED.to_string())
    })?;
    let root = value.as_object().ok_or_else(|| {
        debug!("Structured insight root is not an object");
        AgentError::Parse(PARSE_FAILED.to_string())
    })?;

    let document = StructuredInsightDocument {
        basket_index: validate_list(root, "basketIndex", usize::MAX, basket_point),
        companies: validate_list(root, "companies", MAX_COMPANIES, company_move),
        stories: validate_list(root, "stories", MAX_STORIES, story),
    };

    if document.is_empty() {
        return Err(AgentError::Parse(EMPTY_SNAPSHOT.to_string()));
    }
    Ok(document)
}

/// Remove a surrounding triple-backtick fence, with or without a language tag.
pub fn strip_code_fence(text: &str) -> &str {
    let mut body = text.trim();
    if let Some(rest) = body.strip_prefix("```") {
        body = rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    }
    if let Some(rest) = body.strip_suffix("```") {
        body = rest;
    }
    body.trim()
}

/// Validate every entry of an array field, keeping at most `limit` valid ones
/// in their original order. A missing or non-array field yields no entries.
fn validate_list<T>(
    root: &Map<String, Value>,
    field: &str,
    limit: usize,
    check: fn(&Value) -> Result<T, Rejection>,
) -> Vec<T> {
    let Some(items) = root.get(field) else {
        return Vec::new();
    };
    let Some(items) = items.as_array() else {
        debug!(field, "Field is not an array, ignoring");
        return Vec::new();
    };

    let mut valid = Vec::new();
    for (index, item) in items.iter().enumerate() {
        if valid.len() == limit {
            debug!(field, limit, dropped = items.len() - index, "Truncating entries");
            break;
        }
        match check(item) {
            Ok(entry) => valid.push(entry),
            Err(reason) => debug!(field, index, %reason, "Dropping entry"),
        }
    }
    valid
}

fn basket_point(item: &Value) -> Result<BasketPoint, Rejection> {
    let obj = item.as_object().ok_or(Rejection::NotAnObject)?;
    let label = text(obj.get("label")).ok_or(Rejection::MissingLabel)?;
    let value = obj
        .get("value")
        .and_then(coerce_number)
        .ok_or(Rejection::NonNumericValue)?;
    Ok(BasketPoint { label, value })
}

fn company_move(item: &Value) -> Result<CompanyMove, Rejection> {
    let obj = item.as_object().ok_or(Rejection::NotAnObject)?;
    let name = text(obj.get("name")).ok_or(Rejection::MissingName)?;

    // Only an exact "down" flips the default.
    let direction = match obj.get("direction").and_then(Value::as_str).map(str::trim) {
        Some("down") => Direction::Down,
        _ => Direction::Up,
    };

    Ok(CompanyMove {
        name,
        ticker: text(obj.get("ticker")),
        direction,
        change_pct: obj.get("changePct").and_then(coerce_number).unwrap_or(0.0),
        driver: text(obj.get("driver")),
    })
}

fn story(item: &Value) -> Result<Story, Rejection> {
    let obj = item.as_object().ok_or(Rejection::NotAnObject)?;
    let headline = text(obj.get("headline")).ok_or(Rejection::MissingHeadline)?;
    Ok(Story {
        headline,
        summary: text(obj.get("summary")),
        impact: text(obj.get("impact")),
        source: text(obj.get("source")),
    })
}

/// A non-blank string, trimmed. Anything else counts as absent.
fn text(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// JSON numbers and numeric strings. Blank strings, booleans and non-finite
/// results are not numbers.
fn coerce_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|n| n.is_finite())
}
