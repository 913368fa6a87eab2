use serde::{Deserialize, Serialize};

/// Most companies kept from one structured snapshot.
pub const MAX_COMPANIES: usize = 15;
/// Most stories kept from one structured snapshot.
pub const MAX_STORIES: usize = 5;

/// Validated structured snapshot returned by the insight extractor.
///
/// Serialized with the same camelCase field names the model is asked to
/// produce, so a validated document can be fed back through the extractor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct StructuredInsightDocument {
    pub basket_index: Vec<BasketPoint>,
    pub companies: Vec<CompanyMove>,
    pub stories: Vec<Story>,
}

impl StructuredInsightDocument {
    pub fn is_empty(&self) -> bool {
        self.basket_index.is_empty() && self.companies.is_empty() && self.stories.is_empty()
    }
}

/// One point of the industry basket time series.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BasketPoint {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Up,
    Down,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CompanyMove {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticker: Option<String>,
    pub direction: Direction,
    pub change_pct: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver: Option<String>,
}

/// Short news-like item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Story {
    pub headline: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impact: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_camel_case_keys() {
        let doc = StructuredInsightDocument {
            basket_index: vec![BasketPoint {
                label: "Q1".to_string(),
                value: 101.5,
            }],
            companies: vec![CompanyMove {
                name: "Acme".to_string(),
                ticker: None,
                direction: Direction::Down,
                change_pct: -2.5,
                driver: None,
            }],
            stories: vec![],
        };

        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["basketIndex"][0]["label"], "Q1");
        assert_eq!(json["companies"][0]["direction"], "down");
        assert_eq!(json["companies"][0]["changePct"], -2.5);
        assert!(json["companies"][0].get("ticker").is_none());
    }

    #[test]
    fn empty_document() {
        assert!(StructuredInsightDocument::default().is_empty());
    }

    #[test]
    fn direction_defaults_up() {
        assert_eq!(Direction::default(), Direction::Up);
        assert_eq!(serde_json::to_value(Direction::Down).unwrap(), "down");
    }
}
