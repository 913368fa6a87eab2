//! Static industry records consumed by the prompt builders.
//!
//! Field names follow the camelCase JSON fixtures the catalog is loaded from.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum Region {
    #[default]
    Global,
    #[serde(rename = "North America")]
    NorthAmerica,
    Europe,
    #[serde(rename = "Asia-Pacific")]
    AsiaPacific,
    #[serde(rename = "Latin America")]
    LatinAmerica,
    Africa,
}

impl Region {
    pub const ALL: [Region; 6] = [
        Region::Global,
        Region::NorthAmerica,
        Region::Europe,
        Region::AsiaPacific,
        Region::LatinAmerica,
        Region::Africa,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Region::Global => "Global",
            Region::NorthAmerica => "North America",
            Region::Europe => "Europe",
            Region::AsiaPacific => "Asia-Pacific",
            Region::LatinAmerica => "Latin America",
            Region::Africa => "Africa",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum TimeHorizon {
    #[default]
    #[serde(rename = "Short-term")]
    ShortTerm,
    #[serde(rename = "Medium-term")]
    MediumTerm,
    #[serde(rename = "Long-term")]
    LongTerm,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum Scenario {
    #[default]
    Baseline,
    Optimistic,
    Pessimistic,
}

/// Audience the fan-out output is tuned for.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum ViewMode {
    Beginner,
    Analyst,
    #[default]
    Executive,
    Quant,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum LayoutMode {
    #[default]
    Dashboard,
    Research,
    Executive,
    Quant,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Level {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Industry {
    pub id: String,
    pub name: String,
    pub category: String,
    pub description: String,
    #[serde(default)]
    pub business_models: Vec<String>,
    #[serde(default)]
    pub revenue_drivers: Vec<String>,
    #[serde(default)]
    pub cost_drivers: Vec<String>,
    #[serde(default)]
    pub value_chain: Vec<ValueChainStage>,
    #[serde(default)]
    pub segments: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ValueChainStage {
    pub stage: String,
    pub description: String,
    pub margin_profile: Level,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum SegmentType {
    B2C,
    B2B,
    Government,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CustomerSegment {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: SegmentType,
    pub share: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RegionImportance {
    /// Usually a [`Region`] label, but fixtures may name sub-regions too.
    pub name: String,
    pub importance: Level,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UrbanRuralSplit {
    pub urban: f64,
    pub rural: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DemographicsProfile {
    pub industry_id: String,
    pub customer_segments: Vec<CustomerSegment>,
    pub regions: Vec<RegionImportance>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub income_brackets: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age_groups: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub urban_vs_rural: Option<UrbanRuralSplit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MacroRisk {
    pub name: String,
    pub severity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// PESTEL view of an industry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MacroEnvironment {
    pub industry_id: String,
    #[serde(default)]
    pub political: Vec<String>,
    #[serde(default)]
    pub economic: Vec<String>,
    #[serde(default)]
    pub social: Vec<String>,
    #[serde(default)]
    pub technological: Vec<String>,
    #[serde(default)]
    pub environmental: Vec<String>,
    #[serde(default)]
    pub legal: Vec<String>,
    #[serde(default)]
    pub macro_risks: Vec<MacroRisk>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum IndicatorCategory {
    Demand,
    Supply,
    Financial,
    Sentiment,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Indicator {
    pub name: String,
    pub description: String,
    pub rationale: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy: Option<String>,
    pub category: IndicatorCategory,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorSet {
    pub industry_id: String,
    pub leading_indicators: Vec<Indicator>,
    pub lagging_indicators: Vec<Indicator>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RiskItem {
    pub item: String,
    pub impact: Level,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompetitiveIntensity {
    pub level: Level,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RiskOpportunityProfile {
    pub industry_id: String,
    pub risks: Vec<RiskItem>,
    pub opportunities: Vec<String>,
    pub structural_trends: Vec<String>,
    pub competitive_intensity: CompetitiveIntensity,
}

/// Everything known about one industry, as embedded into report prompts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IndustryDataBundle {
    pub industry: Industry,
    pub demographics: DemographicsProfile,
    #[serde(rename = "macro")]
    pub macro_env: MacroEnvironment,
    pub indicators: IndicatorSet,
    pub risk_profile: RiskOpportunityProfile,
}

/// User-selected framing sent alongside the bundle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ReportContext {
    pub region: Region,
    pub time_horizon: TimeHorizon,
    pub scenario: Scenario,
    #[serde(default)]
    pub question: String,
}
