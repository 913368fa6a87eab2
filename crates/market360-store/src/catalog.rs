use std::path::Path;

use market360_models::industry::{
    CompetitiveIntensity, CustomerSegment, DemographicsProfile, Indicator, IndicatorCategory,
    IndicatorSet, Industry, IndustryDataBundle, Level, MacroEnvironment, MacroRisk, Region,
    RegionImportance, RiskItem, RiskOpportunityProfile, SegmentType,
};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::error::StoreError;

/// Immutable lookup table of static industry records.
///
/// Loaded once from JSON fixtures and only read afterwards. Industries without
/// a matching auxiliary record get a generic profile so every bundle is complete.
#[derive(Debug, Clone, Default)]
pub struct IndustryCatalog {
    industries: Vec<Industry>,
    demographics: Vec<DemographicsProfile>,
    macro_envs: Vec<MacroEnvironment>,
    indicators: Vec<IndicatorSet>,
    risks: Vec<RiskOpportunityProfile>,
}

impl IndustryCatalog {
    pub fn new(
        industries: Vec<Industry>,
        demographics: Vec<DemographicsProfile>,
        macro_envs: Vec<MacroEnvironment>,
        indicators: Vec<IndicatorSet>,
        risks: Vec<RiskOpportunityProfile>,
    ) -> Self {
        Self {
            industries,
            demographics,
            macro_envs,
            indicators,
            risks,
        }
    }

    /// Load the catalog from a fixture directory.
    ///
    /// `industries.json` is required. `demographics.json`, `macro.json`,
    /// `indicators.json` and `risks.json` are optional.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let dir = dir.as_ref();
        let catalog = Self {
            industries: read_table(dir, "industries.json", true)?,
            demographics: read_table(dir, "demographics.json", false)?,
            macro_envs: read_table(dir, "macro.json", false)?,
            indicators: read_table(dir, "indicators.json", false)?,
            risks: read_table(dir, "risks.json", false)?,
        };
        info!(
            dir = %dir.display(),
            industries = catalog.industries.len(),
            "Loaded industry catalog"
        );
        Ok(catalog)
    }

    /// All industries in fixture order.
    pub fn list(&self) -> &[Industry] {
        &self.industries
    }

    pub fn get(&self, industry_id: &str) -> Option<&Industry> {
        self.industries.iter().find(|i| i.id == industry_id)
    }

    pub fn regions(&self) -> &'static [Region] {
        &Region::ALL
    }

    /// Everything known about one industry, with fallbacks for missing records.
    pub fn bundle(&self, industry_id: &str) -> Result<IndustryDataBundle, StoreError> {
        let industry = self
            .get(industry_id)
            .cloned()
            .ok_or_else(|| StoreError::UnknownIndustry(industry_id.to_string()))?;

        let demographics = self
            .demographics
            .iter()
            .find(|d| d.industry_id == industry_id)
            .cloned()
            .unwrap_or_else(|| {
                debug!(industry_id, "No demographics record, using fallback");
                fallback_demographics(&industry)
            });
        let macro_env = self
            .macro_envs
            .iter()
            .find(|m| m.industry_id == industry_id)
            .cloned()
            .unwrap_or_else(|| {
                debug!(industry_id, "No macro record, using fallback");
                fallback_macro(&industry)
            });
        let indicators = self
            .indicators
            .iter()
            .find(|m| m.industry_id == industry_id)
            .cloned()
            .unwrap_or_else(|| {
                debug!(industry_id, "No indicator record, using fallback");
                fallback_indicators(&industry)
            });
        let risk_profile = self
            .risks
            .iter()
            .find(|r| r.industry_id == industry_id)
            .cloned()
            .unwrap_or_else(|| {
                debug!(industry_id, "No risk record, using fallback");
                fallback_risks(&industry)
            });

        Ok(IndustryDataBundle {
            industry,
            demographics,
            macro_env,
            indicators,
            risk_profile,
        })
    }
}

fn read_table<T: DeserializeOwned>(
    dir: &Path,
    file: &str,
    required: bool,
) -> Result<Vec<T>, StoreError> {
    let path = dir.join(file);
    if !required && !path.exists() {
        debug!(file, "Optional fixture missing, using empty table");
        return Ok(Vec::new());
    }

    let text = std::fs::read_to_string(&path).map_err(|source| StoreError::Io {
        file: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| StoreError::Json {
        file: path.display().to_string(),
        source,
    })
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn fallback_demographics(industry: &Industry) -> DemographicsProfile {
    let segment = |name: &str, kind: SegmentType, share: f64| CustomerSegment {
        name: name.to_string(),
        kind,
        share,
    };
    let region = |name: &str| RegionImportance {
        name: name.to_string(),
        importance: Level::High,
    };

    DemographicsProfile {
        industry_id: industry.id.clone(),
        customer_segments: vec![
            segment("Mass market consumers", SegmentType::B2C, 50.0),
            segment("Enterprises/SMBs", SegmentType::B2B, 40.0),
            segment("Public sector", SegmentType::Government, 10.0),
        ],
        regions: vec![
            region("North America"),
            region("Europe"),
            region("Asia-Pacific"),
        ],
        income_brackets: None,
        age_groups: None,
        urban_vs_rural: None,
        notes: Some("Fallback demographic profile; replace with domain data.".to_string()),
    }
}

fn fallback_macro(industry: &Industry) -> MacroEnvironment {
    let risk = |name: &str, severity: f64| MacroRisk {
        name: name.to_string(),
        severity,
        notes: None,
    };

    MacroEnvironment {
        industry_id: industry.id.clone(),
        political: strings(&["Stable policy backdrop, watch trade rules"]),
        economic: strings(&["Moderately cyclical, sensitive to credit and GDP"]),
        social: strings(&["Evolving consumer preferences and digital adoption"]),
        technological: strings(&["Automation and analytics adoption rising"]),
        environmental: strings(&["Pressure to decarbonize and improve efficiency"]),
        legal: strings(&["Standard compliance, IP, and liability exposure"]),
        macro_risks: vec![risk("Demand slowdown", 6.0), risk("Input cost volatility", 5.0)],
    }
}

fn fallback_indicators(industry: &Industry) -> IndicatorSet {
    let indicator = |name: &str, description: &str, rationale: &str, category| Indicator {
        name: name.to_string(),
        description: description.to_string(),
        rationale: rationale.to_string(),
        proxy: None,
        category,
    };

    IndicatorSet {
        industry_id: industry.id.clone(),
        leading_indicators: vec![
            indicator(
                "New orders",
                "Forward bookings across major segments",
                "Signals demand before revenue",
                IndicatorCategory::Demand,
            ),
            indicator(
                "Capex intentions",
                "Planned investments by customers",
                "Precedes deployment and revenue",
                IndicatorCategory::Financial,
            ),
        ],
        lagging_indicators: vec![
            indicator(
                "Revenue growth",
                "Reported sales across units",
                "Reflects past demand",
                IndicatorCategory::Financial,
            ),
            indicator(
                "Employment levels",
                "Headcount across the industry",
                "Adjusts after activity changes",
                IndicatorCategory::Supply,
            ),
        ],
    }
}

fn fallback_risks(industry: &Industry) -> RiskOpportunityProfile {
    RiskOpportunityProfile {
        industry_id: industry.id.clone(),
        risks: vec![
            RiskItem {
                item: "Demand shocks".to_string(),
                impact: Level::High,
            },
            RiskItem {
                item: "Supply chain disruption".to_string(),
                impact: Level::Medium,
            },
        ],
        opportunities: strings(&[
            "Digital efficiencies",
            "New customer segments",
            "Product mix shift",
        ]),
        structural_trends: strings(&["Technology adoption", "Regulatory evolution"]),
        competitive_intensity: CompetitiveIntensity {
            level: Level::Medium,
            notes: Some("Fragmented incumbents".to_string()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn industry(id: &str, name: &str) -> Industry {
        Industry {
            id: id.to_string(),
            name: name.to_string(),
            category: "Technology".to_string(),
            description: format!("{name} industry"),
            business_models: vec![],
            revenue_drivers: vec![],
            cost_drivers: vec![],
            value_chain: vec![],
            segments: vec![],
        }
    }

    fn catalog() -> IndustryCatalog {
        let risks = RiskOpportunityProfile {
            industry_id: "semis".to_string(),
            risks: vec![RiskItem {
                item: "Export controls".to_string(),
                impact: Level::High,
            }],
            opportunities: vec!["AI accelerators".to_string()],
            structural_trends: vec![],
            competitive_intensity: CompetitiveIntensity {
                level: Level::High,
                notes: None,
            },
        };
        IndustryCatalog::new(
            vec![industry("semis", "Semiconductors"), industry("retail", "Retail")],
            vec![],
            vec![],
            vec![],
            vec![risks],
        )
    }

    #[test]
    fn list_preserves_order() {
        let binding = catalog();
        let ids: Vec<&str> = binding.list().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["semis", "retail"]);
    }

    #[test]
    fn bundle_uses_matching_record() {
        let bundle = catalog().bundle("semis").unwrap();
        assert_eq!(bundle.risk_profile.risks[0].item, "Export controls");
    }

    #[test]
    fn bundle_falls_back_for_missing_records() {
        let bundle = catalog().bundle("retail").unwrap();
        assert_eq!(bundle.industry.name, "Retail");
        assert_eq!(bundle.demographics.industry_id, "retail");
        assert_eq!(bundle.demographics.customer_segments.len(), 3);
        assert_eq!(bundle.macro_env.macro_risks.len(), 2);
        assert_eq!(bundle.indicators.leading_indicators[0].name, "New orders");
        assert_eq!(bundle.risk_profile.competitive_intensity.level, Level::Medium);
    }

    #[test]
    fn unknown_industry_is_an_error() {
        let err = catalog().bundle("shipping").unwrap_err();
        assert!(matches!(err, StoreError::UnknownIndustry(id) if id == "shipping"));
    }

    #[test]
    fn six_regions() {
        assert_eq!(catalog().regions().len(), 6);
    }
}
