pub mod agent;
pub mod config;
pub mod industry;
pub mod insight;

pub use agent::{
    AgentConfig, AgentRunReport, AgentRunResult, CompletionRequest, Credentials, DEFAULT_BASE_URL,
};
pub use config::{AgentsConfig, Market360Config, OpenRouterConfig, StoreConfig, DEFAULT_MODEL};
pub use industry::{
    DemographicsProfile, Indicator, IndicatorSet, Industry, IndustryDataBundle, LayoutMode, Level,
    MacroEnvironment, Region, ReportContext, RiskOpportunityProfile, Scenario, TimeHorizon,
    ValueChainStage, ViewMode,
};
pub use insight::{
    BasketPoint, CompanyMove, Direction, Story, StructuredInsightDocument, MAX_COMPANIES,
    MAX_STORIES,
};
