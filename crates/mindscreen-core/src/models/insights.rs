use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Normalized AI insights. Every path, live model or static fallback,
/// produces a fully populated value of this type: collections default to
/// empty rather than being absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AiInsights {
    pub personalized_summary: String,
    #[serde(default)]
    pub personalized_message: Option<String>,
    #[serde(default)]
    pub key_insights: Vec<String>,
    pub risk_analysis: String,
    #[serde(default)]
    pub strengths_identified: Vec<String>,
    #[serde(default)]
    pub immediate_intervention_message: Option<String>,
    #[serde(default)]
    pub recommended_interventions: RecommendedInterventions,
    /// Category (e.g. `sleep`, `exercise`) to recommendations.
    #[serde(default)]
    pub lifestyle_recommendations: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub personalized_goals: Vec<Goal>,
    #[serde(default)]
    pub personalized_tips: Vec<Tip>,
    #[serde(default)]
    pub daily_practices: Vec<Practice>,
    #[serde(default)]
    pub warning_signs_to_watch: Vec<String>,
    #[serde(default)]
    pub personalized_encouragement: Option<String>,
    #[serde(default)]
    pub support_resources: Vec<SupportResource>,
    #[serde(default)]
    pub follow_up_suggestions: Vec<String>,
    #[serde(default)]
    pub professional_referral: bool,
    #[serde(default)]
    pub urgency_level: UrgencyLevel,
    pub provenance: Provenance,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RecommendedInterventions {
    pub immediate: Vec<String>,
    pub short_term: Vec<String>,
    pub long_term: Vec<String>,
}

impl RecommendedInterventions {
    pub fn is_empty(&self) -> bool {
        self.immediate.is_empty() && self.short_term.is_empty() && self.long_term.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Goal {
    pub goal: String,
    pub why: Option<String>,
    pub how: Vec<String>,
    pub timeframe: String,
    pub steps: Vec<String>,
    pub measurable: String,
    pub success_metrics: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Tip {
    pub category: String,
    pub title: String,
    pub description: String,
    pub action_steps: Vec<String>,
    pub personalized_note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Practice {
    pub name: String,
    pub description: String,
    pub frequency: String,
    pub personalized_tip: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SupportResource {
    pub kind: String,
    pub resource: String,
    pub description: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum UrgencyLevel {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

/// Where an [`AiInsights`] value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "kebab-case")]
#[ts(export)]
pub enum ResponseSource {
    /// Parsed from a live chat-completion call.
    ChatCompletionApi,
    /// Static content because the AI path is turned off.
    DisabledFallback,
    /// Static content because every provider was rate limited.
    RateLimitedFallback,
    /// Static content because of any other provider or parse failure.
    ErrorFallback,
}

impl ResponseSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseSource::ChatCompletionApi => "chat-completion-api",
            ResponseSource::DisabledFallback => "disabled-fallback",
            ResponseSource::RateLimitedFallback => "rate-limited-fallback",
            ResponseSource::ErrorFallback => "error-fallback",
        }
    }
}

impl fmt::Display for ResponseSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Provenance {
    pub is_real_ai: bool,
    pub model: String,
    pub timestamp: jiff::Timestamp,
    pub response_source: ResponseSource,
    pub response_time_ms: Option<u64>,
    /// Free-text cause when the result is a fallback.
    pub degradation_cause: Option<String>,
}
