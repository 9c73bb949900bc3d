use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Per-item impact classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Impact {
    Low,
    Moderate,
    High,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DetailedBreakdown {
    pub question_id: String,
    pub question: String,
    pub score: u32,
    pub category: String,
    pub impact: Impact,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RiskAssessment {
    pub immediate_intervention: bool,
    pub risk_factors: Vec<String>,
    pub protective_factors: Vec<String>,
    /// Named risk flags, e.g. `suicidal_ideation`, `functional_impairment`.
    pub specific_risks: BTreeMap<String, bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Difficulty {
    Easy,
    Moderate,
    Challenging,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ActionableTip {
    pub category: String,
    pub title: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub timeframe: String,
    pub evidence_based: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FollowUpRecommendation {
    pub retake_in_weeks: u32,
    pub monitoring_frequency: String,
    pub warning_signs_to_watch: Vec<String>,
    pub progress_tracking: Vec<String>,
}
