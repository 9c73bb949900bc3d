use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use super::education::EducationalContent;
use super::insights::AiInsights;
use super::resources::ProfessionalResources;
use super::risk::{ActionableTip, DetailedBreakdown, FollowUpRecommendation, RiskAssessment};
use super::scored::ScoredResult;
use super::user::UserContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum DataQuality {
    High,
    Medium,
    Low,
}

impl DataQuality {
    /// ≥80 high, ≥60 medium, else low.
    pub fn from_confidence(confidence: u8) -> Self {
        if confidence >= 80 {
            DataQuality::High
        } else if confidence >= 60 {
            DataQuality::Medium
        } else {
            DataQuality::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DataQuality::High => "high",
            DataQuality::Medium => "medium",
            DataQuality::Low => "low",
        }
    }
}

/// Everything produced for one completed assessment. Built once and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CompositeAssessmentResult {
    pub assessment_id: Uuid,
    pub instrument_id: String,
    pub assessment_date: jiff::Timestamp,
    pub scored: ScoredResult,
    pub user_context: UserContext,
    pub breakdown: Vec<DetailedBreakdown>,
    pub risk_assessment: RiskAssessment,
    pub strengths: Vec<String>,
    pub actionable_tips: Vec<ActionableTip>,
    pub follow_up: FollowUpRecommendation,
    pub professional_resources: ProfessionalResources,
    pub educational_content: EducationalContent,
    pub insights: AiInsights,
    pub completion_time_seconds: u64,
    pub confidence_score: u8,
    pub data_quality: DataQuality,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_quality_thresholds() {
        assert_eq!(DataQuality::from_confidence(100), DataQuality::High);
        assert_eq!(DataQuality::from_confidence(80), DataQuality::High);
        assert_eq!(DataQuality::from_confidence(79), DataQuality::Medium);
        assert_eq!(DataQuality::from_confidence(60), DataQuality::Medium);
        assert_eq!(DataQuality::from_confidence(59), DataQuality::Low);
        assert_eq!(DataQuality::from_confidence(0), DataQuality::Low);
    }
}
