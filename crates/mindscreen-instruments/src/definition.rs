use mindscreen_core::models::education::EducationalContent;
use mindscreen_core::models::resources::OnlineResource;
use mindscreen_core::models::risk::{ActionableTip, Impact};
use mindscreen_core::models::scored::{RiskBand, Severity};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

use crate::error::InstrumentError;

/// Inclusive range of valid answer values for an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ScoreRange {
    pub min: u32,
    pub max: u32,
}

impl ScoreRange {
    pub fn contains(&self, value: u32) -> bool {
        value >= self.min && value <= self.max
    }
}

/// One questionnaire item and its entries in the category table.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ItemDefinition {
    pub id: String,
    /// Short name, e.g. "Sleep Problems".
    pub name: String,
    /// Symptom category, e.g. "Sleep".
    pub category: String,
    pub range: ScoreRange,
    /// Appended to risk factors when the answer reaches the risk threshold.
    pub risk_factor: Option<String>,
    /// Appended to protective factors when the answer is zero.
    pub protective_factor: Option<String>,
    /// Reported as a strength when the answer is at most one.
    pub strength: Option<String>,
}

/// A contiguous score interval mapped to a severity and risk band.
/// `max_score: None` marks the open-ended top band.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SeverityBand {
    pub min_score: u32,
    pub max_score: Option<u32>,
    pub severity: Severity,
    pub risk: RiskBand,
    pub interpretation: String,
    pub recommendations: Vec<String>,
}

impl SeverityBand {
    pub fn contains(&self, score: u32) -> bool {
        score >= self.min_score && self.max_score.is_none_or(|max| score <= max)
    }
}

/// An item whose positive answer escalates risk regardless of total score.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CriticalItem {
    pub item_id: String,
    /// Urgent safety message, prepended verbatim to recommendations.
    pub message: String,
    /// Names set in `RiskAssessment::specific_risks` when endorsed.
    pub risk_flags: Vec<String>,
}

/// Answer-value thresholds for per-item impact classification.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ImpactThresholds {
    pub high: u32,
    pub moderate: u32,
}

impl ImpactThresholds {
    pub fn classify(&self, value: u32) -> Impact {
        if value >= self.high {
            Impact::High
        } else if value >= self.moderate {
            Impact::Moderate
        } else {
            Impact::Low
        }
    }
}

/// Score-level thresholds used by the risk assessor.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RiskRules {
    /// Item value at or above which the item's risk factor applies.
    pub item_risk_min_value: u32,
    /// Total score at or above which immediate intervention is required.
    pub intervention_min_score: u32,
    /// Total score at or above which `score_risk_factor` is appended.
    pub score_risk_factor_min: u32,
    pub score_risk_factor: String,
    /// Total score at or above which `functional_impairment` is flagged.
    pub functional_risk_min_score: u32,
}

/// Functional impairment label for a minimum total score.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ImpairmentLevel {
    pub min_score: u32,
    pub label: String,
}

/// When an actionable tip applies.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(tag = "type", rename_all = "snake_case")]
#[ts(export)]
pub enum TipTrigger {
    Always,
    /// Any of the listed items answered at `min_value` or above.
    AnyItem { item_ids: Vec<String>, min_value: u32 },
    MinScore { score: u32 },
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TipRule {
    pub trigger: TipTrigger,
    pub tip: ActionableTip,
}

/// A complete, data-described screening instrument.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InstrumentDefinition {
    /// Unique identifier, e.g. "phq9".
    pub id: String,
    /// Human-readable name, e.g. "PHQ-9".
    pub name: String,
    pub items: Vec<ItemDefinition>,
    /// Ordered, contiguous, non-overlapping, starting at zero.
    pub bands: Vec<SeverityBand>,
    pub critical_item: Option<CriticalItem>,
    pub impact: ImpactThresholds,
    pub risk_rules: RiskRules,
    /// Ordered by ascending `min_score`.
    pub functional_impairment: Vec<ImpairmentLevel>,
    pub tips: Vec<TipRule>,
    pub warning_signs: Vec<String>,
    pub progress_metrics: Vec<String>,
    /// Attached unchanged to every result.
    pub education: EducationalContent,
    /// Location-independent resources listed next to local providers.
    pub online_resources: Vec<OnlineResource>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, Error)]
#[ts(export)]
#[error("{message}")]
pub struct ValidationError {
    pub question_id: String,
    pub value: u32,
    pub expected_range: ScoreRange,
    pub message: String,
}

impl InstrumentDefinition {
    pub fn item(&self, id: &str) -> Option<&ItemDefinition> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn band_for(&self, score: u32) -> Result<&SeverityBand, InstrumentError> {
        self.bands
            .iter()
            .find(|b| b.contains(score))
            .ok_or_else(|| InstrumentError::NoBand {
                instrument_id: self.id.clone(),
                score,
            })
    }

    /// Highest impairment label whose threshold the score reaches.
    pub fn functional_impairment(&self, score: u32) -> Option<&str> {
        self.functional_impairment
            .iter()
            .rev()
            .find(|l| score >= l.min_score)
            .map(|l| l.label.as_str())
    }

    /// Check that the band table starts at zero, has no gaps or overlaps,
    /// and only the last band is open-ended.
    pub fn validate_bands(&self) -> Result<(), InstrumentError> {
        let invalid = |reason: String| InstrumentError::InvalidBands {
            instrument_id: self.id.clone(),
            reason,
        };

        let first = self
            .bands
            .first()
            .ok_or_else(|| invalid("no bands defined".to_string()))?;
        if first.min_score != 0 {
            return Err(invalid(format!("first band starts at {}", first.min_score)));
        }

        for pair in self.bands.windows(2) {
            let (lower, upper) = (&pair[0], &pair[1]);
            let Some(max) = lower.max_score else {
                return Err(invalid(format!(
                    "band {} is open-ended but not last",
                    lower.severity
                )));
            };
            if max < lower.min_score {
                return Err(invalid(format!("band {} is empty", lower.severity)));
            }
            if upper.min_score != max + 1 {
                return Err(invalid(format!(
                    "band {} ends at {max} but band {} starts at {}",
                    lower.severity, upper.severity, upper.min_score
                )));
            }
        }
        Ok(())
    }

    /// Validate answer values against each item's range. Unknown question
    /// IDs are ignored.
    pub fn validate_responses(
        &self,
        responses: &[mindscreen_core::models::response::RawResponse],
    ) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        for response in responses {
            if let Some(item) = self.item(&response.question_id)
                && !item.range.contains(response.value)
            {
                errors.push(ValidationError {
                    question_id: response.question_id.clone(),
                    value: response.value,
                    expected_range: item.range,
                    message: format!(
                        "{}: {} answer {} is outside range [{}, {}]",
                        self.name, item.name, response.value, item.range.min, item.range.max,
                    ),
                });
            }
        }
        errors
    }
}
