//! Strengths, actionable tips and follow-up planning derived from a scored
//! result. Deterministic; used by the engine and by fallback content.

use mindscreen_core::models::response::RawResponse;
use mindscreen_core::models::risk::{ActionableTip, FollowUpRecommendation};
use mindscreen_core::models::scored::{RiskBand, ScoredResult};

use crate::definition::{InstrumentDefinition, TipTrigger};

pub const COMPLETED_ASSESSMENT_STRENGTH: &str =
    "Completed a mental health assessment, showing self-awareness and proactive approach to wellbeing";
pub const MANAGEABLE_SYMPTOMS_STRENGTH: &str =
    "Currently experiencing manageable levels of symptoms";

/// Item strengths for answers of at most one, then the general strengths.
pub fn identify_strengths(
    def: &InstrumentDefinition,
    scored: &ScoredResult,
    responses: &[RawResponse],
) -> Vec<String> {
    let mut strengths: Vec<String> = responses
        .iter()
        .filter(|r| r.value <= 1)
        .filter_map(|r| def.item(&r.question_id)?.strength.clone())
        .filter(|s| !s.is_empty())
        .collect();

    strengths.push(COMPLETED_ASSESSMENT_STRENGTH.to_string());
    if matches!(scored.risk, RiskBand::Low | RiskBand::Mild) {
        strengths.push(MANAGEABLE_SYMPTOMS_STRENGTH.to_string());
    }
    strengths
}

/// Tips whose trigger matches, in definition order.
pub fn actionable_tips(
    def: &InstrumentDefinition,
    scored: &ScoredResult,
    responses: &[RawResponse],
) -> Vec<ActionableTip> {
    def.tips
        .iter()
        .filter(|rule| match &rule.trigger {
            TipTrigger::Always => true,
            TipTrigger::AnyItem { item_ids, min_value } => responses
                .iter()
                .any(|r| item_ids.contains(&r.question_id) && r.value >= *min_value),
            TipTrigger::MinScore { score } => scored.score >= *score,
        })
        .map(|rule| rule.tip.clone())
        .collect()
}

/// Retake interval and monitoring cadence by risk band.
pub fn follow_up(def: &InstrumentDefinition, scored: &ScoredResult) -> FollowUpRecommendation {
    let (retake_in_weeks, monitoring_frequency) = match scored.risk {
        RiskBand::Severe => (1, "Daily monitoring recommended"),
        RiskBand::ModeratelySevere | RiskBand::Moderate => (2, "Every 3-4 days"),
        RiskBand::Mild => (3, "Twice weekly"),
        RiskBand::Low => (4, "Weekly self-check"),
    };

    FollowUpRecommendation {
        retake_in_weeks,
        monitoring_frequency: monitoring_frequency.to_string(),
        warning_signs_to_watch: def.warning_signs.clone(),
        progress_tracking: def.progress_metrics.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruments::phq9;
    use crate::scoring::score;

    fn responses(values: &[u32]) -> Vec<RawResponse> {
        values
            .iter()
            .enumerate()
            .map(|(i, &value)| RawResponse {
                question_id: format!("phq9_{}", i + 1),
                value,
                question: String::new(),
                label: String::new(),
                timestamp: jiff::Timestamp::UNIX_EPOCH,
            })
            .collect()
    }

    #[test]
    fn low_answers_become_strengths() {
        let def = phq9::definition();
        let list = responses(&[0, 1, 3, 3, 3, 3, 3, 3, 0]);
        let scored = score(def, &list).unwrap();
        let strengths = identify_strengths(def, &scored, &list);

        assert_eq!(
            strengths,
            vec![
                "Maintains interest and enjoyment in activities",
                "Generally maintains positive mood",
                "No thoughts of self-harm (major protective factor)",
                COMPLETED_ASSESSMENT_STRENGTH,
            ]
        );
    }

    #[test]
    fn manageable_strength_only_for_low_or_mild() {
        let def = phq9::definition();
        let list = responses(&[1, 1, 1, 1, 0, 0, 0, 0, 0]);
        let scored = score(def, &list).unwrap();
        let strengths = identify_strengths(def, &scored, &list);
        assert_eq!(strengths.last().unwrap(), MANAGEABLE_SYMPTOMS_STRENGTH);
    }

    #[test]
    fn tips_follow_triggers() {
        let def = phq9::definition();

        let calm = responses(&[0; 9]);
        let scored = score(def, &calm).unwrap();
        let titles: Vec<_> = actionable_tips(def, &scored, &calm)
            .into_iter()
            .map(|t| t.category)
            .collect();
        assert_eq!(titles, vec!["Social Support"]);

        let heavy = responses(&[2, 2, 2, 2, 2, 2, 2, 2, 0]);
        let scored = score(def, &heavy).unwrap();
        let titles: Vec<_> = actionable_tips(def, &scored, &heavy)
            .into_iter()
            .map(|t| t.category)
            .collect();
        assert_eq!(
            titles,
            vec![
                "Sleep Hygiene",
                "Behavioral Activation",
                "Social Support",
                "Stress Management",
                "Professional Support"
            ]
        );
    }

    #[test]
    fn follow_up_tightens_with_risk() {
        let def = phq9::definition();
        let severe = score(def, &responses(&[3, 3, 3, 3, 3, 3, 2, 0, 0])).unwrap();
        let plan = follow_up(def, &severe);
        assert_eq!(plan.retake_in_weeks, 1);
        assert_eq!(plan.monitoring_frequency, "Daily monitoring recommended");
        assert_eq!(plan.warning_signs_to_watch.len(), def.warning_signs.len());

        let minimal = score(def, &responses(&[0; 9])).unwrap();
        assert_eq!(follow_up(def, &minimal).retake_in_weeks, 4);
    }
}
