use std::collections::BTreeMap;

use mindscreen_core::models::response::RawResponse;
use mindscreen_core::models::risk::{DetailedBreakdown, RiskAssessment};
use mindscreen_core::models::scored::ScoredResult;

use crate::definition::InstrumentDefinition;
use crate::scoring::FLAG_FUNCTIONAL_IMPAIRMENT;

const UNKNOWN_CATEGORY: &str = "Unknown";

/// Map each response to its symptom category and impact level.
pub fn categorize(def: &InstrumentDefinition, responses: &[RawResponse]) -> Vec<DetailedBreakdown> {
    responses
        .iter()
        .map(|r| DetailedBreakdown {
            question_id: r.question_id.clone(),
            question: r.question.clone(),
            score: r.value,
            category: def
                .item(&r.question_id)
                .map_or(UNKNOWN_CATEGORY, |i| i.category.as_str())
                .to_string(),
            impact: def.impact.classify(r.value),
        })
        .collect()
}

/// Walk the responses against the category table and derive risk and
/// protective factors. Immediate intervention is required when the
/// critical-item override fired or the score reaches the top-band
/// threshold.
pub fn assess_risk(
    def: &InstrumentDefinition,
    scored: &ScoredResult,
    responses: &[RawResponse],
) -> RiskAssessment {
    let rules = &def.risk_rules;
    let mut risk_factors = Vec::new();
    let mut protective_factors = Vec::new();

    for response in responses {
        let Some(item) = def.item(&response.question_id) else {
            continue;
        };
        if response.value >= rules.item_risk_min_value {
            if let Some(factor) = &item.risk_factor {
                risk_factors.push(factor.clone());
            }
        } else if response.value == 0
            && let Some(factor) = &item.protective_factor
        {
            protective_factors.push(factor.clone());
        }
    }

    if scored.score >= rules.score_risk_factor_min {
        risk_factors.push(rules.score_risk_factor.clone());
    }

    let mut specific_risks = BTreeMap::new();
    if let Some(critical) = &def.critical_item {
        for flag in &critical.risk_flags {
            specific_risks.insert(flag.clone(), scored.critical_override);
        }
    }
    specific_risks.insert(
        FLAG_FUNCTIONAL_IMPAIRMENT.to_string(),
        scored.score >= rules.functional_risk_min_score,
    );

    RiskAssessment {
        immediate_intervention: scored.critical_override
            || scored.score >= rules.intervention_min_score,
        risk_factors,
        protective_factors,
        specific_risks,
    }
}
