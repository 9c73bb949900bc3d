use std::collections::BTreeMap;

use mindscreen_core::models::response::RawResponse;
use mindscreen_core::models::scored::{RiskBand, ScoredResult};
use tracing::debug;

use crate::definition::InstrumentDefinition;
use crate::error::InstrumentError;

pub const FLAG_FUNCTIONAL_IMPAIRMENT: &str = "functional_impairment";
pub const FLAG_CRITICAL_ITEM_ENDORSED: &str = "critical_item_endorsed";

/// Score a response list against an instrument and apply the critical-item
/// override.
///
/// Only responses whose question ID belongs to the instrument count toward
/// the total. A short list is scored as-is. An empty list is a caller bug.
pub fn score(
    def: &InstrumentDefinition,
    responses: &[RawResponse],
) -> Result<ScoredResult, InstrumentError> {
    let banded = score_bands(def, responses)?;
    Ok(apply_critical_override(def, responses, banded))
}

/// Band-only scoring: total, severity, risk and recommendations from the
/// threshold table, with no critical-item escalation.
pub fn score_bands(
    def: &InstrumentDefinition,
    responses: &[RawResponse],
) -> Result<ScoredResult, InstrumentError> {
    if responses.is_empty() {
        return Err(InstrumentError::EmptyResponses {
            instrument_id: def.id.clone(),
        });
    }

    let total: u32 = responses
        .iter()
        .filter(|r| def.item(&r.question_id).is_some())
        .map(|r| r.value)
        .sum();

    let band = def.band_for(total)?;

    let mut flags = BTreeMap::new();
    if let Some(label) = def.functional_impairment(total) {
        flags.insert(
            FLAG_FUNCTIONAL_IMPAIRMENT.to_string(),
            serde_json::Value::String(label.to_string()),
        );
    }
    if def.critical_item.is_some() {
        flags.insert(
            FLAG_CRITICAL_ITEM_ENDORSED.to_string(),
            serde_json::Value::Bool(critical_item_endorsed(def, responses)),
        );
    }

    Ok(ScoredResult {
        instrument_id: def.id.clone(),
        score: total,
        severity: band.severity,
        risk: band.risk,
        interpretation: band.interpretation.clone(),
        recommendations: band.recommendations.clone(),
        critical_override: false,
        instrument_flags: flags,
    })
}

/// Escalate a banded result when the critical item has a nonzero answer:
/// risk goes to the top band and the urgent safety message is prepended.
/// Severity and interpretation stay score-derived.
pub fn apply_critical_override(
    def: &InstrumentDefinition,
    responses: &[RawResponse],
    mut result: ScoredResult,
) -> ScoredResult {
    let Some(critical) = &def.critical_item else {
        return result;
    };
    if result.critical_override || !critical_item_endorsed(def, responses) {
        return result;
    }

    debug!(
        instrument = %def.id,
        score = result.score,
        banded_risk = %result.risk,
        "critical item endorsed, escalating risk"
    );

    result.risk = RiskBand::MAX;
    result.recommendations.insert(0, critical.message.clone());
    result.critical_override = true;
    result
}

/// True when the instrument has a critical item and any response to it is
/// nonzero.
pub fn critical_item_endorsed(def: &InstrumentDefinition, responses: &[RawResponse]) -> bool {
    def.critical_item.as_ref().is_some_and(|critical| {
        responses
            .iter()
            .any(|r| r.question_id == critical.item_id && r.value > 0)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruments::phq9;
    use mindscreen_core::models::scored::Severity;

    fn responses(values: &[u32]) -> Vec<RawResponse> {
        values
            .iter()
            .enumerate()
            .map(|(i, &value)| RawResponse {
                question_id: format!("phq9_{}", i + 1),
                value,
                question: format!("Question {}", i + 1),
                label: value.to_string(),
                timestamp: jiff::Timestamp::UNIX_EPOCH,
            })
            .collect()
    }

    #[test]
    fn empty_responses_fail_loudly() {
        let err = score(phq9::definition(), &[]).unwrap_err();
        assert!(matches!(err, InstrumentError::EmptyResponses { .. }));
    }

    #[test]
    fn short_list_sums_what_is_present() {
        let result = score(phq9::definition(), &responses(&[3, 3])).unwrap();
        assert_eq!(result.score, 6);
        assert_eq!(result.severity, Severity::Mild);
    }

    #[test]
    fn foreign_question_ids_do_not_count() {
        let mut list = responses(&[1, 1]);
        list.push(RawResponse {
            question_id: "gad7_1".into(),
            value: 3,
            question: "Other".into(),
            label: "3".into(),
            timestamp: jiff::Timestamp::UNIX_EPOCH,
        });
        assert_eq!(score(phq9::definition(), &list).unwrap().score, 2);
    }

    #[test]
    fn override_is_separate_from_banding() {
        let def = phq9::definition();
        let list = responses(&[0, 0, 0, 0, 0, 0, 0, 0, 1]);

        let banded = score_bands(def, &list).unwrap();
        assert_eq!(banded.risk, RiskBand::Low);
        assert!(!banded.critical_override);

        let escalated = apply_critical_override(def, &list, banded.clone());
        assert_eq!(escalated.risk, RiskBand::MAX);
        assert_eq!(escalated.severity, banded.severity);
        assert_eq!(escalated.recommendations[0], phq9::URGENT_SAFETY_MESSAGE);
        assert_eq!(
            escalated.recommendations.len(),
            banded.recommendations.len() + 1
        );
    }

    #[test]
    fn override_is_idempotent() {
        let def = phq9::definition();
        let list = responses(&[0, 0, 0, 0, 0, 0, 0, 0, 2]);
        let once = score(def, &list).unwrap();
        let twice = apply_critical_override(def, &list, once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn flags_record_impairment_and_critical_item() {
        let result = score(phq9::definition(), &responses(&[2, 2, 2, 2, 2, 0, 0, 0, 0])).unwrap();
        assert_eq!(
            result.instrument_flags[FLAG_FUNCTIONAL_IMPAIRMENT],
            serde_json::json!("Moderate")
        );
        assert_eq!(
            result.instrument_flags[FLAG_CRITICAL_ITEM_ENDORSED],
            serde_json::json!(false)
        );
    }
}
