//! PHQ-9 scoring across band boundaries and the critical-item override.

use mindscreen_core::models::response::RawResponse;
use mindscreen_core::models::scored::{RiskBand, Severity};
use mindscreen_instruments::categorize::assess_risk;
use mindscreen_instruments::get_instrument;
use mindscreen_instruments::instruments::phq9;
use mindscreen_instruments::scoring::score;

/// Nine responses whose values sum to `total`, filled from item 1 with the
/// critical item (item 9) pinned to `critical`.
fn responses_summing_to(total: u32, critical: u32) -> Vec<RawResponse> {
    let mut remaining = total - critical;
    let mut values = [0u32; 9];
    values[8] = critical;
    for v in values.iter_mut().take(8) {
        let take = remaining.min(3);
        *v = take;
        remaining -= take;
    }
    assert_eq!(remaining, 0, "total {total} not reachable with item 9 = {critical}");

    values
        .iter()
        .enumerate()
        .map(|(i, &value)| RawResponse {
            question_id: format!("phq9_{}", i + 1),
            value,
            question: format!("Item {}", i + 1),
            label: value.to_string(),
            timestamp: jiff::Timestamp::UNIX_EPOCH,
        })
        .collect()
}

#[test]
fn band_boundaries() {
    let def = phq9::definition();
    let cases = [
        (0, Severity::Minimal, RiskBand::Low),
        (4, Severity::Minimal, RiskBand::Low),
        (5, Severity::Mild, RiskBand::Mild),
        (9, Severity::Mild, RiskBand::Mild),
        (10, Severity::Moderate, RiskBand::Moderate),
        (14, Severity::Moderate, RiskBand::Moderate),
        (15, Severity::ModeratelySevere, RiskBand::ModeratelySevere),
        (19, Severity::ModeratelySevere, RiskBand::ModeratelySevere),
        (20, Severity::Severe, RiskBand::Severe),
        (24, Severity::Severe, RiskBand::Severe),
    ];

    for (total, severity, risk) in cases {
        let result = score(def, &responses_summing_to(total, 0)).unwrap();
        assert_eq!(result.score, total);
        assert_eq!(result.severity, severity, "severity at {total}");
        assert_eq!(result.risk, risk, "risk at {total}");
        assert!(!result.critical_override);
    }
}

#[test]
fn maximum_score_is_severe() {
    let result = score(phq9::definition(), &responses_summing_to(27, 3)).unwrap();
    assert_eq!(result.score, 27);
    assert_eq!(result.severity, Severity::Severe);
}

#[test]
fn scoring_is_deterministic() {
    let def = phq9::definition();
    let list = responses_summing_to(13, 1);
    let a = serde_json::to_string(&score(def, &list).unwrap()).unwrap();
    let b = serde_json::to_string(&score(def, &list).unwrap()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn severe_score_without_critical_item() {
    let def = get_instrument("phq9").unwrap();
    let list = responses_summing_to(22, 0);
    let result = score(def, &list).unwrap();
    let risk = assess_risk(def, &result, &list);

    assert_eq!(result.severity.label(), "Severe");
    assert_eq!(result.risk.as_str(), "severe");
    assert!(risk.immediate_intervention);
    assert_eq!(
        result.recommendations[0],
        "Schedule appointment with mental health professional immediately"
    );
    assert!(!result.critical_override);
}

#[test]
fn critical_item_overrides_minimal_score() {
    let def = get_instrument("phq9").unwrap();
    let list = responses_summing_to(3, 2);
    let result = score(def, &list).unwrap();
    let risk = assess_risk(def, &result, &list);

    assert_eq!(result.severity, Severity::Minimal);
    assert_eq!(result.risk, RiskBand::MAX);
    assert_eq!(result.recommendations[0], phq9::URGENT_SAFETY_MESSAGE);
    assert!(result.critical_override);
    assert!(risk.immediate_intervention);
    assert!(risk.risk_factors.contains(&"Suicidal ideation present".to_string()));
}

#[test]
fn out_of_range_values_are_reported() {
    let def = phq9::definition();
    let mut list = responses_summing_to(4, 0);
    list[0].value = 5;
    let errors = def.validate_responses(&list);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].question_id, "phq9_1");
}
