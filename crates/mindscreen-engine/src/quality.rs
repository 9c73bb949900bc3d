//! Completion time, confidence and data quality for one response list.
//!
//! The penalty weights are calibration constants carried over from the
//! screening flow in use; they are not validated clinical policy.

use std::collections::BTreeSet;

use mindscreen_core::models::assessment::DataQuality;
use mindscreen_core::models::response::RawResponse;
use mindscreen_instruments::InstrumentDefinition;

/// Average seconds per item below which answers count as rushed.
pub const MIN_SECONDS_PER_ITEM: f64 = 10.0;
pub const RUSHED_PENALTY: u8 = 20;
pub const MISSING_PENALTY: u8 = 30;
pub const STRAIGHT_LINE_PENALTY: u8 = 25;
/// At most this many distinct answer values counts as straight-lining.
pub const STRAIGHT_LINE_MAX_DISTINCT: usize = 2;

/// Seconds between the first and last response, rounded. Out-of-order
/// timestamps yield zero.
pub fn completion_time_seconds(responses: &[RawResponse]) -> u64 {
    let (Some(first), Some(last)) = (responses.first(), responses.last()) else {
        return 0;
    };
    let millis = last
        .timestamp
        .as_millisecond()
        .saturating_sub(first.timestamp.as_millisecond());
    if millis <= 0 {
        0
    } else {
        ((millis as f64) / 1000.0).round() as u64
    }
}

/// True when some instrument item has no response.
pub fn has_missing_items(def: &InstrumentDefinition, responses: &[RawResponse]) -> bool {
    def.items
        .iter()
        .any(|item| !responses.iter().any(|r| r.question_id == item.id))
}

pub fn confidence_score(def: &InstrumentDefinition, responses: &[RawResponse]) -> u8 {
    if responses.is_empty() {
        return 0;
    }
    let mut confidence: i32 = 100;

    let per_item = completion_time_seconds(responses) as f64 / responses.len() as f64;
    if per_item < MIN_SECONDS_PER_ITEM {
        confidence -= i32::from(RUSHED_PENALTY);
    }

    if has_missing_items(def, responses) {
        confidence -= i32::from(MISSING_PENALTY);
    }

    let distinct: BTreeSet<u32> = responses.iter().map(|r| r.value).collect();
    if distinct.len() <= STRAIGHT_LINE_MAX_DISTINCT {
        confidence -= i32::from(STRAIGHT_LINE_PENALTY);
    }

    confidence.clamp(0, 100) as u8
}

pub fn data_quality(confidence: u8) -> DataQuality {
    DataQuality::from_confidence(confidence)
}
