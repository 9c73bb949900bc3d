//! Model response normalization.
//!
//! Models answer with the requested field set under varying names
//! (camelCase, snake_case, synonyms), sometimes wrapped in a Markdown fence
//! or surrounded by prose. Normalization locates the JSON object, probes an
//! ordered alias list per field, and defaults anything missing. It only
//! fails when no JSON object can be found at all.

use std::collections::BTreeMap;

use mindscreen_core::models::insights::{
    AiInsights, Goal, Practice, Provenance, RecommendedInterventions, SupportResource, Tip,
    UrgencyLevel,
};
use serde_json::{Map, Value};

use crate::analysis::RawAnalysis;
use crate::error::InferenceError;

type Object = Map<String, Value>;

const INTERPRETATION: &[&str] = &[
    "interpretation",
    "personalizedInterpretation",
    "message_of_hope",
    "messageOfHope",
    "summary",
    "analysis_summary",
];
const PERSONALIZED_SUMMARY: &[&str] = &["personalizedSummary", "personalized_summary"];
const PERSONALIZED_MESSAGE: &[&str] = &["personalizedMessage", "personalized_message"];
const KEY_INSIGHTS: &[&str] = &["keyInsights", "key_insights", "insights"];
const RECOMMENDATIONS: &[&str] = &[
    "personalizedRecommendations",
    "recommendations",
    "suggested_actions",
    "advice",
    "personal_recommendations",
    "specificRecommendations",
    "concreteNextSteps",
];
const RISK_FACTORS: &[&str] = &[
    "riskFactors",
    "risk_factors",
    "concerns",
    "warning_signs",
    "areas_of_concern",
    "identifiedRiskFactors",
];
const POSITIVE_FACTORS: &[&str] = &[
    "positiveFactors",
    "positive_factors",
    "strengths",
    "protective_factors",
    "positive_aspects",
];
const INTERVENTION_MESSAGE: &[&str] = &[
    "immediateInterventionMessage",
    "immediate_intervention_message",
    "crisisMessage",
    "urgentMessage",
];
const NEXT_STEPS: &[&str] = &[
    "nextSteps",
    "next_steps",
    "immediate_actions",
    "action_items",
    "recommended_steps",
    "concreteNextSteps",
];
const INTERVENTIONS: &[&str] = &["recommendedInterventions", "recommended_interventions"];
const LIFESTYLE: &[&str] = &["lifestyleRecommendations", "lifestyle_recommendations"];
const PROFESSIONAL_REFERRAL: &[&str] = &[
    "professionalReferral",
    "professional_referral",
    "seek_professional_help",
];
const URGENCY: &[&str] = &["urgencyLevel", "urgency_level", "urgency", "priority"];
const SUPPORT_RESOURCES: &[&str] = &[
    "supportResources",
    "support_resources",
    "resources",
    "help_resources",
];
const FOLLOW_UP: &[&str] = &[
    "followUpSuggestions",
    "follow_up_suggestions",
    "followup",
    "future_steps",
    "follow_up",
];
const TIPS: &[&str] = &["personalizedTips", "personalized_tips", "tips"];
const GOALS: &[&str] = &["personalizedGoals", "personalized_goals", "goals"];
const PRACTICES: &[&str] = &["dailyPractices", "daily_practices", "practices"];
const WARNING_SIGNS: &[&str] = &[
    "warningSignsToWatch",
    "warning_signs_to_watch",
    "warning_signs",
];
const ENCOURAGEMENT: &[&str] = &["personalizedEncouragement", "personalized_encouragement"];

/// Parse raw model text into insights carrying `provenance`.
pub fn normalize(raw: &str, provenance: Provenance) -> Result<AiInsights, InferenceError> {
    Ok(parse_analysis(raw)?.into_insights(provenance))
}

/// Locate the JSON object in `raw` and resolve every field through its
/// alias list.
pub fn parse_analysis(raw: &str) -> Result<RawAnalysis, InferenceError> {
    let root = locate_object(raw).ok_or(InferenceError::UnparsableResponse)?;
    let data = match root.get("analysis") {
        Some(Value::Object(nested)) => nested,
        _ => &root,
    };
    Ok(extract(data))
}

fn extract(data: &Object) -> RawAnalysis {
    RawAnalysis {
        interpretation: first_string(data, INTERPRETATION).unwrap_or_default(),
        personalized_summary: first_string(data, PERSONALIZED_SUMMARY),
        personalized_message: first_string(data, PERSONALIZED_MESSAGE),
        key_insights: first_string_array(data, KEY_INSIGHTS),
        recommendations: first_string_array(data, RECOMMENDATIONS),
        risk_factors: first_string_array(data, RISK_FACTORS),
        positive_factors: first_string_array(data, POSITIVE_FACTORS),
        immediate_intervention_message: first_string(data, INTERVENTION_MESSAGE),
        next_steps: first_string_array(data, NEXT_STEPS),
        interventions: first_object(data, INTERVENTIONS).map(interventions),
        lifestyle: first_object(data, LIFESTYLE).map(lifestyle),
        professional_referral: professional_referral(data),
        urgency: urgency_level(data),
        support_resources: support_resources(data),
        follow_up_suggestions: first_string_array(data, FOLLOW_UP),
        tips: first_object_array(data, TIPS).map(tip).collect(),
        goals: first_object_array(data, GOALS).map(goal).collect(),
        practices: first_object_array(data, PRACTICES).map(practice).collect(),
        warning_signs: first_string_array(data, WARNING_SIGNS),
        encouragement: first_string(data, ENCOURAGEMENT),
    }
}

// ── JSON location ────────────────────────────────────────────────────────────

/// Find the first JSON object in `raw`: inside a fenced block when there is
/// one, otherwise anywhere in the text.
pub fn locate_object(raw: &str) -> Option<Object> {
    let first_object = |text: &str| {
        balanced_objects(text).find_map(|span| match serde_json::from_str(span) {
            Ok(Value::Object(obj)) => Some(obj),
            _ => None,
        })
    };
    strip_fence(raw)
        .and_then(first_object)
        .or_else(|| first_object(raw))
}

/// Contents of the first ```...``` block, minus an optional language tag.
fn strip_fence(raw: &str) -> Option<&str> {
    let start = raw.find("```")?;
    let after = &raw[start + 3..];
    let body_start = after
        .find('\n')
        .filter(|&nl| after[..nl].trim().chars().all(|c| c.is_ascii_alphanumeric()))
        .map_or(0, |nl| nl + 1);
    let body = &after[body_start..];
    let end = body.find("```")?;
    Some(&body[..end])
}

/// Every top-level balanced `{...}` span, left to right. Scanning resumes
/// after a span's closing brace, so objects nested inside a candidate are
/// never candidates themselves. Braces inside JSON strings are ignored.
fn balanced_objects(text: &str) -> impl Iterator<Item = &str> {
    let mut cursor = 0;
    std::iter::from_fn(move || {
        while let Some(offset) = text[cursor..].find('{') {
            let start = cursor + offset;
            match balanced_end(&text[start..]) {
                Some(len) => {
                    cursor = start + len;
                    return Some(&text[start..cursor]);
                }
                None => cursor = start + 1,
            }
        }
        None
    })
}

fn balanced_end(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (i, c) in text.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            _ => {}
        }
    }
    None
}

// ── Alias probing ────────────────────────────────────────────────────────────

fn clean(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn first_string(data: &Object, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|k| data.get(*k).and_then(Value::as_str).and_then(clean))
}

/// The first key holding an array wins, even if it filters down to empty.
fn first_string_array(data: &Object, keys: &[&str]) -> Vec<String> {
    keys.iter()
        .find_map(|k| data.get(*k).and_then(Value::as_array))
        .map(|items| string_items(items))
        .unwrap_or_default()
}

fn string_items(items: &[Value]) -> Vec<String> {
    items
        .iter()
        .filter_map(|v| v.as_str().and_then(clean))
        .collect()
}

fn first_object<'a>(data: &'a Object, keys: &[&str]) -> Option<&'a Object> {
    keys.iter().find_map(|k| data.get(*k).and_then(Value::as_object))
}

fn first_object_array<'a>(data: &'a Object, keys: &[&str]) -> impl Iterator<Item = &'a Object> {
    keys.iter()
        .find_map(|k| data.get(*k).and_then(Value::as_array))
        .into_iter()
        .flatten()
        .filter_map(Value::as_object)
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => {
            let s = s.trim().to_lowercase();
            !s.is_empty() && s != "false" && s != "no"
        }
        Value::Array(_) => true,
        Value::Object(obj) => obj.get("recommended").is_none_or(truthy),
    }
}

fn professional_referral(data: &Object) -> bool {
    PROFESSIONAL_REFERRAL
        .iter()
        .filter_map(|k| data.get(*k))
        .any(truthy)
}

/// Map free-text urgency onto the closed enum. Checks the urgency aliases,
/// then `professional_referral.urgency`, and defaults to medium.
pub fn urgency_level(data: &Object) -> UrgencyLevel {
    for key in URGENCY {
        let Some(value) = data.get(*key).and_then(Value::as_str) else {
            continue;
        };
        let value = value.trim().to_lowercase();
        let level = match value.as_str() {
            "low" => Some(UrgencyLevel::Low),
            "medium" => Some(UrgencyLevel::Medium),
            "high" => Some(UrgencyLevel::High),
            "critical" => Some(UrgencyLevel::Critical),
            v if v.contains("immediate") || v.contains("urgent") => Some(UrgencyLevel::Critical),
            v if v.contains("high") => Some(UrgencyLevel::High),
            v if v.contains("low") => Some(UrgencyLevel::Low),
            _ => None,
        };
        if let Some(level) = level {
            return level;
        }
    }

    let referral_urgency = data
        .get("professional_referral")
        .and_then(Value::as_object)
        .and_then(|r| r.get("urgency"))
        .and_then(Value::as_str)
        .map(str::to_lowercase);
    if let Some(urgency) = referral_urgency {
        if urgency.contains("immediate") {
            return UrgencyLevel::Critical;
        }
        if urgency.contains("urgent") || urgency.contains("high") {
            return UrgencyLevel::High;
        }
        if urgency.contains("low") {
            return UrgencyLevel::Low;
        }
    }

    UrgencyLevel::Medium
}

fn support_resources(data: &Object) -> Vec<SupportResource> {
    let Some(items) = SUPPORT_RESOURCES
        .iter()
        .find_map(|k| data.get(*k).and_then(Value::as_array))
    else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| match item {
            Value::String(s) => clean(s).map(|s| SupportResource {
                kind: "Support".to_string(),
                resource: s.clone(),
                description: s,
            }),
            Value::Object(obj) => Some(SupportResource {
                kind: first_string(obj, &["type", "category"]).unwrap_or_else(|| "Support".into()),
                resource: first_string(obj, &["resource", "name", "title"])
                    .unwrap_or_else(|| "Resource".into()),
                description: first_string(obj, &["description", "contact", "url", "info"])
                    .unwrap_or_else(|| "Support resource available".into()),
            }),
            _ => None,
        })
        .collect()
}

fn interventions(obj: &Object) -> RecommendedInterventions {
    RecommendedInterventions {
        immediate: first_string_array(obj, &["immediate"]),
        short_term: first_string_array(obj, &["shortTerm", "short_term"]),
        long_term: first_string_array(obj, &["longTerm", "long_term"]),
    }
}

fn lifestyle(obj: &Object) -> BTreeMap<String, Vec<String>> {
    obj.iter()
        .filter_map(|(category, v)| {
            let items = string_items(v.as_array()?);
            (!items.is_empty()).then(|| (category.clone(), items))
        })
        .collect()
}

fn tip(obj: &Object) -> Tip {
    Tip {
        category: first_string(obj, &["category"]).unwrap_or_else(|| "Wellness".into()),
        title: first_string(obj, &["title"]).unwrap_or_else(|| "Personalized Tip".into()),
        description: first_string(obj, &["description"]).unwrap_or_default(),
        action_steps: first_string_array(obj, &["actionSteps", "action_steps"]),
        personalized_note: first_string(obj, &["personalizedNote", "personalized_note"]),
    }
}

fn goal(obj: &Object) -> Goal {
    let how = first_string_array(obj, &["how"]);
    let success_metrics = first_string_array(obj, &["successMetrics", "success_metrics"]);
    let measurable = if success_metrics.is_empty() {
        "Track progress regularly".to_string()
    } else {
        success_metrics.join(", ")
    };
    Goal {
        goal: first_string(obj, &["goal"]).unwrap_or_else(|| "Personal Goal".into()),
        why: first_string(obj, &["why", "reason"]),
        steps: how.clone(),
        how,
        timeframe: first_string(obj, &["timeframe", "timeline"])
            .unwrap_or_else(|| "2-4 weeks".into()),
        measurable,
        success_metrics,
    }
}

fn practice(obj: &Object) -> Practice {
    Practice {
        name: first_string(obj, &["name"]).unwrap_or_else(|| "Daily Practice".into()),
        description: first_string(obj, &["description"]).unwrap_or_default(),
        frequency: first_string(obj, &["frequency"]).unwrap_or_else(|| "Daily".into()),
        personalized_tip: first_string(obj, &["personalizedTip", "personalized_tip"])
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fenced_json_is_unwrapped() {
        let raw = "Here you go:\n```json\n{\"interpretation\": \"ok {fine}\"}\n```\nThanks";
        let analysis = parse_analysis(raw).unwrap();
        assert_eq!(analysis.interpretation, "ok {fine}");
    }

    #[test]
    fn object_found_inside_prose() {
        let raw = r#"Sure {not json}: {"summary": "brace } in string", "nested": {"a": 1}} end"#;
        let analysis = parse_analysis(raw).unwrap();
        assert_eq!(analysis.interpretation, "brace } in string");
    }

    #[test]
    fn malformed_outer_object_does_not_promote_a_nested_one() {
        let raw = r#"{"interpretation": "Severe symptoms, please reach out today.",
            "nextSteps": ["call 988"],
            "professional_referral": {"recommended": true, "urgency": "low"},}"#;
        assert!(matches!(
            parse_analysis(raw),
            Err(InferenceError::UnparsableResponse)
        ));

        let fenced = format!("Here it is:\n```json\n{raw}\n```");
        assert!(matches!(
            parse_analysis(&fenced),
            Err(InferenceError::UnparsableResponse)
        ));
    }

    #[test]
    fn later_top_level_object_is_still_found() {
        let raw = r#"Draft: {"a": 1,} Final: {"interpretation": "second", "extra": {"x": 2}}"#;
        assert_eq!(parse_analysis(raw).unwrap().interpretation, "second");
    }

    #[test]
    fn no_object_is_unparsable() {
        assert!(matches!(
            parse_analysis("I cannot help with that."),
            Err(InferenceError::UnparsableResponse)
        ));
        assert!(matches!(
            parse_analysis("[1, 2, 3]"),
            Err(InferenceError::UnparsableResponse)
        ));
    }

    #[test]
    fn aliases_resolve_in_order() {
        let raw = r#"{
            "summary": "later alias",
            "interpretation": "first alias",
            "risk_factors": ["poor sleep", "", 3, "  isolation "],
            "strengths": ["curious"],
            "next_steps": ["call", "walk"],
            "crisisMessage": "Call 988 now"
        }"#;
        let a = parse_analysis(raw).unwrap();
        assert_eq!(a.interpretation, "first alias");
        assert_eq!(a.risk_factors, vec!["poor sleep", "isolation"]);
        assert_eq!(a.positive_factors, vec!["curious"]);
        assert_eq!(a.next_steps, vec!["call", "walk"]);
        assert_eq!(a.immediate_intervention_message.as_deref(), Some("Call 988 now"));
    }

    #[test]
    fn nested_analysis_object_is_used() {
        let a = parse_analysis(r#"{"analysis": {"interpretation": "inner"}}"#).unwrap();
        assert_eq!(a.interpretation, "inner");
    }

    #[test]
    fn urgency_synonyms() {
        let level = |json: &str| {
            let Value::Object(obj) = serde_json::from_str::<Value>(json).unwrap() else {
                panic!("not an object");
            };
            urgency_level(&obj)
        };
        assert_eq!(level(r#"{"urgencyLevel": "HIGH"}"#), UrgencyLevel::High);
        assert_eq!(level(r#"{"urgency": "Immediate attention"}"#), UrgencyLevel::Critical);
        assert_eq!(level(r#"{"priority": "urgent"}"#), UrgencyLevel::Critical);
        assert_eq!(level(r#"{"urgency_level": "fairly low"}"#), UrgencyLevel::Low);
        assert_eq!(
            level(r#"{"professional_referral": {"recommended": true, "urgency": "high"}}"#),
            UrgencyLevel::High
        );
        assert_eq!(level(r#"{"urgency": "unclear"}"#), UrgencyLevel::Medium);
        assert_eq!(level("{}"), UrgencyLevel::Medium);
    }

    #[test]
    fn professional_referral_shapes() {
        let referral = |json: &str| parse_analysis(json).unwrap().professional_referral;
        assert!(referral(r#"{"professionalReferral": true}"#));
        assert!(referral(r#"{"professional_referral": {"recommended": true}}"#));
        assert!(!referral(r#"{"professional_referral": {"recommended": false}}"#));
        assert!(referral(r#"{"seek_professional_help": "yes"}"#));
        assert!(!referral("{}"));
    }

    #[test]
    fn structured_lists_take_defaults() {
        let raw = r#"{
            "personalized_tips": [{"action_steps": ["breathe"]}, "stray"],
            "goals": [{"goal": "Walk daily", "reason": "energy", "how": ["10 min"], "timeline": "3 weeks"}, {}],
            "practices": [{"personalized_tip": "mornings"}],
            "resources": ["Local clinic", {"name": "988", "contact": "call or text"}]
        }"#;
        let a = parse_analysis(raw).unwrap();

        assert_eq!(a.tips.len(), 1);
        assert_eq!(a.tips[0].category, "Wellness");
        assert_eq!(a.tips[0].title, "Personalized Tip");
        assert_eq!(a.tips[0].action_steps, vec!["breathe"]);

        assert_eq!(a.goals[0].why.as_deref(), Some("energy"));
        assert_eq!(a.goals[0].steps, vec!["10 min"]);
        assert_eq!(a.goals[0].timeframe, "3 weeks");
        assert_eq!(a.goals[0].measurable, "Track progress regularly");
        assert_eq!(a.goals[1].goal, "Personal Goal");
        assert_eq!(a.goals[1].timeframe, "2-4 weeks");

        assert_eq!(a.practices[0].name, "Daily Practice");
        assert_eq!(a.practices[0].frequency, "Daily");
        assert_eq!(a.practices[0].personalized_tip, "mornings");

        assert_eq!(a.support_resources[0].kind, "Support");
        assert_eq!(a.support_resources[0].resource, "Local clinic");
        assert_eq!(a.support_resources[1].resource, "988");
        assert_eq!(a.support_resources[1].description, "call or text");
    }

    #[test]
    fn incomplete_payload_defaults_everything() {
        let a = parse_analysis("{}").unwrap();
        assert_eq!(a, RawAnalysis::default());
    }
}
