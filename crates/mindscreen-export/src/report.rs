//! Markdown report for one composite assessment result.

use mindscreen_core::models::assessment::CompositeAssessmentResult;
use mindscreen_core::models::education::EducationalContent;
use mindscreen_core::models::insights::Goal;
use mindscreen_core::models::resources::EmergencyResource;
use mindscreen_instruments::InstrumentDefinition;
use rand::Rng;
use rand::distributions::Alphanumeric;
use serde::Serialize;
use tracing::debug;

use crate::error::ExportError;
use crate::render::render_template;

const REPORT_TEMPLATE_NAME: &str = "report.md";
const REPORT_TEMPLATE: &str = include_str!("../templates/report.md.tera");

const RANDOM_SUFFIX_LEN: usize = 9;

/// A fresh report id: `REPORT_<unix millis>_<9 uppercase alphanumerics>`.
pub fn report_id() -> String {
    report_id_with(jiff::Timestamp::now(), &mut rand::thread_rng())
}

fn report_id_with(at: jiff::Timestamp, rng: &mut impl Rng) -> String {
    let suffix: String = rng
        .sample_iter(&Alphanumeric)
        .take(RANDOM_SUFFIX_LEN)
        .map(|b| char::from(b).to_ascii_uppercase())
        .collect();
    format!("REPORT_{}_{suffix}", at.as_millisecond())
}

#[derive(Debug, Serialize)]
struct ReportView<'a> {
    report_id: String,
    instrument_name: &'a str,
    assessment_date: String,
    score: u32,
    max_score: u32,
    severity: &'static str,
    risk: &'static str,
    interpretation: &'a str,
    recommendations: &'a [String],
    immediate_intervention: bool,
    intervention_message: Option<&'a str>,
    risk_factors: &'a [String],
    protective_factors: &'a [String],
    strengths: &'a [String],
    summary: &'a str,
    key_insights: &'a [String],
    immediate_steps: &'a [String],
    short_term_steps: &'a [String],
    long_term_steps: &'a [String],
    goals: &'a [Goal],
    tips: Vec<TipLine<'a>>,
    retake_in_weeks: u32,
    monitoring_frequency: &'a str,
    warning_signs: &'a [String],
    emergency_resources: &'a [EmergencyResource],
    providers: Vec<ProviderLine<'a>>,
    online_resources: Vec<OnlineLine<'a>>,
    education: &'a EducationalContent,
    insights_source: String,
    completion_minutes: u64,
    confidence_score: u8,
    data_quality: &'static str,
}

#[derive(Debug, Serialize)]
struct TipLine<'a> {
    title: &'a str,
    description: &'a str,
    timeframe: &'a str,
}

#[derive(Debug, Serialize)]
struct ProviderLine<'a> {
    name: &'a str,
    address: &'a str,
    phone: &'a str,
    specialties: String,
}

#[derive(Debug, Serialize)]
struct OnlineLine<'a> {
    title: &'a str,
    url: &'a str,
    kind: &'static str,
    cost: Option<&'static str>,
    description: &'a str,
}

fn insights_source(result: &CompositeAssessmentResult) -> String {
    let provenance = &result.insights.provenance;
    if provenance.is_real_ai {
        format!("AI analysis ({})", provenance.model)
    } else {
        match &provenance.degradation_cause {
            Some(cause) => format!("Standard guidance (AI analysis {cause})"),
            None => "Standard guidance".to_string(),
        }
    }
}

fn view<'a>(
    result: &'a CompositeAssessmentResult,
    def: &'a InstrumentDefinition,
    report_id: String,
) -> ReportView<'a> {
    let insights = &result.insights;
    let interventions = &insights.recommended_interventions;
    ReportView {
        report_id,
        instrument_name: &def.name,
        assessment_date: result.assessment_date.strftime("%B %-d, %Y").to_string(),
        score: result.scored.score,
        max_score: def.items.iter().map(|i| i.range.max).sum(),
        severity: result.scored.severity.label(),
        risk: result.scored.risk.as_str(),
        interpretation: &result.scored.interpretation,
        recommendations: &result.scored.recommendations,
        immediate_intervention: result.risk_assessment.immediate_intervention,
        intervention_message: insights.immediate_intervention_message.as_deref(),
        risk_factors: &result.risk_assessment.risk_factors,
        protective_factors: &result.risk_assessment.protective_factors,
        strengths: &result.strengths,
        summary: &insights.personalized_summary,
        key_insights: &insights.key_insights,
        immediate_steps: &interventions.immediate,
        short_term_steps: &interventions.short_term,
        long_term_steps: &interventions.long_term,
        goals: &insights.personalized_goals,
        tips: result
            .actionable_tips
            .iter()
            .map(|t| TipLine {
                title: &t.title,
                description: &t.description,
                timeframe: &t.timeframe,
            })
            .collect(),
        retake_in_weeks: result.follow_up.retake_in_weeks,
        monitoring_frequency: &result.follow_up.monitoring_frequency,
        warning_signs: &result.follow_up.warning_signs_to_watch,
        emergency_resources: &result.professional_resources.emergency_resources,
        providers: result
            .professional_resources
            .local_providers
            .iter()
            .map(|p| ProviderLine {
                name: &p.name,
                address: &p.address,
                phone: &p.phone,
                specialties: p.specialties.join(", "),
            })
            .collect(),
        online_resources: result
            .professional_resources
            .online_resources
            .iter()
            .map(|r| OnlineLine {
                title: &r.title,
                url: &r.url,
                kind: r.kind.as_str(),
                cost: r.cost.map(|c| c.as_str()),
                description: &r.description,
            })
            .collect(),
        education: &result.educational_content,
        insights_source: insights_source(result),
        completion_minutes: result.completion_time_seconds.div_ceil(60),
        confidence_score: result.confidence_score,
        data_quality: result.data_quality.as_str(),
    }
}

/// Render the built-in Markdown report for `result`.
pub fn render_report(
    result: &CompositeAssessmentResult,
    def: &InstrumentDefinition,
) -> Result<String, ExportError> {
    let id = report_id();
    debug!(report_id = %id, assessment_id = %result.assessment_id, "rendering report");
    render_template(REPORT_TEMPLATE_NAME, REPORT_TEMPLATE, &view(result, def, id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn report_id_shape() {
        let at = jiff::Timestamp::from_millisecond(1_700_000_000_123).unwrap();
        let id = report_id_with(at, &mut StdRng::seed_from_u64(7));
        let (prefix, suffix) = id.rsplit_once('_').unwrap();
        assert_eq!(prefix, "REPORT_1700000000123");
        assert_eq!(suffix.len(), 9);
        assert!(suffix.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }

    #[test]
    fn live_report_ids_differ() {
        assert_ne!(report_id(), report_id());
    }
}
