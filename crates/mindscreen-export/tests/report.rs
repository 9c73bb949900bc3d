use mindscreen_core::models::response::RawResponse;
use mindscreen_core::models::user::UserContext;
use mindscreen_engine::AssessmentEngine;
use mindscreen_export::render_report;
use mindscreen_instruments::instruments::phq9;

fn responses(values: [u32; 9]) -> Vec<RawResponse> {
    values
        .iter()
        .enumerate()
        .map(|(i, &value)| RawResponse {
            question_id: format!("phq9_{}", i + 1),
            value,
            question: format!("Question {}", i + 1),
            label: value.to_string(),
            timestamp: jiff::Timestamp::from_second(1_700_000_000 + i as i64 * 30).unwrap(),
        })
        .collect()
}

#[tokio::test]
async fn severe_report_leads_with_safety_notice() {
    let engine = AssessmentEngine::new(phq9::definition());
    let ctx = UserContext {
        country: Some("United States".into()),
        city: Some("Denver".into()),
        ..Default::default()
    };
    let result = engine
        .process_assessment(&responses([2, 1, 1, 1, 1, 1, 1, 1, 1]), &ctx)
        .await
        .unwrap();

    let report = render_report(&result, phq9::definition()).unwrap();

    assert!(report.starts_with("# PHQ-9 Screening Report"));
    assert!(report.contains("Report ID: REPORT_"));
    assert!(report.contains("Score: **10 / 27**"));
    assert!(report.contains("**Immediate attention recommended.**"));
    assert!(report.contains(phq9::URGENT_SAFETY_MESSAGE));
    assert!(report.contains("988 Suicide & Crisis Lifeline"));
    assert!(report.contains("Mental Health Services - Denver"));
    assert!(report.contains("Standard guidance (AI analysis disabled by configuration)"));
    assert!(report.contains("### Online resources"));
    assert!(report.contains("[Headspace Meditation](https://www.headspace.com), app, freemium."));
    assert!(report.contains("## Learn more"));
    assert!(report.contains("[Cognitive Behavioral Therapy for Depression]("));
    assert!(report.contains("Healthline (8 min read)"));
    assert!(report.contains("**Social Connection**"));
}

#[tokio::test]
async fn minimal_report_has_no_safety_notice() {
    let engine = AssessmentEngine::new(phq9::definition());
    let result = engine
        .process_assessment(&responses([0, 1, 0, 1, 0, 0, 1, 0, 0]), &UserContext::default())
        .await
        .unwrap();

    let report = render_report(&result, phq9::definition()).unwrap();

    assert!(report.contains("Severity: **Minimal**"));
    assert!(!report.contains("Immediate attention"));
    assert!(report.contains("Retake this screening in 4 weeks"));
    assert!(report.contains("Local Emergency Services"));
}
