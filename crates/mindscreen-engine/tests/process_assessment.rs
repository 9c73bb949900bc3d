use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use mindscreen_core::models::assessment::DataQuality;
use mindscreen_core::models::insights::{ResponseSource, UrgencyLevel};
use mindscreen_core::models::resources::ResourceSource;
use mindscreen_core::models::response::RawResponse;
use mindscreen_core::models::scored::{RiskBand, Severity};
use mindscreen_core::models::user::UserContext;
use mindscreen_engine::{AssessmentEngine, EngineError, EngineSettings};
use mindscreen_inference::chat::{ChatRequest, ModelProfile};
use mindscreen_inference::error::{AttemptError, AttemptFailure};
use mindscreen_inference::location::LocationService;
use mindscreen_inference::{ChatTransport, Credential, ResilientClient};
use mindscreen_instruments::instruments::phq9;

struct RateLimited {
    calls: AtomicUsize,
}

#[async_trait]
impl ChatTransport for RateLimited {
    async fn complete(
        &self,
        _credential: &Credential,
        _request: &ChatRequest,
    ) -> Result<String, AttemptError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(AttemptError::from_status(429, "rate limit exceeded"))
    }
}

/// Succeeds with `text` on the named model only.
struct OnlyModel {
    model: &'static str,
    text: &'static str,
}

#[async_trait]
impl ChatTransport for OnlyModel {
    async fn complete(
        &self,
        _credential: &Credential,
        request: &ChatRequest,
    ) -> Result<String, AttemptError> {
        if request.model == self.model {
            Ok(self.text.to_string())
        } else {
            Err(AttemptError::new(AttemptFailure::Status(503), "unavailable"))
        }
    }
}

fn credentials(n: usize) -> Vec<Credential> {
    (0..n)
        .filter_map(|i| Credential::parse(&format!("credential-{i}-0123456789")))
        .collect()
}

fn models(m: usize) -> Vec<ModelProfile> {
    (0..m)
        .map(|i| ModelProfile::new(format!("model-{i}"), 0.7, 0.9, 512))
        .collect()
}

/// Nine PHQ-9 answers, 20 seconds apart.
fn responses(values: [u32; 9]) -> Vec<RawResponse> {
    values
        .iter()
        .enumerate()
        .map(|(i, &value)| RawResponse {
            question_id: format!("phq9_{}", i + 1),
            value,
            question: format!("Question {}", i + 1),
            label: value.to_string(),
            timestamp: jiff::Timestamp::from_second(1_700_000_000 + i as i64 * 20).unwrap(),
        })
        .collect()
}

fn pakistan() -> UserContext {
    UserContext {
        age: Some(23),
        country: Some("Pakistan".into()),
        city: Some("Chitral".into()),
        ..Default::default()
    }
}

#[tokio::test]
async fn exhausted_providers_fall_back_after_every_pair() {
    let transport = Arc::new(RateLimited {
        calls: AtomicUsize::new(0),
    });
    let client = ResilientClient::new(transport.clone(), credentials(3), models(2));
    let engine = AssessmentEngine::new(phq9::definition()).with_analysis(client);

    let result = engine
        .process_assessment(&responses([1, 2, 1, 2, 1, 0, 1, 0, 0]), &pakistan())
        .await
        .unwrap();

    assert_eq!(transport.calls.load(Ordering::SeqCst), 6);
    assert!(!result.insights.provenance.is_real_ai);
    assert_eq!(
        result.insights.provenance.response_source,
        ResponseSource::RateLimitedFallback
    );
    assert_eq!(result.scored.severity, Severity::Mild);
    assert_eq!(result.confidence_score, 100);
    assert_eq!(result.data_quality, DataQuality::High);
    assert!(!result.insights.personalized_summary.is_empty());
}

#[tokio::test]
async fn live_answer_is_normalized_with_provenance() {
    let transport = Arc::new(OnlyModel {
        model: "model-1",
        text: r#"Sure! ```json
{"interpretation": "Mild symptoms, mostly sleep related.",
 "key_insights": ["Sleep is affected"],
 "recommendations": ["Keep a regular sleep schedule"],
 "urgency_level": "low"}
```"#,
    });
    let client = ResilientClient::new(transport, credentials(2), models(2));
    let engine = AssessmentEngine::new(phq9::definition()).with_analysis(client);

    let result = engine
        .process_assessment(&responses([1, 2, 1, 2, 1, 0, 1, 0, 0]), &UserContext::default())
        .await
        .unwrap();

    let provenance = &result.insights.provenance;
    assert!(provenance.is_real_ai);
    assert_eq!(provenance.model, "model-1");
    assert_eq!(provenance.response_source, ResponseSource::ChatCompletionApi);
    assert_eq!(result.insights.urgency_level, UrgencyLevel::Low);
    assert_eq!(result.insights.key_insights, vec!["Sleep is affected".to_string()]);
    assert!(result.insights.lifestyle_recommendations.contains_key("sleep"));
}

#[tokio::test]
async fn disabled_engine_uses_static_content_everywhere() {
    let engine = AssessmentEngine::new(phq9::definition());

    let result = engine
        .process_assessment(&responses([3, 3, 3, 3, 3, 2, 2, 3, 0]), &pakistan())
        .await
        .unwrap();

    assert_eq!(result.scored.score, 22);
    assert_eq!(result.scored.severity, Severity::Severe);
    assert!(result.risk_assessment.immediate_intervention);
    assert!(!result.scored.critical_override);
    assert_eq!(
        result.insights.provenance.response_source,
        ResponseSource::DisabledFallback
    );
    assert_eq!(
        result.insights.immediate_intervention_message.as_deref(),
        Some(phq9::URGENT_SAFETY_MESSAGE)
    );
    assert_eq!(result.professional_resources.source, ResourceSource::Fallback);
    assert_eq!(result.professional_resources.emergency_resources[0].phone, "1122");
    assert_eq!(
        result.professional_resources.online_resources,
        phq9::definition().online_resources
    );
    assert_eq!(result.educational_content, phq9::definition().education);
}

#[tokio::test]
async fn client_without_usable_keys_is_treated_as_disabled() {
    let transport = Arc::new(RateLimited {
        calls: AtomicUsize::new(0),
    });
    let keys: Vec<Credential> = Credential::parse_all(&["", "   "]);
    let client = ResilientClient::new(transport.clone(), keys, models(2));
    let engine = AssessmentEngine::new(phq9::definition()).with_analysis(client);

    let result = engine
        .process_assessment(&responses([1, 2, 1, 2, 1, 0, 1, 0, 0]), &UserContext::default())
        .await
        .unwrap();

    assert_eq!(transport.calls.load(Ordering::SeqCst), 0);
    assert_eq!(
        result.insights.provenance.response_source,
        ResponseSource::DisabledFallback
    );
}

#[tokio::test]
async fn critical_item_escalates_a_minimal_score() {
    let engine = AssessmentEngine::new(phq9::definition());

    let result = engine
        .process_assessment(&responses([1, 0, 0, 0, 0, 0, 0, 0, 2]), &UserContext::default())
        .await
        .unwrap();

    assert_eq!(result.scored.severity, Severity::Minimal);
    assert_eq!(result.scored.risk, RiskBand::Severe);
    assert_eq!(result.scored.recommendations[0], phq9::URGENT_SAFETY_MESSAGE);
    assert!(result.risk_assessment.immediate_intervention);
    assert!(result.insights.immediate_intervention_message.is_some());
}

#[tokio::test]
async fn location_failure_does_not_touch_clinical_insights() {
    let analysis = ResilientClient::new(
        Arc::new(OnlyModel {
            model: "model-0",
            text: r#"{"interpretation": "Moderate symptoms."}"#,
        }),
        credentials(1),
        models(1),
    );
    let location = LocationService::new(ResilientClient::new(
        Arc::new(RateLimited {
            calls: AtomicUsize::new(0),
        }),
        credentials(1),
        models(1),
    ));
    let engine = AssessmentEngine::new(phq9::definition())
        .with_analysis(analysis)
        .with_location(location);

    let result = engine
        .process_assessment(&responses([2, 2, 1, 2, 1, 1, 1, 1, 0]), &pakistan())
        .await
        .unwrap();

    assert!(result.insights.provenance.is_real_ai);
    assert_eq!(result.insights.personalized_summary, "Moderate symptoms.");
    assert_eq!(result.professional_resources.source, ResourceSource::Fallback);
    assert_eq!(
        result.professional_resources.local_providers[0].name,
        "Mental Health Services - Chitral"
    );
}

#[tokio::test]
async fn empty_response_list_is_a_contract_violation() {
    let engine = AssessmentEngine::new(phq9::definition());
    let err = engine
        .process_assessment(&[], &UserContext::default())
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Instrument(_)));
}

#[tokio::test]
async fn out_of_range_value_is_rejected() {
    let engine = AssessmentEngine::new(phq9::definition());
    let err = engine
        .process_assessment(&responses([4, 0, 0, 0, 0, 0, 0, 0, 0]), &UserContext::default())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("outside range"));
}

#[test]
fn settings_without_keys_build_an_offline_engine() {
    let settings = EngineSettings {
        geolocation_url: None,
        ..Default::default()
    };
    let engine = AssessmentEngine::from_settings(&settings, "phq9").unwrap();
    assert_eq!(engine.instrument().id, "phq9");

    let err = AssessmentEngine::from_settings(&settings, "gad7").unwrap_err();
    assert!(err.to_string().contains("unknown instrument"));
}
