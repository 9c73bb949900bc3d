//! End-to-end processing of one completed assessment.
//!
//! Scoring and risk assessment are deterministic and may only fail on a
//! contract violation. The AI insights and location resources each run
//! their own resilient pipeline; any failure there is replaced by the
//! matching static fallback before the result is assembled, so a caller
//! always receives a fully populated [`CompositeAssessmentResult`].

use std::sync::Arc;

use mindscreen_core::models::assessment::CompositeAssessmentResult;
use mindscreen_core::models::insights::{AiInsights, Provenance, ResponseSource};
use mindscreen_core::models::resources::ProfessionalResources;
use mindscreen_core::models::response::RawResponse;
use mindscreen_core::models::risk::RiskAssessment;
use mindscreen_core::models::scored::ScoredResult;
use mindscreen_core::models::user::{Location, UserContext};
use mindscreen_inference::geolocation::IpGeolocator;
use mindscreen_inference::location::{LocationService, ResourceScope, fallback_resources};
use mindscreen_inference::{
    DegradationReason, HttpTransport, ResilientClient, fallback, normalize, prompt,
};
use mindscreen_instruments::error::InstrumentError;
use mindscreen_instruments::{InstrumentDefinition, categorize, get_instrument, guidance, scoring};
use tracing::{error, info};
use uuid::Uuid;

use crate::config::EngineSettings;
use crate::error::EngineError;
use crate::quality;

#[derive(Debug, Clone)]
pub struct AssessmentEngine {
    instrument: &'static InstrumentDefinition,
    analysis: Option<ResilientClient>,
    location: Option<LocationService>,
    geolocator: Option<IpGeolocator>,
}

impl AssessmentEngine {
    /// An engine with no live pipelines: insights and resources come from
    /// the static fallbacks.
    pub fn new(instrument: &'static InstrumentDefinition) -> Self {
        Self {
            instrument,
            analysis: None,
            location: None,
            geolocator: None,
        }
    }

    pub fn with_analysis(mut self, client: ResilientClient) -> Self {
        self.analysis = Some(client);
        self
    }

    pub fn with_location(mut self, service: LocationService) -> Self {
        self.location = Some(service);
        self
    }

    pub fn with_geolocator(mut self, geolocator: IpGeolocator) -> Self {
        self.geolocator = Some(geolocator);
        self
    }

    /// Wire HTTP pipelines from settings. When AI is inactive no
    /// completion client is built at all.
    pub fn from_settings(
        settings: &EngineSettings,
        instrument_id: &str,
    ) -> Result<Self, EngineError> {
        let instrument = get_instrument(instrument_id)
            .ok_or_else(|| InstrumentError::UnknownInstrument(instrument_id.to_string()))?;
        instrument.validate_bands()?;

        let mut engine = Self::new(instrument);
        if settings.ai_active() {
            let transport = Arc::new(HttpTransport::new(
                settings.endpoint.clone(),
                settings.request_timeout(),
            )?);
            let client = ResilientClient::new(
                transport,
                settings.usable_credentials(),
                settings.models.clone(),
            );
            info!(
                models = client.models().len(),
                credentials = client.credential_count(),
                max_attempts = client.max_attempts(),
                "AI analysis enabled"
            );
            engine.location = Some(LocationService::new(
                client.with_models(vec![settings.location_model.clone()]),
            ));
            engine.analysis = Some(client);
        } else {
            info!("AI analysis inactive, static insights will be used");
        }

        if let Some(url) = &settings.geolocation_url {
            engine.geolocator = Some(IpGeolocator::new(
                url.clone(),
                settings.request_timeout(),
            )?);
        }
        Ok(engine)
    }

    pub fn instrument(&self) -> &'static InstrumentDefinition {
        self.instrument
    }

    /// Score, assess, enrich and assemble one assessment.
    ///
    /// Fails only for an empty or out-of-range response list.
    pub async fn process_assessment(
        &self,
        responses: &[RawResponse],
        ctx: &UserContext,
    ) -> Result<CompositeAssessmentResult, EngineError> {
        let def = self.instrument;
        if let Some(invalid) = def.validate_responses(responses).into_iter().next() {
            return Err(InstrumentError::from(invalid).into());
        }

        let scored = scoring::score(def, responses)?;
        let breakdown = categorize::categorize(def, responses);
        let risk_assessment = categorize::assess_risk(def, &scored, responses);
        info!(
            instrument = %def.id,
            score = scored.score,
            severity = %scored.severity,
            risk = %scored.risk,
            critical_override = scored.critical_override,
            "assessment scored"
        );

        let insights = match self.generate_insights(&scored, responses, ctx).await {
            Ok(insights) => insights,
            Err(reason) => {
                if reason == DegradationReason::Disabled {
                    info!("AI analysis disabled, using static insights");
                } else {
                    error!(cause = %reason, "AI analysis failed, using static insights");
                }
                fallback(scored.severity, scored.score, &reason)
            }
        };
        let insights = self.ensure_intervention_message(insights, &scored, &risk_assessment);

        let professional_resources = self.professional_resources(ctx).await;

        let confidence_score = quality::confidence_score(def, responses);
        let result = CompositeAssessmentResult {
            assessment_id: Uuid::new_v4(),
            instrument_id: def.id.clone(),
            assessment_date: jiff::Timestamp::now(),
            strengths: guidance::identify_strengths(def, &scored, responses),
            actionable_tips: guidance::actionable_tips(def, &scored, responses),
            follow_up: guidance::follow_up(def, &scored),
            scored,
            user_context: ctx.clone(),
            breakdown,
            risk_assessment,
            professional_resources,
            educational_content: def.education.clone(),
            insights,
            completion_time_seconds: quality::completion_time_seconds(responses),
            confidence_score,
            data_quality: quality::data_quality(confidence_score),
        };

        info!(
            assessment_id = %result.assessment_id,
            real_ai = result.insights.provenance.is_real_ai,
            source = result.insights.provenance.response_source.as_str(),
            confidence = result.confidence_score,
            "assessment processed"
        );
        Ok(result)
    }

    /// The AI sub-pipeline: build the request, complete it, normalize the
    /// answer. Every failure becomes a [`DegradationReason`].
    pub async fn generate_insights(
        &self,
        scored: &ScoredResult,
        responses: &[RawResponse],
        ctx: &UserContext,
    ) -> Result<AiInsights, DegradationReason> {
        let Some(client) = &self.analysis else {
            return Err(DegradationReason::Disabled);
        };

        let request = prompt::build_request(&self.instrument.name, scored, responses, ctx);
        let completion = client
            .complete(&request.messages())
            .await
            .map_err(|e| DegradationReason::from(&e))?;

        let provenance = Provenance {
            is_real_ai: true,
            model: completion.model.clone(),
            timestamp: jiff::Timestamp::now(),
            response_source: ResponseSource::ChatCompletionApi,
            response_time_ms: Some(completion.elapsed.as_millis() as u64),
            degradation_cause: None,
        };
        normalize(&completion.text, provenance).map_err(|e| DegradationReason::from(&e))
    }

    fn ensure_intervention_message(
        &self,
        mut insights: AiInsights,
        scored: &ScoredResult,
        risk: &RiskAssessment,
    ) -> AiInsights {
        let missing = insights
            .immediate_intervention_message
            .as_deref()
            .is_none_or(|m| m.trim().is_empty());
        if risk.immediate_intervention && missing {
            insights.immediate_intervention_message = self
                .instrument
                .critical_item
                .as_ref()
                .map(|c| c.message.clone())
                .or_else(|| scored.recommendations.first().cloned());
        }
        insights
    }

    /// Resources for the caller's location, geolocating only when no
    /// country or city was given. Never fails.
    pub async fn professional_resources(&self, ctx: &UserContext) -> ProfessionalResources {
        let location = match ctx.location() {
            Some(location) => location,
            None => match &self.geolocator {
                Some(geolocator) => geolocator.locate().await.unwrap_or_else(Location::unknown),
                None => Location::unknown(),
            },
        };

        let resources = match &self.location {
            Some(service) => service.resources(&location, ResourceScope::Both).await,
            None => fallback_resources(&location),
        };
        ProfessionalResources::from_location(resources, self.instrument.online_resources.clone())
    }
}
