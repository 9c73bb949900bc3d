//! Static insights per severity band, used whenever the AI path is off or
//! fails. Performs no I/O and cannot fail.

use std::fmt;

use mindscreen_core::models::insights::{
    AiInsights, Goal, Provenance, ResponseSource, SupportResource, UrgencyLevel,
};
use mindscreen_core::models::scored::Severity;

use crate::analysis::RawAnalysis;
use crate::error::InferenceError;

/// Why the AI path did not produce the insights.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DegradationReason {
    Disabled,
    RateLimited,
    Error(String),
}

impl DegradationReason {
    pub fn response_source(&self) -> ResponseSource {
        match self {
            DegradationReason::Disabled => ResponseSource::DisabledFallback,
            DegradationReason::RateLimited => ResponseSource::RateLimitedFallback,
            DegradationReason::Error(_) => ResponseSource::ErrorFallback,
        }
    }

    fn notice(&self) -> &'static str {
        match self {
            DegradationReason::Disabled => {
                "Personalized AI analysis is turned off. These insights are based on your score."
            }
            DegradationReason::RateLimited => {
                "Due to high demand, AI analysis is currently rate-limited. Please try again in a few minutes for personalized insights."
            }
            DegradationReason::Error(_) => {
                "AI analysis is temporarily unavailable. These insights are based on your score."
            }
        }
    }
}

impl From<&InferenceError> for DegradationReason {
    fn from(e: &InferenceError) -> Self {
        match e {
            InferenceError::NoCredentials | InferenceError::NoModels => DegradationReason::Disabled,
            _ if e.is_rate_limited() => DegradationReason::RateLimited,
            _ => DegradationReason::Error(e.to_string()),
        }
    }
}

impl fmt::Display for DegradationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DegradationReason::Disabled => f.write_str("disabled by configuration"),
            DegradationReason::RateLimited => f.write_str("rate limited"),
            DegradationReason::Error(cause) => write!(f, "error: {cause}"),
        }
    }
}

struct Content {
    interpretation: &'static str,
    recommendations: &'static [&'static str],
    risk_factors: &'static [&'static str],
    positive_factors: &'static [&'static str],
    next_steps: &'static [&'static str],
    professional_referral: bool,
    urgency: UrgencyLevel,
    resources: &'static [(&'static str, &'static str, &'static str)],
    follow_up: &'static [&'static str],
}

/// Complete insights for `severity`, annotated with `reason`.
pub fn fallback(severity: Severity, score: u32, reason: &DegradationReason) -> AiInsights {
    let content = content_for(severity);
    let strings = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();

    let analysis = RawAnalysis {
        interpretation: content.interpretation.replace("{score}", &score.to_string()),
        personalized_message: Some(reason.notice().to_string()),
        recommendations: strings(content.recommendations),
        risk_factors: strings(content.risk_factors),
        positive_factors: strings(content.positive_factors),
        next_steps: strings(content.next_steps),
        professional_referral: content.professional_referral,
        urgency: content.urgency,
        support_resources: content
            .resources
            .iter()
            .map(|(kind, resource, description)| SupportResource {
                kind: kind.to_string(),
                resource: resource.to_string(),
                description: description.to_string(),
            })
            .collect(),
        follow_up_suggestions: strings(content.follow_up),
        goals: vec![self_care_goal()],
        ..Default::default()
    };

    let source = reason.response_source();
    analysis.into_insights(Provenance {
        is_real_ai: false,
        model: source.as_str().to_string(),
        timestamp: jiff::Timestamp::now(),
        response_source: source,
        response_time_ms: None,
        degradation_cause: Some(reason.to_string()),
    })
}

fn self_care_goal() -> Goal {
    let steps: Vec<String> = [
        "Practice daily mindfulness or relaxation",
        "Maintain regular sleep schedule",
        "Engage in physical activity",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    Goal {
        goal: "Mental Health Self-Care".to_string(),
        why: None,
        how: steps.clone(),
        timeframe: "2 weeks".to_string(),
        steps,
        measurable: "Complete self-care activities 5 days per week".to_string(),
        success_metrics: Vec::new(),
    }
}

fn content_for(severity: Severity) -> Content {
    match severity {
        Severity::Minimal => Content {
            interpretation: "Your responses suggest minimal depression symptoms, which is encouraging. Your score of {score} falls within the normal range, so you are currently experiencing few symptoms that might interfere with daily life. This suggests good emotional resilience and effective coping strategies.",
            recommendations: &[
                "Continue maintaining your current healthy habits and coping strategies",
                "Keep up regular physical activity, which is excellent for mental well-being",
                "Maintain strong social connections and reach out when needed",
                "Practice mindfulness or relaxation techniques to build stress resilience",
                "Use this assessment as a baseline for future monitoring",
            ],
            risk_factors: &[
                "Life stressors could potentially impact mood in the future",
                "Changes in sleep, work, or relationships could affect mental health",
            ],
            positive_factors: &[
                "Taking proactive steps to monitor mental health",
                "Low current symptom burden indicates good emotional regulation",
                "Likely has effective coping mechanisms in place",
            ],
            next_steps: &[
                "Continue with your current lifestyle and coping strategies",
                "Stay aware of any changes in mood or energy levels",
                "Consider retaking this assessment if life circumstances change",
                "Share these results with healthcare providers during routine visits",
            ],
            professional_referral: false,
            urgency: UrgencyLevel::Low,
            resources: &[
                (
                    "Wellness",
                    "Mental Health America - Wellness Resources",
                    "Tips and tools for maintaining good mental health",
                ),
                (
                    "Prevention",
                    "CDC Mental Health Resources",
                    "Evidence-based strategies for mental wellness",
                ),
            ],
            follow_up: &[
                "Retake this screening in 3-6 months as part of routine self-care",
                "Keep a mood journal to identify patterns and triggers",
            ],
        },
        Severity::Mild => Content {
            interpretation: "Your responses indicate mild depression symptoms with a score of {score}. These symptoms may not be severely impairing your daily functioning, but they are an important signal to pay attention to. Early recognition and proactive steps can prevent progression and improve your well-being.",
            recommendations: &[
                "Establish a consistent daily routine that includes enjoyable activities",
                "Prioritize regular exercise, even 20-30 minutes of walking can help",
                "Focus on sleep hygiene and aim for 7-9 hours of quality sleep",
                "Practice stress-reduction techniques like deep breathing or meditation",
                "Stay connected with supportive friends and family members",
                "Consider speaking with a counselor for additional coping strategies",
            ],
            risk_factors: &[
                "Mild symptoms could progress without attention and care",
                "Stress from work, relationships, or life changes may worsen symptoms",
                "Social isolation or reduced activity could increase risk",
            ],
            positive_factors: &[
                "Early recognition of symptoms allows for proactive intervention",
                "Mild severity suggests good potential for improvement with lifestyle changes",
                "Many effective options are available at this stage",
            ],
            next_steps: &[
                "Monitor your symptoms over the next 2-4 weeks",
                "Implement healthy lifestyle changes consistently",
                "Consider speaking with your primary care provider about your results",
                "Track factors that improve or worsen your mood",
            ],
            professional_referral: false,
            urgency: UrgencyLevel::Low,
            resources: &[
                (
                    "Self-Help",
                    "National Institute of Mental Health - Depression Basics",
                    "Information about depression and self-care strategies",
                ),
                (
                    "Online Support",
                    "Depression and Bipolar Support Alliance",
                    "Peer support and educational resources",
                ),
            ],
            follow_up: &[
                "Retake this assessment in 2-3 weeks to monitor progress",
                "Keep a mood and activity diary to identify helpful patterns",
            ],
        },
        Severity::Moderate => Content {
            interpretation: "Your score of {score} indicates moderate depression symptoms that are likely affecting several areas of your life, such as work, relationships and daily activities. Moderate depression responds well to treatment, and many effective options are available.",
            recommendations: &[
                "Schedule an appointment with a mental health professional within the next 1-2 weeks",
                "Consider evidence-based treatments like cognitive-behavioral therapy (CBT)",
                "Discuss the benefits and risks of medication with a qualified provider",
                "Maintain basic self-care: regular meals, adequate sleep, and gentle physical activity",
                "Tell trusted friends or family members so they can support you",
                "Consider joining a support group in your community or online",
            ],
            risk_factors: &[
                "Moderate symptoms can significantly impact work and relationships",
                "Risk of progression without appropriate treatment",
                "Potential for social withdrawal and isolation",
            ],
            positive_factors: &[
                "Recognizing symptoms is the first important step toward recovery",
                "Moderate depression has many proven, effective treatment options",
                "Taking this assessment demonstrates commitment to your mental health",
            ],
            next_steps: &[
                "Contact your healthcare provider to discuss these results",
                "Look for mental health professionals nearby who specialize in depression",
                "Create a support plan with trusted friends or family members",
                "Begin basic wellness strategies while seeking professional help",
            ],
            professional_referral: true,
            urgency: UrgencyLevel::Medium,
            resources: &[
                (
                    "Treatment Locator",
                    "Psychology Today Provider Directory",
                    "Find licensed mental health professionals in your area",
                ),
                (
                    "Crisis Support",
                    "988 Suicide & Crisis Lifeline",
                    "24/7 free and confidential support (call or text 988)",
                ),
                (
                    "Information",
                    "National Alliance on Mental Illness (NAMI)",
                    "Educational resources and local support groups",
                ),
            ],
            follow_up: &[
                "Retake this assessment weekly to monitor treatment progress",
                "Share these results with any healthcare providers you consult",
            ],
        },
        Severity::ModeratelySevere => Content {
            interpretation: "Your score of {score} indicates moderately severe depression symptoms that are significantly affecting your daily life. Professional treatment is strongly recommended: depression at this level rarely improves on its own and responds well to appropriate care.",
            recommendations: &[
                "Schedule an appointment with a mental health professional within the next few days",
                "Consider therapy combined with a medication evaluation",
                "Ask whether an intensive outpatient program would help",
                "Build a strong support network and tell trusted people how you are doing",
                "Focus on basic safety and self-care while seeking professional help",
                "Avoid major life decisions until symptoms improve",
            ],
            risk_factors: &[
                "Significant impairment in work, social, and personal functioning",
                "High risk of symptom progression without treatment",
                "Increased vulnerability to suicidal thoughts",
                "Risk of withdrawal from support systems",
            ],
            positive_factors: &[
                "Recognizing and assessing symptoms is a crucial first step",
                "Depression at this level typically responds well to professional treatment",
                "Recovery is possible with appropriate care and support",
            ],
            next_steps: &[
                "Contact a mental health professional now rather than waiting",
                "Reach out to trusted friends or family members for support",
                "Create a safety plan and know who to contact if thoughts of self-harm occur",
                "Follow treatment recommendations consistently",
            ],
            professional_referral: true,
            urgency: UrgencyLevel::High,
            resources: &[
                (
                    "Immediate Support",
                    "988 Suicide & Crisis Lifeline",
                    "Call or text 988 for immediate, confidential support 24/7",
                ),
                (
                    "Emergency",
                    "Crisis Text Line",
                    "Text HOME to 741741 for immediate crisis support",
                ),
                (
                    "Treatment",
                    "SAMHSA Treatment Locator",
                    "Find mental health treatment facilities in your area",
                ),
            ],
            follow_up: &[
                "Follow up with treatment providers regularly",
                "Retake this assessment weekly to track treatment progress",
            ],
        },
        Severity::Severe => Content {
            interpretation: "Your score of {score} indicates severe depression symptoms that are significantly impairing your ability to function day to day. This level of depression needs prompt professional attention. Severe depression is highly treatable, and with appropriate care most people improve substantially. Your safety comes first right now.",
            recommendations: &[
                "Contact a mental health professional or your primary care provider today",
                "Call 988 (Suicide & Crisis Lifeline) if you are having thoughts of self-harm",
                "Reach out to trusted friends or family members now rather than staying isolated",
                "Consider asking someone to stay with you or check on you regularly",
                "Follow all treatment recommendations from your providers",
                "Ask about intensive outpatient or partial hospitalization programs",
            ],
            risk_factors: &[
                "Severe functional impairment across multiple life domains",
                "High risk of suicidal thoughts or behaviors",
                "Significant risk if symptoms remain untreated",
            ],
            positive_factors: &[
                "Taking this assessment shows self-awareness and help-seeking",
                "Severe depression responds well to appropriate professional treatment",
                "Multiple effective treatment options are available",
            ],
            next_steps: &[
                "Seek immediate professional help and contact a mental health provider today",
                "Create a safety plan and identify people you can contact for support",
                "If you are having thoughts of self-harm, go to an emergency room or call 988",
                "Follow up on all treatment recommendations without delay",
            ],
            professional_referral: true,
            urgency: UrgencyLevel::Critical,
            resources: &[
                (
                    "Crisis",
                    "988 Suicide & Crisis Lifeline",
                    "Call or text 988 for crisis support, available 24/7",
                ),
                (
                    "Emergency",
                    "Emergency Services",
                    "Call your local emergency number or go to the nearest emergency room if in immediate danger",
                ),
                (
                    "Crisis Chat",
                    "Crisis Text Line",
                    "Text HOME to 741741 for immediate crisis counseling",
                ),
            ],
            follow_up: &[
                "Follow up with treatment providers within 24-48 hours",
                "Have someone you trust check on you regularly",
            ],
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_severity_is_fully_populated() {
        for severity in Severity::ALL {
            let insights = fallback(severity, 7, &DegradationReason::Disabled);
            assert!(!insights.personalized_summary.is_empty(), "{severity}");
            assert!(!insights.risk_analysis.is_empty());
            assert!(!insights.strengths_identified.is_empty());
            assert!(!insights.recommended_interventions.immediate.is_empty());
            assert!(!insights.lifestyle_recommendations.is_empty());
            assert!(!insights.support_resources.is_empty());
            assert_eq!(insights.personalized_goals.len(), 1);
            assert!(!insights.provenance.is_real_ai);
        }
    }

    #[test]
    fn score_is_interpolated() {
        let insights = fallback(Severity::Moderate, 12, &DegradationReason::Disabled);
        assert!(insights.personalized_summary.contains("score of 12"));
        assert_eq!(insights.urgency_level, UrgencyLevel::Medium);
    }

    #[test]
    fn provenance_distinguishes_the_reason() {
        let source = |reason: DegradationReason| {
            fallback(Severity::Mild, 6, &reason).provenance.response_source
        };
        assert_eq!(source(DegradationReason::Disabled), ResponseSource::DisabledFallback);
        assert_eq!(source(DegradationReason::RateLimited), ResponseSource::RateLimitedFallback);
        assert_eq!(
            source(DegradationReason::Error("timeout".into())),
            ResponseSource::ErrorFallback
        );

        let insights = fallback(Severity::Mild, 6, &DegradationReason::Error("timeout".into()));
        assert_eq!(insights.provenance.degradation_cause.as_deref(), Some("error: timeout"));
        assert_eq!(insights.provenance.model, "error-fallback");
    }

    #[test]
    fn severe_content_is_critical() {
        let insights = fallback(Severity::Severe, 24, &DegradationReason::RateLimited);
        assert_eq!(insights.urgency_level, UrgencyLevel::Critical);
        assert!(insights.professional_referral);
    }

    #[test]
    fn exhaustion_maps_to_reason_by_last_failure() {
        use crate::error::{AttemptError, AttemptFailure};
        let exhausted = |kind| InferenceError::AllProvidersExhausted {
            attempts: 4,
            last: Some(AttemptError::new(kind, "x")),
        };
        assert_eq!(
            DegradationReason::from(&exhausted(AttemptFailure::RateLimited)),
            DegradationReason::RateLimited
        );
        assert!(matches!(
            DegradationReason::from(&exhausted(AttemptFailure::Network)),
            DegradationReason::Error(_)
        ));
        assert!(matches!(
            DegradationReason::from(&InferenceError::UnparsableResponse),
            DegradationReason::Error(_)
        ));
    }

    #[test]
    fn missing_configuration_means_disabled() {
        assert_eq!(
            DegradationReason::from(&InferenceError::NoCredentials),
            DegradationReason::Disabled
        );
        assert_eq!(
            DegradationReason::from(&InferenceError::NoModels),
            DegradationReason::Disabled
        );
    }

    #[test]
    fn same_severity_gives_the_same_insights() {
        for severity in Severity::ALL {
            let first = fallback(severity, 12, &DegradationReason::RateLimited);
            let mut second = fallback(severity, 12, &DegradationReason::RateLimited);
            second.provenance.timestamp = first.provenance.timestamp;
            assert_eq!(first, second, "{severity}");
        }
    }
}
