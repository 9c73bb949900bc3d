//! The intermediate analysis shape shared by live responses and fallback
//! content, and its mapping into [`AiInsights`].

use std::collections::BTreeMap;

use mindscreen_core::models::insights::{
    AiInsights, Goal, Practice, Provenance, RecommendedInterventions, SupportResource, Tip,
    UrgencyLevel,
};

/// Fields as the model reports them, after alias resolution.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawAnalysis {
    pub interpretation: String,
    pub personalized_summary: Option<String>,
    pub personalized_message: Option<String>,
    pub key_insights: Vec<String>,
    pub recommendations: Vec<String>,
    pub risk_factors: Vec<String>,
    pub positive_factors: Vec<String>,
    pub immediate_intervention_message: Option<String>,
    pub next_steps: Vec<String>,
    /// Explicit intervention tiers, when the model supplied them.
    pub interventions: Option<RecommendedInterventions>,
    /// Explicit lifestyle categories, when the model supplied them.
    pub lifestyle: Option<BTreeMap<String, Vec<String>>>,
    pub professional_referral: bool,
    pub urgency: UrgencyLevel,
    pub support_resources: Vec<SupportResource>,
    pub follow_up_suggestions: Vec<String>,
    pub tips: Vec<Tip>,
    pub goals: Vec<Goal>,
    pub practices: Vec<Practice>,
    pub warning_signs: Vec<String>,
    pub encouragement: Option<String>,
}

/// Keyword buckets for lifestyle recommendations: category, keywords, and
/// the general line appended to each non-empty bucket.
const LIFESTYLE_BUCKETS: &[(&str, &[&str], &str)] = &[
    ("exercise", &["exercise", "physical"], "Regular physical activity as recommended"),
    ("nutrition", &["nutrition", "eat"], "Healthy eating habits as suggested"),
    ("sleep", &["sleep", "rest"], "Improve sleep hygiene as advised"),
    ("social_support", &["social", "support"], "Build social connections as recommended"),
    ("stress_management", &["stress", "relax"], "Practice stress reduction techniques"),
];

const MAX_PER_BUCKET: usize = 2;

impl RawAnalysis {
    pub fn into_insights(self, provenance: Provenance) -> AiInsights {
        let personalized_summary = self
            .personalized_summary
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(self.interpretation);

        let recommended_interventions = self
            .interventions
            .filter(|i| !i.is_empty())
            .unwrap_or_else(|| split_steps(&self.next_steps));

        let lifestyle_recommendations = self
            .lifestyle
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| bucket_lifestyle(&self.recommendations));

        AiInsights {
            personalized_summary,
            personalized_message: self.personalized_message,
            key_insights: self.key_insights,
            risk_analysis: self.risk_factors.join(". "),
            strengths_identified: self.positive_factors,
            immediate_intervention_message: self.immediate_intervention_message,
            recommended_interventions,
            lifestyle_recommendations,
            personalized_goals: self.goals,
            personalized_tips: self.tips,
            daily_practices: self.practices,
            warning_signs_to_watch: self.warning_signs,
            personalized_encouragement: self.encouragement,
            support_resources: self.support_resources,
            follow_up_suggestions: self.follow_up_suggestions,
            professional_referral: self.professional_referral,
            urgency_level: self.urgency,
            provenance,
        }
    }
}

/// First two steps are immediate, the next two short term, the rest long
/// term.
fn split_steps(steps: &[String]) -> RecommendedInterventions {
    let tier = |from: usize, to: usize| -> Vec<String> {
        steps
            .iter()
            .skip(from)
            .take(to.saturating_sub(from))
            .cloned()
            .collect()
    };
    RecommendedInterventions {
        immediate: tier(0, 2),
        short_term: tier(2, 4),
        long_term: tier(4, usize::MAX),
    }
}

fn bucket_lifestyle(recommendations: &[String]) -> BTreeMap<String, Vec<String>> {
    let mut buckets = BTreeMap::new();
    if recommendations.is_empty() {
        return buckets;
    }
    for (category, keywords, general) in LIFESTYLE_BUCKETS {
        let mut matched: Vec<String> = recommendations
            .iter()
            .filter(|r| {
                let lower = r.to_lowercase();
                keywords.iter().any(|k| lower.contains(k))
            })
            .take(MAX_PER_BUCKET)
            .cloned()
            .collect();
        matched.push((*general).to_string());
        buckets.insert((*category).to_string(), matched);
    }
    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use mindscreen_core::models::insights::ResponseSource;

    fn provenance() -> Provenance {
        Provenance {
            is_real_ai: true,
            model: "test".into(),
            timestamp: jiff::Timestamp::UNIX_EPOCH,
            response_source: ResponseSource::ChatCompletionApi,
            response_time_ms: None,
            degradation_cause: None,
        }
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn next_steps_split_into_tiers() {
        let analysis = RawAnalysis {
            next_steps: strings(&["a", "b", "c", "d", "e"]),
            ..Default::default()
        };
        let insights = analysis.into_insights(provenance());
        let tiers = insights.recommended_interventions;
        assert_eq!(tiers.immediate, strings(&["a", "b"]));
        assert_eq!(tiers.short_term, strings(&["c", "d"]));
        assert_eq!(tiers.long_term, strings(&["e"]));
    }

    #[test]
    fn explicit_interventions_win_over_steps() {
        let analysis = RawAnalysis {
            next_steps: strings(&["a", "b"]),
            interventions: Some(RecommendedInterventions {
                immediate: strings(&["x"]),
                ..Default::default()
            }),
            ..Default::default()
        };
        let tiers = analysis.into_insights(provenance()).recommended_interventions;
        assert_eq!(tiers.immediate, strings(&["x"]));
        assert!(tiers.short_term.is_empty());
    }

    #[test]
    fn recommendations_bucket_by_keyword() {
        let analysis = RawAnalysis {
            recommendations: strings(&[
                "Get 7-9 hours of sleep",
                "Take short walks for physical activity",
                "Reach out to your support network",
            ]),
            ..Default::default()
        };
        let lifestyle = analysis.into_insights(provenance()).lifestyle_recommendations;
        assert_eq!(
            lifestyle["sleep"],
            strings(&["Get 7-9 hours of sleep", "Improve sleep hygiene as advised"])
        );
        assert_eq!(lifestyle["exercise"][0], "Take short walks for physical activity");
        assert_eq!(lifestyle["nutrition"], strings(&["Healthy eating habits as suggested"]));
    }

    #[test]
    fn empty_analysis_maps_to_empty_insights() {
        let insights = RawAnalysis::default().into_insights(provenance());
        assert!(insights.personalized_summary.is_empty());
        assert!(insights.risk_analysis.is_empty());
        assert!(insights.recommended_interventions.is_empty());
        assert!(insights.lifestyle_recommendations.is_empty());
        assert_eq!(insights.urgency_level, UrgencyLevel::Medium);
    }

    #[test]
    fn summary_prefers_personalized_then_interpretation() {
        let analysis = RawAnalysis {
            interpretation: "interp".into(),
            personalized_summary: Some("  ".into()),
            risk_factors: strings(&["one", "two"]),
            ..Default::default()
        };
        let insights = analysis.into_insights(provenance());
        assert_eq!(insights.personalized_summary, "interp");
        assert_eq!(insights.risk_analysis, "one. two");
    }
}
