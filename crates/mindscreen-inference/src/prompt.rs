//! Analysis request construction.
//!
//! A request carries the scored result, every answered item and the
//! optional user context. The user prompt opens with one of several
//! framings picked at random for response variety; every framing asks for
//! the same JSON field set, so parsing does not depend on the choice.

use mindscreen_core::models::response::RawResponse;
use mindscreen_core::models::scored::ScoredResult;
use mindscreen_core::models::user::{Gender, UserContext};
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::chat::ChatMessage;

/// Opening style of the user prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Framing {
    ClinicalFirst,
    EmpatheticFirst,
    Collaborative,
}

impl Framing {
    pub const ALL: [Framing; 3] = [
        Framing::ClinicalFirst,
        Framing::EmpatheticFirst,
        Framing::Collaborative,
    ];

    pub fn random() -> Framing {
        *Self::ALL
            .choose(&mut rand::thread_rng())
            .unwrap_or(&Framing::ClinicalFirst)
    }

    fn opening(&self, instrument: &str) -> String {
        match self {
            Framing::ClinicalFirst => {
                format!("I need your expert analysis of this {instrument} assessment:")
            }
            Framing::EmpatheticFirst => {
                format!("Please help me understand these {instrument} screening results:")
            }
            Framing::Collaborative => {
                format!("Let's examine this {instrument} assessment together:")
            }
        }
    }

    fn focus(&self) -> &'static str {
        match self {
            Framing::ClinicalFirst => {
                "Please provide a thorough clinical interpretation focusing on:
1. Evidence-based analysis of the score and response patterns
2. Risk stratification and immediate safety considerations
3. Symptom clusters and what they suggest
4. Evidence-based treatment recommendations
5. Personalized coping strategies and self-care approaches
6. Professional referral guidance and urgency
7. Location-specific resources when a location is given
8. Concrete follow-up and monitoring"
            }
            Framing::EmpatheticFirst => {
                "Please approach this with empathy and hope while staying clinically accurate:
1. Acknowledge the person's experience with validation
2. Highlight strengths and positive coping factors
3. Explain gently what these results mean
4. Offer encouraging, realistic next steps
5. Suggest supportive resources and community connections
6. Address concerning findings with care
7. Recommend local professionals and services when a location is given
8. Close with hopeful follow-up recommendations"
            }
            Framing::Collaborative => {
                "Let's work through these results and build a path forward:
1. What do these patterns say about the current picture?
2. Which strengths and resources can be built on?
3. Which areas need additional support or intervention?
4. What does a personalized action plan look like?
5. Which local resources and professionals could help?
6. How should progress be monitored?
7. Which emergency resources should be at hand?
8. How can hope and motivation be sustained?"
            }
        }
    }
}

/// One answered item as presented to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseLine {
    pub question_id: String,
    pub question: String,
    pub value: u32,
    pub selected_option: String,
}

/// User context as presented to the model. Only known values are kept.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContextBlock {
    pub age: Option<u32>,
    pub gender: Option<Gender>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub zip_code: Option<String>,
}

impl ContextBlock {
    fn from_user(ctx: &UserContext) -> Option<Self> {
        let keep = |s: &Option<String>| {
            s.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        let block = ContextBlock {
            age: ctx.known_age(),
            gender: ctx.gender.filter(|g| *g != Gender::PreferNotToSay),
            country: keep(&ctx.country),
            city: keep(&ctx.city),
            zip_code: keep(&ctx.zip_code),
        };
        (block != ContextBlock::default()).then_some(block)
    }

    fn has_location(&self) -> bool {
        self.country.is_some() || self.city.is_some() || self.zip_code.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub instrument: String,
    pub score: u32,
    pub severity: String,
    pub responses: Vec<ResponseLine>,
    pub context: Option<ContextBlock>,
    pub framing: Framing,
}

/// Build a request with a randomly chosen framing.
pub fn build_request(
    instrument_name: &str,
    scored: &ScoredResult,
    responses: &[RawResponse],
    ctx: &UserContext,
) -> AnalysisRequest {
    build_request_with(Framing::random(), instrument_name, scored, responses, ctx)
}

pub fn build_request_with(
    framing: Framing,
    instrument_name: &str,
    scored: &ScoredResult,
    responses: &[RawResponse],
    ctx: &UserContext,
) -> AnalysisRequest {
    AnalysisRequest {
        instrument: instrument_name.to_uppercase(),
        score: scored.score,
        severity: scored.severity.label().to_string(),
        responses: responses
            .iter()
            .map(|r| ResponseLine {
                question_id: r.question_id.clone(),
                question: r.question.clone(),
                value: r.value,
                selected_option: r.label.clone(),
            })
            .collect(),
        context: ContextBlock::from_user(ctx),
        framing,
    }
}

const SYSTEM_PROMPT: &str = r#"You are an assistant for mental health screening analysis. Provide personalized, hopeful, clinically careful insights for the person who completed the screening.

Tailor every part of the answer to the person's responses and context. Let age, gender and location shape the advice without stating demographics back to them. Be warm, specific and actionable.

Include "immediateInterventionMessage" only when the results indicate high risk. It must be urgent, direct and focused on immediate safety and professional help.

When a location is given, include real local emergency numbers and mental health services in "supportResources".

Respond with a single JSON object and nothing else, using these fields:

{
  "interpretation": "summary of their mental health picture",
  "personalizedMessage": "direct, encouraging message",
  "keyInsights": ["3-4 insights about their responses"],
  "personalizedRecommendations": ["specific recommendations"],
  "riskFactors": ["areas of concern"],
  "positiveFactors": ["strengths and protective factors"],
  "immediateInterventionMessage": "only when high risk",
  "nextSteps": ["ordered action steps, most urgent first"],
  "personalizedTips": [{"category": "", "title": "", "description": "", "actionSteps": [""], "personalizedNote": ""}],
  "personalizedGoals": [{"goal": "", "why": "", "how": [""], "timeframe": "", "successMetrics": [""]}],
  "dailyPractices": [{"name": "", "description": "", "frequency": "", "personalizedTip": ""}],
  "warningSignsToWatch": ["signs to watch for"],
  "personalizedEncouragement": "hopeful closing message",
  "supportResources": [{"type": "", "resource": "", "description": ""}],
  "followUpSuggestions": ["follow-up recommendations"],
  "professionalReferral": true,
  "urgencyLevel": "low | medium | high | critical"
}"#;

impl AnalysisRequest {
    pub fn system_prompt(&self) -> &'static str {
        SYSTEM_PROMPT
    }

    /// Render the user prompt for this request's framing.
    pub fn user_prompt(&self) -> String {
        let mut prompt = String::new();
        prompt.push_str(&format!("{}\n\n", self.framing.opening(&self.instrument)));
        prompt.push_str("**Assessment Overview:**\n");
        prompt.push_str(&format!(
            "- Total Score: {} ({} level)\n",
            self.score, self.severity
        ));
        prompt.push_str(&format!("- Assessment Type: {}\n", self.instrument));
        prompt.push_str(&format!(
            "- Number of Questions: {}\n\n",
            self.responses.len()
        ));
        prompt.push_str("**Detailed Responses:**\n");
        for (i, r) in self.responses.iter().enumerate() {
            prompt.push_str(&format!("{}. {}\n", i + 1, r.question));
            prompt.push_str(&format!(
                "   Answer: {} (Score: {})\n",
                r.selected_option, r.value
            ));
        }

        if let Some(ctx) = &self.context {
            prompt.push_str("\n**Individual Context:**\n");
            if let Some(age) = ctx.age {
                prompt.push_str(&format!("- Age: {age} years old\n"));
            }
            if let Some(gender) = ctx.gender {
                prompt.push_str(&format!("- Gender: {}\n", gender.as_str()));
            }
            if ctx.has_location() {
                let mut parts: Vec<String> = Vec::new();
                parts.extend(ctx.city.clone());
                parts.extend(ctx.country.clone());
                parts.extend(ctx.zip_code.as_ref().map(|z| format!("({z})")));
                prompt.push_str(&format!("- Location: {}\n", parts.join(", ")));
                prompt.push_str(
                    "  * Include mental health services, providers and local emergency numbers \
                     for this location\n",
                );
                prompt.push_str(
                    "  * If local resources are limited, suggest telehealth and national \
                     alternatives\n",
                );
            }
        }

        prompt.push_str(&format!("\n{}\n\n", self.framing.focus()));
        prompt.push_str(
            "Respond with valid JSON only, using exactly the fields listed in your instructions.",
        );
        prompt
    }

    pub fn messages(&self) -> Vec<ChatMessage> {
        vec![
            ChatMessage::system(self.system_prompt()),
            ChatMessage::user(self.user_prompt()),
        ]
    }
}
