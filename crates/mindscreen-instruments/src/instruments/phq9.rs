use std::sync::LazyLock;

use mindscreen_core::models::education::{
    EducationalArticle, EducationalContent, EducationalVideo, TipCategory, TipPriority,
};
use mindscreen_core::models::resources::{
    OnlineResource, OnlineResourceKind, ResourceCost, ResourceLevel,
};
use mindscreen_core::models::risk::{ActionableTip, Difficulty};
use mindscreen_core::models::scored::{RiskBand, Severity};

use crate::definition::{
    CriticalItem, ImpactThresholds, ImpairmentLevel, InstrumentDefinition, ItemDefinition,
    RiskRules, ScoreRange, SeverityBand, TipRule, TipTrigger,
};

/// PHQ-9: Patient Health Questionnaire, nine items.
/// Each item 0–3 (not at all … nearly every day). Total 0–27.
/// Item 9 (thoughts of death or self-harm) is the critical item.
pub fn definition() -> &'static InstrumentDefinition {
    static PHQ9: LazyLock<InstrumentDefinition> = LazyLock::new(build);
    &PHQ9
}

pub const CRITICAL_ITEM_ID: &str = "phq9_9";

pub const URGENT_SAFETY_MESSAGE: &str =
    "Seek immediate professional help - contact crisis hotline or emergency services";

fn build() -> InstrumentDefinition {
    let items = [
        (
            "phq9_1",
            "Interest/Pleasure",
            "Anhedonia",
            None,
            Some("Maintains interest in activities"),
            "Maintains interest and enjoyment in activities",
        ),
        (
            "phq9_2",
            "Feeling Down",
            "Depressed Mood",
            None,
            Some("Stable mood most days"),
            "Generally maintains positive mood",
        ),
        (
            "phq9_3",
            "Sleep Problems",
            "Sleep",
            Some("Sleep disturbance"),
            None,
            "Has healthy sleep patterns",
        ),
        (
            "phq9_4",
            "Fatigue/Energy",
            "Energy",
            None,
            None,
            "Maintains good energy levels",
        ),
        (
            "phq9_5",
            "Appetite Changes",
            "Appetite",
            None,
            None,
            "Has stable appetite",
        ),
        (
            "phq9_6",
            "Guilt/Worthlessness",
            "Self-Worth",
            Some("Feelings of worthlessness or guilt"),
            None,
            "Maintains positive self-regard",
        ),
        (
            "phq9_7",
            "Concentration Problems",
            "Concentration",
            Some("Concentration difficulties affecting daily function"),
            None,
            "Has good concentration abilities",
        ),
        (
            "phq9_8",
            "Movement Changes",
            "Psychomotor",
            None,
            None,
            "Maintains normal activity levels",
        ),
        (
            "phq9_9",
            "Thoughts of Death/Self-Harm",
            "Suicidal Ideation",
            Some("Suicidal ideation present"),
            Some("No thoughts of self-harm"),
            "No thoughts of self-harm (major protective factor)",
        ),
    ];

    let items = items
        .into_iter()
        .map(
            |(id, name, category, risk, protective, strength)| ItemDefinition {
                id: id.to_string(),
                name: name.to_string(),
                category: category.to_string(),
                range: ScoreRange { min: 0, max: 3 },
                risk_factor: risk.map(str::to_string),
                protective_factor: protective.map(str::to_string),
                strength: Some(strength.to_string()),
            },
        )
        .collect();

    let severe_recommendations = [
        "Schedule appointment with mental health professional immediately",
        "Consider medication evaluation with psychiatrist",
        "Establish safety plan and support network",
    ];

    let bands = vec![
        band(
            0,
            Some(4),
            Severity::Minimal,
            RiskBand::Low,
            "Minimal depression symptoms. Continue monitoring your mental health.",
            &[
                "Continue healthy lifestyle habits",
                "Stay socially connected",
                "Practice stress prevention techniques",
            ],
        ),
        band(
            5,
            Some(9),
            Severity::Mild,
            RiskBand::Mild,
            "Mild depression symptoms. Consider lifestyle modifications and monitoring.",
            &[
                "Monitor symptoms with regular self-assessment",
                "Focus on sleep hygiene and regular exercise",
                "Consider stress management techniques",
            ],
        ),
        band(
            10,
            Some(14),
            Severity::Moderate,
            RiskBand::Moderate,
            "Moderate depression symptoms. Professional consultation recommended.",
            &[
                "Schedule consultation with therapist or counselor",
                "Consider cognitive behavioral therapy (CBT)",
                "Implement daily self-care routine",
            ],
        ),
        band(
            15,
            Some(19),
            Severity::ModeratelySevere,
            RiskBand::ModeratelySevere,
            "Moderately severe depression. Professional treatment strongly recommended.",
            &severe_recommendations,
        ),
        band(
            20,
            None,
            Severity::Severe,
            RiskBand::Severe,
            "Severe depression symptoms. Immediate professional intervention recommended.",
            &severe_recommendations,
        ),
    ];

    InstrumentDefinition {
        id: "phq9".to_string(),
        name: "PHQ-9".to_string(),
        items,
        bands,
        critical_item: Some(CriticalItem {
            item_id: CRITICAL_ITEM_ID.to_string(),
            message: URGENT_SAFETY_MESSAGE.to_string(),
            risk_flags: vec!["suicidal_ideation".to_string(), "self_harm".to_string()],
        }),
        impact: ImpactThresholds {
            high: 3,
            moderate: 2,
        },
        risk_rules: RiskRules {
            item_risk_min_value: 2,
            intervention_min_score: 20,
            score_risk_factor_min: 15,
            score_risk_factor: "Severe depression symptoms".to_string(),
            functional_risk_min_score: 10,
        },
        functional_impairment: vec![
            impairment(0, "None"),
            impairment(5, "Mild"),
            impairment(10, "Moderate"),
            impairment(15, "Severe"),
        ],
        tips: tips(),
        warning_signs: strings(&[
            "Thoughts of death or self-harm",
            "Significant worsening of mood for several days",
            "Complete loss of interest in all activities",
            "Inability to function at work or in relationships",
            "Severe sleep disturbance (sleeping too much or too little)",
            "Significant appetite changes or weight loss/gain",
            "Increased agitation or severe slowing of movement",
            "Persistent feelings of worthlessness or excessive guilt",
        ]),
        progress_metrics: strings(&[
            "Daily mood rating (1-10 scale)",
            "Hours of sleep per night",
            "Energy levels throughout the day",
            "Number of pleasant activities engaged in",
            "Social interactions per week",
            "Exercise or physical activity frequency",
            "Medication adherence (if applicable)",
            "Therapy session attendance",
        ]),
        education: education(),
        online_resources: online_resources(),
    }
}

fn tips() -> Vec<TipRule> {
    vec![
        TipRule {
            trigger: TipTrigger::AnyItem {
                item_ids: strings(&["phq9_3"]),
                min_value: 2,
            },
            tip: tip(
                "Sleep Hygiene",
                "Establish Healthy Sleep Patterns",
                "Create a consistent bedtime routine, avoid screens 1 hour before bed, and maintain a cool, dark sleeping environment. Aim for 7-9 hours of sleep per night.",
                Difficulty::Easy,
                "1-2 weeks",
            ),
        },
        TipRule {
            trigger: TipTrigger::AnyItem {
                item_ids: strings(&["phq9_4", "phq9_1"]),
                min_value: 2,
            },
            tip: tip(
                "Behavioral Activation",
                "Gradual Activity Increase",
                "Start with 10-15 minutes of light physical activity daily. Schedule one pleasant activity each day, even if you don't feel motivated. Small steps lead to bigger changes.",
                Difficulty::Moderate,
                "2-4 weeks",
            ),
        },
        TipRule {
            trigger: TipTrigger::Always,
            tip: tip(
                "Social Support",
                "Strengthen Social Connections",
                "Reach out to one trusted person each week. Consider joining a support group or engaging in community activities. Social connection is crucial for mental health recovery.",
                Difficulty::Moderate,
                "2-6 weeks",
            ),
        },
        TipRule {
            trigger: TipTrigger::MinScore { score: 10 },
            tip: tip(
                "Stress Management",
                "Daily Mindfulness Practice",
                "Practice 5-10 minutes of deep breathing or meditation daily. Use grounding techniques when feeling overwhelmed. Apps like Headspace or Calm can help guide you.",
                Difficulty::Easy,
                "1-3 weeks",
            ),
        },
        TipRule {
            trigger: TipTrigger::MinScore { score: 15 },
            tip: tip(
                "Professional Support",
                "Seek Professional Treatment",
                "Schedule an appointment with a mental health professional. Consider both therapy (CBT, IPT) and medication evaluation. Professional support significantly improves outcomes.",
                Difficulty::Challenging,
                "Immediate",
            ),
        },
    ]
}

fn education() -> EducationalContent {
    EducationalContent {
        videos: vec![
            EducationalVideo {
                title: "Understanding Depression: Signs, Symptoms, and Treatment".to_string(),
                url: "https://www.youtube.com/watch?v=z-IR48Mb3W0".to_string(),
                duration: "8:32".to_string(),
                description: "A comprehensive overview of depression, its symptoms, and available treatment options.".to_string(),
                speaker: Some("Dr. John Grohol".to_string()),
                organization: Some("Psych Central".to_string()),
            },
            EducationalVideo {
                title: "Cognitive Behavioral Therapy for Depression".to_string(),
                url: "https://www.youtube.com/watch?v=0ViaCs0k2Nc".to_string(),
                duration: "12:45".to_string(),
                description: "Learn about CBT techniques that can help manage depression symptoms."
                    .to_string(),
                speaker: Some("Dr. Judith Beck".to_string()),
                organization: Some("Beck Institute".to_string()),
            },
            EducationalVideo {
                title: "Depression and Sleep: Breaking the Cycle".to_string(),
                url: "https://www.youtube.com/watch?v=fm4jBZ1hoss".to_string(),
                duration: "6:20".to_string(),
                description: "Understanding the relationship between sleep and depression, with practical tips.".to_string(),
                speaker: None,
                organization: None,
            },
        ],
        articles: vec![
            EducationalArticle {
                title: "The Science Behind Depression: What Happens in Your Brain".to_string(),
                url: "https://www.healthline.com/health/depression/effects-brain".to_string(),
                read_time: "8 min read".to_string(),
                summary: "Explore how depression affects brain chemistry and structure, and what this means for treatment.".to_string(),
                author: Some("Dr. Timothy Legg".to_string()),
                source: "Healthline".to_string(),
            },
            EducationalArticle {
                title: "Natural Ways to Fight Depression".to_string(),
                url: "https://www.mayoclinic.org/diseases-conditions/depression/in-depth/depression-and-exercise/art-20046495".to_string(),
                read_time: "5 min read".to_string(),
                summary: "Evidence-based natural approaches to managing depression symptoms alongside professional treatment.".to_string(),
                author: None,
                source: "Mayo Clinic".to_string(),
            },
        ],
        tips: vec![
            tip_category(
                "Daily Routine",
                TipPriority::High,
                &[
                    "Establish a consistent wake-up time, even on weekends",
                    "Create a morning routine that includes pleasant activities",
                    "Set small, achievable daily goals",
                    "Write down three things you're thankful for each day",
                ],
            ),
            tip_category(
                "Self-Care",
                TipPriority::High,
                &[
                    "Take a warm bath or shower to relax",
                    "Spend 10-15 minutes in sunlight each day",
                    "Practice deep breathing exercises",
                    "Engage in activities you used to enjoy, even if they don't feel appealing right now",
                ],
            ),
            tip_category(
                "Social Connection",
                TipPriority::Medium,
                &[
                    "Reach out to one friend or family member each day",
                    "Join a support group or online community",
                    "Volunteer for a cause you care about",
                    "Consider getting a pet for companionship",
                ],
            ),
        ],
    }
}

fn online_resources() -> Vec<OnlineResource> {
    vec![
        OnlineResource {
            title: "BetterHelp Online Therapy".to_string(),
            url: "https://www.betterhelp.com".to_string(),
            kind: OnlineResourceKind::App,
            description: "Professional online therapy with licensed therapists".to_string(),
            cost: Some(ResourceCost::Paid),
            rating: Some(4.2),
            level: Some(ResourceLevel::Beginner),
        },
        OnlineResource {
            title: "Headspace Meditation".to_string(),
            url: "https://www.headspace.com".to_string(),
            kind: OnlineResourceKind::App,
            description: "Guided meditation and mindfulness exercises".to_string(),
            cost: Some(ResourceCost::Freemium),
            rating: Some(4.5),
            level: Some(ResourceLevel::Beginner),
        },
        OnlineResource {
            title: "Feeling Good: The New Mood Therapy".to_string(),
            url: "https://www.amazon.com/Feeling-Good-New-Mood-Therapy/dp/0380810336".to_string(),
            kind: OnlineResourceKind::Book,
            description: "Classic self-help book on cognitive behavioral therapy for depression"
                .to_string(),
            cost: Some(ResourceCost::Paid),
            rating: Some(4.7),
            level: Some(ResourceLevel::Intermediate),
        },
    ]
}

fn band(
    min_score: u32,
    max_score: Option<u32>,
    severity: Severity,
    risk: RiskBand,
    interpretation: &str,
    recommendations: &[&str],
) -> SeverityBand {
    SeverityBand {
        min_score,
        max_score,
        severity,
        risk,
        interpretation: interpretation.to_string(),
        recommendations: strings(recommendations),
    }
}

fn impairment(min_score: u32, label: &str) -> ImpairmentLevel {
    ImpairmentLevel {
        min_score,
        label: label.to_string(),
    }
}

fn tip(
    category: &str,
    title: &str,
    description: &str,
    difficulty: Difficulty,
    timeframe: &str,
) -> ActionableTip {
    ActionableTip {
        category: category.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        difficulty,
        timeframe: timeframe.to_string(),
        evidence_based: true,
    }
}

fn tip_category(category: &str, priority: TipPriority, content: &[&str]) -> TipCategory {
    TipCategory {
        category: category.to_string(),
        content: strings(content),
        priority,
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
