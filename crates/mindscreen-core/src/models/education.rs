use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct EducationalVideo {
    pub title: String,
    pub url: String,
    /// Running time as displayed, e.g. "8:32".
    pub duration: String,
    pub description: String,
    pub speaker: Option<String>,
    pub organization: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct EducationalArticle {
    pub title: String,
    pub url: String,
    /// e.g. "5 min read".
    pub read_time: String,
    pub summary: String,
    pub author: Option<String>,
    pub source: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum TipPriority {
    High,
    Medium,
    Low,
}

impl TipPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            TipPriority::High => "high",
            TipPriority::Medium => "medium",
            TipPriority::Low => "low",
        }
    }
}

/// A themed group of short self-help suggestions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TipCategory {
    pub category: String,
    pub content: Vec<String>,
    pub priority: TipPriority,
}

/// Static reading and viewing material attached to every result of an
/// instrument.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct EducationalContent {
    pub videos: Vec<EducationalVideo>,
    pub articles: Vec<EducationalArticle>,
    pub tips: Vec<TipCategory>,
}

impl EducationalContent {
    pub fn is_empty(&self) -> bool {
        self.videos.is_empty() && self.articles.is_empty() && self.tips.is_empty()
    }
}
