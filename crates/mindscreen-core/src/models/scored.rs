use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Clinical severity band derived from a total score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Severity {
    Minimal,
    Mild,
    Moderate,
    ModeratelySevere,
    Severe,
}

impl Severity {
    pub const ALL: [Severity; 5] = [
        Severity::Minimal,
        Severity::Mild,
        Severity::Moderate,
        Severity::ModeratelySevere,
        Severity::Severe,
    ];

    /// Human-readable label, e.g. "Moderately Severe".
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Minimal => "Minimal",
            Severity::Mild => "Mild",
            Severity::Moderate => "Moderate",
            Severity::ModeratelySevere => "Moderately Severe",
            Severity::Severe => "Severe",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Operational urgency band. Ordered from lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "kebab-case")]
#[ts(export)]
pub enum RiskBand {
    Low,
    Mild,
    Moderate,
    ModeratelySevere,
    Severe,
}

impl RiskBand {
    /// The highest band. Critical-item overrides escalate to this.
    pub const MAX: RiskBand = RiskBand::Severe;

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskBand::Low => "low",
            RiskBand::Mild => "mild",
            RiskBand::Moderate => "moderate",
            RiskBand::ModeratelySevere => "moderately-severe",
            RiskBand::Severe => "severe",
        }
    }
}

impl fmt::Display for RiskBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Deterministic result of scoring one set of responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ScoredResult {
    pub instrument_id: String,
    pub score: u32,
    pub severity: Severity,
    pub risk: RiskBand,
    pub interpretation: String,
    pub recommendations: Vec<String>,
    /// True when the instrument's critical item was endorsed and the
    /// risk band was escalated.
    pub critical_override: bool,
    /// Instrument-specific flags, e.g. `functional_impairment`.
    pub instrument_flags: BTreeMap<String, serde_json::Value>,
}
