use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// One answered questionnaire item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RawResponse {
    pub question_id: String,
    pub value: u32,
    /// Question text as shown to the user.
    pub question: String,
    /// Label of the selected option, e.g. "More than half the days".
    pub label: String,
    pub timestamp: jiff::Timestamp,
}
