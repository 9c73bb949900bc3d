use thiserror::Error;

use crate::definition::ValidationError;

#[derive(Debug, Error)]
pub enum InstrumentError {
    #[error("unknown instrument: {0}")]
    UnknownInstrument(String),

    #[error("no responses supplied for instrument '{instrument_id}'")]
    EmptyResponses { instrument_id: String },

    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("invalid band table for '{instrument_id}': {reason}")]
    InvalidBands {
        instrument_id: String,
        reason: String,
    },

    #[error("no severity band covers score {score} for instrument '{instrument_id}'")]
    NoBand { instrument_id: String, score: u32 },
}
