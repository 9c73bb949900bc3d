use mindscreen_inference::InferenceError;
use mindscreen_instruments::error::InstrumentError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Instrument(#[from] InstrumentError),

    #[error("inference setup failed: {0}")]
    Inference(#[from] InferenceError),

    #[error("config error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
