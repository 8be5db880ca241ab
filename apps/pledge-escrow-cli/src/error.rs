use pledge_escrow_factory::FactoryError;
use thiserror::Error;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid hex string: {0}")]
    InvalidHex(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid scenario: {0}")]
    InvalidScenario(String),

    #[error("Prompt hash mismatch: expected {expected}, computed {computed}")]
    HashMismatch { expected: String, computed: String },

    #[error("Step {index} ({action}) rejected: {source}")]
    StepRejected {
        index: usize,
        action: String,
        #[source]
        source: FactoryError,
    },

    #[error(transparent)]
    Factory(#[from] FactoryError),
}
