use pledge_escrow::{ErrorCode, ErrorKind, EscrowError};
use thiserror::Error;

/// Errors raised by the factory and the campaign handles it hands out
#[derive(Error, Debug)]
pub enum FactoryError {
    #[error("Campaign {0} not found")]
    CampaignNotFound(u64),

    #[error(transparent)]
    Escrow(#[from] EscrowError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl FactoryError {
    /// Ledger error code behind this error, if it came from a ledger guard.
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            FactoryError::Escrow(err) => err.code(),
            _ => None,
        }
    }

    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            FactoryError::Escrow(err) => Some(err.kind()),
            _ => None,
        }
    }
}

impl From<ErrorCode> for FactoryError {
    fn from(code: ErrorCode) -> Self {
        FactoryError::Escrow(code.into())
    }
}

pub type FactoryResult<T> = Result<T, FactoryError>;
