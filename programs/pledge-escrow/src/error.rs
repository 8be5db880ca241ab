use thiserror::Error;

use crate::token::TokenError;
use crate::yield_pool::YieldPoolError;

/// Rejection category. Every rejection leaves the ledger in its prior state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Authorization,
    Temporal,
    State,
    Validation,
    Settlement,
    Custody,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ErrorCode {
    #[error("Caller is not the campaign creator.")]
    NotCreator,
    #[error("Caller is not the campaign oracle.")]
    NotOracle,
    #[error("Caller is not the campaign treasury.")]
    NotTreasury,

    #[error("Campaign deadline has passed.")]
    PastDeadline,
    #[error("Campaign deadline has not been reached.")]
    DeadlineNotReached,
    #[error("Emergency grace period has not elapsed.")]
    GracePeriodNotElapsed,
    #[error("Dispute window has closed.")]
    DisputeWindowClosed,

    #[error("Campaign is not in draft.")]
    CampaignNotDraft,
    #[error("Campaign is not accepting contributions.")]
    CampaignNotActive,
    #[error("Campaign has already been finalized.")]
    AlreadyFinalized,
    #[error("Campaign has not been finalized.")]
    NotFinalized,
    #[error("Campaign failed.")]
    CampaignFailed,
    #[error("Campaign succeeded.")]
    CampaignSucceeded,

    #[error("Amount is below the minimum.")]
    AmountBelowMinimum,
    #[error("Bond is below the minimum.")]
    BondBelowMinimum,
    #[error("Campaign duration does not exceed the minimum.")]
    DurationTooShort,
    #[error("Prompt hash does not match the committed verification criteria.")]
    PromptHashMismatch,
    #[error("Dispute reason is too long.")]
    ReasonTooLong,
    #[error("Escrow configuration is invalid.")]
    InvalidConfig,
    #[error("A calculation resulted in a numeric overflow.")]
    NumericOverflow,

    #[error("Creator payout has already been claimed.")]
    CreatorAlreadyClaimed,
    #[error("No pledge found for this address.")]
    NoPledge,
    #[error("Pledge has already been refunded.")]
    PledgeAlreadyClaimed,
    #[error("No vouch found for this address.")]
    NoVouch,
    #[error("Vouch has already been settled.")]
    VouchAlreadyClaimed,
    #[error("No dispute found for this address.")]
    NoDispute,
    #[error("Dispute has already been settled.")]
    DisputeAlreadyClaimed,
    #[error("Treasury has already claimed.")]
    TreasuryAlreadyClaimed,
    #[error("Nothing to claim.")]
    NothingToClaim,

    #[error("Yield pool returned less than the deposited principal.")]
    CustodyShortfall,
}

impl ErrorCode {
    pub fn kind(&self) -> ErrorKind {
        use ErrorCode::*;
        match self {
            NotCreator | NotOracle | NotTreasury => ErrorKind::Authorization,
            PastDeadline | DeadlineNotReached | GracePeriodNotElapsed | DisputeWindowClosed => {
                ErrorKind::Temporal
            }
            CampaignNotDraft | CampaignNotActive | AlreadyFinalized | NotFinalized
            | CampaignFailed | CampaignSucceeded => ErrorKind::State,
            AmountBelowMinimum | BondBelowMinimum | DurationTooShort | PromptHashMismatch
            | ReasonTooLong | InvalidConfig | NumericOverflow => ErrorKind::Validation,
            CreatorAlreadyClaimed | NoPledge | PledgeAlreadyClaimed | NoVouch
            | VouchAlreadyClaimed | NoDispute | DisputeAlreadyClaimed | TreasuryAlreadyClaimed
            | NothingToClaim => ErrorKind::Settlement,
            CustodyShortfall => ErrorKind::Custody,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EscrowError {
    #[error(transparent)]
    Code(#[from] ErrorCode),

    #[error("Token transfer failed: {0}")]
    Token(#[from] TokenError),

    #[error("Yield pool operation failed: {0}")]
    YieldPool(#[from] YieldPoolError),
}

impl EscrowError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EscrowError::Code(code) => code.kind(),
            EscrowError::Token(_) | EscrowError::YieldPool(_) => ErrorKind::Custody,
        }
    }

    /// The ledger error code, if the rejection came from a ledger guard.
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            EscrowError::Code(code) => Some(*code),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, EscrowError>;

/// Return early with the given [`ErrorCode`] unless the condition holds.
#[macro_export]
macro_rules! require {
    ($cond:expr, $code:expr $(,)?) => {
        if !($cond) {
            return Err($crate::error::EscrowError::from($code));
        }
    };
}
