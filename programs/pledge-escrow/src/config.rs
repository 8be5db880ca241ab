use serde::{Deserialize, Serialize};

use crate::constants::{
    BPS_DENOMINATOR, DEFAULT_DISPUTE_THRESHOLD_BPS, DEFAULT_DISPUTE_WINDOW_SECS, DEFAULT_FEE_BPS,
    DEFAULT_GRACE_PERIOD_SECS, DEFAULT_MIN_BOND, DEFAULT_MIN_CAMPAIGN_DURATION_SECS,
    DEFAULT_MIN_PLEDGE, DEFAULT_SLASH_BPS, MAX_DISPUTE_REASON_LEN,
};
use crate::error::{ErrorCode, Result};
use crate::require;

/// Economic and temporal parameters of an escrow.
///
/// A copy is stored on every ledger at creation and never changes afterwards,
/// so a campaign always settles under the rules it was opened with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EscrowConfig {
    /// Treasury fee on the pledged total when the campaign succeeds
    pub fee_bps: u64,

    /// Minimum pledge, vouch and dispute stake
    pub min_pledge: u64,

    /// Minimum creator bond
    pub min_bond: u64,

    /// `end_date - now` must strictly exceed this at creation
    pub min_campaign_duration_secs: i64,

    /// Delay after `end_date` before emergency finalization opens
    pub grace_period_secs: i64,

    /// Disputes are accepted until `end_date + dispute_window_secs`
    pub dispute_window_secs: i64,

    /// Dispute stake must strictly exceed this share of the pledged total
    pub dispute_threshold_bps: u64,

    /// Share slashed from fraud-flagged vouchers and frivolous disputers
    pub slash_bps: u64,

    pub max_reason_len: usize,
}

impl Default for EscrowConfig {
    fn default() -> Self {
        Self {
            fee_bps: DEFAULT_FEE_BPS,
            min_pledge: DEFAULT_MIN_PLEDGE,
            min_bond: DEFAULT_MIN_BOND,
            min_campaign_duration_secs: DEFAULT_MIN_CAMPAIGN_DURATION_SECS,
            grace_period_secs: DEFAULT_GRACE_PERIOD_SECS,
            dispute_window_secs: DEFAULT_DISPUTE_WINDOW_SECS,
            dispute_threshold_bps: DEFAULT_DISPUTE_THRESHOLD_BPS,
            slash_bps: DEFAULT_SLASH_BPS,
            max_reason_len: MAX_DISPUTE_REASON_LEN,
        }
    }
}

impl EscrowConfig {
    pub fn validate(&self) -> Result<()> {
        require!(self.fee_bps <= BPS_DENOMINATOR, ErrorCode::InvalidConfig);
        require!(
            self.dispute_threshold_bps <= BPS_DENOMINATOR,
            ErrorCode::InvalidConfig
        );
        require!(self.slash_bps <= BPS_DENOMINATOR, ErrorCode::InvalidConfig);
        require!(self.min_pledge > 0, ErrorCode::InvalidConfig);
        require!(self.min_bond > 0, ErrorCode::InvalidConfig);
        require!(self.min_campaign_duration_secs >= 0, ErrorCode::InvalidConfig);
        require!(self.grace_period_secs >= 0, ErrorCode::InvalidConfig);
        require!(self.dispute_window_secs >= 0, ErrorCode::InvalidConfig);
        Ok(())
    }
}
