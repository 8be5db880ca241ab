use serde::{Deserialize, Serialize};

use super::contribute_common::custody_deposit;
use super::guards::require_not_finalized;
use crate::address::Address;
use crate::constants::BPS_DENOMINATOR;
use crate::context::Context;
use crate::error::{ErrorCode, Result};
use crate::require;
use crate::state::{CampaignStatus, PledgeEscrowV0};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Disputed {
    pub campaign_id: u64,
    pub disputer: Address,
    pub amount: u64,
    pub disputer_total: u64,
    pub total_disputed: u64,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotTaken {
    pub campaign_id: u64,
    pub snapshot_pledged: u64,
    pub taken_at: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisputeThresholdReached {
    pub campaign_id: u64,
    pub total_disputed: u64,
    pub denominator: u64,
}

/// Strict test: `disputed / denominator > threshold_bps / 10_000`.
pub fn exceeds_dispute_threshold(disputed: u64, denominator: u64, threshold_bps: u64) -> bool {
    u128::from(disputed) * u128::from(BPS_DENOMINATOR)
        > u128::from(denominator) * u128::from(threshold_bps)
}

/// Stake against the campaign's legitimacy.
///
/// Accepted while open and until the dispute window after `end_date` closes.
/// The first dispute at or after `end_date` freezes the pledged total as the
/// threshold denominator, so later movements of the pledged total cannot be
/// used to push the ratio across (or back under) the threshold.
pub fn handle_dispute(
    ctx: &Context<'_>,
    escrow: &mut PledgeEscrowV0,
    amount: u64,
    reason: String,
) -> Result<()> {
    require_not_finalized(escrow)?;
    require!(escrow.status.is_open(), ErrorCode::CampaignNotActive);

    // Saturates for end dates near the end of time
    let window_end = escrow
        .end_date
        .saturating_add(escrow.config.dispute_window_secs);
    require!(ctx.now < window_end, ErrorCode::DisputeWindowClosed);

    require!(
        amount >= escrow.config.min_pledge,
        ErrorCode::AmountBelowMinimum
    );
    require!(
        reason.len() <= escrow.config.max_reason_len,
        ErrorCode::ReasonTooLong
    );

    let disputer_total = escrow
        .dispute_of(&ctx.signer)
        .checked_add(amount)
        .ok_or(ErrorCode::NumericOverflow)?;
    let total_disputed = escrow
        .total_disputed
        .checked_add(amount)
        .ok_or(ErrorCode::NumericOverflow)?;
    let deposited_principal = escrow
        .deposited_principal
        .checked_add(amount)
        .ok_or(ErrorCode::NumericOverflow)?;

    custody_deposit(ctx, escrow, amount)?;

    if ctx.now >= escrow.end_date && !escrow.snapshot_taken {
        escrow.snapshot_taken = true;
        escrow.snapshot_pledged = escrow.amount_pledged;

        ctx.emit(SnapshotTaken {
            campaign_id: escrow.id,
            snapshot_pledged: escrow.snapshot_pledged,
            taken_at: ctx.now,
        });
    }

    escrow.disputers.insert(ctx.signer, disputer_total);
    escrow.total_disputed = total_disputed;
    escrow.deposited_principal = deposited_principal;
    if !reason.is_empty() {
        escrow.dispute_reasons.insert(ctx.signer, reason.clone());
    }

    ctx.emit(Disputed {
        campaign_id: escrow.id,
        disputer: ctx.signer,
        amount,
        disputer_total,
        total_disputed,
        reason,
    });

    let denominator = escrow.dispute_denominator();
    if !escrow.is_disputed
        && exceeds_dispute_threshold(
            total_disputed,
            denominator,
            escrow.config.dispute_threshold_bps,
        )
    {
        escrow.is_disputed = true;
        escrow.status = CampaignStatus::Disputed;

        ctx.emit(DisputeThresholdReached {
            campaign_id: escrow.id,
            total_disputed,
            denominator,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::ONE_USDC;

    #[test]
    fn test_threshold_is_strict() {
        let pledged = 100 * ONE_USDC;
        assert!(!exceeds_dispute_threshold(10 * ONE_USDC, pledged, 1_000));
        assert!(exceeds_dispute_threshold(10 * ONE_USDC + 1, pledged, 1_000));
        assert!(!exceeds_dispute_threshold(5 * ONE_USDC, pledged, 1_000));
    }

    #[test]
    fn test_threshold_with_nothing_pledged() {
        assert!(exceeds_dispute_threshold(1, 0, 1_000));
        assert!(!exceeds_dispute_threshold(0, 0, 1_000));
    }

    #[test]
    fn test_threshold_does_not_overflow() {
        assert!(!exceeds_dispute_threshold(u64::MAX / 10, u64::MAX, 1_000));
        assert!(exceeds_dispute_threshold(u64::MAX, u64::MAX, 1_000));
    }
}
