use super::claim_common::{creator_payout, release, Claimed};
use super::guards::{require_creator, require_finalized};
use crate::context::Context;
use crate::error::{ErrorCode, Result};
use crate::require;
use crate::state::{ClaimRole, PledgeEscrowV0};

/// Pledged total plus bond, less the treasury fee. Success only.
pub fn handle_claim_creator(ctx: &Context<'_>, escrow: &mut PledgeEscrowV0) -> Result<u64> {
    require_creator(ctx, escrow)?;
    require_finalized(escrow)?;
    require!(escrow.outcome_success, ErrorCode::CampaignFailed);
    require!(!escrow.creator_claimed, ErrorCode::CreatorAlreadyClaimed);

    let payout = creator_payout(escrow)?;
    require!(payout > 0, ErrorCode::NothingToClaim);

    // Mark before paying out; unmark if the transfer is refused
    escrow.creator_claimed = true;
    if let Err(err) = release(ctx, escrow, payout) {
        escrow.creator_claimed = false;
        return Err(err);
    }

    ctx.emit(Claimed {
        campaign_id: escrow.id,
        role: ClaimRole::Creator,
        claimant: ctx.signer,
        amount: payout,
    });

    Ok(payout)
}
