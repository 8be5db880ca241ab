use super::claim_common::{disputer_payout, release, Claimed};
use super::guards::require_finalized;
use crate::context::Context;
use crate::error::{ErrorCode, Result};
use crate::require;
use crate::state::{ClaimRole, PledgeEscrowV0};

/// Refund of the signer's dispute stake; slashed when the campaign succeeded.
pub fn handle_claim_disputer(ctx: &Context<'_>, escrow: &mut PledgeEscrowV0) -> Result<u64> {
    require_finalized(escrow)?;

    let stake = escrow.dispute_of(&ctx.signer);
    require!(stake > 0, ErrorCode::NoDispute);
    require!(
        !escrow.settled_disputers.contains(&ctx.signer),
        ErrorCode::DisputeAlreadyClaimed
    );

    let payout = disputer_payout(escrow, stake)?;

    escrow.settled_disputers.insert(ctx.signer);
    if payout > 0 {
        if let Err(err) = release(ctx, escrow, payout) {
            escrow.settled_disputers.remove(&ctx.signer);
            return Err(err);
        }
    }

    ctx.emit(Claimed {
        campaign_id: escrow.id,
        role: ClaimRole::Disputer,
        claimant: ctx.signer,
        amount: payout,
    });

    Ok(payout)
}
