use super::claim_common::{pledger_payout, release, Claimed};
use super::guards::require_finalized;
use crate::context::Context;
use crate::error::{ErrorCode, Result};
use crate::require;
use crate::state::{ClaimRole, PledgeEscrowV0};

/// Full refund of the signer's pledge. Failure only.
pub fn handle_claim_pledger(ctx: &Context<'_>, escrow: &mut PledgeEscrowV0) -> Result<u64> {
    require_finalized(escrow)?;
    require!(!escrow.outcome_success, ErrorCode::CampaignSucceeded);

    let stake = escrow.pledge_of(&ctx.signer);
    require!(stake > 0, ErrorCode::NoPledge);
    require!(
        !escrow.settled_pledgers.contains(&ctx.signer),
        ErrorCode::PledgeAlreadyClaimed
    );

    let payout = pledger_payout(escrow, stake);

    escrow.settled_pledgers.insert(ctx.signer);
    if let Err(err) = release(ctx, escrow, payout) {
        escrow.settled_pledgers.remove(&ctx.signer);
        return Err(err);
    }

    ctx.emit(Claimed {
        campaign_id: escrow.id,
        role: ClaimRole::Pledger,
        claimant: ctx.signer,
        amount: payout,
    });

    Ok(payout)
}
