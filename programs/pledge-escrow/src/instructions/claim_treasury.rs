use super::claim_common::{release, Claimed};
use super::guards::{require_finalized, require_treasury};
use crate::context::Context;
use crate::error::{ErrorCode, Result};
use crate::require;
use crate::state::{ClaimRole, PledgeEscrowV0};

/// Fee or forfeited bond, slashed stakes and all accrued yield.
pub fn handle_claim_treasury(ctx: &Context<'_>, escrow: &mut PledgeEscrowV0) -> Result<u64> {
    require_treasury(ctx, escrow)?;
    require_finalized(escrow)?;
    require!(!escrow.treasury_claimed, ErrorCode::TreasuryAlreadyClaimed);

    let payout = escrow.treasury_entitlement;
    require!(payout > 0, ErrorCode::NothingToClaim);

    escrow.treasury_claimed = true;
    if let Err(err) = release(ctx, escrow, payout) {
        escrow.treasury_claimed = false;
        return Err(err);
    }

    ctx.emit(Claimed {
        campaign_id: escrow.id,
        role: ClaimRole::Treasury,
        claimant: ctx.signer,
        amount: payout,
    });

    Ok(payout)
}
