use super::claim_common::{release, voucher_payout, Claimed};
use super::guards::require_finalized;
use crate::context::Context;
use crate::error::{ErrorCode, Result};
use crate::require;
use crate::state::{ClaimRole, PledgeEscrowV0};

/// Refund of the signer's vouch; slashed only when fraud was flagged.
pub fn handle_claim_voucher(ctx: &Context<'_>, escrow: &mut PledgeEscrowV0) -> Result<u64> {
    require_finalized(escrow)?;

    let stake = escrow.vouch_of(&ctx.signer);
    require!(stake > 0, ErrorCode::NoVouch);
    require!(
        !escrow.settled_vouchers.contains(&ctx.signer),
        ErrorCode::VouchAlreadyClaimed
    );

    let payout = voucher_payout(escrow, stake)?;

    escrow.settled_vouchers.insert(ctx.signer);
    if payout > 0 {
        if let Err(err) = release(ctx, escrow, payout) {
            escrow.settled_vouchers.remove(&ctx.signer);
            return Err(err);
        }
    }

    ctx.emit(Claimed {
        campaign_id: escrow.id,
        role: ClaimRole::Voucher,
        claimant: ctx.signer,
        amount: payout,
    });

    Ok(payout)
}
