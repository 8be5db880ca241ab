use tracing::{debug, warn};

use crate::context::Context;
use crate::error::{ErrorCode, Result};
use crate::require;
use crate::state::PledgeEscrowV0;
use crate::yield_pool::DepositReceipt;

use super::guards::require_not_finalized;

/// Shared guards for pledges and vouches.
pub(crate) fn require_accepting_contributions(
    ctx: &Context<'_>,
    escrow: &PledgeEscrowV0,
    amount: u64,
) -> Result<()> {
    require_not_finalized(escrow)?;
    require!(escrow.status.is_open(), ErrorCode::CampaignNotActive);
    require!(ctx.now < escrow.end_date, ErrorCode::PastDeadline);
    require!(
        amount >= escrow.config.min_pledge,
        ErrorCode::AmountBelowMinimum
    );
    Ok(())
}

/// Pull `amount` from the signer into custody, then deposit it in the pool.
///
/// If the pool refuses, the pulled funds go straight back to the signer and
/// the signer's approval is restored.
pub(crate) fn custody_deposit(
    ctx: &Context<'_>,
    escrow: &PledgeEscrowV0,
    amount: u64,
) -> Result<DepositReceipt> {
    let allowance_before = ctx.token.allowance(&ctx.signer, &escrow.address);
    ctx.token
        .transfer_from(&escrow.address, &ctx.signer, &escrow.address, amount)?;

    match ctx.yield_pool.deposit(&escrow.address, amount) {
        Ok(receipt) => {
            debug!(campaign_id = escrow.id, ?receipt, amount, "custody deposit");
            Ok(receipt)
        }
        Err(err) => {
            if let Err(refund_err) = ctx.token.transfer(&escrow.address, &ctx.signer, amount) {
                warn!(
                    campaign_id = escrow.id,
                    signer = %ctx.signer,
                    amount,
                    error = %refund_err,
                    "failed to return funds after pool deposit failure"
                );
            } else if let Err(approve_err) =
                ctx.token
                    .approve(&ctx.signer, &escrow.address, allowance_before)
            {
                warn!(
                    campaign_id = escrow.id,
                    signer = %ctx.signer,
                    error = %approve_err,
                    "failed to restore allowance after pool deposit failure"
                );
            }
            Err(err.into())
        }
    }
}
