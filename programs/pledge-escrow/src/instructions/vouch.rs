use serde::{Deserialize, Serialize};

use super::contribute_common::{custody_deposit, require_accepting_contributions};
use crate::address::Address;
use crate::context::Context;
use crate::error::{ErrorCode, Result};
use crate::state::PledgeEscrowV0;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vouched {
    pub campaign_id: u64,
    pub voucher: Address,
    pub amount: u64,
    pub voucher_total: u64,
    pub total_vouched: u64,
}

/// Stake reputation behind the campaign. Same window and minimum as a pledge,
/// tracked separately.
pub fn handle_vouch(ctx: &Context<'_>, escrow: &mut PledgeEscrowV0, amount: u64) -> Result<()> {
    require_accepting_contributions(ctx, escrow, amount)?;

    let voucher_total = escrow
        .vouch_of(&ctx.signer)
        .checked_add(amount)
        .ok_or(ErrorCode::NumericOverflow)?;
    let total_vouched = escrow
        .total_vouched
        .checked_add(amount)
        .ok_or(ErrorCode::NumericOverflow)?;
    let deposited_principal = escrow
        .deposited_principal
        .checked_add(amount)
        .ok_or(ErrorCode::NumericOverflow)?;

    custody_deposit(ctx, escrow, amount)?;

    escrow.vouchers.insert(ctx.signer, voucher_total);
    escrow.total_vouched = total_vouched;
    escrow.deposited_principal = deposited_principal;

    ctx.emit(Vouched {
        campaign_id: escrow.id,
        voucher: ctx.signer,
        amount,
        voucher_total,
        total_vouched,
    });

    Ok(())
}
