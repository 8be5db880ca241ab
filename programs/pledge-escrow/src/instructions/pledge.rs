use serde::{Deserialize, Serialize};

use super::contribute_common::{custody_deposit, require_accepting_contributions};
use crate::address::Address;
use crate::context::Context;
use crate::error::{ErrorCode, Result};
use crate::state::PledgeEscrowV0;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pledged {
    pub campaign_id: u64,
    pub pledger: Address,
    pub amount: u64,
    pub pledger_total: u64,
    pub amount_pledged: u64,
}

pub fn handle_pledge(ctx: &Context<'_>, escrow: &mut PledgeEscrowV0, amount: u64) -> Result<()> {
    require_accepting_contributions(ctx, escrow, amount)?;

    let pledger_total = escrow
        .pledge_of(&ctx.signer)
        .checked_add(amount)
        .ok_or(ErrorCode::NumericOverflow)?;
    let amount_pledged = escrow
        .amount_pledged
        .checked_add(amount)
        .ok_or(ErrorCode::NumericOverflow)?;
    let deposited_principal = escrow
        .deposited_principal
        .checked_add(amount)
        .ok_or(ErrorCode::NumericOverflow)?;

    custody_deposit(ctx, escrow, amount)?;

    escrow.pledges.insert(ctx.signer, pledger_total);
    escrow.amount_pledged = amount_pledged;
    escrow.deposited_principal = deposited_principal;

    ctx.emit(Pledged {
        campaign_id: escrow.id,
        pledger: ctx.signer,
        amount,
        pledger_total,
        amount_pledged,
    });

    Ok(())
}
