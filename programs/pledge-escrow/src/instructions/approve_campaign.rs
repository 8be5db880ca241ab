use serde::{Deserialize, Serialize};
use tracing::debug;

use super::guards::require_creator;
use crate::address::Address;
use crate::context::Context;
use crate::error::{ErrorCode, Result};
use crate::require;
use crate::state::{CampaignStatus, PledgeEscrowV0};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignApproved {
    pub campaign_id: u64,
    pub creator: Address,
    pub bond_deposited: u64,
    pub approved_at: i64,
}

pub fn handle_approve_campaign(ctx: &Context<'_>, escrow: &mut PledgeEscrowV0) -> Result<()> {
    require_creator(ctx, escrow)?;
    require!(
        escrow.status == CampaignStatus::Draft && !escrow.finalized,
        ErrorCode::CampaignNotDraft
    );
    require!(ctx.now < escrow.end_date, ErrorCode::PastDeadline);

    let deposited_principal = escrow
        .deposited_principal
        .checked_add(escrow.creator_bond)
        .ok_or(ErrorCode::NumericOverflow)?;

    // The bond already sits at the custody address; move it into the pool
    let receipt = ctx
        .yield_pool
        .deposit(&escrow.address, escrow.creator_bond)?;
    debug!(campaign_id = escrow.id, ?receipt, "bond deposited");

    escrow.deposited_principal = deposited_principal;
    escrow.status = CampaignStatus::Active;
    escrow.approved_at = Some(ctx.now);

    ctx.emit(CampaignApproved {
        campaign_id: escrow.id,
        creator: escrow.creator,
        bond_deposited: escrow.creator_bond,
        approved_at: ctx.now,
    });

    Ok(())
}
