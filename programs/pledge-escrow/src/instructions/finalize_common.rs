use serde::{Deserialize, Serialize};
use tracing::warn;

use super::claim_common::treasury_settlement;
use crate::context::Context;
use crate::error::{ErrorCode, Result};
use crate::state::{CampaignStatus, FinalizeRoute, PledgeEscrowV0};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignFinalized {
    pub campaign_id: u64,
    pub route: FinalizeRoute,
    pub success: bool,
    pub fraud_flagged: bool,
    pub yield_accrued: u64,
    pub treasury_entitlement: u64,
    pub finalized_at: i64,
}

/// Withdraw the whole pool position and fix the terminal verdict.
///
/// Anything the pool returns above the deposited principal is yield and is
/// credited to the treasury. A shortfall aborts finalization; the withdrawn
/// amount is deposited back so custody is as it was.
pub(crate) fn finalize(
    ctx: &Context<'_>,
    escrow: &mut PledgeEscrowV0,
    route: FinalizeRoute,
) -> Result<()> {
    let settlement = treasury_settlement(escrow, route)?;

    let withdrawn = ctx.yield_pool.withdraw_all(&escrow.address)?;

    if withdrawn < escrow.deposited_principal {
        if withdrawn > 0 {
            if let Err(err) = ctx.yield_pool.deposit(&escrow.address, withdrawn) {
                warn!(
                    campaign_id = escrow.id,
                    withdrawn,
                    error = %err,
                    "failed to restore pool position after shortfall"
                );
            }
        }
        warn!(
            campaign_id = escrow.id,
            withdrawn,
            principal = escrow.deposited_principal,
            "yield pool returned less than principal"
        );
        return Err(ErrorCode::CustodyShortfall.into());
    }

    let yield_accrued = withdrawn - escrow.deposited_principal;
    let treasury_entitlement = settlement
        .checked_add(yield_accrued)
        .ok_or(ErrorCode::NumericOverflow)?;

    escrow.finalized = true;
    escrow.finalize_route = Some(route);
    escrow.outcome_success = route.is_success();
    escrow.fraud_flagged = route.flags_fraud();
    escrow.status = if route.is_success() {
        CampaignStatus::Complete
    } else {
        CampaignStatus::Failed
    };
    escrow.finalized_at = Some(ctx.now);
    escrow.deposited_principal = 0;
    escrow.yield_accrued = yield_accrued;
    escrow.treasury_entitlement = treasury_entitlement;

    ctx.emit(CampaignFinalized {
        campaign_id: escrow.id,
        route,
        success: escrow.outcome_success,
        fraud_flagged: escrow.fraud_flagged,
        yield_accrued,
        treasury_entitlement,
        finalized_at: ctx.now,
    });

    Ok(())
}
