use super::finalize_common::finalize;
use super::guards::require_not_finalized;
use crate::context::Context;
use crate::error::{ErrorCode, Result};
use crate::require;
use crate::state::{FinalizeRoute, PledgeEscrowV0};

/// Fail a campaign the oracle never resolved. Anyone may call once the grace
/// period after the deadline has elapsed. No fraud is flagged, so vouchers
/// are refunded in full.
pub fn handle_emergency_finalize(ctx: &Context<'_>, escrow: &mut PledgeEscrowV0) -> Result<()> {
    require_not_finalized(escrow)?;

    let opens_at = escrow
        .end_date
        .saturating_add(escrow.config.grace_period_secs);
    require!(ctx.now >= opens_at, ErrorCode::GracePeriodNotElapsed);

    finalize(ctx, escrow, FinalizeRoute::EmergencyTimeout)
}
