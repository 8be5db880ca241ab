use super::finalize_common::finalize;
use super::guards::{require_not_finalized, require_oracle};
use crate::context::Context;
use crate::error::{ErrorCode, Result};
use crate::require;
use crate::state::{FinalizeRoute, PledgeEscrowV0};

/// Oracle verdict delivery. Callable once, by the oracle, at or after the
/// deadline, and only against the committed verification criteria.
pub fn handle_verify_and_release(
    ctx: &Context<'_>,
    escrow: &mut PledgeEscrowV0,
    success: bool,
    prompt_hash: [u8; 32],
) -> Result<()> {
    require_oracle(ctx, escrow)?;
    require_not_finalized(escrow)?;
    require!(ctx.now >= escrow.end_date, ErrorCode::DeadlineNotReached);
    require!(
        prompt_hash == escrow.prompt_hash,
        ErrorCode::PromptHashMismatch
    );

    let route = if success {
        FinalizeRoute::Verified
    } else {
        FinalizeRoute::Refuted
    };

    finalize(ctx, escrow, route)
}
