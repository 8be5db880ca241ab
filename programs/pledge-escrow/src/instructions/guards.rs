use crate::context::Context;
use crate::error::{ErrorCode, Result};
use crate::require;
use crate::state::PledgeEscrowV0;

pub(crate) fn require_creator(ctx: &Context<'_>, escrow: &PledgeEscrowV0) -> Result<()> {
    require!(ctx.signer == escrow.creator, ErrorCode::NotCreator);
    Ok(())
}

pub(crate) fn require_oracle(ctx: &Context<'_>, escrow: &PledgeEscrowV0) -> Result<()> {
    require!(ctx.signer == escrow.oracle, ErrorCode::NotOracle);
    Ok(())
}

pub(crate) fn require_treasury(ctx: &Context<'_>, escrow: &PledgeEscrowV0) -> Result<()> {
    require!(ctx.signer == escrow.treasury, ErrorCode::NotTreasury);
    Ok(())
}

pub(crate) fn require_finalized(escrow: &PledgeEscrowV0) -> Result<()> {
    require!(escrow.finalized, ErrorCode::NotFinalized);
    Ok(())
}

pub(crate) fn require_not_finalized(escrow: &PledgeEscrowV0) -> Result<()> {
    require!(!escrow.finalized, ErrorCode::AlreadyFinalized);
    Ok(())
}
