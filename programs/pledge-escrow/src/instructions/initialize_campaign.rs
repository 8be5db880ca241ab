use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::config::EscrowConfig;
use crate::context::Context;
use crate::error::{ErrorCode, Result};
use crate::require;
use crate::state::{CampaignStatus, PledgeEscrowV0};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitializeCampaignArgs {
    pub id: u64,
    pub address: Address,
    pub treasury: Address,
    pub oracle: Address,
    pub end_date: i64,
    pub prompt_hash: [u8; 32],
    pub fundraising_goal: u64,
    pub bond_amount: u64,
    pub privacy_mode: bool,
    pub config: EscrowConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignCreated {
    pub campaign_id: u64,
    pub escrow: Address,
    pub creator: Address,
    pub end_date: i64,
    pub fundraising_goal: u64,
    pub bond_amount: u64,
    pub privacy_mode: bool,
    pub created_at: i64,
}

/// Build a draft ledger for the signer as creator.
///
/// Moving the bond into the ledger's custody address is the caller's job
/// (the factory pulls it under the creator's approval).
pub fn handle_initialize_campaign(
    ctx: &Context<'_>,
    args: InitializeCampaignArgs,
) -> Result<PledgeEscrowV0> {
    args.config.validate()?;

    // Strictly beyond the minimum: exactly at the minimum is rejected
    let duration = args
        .end_date
        .checked_sub(ctx.now)
        .ok_or(ErrorCode::NumericOverflow)?;
    require!(
        duration > args.config.min_campaign_duration_secs,
        ErrorCode::DurationTooShort
    );

    require!(
        args.bond_amount >= args.config.min_bond,
        ErrorCode::BondBelowMinimum
    );

    Ok(PledgeEscrowV0 {
        id: args.id,
        address: args.address,
        creator: ctx.signer,
        treasury: args.treasury,
        oracle: args.oracle,
        status: CampaignStatus::Draft,
        end_date: args.end_date,
        fundraising_goal: args.fundraising_goal,
        creator_bond: args.bond_amount,
        prompt_hash: args.prompt_hash,
        privacy_mode: args.privacy_mode,
        config: args.config,
        created_at: ctx.now,
        approved_at: None,
        amount_pledged: 0,
        total_vouched: 0,
        total_disputed: 0,
        pledges: Default::default(),
        vouchers: Default::default(),
        disputers: Default::default(),
        dispute_reasons: Default::default(),
        is_disputed: false,
        snapshot_taken: false,
        snapshot_pledged: 0,
        deposited_principal: 0,
        finalized: false,
        finalize_route: None,
        outcome_success: false,
        fraud_flagged: false,
        finalized_at: None,
        yield_accrued: 0,
        treasury_entitlement: 0,
        creator_claimed: false,
        treasury_claimed: false,
        settled_pledgers: Default::default(),
        settled_vouchers: Default::default(),
        settled_disputers: Default::default(),
        total_released: 0,
    })
}
