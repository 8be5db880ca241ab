use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::constants::BPS_DENOMINATOR;
use crate::context::Context;
use crate::error::{ErrorCode, Result};
use crate::require;
use crate::state::{ClaimRole, FinalizeRoute, PledgeEscrowV0};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claimed {
    pub campaign_id: u64,
    pub role: ClaimRole,
    pub claimant: Address,
    pub amount: u64,
}

/// `amount * bps / 10_000`, rounded down.
pub fn apply_bps(amount: u64, bps: u64) -> Result<u64> {
    let scaled = u128::from(amount) * u128::from(bps) / u128::from(BPS_DENOMINATOR);
    u64::try_from(scaled).map_err(|_| ErrorCode::NumericOverflow.into())
}

pub fn treasury_fee(escrow: &PledgeEscrowV0) -> Result<u64> {
    apply_bps(escrow.amount_pledged, escrow.config.fee_bps)
}

/// Portion of a stake that is forfeited when slashed.
pub fn slashed_portion(escrow: &PledgeEscrowV0, stake: u64) -> Result<u64> {
    apply_bps(stake, escrow.config.slash_bps)
}

fn sum_slashes<'a>(escrow: &PledgeEscrowV0, mut stakes: impl Iterator<Item = &'a u64>) -> Result<u64> {
    stakes.try_fold(0u64, |acc, stake| -> Result<u64> {
        acc.checked_add(slashed_portion(escrow, *stake)?)
            .ok_or_else(|| ErrorCode::NumericOverflow.into())
    })
}

/// Treasury share fixed at finalization, before yield is added.
///
/// Verified: fee plus the slashed half of every dispute.
/// Refuted: forfeited bond plus the slashed half of every vouch.
/// Emergency timeout: forfeited bond only.
pub fn treasury_settlement(escrow: &PledgeEscrowV0, route: FinalizeRoute) -> Result<u64> {
    let (base, slashes) = match route {
        FinalizeRoute::Verified => (
            treasury_fee(escrow)?,
            sum_slashes(escrow, escrow.disputers.values())?,
        ),
        FinalizeRoute::Refuted => (
            escrow.creator_bond,
            sum_slashes(escrow, escrow.vouchers.values())?,
        ),
        FinalizeRoute::EmergencyTimeout => (escrow.creator_bond, 0),
    };
    base.checked_add(slashes)
        .ok_or_else(|| ErrorCode::NumericOverflow.into())
}

/// Pledged total plus bond, less the treasury fee. Zero unless succeeded.
pub fn creator_payout(escrow: &PledgeEscrowV0) -> Result<u64> {
    if !escrow.outcome_success {
        return Ok(0);
    }
    let gross = escrow
        .amount_pledged
        .checked_add(escrow.creator_bond)
        .ok_or(ErrorCode::NumericOverflow)?;
    gross
        .checked_sub(treasury_fee(escrow)?)
        .ok_or_else(|| ErrorCode::NumericOverflow.into())
}

/// Full refund of a pledge. Zero unless failed.
pub fn pledger_payout(escrow: &PledgeEscrowV0, stake: u64) -> u64 {
    if escrow.outcome_success {
        0
    } else {
        stake
    }
}

/// Full refund, less the slash when fraud was flagged.
pub fn voucher_payout(escrow: &PledgeEscrowV0, stake: u64) -> Result<u64> {
    if escrow.fraud_flagged {
        Ok(stake - slashed_portion(escrow, stake)?)
    } else {
        Ok(stake)
    }
}

/// Full refund, less the slash when the campaign succeeded (frivolous dispute).
pub fn disputer_payout(escrow: &PledgeEscrowV0, stake: u64) -> Result<u64> {
    if escrow.outcome_success {
        Ok(stake - slashed_portion(escrow, stake)?)
    } else {
        Ok(stake)
    }
}

/// Sum of every payout still claimable from a finalized ledger.
pub fn outstanding_entitlements(escrow: &PledgeEscrowV0) -> Result<u64> {
    require!(escrow.finalized, ErrorCode::NotFinalized);

    let mut total: u64 = 0;
    let mut add = |amount: u64| -> Result<()> {
        total = total
            .checked_add(amount)
            .ok_or(ErrorCode::NumericOverflow)?;
        Ok(())
    };

    if !escrow.creator_claimed {
        add(creator_payout(escrow)?)?;
    }
    if !escrow.treasury_claimed {
        add(escrow.treasury_entitlement)?;
    }
    for (pledger, stake) in &escrow.pledges {
        if !escrow.settled_pledgers.contains(pledger) {
            add(pledger_payout(escrow, *stake))?;
        }
    }
    for (voucher, stake) in &escrow.vouchers {
        if !escrow.settled_vouchers.contains(voucher) {
            add(voucher_payout(escrow, *stake)?)?;
        }
    }
    for (disputer, stake) in &escrow.disputers {
        if !escrow.settled_disputers.contains(disputer) {
            add(disputer_payout(escrow, *stake)?)?;
        }
    }

    Ok(total)
}

/// Pay `amount` from custody to the signer and record it.
pub(crate) fn release(ctx: &Context<'_>, escrow: &mut PledgeEscrowV0, amount: u64) -> Result<()> {
    let total_released = escrow
        .total_released
        .checked_add(amount)
        .ok_or(ErrorCode::NumericOverflow)?;
    ctx.token.transfer(&escrow.address, &ctx.signer, amount)?;
    escrow.total_released = total_released;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::address::find_actor_address;
    use crate::config::EscrowConfig;
    use crate::constants::ONE_USDC;
    use crate::instructions::{handle_initialize_campaign, InitializeCampaignArgs};
    use crate::{EventLog, InMemoryYieldPool, TokenBank};

    fn finalized_escrow(route: FinalizeRoute) -> PledgeEscrowV0 {
        let token = TokenBank::new();
        let pool = InMemoryYieldPool::new(find_actor_address("pool"), Arc::new(TokenBank::new()));
        let events = EventLog::new();
        let ctx = Context::new(find_actor_address("creator"), 0, &token, &pool, &events);

        let mut escrow = handle_initialize_campaign(
            &ctx,
            InitializeCampaignArgs {
                id: 1,
                address: find_actor_address("escrow"),
                treasury: find_actor_address("treasury"),
                oracle: find_actor_address("oracle"),
                end_date: 7 * 86_400,
                prompt_hash: [7; 32],
                fundraising_goal: 1_000 * ONE_USDC,
                bond_amount: 10 * ONE_USDC,
                privacy_mode: false,
                config: EscrowConfig::default(),
            },
        )
        .unwrap();

        escrow.pledges.insert(find_actor_address("pledger"), 100 * ONE_USDC);
        escrow.amount_pledged = 100 * ONE_USDC;
        escrow.vouchers.insert(find_actor_address("voucher"), 20 * ONE_USDC);
        escrow.total_vouched = 20 * ONE_USDC;
        escrow.disputers.insert(find_actor_address("disputer"), 5 * ONE_USDC);
        escrow.total_disputed = 5 * ONE_USDC;

        escrow.finalized = true;
        escrow.finalize_route = Some(route);
        escrow.outcome_success = route.is_success();
        escrow.fraud_flagged = route.flags_fraud();
        escrow.treasury_entitlement = treasury_settlement(&escrow, route).unwrap();
        escrow
    }

    fn custodied(escrow: &PledgeEscrowV0) -> u64 {
        escrow.creator_bond + escrow.amount_pledged + escrow.total_vouched + escrow.total_disputed
    }

    #[test]
    fn test_apply_bps() {
        assert_eq!(apply_bps(100 * ONE_USDC, 100).unwrap(), ONE_USDC);
        assert_eq!(apply_bps(5 * ONE_USDC, 5_000).unwrap(), 2_500_000);
        assert_eq!(apply_bps(3, 5_000).unwrap(), 1);
        assert_eq!(apply_bps(u64::MAX, 10_000).unwrap(), u64::MAX);
    }

    #[test]
    fn test_verified_settlement() {
        let escrow = finalized_escrow(FinalizeRoute::Verified);

        assert_eq!(creator_payout(&escrow).unwrap(), 109 * ONE_USDC);
        assert_eq!(pledger_payout(&escrow, 100 * ONE_USDC), 0);
        assert_eq!(voucher_payout(&escrow, 20 * ONE_USDC).unwrap(), 20 * ONE_USDC);
        assert_eq!(disputer_payout(&escrow, 5 * ONE_USDC).unwrap(), 2_500_000);
        // fee + slashed dispute half
        assert_eq!(escrow.treasury_entitlement, ONE_USDC + 2_500_000);
        assert_eq!(outstanding_entitlements(&escrow).unwrap(), custodied(&escrow));
    }

    #[test]
    fn test_refuted_settlement() {
        let escrow = finalized_escrow(FinalizeRoute::Refuted);

        assert_eq!(creator_payout(&escrow).unwrap(), 0);
        assert_eq!(pledger_payout(&escrow, 100 * ONE_USDC), 100 * ONE_USDC);
        assert_eq!(voucher_payout(&escrow, 20 * ONE_USDC).unwrap(), 10 * ONE_USDC);
        assert_eq!(disputer_payout(&escrow, 5 * ONE_USDC).unwrap(), 5 * ONE_USDC);
        // bond + slashed vouch half
        assert_eq!(escrow.treasury_entitlement, 20 * ONE_USDC);
        assert_eq!(outstanding_entitlements(&escrow).unwrap(), custodied(&escrow));
    }

    #[test]
    fn test_emergency_settlement_does_not_slash_vouchers() {
        let escrow = finalized_escrow(FinalizeRoute::EmergencyTimeout);

        assert_eq!(voucher_payout(&escrow, 20 * ONE_USDC).unwrap(), 20 * ONE_USDC);
        assert_eq!(escrow.treasury_entitlement, 10 * ONE_USDC);
        assert_eq!(outstanding_entitlements(&escrow).unwrap(), custodied(&escrow));
    }

    #[test]
    fn test_outstanding_excludes_settled_parties() {
        let mut escrow = finalized_escrow(FinalizeRoute::Refuted);
        let before = outstanding_entitlements(&escrow).unwrap();

        escrow.settled_pledgers.insert(find_actor_address("pledger"));
        assert_eq!(
            outstanding_entitlements(&escrow).unwrap(),
            before - 100 * ONE_USDC
        );
    }

    #[test]
    fn test_outstanding_requires_finalization() {
        let mut escrow = finalized_escrow(FinalizeRoute::Verified);
        escrow.finalized = false;
        assert_eq!(
            outstanding_entitlements(&escrow),
            Err(ErrorCode::NotFinalized.into())
        );
    }
}
