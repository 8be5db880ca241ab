use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::config::EscrowConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CampaignStatus {
    #[default]
    Draft, // Created by the factory, bond held but not yet in the pool
    Active,   // Approved by the creator and accepting contributions
    Complete, // Finalized: verified success
    Failed,   // Finalized: verified failure or emergency timeout
    Disputed, // Open, but dispute stake crossed the threshold
}

impl CampaignStatus {
    /// Accepting pledges, vouches and disputes (subject to time guards).
    pub fn is_open(&self) -> bool {
        matches!(self, CampaignStatus::Active | CampaignStatus::Disputed)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, CampaignStatus::Complete | CampaignStatus::Failed)
    }
}

/// How a ledger reached its terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FinalizeRoute {
    /// Oracle verified the campaign succeeded
    Verified,
    /// Oracle verified the campaign failed; fraud is flagged
    Refuted,
    /// Nobody verified within the grace period; no fraud determination
    EmergencyTimeout,
}

impl FinalizeRoute {
    pub fn is_success(&self) -> bool {
        matches!(self, FinalizeRoute::Verified)
    }

    pub fn flags_fraud(&self) -> bool {
        matches!(self, FinalizeRoute::Refuted)
    }
}

/// Settlement role a claim is made under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClaimRole {
    Creator,
    Pledger,
    Voucher,
    Disputer,
    Treasury,
}

/// The per-campaign ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PledgeEscrowV0 {
    /// Campaign id assigned by the factory.
    pub id: u64,

    /// Custody address holding the escrow's token balance.
    pub address: Address,

    pub creator: Address,
    pub treasury: Address,
    pub oracle: Address,

    pub status: CampaignStatus,

    /// Unix timestamp after which pledges and vouches are rejected.
    pub end_date: i64,

    /// Informational target. Not enforced as a cap.
    pub fundraising_goal: u64,

    pub creator_bond: u64,

    /// Commitment to the verification criteria the oracle must match.
    pub prompt_hash: [u8; 32],

    /// Stored, never interpreted by the ledger.
    pub privacy_mode: bool,

    pub config: EscrowConfig,

    pub created_at: i64,
    pub approved_at: Option<i64>,

    pub amount_pledged: u64,
    pub total_vouched: u64,
    pub total_disputed: u64,

    pub pledges: BTreeMap<Address, u64>,
    pub vouchers: BTreeMap<Address, u64>,
    pub disputers: BTreeMap<Address, u64>,

    /// Latest reason given by each disputer.
    pub dispute_reasons: BTreeMap<Address, String>,

    /// Set once dispute stake strictly exceeds the threshold. Never cleared.
    pub is_disputed: bool,

    pub snapshot_taken: bool,
    pub snapshot_pledged: u64,

    /// Principal currently deposited in the yield pool.
    pub deposited_principal: u64,

    pub finalized: bool,
    pub finalize_route: Option<FinalizeRoute>,
    pub outcome_success: bool,
    pub fraud_flagged: bool,
    pub finalized_at: Option<i64>,

    /// Amount the pool returned above the deposited principal.
    pub yield_accrued: u64,

    /// Fee, forfeits, slashes and yield owed to the treasury once finalized.
    pub treasury_entitlement: u64,

    pub creator_claimed: bool,
    pub treasury_claimed: bool,
    pub settled_pledgers: BTreeSet<Address>,
    pub settled_vouchers: BTreeSet<Address>,
    pub settled_disputers: BTreeSet<Address>,

    /// Sum of every payout made from this escrow.
    pub total_released: u64,
}

impl PledgeEscrowV0 {
    pub fn pledge_of(&self, address: &Address) -> u64 {
        self.pledges.get(address).copied().unwrap_or(0)
    }

    pub fn vouch_of(&self, address: &Address) -> u64 {
        self.vouchers.get(address).copied().unwrap_or(0)
    }

    pub fn dispute_of(&self, address: &Address) -> u64 {
        self.disputers.get(address).copied().unwrap_or(0)
    }

    /// Denominator for the dispute threshold: the frozen snapshot once taken,
    /// the live pledged total before that.
    pub fn dispute_denominator(&self) -> u64 {
        if self.snapshot_taken {
            self.snapshot_pledged
        } else {
            self.amount_pledged
        }
    }

    pub fn info(&self) -> CampaignInfo {
        CampaignInfo {
            id: self.id,
            address: self.address,
            creator: self.creator,
            treasury: self.treasury,
            oracle: self.oracle,
            status: self.status,
            end_date: self.end_date,
            fundraising_goal: self.fundraising_goal,
            creator_bond: self.creator_bond,
            prompt_hash: hex::encode(self.prompt_hash),
            privacy_mode: self.privacy_mode,
            amount_pledged: self.amount_pledged,
            total_vouched: self.total_vouched,
            total_disputed: self.total_disputed,
            pledger_count: self.pledges.len(),
            voucher_count: self.vouchers.len(),
            disputer_count: self.disputers.len(),
            is_disputed: self.is_disputed,
            snapshot_taken: self.snapshot_taken,
            snapshot_pledged: self.snapshot_pledged,
            finalized: self.finalized,
            finalize_route: self.finalize_route,
            outcome_success: self.outcome_success,
            fraud_flagged: self.fraud_flagged,
            yield_accrued: self.yield_accrued,
            treasury_entitlement: self.treasury_entitlement,
            total_released: self.total_released,
        }
    }
}

/// Read-only summary of a ledger, for display layers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignInfo {
    pub id: u64,
    pub address: Address,
    pub creator: Address,
    pub treasury: Address,
    pub oracle: Address,
    pub status: CampaignStatus,
    pub end_date: i64,
    pub fundraising_goal: u64,
    pub creator_bond: u64,
    pub prompt_hash: String,
    pub privacy_mode: bool,
    pub amount_pledged: u64,
    pub total_vouched: u64,
    pub total_disputed: u64,
    pub pledger_count: usize,
    pub voucher_count: usize,
    pub disputer_count: usize,
    pub is_disputed: bool,
    pub snapshot_taken: bool,
    pub snapshot_pledged: u64,
    pub finalized: bool,
    pub finalize_route: Option<FinalizeRoute>,
    pub outcome_success: bool,
    pub fraud_flagged: bool,
    pub yield_accrued: u64,
    pub treasury_entitlement: u64,
    pub total_released: u64,
}
