use std::sync::Arc;

use pledge_escrow::{
    handle_approve_campaign, handle_claim_creator, handle_claim_disputer, handle_claim_pledger,
    handle_claim_treasury, handle_claim_voucher, handle_dispute, handle_emergency_finalize,
    handle_pledge, handle_verify_and_release, handle_vouch, outstanding_entitlements, Address,
    CampaignInfo, ClaimRole, Context, PledgeEscrowV0,
};
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::FactoryResult;
use crate::factory::FactoryShared;

/// Async entry points for one campaign's ledger.
///
/// Handles are cheap to clone. Every operation holds the campaign's lock for
/// its whole duration, so operations on one campaign are serialized while
/// different campaigns proceed independently.
#[derive(Clone)]
pub struct EscrowHandle {
    id: u64,
    address: Address,
    escrow: Arc<Mutex<PledgeEscrowV0>>,
    shared: Arc<FactoryShared>,
}

impl EscrowHandle {
    pub(crate) fn new(
        id: u64,
        address: Address,
        escrow: Arc<Mutex<PledgeEscrowV0>>,
        shared: Arc<FactoryShared>,
    ) -> Self {
        Self {
            id,
            address,
            escrow,
            shared,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Custody address of this campaign's ledger.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Run a handler against the locked ledger. Handlers leave the ledger
    /// untouched when they reject.
    async fn execute<T>(
        &self,
        signer: Address,
        operation: &'static str,
        handler: impl FnOnce(&Context<'_>, &mut PledgeEscrowV0) -> pledge_escrow::Result<T>,
    ) -> FactoryResult<T> {
        let mut escrow = self.escrow.lock().await;
        let ctx = Context::new(
            signer,
            self.shared.clock.now(),
            self.shared.token.as_ref(),
            self.shared.yield_pool.as_ref(),
            self.shared.events.as_ref(),
        );

        handler(&ctx, &mut *escrow).map_err(|err| {
            debug!(
                campaign_id = self.id,
                operation,
                signer = %signer,
                now = ctx.now,
                error = %err,
                "operation rejected"
            );
            err.into()
        })
    }

    pub async fn approve_campaign(&self, signer: Address) -> FactoryResult<()> {
        self.execute(signer, "approve_campaign", handle_approve_campaign)
            .await
    }

    pub async fn pledge(&self, signer: Address, amount: u64) -> FactoryResult<()> {
        self.execute(signer, "pledge", |ctx, escrow| {
            handle_pledge(ctx, escrow, amount)
        })
        .await
    }

    pub async fn vouch(&self, signer: Address, amount: u64) -> FactoryResult<()> {
        self.execute(signer, "vouch", |ctx, escrow| {
            handle_vouch(ctx, escrow, amount)
        })
        .await
    }

    pub async fn dispute(
        &self,
        signer: Address,
        amount: u64,
        reason: impl Into<String>,
    ) -> FactoryResult<()> {
        let reason = reason.into();
        self.execute(signer, "dispute", |ctx, escrow| {
            handle_dispute(ctx, escrow, amount, reason)
        })
        .await
    }

    /// Oracle verdict. See [`handle_verify_and_release`].
    pub async fn verify_and_release(
        &self,
        signer: Address,
        success: bool,
        prompt_hash: [u8; 32],
    ) -> FactoryResult<()> {
        self.execute(signer, "verify_and_release", |ctx, escrow| {
            handle_verify_and_release(ctx, escrow, success, prompt_hash)
        })
        .await
    }

    pub async fn emergency_finalize(&self, signer: Address) -> FactoryResult<()> {
        self.execute(signer, "emergency_finalize", handle_emergency_finalize)
            .await
    }

    pub async fn claim_creator(&self, signer: Address) -> FactoryResult<u64> {
        self.execute(signer, "claim_creator", handle_claim_creator)
            .await
    }

    pub async fn claim_pledger(&self, signer: Address) -> FactoryResult<u64> {
        self.execute(signer, "claim_pledger", handle_claim_pledger)
            .await
    }

    pub async fn claim_voucher(&self, signer: Address) -> FactoryResult<u64> {
        self.execute(signer, "claim_voucher", handle_claim_voucher)
            .await
    }

    pub async fn claim_disputer(&self, signer: Address) -> FactoryResult<u64> {
        self.execute(signer, "claim_disputer", handle_claim_disputer)
            .await
    }

    pub async fn claim_treasury(&self, signer: Address) -> FactoryResult<u64> {
        self.execute(signer, "claim_treasury", handle_claim_treasury)
            .await
    }

    /// Claim under `role`, returning the amount paid out.
    pub async fn claim(&self, signer: Address, role: ClaimRole) -> FactoryResult<u64> {
        match role {
            ClaimRole::Creator => self.claim_creator(signer).await,
            ClaimRole::Pledger => self.claim_pledger(signer).await,
            ClaimRole::Voucher => self.claim_voucher(signer).await,
            ClaimRole::Disputer => self.claim_disputer(signer).await,
            ClaimRole::Treasury => self.claim_treasury(signer).await,
        }
    }

    pub async fn info(&self) -> CampaignInfo {
        self.escrow.lock().await.info()
    }

    /// Copy of the full ledger state.
    pub async fn ledger(&self) -> PledgeEscrowV0 {
        self.escrow.lock().await.clone()
    }

    /// Sum still payable to all parties. Only defined once finalized.
    pub async fn outstanding_entitlements(&self) -> FactoryResult<u64> {
        let escrow = self.escrow.lock().await;
        Ok(outstanding_entitlements(&escrow)?)
    }

    pub async fn pledge_of(&self, pledger: &Address) -> u64 {
        self.escrow.lock().await.pledge_of(pledger)
    }

    pub async fn vouch_of(&self, voucher: &Address) -> u64 {
        self.escrow.lock().await.vouch_of(voucher)
    }

    pub async fn dispute_of(&self, disputer: &Address) -> u64 {
        self.escrow.lock().await.dispute_of(disputer)
    }
}

impl std::fmt::Debug for EscrowHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EscrowHandle")
            .field("id", &self.id)
            .field("address", &self.address)
            .finish()
    }
}
