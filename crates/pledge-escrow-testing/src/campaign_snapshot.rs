use std::collections::BTreeMap;

use pledge_escrow::{Address, CampaignStatus, PledgeEscrowV0, TokenLedger, YieldPool};

use crate::TestFixture;

/// Campaign state captured for before/after comparisons
///
/// Captures the full ledger, the escrow's token balance and pool position,
/// the treasury balance, and optionally the balances of specific actors.
/// Two snapshots compare equal only if nothing observable changed, which is
/// how failure tests assert that a rejected operation had no effect.
#[derive(Debug, Clone, PartialEq)]
pub struct CampaignSnapshot {
    pub ledger: Option<PledgeEscrowV0>,
    pub escrow_balance: u64,
    pub pool_position: u64,
    pub treasury_balance: u64,
    pub tracked_balances: BTreeMap<Address, u64>,
}

impl CampaignSnapshot {
    pub async fn capture_all(test: &TestFixture) -> Self {
        let (ledger, escrow_balance, pool_position) = match test.campaign_id {
            Some(_) => {
                let escrow = test.escrow_address();
                (
                    Some(test.ledger().await),
                    test.token.balance_of(&escrow),
                    test.yield_pool.position_of(&escrow),
                )
            }
            None => (None, 0, 0),
        };

        Self {
            ledger,
            escrow_balance,
            pool_position,
            treasury_balance: test.token.balance_of(&test.treasury()),
            tracked_balances: BTreeMap::new(),
        }
    }

    /// Capture state plus the token balances of `actors`
    pub async fn capture_with_actors(test: &TestFixture, actors: &[Address]) -> Self {
        let mut snapshot = Self::capture_all(test).await;
        for actor in actors {
            snapshot
                .tracked_balances
                .insert(*actor, test.token.balance_of(actor));
        }
        snapshot
    }

    pub fn status(&self) -> Option<CampaignStatus> {
        self.ledger.as_ref().map(|ledger| ledger.status)
    }

    /// Escrow balance plus pool position
    pub fn total_custodied(&self) -> u64 {
        self.escrow_balance + self.pool_position
    }

    pub fn balance_of(&self, actor: &Address) -> u64 {
        self.tracked_balances.get(actor).copied().unwrap_or(0)
    }
}
