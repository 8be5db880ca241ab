use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use pledge_escrow::{
    find_escrow_address, handle_initialize_campaign, Address, CampaignCreated, Context,
    EscrowConfig, EventLog, InitializeCampaignArgs, PledgeEscrowV0, TokenLedger, YieldPool,
};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

use crate::clock::Clock;
use crate::config::validate_escrow_config;
use crate::error::{FactoryError, FactoryResult};
use crate::handle::EscrowHandle;

/// Fixed parameters of a factory deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactorySettings {
    /// Identity that pulls creator bonds (the spender creators approve).
    pub address: Address,
    /// Receives fees, forfeits, slashes and yield of every campaign.
    pub treasury: Address,
    /// Sole identity allowed to deliver verdicts.
    pub oracle: Address,
    /// Copied onto every ledger at creation.
    #[serde(default)]
    pub config: EscrowConfig,
}

/// Inputs of [`CampaignFactory::create_campaign`]. The caller is the creator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateCampaignArgs {
    pub end_date: i64,
    pub prompt_hash: [u8; 32],
    pub fundraising_goal: u64,
    pub bond_amount: u64,
    #[serde(default)]
    pub privacy_mode: bool,
}

/// Collaborators shared by the factory and every handle it hands out.
pub(crate) struct FactoryShared {
    pub(crate) settings: FactorySettings,
    pub(crate) token: Arc<dyn TokenLedger>,
    pub(crate) yield_pool: Arc<dyn YieldPool>,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) events: Arc<EventLog>,
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    escrows: BTreeMap<u64, Arc<Mutex<PledgeEscrowV0>>>,
    by_creator: HashMap<Address, Vec<u64>>,
}

/// Creates campaigns and owns the arena of per-campaign ledgers.
pub struct CampaignFactory {
    shared: Arc<FactoryShared>,
    registry: RwLock<Registry>,
}

impl CampaignFactory {
    pub fn new(
        settings: FactorySettings,
        token: Arc<dyn TokenLedger>,
        yield_pool: Arc<dyn YieldPool>,
        clock: Arc<dyn Clock>,
    ) -> FactoryResult<Self> {
        Self::with_event_log(settings, token, yield_pool, clock, Arc::new(EventLog::new()))
    }

    pub fn with_event_log(
        settings: FactorySettings,
        token: Arc<dyn TokenLedger>,
        yield_pool: Arc<dyn YieldPool>,
        clock: Arc<dyn Clock>,
        events: Arc<EventLog>,
    ) -> FactoryResult<Self> {
        validate_escrow_config(&settings.config)?;

        info!(
            factory = %settings.address,
            treasury = %settings.treasury,
            oracle = %settings.oracle,
            "campaign factory deployed"
        );

        Ok(Self {
            shared: Arc::new(FactoryShared {
                settings,
                token,
                yield_pool,
                clock,
                events,
            }),
            registry: RwLock::new(Registry {
                next_id: 1,
                ..Default::default()
            }),
        })
    }

    /// Open a new campaign for `creator` and pull its bond.
    ///
    /// The creator must have approved the factory address for at least
    /// `bond_amount`. Ids are sequential from 1; a rejected creation does
    /// not consume one.
    pub async fn create_campaign(
        &self,
        creator: Address,
        args: CreateCampaignArgs,
    ) -> FactoryResult<u64> {
        let mut registry = self.registry.write().await;
        let shared = &self.shared;

        let id = registry.next_id;
        let address = find_escrow_address(&shared.settings.address, id);
        let ctx = Context::new(
            creator,
            shared.clock.now(),
            shared.token.as_ref(),
            shared.yield_pool.as_ref(),
            shared.events.as_ref(),
        );

        let escrow = handle_initialize_campaign(
            &ctx,
            InitializeCampaignArgs {
                id,
                address,
                treasury: shared.settings.treasury,
                oracle: shared.settings.oracle,
                end_date: args.end_date,
                prompt_hash: args.prompt_hash,
                fundraising_goal: args.fundraising_goal,
                bond_amount: args.bond_amount,
                privacy_mode: args.privacy_mode,
                config: shared.settings.config.clone(),
            },
        )
        .map_err(|err| {
            debug!(creator = %creator, error = %err, "campaign creation rejected");
            FactoryError::from(err)
        })?;

        shared
            .token
            .transfer_from(&shared.settings.address, &creator, &address, args.bond_amount)
            .map_err(|err| {
                debug!(creator = %creator, error = %err, "bond transfer rejected");
                FactoryError::from(pledge_escrow::EscrowError::from(err))
            })?;

        registry.next_id += 1;
        registry
            .escrows
            .insert(id, Arc::new(Mutex::new(escrow)));
        registry.by_creator.entry(creator).or_default().push(id);

        ctx.emit(CampaignCreated {
            campaign_id: id,
            escrow: address,
            creator,
            end_date: args.end_date,
            fundraising_goal: args.fundraising_goal,
            bond_amount: args.bond_amount,
            privacy_mode: args.privacy_mode,
            created_at: ctx.now,
        });

        Ok(id)
    }

    pub async fn campaign(&self, id: u64) -> FactoryResult<EscrowHandle> {
        let registry = self.registry.read().await;
        let escrow = registry
            .escrows
            .get(&id)
            .cloned()
            .ok_or(FactoryError::CampaignNotFound(id))?;

        Ok(EscrowHandle::new(
            id,
            find_escrow_address(&self.shared.settings.address, id),
            escrow,
            self.shared.clone(),
        ))
    }

    pub async fn campaign_count(&self) -> usize {
        self.registry.read().await.escrows.len()
    }

    pub async fn campaign_ids(&self) -> Vec<u64> {
        self.registry.read().await.escrows.keys().copied().collect()
    }

    /// Ids of campaigns opened by `creator`, in creation order.
    pub async fn campaigns_by_creator(&self, creator: &Address) -> Vec<u64> {
        self.registry
            .read()
            .await
            .by_creator
            .get(creator)
            .cloned()
            .unwrap_or_default()
    }

    pub fn address(&self) -> Address {
        self.shared.settings.address
    }

    pub fn treasury(&self) -> Address {
        self.shared.settings.treasury
    }

    pub fn oracle(&self) -> Address {
        self.shared.settings.oracle
    }

    pub fn config(&self) -> &EscrowConfig {
        &self.shared.settings.config
    }

    pub fn now(&self) -> i64 {
        self.shared.clock.now()
    }

    pub fn events(&self) -> Arc<EventLog> {
        self.shared.events.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use pledge_escrow::{
        find_actor_address, prompt_hash, CampaignStatus, ErrorCode, EscrowEvent,
        InMemoryYieldPool, TokenBank, ONE_USDC,
    };
    use tokio_test::{assert_err, assert_ok};

    const START: i64 = 1_750_000_000;

    struct Deployment {
        factory: CampaignFactory,
        token: Arc<TokenBank>,
        pool: Arc<InMemoryYieldPool>,
        clock: Arc<ManualClock>,
    }

    fn deploy() -> Deployment {
        let token = Arc::new(TokenBank::new());
        let pool = Arc::new(InMemoryYieldPool::new(
            find_actor_address("pool"),
            token.clone(),
        ));
        let clock = Arc::new(ManualClock::new(START));
        let factory = CampaignFactory::new(
            FactorySettings {
                address: find_actor_address("factory"),
                treasury: find_actor_address("treasury"),
                oracle: find_actor_address("oracle"),
                config: EscrowConfig::default(),
            },
            token.clone(),
            pool.clone(),
            clock.clone(),
        )
        .unwrap();

        Deployment {
            factory,
            token,
            pool,
            clock,
        }
    }

    fn args(end_date: i64) -> CreateCampaignArgs {
        CreateCampaignArgs {
            end_date,
            prompt_hash: prompt_hash("ship it"),
            fundraising_goal: 1_000 * ONE_USDC,
            bond_amount: 10 * ONE_USDC,
            privacy_mode: false,
        }
    }

    fn fund_bond(d: &Deployment, creator: &Address, amount: u64) {
        d.token.mint(creator, amount).unwrap();
        d.token
            .approve(creator, &d.factory.address(), amount)
            .unwrap();
    }

    #[tokio::test]
    async fn test_create_campaign_pulls_bond_into_escrow() {
        let d = deploy();
        let creator = find_actor_address("creator");
        fund_bond(&d, &creator, 10 * ONE_USDC);

        let id = assert_ok!(d.factory.create_campaign(creator, args(START + 7 * 86_400)).await);
        assert_eq!(id, 1);

        let handle = d.factory.campaign(id).await.unwrap();
        assert_eq!(handle.address(), find_escrow_address(&d.factory.address(), 1));
        assert_eq!(d.token.balance_of(&handle.address()), 10 * ONE_USDC);
        assert_eq!(d.token.balance_of(&creator), 0);

        let info = handle.info().await;
        assert_eq!(info.status, CampaignStatus::Draft);
        assert_eq!(info.creator, creator);

        let events = d.factory.events().all();
        assert!(matches!(events.as_slice(), [EscrowEvent::CampaignCreated(e)] if e.campaign_id == 1));
    }

    #[tokio::test]
    async fn test_rejected_creation_does_not_consume_id() {
        let d = deploy();
        let creator = find_actor_address("creator");

        // No allowance yet
        let err = assert_err!(d.factory.create_campaign(creator, args(START + 7 * 86_400)).await);
        assert!(matches!(err, FactoryError::Escrow(_)));
        assert_eq!(d.factory.campaign_count().await, 0);

        // Too short
        fund_bond(&d, &creator, 10 * ONE_USDC);
        let err = assert_err!(d.factory.create_campaign(creator, args(START + 60)).await);
        assert_eq!(err.code(), Some(ErrorCode::DurationTooShort));

        let id = d
            .factory
            .create_campaign(creator, args(START + 7 * 86_400))
            .await
            .unwrap();
        assert_eq!(id, 1);
        assert_eq!(d.factory.campaigns_by_creator(&creator).await, vec![1]);
    }

    #[tokio::test]
    async fn test_unknown_campaign() {
        let d = deploy();
        let err = d.factory.campaign(42).await.unwrap_err();
        assert!(matches!(err, FactoryError::CampaignNotFound(42)));
    }

    #[tokio::test]
    async fn test_handle_operations_use_factory_clock() {
        let d = deploy();
        let creator = find_actor_address("creator");
        fund_bond(&d, &creator, 10 * ONE_USDC);
        let end_date = START + 7 * 86_400;
        let id = d.factory.create_campaign(creator, args(end_date)).await.unwrap();
        let handle = d.factory.campaign(id).await.unwrap();

        d.clock.set(end_date);
        let err = handle.approve_campaign(creator).await.unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::PastDeadline));

        d.clock.set(end_date - 1);
        assert_ok!(handle.approve_campaign(creator).await);
        assert_eq!(handle.info().await.status, CampaignStatus::Active);
    }

    #[tokio::test]
    async fn test_rejected_handle_operation_leaves_ledger_untouched() {
        let d = deploy();
        let creator = find_actor_address("creator");
        let pledger = find_actor_address("pledger");
        fund_bond(&d, &creator, 10 * ONE_USDC);
        let id = d
            .factory
            .create_campaign(creator, args(START + 7 * 86_400))
            .await
            .unwrap();
        let handle = d.factory.campaign(id).await.unwrap();
        assert_ok!(handle.approve_campaign(creator).await);

        d.token.mint(&pledger, 50 * ONE_USDC).unwrap();
        d.token
            .approve(&pledger, &handle.address(), 50 * ONE_USDC)
            .unwrap();
        assert_ok!(handle.pledge(pledger, 20 * ONE_USDC).await);

        let before = handle.ledger().await;
        d.pool.set_fail_deposits(true);
        let err = assert_err!(handle.pledge(pledger, 30 * ONE_USDC).await);
        assert_eq!(err.kind(), Some(pledge_escrow::ErrorKind::Custody));
        assert_eq!(handle.ledger().await, before);
        assert_eq!(d.token.balance_of(&pledger), 30 * ONE_USDC);

        let err = assert_err!(handle.claim_creator(creator).await);
        assert_eq!(err.code(), Some(ErrorCode::NotFinalized));
        assert_eq!(handle.ledger().await, before);

        d.pool.set_fail_deposits(false);
        assert_ok!(handle.pledge(pledger, 30 * ONE_USDC).await);
        assert_eq!(handle.pledge_of(&pledger).await, 50 * ONE_USDC);
    }

    #[test]
    fn test_invalid_config_rejected_at_deploy() {
        let token = Arc::new(TokenBank::new());
        let pool = Arc::new(InMemoryYieldPool::new(
            find_actor_address("pool"),
            token.clone(),
        ));
        let result = CampaignFactory::new(
            FactorySettings {
                address: find_actor_address("factory"),
                treasury: find_actor_address("treasury"),
                oracle: find_actor_address("oracle"),
                config: EscrowConfig {
                    slash_bps: 20_000,
                    ..EscrowConfig::default()
                },
            },
            token,
            pool,
            Arc::new(ManualClock::new(START)),
        );
        assert!(matches!(result, Err(FactoryError::Config(_))));
    }
}
