use {
    crate::{
        deterministic_address, FixtureStage, TEST_CAMPAIGN_DURATION_SECS, TEST_CRITERIA,
        TEST_START_TIME,
    },
    pledge_escrow::{
        prompt_hash, Address, ClaimRole, EscrowConfig, EscrowEvent, InMemoryYieldPool,
        PledgeEscrowV0, TokenBank, TokenLedger, YieldPool, ONE_USDC,
    },
    pledge_escrow_factory::{
        CampaignFactory, CreateCampaignArgs, EscrowHandle, FactoryResult, FactorySettings,
        ManualClock,
    },
    std::sync::Arc,
};

pub const TEST_BOND_AMOUNT: u64 = 10 * ONE_USDC;
pub const TEST_FUNDRAISING_GOAL: u64 = 1_000 * ONE_USDC;
pub const TEST_PLEDGE_AMOUNT: u64 = 100 * ONE_USDC;
pub const TEST_VOUCH_AMOUNT: u64 = 20 * ONE_USDC;

/// Factory, in-memory token and pool, and a manual clock, plus one campaign
/// driven through [`FixtureStage`]s.
pub struct TestFixture {
    pub factory: CampaignFactory,
    pub token: Arc<TokenBank>,
    pub yield_pool: Arc<InMemoryYieldPool>,
    pub clock: Arc<ManualClock>,

    pub stage: FixtureStage,
    pub campaign_id: Option<u64>,
    pub criteria: String,
    pub end_date: i64,
    pub bond_amount: u64,
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl TestFixture {
    pub fn new() -> Self {
        Self::with_config(EscrowConfig::default())
    }

    pub fn with_config(config: EscrowConfig) -> Self {
        let token = Arc::new(TokenBank::new());
        let yield_pool = Arc::new(InMemoryYieldPool::new(
            deterministic_address("yield_pool"),
            token.clone(),
        ));
        let clock = Arc::new(ManualClock::new(TEST_START_TIME));

        let factory = CampaignFactory::new(
            FactorySettings {
                address: deterministic_address("factory"),
                treasury: deterministic_address("treasury"),
                oracle: deterministic_address("oracle"),
                config,
            },
            token.clone(),
            yield_pool.clone(),
            clock.clone(),
        )
        .unwrap_or_else(|e| panic!("Failed to deploy factory: {e}"));

        Self {
            factory,
            token,
            yield_pool,
            clock,
            stage: FixtureStage::FactoryDeployed,
            campaign_id: None,
            criteria: TEST_CRITERIA.to_string(),
            end_date: TEST_START_TIME + TEST_CAMPAIGN_DURATION_SECS,
            bond_amount: TEST_BOND_AMOUNT,
        }
    }

    pub fn creator(&self) -> Address {
        deterministic_address("creator")
    }

    pub fn treasury(&self) -> Address {
        self.factory.treasury()
    }

    pub fn oracle(&self) -> Address {
        self.factory.oracle()
    }

    pub fn prompt_hash(&self) -> [u8; 32] {
        prompt_hash(&self.criteria)
    }

    // ----- time -----

    pub fn now(&self) -> i64 {
        self.factory.now()
    }

    pub fn advance_time_by(&self, seconds: i64) {
        self.clock.advance(seconds);
    }

    pub fn warp_to(&self, timestamp: i64) {
        self.clock.set(timestamp);
    }

    pub fn warp_to_end_date(&self) {
        self.warp_to(self.end_date);
    }

    // ----- tokens -----

    pub fn mint_to(&self, to: &Address, amount: u64) {
        self.token
            .mint(to, amount)
            .unwrap_or_else(|e| panic!("Failed to mint {amount} to {to}: {e}"));
    }

    /// Mint `amount` to `who` and approve the campaign's escrow to pull it.
    pub fn fund(&self, who: &Address, amount: u64) {
        self.mint_to(who, amount);
        let escrow = self.escrow_address();
        let allowance = self.token.allowance(who, &escrow);
        self.token
            .approve(who, &escrow, allowance + amount)
            .unwrap_or_else(|e| panic!("Failed to approve escrow for {who}: {e}"));
    }

    pub fn balance_of(&self, who: &Address) -> u64 {
        self.token.balance_of(who)
    }

    // ----- campaign -----

    pub fn campaign_id(&self) -> u64 {
        self.campaign_id
            .expect("No campaign yet; jump_to(FixtureStage::CampaignCreated) first")
    }

    pub async fn campaign(&self) -> EscrowHandle {
        self.factory
            .campaign(self.campaign_id())
            .await
            .unwrap_or_else(|e| panic!("Failed to look up campaign: {e}"))
    }

    pub fn escrow_address(&self) -> Address {
        pledge_escrow::find_escrow_address(&self.factory.address(), self.campaign_id())
    }

    pub async fn ledger(&self) -> PledgeEscrowV0 {
        self.campaign().await.ledger().await
    }

    pub fn yield_pool_position(&self) -> u64 {
        self.yield_pool.position_of(&self.escrow_address())
    }

    /// Tokens held for the campaign: escrow balance plus pool position.
    pub fn custodied_balance(&self) -> u64 {
        let escrow = self.escrow_address();
        self.token.balance_of(&escrow) + self.yield_pool.position_of(&escrow)
    }

    pub fn events(&self) -> Vec<EscrowEvent> {
        self.factory.events().all()
    }

    // ----- stages -----

    pub async fn jump_to(&mut self, target_stage: FixtureStage) {
        let current_stage = self.stage.clone();
        let stages_to_step = FixtureStage::all()
            .iter()
            .filter(|s| **s > current_stage && **s <= target_stage)
            .cloned()
            .collect::<Vec<_>>();

        for stage in stages_to_step {
            self.step_to(stage).await;
        }
    }

    pub async fn step_to(&mut self, stage: FixtureStage) {
        match stage {
            FixtureStage::FactoryDeployed => return,
            FixtureStage::CampaignCreated => self.try_create_campaign().await.map(|_| ()),
            FixtureStage::CampaignApproved => self.try_approve_campaign().await,
            FixtureStage::ContributionsPlaced => self.try_place_contributions().await,
            FixtureStage::DeadlinePassed => {
                self.warp_to_end_date();
                Ok(())
            }
        }
        .unwrap_or_else(|e| panic!("Failed to advance to {:?}: {:?}", stage, e));

        println!("✅ Fixture at {:?} (now = {})", stage, self.now());
        self.stage = stage;
    }

    /// Create the fixture campaign with the creator funding the bond.
    pub async fn try_create_campaign(&mut self) -> FactoryResult<u64> {
        let creator = self.creator();
        self.mint_to(&creator, self.bond_amount);
        self.token
            .approve(&creator, &self.factory.address(), self.bond_amount)
            .unwrap_or_else(|e| panic!("Failed to approve factory: {e}"));

        let id = self
            .factory
            .create_campaign(
                creator,
                CreateCampaignArgs {
                    end_date: self.end_date,
                    prompt_hash: self.prompt_hash(),
                    fundraising_goal: TEST_FUNDRAISING_GOAL,
                    bond_amount: self.bond_amount,
                    privacy_mode: false,
                },
            )
            .await?;

        self.campaign_id = Some(id);
        Ok(id)
    }

    pub async fn try_approve_campaign(&self) -> FactoryResult<()> {
        self.campaign().await.approve_campaign(self.creator()).await
    }

    async fn try_place_contributions(&self) -> FactoryResult<()> {
        let pledger = deterministic_address("pledger_1");
        let voucher = deterministic_address("voucher_1");

        self.fund(&pledger, TEST_PLEDGE_AMOUNT);
        self.try_pledge(&pledger, TEST_PLEDGE_AMOUNT).await?;

        self.fund(&voucher, TEST_VOUCH_AMOUNT);
        self.try_vouch(&voucher, TEST_VOUCH_AMOUNT).await
    }

    // ----- operations -----

    pub async fn try_pledge(&self, pledger: &Address, amount: u64) -> FactoryResult<()> {
        self.campaign().await.pledge(*pledger, amount).await
    }

    pub async fn try_vouch(&self, voucher: &Address, amount: u64) -> FactoryResult<()> {
        self.campaign().await.vouch(*voucher, amount).await
    }

    pub async fn try_dispute(
        &self,
        disputer: &Address,
        amount: u64,
        reason: &str,
    ) -> FactoryResult<()> {
        self.campaign().await.dispute(*disputer, amount, reason).await
    }

    /// Verdict from the oracle with the campaign's own criteria hash.
    pub async fn try_verify(&self, success: bool) -> FactoryResult<()> {
        self.try_verify_as(&self.oracle(), success, self.prompt_hash())
            .await
    }

    pub async fn try_verify_as(
        &self,
        signer: &Address,
        success: bool,
        prompt_hash: [u8; 32],
    ) -> FactoryResult<()> {
        self.campaign()
            .await
            .verify_and_release(*signer, success, prompt_hash)
            .await
    }

    pub async fn try_emergency_finalize(&self, signer: &Address) -> FactoryResult<()> {
        self.campaign().await.emergency_finalize(*signer).await
    }

    pub async fn try_claim(&self, signer: &Address, role: ClaimRole) -> FactoryResult<u64> {
        self.campaign().await.claim(*signer, role).await
    }

    pub async fn try_claim_creator(&self) -> FactoryResult<u64> {
        self.try_claim(&self.creator(), ClaimRole::Creator).await
    }

    pub async fn try_claim_treasury(&self) -> FactoryResult<u64> {
        self.try_claim(&self.treasury(), ClaimRole::Treasury).await
    }
}
