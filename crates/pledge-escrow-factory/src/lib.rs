/*!
# Pledge Escrow Factory

Async front of the pledge escrow ledger. A [`CampaignFactory`] assigns
campaign ids, pulls creator bonds, and keeps one lock-guarded ledger per
campaign. [`EscrowHandle`] exposes every ledger operation for one campaign.

```rust,no_run
use std::sync::Arc;
use pledge_escrow::{find_actor_address, prompt_hash, InMemoryYieldPool, TokenBank};
use pledge_escrow_factory::{CampaignFactory, CreateCampaignArgs, FactorySettings, SystemClock};

# async fn example() -> Result<(), Box<dyn std::error::Error>> {
let token = Arc::new(TokenBank::new());
let pool = Arc::new(InMemoryYieldPool::new(find_actor_address("pool"), token.clone()));
let factory = CampaignFactory::new(
    FactorySettings {
        address: find_actor_address("factory"),
        treasury: find_actor_address("treasury"),
        oracle: find_actor_address("oracle"),
        config: Default::default(),
    },
    token,
    pool,
    Arc::new(SystemClock),
)?;

let creator = find_actor_address("creator");
let id = factory
    .create_campaign(
        creator,
        CreateCampaignArgs {
            end_date: factory.now() + 7 * 86_400,
            prompt_hash: prompt_hash("Publish the audited contracts"),
            fundraising_goal: 50_000_000_000,
            bond_amount: 10_000_000,
            privacy_mode: false,
        },
    )
    .await?;

let campaign = factory.campaign(id).await?;
campaign.approve_campaign(creator).await?;
# Ok(())
# }
```
*/

mod clock;
mod config;
mod error;
mod factory;
mod handle;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{load_escrow_config, parse_escrow_config, validate_escrow_config};
pub use error::{FactoryError, FactoryResult};
pub use factory::{CampaignFactory, CreateCampaignArgs, FactorySettings};
pub use handle::EscrowHandle;
