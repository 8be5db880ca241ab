use crate::config::{from_base_units, load_scenario, to_base_units, Scenario, ScenarioStep};
use crate::error::{CliError, CliResult};
use chrono::DateTime;
use pledge_escrow::{
    find_actor_address, prompt_hash, Address, CampaignInfo, ErrorCode, EscrowConfig,
    InMemoryYieldPool, TokenBank, TokenLedger, YieldPool,
};
use pledge_escrow_factory::{
    load_escrow_config, validate_escrow_config, CampaignFactory, Clock, CreateCampaignArgs,
    EscrowHandle, FactorySettings, ManualClock, SystemClock,
};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// Result of running one scenario
#[derive(Debug, Serialize)]
pub struct SimulationReport {
    pub campaign_id: u64,
    pub escrow_address: Address,
    pub started_at: String,
    pub end_date: String,
    pub steps: Vec<StepReport>,
    pub campaign: CampaignInfo,
    /// Final token balance per named actor (USDC)
    pub balances: BTreeMap<String, Decimal>,
    /// Escrow balance plus pool position (USDC)
    pub custodied: Decimal,
    /// Still owed to parties; absent until the campaign is finalized
    pub outstanding: Option<Decimal>,
    pub events: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct StepReport {
    pub index: usize,
    pub action: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor: Option<String>,
    pub at: String,
    #[serde(flatten)]
    pub outcome: StepOutcome,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum StepOutcome {
    Ok {
        #[serde(skip_serializing_if = "Option::is_none")]
        amount: Option<Decimal>,
    },
    Rejected {
        error: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        kind: Option<String>,
    },
}

impl StepOutcome {
    pub fn is_ok(&self) -> bool {
        matches!(self, StepOutcome::Ok { .. })
    }
}

pub async fn execute(
    scenario_path: PathBuf,
    config_path: Option<PathBuf>,
    strict: bool,
    output: Option<PathBuf>,
) -> CliResult<()> {
    info!(scenario = %scenario_path.display(), "loading scenario");
    let scenario = load_scenario(&scenario_path)?;

    let config = match config_path {
        Some(path) => load_escrow_config(&path)?,
        None => scenario.config.clone().unwrap_or_default(),
    };

    let report = run_scenario(&scenario, config, strict).await?;
    let rejected = report.steps.iter().filter(|s| !s.outcome.is_ok()).count();
    info!(
        steps = report.steps.len(),
        rejected,
        status = ?report.campaign.status,
        "simulation finished"
    );

    let json = serde_json::to_string_pretty(&report)?;
    match output {
        Some(path) => {
            std::fs::write(&path, json)?;
            println!("Simulation report written to {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

/// Deploy a factory over an in-memory token and pool, open the scenario's
/// campaign, and play its steps in order.
///
/// A rejected step is recorded and the run continues, unless `strict`.
/// Setup problems (unfundable bond, bad amounts) always abort.
pub async fn run_scenario(
    scenario: &Scenario,
    config: EscrowConfig,
    strict: bool,
) -> CliResult<SimulationReport> {
    validate_escrow_config(&config)?;

    let token = Arc::new(TokenBank::new());
    let yield_pool = Arc::new(InMemoryYieldPool::new(
        find_actor_address("yield_pool"),
        token.clone(),
    ));
    let start_time = scenario
        .start_time
        .unwrap_or_else(|| SystemClock.now());
    let clock = Arc::new(ManualClock::new(start_time));

    let factory = CampaignFactory::new(
        FactorySettings {
            address: find_actor_address("factory"),
            treasury: find_actor_address(&scenario.treasury),
            oracle: find_actor_address(&scenario.oracle),
            config,
        },
        token.clone(),
        yield_pool.clone(),
        clock.clone(),
    )?;

    for (name, balance) in &scenario.actors {
        let amount = to_base_units(*balance)?;
        token
            .mint(&find_actor_address(name), amount)
            .map_err(|e| CliError::InvalidScenario(format!("cannot fund {name}: {e}")))?;
    }

    let opening = &scenario.campaign;
    let creator = find_actor_address(&opening.creator);
    let bond_amount = to_base_units(opening.bond)?;
    let end_date = start_time
        .checked_add(opening.duration_secs)
        .ok_or_else(|| {
            CliError::InvalidScenario(format!(
                "start_time {start_time} + duration_secs {} overflows",
                opening.duration_secs
            ))
        })?;
    token
        .approve(&creator, &factory.address(), bond_amount)
        .map_err(|e| CliError::InvalidScenario(format!("cannot approve bond: {e}")))?;

    let campaign_id = factory
        .create_campaign(
            creator,
            CreateCampaignArgs {
                end_date,
                prompt_hash: prompt_hash(&opening.criteria),
                fundraising_goal: to_base_units(opening.fundraising_goal)?,
                bond_amount,
                privacy_mode: opening.privacy_mode,
            },
        )
        .await?;
    let campaign = factory.campaign(campaign_id).await?;
    info!(campaign_id, escrow = %campaign.address(), "campaign created");

    let mut steps = Vec::with_capacity(scenario.steps.len());
    for (index, step) in scenario.steps.iter().enumerate() {
        let at = factory.now();
        let outcome = match run_step(scenario, step, &campaign, &token, &yield_pool, &clock, end_date)
            .await
        {
            Ok(amount) => StepOutcome::Ok {
                amount: amount.map(from_base_units),
            },
            Err(CliError::Factory(source)) => {
                if strict {
                    return Err(CliError::StepRejected {
                        index,
                        action: step.action().to_string(),
                        source,
                    });
                }
                warn!(index, action = step.action(), error = %source, "step rejected");
                StepOutcome::Rejected {
                    error: source.to_string(),
                    kind: source.kind().map(|kind| format!("{kind:?}")),
                }
            }
            Err(other) => return Err(other),
        };

        steps.push(StepReport {
            index,
            action: step.action().to_string(),
            actor: step.actor().map(str::to_string),
            at: format_timestamp(at),
            outcome,
        });
    }

    let escrow_address = campaign.address();
    let balances = named_actors(scenario)
        .into_iter()
        .map(|name| {
            let balance = token.balance_of(&find_actor_address(&name));
            (name, from_base_units(balance))
        })
        .collect();
    let custodied =
        token.balance_of(&escrow_address) + yield_pool.position_of(&escrow_address);
    let outstanding = match campaign.outstanding_entitlements().await {
        Ok(amount) => Some(from_base_units(amount)),
        Err(err) if err.code() == Some(ErrorCode::NotFinalized) => None,
        Err(err) => return Err(err.into()),
    };

    Ok(SimulationReport {
        campaign_id,
        escrow_address,
        started_at: format_timestamp(start_time),
        end_date: format_timestamp(end_date),
        steps,
        campaign: campaign.info().await,
        balances,
        custodied: from_base_units(custodied),
        outstanding,
        events: factory
            .events()
            .for_campaign(campaign_id)
            .iter()
            .map(|event| event.name().to_string())
            .collect(),
    })
}

/// Returns the amount moved when the step is a claim.
async fn run_step(
    scenario: &Scenario,
    step: &ScenarioStep,
    campaign: &EscrowHandle,
    token: &TokenBank,
    yield_pool: &InMemoryYieldPool,
    clock: &ManualClock,
    end_date: i64,
) -> CliResult<Option<u64>> {
    match step {
        ScenarioStep::Approve => {
            let creator = find_actor_address(&scenario.campaign.creator);
            campaign.approve_campaign(creator).await?;
        }
        ScenarioStep::Pledge { actor, amount } => {
            let (signer, amount) = approve_contribution(token, campaign, actor, *amount)?;
            campaign.pledge(signer, amount).await?;
        }
        ScenarioStep::Vouch { actor, amount } => {
            let (signer, amount) = approve_contribution(token, campaign, actor, *amount)?;
            campaign.vouch(signer, amount).await?;
        }
        ScenarioStep::Dispute {
            actor,
            amount,
            reason,
        } => {
            let (signer, amount) = approve_contribution(token, campaign, actor, *amount)?;
            campaign.dispute(signer, amount, reason.as_str()).await?;
        }
        ScenarioStep::Advance { secs } => {
            clock.advance(*secs);
        }
        ScenarioStep::WarpToEndDate { offset_secs } => {
            let target = end_date.checked_add(*offset_secs).ok_or_else(|| {
                CliError::InvalidScenario(format!(
                    "end date {end_date} + offset_secs {offset_secs} overflows"
                ))
            })?;
            clock.set(target);
        }
        ScenarioStep::AccrueYield { amount } => {
            yield_pool
                .accrue_yield(&campaign.address(), to_base_units(*amount)?)
                .map_err(|e| CliError::InvalidScenario(format!("cannot accrue yield: {e}")))?;
        }
        ScenarioStep::Verify {
            success,
            criteria,
            actor,
        } => {
            let signer = find_actor_address(actor.as_deref().unwrap_or(&scenario.oracle));
            let criteria = criteria.as_deref().unwrap_or(&scenario.campaign.criteria);
            campaign
                .verify_and_release(signer, *success, prompt_hash(criteria))
                .await?;
        }
        ScenarioStep::EmergencyFinalize { actor } => {
            campaign
                .emergency_finalize(find_actor_address(actor))
                .await?;
        }
        ScenarioStep::Claim { actor, role } => {
            let paid = campaign.claim(find_actor_address(actor), *role).await?;
            return Ok(Some(paid));
        }
    }
    Ok(None)
}

/// Raise the actor's allowance to the escrow by `amount`.
fn approve_contribution(
    token: &TokenBank,
    campaign: &EscrowHandle,
    actor: &str,
    amount: Decimal,
) -> CliResult<(Address, u64)> {
    let signer = find_actor_address(actor);
    let amount = to_base_units(amount)?;
    let escrow = campaign.address();
    let allowance = token.allowance(&signer, &escrow).saturating_add(amount);
    token
        .approve(&signer, &escrow, allowance)
        .map_err(|e| CliError::InvalidScenario(format!("cannot approve for {actor}: {e}")))?;
    Ok((signer, amount))
}

/// Every name the scenario mentions, for the balance report.
fn named_actors(scenario: &Scenario) -> BTreeSet<String> {
    let mut names: BTreeSet<String> = scenario.actors.keys().cloned().collect();
    names.insert(scenario.campaign.creator.clone());
    names.insert(scenario.treasury.clone());
    names.extend(
        scenario
            .steps
            .iter()
            .filter_map(|step| step.actor().map(str::to_string)),
    );
    names
}

fn format_timestamp(timestamp: i64) -> String {
    DateTime::from_timestamp(timestamp, 0)
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_else(|| timestamp.to_string())
}
