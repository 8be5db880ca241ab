use pledge_escrow::{ClaimRole, EscrowConfig, USDC_DECIMALS};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{CliError, CliResult};

/// Scenario file structure
///
/// Amounts are human USDC (`2.5` = 2.5 USDC). Actors are referred to by
/// name; each name maps to a stable address.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    /// Unix timestamp the simulation clock starts at (defaults to now)
    #[serde(default)]
    pub start_time: Option<i64>,

    /// Escrow parameters; missing fields take defaults
    #[serde(default)]
    pub config: Option<EscrowConfig>,

    /// Starting token balance per actor
    #[serde(default)]
    pub actors: BTreeMap<String, Decimal>,

    pub campaign: CampaignSpec,

    #[serde(default = "default_treasury")]
    pub treasury: String,

    #[serde(default = "default_oracle")]
    pub oracle: String,

    #[serde(default)]
    pub steps: Vec<ScenarioStep>,
}

/// The campaign the scenario opens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignSpec {
    pub creator: String,

    /// Seconds from the start time to the campaign's end date
    pub duration_secs: i64,

    /// Verification criteria; the oracle must present their hash
    pub criteria: String,

    #[serde(default)]
    pub fundraising_goal: Decimal,

    pub bond: Decimal,

    #[serde(default)]
    pub privacy_mode: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ScenarioStep {
    /// Creator approves the campaign
    Approve,

    Pledge {
        actor: String,
        amount: Decimal,
    },

    Vouch {
        actor: String,
        amount: Decimal,
    },

    Dispute {
        actor: String,
        amount: Decimal,
        #[serde(default)]
        reason: String,
    },

    /// Move the clock forward
    Advance { secs: i64 },

    /// Set the clock to the campaign's end date plus an offset
    WarpToEndDate {
        #[serde(default)]
        offset_secs: i64,
    },

    /// Credit yield to the escrow's pool position
    AccrueYield { amount: Decimal },

    /// Oracle verdict. `criteria` overrides the committed criteria and
    /// `actor` overrides the oracle, to exercise the guards.
    Verify {
        success: bool,
        #[serde(default)]
        criteria: Option<String>,
        #[serde(default)]
        actor: Option<String>,
    },

    EmergencyFinalize {
        #[serde(default = "default_keeper")]
        actor: String,
    },

    Claim { actor: String, role: ClaimRole },
}

impl ScenarioStep {
    pub fn action(&self) -> &'static str {
        match self {
            ScenarioStep::Approve => "approve",
            ScenarioStep::Pledge { .. } => "pledge",
            ScenarioStep::Vouch { .. } => "vouch",
            ScenarioStep::Dispute { .. } => "dispute",
            ScenarioStep::Advance { .. } => "advance",
            ScenarioStep::WarpToEndDate { .. } => "warp_to_end_date",
            ScenarioStep::AccrueYield { .. } => "accrue_yield",
            ScenarioStep::Verify { .. } => "verify",
            ScenarioStep::EmergencyFinalize { .. } => "emergency_finalize",
            ScenarioStep::Claim { .. } => "claim",
        }
    }

    pub fn actor(&self) -> Option<&str> {
        match self {
            ScenarioStep::Pledge { actor, .. }
            | ScenarioStep::Vouch { actor, .. }
            | ScenarioStep::Dispute { actor, .. }
            | ScenarioStep::EmergencyFinalize { actor }
            | ScenarioStep::Claim { actor, .. } => Some(actor.as_str()),
            ScenarioStep::Verify { actor, .. } => actor.as_deref(),
            _ => None,
        }
    }
}

fn default_treasury() -> String {
    "treasury".to_string()
}

fn default_oracle() -> String {
    "oracle".to_string()
}

fn default_keeper() -> String {
    "keeper".to_string()
}

pub fn load_scenario(path: &Path) -> CliResult<Scenario> {
    if !path.exists() {
        return Err(CliError::InvalidScenario(format!(
            "Scenario file not found: {}",
            path.display()
        )));
    }
    let contents = std::fs::read_to_string(path)?;
    let scenario: Scenario = serde_yaml::from_str(&contents)?;
    validate_scenario(&scenario)?;
    Ok(scenario)
}

pub fn validate_scenario(scenario: &Scenario) -> CliResult<()> {
    if scenario.campaign.creator.is_empty() {
        return Err(CliError::InvalidScenario(
            "campaign.creator must not be empty".to_string(),
        ));
    }
    if scenario.campaign.duration_secs <= 0 {
        return Err(CliError::InvalidScenario(
            "campaign.duration_secs must be positive".to_string(),
        ));
    }
    for (name, balance) in &scenario.actors {
        to_base_units(*balance)
            .map_err(|e| CliError::InvalidScenario(format!("actor {name}: {e}")))?;
    }
    Ok(())
}

/// Convert a human USDC amount into base units. Rejects negative amounts
/// and precision finer than one base unit.
pub fn to_base_units(amount: Decimal) -> CliResult<u64> {
    if amount.is_sign_negative() {
        return Err(CliError::InvalidAmount(format!("{amount} is negative")));
    }
    let scaled = amount * Decimal::from(10u64.pow(USDC_DECIMALS));
    if scaled.fract() != Decimal::ZERO {
        return Err(CliError::InvalidAmount(format!(
            "{amount} has more than {USDC_DECIMALS} decimal places"
        )));
    }
    scaled
        .to_u64()
        .ok_or_else(|| CliError::InvalidAmount(format!("{amount} is too large")))
}

/// Base units back to human USDC, without trailing zeros.
pub fn from_base_units(amount: u64) -> Decimal {
    Decimal::from_i128_with_scale(i128::from(amount), USDC_DECIMALS).normalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::str::FromStr;
    use tempfile::NamedTempFile;

    const SCENARIO: &str = r#"
start_time: 1750000000
actors:
  alice: 100
  bob: 250.5
campaign:
  creator: alice
  duration_secs: 604800
  criteria: "Deliver the thing"
  bond: 10
steps:
  - action: approve
  - action: pledge
    actor: bob
    amount: 100
  - action: warp_to_end_date
  - action: verify
    success: true
  - action: claim
    actor: alice
    role: Creator
"#;

    #[test]
    fn test_parse_scenario() {
        let scenario: Scenario = serde_yaml::from_str(SCENARIO).unwrap();
        assert_eq!(scenario.start_time, Some(1_750_000_000));
        assert_eq!(scenario.treasury, "treasury");
        assert_eq!(scenario.actors["bob"], Decimal::from_str("250.5").unwrap());
        assert_eq!(scenario.steps.len(), 5);
        assert!(matches!(scenario.steps[0], ScenarioStep::Approve));
        assert!(matches!(
            scenario.steps[2],
            ScenarioStep::WarpToEndDate { offset_secs: 0 }
        ));
        assert_eq!(scenario.steps[4].actor(), Some("alice"));
        assert!(validate_scenario(&scenario).is_ok());
    }

    #[test]
    fn test_load_scenario_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(SCENARIO.as_bytes()).unwrap();

        let scenario = load_scenario(file.path()).unwrap();
        assert_eq!(scenario.campaign.creator, "alice");
    }

    #[test]
    fn test_load_missing_scenario() {
        let err = load_scenario(Path::new("/no/such/scenario.yaml")).unwrap_err();
        assert!(matches!(err, CliError::InvalidScenario(_)));
    }

    #[test]
    fn test_unknown_action_rejected() {
        let yaml = SCENARIO.replace("action: approve", "action: launch");
        assert!(serde_yaml::from_str::<Scenario>(&yaml).is_err());
    }

    #[test]
    fn test_base_unit_conversion() {
        assert_eq!(to_base_units(Decimal::from(109)).unwrap(), 109_000_000);
        assert_eq!(
            to_base_units(Decimal::from_str("2.5").unwrap()).unwrap(),
            2_500_000
        );
        assert!(to_base_units(Decimal::from_str("0.0000001").unwrap()).is_err());
        assert!(to_base_units(Decimal::from(-1)).is_err());

        assert_eq!(from_base_units(2_500_000).to_string(), "2.5");
        assert_eq!(from_base_units(109_000_000).to_string(), "109");
    }
}
