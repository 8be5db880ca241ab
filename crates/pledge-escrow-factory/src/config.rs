use std::fs;
use std::path::Path;

use pledge_escrow::EscrowConfig;

use crate::error::{FactoryError, FactoryResult};

/// Parse an [`EscrowConfig`] from YAML. Missing fields take their defaults.
pub fn parse_escrow_config(yaml: &str) -> FactoryResult<EscrowConfig> {
    let config: EscrowConfig = serde_yaml::from_str(yaml)?;
    validate_escrow_config(&config)?;
    Ok(config)
}

/// Load an [`EscrowConfig`] from a YAML file.
pub fn load_escrow_config(path: impl AsRef<Path>) -> FactoryResult<EscrowConfig> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(FactoryError::Config(format!(
            "Config file not found: {}",
            path.display()
        )));
    }
    let contents = fs::read_to_string(path)?;
    parse_escrow_config(&contents)
}

pub fn validate_escrow_config(config: &EscrowConfig) -> FactoryResult<()> {
    config
        .validate()
        .map_err(|err| FactoryError::Config(format!("{err}: {config:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_partial_yaml_takes_defaults() {
        let config = parse_escrow_config("fee_bps: 250\nslash_bps: 2500\n").unwrap();
        assert_eq!(config.fee_bps, 250);
        assert_eq!(config.slash_bps, 2_500);
        assert_eq!(config.min_bond, EscrowConfig::default().min_bond);
        assert_eq!(
            config.grace_period_secs,
            EscrowConfig::default().grace_period_secs
        );
    }

    #[test]
    fn test_out_of_range_bps_rejected() {
        let err = parse_escrow_config("fee_bps: 10001\n").unwrap_err();
        assert!(matches!(err, FactoryError::Config(_)));
    }

    #[test]
    fn test_malformed_yaml_rejected() {
        let err = parse_escrow_config("fee_bps: [1, 2]\n").unwrap_err();
        assert!(matches!(err, FactoryError::Yaml(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "min_pledge: 5000000").unwrap();
        writeln!(file, "dispute_threshold_bps: 2000").unwrap();

        let config = load_escrow_config(file.path()).unwrap();
        assert_eq!(config.min_pledge, 5_000_000);
        assert_eq!(config.dispute_threshold_bps, 2_000);
    }

    #[test]
    fn test_missing_file() {
        let err = load_escrow_config("/definitely/not/here.yaml").unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }
}
