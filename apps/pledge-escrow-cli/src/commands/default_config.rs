use crate::error::CliResult;
use pledge_escrow::EscrowConfig;
use std::path::PathBuf;

pub fn execute(output: Option<PathBuf>) -> CliResult<()> {
    let yaml = serde_yaml::to_string(&EscrowConfig::default())?;

    match output {
        Some(path) => {
            std::fs::write(&path, &yaml)?;
            println!("Default escrow config written to {}", path.display());
        }
        None => print!("{yaml}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_written_config_loads_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("escrow.yaml");

        execute(Some(path.clone())).unwrap();

        let loaded = pledge_escrow_factory::load_escrow_config(&path).unwrap();
        assert_eq!(loaded, EscrowConfig::default());
    }
}
