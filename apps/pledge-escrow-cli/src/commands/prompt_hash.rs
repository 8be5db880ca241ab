use crate::error::{CliError, CliResult};

pub fn execute(criteria: String, expect: Option<String>) -> CliResult<()> {
    let computed = check_prompt_hash(&criteria, expect.as_deref())?;
    println!("{computed}");
    if expect.is_some() {
        println!("✅ Matches expected hash");
    }
    Ok(())
}

/// Hash `criteria` and, if given, compare against `expected` (hex, with or
/// without `0x`). Returns the computed hash as hex.
pub fn check_prompt_hash(criteria: &str, expected: Option<&str>) -> CliResult<String> {
    let hash = pledge_escrow::prompt_hash(criteria);
    let computed = hex::encode(hash);

    if let Some(expected) = expected {
        let trimmed = expected.trim().trim_start_matches("0x");
        let decoded = hex::decode(trimmed)
            .map_err(|e| CliError::InvalidHex(format!("'{expected}': {e}")))?;
        if decoded.len() != 32 {
            return Err(CliError::InvalidHex(format!(
                "'{expected}': expected 32 bytes, got {}",
                decoded.len()
            )));
        }
        if decoded[..] != hash[..] {
            return Err(CliError::HashMismatch {
                expected: trimmed.to_lowercase(),
                computed,
            });
        }
    }

    Ok(computed)
}
