mod campaign_snapshot;
mod fixture_stage;
mod test_fixture;

pub use campaign_snapshot::*;
pub use fixture_stage::*;
pub use test_fixture::*;

use pledge_escrow::{find_actor_address, Address, USDC_DECIMALS};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Standard test constants
pub const TEST_START_TIME: i64 = 1_750_000_000;
pub const TEST_CAMPAIGN_DURATION_SECS: i64 = 7 * 86_400;
pub const TEST_CRITERIA: &str = "Ship the open-source firmware and publish a reproducible build";

/// Address for a named test actor ("creator", "pledger_1", ...). Stable across runs.
pub fn deterministic_address(name: &str) -> Address {
    find_actor_address(name)
}

/// Convert a human USDC amount (`dec!(2.5)`) into base units.
pub fn usdc(amount: Decimal) -> u64 {
    (amount * Decimal::from(10u64.pow(USDC_DECIMALS)))
        .trunc()
        .to_u64()
        .unwrap_or_else(|| panic!("{amount} USDC does not fit in base units"))
}
