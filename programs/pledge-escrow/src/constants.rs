/// Seed prefix for escrow custody address derivation
pub const ESCROW_V0_SEED_PREFIX: &[u8] = b"pledge_escrow_v0";

/// Seed prefix for named actor addresses (CLI scenarios, fixtures)
pub const ACTOR_SEED_PREFIX: &[u8] = b"actor";

/// Basis point denominator (100% == 10_000 bps).
pub const BPS_DENOMINATOR: u64 = 10_000;

/// Decimals of the settlement token (USDC-equivalent).
pub const USDC_DECIMALS: u32 = 6;

/// One whole settlement token in base units.
pub const ONE_USDC: u64 = 1_000_000;

pub const SECONDS_PER_DAY: i64 = 86_400;

/// Treasury fee taken from the pledged total on success.
pub const DEFAULT_FEE_BPS: u64 = 100;

/// Minimum pledge, vouch and dispute stake.
pub const DEFAULT_MIN_PLEDGE: u64 = ONE_USDC;

/// Minimum creator bond.
pub const DEFAULT_MIN_BOND: u64 = 10 * ONE_USDC;

/// `end_date - now` must be strictly greater than this at creation.
pub const DEFAULT_MIN_CAMPAIGN_DURATION_SECS: i64 = SECONDS_PER_DAY;

/// Delay after `end_date` before anyone may force a non-punitive failure.
pub const DEFAULT_GRACE_PERIOD_SECS: i64 = 30 * SECONDS_PER_DAY;

/// Disputes are accepted until `end_date + window` (and never after finalization).
pub const DEFAULT_DISPUTE_WINDOW_SECS: i64 = 30 * SECONDS_PER_DAY;

/// Cumulative dispute stake must strictly exceed this share of the pledged total.
pub const DEFAULT_DISPUTE_THRESHOLD_BPS: u64 = 1_000;

/// Share of a stake forfeited by fraud-flagged vouchers and frivolous disputers.
pub const DEFAULT_SLASH_BPS: u64 = 5_000;

/// Maximum length of a dispute reason, in bytes.
pub const MAX_DISPUTE_REASON_LEN: usize = 256;
