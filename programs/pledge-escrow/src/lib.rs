/*!
# Pledge Escrow

Per-campaign escrow ledger for crowdfunding with reputation stakes and
adversarial disputes.

A ledger holds a creator bond, pledges, vouches and dispute stakes in a
yield-bearing pool until an oracle delivers a verdict (or a grace period
times out). Each party then claims exactly once:

| Role | Verified success | Refuted (fraud) | Emergency timeout |
|---|---|---|---|
| Creator | pledges + bond − fee | - | - |
| Pledger | - | full refund | full refund |
| Voucher | full refund | stake − slash | full refund |
| Disputer | stake − slash | full refund | full refund |
| Treasury | fee + dispute slashes + yield | bond + vouch slashes + yield | bond + yield |

Handlers live in [`instructions`], one module per operation, and take a
[`Context`] (signer, time, custody collaborators) plus the ledger. They
either succeed completely or return an error with the ledger, token
balances and pool position unchanged. Serializing access per ledger is the
caller's job (see the factory crate).
*/

pub mod address;
pub mod config;
pub mod constants;
pub mod context;
pub mod error;
pub mod events;
pub mod instructions;
pub mod state;
pub mod token;
pub mod yield_pool;

pub use address::{find_actor_address, find_escrow_address, prompt_hash, Address, AddressError};
pub use config::EscrowConfig;
pub use constants::{BPS_DENOMINATOR, ESCROW_V0_SEED_PREFIX, ONE_USDC, USDC_DECIMALS};
pub use context::Context;
pub use error::{ErrorCode, ErrorKind, EscrowError, Result};
pub use events::{EscrowEvent, EventLog};
pub use instructions::*;
pub use state::*;
pub use token::{TokenBank, TokenError, TokenLedger};
pub use yield_pool::{DepositReceipt, InMemoryYieldPool, YieldPool, YieldPoolError};
