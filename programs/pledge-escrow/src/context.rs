use crate::address::Address;
use crate::events::{EscrowEvent, EventLog};
use crate::token::TokenLedger;
use crate::yield_pool::YieldPool;

/// Everything a handler needs besides the ledger itself: who is calling,
/// the current time, and the custody collaborators.
pub struct Context<'a> {
    pub signer: Address,

    /// Unix timestamp, seconds.
    pub now: i64,

    pub token: &'a dyn TokenLedger,
    pub yield_pool: &'a dyn YieldPool,
    pub events: &'a EventLog,
}

impl<'a> Context<'a> {
    pub fn new(
        signer: Address,
        now: i64,
        token: &'a dyn TokenLedger,
        yield_pool: &'a dyn YieldPool,
        events: &'a EventLog,
    ) -> Self {
        Self {
            signer,
            now,
            token,
            yield_pool,
            events,
        }
    }

    pub fn emit(&self, event: impl Into<EscrowEvent>) {
        self.events.record(event.into());
    }
}
