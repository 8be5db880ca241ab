use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::address::Address;
use crate::token::{TokenBank, TokenError, TokenLedger};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum YieldPoolError {
    #[error("Pool rejected the operation: {0}")]
    Rejected(String),

    #[error("Pool token movement failed: {0}")]
    Token(#[from] TokenError),

    #[error("Pool position overflow")]
    Overflow,

    #[error("Pool unavailable: {0}")]
    Unavailable(String),
}

/// Acknowledgement of a deposit. Opaque to the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositReceipt {
    pub sequence: u64,
    pub position_after: u64,
}

/// External lending pool holding an escrow's custodied funds while the
/// campaign is open.
///
/// `deposit` moves `amount` of the settlement token from `depositor` into the
/// pool. `withdraw_all` returns the depositor's whole position (principal plus
/// accrued yield) to the depositor and reports the amount returned.
pub trait YieldPool: Send + Sync {
    fn deposit(&self, depositor: &Address, amount: u64) -> Result<DepositReceipt, YieldPoolError>;

    fn withdraw_all(&self, depositor: &Address) -> Result<u64, YieldPoolError>;

    fn position_of(&self, depositor: &Address) -> u64;
}

#[derive(Debug, Default)]
struct PoolState {
    positions: HashMap<Address, u64>,
    next_sequence: u64,
}

/// In-memory lending pool backed by a [`TokenBank`].
///
/// Yield is simulated with [`InMemoryYieldPool::accrue_yield`], which mints
/// new tokens into the pool and credits them to a position. Deposits and
/// withdrawals can be switched off to exercise custody failure paths.
#[derive(Debug)]
pub struct InMemoryYieldPool {
    address: Address,
    token: Arc<TokenBank>,
    state: Mutex<PoolState>,
    fail_deposits: AtomicBool,
    fail_withdrawals: AtomicBool,
}

impl InMemoryYieldPool {
    pub fn new(address: Address, token: Arc<TokenBank>) -> Self {
        Self {
            address,
            token,
            state: Mutex::new(PoolState::default()),
            fail_deposits: AtomicBool::new(false),
            fail_withdrawals: AtomicBool::new(false),
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn set_fail_deposits(&self, fail: bool) {
        self.fail_deposits.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_withdrawals(&self, fail: bool) {
        self.fail_withdrawals.store(fail, Ordering::SeqCst);
    }

    pub fn accrue_yield(&self, depositor: &Address, amount: u64) -> Result<(), YieldPoolError> {
        let mut state = self.lock_state()?;
        let position = state.positions.get(depositor).copied().unwrap_or(0);
        let new_position = position
            .checked_add(amount)
            .ok_or(YieldPoolError::Overflow)?;
        self.token.mint(&self.address, amount)?;
        state.positions.insert(*depositor, new_position);
        Ok(())
    }

    fn lock_state(&self) -> Result<std::sync::MutexGuard<'_, PoolState>, YieldPoolError> {
        self.state
            .lock()
            .map_err(|e| YieldPoolError::Unavailable(e.to_string()))
    }
}

impl YieldPool for InMemoryYieldPool {
    fn deposit(&self, depositor: &Address, amount: u64) -> Result<DepositReceipt, YieldPoolError> {
        if self.fail_deposits.load(Ordering::SeqCst) {
            return Err(YieldPoolError::Rejected("deposits disabled".to_string()));
        }

        let mut state = self.lock_state()?;
        let position = state.positions.get(depositor).copied().unwrap_or(0);
        let position_after = position
            .checked_add(amount)
            .ok_or(YieldPoolError::Overflow)?;

        self.token.transfer(depositor, &self.address, amount)?;

        state.positions.insert(*depositor, position_after);
        state.next_sequence += 1;

        Ok(DepositReceipt {
            sequence: state.next_sequence,
            position_after,
        })
    }

    fn withdraw_all(&self, depositor: &Address) -> Result<u64, YieldPoolError> {
        if self.fail_withdrawals.load(Ordering::SeqCst) {
            return Err(YieldPoolError::Rejected("withdrawals disabled".to_string()));
        }

        let mut state = self.lock_state()?;
        let position = state.positions.get(depositor).copied().unwrap_or(0);
        if position > 0 {
            self.token.transfer(&self.address, depositor, position)?;
        }
        state.positions.remove(depositor);

        Ok(position)
    }

    fn position_of(&self, depositor: &Address) -> u64 {
        self.lock_state()
            .map(|state| state.positions.get(depositor).copied().unwrap_or(0))
            .unwrap_or(0)
    }
}
