use std::collections::HashMap;
use std::sync::Mutex;

use thiserror::Error;

use crate::address::Address;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("Insufficient balance: need {needed}, have {available}")]
    InsufficientBalance { needed: u64, available: u64 },

    #[error("Insufficient allowance: need {needed}, approved {approved}")]
    InsufficientAllowance { needed: u64, approved: u64 },

    #[error("Balance overflow")]
    Overflow,

    #[error("Token ledger unavailable: {0}")]
    Unavailable(String),
}

/// Fungible settlement token (USDC-equivalent) the escrow custodies.
///
/// Pledges, vouches and disputes are pulled with `transfer_from` against an
/// approval the caller granted to the escrow's custody address; the creator
/// bond is pulled by the factory the same way.
pub trait TokenLedger: Send + Sync {
    fn balance_of(&self, owner: &Address) -> u64;

    fn allowance(&self, owner: &Address, spender: &Address) -> u64;

    fn approve(&self, owner: &Address, spender: &Address, amount: u64) -> Result<(), TokenError>;

    fn transfer(&self, from: &Address, to: &Address, amount: u64) -> Result<(), TokenError>;

    fn transfer_from(
        &self,
        spender: &Address,
        from: &Address,
        to: &Address,
        amount: u64,
    ) -> Result<(), TokenError>;
}

#[derive(Debug, Default)]
struct TokenBankState {
    balances: HashMap<Address, u64>,
    allowances: HashMap<(Address, Address), u64>,
    total_supply: u64,
}

impl TokenBankState {
    fn move_balance(&mut self, from: &Address, to: &Address, amount: u64) -> Result<(), TokenError> {
        let available = self.balances.get(from).copied().unwrap_or(0);
        if available < amount {
            return Err(TokenError::InsufficientBalance {
                needed: amount,
                available,
            });
        }
        if from == to {
            return Ok(());
        }
        let to_balance = self.balances.get(to).copied().unwrap_or(0);
        let new_to_balance = to_balance.checked_add(amount).ok_or(TokenError::Overflow)?;

        self.balances.insert(*from, available - amount);
        self.balances.insert(*to, new_to_balance);
        Ok(())
    }
}

/// In-memory token ledger.
#[derive(Debug, Default)]
pub struct TokenBank {
    state: Mutex<TokenBankState>,
}

impl TokenBank {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_state<T>(
        &self,
        f: impl FnOnce(&mut TokenBankState) -> Result<T, TokenError>,
    ) -> Result<T, TokenError> {
        let mut state = self
            .state
            .lock()
            .map_err(|e| TokenError::Unavailable(e.to_string()))?;
        f(&mut state)
    }

    pub fn mint(&self, to: &Address, amount: u64) -> Result<(), TokenError> {
        self.with_state(|state| {
            let supply = state
                .total_supply
                .checked_add(amount)
                .ok_or(TokenError::Overflow)?;
            let balance = state.balances.entry(*to).or_insert(0);
            *balance = balance.checked_add(amount).ok_or(TokenError::Overflow)?;
            state.total_supply = supply;
            Ok(())
        })
    }

    pub fn total_supply(&self) -> u64 {
        self.with_state(|state| Ok(state.total_supply)).unwrap_or(0)
    }
}

impl TokenLedger for TokenBank {
    fn balance_of(&self, owner: &Address) -> u64 {
        self.with_state(|state| Ok(state.balances.get(owner).copied().unwrap_or(0)))
            .unwrap_or(0)
    }

    fn allowance(&self, owner: &Address, spender: &Address) -> u64 {
        self.with_state(|state| {
            Ok(state
                .allowances
                .get(&(*owner, *spender))
                .copied()
                .unwrap_or(0))
        })
        .unwrap_or(0)
    }

    fn approve(&self, owner: &Address, spender: &Address, amount: u64) -> Result<(), TokenError> {
        self.with_state(|state| {
            state.allowances.insert((*owner, *spender), amount);
            Ok(())
        })
    }

    fn transfer(&self, from: &Address, to: &Address, amount: u64) -> Result<(), TokenError> {
        self.with_state(|state| state.move_balance(from, to, amount))
    }

    fn transfer_from(
        &self,
        spender: &Address,
        from: &Address,
        to: &Address,
        amount: u64,
    ) -> Result<(), TokenError> {
        self.with_state(|state| {
            let key = (*from, *spender);
            let approved = state.allowances.get(&key).copied().unwrap_or(0);
            if approved < amount {
                return Err(TokenError::InsufficientAllowance {
                    needed: amount,
                    approved,
                });
            }
            state.move_balance(from, to, amount)?;
            state.allowances.insert(key, approved - amount);
            Ok(())
        })
    }
}
