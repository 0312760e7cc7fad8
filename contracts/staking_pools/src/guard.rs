//! Per-key serialization of state transitions.
//!
//! Each account-level operation holds a lock on its (pool, account) pair for
//! its whole duration and fee withdrawals hold one on the pool's fee
//! accumulator. A second acquisition of a held key fails instead of
//! interleaving with the first.

use soroban_sdk::{contracttype, Address, Env};

use crate::errors::ContractError;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum LockKey {
    Account(u32, Address),
    Fees(u32),
}

/// Held lock. Released when dropped.
pub struct KeyLock {
    env: Env,
    key: LockKey,
}

impl KeyLock {
    pub fn acquire(env: &Env, key: LockKey) -> Result<Self, ContractError> {
        let storage = env.storage().temporary();
        if storage.has(&key) {
            return Err(ContractError::OperationInProgress);
        }
        storage.set(&key, &true);
        Ok(KeyLock {
            env: env.clone(),
            key,
        })
    }

    pub fn account(env: &Env, pool_id: u32, account: &Address) -> Result<Self, ContractError> {
        Self::acquire(env, LockKey::Account(pool_id, account.clone()))
    }

    pub fn fees(env: &Env, pool_id: u32) -> Result<Self, ContractError> {
        Self::acquire(env, LockKey::Fees(pool_id))
    }
}

impl Drop for KeyLock {
    fn drop(&mut self) {
        self.env.storage().temporary().remove(&self.key);
    }
}
