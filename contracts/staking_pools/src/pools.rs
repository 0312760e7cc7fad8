use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol, Vec};

use crate::{
    errors::ContractError,
    fixed::{self, Width},
    TTL_EXTEND_TO, TTL_THRESHOLD,
};

// ── Storage keys ─────────────────────────────────────────────────────────────

const POOL_COUNT: Symbol = symbol_short!("POOL_CNT");
const POOL: Symbol = symbol_short!("POOL");

/// Deposit fees are expressed in tenths of a percent.
pub const FEE_DENOMINATOR: u32 = 1000;

// ── Types ────────────────────────────────────────────────────────────────────

/// Staking configuration for one token.
///
/// Numeric bounds: `amount_per_reward` 40 bits, `reward_per_block` 72 bits,
/// `minimum_deposit` 104 bits, `deposit_fee` at most [`FEE_DENOMINATOR`].
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Pool {
    pub token: Address,
    /// Seconds a deposit stays locked against ordinary withdrawal.
    pub lock_time: u32,
    /// Divisor turning staked amount into reward units.
    pub amount_per_reward: u64,
    pub reward_per_block: u128,
    pub minimum_deposit: u128,
    pub deposit_fee: u32,
    /// Ledger sequence after which nothing accrues; zero while open.
    pub last_rewarded_block: u32,
}

/// Mutable pool parameter, carried in update events.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum PoolField {
    AmountPerReward = 1,
    RewardPerBlock = 2,
    DepositFee = 3,
    MinimumDeposit = 4,
    LockTime = 5,
}

// ── Validation ───────────────────────────────────────────────────────────────

pub fn validate_fee(deposit_fee: u32) -> Result<(), ContractError> {
    if deposit_fee > FEE_DENOMINATOR {
        return Err(ContractError::InvalidPercentage);
    }
    Ok(())
}

pub fn validate_amount_per_reward(value: u64) -> Result<(), ContractError> {
    fixed::fit(value as u128, Width::U40)?;
    Ok(())
}

pub fn validate_reward_per_block(value: u128) -> Result<(), ContractError> {
    fixed::fit(value, Width::U72)?;
    Ok(())
}

pub fn validate_minimum_deposit(value: u128) -> Result<(), ContractError> {
    fixed::fit(value, Width::U104)?;
    Ok(())
}

// ── Storage ──────────────────────────────────────────────────────────────────

fn pool_key(pool_id: u32) -> (Symbol, u32) {
    (POOL, pool_id)
}

pub fn count(env: &Env) -> u32 {
    env.storage().instance().get(&POOL_COUNT).unwrap_or(0)
}

pub fn load(env: &Env, pool_id: u32) -> Result<Pool, ContractError> {
    if pool_id >= count(env) {
        return Err(ContractError::PoolNotFound);
    }
    let key = pool_key(pool_id);
    let pool: Pool = env
        .storage()
        .persistent()
        .get(&key)
        .ok_or(ContractError::PoolNotFound)?;
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
    Ok(pool)
}

pub fn store(env: &Env, pool_id: u32, pool: &Pool) {
    let key = pool_key(pool_id);
    env.storage().persistent().set(&key, pool);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

/// Append `pool` and return its id. Ids are dense and never reused.
pub fn append(env: &Env, pool: &Pool) -> Result<u32, ContractError> {
    let pool_id = count(env);
    let next = pool_id.checked_add(1).ok_or(ContractError::ArithmeticOverflow)?;
    store(env, pool_id, pool);
    env.storage().instance().set(&POOL_COUNT, &next);
    Ok(pool_id)
}

pub fn list(env: &Env) -> Result<Vec<Pool>, ContractError> {
    let mut pools = Vec::new(env);
    for pool_id in 0..count(env) {
        pools.push_back(load(env, pool_id)?);
    }
    Ok(pools)
}

// ── Mutation ─────────────────────────────────────────────────────────────────

/// Schedule the block after which the pool stops accruing.
///
/// The block must lie strictly in the future. Re-closing is allowed and
/// simply overwrites the previous value.
pub fn close(env: &Env, pool_id: u32, last_rewarded_block: u32) -> Result<Pool, ContractError> {
    let mut pool = load(env, pool_id)?;
    if last_rewarded_block <= env.ledger().sequence() {
        return Err(ContractError::InvalidCloseBlock);
    }
    pool.last_rewarded_block = last_rewarded_block;
    store(env, pool_id, &pool);
    Ok(pool)
}

/// Apply `apply` to the stored pool and persist the result.
pub fn update<F>(env: &Env, pool_id: u32, apply: F) -> Result<Pool, ContractError>
where
    F: FnOnce(&mut Pool),
{
    let mut pool = load(env, pool_id)?;
    apply(&mut pool);
    store(env, pool_id, &pool);
    Ok(pool)
}
