use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol, Vec};

use crate::{
    errors::ContractError,
    events,
    fixed::{self, Width},
    ledger,
    pools::{self, Pool, FEE_DENOMINATOR},
    rewards, TTL_EXTEND_TO, TTL_THRESHOLD,
};

// ── Storage keys ─────────────────────────────────────────────────────────────

// Per-account persistent storage uses tuple keys: (prefix, pool_id, account)
const DEPOSIT: Symbol = symbol_short!("DEPOSIT");
const FEES: Symbol = symbol_short!("FEES");
const ACCOUNT_COUNT: Symbol = symbol_short!("ACCT_CNT");
const ACCOUNT: Symbol = symbol_short!("ACCOUNT");
const LIABILITY: Symbol = symbol_short!("LIABLE");

/// Upper bound on records returned by one paged read.
pub const MAX_PAGE_SIZE: u32 = 100;

// ── Types ────────────────────────────────────────────────────────────────────

/// One account's stake in one pool. Created by the account's first
/// deposit and never deleted.
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Deposit {
    /// Net (post-fee) stake, bounded to 104 bits.
    pub amount: u128,
    /// Ledger sequence from which unclaimed reward is measured.
    pub reward_block_start: u32,
    /// Timestamp before which ordinary withdrawal is rejected.
    pub lock_time_end: u64,
}

/// A deposit record paired with its owner, for audit exports.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DepositEntry {
    pub account: Address,
    pub deposit: Deposit,
}

// ── Storage helpers ──────────────────────────────────────────────────────────

fn deposit_key(pool_id: u32, account: &Address) -> (Symbol, u32, Address) {
    (DEPOSIT, pool_id, account.clone())
}

fn fees_key(pool_id: u32) -> (Symbol, u32) {
    (FEES, pool_id)
}

fn account_count_key(pool_id: u32) -> (Symbol, u32) {
    (ACCOUNT_COUNT, pool_id)
}

fn account_key(pool_id: u32, index: u32) -> (Symbol, u32, u32) {
    (ACCOUNT, pool_id, index)
}

fn liability_key(token: &Address) -> (Symbol, Address) {
    (LIABILITY, token.clone())
}

pub fn load(env: &Env, pool_id: u32, account: &Address) -> Deposit {
    find(env, pool_id, account).unwrap_or_default()
}

/// The persisted record, if `account` ever deposited into `pool_id`.
fn find(env: &Env, pool_id: u32, account: &Address) -> Option<Deposit> {
    env.storage()
        .persistent()
        .get(&deposit_key(pool_id, account))
}

fn store(env: &Env, pool_id: u32, account: &Address, deposit: &Deposit) {
    let key = deposit_key(pool_id, account);
    env.storage().persistent().set(&key, deposit);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

/// Append `account` to the pool's index. Called once, on first deposit.
fn track_account(env: &Env, pool_id: u32, account: &Address) -> Result<(), ContractError> {
    let index = account_count(env, pool_id);
    let next = index.checked_add(1).ok_or(ContractError::ArithmeticOverflow)?;

    let key = account_key(pool_id, index);
    env.storage().persistent().set(&key, account);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);

    let count_key = account_count_key(pool_id);
    env.storage().persistent().set(&count_key, &next);
    env.storage()
        .persistent()
        .extend_ttl(&count_key, TTL_THRESHOLD, TTL_EXTEND_TO);
    Ok(())
}

/// Number of accounts that have ever deposited into `pool_id`.
pub fn account_count(env: &Env, pool_id: u32) -> u32 {
    env.storage()
        .persistent()
        .get(&account_count_key(pool_id))
        .unwrap_or(0)
}

/// Up to `limit` (capped at [`MAX_PAGE_SIZE`]) depositors of `pool_id`,
/// starting at index `start`, in first-deposit order.
pub fn accounts(env: &Env, pool_id: u32, start: u32, limit: u32) -> Vec<Address> {
    let end = start
        .saturating_add(limit.min(MAX_PAGE_SIZE))
        .min(account_count(env, pool_id));

    let mut out = Vec::new(env);
    for index in start..end {
        if let Some(account) = env.storage().persistent().get(&account_key(pool_id, index)) {
            out.push_back(account);
        }
    }
    out
}

/// Deposit records for one page of [`accounts`].
pub fn entries(env: &Env, pool_id: u32, start: u32, limit: u32) -> Vec<DepositEntry> {
    let mut out = Vec::new(env);
    for account in accounts(env, pool_id, start, limit).iter() {
        let deposit = load(env, pool_id, &account);
        out.push_back(DepositEntry { account, deposit });
    }
    out
}

pub fn collected_fees(env: &Env, pool_id: u32) -> u128 {
    env.storage()
        .persistent()
        .get(&fees_key(pool_id))
        .unwrap_or(0)
}

fn set_collected_fees(env: &Env, pool_id: u32, fees: u128) {
    let key = fees_key(pool_id);
    env.storage().persistent().set(&key, &fees);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

/// Total amount of `token` the engine owes across every pool that stakes it.
pub fn liability(env: &Env, token: &Address) -> u128 {
    env.storage()
        .persistent()
        .get(&liability_key(token))
        .unwrap_or(0)
}

fn add_liability(env: &Env, token: &Address, amount: u128) -> Result<u128, ContractError> {
    let next = fixed::checked_add(liability(env, token), amount, Width::U128)?;
    set_liability(env, token, next);
    Ok(next)
}

fn sub_liability(env: &Env, token: &Address, amount: u128) -> Result<u128, ContractError> {
    let next = fixed::checked_sub(liability(env, token), amount)?;
    set_liability(env, token, next);
    Ok(next)
}

fn set_liability(env: &Env, token: &Address, amount: u128) {
    let key = liability_key(token);
    env.storage().persistent().set(&key, &amount);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

// ── Reward settlement ────────────────────────────────────────────────────────

/// Compute the reward owed at the current block and move the checkpoint
/// there. The checkpoint moves even when nothing is owed.
fn settle(env: &Env, pool: &Pool, deposit: &mut Deposit) -> Result<u128, ContractError> {
    let current_block = env.ledger().sequence();
    let reward = rewards::pending_reward(pool, deposit, current_block)?;
    deposit.reward_block_start = current_block;
    Ok(reward)
}

fn pay_reward(
    env: &Env,
    reward_token: &Address,
    pool_id: u32,
    account: &Address,
    reward: u128,
) -> Result<(), ContractError> {
    ledger::mint_reward(env, reward_token, account, reward)?;
    events::publish_harvested(env, pool_id, account.clone(), reward);
    Ok(())
}

// ── Transitions ──────────────────────────────────────────────────────────────

/// Settle and pay the account's pending reward. Returns the amount paid.
pub fn harvest(
    env: &Env,
    reward_token: &Address,
    pool_id: u32,
    account: &Address,
) -> Result<u128, ContractError> {
    let pool = pools::load(env, pool_id)?;
    let Some(mut deposit) = find(env, pool_id, account) else {
        // Nothing staked, nothing owed, nothing written.
        events::publish_harvested(env, pool_id, account.clone(), 0);
        return Ok(0);
    };

    let reward = settle(env, &pool, &mut deposit)?;
    store(env, pool_id, account, &deposit);

    pay_reward(env, reward_token, pool_id, account, reward)?;
    Ok(reward)
}

/// Stake `amount` (gross) into `pool_id`.
///
/// The fee share of `amount` goes to the pool's collected fees, the rest to
/// the account's stake. The lock restarts from now with the pool's current
/// lock time.
pub fn deposit(
    env: &Env,
    reward_token: &Address,
    pool_id: u32,
    account: &Address,
    amount: u128,
) -> Result<Deposit, ContractError> {
    let pool = pools::load(env, pool_id)?;
    fixed::fit(amount, Width::U104)?;
    let existing = find(env, pool_id, account);
    let is_new = existing.is_none();
    let mut deposit = existing.unwrap_or_default();

    let projected = fixed::checked_add(deposit.amount, amount, Width::U128)?;
    if projected < pool.minimum_deposit {
        return Err(ContractError::BelowMinimumDeposit);
    }

    let reward = settle(env, &pool, &mut deposit)?;

    let fee = fixed::checked_mul(amount, pool.deposit_fee as u128, Width::U128)?
        / FEE_DENOMINATOR as u128;
    let fees = fixed::checked_add(collected_fees(env, pool_id), fee, Width::U128)?;
    let net = fixed::checked_sub(amount, fee)?;
    deposit.amount = fixed::checked_add(deposit.amount, net, Width::U104)?;

    let now = env.ledger().timestamp();
    let lock_time_end = fixed::checked_add(now as u128, pool.lock_time as u128, Width::U64)?;
    deposit.lock_time_end = fixed::to_u64(lock_time_end)?;

    set_collected_fees(env, pool_id, fees);
    if is_new {
        track_account(env, pool_id, account)?;
    }
    store(env, pool_id, account, &deposit);
    add_liability(env, &pool.token, amount)?;

    pay_reward(env, reward_token, pool_id, account, reward)?;
    ledger::pull(env, &pool.token, account, amount)?;

    events::publish_deposited(env, pool_id, account.clone(), amount, fee, deposit.amount);
    Ok(deposit)
}

/// Withdraw `amount` of stake after the lock has expired, settling reward
/// first.
pub fn withdraw(
    env: &Env,
    reward_token: &Address,
    pool_id: u32,
    account: &Address,
    amount: u128,
) -> Result<Deposit, ContractError> {
    let pool = pools::load(env, pool_id)?;
    let Some(mut deposit) = find(env, pool_id, account) else {
        return without_record(amount);
    };

    if env.ledger().timestamp() < deposit.lock_time_end {
        return Err(ContractError::LockNotExpired);
    }

    let reward = settle(env, &pool, &mut deposit)?;
    deposit.amount = deposit
        .amount
        .checked_sub(amount)
        .ok_or(ContractError::InsufficientBalance)?;

    store(env, pool_id, account, &deposit);
    sub_liability(env, &pool.token, amount)?;

    pay_reward(env, reward_token, pool_id, account, reward)?;
    ledger::push(env, &pool.token, account, amount)?;

    events::publish_withdrawn(env, pool_id, account.clone(), amount, deposit.amount);
    Ok(deposit)
}

/// Withdraw `amount` of stake ignoring the lock. Unclaimed reward is
/// forfeited and the checkpoint is left where it was.
pub fn emergency_withdraw(
    env: &Env,
    pool_id: u32,
    account: &Address,
    amount: u128,
) -> Result<Deposit, ContractError> {
    let pool = pools::load(env, pool_id)?;
    let Some(mut deposit) = find(env, pool_id, account) else {
        return without_record(amount);
    };

    deposit.amount = deposit
        .amount
        .checked_sub(amount)
        .ok_or(ContractError::InsufficientBalance)?;

    store(env, pool_id, account, &deposit);
    sub_liability(env, &pool.token, amount)?;

    ledger::push(env, &pool.token, account, amount)?;

    events::publish_emergency_withdrawn(env, pool_id, account.clone(), amount, deposit.amount);
    Ok(deposit)
}

/// Withdrawal by an account that never deposited: only a zero amount
/// succeeds, and it leaves no record behind.
fn without_record(amount: u128) -> Result<Deposit, ContractError> {
    if amount > 0 {
        return Err(ContractError::InsufficientBalance);
    }
    Ok(Deposit::default())
}

/// Pay `amount` of collected fees out to `receiver`.
pub fn withdraw_fees(
    env: &Env,
    pool_id: u32,
    receiver: &Address,
    amount: u128,
) -> Result<u128, ContractError> {
    let pool = pools::load(env, pool_id)?;
    let remaining = collected_fees(env, pool_id)
        .checked_sub(amount)
        .ok_or(ContractError::InsufficientFees)?;

    set_collected_fees(env, pool_id, remaining);
    sub_liability(env, &pool.token, amount)?;

    ledger::push(env, &pool.token, receiver, amount)?;

    events::publish_fees_withdrawn(env, pool_id, receiver.clone(), amount, remaining);
    Ok(remaining)
}
