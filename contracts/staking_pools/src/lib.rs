#![no_std]

pub mod access;
pub mod deposits;
pub mod errors;
pub mod events;
pub mod fixed;
pub mod guard;
pub mod ledger;
pub mod pools;
pub mod rewards;

use soroban_sdk::{
    contract, contractimpl, contracttype, log, symbol_short, Address, Env, Symbol, Vec,
};

pub use deposits::{Deposit, DepositEntry, MAX_PAGE_SIZE};
pub use errors::ContractError;
pub use pools::{Pool, PoolField, FEE_DENOMINATOR};

use guard::KeyLock;

// ── Storage key constants ────────────────────────────────────────────────────

const INITIALIZED: Symbol = symbol_short!("INIT");
const REWARD_TOKEN: Symbol = symbol_short!("RWD_TOK");

// Persistent entries are bumped to roughly a month on every write.
pub(crate) const DAY_IN_LEDGERS: u32 = 17280;
pub(crate) const TTL_EXTEND_TO: u32 = 30 * DAY_IN_LEDGERS;
pub(crate) const TTL_THRESHOLD: u32 = TTL_EXTEND_TO - DAY_IN_LEDGERS;

// ── Public-facing types ──────────────────────────────────────────────────────

/// Audit view of one pool: configuration, fee balance and one page of
/// deposit records beginning at account index `start`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolSnapshot {
    pub pool_id: u32,
    pub pool: Pool,
    pub collected_fees: u128,
    /// Total depositors, across all pages.
    pub account_count: u32,
    pub start: u32,
    pub deposits: Vec<DepositEntry>,
}

// ── Contract ─────────────────────────────────────────────────────────────────

#[contract]
pub struct StakingPoolsContract;

#[contractimpl]
impl StakingPoolsContract {
    // ── Initialisation ──────────────────────────────────────────────────────

    /// Bootstrap the engine.
    ///
    /// * `admin`        – address allowed to manage pools and collect fees.
    /// * `reward_token` – asset minted as reward. The engine must be set as
    ///   its admin before anyone harvests a nonzero reward.
    pub fn initialize(env: Env, admin: Address, reward_token: Address) -> Result<(), ContractError> {
        if env.storage().instance().has(&INITIALIZED) {
            return Err(ContractError::AlreadyInitialized);
        }

        access::set_admin(&env, &admin);
        env.storage().instance().set(&REWARD_TOKEN, &reward_token);
        env.storage().instance().set(&INITIALIZED, &true);
        env.storage()
            .instance()
            .extend_ttl(TTL_THRESHOLD, TTL_EXTEND_TO);

        events::publish_initialized(&env, admin, reward_token);
        Ok(())
    }

    pub fn is_initialized(env: Env) -> bool {
        env.storage().instance().has(&INITIALIZED)
    }

    pub fn get_admin(env: Env) -> Result<Address, ContractError> {
        access::get_admin(&env)
    }

    pub fn is_admin(env: Env, caller: Address) -> bool {
        access::is_admin(&env, &caller)
    }

    pub fn get_reward_token(env: Env) -> Result<Address, ContractError> {
        Self::reward_token(&env)
    }

    // ── Pool registry ───────────────────────────────────────────────────────

    /// Append a new pool and return its id.
    ///
    /// `deposit_fee` is in tenths of a percent and may not exceed 1000.
    #[allow(clippy::too_many_arguments)]
    pub fn create_pool(
        env: Env,
        admin: Address,
        token: Address,
        amount_per_reward: u64,
        reward_per_block: u128,
        deposit_fee: u32,
        minimum_deposit: u128,
        lock_time: u32,
    ) -> Result<u32, ContractError> {
        Self::require_initialized(&env)?;
        access::require_admin(&env, &admin)?;

        pools::validate_fee(deposit_fee)?;
        pools::validate_amount_per_reward(amount_per_reward)?;
        pools::validate_reward_per_block(reward_per_block)?;
        pools::validate_minimum_deposit(minimum_deposit)?;

        let pool = Pool {
            token,
            lock_time,
            amount_per_reward,
            reward_per_block,
            minimum_deposit,
            deposit_fee,
            last_rewarded_block: 0,
        };
        let pool_id = pools::append(&env, &pool)?;

        log!(&env, "pool created", pool_id);
        events::publish_pool_created(&env, pool_id, pool);
        Ok(pool_id)
    }

    /// Stop reward accrual for `pool_id` after `last_rewarded_block`, which
    /// must be in the future.
    pub fn close_pool(
        env: Env,
        admin: Address,
        pool_id: u32,
        last_rewarded_block: u32,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        access::require_admin(&env, &admin)?;

        pools::close(&env, pool_id, last_rewarded_block)?;

        events::publish_pool_closed(&env, pool_id, last_rewarded_block);
        Ok(())
    }

    pub fn set_amount_per_reward(
        env: Env,
        admin: Address,
        pool_id: u32,
        amount_per_reward: u64,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        access::require_admin(&env, &admin)?;
        pools::validate_amount_per_reward(amount_per_reward)?;

        pools::update(&env, pool_id, |pool| pool.amount_per_reward = amount_per_reward)?;

        events::publish_pool_updated(
            &env,
            pool_id,
            PoolField::AmountPerReward,
            amount_per_reward as u128,
        );
        Ok(())
    }

    pub fn set_reward_per_block(
        env: Env,
        admin: Address,
        pool_id: u32,
        reward_per_block: u128,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        access::require_admin(&env, &admin)?;
        pools::validate_reward_per_block(reward_per_block)?;

        pools::update(&env, pool_id, |pool| pool.reward_per_block = reward_per_block)?;

        events::publish_pool_updated(&env, pool_id, PoolField::RewardPerBlock, reward_per_block);
        Ok(())
    }

    pub fn set_deposit_fee(
        env: Env,
        admin: Address,
        pool_id: u32,
        deposit_fee: u32,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        access::require_admin(&env, &admin)?;
        pools::validate_fee(deposit_fee)?;

        pools::update(&env, pool_id, |pool| pool.deposit_fee = deposit_fee)?;

        events::publish_pool_updated(&env, pool_id, PoolField::DepositFee, deposit_fee as u128);
        Ok(())
    }

    pub fn set_minimum_deposit(
        env: Env,
        admin: Address,
        pool_id: u32,
        minimum_deposit: u128,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        access::require_admin(&env, &admin)?;
        pools::validate_minimum_deposit(minimum_deposit)?;

        pools::update(&env, pool_id, |pool| pool.minimum_deposit = minimum_deposit)?;

        events::publish_pool_updated(&env, pool_id, PoolField::MinimumDeposit, minimum_deposit);
        Ok(())
    }

    /// Change the lock applied to *future* deposits. Existing locks keep
    /// their end time until the account deposits again.
    pub fn set_lock_time(
        env: Env,
        admin: Address,
        pool_id: u32,
        lock_time: u32,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        access::require_admin(&env, &admin)?;

        pools::update(&env, pool_id, |pool| pool.lock_time = lock_time)?;

        events::publish_pool_updated(&env, pool_id, PoolField::LockTime, lock_time as u128);
        Ok(())
    }

    pub fn get_pool(env: Env, pool_id: u32) -> Result<Pool, ContractError> {
        pools::load(&env, pool_id)
    }

    pub fn list_pools(env: Env) -> Result<Vec<Pool>, ContractError> {
        pools::list(&env)
    }

    pub fn pool_count(env: Env) -> u32 {
        pools::count(&env)
    }

    // ── Staking ─────────────────────────────────────────────────────────────

    /// Stake `amount` into `pool_id`, settling any pending reward first.
    pub fn deposit(
        env: Env,
        account: Address,
        pool_id: u32,
        amount: u128,
    ) -> Result<Deposit, ContractError> {
        Self::require_initialized(&env)?;
        account.require_auth();
        let _lock = KeyLock::account(&env, pool_id, &account)?;

        let reward_token = Self::reward_token(&env)?;
        deposits::deposit(&env, &reward_token, pool_id, &account, amount)
    }

    /// Withdraw `amount` of stake once the lock has expired, settling any
    /// pending reward first.
    pub fn withdraw(
        env: Env,
        account: Address,
        pool_id: u32,
        amount: u128,
    ) -> Result<Deposit, ContractError> {
        Self::require_initialized(&env)?;
        account.require_auth();
        let _lock = KeyLock::account(&env, pool_id, &account)?;

        let reward_token = Self::reward_token(&env)?;
        deposits::withdraw(&env, &reward_token, pool_id, &account, amount)
    }

    /// Withdraw `amount` of stake regardless of the lock, forfeiting any
    /// unclaimed reward.
    pub fn emergency_withdraw(
        env: Env,
        account: Address,
        pool_id: u32,
        amount: u128,
    ) -> Result<Deposit, ContractError> {
        Self::require_initialized(&env)?;
        account.require_auth();
        let _lock = KeyLock::account(&env, pool_id, &account)?;

        let deposit = deposits::emergency_withdraw(&env, pool_id, &account, amount)?;
        log!(&env, "emergency withdraw", pool_id, amount);
        Ok(deposit)
    }

    /// Pay out the account's pending reward and return the amount paid.
    pub fn harvest(env: Env, account: Address, pool_id: u32) -> Result<u128, ContractError> {
        Self::require_initialized(&env)?;
        account.require_auth();
        let _lock = KeyLock::account(&env, pool_id, &account)?;

        let reward_token = Self::reward_token(&env)?;
        deposits::harvest(&env, &reward_token, pool_id, &account)
    }

    // ── Fees ────────────────────────────────────────────────────────────────

    /// Send `amount` of the pool's collected fees to `receiver` and return
    /// what remains.
    pub fn withdraw_fees(
        env: Env,
        admin: Address,
        pool_id: u32,
        receiver: Address,
        amount: u128,
    ) -> Result<u128, ContractError> {
        Self::require_initialized(&env)?;
        access::require_admin(&env, &admin)?;
        let _lock = KeyLock::fees(&env, pool_id)?;

        deposits::withdraw_fees(&env, pool_id, &receiver, amount)
    }

    pub fn get_collected_fees(env: Env, pool_id: u32) -> Result<u128, ContractError> {
        pools::load(&env, pool_id)?;
        Ok(deposits::collected_fees(&env, pool_id))
    }

    // ── View functions ──────────────────────────────────────────────────────

    /// Reward `account` would receive if it harvested now.
    pub fn pending_reward(env: Env, pool_id: u32, account: Address) -> Result<u128, ContractError> {
        let pool = pools::load(&env, pool_id)?;
        let deposit = deposits::load(&env, pool_id, &account);
        rewards::pending_reward(&pool, &deposit, env.ledger().sequence())
    }

    /// The account's deposit record; a zero record if it never deposited.
    pub fn get_deposit(env: Env, pool_id: u32, account: Address) -> Result<Deposit, ContractError> {
        pools::load(&env, pool_id)?;
        Ok(deposits::load(&env, pool_id, &account))
    }

    pub fn get_pool_account_count(env: Env, pool_id: u32) -> Result<u32, ContractError> {
        pools::load(&env, pool_id)?;
        Ok(deposits::account_count(&env, pool_id))
    }

    /// Depositors of `pool_id` from index `start`, at most `limit` of them
    /// (capped at [`MAX_PAGE_SIZE`]).
    pub fn get_pool_accounts(
        env: Env,
        pool_id: u32,
        start: u32,
        limit: u32,
    ) -> Result<Vec<Address>, ContractError> {
        pools::load(&env, pool_id)?;
        Ok(deposits::accounts(&env, pool_id, start, limit))
    }

    /// One page of the pool's audit view. Walk `start` forward by
    /// `deposits.len()` until it reaches `account_count`.
    pub fn export_pool(
        env: Env,
        pool_id: u32,
        start: u32,
        limit: u32,
    ) -> Result<PoolSnapshot, ContractError> {
        let pool = pools::load(&env, pool_id)?;
        Ok(PoolSnapshot {
            pool_id,
            pool,
            collected_fees: deposits::collected_fees(&env, pool_id),
            account_count: deposits::account_count(&env, pool_id),
            start,
            deposits: deposits::entries(&env, pool_id, start, limit),
        })
    }

    /// Sum of stakes and collected fees owed in `token` across every pool
    /// that uses it.
    pub fn get_token_liability(env: Env, token: Address) -> u128 {
        deposits::liability(&env, &token)
    }

    /// True when the engine holds at least what it owes in `token`.
    pub fn verify_custody(env: Env, token: Address) -> bool {
        ledger::custody_balance(&env, &token) >= deposits::liability(&env, &token)
    }

    // ── Admin transfer (two-step) ──────────────────────────────────────────

    /// Propose a new admin address. Only the current admin can call this.
    /// The new admin must call `accept_admin` to complete the transfer.
    pub fn propose_admin(
        env: Env,
        current_admin: Address,
        new_admin: Address,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        access::propose(&env, &current_admin, &new_admin)
    }

    /// Accept the pending admin transfer. Only the proposed new admin can call this.
    pub fn accept_admin(env: Env, new_admin: Address) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        access::accept(&env, &new_admin)
    }

    /// Cancel a pending admin transfer. Only the current admin can call this.
    pub fn cancel_admin_transfer(env: Env, current_admin: Address) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        access::cancel(&env, &current_admin)
    }

    pub fn get_pending_admin(env: Env) -> Option<Address> {
        access::get_pending_admin(&env)
    }

    // ── Internal helpers ─────────────────────────────────────────────────────

    /// Guard: revert if the contract is not yet initialized. Keeps the
    /// instance entry alive on every state-changing call.
    fn require_initialized(env: &Env) -> Result<(), ContractError> {
        if !env.storage().instance().has(&INITIALIZED) {
            return Err(ContractError::NotInitialized);
        }
        env.storage()
            .instance()
            .extend_ttl(TTL_THRESHOLD, TTL_EXTEND_TO);
        Ok(())
    }

    fn reward_token(env: &Env) -> Result<Address, ContractError> {
        env.storage()
            .instance()
            .get(&REWARD_TOKEN)
            .ok_or(ContractError::NotInitialized)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────


#[cfg(test)]
mod test_admin;
