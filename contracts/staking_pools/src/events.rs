#![allow(deprecated)] // events().publish migration tracked separately

use soroban_sdk::{symbol_short, Address, Env};

use crate::pools::{Pool, PoolField};

// ── Event payloads ──────────────────────────────────────────────────────────

/// Fired once when the engine is bootstrapped.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub admin: Address,
    pub reward_token: Address,
    pub timestamp: u64,
}

/// Fired when a pool is appended to the registry.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolCreatedEvent {
    pub pool_id: u32,
    pub pool: Pool,
    pub timestamp: u64,
}

/// Fired when one pool parameter changes. `value` carries the new setting
/// widened to `u128`.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolUpdatedEvent {
    pub pool_id: u32,
    pub field: PoolField,
    pub value: u128,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolClosedEvent {
    pub pool_id: u32,
    pub last_rewarded_block: u32,
    pub timestamp: u64,
}

/// Fired when an account stakes. `amount` is gross, `fee` the retained
/// share.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DepositedEvent {
    pub pool_id: u32,
    pub account: Address,
    pub amount: u128,
    pub fee: u128,
    pub new_balance: u128,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WithdrawnEvent {
    pub pool_id: u32,
    pub account: Address,
    pub amount: u128,
    pub new_balance: u128,
    pub timestamp: u64,
}

/// Fired whenever reward is settled, including zero payouts.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HarvestedEvent {
    pub pool_id: u32,
    pub account: Address,
    pub reward: u128,
    pub block: u32,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FeesWithdrawnEvent {
    pub pool_id: u32,
    pub receiver: Address,
    pub amount: u128,
    pub remaining: u128,
    pub timestamp: u64,
}

/// Fired when an admin transfer is proposed.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AdminTransferProposedEvent {
    pub current_admin: Address,
    pub proposed_admin: Address,
    pub timestamp: u64,
}

/// Fired when an admin transfer is accepted.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AdminTransferAcceptedEvent {
    pub old_admin: Address,
    pub new_admin: Address,
    pub timestamp: u64,
}

/// Fired when a pending admin transfer is cancelled.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AdminTransferCancelledEvent {
    pub admin: Address,
    pub cancelled_proposed: Address,
    pub timestamp: u64,
}

// ── Publishers ──────────────────────────────────────────────────────────────

pub fn publish_initialized(env: &Env, admin: Address, reward_token: Address) {
    env.events().publish(
        (symbol_short!("INIT"),),
        InitializedEvent {
            admin,
            reward_token,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_pool_created(env: &Env, pool_id: u32, pool: Pool) {
    env.events().publish(
        (symbol_short!("POOL_NEW"), pool_id),
        PoolCreatedEvent {
            pool_id,
            pool,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_pool_updated(env: &Env, pool_id: u32, field: PoolField, value: u128) {
    env.events().publish(
        (symbol_short!("POOL_UPD"), pool_id),
        PoolUpdatedEvent {
            pool_id,
            field,
            value,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_pool_closed(env: &Env, pool_id: u32, last_rewarded_block: u32) {
    env.events().publish(
        (symbol_short!("POOL_CLS"), pool_id),
        PoolClosedEvent {
            pool_id,
            last_rewarded_block,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_deposited(
    env: &Env,
    pool_id: u32,
    account: Address,
    amount: u128,
    fee: u128,
    new_balance: u128,
) {
    env.events().publish(
        (symbol_short!("DEPOSIT"), pool_id, account.clone()),
        DepositedEvent {
            pool_id,
            account,
            amount,
            fee,
            new_balance,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_withdrawn(env: &Env, pool_id: u32, account: Address, amount: u128, new_balance: u128) {
    env.events().publish(
        (symbol_short!("WITHDRAW"), pool_id, account.clone()),
        WithdrawnEvent {
            pool_id,
            account,
            amount,
            new_balance,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_emergency_withdrawn(
    env: &Env,
    pool_id: u32,
    account: Address,
    amount: u128,
    new_balance: u128,
) {
    env.events().publish(
        (symbol_short!("EMRG_WD"), pool_id, account.clone()),
        WithdrawnEvent {
            pool_id,
            account,
            amount,
            new_balance,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_harvested(env: &Env, pool_id: u32, account: Address, reward: u128) {
    env.events().publish(
        (symbol_short!("HARVEST"), pool_id, account.clone()),
        HarvestedEvent {
            pool_id,
            account,
            reward,
            block: env.ledger().sequence(),
        },
    );
}

pub fn publish_fees_withdrawn(
    env: &Env,
    pool_id: u32,
    receiver: Address,
    amount: u128,
    remaining: u128,
) {
    env.events().publish(
        (symbol_short!("FEES_WD"), pool_id),
        FeesWithdrawnEvent {
            pool_id,
            receiver,
            amount,
            remaining,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_admin_transfer_proposed(env: &Env, current_admin: Address, proposed_admin: Address) {
    env.events().publish(
        (symbol_short!("ADM_PROP"), current_admin.clone()),
        AdminTransferProposedEvent {
            current_admin,
            proposed_admin,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_admin_transfer_accepted(env: &Env, old_admin: Address, new_admin: Address) {
    env.events().publish(
        (symbol_short!("ADM_ACPT"), new_admin.clone()),
        AdminTransferAcceptedEvent {
            old_admin,
            new_admin,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_admin_transfer_cancelled(env: &Env, admin: Address, cancelled_proposed: Address) {
    env.events().publish(
        (symbol_short!("ADM_CNCL"), admin.clone()),
        AdminTransferCancelledEvent {
            admin,
            cancelled_proposed,
            timestamp: env.ledger().timestamp(),
        },
    );
}
