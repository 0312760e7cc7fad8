extern crate std;

use soroban_sdk::{testutils::Address as _, Address};

use crate::{
    test::{advance, create_pool, setup, START_BLOCK},
    ContractError, Pool,
};

// ── Initialisation ────────────────────────────────────────────────────────────

#[test]
fn test_initialize() {
    let s = setup();

    assert!(s.client.is_initialized());
    assert_eq!(s.client.get_admin(), s.admin);
    assert_eq!(s.client.get_reward_token(), s.reward_token);
    assert!(s.client.is_admin(&s.admin));
    assert_eq!(s.client.pool_count(), 0);
}

#[test]
fn test_double_initialize_fails() {
    let s = setup();
    let other = Address::generate(&s.env);

    match s.client.try_initialize(&other, &s.reward_token) {
        Err(Ok(e)) => assert_eq!(e, ContractError::AlreadyInitialized),
        _ => unreachable!("Expected AlreadyInitialized error"),
    }
    assert_eq!(s.client.get_admin(), s.admin);
}

// ── Pool registry ─────────────────────────────────────────────────────────────

#[test]
fn test_create_pool_assigns_sequential_ids() {
    let s = setup();

    let first = create_pool(&s, 13_000, 100, 1, 50, 3_600);
    let second = create_pool(&s, 1, 1, 0, 0, 0);

    assert_eq!(first, 0);
    assert_eq!(second, 1);
    assert_eq!(s.client.pool_count(), 2);
    assert_eq!(
        s.client.get_pool(&first),
        Pool {
            token: s.stake_token.clone(),
            lock_time: 3_600,
            amount_per_reward: 13_000,
            reward_per_block: 100,
            minimum_deposit: 50,
            deposit_fee: 1,
            last_rewarded_block: 0,
        }
    );
    assert_eq!(s.client.list_pools().len(), 2);
}

#[test]
fn test_create_pool_rejects_fee_above_hundred_percent() {
    let s = setup();

    match s.client.try_create_pool(&s.admin, &s.stake_token, &1, &1, &1001, &0, &0) {
        Err(Ok(e)) => assert_eq!(e, ContractError::InvalidPercentage),
        _ => unreachable!("Expected InvalidPercentage error"),
    }
    assert_eq!(s.client.pool_count(), 0);

    // Exactly 100 % is allowed.
    let pool_id = create_pool(&s, 1, 1, 1000, 0, 0);
    assert_eq!(s.client.get_pool(&pool_id).deposit_fee, 1000);
}

#[test]
fn test_create_pool_rejects_oversized_parameters() {
    let s = setup();

    match s.client.try_create_pool(&s.admin, &s.stake_token, &(1u64 << 40), &1, &0, &0, &0) {
        Err(Ok(e)) => assert_eq!(e, ContractError::ArithmeticOverflow),
        _ => unreachable!("Expected ArithmeticOverflow error"),
    }
    match s.client.try_create_pool(&s.admin, &s.stake_token, &1, &(1u128 << 72), &0, &0, &0) {
        Err(Ok(e)) => assert_eq!(e, ContractError::ArithmeticOverflow),
        _ => unreachable!("Expected ArithmeticOverflow error"),
    }
    match s.client.try_create_pool(&s.admin, &s.stake_token, &1, &1, &0, &(1u128 << 104), &0) {
        Err(Ok(e)) => assert_eq!(e, ContractError::ArithmeticOverflow),
        _ => unreachable!("Expected ArithmeticOverflow error"),
    }
    assert_eq!(s.client.pool_count(), 0);

    let pool_id = create_pool(&s, (1u64 << 40) - 1, (1u128 << 72) - 1, 0, (1u128 << 104) - 1, 0);
    assert_eq!(pool_id, 0);
}

#[test]
fn test_create_pool_by_non_admin_fails() {
    let s = setup();
    let stranger = Address::generate(&s.env);

    match s.client.try_create_pool(&stranger, &s.stake_token, &1, &1, &0, &0, &0) {
        Err(Ok(e)) => assert_eq!(e, ContractError::Unauthorized),
        _ => unreachable!("Expected Unauthorized error"),
    }
    assert_eq!(s.client.pool_count(), 0);
}

#[test]
fn test_get_unknown_pool_fails() {
    let s = setup();
    create_pool(&s, 1, 1, 0, 0, 0);

    match s.client.try_get_pool(&1) {
        Err(Ok(e)) => assert_eq!(e, ContractError::PoolNotFound),
        _ => unreachable!("Expected PoolNotFound error"),
    }
}

#[test]
fn test_setters_update_pool() {
    let s = setup();
    let pool_id = create_pool(&s, 1, 1, 0, 0, 0);

    s.client.set_amount_per_reward(&s.admin, &pool_id, &500);
    s.client.set_reward_per_block(&s.admin, &pool_id, &7);
    s.client.set_deposit_fee(&s.admin, &pool_id, &25);
    s.client.set_minimum_deposit(&s.admin, &pool_id, &1_000);
    s.client.set_lock_time(&s.admin, &pool_id, &86_400);

    let pool = s.client.get_pool(&pool_id);
    assert_eq!(pool.amount_per_reward, 500);
    assert_eq!(pool.reward_per_block, 7);
    assert_eq!(pool.deposit_fee, 25);
    assert_eq!(pool.minimum_deposit, 1_000);
    assert_eq!(pool.lock_time, 86_400);
    assert_eq!(pool.last_rewarded_block, 0);
}

#[test]
fn test_setters_validate_and_leave_pool_unchanged() {
    let s = setup();
    let pool_id = create_pool(&s, 1, 1, 10, 0, 0);
    let before = s.client.get_pool(&pool_id);

    match s.client.try_set_deposit_fee(&s.admin, &pool_id, &1001) {
        Err(Ok(e)) => assert_eq!(e, ContractError::InvalidPercentage),
        _ => unreachable!("Expected InvalidPercentage error"),
    }
    match s.client.try_set_reward_per_block(&s.admin, &pool_id, &(1u128 << 72)) {
        Err(Ok(e)) => assert_eq!(e, ContractError::ArithmeticOverflow),
        _ => unreachable!("Expected ArithmeticOverflow error"),
    }
    match s.client.try_set_lock_time(&s.admin, &9, &60) {
        Err(Ok(e)) => assert_eq!(e, ContractError::PoolNotFound),
        _ => unreachable!("Expected PoolNotFound error"),
    }
    let stranger = Address::generate(&s.env);
    match s.client.try_set_minimum_deposit(&stranger, &pool_id, &5) {
        Err(Ok(e)) => assert_eq!(e, ContractError::Unauthorized),
        _ => unreachable!("Expected Unauthorized error"),
    }

    assert_eq!(s.client.get_pool(&pool_id), before);
}

// ── Closing ───────────────────────────────────────────────────────────────────

#[test]
fn test_close_pool_requires_future_block() {
    let s = setup();
    let pool_id = create_pool(&s, 1, 1, 0, 0, 0);

    match s.client.try_close_pool(&s.admin, &pool_id, &START_BLOCK) {
        Err(Ok(e)) => assert_eq!(e, ContractError::InvalidCloseBlock),
        _ => unreachable!("Expected InvalidCloseBlock error"),
    }
    match s.client.try_close_pool(&s.admin, &pool_id, &(START_BLOCK - 1)) {
        Err(Ok(e)) => assert_eq!(e, ContractError::InvalidCloseBlock),
        _ => unreachable!("Expected InvalidCloseBlock error"),
    }
    assert_eq!(s.client.get_pool(&pool_id).last_rewarded_block, 0);

    s.client.close_pool(&s.admin, &pool_id, &(START_BLOCK + 1));
    assert_eq!(s.client.get_pool(&pool_id).last_rewarded_block, START_BLOCK + 1);
}

#[test]
fn test_close_pool_can_be_rescheduled() {
    let s = setup();
    let pool_id = create_pool(&s, 1, 1, 0, 0, 0);

    s.client.close_pool(&s.admin, &pool_id, &(START_BLOCK + 500));
    s.client.close_pool(&s.admin, &pool_id, &(START_BLOCK + 50));
    assert_eq!(s.client.get_pool(&pool_id).last_rewarded_block, START_BLOCK + 50);

    advance(&s.env, 10, 10);
    s.client.close_pool(&s.admin, &pool_id, &(START_BLOCK + 900));
    assert_eq!(s.client.get_pool(&pool_id).last_rewarded_block, START_BLOCK + 900);
}

#[test]
fn test_close_unknown_pool_fails() {
    let s = setup();

    match s.client.try_close_pool(&s.admin, &3, &(START_BLOCK + 10)) {
        Err(Ok(e)) => assert_eq!(e, ContractError::PoolNotFound),
        _ => unreachable!("Expected PoolNotFound error"),
    }
}

// ── Admin transfer ────────────────────────────────────────────────────────────

#[test]
fn test_admin_transfer_two_step() {
    let s = setup();
    let new_admin = Address::generate(&s.env);

    s.client.propose_admin(&s.admin, &new_admin);
    assert_eq!(s.client.get_pending_admin(), Some(new_admin.clone()));
    // Nothing changes until the proposal is accepted.
    assert_eq!(s.client.get_admin(), s.admin);

    s.client.accept_admin(&new_admin);
    assert_eq!(s.client.get_admin(), new_admin);
    assert_eq!(s.client.get_pending_admin(), None);

    match s.client.try_create_pool(&s.admin, &s.stake_token, &1, &1, &0, &0, &0) {
        Err(Ok(e)) => assert_eq!(e, ContractError::Unauthorized),
        _ => unreachable!("Expected Unauthorized error"),
    }
    let pool_id = s
        .client
        .create_pool(&new_admin, &s.stake_token, &1, &1, &0, &0, &0);
    assert_eq!(pool_id, 0);
}

#[test]
fn test_accept_admin_by_wrong_address_fails() {
    let s = setup();
    let new_admin = Address::generate(&s.env);
    let impostor = Address::generate(&s.env);

    s.client.propose_admin(&s.admin, &new_admin);

    match s.client.try_accept_admin(&impostor) {
        Err(Ok(e)) => assert_eq!(e, ContractError::Unauthorized),
        _ => unreachable!("Expected Unauthorized error"),
    }
    assert_eq!(s.client.get_admin(), s.admin);
    assert_eq!(s.client.get_pending_admin(), Some(new_admin));
}

#[test]
fn test_accept_admin_without_proposal_fails() {
    let s = setup();
    let someone = Address::generate(&s.env);

    match s.client.try_accept_admin(&someone) {
        Err(Ok(e)) => assert_eq!(e, ContractError::NoPendingAdmin),
        _ => unreachable!("Expected NoPendingAdmin error"),
    }
}

#[test]
fn test_cancel_admin_transfer() {
    let s = setup();
    let new_admin = Address::generate(&s.env);

    s.client.propose_admin(&s.admin, &new_admin);
    s.client.cancel_admin_transfer(&s.admin);
    assert_eq!(s.client.get_pending_admin(), None);

    match s.client.try_accept_admin(&new_admin) {
        Err(Ok(e)) => assert_eq!(e, ContractError::NoPendingAdmin),
        _ => unreachable!("Expected NoPendingAdmin error"),
    }
    match s.client.try_cancel_admin_transfer(&s.admin) {
        Err(Ok(e)) => assert_eq!(e, ContractError::NoPendingAdmin),
        _ => unreachable!("Expected NoPendingAdmin error"),
    }
}

#[test]
fn test_propose_admin_by_non_admin_fails() {
    let s = setup();
    let stranger = Address::generate(&s.env);

    match s.client.try_propose_admin(&stranger, &stranger) {
        Err(Ok(e)) => assert_eq!(e, ContractError::Unauthorized),
        _ => unreachable!("Expected Unauthorized error"),
    }
    assert_eq!(s.client.get_pending_admin(), None);
}
