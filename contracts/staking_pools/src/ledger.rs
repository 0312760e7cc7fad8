//! Token movement against external token contracts.
//!
//! All calls go through the fallible `try_*` client methods: a rejected
//! transfer or mint surfaces as [`ContractError::TransferFailed`] and the
//! enclosing entry point returns it, which reverts every write made so far.

use soroban_sdk::{
    token::{Client as TokenClient, StellarAssetClient},
    Address, Env,
};

use crate::{errors::ContractError, fixed};

/// Move `amount` of `token` from `from` into the engine's custody.
///
/// `from` must have authorized the invocation.
pub fn pull(env: &Env, token: &Address, from: &Address, amount: u128) -> Result<(), ContractError> {
    if amount == 0 {
        return Ok(());
    }
    let amount = fixed::to_token_amount(amount)?;
    match TokenClient::new(env, token).try_transfer(from, &env.current_contract_address(), &amount)
    {
        Ok(Ok(())) => Ok(()),
        _ => Err(ContractError::TransferFailed),
    }
}

/// Release `amount` of `token` from the engine's custody to `to`.
pub fn push(env: &Env, token: &Address, to: &Address, amount: u128) -> Result<(), ContractError> {
    if amount == 0 {
        return Ok(());
    }
    let amount = fixed::to_token_amount(amount)?;
    match TokenClient::new(env, token).try_transfer(&env.current_contract_address(), to, &amount)
    {
        Ok(Ok(())) => Ok(()),
        _ => Err(ContractError::TransferFailed),
    }
}

/// Mint `amount` of the reward asset to `to`. The engine must be the
/// asset's admin.
pub fn mint_reward(
    env: &Env,
    reward_token: &Address,
    to: &Address,
    amount: u128,
) -> Result<(), ContractError> {
    if amount == 0 {
        return Ok(());
    }
    let amount = fixed::to_token_amount(amount)?;
    match StellarAssetClient::new(env, reward_token).try_mint(to, &amount) {
        Ok(Ok(())) => Ok(()),
        _ => Err(ContractError::TransferFailed),
    }
}

/// The engine's current balance of `token`. Negative balances are not
/// possible for a conforming token and read as zero.
pub fn custody_balance(env: &Env, token: &Address) -> u128 {
    let balance = TokenClient::new(env, token).balance(&env.current_contract_address());
    u128::try_from(balance).unwrap_or(0)
}
