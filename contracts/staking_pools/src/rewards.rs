use crate::{
    deposits::Deposit,
    errors::ContractError,
    fixed,
    pools::Pool,
};

/// Block up to which `pool` has accrued at `current_block`.
///
/// A close scheduled in the future does not cap anything yet; once the
/// current block passes it, accrual freezes at the close block.
pub fn effective_block(pool: &Pool, current_block: u32) -> u32 {
    if pool.last_rewarded_block != 0 && pool.last_rewarded_block < current_block {
        pool.last_rewarded_block
    } else {
        current_block
    }
}

/// Reward owed to `deposit` since its checkpoint, as of `current_block`.
///
/// `amount * reward_per_block * blocks / amount_per_reward`, floored, with a
/// 256-bit intermediate. The result always fits the reward asset's amount
/// type.
pub fn pending_reward(
    pool: &Pool,
    deposit: &Deposit,
    current_block: u32,
) -> Result<u128, ContractError> {
    let effective = effective_block(pool, current_block);
    if effective < deposit.reward_block_start {
        return Ok(0);
    }
    if pool.amount_per_reward == 0 {
        return Err(ContractError::DivisionByZero);
    }

    let blocks = (effective - deposit.reward_block_start) as u128;
    let reward = fixed::mul_mul_div(
        deposit.amount,
        pool.reward_per_block,
        blocks,
        pool.amount_per_reward as u128,
    )?;
    fixed::to_token_amount(reward)?;
    Ok(reward)
}
