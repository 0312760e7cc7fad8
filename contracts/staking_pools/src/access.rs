use soroban_sdk::{symbol_short, Address, Env, Symbol};

use crate::{errors::ContractError, events};

// ── Storage keys ─────────────────────────────────────────────────────────────

const ADMIN: Symbol = symbol_short!("ADMIN");
const PENDING_ADMIN: Symbol = symbol_short!("PEND_ADM");

pub fn set_admin(env: &Env, admin: &Address) {
    env.storage().instance().set(&ADMIN, admin);
}

pub fn get_admin(env: &Env) -> Result<Address, ContractError> {
    env.storage()
        .instance()
        .get(&ADMIN)
        .ok_or(ContractError::NotInitialized)
}

pub fn is_admin(env: &Env, caller: &Address) -> bool {
    matches!(get_admin(env), Ok(admin) if admin == *caller)
}

/// Guard: authenticate `caller` and revert unless it is the admin.
pub fn require_admin(env: &Env, caller: &Address) -> Result<(), ContractError> {
    caller.require_auth();
    if !is_admin(env, caller) {
        return Err(ContractError::Unauthorized);
    }
    Ok(())
}

pub fn get_pending_admin(env: &Env) -> Option<Address> {
    env.storage().instance().get(&PENDING_ADMIN)
}

// ── Two-step hand-over ───────────────────────────────────────────────────────

pub fn propose(env: &Env, current_admin: &Address, new_admin: &Address) -> Result<(), ContractError> {
    require_admin(env, current_admin)?;
    env.storage().instance().set(&PENDING_ADMIN, new_admin);
    events::publish_admin_transfer_proposed(env, current_admin.clone(), new_admin.clone());
    Ok(())
}

pub fn accept(env: &Env, new_admin: &Address) -> Result<(), ContractError> {
    new_admin.require_auth();
    let pending = get_pending_admin(env).ok_or(ContractError::NoPendingAdmin)?;
    if *new_admin != pending {
        return Err(ContractError::Unauthorized);
    }
    let old_admin = get_admin(env)?;
    set_admin(env, new_admin);
    env.storage().instance().remove(&PENDING_ADMIN);
    events::publish_admin_transfer_accepted(env, old_admin, new_admin.clone());
    Ok(())
}

pub fn cancel(env: &Env, current_admin: &Address) -> Result<(), ContractError> {
    require_admin(env, current_admin)?;
    let pending = get_pending_admin(env).ok_or(ContractError::NoPendingAdmin)?;
    env.storage().instance().remove(&PENDING_ADMIN);
    events::publish_admin_transfer_cancelled(env, current_admin.clone(), pending);
    Ok(())
}
