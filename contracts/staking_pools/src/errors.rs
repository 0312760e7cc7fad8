use crate::fixed::ArithmeticError;

/// Every failure an entry point can surface.
///
/// Discriminants are part of the contract ABI and must stay stable.
/// Returning any of these from an entry point reverts all storage writes
/// made during that invocation.
#[soroban_sdk::contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ContractError {
    // ── Lifecycle ──────────────────────────────────────────
    NotInitialized = 1,
    AlreadyInitialized = 2,

    // ── Access ─────────────────────────────────────────────
    Unauthorized = 3,
    NoPendingAdmin = 4,

    // ── Pool registry ──────────────────────────────────────
    PoolNotFound = 10,
    InvalidPercentage = 11,
    InvalidCloseBlock = 12,

    // ── Deposit ledger ─────────────────────────────────────
    BelowMinimumDeposit = 20,
    LockNotExpired = 21,
    InsufficientBalance = 22,
    InsufficientFees = 23,
    OperationInProgress = 24,

    // ── Arithmetic ─────────────────────────────────────────
    DivisionByZero = 30,
    ArithmeticOverflow = 31,

    // ── External ledger ────────────────────────────────────
    TransferFailed = 40,
}

impl From<ArithmeticError> for ContractError {
    fn from(err: ArithmeticError) -> Self {
        match err {
            ArithmeticError::Overflow | ArithmeticError::Underflow => {
                ContractError::ArithmeticOverflow
            }
            ArithmeticError::DivisionByZero => ContractError::DivisionByZero,
        }
    }
}
