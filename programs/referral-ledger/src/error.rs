// error.rs
use anchor_lang::prelude::*;

/// Hard failures. Precondition outcomes (capped, already claimed, no spins)
/// are reported through events, never through this enum.
#[error_code]
pub enum LedgerError {
    // 🪪 ACCESS
    #[msg("Unauthorized admin action")]
    UnauthorizedAdmin,

    #[msg("Signer is not the ledger operator")]
    UnauthorizedOperator,

    #[msg("Ledger is paused")]
    LedgerPaused,

    // ⏱️ SCHEDULING
    #[msg("Settlement is not due yet")]
    SettlementNotDue,

    // 💸 WITHDRAWALS
    #[msg("Withdrawal request is not pending")]
    WithdrawalNotPending,

    #[msg("Insufficient balance")]
    InsufficientBalance,

    #[msg("Withdrawal request id is already in use")]
    RequestIdInUse,

    // 🧹 HOUSEKEEPING
    #[msg("Account is still active or holds funds")]
    AccountNotStale,

    // ⚙️ CONFIG
    #[msg("Tier table must be non-empty, start at zero and ascend")]
    InvalidTierTable,

    #[msg("Mission table is invalid")]
    InvalidMissionTable,

    #[msg("Spin table must be non-empty with non-zero total weight")]
    InvalidSpinTable,

    #[msg("Daily cap must be at least one")]
    InvalidDailyCap,

    #[msg("Invalid configuration value")]
    InvalidConfigValue,

    // 🧮 MISC
    #[msg("Math overflow")]
    MathOverflow,
}
