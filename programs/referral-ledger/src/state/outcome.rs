// state/outcome.rs
//! Named results of ledger operations. None of these are errors: every
//! variant maps to exactly one message the bot shows the user.
use anchor_lang::prelude::*;

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SettleOutcome {
    /// Counter advanced to `count`, referrer credited `reward`
    Paid { count: u8, reward: u64 },
    /// Integrity problem, nothing touched
    Skipped,
    /// Edge already settled `daily_cap` times today
    Capped,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActivityOutcome {
    Scheduled { fire_at: i64 },
    AlreadyPending,
    NoReferrer,
    SelfReferral,
    CappedToday,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RegistrationOutcome {
    Registered,
    SelfReferral,
    AlreadyReferred,
    /// Record predates this transaction; only first contact can be referred
    ExistingUser,
    /// Referral token points at a user with no ledger record
    ReferrerUnknown,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DailyBonusOutcome {
    Claimed { amount: u64, new_balance: u64, streak: u32 },
    AlreadyClaimed,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OneTimeBonusOutcome {
    Claimed { amount: u64, new_balance: u64 },
    AlreadyClaimed,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SpinOutcome {
    /// `prize == 0` is a losing segment
    Landed { prize: u64, new_balance: u64, spins_remaining: u32 },
    NoSpinsLeft,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WithdrawalOutcome {
    Requested { request_id: u64, amount: u64 },
    BelowMinimum { balance: u64, minimum: u64 },
    AlreadyPending,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BonusKind {
    Welcome,
    Channel,
}

/// Template selector for the messaging side
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NotificationKind {
    ReferralReward,
    MissionReward,
    DailyBonus,
    OneTimeBonus,
    SpinResult,
    WithdrawalApproved,
    WithdrawalRejected,
}
