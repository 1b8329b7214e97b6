// constants.rs
use crate::state::{Mission, MissionKind, SpinPrize, Tier};

// ============================================================================
// MONEY
// ============================================================================

/// All amounts are stored in paise (1 INR = 100 paise)
pub const PAISE_PER_RUPEE: u64 = 100;

// ============================================================================
// CALENDAR
// ============================================================================

pub const SECONDS_PER_DAY: i64 = 86_400;

/// IST (UTC+05:30); the day boundary the bot's users live in
pub const DEFAULT_UTC_OFFSET_SECS: i64 = 19_800;

// ============================================================================
// REFERRAL SETTLEMENT
// ============================================================================

/// Paid settlements per referral edge per calendar day
pub const DEFAULT_DAILY_CAP: u8 = 3;

/// Delay between a qualifying signal and its settlement attempt (5 minutes)
pub const DEFAULT_GRACE_PERIOD_SECS: i64 = 300;

/// Spins credited to a referrer for every new referred user
pub const DEFAULT_SPINS_PER_REFERRAL: u32 = 1;

// ============================================================================
// TIERS
// ============================================================================

pub const MAX_TIERS: usize = 5;

/// Default tier table: rate is paid per settlement
pub const DEFAULT_TIERS: [Tier; 4] = [
    Tier { level: 1, min_earnings: 0, rate: 40 },          // Bronze  ₹0.40
    Tier { level: 2, min_earnings: 5_000, rate: 50 },      // Silver  ₹0.50 from ₹50
    Tier { level: 3, min_earnings: 20_000, rate: 60 },     // Gold    ₹0.60 from ₹200
    Tier { level: 4, min_earnings: 50_000, rate: 80 },     // Diamond ₹0.80 from ₹500
];

// ============================================================================
// MISSIONS
// ============================================================================

/// Mission completion is a per-day bitmask, so this can never exceed 8
pub const MAX_MISSIONS: usize = 4;

pub const DEFAULT_MISSIONS: [Mission; 3] = [
    Mission { id: 0, kind: MissionKind::SearchQuota, target: 3, reward: 100 },
    Mission { id: 1, kind: MissionKind::DailyCheckIn, target: 1, reward: 20 },
    Mission { id: 2, kind: MissionKind::SpinWheel, target: 2, reward: 30 },
];

// ============================================================================
// BONUSES & SPIN WHEEL
// ============================================================================

pub const DEFAULT_DAILY_BONUS_BASE: u64 = 10;        // ₹0.10
pub const DEFAULT_DAILY_BONUS_MULTIPLIER: u64 = 5;   // +₹0.05 per streak day
pub const DEFAULT_WELCOME_BONUS: u64 = 200;          // ₹2.00
pub const DEFAULT_CHANNEL_BONUS: u64 = 100;          // ₹1.00

pub const MAX_SPIN_PRIZES: usize = 8;

/// Wheel segments; weights are relative, zero amount is a loss
pub const DEFAULT_SPIN_PRIZES: [SpinPrize; 6] = [
    SpinPrize { amount: 0, weight: 40 },
    SpinPrize { amount: 10, weight: 30 },
    SpinPrize { amount: 25, weight: 15 },
    SpinPrize { amount: 50, weight: 10 },
    SpinPrize { amount: 100, weight: 4 },
    SpinPrize { amount: 500, weight: 1 },
];

// ============================================================================
// WITHDRAWALS & HOUSEKEEPING
// ============================================================================

pub const DEFAULT_MIN_WITHDRAWAL: u64 = 5_000;       // ₹50.00

/// Days without activity before an empty account may be purged
pub const DEFAULT_STALE_AFTER_DAYS: u32 = 90;

// ============================================================================
// PDA SEEDS
// ============================================================================

pub const LEDGER_STATE_SEED: &[u8] = b"ledger_state";
pub const REWARD_CONFIG_SEED: &[u8] = b"reward_config";
pub const USER_SEED: &[u8] = b"user";
pub const REFERRAL_SEED: &[u8] = b"referral";
pub const PENDING_SEED: &[u8] = b"pending";
pub const WITHDRAWAL_SEED: &[u8] = b"withdrawal";
