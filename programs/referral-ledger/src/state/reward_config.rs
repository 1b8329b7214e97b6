// state/reward_config.rs
use anchor_lang::prelude::*;
use crate::constants::*;
use crate::error::LedgerError;
use crate::utils::{calculations, validation};

/// Referral rate bracket, unlocked by cumulative earnings
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tier {
    pub level: u8,
    /// Cumulative earnings (paise) at which this tier starts
    pub min_earnings: u64,
    /// Paid to the referrer per settlement (paise)
    pub rate: u64,
}

impl Tier {
    pub const SIZE: usize = 1 + 8 + 8;
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MissionKind {
    /// A referred user's search count on one edge reaches the target
    SearchQuota,
    /// Daily bonus claimed
    DailyCheckIn,
    /// Spins taken today reach the target
    SpinWheel,
}

impl Default for MissionKind {
    fn default() -> Self {
        MissionKind::SearchQuota
    }
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Mission {
    /// Bit position in the daily completion mask
    pub id: u8,
    pub kind: MissionKind,
    pub target: u32,
    pub reward: u64,
}

impl Mission {
    pub const SIZE: usize = 1 + 1 + 4 + 8;
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpinPrize {
    /// Zero is a losing segment
    pub amount: u64,
    pub weight: u32,
}

impl SpinPrize {
    pub const SIZE: usize = 8 + 4;
}

/// Full replacement for the tunable part of [`RewardConfig`]
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug)]
pub struct ConfigArgs {
    pub tiers: Vec<Tier>,
    pub missions: Vec<Mission>,
    pub spin_prizes: Vec<SpinPrize>,
    pub daily_cap: u8,
    pub grace_period_secs: i64,
    pub utc_offset_secs: i64,
    pub daily_bonus_base: u64,
    pub daily_bonus_multiplier: u64,
    pub welcome_bonus: u64,
    pub channel_bonus: u64,
    pub spins_per_referral: u32,
    pub min_withdrawal: u64,
    pub stale_after_days: u32,
}

#[account]
pub struct RewardConfig {
    /// Admin authority who can update config
    pub authority: Pubkey,

    /// Referral tiers, ascending by `min_earnings`
    pub tiers: [Tier; MAX_TIERS],
    pub tier_count: u8,

    pub missions: [Mission; MAX_MISSIONS],
    pub mission_count: u8,

    pub spin_prizes: [SpinPrize; MAX_SPIN_PRIZES],
    pub spin_prize_count: u8,

    /// Paid settlements per edge per day
    pub daily_cap: u8,

    /// Delay before a scheduled settlement may fire
    pub grace_period_secs: i64,

    /// Shift applied to unix time before cutting calendar days
    pub utc_offset_secs: i64,

    pub daily_bonus_base: u64,
    pub daily_bonus_multiplier: u64,
    pub welcome_bonus: u64,
    pub channel_bonus: u64,
    pub spins_per_referral: u32,
    pub min_withdrawal: u64,
    pub stale_after_days: u32,

    /// Bumped on every update
    pub version: u64,

    /// Bump seed for PDA
    pub bump: u8,
}

impl RewardConfig {
    /// Size for account allocation
    pub const SIZE: usize = 8 + // discriminator
        32 + // authority
        Tier::SIZE * MAX_TIERS + // tiers
        1 + // tier_count
        Mission::SIZE * MAX_MISSIONS + // missions
        1 + // mission_count
        SpinPrize::SIZE * MAX_SPIN_PRIZES + // spin_prizes
        1 + // spin_prize_count
        1 + // daily_cap
        8 + // grace_period_secs
        8 + // utc_offset_secs
        8 + // daily_bonus_base
        8 + // daily_bonus_multiplier
        8 + // welcome_bonus
        8 + // channel_bonus
        4 + // spins_per_referral
        8 + // min_withdrawal
        4 + // stale_after_days
        8 + // version
        1; // bump

    /// Create new config with default values
    pub fn new(authority: Pubkey, bump: u8) -> Self {
        let mut config = Self {
            authority,
            tiers: [Tier::default(); MAX_TIERS],
            tier_count: 0,
            missions: [Mission::default(); MAX_MISSIONS],
            mission_count: 0,
            spin_prizes: [SpinPrize::default(); MAX_SPIN_PRIZES],
            spin_prize_count: 0,
            daily_cap: DEFAULT_DAILY_CAP,
            grace_period_secs: DEFAULT_GRACE_PERIOD_SECS,
            utc_offset_secs: DEFAULT_UTC_OFFSET_SECS,
            daily_bonus_base: DEFAULT_DAILY_BONUS_BASE,
            daily_bonus_multiplier: DEFAULT_DAILY_BONUS_MULTIPLIER,
            welcome_bonus: DEFAULT_WELCOME_BONUS,
            channel_bonus: DEFAULT_CHANNEL_BONUS,
            spins_per_referral: DEFAULT_SPINS_PER_REFERRAL,
            min_withdrawal: DEFAULT_MIN_WITHDRAWAL,
            stale_after_days: DEFAULT_STALE_AFTER_DAYS,
            version: 0,
            bump,
        };
        config.load_tables(&DEFAULT_TIERS, &DEFAULT_MISSIONS, &DEFAULT_SPIN_PRIZES);
        config
    }

    fn load_tables(&mut self, tiers: &[Tier], missions: &[Mission], spin_prizes: &[SpinPrize]) {
        self.tiers = [Tier::default(); MAX_TIERS];
        self.tiers[..tiers.len()].copy_from_slice(tiers);
        self.tier_count = tiers.len() as u8;

        self.missions = [Mission::default(); MAX_MISSIONS];
        self.missions[..missions.len()].copy_from_slice(missions);
        self.mission_count = missions.len() as u8;

        self.spin_prizes = [SpinPrize::default(); MAX_SPIN_PRIZES];
        self.spin_prizes[..spin_prizes.len()].copy_from_slice(spin_prizes);
        self.spin_prize_count = spin_prizes.len() as u8;
    }

    pub fn tiers(&self) -> &[Tier] {
        &self.tiers[..self.tier_count as usize]
    }

    pub fn missions(&self) -> &[Mission] {
        &self.missions[..self.mission_count as usize]
    }

    pub fn spin_prizes(&self) -> &[SpinPrize] {
        &self.spin_prizes[..self.spin_prize_count as usize]
    }

    /// First configured mission of the given kind
    pub fn mission(&self, kind: MissionKind) -> Option<&Mission> {
        self.missions().iter().find(|m| m.kind == kind)
    }

    /// Tier for the given cumulative earnings
    pub fn tier_for(&self, total_earned: u64) -> Tier {
        calculations::resolve_tier(self.tiers(), total_earned)
    }

    /// Calendar day index for a unix timestamp
    pub fn day_index(&self, unix_timestamp: i64) -> i64 {
        calculations::day_index(unix_timestamp, self.utc_offset_secs)
    }

    /// Validate and swap in a whole new parameter set (admin only).
    /// Nothing is written unless every table passes.
    pub fn apply(&mut self, args: &ConfigArgs) -> Result<()> {
        validation::validate_tiers(&args.tiers)?;
        validation::validate_missions(&args.missions)?;
        validation::validate_spin_prizes(&args.spin_prizes)?;

        require!(args.daily_cap >= 1, LedgerError::InvalidDailyCap);
        require!(args.grace_period_secs >= 0, LedgerError::InvalidConfigValue);
        require!(args.utc_offset_secs.abs() < SECONDS_PER_DAY, LedgerError::InvalidConfigValue);
        require!(args.stale_after_days >= 1, LedgerError::InvalidConfigValue);

        self.load_tables(&args.tiers, &args.missions, &args.spin_prizes);
        self.daily_cap = args.daily_cap;
        self.grace_period_secs = args.grace_period_secs;
        self.utc_offset_secs = args.utc_offset_secs;
        self.daily_bonus_base = args.daily_bonus_base;
        self.daily_bonus_multiplier = args.daily_bonus_multiplier;
        self.welcome_bonus = args.welcome_bonus;
        self.channel_bonus = args.channel_bonus;
        self.spins_per_referral = args.spins_per_referral;
        self.min_withdrawal = args.min_withdrawal;
        self.stale_after_days = args.stale_after_days;
        self.version = self.version
            .checked_add(1)
            .ok_or(LedgerError::MathOverflow)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_args() -> ConfigArgs {
        ConfigArgs {
            tiers: DEFAULT_TIERS.to_vec(),
            missions: DEFAULT_MISSIONS.to_vec(),
            spin_prizes: DEFAULT_SPIN_PRIZES.to_vec(),
            daily_cap: 5,
            grace_period_secs: 60,
            utc_offset_secs: 0,
            daily_bonus_base: 15,
            daily_bonus_multiplier: 3,
            welcome_bonus: 0,
            channel_bonus: 0,
            spins_per_referral: 2,
            min_withdrawal: 10_000,
            stale_after_days: 30,
        }
    }

    #[test]
    fn test_defaults_loaded() {
        let config = RewardConfig::new(Pubkey::default(), 255);
        assert_eq!(config.tiers().len(), DEFAULT_TIERS.len());
        assert_eq!(config.missions().len(), DEFAULT_MISSIONS.len());
        assert_eq!(config.spin_prizes().len(), DEFAULT_SPIN_PRIZES.len());
        assert_eq!(config.daily_cap, 3);
        assert_eq!(config.tier_for(0).rate, 40);
    }

    #[test]
    fn test_size_covers_serialized_account() {
        let config = RewardConfig::new(Pubkey::default(), 255);
        let mut bytes = Vec::new();
        config.try_serialize(&mut bytes).unwrap();
        assert_eq!(bytes.len(), RewardConfig::SIZE);
    }

    #[test]
    fn test_apply_replaces_whole_record() {
        let mut config = RewardConfig::new(Pubkey::default(), 255);
        let mut args = default_args();
        args.tiers = vec![
            Tier { level: 1, min_earnings: 0, rate: 25 },
            Tier { level: 2, min_earnings: 1_000, rate: 35 },
        ];
        config.apply(&args).unwrap();

        assert_eq!(config.tiers().len(), 2);
        assert_eq!(config.tiers[2], Tier::default());
        assert_eq!(config.daily_cap, 5);
        assert_eq!(config.spins_per_referral, 2);
        assert_eq!(config.version, 1);
    }

    #[test]
    fn test_apply_rejects_without_partial_write() {
        let mut config = RewardConfig::new(Pubkey::default(), 255);
        let mut args = default_args();
        args.daily_cap = 0;
        args.tiers = vec![Tier { level: 1, min_earnings: 0, rate: 1 }];

        assert!(config.apply(&args).is_err());
        assert_eq!(config.tiers().len(), DEFAULT_TIERS.len());
        assert_eq!(config.daily_cap, DEFAULT_DAILY_CAP);
        assert_eq!(config.version, 0);
    }

    #[test]
    fn test_mission_lookup_by_kind() {
        let config = RewardConfig::new(Pubkey::default(), 255);
        let quota = config.mission(MissionKind::SearchQuota).unwrap();
        assert_eq!(quota.target, 3);
        assert_eq!(quota.reward, 100);
    }
}
