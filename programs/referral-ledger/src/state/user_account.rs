// state/user_account.rs
use anchor_lang::prelude::*;
use crate::constants::*;
use crate::error::LedgerError;
use crate::state::{BonusKind, DailyBonusOutcome, Mission, OneTimeBonusOutcome, WithdrawalOutcome};

/// Per-user ledger record, one PDA per chat user id
#[account]
pub struct UserAccount {
    pub user_id: u64,

    /// Withdrawable amount in paise
    pub balance: u64,

    /// Every credit ever made; drives tier resolution, never decreases
    pub total_earned: u64,

    pub total_withdrawn: u64,

    pub spins_available: u32,

    pub bonus_streak: u32,
    pub last_bonus_day: Option<i64>,

    /// Day the per-day fields below belong to
    pub activity_day: i64,
    /// Bit `mission.id` set once that mission paid out on `activity_day`
    pub missions_completed: u8,
    pub spins_today: u32,

    pub welcome_bonus_claimed: bool,
    pub channel_bonus_claimed: bool,

    pub has_pending_withdrawal: bool,
    /// Next withdrawal request id
    pub withdrawal_count: u64,

    pub referral_count: u32,

    /// Cleared when the messenger reports the user blocked the bot
    pub notifications_enabled: bool,

    /// ISO 639-1 code, e.g. b"en"
    pub language: [u8; 2],

    pub created_at: i64,
    pub last_active_at: i64,
    pub bump: u8,
}

impl UserAccount {
    pub const SIZE: usize = 8 + // discriminator
        8 + // user_id
        8 + // balance
        8 + // total_earned
        8 + // total_withdrawn
        4 + // spins_available
        4 + // bonus_streak
        1 + 8 + // last_bonus_day
        8 + // activity_day
        1 + // missions_completed
        4 + // spins_today
        1 + // welcome_bonus_claimed
        1 + // channel_bonus_claimed
        1 + // has_pending_withdrawal
        8 + // withdrawal_count
        4 + // referral_count
        1 + // notifications_enabled
        2 + // language
        8 + // created_at
        8 + // last_active_at
        1; // bump

    /// Create new user account
    pub fn new(user_id: u64, language: [u8; 2], current_time: i64, bump: u8) -> Self {
        Self {
            user_id,
            balance: 0,
            total_earned: 0,
            total_withdrawn: 0,
            spins_available: 0,
            bonus_streak: 0,
            last_bonus_day: None,
            activity_day: 0,
            missions_completed: 0,
            spins_today: 0,
            welcome_bonus_claimed: false,
            channel_bonus_claimed: false,
            has_pending_withdrawal: false,
            withdrawal_count: 0,
            referral_count: 0,
            notifications_enabled: true,
            language,
            created_at: current_time,
            last_active_at: current_time,
            bump,
        }
    }

    /// A zeroed record freshly allocated by `init_if_needed`
    pub fn is_fresh(&self) -> bool {
        self.created_at == 0
    }

    pub fn touch(&mut self, current_time: i64) {
        self.last_active_at = current_time;
    }

    /// Credit an earning: balance and lifetime earnings move together
    pub fn credit(&mut self, amount: u64) -> Result<u64> {
        let balance = self.balance
            .checked_add(amount)
            .ok_or(LedgerError::MathOverflow)?;
        let total_earned = self.total_earned
            .checked_add(amount)
            .ok_or(LedgerError::MathOverflow)?;

        self.balance = balance;
        self.total_earned = total_earned;
        Ok(balance)
    }

    /// Debit for an approved withdrawal
    pub fn debit(&mut self, amount: u64) -> Result<u64> {
        let balance = self.balance
            .checked_sub(amount)
            .ok_or(LedgerError::InsufficientBalance)?;
        let total_withdrawn = self.total_withdrawn
            .checked_add(amount)
            .ok_or(LedgerError::MathOverflow)?;

        self.balance = balance;
        self.total_withdrawn = total_withdrawn;
        Ok(balance)
    }

    /// Clear per-day counters when the calendar day changed
    pub fn refresh_day(&mut self, today: i64) {
        if self.activity_day != today {
            self.activity_day = today;
            self.missions_completed = 0;
            self.spins_today = 0;
        }
    }

    pub fn mission_completed(&self, mission_id: u8, today: i64) -> bool {
        self.activity_day == today && self.missions_completed & (1u8 << mission_id) != 0
    }

    /// Pay `mission.reward` if `progress` reached the target and the mission
    /// has not paid today. Returns the credited reward.
    pub fn complete_mission(&mut self, mission: &Mission, progress: u32, today: i64) -> Result<Option<u64>> {
        self.refresh_day(today);

        if progress < mission.target || self.mission_completed(mission.id, today) {
            return Ok(None);
        }

        self.credit(mission.reward)?;
        self.missions_completed |= 1u8 << mission.id;
        Ok(Some(mission.reward))
    }

    /// Check-and-set of the daily claim; streak continues only from yesterday
    pub fn claim_daily_bonus(&mut self, today: i64, base: u64, multiplier: u64) -> Result<DailyBonusOutcome> {
        if matches!(self.last_bonus_day, Some(day) if day >= today) {
            return Ok(DailyBonusOutcome::AlreadyClaimed);
        }

        let streak = match self.last_bonus_day {
            Some(day) if day == today - 1 => self.bonus_streak
                .checked_add(1)
                .ok_or(LedgerError::MathOverflow)?,
            _ => 1,
        };

        let amount = (streak as u64)
            .checked_mul(multiplier)
            .and_then(|bonus| bonus.checked_add(base))
            .ok_or(LedgerError::MathOverflow)?;

        let new_balance = self.credit(amount)?;
        self.bonus_streak = streak;
        self.last_bonus_day = Some(today);

        Ok(DailyBonusOutcome::Claimed { amount, new_balance, streak })
    }

    pub fn claim_one_time_bonus(&mut self, kind: BonusKind, amount: u64) -> Result<OneTimeBonusOutcome> {
        let claimed = match kind {
            BonusKind::Welcome => self.welcome_bonus_claimed,
            BonusKind::Channel => self.channel_bonus_claimed,
        };
        if claimed {
            return Ok(OneTimeBonusOutcome::AlreadyClaimed);
        }

        let new_balance = self.credit(amount)?;
        match kind {
            BonusKind::Welcome => self.welcome_bonus_claimed = true,
            BonusKind::Channel => self.channel_bonus_claimed = true,
        }
        Ok(OneTimeBonusOutcome::Claimed { amount, new_balance })
    }

    pub fn grant_spins(&mut self, count: u32) -> Result<u32> {
        self.spins_available = self.spins_available
            .checked_add(count)
            .ok_or(LedgerError::MathOverflow)?;
        Ok(self.spins_available)
    }

    /// Conditional decrement: false when no spin is left
    pub fn take_spin(&mut self, today: i64) -> bool {
        if self.spins_available == 0 {
            return false;
        }
        self.refresh_day(today);
        self.spins_available -= 1;
        self.spins_today = self.spins_today.saturating_add(1);
        true
    }

    /// Snapshot the whole balance into a new request
    pub fn open_withdrawal(&mut self, min_withdrawal: u64) -> Result<WithdrawalOutcome> {
        if self.has_pending_withdrawal {
            return Ok(WithdrawalOutcome::AlreadyPending);
        }
        if self.balance == 0 || self.balance < min_withdrawal {
            return Ok(WithdrawalOutcome::BelowMinimum {
                balance: self.balance,
                minimum: min_withdrawal,
            });
        }

        let request_id = self.withdrawal_count;
        self.withdrawal_count = request_id
            .checked_add(1)
            .ok_or(LedgerError::MathOverflow)?;
        self.has_pending_withdrawal = true;

        Ok(WithdrawalOutcome::Requested { request_id, amount: self.balance })
    }

    /// Close out the pending request; only approval moves money
    pub fn close_withdrawal(&mut self, approved: bool, amount: u64) -> Result<u64> {
        if approved {
            self.debit(amount)?;
        }
        self.has_pending_withdrawal = false;
        Ok(self.balance)
    }

    /// Empty, idle and not waiting on a payout
    pub fn is_stale(&self, current_time: i64, stale_after_days: u32) -> bool {
        let idle = current_time.saturating_sub(self.last_active_at);
        self.balance == 0
            && !self.has_pending_withdrawal
            && idle >= stale_after_days as i64 * SECONDS_PER_DAY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::MissionKind;

    const DAY: i64 = 20_000;

    fn account() -> UserAccount {
        UserAccount::new(42, *b"en", 1_700_000_000, 254)
    }

    #[test]
    fn test_size_covers_serialized_account() {
        let mut acc = account();
        acc.last_bonus_day = Some(DAY);
        let mut bytes = Vec::new();
        acc.try_serialize(&mut bytes).unwrap();
        assert_eq!(bytes.len(), UserAccount::SIZE);
    }

    #[test]
    fn test_credit_tracks_lifetime_earnings() {
        let mut acc = account();
        assert_eq!(acc.credit(40).unwrap(), 40);
        assert_eq!(acc.credit(60).unwrap(), 100);
        acc.debit(30).unwrap();
        assert_eq!(acc.balance, 70);
        assert_eq!(acc.total_earned, 100);
        assert_eq!(acc.total_withdrawn, 30);
    }

    #[test]
    fn test_debit_never_goes_negative() {
        let mut acc = account();
        acc.credit(10).unwrap();
        assert!(acc.debit(11).is_err());
        assert_eq!(acc.balance, 10);
    }

    #[test]
    fn test_daily_bonus_once_per_day() {
        let mut acc = account();
        let first = acc.claim_daily_bonus(DAY, 10, 5).unwrap();
        assert_eq!(first, DailyBonusOutcome::Claimed { amount: 15, new_balance: 15, streak: 1 });

        let balance = acc.balance;
        assert_eq!(acc.claim_daily_bonus(DAY, 10, 5).unwrap(), DailyBonusOutcome::AlreadyClaimed);
        assert_eq!(acc.balance, balance);
    }

    #[test]
    fn test_daily_bonus_streak_resets_after_gap() {
        let mut acc = account();
        let mut streaks = Vec::new();
        for day in [DAY, DAY + 1, DAY + 3] {
            match acc.claim_daily_bonus(day, 10, 5).unwrap() {
                DailyBonusOutcome::Claimed { streak, .. } => streaks.push(streak),
                DailyBonusOutcome::AlreadyClaimed => panic!("claim refused on day {}", day),
            }
        }
        assert_eq!(streaks, vec![1, 2, 1]);
        // 15 + 20 + 15
        assert_eq!(acc.balance, 50);
    }

    #[test]
    fn test_daily_bonus_refuses_earlier_day() {
        let mut acc = account();
        acc.claim_daily_bonus(DAY, 10, 5).unwrap();
        assert_eq!(acc.claim_daily_bonus(DAY - 1, 10, 5).unwrap(), DailyBonusOutcome::AlreadyClaimed);
    }

    #[test]
    fn test_one_time_bonus_flags_are_independent() {
        let mut acc = account();
        assert_eq!(
            acc.claim_one_time_bonus(BonusKind::Welcome, 200).unwrap(),
            OneTimeBonusOutcome::Claimed { amount: 200, new_balance: 200 }
        );
        assert_eq!(acc.claim_one_time_bonus(BonusKind::Welcome, 200).unwrap(), OneTimeBonusOutcome::AlreadyClaimed);
        assert_eq!(
            acc.claim_one_time_bonus(BonusKind::Channel, 100).unwrap(),
            OneTimeBonusOutcome::Claimed { amount: 100, new_balance: 300 }
        );
    }

    #[test]
    fn test_spins_never_go_negative() {
        let mut acc = account();
        acc.grant_spins(3).unwrap();

        let attempts = 10;
        let successes = (0..attempts).filter(|_| acc.take_spin(DAY)).count();

        assert_eq!(successes, 3);
        assert_eq!(acc.spins_available, 0);
        assert_eq!(acc.spins_today, 3);
    }

    #[test]
    fn test_spins_today_resets_on_new_day() {
        let mut acc = account();
        acc.grant_spins(2).unwrap();
        assert!(acc.take_spin(DAY));
        assert!(acc.take_spin(DAY + 1));
        assert_eq!(acc.spins_today, 1);
    }

    #[test]
    fn test_mission_pays_once_per_day() {
        let mut acc = account();
        let mission = Mission { id: 2, kind: MissionKind::SearchQuota, target: 3, reward: 100 };

        assert_eq!(acc.complete_mission(&mission, 2, DAY).unwrap(), None);
        assert_eq!(acc.complete_mission(&mission, 3, DAY).unwrap(), Some(100));
        assert_eq!(acc.complete_mission(&mission, 3, DAY).unwrap(), None);
        assert!(acc.mission_completed(2, DAY));
        assert_eq!(acc.balance, 100);

        // Flags clear on rollover
        assert!(!acc.mission_completed(2, DAY + 1));
        assert_eq!(acc.complete_mission(&mission, 3, DAY + 1).unwrap(), Some(100));
        assert_eq!(acc.balance, 200);
    }

    #[test]
    fn test_withdrawal_single_pending() {
        let mut acc = account();
        acc.credit(4_000).unwrap();
        assert_eq!(
            acc.open_withdrawal(5_000).unwrap(),
            WithdrawalOutcome::BelowMinimum { balance: 4_000, minimum: 5_000 }
        );

        acc.credit(2_000).unwrap();
        assert_eq!(
            acc.open_withdrawal(5_000).unwrap(),
            WithdrawalOutcome::Requested { request_id: 0, amount: 6_000 }
        );
        assert_eq!(acc.open_withdrawal(5_000).unwrap(), WithdrawalOutcome::AlreadyPending);
        assert_eq!(acc.withdrawal_count, 1);
    }

    #[test]
    fn test_withdrawal_approval_debits_snapshot_only() {
        let mut acc = account();
        acc.credit(6_000).unwrap();
        let amount = match acc.open_withdrawal(5_000).unwrap() {
            WithdrawalOutcome::Requested { amount, .. } => amount,
            other => panic!("unexpected {:?}", other),
        };

        // Earned after the request
        acc.credit(120).unwrap();

        assert_eq!(acc.close_withdrawal(true, amount).unwrap(), 120);
        assert!(!acc.has_pending_withdrawal);
    }

    #[test]
    fn test_withdrawal_rejection_keeps_balance() {
        let mut acc = account();
        acc.credit(6_000).unwrap();
        acc.open_withdrawal(5_000).unwrap();
        assert_eq!(acc.close_withdrawal(false, 6_000).unwrap(), 6_000);
        assert!(!acc.has_pending_withdrawal);
    }

    #[test]
    fn test_stale_requires_empty_idle_account() {
        let mut acc = account();
        let later = acc.last_active_at + 90 * SECONDS_PER_DAY;
        assert!(acc.is_stale(later, 90));
        assert!(!acc.is_stale(later - 1, 90));

        acc.credit(1).unwrap();
        assert!(!acc.is_stale(later, 90));
    }
}
