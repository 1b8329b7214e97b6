// state/referral_edge.rs
use anchor_lang::prelude::*;
use crate::error::LedgerError;

/// Referrer -> referred relationship plus its daily settlement counter.
/// Seeded by the referred user, so a user has at most one referrer.
#[account]
pub struct ReferralEdge {
    pub referrer: u64,
    pub referred: u64,
    pub joined_at: i64,

    /// Paid settlements on `last_settlement_day`, in [0, daily_cap]
    pub daily_count: u8,
    /// Day of the most recent successful increment
    pub last_settlement_day: Option<i64>,

    pub total_settlements: u64,
    pub total_paid: u64,
    pub bump: u8,
}

/// Result of the day-rollover-and-advance step
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EdgeAdvance {
    Advanced(u8),
    Capped,
}

impl ReferralEdge {
    pub const SIZE: usize = 8 + // discriminator
        8 + // referrer
        8 + // referred
        8 + // joined_at
        1 + // daily_count
        1 + 8 + // last_settlement_day
        8 + // total_settlements
        8 + // total_paid
        1; // bump

    pub fn new(referrer: u64, referred: u64, joined_at: i64, bump: u8) -> Self {
        Self {
            referrer,
            referred,
            joined_at,
            daily_count: 0,
            last_settlement_day: None,
            total_settlements: 0,
            total_paid: 0,
            bump,
        }
    }

    /// Zeroed record just allocated by `init_if_needed`
    pub fn is_fresh(&self) -> bool {
        self.joined_at == 0
    }

    /// Settlements already made today; a stale counter reads as zero
    pub fn count_on(&self, today: i64) -> u8 {
        if self.last_settlement_day == Some(today) {
            self.daily_count
        } else {
            0
        }
    }

    pub fn is_capped(&self, today: i64, daily_cap: u8) -> bool {
        self.count_on(today) >= daily_cap
    }

    /// New day: counter restarts at 1. Same day: +1 while under the cap.
    /// The day comparison happens before anything is written.
    pub fn advance(&mut self, today: i64, daily_cap: u8) -> EdgeAdvance {
        let current = self.count_on(today);
        if current >= daily_cap {
            return EdgeAdvance::Capped;
        }

        let next = current + 1;
        self.daily_count = next;
        self.last_settlement_day = Some(today);
        EdgeAdvance::Advanced(next)
    }

    pub fn record_payment(&mut self, amount: u64) -> Result<()> {
        self.total_settlements = self.total_settlements
            .checked_add(1)
            .ok_or(LedgerError::MathOverflow)?;
        self.total_paid = self.total_paid
            .checked_add(amount)
            .ok_or(LedgerError::MathOverflow)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY: i64 = 20_000;

    #[test]
    fn test_advance_stops_at_cap() {
        let mut edge = ReferralEdge::new(1, 2, 0, 255);
        let results: Vec<EdgeAdvance> = (0..5).map(|_| edge.advance(DAY, 3)).collect();
        assert_eq!(
            results,
            vec![
                EdgeAdvance::Advanced(1),
                EdgeAdvance::Advanced(2),
                EdgeAdvance::Advanced(3),
                EdgeAdvance::Capped,
                EdgeAdvance::Capped,
            ]
        );
        assert_eq!(edge.daily_count, 3);
        assert!(edge.is_capped(DAY, 3));
    }

    #[test]
    fn test_new_day_resets_regardless_of_previous_count() {
        let mut edge = ReferralEdge::new(1, 2, 0, 255);
        for _ in 0..3 {
            edge.advance(DAY, 3);
        }
        assert_eq!(edge.count_on(DAY + 1), 0);
        assert!(!edge.is_capped(DAY + 1, 3));
        assert_eq!(edge.advance(DAY + 1, 3), EdgeAdvance::Advanced(1));
        assert_eq!(edge.last_settlement_day, Some(DAY + 1));
    }

    #[test]
    fn test_capped_day_does_not_move_date() {
        let mut edge = ReferralEdge::new(1, 2, 0, 255);
        edge.advance(DAY, 1);
        assert_eq!(edge.advance(DAY, 1), EdgeAdvance::Capped);
        assert_eq!(edge.last_settlement_day, Some(DAY));
        assert_eq!(edge.daily_count, 1);
    }

    #[test]
    fn test_size_covers_serialized_account() {
        let mut edge = ReferralEdge::new(1, 2, 0, 255);
        edge.advance(DAY, 3);
        let mut bytes = Vec::new();
        edge.try_serialize(&mut bytes).unwrap();
        assert_eq!(bytes.len(), ReferralEdge::SIZE);
    }
}
