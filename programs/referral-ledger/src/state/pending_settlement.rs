// state/pending_settlement.rs
use anchor_lang::prelude::*;

/// Debounce handle for one referred user. Exists only while a settlement
/// attempt is scheduled; closed when it fires.
#[account]
pub struct PendingSettlement {
    pub referred: u64,
    pub referrer: u64,
    pub scheduled_at: i64,
    pub fire_at: i64,
    /// Receives the rent back on close
    pub payer: Pubkey,
    pub bump: u8,
}

impl PendingSettlement {
    pub const SIZE: usize = 8 + // discriminator
        8 + // referred
        8 + // referrer
        8 + // scheduled_at
        8 + // fire_at
        32 + // payer
        1; // bump

    pub fn new(
        referred: u64,
        referrer: u64,
        scheduled_at: i64,
        grace_period_secs: i64,
        payer: Pubkey,
        bump: u8,
    ) -> Self {
        Self {
            referred,
            referrer,
            scheduled_at,
            fire_at: scheduled_at.saturating_add(grace_period_secs),
            payer,
            bump,
        }
    }

    /// False for a zeroed handle just allocated by `init_if_needed`
    pub fn is_armed(&self) -> bool {
        self.scheduled_at != 0
    }

    pub fn is_due(&self, current_time: i64) -> bool {
        self.is_armed() && current_time >= self.fire_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_after_grace_period() {
        let pending = PendingSettlement::new(2, 1, 1_000, 300, Pubkey::default(), 255);
        assert_eq!(pending.fire_at, 1_300);
        assert!(!pending.is_due(1_299));
        assert!(pending.is_due(1_300));
    }

    #[test]
    fn test_zeroed_handle_never_fires() {
        let blank = PendingSettlement::new(0, 0, 0, 0, Pubkey::default(), 0);
        assert!(!blank.is_armed());
        assert!(!blank.is_due(i64::MAX));
    }

    #[test]
    fn test_size_covers_serialized_account() {
        let pending = PendingSettlement::new(2, 1, 1_000, 300, Pubkey::default(), 255);
        let mut bytes = Vec::new();
        pending.try_serialize(&mut bytes).unwrap();
        assert_eq!(bytes.len(), PendingSettlement::SIZE);
    }
}
