// utils/validation.rs
use anchor_lang::prelude::*;
use crate::constants::*;
use crate::error::LedgerError;
use crate::state::{Mission, SpinPrize, Tier};

/// Non-empty, starts at zero, strictly ascending thresholds
pub fn validate_tiers(tiers: &[Tier]) -> Result<()> {
    require!(!tiers.is_empty() && tiers.len() <= MAX_TIERS, LedgerError::InvalidTierTable);
    require!(tiers[0].min_earnings == 0, LedgerError::InvalidTierTable);

    for pair in tiers.windows(2) {
        require!(pair[0].min_earnings < pair[1].min_earnings, LedgerError::InvalidTierTable);
        require!(pair[0].level < pair[1].level, LedgerError::InvalidTierTable);
    }
    Ok(())
}

/// Ids index a u8 bitmask and must be unique
pub fn validate_missions(missions: &[Mission]) -> Result<()> {
    require!(missions.len() <= MAX_MISSIONS, LedgerError::InvalidMissionTable);

    let mut seen = 0u8;
    for mission in missions {
        require!(mission.id < 8, LedgerError::InvalidMissionTable);
        require!(mission.target >= 1, LedgerError::InvalidMissionTable);

        let bit = 1u8 << mission.id;
        require!(seen & bit == 0, LedgerError::InvalidMissionTable);
        seen |= bit;
    }
    Ok(())
}

pub fn validate_spin_prizes(prizes: &[SpinPrize]) -> Result<()> {
    require!(!prizes.is_empty() && prizes.len() <= MAX_SPIN_PRIZES, LedgerError::InvalidSpinTable);
    require!(prizes.iter().all(|p| p.weight > 0), LedgerError::InvalidSpinTable);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::MissionKind;

    #[test]
    fn test_default_tables_are_valid() {
        assert!(validate_tiers(&DEFAULT_TIERS).is_ok());
        assert!(validate_missions(&DEFAULT_MISSIONS).is_ok());
        assert!(validate_spin_prizes(&DEFAULT_SPIN_PRIZES).is_ok());
    }

    #[test]
    fn test_tiers_must_ascend_from_zero() {
        let not_zero = [Tier { level: 1, min_earnings: 10, rate: 40 }];
        assert!(validate_tiers(&not_zero).is_err());

        let flat = [
            Tier { level: 1, min_earnings: 0, rate: 40 },
            Tier { level: 2, min_earnings: 0, rate: 50 },
        ];
        assert!(validate_tiers(&flat).is_err());
        assert!(validate_tiers(&[]).is_err());
    }

    #[test]
    fn test_mission_ids_unique_and_in_mask() {
        let dup = [
            Mission { id: 1, kind: MissionKind::SearchQuota, target: 3, reward: 1 },
            Mission { id: 1, kind: MissionKind::SpinWheel, target: 1, reward: 1 },
        ];
        assert!(validate_missions(&dup).is_err());

        let out_of_mask = [Mission { id: 8, kind: MissionKind::SearchQuota, target: 3, reward: 1 }];
        assert!(validate_missions(&out_of_mask).is_err());

        let zero_target = [Mission { id: 0, kind: MissionKind::DailyCheckIn, target: 0, reward: 1 }];
        assert!(validate_missions(&zero_target).is_err());

        assert!(validate_missions(&[]).is_ok());
    }

    #[test]
    fn test_spin_weights_non_zero() {
        let prizes = [SpinPrize { amount: 0, weight: 0 }];
        assert!(validate_spin_prizes(&prizes).is_err());
    }
}
