// utils/calculations.rs
use anchor_lang::solana_program::hash::hashv;
use crate::constants::*;
use crate::state::{SpinPrize, Tier};

/// Highest tier whose threshold is met; the first tier when none is.
/// `tiers` must be ascending by `min_earnings`.
pub fn resolve_tier(tiers: &[Tier], total_earned: u64) -> Tier {
    tiers
        .iter()
        .rev()
        .find(|tier| tier.min_earnings <= total_earned)
        .or_else(|| tiers.first())
        .copied()
        .unwrap_or_default()
}

/// Calendar day number in the configured timezone
pub fn day_index(unix_timestamp: i64, utc_offset_secs: i64) -> i64 {
    unix_timestamp
        .saturating_add(utc_offset_secs)
        .div_euclid(SECONDS_PER_DAY)
}

/// Pick the prize whose cumulative weight band contains `roll % total`
pub fn draw_prize(prizes: &[SpinPrize], roll: u64) -> Option<SpinPrize> {
    let total: u64 = prizes.iter().map(|p| p.weight as u64).sum();
    if total == 0 {
        return None;
    }

    let mut point = roll % total;
    for prize in prizes {
        let weight = prize.weight as u64;
        if point < weight {
            return Some(*prize);
        }
        point -= weight;
    }
    None
}

/// Mix the latest slot hash with the spinner and its spin count, so two
/// spins in the same slot still land independently
pub fn spin_roll(slot_hash: &[u8], user_id: u64, spin_nonce: u64) -> u64 {
    let digest = hashv(&[slot_hash, &user_id.to_le_bytes()[..], &spin_nonce.to_le_bytes()[..]]);
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest.to_bytes()[..8]);
    u64::from_le_bytes(bytes)
}

/// Render paise as rupees for log lines
pub fn format_rupees(paise: u64) -> String {
    format!("₹{}.{:02}", paise / PAISE_PER_RUPEE, paise % PAISE_PER_RUPEE)
}
