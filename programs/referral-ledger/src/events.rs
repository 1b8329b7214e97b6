use anchor_lang::prelude::*;
use crate::state::*;

/// Emitted once when a user's ledger record is created
#[event]
pub struct AccountOpened {
    pub user_id: u64,
    pub language: [u8; 2],
    pub created_at: i64,
}

#[event]
pub struct ReferralRegistered {
    pub referrer: u64,
    pub referred: u64,
    pub outcome: RegistrationOutcome,
    /// Spins credited to the referrer
    pub spins_granted: u32,
    pub timestamp: i64,
}

/// Debouncer decision for one qualifying signal
#[event]
pub struct ActivityRecorded {
    pub referred: u64,
    pub referrer: u64,
    pub outcome: ActivityOutcome,
    pub timestamp: i64,
}

/// Ledger record of one settlement attempt, emitted for every outcome
#[event]
pub struct ReferralSettled {
    pub referrer: u64,
    pub referred: u64,
    pub outcome: SettleOutcome,
    pub tier_level: u8,
    pub referrer_balance: u64,
    pub timestamp: i64,
}

#[event]
pub struct MissionCompleted {
    pub user_id: u64,
    pub mission_id: u8,
    pub kind: MissionKind,
    pub reward: u64,
    pub balance: u64,
    pub timestamp: i64,
}

#[event]
pub struct DailyBonusResolved {
    pub user_id: u64,
    pub outcome: DailyBonusOutcome,
    pub timestamp: i64,
}

#[event]
pub struct OneTimeBonusResolved {
    pub user_id: u64,
    pub kind: BonusKind,
    pub outcome: OneTimeBonusOutcome,
    pub timestamp: i64,
}

#[event]
pub struct SpinResolved {
    pub user_id: u64,
    pub outcome: SpinOutcome,
    pub timestamp: i64,
}

#[event]
pub struct SpinsGranted {
    pub user_id: u64,
    pub count: u32,
    pub spins_available: u32,
}

#[event]
pub struct WithdrawalRequested {
    pub user_id: u64,
    pub outcome: WithdrawalOutcome,
    pub timestamp: i64,
}

#[event]
pub struct WithdrawalDecided {
    pub user_id: u64,
    pub request_id: u64,
    pub status: WithdrawalStatus,
    pub amount: u64,
    pub balance: u64,
    pub timestamp: i64,
}

#[event]
pub struct ConfigUpdated {
    pub authority: Pubkey,
    pub version: u64,
    pub timestamp: i64,
}

#[event]
pub struct AccountPurged {
    pub user_id: u64,
    pub timestamp: i64,
}

/// Push request for the messaging side. Only emitted after state is final,
/// and only for users the messenger can reach.
#[event]
pub struct RewardNotification {
    pub recipient: u64,
    pub kind: NotificationKind,
    pub amount: u64,
    /// Settlement count, streak or spins left depending on `kind`
    pub count: u32,
    pub balance: u64,
}

impl RewardNotification {
    /// Whether the messenger can reach `recipient` at all
    pub fn deliverable(recipient: &UserAccount) -> bool {
        recipient.notifications_enabled
    }

    /// Emit a push for `recipient` unless the messenger cannot reach them.
    /// Ledger state is already final when this runs; `balance` is the
    /// balance right after the credit being announced.
    pub fn send(recipient: &UserAccount, kind: NotificationKind, amount: u64, count: u32, balance: u64) {
        if !Self::deliverable(recipient) {
            msg!("🔕 Notification suppressed: user={} kind={:?}", recipient.user_id, kind);
            return;
        }

        emit!(RewardNotification {
            recipient: recipient.user_id,
            kind,
            amount,
            count,
            balance,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocked_user_is_not_notified() {
        let mut user = UserAccount::new(42, *b"en", 1_700_000_000, 255);
        assert!(RewardNotification::deliverable(&user));

        user.notifications_enabled = false;
        assert!(!RewardNotification::deliverable(&user));

        // Suppression leaves the ledger alone
        user.credit(40).unwrap();
        RewardNotification::send(&user, NotificationKind::ReferralReward, 40, 1, user.balance);
        assert_eq!(user.balance, 40);
    }
}
