// state/ledger_state.rs
use anchor_lang::prelude::*;
use crate::error::LedgerError;

/// Global switches and keys. Read-only on every per-user path so that
/// unrelated users never contend on this account.
#[account]
pub struct LedgerState {
    /// Admin: config, pause, withdrawal decisions, purges
    pub authority: Pubkey,
    /// Bot backend key that relays user actions
    pub operator: Pubkey,
    pub is_paused: bool,
    pub total_withdrawn: u64,
    pub approved_withdrawals: u64,
    pub rejected_withdrawals: u64,
    pub purged_accounts: u64,
    pub created_at: i64,
    pub bump: u8,
}

impl LedgerState {
    /// Size for account allocation
    pub const SIZE: usize = 8 + // discriminator
        32 + // authority
        32 + // operator
        1 + // is_paused
        8 + // total_withdrawn
        8 + // approved_withdrawals
        8 + // rejected_withdrawals
        8 + // purged_accounts
        8 + // created_at
        1; // bump

    pub fn new(authority: Pubkey, operator: Pubkey, created_at: i64, bump: u8) -> Self {
        Self {
            authority,
            operator,
            is_paused: false,
            total_withdrawn: 0,
            approved_withdrawals: 0,
            rejected_withdrawals: 0,
            purged_accounts: 0,
            created_at,
            bump,
        }
    }

    /// Toggle pause state
    pub fn toggle_pause(&mut self) {
        self.is_paused = !self.is_paused;
    }

    pub fn record_withdrawal(&mut self, approved: bool, amount: u64) -> Result<()> {
        if approved {
            self.total_withdrawn = self.total_withdrawn
                .checked_add(amount)
                .ok_or(LedgerError::MathOverflow)?;
            self.approved_withdrawals = self.approved_withdrawals
                .checked_add(1)
                .ok_or(LedgerError::MathOverflow)?;
        } else {
            self.rejected_withdrawals = self.rejected_withdrawals
                .checked_add(1)
                .ok_or(LedgerError::MathOverflow)?;
        }
        Ok(())
    }

    pub fn record_purge(&mut self) {
        self.purged_accounts = self.purged_accounts.saturating_add(1);
    }
}
