// state/withdrawal_request.rs
use anchor_lang::prelude::*;
use crate::error::LedgerError;

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WithdrawalStatus {
    Pending,
    Approved,
    Rejected,
}

#[account]
pub struct WithdrawalRequest {
    pub request_id: u64,
    pub user_id: u64,
    /// Balance snapshot taken at request time; approval debits exactly this
    pub amount: u64,
    pub status: WithdrawalStatus,
    pub requested_at: i64,
    pub decided_at: i64,
    /// Receives the rent back when the request is decided and closed
    pub payer: Pubkey,
    pub bump: u8,
}

impl WithdrawalRequest {
    pub const SIZE: usize = 8 + // discriminator
        8 + // request_id
        8 + // user_id
        8 + // amount
        1 + // status
        8 + // requested_at
        8 + // decided_at
        32 + // payer
        1; // bump

    pub fn new(
        request_id: u64,
        user_id: u64,
        amount: u64,
        requested_at: i64,
        payer: Pubkey,
        bump: u8,
    ) -> Self {
        Self {
            request_id,
            user_id,
            amount,
            status: WithdrawalStatus::Pending,
            requested_at,
            decided_at: 0,
            payer,
            bump,
        }
    }

    /// Zeroed record just allocated by `init_if_needed`
    pub fn is_fresh(&self) -> bool {
        self.requested_at == 0
    }

    /// pending -> approved | rejected, exactly once
    pub fn decide(&mut self, approve: bool, decided_at: i64) -> Result<WithdrawalStatus> {
        require!(
            self.status == WithdrawalStatus::Pending,
            LedgerError::WithdrawalNotPending
        );

        self.status = if approve {
            WithdrawalStatus::Approved
        } else {
            WithdrawalStatus::Rejected
        };
        self.decided_at = decided_at;
        Ok(self.status)
    }
}
