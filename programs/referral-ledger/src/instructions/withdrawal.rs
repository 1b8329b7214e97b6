// instructions/withdrawal.rs
use anchor_lang::prelude::*;
use crate::constants::*;
use crate::error::*;
use crate::events::{RewardNotification, WithdrawalDecided, WithdrawalRequested};
use crate::state::*;
use crate::utils::format_rupees;

/// Snapshot the user's whole balance into a pending request. Payout itself
/// happens off-ledger once an admin approves.
pub fn request_withdrawal(ctx: Context<RequestWithdrawal>, user_id: u64) -> Result<()> {
    let clock = Clock::get()?;
    let config = &ctx.accounts.reward_config;
    let user_account = &mut ctx.accounts.user_account;

    user_account.touch(clock.unix_timestamp);
    let outcome = user_account.open_withdrawal(config.min_withdrawal)?;

    let request = &mut ctx.accounts.withdrawal_request;

    if let WithdrawalOutcome::Requested { request_id, amount } = outcome {
        require!(request.is_fresh(), LedgerError::RequestIdInUse);
        **request = WithdrawalRequest::new(
            request_id,
            user_id,
            amount,
            clock.unix_timestamp,
            ctx.accounts.operator.key(),
            ctx.bumps.withdrawal_request,
        );

        msg!("💸 Withdrawal #{} requested: user={}, amount={}",
             request_id, user_id, format_rupees(amount));
    } else {
        if request.is_fresh() {
            request.close(ctx.accounts.operator.to_account_info())?;
        }
        msg!("WITHDRAW: user={}, outcome={:?}", user_id, outcome);
    }

    emit!(WithdrawalRequested {
        user_id,
        outcome,
        timestamp: clock.unix_timestamp,
    });
    Ok(())
}

/// Admin approves: debit exactly the snapshot. Decided requests are
/// closed, so after a purge the user's restarted request ids find their
/// slots free again.
pub fn approve_withdrawal(ctx: Context<DecideWithdrawal>, user_id: u64, request_id: u64) -> Result<()> {
    decide(ctx, user_id, request_id, true)
}

/// Admin rejects: the funds stay in the balance
pub fn reject_withdrawal(ctx: Context<DecideWithdrawal>, user_id: u64, request_id: u64) -> Result<()> {
    decide(ctx, user_id, request_id, false)
}

fn decide(ctx: Context<DecideWithdrawal>, user_id: u64, request_id: u64, approve: bool) -> Result<()> {
    let clock = Clock::get()?;
    let ledger_state = &mut ctx.accounts.ledger_state;

    if ctx.accounts.authority.key() != ledger_state.authority {
        return Err(LedgerError::UnauthorizedAdmin.into());
    }

    let request = &mut ctx.accounts.withdrawal_request;
    let user_account = &mut ctx.accounts.user_account;

    let status = request.decide(approve, clock.unix_timestamp)?;
    let balance = user_account.close_withdrawal(approve, request.amount)?;
    ledger_state.record_withdrawal(approve, request.amount)?;

    msg!("WITHDRAW: user={}, request={}, status={:?}, amount={}, balance={}",
         user_id, request_id, status, format_rupees(request.amount), format_rupees(balance));

    emit!(WithdrawalDecided {
        user_id,
        request_id,
        status,
        amount: request.amount,
        balance,
        timestamp: clock.unix_timestamp,
    });

    let kind = if approve {
        NotificationKind::WithdrawalApproved
    } else {
        NotificationKind::WithdrawalRejected
    };
    RewardNotification::send(user_account, kind, request.amount, 0, balance);

    Ok(())
}

#[derive(Accounts)]
#[instruction(user_id: u64)]
pub struct RequestWithdrawal<'info> {
    #[account(mut)]
    pub operator: Signer<'info>,

    #[account(
        seeds = [LEDGER_STATE_SEED],
        bump = ledger_state.bump,
        constraint = ledger_state.operator == operator.key() @ LedgerError::UnauthorizedOperator,
        constraint = !ledger_state.is_paused @ LedgerError::LedgerPaused,
    )]
    pub ledger_state: Account<'info, LedgerState>,

    #[account(
        seeds = [REWARD_CONFIG_SEED],
        bump = reward_config.bump
    )]
    pub reward_config: Account<'info, RewardConfig>,

    #[account(
        mut,
        seeds = [USER_SEED, user_id.to_le_bytes().as_ref()],
        bump = user_account.bump
    )]
    pub user_account: Account<'info, UserAccount>,

    /// Slot for the next request id; keeps data only when accepted
    #[account(
        init_if_needed,
        payer = operator,
        space = WithdrawalRequest::SIZE,
        seeds = [
            WITHDRAWAL_SEED,
            user_id.to_le_bytes().as_ref(),
            user_account.withdrawal_count.to_le_bytes().as_ref()
        ],
        bump
    )]
    pub withdrawal_request: Account<'info, WithdrawalRequest>,

    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
#[instruction(user_id: u64, request_id: u64)]
pub struct DecideWithdrawal<'info> {
    /// Authority (admin)
    pub authority: Signer<'info>,

    #[account(
        mut,
        seeds = [LEDGER_STATE_SEED],
        bump = ledger_state.bump
    )]
    pub ledger_state: Account<'info, LedgerState>,

    #[account(
        mut,
        seeds = [USER_SEED, user_id.to_le_bytes().as_ref()],
        bump = user_account.bump
    )]
    pub user_account: Account<'info, UserAccount>,

    #[account(
        mut,
        close = rent_payer,
        seeds = [
            WITHDRAWAL_SEED,
            user_id.to_le_bytes().as_ref(),
            request_id.to_le_bytes().as_ref()
        ],
        bump = withdrawal_request.bump
    )]
    pub withdrawal_request: Account<'info, WithdrawalRequest>,

    /// CHECK: Whoever paid for the request gets its rent back
    #[account(
        mut,
        address = withdrawal_request.payer
    )]
    pub rent_payer: UncheckedAccount<'info>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// Request accounts alive on chain, by address
    type LiveRequests = HashMap<Pubkey, WithdrawalRequest>;

    const START: i64 = 1_700_000_000;

    fn request_address(user_id: u64, request_id: u64) -> Pubkey {
        Pubkey::find_program_address(
            &[WITHDRAWAL_SEED, &user_id.to_le_bytes(), &request_id.to_le_bytes()],
            &crate::ID,
        )
        .0
    }

    /// `request_withdrawal`: an accepted request takes the slot of the next id
    fn request(user: &mut UserAccount, live: &mut LiveRequests, now: i64) -> Result<WithdrawalOutcome> {
        let address = request_address(user.user_id, user.withdrawal_count);
        let outcome = user.open_withdrawal(DEFAULT_MIN_WITHDRAWAL)?;

        if let WithdrawalOutcome::Requested { request_id, amount } = outcome {
            require!(!live.contains_key(&address), LedgerError::RequestIdInUse);
            live.insert(
                address,
                WithdrawalRequest::new(request_id, user.user_id, amount, now, Pubkey::default(), 255),
            );
        }
        Ok(outcome)
    }

    /// `approve_withdrawal`: the decided request is closed
    fn approve(user: &mut UserAccount, live: &mut LiveRequests, request_id: u64, now: i64) -> Result<()> {
        let address = request_address(user.user_id, request_id);
        let mut request = live.remove(&address).ok_or(LedgerError::WithdrawalNotPending)?;
        request.decide(true, now)?;
        user.close_withdrawal(true, request.amount)?;
        Ok(())
    }

    #[test]
    fn test_user_can_withdraw_again_after_purge() {
        let mut live = LiveRequests::new();
        let mut user = UserAccount::new(42, *b"en", START, 255);
        user.credit(6_000).unwrap();

        assert_eq!(
            request(&mut user, &mut live, START).unwrap(),
            WithdrawalOutcome::Requested { request_id: 0, amount: 6_000 }
        );
        approve(&mut user, &mut live, 0, START + 60).unwrap();
        assert!(live.is_empty());

        let purge_at = START + DEFAULT_STALE_AFTER_DAYS as i64 * SECONDS_PER_DAY;
        assert!(user.is_stale(purge_at, DEFAULT_STALE_AFTER_DAYS));

        // Returning user: fresh record, request ids restart at 0
        let mut user = UserAccount::new(42, *b"en", purge_at + 1, 255);
        user.credit(7_000).unwrap();
        assert_eq!(
            request(&mut user, &mut live, purge_at + 1).unwrap(),
            WithdrawalOutcome::Requested { request_id: 0, amount: 7_000 }
        );
        assert_eq!(live.len(), 1);
    }

    #[test]
    fn test_occupied_slot_is_refused() {
        let mut live = LiveRequests::new();
        let mut user = UserAccount::new(42, *b"en", START, 255);
        user.credit(6_000).unwrap();

        live.insert(
            request_address(42, 0),
            WithdrawalRequest::new(0, 42, 1_000, START - 60, Pubkey::default(), 255),
        );
        assert!(request(&mut user, &mut live, START).is_err());
    }

    #[test]
    fn test_requests_of_one_user_get_distinct_slots() {
        let mut live = LiveRequests::new();
        let mut user = UserAccount::new(42, *b"en", START, 255);

        user.credit(6_000).unwrap();
        request(&mut user, &mut live, START).unwrap();
        approve(&mut user, &mut live, 0, START + 60).unwrap();

        user.credit(5_500).unwrap();
        assert_eq!(
            request(&mut user, &mut live, START + 120).unwrap(),
            WithdrawalOutcome::Requested { request_id: 1, amount: 5_500 }
        );
        assert!(live.contains_key(&request_address(42, 1)));
        assert_ne!(request_address(42, 0), request_address(42, 1));
    }
}
