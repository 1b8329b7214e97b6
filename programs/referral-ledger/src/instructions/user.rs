// instructions/user.rs
use anchor_lang::prelude::*;
use crate::constants::*;
use crate::error::LedgerError;
use crate::events::{AccountOpened, SpinsGranted};
use crate::state::*;

/// First interaction: create the user's record if absent, otherwise just
/// mark activity. Safe to send on every message.
pub fn open_account(ctx: Context<OpenAccount>, user_id: u64, language: [u8; 2]) -> Result<()> {
    let clock = Clock::get()?;
    let user_account = &mut ctx.accounts.user_account;

    if !user_account.is_fresh() {
        user_account.touch(clock.unix_timestamp);
        return Ok(());
    }

    **user_account = UserAccount::new(
        user_id,
        language,
        clock.unix_timestamp,
        ctx.bumps.user_account,
    );

    msg!("👤 Account opened: user={}", user_id);
    emit!(AccountOpened {
        user_id,
        language,
        created_at: clock.unix_timestamp,
    });
    Ok(())
}

pub fn set_language(ctx: Context<UpdateProfile>, _user_id: u64, language: [u8; 2]) -> Result<()> {
    let clock = Clock::get()?;
    let user_account = &mut ctx.accounts.user_account;
    user_account.language = language;
    user_account.touch(clock.unix_timestamp);
    Ok(())
}

/// The messenger reports delivery failures (user blocked the bot) here
pub fn set_notifications(ctx: Context<UpdateProfile>, _user_id: u64, enabled: bool) -> Result<()> {
    let user_account = &mut ctx.accounts.user_account;
    user_account.notifications_enabled = enabled;

    msg!("NOTIFY: user={}, enabled={}", user_account.user_id, enabled);
    Ok(())
}

pub fn grant_spins(ctx: Context<UpdateProfile>, _user_id: u64, count: u32) -> Result<()> {
    require!(count > 0, LedgerError::InvalidConfigValue);

    let user_account = &mut ctx.accounts.user_account;
    let spins_available = user_account.grant_spins(count)?;

    emit!(SpinsGranted {
        user_id: user_account.user_id,
        count,
        spins_available,
    });
    Ok(())
}

#[derive(Accounts)]
#[instruction(user_id: u64)]
pub struct OpenAccount<'info> {
    /// Bot backend relaying the user's action
    #[account(mut)]
    pub operator: Signer<'info>,

    #[account(
        seeds = [LEDGER_STATE_SEED],
        bump = ledger_state.bump,
        constraint = ledger_state.operator == operator.key() @ LedgerError::UnauthorizedOperator,
        constraint = !ledger_state.is_paused @ LedgerError::LedgerPaused,
    )]
    pub ledger_state: Account<'info, LedgerState>,

    /// Insert-if-absent; concurrent first contacts resolve to one record
    #[account(
        init_if_needed,
        payer = operator,
        space = UserAccount::SIZE,
        seeds = [USER_SEED, user_id.to_le_bytes().as_ref()],
        bump
    )]
    pub user_account: Account<'info, UserAccount>,

    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
#[instruction(user_id: u64)]
pub struct UpdateProfile<'info> {
    pub operator: Signer<'info>,

    #[account(
        seeds = [LEDGER_STATE_SEED],
        bump = ledger_state.bump,
        constraint = ledger_state.operator == operator.key() @ LedgerError::UnauthorizedOperator,
        constraint = !ledger_state.is_paused @ LedgerError::LedgerPaused,
    )]
    pub ledger_state: Account<'info, LedgerState>,

    #[account(
        mut,
        seeds = [USER_SEED, user_id.to_le_bytes().as_ref()],
        bump = user_account.bump
    )]
    pub user_account: Account<'info, UserAccount>,
}
