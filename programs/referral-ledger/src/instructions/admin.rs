// instructions/admin.rs
use anchor_lang::prelude::*;
use crate::constants::*;
use crate::state::*;
use crate::error::*;
use crate::events::{AccountPurged, ConfigUpdated};

/// Admin function to pause/unpause every user-facing operation
pub fn toggle_pause(ctx: Context<TogglePause>) -> Result<()> {
    let ledger_state = &mut ctx.accounts.ledger_state;

    if ctx.accounts.authority.key() != ledger_state.authority {
        return Err(LedgerError::UnauthorizedAdmin.into());
    }

    ledger_state.toggle_pause();

    msg!("Ledger pause toggled. New state: {}", ledger_state.is_paused);

    Ok(())
}

/// Rotate the bot backend key
pub fn set_operator(ctx: Context<TogglePause>, new_operator: Pubkey) -> Result<()> {
    let ledger_state = &mut ctx.accounts.ledger_state;

    if ctx.accounts.authority.key() != ledger_state.authority {
        return Err(LedgerError::UnauthorizedAdmin.into());
    }

    msg!("Operator changed: {} -> {}", ledger_state.operator, new_operator);
    ledger_state.operator = new_operator;

    Ok(())
}

/// Replace tiers, missions, spin table and scalar parameters in one go.
/// Takes effect for every operation that starts after this one.
pub fn update_config(ctx: Context<UpdateConfig>, args: ConfigArgs) -> Result<()> {
    let clock = Clock::get()?;
    let reward_config = &mut ctx.accounts.reward_config;

    if ctx.accounts.authority.key() != reward_config.authority {
        return Err(LedgerError::UnauthorizedAdmin.into());
    }

    reward_config.apply(&args)?;

    msg!("Config v{} applied: tiers={}, missions={}, prizes={}, daily cap={}, grace={}s",
         reward_config.version,
         reward_config.tier_count,
         reward_config.mission_count,
         reward_config.spin_prize_count,
         reward_config.daily_cap,
         reward_config.grace_period_secs);

    emit!(ConfigUpdated {
        authority: ctx.accounts.authority.key(),
        version: reward_config.version,
        timestamp: clock.unix_timestamp,
    });

    Ok(())
}

/// Close an empty, long-idle user record and reclaim its rent
pub fn purge_account(ctx: Context<PurgeAccount>, user_id: u64) -> Result<()> {
    let clock = Clock::get()?;
    let ledger_state = &mut ctx.accounts.ledger_state;

    if ctx.accounts.authority.key() != ledger_state.authority {
        return Err(LedgerError::UnauthorizedAdmin.into());
    }

    require!(
        ctx.accounts.user_account.is_stale(
            clock.unix_timestamp,
            ctx.accounts.reward_config.stale_after_days,
        ),
        LedgerError::AccountNotStale
    );

    ledger_state.record_purge();

    msg!("🧹 Purged user {}, idle since {}", user_id, ctx.accounts.user_account.last_active_at);
    emit!(AccountPurged {
        user_id,
        timestamp: clock.unix_timestamp,
    });

    Ok(())
}

#[derive(Accounts)]
pub struct TogglePause<'info> {
    #[account(mut)]
    pub authority: Signer<'info>,

    #[account(
        mut,
        seeds = [LEDGER_STATE_SEED],
        bump = ledger_state.bump
    )]
    pub ledger_state: Account<'info, LedgerState>,
}

#[derive(Accounts)]
pub struct UpdateConfig<'info> {
    /// Authority (admin)
    pub authority: Signer<'info>,

    /// Reward config to update
    #[account(
        mut,
        seeds = [REWARD_CONFIG_SEED],
        bump = reward_config.bump
    )]
    pub reward_config: Account<'info, RewardConfig>,
}

#[derive(Accounts)]
#[instruction(user_id: u64)]
pub struct PurgeAccount<'info> {
    #[account(mut)]
    pub authority: Signer<'info>,

    #[account(
        mut,
        seeds = [LEDGER_STATE_SEED],
        bump = ledger_state.bump
    )]
    pub ledger_state: Account<'info, LedgerState>,

    #[account(
        seeds = [REWARD_CONFIG_SEED],
        bump = reward_config.bump
    )]
    pub reward_config: Account<'info, RewardConfig>,

    #[account(
        mut,
        close = authority,
        seeds = [USER_SEED, user_id.to_le_bytes().as_ref()],
        bump = user_account.bump
    )]
    pub user_account: Account<'info, UserAccount>,
}
