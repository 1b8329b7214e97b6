// instructions/initialize.rs
use anchor_lang::prelude::*;
use crate::constants::*;
use crate::state::*;

/// Initialize the ledger with LedgerState and RewardConfig accounts
pub fn handler(ctx: Context<Initialize>, operator: Pubkey) -> Result<()> {
    let clock = Clock::get()?;

    let ledger_state = &mut ctx.accounts.ledger_state;
    **ledger_state = LedgerState::new(
        ctx.accounts.authority.key(),
        operator,
        clock.unix_timestamp,
        ctx.bumps.ledger_state,
    );

    // Defaults from constants.rs; tune later with update_config
    let reward_config = &mut ctx.accounts.reward_config;
    **reward_config = RewardConfig::new(
        ctx.accounts.authority.key(),
        ctx.bumps.reward_config,
    );

    msg!("Referral ledger initialized!");
    msg!("Authority: {}", ctx.accounts.authority.key());
    msg!("Operator: {}", operator);
    msg!("Tiers: {}, daily cap: {}, grace: {}s",
         reward_config.tier_count,
         reward_config.daily_cap,
         reward_config.grace_period_secs);

    Ok(())
}

#[derive(Accounts)]
pub struct Initialize<'info> {
    /// Authority (admin) who manages the ledger
    #[account(mut)]
    pub authority: Signer<'info>,

    #[account(
        init,
        payer = authority,
        space = LedgerState::SIZE,
        seeds = [LEDGER_STATE_SEED],
        bump
    )]
    pub ledger_state: Account<'info, LedgerState>,

    #[account(
        init,
        payer = authority,
        space = RewardConfig::SIZE,
        seeds = [REWARD_CONFIG_SEED],
        bump
    )]
    pub reward_config: Account<'info, RewardConfig>,

    pub system_program: Program<'info, System>,
}
