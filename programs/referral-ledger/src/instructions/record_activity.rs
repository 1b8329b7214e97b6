// instructions/record_activity.rs
use anchor_lang::prelude::*;
use crate::constants::*;
use crate::error::LedgerError;
use crate::events::ActivityRecorded;
use crate::state::*;
use crate::utils::read_account;

/// Debounce a qualifying activity signal of `referred_id`.
///
/// At most one pending settlement exists per referred user. A signal that
/// arrives while one is pending is dropped; it does not push `fire_at` back.
pub fn handler(ctx: Context<RecordActivity>, referred_id: u64) -> Result<()> {
    let clock = Clock::get()?;
    let config = &ctx.accounts.reward_config;
    let today = config.day_index(clock.unix_timestamp);

    let edge = read_account::<ReferralEdge>(&ctx.accounts.referral_edge.to_account_info());
    let referrer = edge.as_ref().map(|edge| edge.referrer).unwrap_or_default();

    let pending = &mut ctx.accounts.pending_settlement;
    let outcome = activity_outcome(
        referred_id,
        edge.as_ref(),
        pending.is_armed(),
        today,
        config.daily_cap,
        clock.unix_timestamp.saturating_add(config.grace_period_secs),
    );

    if let ActivityOutcome::Scheduled { .. } = outcome {
        **pending = PendingSettlement::new(
            referred_id,
            referrer,
            clock.unix_timestamp,
            config.grace_period_secs,
            ctx.accounts.operator.key(),
            ctx.bumps.pending_settlement,
        );
    } else if !pending.is_armed() {
        // Allocated only to be inspected; give the rent straight back
        pending.close(ctx.accounts.operator.to_account_info())?;
    }

    msg!("ACTIVITY: referred={}, referrer={}, outcome={:?}", referred_id, referrer, outcome);
    emit!(ActivityRecorded {
        referred: referred_id,
        referrer,
        outcome,
        timestamp: clock.unix_timestamp,
    });
    Ok(())
}

/// Decide what a signal does, in priority order. Only `Scheduled` arms
/// the handle.
pub fn activity_outcome(
    referred_id: u64,
    edge: Option<&ReferralEdge>,
    pending_exists: bool,
    today: i64,
    daily_cap: u8,
    fire_at: i64,
) -> ActivityOutcome {
    match edge {
        None => ActivityOutcome::NoReferrer,
        Some(edge) if edge.referrer == referred_id => ActivityOutcome::SelfReferral,
        Some(edge) if edge.is_capped(today, daily_cap) => ActivityOutcome::CappedToday,
        Some(_) if pending_exists => ActivityOutcome::AlreadyPending,
        Some(_) => ActivityOutcome::Scheduled { fire_at },
    }
}

#[derive(Accounts)]
#[instruction(referred_id: u64)]
pub struct RecordActivity<'info> {
    /// Pays rent for the pending handle and gets it back on fire
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

    /// CHECK: Edge PDA of the referred user; absent for unreferred users
    #[account(
        seeds = [REFERRAL_SEED, referred_id.to_le_bytes().as_ref()],
        bump
    )]
    pub referral_edge: UncheckedAccount<'info>,

    /// Insert-if-absent; armed only when the signal is scheduled
    #[account(
        init_if_needed,
        payer = operator,
        space = PendingSettlement::SIZE,
        seeds = [PENDING_SEED, referred_id.to_le_bytes().as_ref()],
        bump
    )]
    pub pending_settlement: Account<'info, PendingSettlement>,

    pub system_program: Program<'info, System>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY: i64 = 20_000;
    const FIRE_AT: i64 = 1_700_000_300;

    #[test]
    fn test_first_signal_schedules() {
        let edge = ReferralEdge::new(1, 2, 0, 255);
        assert_eq!(
            activity_outcome(2, Some(&edge), false, DAY, 3, FIRE_AT),
            ActivityOutcome::Scheduled { fire_at: FIRE_AT }
        );
    }

    #[test]
    fn test_signal_while_pending_is_dropped() {
        let edge = ReferralEdge::new(1, 2, 0, 255);
        assert_eq!(
            activity_outcome(2, Some(&edge), true, DAY, 3, FIRE_AT),
            ActivityOutcome::AlreadyPending
        );
    }

    #[test]
    fn test_unreferred_and_self_referred_users_are_dropped() {
        assert_eq!(activity_outcome(2, None, false, DAY, 3, FIRE_AT), ActivityOutcome::NoReferrer);

        let looped = ReferralEdge::new(2, 2, 0, 255);
        assert_eq!(
            activity_outcome(2, Some(&looped), false, DAY, 3, FIRE_AT),
            ActivityOutcome::SelfReferral
        );
    }

    #[test]
    fn test_capped_edge_drops_until_next_day() {
        let mut edge = ReferralEdge::new(1, 2, 0, 255);
        for _ in 0..3 {
            edge.advance(DAY, 3);
        }
        assert_eq!(
            activity_outcome(2, Some(&edge), false, DAY, 3, FIRE_AT),
            ActivityOutcome::CappedToday
        );
        assert_eq!(
            activity_outcome(2, Some(&edge), false, DAY + 1, 3, FIRE_AT),
            ActivityOutcome::Scheduled { fire_at: FIRE_AT }
        );
    }
}
