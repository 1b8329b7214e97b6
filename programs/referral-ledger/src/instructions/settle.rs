// instructions/settle.rs
use anchor_lang::prelude::*;
use crate::constants::*;
use crate::error::LedgerError;
use crate::events::{MissionCompleted, ReferralSettled, RewardNotification};
use crate::state::*;
use crate::utils::{format_rupees, read_account, write_account};

/// What one settlement attempt did to the in-memory records
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Settlement {
    pub outcome: SettleOutcome,
    pub tier_level: u8,
    /// Referrer balance right after the referral credit, before any mission
    pub paid_balance: u64,
    /// Search-quota mission paid by this settlement, with its reward
    pub mission: Option<(Mission, u64)>,
}

impl Settlement {
    fn unpaid(outcome: SettleOutcome) -> Self {
        Self { outcome, tier_level: 0, paid_balance: 0, mission: None }
    }
}

/// Advance the edge's daily counter and pay the referrer for that step.
///
/// Runs entirely inside one instruction, and the runtime write-locks both
/// records for its duration, so racing attempts on the same edge execute
/// one after another and the counter can never pass `daily_cap`.
pub fn settle_once(
    edge: &mut ReferralEdge,
    referrer: &mut UserAccount,
    config: &RewardConfig,
    today: i64,
) -> Result<Settlement> {
    if referrer.user_id != edge.referrer || edge.referrer == edge.referred {
        return Ok(Settlement::unpaid(SettleOutcome::Skipped));
    }

    let count = match edge.advance(today, config.daily_cap) {
        EdgeAdvance::Advanced(count) => count,
        EdgeAdvance::Capped => return Ok(Settlement::unpaid(SettleOutcome::Capped)),
    };

    // Tier can move as earnings grow; resolve on every payment
    let tier = config.tier_for(referrer.total_earned);
    let paid_balance = referrer.credit(tier.rate)?;
    edge.record_payment(tier.rate)?;

    let mission = match config.mission(MissionKind::SearchQuota) {
        Some(quota) => referrer
            .complete_mission(quota, count as u32, today)?
            .map(|reward| (*quota, reward)),
        None => None,
    };

    Ok(Settlement {
        outcome: SettleOutcome::Paid { count, reward: tier.rate },
        tier_level: tier.level,
        paid_balance,
        mission,
    })
}

/// Load the referrer, settle, persist, then notify. A missing or foreign
/// referrer record is an integrity problem: report `Skipped`, touch nothing.
fn execute_settlement(
    edge: &mut ReferralEdge,
    referrer_info: &AccountInfo,
    config: &RewardConfig,
    now: i64,
) -> Result<SettleOutcome> {
    let today = config.day_index(now);

    let Some(mut referrer) = read_account::<UserAccount>(referrer_info) else {
        msg!("⚠️ Settlement skipped: referrer {} of user {} has no account",
             edge.referrer, edge.referred);
        emit!(ReferralSettled {
            referrer: edge.referrer,
            referred: edge.referred,
            outcome: SettleOutcome::Skipped,
            tier_level: 0,
            referrer_balance: 0,
            timestamp: now,
        });
        return Ok(SettleOutcome::Skipped);
    };

    let settlement = settle_once(edge, &mut referrer, config, today)?;

    if settlement.outcome == SettleOutcome::Skipped {
        msg!("⚠️ Settlement skipped: account {} does not match edge referrer {}",
             referrer.user_id, edge.referrer);
    }

    if let SettleOutcome::Paid { .. } = settlement.outcome {
        write_account(referrer_info, &referrer)?;
    }

    msg!("SETTLE: referred={}, referrer={}, outcome={:?}, tier={}, balance={}",
         edge.referred,
         edge.referrer,
         settlement.outcome,
         settlement.tier_level,
         format_rupees(referrer.balance));

    emit!(ReferralSettled {
        referrer: edge.referrer,
        referred: edge.referred,
        outcome: settlement.outcome,
        tier_level: settlement.tier_level,
        referrer_balance: referrer.balance,
        timestamp: now,
    });

    // Money is final from here on; notifications are best effort
    if let SettleOutcome::Paid { count, reward } = settlement.outcome {
        RewardNotification::send(
            &referrer,
            NotificationKind::ReferralReward,
            reward,
            count as u32,
            settlement.paid_balance,
        );
    }

    if let Some((mission, reward)) = settlement.mission {
        emit!(MissionCompleted {
            user_id: referrer.user_id,
            mission_id: mission.id,
            kind: mission.kind,
            reward,
            balance: referrer.balance,
            timestamp: now,
        });
        RewardNotification::send(
            &referrer,
            NotificationKind::MissionReward,
            reward,
            mission.target,
            referrer.balance,
        );
    }

    Ok(settlement.outcome)
}

/// Settle immediately (operator replay / manual settlement)
pub fn settle_referral(ctx: Context<SettleReferral>, _referred_id: u64) -> Result<()> {
    let clock = Clock::get()?;
    let referrer_info = ctx.accounts.referrer_account.to_account_info();

    execute_settlement(
        &mut ctx.accounts.referral_edge,
        &referrer_info,
        &ctx.accounts.reward_config,
        clock.unix_timestamp,
    )?;
    Ok(())
}

/// Crank for the debouncer: settle once the grace period is over and drop
/// the pending handle. Anyone may fire a due settlement.
pub fn fire_settlement(ctx: Context<FireSettlement>, _referred_id: u64) -> Result<()> {
    let clock = Clock::get()?;
    let pending = &ctx.accounts.pending_settlement;

    require!(pending.is_due(clock.unix_timestamp), LedgerError::SettlementNotDue);

    msg!("⏰ Firing settlement: referred={}, scheduled_at={}, fire_at={}",
         pending.referred, pending.scheduled_at, pending.fire_at);

    let referrer_info = ctx.accounts.referrer_account.to_account_info();
    execute_settlement(
        &mut ctx.accounts.referral_edge,
        &referrer_info,
        &ctx.accounts.reward_config,
        clock.unix_timestamp,
    )?;

    // `close = rent_payer` removes the handle on exit
    Ok(())
}

#[derive(Accounts)]
#[instruction(referred_id: u64)]
pub struct SettleReferral<'info> {
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
        seeds = [REFERRAL_SEED, referred_id.to_le_bytes().as_ref()],
        bump = referral_edge.bump
    )]
    pub referral_edge: Account<'info, ReferralEdge>,

    /// CHECK: Referrer record at the PDA named by the edge; validated in
    /// `execute_settlement` because a missing record is a soft outcome
    #[account(
        mut,
        seeds = [USER_SEED, &referral_edge.referrer.to_le_bytes()],
        bump
    )]
    pub referrer_account: UncheckedAccount<'info>,
}

#[derive(Accounts)]
#[instruction(referred_id: u64)]
pub struct FireSettlement<'info> {
    /// Keeper submitting the crank; no special rights
    pub keeper: Signer<'info>,

    #[account(
        seeds = [LEDGER_STATE_SEED],
        bump = ledger_state.bump,
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
        close = rent_payer,
        seeds = [PENDING_SEED, referred_id.to_le_bytes().as_ref()],
        bump = pending_settlement.bump
    )]
    pub pending_settlement: Account<'info, PendingSettlement>,

    /// CHECK: Whoever paid for the pending handle gets its rent back
    #[account(
        mut,
        address = pending_settlement.payer
    )]
    pub rent_payer: UncheckedAccount<'info>,

    #[account(
        mut,
        seeds = [REFERRAL_SEED, referred_id.to_le_bytes().as_ref()],
        bump = referral_edge.bump
    )]
    pub referral_edge: Account<'info, ReferralEdge>,

    /// CHECK: See `SettleReferral::referrer_account`
    #[account(
        mut,
        seeds = [USER_SEED, &referral_edge.referrer.to_le_bytes()],
        bump
    )]
    pub referrer_account: UncheckedAccount<'info>,
}
