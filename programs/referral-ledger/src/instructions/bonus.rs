// instructions/bonus.rs
use anchor_lang::prelude::*;
use crate::constants::*;
use crate::error::LedgerError;
use crate::events::{DailyBonusResolved, MissionCompleted, OneTimeBonusResolved, RewardNotification};
use crate::state::*;
use crate::utils::format_rupees;

/// Daily bonus with streak. A second claim on the same day is reported as
/// `AlreadyClaimed` and credits nothing.
pub fn claim_daily_bonus(ctx: Context<ClaimBonus>, _user_id: u64) -> Result<()> {
    let clock = Clock::get()?;
    let config = &ctx.accounts.reward_config;
    let user_account = &mut ctx.accounts.user_account;
    let today = config.day_index(clock.unix_timestamp);

    let (outcome, check_in) = claim_daily_once(user_account, config, today)?;
    user_account.touch(clock.unix_timestamp);

    msg!("BONUS: user={}, outcome={:?}, balance={}",
         user_account.user_id, outcome, format_rupees(user_account.balance));
    emit!(DailyBonusResolved {
        user_id: user_account.user_id,
        outcome,
        timestamp: clock.unix_timestamp,
    });

    if let DailyBonusOutcome::Claimed { amount, new_balance, streak } = outcome {
        RewardNotification::send(user_account, NotificationKind::DailyBonus, amount, streak, new_balance);
    }

    if let Some((mission, reward)) = check_in {
        let balance = user_account.balance;
        emit!(MissionCompleted {
            user_id: user_account.user_id,
            mission_id: mission.id,
            kind: mission.kind,
            reward,
            balance,
            timestamp: clock.unix_timestamp,
        });
        RewardNotification::send(user_account, NotificationKind::MissionReward, reward, mission.target, balance);
    }

    Ok(())
}

/// Claim today's bonus and, when it pays, the check-in mission
pub fn claim_daily_once(
    user: &mut UserAccount,
    config: &RewardConfig,
    today: i64,
) -> Result<(DailyBonusOutcome, Option<(Mission, u64)>)> {
    let outcome = user.claim_daily_bonus(today, config.daily_bonus_base, config.daily_bonus_multiplier)?;

    let check_in = match (outcome, config.mission(MissionKind::DailyCheckIn)) {
        (DailyBonusOutcome::Claimed { .. }, Some(mission)) => user
            .complete_mission(mission, 1, today)?
            .map(|reward| (*mission, reward)),
        _ => None,
    };
    Ok((outcome, check_in))
}

pub fn claim_welcome_bonus(ctx: Context<ClaimBonus>, _user_id: u64) -> Result<()> {
    let amount = ctx.accounts.reward_config.welcome_bonus;
    claim_one_time(ctx, BonusKind::Welcome, amount)
}

/// Called after the bot verified channel membership
pub fn claim_channel_bonus(ctx: Context<ClaimBonus>, _user_id: u64) -> Result<()> {
    let amount = ctx.accounts.reward_config.channel_bonus;
    claim_one_time(ctx, BonusKind::Channel, amount)
}

fn claim_one_time(ctx: Context<ClaimBonus>, kind: BonusKind, amount: u64) -> Result<()> {
    let clock = Clock::get()?;
    let user_account = &mut ctx.accounts.user_account;

    let outcome = user_account.claim_one_time_bonus(kind, amount)?;
    user_account.touch(clock.unix_timestamp);

    msg!("BONUS: user={}, kind={:?}, outcome={:?}", user_account.user_id, kind, outcome);
    emit!(OneTimeBonusResolved {
        user_id: user_account.user_id,
        kind,
        outcome,
        timestamp: clock.unix_timestamp,
    });

    if let OneTimeBonusOutcome::Claimed { amount, new_balance } = outcome {
        RewardNotification::send(user_account, NotificationKind::OneTimeBonus, amount, 0, new_balance);
    }
    Ok(())
}

#[derive(Accounts)]
#[instruction(user_id: u64)]
pub struct ClaimBonus<'info> {
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
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY: i64 = 20_000;

    fn setup() -> (UserAccount, RewardConfig) {
        (
            UserAccount::new(42, *b"en", 1_700_000_000, 255),
            RewardConfig::new(Pubkey::default(), 255),
        )
    }

    #[test]
    fn test_claim_pays_bonus_and_check_in() {
        let (mut user, config) = setup();
        let (outcome, check_in) = claim_daily_once(&mut user, &config, DAY).unwrap();

        // ₹0.10 base + ₹0.05 for a one-day streak
        assert_eq!(outcome, DailyBonusOutcome::Claimed { amount: 15, new_balance: 15, streak: 1 });
        let (mission, reward) = check_in.unwrap();
        assert_eq!(mission.kind, MissionKind::DailyCheckIn);
        assert_eq!(reward, 20);
        assert_eq!(user.balance, 35);
    }

    #[test]
    fn test_second_claim_same_day_pays_nothing() {
        let (mut user, config) = setup();
        claim_daily_once(&mut user, &config, DAY).unwrap();

        let (outcome, check_in) = claim_daily_once(&mut user, &config, DAY).unwrap();
        assert_eq!(outcome, DailyBonusOutcome::AlreadyClaimed);
        assert_eq!(check_in, None);
        assert_eq!(user.balance, 35);
    }

    #[test]
    fn test_check_in_pays_again_next_day() {
        let (mut user, config) = setup();
        claim_daily_once(&mut user, &config, DAY).unwrap();

        let (outcome, check_in) = claim_daily_once(&mut user, &config, DAY + 1).unwrap();
        assert_eq!(outcome, DailyBonusOutcome::Claimed { amount: 20, new_balance: 55, streak: 2 });
        assert_eq!(check_in.map(|(_, reward)| reward), Some(20));
        assert_eq!(user.balance, 75);
    }
}
