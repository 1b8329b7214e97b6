// instructions/spin.rs
use anchor_lang::prelude::*;
use anchor_lang::solana_program::sysvar;
use crate::constants::*;
use crate::error::LedgerError;
use crate::events::{MissionCompleted, RewardNotification, SpinResolved};
use crate::state::*;
use crate::utils::{draw_prize, format_rupees, spin_roll};

/// Spend one spin and credit whatever the wheel lands on
pub fn handler(ctx: Context<Spin>, _user_id: u64) -> Result<()> {
    let clock = Clock::get()?;
    let config = &ctx.accounts.reward_config;
    let user_account = &mut ctx.accounts.user_account;
    let today = config.day_index(clock.unix_timestamp);

    user_account.touch(clock.unix_timestamp);

    // Differs for every spin of this user, even within one slot
    let nonce = ((user_account.spins_today as u64) << 32) | user_account.spins_available as u64;
    let seed = recent_slot_hash(&ctx.accounts.slot_hashes, clock.slot)?;
    let roll = spin_roll(&seed, user_account.user_id, nonce);

    let (outcome, wheel_mission) = spin_once(user_account, config, today, roll)?;

    match outcome {
        SpinOutcome::Landed { prize, new_balance, spins_remaining } => {
            msg!("SPIN: user={}, prize={}, spins_left={}",
                 user_account.user_id, format_rupees(prize), spins_remaining);
            emit!(SpinResolved {
                user_id: user_account.user_id,
                outcome,
                timestamp: clock.unix_timestamp,
            });
            RewardNotification::send(
                user_account,
                NotificationKind::SpinResult,
                prize,
                spins_remaining,
                new_balance,
            );
        }
        SpinOutcome::NoSpinsLeft => {
            msg!("SPIN: user={}, outcome=NoSpinsLeft", user_account.user_id);
            emit!(SpinResolved {
                user_id: user_account.user_id,
                outcome,
                timestamp: clock.unix_timestamp,
            });
        }
    }

    if let Some((mission, reward)) = wheel_mission {
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

/// Debit one spin, credit the prize `roll` lands on, then check the
/// spin-count mission. `new_balance` is the balance right after the prize.
pub fn spin_once(
    user: &mut UserAccount,
    config: &RewardConfig,
    today: i64,
    roll: u64,
) -> Result<(SpinOutcome, Option<(Mission, u64)>)> {
    if !user.take_spin(today) {
        return Ok((SpinOutcome::NoSpinsLeft, None));
    }

    let prize = draw_prize(config.spin_prizes(), roll)
        .map(|prize| prize.amount)
        .unwrap_or_default();
    let new_balance = if prize > 0 {
        user.credit(prize)?
    } else {
        user.balance
    };

    let spins_today = user.spins_today;
    let mission = match config.mission(MissionKind::SpinWheel) {
        Some(wheel) => user
            .complete_mission(wheel, spins_today, today)?
            .map(|reward| (*wheel, reward)),
        None => None,
    };

    let outcome = SpinOutcome::Landed {
        prize,
        new_balance,
        spins_remaining: user.spins_available,
    };
    Ok((outcome, mission))
}

/// Most recent entry of the SlotHashes sysvar: u64 length prefix, then
/// (slot: u64, hash: [u8; 32]) pairs, newest first
fn recent_slot_hash(slot_hashes: &UncheckedAccount, current_slot: u64) -> Result<[u8; 32]> {
    let data = slot_hashes.try_borrow_data()?;
    let mut seed = [0u8; 32];

    if data.len() < 48 {
        msg!("⚠️ Slot hashes unavailable, using slot as seed");
        seed[..8].copy_from_slice(&current_slot.to_le_bytes());
        return Ok(seed);
    }

    seed.copy_from_slice(&data[16..48]);
    Ok(seed)
}

#[derive(Accounts)]
#[instruction(user_id: u64)]
pub struct Spin<'info> {
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

    /// CHECK: SlotHashes sysvar, pinned by address
    #[account(address = sysvar::slot_hashes::ID)]
    pub slot_hashes: UncheckedAccount<'info>,
}
