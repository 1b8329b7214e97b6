// instructions/register_referral.rs
use anchor_lang::prelude::*;
use crate::constants::*;
use crate::error::LedgerError;
use crate::events::ReferralRegistered;
use crate::state::*;
use crate::utils::{read_account, write_account};

/// Attach a referrer to a newly opened user. Sent in the same transaction
/// as `open_account` when the first message carries a referral token; a
/// user whose record predates this transaction can no longer be referred.
pub fn handler(ctx: Context<RegisterReferral>, referred_id: u64, referrer_id: u64) -> Result<()> {
    let clock = Clock::get()?;
    let config = &ctx.accounts.reward_config;
    let referrer_info = ctx.accounts.referrer_account.to_account_info();
    let edge = &mut ctx.accounts.referral_edge;

    let already_referred = !edge.is_fresh();
    let referred_is_new = ctx.accounts.referred_account.created_at == clock.unix_timestamp;
    let referrer = if referrer_id != referred_id && !already_referred && referred_is_new {
        read_account::<UserAccount>(&referrer_info)
    } else {
        None
    };

    let outcome = registration_outcome(
        referred_id,
        referrer_id,
        already_referred,
        referred_is_new,
        referrer.is_some(),
    );
    let mut spins_granted = 0;

    match (outcome, referrer) {
        (RegistrationOutcome::Registered, Some(mut referrer)) => {
            **edge = ReferralEdge::new(
                referrer_id,
                referred_id,
                clock.unix_timestamp,
                ctx.bumps.referral_edge,
            );

            referrer.referral_count = referrer.referral_count
                .checked_add(1)
                .ok_or(LedgerError::MathOverflow)?;
            referrer.grant_spins(config.spins_per_referral)?;
            write_account(&referrer_info, &referrer)?;

            spins_granted = config.spins_per_referral;
        }
        (RegistrationOutcome::ReferrerUnknown, _) => {
            msg!("⚠️ Referral token for unknown user {}", referrer_id);
        }
        _ => {}
    }

    // Allocated only to be inspected; give the rent straight back
    if edge.is_fresh() {
        edge.close(ctx.accounts.operator.to_account_info())?;
    }

    msg!("REFERRAL: referred={}, referrer={}, outcome={:?}", referred_id, referrer_id, outcome);
    emit!(ReferralRegistered {
        referrer: referrer_id,
        referred: referred_id,
        outcome,
        spins_granted,
        timestamp: clock.unix_timestamp,
    });
    Ok(())
}

/// Self-referral is decided first so it can never reach edge creation
pub fn registration_outcome(
    referred_id: u64,
    referrer_id: u64,
    already_referred: bool,
    referred_is_new: bool,
    referrer_known: bool,
) -> RegistrationOutcome {
    if referrer_id == referred_id {
        RegistrationOutcome::SelfReferral
    } else if already_referred {
        RegistrationOutcome::AlreadyReferred
    } else if !referred_is_new {
        RegistrationOutcome::ExistingUser
    } else if referrer_known {
        RegistrationOutcome::Registered
    } else {
        RegistrationOutcome::ReferrerUnknown
    }
}

#[derive(Accounts)]
#[instruction(referred_id: u64, referrer_id: u64)]
pub struct RegisterReferral<'info> {
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

    /// The new user; must already have a record
    #[account(
        seeds = [USER_SEED, referred_id.to_le_bytes().as_ref()],
        bump = referred_account.bump
    )]
    pub referred_account: Account<'info, UserAccount>,

    /// CHECK: Referrer record at its PDA; may not exist. Read and written
    /// through `read_account` / `write_account`.
    #[account(
        mut,
        seeds = [USER_SEED, referrer_id.to_le_bytes().as_ref()],
        bump
    )]
    pub referrer_account: UncheckedAccount<'info>,

    /// Insert-if-absent; keeps data only when the referral registers
    #[account(
        init_if_needed,
        payer = operator,
        space = ReferralEdge::SIZE,
        seeds = [REFERRAL_SEED, referred_id.to_le_bytes().as_ref()],
        bump
    )]
    pub referral_edge: Account<'info, ReferralEdge>,

    pub system_program: Program<'info, System>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_self_referral_never_registers() {
        assert_eq!(registration_outcome(7, 7, false, true, true), RegistrationOutcome::SelfReferral);
        assert_eq!(registration_outcome(7, 7, true, true, true), RegistrationOutcome::SelfReferral);
    }

    #[test]
    fn test_first_referral_wins() {
        assert_eq!(registration_outcome(7, 8, false, true, true), RegistrationOutcome::Registered);
        assert_eq!(registration_outcome(7, 9, true, true, true), RegistrationOutcome::AlreadyReferred);
    }

    #[test]
    fn test_existing_user_cannot_be_referred_later() {
        assert_eq!(registration_outcome(7, 8, false, false, true), RegistrationOutcome::ExistingUser);
        assert_eq!(registration_outcome(7, 8, false, false, false), RegistrationOutcome::ExistingUser);
    }

    #[test]
    fn test_unknown_referrer() {
        assert_eq!(registration_outcome(7, 8, false, true, false), RegistrationOutcome::ReferrerUnknown);
    }

    #[test]
    fn test_blank_edge_reads_as_unreferred() {
        let blank = ReferralEdge::new(0, 0, 0, 0);
        assert!(blank.is_fresh());
        assert!(!ReferralEdge::new(8, 7, 1_700_000_000, 255).is_fresh());
    }
}
