use anchor_lang::prelude::*;

// Import modules
pub mod constants;
pub mod error;
pub mod events;
pub mod state;
pub mod instructions;
pub mod utils;

// Re-export for convenience
pub use constants::*;
pub use error::*;
pub use events::*;
pub use state::*;
pub use instructions::*;

declare_id!("CQijSzA283Z59bGvCFvBiE4pRQhaqXqySr4tgh3hDGVU");

#[program]
pub mod referral_ledger {
    use super::*;

    /// Create the global state and the default reward config
    pub fn initialize(ctx: Context<Initialize>, operator: Pubkey) -> Result<()> {
        instructions::initialize::handler(ctx, operator)
    }

    // 👤 ACCOUNTS

    /// Create the user's record on first contact; no-op afterwards
    pub fn open_account(ctx: Context<OpenAccount>, user_id: u64, language: [u8; 2]) -> Result<()> {
        instructions::user::open_account(ctx, user_id, language)
    }

    pub fn set_language(ctx: Context<UpdateProfile>, user_id: u64, language: [u8; 2]) -> Result<()> {
        instructions::user::set_language(ctx, user_id, language)
    }

    pub fn set_notifications(ctx: Context<UpdateProfile>, user_id: u64, enabled: bool) -> Result<()> {
        instructions::user::set_notifications(ctx, user_id, enabled)
    }

    pub fn grant_spins(ctx: Context<UpdateProfile>, user_id: u64, count: u32) -> Result<()> {
        instructions::user::grant_spins(ctx, user_id, count)
    }

    // 👥 REFERRALS

    pub fn register_referral(ctx: Context<RegisterReferral>, referred_id: u64, referrer_id: u64) -> Result<()> {
        instructions::register_referral::handler(ctx, referred_id, referrer_id)
    }

    /// Qualifying activity of a referred user; schedules a settlement
    pub fn record_activity(ctx: Context<RecordActivity>, referred_id: u64) -> Result<()> {
        instructions::record_activity::handler(ctx, referred_id)
    }

    /// Permissionless crank for due settlements
    pub fn fire_settlement(ctx: Context<FireSettlement>, referred_id: u64) -> Result<()> {
        instructions::settle::fire_settlement(ctx, referred_id)
    }

    pub fn settle_referral(ctx: Context<SettleReferral>, referred_id: u64) -> Result<()> {
        instructions::settle::settle_referral(ctx, referred_id)
    }

    // 🎁 BONUSES

    pub fn claim_daily_bonus(ctx: Context<ClaimBonus>, user_id: u64) -> Result<()> {
        instructions::bonus::claim_daily_bonus(ctx, user_id)
    }

    pub fn claim_welcome_bonus(ctx: Context<ClaimBonus>, user_id: u64) -> Result<()> {
        instructions::bonus::claim_welcome_bonus(ctx, user_id)
    }

    pub fn claim_channel_bonus(ctx: Context<ClaimBonus>, user_id: u64) -> Result<()> {
        instructions::bonus::claim_channel_bonus(ctx, user_id)
    }

    pub fn spin(ctx: Context<Spin>, user_id: u64) -> Result<()> {
        instructions::spin::handler(ctx, user_id)
    }

    // 💸 WITHDRAWALS

    pub fn request_withdrawal(ctx: Context<RequestWithdrawal>, user_id: u64) -> Result<()> {
        instructions::withdrawal::request_withdrawal(ctx, user_id)
    }

    pub fn approve_withdrawal(ctx: Context<DecideWithdrawal>, user_id: u64, request_id: u64) -> Result<()> {
        instructions::withdrawal::approve_withdrawal(ctx, user_id, request_id)
    }

    pub fn reject_withdrawal(ctx: Context<DecideWithdrawal>, user_id: u64, request_id: u64) -> Result<()> {
        instructions::withdrawal::reject_withdrawal(ctx, user_id, request_id)
    }

    // ⚙️ ADMIN

    pub fn update_config(ctx: Context<UpdateConfig>, args: ConfigArgs) -> Result<()> {
        instructions::admin::update_config(ctx, args)
    }

    pub fn set_operator(ctx: Context<TogglePause>, new_operator: Pubkey) -> Result<()> {
        instructions::admin::set_operator(ctx, new_operator)
    }

    pub fn toggle_pause(ctx: Context<TogglePause>) -> Result<()> {
        instructions::admin::toggle_pause(ctx)
    }

    pub fn purge_account(ctx: Context<PurgeAccount>, user_id: u64) -> Result<()> {
        instructions::admin::purge_account(ctx, user_id)
    }
}
