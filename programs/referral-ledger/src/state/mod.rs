// programs/referral-ledger/src/state/mod.rs
pub mod ledger_state;
pub mod outcome;
pub mod pending_settlement;
pub mod referral_edge;
pub mod reward_config;
pub mod user_account;
pub mod withdrawal_request;

pub use ledger_state::*;
pub use outcome::*;
pub use pending_settlement::*;
pub use referral_edge::*;
pub use reward_config::*;
pub use user_account::*;
pub use withdrawal_request::*;
