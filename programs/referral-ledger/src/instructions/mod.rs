// Instructions module exports
pub mod initialize;
pub mod user;
pub mod register_referral;
pub mod record_activity;
pub mod settle;
pub mod bonus;
pub mod spin;
pub mod withdrawal;
pub mod admin;

pub use initialize::*;
pub use user::*;
pub use register_referral::*;
pub use record_activity::*;
pub use settle::*;
pub use bonus::*;
pub use spin::*;
pub use withdrawal::*;
pub use admin::*;
