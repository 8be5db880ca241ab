mod guards;

pub mod approve_campaign;
pub mod claim_common;
pub mod claim_creator;
pub mod claim_disputer;
pub mod claim_pledger;
pub mod claim_treasury;
pub mod claim_voucher;
pub mod contribute_common;
pub mod dispute;
pub mod emergency_finalize;
pub mod finalize_common;
pub mod initialize_campaign;
pub mod pledge;
pub mod verify_and_release;
pub mod vouch;

pub use approve_campaign::*;
pub use claim_common::*;
pub use claim_creator::*;
pub use claim_disputer::*;
pub use claim_pledger::*;
pub use claim_treasury::*;
pub use claim_voucher::*;
pub use dispute::*;
pub use emergency_finalize::*;
pub use finalize_common::CampaignFinalized;
pub use initialize_campaign::*;
pub use pledge::*;
pub use verify_and_release::*;
pub use vouch::*;
