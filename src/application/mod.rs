//! Application layer - services orchestrating domain logic over the ports.

mod consultation;
mod directory;
mod identity;
mod support;
mod turn_lock;

pub use consultation::{
    ConsultationDetail, ConsultationService, ConsultationWithDoctor,
};
pub use directory::DirectoryService;
pub use identity::{IdentityService, ProfileUpdateRequest, Registration, Session, UserSummary};
pub use support::{SupportReply, SupportService};
pub use turn_lock::TurnLocks;
