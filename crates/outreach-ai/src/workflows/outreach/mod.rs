pub mod capabilities;
mod contract;
pub mod domain;
mod policy;
mod router;
mod service;

pub use contract::{validate_sms, ContractViolation, MAX_SMS_CHARS};
pub use policy::CallPolicy;
pub use router::outreach_router;
pub use service::{CapabilityError, ClientOutreachService, OutreachError};
