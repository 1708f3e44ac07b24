//! Job/vendor matching: registration with referential checks, auto-provisioning of jobs
//! for uncovered slots, and compliance-first vendor ranking.

pub mod domain;
mod error;
mod ids;
mod ranking;
pub mod router;
mod store;

#[cfg(test)]
mod tests;

pub use domain::{Job, JobDraft, JobId, Slot, Vendor, VendorId};
pub use error::RegistryError;
pub use ids::JobIdPolicy;
pub use router::registry_router;
pub use store::{Registry, RegistryStats};
