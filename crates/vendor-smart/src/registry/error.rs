use crate::catalog::ServiceId;

use super::domain::{JobId, VendorId};

/// Caller-input and state-conflict failures. None of them are transient.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("Invalid service reference for this job")]
    InvalidServiceReference,
    #[error("Invalid location reference for this job")]
    InvalidJobLocationReference,
    #[error("Invalid location reference for this vendor")]
    InvalidVendorLocationReference,
    #[error("A job for this location and service exists: {job_id}")]
    DuplicateJobForSlot { job_id: JobId },
    #[error("A job with id {job_id} already exists")]
    DuplicateJobId { job_id: JobId },
    #[error("Invalid service compliance reference: {service_id}")]
    InvalidServiceComplianceReference { service_id: ServiceId },
    #[error("This vendor already exists: {vendor_id}")]
    DuplicateVendor { vendor_id: VendorId },
    #[error("Vendor must declare compliance for at least one service")]
    EmptyCompliance,
}
