use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::catalog::{LocationId, ServiceId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub u64);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VendorId(pub i64);

impl fmt::Display for VendorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A (location, service) pair. At most one job occupies a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Slot {
    pub location_id: LocationId,
    pub service_id: ServiceId,
}

impl Slot {
    pub fn new(location_id: LocationId, service_id: ServiceId) -> Self {
        Self {
            location_id,
            service_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: JobId,
    pub service_id: ServiceId,
    pub location_id: LocationId,
}

impl Job {
    pub fn slot(&self) -> Slot {
        Slot::new(self.location_id, self.service_id)
    }
}

/// Registration payload for a job; the registry assigns an id when none is given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<JobId>,
    pub service_id: ServiceId,
    pub location_id: LocationId,
}

impl JobDraft {
    pub fn new(location_id: LocationId, service_id: ServiceId) -> Self {
        Self {
            id: None,
            service_id,
            location_id,
        }
    }

    pub fn with_id(mut self, id: u64) -> Self {
        self.id = Some(JobId(id));
        self
    }

    pub fn slot(&self) -> Slot {
        Slot::new(self.location_id, self.service_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vendor {
    pub id: VendorId,
    pub location_id: LocationId,
    pub services_compliance: BTreeMap<ServiceId, bool>,
}

impl Vendor {
    pub fn new(
        id: i64,
        location_id: LocationId,
        compliance: impl IntoIterator<Item = (ServiceId, bool)>,
    ) -> Self {
        Self {
            id: VendorId(id),
            location_id,
            services_compliance: compliance.into_iter().collect(),
        }
    }

    /// A missing entry counts as non-compliant.
    pub fn is_compliant_for(&self, service_id: ServiceId) -> bool {
        self.services_compliance
            .get(&service_id)
            .copied()
            .unwrap_or(false)
    }
}
