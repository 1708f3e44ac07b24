use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, info};

use crate::catalog::{Catalog, Location, LocationId, ReferenceCatalog, Service, ServiceId};

use super::domain::{Job, JobDraft, JobId, Slot, Vendor, VendorId};
use super::error::RegistryError;
use super::ids::JobIdPolicy;
use super::ranking::compliant_first;

/// Owns every job/vendor mapping. Mutations hold the write lock for their whole
/// duration, so readers never observe a half-registered vendor.
pub struct Registry<C = Catalog> {
    catalog: Arc<C>,
    policy: JobIdPolicy,
    state: RwLock<RegistryState>,
}

#[derive(Debug, Default)]
struct RegistryState {
    jobs: BTreeMap<JobId, Job>,
    jobs_by_slot: HashMap<Slot, JobId>,
    vendors: HashMap<VendorId, Vendor>,
    vendors_by_job: HashMap<JobId, Vec<VendorId>>,
}

/// Counts reported by [`Registry::stats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryStats {
    pub jobs: usize,
    pub vendors: usize,
    pub links: usize,
}

impl<C> Registry<C>
where
    C: ReferenceCatalog,
{
    pub fn new(catalog: Arc<C>, policy: JobIdPolicy) -> Self {
        Self {
            catalog,
            policy,
            state: RwLock::new(RegistryState::default()),
        }
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn locations(&self) -> Vec<Location> {
        self.catalog.locations()
    }

    pub fn services(&self) -> Vec<Service> {
        self.catalog.services()
    }

    /// Registers a job after checking the service, then the location, then the slot.
    pub fn register_job(&self, draft: JobDraft) -> Result<Job, RegistryError> {
        if self.catalog.lookup_service(draft.service_id).is_none() {
            return Err(RegistryError::InvalidServiceReference);
        }
        if self.catalog.lookup_location(draft.location_id).is_none() {
            return Err(RegistryError::InvalidJobLocationReference);
        }

        let mut state = self.write();
        if let Some(existing) = state.jobs_by_slot.get(&draft.slot()) {
            return Err(RegistryError::DuplicateJobForSlot { job_id: *existing });
        }

        let id = match draft.id {
            Some(id) if state.jobs.contains_key(&id) => {
                return Err(RegistryError::DuplicateJobId { job_id: id });
            }
            Some(id) => id,
            None => self.policy.assign(&state.jobs),
        };

        let job = state.insert_job(id, draft.slot());
        debug!(
            job_id = %job.id,
            location_id = job.location_id,
            service_id = job.service_id,
            "job registered"
        );
        Ok(job)
    }

    /// Registers a vendor and links it to the job of every slot it declares compliance
    /// for, provisioning jobs for empty slots. Nothing is written unless every
    /// reference resolves.
    pub fn register_vendor(&self, vendor: Vendor) -> Result<Vendor, RegistryError> {
        if vendor.services_compliance.is_empty() {
            return Err(RegistryError::EmptyCompliance);
        }
        if self.catalog.lookup_location(vendor.location_id).is_none() {
            return Err(RegistryError::InvalidVendorLocationReference);
        }

        let mut state = self.write();
        if state.vendors.contains_key(&vendor.id) {
            return Err(RegistryError::DuplicateVendor {
                vendor_id: vendor.id,
            });
        }
        if let Some(&service_id) = vendor
            .services_compliance
            .keys()
            .find(|service_id| self.catalog.lookup_service(**service_id).is_none())
        {
            return Err(RegistryError::InvalidServiceComplianceReference { service_id });
        }

        for &service_id in vendor.services_compliance.keys() {
            let slot = Slot::new(vendor.location_id, service_id);
            let job_id = self.find_or_provision(&mut state, slot);
            state.vendors_by_job.entry(job_id).or_default().push(vendor.id);
        }
        state.vendors.insert(vendor.id, vendor.clone());

        debug!(
            vendor_id = %vendor.id,
            location_id = vendor.location_id,
            services = vendor.services_compliance.len(),
            "vendor registered"
        );
        Ok(vendor)
    }

    fn find_or_provision(&self, state: &mut RegistryState, slot: Slot) -> JobId {
        if let Some(&job_id) = state.jobs_by_slot.get(&slot) {
            return job_id;
        }

        let id = self.policy.assign(&state.jobs);
        let job = state.insert_job(id, slot);
        info!(
            job_id = %job.id,
            location_id = slot.location_id,
            service_id = slot.service_id,
            "job auto-provisioned for vendor coverage"
        );
        job.id
    }

    /// Vendors linked to a job, compliant ones first. `None` when the job is unknown
    /// or nobody covers it.
    pub fn vendors_for_job(&self, job_id: JobId) -> Option<Vec<Vendor>> {
        let state = self.read();
        let candidates = state.vendors_by_job.get(&job_id)?;
        let service_id = state.jobs.get(&job_id)?.service_id;

        let ranked = compliant_first(candidates, |vendor_id| {
            state
                .vendors
                .get(vendor_id)
                .is_some_and(|vendor| vendor.is_compliant_for(service_id))
        });

        Some(
            ranked
                .iter()
                .filter_map(|vendor_id| state.vendors.get(vendor_id).cloned())
                .collect(),
        )
    }

    pub fn job(&self, job_id: JobId) -> Option<Job> {
        self.read().jobs.get(&job_id).cloned()
    }

    pub fn job_for_slot(&self, location_id: LocationId, service_id: ServiceId) -> Option<Job> {
        let state = self.read();
        state
            .jobs_by_slot
            .get(&Slot::new(location_id, service_id))
            .and_then(|job_id| state.jobs.get(job_id))
            .cloned()
    }

    /// All jobs ordered by id.
    pub fn jobs(&self) -> Vec<Job> {
        self.read().jobs.values().cloned().collect()
    }

    pub fn vendor(&self, vendor_id: VendorId) -> Option<Vendor> {
        self.read().vendors.get(&vendor_id).cloned()
    }

    /// Number of vendors linked to the job occupying the slot, compliant or not.
    pub fn reachable(&self, location_id: LocationId, service_id: ServiceId) -> usize {
        let state = self.read();
        state
            .jobs_by_slot
            .get(&Slot::new(location_id, service_id))
            .and_then(|job_id| state.vendors_by_job.get(job_id))
            .map_or(0, Vec::len)
    }

    pub fn stats(&self) -> RegistryStats {
        let state = self.read();
        RegistryStats {
            jobs: state.jobs.len(),
            vendors: state.vendors.len(),
            links: state.vendors_by_job.values().map(Vec::len).sum(),
        }
    }

    // Writes happen only after validation, so a poisoned lock still guards consistent data.
    fn read(&self) -> RwLockReadGuard<'_, RegistryState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, RegistryState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl RegistryState {
    fn insert_job(&mut self, id: JobId, slot: Slot) -> Job {
        let job = Job {
            id,
            service_id: slot.service_id,
            location_id: slot.location_id,
        };
        self.jobs.insert(id, job.clone());
        self.jobs_by_slot.insert(slot, id);
        job
    }
}

impl<C> std::fmt::Debug for Registry<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}
