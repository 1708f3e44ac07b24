use crate::infra::load_catalog;
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use vendor_smart::catalog::{LocationId, ReferenceCatalog, ServiceId};
use vendor_smart::config::AppConfig;
use vendor_smart::error::AppError;
use vendor_smart::registry::{JobDraft, Registry, Vendor};

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Directory holding locations.json and services.json
    #[arg(long)]
    pub(crate) data_dir: Option<PathBuf>,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;
    let catalog = load_catalog(&mut config.catalog, args.data_dir.as_deref())?;
    let registry = Registry::new(Arc::new(catalog), config.registry.job_id_policy);

    println!("Vendor matching demo");
    println!(
        "Catalog: {} locations, {} services (from {})",
        registry.locations().len(),
        registry.services().len(),
        config.catalog.data_dir.display()
    );

    let Some(plan) = DemoPlan::from_catalog(registry.catalog()) else {
        println!("The catalog needs at least one location and two services for the demo");
        return Ok(());
    };

    for line in plan.seed(&registry) {
        println!("{line}");
    }
    println!();
    for line in ranking_lines(&registry) {
        println!("{line}");
    }

    let stats = registry.stats();
    println!(
        "\nRegistry: {} jobs, {} vendors, {} vendor/job links",
        stats.jobs, stats.vendors, stats.links
    );
    Ok(())
}

/// The first catalog location and its first two services.
struct DemoPlan {
    location: LocationId,
    primary: ServiceId,
    secondary: ServiceId,
}

impl DemoPlan {
    fn from_catalog<C: ReferenceCatalog>(catalog: &C) -> Option<Self> {
        let location = catalog.locations().first()?.id;
        match catalog.services().as_slice() {
            [primary, secondary, ..] => Some(Self {
                location,
                primary: primary.id,
                secondary: secondary.id,
            }),
            _ => None,
        }
    }

    /// Registers one explicit job and a handful of vendors, including two rejected
    /// registrations, and describes each step.
    fn seed<C: ReferenceCatalog>(&self, registry: &Registry<C>) -> Vec<String> {
        let mut lines = Vec::new();
        let draft = JobDraft::new(self.location, self.primary);

        match registry.register_job(draft.clone()) {
            Ok(job) => lines.push(format!(
                "Registered job {} (location {} / service {})",
                job.id, job.location_id, job.service_id
            )),
            Err(err) => lines.push(format!("Job rejected: {err}")),
        }
        if let Err(err) = registry.register_job(draft) {
            lines.push(format!("Second job for the same slot rejected: {err}"));
        }

        let vendors = [
            Vendor::new(101, self.location, [(self.primary, false), (self.secondary, true)]),
            Vendor::new(102, self.location, [(self.primary, true)]),
            Vendor::new(103, self.location, [(self.primary, false), (self.secondary, false)]),
            Vendor::new(104, self.location, [(self.primary, true), (self.secondary, true)]),
            Vendor::new(102, self.location, [(self.secondary, true)]),
        ];
        for vendor in vendors {
            let id = vendor.id;
            match registry.register_vendor(vendor) {
                Ok(vendor) => lines.push(format!(
                    "Registered vendor {} covering {} service(s)",
                    vendor.id,
                    vendor.services_compliance.len()
                )),
                Err(err) => lines.push(format!("Vendor {id} rejected: {err}")),
            }
        }
        lines
    }
}

fn ranking_lines<C: ReferenceCatalog>(registry: &Registry<C>) -> Vec<String> {
    let mut lines = Vec::new();
    for job in registry.jobs() {
        let service = registry
            .catalog()
            .lookup_service(job.service_id)
            .map(|service| service.name.clone())
            .unwrap_or_default();
        lines.push(format!(
            "Job {} - {} at location {} ({} reachable)",
            job.id,
            service,
            job.location_id,
            registry.reachable(job.location_id, job.service_id)
        ));

        match registry.vendors_for_job(job.id) {
            Some(vendors) => {
                for (rank, vendor) in vendors.iter().enumerate() {
                    let status = if vendor.is_compliant_for(job.service_id) {
                        "compliant"
                    } else {
                        "not compliant"
                    };
                    lines.push(format!("  {}. vendor {} ({status})", rank + 1, vendor.id));
                }
            }
            None => lines.push("  no vendors".to_string()),
        }
    }
    lines
}
