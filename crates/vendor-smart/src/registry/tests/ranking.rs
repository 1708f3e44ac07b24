use super::common::*;
use crate::registry::{JobDraft, JobId};

#[test]
fn compliant_vendors_rank_first_in_registration_order() {
    let registry = registry();
    let job = registry
        .register_job(JobDraft::new(1, 3))
        .expect("job registers");

    registry.register_vendor(vendor(1, 1, &[(3, false)])).expect("v1");
    registry.register_vendor(vendor(2, 1, &[(3, true)])).expect("v2");
    registry.register_vendor(vendor(3, 1, &[(3, false)])).expect("v3");
    registry.register_vendor(vendor(4, 1, &[(3, true)])).expect("v4");

    let ranked = registry.vendors_for_job(job.id).expect("job has vendors");
    assert_eq!(vendor_ids(&ranked), vec![2, 4, 1, 3]);
}

#[test]
fn ranking_uses_the_jobs_service_only() {
    let registry = registry();
    // Vendor 57 is compliant for service 4 but not for service 1.
    registry
        .register_vendor(vendor(57, 1, &[(1, false), (3, false), (4, true)]))
        .expect("vendor 57");
    registry
        .register_vendor(vendor(56, 1, &[(1, true), (3, false)]))
        .expect("vendor 56");

    let job = registry.job_for_slot(1, 1).expect("job provisioned");
    let ranked = registry.vendors_for_job(job.id).expect("vendors linked");
    assert_eq!(vendor_ids(&ranked), vec![56, 57]);

    let snow = registry.job_for_slot(1, 4).expect("job provisioned");
    let ranked = registry.vendors_for_job(snow.id).expect("vendors linked");
    assert_eq!(vendor_ids(&ranked), vec![57]);
}

#[test]
fn matching_scenario_with_preregistered_jobs() {
    let registry = registry();
    registry
        .register_job(JobDraft::new(2, 3).with_id(1234))
        .expect("job 1234");
    registry
        .register_job(JobDraft::new(1, 1).with_id(97))
        .expect("job 97");
    registry
        .register_job(JobDraft::new(1, 3).with_id(35))
        .expect("job 35");

    let v57 = registry
        .register_vendor(vendor(57, 1, &[(1, false), (3, false), (4, true)]))
        .expect("vendor 57");
    let v56 = registry
        .register_vendor(vendor(56, 1, &[(1, true), (3, false)]))
        .expect("vendor 56");
    let v55 = registry
        .register_vendor(vendor(55, 2, &[(1, true), (3, true)]))
        .expect("vendor 55");

    assert_eq!(registry.vendors_for_job(JobId(1234)), Some(vec![v55]));
    assert_eq!(registry.vendors_for_job(JobId(97)), Some(vec![v56, v57]));
    assert_eq!(registry.reachable(1, 1), 2);
    assert_eq!(registry.reachable(2, 3), 1);
    assert_eq!(registry.reachable(2, 4), 0);

    // Vendor 57's service 4 slot was empty: 1234 + 97 + 35.
    assert_eq!(
        registry.job_for_slot(1, 4).map(|job| job.id),
        Some(JobId(1366))
    );
}

#[test]
fn unknown_job_and_job_without_vendors_are_both_absent() {
    let registry = registry();
    let job = registry
        .register_job(JobDraft::new(1, 1))
        .expect("job registers");

    assert!(registry.vendors_for_job(job.id).is_none());
    assert!(registry.vendors_for_job(JobId(4242)).is_none());
}

#[test]
fn repeated_queries_return_identical_rankings() {
    let registry = registry();
    for (id, compliant) in [(10, false), (11, true), (12, true), (13, false)] {
        registry
            .register_vendor(vendor(id, 2, &[(4, compliant)]))
            .expect("vendor registers");
    }
    let job = registry.job_for_slot(2, 4).expect("job provisioned");

    let first = registry.vendors_for_job(job.id);
    let second = registry.vendors_for_job(job.id);
    assert_eq!(first, second);
    assert_eq!(vendor_ids(&first.expect("vendors")), vec![11, 12, 10, 13]);
}
