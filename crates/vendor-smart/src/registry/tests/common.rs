use std::sync::Arc;

use axum::response::Response;
use serde_json::Value;

use crate::catalog::Catalog;
use crate::registry::{JobIdPolicy, Registry, Vendor};

/// Location 1 and 2 with services 1, 3 and 4, mirroring the matching scenarios.
pub(super) fn catalog() -> Catalog {
    Catalog::builder()
        .location(1, "TX", "Austin")
        .location(2, "CA", "Los Angeles")
        .service(1, "Access control")
        .service(3, "Landscaping")
        .service(4, "Snow removal")
        .build()
}

pub(super) fn registry() -> Registry {
    Registry::new(Arc::new(catalog()), JobIdPolicy::LegacySum)
}

pub(super) fn empty_registry() -> Registry {
    Registry::new(Arc::new(Catalog::default()), JobIdPolicy::LegacySum)
}

pub(super) fn vendor(id: i64, location_id: i32, compliance: &[(i32, bool)]) -> Vendor {
    Vendor::new(id, location_id, compliance.iter().copied())
}

pub(super) fn vendor_ids(vendors: &[Vendor]) -> Vec<i64> {
    vendors.iter().map(|vendor| vendor.id.0).collect()
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
