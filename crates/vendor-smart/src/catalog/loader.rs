use std::collections::BTreeMap;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use tracing::info;

use super::{Catalog, Location, Service};

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid {kind} data: {source}")]
    Parse {
        kind: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("{kind} id {id} appears more than once")]
    DuplicateId { kind: &'static str, id: i32 },
}

impl Catalog {
    /// Loads both reference files. Any failure is fatal for startup.
    pub fn from_paths<L, S>(locations: L, services: S) -> Result<Self, CatalogError>
    where
        L: AsRef<Path>,
        S: AsRef<Path>,
    {
        let locations = open(locations.as_ref())?;
        let services = open(services.as_ref())?;
        let catalog = Self::from_readers(locations, services)?;

        info!(
            locations = catalog.location_count(),
            services = catalog.service_count(),
            "reference catalog loaded"
        );
        Ok(catalog)
    }

    pub fn from_readers<L: Read, S: Read>(locations: L, services: S) -> Result<Self, CatalogError> {
        let locations = index::<Location, _>(locations, "location", |l| l.id)?;
        let services = index::<Service, _>(services, "service", |s| s.id)?;
        Ok(Self {
            locations,
            services,
        })
    }
}

fn open(path: &Path) -> Result<std::fs::File, CatalogError> {
    std::fs::File::open(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn index<T, R>(
    reader: R,
    kind: &'static str,
    key: impl Fn(&T) -> i32,
) -> Result<BTreeMap<i32, T>, CatalogError>
where
    T: DeserializeOwned,
    R: Read,
{
    let records: Vec<T> =
        serde_json::from_reader(reader).map_err(|source| CatalogError::Parse { kind, source })?;

    let mut indexed = BTreeMap::new();
    for record in records {
        let id = key(&record);
        if indexed.insert(id, record).is_some() {
            return Err(CatalogError::DuplicateId { kind, id });
        }
    }
    Ok(indexed)
}
