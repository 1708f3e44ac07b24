use std::collections::BTreeMap;

use super::domain::{Job, JobId};

/// How the registry picks an id for a job registered without one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JobIdPolicy {
    /// Sum of all assigned ids, plus one while that sum is at most 1 or exactly one
    /// job exists. Kept for compatibility with clients that predict ids.
    #[default]
    LegacySum,
    /// Highest assigned id plus one.
    Sequential,
}

impl JobIdPolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "legacy" | "legacy-sum" | "sum" => Some(Self::LegacySum),
            "sequential" | "monotonic" => Some(Self::Sequential),
            _ => None,
        }
    }

    /// Returns an id not yet present in `jobs`.
    pub(crate) fn assign(self, jobs: &BTreeMap<JobId, Job>) -> JobId {
        let proposed = match self {
            Self::LegacySum => {
                let sum = jobs
                    .keys()
                    .fold(0u64, |acc, id| acc.saturating_add(id.0));
                if sum <= 1 || jobs.len() == 1 {
                    sum.saturating_add(1)
                } else {
                    sum
                }
            }
            Self::Sequential => jobs
                .keys()
                .next_back()
                .map_or(1, |last| last.0.saturating_add(1)),
        };

        // A legacy sum can land on an explicitly registered id.
        let mut candidate = proposed;
        while jobs.contains_key(&JobId(candidate)) {
            candidate = candidate.wrapping_add(1);
        }
        JobId(candidate)
    }
}
