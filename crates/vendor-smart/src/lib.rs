//! In-memory registry pairing jobs with the vendors qualified to perform them.
//!
//! The [`registry::Registry`] validates every job and vendor against a read-only
//! [`catalog::Catalog`] of locations and services, auto-provisions jobs when a
//! vendor covers an empty slot, and ranks vendors per job with compliant vendors
//! first.

pub mod catalog;
pub mod config;
pub mod error;
pub mod registry;
pub mod telemetry;
