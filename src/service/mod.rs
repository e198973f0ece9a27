//! Service layer: business logic orchestration.
//!
//! [`SyncService`] ties the upstream client to the character repository
//! and backs every HTTP endpoint.

pub mod sync_service;

pub use sync_service::{HealthReport, SyncOutcome, SyncService};
