//! # character-sync
//!
//! Pulls paginated character data from an external REST API, stores each
//! record as a JSONB blob keyed by its upstream id, and serves the stored
//! records back sorted by a whitelisted column. Two database health checks
//! and a liveness check round out the surface.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP)
//!     │
//!     ├── Rate limiter (api/rate_limit)
//!     ├── REST Handlers (api/)
//!     │
//!     ├── SyncService (service/)
//!     │
//!     ├── UpstreamClient (upstream/) ──► paginated JSON API
//!     └── CharacterRepository (persistence/) ──► PostgreSQL
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod service;
pub mod telemetry;
pub mod upstream;
