//! Persistence layer: the PostgreSQL `character` table.
//!
//! [`CharacterRepository`] owns every SQL statement the service issues at
//! request time; [`bootstrap`] holds the startup-only database creation and
//! pool construction.

pub mod bootstrap;
pub mod postgres;

pub use postgres::CharacterRepository;
