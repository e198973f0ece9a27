//! Domain layer: the stored record and the validated request parameters.
//!
//! Everything a handler accepts from a query string is turned into one of
//! these types before it reaches the persistence layer.

pub mod aspect;
pub mod record;
pub mod sort;

pub use aspect::MonitorAspect;
pub use record::CharacterRecord;
pub use sort::{SortField, SortOrder, SortSpec};
