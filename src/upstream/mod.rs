//! Client for the paginated upstream character API.

pub mod client;
pub mod page;

pub use client::UpstreamClient;
pub use page::{Page, PageInfo};
