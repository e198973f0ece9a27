//! Data Transfer Objects for REST request/response serialization.

pub mod character_dto;

pub use character_dto::*;
