//! Data Transfer Objects for REST request/response serialization.

pub mod frame_dto;

pub use frame_dto::*;
