//! Use cases behind the HTTP handlers, generic over the repository traits.

pub mod api;
pub mod dataset;
pub mod errors;
pub mod main;
pub mod review;

pub use errors::{ServiceError, ServiceResult};
