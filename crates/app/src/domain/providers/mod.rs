//! Providers

pub mod data;
mod errors;
pub mod records;
mod repository;
pub mod service;

pub use errors::ProvidersServiceError;
pub use service::*;
