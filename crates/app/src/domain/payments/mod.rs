//! Payments

pub mod data;
mod errors;
pub mod ozow;
pub mod records;
mod repository;
pub mod service;

pub use errors::PaymentsServiceError;
pub use service::*;
