//! Promotions

pub mod data;
mod errors;
pub mod evaluation;
pub mod records;
pub(crate) mod evaluator;
pub(crate) mod repository;
pub mod service;

pub use errors::PromotionsServiceError;
pub use service::*;
