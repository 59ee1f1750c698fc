//! Beacon Domain Concerns

pub mod packages;
pub mod payments;
pub mod promotions;
pub mod providers;
