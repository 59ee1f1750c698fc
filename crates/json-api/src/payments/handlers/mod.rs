//! Payment Handlers

pub(crate) mod create;
pub(crate) mod notify;
pub(crate) mod outcome;
