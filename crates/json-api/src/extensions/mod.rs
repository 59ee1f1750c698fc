//! Extension traits and request helpers

mod depot;
mod result;
mod timestamps;

pub(crate) use depot::DepotExt as _;
pub(crate) use result::ResultExt as _;
pub(crate) use timestamps::{DayBound, EvaluationTimeExt as _, parse_timestamp};
