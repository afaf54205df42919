//! Analysis modules.
//!
//! Aggregation of production records and ordering of the resulting counts.

pub mod aggregator;
pub mod presenter;

pub use aggregator::*;
pub use presenter::*;
