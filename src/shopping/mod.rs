//! Shopping list modules.
//!
//! This module turns the ingredients of generated recipes into a
//! single consolidated list.

pub mod aggregator;

pub use aggregator::*;
