//! Budget calculation modules.
//!
//! This module provides the aggregation and eco-score logic that turns a
//! plan's income and expense entries into an [`AggregateResult`](crate::AggregateResult),
//! along with the numeric coercion shared by every input path.

pub mod aggregator;
pub mod common;

pub use aggregator::{Aggregator, EcoScoreConfig, EcoScoreConfigError, aggregate};
