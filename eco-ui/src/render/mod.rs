//! Presentation of aggregation results.
//!
//! Both views are pure projections of an [`AggregateResult`](eco_core::AggregateResult):
//! nothing here computes totals or scores.

pub mod pie_chart;
pub mod summary;

pub use pie_chart::{
    DEFAULT_HEIGHT, DEFAULT_WIDTH, LegendEntry, NO_DATA_PLACEHOLDER, PALETTE, PieChart, PieSlice,
};
pub use summary::{CLEARED_ADVICE, Summary};
