//! The wage computation pipeline.
//!
//! Data flows leaves-first: the [`time_model`] fixes the work-day frame and
//! Sabbath membership, [`segment_builder`] decomposes each report,
//! [`daily_map`] regroups segments by work-day and resolves standby
//! cancellation and chains, [`chain_wages`] sweeps each chain into wage
//! tiers, and [`aggregate`] rolls everything up into monthly totals and
//! per-day views.

pub mod aggregate;
pub mod chain_wages;
pub mod daily_map;
mod intervals;
pub mod segment_builder;
pub mod sick_days;
pub mod time_model;

pub use aggregate::{compute_month, day_views, MonthInputs, MonthOutcome};
