//! Monthly wage engine for shift-working residential-care guides.
//!
//! This crate transforms raw time reports plus reference data (shift
//! templates, apartment types, person status, Sabbath times, standby rates,
//! minimum wage) into per-employee monthly totals broken down by wage
//! percentage, with separated Sabbath and overtime components, standby pay,
//! vacation, sickness, travel, and extras — plus a per-day segment
//! breakdown for UI display and statutory export.
//!
//! The computation itself is pure and synchronous: the [`store`] module
//! materializes an immutable snapshot of a person-month from the relational
//! store, and the [`calculation`] modules fold it into results without
//! further I/O.

#![warn(missing_docs)]

pub mod calculation;
pub mod error;
pub mod models;
pub mod reference;
pub mod store;
