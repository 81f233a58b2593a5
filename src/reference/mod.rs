//! Reference data threaded through a computation.
//!
//! A [`ReferenceSnapshot`] is built once per person-month from the
//! relational store and passed explicitly into the calculation modules.
//! There is no ambient state: two computations with equal snapshots produce
//! byte-identical results, and parallel invocations only share read-only
//! snapshots.

mod history;
mod sabbath;

use std::collections::HashMap;

use rust_decimal::Decimal;

use crate::models::{ApartmentType, MaritalStatus, ShiftRate, ShiftTemplate};

pub use history::{DuplicateHistory, HistoryEntry, HistoryTimeline};
pub use sabbath::{SabbathCache, SabbathTimes, SHABBAT_ENTER_DEFAULT, SHABBAT_EXIT_DEFAULT};

/// Month-resolved standby rates.
///
/// Rates are keyed by template segment and marital status; rows carrying an
/// apartment type are the priority-10 specific rates, rows without one are
/// the priority-0 generic fallback.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StandbyRateBook {
    specific: HashMap<(i64, ApartmentType, MaritalStatus), Decimal>,
    generic: HashMap<(i64, MaritalStatus), Decimal>,
}

impl StandbyRateBook {
    /// An empty rate book; every lookup misses.
    pub fn new() -> Self {
        StandbyRateBook::default()
    }

    /// Records a rate row. `apartment_type` of `None` is the generic rate.
    pub fn insert(
        &mut self,
        segment_id: i64,
        apartment_type: Option<ApartmentType>,
        marital: MaritalStatus,
        amount: Decimal,
    ) {
        match apartment_type {
            Some(apt) => {
                self.specific.insert((segment_id, apt, marital), amount);
            }
            None => {
                self.generic.insert((segment_id, marital), amount);
            }
        }
    }

    /// Looks up the rate for a standby segment.
    ///
    /// The apartment-type-specific row wins over the generic one; `None`
    /// means no row matched and the caller should apply the default rate
    /// and record a warning.
    pub fn lookup(
        &self,
        segment_id: Option<i64>,
        apartment_type: Option<ApartmentType>,
        marital: MaritalStatus,
    ) -> Option<Decimal> {
        let segment_id = segment_id?;
        if let Some(apt) = apartment_type {
            if let Some(rate) = self.specific.get(&(segment_id, apt, marital)) {
                return Some(*rate);
            }
        }
        self.generic.get(&(segment_id, marital)).copied()
    }
}

/// The immutable reference data for one computed month.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceSnapshot {
    /// Weekly Sabbath times.
    pub sabbath: SabbathCache,
    /// Hourly minimum wage in shekels.
    pub minimum_wage: Decimal,
    /// Month-resolved standby rates.
    pub standby_rates: StandbyRateBook,
    /// Month-resolved per-shift flat rates.
    pub shift_rates: HashMap<i64, ShiftRate>,
    /// Shift templates by shift kind.
    pub templates: HashMap<i64, ShiftTemplate>,
    /// Per (shift kind, housing cluster) apartment-type rate overrides.
    pub housing_overrides: HashMap<(i64, i64), ApartmentType>,
}

impl ReferenceSnapshot {
    /// The flat rate of a shift kind, when it defines one.
    pub fn flat_rate(&self, shift_type_id: i64) -> Option<Decimal> {
        self.shift_rates
            .get(&shift_type_id)
            .and_then(|r| if r.is_minimum_wage { None } else { r.rate })
    }

    /// The rate apartment type for a shift at a housing cluster, when a
    /// housing override is configured.
    pub fn housing_override(
        &self,
        shift_type_id: i64,
        housing_cluster_id: Option<i64>,
    ) -> Option<ApartmentType> {
        let cluster = housing_cluster_id?;
        self.housing_overrides
            .get(&(shift_type_id, cluster))
            .copied()
    }
}
