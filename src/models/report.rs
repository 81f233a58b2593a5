//! Time report models.
//!
//! A [`TimeReport`] is one logged interval exactly as stored. A
//! [`ResolvedReport`] is the same interval after the history resolver has
//! decorated it with the reference values effective for the computed month;
//! the calculation modules only ever see resolved reports.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::person::ApartmentType;
use super::shift::{ShiftClass, ShiftTemplate};

/// One logged work interval, as stored in `time_reports`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeReport {
    /// Unique report id.
    pub id: i64,
    /// The reporting person.
    pub person_id: i64,
    /// The apartment the interval was worked at.
    pub apartment_id: Option<i64>,
    /// Civil date the interval was logged on.
    pub date: NaiveDate,
    /// Start minute from midnight (0..1440).
    pub start_min: i64,
    /// End minute from midnight; at or below `start_min` means overnight.
    pub end_min: i64,
    /// The shift kind id.
    pub shift_type_id: i64,
    /// Vacation marker.
    pub is_vacation: bool,
    /// Sickness marker.
    pub is_sick: bool,
    /// Travel reimbursement in shekels, when reported.
    pub travel: Decimal,
}

/// A report decorated with the reference values effective for its month.
///
/// `end_min` here is already overnight-normalized (`end <= start` had 1440
/// added), so `start_min < end_min <= 2880` always holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedReport {
    /// Unique report id.
    pub id: i64,
    /// Civil date the interval was logged on.
    pub date: NaiveDate,
    /// Start minute from midnight.
    pub start_min: i64,
    /// Overnight-normalized end minute.
    pub end_min: i64,
    /// The shift kind id (never rewritten, even for implicit tagbur).
    pub shift_type_id: i64,
    /// How this report's segments are derived.
    pub class: ShiftClass,
    /// The template driving segmentation, when one applies.
    ///
    /// For [`ShiftClass::ImplicitTagbur`] this is already the tagbur
    /// counterpart's template.
    pub template: Option<ShiftTemplate>,
    /// The apartment's own type, resolved for the month.
    pub apartment_type: Option<ApartmentType>,
    /// The apartment type used for rate lookups, after any per-cluster
    /// housing override.
    pub rate_apartment_type: Option<ApartmentType>,
    /// Marital status resolved for the month.
    pub is_married: bool,
    /// Flat hourly rate of the shift kind, resolved for the month.
    pub flat_rate: Option<Decimal>,
    /// Vacation marker.
    pub is_vacation: bool,
    /// Sickness marker.
    pub is_sick: bool,
    /// Travel reimbursement in shekels.
    pub travel: Decimal,
}

impl ResolvedReport {
    /// The report's duration in minutes.
    pub fn duration_minutes(&self) -> i64 {
        self.end_min - self.start_min
    }
}

/// A configured flat payment addition for a person.
///
/// Component type 2 accumulates into the monthly `travel` total; every
/// other type lands in `extras`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentComponent {
    /// The person this component was granted to.
    pub person_id: i64,
    /// The date the component applies to.
    pub date: NaiveDate,
    /// The computed amount in shekels (quantity x rate).
    pub amount: Decimal,
    /// The component type id.
    pub component_type_id: i64,
}

/// The component type id that accumulates into `travel`.
pub(crate) const TRAVEL_COMPONENT_TYPE: i64 = 2;
