//! Shift kinds, templates, and per-shift rates.
//!
//! A shift kind is identified by its stored id. Most kinds carry a fixed
//! template of timed segments; a few are special-cased by id and get their
//! segments synthesized (night shifts) or priced off a flat rate (escort
//! shifts). The dispatch over those behaviors is the [`ShiftClass`] variant.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Friday / holiday-eve shift.
pub const FRIDAY_SHIFT: i64 = 105;
/// Sabbath / holiday shift.
pub const SHABBAT_SHIFT: i64 = 106;
/// Night shift with dynamically decomposed segments.
pub const NIGHT_SHIFT: i64 = 107;
/// Friday reinforcement (tagbur) shift with fixed-percentage segments.
pub const TAGBUR_FRIDAY_SHIFT: i64 = 108;
/// Sabbath reinforcement (tagbur) shift with fixed-percentage segments.
pub const TAGBUR_SHABBAT_SHIFT: i64 = 109;
/// Hospital escort shift, priced at a flat rate outside Sabbath.
pub const HOSPITAL_ESCORT_SHIFT: i64 = 120;
/// Medical escort shift, priced at a flat rate on weekdays.
pub const MEDICAL_ESCORT_SHIFT: i64 = 148;

/// The type of a template segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentType {
    /// Paid working time.
    Work,
    /// On-call time paid at a flat standby rate.
    Standby,
}

impl SegmentType {
    /// Parses the stored `segment_type` column value.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "work" => Some(SegmentType::Work),
            "standby" => Some(SegmentType::Standby),
            _ => None,
        }
    }
}

/// One timed slot in a shift template.
///
/// `wage_percent` of zero means the slot's wage tier is computed from the
/// work chain it lands in; a non-zero value (100/125/150/175/200) pins the
/// slot to that tier, which is how reinforcement (tagbur) templates work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateSegment {
    /// Stored segment id, used as the standby-rate key.
    pub id: Option<i64>,
    /// Whether the slot is work or standby.
    pub segment_type: SegmentType,
    /// Start minute from midnight.
    pub start_min: i64,
    /// End minute from midnight (may be below `start_min` for overnight).
    pub end_min: i64,
    /// Fixed wage percentage, or 0 for chain-computed.
    pub wage_percent: u16,
    /// Stable ordering within the template.
    pub order_index: i32,
}

/// The ordered segment template of one shift kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftTemplate {
    /// The shift kind this template belongs to.
    pub shift_type_id: i64,
    /// Segments in `order_index` order.
    pub segments: Vec<TemplateSegment>,
}

impl ShiftTemplate {
    /// The standby segment's id, when the template has one.
    ///
    /// Night shifts synthesize their standby slot dynamically but still
    /// borrow the template's standby segment id for rate lookup.
    pub fn standby_segment_id(&self) -> Option<i64> {
        self.segments
            .iter()
            .find(|s| s.segment_type == SegmentType::Standby)
            .and_then(|s| s.id)
    }
}

/// Per-shift flat rate configuration, history-tracked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftRate {
    /// Flat hourly rate in shekels, when the shift defines one.
    pub rate: Option<Decimal>,
    /// Whether the shift is priced at the minimum wage.
    pub is_minimum_wage: bool,
}

/// How a report's segments are derived, per shift kind.
///
/// This is the dispatch point for the special shift behaviors; everything
/// not special-cased falls under [`ShiftClass::FixedTemplate`] (when a
/// template exists) or [`ShiftClass::Generic`] (one work segment covering
/// the report).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShiftClass {
    /// Segments come from the shift's stored template, clipped to the report.
    FixedTemplate,
    /// Night shift: 2h work, standby until 06:30, work until 08:00.
    NightDynamic,
    /// Hospital escort: flat rate outside Sabbath, minimum wage inside.
    HospitalEscort,
    /// Medical escort: flat rate on weekdays, minimum wage on Sabbath.
    MedicalEscort,
    /// Friday/Sabbath shift re-interpreted as its tagbur counterpart.
    ImplicitTagbur,
    /// No template: a single work segment covering the report.
    Generic,
}

impl ShiftClass {
    /// Whether the class is one of the escort kinds.
    pub fn is_escort(&self) -> bool {
        matches!(self, ShiftClass::HospitalEscort | ShiftClass::MedicalEscort)
    }
}

/// The tagbur counterpart of a Friday/Sabbath shift kind, if any.
///
/// # Example
///
/// ```
/// use wage_engine::models::{FRIDAY_SHIFT, TAGBUR_FRIDAY_SHIFT};
/// use wage_engine::models::tagbur_counterpart;
///
/// assert_eq!(tagbur_counterpart(FRIDAY_SHIFT), Some(TAGBUR_FRIDAY_SHIFT));
/// assert_eq!(tagbur_counterpart(999), None);
/// ```
pub fn tagbur_counterpart(shift_type_id: i64) -> Option<i64> {
    match shift_type_id {
        FRIDAY_SHIFT => Some(TAGBUR_FRIDAY_SHIFT),
        SHABBAT_SHIFT => Some(TAGBUR_SHABBAT_SHIFT),
        _ => None,
    }
}
