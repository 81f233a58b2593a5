//! Core data models for the wage engine.
//!
//! This module contains all the domain models used throughout the engine:
//! raw time reports, shift kinds and templates, person and apartment
//! status, and the derived result records.

mod person;
mod report;
mod results;
mod shift;

pub use person::{Apartment, ApartmentType, MaritalStatus, PersonStatus};
pub use report::{PaymentComponent, ResolvedReport, TimeReport};
pub(crate) use report::TRAVEL_COMPONENT_TYPE;
pub use results::{
    CancelledStandby, ChainResult, ChainSlice, ComputationWarning, DailyResult, DaySegmentKind,
    DaySegmentView, DayView, KeptStandby, MinuteSpan, MonthlyComputation, MonthlyTotals,
    TierMinutes, WageTier,
};
pub use shift::{
    tagbur_counterpart, SegmentType, ShiftClass, ShiftRate, ShiftTemplate, TemplateSegment,
    FRIDAY_SHIFT, HOSPITAL_ESCORT_SHIFT, MEDICAL_ESCORT_SHIFT, NIGHT_SHIFT, SHABBAT_SHIFT,
    TAGBUR_FRIDAY_SHIFT, TAGBUR_SHABBAT_SHIFT,
};
