//! Derived result models.
//!
//! This module contains the records produced by a computation: per-chain
//! wage slices, per-work-day results, the per-day view consumed by UI and
//! statutory export, and the monthly totals.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A wage tier a minute of work can be classified into.
///
/// Every minute of a work chain lands in exactly one tier; the sum over
/// tiers equals the chain length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WageTier {
    /// Regular time, 100%.
    Rate100,
    /// Weekday overtime, minutes 480..600 of a chain, 125%.
    Rate125,
    /// Weekday overtime beyond minute 600, 150%.
    Rate150Overtime,
    /// Sabbath time within the first 480 chain minutes, 150%.
    Rate150Shabbat,
    /// Sabbath overtime, chain minutes 480..600, 175%.
    Rate175,
    /// Sabbath overtime beyond chain minute 600, 200%.
    Rate200,
}

impl WageTier {
    /// The pay multiplier for this tier.
    pub fn multiplier(&self) -> Decimal {
        match self {
            WageTier::Rate100 => Decimal::new(100, 2),
            WageTier::Rate125 => Decimal::new(125, 2),
            WageTier::Rate150Overtime | WageTier::Rate150Shabbat => Decimal::new(150, 2),
            WageTier::Rate175 => Decimal::new(175, 2),
            WageTier::Rate200 => Decimal::new(200, 2),
        }
    }

    /// Whether the tier is a Sabbath tier.
    pub fn is_sabbath(&self) -> bool {
        matches!(
            self,
            WageTier::Rate150Shabbat | WageTier::Rate175 | WageTier::Rate200
        )
    }

    /// The percent label shown in per-day breakdowns.
    pub fn label(&self) -> &'static str {
        match self {
            WageTier::Rate100 => "100%",
            WageTier::Rate125 => "125%",
            WageTier::Rate150Overtime | WageTier::Rate150Shabbat => "150%",
            WageTier::Rate175 => "175%",
            WageTier::Rate200 => "200%",
        }
    }
}

/// Minute counts per wage tier.
///
/// `calc150` is not stored; it is the sum of the overtime and Sabbath 150%
/// buckets, mirroring how the monthly summary reports it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierMinutes {
    /// Minutes at 100%.
    pub calc100: i64,
    /// Minutes at 125%.
    pub calc125: i64,
    /// Weekday-overtime minutes at 150%.
    pub calc150_overtime: i64,
    /// Sabbath minutes at 150%.
    pub calc150_shabbat: i64,
    /// Minutes at 175%.
    pub calc175: i64,
    /// Minutes at 200%.
    pub calc200: i64,
}

impl TierMinutes {
    /// Adds `minutes` to the bucket for `tier`.
    pub fn add(&mut self, tier: WageTier, minutes: i64) {
        match tier {
            WageTier::Rate100 => self.calc100 += minutes,
            WageTier::Rate125 => self.calc125 += minutes,
            WageTier::Rate150Overtime => self.calc150_overtime += minutes,
            WageTier::Rate150Shabbat => self.calc150_shabbat += minutes,
            WageTier::Rate175 => self.calc175 += minutes,
            WageTier::Rate200 => self.calc200 += minutes,
        }
    }

    /// Folds another bucket set into this one.
    pub fn absorb(&mut self, other: &TierMinutes) {
        self.calc100 += other.calc100;
        self.calc125 += other.calc125;
        self.calc150_overtime += other.calc150_overtime;
        self.calc150_shabbat += other.calc150_shabbat;
        self.calc175 += other.calc175;
        self.calc200 += other.calc200;
    }

    /// Combined 150% minutes (overtime plus Sabbath).
    pub fn calc150(&self) -> i64 {
        self.calc150_overtime + self.calc150_shabbat
    }

    /// Total classified minutes.
    pub fn total(&self) -> i64 {
        self.calc100 + self.calc125 + self.calc150() + self.calc175 + self.calc200
    }

    /// Statutory pension split of the Sabbath 150% minutes.
    ///
    /// The base-100 part is `calc150_shabbat / 1.5` rounded half-to-even;
    /// the 50% supplement is the remainder.
    ///
    /// # Example
    ///
    /// ```
    /// use wage_engine::models::{TierMinutes, WageTier};
    ///
    /// let mut minutes = TierMinutes::default();
    /// minutes.add(WageTier::Rate150Shabbat, 210);
    /// assert_eq!(minutes.shabbat_split(), (140, 70));
    /// ```
    pub fn shabbat_split(&self) -> (i64, i64) {
        let shabbat = Decimal::from(self.calc150_shabbat);
        let base = (shabbat / Decimal::new(15, 1))
            .round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven)
            .to_i64()
            .unwrap_or(0);
        (base, self.calc150_shabbat - base)
    }
}

/// A contiguous run of minutes within one chain, classified into one tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainSlice {
    /// Start minute in the work-day frame (may exceed 1440 past midnight).
    pub start_min: i64,
    /// End minute in the work-day frame.
    pub end_min: i64,
    /// The tier every minute of this slice belongs to.
    pub tier: WageTier,
    /// The shift kind the minutes came from.
    pub shift_type_id: i64,
}

impl ChainSlice {
    /// The slice length in minutes.
    pub fn minutes(&self) -> i64 {
        self.end_min - self.start_min
    }
}

/// The wage decomposition of one work chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainResult {
    /// Tier-classified display slices, in chronological order.
    pub slices: Vec<ChainSlice>,
    /// Minute counts per tier; sums to `total_minutes`.
    pub minutes: TierMinutes,
    /// Total chain minutes (excluding any carried offset).
    pub total_minutes: i64,
    /// Minutes carried into this chain from the previous work-day.
    pub offset_minutes: i64,
}

/// A standby that survived the cancellation test, payable at its flat rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeptStandby {
    /// Start minute in the work-day frame.
    pub start_min: i64,
    /// End minute in the work-day frame.
    pub end_min: i64,
    /// The template segment id keying the rate lookup.
    pub segment_id: Option<i64>,
    /// The flat rate paid, in shekels.
    pub rate: Decimal,
}

/// A standby cancelled by a work overlap of 70% or more.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelledStandby {
    /// Start minute in the work-day frame.
    pub start_min: i64,
    /// End minute in the work-day frame.
    pub end_min: i64,
    /// The table rate the standby would have paid.
    pub rate: Decimal,
    /// The recorded deduction, capped at 70 shekels.
    pub deduction: Decimal,
    /// The residual still paid when the rate exceeds the cap.
    pub residual: Decimal,
}

/// A plain minute interval, used for vacation and sickness spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinuteSpan {
    /// Start minute in the work-day frame.
    pub start_min: i64,
    /// End minute in the work-day frame.
    pub end_min: i64,
}

impl MinuteSpan {
    /// The span length in minutes.
    pub fn minutes(&self) -> i64 {
        self.end_min - self.start_min
    }
}

/// The full decomposition of one work-day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyResult {
    /// The work-day date (08:00 of this date to 08:00 of the next).
    pub date: NaiveDate,
    /// Work chains in chronological order.
    pub chains: Vec<ChainResult>,
    /// Fixed-percentage (tagbur) slices outside any chain.
    pub fixed_slices: Vec<ChainSlice>,
    /// Day totals per tier, including fixed slices and escort top-ups.
    pub minutes: TierMinutes,
    /// Standbys kept and paid.
    pub standbys: Vec<KeptStandby>,
    /// Standbys cancelled by work overlap.
    pub cancelled_standbys: Vec<CancelledStandby>,
    /// Vacation spans.
    pub vacation: Vec<MinuteSpan>,
    /// Sickness spans.
    pub sick: Vec<MinuteSpan>,
    /// Minutes credited to reach an escort's minimum billable hour.
    pub escort_bonus_minutes: i64,
}

impl DailyResult {
    /// Total vacation minutes on this work-day.
    pub fn vacation_minutes(&self) -> i64 {
        self.vacation.iter().map(MinuteSpan::minutes).sum()
    }

    /// Total sickness minutes on this work-day.
    pub fn sick_minutes(&self) -> i64 {
        self.sick.iter().map(MinuteSpan::minutes).sum()
    }

    /// Whether the day carries any paid work minutes.
    pub fn has_work(&self) -> bool {
        self.minutes.total() > 0
    }
}

/// The kind of a displayed day segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DaySegmentKind {
    /// Paid work minutes.
    Work,
    /// A kept standby.
    Standby,
    /// A cancelled standby, shown struck through in the UI.
    CancelledStandby,
    /// Vacation time.
    Vacation,
    /// Sickness time.
    Sick,
}

/// One displayed segment of a work-day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySegmentView {
    /// Start minute in the work-day frame.
    pub start_min: i64,
    /// End minute in the work-day frame.
    pub end_min: i64,
    /// Clock form of the start ("HH:MM").
    pub start_time: String,
    /// Clock form of the end ("HH:MM").
    pub end_time: String,
    /// What the segment is.
    pub kind: DaySegmentKind,
    /// Percent label for work segments ("100%" .. "200%"), empty otherwise.
    pub label: String,
    /// Whether the segment falls inside Sabbath.
    pub is_sabbath: bool,
    /// The hourly rate priced for this segment, when it is paid hourly.
    pub hourly_rate: Option<Decimal>,
    /// The amount this segment pays, when priced.
    pub amount: Option<Decimal>,
}

/// The per-day breakdown returned for UI rendering and statutory export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayView {
    /// The work-day date.
    pub date: NaiveDate,
    /// Ordered display segments.
    pub segments: Vec<DaySegmentView>,
    /// Day totals per tier.
    pub minutes: TierMinutes,
    /// Standby pay for the day, residuals included.
    pub standby_payment: Decimal,
    /// Hourly pay for the day's work segments.
    pub payment: Decimal,
}

/// A non-fatal condition recorded during computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComputationWarning {
    /// A stable code identifying the warning type.
    pub code: String,
    /// A human-readable description.
    pub message: String,
}

impl ComputationWarning {
    /// A report was skipped because its times or template are malformed.
    pub fn malformed_report(report_id: i64, reason: &str) -> Self {
        ComputationWarning {
            code: "malformed_report".to_string(),
            message: format!("report {report_id} skipped: {reason}"),
        }
    }

    /// No standby rate matched; the default rate was used.
    pub fn standby_rate_missing(segment_id: Option<i64>) -> Self {
        ComputationWarning {
            code: "standby_rate_missing".to_string(),
            message: match segment_id {
                Some(id) => format!("no standby rate for segment {id}, using default"),
                None => "no standby rate for unkeyed segment, using default".to_string(),
            },
        }
    }
}

/// Monthly totals for one person.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyTotals {
    /// Minutes at 100%.
    pub calc100: i64,
    /// Minutes at 125%.
    pub calc125: i64,
    /// Minutes at 150% (overtime plus Sabbath).
    pub calc150: i64,
    /// Weekday-overtime share of `calc150`.
    pub calc150_overtime: i64,
    /// Sabbath share of `calc150`.
    pub calc150_shabbat: i64,
    /// Base-100 part of the statutory Sabbath split.
    pub calc150_shabbat_100: i64,
    /// 50%-supplement part of the statutory Sabbath split.
    pub calc150_shabbat_50: i64,
    /// Minutes at 175%.
    pub calc175: i64,
    /// Minutes at 200%.
    pub calc200: i64,
    /// Total paid work minutes across all tiers.
    pub total_work_minutes: i64,
    /// Distinct work-days with paid work.
    pub work_days: u32,
    /// Distinct work-days with vacation.
    pub vacation_days: u32,
    /// Total kept standby minutes.
    pub standby_minutes: i64,
    /// Standby pay in shekels, cancelled-standby residuals included.
    pub standby_payment: Decimal,
    /// Total deduction recorded for cancelled standbys.
    pub cancelled_standby_deduction: Decimal,
    /// Vacation minutes.
    pub vacation_minutes: i64,
    /// Vacation pay at minimum wage.
    pub vacation_payment: Decimal,
    /// Sickness minutes.
    pub sick_minutes: i64,
    /// Sickness pay after graduated sequence percentages.
    pub sick_payment: Decimal,
    /// Travel reimbursements (reports plus travel components).
    pub travel: Decimal,
    /// Other configured payment components.
    pub extras: Decimal,
    /// Base pay: tier minutes at minimum wage plus standby, vacation, sick.
    pub payment: Decimal,
    /// `payment` plus travel and extras.
    pub total_payment: Decimal,
}

/// The complete result of one person-month computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyComputation {
    /// Unique identifier for this computation run.
    pub computation_id: Uuid,
    /// When the computation was performed.
    pub computed_at: DateTime<Utc>,
    /// The crate version that produced the result.
    pub engine_version: String,
    /// The person computed.
    pub person_id: i64,
    /// The computed year.
    pub year: i32,
    /// The computed month (1..=12).
    pub month: u32,
    /// The monthly totals.
    pub totals: MonthlyTotals,
    /// Non-fatal conditions encountered along the way.
    pub warnings: Vec<ComputationWarning>,
}
