//! Monthly aggregation.
//!
//! The entry point of the pure computation: reports are decomposed into
//! segments, grouped into work-days, resolved day by day with carryover
//! threaded between consecutive days, and rolled up into monthly totals
//! plus the per-day views the UI renders.

use std::collections::HashMap;

use chrono::Duration;
use rust_decimal::Decimal;
use tracing::warn;

use crate::models::{
    ComputationWarning, DailyResult, DaySegmentKind, DaySegmentView, DayView, MonthlyTotals,
    PaymentComponent, ResolvedReport, ShiftClass, TierMinutes, WageTier, TRAVEL_COMPONENT_TYPE,
};
use crate::reference::ReferenceSnapshot;

use super::daily_map::{build_day_buckets, process_day, CarryOver};
use super::segment_builder::build_segments;
use super::sick_days::{sick_day_numbers, sick_payment_fraction};
use super::time_model::{minutes_to_hhmm, sabbath_window, MINUTES_PER_HOUR};

/// The immutable inputs of one person-month computation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonthInputs {
    /// The person computed.
    pub person_id: i64,
    /// The computed year.
    pub year: i32,
    /// The computed month (1..=12).
    pub month: u32,
    /// History-decorated reports of the month, in date order.
    pub reports: Vec<ResolvedReport>,
    /// Reference data threaded through the computation.
    pub snapshot: ReferenceSnapshot,
    /// Configured flat payment additions.
    pub components: Vec<PaymentComponent>,
}

/// The complete outcome of one person-month computation.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthOutcome {
    /// The rolled-up monthly totals.
    pub totals: MonthlyTotals,
    /// Per-work-day results, in date order.
    pub days: Vec<DailyResult>,
    /// Non-fatal conditions encountered along the way.
    pub warnings: Vec<ComputationWarning>,
}

/// Runs the full computation over an input snapshot.
///
/// The function is pure: equal inputs produce equal outcomes, and parallel
/// invocations over disjoint person-months share nothing mutable.
pub fn compute_month(inputs: &MonthInputs) -> MonthOutcome {
    let mut warnings = Vec::new();

    let mut prepared = Vec::with_capacity(inputs.reports.len());
    for report in &inputs.reports {
        match build_segments(report) {
            Ok(built) => prepared.push((report, built)),
            Err(reason) => {
                warn!(report_id = report.id, %reason, "skipping malformed report");
                warnings.push(ComputationWarning::malformed_report(report.id, &reason));
            }
        }
    }

    let buckets = build_day_buckets(&prepared, inputs.year, inputs.month);

    let mut days = Vec::with_capacity(buckets.len());
    let mut carry = CarryOver::default();
    let mut prev_date = None;

    for (date, bucket) in &buckets {
        if let Some(prev) = prev_date {
            if *date - prev != Duration::days(1) {
                carry = CarryOver::default();
            }
        }
        let window = sabbath_window(*date, &inputs.snapshot.sabbath);
        let carry_in = if carry.ended_at_boundary {
            carry.chain_minutes
        } else {
            0
        };
        let (result, carry_out) = process_day(
            *date,
            bucket,
            window,
            &inputs.snapshot.standby_rates,
            carry_in,
            &mut warnings,
        );
        days.push(result);
        carry = carry_out;
        prev_date = Some(*date);
    }

    let totals = roll_up(inputs, &prepared, &days);

    MonthOutcome {
        totals,
        days,
        warnings,
    }
}

fn roll_up(
    inputs: &MonthInputs,
    prepared: &[(&ResolvedReport, super::segment_builder::BuiltSegments)],
    days: &[DailyResult],
) -> MonthlyTotals {
    let minimum_wage = inputs.snapshot.minimum_wage;
    let mut minutes = TierMinutes::default();
    let mut totals = MonthlyTotals::default();

    for day in days {
        minutes.absorb(&day.minutes);

        for standby in &day.standbys {
            totals.standby_minutes += standby.end_min - standby.start_min;
            totals.standby_payment += standby.rate;
        }
        for cancelled in &day.cancelled_standbys {
            totals.cancelled_standby_deduction += cancelled.deduction;
            totals.standby_payment += cancelled.residual;
        }

        totals.vacation_minutes += day.vacation_minutes();
        totals.sick_minutes += day.sick_minutes();
        if day.has_work() {
            totals.work_days += 1;
        }
        if !day.vacation.is_empty() {
            totals.vacation_days += 1;
        }
    }

    totals.calc100 = minutes.calc100;
    totals.calc125 = minutes.calc125;
    totals.calc150 = minutes.calc150();
    totals.calc150_overtime = minutes.calc150_overtime;
    totals.calc150_shabbat = minutes.calc150_shabbat;
    totals.calc175 = minutes.calc175;
    totals.calc200 = minutes.calc200;
    totals.total_work_minutes = minutes.total();
    let (shabbat_base, shabbat_supplement) = minutes.shabbat_split();
    totals.calc150_shabbat_100 = shabbat_base;
    totals.calc150_shabbat_50 = shabbat_supplement;

    totals.vacation_payment = hourly(totals.vacation_minutes) * minimum_wage;

    // Sick pay is graduated over sequences of consecutive sick dates.
    let sick_dates: Vec<_> = prepared
        .iter()
        .filter(|(r, _)| r.is_sick)
        .map(|(r, _)| r.date)
        .collect();
    let sequence = sick_day_numbers(&sick_dates);
    for (report, _) in prepared.iter().filter(|(r, _)| r.is_sick) {
        let day_number = sequence.get(&report.date).copied().unwrap_or(1);
        totals.sick_payment += hourly(report.duration_minutes())
            * minimum_wage
            * sick_payment_fraction(day_number);
    }

    for (report, _) in prepared {
        totals.travel += report.travel;
    }
    for component in &inputs.components {
        if component.component_type_id == TRAVEL_COMPONENT_TYPE {
            totals.travel += component.amount;
        } else {
            totals.extras += component.amount;
        }
    }

    let mut payment = Decimal::ZERO;
    for (bucket, tier) in [
        (minutes.calc100, WageTier::Rate100),
        (minutes.calc125, WageTier::Rate125),
        (minutes.calc150(), WageTier::Rate150Overtime),
        (minutes.calc175, WageTier::Rate175),
        (minutes.calc200, WageTier::Rate200),
    ] {
        payment += hourly(bucket) * tier.multiplier() * minimum_wage;
    }
    payment += totals.standby_payment + totals.vacation_payment + totals.sick_payment;
    totals.payment = payment;
    totals.total_payment = payment + totals.travel + totals.extras;

    totals
}

/// Builds the per-day views for UI rendering and statutory export.
///
/// Work slices are priced here: regular minutes at the minimum wage times
/// their tier multiplier, escort minutes at the shift's flat rate outside
/// Sabbath and at the plain minimum wage inside it.
pub fn day_views(inputs: &MonthInputs, outcome: &MonthOutcome) -> Vec<DayView> {
    let shift_pricing: HashMap<i64, (ShiftClass, Option<Decimal>)> = inputs
        .reports
        .iter()
        .map(|r| (r.shift_type_id, (r.class, r.flat_rate)))
        .collect();
    let minimum_wage = inputs.snapshot.minimum_wage;

    outcome
        .days
        .iter()
        .map(|day| {
            let mut segments = Vec::new();
            let mut payment = Decimal::ZERO;
            let mut standby_payment = Decimal::ZERO;

            let work_slices = day
                .chains
                .iter()
                .flat_map(|chain| chain.slices.iter())
                .chain(day.fixed_slices.iter());
            for slice in work_slices {
                let (class, flat_rate) = shift_pricing
                    .get(&slice.shift_type_id)
                    .copied()
                    .unwrap_or((ShiftClass::Generic, None));
                let rate = slice_rate(slice.tier, class, flat_rate, minimum_wage);
                let amount = hourly(slice.minutes()) * rate;
                payment += amount;
                segments.push(segment_view(
                    slice.start_min,
                    slice.end_min,
                    DaySegmentKind::Work,
                    slice.tier.label().to_string(),
                    slice.tier.is_sabbath(),
                    Some(rate),
                    Some(amount),
                ));
            }

            for standby in &day.standbys {
                standby_payment += standby.rate;
                segments.push(segment_view(
                    standby.start_min,
                    standby.end_min,
                    DaySegmentKind::Standby,
                    String::new(),
                    false,
                    None,
                    Some(standby.rate),
                ));
            }
            for cancelled in &day.cancelled_standbys {
                standby_payment += cancelled.residual;
                segments.push(segment_view(
                    cancelled.start_min,
                    cancelled.end_min,
                    DaySegmentKind::CancelledStandby,
                    String::new(),
                    false,
                    None,
                    Some(cancelled.residual),
                ));
            }
            for span in &day.vacation {
                let amount = hourly(span.minutes()) * minimum_wage;
                segments.push(segment_view(
                    span.start_min,
                    span.end_min,
                    DaySegmentKind::Vacation,
                    String::new(),
                    false,
                    Some(minimum_wage),
                    Some(amount),
                ));
            }
            for span in &day.sick {
                segments.push(segment_view(
                    span.start_min,
                    span.end_min,
                    DaySegmentKind::Sick,
                    String::new(),
                    false,
                    None,
                    None,
                ));
            }

            segments.sort_by_key(|s| (s.start_min, s.end_min));

            DayView {
                date: day.date,
                segments,
                minutes: day.minutes,
                standby_payment,
                payment,
            }
        })
        .collect()
}

fn slice_rate(
    tier: WageTier,
    class: ShiftClass,
    flat_rate: Option<Decimal>,
    minimum_wage: Decimal,
) -> Decimal {
    if class.is_escort() {
        // Escort minutes pay the shift's flat rate on ordinary time and
        // drop to the plain minimum wage inside Sabbath, regardless of tier.
        if tier.is_sabbath() {
            minimum_wage
        } else {
            flat_rate.unwrap_or(minimum_wage)
        }
    } else {
        minimum_wage * tier.multiplier()
    }
}

fn segment_view(
    start_min: i64,
    end_min: i64,
    kind: DaySegmentKind,
    label: String,
    is_sabbath: bool,
    hourly_rate: Option<Decimal>,
    amount: Option<Decimal>,
) -> DaySegmentView {
    DaySegmentView {
        start_min,
        end_min,
        start_time: minutes_to_hhmm(start_min),
        end_time: minutes_to_hhmm(end_min),
        kind,
        label,
        is_sabbath,
        hourly_rate,
        amount,
    }
}

fn hourly(minutes: i64) -> Decimal {
    Decimal::from(minutes) / Decimal::from(MINUTES_PER_HOUR)
}
