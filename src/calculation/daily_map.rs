//! Work-day grouping, standby cancellation, and chain formation.
//!
//! Segments built from reports are attributed to work-days, then each
//! work-day is resolved independently: duplicate segments are dropped,
//! standbys are tested for cancellation against the day's work, the
//! surviving work segments are partitioned into chains, and the chains are
//! swept by the wage engine. Overnight chains ending exactly at the 08:00
//! boundary hand their cumulative minute count to the next work-day.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use tracing::warn;

use crate::models::{
    ApartmentType, CancelledStandby, ComputationWarning, DailyResult, KeptStandby, MinuteSpan,
    ResolvedReport, TierMinutes, WageTier,
};
use crate::reference::StandbyRateBook;

use super::chain_wages::{compute_chain, fixed_slices, ChainSegment, FixedSegment};
use super::intervals;
use super::segment_builder::{BuiltSegments, SegmentKind};
use super::time_model::{
    attribute_to_work_days, SabbathWindow, MINUTES_PER_DAY, WORK_DAY_START_MINUTES,
};

/// Gaps of this size or more split a work chain.
pub const BREAK_THRESHOLD_MINUTES: i64 = 60;
/// Work overlap at or above this share of a standby cancels it.
pub const STANDBY_CANCEL_OVERLAP_THRESHOLD: f64 = 0.70;
/// Rate applied when no standby-rate row matches, in shekels.
pub const DEFAULT_STANDBY_RATE: Decimal = Decimal::from_parts(70, 0, 0, false, 0);
/// The most a cancelled standby can deduct, in shekels.
pub const MAX_CANCELLED_STANDBY_DEDUCTION: Decimal = Decimal::from_parts(70, 0, 0, false, 0);

/// A chain-computed work segment attributed to a work-day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkSegment {
    /// Start minute in the work-day frame.
    pub start_min: i64,
    /// End minute in the work-day frame.
    pub end_min: i64,
    /// The shift kind the segment came from.
    pub shift_type_id: i64,
    /// Stable evaluation order.
    pub order_index: i32,
}

/// A standby segment attributed to a work-day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StandbySegment {
    /// Start minute in the work-day frame.
    pub start_min: i64,
    /// End minute in the work-day frame.
    pub end_min: i64,
    /// Template segment id keying the rate lookup.
    pub segment_id: Option<i64>,
    /// Stable evaluation order.
    pub order_index: i32,
    /// Apartment type for the rate lookup (after housing overrides).
    pub rate_apartment_type: Option<ApartmentType>,
    /// Marital status for the rate lookup.
    pub is_married: bool,
}

/// Everything attributed to one work-day, before resolution.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DayBucket {
    /// Chain-computed work segments.
    pub work: Vec<WorkSegment>,
    /// Fixed-percentage (tagbur) segments.
    pub fixed: Vec<FixedSegment>,
    /// Standby segments.
    pub standby: Vec<StandbySegment>,
    /// Vacation spans.
    pub vacation: Vec<MinuteSpan>,
    /// Sickness spans.
    pub sick: Vec<MinuteSpan>,
    /// Escort minimum-hour top-up minutes.
    pub escort_bonus_minutes: i64,
}

/// Chain state handed from one work-day to the next.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CarryOver {
    /// Cumulative minutes of the chain that ended at the boundary.
    pub chain_minutes: i64,
    /// Whether the previous day's last chain ended exactly at 08:00.
    pub ended_at_boundary: bool,
}

/// Groups built report segments by work-day, dropping days outside the
/// computed month.
pub fn build_day_buckets(
    prepared: &[(&ResolvedReport, BuiltSegments)],
    year: i32,
    month: u32,
) -> BTreeMap<NaiveDate, DayBucket> {
    let mut buckets: BTreeMap<NaiveDate, DayBucket> = BTreeMap::new();
    let in_month = |day: NaiveDate| day.year() == year && day.month() == month;

    for (report, built) in prepared {
        let mut bonus_pending = built.escort_bonus_minutes;
        for segment in &built.segments {
            for (work_day, start, end) in
                attribute_to_work_days(report.date, segment.start_min, segment.end_min)
            {
                if !in_month(work_day) {
                    continue;
                }
                let bucket = buckets.entry(work_day).or_default();
                if bonus_pending > 0 {
                    bucket.escort_bonus_minutes += bonus_pending;
                    bonus_pending = 0;
                }
                match segment.kind {
                    SegmentKind::Work if segment.wage_percent > 0 => {
                        bucket.fixed.push(FixedSegment {
                            start_min: start,
                            end_min: end,
                            wage_percent: segment.wage_percent,
                            shift_type_id: segment.shift_type_id,
                        });
                    }
                    SegmentKind::Work => bucket.work.push(WorkSegment {
                        start_min: start,
                        end_min: end,
                        shift_type_id: segment.shift_type_id,
                        order_index: segment.order_index,
                    }),
                    SegmentKind::Standby => bucket.standby.push(StandbySegment {
                        start_min: start,
                        end_min: end,
                        segment_id: segment.segment_id,
                        order_index: segment.order_index,
                        rate_apartment_type: report.rate_apartment_type,
                        is_married: report.is_married,
                    }),
                    SegmentKind::Vacation => bucket.vacation.push(MinuteSpan {
                        start_min: start,
                        end_min: end,
                    }),
                    SegmentKind::Sick => bucket.sick.push(MinuteSpan {
                        start_min: start,
                        end_min: end,
                    }),
                }
            }
        }
    }

    buckets
}

/// Resolves one work-day: cancellation, chains, and tier sweep.
///
/// `carry_in` is the cumulative minute count of the previous day's chain
/// when it ended exactly at the 08:00 boundary; it only takes effect when
/// this day's first work event starts exactly at 08:00.
pub fn process_day(
    date: NaiveDate,
    bucket: &DayBucket,
    window: Option<SabbathWindow>,
    rates: &StandbyRateBook,
    carry_in: i64,
    warnings: &mut Vec<ComputationWarning>,
) -> (DailyResult, CarryOver) {
    let mut work = dedup_work(&bucket.work);
    let standby = merge_standby(dedup_standby(&bucket.standby));

    // Standby cancellation, evaluated in (order_index, start) order against
    // the union of all work overlaps on the day.
    let work_intervals: Vec<(i64, i64)> = work.iter().map(|w| (w.start_min, w.end_min)).collect();
    let mut kept: Vec<(StandbySegment, Decimal)> = Vec::new();
    let mut cancelled = Vec::new();

    for sb in &standby {
        let duration = sb.end_min - sb.start_min;
        if duration <= 0 {
            continue;
        }
        let overlap =
            intervals::union_intersection_len((sb.start_min, sb.end_min), &work_intervals);
        let ratio = overlap as f64 / duration as f64;
        let rate = standby_rate(rates, sb, warnings);

        if ratio >= STANDBY_CANCEL_OVERLAP_THRESHOLD {
            let deduction = rate.min(MAX_CANCELLED_STANDBY_DEDUCTION);
            cancelled.push(CancelledStandby {
                start_min: sb.start_min,
                end_min: sb.end_min,
                rate,
                deduction,
                residual: (rate - MAX_CANCELLED_STANDBY_DEDUCTION).max(Decimal::ZERO),
            });
        } else {
            kept.push((*sb, rate));
        }
    }

    // A kept standby owns its minutes: overlapping work is trimmed so the
    // same minute is never paid twice.
    let kept_intervals: Vec<(i64, i64)> = kept
        .iter()
        .map(|(sb, _)| (sb.start_min, sb.end_min))
        .collect();
    if !kept_intervals.is_empty() {
        let mut trimmed = Vec::with_capacity(work.len());
        for w in &work {
            for (start, end) in intervals::subtract((w.start_min, w.end_min), &kept_intervals) {
                trimmed.push(WorkSegment {
                    start_min: start,
                    end_min: end,
                    ..*w
                });
            }
        }
        work = trimmed;
    }

    // Chain formation over the merged event timeline.
    #[derive(Clone, Copy)]
    enum Event {
        Work(WorkSegment),
        Standby,
    }
    let mut events: Vec<(i64, i64, Event)> = work
        .iter()
        .map(|w| (w.start_min, w.end_min, Event::Work(*w)))
        .chain(
            kept.iter()
                .map(|(sb, _)| (sb.start_min, sb.end_min, Event::Standby)),
        )
        .collect();
    events.sort_by_key(|(start, end, _)| (*start, *end));

    let first_work_start = events
        .iter()
        .find_map(|(start, _, e)| matches!(e, Event::Work(_)).then_some(*start));
    let day_offset = if first_work_start == Some(WORK_DAY_START_MINUTES) {
        carry_in
    } else {
        0
    };

    let mut chains = Vec::new();
    let mut current: Vec<ChainSegment> = Vec::new();
    let mut last_end: Option<i64> = None;
    let mut first_chain = true;

    let mut close_chain =
        |current: &mut Vec<ChainSegment>, first_chain: &mut bool, chains: &mut Vec<_>| {
            if current.is_empty() {
                return;
            }
            let offset = if *first_chain { day_offset } else { 0 };
            chains.push(compute_chain(current, window, offset));
            current.clear();
            *first_chain = false;
        };

    for (start, end, event) in events {
        match event {
            Event::Standby => {
                close_chain(&mut current, &mut first_chain, &mut chains);
                last_end = Some(end);
            }
            Event::Work(w) => {
                if let Some(prev_end) = last_end {
                    if !current.is_empty() && start - prev_end >= BREAK_THRESHOLD_MINUTES {
                        close_chain(&mut current, &mut first_chain, &mut chains);
                    }
                }
                current.push(ChainSegment {
                    start_min: w.start_min,
                    end_min: w.end_min,
                    shift_type_id: w.shift_type_id,
                });
                last_end = Some(end);
            }
        }
    }
    close_chain(&mut current, &mut first_chain, &mut chains);

    let (fixed_minutes, fixed) = fixed_slices(&bucket.fixed, window);

    let mut minutes = TierMinutes::default();
    for chain in &chains {
        minutes.absorb(&chain.minutes);
    }
    minutes.absorb(&fixed_minutes);
    minutes.add(WageTier::Rate100, bucket.escort_bonus_minutes);

    let carry = chains
        .last()
        .and_then(|chain| {
            let chain_end = chain.slices.last().map(|s| s.end_min)?;
            (chain_end == WORK_DAY_START_MINUTES + MINUTES_PER_DAY).then_some(CarryOver {
                chain_minutes: chain.offset_minutes + chain.total_minutes,
                ended_at_boundary: true,
            })
        })
        .unwrap_or_default();

    let result = DailyResult {
        date,
        chains,
        fixed_slices: fixed,
        minutes,
        standbys: kept
            .into_iter()
            .map(|(sb, rate)| KeptStandby {
                start_min: sb.start_min,
                end_min: sb.end_min,
                segment_id: sb.segment_id,
                rate,
            })
            .collect(),
        cancelled_standbys: cancelled,
        vacation: bucket.vacation.clone(),
        sick: bucket.sick.clone(),
        escort_bonus_minutes: bucket.escort_bonus_minutes,
    };

    (result, carry)
}

fn standby_rate(
    rates: &StandbyRateBook,
    sb: &StandbySegment,
    warnings: &mut Vec<ComputationWarning>,
) -> Decimal {
    let marital = crate::models::MaritalStatus::from_flag(sb.is_married);
    match rates.lookup(sb.segment_id, sb.rate_apartment_type, marital) {
        Some(rate) => rate,
        None => {
            warn!(segment_id = ?sb.segment_id, "no standby rate matched, using default");
            warnings.push(ComputationWarning::standby_rate_missing(sb.segment_id));
            DEFAULT_STANDBY_RATE
        }
    }
}

fn dedup_work(segments: &[WorkSegment]) -> Vec<WorkSegment> {
    let mut seen = std::collections::HashSet::new();
    let mut out: Vec<WorkSegment> = segments
        .iter()
        .filter(|w| seen.insert((w.start_min, w.end_min, w.shift_type_id)))
        .copied()
        .collect();
    out.sort_by_key(|w| (w.start_min, w.end_min));
    out
}

fn dedup_standby(segments: &[StandbySegment]) -> Vec<StandbySegment> {
    let mut seen = std::collections::HashSet::new();
    let mut out: Vec<StandbySegment> = segments
        .iter()
        .filter(|s| seen.insert((s.start_min, s.end_min, s.segment_id)))
        .copied()
        .collect();
    out.sort_by_key(|s| (s.start_min, s.end_min));
    out
}

/// Merges contiguous standby fragments of the same template segment, so the
/// cancellation test sees the full on-call period rather than pieces of it.
fn merge_standby(segments: Vec<StandbySegment>) -> Vec<StandbySegment> {
    let mut merged: Vec<StandbySegment> = Vec::with_capacity(segments.len());
    for sb in segments {
        match merged.last_mut() {
            Some(last) if sb.start_min <= last.end_min && sb.segment_id == last.segment_id => {
                last.end_min = last.end_min.max(sb.end_min);
            }
            _ => merged.push(sb),
        }
    }
    merged.sort_by_key(|s| (s.order_index, s.start_min));
    merged
}
