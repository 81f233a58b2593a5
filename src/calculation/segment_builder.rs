//! Segment decomposition of a single report.
//!
//! One report becomes an ordered list of segments on the report's own
//! timeline (minutes from the report date's midnight, up to 2880 for
//! overnight spans). How the decomposition works is dispatched over the
//! report's [`ShiftClass`]: stored templates for templated kinds,
//! synthesized slots for night shifts, a single work segment for escorts
//! and untemplated kinds, and a single non-work segment for vacation or
//! sickness reports.

use crate::models::{ResolvedReport, SegmentType, ShiftClass, ShiftTemplate};

use super::intervals;
use super::time_model::{normalize_span, MINUTES_PER_DAY, MINUTES_PER_HOUR};

/// First minutes of a night shift worked before standby begins.
pub const NIGHT_SHIFT_WORK_FIRST_MINUTES: i64 = 120;
/// Night standby runs until 06:30.
pub const NIGHT_SHIFT_STANDBY_END: i64 = 390;
/// Noon; a night report starting at or after it targets next-day 06:30.
const NOON_MINUTES: i64 = 720;
/// The minimum billable span of a medical escort.
const MINIMUM_ESCORT_MINUTES: i64 = MINUTES_PER_HOUR;

/// What a built segment represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    /// Paid working time, chain-computed unless a fixed percent is set.
    Work,
    /// On-call time paid at a flat standby rate.
    Standby,
    /// Vacation time.
    Vacation,
    /// Sickness time.
    Sick,
}

/// One segment of a report, on the report's timeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// What the segment represents.
    pub kind: SegmentKind,
    /// Start minute from the report date's midnight.
    pub start_min: i64,
    /// End minute from the report date's midnight (may exceed 1440).
    pub end_min: i64,
    /// Template segment id, when the segment came from a template.
    pub segment_id: Option<i64>,
    /// Stable evaluation order.
    pub order_index: i32,
    /// Fixed wage percentage; 0 means chain-computed.
    pub wage_percent: u16,
    /// The shift kind the segment came from.
    pub shift_type_id: i64,
}

/// The decomposition of one report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltSegments {
    /// Ordered segments.
    pub segments: Vec<Segment>,
    /// Minutes credited to reach an escort's minimum billable hour.
    pub escort_bonus_minutes: i64,
}

/// Decomposes a report into ordered segments.
///
/// Returns a human-readable reason when the report is malformed (bad
/// interval, or a template segment outside `0..2880`); the caller skips
/// the report and records a warning.
pub fn build_segments(report: &ResolvedReport) -> Result<BuiltSegments, String> {
    validate_report(report)?;

    let mut bonus = 0;
    let segments = match report.class {
        _ if report.is_vacation || report.is_sick => vec![full_span_segment(
            report,
            if report.is_sick {
                SegmentKind::Sick
            } else {
                SegmentKind::Vacation
            },
        )],
        ShiftClass::NightDynamic => night_segments(report),
        ShiftClass::HospitalEscort | ShiftClass::MedicalEscort => {
            if report.class == ShiftClass::MedicalEscort {
                bonus = (MINIMUM_ESCORT_MINUTES - report.duration_minutes()).max(0);
            }
            vec![full_span_segment(report, SegmentKind::Work)]
        }
        ShiftClass::FixedTemplate | ShiftClass::ImplicitTagbur => match &report.template {
            Some(template) => template_segments(report, template)?,
            None => vec![full_span_segment(report, SegmentKind::Work)],
        },
        ShiftClass::Generic => vec![full_span_segment(report, SegmentKind::Work)],
    };

    Ok(BuiltSegments {
        segments,
        escort_bonus_minutes: bonus,
    })
}

fn validate_report(report: &ResolvedReport) -> Result<(), String> {
    if report.start_min < 0 || report.start_min >= MINUTES_PER_DAY {
        return Err(format!("start minute {} out of range", report.start_min));
    }
    if report.end_min <= report.start_min {
        return Err(format!(
            "non-positive duration ({}..{})",
            report.start_min, report.end_min
        ));
    }
    if report.end_min > 2 * MINUTES_PER_DAY {
        return Err(format!("end minute {} out of range", report.end_min));
    }
    if let Some(template) = &report.template {
        for seg in &template.segments {
            if seg.start_min < 0 || seg.end_min > 2 * MINUTES_PER_DAY {
                return Err(format!(
                    "template segment {:?} outside 0..2880",
                    (seg.start_min, seg.end_min)
                ));
            }
        }
    }
    Ok(())
}

fn full_span_segment(report: &ResolvedReport, kind: SegmentKind) -> Segment {
    Segment {
        kind,
        start_min: report.start_min,
        end_min: report.end_min,
        segment_id: None,
        order_index: 0,
        wage_percent: 0,
        shift_type_id: report.shift_type_id,
    }
}

/// Synthesizes the night-shift decomposition: the first two hours are work,
/// standby runs until 06:30, and the remainder until the report end is
/// morning work. Short reports produce only the leading pieces.
fn night_segments(report: &ResolvedReport) -> Vec<Segment> {
    let start = report.start_min;
    let end = report.end_min;
    let standby_segment_id = report
        .template
        .as_ref()
        .and_then(ShiftTemplate::standby_segment_id);

    let next_day = if start >= NOON_MINUTES {
        MINUTES_PER_DAY
    } else {
        0
    };
    let standby_until = NIGHT_SHIFT_STANDBY_END + next_day;

    let mut segments = Vec::with_capacity(3);

    let work1_end = (start + NIGHT_SHIFT_WORK_FIRST_MINUTES).min(end);
    if work1_end > start {
        segments.push(Segment {
            kind: SegmentKind::Work,
            start_min: start,
            end_min: work1_end,
            segment_id: None,
            order_index: 0,
            wage_percent: 0,
            shift_type_id: report.shift_type_id,
        });
    }

    let standby_end = standby_until.min(end);
    if standby_end > work1_end {
        segments.push(Segment {
            kind: SegmentKind::Standby,
            start_min: work1_end,
            end_min: standby_end,
            segment_id: standby_segment_id,
            order_index: 1,
            wage_percent: 0,
            shift_type_id: report.shift_type_id,
        });
    }

    let morning_start = standby_until.max(work1_end);
    if morning_start < end {
        segments.push(Segment {
            kind: SegmentKind::Work,
            start_min: morning_start,
            end_min: end,
            segment_id: None,
            order_index: 2,
            wage_percent: 0,
            shift_type_id: report.shift_type_id,
        });
    }

    segments
}

/// Lays a stored template onto the report's timeline.
///
/// Template segments are day-of-clock times; they are rotated so that the
/// segment covering the report's start comes first, then stacked
/// monotonically (+1440 whenever a segment precedes its predecessor),
/// clipped to the report span, and any uncovered report time is filled with
/// plain chain-computed work.
fn template_segments(
    report: &ResolvedReport,
    template: &ShiftTemplate,
) -> Result<Vec<Segment>, String> {
    if template.segments.is_empty() {
        return Ok(vec![full_span_segment(report, SegmentKind::Work)]);
    }

    let mut spans: Vec<(i64, i64, usize)> = template
        .segments
        .iter()
        .enumerate()
        .map(|(idx, seg)| {
            let (s, e) = normalize_span(seg.start_min, seg.end_min);
            (s, e, idx)
        })
        .collect();
    spans.sort_unstable_by_key(|(s, _, _)| *s);

    // The segment whose start is closest at-or-before the report start
    // leads; when none qualifies the report begins inside the previous
    // evening's last segment.
    let anchor = report.start_min;
    let (rotate_idx, from_prev_evening) = match spans.iter().rposition(|(s, _, _)| *s <= anchor) {
        Some(idx) => (idx, false),
        None => (spans.len() - 1, true),
    };
    spans.rotate_left(rotate_idx);

    let mut placed: Vec<(i64, i64, usize)> = Vec::with_capacity(spans.len());
    let mut last_end = i64::MIN;
    for (mut s, mut e, idx) in spans {
        while s < last_end {
            s += MINUTES_PER_DAY;
            e += MINUTES_PER_DAY;
        }
        last_end = e;
        placed.push((s, e, idx));
    }
    if from_prev_evening {
        for span in &mut placed {
            span.0 -= MINUTES_PER_DAY;
            span.1 -= MINUTES_PER_DAY;
        }
    }

    let report_span = (report.start_min, report.end_min);
    let mut segments = Vec::new();
    let mut covered = Vec::new();
    let mut max_order = 0;

    for (s, e, idx) in placed {
        let clipped_start = s.max(report_span.0);
        let clipped_end = e.min(report_span.1);
        if clipped_end <= clipped_start {
            continue;
        }
        let tpl = &template.segments[idx];
        segments.push(Segment {
            kind: match tpl.segment_type {
                SegmentType::Work => SegmentKind::Work,
                SegmentType::Standby => SegmentKind::Standby,
            },
            start_min: clipped_start,
            end_min: clipped_end,
            segment_id: tpl.id,
            order_index: tpl.order_index,
            wage_percent: tpl.wage_percent,
            shift_type_id: report.shift_type_id,
        });
        covered.push((clipped_start, clipped_end));
        max_order = max_order.max(tpl.order_index);
    }

    // Report time not covered by the template is still worked time.
    for (gap_start, gap_end) in intervals::uncovered(report_span, &covered) {
        max_order += 1;
        segments.push(Segment {
            kind: SegmentKind::Work,
            start_min: gap_start,
            end_min: gap_end,
            segment_id: None,
            order_index: max_order,
            wage_percent: 0,
            shift_type_id: report.shift_type_id,
        });
    }

    segments.sort_by_key(|s| (s.start_min, s.order_index));
    Ok(segments)
}
