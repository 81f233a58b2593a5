//! Wage-tier assignment over work chains.
//!
//! The tier of a minute is decided by its chain-cumulative index `m`, not
//! by its clock position: minutes 0..480 of a chain pay 100%, 480..600 pay
//! 125%, and everything beyond pays 150%. Sabbath minutes use the parallel
//! 150%/175%/200% ladder. Rather than walking minute by minute, the sweep
//! advances in blocks bounded by the next tier boundary and splits each
//! block at the Sabbath entry/exit edges, so a single segment can emit
//! several contributions.

use crate::models::{ChainResult, ChainSlice, TierMinutes, WageTier};

use super::time_model::{SabbathWindow, OVERTIME_125_LIMIT, REGULAR_HOURS_LIMIT};

/// One work segment queued into a chain, in work-day-frame minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainSegment {
    /// Start minute.
    pub start_min: i64,
    /// End minute.
    pub end_min: i64,
    /// The shift kind the segment came from.
    pub shift_type_id: i64,
}

/// A fixed-percentage segment that bypasses the chain sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedSegment {
    /// Start minute.
    pub start_min: i64,
    /// End minute.
    pub end_min: i64,
    /// The pinned wage percentage (100/125/150/175/200).
    pub wage_percent: u16,
    /// The shift kind the segment came from.
    pub shift_type_id: i64,
}

/// Computes the tier decomposition of one chain.
///
/// `offset_minutes` is the cumulative count carried over from the previous
/// work-day when the chain continues an overnight shift across the 08:00
/// boundary.
///
/// # Example
///
/// ```
/// use wage_engine::calculation::chain_wages::{compute_chain, ChainSegment};
///
/// // A 570-minute weekday chain: 480 at 100%, 90 at 125%.
/// let chain = [
///     ChainSegment { start_min: 480, end_min: 990, shift_type_id: 1 },
///     ChainSegment { start_min: 1020, end_min: 1080, shift_type_id: 1 },
/// ];
/// let result = compute_chain(&chain, None, 0);
/// assert_eq!(result.minutes.calc100, 480);
/// assert_eq!(result.minutes.calc125, 90);
/// assert_eq!(result.minutes.total(), result.total_minutes);
/// ```
pub fn compute_chain(
    segments: &[ChainSegment],
    window: Option<SabbathWindow>,
    offset_minutes: i64,
) -> ChainResult {
    let mut minutes = TierMinutes::default();
    let mut slices: Vec<ChainSlice> = Vec::new();
    let mut m = offset_minutes;

    for seg in segments {
        let mut pos = seg.start_min;
        while pos < seg.end_min {
            let (tier_boundary, base_tier, sabbath_tier) = if m < REGULAR_HOURS_LIMIT {
                (REGULAR_HOURS_LIMIT, WageTier::Rate100, WageTier::Rate150Shabbat)
            } else if m < OVERTIME_125_LIMIT {
                (OVERTIME_125_LIMIT, WageTier::Rate125, WageTier::Rate175)
            } else {
                (i64::MAX, WageTier::Rate150Overtime, WageTier::Rate200)
            };

            let block = (tier_boundary - m).min(seg.end_min - pos);
            let block_end = pos + block;

            let mut bounds = vec![pos, block_end];
            if let Some(w) = window {
                for edge in [w.start, w.end] {
                    if edge > pos && edge < block_end {
                        bounds.push(edge);
                    }
                }
            }
            bounds.sort_unstable();

            for pair in bounds.windows(2) {
                let (a, b) = (pair[0], pair[1]);
                if b <= a {
                    continue;
                }
                let in_sabbath = window.is_some_and(|w| w.contains(a));
                let tier = if in_sabbath { sabbath_tier } else { base_tier };
                minutes.add(tier, b - a);
                push_slice(
                    &mut slices,
                    ChainSlice {
                        start_min: a,
                        end_min: b,
                        tier,
                        shift_type_id: seg.shift_type_id,
                    },
                );
            }

            pos = block_end;
            m += block;
        }
    }

    let total_minutes = segments.iter().map(|s| s.end_min - s.start_min).sum();
    ChainResult {
        slices,
        minutes,
        total_minutes,
        offset_minutes,
    }
}

/// Buckets fixed-percentage (tagbur) segments.
///
/// Minutes pinned at 150% are split by the Sabbath window into the Sabbath
/// and overtime 150% buckets; every other percentage lands directly in its
/// bucket. Unknown percentages are conservatively treated as 100%.
pub fn fixed_slices(
    segments: &[FixedSegment],
    window: Option<SabbathWindow>,
) -> (TierMinutes, Vec<ChainSlice>) {
    let mut minutes = TierMinutes::default();
    let mut slices = Vec::new();

    for seg in segments {
        match seg.wage_percent {
            150 => {
                let mut bounds = vec![seg.start_min, seg.end_min];
                if let Some(w) = window {
                    for edge in [w.start, w.end] {
                        if edge > seg.start_min && edge < seg.end_min {
                            bounds.push(edge);
                        }
                    }
                }
                bounds.sort_unstable();
                for pair in bounds.windows(2) {
                    let (a, b) = (pair[0], pair[1]);
                    if b <= a {
                        continue;
                    }
                    let tier = if window.is_some_and(|w| w.contains(a)) {
                        WageTier::Rate150Shabbat
                    } else {
                        WageTier::Rate150Overtime
                    };
                    minutes.add(tier, b - a);
                    push_slice(
                        &mut slices,
                        ChainSlice {
                            start_min: a,
                            end_min: b,
                            tier,
                            shift_type_id: seg.shift_type_id,
                        },
                    );
                }
            }
            percent => {
                let tier = match percent {
                    125 => WageTier::Rate125,
                    175 => WageTier::Rate175,
                    200 => WageTier::Rate200,
                    _ => WageTier::Rate100,
                };
                minutes.add(tier, seg.end_min - seg.start_min);
                push_slice(
                    &mut slices,
                    ChainSlice {
                        start_min: seg.start_min,
                        end_min: seg.end_min,
                        tier,
                        shift_type_id: seg.shift_type_id,
                    },
                );
            }
        }
    }

    (minutes, slices)
}

/// Appends a slice, merging it into the previous one when contiguous and
/// identically classified.
fn push_slice(slices: &mut Vec<ChainSlice>, slice: ChainSlice) {
    if let Some(last) = slices.last_mut() {
        if last.end_min == slice.start_min
            && last.tier == slice.tier
            && last.shift_type_id == slice.shift_type_id
        {
            last.end_min = slice.end_min;
            return;
        }
    }
    slices.push(slice);
}
