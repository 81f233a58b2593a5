//! Half-open minute-interval helpers shared by the calculation modules.

/// Length of the intersection of two half-open intervals.
pub(crate) fn intersection_len(a: (i64, i64), b: (i64, i64)) -> i64 {
    let start = a.0.max(b.0);
    let end = a.1.min(b.1);
    (end - start).max(0)
}

/// Sorts and merges overlapping or touching intervals.
pub(crate) fn merge(mut intervals: Vec<(i64, i64)>) -> Vec<(i64, i64)> {
    intervals.sort_unstable();
    let mut merged: Vec<(i64, i64)> = Vec::with_capacity(intervals.len());
    for (start, end) in intervals {
        if end <= start {
            continue;
        }
        match merged.last_mut() {
            Some(last) if start <= last.1 => last.1 = last.1.max(end),
            _ => merged.push((start, end)),
        }
    }
    merged
}

/// Length of `base ∩ (∪ others)`, counting overlapped minutes once.
pub(crate) fn union_intersection_len(base: (i64, i64), others: &[(i64, i64)]) -> i64 {
    merge(others.to_vec())
        .into_iter()
        .map(|o| intersection_len(base, o))
        .sum()
}

/// Removes every `cut` from `base`, returning the surviving pieces in order.
pub(crate) fn subtract(base: (i64, i64), cuts: &[(i64, i64)]) -> Vec<(i64, i64)> {
    let mut remaining = vec![base];
    for &cut in cuts {
        let mut next = Vec::with_capacity(remaining.len() + 1);
        for (start, end) in remaining {
            let inter_start = start.max(cut.0);
            let inter_end = end.min(cut.1);
            if inter_start < inter_end {
                if start < inter_start {
                    next.push((start, inter_start));
                }
                if inter_end < end {
                    next.push((inter_end, end));
                }
            } else {
                next.push((start, end));
            }
        }
        remaining = next;
    }
    remaining
}

/// The gaps of `(start, end)` not covered by `covered`.
pub(crate) fn uncovered(span: (i64, i64), covered: &[(i64, i64)]) -> Vec<(i64, i64)> {
    let merged = merge(covered.to_vec());
    let mut gaps = Vec::new();
    let mut cursor = span.0;
    for (start, end) in merged {
        if start > cursor && cursor < span.1 {
            gaps.push((cursor, start.min(span.1)));
        }
        cursor = cursor.max(end);
    }
    if cursor < span.1 {
        gaps.push((cursor, span.1));
    }
    gaps
}
