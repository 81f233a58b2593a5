//! The work-day model: minute normalization, work-day attribution, and
//! Sabbath membership.
//!
//! A work-day runs 08:00 to 08:00 of the next civil date. Minutes are
//! counted from the work-day's civil midnight, so a normalized interval may
//! extend past 1440 into the early hours of the following date. All
//! interval endpoints are half-open.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

use crate::reference::{SabbathCache, SabbathTimes};

/// Minutes per hour.
pub const MINUTES_PER_HOUR: i64 = 60;
/// Minutes per day.
pub const MINUTES_PER_DAY: i64 = 1440;
/// The work-day boundary: 08:00.
pub const WORK_DAY_START_MINUTES: i64 = 480;
/// Chain minutes paid at 100% before overtime begins.
pub const REGULAR_HOURS_LIMIT: i64 = 480;
/// Chain minutes through which overtime pays 125%; beyond pays 150%.
pub const OVERTIME_125_LIMIT: i64 = 600;

/// Normalizes an interval whose end is at or before its start as overnight.
///
/// # Example
///
/// ```
/// use wage_engine::calculation::time_model::normalize_span;
///
/// assert_eq!(normalize_span(480, 960), (480, 960));
/// assert_eq!(normalize_span(1320, 480), (1320, 1920)); // 22:00 -> 08:00
/// ```
pub fn normalize_span(start_min: i64, end_min: i64) -> (i64, i64) {
    if end_min <= start_min {
        (start_min, end_min + MINUTES_PER_DAY)
    } else {
        (start_min, end_min)
    }
}

/// Formats a minute count as "HH:MM", wrapping past midnight.
pub fn minutes_to_hhmm(minutes: i64) -> String {
    let day_minutes = minutes.rem_euclid(MINUTES_PER_DAY);
    format!(
        "{:02}:{:02}",
        day_minutes / MINUTES_PER_HOUR,
        day_minutes % MINUTES_PER_HOUR
    )
}

/// Splits an interval logged on civil date `date` into work-day pieces.
///
/// Each returned piece is `(work_day, start, end)` with minutes re-anchored
/// to the work-day's civil midnight:
///
/// - a piece ending at or before 08:00 belongs to the previous work-day and
///   is shifted by +1440;
/// - a piece at or after 08:00 of the following date belongs to the next
///   work-day and is shifted by −1440;
/// - everything between stays on `date` unshifted.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use wage_engine::calculation::time_model::attribute_to_work_days;
///
/// let date = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap(); // Monday
/// // 06:00-10:00 straddles the boundary.
/// let pieces = attribute_to_work_days(date, 360, 600);
/// assert_eq!(pieces.len(), 2);
/// assert_eq!(pieces[0], (date.pred_opt().unwrap(), 1800, 1920));
/// assert_eq!(pieces[1], (date, 480, 600));
/// ```
pub fn attribute_to_work_days(
    date: NaiveDate,
    start_min: i64,
    end_min: i64,
) -> Vec<(NaiveDate, i64, i64)> {
    let cuts = [
        WORK_DAY_START_MINUTES,
        MINUTES_PER_DAY,
        MINUTES_PER_DAY + WORK_DAY_START_MINUTES,
    ];

    let mut points = vec![start_min];
    for cut in cuts {
        if cut > start_min && cut < end_min {
            points.push(cut);
        }
    }
    points.push(end_min);

    let mut pieces = Vec::new();
    for pair in points.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if b <= WORK_DAY_START_MINUTES {
            pieces.push((
                date - Duration::days(1),
                a + MINUTES_PER_DAY,
                b + MINUTES_PER_DAY,
            ));
        } else if a >= MINUTES_PER_DAY + WORK_DAY_START_MINUTES {
            pieces.push((
                date + Duration::days(1),
                a - MINUTES_PER_DAY,
                b - MINUTES_PER_DAY,
            ));
        } else {
            pieces.push((date, a, b));
        }
    }
    pieces
}

/// The Sabbath span of one work-day, in work-day-frame minutes.
///
/// Half-open: a minute `m` is Sabbath when `start <= m < end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SabbathWindow {
    /// First Sabbath minute (may be negative on a Saturday work-day).
    pub start: i64,
    /// First minute after Sabbath.
    pub end: i64,
}

impl SabbathWindow {
    /// Whether a work-day-frame minute falls inside the window.
    pub fn contains(&self, minute: i64) -> bool {
        self.start <= minute && minute < self.end
    }
}

/// The Sabbath window of a work-day, when it has one.
///
/// Friday work-days span from entry until exit past midnight; Saturday
/// work-days are inside Sabbath from their start until exit. Other days
/// have no window.
pub fn sabbath_window(work_day: NaiveDate, cache: &SabbathCache) -> Option<SabbathWindow> {
    match work_day.weekday() {
        Weekday::Fri => {
            let saturday = work_day + Duration::days(1);
            let SabbathTimes {
                entry_minute,
                exit_minute,
            } = cache.for_saturday(saturday);
            Some(SabbathWindow {
                start: entry_minute,
                end: MINUTES_PER_DAY + exit_minute,
            })
        }
        Weekday::Sat => {
            let SabbathTimes {
                entry_minute,
                exit_minute,
            } = cache.for_saturday(work_day);
            Some(SabbathWindow {
                start: entry_minute - MINUTES_PER_DAY,
                end: exit_minute,
            })
        }
        _ => None,
    }
}

/// Whether a specific minute of a civil date falls within Sabbath.
///
/// Friday before entry is not Sabbath; Friday from entry onward is;
/// Saturday before exit is; Saturday at or after exit is not. Minutes at or
/// past 1440 represent the early hours of the next civil date and are
/// re-tested against that date.
pub fn is_sabbath_minute(
    day_of_week: Weekday,
    minute_in_day: i64,
    current_date: NaiveDate,
    cache: &SabbathCache,
) -> bool {
    if minute_in_day >= MINUTES_PER_DAY {
        let next = current_date + Duration::days(1);
        return is_sabbath_minute(next.weekday(), minute_in_day - MINUTES_PER_DAY, next, cache);
    }

    match day_of_week {
        Weekday::Fri => {
            let saturday = current_date + Duration::days(1);
            minute_in_day >= cache.for_saturday(saturday).entry_minute
        }
        Weekday::Sat => minute_in_day < cache.for_saturday(current_date).exit_minute,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // 2025-03-07 is a Friday, 2025-03-08 a Saturday.
    fn friday() -> NaiveDate {
        date(2025, 3, 7)
    }

    fn saturday() -> NaiveDate {
        date(2025, 3, 8)
    }

    #[test]
    fn test_normalize_span_daytime() {
        assert_eq!(normalize_span(480, 960), (480, 960));
    }

    #[test]
    fn test_normalize_span_overnight() {
        assert_eq!(normalize_span(1320, 480), (1320, 1920));
    }

    #[test]
    fn test_normalize_span_equal_means_full_day() {
        assert_eq!(normalize_span(600, 600), (600, 2040));
    }

    #[test]
    fn test_minutes_to_hhmm() {
        assert_eq!(minutes_to_hhmm(0), "00:00");
        assert_eq!(minutes_to_hhmm(480), "08:00");
        assert_eq!(minutes_to_hhmm(1110), "18:30");
        assert_eq!(minutes_to_hhmm(1830), "06:30"); // past midnight
    }

    #[test]
    fn test_daytime_interval_stays_on_its_date() {
        let d = date(2025, 3, 4);
        assert_eq!(attribute_to_work_days(d, 480, 960), vec![(d, 480, 960)]);
    }

    #[test]
    fn test_early_morning_belongs_to_previous_work_day() {
        let d = date(2025, 3, 4);
        assert_eq!(
            attribute_to_work_days(d, 0, 360),
            vec![(date(2025, 3, 3), 1440, 1800)]
        );
    }

    #[test]
    fn test_interval_straddling_0800_splits() {
        let d = date(2025, 3, 4);
        assert_eq!(
            attribute_to_work_days(d, 360, 600),
            vec![(date(2025, 3, 3), 1800, 1920), (d, 480, 600)]
        );
    }

    #[test]
    fn test_overnight_interval_stays_on_start_work_day() {
        // 22:00 -> 08:00 next day: all of it belongs to the start date's
        // work-day, the after-midnight part in normalized minutes.
        let d = date(2025, 3, 2);
        assert_eq!(
            attribute_to_work_days(d, 1320, 1920),
            vec![(d, 1320, 1440), (d, 1440, 1920)]
        );
    }

    #[test]
    fn test_piece_past_0800_next_day_moves_forward() {
        let d = date(2025, 3, 2);
        assert_eq!(
            attribute_to_work_days(d, 1320, 2040),
            vec![
                (d, 1320, 1440),
                (d, 1440, 1920),
                (date(2025, 3, 3), 480, 600)
            ]
        );
    }

    #[test]
    fn test_attribution_preserves_total_minutes() {
        let d = date(2025, 3, 2);
        for (start, end) in [(300, 700), (1320, 1920), (480, 2040), (0, 480)] {
            let total: i64 = attribute_to_work_days(d, start, end)
                .iter()
                .map(|(_, a, b)| b - a)
                .sum();
            assert_eq!(total, end - start, "span {start}..{end}");
        }
    }

    #[test]
    fn test_friday_window_spans_midnight() {
        let mut cache = SabbathCache::new();
        cache.insert(
            saturday(),
            SabbathTimes {
                entry_minute: 1110,
                exit_minute: 1170,
            },
        );
        let window = sabbath_window(friday(), &cache).unwrap();
        assert_eq!(window.start, 1110);
        assert_eq!(window.end, 1440 + 1170);
        assert!(window.contains(1110));
        assert!(window.contains(2000));
        assert!(!window.contains(1109));
        assert!(!window.contains(2610));
    }

    #[test]
    fn test_saturday_window_is_open_from_day_start() {
        let cache = SabbathCache::new();
        let window = sabbath_window(saturday(), &cache).unwrap();
        assert_eq!(window.start, 960 - 1440);
        assert_eq!(window.end, 1320);
        assert!(window.contains(480));
        assert!(!window.contains(1320));
        // Past-midnight minutes on a Saturday work-day are Sunday morning.
        assert!(!window.contains(1500));
    }

    #[test]
    fn test_weekday_has_no_window() {
        let cache = SabbathCache::new();
        assert_eq!(sabbath_window(date(2025, 3, 4), &cache), None);
    }

    #[test]
    fn test_is_sabbath_minute_friday_boundaries() {
        let cache = SabbathCache::new();
        // Default entry is 960 on Friday.
        assert!(!is_sabbath_minute(Weekday::Fri, 959, friday(), &cache));
        assert!(is_sabbath_minute(Weekday::Fri, 960, friday(), &cache));
        assert!(is_sabbath_minute(Weekday::Fri, 1439, friday(), &cache));
    }

    #[test]
    fn test_is_sabbath_minute_saturday_boundaries() {
        let cache = SabbathCache::new();
        // Default exit is 1320 on Saturday.
        assert!(is_sabbath_minute(Weekday::Sat, 0, saturday(), &cache));
        assert!(is_sabbath_minute(Weekday::Sat, 1319, saturday(), &cache));
        assert!(!is_sabbath_minute(Weekday::Sat, 1320, saturday(), &cache));
    }

    #[test]
    fn test_is_sabbath_minute_reinterprets_past_midnight() {
        let cache = SabbathCache::new();
        // Friday minute 1500 is Saturday 01:00, inside Sabbath.
        assert!(is_sabbath_minute(Weekday::Fri, 1500, friday(), &cache));
        // Saturday minute 1500 is Sunday 01:00, outside.
        assert!(!is_sabbath_minute(Weekday::Sat, 1500, saturday(), &cache));
        // Thursday minute 1500 is Friday 01:00, before entry.
        assert!(!is_sabbath_minute(
            Weekday::Thu,
            1500,
            date(2025, 3, 6),
            &cache
        ));
    }

    #[test]
    fn test_weekday_minutes_never_sabbath() {
        let cache = SabbathCache::new();
        for weekday in [Weekday::Sun, Weekday::Mon, Weekday::Tue, Weekday::Wed] {
            assert!(!is_sabbath_minute(weekday, 1000, date(2025, 3, 4), &cache));
        }
    }
}
