//! Weekly Sabbath times.
//!
//! Entry and exit times vary week by week; the cache is keyed by the
//! Saturday date and read-only during a computation, so it is safe to share
//! across parallel invocations.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Default Sabbath entry when no row exists: 16:00 Friday.
pub const SHABBAT_ENTER_DEFAULT: i64 = 960;
/// Default Sabbath exit when no row exists: 22:00 Saturday.
pub const SHABBAT_EXIT_DEFAULT: i64 = 1320;

/// Entry/exit minutes for one week's Sabbath.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SabbathTimes {
    /// Minutes from Friday midnight at which Sabbath enters.
    pub entry_minute: i64,
    /// Minutes from Saturday midnight at which Sabbath exits.
    pub exit_minute: i64,
}

impl Default for SabbathTimes {
    fn default() -> Self {
        SabbathTimes {
            entry_minute: SHABBAT_ENTER_DEFAULT,
            exit_minute: SHABBAT_EXIT_DEFAULT,
        }
    }
}

/// Per-week Sabbath times, keyed by the Saturday date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SabbathCache {
    by_saturday: HashMap<NaiveDate, SabbathTimes>,
}

impl SabbathCache {
    /// An empty cache; every week falls back to the defaults.
    pub fn new() -> Self {
        SabbathCache {
            by_saturday: HashMap::new(),
        }
    }

    /// Records the times for the week of `saturday`.
    pub fn insert(&mut self, saturday: NaiveDate, times: SabbathTimes) {
        self.by_saturday.insert(saturday, times);
    }

    /// The times for the week of `saturday`, defaulting when absent.
    ///
    /// # Example
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use wage_engine::reference::{SabbathCache, SabbathTimes};
    ///
    /// let mut cache = SabbathCache::new();
    /// let saturday = NaiveDate::from_ymd_opt(2025, 3, 8).unwrap();
    /// cache.insert(saturday, SabbathTimes { entry_minute: 1110, exit_minute: 1115 });
    ///
    /// assert_eq!(cache.for_saturday(saturday).entry_minute, 1110);
    /// // An uncached week gets the defaults.
    /// let other = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap();
    /// assert_eq!(cache.for_saturday(other).entry_minute, 960);
    /// ```
    pub fn for_saturday(&self, saturday: NaiveDate) -> SabbathTimes {
        self.by_saturday
            .get(&saturday)
            .copied()
            .unwrap_or_default()
    }

    /// The number of cached weeks.
    pub fn len(&self) -> usize {
        self.by_saturday.len()
    }

    /// Whether the cache has no rows.
    pub fn is_empty(&self) -> bool {
        self.by_saturday.is_empty()
    }
}
