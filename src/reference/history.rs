//! Valid-until history resolution.
//!
//! Mutable reference attributes (person status, apartment type, standby and
//! shift rates) are history-tracked with a "valid until" convention: a
//! history row keyed `(year, month)` holds the value that was effective
//! through the month immediately before it. Resolving an attribute for a
//! target month therefore picks the earliest history row strictly after the
//! target, falling back to the live value when no row covers it.

/// One history row: the value effective through the month before
/// `(year, month)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry<T> {
    /// The first month the value no longer applied.
    pub year: i32,
    /// Month component, 1..=12.
    pub month: u32,
    /// The superseded value.
    pub value: T,
}

/// Duplicate `(year, month)` rows for one entity.
///
/// The schema's `UNIQUE(entity, year, month)` constraint rules this out;
/// seeing it means the reference data is unusable for the entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DuplicateHistory {
    /// The duplicated year.
    pub year: i32,
    /// The duplicated month.
    pub month: u32,
}

/// The sorted history of one attribute of one entity.
///
/// Resolution is pure; a timeline is built once per computation and shared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryTimeline<T> {
    entries: Vec<HistoryEntry<T>>,
}

impl<T> HistoryTimeline<T> {
    /// An empty timeline: every month resolves to the live value.
    pub fn new() -> Self {
        HistoryTimeline {
            entries: Vec::new(),
        }
    }

    /// Builds a timeline from unordered rows, rejecting duplicates.
    pub fn from_entries(mut entries: Vec<HistoryEntry<T>>) -> Result<Self, DuplicateHistory> {
        entries.sort_by_key(|e| (e.year, e.month));
        for pair in entries.windows(2) {
            if (pair[0].year, pair[0].month) == (pair[1].year, pair[1].month) {
                return Err(DuplicateHistory {
                    year: pair[0].year,
                    month: pair[0].month,
                });
            }
        }
        Ok(HistoryTimeline { entries })
    }

    /// Whether the timeline has no rows.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The historical value effective for `(year, month)`, when one exists.
    ///
    /// Returns the earliest row with a key strictly greater than the
    /// target; `None` means the live value applies.
    ///
    /// # Example
    ///
    /// ```
    /// use wage_engine::reference::{HistoryEntry, HistoryTimeline};
    ///
    /// let timeline = HistoryTimeline::from_entries(vec![HistoryEntry {
    ///     year: 2025,
    ///     month: 3,
    ///     value: false,
    /// }])
    /// .unwrap();
    ///
    /// // February 2025 predates the change recorded for March.
    /// assert_eq!(timeline.resolve(2025, 2), Some(&false));
    /// // From March onward the live value applies.
    /// assert_eq!(timeline.resolve(2025, 3), None);
    /// ```
    pub fn resolve(&self, year: i32, month: u32) -> Option<&T> {
        self.entries
            .iter()
            .find(|e| (e.year, e.month) > (year, month))
            .map(|e| &e.value)
    }

    /// Resolves to the historical value or falls back to `live`.
    pub fn resolve_or<'a>(&'a self, year: i32, month: u32, live: &'a T) -> &'a T {
        self.resolve(year, month).unwrap_or(live)
    }
}
