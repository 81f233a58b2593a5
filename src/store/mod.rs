//! Read-only relational access.
//!
//! The engine consumes a relational schema as an input contract; this
//! module is the only place that touches it. Loading is separated from
//! computing: [`load_month_inputs`] materializes everything a person-month
//! needs — reports decorated with history-resolved reference values plus a
//! [`ReferenceSnapshot`] — and the calculation modules run without further
//! I/O. History resolution follows the valid-until convention of
//! [`HistoryTimeline`].

use std::collections::{HashMap, HashSet};

use chrono::{NaiveDate, Utc};
use rusqlite::{Connection, OptionalExtension};
use rust_decimal::Decimal;
use tracing::debug;
use uuid::Uuid;

use crate::calculation::time_model::normalize_span;
use crate::calculation::{compute_month, day_views, MonthInputs};
use crate::error::{EngineError, EngineResult};
use crate::models::{
    tagbur_counterpart, Apartment, ApartmentType, DayView, MonthlyComputation, PaymentComponent,
    PersonStatus, ResolvedReport, SegmentType, ShiftClass, ShiftRate, ShiftTemplate,
    TemplateSegment, TimeReport, FRIDAY_SHIFT, HOSPITAL_ESCORT_SHIFT, MEDICAL_ESCORT_SHIFT,
    NIGHT_SHIFT, SHABBAT_SHIFT,
};
use crate::reference::{
    HistoryEntry, HistoryTimeline, ReferenceSnapshot, SabbathCache, SabbathTimes, StandbyRateBook,
};

/// Fallback hourly minimum wage when the rate table has no applicable row.
pub const DEFAULT_MINIMUM_WAGE: Decimal = Decimal::from_parts(3440, 0, 0, false, 2);

/// Computes the monthly totals for one person.
///
/// This is the primary engine entry point: it loads the month's inputs,
/// runs the pure computation, and wraps the totals with run metadata and
/// any warnings gathered along the way.
pub fn compute_monthly_totals(
    conn: &Connection,
    person_id: i64,
    year: i32,
    month: u32,
    sabbath_cache: &SabbathCache,
    minimum_wage: Decimal,
) -> EngineResult<MonthlyComputation> {
    let inputs = load_month_inputs(conn, person_id, year, month, sabbath_cache, minimum_wage)?;
    let outcome = compute_month(&inputs);
    Ok(MonthlyComputation {
        computation_id: Uuid::new_v4(),
        computed_at: Utc::now(),
        engine_version: env!("CARGO_PKG_VERSION").to_string(),
        person_id,
        year,
        month,
        totals: outcome.totals,
        warnings: outcome.warnings,
    })
}

/// Computes the per-day segment decomposition for UI rendering.
pub fn get_daily_segments(
    conn: &Connection,
    person_id: i64,
    year: i32,
    month: u32,
    sabbath_cache: &SabbathCache,
    minimum_wage: Decimal,
) -> EngineResult<Vec<DayView>> {
    let inputs = load_month_inputs(conn, person_id, year, month, sabbath_cache, minimum_wage)?;
    let outcome = compute_month(&inputs);
    Ok(day_views(&inputs, &outcome))
}

/// Materializes everything one person-month computation needs.
pub fn load_month_inputs(
    conn: &Connection,
    person_id: i64,
    year: i32,
    month: u32,
    sabbath_cache: &SabbathCache,
    minimum_wage: Decimal,
) -> EngineResult<MonthInputs> {
    let status = person_status_for_month(conn, person_id, year, month)?;
    let raw_reports = fetch_reports(conn, person_id, year, month)?;

    // Reference sets are driven by what the month's reports touch.
    let mut shift_ids: HashSet<i64> = raw_reports.iter().map(|r| r.shift_type_id).collect();
    for id in [FRIDAY_SHIFT, SHABBAT_SHIFT] {
        if shift_ids.contains(&id) {
            if let Some(counterpart) = tagbur_counterpart(id) {
                shift_ids.insert(counterpart);
            }
        }
    }
    let apartment_ids: HashSet<i64> = raw_reports.iter().filter_map(|r| r.apartment_id).collect();

    let mut apartments = HashMap::new();
    for apartment_id in apartment_ids {
        apartments.insert(
            apartment_id,
            apartment_for_month(conn, apartment_id, year, month)?,
        );
    }

    let templates = fetch_templates(conn, &shift_ids)?;
    let shift_rates = shift_rates_for_month(conn, &shift_ids, year, month)?;
    let standby_rates = standby_rate_book_for_month(conn, year, month)?;
    let housing_overrides = housing_overrides_for_month(conn, year, month)?;

    let snapshot = ReferenceSnapshot {
        sabbath: sabbath_cache.clone(),
        minimum_wage,
        standby_rates,
        shift_rates,
        templates,
        housing_overrides,
    };

    let mut reports = Vec::with_capacity(raw_reports.len());
    for raw in raw_reports {
        let apartment = raw.apartment_id.and_then(|id| apartments.get(&id));
        let apartment_type = apartment.map(|a| a.apartment_type);
        let rate_apartment_type = snapshot
            .housing_override(raw.shift_type_id, apartment.and_then(|a| a.housing_cluster_id))
            .or(apartment_type);

        let class = classify_shift(
            raw.shift_type_id,
            snapshot.templates.contains_key(&raw.shift_type_id),
            apartment_type,
            rate_apartment_type,
        );
        let template_id = match class {
            ShiftClass::ImplicitTagbur => {
                tagbur_counterpart(raw.shift_type_id).unwrap_or(raw.shift_type_id)
            }
            _ => raw.shift_type_id,
        };

        let (start_min, end_min) = normalize_span(raw.start_min, raw.end_min);
        reports.push(ResolvedReport {
            id: raw.id,
            date: raw.date,
            start_min,
            end_min,
            shift_type_id: raw.shift_type_id,
            class,
            template: snapshot.templates.get(&template_id).cloned(),
            apartment_type,
            rate_apartment_type,
            is_married: status.is_married,
            flat_rate: snapshot.flat_rate(raw.shift_type_id),
            is_vacation: raw.is_vacation,
            is_sick: raw.is_sick,
            travel: raw.travel,
        });
    }

    let components = fetch_payment_components(conn, person_id, year, month)?;

    Ok(MonthInputs {
        person_id,
        year,
        month,
        reports,
        snapshot,
        components,
    })
}

/// Loads the weekly Sabbath times into a cache, keyed by the Saturday.
pub fn load_sabbath_cache(conn: &Connection) -> EngineResult<SabbathCache> {
    let mut stmt =
        conn.prepare("SELECT exit_date, entry_minute, exit_minute FROM shabbat_times")?;
    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, i64>(1)?,
            row.get::<_, i64>(2)?,
        ))
    })?;

    let mut cache = SabbathCache::new();
    for row in rows {
        let (saturday, entry_minute, exit_minute) = row?;
        if let Ok(date) = NaiveDate::parse_from_str(&saturday, "%Y-%m-%d") {
            cache.insert(
                date,
                SabbathTimes {
                    entry_minute,
                    exit_minute,
                },
            );
        }
    }
    Ok(cache)
}

/// The hourly minimum wage effective at the start of the given month.
pub fn minimum_wage_for_month(conn: &Connection, year: i32, month: u32) -> EngineResult<Decimal> {
    let month_start = first_of_month(year, month);
    let hourly: Option<i64> = conn
        .query_row(
            "SELECT hourly FROM minimum_wage_rates
             WHERE effective_date <= ?1
             ORDER BY effective_date DESC
             LIMIT 1",
            [month_start],
            |row| row.get(0),
        )
        .optional()?;

    Ok(hourly.map(agorot).unwrap_or(DEFAULT_MINIMUM_WAGE))
}

/// Whether the month is locked against write-side changes.
///
/// Consulted only by write-side callers; the read-only engine never checks
/// it.
pub fn is_month_locked(conn: &Connection, year: i32, month: u32) -> EngineResult<bool> {
    let unlocked_at: Option<Option<String>> = conn
        .query_row(
            "SELECT unlocked_at FROM month_locks WHERE year = ?1 AND month = ?2",
            rusqlite::params![year, month],
            |row| row.get(0),
        )
        .optional()?;

    Ok(matches!(unlocked_at, Some(None)))
}

// =============================================================================
// Row loading
// =============================================================================

fn fetch_reports(
    conn: &Connection,
    person_id: i64,
    year: i32,
    month: u32,
) -> EngineResult<Vec<TimeReport>> {
    let (from, until) = month_range(year, month);
    let mut stmt = conn.prepare(
        "SELECT id, apartment_id, date, start, \"end\", shift_type_id,
                is_vacation, is_sick, travel
         FROM time_reports
         WHERE person_id = ?1 AND date >= ?2 AND date < ?3
         ORDER BY date, start",
    )?;
    let rows = stmt.query_map(rusqlite::params![person_id, from, until], |row| {
        Ok((
            row.get::<_, i64>(0)?,
            row.get::<_, Option<i64>>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, i64>(3)?,
            row.get::<_, i64>(4)?,
            row.get::<_, i64>(5)?,
            row.get::<_, bool>(6)?,
            row.get::<_, bool>(7)?,
            row.get::<_, Option<i64>>(8)?,
        ))
    })?;

    let mut reports = Vec::new();
    for row in rows {
        let (id, apartment_id, date, start_min, end_min, shift_type_id, is_vacation, is_sick, travel) =
            row?;
        let Ok(date) = NaiveDate::parse_from_str(&date, "%Y-%m-%d") else {
            debug!(report_id = id, "unparseable report date, skipping row");
            continue;
        };
        reports.push(TimeReport {
            id,
            person_id,
            apartment_id,
            date,
            start_min,
            end_min,
            shift_type_id,
            is_vacation,
            is_sick,
            travel: travel.map(agorot).unwrap_or(Decimal::ZERO),
        });
    }
    Ok(reports)
}

fn fetch_payment_components(
    conn: &Connection,
    person_id: i64,
    year: i32,
    month: u32,
) -> EngineResult<Vec<PaymentComponent>> {
    let (from, until) = month_range(year, month);
    let mut stmt = conn.prepare(
        "SELECT date, quantity * rate, component_type_id
         FROM payment_components
         WHERE person_id = ?1 AND date >= ?2 AND date < ?3",
    )?;
    let rows = stmt.query_map(rusqlite::params![person_id, from, until], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, i64>(1)?,
            row.get::<_, i64>(2)?,
        ))
    })?;

    let mut components = Vec::new();
    for row in rows {
        let (date, amount, component_type_id) = row?;
        let Ok(date) = NaiveDate::parse_from_str(&date, "%Y-%m-%d") else {
            continue;
        };
        components.push(PaymentComponent {
            person_id,
            date,
            amount: agorot(amount),
            component_type_id,
        });
    }
    Ok(components)
}

fn fetch_templates(
    conn: &Connection,
    shift_ids: &HashSet<i64>,
) -> EngineResult<HashMap<i64, ShiftTemplate>> {
    let mut templates: HashMap<i64, ShiftTemplate> = HashMap::new();
    let mut stmt = conn.prepare(
        "SELECT id, segment_type, start_time, end_time, wage_percent, order_index
         FROM shift_time_segments
         WHERE shift_type_id = ?1
         ORDER BY order_index, id",
    )?;

    for &shift_type_id in shift_ids {
        let rows = stmt.query_map([shift_type_id], |row| {
            Ok(TemplateSegment {
                id: Some(row.get::<_, i64>(0)?),
                segment_type: SegmentType::parse(&row.get::<_, String>(1)?)
                    .unwrap_or(SegmentType::Work),
                start_min: row.get(2)?,
                end_min: row.get(3)?,
                wage_percent: row.get::<_, Option<u16>>(4)?.unwrap_or(0),
                order_index: row.get(5)?,
            })
        })?;

        let segments: Vec<TemplateSegment> = rows.collect::<Result<_, _>>()?;
        if !segments.is_empty() {
            templates.insert(
                shift_type_id,
                ShiftTemplate {
                    shift_type_id,
                    segments,
                },
            );
        }
    }
    Ok(templates)
}

// =============================================================================
// History resolution
// =============================================================================

fn person_status_for_month(
    conn: &Connection,
    person_id: i64,
    year: i32,
    month: u32,
) -> EngineResult<PersonStatus> {
    let live: PersonStatus = conn
        .query_row(
            "SELECT is_married, employer_id, type FROM people WHERE id = ?1",
            [person_id],
            |row| {
                Ok(PersonStatus {
                    is_married: row.get(0)?,
                    employer_id: row.get(1)?,
                    employee_type: row.get(2)?,
                })
            },
        )
        .optional()?
        .ok_or(EngineError::PersonNotFound { person_id })?;

    let mut stmt = conn.prepare(
        "SELECT year, month, is_married, employer_id, employee_type
         FROM person_status_history
         WHERE person_id = ?1",
    )?;
    let rows = stmt.query_map([person_id], |row| {
        Ok(HistoryEntry {
            year: row.get(0)?,
            month: row.get(1)?,
            value: PersonStatus {
                is_married: row.get(2)?,
                employer_id: row.get(3)?,
                employee_type: row.get(4)?,
            },
        })
    })?;
    let entries: Vec<_> = rows.collect::<Result<_, _>>()?;
    let timeline = timeline_or_missing(entries, "person_status_history", person_id)?;

    if timeline.resolve(year, month).is_some() {
        debug!(person_id, year, month, "using historical person status");
    }
    Ok(timeline.resolve_or(year, month, &live).clone())
}

fn apartment_for_month(
    conn: &Connection,
    apartment_id: i64,
    year: i32,
    month: u32,
) -> EngineResult<Apartment> {
    let (live_type_id, housing_cluster_id): (i64, Option<i64>) = conn
        .query_row(
            "SELECT apartment_type_id, housing_cluster_id FROM apartments WHERE id = ?1",
            [apartment_id],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()?
        .ok_or(EngineError::ReferenceDataMissing {
            entity: "apartment",
            id: apartment_id,
        })?;

    let mut stmt = conn.prepare(
        "SELECT year, month, apartment_type_id
         FROM apartment_status_history
         WHERE apartment_id = ?1",
    )?;
    let rows = stmt.query_map([apartment_id], |row| {
        Ok(HistoryEntry {
            year: row.get(0)?,
            month: row.get(1)?,
            value: row.get::<_, i64>(2)?,
        })
    })?;
    let entries: Vec<_> = rows.collect::<Result<_, _>>()?;
    let timeline = timeline_or_missing(entries, "apartment_status_history", apartment_id)?;

    let type_id = *timeline.resolve_or(year, month, &live_type_id);
    let apartment_type =
        ApartmentType::from_id(type_id).ok_or(EngineError::ReferenceDataMissing {
            entity: "apartment_type",
            id: type_id,
        })?;
    Ok(Apartment {
        id: apartment_id,
        apartment_type,
        housing_cluster_id,
    })
}

fn shift_rates_for_month(
    conn: &Connection,
    shift_ids: &HashSet<i64>,
    year: i32,
    month: u32,
) -> EngineResult<HashMap<i64, ShiftRate>> {
    let mut live_stmt =
        conn.prepare("SELECT rate, is_minimum_wage FROM shift_types WHERE id = ?1")?;
    let mut history_stmt = conn.prepare(
        "SELECT year, month, rate, is_minimum_wage
         FROM shift_types_history
         WHERE shift_type_id = ?1",
    )?;

    let mut rates = HashMap::new();
    for &shift_type_id in shift_ids {
        let live: ShiftRate = live_stmt
            .query_row([shift_type_id], |row| {
                Ok(ShiftRate {
                    rate: row.get::<_, Option<i64>>(0)?.map(agorot),
                    is_minimum_wage: row.get(1)?,
                })
            })
            .optional()?
            .ok_or(EngineError::ReferenceDataMissing {
                entity: "shift_type",
                id: shift_type_id,
            })?;

        let rows = history_stmt.query_map([shift_type_id], |row| {
            Ok(HistoryEntry {
                year: row.get(0)?,
                month: row.get(1)?,
                value: ShiftRate {
                    rate: row.get::<_, Option<i64>>(2)?.map(agorot),
                    is_minimum_wage: row.get(3)?,
                },
            })
        })?;
        let entries: Vec<_> = rows.collect::<Result<_, _>>()?;
        let timeline = timeline_or_missing(entries, "shift_types_history", shift_type_id)?;

        rates.insert(
            shift_type_id,
            timeline.resolve_or(year, month, &live).clone(),
        );
    }
    Ok(rates)
}

fn standby_rate_book_for_month(
    conn: &Connection,
    year: i32,
    month: u32,
) -> EngineResult<StandbyRateBook> {
    type Key = (i64, Option<i64>, String);

    let mut live: HashMap<Key, i64> = HashMap::new();
    let mut stmt =
        conn.prepare("SELECT segment_id, apartment_type_id, marital_status, amount FROM standby_rates")?;
    let rows = stmt.query_map([], |row| {
        Ok((
            (
                row.get::<_, i64>(0)?,
                row.get::<_, Option<i64>>(1)?,
                row.get::<_, String>(2)?,
            ),
            row.get::<_, i64>(3)?,
        ))
    })?;
    for row in rows {
        let (key, amount) = row?;
        live.insert(key, amount);
    }

    let mut history: HashMap<Key, Vec<HistoryEntry<i64>>> = HashMap::new();
    let mut stmt = conn.prepare(
        "SELECT segment_id, apartment_type_id, marital_status, amount, year, month
         FROM standby_rates_history",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok((
            (
                row.get::<_, i64>(0)?,
                row.get::<_, Option<i64>>(1)?,
                row.get::<_, String>(2)?,
            ),
            HistoryEntry {
                year: row.get(4)?,
                month: row.get(5)?,
                value: row.get::<_, i64>(3)?,
            },
        ))
    })?;
    for row in rows {
        let (key, entry) = row?;
        history.entry(key).or_default().push(entry);
    }

    let mut book = StandbyRateBook::new();
    let keys: HashSet<Key> = live.keys().chain(history.keys()).cloned().collect();
    for key in keys {
        let timeline = timeline_or_missing(
            history.remove(&key).unwrap_or_default(),
            "standby_rates_history",
            key.0,
        )?;
        let amount = timeline
            .resolve(year, month)
            .copied()
            .or_else(|| live.get(&key).copied());
        let Some(amount) = amount else { continue };

        let (segment_id, apartment_type_id, marital_status) = &key;
        let apartment_type = apartment_type_id.and_then(|id| ApartmentType::from_id(id));
        let marital = match marital_status.as_str() {
            "married" => crate::models::MaritalStatus::Married,
            _ => crate::models::MaritalStatus::Single,
        };
        book.insert(*segment_id, apartment_type, marital, agorot(amount));
    }
    Ok(book)
}

fn housing_overrides_for_month(
    conn: &Connection,
    year: i32,
    month: u32,
) -> EngineResult<HashMap<(i64, i64), ApartmentType>> {
    type Key = (i64, i64);

    let mut live: HashMap<Key, i64> = HashMap::new();
    let mut stmt = conn.prepare(
        "SELECT shift_type_id, housing_cluster_id, apartment_type_id FROM shift_housing_rates",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok((
            (row.get::<_, i64>(0)?, row.get::<_, i64>(1)?),
            row.get::<_, i64>(2)?,
        ))
    })?;
    for row in rows {
        let (key, type_id) = row?;
        live.insert(key, type_id);
    }

    let mut history: HashMap<Key, Vec<HistoryEntry<i64>>> = HashMap::new();
    let mut stmt = conn.prepare(
        "SELECT shift_type_id, housing_cluster_id, apartment_type_id, year, month
         FROM shift_housing_rates_history",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok((
            (row.get::<_, i64>(0)?, row.get::<_, i64>(1)?),
            HistoryEntry {
                year: row.get(3)?,
                month: row.get(4)?,
                value: row.get::<_, i64>(2)?,
            },
        ))
    })?;
    for row in rows {
        let (key, entry) = row?;
        history.entry(key).or_default().push(entry);
    }

    let mut overrides = HashMap::new();
    let keys: HashSet<Key> = live.keys().chain(history.keys()).cloned().collect();
    for key in keys {
        let timeline = timeline_or_missing(
            history.remove(&key).unwrap_or_default(),
            "shift_housing_rates_history",
            key.0,
        )?;
        let type_id = timeline
            .resolve(year, month)
            .copied()
            .or_else(|| live.get(&key).copied());
        if let Some(apartment_type) = type_id.and_then(ApartmentType::from_id) {
            overrides.insert(key, apartment_type);
        }
    }
    Ok(overrides)
}

// =============================================================================
// Helpers
// =============================================================================

fn classify_shift(
    shift_type_id: i64,
    has_template: bool,
    apartment_type: Option<ApartmentType>,
    rate_apartment_type: Option<ApartmentType>,
) -> ShiftClass {
    match shift_type_id {
        NIGHT_SHIFT => ShiftClass::NightDynamic,
        HOSPITAL_ESCORT_SHIFT => ShiftClass::HospitalEscort,
        MEDICAL_ESCORT_SHIFT => ShiftClass::MedicalEscort,
        FRIDAY_SHIFT | SHABBAT_SHIFT
            if apartment_type == Some(ApartmentType::Therapeutic)
                && rate_apartment_type == Some(ApartmentType::Regular) =>
        {
            ShiftClass::ImplicitTagbur
        }
        _ if has_template => ShiftClass::FixedTemplate,
        _ => ShiftClass::Generic,
    }
}

fn timeline_or_missing<T>(
    entries: Vec<HistoryEntry<T>>,
    entity: &'static str,
    id: i64,
) -> EngineResult<HistoryTimeline<T>> {
    HistoryTimeline::from_entries(entries)
        .map_err(|_| EngineError::ReferenceDataMissing { entity, id })
}

fn agorot(amount: i64) -> Decimal {
    Decimal::new(amount, 2)
}

fn first_of_month(year: i32, month: u32) -> String {
    format!("{year:04}-{month:02}-01")
}

fn month_range(year: i32, month: u32) -> (String, String) {
    let next = if month == 12 {
        first_of_month(year + 1, 1)
    } else {
        first_of_month(year, month + 1)
    };
    (first_of_month(year, month), next)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE people (
                 id INTEGER PRIMARY KEY, name TEXT, is_married INTEGER NOT NULL,
                 employer_id INTEGER, type TEXT, is_active INTEGER NOT NULL DEFAULT 1
             );
             CREATE TABLE person_status_history (
                 person_id INTEGER NOT NULL, year INTEGER NOT NULL, month INTEGER NOT NULL,
                 is_married INTEGER NOT NULL, employer_id INTEGER, employee_type TEXT,
                 created_at TEXT, created_by INTEGER,
                 UNIQUE(person_id, year, month)
             );
             CREATE TABLE minimum_wage_rates (effective_date TEXT NOT NULL, hourly INTEGER NOT NULL);
             CREATE TABLE month_locks (
                 year INTEGER NOT NULL, month INTEGER NOT NULL,
                 locked_at TEXT, unlocked_at TEXT
             );
             CREATE TABLE shabbat_times (
                 entry_date TEXT NOT NULL, entry_minute INTEGER NOT NULL,
                 exit_date TEXT NOT NULL, exit_minute INTEGER NOT NULL
             );",
        )
        .unwrap();
        conn
    }

    #[test]
    fn test_person_status_prefers_history_before_change() {
        let conn = open();
        conn.execute(
            "INSERT INTO people (id, is_married) VALUES (1, 1)",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO person_status_history (person_id, year, month, is_married)
             VALUES (1, 2025, 3, 0)",
            [],
        )
        .unwrap();

        // February still sees the pre-change value.
        let status = person_status_for_month(&conn, 1, 2025, 2).unwrap();
        assert!(!status.is_married);
        // March onward sees the live value.
        let status = person_status_for_month(&conn, 1, 2025, 3).unwrap();
        assert!(status.is_married);
    }

    #[test]
    fn test_person_not_found() {
        let conn = open();
        let err = person_status_for_month(&conn, 9, 2025, 1).unwrap_err();
        assert!(matches!(err, EngineError::PersonNotFound { person_id: 9 }));
    }

    #[test]
    fn test_minimum_wage_picks_latest_effective_row() {
        let conn = open();
        conn.execute_batch(
            "INSERT INTO minimum_wage_rates VALUES ('2024-04-01', 3240);
             INSERT INTO minimum_wage_rates VALUES ('2025-01-01', 3440);",
        )
        .unwrap();

        assert_eq!(
            minimum_wage_for_month(&conn, 2024, 12).unwrap(),
            Decimal::new(3240, 2)
        );
        assert_eq!(
            minimum_wage_for_month(&conn, 2025, 2).unwrap(),
            Decimal::new(3440, 2)
        );
    }

    #[test]
    fn test_minimum_wage_default_when_empty() {
        let conn = open();
        assert_eq!(
            minimum_wage_for_month(&conn, 2025, 1).unwrap(),
            DEFAULT_MINIMUM_WAGE
        );
    }

    #[test]
    fn test_month_lock_states() {
        let conn = open();
        assert!(!is_month_locked(&conn, 2025, 3).unwrap());

        conn.execute(
            "INSERT INTO month_locks (year, month, locked_at) VALUES (2025, 3, '2025-04-01')",
            [],
        )
        .unwrap();
        assert!(is_month_locked(&conn, 2025, 3).unwrap());

        conn.execute(
            "UPDATE month_locks SET unlocked_at = '2025-04-02' WHERE year = 2025 AND month = 3",
            [],
        )
        .unwrap();
        assert!(!is_month_locked(&conn, 2025, 3).unwrap());
    }

    #[test]
    fn test_sabbath_cache_keyed_by_saturday() {
        let conn = open();
        conn.execute(
            "INSERT INTO shabbat_times VALUES ('2025-03-07', 1065, '2025-03-08', 1125)",
            [],
        )
        .unwrap();

        let cache = load_sabbath_cache(&conn).unwrap();
        let saturday = NaiveDate::from_ymd_opt(2025, 3, 8).unwrap();
        assert_eq!(cache.for_saturday(saturday).entry_minute, 1065);
        assert_eq!(cache.for_saturday(saturday).exit_minute, 1125);
    }

    #[test]
    fn test_classify_shift_dispatch() {
        assert_eq!(
            classify_shift(NIGHT_SHIFT, true, None, None),
            ShiftClass::NightDynamic
        );
        assert_eq!(
            classify_shift(HOSPITAL_ESCORT_SHIFT, false, None, None),
            ShiftClass::HospitalEscort
        );
        assert_eq!(
            classify_shift(MEDICAL_ESCORT_SHIFT, false, None, None),
            ShiftClass::MedicalEscort
        );
        assert_eq!(
            classify_shift(
                FRIDAY_SHIFT,
                true,
                Some(ApartmentType::Therapeutic),
                Some(ApartmentType::Regular)
            ),
            ShiftClass::ImplicitTagbur
        );
        assert_eq!(
            classify_shift(
                FRIDAY_SHIFT,
                true,
                Some(ApartmentType::Therapeutic),
                Some(ApartmentType::Therapeutic)
            ),
            ShiftClass::FixedTemplate
        );
        assert_eq!(classify_shift(1, false, None, None), ShiftClass::Generic);
    }

    #[test]
    fn test_month_range_year_rollover() {
        assert_eq!(
            month_range(2025, 12),
            ("2025-12-01".to_string(), "2026-01-01".to_string())
        );
        assert_eq!(
            month_range(2025, 2),
            ("2025-02-01".to_string(), "2025-03-01".to_string())
        );
    }
}
