//! End-to-end scenarios for the wage engine.
//!
//! Every test runs the full pipeline — store loading, history resolution,
//! segment decomposition, chains, Sabbath splitting, aggregation — against
//! an in-memory database seeded with realistic reference data:
//! - simple weekday and overtime chains
//! - night-shift dynamic decomposition with kept standby
//! - Sabbath splitting across tiers
//! - standby cancellation with capped deduction
//! - valid-until history resolution
//! - implicit tagbur reinterpretation and escort pricing
//! - structural invariants (idempotence, monotonicity, minute conservation)

use rusqlite::Connection;
use rust_decimal::Decimal;
use std::str::FromStr;

use wage_engine::models::DaySegmentKind;
use wage_engine::reference::SabbathCache;
use wage_engine::store::{compute_monthly_totals, get_daily_segments, load_sabbath_cache};

// =============================================================================
// Test fixtures
// =============================================================================

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn minimum_wage() -> Decimal {
    dec("34.40")
}

/// Creates the consumed schema and the baseline reference data shared by
/// all scenarios. March 2025 has Fridays on the 7th, 14th, 21st, 28th.
fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        r#"
        CREATE TABLE people (
            id INTEGER PRIMARY KEY,
            name TEXT,
            is_married INTEGER NOT NULL DEFAULT 0,
            employer_id INTEGER,
            type TEXT,
            is_active INTEGER NOT NULL DEFAULT 1
        );
        CREATE TABLE person_status_history (
            person_id INTEGER NOT NULL,
            year INTEGER NOT NULL,
            month INTEGER NOT NULL,
            is_married INTEGER NOT NULL,
            employer_id INTEGER,
            employee_type TEXT,
            created_at TEXT,
            created_by INTEGER,
            UNIQUE(person_id, year, month)
        );
        CREATE TABLE apartment_types (id INTEGER PRIMARY KEY);
        CREATE TABLE apartments (
            id INTEGER PRIMARY KEY,
            apartment_type_id INTEGER NOT NULL,
            housing_cluster_id INTEGER
        );
        CREATE TABLE apartment_status_history (
            apartment_id INTEGER NOT NULL,
            year INTEGER NOT NULL,
            month INTEGER NOT NULL,
            apartment_type_id INTEGER NOT NULL,
            created_at TEXT,
            created_by INTEGER,
            UNIQUE(apartment_id, year, month)
        );
        CREATE TABLE shift_types (
            id INTEGER PRIMARY KEY,
            rate INTEGER,
            is_minimum_wage INTEGER NOT NULL DEFAULT 1
        );
        CREATE TABLE shift_types_history (
            shift_type_id INTEGER NOT NULL,
            year INTEGER NOT NULL,
            month INTEGER NOT NULL,
            rate INTEGER,
            is_minimum_wage INTEGER NOT NULL,
            created_at TEXT,
            created_by INTEGER,
            UNIQUE(shift_type_id, year, month)
        );
        CREATE TABLE shift_time_segments (
            id INTEGER PRIMARY KEY,
            shift_type_id INTEGER NOT NULL,
            segment_type TEXT NOT NULL,
            start_time INTEGER NOT NULL,
            end_time INTEGER NOT NULL,
            wage_percent INTEGER NOT NULL DEFAULT 0,
            order_index INTEGER NOT NULL
        );
        CREATE TABLE standby_rates (
            id INTEGER PRIMARY KEY,
            segment_id INTEGER NOT NULL,
            apartment_type_id INTEGER,
            marital_status TEXT NOT NULL,
            amount INTEGER NOT NULL,
            priority INTEGER NOT NULL
        );
        CREATE TABLE standby_rates_history (
            segment_id INTEGER NOT NULL,
            apartment_type_id INTEGER,
            marital_status TEXT NOT NULL,
            amount INTEGER NOT NULL,
            year INTEGER NOT NULL,
            month INTEGER NOT NULL,
            created_at TEXT,
            created_by INTEGER
        );
        CREATE TABLE shift_housing_rates (
            shift_type_id INTEGER NOT NULL,
            housing_cluster_id INTEGER NOT NULL,
            apartment_type_id INTEGER NOT NULL
        );
        CREATE TABLE shift_housing_rates_history (
            shift_type_id INTEGER NOT NULL,
            housing_cluster_id INTEGER NOT NULL,
            apartment_type_id INTEGER NOT NULL,
            year INTEGER NOT NULL,
            month INTEGER NOT NULL
        );
        CREATE TABLE time_reports (
            id INTEGER PRIMARY KEY,
            person_id INTEGER NOT NULL,
            apartment_id INTEGER,
            date TEXT NOT NULL,
            start INTEGER NOT NULL,
            "end" INTEGER NOT NULL,
            shift_type_id INTEGER NOT NULL,
            is_vacation INTEGER NOT NULL DEFAULT 0,
            is_sick INTEGER NOT NULL DEFAULT 0,
            travel INTEGER
        );
        CREATE TABLE payment_components (
            person_id INTEGER NOT NULL,
            date TEXT NOT NULL,
            quantity INTEGER NOT NULL,
            rate INTEGER NOT NULL,
            component_type_id INTEGER NOT NULL
        );
        CREATE TABLE shabbat_times (
            entry_date TEXT NOT NULL,
            entry_minute INTEGER NOT NULL,
            exit_date TEXT NOT NULL,
            exit_minute INTEGER NOT NULL
        );
        CREATE TABLE minimum_wage_rates (
            effective_date TEXT NOT NULL,
            hourly INTEGER NOT NULL
        );
        CREATE TABLE month_locks (
            year INTEGER NOT NULL,
            month INTEGER NOT NULL,
            locked_at TEXT,
            unlocked_at TEXT
        );

        INSERT INTO people (id, name, is_married) VALUES (1, 'guide-single', 0);
        INSERT INTO people (id, name, is_married) VALUES (2, 'guide-married', 1);

        INSERT INTO apartment_types (id) VALUES (1);
        INSERT INTO apartment_types (id) VALUES (2);
        INSERT INTO apartments (id, apartment_type_id, housing_cluster_id) VALUES (1, 1, NULL);
        INSERT INTO apartments (id, apartment_type_id, housing_cluster_id) VALUES (2, 2, 3);

        -- Generic weekday shift, Friday/Sabbath shifts, night, tagbur,
        -- escorts, and a daytime-standby shift.
        INSERT INTO shift_types (id, rate, is_minimum_wage) VALUES (1, NULL, 1);
        INSERT INTO shift_types (id, rate, is_minimum_wage) VALUES (105, NULL, 1);
        INSERT INTO shift_types (id, rate, is_minimum_wage) VALUES (106, NULL, 1);
        INSERT INTO shift_types (id, rate, is_minimum_wage) VALUES (107, NULL, 1);
        INSERT INTO shift_types (id, rate, is_minimum_wage) VALUES (108, NULL, 1);
        INSERT INTO shift_types (id, rate, is_minimum_wage) VALUES (109, NULL, 1);
        INSERT INTO shift_types (id, rate, is_minimum_wage) VALUES (120, 5500, 0);
        INSERT INTO shift_types (id, rate, is_minimum_wage) VALUES (148, 5500, 0);
        INSERT INTO shift_types (id, rate, is_minimum_wage) VALUES (201, NULL, 1);

        -- Friday shift: afternoon work, overnight standby.
        INSERT INTO shift_time_segments VALUES (11, 105, 'work', 840, 1440, 0, 0);
        INSERT INTO shift_time_segments VALUES (12, 105, 'standby', 0, 480, 0, 1);
        -- Sabbath shift: morning work, afternoon standby.
        INSERT INTO shift_time_segments VALUES (13, 106, 'work', 480, 840, 0, 0);
        INSERT INTO shift_time_segments VALUES (14, 106, 'standby', 840, 1200, 0, 1);
        -- Night shift template (replaced dynamically, keyed for rates).
        INSERT INTO shift_time_segments VALUES (51, 107, 'work', 1320, 1440, 0, 0);
        INSERT INTO shift_time_segments VALUES (52, 107, 'standby', 0, 390, 0, 1);
        INSERT INTO shift_time_segments VALUES (53, 107, 'work', 390, 480, 0, 2);
        -- Tagbur Friday: fixed 100% then 150%.
        INSERT INTO shift_time_segments VALUES (31, 108, 'work', 840, 1020, 100, 0);
        INSERT INTO shift_time_segments VALUES (32, 108, 'work', 1020, 1260, 150, 1);
        -- Tagbur Sabbath: fixed 150%.
        INSERT INTO shift_time_segments VALUES (33, 109, 'work', 480, 960, 150, 0);
        -- Daytime standby shift.
        INSERT INTO shift_time_segments VALUES (71, 201, 'standby', 540, 600, 0, 0);

        INSERT INTO standby_rates VALUES (1, 52, NULL, 'single', 7000, 0);
        INSERT INTO standby_rates VALUES (2, 52, NULL, 'married', 8000, 0);
        INSERT INTO standby_rates VALUES (3, 12, NULL, 'single', 7000, 0);
        INSERT INTO standby_rates VALUES (4, 71, NULL, 'single', 8000, 0);

        INSERT INTO shabbat_times VALUES ('2025-03-07', 1110, '2025-03-08', 1320);

        INSERT INTO minimum_wage_rates VALUES ('2025-01-01', 3440);
        "#,
    )
    .unwrap();
    conn
}

fn insert_report(
    conn: &Connection,
    id: i64,
    person_id: i64,
    apartment_id: i64,
    date: &str,
    start: i64,
    end: i64,
    shift_type_id: i64,
) {
    conn.execute(
        "INSERT INTO time_reports (id, person_id, apartment_id, date, start, \"end\", shift_type_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        rusqlite::params![id, person_id, apartment_id, date, start, end, shift_type_id],
    )
    .unwrap();
}

fn totals_for(conn: &Connection, person_id: i64, year: i32, month: u32) -> wage_engine::models::MonthlyTotals {
    let cache = load_sabbath_cache(conn).unwrap();
    compute_monthly_totals(conn, person_id, year, month, &cache, minimum_wage())
        .unwrap()
        .totals
}

// =============================================================================
// S1: simple weekday
// =============================================================================

#[test]
fn test_s1_simple_weekday() {
    let conn = setup();
    insert_report(&conn, 1, 1, 1, "2025-03-04", 480, 960, 1);

    let totals = totals_for(&conn, 1, 2025, 3);
    assert_eq!(totals.calc100, 480);
    assert_eq!(totals.calc125, 0);
    assert_eq!(totals.calc150, 0);
    assert_eq!(totals.calc175, 0);
    assert_eq!(totals.calc200, 0);
    assert_eq!(totals.standby_payment, Decimal::ZERO);
    assert_eq!(totals.work_days, 1);
    // 8 hours at the minimum wage.
    assert_eq!(totals.payment, dec("275.20"));
}

// =============================================================================
// S2: overtime plus a break under the threshold
// =============================================================================

#[test]
fn test_s2_overtime_with_short_break() {
    let conn = setup();
    // 08:00-16:30, a 30-minute break, 17:00-18:00: one 570-minute chain.
    insert_report(&conn, 1, 1, 1, "2025-03-04", 480, 990, 1);
    insert_report(&conn, 2, 1, 1, "2025-03-04", 1020, 1080, 1);

    let totals = totals_for(&conn, 1, 2025, 3);
    assert_eq!(totals.calc100, 480);
    assert_eq!(totals.calc125, 90);
    assert_eq!(totals.total_work_minutes, 570);
}

// =============================================================================
// S3: night shift dynamic segments
// =============================================================================

#[test]
fn test_s3_night_shift() {
    let conn = setup();
    // Sunday 22:00 -> Monday 08:00.
    insert_report(&conn, 1, 1, 1, "2025-03-02", 1320, 480, 107);

    let totals = totals_for(&conn, 1, 2025, 3);
    // Two work pieces of 120 and 90 minutes, both restarting at 100%.
    assert_eq!(totals.calc100, 210);
    assert_eq!(totals.calc125, 0);
    assert_eq!(totals.total_work_minutes, 210);
    // The 00:00-06:30 standby is kept and paid at the night-standby rate.
    assert_eq!(totals.standby_minutes, 390);
    assert_eq!(totals.standby_payment, dec("70"));
}

#[test]
fn test_s3_night_shift_day_view() {
    let conn = setup();
    insert_report(&conn, 1, 1, 1, "2025-03-02", 1320, 480, 107);

    let cache = load_sabbath_cache(&conn).unwrap();
    let views = get_daily_segments(&conn, 1, 2025, 3, &cache, minimum_wage()).unwrap();
    assert_eq!(views.len(), 1);

    let kinds: Vec<DaySegmentKind> = views[0].segments.iter().map(|s| s.kind).collect();
    assert_eq!(
        kinds,
        vec![
            DaySegmentKind::Work,
            DaySegmentKind::Standby,
            DaySegmentKind::Work
        ]
    );
    assert_eq!(views[0].segments[1].start_time, "00:00");
    assert_eq!(views[0].segments[1].end_time, "06:30");
    assert_eq!(views[0].standby_payment, dec("70"));
}

// =============================================================================
// S4: Sabbath split
// =============================================================================

#[test]
fn test_s4_sabbath_split() {
    let conn = setup();
    // Friday 14:00 -> Saturday 02:00; entry 18:30 that week.
    insert_report(&conn, 1, 1, 1, "2025-03-07", 840, 120, 1);

    let totals = totals_for(&conn, 1, 2025, 3);
    assert_eq!(totals.calc100, 270); // 14:00-18:30
    assert_eq!(totals.calc150_shabbat, 210); // 18:30-22:00, still under 480
    assert_eq!(totals.calc175, 120); // chain minutes 480-600
    assert_eq!(totals.calc200, 120); // chain minutes 600-720
    assert_eq!(totals.calc150_overtime, 0);
    assert_eq!(
        totals.calc100 + totals.calc150 + totals.calc175 + totals.calc200,
        720
    );
    // Statutory pension split of the 210 Sabbath minutes.
    assert_eq!(totals.calc150_shabbat_100, 140);
    assert_eq!(totals.calc150_shabbat_50, 70);
}

// =============================================================================
// S5: standby cancelled by overlap
// =============================================================================

#[test]
fn test_s5_standby_cancelled() {
    let conn = setup();
    // Daytime standby 09:00-10:00 fully overlapped by work.
    insert_report(&conn, 1, 1, 1, "2025-03-04", 540, 600, 201);
    insert_report(&conn, 2, 1, 1, "2025-03-04", 540, 600, 1);

    let totals = totals_for(&conn, 1, 2025, 3);
    // The standby (rate 80) is cancelled: 70 deducted, 10 residual paid.
    assert_eq!(totals.standby_minutes, 0);
    assert_eq!(totals.cancelled_standby_deduction, dec("70"));
    assert_eq!(totals.standby_payment, dec("10"));
    // The overlapping work hour is still paid as work.
    assert_eq!(totals.calc100, 60);
}

#[test]
fn test_s5_partial_overlap_keeps_standby() {
    let conn = setup();
    // 30 of 60 standby minutes overlapped: kept, work trimmed.
    insert_report(&conn, 1, 1, 1, "2025-03-04", 540, 600, 201);
    insert_report(&conn, 2, 1, 1, "2025-03-04", 570, 660, 1);

    let totals = totals_for(&conn, 1, 2025, 3);
    assert_eq!(totals.standby_minutes, 60);
    assert_eq!(totals.standby_payment, dec("80"));
    assert_eq!(totals.cancelled_standby_deduction, Decimal::ZERO);
    // Work minutes 09:30-10:00 belong to the kept standby.
    assert_eq!(totals.calc100, 60);
}

// =============================================================================
// S6: valid-until history
// =============================================================================

#[test]
fn test_s6_history_valid_until() {
    let conn = setup();
    // Person 2 is married today; a history row records the single status
    // that applied through February 2025.
    conn.execute(
        "INSERT INTO person_status_history (person_id, year, month, is_married)
         VALUES (2, 2025, 3, 0)",
        [],
    )
    .unwrap();
    // One night shift in February, one in March.
    insert_report(&conn, 1, 2, 1, "2025-02-04", 1320, 480, 107);
    insert_report(&conn, 2, 2, 1, "2025-03-04", 1320, 480, 107);

    // February resolves to the historical single status: rate 70.
    let february = totals_for(&conn, 2, 2025, 2);
    assert_eq!(february.standby_payment, dec("70"));

    // March onward uses the live married status: rate 80.
    let march = totals_for(&conn, 2, 2025, 3);
    assert_eq!(march.standby_payment, dec("80"));
}

#[test]
fn test_apartment_type_history() {
    let conn = setup();
    // Apartment 1 was therapeutic through January 2025.
    conn.execute(
        "INSERT INTO apartment_status_history (apartment_id, year, month, apartment_type_id)
         VALUES (1, 2025, 2, 2)",
        [],
    )
    .unwrap();
    // A therapeutic-specific rate beats the generic one.
    conn.execute(
        "INSERT INTO standby_rates VALUES (10, 52, 2, 'single', 9500, 10)",
        [],
    )
    .unwrap();
    insert_report(&conn, 1, 1, 1, "2025-01-05", 1320, 480, 107);

    let totals = totals_for(&conn, 1, 2025, 1);
    assert_eq!(totals.standby_payment, dec("95"));
}

// =============================================================================
// Implicit tagbur and escort pricing
// =============================================================================

#[test]
fn test_implicit_tagbur_reinterprets_friday_shift() {
    let conn = setup();
    // Apartment 2 is therapeutic but its housing cluster is priced as a
    // regular apartment for Friday shifts.
    conn.execute("INSERT INTO shift_housing_rates VALUES (105, 3, 1)", [])
        .unwrap();
    // Friday 14:00-21:00 with kind 105 becomes the 108 tagbur template.
    insert_report(&conn, 1, 1, 2, "2025-03-07", 840, 1260, 105);

    let totals = totals_for(&conn, 1, 2025, 3);
    // Fixed 100% segment: 14:00-17:00. Fixed 150%: 17:00-21:00, split at
    // the 18:30 Sabbath entry.
    assert_eq!(totals.calc100, 180);
    assert_eq!(totals.calc150_overtime, 90);
    assert_eq!(totals.calc150_shabbat, 150);
    // No standby: the tagbur template is pure work.
    assert_eq!(totals.standby_payment, Decimal::ZERO);
}

#[test]
fn test_friday_shift_without_override_uses_template() {
    let conn = setup();
    // Same report, but no housing override: the 105 template applies and
    // its overnight standby is kept.
    insert_report(&conn, 1, 1, 2, "2025-03-07", 840, 480, 105);

    let totals = totals_for(&conn, 1, 2025, 3);
    assert_eq!(totals.standby_minutes, 480);
    assert!(totals.calc150_shabbat > 0);
}

#[test]
fn test_hospital_escort_day_view_pricing() {
    let conn = setup();
    // Tuesday escort 10:00-12:00 at a 55-shekel flat rate.
    insert_report(&conn, 1, 1, 1, "2025-03-04", 600, 720, 120);

    let cache = load_sabbath_cache(&conn).unwrap();
    let views = get_daily_segments(&conn, 1, 2025, 3, &cache, minimum_wage()).unwrap();
    let seg = &views[0].segments[0];
    assert_eq!(seg.kind, DaySegmentKind::Work);
    assert_eq!(seg.hourly_rate, Some(dec("55")));
    assert_eq!(seg.amount, Some(dec("110")));
}

#[test]
fn test_medical_escort_sabbath_minimum_wage() {
    let conn = setup();
    // Saturday 10:00-12:00, inside Sabbath: minimum wage applies.
    insert_report(&conn, 1, 1, 1, "2025-03-08", 600, 720, 148);

    let cache = load_sabbath_cache(&conn).unwrap();
    let views = get_daily_segments(&conn, 1, 2025, 3, &cache, minimum_wage()).unwrap();
    let seg = &views[0].segments[0];
    assert!(seg.is_sabbath);
    assert_eq!(seg.hourly_rate, Some(dec("34.40")));
}

#[test]
fn test_medical_escort_minimum_billable_hour() {
    let conn = setup();
    // A 40-minute escort is topped up to a billable hour.
    insert_report(&conn, 1, 1, 1, "2025-03-04", 600, 640, 148);

    let totals = totals_for(&conn, 1, 2025, 3);
    assert_eq!(totals.calc100, 60);
}

// =============================================================================
// Vacation and sickness
// =============================================================================

#[test]
fn test_vacation_report() {
    let conn = setup();
    conn.execute(
        "INSERT INTO time_reports (id, person_id, apartment_id, date, start, \"end\",
                                   shift_type_id, is_vacation)
         VALUES (1, 1, 1, '2025-03-04', 480, 960, 1, 1)",
        [],
    )
    .unwrap();

    let totals = totals_for(&conn, 1, 2025, 3);
    assert_eq!(totals.vacation_minutes, 480);
    assert_eq!(totals.vacation_days, 1);
    assert_eq!(totals.vacation_payment, dec("275.20"));
    assert_eq!(totals.total_work_minutes, 0);
}

#[test]
fn test_sick_sequence_graduated_payment() {
    let conn = setup();
    for (id, day) in [(1, 10), (2, 11), (3, 12), (4, 13)] {
        conn.execute(
            "INSERT INTO time_reports (id, person_id, apartment_id, date, start, \"end\",
                                       shift_type_id, is_sick)
             VALUES (?1, 1, 1, ?2, 480, 960, 1, 1)",
            rusqlite::params![id, format!("2025-03-{day:02}")],
        )
        .unwrap();
    }

    let totals = totals_for(&conn, 1, 2025, 3);
    assert_eq!(totals.sick_minutes, 4 * 480);
    // Day 1: 0%. Days 2-3: half of 275.20 each. Day 4: full.
    assert_eq!(totals.sick_payment, dec("550.40"));
}

// =============================================================================
// Travel and extras
// =============================================================================

#[test]
fn test_travel_and_extras_components() {
    let conn = setup();
    conn.execute(
        "INSERT INTO time_reports (id, person_id, apartment_id, date, start, \"end\",
                                   shift_type_id, travel)
         VALUES (1, 1, 1, '2025-03-04', 480, 960, 1, 2050)",
        [],
    )
    .unwrap();
    conn.execute_batch(
        "INSERT INTO payment_components VALUES (1, '2025-03-15', 2, 5000, 2);
         INSERT INTO payment_components VALUES (1, '2025-03-15', 1, 25000, 5);",
    )
    .unwrap();

    let totals = totals_for(&conn, 1, 2025, 3);
    assert_eq!(totals.travel, dec("120.50"));
    assert_eq!(totals.extras, dec("250"));
    assert_eq!(totals.total_payment, totals.payment + dec("370.50"));
}

// =============================================================================
// Errors and warnings
// =============================================================================

#[test]
fn test_unknown_person_fails() {
    let conn = setup();
    let cache = SabbathCache::new();
    let result = compute_monthly_totals(&conn, 99, 2025, 3, &cache, minimum_wage());
    assert!(result.is_err());
}

#[test]
fn test_unknown_shift_kind_fails() {
    let conn = setup();
    insert_report(&conn, 1, 1, 1, "2025-03-04", 480, 960, 777);

    let cache = SabbathCache::new();
    let result = compute_monthly_totals(&conn, 1, 2025, 3, &cache, minimum_wage());
    assert!(result.is_err());
}

#[test]
fn test_missing_standby_rate_warns() {
    let conn = setup();
    conn.execute("DELETE FROM standby_rates WHERE segment_id = 52", [])
        .unwrap();
    insert_report(&conn, 1, 1, 1, "2025-03-02", 1320, 480, 107);

    let cache = load_sabbath_cache(&conn).unwrap();
    let computation =
        compute_monthly_totals(&conn, 1, 2025, 3, &cache, minimum_wage()).unwrap();
    assert_eq!(computation.warnings.len(), 1);
    assert_eq!(computation.warnings[0].code, "standby_rate_missing");
    // The default 70-shekel rate applies.
    assert_eq!(computation.totals.standby_payment, dec("70"));
}

// =============================================================================
// Invariants
// =============================================================================

/// Running the engine twice on the same snapshot yields identical totals.
#[test]
fn test_invariant_idempotence() {
    let conn = setup();
    insert_report(&conn, 1, 1, 1, "2025-03-02", 1320, 480, 107);
    insert_report(&conn, 2, 1, 1, "2025-03-04", 480, 990, 1);
    insert_report(&conn, 3, 1, 1, "2025-03-07", 840, 120, 1);

    let first = totals_for(&conn, 1, 2025, 3);
    let second = totals_for(&conn, 1, 2025, 3);
    assert_eq!(first, second);
}

/// Adding a non-overlapping work report never decreases any bucket.
#[test]
fn test_invariant_monotone_adequacy() {
    let conn = setup();
    insert_report(&conn, 1, 1, 1, "2025-03-04", 480, 960, 1);
    let before = totals_for(&conn, 1, 2025, 3);

    insert_report(&conn, 2, 1, 1, "2025-03-11", 480, 900, 1);
    let after = totals_for(&conn, 1, 2025, 3);

    assert!(after.calc100 >= before.calc100);
    assert!(after.calc125 >= before.calc125);
    assert!(after.calc150 >= before.calc150);
    assert!(after.calc175 >= before.calc175);
    assert!(after.calc200 >= before.calc200);
}

/// Tier buckets always sum to the total worked minutes.
#[test]
fn test_invariant_buckets_sum_to_total() {
    let conn = setup();
    insert_report(&conn, 1, 1, 1, "2025-03-02", 1320, 480, 107);
    insert_report(&conn, 2, 1, 1, "2025-03-04", 480, 990, 1);
    insert_report(&conn, 3, 1, 1, "2025-03-07", 840, 120, 1);
    insert_report(&conn, 4, 1, 1, "2025-03-08", 600, 1260, 1);

    let totals = totals_for(&conn, 1, 2025, 3);
    assert_eq!(
        totals.calc100 + totals.calc125 + totals.calc150 + totals.calc175 + totals.calc200,
        totals.total_work_minutes
    );
    assert_eq!(
        totals.calc150,
        totals.calc150_overtime + totals.calc150_shabbat
    );
    assert_eq!(
        totals.calc150_shabbat,
        totals.calc150_shabbat_100 + totals.calc150_shabbat_50
    );
}

/// Day-view segments never overlap and cover each chain exactly once.
#[test]
fn test_invariant_day_view_segments_ordered() {
    let conn = setup();
    insert_report(&conn, 1, 1, 1, "2025-03-02", 1320, 480, 107);
    insert_report(&conn, 2, 1, 1, "2025-03-07", 840, 120, 1);

    let cache = load_sabbath_cache(&conn).unwrap();
    let views = get_daily_segments(&conn, 1, 2025, 3, &cache, minimum_wage()).unwrap();
    for view in &views {
        for pair in view.segments.windows(2) {
            assert!(pair[0].start_min <= pair[1].start_min);
        }
        let work_minutes: i64 = view
            .segments
            .iter()
            .filter(|s| s.kind == DaySegmentKind::Work)
            .map(|s| s.end_min - s.start_min)
            .sum();
        assert_eq!(work_minutes, view.minutes.total());
    }
}
